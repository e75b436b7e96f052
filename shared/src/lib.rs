//! # Tether Shared
//! Common functionality shared between tether-server & tether-client crates:
//! per-connection dirty-mask replication tracking, per-connection string
//! interning, and the dependency-ordered process list that advances the
//! simulation in fixed ticks.

#![deny(trivial_numeric_casts, unstable_features, unused_import_braces)]

pub use naia_serde::{BitReader, BitWrite, BitWriter, Serde, SerdeErr};

mod index_list;
mod process;
mod replication;
mod sequence_list;
mod strings;
mod tick_config;
mod types;
mod wrapping_number;

pub use process::{
    error::ProcessError,
    input_source::{InputSource, NoInputs},
    process::Process,
    process_context::ProcessContext,
    process_key::ProcessKey,
    process_list::{AdvanceReport, OrderState, ProcessList},
    tick_clock::{TickClock, TickPlan},
};
pub use replication::{
    binding::{Binding, BindingState},
    dirty_mask::DirtyMask,
    dirty_tracker::{DirtyTracker, FlushReport},
    error::ReplicationError,
};
pub use sequence_list::{SequenceError, SequenceList};
pub use strings::{
    remote_string_table::RemoteStringTable,
    string_mapping::{StringIndex, StringMapping, StringRef},
    string_table::{StringTable, STRING_TABLE_SIZE},
};
pub use tick_config::TickConfig;
pub use types::{ConnectionKey, PacketIndex, Tick};
pub use wrapping_number::{tick_greater_than, tick_less_than};
