//! # Tether Client
//! The observer side of tether: runs the same ticks as the server, predicts
//! the locally controlled participant between ticks, interpolates everything
//! else, and resolves strings the server interned for this connection.

#![deny(
    trivial_casts,
    trivial_numeric_casts,
    unstable_features,
    unused_import_braces
)]

pub mod shared {
    pub use tether_shared::{
        BitReader, BitWrite, BitWriter, ConnectionKey, Process, ProcessContext, ProcessKey,
        Serde, SerdeErr, StringMapping, StringRef, Tick, TickConfig,
    };
}

mod client_config;
mod client_process_list;
mod client_strings;
mod input_queue;
mod link_status;
mod tick_events;

pub use client_config::ClientConfig;
pub use client_process_list::{ClientProcessList, LOCAL_CONTROLLER};
pub use client_strings::ClientStrings;
pub use input_queue::InputQueue;
pub use link_status::LinkStatus;
pub use tick_events::{PredictedTickEvent, SimulatedTickEvent, TickEvent, TickEvents};
