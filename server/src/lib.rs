//! # Tether Server
//! The authority side of tether: advances the simulation in fixed ticks,
//! feeding controlled participants from each connection's buffered inputs,
//! and fans the resulting dirty masks out to every bound connection.

#![deny(
    trivial_casts,
    trivial_numeric_casts,
    unstable_features,
    unused_import_braces
)]

pub mod shared {
    pub use tether_shared::{
        BitReader, BitWrite, BitWriter, ConnectionKey, DirtyMask, DirtyTracker, Process,
        ProcessContext, ProcessKey, Serde, SerdeErr, StringMapping, Tick, TickConfig,
    };
}

mod error;
mod events;
mod server;
mod user;

pub use error::{HostError, InputError};
pub use events::TickEvents;
pub use server::{FrameReport, OutgoingPacket, ReplicationHost, ServerConfig, ServerProcessList};
pub use user::user_inputs::UserInputs;
