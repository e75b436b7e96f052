pub mod assertions;
pub mod test_process;

pub use packet_exchange::{deliver_packet, drop_packet};
pub use test_link::TestLink;
pub use test_process::{Mover, Recorder, TickAction};

/// Initialise test logging once; later calls are ignored.
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}
