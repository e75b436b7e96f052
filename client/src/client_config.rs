use std::default::Default;

use tether_shared::TickConfig;

/// Contains Config properties which will be used by the Client
#[derive(Clone, Debug)]
pub struct ClientConfig {
    /// Length of one simulation tick. Must match the server's.
    pub tick: TickConfig,
    /// Once this many local inputs are waiting for the server to acknowledge
    /// them, the link counts as backlogged and local time stops advancing.
    pub max_pending_inputs: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            tick: TickConfig::default(),
            max_pending_inputs: 32,
        }
    }
}
