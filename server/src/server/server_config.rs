use std::default::Default;

use tether_shared::TickConfig;

/// Contains Config properties which will be used by the Server
#[derive(Clone, Debug)]
pub struct ServerConfig {
    /// Length of one simulation tick
    pub tick: TickConfig,
    /// How many not-yet-consumed inputs are kept per connection. Past this,
    /// the oldest buffered input is discarded.
    pub max_buffered_inputs: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            tick: TickConfig::default(),
            max_buffered_inputs: 64,
        }
    }
}
