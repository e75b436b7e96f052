pub mod error;
pub mod input_source;
pub mod process;
pub mod process_context;
pub mod process_key;
pub mod process_list;
pub mod tick_clock;
