pub mod binding;
pub mod connection_bindings;
pub mod dirty_mask;
pub mod dirty_tracker;
pub mod error;
