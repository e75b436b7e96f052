pub(crate) mod user_connection;
pub(crate) mod user_inputs;
