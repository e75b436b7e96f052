pub mod remote_string_table;
pub mod string_mapping;
pub mod string_table;
