mod replication_host;
pub use replication_host::{FrameReport, OutgoingPacket, ReplicationHost};

mod server_config;
pub use server_config::ServerConfig;

mod server_process_list;
pub use server_process_list::ServerProcessList;
