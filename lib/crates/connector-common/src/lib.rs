pub mod config;
pub mod resources;

pub use config::{ConnectorConfig, default_port_names, default_server_labels};
pub use resources::*;
