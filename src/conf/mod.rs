mod config;
mod data;
mod server;

pub use config::Config;
pub use data::DataConfig;
pub use server::ServerConfig;
