pub mod config;
pub mod logger;
pub mod metrics;
pub mod server;

pub use config::*;
pub use logger::*;
pub use server::PortalApplicationServer;
