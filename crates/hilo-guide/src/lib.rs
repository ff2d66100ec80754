pub mod config;
pub mod logging;
pub mod odds;
pub mod session;
