pub mod config;
pub mod error;
pub mod handlers;
pub mod render;
pub mod routing;
pub mod session;
pub mod state;
pub mod storage;
