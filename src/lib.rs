// Suzume - small HTTP service that resizes uploaded images

pub mod config;
pub mod constants;
pub mod logging;
pub mod resize;
pub mod server;
