pub mod config;
pub mod logging;

// Request handling core
pub mod artifact;
pub mod gate;
pub mod path_gate;
pub mod response;

// HTTP host adapter
pub mod server;
