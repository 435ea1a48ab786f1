pub mod bootstrap;
pub mod config;
pub mod csv;
pub mod logging;
pub mod model;
