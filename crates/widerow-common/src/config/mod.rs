//! Configuration for widerow components.

mod driver;
mod engine;

pub use driver::DriverConfig;
pub use engine::EngineConfig;
