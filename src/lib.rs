pub mod config;
pub mod console;
pub mod hypothesis;
pub mod kernel;
pub mod memory;
pub mod planner;
pub mod services;
pub mod synthesis;

// Re-export specific items if needed for convenient access
pub use kernel::reactor::Reactor;
