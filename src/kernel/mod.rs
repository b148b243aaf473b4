pub mod event;
pub mod reactor;
pub mod state;
pub mod telemetry;
