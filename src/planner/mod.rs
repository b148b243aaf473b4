pub mod context;
pub mod turn_processor;
pub mod types;
