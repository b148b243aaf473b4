//! Session telemetry.
//!
//! # SAFETY INVARIANT
//! Telemetry is a READ-ONLY side-effect layer.
//! It must **NEVER** be read inside decision logic (Reactor, Turn Processor, Lifecycle, Synthesizer).
//!
//! # PRIVACY INVARIANT
//! Telemetry events must **NEVER** contain user content (turn text, hypotheses, plans, theories).
//! Only ids, enums and counts are allowed.

pub mod event;
pub mod metrics;
pub mod recorder;
