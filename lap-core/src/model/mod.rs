// Core data models for telemetry samples, laps, and the live session.

mod lap;
mod sample;
mod session;

pub use lap::Lap;
pub use sample::Sample;
pub use session::Session;
