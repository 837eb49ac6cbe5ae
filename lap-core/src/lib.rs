// Lap telemetry analytics: alignment, comparison, synthesis, projection.

pub mod brakepoints;
pub mod fuel;
pub mod median;
pub mod model;
pub mod peaks;
pub mod resample;
pub mod selector;
pub mod timediff;
