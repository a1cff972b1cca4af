//! Verdant - chunked point index and brush tooling for instanced grass

pub mod core;
pub mod math;
pub mod grass;
pub mod storage;
