//! Test helpers shared across slay crates.

pub mod clock;
pub mod upstream;

pub use clock::ManualClock;
pub use upstream::{FailingGenerator, FixedAnalyzer, FixedGenerator, RecordingGenerator};
