//! Bounded, newest-first gallery of generated images.
//!
//! The gallery is volatile: it lives for the lifetime of the process and is
//! shared by handle, never through a global.

pub mod clock;
pub mod error;
pub mod model;
pub mod record_log;
pub mod window;

/// Clock abstraction used to stamp records.
pub use clock::{Clock, SystemClock};
/// Gallery error type.
pub use error::GalleryError;
/// Bounded record log and its defaults.
pub use record_log::{BoundedRecordLog, DEFAULT_LATEST, MAX_CAPACITY};
/// Record and aggregate models.
pub use model::{DailyCount, GalleryRecord};
/// Latest-window parsing.
pub use window::latest_count;
