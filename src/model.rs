//! Core data model for neowatch.
//!
//! Tracked objects as the feed describes them, the accumulated set of
//! objects already reported, and the bounded fetch window.

mod object;
mod observed;
mod window;

pub use object::TrackedObject;
pub use observed::ObservedSet;
pub use window::{DateSpan, FetchWindow, WindowError};
