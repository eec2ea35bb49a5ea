//! Terminal rendering.
//!
//! The renderer consumes what the core derives (series windows, the
//! classified state, and the recovery view) and owns all presentation
//! concerns. Timestamp conversion to display units happens here and
//! nowhere else.

pub mod common;
pub mod recovery;
pub mod theme;
pub mod vitals;

pub use theme::Theme;
