//! Worker module
//!
//! The dispatch loop and the per-event unroll step it drives.

pub mod deliver;
pub mod dispatch;

pub use deliver::{UnrollOutcome, unroll_reply};
pub use dispatch::Dispatcher;
