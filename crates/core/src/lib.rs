//! Domain model for Sanderson AI Learning: quiz questions and sessions, scoring,
//! review, chat messages, and settings. No I/O lives here.

pub mod error;
pub mod model;
pub mod time;

pub use error::Error;
