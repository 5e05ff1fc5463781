//! Type definitions for lucal

mod calendar;
mod error;
mod holiday;

pub use calendar::*;
pub use error::*;
pub use holiday::*;
