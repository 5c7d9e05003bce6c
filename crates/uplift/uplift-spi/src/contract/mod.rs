//! Contract definitions for uplift scoring.
//!
//! This module contains trait definitions that scoring models must implement.

mod scorer;

pub use scorer::Scorer;
