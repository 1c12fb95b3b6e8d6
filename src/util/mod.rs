//! Shared utility helpers.

pub mod error;

pub use error::{GridYoloError, Result as GridYoloResult};
