//! Core types shared by the cfsub pipeline stages.

pub mod error;
pub mod measurement;
pub mod settings;

pub use error::{Error, Result};
pub use measurement::Measurement;
pub use settings::{CoreType, Fingerprint, Settings};
