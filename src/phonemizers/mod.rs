//! Alias conventions.
//!
//! This module contains implementations of the [`Phonemizer`](crate::Phonemizer)
//! strategy, one per voicebank naming convention.
//!
//! # Available Conventions
//!
//! Enable conventions via Cargo features:
//! - `cvcv` - CVCV / VCCV style banks (German presets included)

#[cfg(feature = "cvcv")]
pub mod cvcv;
