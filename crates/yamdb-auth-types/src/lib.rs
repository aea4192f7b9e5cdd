//! Auth types shared across YaMDb crates.
//!
//! Provides JWT issuing/validation and the `BearerToken` extractor.

pub mod bearer;
pub mod token;
