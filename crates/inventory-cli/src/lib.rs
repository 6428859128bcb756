//! CLI library components for the asset inventory tooling.

#![deny(unsafe_code)]

pub mod assignment;
pub mod listing;
pub mod logging;
pub mod replay;
