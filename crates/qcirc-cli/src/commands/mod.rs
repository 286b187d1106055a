//! CLI command implementations.

pub mod check;
pub mod common;
pub mod fmt;
pub mod inspect;
pub mod simulate;
pub mod version;
