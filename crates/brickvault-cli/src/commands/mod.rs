//! CLI command implementations.

pub mod check;
pub mod config;
pub mod keygen;
pub mod permissions;
pub mod protect;
pub mod version;
