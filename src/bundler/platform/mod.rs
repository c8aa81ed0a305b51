//! Platform-specific package formats.

pub mod windows;
