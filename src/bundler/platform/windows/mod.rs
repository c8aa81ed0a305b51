//! Windows package formats.

pub mod chocolatey;
