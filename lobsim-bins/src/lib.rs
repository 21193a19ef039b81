//! Shared code for the lobsim binaries

pub mod common;
pub mod synthetic;
