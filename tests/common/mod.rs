//! Common test utilities and fixtures for ctest-registrar integration tests
//!
//! This module provides:
//! - `TestRepo` builder for creating test directories with CMake and C++ suites
//! - Custom assertions for validating CLI output and patched files

#![allow(unused_imports)]
#![allow(dead_code)]


pub use assertions::*;
pub use test_repo::{suite_source, TestRepo};
