//! ctest-registrar: keeps CTest registrations and C++ test dispatch code in
//! sync with the test functions defined in `test_*.cpp` suites.
//!
//! A run discovers the suite files in a root directory, extracts the
//! zero-argument test functions from each, then regenerates:
//!
//! - the suite's block of test-case lines in `CMakeLists.txt`
//! - the `RUN_TEST_IF_ARGUMENT_EQUALS(...)` lines in the suite's dispatch function
//!
//! # Example
//!
//! ```no_run
//! use ctest_registrar::{Registrar, RegistrarConfig, RunMode};
//!
//! let config = RegistrarConfig::load(std::path::Path::new("src/test"))?;
//! let report = Registrar::new(config).run(RunMode::Write)?;
//! println!("{} file(s) changed", report.changed_files());
//! # Ok::<(), ctest_registrar::RegistrarError>(())
//! ```

pub mod cli;
pub mod commands;
pub mod config;
pub mod descriptor;
pub mod discovery;
pub mod error;
pub mod extract;
pub mod fs_utils;
pub mod lines;
pub mod registrar;
pub mod suite_file;

// Re-export commonly used types
pub use cli::{Cli, Commands, OutputFormat};
pub use config::{DescriptorLayout, DispatchStyle, RegistrarConfig};
pub use discovery::{discover_suites, TestSuite};
pub use error::{RegistrarError, Result};
pub use extract::{extract_test_cases, extract_test_names, TestCase};
pub use lines::{LineBuffer, LineRange};
pub use registrar::{PatchOutcome, Registrar, RunMode, RunReport, SuiteReport};
