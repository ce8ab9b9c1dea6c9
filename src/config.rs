//! Registrar configuration management.
//!
//! Settings come from an optional `registrar.toml` in the root directory (or
//! an explicit `--config` path). Every field has a default matching the
//! CMake + `RUN_TEST_IF_ARGUMENT_EQUALS` conventions, and CLI flags override
//! whatever the file says.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{RegistrarError, Result};

/// File name looked up in the root directory
pub const CONFIG_FILE_NAME: &str = "registrar.toml";

/// Placeholder substituted with the test case name in templates
pub const TEST_PLACEHOLDER: &str = "{test}";

/// Registrar configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistrarConfig {
    /// Directory holding the descriptor and the suite files
    #[serde(skip)]
    pub root: PathBuf,

    /// Build descriptor file name, relative to the root
    pub descriptor: PathBuf,

    pub discovery: DiscoveryConfig,
    pub extract: ExtractConfig,
    pub descriptor_patch: DescriptorPatchConfig,
    pub suite_patch: SuitePatchConfig,
}

impl Default for RegistrarConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            descriptor: PathBuf::from("CMakeLists.txt"),
            discovery: DiscoveryConfig::default(),
            extract: ExtractConfig::default(),
            descriptor_patch: DescriptorPatchConfig::default(),
            suite_patch: SuitePatchConfig::default(),
        }
    }
}

/// Suite file naming convention
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiscoveryConfig {
    pub prefix: String,
    pub extension: String,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            prefix: "test_".to_string(),
            extension: ".cpp".to_string(),
        }
    }
}

/// Test function signature shape
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractConfig {
    /// Return-type keyword preceding the test identifier
    pub return_type: String,
    /// Identifier prefix required on test functions and stripped from names
    pub strip_prefix: String,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            return_type: "void".to_string(),
            strip_prefix: String::new(),
        }
    }
}

/// How test cases are laid out in the build descriptor
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum DescriptorLayout {
    /// `addTestSuite(<suite>` followed by names and a closing `)` line
    #[default]
    Inline,
    /// `list(APPEND test_cases` block closed right before `addTestSuite(<suite> ...)`
    ListAppend,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DescriptorPatchConfig {
    pub layout: DescriptorLayout,
    pub suite_marker: String,
    pub list_marker: String,
    pub entry_template: String,
    pub indent: String,
    /// Append a registration block for suites missing from the descriptor
    pub insert_missing: bool,
}

impl Default for DescriptorPatchConfig {
    fn default() -> Self {
        Self {
            layout: DescriptorLayout::Inline,
            suite_marker: "addTestSuite".to_string(),
            list_marker: "list(APPEND test_cases".to_string(),
            entry_template: TEST_PLACEHOLDER.to_string(),
            indent: "\t".to_string(),
            insert_missing: false,
        }
    }
}

/// Signature of the dispatch function inside each suite file
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum DispatchStyle {
    /// `auto run_tests(std::string const& test)`, closed by `return true`
    #[default]
    ByName,
    /// `auto run_tests(char* argv[])`, closed by `return 1`
    ByArgv,
}

impl DispatchStyle {
    pub fn entry_marker(&self) -> &'static str {
        match self {
            DispatchStyle::ByName => "auto run_tests(std::string const& test)",
            DispatchStyle::ByArgv => "auto run_tests(char* argv[])",
        }
    }

    pub fn terminator(&self) -> &'static str {
        match self {
            DispatchStyle::ByName => "return true",
            DispatchStyle::ByArgv => "return 1",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SuitePatchConfig {
    pub style: DispatchStyle,
    pub dispatch_template: String,
    pub indent: String,
    /// Generate the dispatch scaffolding when a suite has none
    pub synthesize: bool,
    pub namespace_anchor: String,
}

impl Default for SuitePatchConfig {
    fn default() -> Self {
        Self {
            style: DispatchStyle::ByName,
            dispatch_template: format!("RUN_TEST_IF_ARGUMENT_EQUALS({});", TEST_PLACEHOLDER),
            indent: "\t".to_string(),
            synthesize: false,
            namespace_anchor: "} // namespace".to_string(),
        }
    }
}

/// Substitute `name` into a `{test}` template
pub fn render_template(template: &str, name: &str) -> String {
    template.replace(TEST_PLACEHOLDER, name)
}

impl RegistrarConfig {
    /// Defaults rooted at `root`
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            ..Self::default()
        }
    }

    /// Load `registrar.toml` from the root directory, or defaults if absent
    pub fn load(root: &Path) -> Result<Self> {
        Self::load_from(root, &root.join(CONFIG_FILE_NAME))
    }

    /// Load configuration from a specific path
    pub fn load_from(root: &Path, path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!("No config at {}, using defaults", path.display());
            return Ok(Self::with_root(root));
        }

        let content = fs::read_to_string(path).map_err(|e| RegistrarError::io(path, e))?;
        let mut config = Self::parse(&content)?;
        config.root = root.to_path_buf();
        tracing::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Parse and validate TOML text
    pub fn parse(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).map_err(|e| RegistrarError::Config {
            message: format!("Failed to parse config: {}", e),
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let templates = [
            (
                "descriptor_patch.entry_template",
                &self.descriptor_patch.entry_template,
            ),
            (
                "suite_patch.dispatch_template",
                &self.suite_patch.dispatch_template,
            ),
        ];
        for (key, template) in templates {
            if !template.contains(TEST_PLACEHOLDER) {
                return Err(RegistrarError::Config {
                    message: format!("{} must contain {}: {:?}", key, TEST_PLACEHOLDER, template),
                });
            }
        }

        // Rendered entries must not look like the lines that delimit a block
        let entry = &self.descriptor_patch;
        for (key, value) in [
            ("descriptor_patch.entry_template", &entry.entry_template),
            ("descriptor_patch.indent", &entry.indent),
        ] {
            let has_marker =
                !entry.suite_marker.is_empty() && value.contains(entry.suite_marker.as_str());
            if value.contains(')') || has_marker {
                return Err(RegistrarError::Config {
                    message: format!(
                        "{} must not contain ')' or {:?}: {:?}",
                        key, entry.suite_marker, value
                    ),
                });
            }
        }
        let terminator = self.suite_patch.style.terminator();
        if self.suite_patch.dispatch_template.contains(terminator) {
            return Err(RegistrarError::Config {
                message: format!(
                    "suite_patch.dispatch_template must not contain {:?}: {:?}",
                    terminator, self.suite_patch.dispatch_template
                ),
            });
        }

        if self.discovery.extension.is_empty() {
            return Err(RegistrarError::Config {
                message: "discovery.extension must not be empty".to_string(),
            });
        }
        if self.extract.return_type.is_empty() {
            return Err(RegistrarError::Config {
                message: "extract.return_type must not be empty".to_string(),
            });
        }
        Ok(())
    }

    pub fn descriptor_path(&self) -> PathBuf {
        self.root.join(&self.descriptor)
    }

    /// Display configuration as formatted TOML
    pub fn display(&self) -> String {
        toml::to_string_pretty(self).unwrap_or_else(|e| format!("# failed to render config: {}", e))
    }
}
