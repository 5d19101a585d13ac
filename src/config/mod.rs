use crate::error::{Result, RunlogError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Name of the folder under the home directory that holds all program logs
pub const LOGS_DIR_NAME: &str = "logs";

/// Logging configuration for one program
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogConfig {
    /// Program name, used as the folder grouping all runs of the program
    pub program: String,

    /// Root directory holding per-program folders (defaults to `~/logs`)
    #[serde(default)]
    pub root: Option<PathBuf>,

    /// String repeated once per indentation level in front of each message
    #[serde(default = "default_indent")]
    pub indent: String,
}

// Default value functions for serde
fn default_indent() -> String {
    "\t".to_string()
}

impl LogConfig {
    /// Configuration for `program` with the default root and indent unit
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            root: None,
            indent: default_indent(),
        }
    }

    /// Override the log root directory
    pub fn with_root<P: AsRef<Path>>(mut self, root: P) -> Self {
        self.root = Some(root.as_ref().to_path_buf());
        self
    }

    /// Override the indent unit
    pub fn with_indent(mut self, indent: impl Into<String>) -> Self {
        self.indent = indent.into();
        self
    }

    /// Load a configuration from a file (supports TOML and JSON)
    pub fn from_file(path: &Path) -> Result<LogConfig> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| RunlogError::ConfigError(format!("Failed to read config file: {}", e)))?;

        // Determine format based on file extension
        let extension = path.extension().and_then(|s| s.to_str()).unwrap_or("");

        let mut config = match extension {
            "toml" => Self::parse_toml(&contents)?,
            "json" => Self::parse_json(&contents)?,
            _ => {
                return Err(RunlogError::InvalidConfig(format!(
                    "Unsupported file format: {}. Use .toml or .json",
                    extension
                )))
            }
        };

        config.expand_env_vars();
        config.validate()?;

        Ok(config)
    }

    /// Parse TOML configuration file
    fn parse_toml(contents: &str) -> Result<LogConfig> {
        toml::from_str(contents)
            .map_err(|e| RunlogError::InvalidConfig(format!("Failed to parse TOML: {}", e)))
    }

    /// Parse JSON configuration file
    fn parse_json(contents: &str) -> Result<LogConfig> {
        serde_json::from_str(contents)
            .map_err(|e| RunlogError::InvalidConfig(format!("Failed to parse JSON: {}", e)))
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.program.is_empty() {
            return Err(RunlogError::MissingConfigField("program".to_string()));
        }

        if !is_plain_component(&self.program) {
            return Err(RunlogError::ConfigValidationError(format!(
                "program must be a single path component: {:?}",
                self.program
            )));
        }

        if self.indent.is_empty() {
            return Err(RunlogError::ConfigValidationError(
                "indent must not be empty".to_string(),
            ));
        }

        if let Some(ref root) = self.root {
            if root.is_file() {
                return Err(RunlogError::ConfigValidationError(format!(
                    "Log root is a file: {}",
                    root.display()
                )));
            }
        }

        Ok(())
    }

    /// Resolve the directory holding per-program folders
    pub fn log_root(&self) -> Result<PathBuf> {
        match self.root {
            Some(ref root) => Ok(root.clone()),
            None => dirs::home_dir()
                .map(|home| home.join(LOGS_DIR_NAME))
                .ok_or_else(|| {
                    RunlogError::Initialization(
                        "Could not resolve the current user's home directory".to_string(),
                    )
                }),
        }
    }

    /// Resolve the directory holding every run of this program
    pub fn program_dir(&self) -> Result<PathBuf> {
        Ok(self.log_root()?.join(&self.program))
    }

    /// Expand environment variables in the root path
    fn expand_env_vars(&mut self) {
        if let Some(ref root) = self.root {
            self.root = Some(expand_env_in_path(root));
        }
    }
}

/// True when `name` can be used verbatim as one file or folder name
pub(crate) fn is_plain_component(name: &str) -> bool {
    !name.is_empty() && name != "." && name != ".." && !name.contains(['/', '\\'])
}

/// Expand `$VAR` and `${VAR}` occurrences in a string
///
/// A bare `$` takes the longest `[A-Za-z0-9_]+` name after it. Unset
/// variables and malformed references are left as written.
fn expand_env_in_string(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut rest = s;

    while let Some(pos) = rest.find('$') {
        result.push_str(&rest[..pos]);
        let after = &rest[pos + 1..];

        // (variable name, bytes consumed after the `$`)
        let (name, consumed) = match after.strip_prefix('{') {
            Some(braced) => match braced.find('}') {
                Some(end) if is_env_name(&braced[..end]) => (&braced[..end], end + 2),
                _ => ("", 0),
            },
            None => {
                let end = after
                    .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
                    .unwrap_or(after.len());
                (&after[..end], end)
            }
        };

        let token = &rest[pos..pos + 1 + consumed];
        match std::env::var(name) {
            Ok(value) if consumed > 0 => result.push_str(&value),
            _ => result.push_str(token),
        }

        rest = &rest[pos + 1 + consumed..];
    }

    result.push_str(rest);
    result
}

fn is_env_name(name: &str) -> bool {
    !name.is_empty() && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn expand_env_in_path(path: &Path) -> PathBuf {
    PathBuf::from(expand_env_in_string(&path.to_string_lossy()))
}
