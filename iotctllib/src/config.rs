//! CLI configuration: named profiles loaded from a YAML file.
//!
//! ```yaml
//! profiles:
//!   default:
//!     groupTableOutputRows: true
//!   scripting:
//!     groupTableOutputRows: false
//!     defaultOutput: json
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::IotctlError;
use crate::output::OutputFormat;
use crate::Result;

/// Profile used when none is requested.
pub const DEFAULT_PROFILE: &str = "default";

/// Settings of a single profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Profile {
    /// Draw a rule every five rows in list tables
    pub group_table_output_rows: bool,
    /// Output format used when no format flag is given
    pub default_output: OutputFormat,
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            group_table_output_rows: true,
            default_output: OutputFormat::Table,
        }
    }
}

/// Parsed configuration file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CliConfig {
    #[serde(default)]
    pub profiles: BTreeMap<String, Profile>,
}

impl CliConfig {
    /// Parse configuration from YAML text.
    pub fn from_yaml(text: &str) -> std::result::Result<Self, serde_yaml::Error> {
        // An empty file parses as null
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(text)
    }

    /// Load configuration from a file.
    pub fn from_path(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|source| IotctlError::FileRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml(&text).map_err(|e| IotctlError::ConfigParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Default config location: `<config dir>/iotctl/config.yaml`.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("iotctl").join("config.yaml"))
    }

    /// Load from `explicit` if given, otherwise the default location if it exists.
    ///
    /// A missing explicit file is an error; a missing default file yields defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => Self::from_path(path),
            None => match Self::default_path() {
                Some(path) if path.is_file() => Self::from_path(&path),
                _ => Ok(Self::default()),
            },
        }
    }

    /// Settings for `name`, or defaults when the profile is not defined.
    pub fn profile(&self, name: &str) -> Profile {
        self.profiles.get(name).copied().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const CONFIG: &str = "
profiles:
  default:
    groupTableOutputRows: false
  scripting:
    defaultOutput: yaml
";

    #[test]
    fn test_profile_defaults() {
        let profile = Profile::default();
        assert!(profile.group_table_output_rows);
        assert_eq!(profile.default_output, OutputFormat::Table);
    }

    #[test]
    fn test_parse_profiles() {
        let config = CliConfig::from_yaml(CONFIG).unwrap();
        assert!(!config.profile("default").group_table_output_rows);

        let scripting = config.profile("scripting");
        assert!(scripting.group_table_output_rows);
        assert_eq!(scripting.default_output, OutputFormat::Yaml);
    }

    #[test]
    fn test_unknown_profile_is_default() {
        let config = CliConfig::from_yaml(CONFIG).unwrap();
        assert_eq!(config.profile("missing"), Profile::default());
    }

    #[test]
    fn test_empty_file() {
        assert_eq!(CliConfig::from_yaml("  \n").unwrap(), CliConfig::default());
    }

    #[test]
    fn test_load_explicit_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(CONFIG.as_bytes()).unwrap();
        let config = CliConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.profiles.len(), 2);
    }

    #[test]
    fn test_load_missing_explicit_file_fails() {
        let err = CliConfig::load(Some(Path::new("/no/such/config.yaml"))).unwrap_err();
        assert!(matches!(err, IotctlError::FileRead { .. }));
    }

    #[test]
    fn test_invalid_yaml() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"profiles: [unclosed").unwrap();
        let err = CliConfig::from_path(file.path()).unwrap_err();
        assert!(matches!(err, IotctlError::ConfigParse { .. }));
    }
}
