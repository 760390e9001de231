use serde::Deserialize;
use std::fmt;
use std::path::Path;

/// Rewriter settings, read from a `morph.toml` file.
///
/// Every field is optional in the file; missing values take the defaults.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RewriterConfig {
    /// Worker threads used to resolve expression types.
    pub num_threads: usize,
    /// Print each intention's history above its declaration.
    pub print_intention_history: bool,
    pub passes: PassesConfig,
}

/// Which intention passes run, from the `[passes]` table.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PassesConfig {
    pub property_merge: bool,
    pub remove_empty_extensions: bool,
}

impl Default for RewriterConfig {
    fn default() -> Self {
        Self {
            num_threads: 4,
            print_intention_history: false,
            passes: PassesConfig::default(),
        }
    }
}

impl Default for PassesConfig {
    fn default() -> Self {
        Self {
            property_merge: true,
            remove_empty_extensions: true,
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Io { path: String, message: String },
    Parse(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io { path, message } => write!(f, "Failed to read {}: {}", path, message),
            ConfigError::Parse(message) => write!(f, "Failed to parse config: {}", message),
        }
    }
}

impl std::error::Error for ConfigError {}

impl RewriterConfig {
    /// Read and parse a config file.
    pub fn load(path: &Path) -> Result<RewriterConfig, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<RewriterConfig, ConfigError> {
        let config: RewriterConfig =
            toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))?;
        if config.num_threads == 0 {
            return Err(ConfigError::Parse("num_threads must be at least 1".to_string()));
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn parse_full_config() {
        let toml = r#"
num_threads = 2
print_intention_history = true

[passes]
property_merge = false
remove_empty_extensions = true
"#;
        let config = RewriterConfig::from_toml_str(toml).unwrap();
        assert_eq!(config.num_threads, 2);
        assert!(config.print_intention_history);
        assert!(!config.passes.property_merge);
        assert!(config.passes.remove_empty_extensions);
    }

    #[test]
    fn empty_config_is_default() {
        let config = RewriterConfig::from_toml_str("").unwrap();
        assert_eq!(config, RewriterConfig::default());
    }

    #[test]
    fn partial_passes_table_keeps_other_defaults() {
        let config = RewriterConfig::from_toml_str("[passes]\nproperty_merge = false\n").unwrap();
        assert!(!config.passes.property_merge);
        assert!(config.passes.remove_empty_extensions);
        assert_eq!(config.num_threads, 4);
    }

    #[test]
    fn reject_zero_threads() {
        let err = RewriterConfig::from_toml_str("num_threads = 0").unwrap_err();
        assert!(err.to_string().contains("num_threads"), "Error: {}", err);
    }

    #[test]
    fn reject_wrong_types() {
        let err = RewriterConfig::from_toml_str("num_threads = \"many\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
        assert!(err.to_string().contains("Failed to parse config"), "Error: {}", err);
    }

    #[test]
    fn load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "num_threads = 8").unwrap();
        let config = RewriterConfig::load(file.path()).unwrap();
        assert_eq!(config.num_threads, 8);
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = RewriterConfig::load(&dir.path().join("morph.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
