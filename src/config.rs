//! User configuration (`config.toml`).

use directories::ProjectDirs;
use serde::Deserialize;
use std::path::{Path, PathBuf};

const MAX_CONFIG_FILE_BYTES: u64 = 65_536; // 64 KiB

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Printed before reading each command.
    pub prompt: String,
    /// Echo each command after the prompt, so piped transcripts read naturally.
    pub echo_commands: bool,
    /// Append the dependency dump when the sheet is printed.
    pub show_dependencies: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            prompt: "> ".to_string(),
            echo_commands: true,
            show_dependencies: true,
        }
    }
}

/// Load the configuration, falling back to defaults on any problem.
///
/// An explicit `config_file` that does not exist is worth a warning; a
/// missing file in the default location is not.
pub fn load_config(config_file: Option<&Path>) -> (Config, Vec<String>) {
    let mut warnings: Vec<String> = Vec::new();
    let Some(path) = config_file.map(Path::to_path_buf).or_else(user_config_path) else {
        return (Config::default(), warnings);
    };

    if !path.exists() {
        if config_file.is_some() {
            warnings.push(format!("Config file not found: {}", path.display()));
        }
        return (Config::default(), warnings);
    }

    let config = match std::fs::metadata(&path) {
        Ok(meta) if meta.len() > MAX_CONFIG_FILE_BYTES => {
            warnings.push(format!(
                "Refusing to read {}: file too large ({} bytes, max {})",
                path.display(),
                meta.len(),
                MAX_CONFIG_FILE_BYTES
            ));
            None
        }
        Ok(_) => match std::fs::read_to_string(&path) {
            Ok(content) => match parse_config(&content) {
                Ok(config) => Some(config),
                Err(err) => {
                    warnings.push(format!("Failed to parse {}: {}", path.display(), err));
                    None
                }
            },
            Err(err) => {
                warnings.push(format!("Failed to read {}: {}", path.display(), err));
                None
            }
        },
        Err(err) => {
            warnings.push(format!(
                "Failed to read metadata for {}: {}",
                path.display(),
                err
            ));
            None
        }
    };

    (config.unwrap_or_default(), warnings)
}

pub fn parse_config(content: &str) -> Result<Config, toml::de::Error> {
    toml::from_str(content)
}

fn user_config_path() -> Option<PathBuf> {
    let proj = ProjectDirs::from("", "", "tally")?;
    let mut path = proj.config_dir().to_path_buf();
    path.push("config.toml");
    Some(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_empty_file_gives_defaults() {
        assert_eq!(parse_config("").unwrap(), Config::default());
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let config = parse_config("prompt = \"tally> \"\n").unwrap();
        assert_eq!(config.prompt, "tally> ");
        assert!(config.echo_commands);
        assert!(config.show_dependencies);
    }

    #[test]
    fn test_unknown_key_rejected() {
        assert!(parse_config("colour = true\n").is_err());
    }

    #[test]
    fn test_wrong_type_rejected() {
        assert!(parse_config("echo_commands = \"yes\"\n").is_err());
    }

    #[test]
    fn test_missing_explicit_file_warns() {
        let path = std::env::temp_dir().join("tally_config_test_missing_file.toml");
        let _ = std::fs::remove_file(&path);
        let (config, warnings) = load_config(Some(&path));
        assert_eq!(config, Config::default());
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].starts_with("Config file not found"));
    }

    #[test]
    fn test_load_from_file() {
        let path = std::env::temp_dir().join("tally_config_test_load.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "echo_commands = false").unwrap();
        writeln!(file, "show_dependencies = false").unwrap();
        drop(file);

        let (config, warnings) = load_config(Some(&path));
        std::fs::remove_file(&path).unwrap();
        assert!(warnings.is_empty());
        assert!(!config.echo_commands);
        assert!(!config.show_dependencies);
        assert_eq!(config.prompt, "> ");
    }

    #[test]
    fn test_bad_file_falls_back_with_warning() {
        let path = std::env::temp_dir().join("tally_config_test_bad.toml");
        std::fs::write(&path, "prompt = [").unwrap();
        let (config, warnings) = load_config(Some(&path));
        std::fs::remove_file(&path).unwrap();
        assert_eq!(config, Config::default());
        assert!(warnings[0].starts_with("Failed to parse"));
    }
}
