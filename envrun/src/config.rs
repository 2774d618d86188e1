use serde::Serialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Section holding the run-wide options (`envlist`, `skipsdist`).
pub const GLOBAL_SECTION: &str = "tox";

/// Errors raised while reading or parsing a configuration file.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("line {line}: malformed section header: {text}")]
    MalformedSection { line: usize, text: String },

    #[error("line {line}: option line outside any section: {text}")]
    OrphanOption { line: usize, text: String },

    #[error("line {line}: continuation line before any option")]
    OrphanContinuation { line: usize },

    #[error("line {line}: expected `key = value`: {text}")]
    MalformedOption { line: usize, text: String },
}

/// A single `[name]` section: ordered `key = value` options where each
/// value is a list of lines (one per continuation line).
#[derive(Debug, Clone, Serialize)]
pub struct Section {
    pub name: String,
    options: Vec<(String, Vec<String>)>,
}

impl Section {
    fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            options: Vec::new(),
        }
    }

    /// All value lines for `key`, in file order.
    pub fn get(&self, key: &str) -> Option<&[String]> {
        self.options
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_slice())
    }

    /// The value for `key` as a single string (lines joined with spaces).
    pub fn get_str(&self, key: &str) -> Option<String> {
        self.get(key).map(|lines| lines.join(" "))
    }

    /// The value for `key` interpreted as a boolean (`true`/`1`/`yes`/`on`).
    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.get_str(key)
            .map(|v| matches!(v.to_lowercase().as_str(), "true" | "1" | "yes" | "on"))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.options.iter().map(|(k, _)| k.as_str())
    }

    fn start_option(&mut self, key: String, first: Option<String>) {
        let mut lines = Vec::new();
        if let Some(first) = first {
            lines.push(first);
        }
        self.options.push((key, lines));
    }

    fn push_continuation(&mut self, line: String) -> bool {
        match self.options.last_mut() {
            Some((_, lines)) => {
                lines.push(line);
                true
            }
            None => false,
        }
    }
}

/// Parsed configuration file: an ordered list of sections plus the path it
/// was loaded from. Unrecognized sections (tool passthrough blocks such as
/// `[flake8]`) are kept verbatim and reachable through [`Self::section`].
#[derive(Debug, Clone, Serialize)]
pub struct RunnerConfig {
    pub path: PathBuf,
    sections: Vec<Section>,
}

impl RunnerConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::parse(&text, path.to_path_buf())
    }

    pub fn parse(text: &str, path: PathBuf) -> Result<Self, ConfigError> {
        let mut sections: Vec<Section> = Vec::new();

        for (idx, raw) in text.lines().enumerate() {
            let line_no = idx + 1;
            let line = raw.trim_end();

            if line.trim().is_empty() {
                continue;
            }
            let trimmed = line.trim_start();
            if trimmed.starts_with('#') || trimmed.starts_with(';') {
                continue;
            }

            if !line.starts_with(char::is_whitespace) && trimmed.starts_with('[') {
                let Some(name) = trimmed.strip_prefix('[').and_then(|r| r.strip_suffix(']'))
                else {
                    return Err(ConfigError::MalformedSection {
                        line: line_no,
                        text: line.to_string(),
                    });
                };
                if name.is_empty() {
                    return Err(ConfigError::MalformedSection {
                        line: line_no,
                        text: line.to_string(),
                    });
                }
                sections.push(Section::new(name));
                continue;
            }

            if line.starts_with(char::is_whitespace) {
                // Indented continuation line of the previous option.
                let Some(current) = sections.last_mut() else {
                    return Err(ConfigError::OrphanContinuation { line: line_no });
                };
                if !current.push_continuation(trimmed.to_string()) {
                    return Err(ConfigError::OrphanContinuation { line: line_no });
                }
                continue;
            }

            let Some(current) = sections.last_mut() else {
                return Err(ConfigError::OrphanOption {
                    line: line_no,
                    text: line.to_string(),
                });
            };

            let Some((key, value)) = line.split_once('=') else {
                return Err(ConfigError::MalformedOption {
                    line: line_no,
                    text: line.to_string(),
                });
            };
            let key = key.trim().to_string();
            if key.is_empty() {
                return Err(ConfigError::MalformedOption {
                    line: line_no,
                    text: line.to_string(),
                });
            }
            let value = value.trim();
            current.start_option(
                key,
                if value.is_empty() {
                    None
                } else {
                    Some(value.to_string())
                },
            );
        }

        Ok(Self { path, sections })
    }

    pub fn section(&self, name: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.name == name)
    }

    pub fn sections(&self) -> impl Iterator<Item = &Section> {
        self.sections.iter()
    }

    /// Environment names from the `[tox]` `envlist` option, in order.
    /// Entries are separated by commas, whitespace, or both.
    pub fn envlist(&self) -> Vec<String> {
        self.section(GLOBAL_SECTION)
            .and_then(|s| s.get_str("envlist"))
            .map(|value| {
                value
                    .split(|c: char| c == ',' || c.is_whitespace())
                    .filter(|e| !e.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn skipsdist(&self) -> bool {
        self.section(GLOBAL_SECTION)
            .and_then(|s| s.get_bool("skipsdist"))
            .unwrap_or(false)
    }

    /// Directory containing the configuration file; substituted for the
    /// `{toxinidir}` placeholder and used as the working directory for
    /// every command.
    pub fn base_dir(&self) -> PathBuf {
        self.path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."))
    }
}
