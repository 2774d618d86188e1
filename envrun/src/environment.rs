use crate::config::RunnerConfig;
use serde::Serialize;
use std::path::PathBuf;
use thiserror::Error;

/// Defaults section every environment inherits from.
pub const DEFAULTS_SECTION: &str = "testenv";

#[derive(Error, Debug)]
pub enum EnvError {
    #[error("no such environment: {name}")]
    NoSuchEnvironment { name: String },

    #[error("environment {envname}: unknown placeholder {{{placeholder}}}")]
    UnknownPlaceholder { envname: String, placeholder: String },

    #[error("environment {envname}: variable {var} is not set and has no default")]
    MissingEnvVar { envname: String, var: String },

    #[error("environment {envname}: malformed setenv entry (expected KEY=VALUE): {entry}")]
    MalformedSetenv { envname: String, entry: String },

    #[error("environment {envname}: unterminated quote in command: {command}")]
    UnterminatedQuote { envname: String, command: String },

    #[error("environment {envname}: empty command line")]
    EmptyCommand { envname: String },
}

/// One entry of an environment's dependency set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum DepSpec {
    /// A plain requirement specifier, e.g. `flake8>=3.7`.
    Requirement(String),
    /// A `-rFILE` reference to a requirements file.
    RequirementsFile(PathBuf),
}

/// An environment definition with every field resolved: specific section
/// values layered over the `[testenv]` defaults, placeholders expanded,
/// command lines split into argv lists.
#[derive(Debug, Clone, Serialize)]
pub struct ResolvedEnv {
    pub name: String,
    pub basepython: Option<String>,
    pub usedevelop: bool,
    pub deps: Vec<DepSpec>,
    pub commands: Vec<Vec<String>>,
    pub setenv: Vec<(String, String)>,
    pub env_dir: PathBuf,
}

/// The environment definition table: resolves names against the parsed
/// configuration. An environment is known if it has a `[testenv:NAME]`
/// section or appears in `envlist`; either way, omitted fields fall back to
/// the `[testenv]` defaults.
pub struct EnvTable<'a> {
    config: &'a RunnerConfig,
    workdir: PathBuf,
    posargs: Vec<String>,
}

impl<'a> EnvTable<'a> {
    pub fn new(config: &'a RunnerConfig, workdir: PathBuf, posargs: Vec<String>) -> Self {
        Self {
            config,
            workdir,
            posargs,
        }
    }

    /// Every known environment name: `envlist` order first, then any
    /// `[testenv:NAME]` section not already listed.
    pub fn names(&self) -> Vec<String> {
        let mut names = self.config.envlist();
        for section in self.config.sections() {
            if let Some(name) = section.name.strip_prefix("testenv:") {
                if !names.iter().any(|n| n == name) {
                    names.push(name.to_string());
                }
            }
        }
        names
    }

    fn is_known(&self, name: &str) -> bool {
        self.config
            .section(&format!("testenv:{name}"))
            .is_some()
            || self.config.envlist().iter().any(|n| n == name)
    }

    /// Field lookup with fallback: `[testenv:NAME]` first, `[testenv]` second.
    fn lookup(&self, name: &str, key: &str) -> Option<Vec<String>> {
        self.config
            .section(&format!("testenv:{name}"))
            .and_then(|s| s.get(key))
            .or_else(|| self.config.section(DEFAULTS_SECTION).and_then(|s| s.get(key)))
            .map(<[String]>::to_vec)
    }

    pub fn resolve(&self, name: &str) -> Result<ResolvedEnv, EnvError> {
        if !self.is_known(name) {
            return Err(EnvError::NoSuchEnvironment {
                name: name.to_string(),
            });
        }

        let env_dir = self.workdir.join(name);
        let toxinidir = self.config.base_dir();
        let subst = Substitution {
            envname: name,
            toxinidir: &toxinidir,
            env_dir: &env_dir,
            posargs: &self.posargs,
        };

        let basepython = self
            .lookup(name, "basepython")
            .map(|lines| lines.join(" "));
        let usedevelop = self
            .lookup(name, "usedevelop")
            .map(|lines| {
                matches!(
                    lines.join(" ").to_lowercase().as_str(),
                    "true" | "1" | "yes" | "on"
                )
            })
            .unwrap_or(false);

        let mut deps = Vec::new();
        for line in self.lookup(name, "deps").unwrap_or_default() {
            let expanded = subst.expand(&line)?;
            deps.push(match expanded.strip_prefix("-r") {
                Some(file) => DepSpec::RequirementsFile(PathBuf::from(file.trim())),
                None => DepSpec::Requirement(expanded),
            });
        }

        let mut setenv = Vec::new();
        for entry in self.lookup(name, "setenv").unwrap_or_default() {
            let Some((key, value)) = entry.split_once('=') else {
                return Err(EnvError::MalformedSetenv {
                    envname: name.to_string(),
                    entry: entry.clone(),
                });
            };
            setenv.push((key.trim().to_string(), subst.expand(value.trim())?));
        }

        let mut commands = Vec::new();
        for line in self.lookup(name, "commands").unwrap_or_default() {
            commands.push(subst.expand_command(&line)?);
        }

        Ok(ResolvedEnv {
            name: name.to_string(),
            basepython,
            usedevelop,
            deps,
            commands,
            setenv,
            env_dir,
        })
    }
}

/// Placeholder expansion context for one environment.
struct Substitution<'a> {
    envname: &'a str,
    toxinidir: &'a PathBuf,
    env_dir: &'a PathBuf,
    posargs: &'a [String],
}

impl Substitution<'_> {
    /// Expands `{placeholder}` occurrences in a plain value. `{posargs}`
    /// joins the extra arguments with spaces here; command lines go through
    /// [`Self::expand_command`] instead, which splices them as separate
    /// argv entries.
    fn expand(&self, value: &str) -> Result<String, EnvError> {
        let mut out = String::with_capacity(value.len());
        let mut rest = value;
        while let Some(start) = rest.find('{') {
            out.push_str(&rest[..start]);
            let after = &rest[start + 1..];
            let Some(end) = after.find('}') else {
                // No closing brace: keep the text literally.
                out.push_str(&rest[start..]);
                return Ok(out);
            };
            out.push_str(&self.replacement(&after[..end])?);
            rest = &after[end + 1..];
        }
        out.push_str(rest);
        Ok(out)
    }

    fn replacement(&self, placeholder: &str) -> Result<String, EnvError> {
        match placeholder {
            "toxinidir" => Ok(self.toxinidir.display().to_string()),
            "envdir" => Ok(self.env_dir.display().to_string()),
            "envname" => Ok(self.envname.to_string()),
            "posargs" => Ok(self.posargs.join(" ")),
            _ => {
                if let Some(spec) = placeholder.strip_prefix("env:") {
                    let (var, default) = match spec.split_once(':') {
                        Some((var, default)) => (var, Some(default)),
                        None => (spec, None),
                    };
                    return match std::env::var(var) {
                        Ok(value) => Ok(value),
                        Err(_) => default.map(str::to_string).ok_or_else(|| {
                            EnvError::MissingEnvVar {
                                envname: self.envname.to_string(),
                                var: var.to_string(),
                            }
                        }),
                    };
                }
                Err(EnvError::UnknownPlaceholder {
                    envname: self.envname.to_string(),
                    placeholder: placeholder.to_string(),
                })
            }
        }
    }

    /// Splits a command line into argv entries (whitespace separated,
    /// quotes group words) and expands placeholders per token. A bare
    /// `{posargs}` token splices the extra arguments in place.
    fn expand_command(&self, line: &str) -> Result<Vec<String>, EnvError> {
        let tokens = split_command(line).ok_or_else(|| EnvError::UnterminatedQuote {
            envname: self.envname.to_string(),
            command: line.to_string(),
        })?;
        if tokens.is_empty() {
            return Err(EnvError::EmptyCommand {
                envname: self.envname.to_string(),
            });
        }

        let mut argv = Vec::new();
        for token in tokens {
            if token == "{posargs}" {
                argv.extend(self.posargs.iter().cloned());
            } else {
                argv.push(self.expand(&token)?);
            }
        }
        if argv.is_empty() {
            return Err(EnvError::EmptyCommand {
                envname: self.envname.to_string(),
            });
        }
        Ok(argv)
    }
}

/// Shell-style word splitting: whitespace separates words, single and
/// double quotes group them. Returns `None` on an unterminated quote.
fn split_command(line: &str) -> Option<Vec<String>> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut in_word = false;
    let mut quote: Option<char> = None;

    for c in line.chars() {
        match quote {
            Some(q) if c == q => quote = None,
            Some(_) => current.push(c),
            None if c == '\'' || c == '"' => {
                quote = Some(c);
                in_word = true;
            }
            None if c.is_whitespace() => {
                if in_word {
                    words.push(std::mem::take(&mut current));
                    in_word = false;
                }
            }
            None => {
                current.push(c);
                in_word = true;
            }
        }
    }
    if quote.is_some() {
        return None;
    }
    if in_word {
        words.push(current);
    }
    Some(words)
}
