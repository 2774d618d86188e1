use crate::environment::{DepSpec, EnvError, EnvTable, ResolvedEnv};
use serde::Serialize;
use std::path::PathBuf;
use std::process::Stdio;
use std::time::{Duration, Instant};
use thiserror::Error;
use tokio::process::Command;
use tokio::time::timeout;
use tracing::{debug, error, info, warn};

#[derive(Error, Debug)]
pub enum RunError {
    #[error(transparent)]
    Env(#[from] EnvError),
}

/// Result of one executed command.
#[derive(Debug, Clone, Serialize)]
pub struct CommandOutcome {
    pub argv: Vec<String>,
    /// Exit code; `None` when the process was killed by a signal or timed out.
    pub exit_code: Option<i32>,
    pub duration: Duration,
    pub timed_out: bool,
}

impl CommandOutcome {
    pub fn succeeded(&self) -> bool {
        self.exit_code == Some(0)
    }
}

/// Verdict for one environment run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum EnvVerdict {
    Passed,
    /// A command exited non-zero (or was killed); later commands were skipped.
    CommandFailed { index: usize },
    /// Provisioning or dependency verification failed; no command was run.
    SetupFailed { reason: String },
}

#[derive(Debug, Serialize)]
pub struct EnvOutcome {
    pub name: String,
    pub verdict: EnvVerdict,
    pub commands: Vec<CommandOutcome>,
    pub duration: Duration,
}

impl EnvOutcome {
    pub fn passed(&self) -> bool {
        self.verdict == EnvVerdict::Passed
    }
}

/// Outcome of a whole run, one entry per selected environment, in order.
#[derive(Debug, Default, Serialize)]
pub struct RunReport {
    pub environments: Vec<EnvOutcome>,
}

impl RunReport {
    pub fn all_passed(&self) -> bool {
        self.environments.iter().all(EnvOutcome::passed)
    }

    pub fn exit_code(&self) -> i32 {
        i32::from(!self.all_passed())
    }
}

/// Runs resolved environments strictly sequentially: provision the
/// environment directory, apply `setenv` overrides plus `VIRTUAL_ENV`,
/// verify the dependency set, then execute the commands in order, stopping
/// at the first failure.
pub struct Executor {
    base_dir: PathBuf,
    command_timeout: Duration,
}

impl Executor {
    pub fn new(base_dir: PathBuf) -> Self {
        Self {
            base_dir,
            command_timeout: Duration::from_secs(3600),
        }
    }

    pub fn with_command_timeout(mut self, command_timeout: Duration) -> Self {
        self.command_timeout = command_timeout;
        self
    }

    /// Resolves every selected name up front (an unknown name aborts the
    /// whole run before anything executes), then runs each environment.
    pub async fn run(&self, table: &EnvTable<'_>, names: &[String]) -> Result<RunReport, RunError> {
        let mut resolved = Vec::with_capacity(names.len());
        for name in names {
            resolved.push(table.resolve(name)?);
        }

        let mut report = RunReport::default();
        for env in &resolved {
            let outcome = self.run_env(env).await;
            if !outcome.passed() {
                warn!(envname = %env.name, "environment failed");
            }
            report.environments.push(outcome);
        }
        Ok(report)
    }

    pub async fn run_env(&self, env: &ResolvedEnv) -> EnvOutcome {
        let started = Instant::now();
        info!(envname = %env.name, commands = env.commands.len(), "running environment");

        if let Err(reason) = self.provision(env) {
            error!(envname = %env.name, %reason, "environment setup failed");
            return EnvOutcome {
                name: env.name.clone(),
                verdict: EnvVerdict::SetupFailed { reason },
                commands: Vec::new(),
                duration: started.elapsed(),
            };
        }

        if let Err(reason) = self.verify_deps(env) {
            error!(envname = %env.name, %reason, "dependency resolution failed");
            return EnvOutcome {
                name: env.name.clone(),
                verdict: EnvVerdict::SetupFailed { reason },
                commands: Vec::new(),
                duration: started.elapsed(),
            };
        }

        let mut commands = Vec::new();
        let mut verdict = EnvVerdict::Passed;
        for (index, argv) in env.commands.iter().enumerate() {
            let outcome = self.run_command(env, argv).await;
            let failed = !outcome.succeeded();
            commands.push(outcome);
            if failed {
                // First failure marks the environment failed and skips the
                // remaining commands.
                verdict = EnvVerdict::CommandFailed { index };
                break;
            }
        }

        EnvOutcome {
            name: env.name.clone(),
            verdict,
            commands,
            duration: started.elapsed(),
        }
    }

    fn provision(&self, env: &ResolvedEnv) -> Result<(), String> {
        std::fs::create_dir_all(&env.env_dir)
            .map_err(|e| format!("cannot create {}: {e}", env.env_dir.display()))
    }

    /// Dependency verification: `-r` entries must point at existing files.
    /// Installation itself is delegated to the environment's commands; the
    /// runner is interpreter-agnostic.
    fn verify_deps(&self, env: &ResolvedEnv) -> Result<(), String> {
        for dep in &env.deps {
            match dep {
                DepSpec::RequirementsFile(path) => {
                    if !path.exists() {
                        return Err(format!(
                            "requirements file not found: {}",
                            path.display()
                        ));
                    }
                    debug!(envname = %env.name, file = %path.display(), "requirements file present");
                }
                DepSpec::Requirement(spec) => {
                    debug!(envname = %env.name, requirement = %spec, "recorded dependency");
                }
            }
        }
        Ok(())
    }

    async fn run_command(&self, env: &ResolvedEnv, argv: &[String]) -> CommandOutcome {
        let started = Instant::now();
        debug!(envname = %env.name, command = %argv.join(" "), "spawning command");

        let mut command = Command::new(&argv[0]);
        command
            .args(&argv[1..])
            .current_dir(&self.base_dir)
            .env("VIRTUAL_ENV", &env.env_dir)
            .stdin(Stdio::null());
        for (key, value) in &env.setenv {
            command.env(key, value);
        }

        let mut child = match command.spawn() {
            Ok(child) => child,
            Err(e) => {
                error!(envname = %env.name, command = %argv[0], "failed to spawn: {e}");
                return CommandOutcome {
                    argv: argv.to_vec(),
                    exit_code: Some(127),
                    duration: started.elapsed(),
                    timed_out: false,
                };
            }
        };

        match timeout(self.command_timeout, child.wait()).await {
            Ok(Ok(status)) => CommandOutcome {
                argv: argv.to_vec(),
                exit_code: status.code(),
                duration: started.elapsed(),
                timed_out: false,
            },
            Ok(Err(e)) => {
                error!(envname = %env.name, "failed to wait on command: {e}");
                CommandOutcome {
                    argv: argv.to_vec(),
                    exit_code: None,
                    duration: started.elapsed(),
                    timed_out: false,
                }
            }
            Err(_) => {
                warn!(
                    envname = %env.name,
                    timeout = self.command_timeout.as_secs(),
                    "command timed out, killing"
                );
                let _ = child.kill().await;
                CommandOutcome {
                    argv: argv.to_vec(),
                    exit_code: None,
                    duration: started.elapsed(),
                    timed_out: true,
                }
            }
        }
    }
}
