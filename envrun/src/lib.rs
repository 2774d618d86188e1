pub mod config;
pub mod environment;
pub mod executor;

pub use config::{ConfigError, RunnerConfig, Section, GLOBAL_SECTION};
pub use environment::{DepSpec, EnvError, EnvTable, ResolvedEnv, DEFAULTS_SECTION};
pub use executor::{CommandOutcome, EnvOutcome, EnvVerdict, Executor, RunError, RunReport};
