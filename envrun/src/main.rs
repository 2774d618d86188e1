use clap::Parser;
use envrun::{EnvTable, EnvVerdict, Executor, RunnerConfig};
use std::path::PathBuf;
use std::time::Duration;
use tracing::info;

#[derive(Parser)]
#[command(name = "envrun")]
#[command(about = "Run named tool environments from an ini-style configuration")]
struct Cli {
    /// Environments to run (defaults to the configured envlist)
    #[arg(short = 'e', long = "env", value_delimiter = ',')]
    envs: Vec<String>,

    /// Path to the configuration file
    #[arg(short = 'c', long, default_value = "tox.ini")]
    config: PathBuf,

    /// Directory for per-environment state (defaults to .envrun beside the config)
    #[arg(long)]
    workdir: Option<PathBuf>,

    /// List the resolved environments and exit
    #[arg(short, long)]
    list: bool,

    /// Emit the environment list as JSON (with --list)
    #[arg(long)]
    json: bool,

    /// Per-command timeout in seconds
    #[arg(long, default_value = "3600")]
    timeout: u64,

    /// Extra arguments substituted for {posargs}
    #[arg(last = true)]
    posargs: Vec<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    let config = RunnerConfig::load(&cli.config)?;
    let workdir = cli
        .workdir
        .clone()
        .unwrap_or_else(|| config.base_dir().join(".envrun"));
    let table = EnvTable::new(&config, workdir, cli.posargs.clone());

    if cli.list {
        return list_environments(&table, cli.json);
    }

    let selected = if cli.envs.is_empty() {
        config.envlist()
    } else {
        cli.envs.clone()
    };
    if selected.is_empty() {
        return Err("no environments selected: envlist is empty and no -e given".into());
    }
    info!(environments = %selected.join(","), "starting run");

    let executor =
        Executor::new(config.base_dir()).with_command_timeout(Duration::from_secs(cli.timeout));
    let report = executor.run(&table, &selected).await?;

    println!("\n--- Summary ---");
    for outcome in &report.environments {
        match &outcome.verdict {
            EnvVerdict::Passed => {
                println!("  ✓ {}: passed ({:.1}s)", outcome.name, outcome.duration.as_secs_f64());
            }
            EnvVerdict::CommandFailed { index } => {
                let argv = outcome
                    .commands
                    .get(*index)
                    .map(|c| c.argv.join(" "))
                    .unwrap_or_default();
                println!("  ✗ {}: command {} failed: {}", outcome.name, index + 1, argv);
            }
            EnvVerdict::SetupFailed { reason } => {
                println!("  ✗ {}: setup failed: {}", outcome.name, reason);
            }
        }
    }

    std::process::exit(report.exit_code());
}

fn list_environments(table: &EnvTable<'_>, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let mut resolved = Vec::new();
    for name in table.names() {
        resolved.push(table.resolve(&name)?);
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&resolved)?);
        return Ok(());
    }

    println!("Configured environments:");
    for env in &resolved {
        println!("  {}", env.name);
        if let Some(basepython) = &env.basepython {
            println!("    basepython: {}", basepython);
        }
        for command in &env.commands {
            println!("    command: {}", command.join(" "));
        }
    }
    Ok(())
}
