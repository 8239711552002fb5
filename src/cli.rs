use std::path::{Path, PathBuf};

mod check;
mod outline;
mod render;
mod resolve;
mod terminal;

use check::Check;
use clap::ArgAction;
use outline::Outline;
use regmaps::Config;
use render::Render;
use resolve::Resolve;

/// Configuration file picked up from the working directory when `--config`
/// is not given.
const DEFAULT_CONFIG_FILE: &str = "regmaps.toml";

#[derive(Debug, clap::Parser)]
#[command(version, about)]
pub struct Cli {
    /// Verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to a configuration file (defaults to ./regmaps.toml if present)
    #[arg(short, long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

impl Cli {
    pub fn run(self) -> anyhow::Result<()> {
        Self::setup_logging(self.verbose);

        let config = load_config(self.config.as_deref())?;
        self.command.run(&config)
    }

    fn setup_logging(verbosity: u8) {
        use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

        let level = match verbosity {
            0 => tracing::Level::WARN,
            1 => tracing::Level::INFO,
            2 => tracing::Level::DEBUG,
            _ => tracing::Level::TRACE,
        };

        let filter = tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into());

        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false)
            .with_thread_names(false)
            .with_line_number(false);

        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .init();
    }
}

/// Loads the configuration named on the command line, else the default file
/// if it exists, else the built-in defaults.
fn load_config(explicit: Option<&Path>) -> anyhow::Result<Config> {
    let fallback = Path::new(DEFAULT_CONFIG_FILE);
    let Some(path) = explicit.or_else(|| fallback.is_file().then_some(fallback)) else {
        tracing::debug!("no configuration file, using defaults");
        return Ok(Config::default());
    };

    tracing::debug!(path = %path.display(), "loading configuration");
    Config::load(path).map_err(|e| anyhow::anyhow!("{e}"))
}

#[derive(Debug, clap::Subcommand)]
pub enum Command {
    /// Render a stored content file
    Render(Render),

    /// Resolve a reference to its path
    ///
    /// A subsection requires a chapter.
    Resolve(Resolve),

    /// Check stored content files for problems
    ///
    /// Exits with status 2 if any file has problems.
    Check(Check),

    /// Print the regulation hierarchy with subsection anchors
    Outline(Outline),
}

impl Command {
    fn run(self, config: &Config) -> anyhow::Result<()> {
        match self {
            Self::Render(command) => command.run(config)?,
            Self::Resolve(command) => command.run(config)?,
            Self::Check(command) => command.run()?,
            Self::Outline(command) => command.run()?,
        }
        Ok(())
    }
}
