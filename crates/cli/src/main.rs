mod commands;

use clap::{CommandFactory, Parser};
use clap_complete::{Shell, generate};
use glasspage_core::Language;
use std::io;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "glasspage")]
#[command(version, about = "Bilingual site generator for glass repair shops", long_about = None)]
struct Cli {
    /// Enable debug logging (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Parser)]
enum Command {
    /// Create a site directory with the starter catalog
    Init {
        /// Path to create site directory
        path: PathBuf,
    },

    /// Check site.toml for slug collisions and missing content
    Validate {
        /// Path to site directory
        path: PathBuf,
    },

    /// Generate the static site
    Build {
        /// Path to site directory
        path: PathBuf,

        /// Output directory for generated site
        #[arg(short, long)]
        output: PathBuf,
    },

    /// List every page path the build produces
    Routes {
        /// Path to site directory
        path: PathBuf,

        /// Only list pages in this language (en, es)
        #[arg(short, long)]
        lang: Option<Language>,
    },

    /// Preview site locally with hot reload
    Preview {
        /// Path to site directory
        path: PathBuf,

        /// Port to serve on
        #[arg(short, long, default_value = "8080")]
        port: u16,
    },

    /// Generate shell completion scripts
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "glasspage=debug" } else { "glasspage=info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Command::Init { path } => commands::init::run(path).await,
        Command::Validate { path } => commands::validate::run(path).await,
        Command::Build { path, output } => commands::build::run(path, output).await,
        Command::Routes { path, lang } => commands::routes::run(path, lang).await,
        Command::Preview { path, port } => commands::preview::run(path, port).await,
        Command::Completions { shell } => {
            let mut cmd = Cli::command();
            generate(shell, &mut cmd, "glasspage", &mut io::stdout());
            Ok(())
        }
    }
}
