use clap::{Parser, Subcommand};
use paper_log::config::{self, Overrides};
use paper_log::pipeline::{self, PipelineError, Workspace};
use paper_log::render::SvgRenderer;
use paper_log::{export, output};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser)]
#[command(name = "paper-log")]
#[command(about = "Validate a paper-reading log and render its README summary")]
#[command(long_about = "\
Validate a paper-reading log and render its README summary

The log is a YAML list of papers read. Each build regenerates two charts,
a category breakdown and a recent list, and splices them into the README
between marker lines. A JSON export is kept alongside the YAML.

Repository layout (paths configurable in paper-log.toml):

  .
  ├── paper-log.toml           # Optional config
  ├── README.md                # Contains <!--CHART_START--> / <!--CHART_END-->
  ├── data/
  │   ├── papers.yml           # The log (source of truth)
  │   └── papers.json          # Export (generated)
  └── assets/
      ├── category_stylish.svg # Papers by category (generated)
      └── activity_heatmap.svg # Daily activity (generated)

Entry format:

  - title: \"Attention Is All You Need\"
    category: LLM
    date: 2025-01-01
    link: https://arxiv.org/abs/1706.03762
    note: optional

Run 'paper-log gen-config' to generate a documented paper-log.toml.")]
#[command(version)]
struct Cli {
    /// Repository root
    #[arg(long, default_value = ".", env = "PAPER_LOG_ROOT", global = true)]
    root: PathBuf,

    /// Config file, relative to the root [default: paper-log.toml]
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// IANA time zone that defines "today" (overrides the config file)
    #[arg(long, global = true)]
    timezone: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Validate the log without writing anything
    Check,
    /// Validate, render charts, update the README and rewrite the export
    Build,
    /// Validate and rewrite the JSON export
    Export,
    /// Print a stock paper-log.toml with all options documented
    GenConfig,
    /// Print the JSON Schema of the export
    Schema,
}

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| "paper_log=warn".into()),
        )
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            output::print_error(&err);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), PipelineError> {
    match cli.command {
        Command::Check => {
            let ws = open_workspace(&cli)?;
            let validated = pipeline::check(&ws)?;
            output::print_check_output(&validated);
        }
        Command::Build => {
            let ws = open_workspace(&cli)?;
            let today = ws.today()?;
            let report = pipeline::build(&ws, today, &SvgRenderer::new())?;
            output::print_build_output(&report);
        }
        Command::Export => {
            let ws = open_workspace(&cli)?;
            let report = pipeline::export(&ws)?;
            output::print_export_output(&report);
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
        Command::Schema => {
            let schema = export::interchange_schema();
            let text = serde_json::to_string_pretty(&schema).map_err(export::ExportError::from)?;
            println!("{}", text);
        }
    }
    Ok(())
}

/// Resolve the config for the repository the flags point at.
fn open_workspace(cli: &Cli) -> Result<Workspace, PipelineError> {
    let overrides = Overrides {
        timezone: cli.timezone.clone(),
    };
    Workspace::open(&cli.root, cli.config.as_deref(), &overrides)
}
