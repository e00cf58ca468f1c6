//! Orgchart CLI
//!
//! Command-line front end for the org chart engine:
//! - `show`: print the reporting tree (optionally zoomed/collapsed)
//! - `check`: report root selection and data-quality anomalies
//! - `explore`: interactive collapse/zoom shell

use anyhow::{anyhow, Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use colored::Colorize;
use orgchart_core::{Anomaly, ChartConfig, OrgChart};
use serde::Serialize;
use std::fs;
use std::io::{self, IsTerminal, Read};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

mod explore;
mod render;

use render::{render_text, TextStyle};

#[derive(Parser)]
#[command(name = "orgchart")]
#[command(author, version, about = "Explore the reporting tree of a flat employee sheet")]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug). Overrides RUST_LOG.
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct SheetArgs {
    /// Employee sheet (.xlsx, .xls, .csv or .json)
    input: PathBuf,
    /// Column mapping / display fields (JSON); defaults apply otherwise
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the reporting tree.
    ///
    /// `--zoom` may be repeated; each one re-roots the tree further, exactly
    /// like clicking "zoom in" repeatedly.
    Show {
        #[command(flatten)]
        sheet: SheetArgs,
        /// Re-root at this employee id (repeatable)
        #[arg(long)]
        zoom: Vec<String>,
        /// Hide the reports of this employee id (repeatable)
        #[arg(long)]
        collapse: Vec<String>,
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
        /// Disable colors even on a terminal
        #[arg(long)]
        no_color: bool,
    },

    /// Report root selection, reachability and data-quality anomalies.
    Check {
        #[command(flatten)]
        sheet: SheetArgs,
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Interactive shell: toggle, zoom, out, reset.
    Explore {
        #[command(flatten)]
        sheet: SheetArgs,
        /// Run commands from a file (`-` for stdin) instead of interactively
        #[arg(long)]
        script: Option<PathBuf>,
        /// Run a single command (repeatable); implies non-interactive
        #[arg(short = 'c', long = "command")]
        commands: Vec<String>,
        /// Keep going after a failing script line
        #[arg(long)]
        continue_on_error: bool,
        /// Do not echo script commands
        #[arg(long)]
        quiet: bool,
        /// Do not print the tree after every change
        #[arg(long)]
        no_echo: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Show {
            sheet,
            zoom,
            collapse,
            format,
            no_color,
        } => cmd_show(&sheet, &zoom, &collapse, format, no_color),
        Commands::Check { sheet, format } => cmd_check(&sheet, format),
        Commands::Explore {
            sheet,
            script,
            commands,
            continue_on_error,
            quiet,
            no_echo,
        } => {
            let (chart, title) = load_chart(&sheet)?;
            let mut state = explore::ExploreState {
                chart,
                title,
                style: TextStyle {
                    color: io::stdout().is_terminal(),
                },
                echo_tree: !no_echo,
            };
            if script.is_none() && commands.is_empty() {
                return explore::cmd_explore(&mut state);
            }

            let mut lines = Vec::new();
            if let Some(path) = script {
                lines.extend(read_script(&path)?.lines().map(str::to_string));
            }
            lines.extend(commands);
            explore::cmd_explore_script(&mut state, &lines, continue_on_error, quiet)
        }
    }
}

fn init_tracing(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        _ => EnvFilter::new("debug"),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn load_config(path: Option<&Path>) -> Result<ChartConfig> {
    let Some(path) = path else {
        return Ok(ChartConfig::default());
    };
    let text = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parsing config {}", path.display()))
}

fn load_chart(sheet: &SheetArgs) -> Result<(OrgChart, String)> {
    let config = load_config(sheet.config.as_deref())?;
    let rows = orgchart_ingest::load_rows(&sheet.input)?;
    let title = orgchart_ingest::chart_title(&sheet.input);
    Ok((OrgChart::from_rows(&rows, config), title))
}

fn read_script(path: &Path) -> Result<String> {
    if path.as_os_str() == "-" {
        let mut buf = String::new();
        io::stdin().read_to_string(&mut buf)?;
        Ok(buf)
    } else {
        fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))
    }
}

fn warn_anomalies(anomalies: &[Anomaly]) {
    for anomaly in anomalies {
        eprintln!("{} {anomaly}", "warning:".yellow().bold());
    }
}

fn cmd_show(
    sheet: &SheetArgs,
    zoom: &[String],
    collapse: &[String],
    format: OutputFormat,
    no_color: bool,
) -> Result<()> {
    let (mut chart, _title) = load_chart(sheet)?;

    for id in zoom {
        if !chart.records().contains(id) {
            return Err(anyhow!("cannot zoom: no employee with id `{id}`"));
        }
        if !chart.zoom_in(id) {
            tracing::info!(id = %id, "already the displayed root");
        }
    }
    for id in collapse {
        if !chart.toggle_collapse(id) {
            eprintln!(
                "{} `{id}` has no direct reports; nothing to collapse",
                "note:".cyan().bold()
            );
        }
    }

    let tree = chart.tree()?;
    match format {
        OutputFormat::Text => {
            warn_anomalies(&tree.anomalies);
            let style = TextStyle {
                color: !no_color && io::stdout().is_terminal(),
            };
            print!("{}", render_text(&tree.root, chart.config(), style));
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&tree.root)?);
        }
    }
    Ok(())
}

#[derive(Debug, Serialize)]
struct CheckReport<'a> {
    title: String,
    records: usize,
    root_candidates: Vec<&'a str>,
    root: Option<String>,
    reachable: usize,
    unreachable: usize,
    anomalies: Vec<Anomaly>,
}

fn cmd_check(sheet: &SheetArgs, format: OutputFormat) -> Result<()> {
    let (chart, title) = load_chart(sheet)?;
    let records = chart.records();

    let built = chart.tree();
    let (root, reachable, anomalies) = match &built {
        Ok(tree) => (Some(tree.root.id.clone()), tree.root.len(), tree.anomalies.clone()),
        Err(_) => (None, 0, records.anomalies().to_vec()),
    };
    let unique_ids = records.records().len() - duplicate_extra_rows(records.anomalies());

    let report = CheckReport {
        title,
        records: records.len(),
        root_candidates: records.root_candidates(),
        root,
        reachable,
        unreachable: unique_ids.saturating_sub(reachable),
        anomalies,
    };

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        OutputFormat::Text => {
            println!("{}", report.title.bold());
            println!("  records:     {}", report.records);
            println!(
                "  root:        {}",
                report.root.as_deref().unwrap_or("(none)")
            );
            println!("  reachable:   {}", report.reachable);
            println!("  unreachable: {}", report.unreachable);
            if report.anomalies.is_empty() {
                println!("  {}", "no anomalies".green());
            }
            for anomaly in &report.anomalies {
                println!("  {} {anomaly}", "warning:".yellow().bold());
            }
        }
    }

    built.map(|_| ()).map_err(Into::into)
}

/// Rows shadowed by a later row with the same id.
fn duplicate_extra_rows(anomalies: &[Anomaly]) -> usize {
    anomalies
        .iter()
        .map(|a| match a {
            Anomaly::DuplicateIdentifier { occurrences, .. } => occurrences - 1,
            _ => 0,
        })
        .sum()
}
