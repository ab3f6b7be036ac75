//! CLI command definitions, routing, and tracing setup.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Result, WrapErr};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;
use vitae_core::aggregate;
use vitae_core::catalog::{Catalog, ProgressReporter, RecordSummary};
use vitae_core::export::{ExportOptions, export_catalog};
use vitae_shared::{
    ContentKind, VitaeConfig, init_config, init_config_at, load_config, load_config_from,
};

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// Vitae: build the data behind an academic portfolio site.
#[derive(Parser)]
#[command(
    name = "vitae",
    version,
    about = "Validate, sort, and export academic portfolio content.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Path to vitae.toml (defaults to ./vitae.toml, then ~/.vitae/vitae.toml).
    #[arg(long, global = true, env = "VITAE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Content root, overriding `content.root` from the config.
    #[arg(long, global = true)]
    pub content: Option<PathBuf>,

    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Top-level CLI subcommands.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// Load every content kind and report authoring errors.
    Check,

    /// Print one collection, most recent first.
    List {
        /// Content kind, e.g. `publications` or `grants`.
        kind: ContentKind,

        /// Group the listing by year.
        #[arg(long)]
        by_year: bool,

        /// Show at most this many records.
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Write the JSON hand-off for the site templates.
    Export {
        /// Output directory (defaults to `export.out_dir`).
        #[arg(short, long)]
        out: Option<PathBuf>,

        /// Write compact JSON.
        #[arg(long)]
        compact: bool,
    },

    /// Configuration management.
    Config {
        /// Config subcommand.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config subcommands.
#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Initialize config file with defaults.
    Init {
        /// Where to write the file (defaults to ~/.vitae/vitae.toml).
        #[arg(long)]
        path: Option<PathBuf>,
    },
    /// Show resolved configuration.
    Show,
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "vitae=info",
        1 => "vitae=debug",
        _ => "vitae=trace",
    };

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .with_writer(std::io::stderr)
                .init();
        }
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) fn run(cli: Cli) -> Result<()> {
    let config = resolve_config(&cli)?;

    match cli.command {
        Command::Check => cmd_check(&config),
        Command::List {
            kind,
            by_year,
            limit,
        } => cmd_list(&config, kind, by_year, limit),
        Command::Export { out, compact } => cmd_export(&config, out, compact),
        Command::Config { action } => match action {
            ConfigAction::Init { path } => cmd_config_init(path),
            ConfigAction::Show => cmd_config_show(&config),
        },
    }
}

/// Load the config file and apply flag overrides.
fn resolve_config(cli: &Cli) -> Result<VitaeConfig> {
    let mut config = match &cli.config {
        Some(path) => load_config_from(path)
            .wrap_err_with(|| format!("cannot load config '{}'", path.display()))?,
        None => load_config()?,
    };
    if let Some(root) = &cli.content {
        config.content.root = root.clone();
    }
    Ok(config)
}

// ---------------------------------------------------------------------------
// CLI progress reporter
// ---------------------------------------------------------------------------

/// CLI progress reporter using an indicatif spinner.
struct CliProgress {
    spinner: ProgressBar,
}

impl CliProgress {
    fn new() -> Self {
        let spinner = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::with_template("{spinner:.cyan} {msg}") {
            spinner.set_style(
                style.tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
            );
        }
        spinner.enable_steady_tick(std::time::Duration::from_millis(80));
        Self { spinner }
    }

    fn finish(&self) {
        self.spinner.finish_and_clear();
    }
}

impl ProgressReporter for CliProgress {
    fn kind_started(&self, kind: ContentKind) {
        self.spinner.set_message(format!("Loading {kind}"));
    }

    fn kind_loaded(&self, kind: ContentKind, records: usize) {
        self.spinner.set_message(format!("Loaded {records} {kind}"));
    }

    fn done(&self, _catalog: &Catalog) {
        self.spinner.finish_and_clear();
    }
}

/// Build the catalog behind a spinner.
fn build_catalog(config: &VitaeConfig) -> Result<Catalog> {
    info!(root = %config.content.root.display(), "building catalog");
    let progress = CliProgress::new();
    let result = Catalog::build(config, &progress);
    progress.finish();
    Ok(result?)
}

// ---------------------------------------------------------------------------
// Command handlers
// ---------------------------------------------------------------------------

fn cmd_check(config: &VitaeConfig) -> Result<()> {
    let catalog = build_catalog(config)?;

    println!();
    for (kind, count) in catalog.summary() {
        println!("  {:<22} {count:>4}", kind.dir_name());
    }
    println!("  {:<22} {:>4}", "total", catalog.total());
    println!();
    println!("  All content is valid.");
    println!();

    Ok(())
}

fn cmd_list(
    config: &VitaeConfig,
    kind: ContentKind,
    by_year: bool,
    limit: Option<usize>,
) -> Result<()> {
    let catalog = build_catalog(config)?;
    let mut records = catalog.collection(kind).summaries();
    if let Some(n) = limit {
        records.truncate(n);
    }

    if records.is_empty() {
        println!("No {} found.", kind.dir_name());
        return Ok(());
    }

    if by_year {
        let groups = aggregate::group_by_year(&records);
        for (year, bucket) in groups.years_desc() {
            println!("{year}");
            print_records(bucket, "  ");
        }
        if !groups.undated().is_empty() {
            println!("undated");
            print_records(groups.undated(), "  ");
        }
    } else {
        print_records(&records, "");
    }

    Ok(())
}

fn print_records(records: &[RecordSummary], indent: &str) {
    for r in records {
        println!("{indent}{:<24} {:<26} {}", r.id, r.date.to_string(), r.title);
    }
}

fn cmd_export(config: &VitaeConfig, out: Option<PathBuf>, compact: bool) -> Result<()> {
    let catalog = build_catalog(config)?;

    let opts = ExportOptions {
        out_dir: out.unwrap_or_else(|| config.export.out_dir.clone()),
        pretty: config.export.pretty && !compact,
        tool_version: env!("CARGO_PKG_VERSION").to_string(),
    };

    let manifest = export_catalog(&catalog, &opts)
        .wrap_err_with(|| format!("export to '{}' failed", opts.out_dir.display()))?;

    println!();
    println!("  Export complete!");
    println!("  Files:   {}", manifest.files.len());
    println!("  Records: {}", manifest.total_records);
    println!("  Path:    {}", opts.out_dir.display());
    println!();

    Ok(())
}

fn cmd_config_init(path: Option<PathBuf>) -> Result<()> {
    let path = match path {
        Some(p) => init_config_at(&p)?,
        None => init_config()?,
    };
    println!("Config initialized at: {}", path.display());
    Ok(())
}

fn cmd_config_show(config: &VitaeConfig) -> Result<()> {
    let toml_str = toml::to_string_pretty(config)?;
    println!("{toml_str}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_list_with_kind_and_flags() {
        let cli = Cli::try_parse_from(["vitae", "list", "grants", "--by-year", "-l", "3"])
            .expect("parse");
        match cli.command {
            Command::List {
                kind,
                by_year,
                limit,
            } => {
                assert_eq!(kind, ContentKind::Grant);
                assert!(by_year);
                assert_eq!(limit, Some(3));
            }
            _ => panic!("expected list"),
        }
    }

    #[test]
    fn rejects_unknown_kind() {
        assert!(Cli::try_parse_from(["vitae", "list", "posters"]).is_err());
    }

    #[test]
    fn global_flags_parse_after_subcommand() {
        let cli = Cli::try_parse_from(["vitae", "check", "--content", "site/content", "-vv"])
            .expect("parse");
        assert_eq!(cli.content, Some(PathBuf::from("site/content")));
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn content_flag_overrides_config_root() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("vitae.toml");
        init_config_at(&path).expect("init");

        let cli = Cli::try_parse_from([
            "vitae",
            "--config",
            path.to_str().expect("utf-8 path"),
            "--content",
            "elsewhere",
            "check",
        ])
        .expect("parse");
        let config = resolve_config(&cli).expect("resolve");
        assert_eq!(config.content.root, PathBuf::from("elsewhere"));
    }
}
