//! rollsheet CLI - Monthly attendance sheet generator
//!
//! Builds a one-sheet Excel workbook with one column per working day of a
//! month and one row per employee, every cell marked present.
//!
//! Running without a subcommand is the same as `rollsheet generate`.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use chrono::{NaiveDate, Weekday};
use clap::{Args, Parser, Subcommand, ValueEnum};
use rollsheet_core::{date_labels, load_roster, AttendanceSheet, Renderer, SheetConfig};
use rollsheet_render::{write_atomic, write_workbook, ExcelRenderer, TextRenderer};
use tracing::{debug, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Config file picked up from the working directory when `--config` is absent
const CONFIG_FILE_NAME: &str = "rollsheet.toml";

#[derive(Parser)]
#[command(name = "rollsheet")]
#[command(author, version, about = "Monthly attendance sheet generator", long_about = None)]
#[command(args_conflicts_with_subcommands = true)]
struct Cli {
    /// Verbose output (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    generate: GenerateArgs,
}

#[derive(Subcommand)]
enum Commands {
    /// Write the attendance workbook
    Generate(GenerateArgs),

    /// List the dates that get a column
    Dates {
        #[command(flatten)]
        sheet: SheetArgs,
    },

    /// Print the sheet without writing a file
    Preview {
        #[command(flatten)]
        sheet: SheetArgs,

        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        format: PreviewFormat,
    },

    /// Write a sample rollsheet.toml
    Init {
        /// Directory to create the file in
        #[arg(short, long, default_value = ".")]
        output: PathBuf,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum PreviewFormat {
    Text,
    Json,
}

#[derive(Args)]
struct GenerateArgs {
    #[command(flatten)]
    sheet: SheetArgs,

    /// Output file (default: attendance_<month>_<year>.xlsx)
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Skip header styling, frozen panes and column sizing
    #[arg(long)]
    plain: bool,
}

/// Options shared by every command that builds a sheet
#[derive(Args)]
struct SheetArgs {
    /// Config file (TOML)
    #[arg(short, long, env = "ROLLSHEET_CONFIG", value_name = "FILE")]
    config: Option<PathBuf>,

    /// Roster file (.json or .toml), replaces the configured employees
    #[arg(long, value_name = "FILE")]
    roster: Option<PathBuf>,

    /// Target year
    #[arg(long)]
    year: Option<i32>,

    /// Target month (1-12)
    #[arg(long)]
    month: Option<u32>,

    /// Worksheet name
    #[arg(long)]
    title: Option<String>,

    /// Working weekdays, comma separated (e.g. mon,tue,wed,thu,fri,sat)
    #[arg(long, value_delimiter = ',', value_name = "DAYS")]
    working_days: Vec<Weekday>,

    /// Date to leave out (repeatable)
    #[arg(long = "holiday", value_name = "YYYY-MM-DD")]
    holidays: Vec<NaiveDate>,
}

impl SheetArgs {
    /// Defaults, then the config file, then command-line flags
    fn resolve(&self) -> Result<SheetConfig> {
        let config_path = self.config.clone().or_else(|| {
            let local = PathBuf::from(CONFIG_FILE_NAME);
            local.is_file().then_some(local)
        });

        let mut config = match &config_path {
            Some(path) => {
                debug!(path = %path.display(), "loading config");
                SheetConfig::load(path)
                    .with_context(|| format!("Failed to load config {}", path.display()))?
            }
            None => SheetConfig::default(),
        };

        if let Some(path) = &self.roster {
            config.employees = load_roster(path)
                .with_context(|| format!("Failed to load roster {}", path.display()))?;
            debug!(employees = config.employees.len(), "loaded roster");
        }
        if let Some(year) = self.year {
            config.year = year;
        }
        if let Some(month) = self.month {
            config.month = month;
        }
        if let Some(title) = &self.title {
            config.sheet_title = Some(title.clone());
        }
        if !self.working_days.is_empty() {
            config.working_days = self.working_days.clone();
        }
        config.holidays.extend(self.holidays.iter().copied());

        Ok(config)
    }

    fn build(&self) -> Result<(SheetConfig, AttendanceSheet)> {
        let config = self.resolve()?;
        let sheet = AttendanceSheet::build(&config).context("Invalid configuration")?;
        Ok((config, sheet))
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Some(Commands::Generate(args)) => cmd_generate(&args),
        Some(Commands::Dates { sheet }) => cmd_dates(&sheet),
        Some(Commands::Preview { sheet, format }) => cmd_preview(&sheet, format),
        Some(Commands::Init { output }) => cmd_init(&output),
        None => cmd_generate(&cli.generate),
    }
}

/// Log to stderr so stdout carries only command output
fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .with(filter)
        .init();
}

fn cmd_generate(args: &GenerateArgs) -> Result<()> {
    let (config, sheet) = args.sheet.build()?;
    let path = args
        .output
        .clone()
        .unwrap_or_else(|| config.output_path_for(sheet.period));

    let renderer = if args.plain {
        ExcelRenderer::new().plain()
    } else {
        ExcelRenderer::new()
    };

    info!(
        path = %path.display(),
        employees = sheet.rows.len(),
        dates = sheet.dates().len(),
        "generating attendance sheet"
    );
    write_workbook(&path, &sheet, &renderer)
        .with_context(|| format!("Failed to write {}", path.display()))?;

    println!(
        "Attendance file for {} created successfully.",
        sheet.period.label()
    );
    Ok(())
}

fn cmd_dates(args: &SheetArgs) -> Result<()> {
    let (_, sheet) = args.build()?;
    for label in date_labels(sheet.dates()) {
        println!("{label}");
    }
    Ok(())
}

fn cmd_preview(args: &SheetArgs, format: PreviewFormat) -> Result<()> {
    let (_, sheet) = args.build()?;
    match format {
        PreviewFormat::Text => print!("{}", TextRenderer::new().render(&sheet)?),
        PreviewFormat::Json => println!("{}", serde_json::to_string_pretty(&sheet)?),
    }
    Ok(())
}

fn cmd_init(dir: &Path) -> Result<()> {
    let path = dir.join(CONFIG_FILE_NAME);
    if path.exists() {
        bail!("{} already exists", path.display());
    }

    write_atomic(&path, SheetConfig::sample_toml().as_bytes())
        .with_context(|| format!("Failed to create {}", path.display()))?;

    println!("Created: {}", path.display());
    Ok(())
}
