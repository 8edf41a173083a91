use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use coulage::{
    BaseOptions, Config, IngestMode, PageData, assembler_from_config, pages_from_records,
    preview_markup,
};
use std::path::{Path, PathBuf};

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

/// Pour authorization slips from construction schedules.
#[derive(Parser)]
#[command(name = "coulage", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Check a schedule and print its rows as JSON.
    Preview {
        schedule: PathBuf,
        /// Read an older schedule without a header row.
        #[arg(long)]
        legacy: bool,
    },
    /// Print one slip per schedule row into a single PDF.
    Generate {
        schedule: PathBuf,
        /// JSON file with the fields shared by every slip.
        #[arg(long)]
        base: Option<PathBuf>,
        #[arg(long)]
        legacy: bool,
        #[arg(short, long)]
        output: PathBuf,
    },
    /// Print a single slip from a JSON request.
    Single {
        request: PathBuf,
        #[arg(short, long)]
        output: PathBuf,
    },
    /// Print the markup of a single slip to stdout.
    Html { request: PathBuf },
}

fn mode(legacy: bool) -> IngestMode {
    if legacy {
        IngestMode::ContentAnchored
    } else {
        IngestMode::HeaderAnchored
    }
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> anyhow::Result<T> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("Invalid JSON in {}", path.display()))
}

fn read_request(path: &Path, default_city: &str) -> anyhow::Result<PageData> {
    let mut page: PageData = read_json(path)?;
    page.apply_base(&BaseOptions {
        city: Some(default_city.to_string()),
        ..Default::default()
    });
    let missing = page.missing_fields();
    if !missing.is_empty() {
        bail!("Validation failed: {} required", missing.join(", "));
    }
    Ok(page)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let config = Config::load().context("Failed to load configuration")?;

    match cli.command {
        Command::Preview { schedule, legacy } => {
            let bytes = std::fs::read(&schedule)?;
            let output = if legacy {
                serde_json::to_string_pretty(&coulage_ingest::parse(&bytes, mode(true))?)?
            } else {
                let report = coulage::validate(&bytes);
                if !report.valid {
                    bail!("Invalid Excel file: {}", report.error.unwrap_or_default());
                }
                serde_json::to_string_pretty(&report)?
            };
            println!("{output}");
        }
        Command::Generate {
            schedule,
            base,
            legacy,
            output,
        } => {
            let bytes = std::fs::read(&schedule)?;
            let records = coulage_ingest::parse(&bytes, mode(legacy))?;
            if records.is_empty() {
                bail!("No valid data found in {}", schedule.display());
            }
            let base: BaseOptions = match base {
                Some(path) => read_json(&path)?,
                None => BaseOptions::default(),
            };
            let pages = pages_from_records(&records, &base, &config.defaults.city);
            let assembler = assembler_from_config(&config)?;
            let pdf = assembler.render_many(&pages, &base).await?;
            std::fs::write(&output, pdf)?;
            log::info!("Wrote {} slips to {}", pages.len(), output.display());
        }
        Command::Single { request, output } => {
            let page = read_request(&request, &config.defaults.city)?;
            let assembler = assembler_from_config(&config)?;
            let pdf = assembler.render_single(&page).await?;
            std::fs::write(&output, pdf)?;
            log::info!("Wrote slip to {}", output.display());
        }
        Command::Html { request } => {
            let page = read_request(&request, &config.defaults.city)?;
            println!("{}", preview_markup(&page)?);
        }
    }

    Ok(())
}
