use anyhow::Context;
use clap::{Parser, ValueEnum};
use raspisanie::render::render_schedule;
use raspisanie::{get_provider, Config, HttpFetcher, ScheduleData, ScheduleError, ScheduleProvider};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Json,
    Text,
}

#[derive(Debug, Parser)]
#[command(name = "raspisanie")]
#[command(about = "Парсер расписания с dnevuch.ru и togudv.ru")]
struct Cli {
    /// Source id or university name, e.g. togu, pskovgu, ТОГУ
    #[arg(long, default_value = "togu")]
    slug: String,

    /// Group name as shown on the site
    #[arg(long)]
    group: Option<String>,

    /// Print the available groups and exit
    #[arg(long)]
    list_groups: bool,

    /// File the schedule is saved to
    #[arg(long, default_value = "schedule.json")]
    output: PathBuf,

    #[arg(long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// JSON configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(long, help = "Enable verbose output")]
    verbose: bool,
}

fn init_logger(verbose: bool) {
    let filter = if verbose {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("raspisanie=debug"))
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("raspisanie=info"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .compact(),
        )
        .init();
}

fn write_output(path: &Path, data: &ScheduleData, format: OutputFormat) -> anyhow::Result<()> {
    let contents = match format {
        OutputFormat::Json => {
            serde_json::to_string_pretty(data).context("Failed to serialize schedule")?
        }
        OutputFormat::Text => render_schedule(data),
    };
    std::fs::write(path, contents)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}

/// Prints `e` for the user and maps it to the process exit code.
fn report(e: &ScheduleError) -> ExitCode {
    if e.is_format_drift() {
        warn!("The source page layout may have changed");
    }
    eprintln!("Ошибка: {e}");
    ExitCode::from(e.exit_code() as u8)
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logger(cli.verbose);

    let config = match &cli.config {
        Some(path) => match Config::load_from_file(path) {
            Ok(config) => config,
            Err(e) => return report(&e),
        },
        None => Config::default(),
    };

    let fetcher = match HttpFetcher::with_config(&config.fetcher) {
        Ok(fetcher) => Arc::new(fetcher),
        Err(e) => return report(&e),
    };

    let provider = match get_provider(&cli.slug, fetcher, &config.sources) {
        Ok(provider) => provider,
        Err(e) => return report(&e),
    };

    if cli.list_groups {
        return match provider.list_groups().await {
            Ok(groups) => {
                for group in groups {
                    println!("{group}");
                }
                ExitCode::SUCCESS
            }
            Err(e) => {
                error!(error = %e, slug = provider.slug(), "Listing groups failed");
                report(&e)
            }
        };
    }

    let Some(group) = cli.group.as_deref() else {
        println!("Укажите группу (--group) или используйте --list-groups");
        return ExitCode::FAILURE;
    };

    let schedule = match provider.get_schedule(group).await {
        Ok(schedule) => schedule,
        Err(e) => {
            error!(error = %e, slug = provider.slug(), group = %group, "Fetching schedule failed");
            return report(&e);
        }
    };

    if let Some(resolved) = schedule.group().filter(|resolved| *resolved != group) {
        eprintln!("Использую ближайшее совпадение группы: {resolved}");
    }

    if let Err(e) = write_output(&cli.output, &schedule, cli.format) {
        eprintln!("Ошибка: {e:#}");
        return ExitCode::FAILURE;
    }

    info!(path = %cli.output.display(), "Schedule saved");
    println!("Расписание сохранено в {}", cli.output.display());
    ExitCode::SUCCESS
}
