use std::fs::OpenOptions;
use std::sync::Mutex;

use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::EnvFilter;

use cmdline_probe::config::{validate_config, ConfigLoader, LoggingConfig, DEFAULT_CONFIG_FILE};

#[tokio::main]
async fn main() -> Result<()> {
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_CONFIG_FILE.to_string());

    let config = ConfigLoader::new(&config_path)
        .load_or_default()
        .with_context(|| format!("Failed to load configuration from {}", config_path))?;
    validate_config(&config).context("Invalid configuration")?;

    init_logging(&config.logging)?;

    info!("Starting cmdline-probe v{}", env!("CARGO_PKG_VERSION"));

    #[cfg(not(windows))]
    {
        let _ = config;
        anyhow::bail!("cmdline-probe only supports the Windows platform");
    }

    #[cfg(windows)]
    {
        info!("Architecture: {}", std::env::consts::ARCH);
        run(config).await
    }
}

fn init_logging(logging: &LoggingConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&logging.level))
        .context("Invalid log level")?;

    if logging.file.is_empty() {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .init();
    } else {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&logging.file)
            .with_context(|| format!("Failed to open log file {}", logging.file))?;
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_ansi(false)
            .with_writer(Mutex::new(file))
            .init();
    }
    Ok(())
}

#[cfg(windows)]
fn print_record(
    record: &cmdline_probe::ProcessRecord,
    format: cmdline_probe::config::OutputFormat,
) -> Result<()> {
    use cmdline_probe::config::OutputFormat;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string(record)?),
        OutputFormat::Text => println!("{}", record),
    }
    Ok(())
}

#[cfg(windows)]
async fn run(config: cmdline_probe::config::Config) -> Result<()> {
    use cmdline_probe::engine::RecordChannel;
    use cmdline_probe::process::debug_privilege_state;
    use cmdline_probe::{collect_processes, spawn_enumeration, CancellationToken, WindowsPlatform};
    use tracing::warn;

    let platform = WindowsPlatform::from_config(&config.engine);
    let policy = config.engine.privilege_policy();
    let format = config.output.format;
    let token = CancellationToken::new();

    match debug_privilege_state() {
        Ok(state) => info!(
            %state,
            reader = platform.reader_name(),
            "SeDebugPrivilege before elevation"
        ),
        Err(err) => warn!(error = %err, "Could not query SeDebugPrivilege state"),
    }

    if let Some(sort) = config.output.sort_by {
        let watcher = token.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                info!("Interrupt received, cancelling enumeration");
                watcher.cancel();
            }
        });

        let worker = token.clone();
        let records = tokio::task::spawn_blocking(move || {
            collect_processes(&platform, &worker, policy, Some(sort))
        })
        .await??;

        for record in &records {
            print_record(record, format)?;
        }
        info!(count = records.len(), "Enumeration finished");
        return Ok(());
    }

    let RecordChannel { mut records, task } =
        spawn_enumeration(platform, token.clone(), policy, config.engine.channel_capacity);

    loop {
        tokio::select! {
            record = records.recv() => match record {
                Some(record) => print_record(&record, format)?,
                None => break,
            },
            _ = tokio::signal::ctrl_c() => {
                info!("Interrupt received, cancelling enumeration");
                token.cancel();
            }
        }
    }

    let summary = task.await??;
    info!(summary = %serde_json::to_string(&summary)?, "Summary");
    Ok(())
}
