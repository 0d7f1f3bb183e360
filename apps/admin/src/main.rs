use clap::Parser;
use marquee_catalog_client::CatalogClient;
use marquee_core::{ActivityLog, Severity};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod cli;
mod commands;
mod config;
mod error;

use cli::Cli;
use commands::Context;
use config::Config;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // Load environment variables before the filter reads RUST_LOG
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "marquee_admin=info,marquee_core=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = Config::load(cli.api_url.as_deref())?;

    tracing::info!(
        catalog = %config.catalog().url,
        environment = %config.environment(),
        command = cli.command.name(),
        "Starting Marquee admin"
    );

    let client = CatalogClient::new(config.catalog())?
        .with_retry_config(config.retry_attempts, config.retry_delay_ms);
    let log = ActivityLog::new(config.import().activity_log_capacity);
    let ctx = Context::new(client, log, &config);

    spawn_interrupt_listener(ctx.interrupt.clone());

    let command_name = cli.command.name();
    let result = commands::run(cli.command, &ctx).await;
    ctx.orchestrator.shutdown().await;

    if config.print_activity {
        print_activity(ctx.log());
    }

    if let Err(e) = result {
        e.log(command_name);
        eprintln!("error: {}", e);
        std::process::exit(e.exit_code());
    }
    Ok(())
}

fn spawn_interrupt_listener(interrupt: CancellationToken) {
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                tracing::info!("Interrupted, stopping status updates");
                interrupt.cancel();
            }
            Err(e) => tracing::warn!(error = %e, "Ctrl-C handler unavailable"),
        }
    });
}

fn print_activity(log: &ActivityLog) {
    let entries = log.entries();
    if entries.is_empty() {
        return;
    }

    println!();
    println!("Activity:");
    for entry in entries {
        let tag = match entry.severity {
            Severity::Info => "info",
            Severity::Success => " ok ",
            Severity::Error => "fail",
        };
        println!("  {} [{}] {}", entry.display_time(), tag, entry.message);
    }
}
