use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use envmon::{
    actors::{messages::Snapshot, monitor::MonitorHandle},
    config::Config,
    sources::DeviceSource,
    util::get_device,
};
use tracing::{info, level_filters::LevelFilter, trace, warn};
use tracing_subscriber::{filter, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Clone, Parser)]
struct Args {
    /// Config file (defaults to ~/.config/envmon/monitor.toml if present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Device address to connect to on startup (overrides config and ENVMON_DEVICE)
    #[arg(short, long)]
    device: Option<String>,

    /// Poll interval in milliseconds (overrides config)
    #[arg(short, long, value_parser = clap::value_parser!(u64).range(1..))]
    interval: Option<u64>,
}

fn init() {
    dotenv::dotenv().ok();

    let filter = filter::Targets::new().with_targets(vec![
        ("envmon", LevelFilter::DEBUG),
        ("monitor", LevelFilter::TRACE),
    ]);
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .compact()
                .with_ansi(false),
        )
        .with(filter)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init();
    let args = Args::parse();
    trace!("started with args: {args:?}");

    let mut config = Config::load(args.config.as_deref())?;
    if let Some(device) = args.device.or_else(get_device) {
        config.device = Some(device);
    }
    if let Some(interval) = args.interval {
        config.poll_interval_ms = interval;
    }
    config.validate()?;

    let source = DeviceSource::new(config.fetch_timeout())?;
    let handle = MonitorHandle::spawn(&config, Arc::new(source));
    let mut updates = handle.subscribe();

    loop {
        tokio::select! {
            changed = updates.changed() => {
                if changed.is_err() {
                    warn!("monitor stopped unexpectedly");
                    break;
                }
                let snapshot = updates.borrow_and_update().clone();
                report(&snapshot);
            }

            _ = tokio::signal::ctrl_c() => {
                info!("shutting down");
                handle.shutdown().await?;
                break;
            }
        }
    }

    Ok(())
}

fn report(snapshot: &Snapshot) {
    let connection = &snapshot.connection;
    let target = connection.target_address.as_deref().unwrap_or("-");

    let Some(reading) = &snapshot.reading else {
        info!("[{}] {target}: waiting for first reading", connection.phase());
        return;
    };

    info!(
        "[{}] {target} #{}: {:.1}°C {:.1}% aq={} nh3={:.1}ppm co2={}ppm dust={:.1}µg/m³ ({} alert(s))",
        connection.phase(),
        snapshot.tick,
        reading.temperature,
        reading.humidity,
        reading.air_quality,
        reading.ammonia,
        reading.co2,
        reading.dust,
        snapshot.alerts.len(),
    );

    for alert in &snapshot.alerts {
        trace!(
            "  {:?} {} [{}] {}",
            alert.severity, alert.metric, alert.id, alert.message
        );
    }
}
