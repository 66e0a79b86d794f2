use anyhow::Result;

use clap::Parser;

use std::path::PathBuf;
use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;

use tokio::runtime;
use tokio::time::sleep;

use tracing::debug;
use tracing::error;
use tracing::info;
use tracing::warn;
use tracing::Level;

use tracing_subscriber::filter::EnvFilter;

use pilothouse::configuration::Configuration;
use pilothouse::configuration::DeviceConfig;
use pilothouse::configuration::NetworkConfig;
use pilothouse::connman::Manager;
use pilothouse::connman::ZbusConnman;
use pilothouse::metrics::Exporter;
use pilothouse::nmea::DeviceRegistry;
use pilothouse::nmea::SerialDevice;

/// Device and network daemon for the pilothouse shell
#[derive(Parser)]
struct Args {
    /// configuration file
    config: PathBuf,
}

fn main() {
    let runtime = runtime::Builder::new_multi_thread()
        .thread_name_fn(|| {
            static ATOMIC_ID: AtomicUsize = AtomicUsize::new(0);
            let id = ATOMIC_ID.fetch_add(1, Ordering::SeqCst);
            format!("pilothouse-{}", id)
        })
        .enable_all()
        .build()
        .unwrap();

    runtime.block_on(run());
}

async fn run() {
    let args = Args::parse();

    let config = match Configuration::load(&args.config) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("failed to load configuration file: {:?}", e);
            std::process::exit(1);
        }
    };

    start_tracing(&config);

    if let Some(metrics) = &config.metrics {
        match Exporter::new(metrics.bind_address.clone()) {
            Ok(exporter) => exporter.start().await,
            Err(e) => {
                error!("{:?}", e);
                std::process::exit(1);
            }
        }
    }

    let registry = DeviceRegistry::new();

    for device_config in config.device.iter() {
        tokio::spawn(supervise_device(registry.clone(), device_config.clone()));

        info!("supervising device {}", device_config.name);
    }

    if let Some(network) = &config.network {
        if let Err(e) = start_network(network.clone()).await {
            error!("network manager unavailable: {}", e);
            std::process::exit(1);
        }
    }

    tokio::signal::ctrl_c().await.unwrap_or(());

    registry.shutdown();
}

fn start_tracing(config: &Configuration) {
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(Level::TRACE)
        .finish();

    let filter = tracing::subscriber::with_default(subscriber, || {
        match EnvFilter::try_from(config.clone()) {
            Ok(f) => f,
            Err(e) => {
                match &config.log_filter {
                    Some(f) => error!("invalid log_filter \"{}\": {:?}", f, e),
                    None => unreachable!(),
                };

                std::process::exit(1);
            }
        }
    });

    let subscriber = tracing_subscriber::fmt().with_env_filter(filter).finish();

    tracing::subscriber::set_global_default(subscriber).expect("no global subscriber has been set");
}

/// Keeps one configured serial device registered: opens the port, waits
/// for its reader to end, reopens.
async fn supervise_device(registry: DeviceRegistry, config: DeviceConfig) {
    loop {
        let device = match SerialDevice::open(&config).await {
            Ok(d) => Arc::new(d),
            Err(e) => {
                error!("giving up on device {}: {:?}", config.name, e);
                return;
            }
        };

        match registry.register(device) {
            Some(reader) => {
                let _ = reader.await;
            }
            None => return,
        }

        info!("device {} disconnected, reopening", config.name);
    }
}

async fn start_network(config: NetworkConfig) -> Result<()> {
    let backend = Arc::new(ZbusConnman::system().await?);
    let manager = Manager::new(backend);

    tokio::spawn(async move {
        loop {
            match manager.setup().await {
                Ok(()) => break,
                Err(e) => {
                    error!("connman setup failed, retrying: {}", e);
                    sleep(Duration::from_secs(5)).await;
                }
            }
        }

        if let Some(interval) = config.scan_interval {
            loop {
                sleep(Duration::from_secs(interval)).await;

                match manager.scan_all().await {
                    Ok(count) => debug!("scanned {} wifi technologies", count),
                    Err(e) => warn!("wifi scan failed: {}", e),
                }
            }
        }
    });

    Ok(())
}
