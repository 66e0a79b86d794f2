use anyhow::Context;
use anyhow::Result;

use lazy_static::lazy_static;

use prometheus::register_int_counter;
use prometheus::register_int_gauge;
use prometheus::IntCounter;
use prometheus::IntGauge;

use prometheus_hyper::Server;

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::sync::Notify;

use tracing::info;

lazy_static! {
    pub static ref DEVICES: IntGauge = register_int_gauge!(
        "pilothouse_devices",
        "Devices currently registered"
    )
    .unwrap();
    pub static ref DEVICE_ERRORS: IntCounter = register_int_counter!(
        "pilothouse_device_errors_total",
        "Device reads that failed and removed the device"
    )
    .unwrap();
    pub static ref SENTENCES_PUBLISHED: IntCounter = register_int_counter!(
        "pilothouse_sentences_published_total",
        "Sentences published to open streams"
    )
    .unwrap();
    pub static ref SENTENCES_DISCARDED: IntCounter = register_int_counter!(
        "pilothouse_sentences_discarded_total",
        "Sentences dropped for failing validation"
    )
    .unwrap();
    pub static ref SENTENCES_LAGGED: IntCounter = register_int_counter!(
        "pilothouse_sentences_lagged_total",
        "Sentences lost to streams that fell behind"
    )
    .unwrap();
}

pub struct Exporter {
    bind_address: SocketAddr,
    shutdown: Arc<Notify>,
}

impl Exporter {
    pub fn new(bind_address: String) -> Result<Self> {
        let bind_address: SocketAddr = bind_address
            .parse()
            .with_context(|| format!("Can't parse metrics listen address {}", bind_address))?;

        let shutdown = Arc::new(Notify::new());

        Ok(Exporter {
            bind_address,
            shutdown,
        })
    }

    async fn run(&self) {
        info!("Starting prometheus server on {}", self.bind_address);

        let _ = Server::run(
            Arc::new(prometheus::default_registry().clone()),
            self.bind_address,
            self.shutdown.notified(),
        )
        .await;
    }

    pub async fn start(self) {
        tokio::spawn(async move {
            self.run().await;
        });
    }
}
