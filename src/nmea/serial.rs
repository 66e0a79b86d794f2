use crate::configuration::DeviceConfig;
use crate::nmea::Device;
use crate::nmea::LineCodec;

use anyhow::Context;
use anyhow::Result;

use async_trait::async_trait;

use backoff::ExponentialBackoff;
use backoff::SystemClock;

use bytes::Bytes;

use futures_util::SinkExt;
use futures_util::StreamExt;

use std::convert::TryFrom;
use std::io;
use std::time::Duration;
use std::time::Instant;

use tokio::io::AsyncWriteExt;
use tokio::io::ReadHalf;
use tokio::io::WriteHalf;
use tokio::sync::Mutex;

use tokio_serial::SerialPortBuilder;
use tokio_serial::SerialPortBuilderExt;
use tokio_serial::SerialStream;

use tokio_util::codec::FramedRead;
use tokio_util::codec::FramedWrite;

use tracing::debug;
use tracing::error;

/// A line-oriented NMEA device on a serial port.
pub struct SerialDevice {
    id: String,
    name: String,
    reader: Mutex<FramedRead<ReadHalf<SerialStream>, LineCodec>>,
    writer: Mutex<FramedWrite<WriteHalf<SerialStream>, LineCodec>>,
}

impl SerialDevice {
    /// Opens the configured port, retrying until it appears.
    pub async fn open(config: &DeviceConfig) -> Result<Self> {
        let builder = SerialPortBuilder::try_from(config.clone())?;
        let path = config.device.clone();

        let serial = backoff::future::retry(default_backoff(), || async {
            let serial = builder
                .clone()
                .open_native_async()
                .map_err(log_error)
                .with_context(|| format!("Failed to open device {}", path))?;

            debug!("Opened NMEA serial port {}", path);

            Ok(serial)
        })
        .await?;

        let (read_half, write_half) = tokio::io::split(serial);

        Ok(SerialDevice {
            id: config.name.clone(),
            name: config.device.clone(),
            reader: Mutex::new(FramedRead::new(read_half, LineCodec::default())),
            writer: Mutex::new(FramedWrite::new(write_half, LineCodec::default())),
        })
    }

    /// Frames `body` as `$<body>*<checksum>` and sends it to the
    /// device, for message configuration and polling.
    pub async fn send(&self, body: &str) -> io::Result<()> {
        let mut writer = self.writer.lock().await;

        writer.send(body.to_string()).await
    }
}

#[async_trait]
impl Device for SerialDevice {
    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    async fn read_line(&self) -> io::Result<Bytes> {
        let mut reader = self.reader.lock().await;

        match reader.next().await {
            Some(line) => line,
            None => Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "serial port closed",
            )),
        }
    }

    async fn write(&self, bytes: &[u8]) -> io::Result<()> {
        let mut writer = self.writer.lock().await;

        writer.get_mut().write_all(bytes).await?;
        writer.get_mut().flush().await
    }
}

fn default_backoff() -> ExponentialBackoff {
    ExponentialBackoff {
        current_interval: Duration::from_millis(50),
        initial_interval: Duration::from_millis(50),
        randomization_factor: 0.25,
        multiplier: 1.5,
        max_interval: Duration::from_millis(60_000),
        max_elapsed_time: None,
        clock: SystemClock::default(),
        start_time: Instant::now(),
    }
}

fn log_error<T: std::fmt::Display>(e: T) -> T {
    error!("Opening failed: {}", e);

    e
}
