use crate::nmea::Device;

use async_trait::async_trait;

use bytes::Bytes;

use std::io;
use std::path::Path;
use std::time::Duration;

use tokio::fs::File;
use tokio::io::AsyncBufReadExt;
use tokio::io::BufReader;
use tokio::io::Lines;
use tokio::sync::Mutex;
use tokio::time::sleep;

/// Plays a recorded NMEA log back as if it were a live device, one
/// line per read with an optional delay between lines.
///
/// The end of the log surfaces as an I/O error so the registry removes
/// the device the same way it would a broken serial link.
pub struct ReplayDevice {
    id: String,
    name: String,
    delay: Option<Duration>,
    lines: Mutex<Lines<BufReader<File>>>,
}

impl ReplayDevice {
    pub async fn open(id: &str, path: &Path, delay: Option<Duration>) -> io::Result<Self> {
        let file = File::open(path).await?;

        Ok(ReplayDevice {
            id: id.to_string(),
            name: path.display().to_string(),
            delay,
            lines: Mutex::new(BufReader::new(file).lines()),
        })
    }
}

#[async_trait]
impl Device for ReplayDevice {
    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    async fn read_line(&self) -> io::Result<Bytes> {
        if let Some(delay) = self.delay {
            sleep(delay).await;
        }

        let mut lines = self.lines.lock().await;

        match lines.next_line().await? {
            Some(line) => Ok(Bytes::from(line)),
            None => Err(io::Error::new(io::ErrorKind::UnexpectedEof, "replay exhausted")),
        }
    }

    async fn write(&self, _bytes: &[u8]) -> io::Result<()> {
        Ok(())
    }
}
