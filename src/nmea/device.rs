use async_trait::async_trait;

use bytes::Bytes;

use std::io;

/// A registered byte-stream device.
///
/// `read_line` resolves with one whole line, without its terminator.
/// Both operations fail with an I/O error once the underlying
/// connection is broken, which is the registry's signal to drop the
/// device.
#[async_trait]
pub trait Device: Send + Sync {
    fn id(&self) -> &str;

    fn name(&self) -> &str;

    async fn read_line(&self) -> io::Result<Bytes>;

    async fn write(&self, bytes: &[u8]) -> io::Result<()>;
}
