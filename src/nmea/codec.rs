use bytes::Buf;
use bytes::BufMut;
use bytes::Bytes;
use bytes::BytesMut;

use std::io;

use tokio_util::codec::Decoder;
use tokio_util::codec::Encoder;

use tracing::debug;

/// Frames the raw byte stream of a device into whole lines and frames
/// outgoing sentence bodies as `$<body>*<checksum>` with a CR/LF
/// terminator.
#[derive(Clone, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct LineCodec {}

impl Decoder for LineCodec {
    type Item = Bytes;
    type Error = io::Error;

    fn decode(&mut self, buf: &mut BytesMut) -> Result<Option<Bytes>, io::Error> {
        let at = match buf.iter().position(|b| *b == b'\n') {
            Some(at) => at,
            None => return Ok(None),
        };

        let mut line = buf.split_to(at + 1);
        line.truncate(at);

        if line.chunk().last() == Some(&b'\r') {
            line.truncate(at - 1);
        }

        Ok(Some(line.freeze()))
    }
}

impl Encoder<String> for LineCodec {
    type Error = io::Error;

    fn encode(&mut self, body: String, buf: &mut BytesMut) -> Result<(), io::Error> {
        let checksum = body.bytes().fold(0u8, |c, b| c ^ b);
        let line = format!("${}*{:02X}\r\n", body, checksum);

        debug!("sending serial message: {:?}", line);

        buf.reserve(line.len());
        buf.put(line.as_bytes());

        Ok(())
    }
}
