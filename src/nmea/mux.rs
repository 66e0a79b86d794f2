use crate::metrics;
use crate::nmea::Sentence;
use crate::SentenceReceiver;
use crate::SentenceSender;

use tokio::sync::broadcast;
use tokio::sync::broadcast::error::RecvError;

use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::Stream;
use tokio_stream::StreamExt;

use tracing::debug;

/// Most sentences one stream may buffer before the oldest are dropped.
pub const STREAM_CAPACITY: usize = 100;

/// Fans parsed sentences out to any number of independently-paced
/// streams.
///
/// Publishing never blocks: a stream that falls behind loses its oldest
/// sentences, and with no streams open a sentence is discarded
/// outright.
#[derive(Clone, Debug)]
pub struct Multiplexer {
    tx: SentenceSender,
}

impl Multiplexer {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(STREAM_CAPACITY);

        Multiplexer { tx }
    }

    pub fn publish(&self, sentence: Sentence) {
        metrics::SENTENCES_PUBLISHED.inc();

        let _ = self.tx.send(sentence);
    }

    pub fn open(&self) -> NmeaStream {
        NmeaStream {
            rx: self.tx.subscribe(),
        }
    }
}

impl Default for Multiplexer {
    fn default() -> Self {
        Multiplexer::new()
    }
}

/// One consumer's view of the multiplexer.
///
/// Sentences arrive in publish order, starting from the moment the
/// stream was opened. Dropping the stream deregisters it.
pub struct NmeaStream {
    rx: SentenceReceiver,
}

impl NmeaStream {
    /// The next sentence, or `None` once the multiplexer is gone.
    pub async fn read(&mut self) -> Option<Sentence> {
        loop {
            match self.rx.recv().await {
                Ok(sentence) => return Some(sentence),
                Err(RecvError::Lagged(missed)) => {
                    debug!("stream lagged, {} sentences dropped", missed);
                    metrics::SENTENCES_LAGGED.inc_by(missed);
                }
                Err(RecvError::Closed) => return None,
            }
        }
    }

    pub fn into_stream(self) -> impl Stream<Item = Sentence> {
        BroadcastStream::new(self.rx).filter_map(|result| result.ok())
    }
}
