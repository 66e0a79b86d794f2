pub mod configuration;
pub mod connman;
pub mod metrics;
pub mod nmea;

use nmea::Sentence;
use tokio::sync::broadcast;

pub type SentenceReceiver = broadcast::Receiver<Sentence>;
pub type SentenceSender = broadcast::Sender<Sentence>;
