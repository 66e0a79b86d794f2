mod codec;
mod device;
mod mux;
mod registry;
mod replay;
mod sentence;
mod serial;

pub use codec::LineCodec;
pub use device::Device;
pub use mux::Multiplexer;
pub use mux::NmeaStream;
pub use mux::STREAM_CAPACITY;
pub use registry::DeviceRegistry;
pub use replay::ReplayDevice;
pub use sentence::checksum;
pub use sentence::format;
pub use sentence::is_valid;
pub use sentence::parse;
pub use sentence::Sentence;
pub use sentence::SentenceError;
pub use serial::SerialDevice;

#[cfg(test)]
mod test_codec;

#[cfg(test)]
mod test_mux;

#[cfg(test)]
mod test_registry;

#[cfg(test)]
mod test_sentence;
