use crate::metrics;
use crate::nmea::parse;
use crate::nmea::Device;
use crate::nmea::Multiplexer;
use crate::nmea::NmeaStream;

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::Mutex;

use tokio::task::AbortHandle;
use tokio::task::JoinHandle;

use tracing::debug;
use tracing::error;
use tracing::info;

/// The set of currently connected devices, each with its own reader
/// loop feeding the sentence multiplexer.
#[derive(Clone)]
pub struct DeviceRegistry {
    inner: Arc<Mutex<Inner>>,
    mux: Multiplexer,
}

#[derive(Default)]
struct Inner {
    devices: HashMap<String, Arc<dyn Device>>,
    readers: HashMap<String, AbortHandle>,
}

impl DeviceRegistry {
    pub fn new() -> Self {
        DeviceRegistry {
            inner: Arc::new(Mutex::new(Inner::default())),
            mux: Multiplexer::new(),
        }
    }

    /// Stores the device and starts its reader loop. Registering an id
    /// that is already present is a no-op and returns `None`.
    ///
    /// The returned handle completes when the reader loop ends, which
    /// is also the moment the device leaves the registry.
    pub fn register(&self, device: Arc<dyn Device>) -> Option<JoinHandle<()>> {
        let id = device.id().to_string();

        let mut inner = self.inner.lock().unwrap();

        if inner.devices.contains_key(&id) {
            debug!("device {} already registered", id);
            return None;
        }

        let reader = tokio::spawn(read_device(Arc::clone(&device), self.clone()));

        inner.readers.insert(id.clone(), reader.abort_handle());
        inner.devices.insert(id.clone(), device);

        metrics::DEVICES.inc();
        info!("registered device {}", id);

        Some(reader)
    }

    pub fn list(&self) -> Vec<Arc<dyn Device>> {
        self.inner.lock().unwrap().devices.values().cloned().collect()
    }

    pub fn get(&self, id: &str) -> Option<Arc<dyn Device>> {
        self.inner.lock().unwrap().devices.get(id).cloned()
    }

    pub fn open_stream(&self) -> NmeaStream {
        self.mux.open()
    }

    /// Explicit removal path for external collaborators, e.g. a serial
    /// detector reacting to an unplug event.
    pub fn remove(&self, id: &str) {
        let reader = self.inner.lock().unwrap().readers.get(id).cloned();

        if let Some(reader) = reader {
            reader.abort();
        }

        self.unregister(id);
    }

    /// Aborts every reader loop on owner teardown.
    pub fn shutdown(&self) {
        let mut inner = self.inner.lock().unwrap();

        for reader in inner.readers.values() {
            reader.abort();
        }

        metrics::DEVICES.sub(inner.devices.len() as i64);

        inner.devices.clear();
        inner.readers.clear();
    }

    fn unregister(&self, id: &str) {
        let mut inner = self.inner.lock().unwrap();

        if inner.devices.remove(id).is_some() {
            metrics::DEVICES.dec();
            info!("removed device {}", id);
        }

        inner.readers.remove(id);
    }
}

impl Default for DeviceRegistry {
    fn default() -> Self {
        DeviceRegistry::new()
    }
}

async fn read_device(device: Arc<dyn Device>, registry: DeviceRegistry) {
    let id = device.id().to_string();

    debug!("reading from device {} ({})", id, device.name());

    loop {
        let line = match device.read_line().await {
            Ok(line) => line,
            Err(e) => {
                error!("error reading from device {}: {}", id, e);
                metrics::DEVICE_ERRORS.inc();
                break;
            }
        };

        match parse(&id, &line) {
            Ok(sentence) => registry.mux.publish(sentence),
            Err(e) if e.is_fatal() => {
                error!("device {} sent undecodable bytes: {}", id, e);
                metrics::DEVICE_ERRORS.inc();
                break;
            }
            Err(e) => {
                debug!("device {}: {}", id, e);
                metrics::SENTENCES_DISCARDED.inc();
            }
        }
    }

    registry.unregister(&id);
}
