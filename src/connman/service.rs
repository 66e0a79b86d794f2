use crate::connman::ConnmanBackend;
use crate::connman::ConnmanError;
use crate::connman::Listeners;
use crate::connman::PropertyMap;
use crate::connman::Service;
use crate::connman::ServiceObject;
use crate::connman::Subscription;
use crate::connman::Variant;

use std::sync::Arc;
use std::sync::Mutex;

use tokio::sync::mpsc;
use tokio::sync::Mutex as AsyncMutex;
use tokio::sync::OnceCell;
use tokio::task::JoinHandle;

use tracing::debug;

/// Mirrors one remote service object: a lazily resolved interface
/// handle, the local property snapshot, and the listeners to fire when
/// the snapshot changes.
pub struct ServiceProxy {
    path: String,
    backend: Arc<dyn ConnmanBackend>,
    object: OnceCell<Arc<dyn ServiceObject>>,
    snapshot: Arc<Mutex<Service>>,
    listeners: Arc<Listeners<Service>>,
    shared_listeners: Arc<Listeners<Service>>,
    tracking: AsyncMutex<Tracking>,
}

#[derive(Default)]
struct Tracking {
    active: bool,
    task: Option<JoinHandle<()>>,
}

impl ServiceProxy {
    pub fn new(
        path: &str,
        properties: &PropertyMap,
        backend: Arc<dyn ConnmanBackend>,
        shared_listeners: Arc<Listeners<Service>>,
    ) -> ServiceProxy {
        ServiceProxy {
            path: path.to_string(),
            backend,
            object: OnceCell::new(),
            snapshot: Arc::new(Mutex::new(Service::new(path, properties))),
            listeners: Arc::new(Listeners::new()),
            shared_listeners,
            tracking: AsyncMutex::new(Tracking::default()),
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn snapshot(&self) -> Service {
        self.snapshot.lock().unwrap().clone()
    }

    pub fn apply_properties(&self, properties: &PropertyMap) {
        self.snapshot.lock().unwrap().update(properties);
    }

    pub fn on_change(&self, callback: impl Fn(&Service) + Send + Sync + 'static) -> Subscription {
        self.listeners.add(callback)
    }

    pub async fn connect(&self) -> Result<(), ConnmanError> {
        self.object().await?.connect().await
    }

    pub async fn disconnect(&self) -> Result<(), ConnmanError> {
        self.object().await?.disconnect().await
    }

    pub async fn remove(&self) -> Result<(), ConnmanError> {
        self.object().await?.remove().await
    }

    /// Subscribes to the remote object's property changes.
    ///
    /// The guard is held across the resolution await so a duplicate
    /// update notice arriving mid-activation cannot subscribe twice. A
    /// service that vanished between discovery and activation is not an
    /// error; tracking simply never starts.
    pub async fn start_tracking(&self) {
        let mut tracking = self.tracking.lock().await;

        if tracking.active {
            return;
        }

        let object = match self.object().await {
            Ok(object) => Arc::clone(object),
            Err(e) => {
                debug!("service {} gone before tracking started: {}", self.path, e);
                return;
            }
        };

        let events = match object.subscribe_properties().await {
            Ok(events) => events,
            Err(e) => {
                debug!("service {} subscription failed: {}", self.path, e);
                return;
            }
        };

        tracking.task = Some(tokio::spawn(track_properties(
            self.path.clone(),
            Arc::clone(&self.snapshot),
            Arc::clone(&self.listeners),
            Arc::clone(&self.shared_listeners),
            events,
        )));
        tracking.active = true;
    }

    pub async fn stop_tracking(&self) {
        let mut tracking = self.tracking.lock().await;

        if let Some(task) = tracking.task.take() {
            task.abort();
        }

        tracking.active = false;
    }

    async fn object(&self) -> Result<&Arc<dyn ServiceObject>, ConnmanError> {
        self.object
            .get_or_try_init(|| self.backend.service(&self.path))
            .await
    }
}

async fn track_properties(
    path: String,
    snapshot: Arc<Mutex<Service>>,
    listeners: Arc<Listeners<Service>>,
    shared_listeners: Arc<Listeners<Service>>,
    mut events: mpsc::Receiver<(String, Variant)>,
) {
    while let Some((name, value)) = events.recv().await {
        let service = {
            let mut snapshot = snapshot.lock().unwrap();

            let mut properties = PropertyMap::new();
            properties.insert(name, value);
            snapshot.update(&properties);

            snapshot.clone()
        };

        listeners.fire(&service);
        shared_listeners.fire(&service);
    }

    debug!("service {} property stream ended", path);
}
