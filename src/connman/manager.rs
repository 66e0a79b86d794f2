use crate::connman::ConnmanBackend;
use crate::connman::ConnmanError;
use crate::connman::Listeners;
use crate::connman::ManagerEvent;
use crate::connman::ManagerObject;
use crate::connman::ManagerState;
use crate::connman::PropertyMap;
use crate::connman::Service;
use crate::connman::ServiceProxy;
use crate::connman::Subscription;
use crate::connman::Technology;
use crate::connman::TechnologyProxy;
use crate::connman::Variant;

use futures::future::join_all;

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::Mutex;

use tokio::sync::mpsc;
use tokio::sync::Mutex as AsyncMutex;
use tokio::task::JoinHandle;

use tracing::debug;
use tracing::info;

/// Mirrors the remote Connman manager object: subscribes to its
/// signals, keeps the technology and service caches current, and
/// exposes the imperative operations that mutate remote state.
///
/// A manager is unconfigured until [`Manager::setup`] succeeds and
/// stops tracking remote state after [`Manager::teardown`].
#[derive(Clone)]
pub struct Manager {
    shared: Arc<Shared>,
}

struct Shared {
    backend: Arc<dyn ConnmanBackend>,
    inner: AsyncMutex<Inner>,
    technology_listeners: Listeners<Vec<Technology>>,
    service_listeners: Listeners<Vec<Service>>,
    service_property_listeners: Arc<Listeners<Service>>,
    pump: Mutex<Option<JoinHandle<()>>>,
}

#[derive(Default)]
struct Inner {
    manager: Option<Arc<dyn ManagerObject>>,
    properties: PropertyMap,
    technologies: Vec<Technology>,
    services: HashMap<String, Arc<ServiceProxy>>,
    svc_order: Vec<String>,
}

impl Manager {
    pub fn new(backend: Arc<dyn ConnmanBackend>) -> Manager {
        Manager {
            shared: Arc::new(Shared {
                backend,
                inner: AsyncMutex::new(Inner::default()),
                technology_listeners: Listeners::new(),
                service_listeners: Listeners::new(),
                service_property_listeners: Arc::new(Listeners::new()),
                pump: Mutex::new(None),
            }),
        }
    }

    /// Resolves the remote manager, subscribes to its signals, and
    /// fetches the initial properties, technology list, and service
    /// list.
    ///
    /// Failure to resolve or subscribe surfaces as
    /// [`ConnmanError::Unavailable`]; retrying is the caller's policy.
    pub async fn setup(&self) -> Result<(), ConnmanError> {
        let manager = self
            .shared
            .backend
            .manager()
            .await
            .map_err(|e| ConnmanError::Unavailable(e.to_string()))?;

        let events = manager
            .subscribe()
            .await
            .map_err(|e| ConnmanError::Unavailable(e.to_string()))?;

        let properties = manager.properties().await?;
        let technologies = manager.technologies().await?;
        let services = manager.services().await?;

        {
            let mut inner = self.shared.inner.lock().await;

            inner.manager = Some(manager);
            inner.properties = properties;
            inner.technologies = technologies
                .iter()
                .map(|(path, properties)| Technology::new(path, properties))
                .collect();
        }

        apply_services(&self.shared, services, Vec::new()).await;

        let pump = tokio::spawn(pump_events(Arc::clone(&self.shared), events));

        if let Some(previous) = self.shared.pump.lock().unwrap().replace(pump) {
            previous.abort();
        }

        info!("connman manager set up");

        Ok(())
    }

    /// Ends signal delivery and stops tracking every known service.
    /// Call once per successful [`Manager::setup`].
    pub async fn teardown(&self) {
        if let Some(pump) = self.shared.pump.lock().unwrap().take() {
            pump.abort();
        }

        let proxies: Vec<Arc<ServiceProxy>> = {
            let inner = self.shared.inner.lock().await;

            inner.services.values().cloned().collect()
        };

        for proxy in proxies {
            proxy.stop_tracking().await;
        }

        info!("connman manager torn down");
    }

    /// Service snapshots in the order the daemon last reported; the
    /// daemon's ranking is preserved, never re-sorted locally.
    pub async fn list_services(&self) -> Vec<Service> {
        let inner = self.shared.inner.lock().await;

        inner
            .svc_order
            .iter()
            .filter_map(|path| inner.services.get(path))
            .map(|proxy| proxy.snapshot())
            .collect()
    }

    pub async fn technologies(&self) -> Vec<Technology> {
        self.shared.inner.lock().await.technologies.clone()
    }

    pub async fn service(&self, path: &str) -> Option<Arc<ServiceProxy>> {
        self.shared.inner.lock().await.services.get(path).cloned()
    }

    /// The daemon's global state, [`ManagerState::Unknown`] until a
    /// `State` property has been observed.
    pub async fn state(&self) -> ManagerState {
        let inner = self.shared.inner.lock().await;

        inner
            .properties
            .get("State")
            .and_then(Variant::as_str)
            .map(ManagerState::from_wire)
            .unwrap_or(ManagerState::Unknown)
    }

    pub async fn connect(&self, path: &str) -> Result<(), ConnmanError> {
        let proxy = self.service_proxy(path).await?;

        proxy.connect().await?;
        self.refresh_services().await
    }

    pub async fn disconnect(&self, path: &str) -> Result<(), ConnmanError> {
        let proxy = self.service_proxy(path).await?;

        proxy.disconnect().await?;
        self.refresh_services().await
    }

    pub async fn remove(&self, path: &str) -> Result<(), ConnmanError> {
        let proxy = self.service_proxy(path).await?;

        proxy.remove().await?;
        self.refresh_services().await
    }

    /// Sets the technology's `Powered` property, then refreshes the
    /// technology list.
    pub async fn power(&self, path: &str, on: bool) -> Result<(), ConnmanError> {
        {
            let inner = self.shared.inner.lock().await;

            if !inner.technologies.iter().any(|t| t.path == path) {
                return Err(ConnmanError::UnknownTechnology(path.to_string()));
            }
        }

        TechnologyProxy::new(Arc::clone(&self.shared.backend), path)
            .set_property("Powered", Variant::Bool(on))
            .await?;

        self.refresh_technologies().await
    }

    /// Scans every currently powered wifi technology concurrently and
    /// returns how many were scanned. Scanning is meaningless for
    /// powered-off or non-wifi technologies, so they are skipped.
    ///
    /// All issued scans run to completion before a failure surfaces.
    pub async fn scan_all(&self) -> Result<usize, ConnmanError> {
        let paths: Vec<String> = {
            let inner = self.shared.inner.lock().await;

            inner
                .technologies
                .iter()
                .filter(|t| t.powered && t.technology_type == "wifi")
                .map(|t| t.path.clone())
                .collect()
        };

        if paths.is_empty() {
            return Ok(0);
        }

        let scans = paths.iter().map(|path| {
            let proxy = TechnologyProxy::new(Arc::clone(&self.shared.backend), path);

            async move { proxy.scan().await }
        });

        for result in join_all(scans).await {
            result?;
        }

        Ok(paths.len())
    }

    pub fn on_technologies_changed(
        &self,
        callback: impl Fn(&Vec<Technology>) + Send + Sync + 'static,
    ) -> Subscription {
        self.shared.technology_listeners.add(callback)
    }

    pub fn on_services_changed(
        &self,
        callback: impl Fn(&Vec<Service>) + Send + Sync + 'static,
    ) -> Subscription {
        self.shared.service_listeners.add(callback)
    }

    pub fn on_service_property_changed(
        &self,
        callback: impl Fn(&Service) + Send + Sync + 'static,
    ) -> Subscription {
        self.shared.service_property_listeners.add(callback)
    }

    async fn service_proxy(&self, path: &str) -> Result<Arc<ServiceProxy>, ConnmanError> {
        self.service(path)
            .await
            .ok_or_else(|| ConnmanError::UnknownService(path.to_string()))
    }

    /// A successful daemon-side action can reorder or rewrite the whole
    /// service list, so the cache is rebuilt from a fresh fetch.
    async fn refresh_services(&self) -> Result<(), ConnmanError> {
        let manager = self.manager_object().await?;

        let services = manager.services().await?;

        apply_services(&self.shared, services, Vec::new()).await;
        fire_services_changed(&self.shared).await;

        Ok(())
    }

    async fn refresh_technologies(&self) -> Result<(), ConnmanError> {
        let manager = self.manager_object().await?;

        let technologies = manager.technologies().await?;

        {
            let mut inner = self.shared.inner.lock().await;

            inner.technologies = technologies
                .iter()
                .map(|(path, properties)| Technology::new(path, properties))
                .collect();
        }

        fire_technologies_changed(&self.shared).await;

        Ok(())
    }

    async fn manager_object(&self) -> Result<Arc<dyn ManagerObject>, ConnmanError> {
        self.shared
            .inner
            .lock()
            .await
            .manager
            .clone()
            .ok_or(ConnmanError::NotSetUp)
    }
}

async fn pump_events(shared: Arc<Shared>, mut events: mpsc::Receiver<ManagerEvent>) {
    while let Some(event) = events.recv().await {
        handle_event(&shared, event).await;
    }

    debug!("manager event stream ended");
}

async fn handle_event(shared: &Arc<Shared>, event: ManagerEvent) {
    match event {
        ManagerEvent::PropertyChanged { name, value } => {
            shared.inner.lock().await.properties.insert(name, value);
        }
        ManagerEvent::ServicesChanged { changed, removed } => {
            apply_services(shared, changed, removed).await;
            fire_services_changed(shared).await;
        }
        ManagerEvent::TechnologyAdded { path, properties } => {
            {
                let mut inner = shared.inner.lock().await;

                match inner.technologies.iter_mut().find(|t| t.path == path) {
                    Some(technology) => technology.update(&properties),
                    None => inner.technologies.push(Technology::new(&path, &properties)),
                }
            }

            fire_technologies_changed(shared).await;
        }
        ManagerEvent::TechnologyRemoved { path } => {
            {
                let mut inner = shared.inner.lock().await;

                inner.technologies.retain(|t| t.path != path);
            }

            fire_technologies_changed(shared).await;
        }
    }
}

/// Applies one service-list update batch.
///
/// Known paths are updated in place. An unknown path only materializes
/// a proxy when the batch names the service, and new proxies activate
/// property tracking asynchronously. The visible order is replaced
/// wholesale with exactly the paths this batch reported, restricted to
/// materialized proxies: a partial batch redefines the order rather
/// than merging with it.
async fn apply_services(
    shared: &Arc<Shared>,
    changed: Vec<(String, PropertyMap)>,
    removed: Vec<String>,
) {
    let mut inner = shared.inner.lock().await;

    for path in removed {
        if let Some(proxy) = inner.services.remove(&path) {
            proxy.stop_tracking().await;

            debug!("service {} removed", path);
        }

        inner.svc_order.retain(|p| *p != path);
    }

    for (path, properties) in &changed {
        match inner.services.get(path) {
            Some(proxy) => proxy.apply_properties(properties),
            None => {
                if !Service::is_complete(properties) {
                    debug!("ignoring incomplete update for unknown service {}", path);
                    continue;
                }

                let proxy = Arc::new(ServiceProxy::new(
                    path,
                    properties,
                    Arc::clone(&shared.backend),
                    Arc::clone(&shared.service_property_listeners),
                ));

                inner.services.insert(path.clone(), Arc::clone(&proxy));

                tokio::spawn(async move { proxy.start_tracking().await });
            }
        }
    }

    let order: Vec<String> = changed
        .iter()
        .map(|(path, _)| path.clone())
        .filter(|path| inner.services.contains_key(path))
        .collect();

    inner.svc_order = order;
}

async fn fire_services_changed(shared: &Arc<Shared>) {
    let services: Vec<Service> = {
        let inner = shared.inner.lock().await;

        inner
            .svc_order
            .iter()
            .filter_map(|path| inner.services.get(path))
            .map(|proxy| proxy.snapshot())
            .collect()
    };

    shared.service_listeners.fire(&services);
}

async fn fire_technologies_changed(shared: &Arc<Shared>) {
    let technologies = shared.inner.lock().await.technologies.clone();

    shared.technology_listeners.fire(&technologies);
}
