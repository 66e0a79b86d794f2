use crate::connman::ConnmanBackend;
use crate::connman::ConnmanError;
use crate::connman::ManagerEvent;
use crate::connman::ManagerObject;
use crate::connman::PropertyMap;
use crate::connman::ServiceObject;
use crate::connman::TechnologyObject;
use crate::connman::Variant;

use async_trait::async_trait;

use futures_util::StreamExt;

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::mpsc;

use tracing::debug;

use zbus::proxy;
use zbus::Connection;

use zvariant::OwnedObjectPath;
use zvariant::OwnedValue;
use zvariant::Value;

const EVENT_QUEUE: usize = 64;

/// Proxy for the Connman manager interface at the bus root.
///
/// Each proxy lives in its own module so the per-signal types the
/// `#[proxy]` macro generates (`PropertyChanged`, `PropertyChangedArgs`,
/// `PropertyChangedStream`) don't collide between the manager and
/// service proxies, which both expose a `PropertyChanged` signal.
mod manager_proxy {
    use super::*;

    #[proxy(
        interface = "net.connman.Manager",
        default_service = "net.connman",
        default_path = "/",
        gen_blocking = false
    )]
    pub trait ConnmanManager {
        fn get_properties(&self) -> zbus::Result<HashMap<String, OwnedValue>>;

        fn get_technologies(&self)
            -> zbus::Result<Vec<(OwnedObjectPath, HashMap<String, OwnedValue>)>>;

        fn get_services(&self) -> zbus::Result<Vec<(OwnedObjectPath, HashMap<String, OwnedValue>)>>;

        #[zbus(signal)]
        fn property_changed(&self, name: String, value: OwnedValue) -> zbus::Result<()>;

        #[zbus(signal)]
        fn services_changed(
            &self,
            changed: Vec<(OwnedObjectPath, HashMap<String, OwnedValue>)>,
            removed: Vec<OwnedObjectPath>,
        ) -> zbus::Result<()>;

        #[zbus(signal)]
        fn technology_added(
            &self,
            path: OwnedObjectPath,
            properties: HashMap<String, OwnedValue>,
        ) -> zbus::Result<()>;

        #[zbus(signal)]
        fn technology_removed(&self, path: OwnedObjectPath) -> zbus::Result<()>;
    }
}

pub use manager_proxy::ConnmanManagerProxy;

/// Proxy for one Connman service object.
mod service_proxy {
    use super::*;

    #[proxy(
        interface = "net.connman.Service",
        default_service = "net.connman",
        gen_blocking = false
    )]
    pub trait ConnmanService {
        fn connect(&self) -> zbus::Result<()>;

        fn disconnect(&self) -> zbus::Result<()>;

        fn remove(&self) -> zbus::Result<()>;

        #[zbus(signal)]
        fn property_changed(&self, name: String, value: OwnedValue) -> zbus::Result<()>;
    }
}

pub use service_proxy::ConnmanServiceProxy;

/// Proxy for one Connman technology object.
mod technology_proxy {
    use super::*;

    #[proxy(
        interface = "net.connman.Technology",
        default_service = "net.connman",
        gen_blocking = false
    )]
    pub trait ConnmanTechnology {
        fn set_property(&self, name: &str, value: &Value<'_>) -> zbus::Result<()>;

        fn scan(&self) -> zbus::Result<()>;
    }
}

pub use technology_proxy::ConnmanTechnologyProxy;

/// The production backend: resolves Connman objects over the system
/// bus.
pub struct ZbusConnman {
    connection: Connection,
}

impl ZbusConnman {
    pub async fn system() -> Result<Self, ConnmanError> {
        Ok(ZbusConnman {
            connection: Connection::system().await?,
        })
    }

    pub fn new(connection: Connection) -> Self {
        ZbusConnman { connection }
    }
}

#[async_trait]
impl ConnmanBackend for ZbusConnman {
    async fn manager(&self) -> Result<Arc<dyn ManagerObject>, ConnmanError> {
        let proxy = ConnmanManagerProxy::new(&self.connection).await?;

        Ok(Arc::new(ZbusManager { proxy }))
    }

    async fn service(&self, path: &str) -> Result<Arc<dyn ServiceObject>, ConnmanError> {
        let proxy = ConnmanServiceProxy::builder(&self.connection)
            .path(path.to_string())?
            .build()
            .await?;

        Ok(Arc::new(ZbusService { proxy }))
    }

    async fn technology(&self, path: &str) -> Result<Arc<dyn TechnologyObject>, ConnmanError> {
        let proxy = ConnmanTechnologyProxy::builder(&self.connection)
            .path(path.to_string())?
            .build()
            .await?;

        Ok(Arc::new(ZbusTechnology { proxy }))
    }
}

struct ZbusManager {
    proxy: ConnmanManagerProxy<'static>,
}

#[async_trait]
impl ManagerObject for ZbusManager {
    async fn subscribe(&self) -> Result<mpsc::Receiver<ManagerEvent>, ConnmanError> {
        let mut properties = self.proxy.receive_property_changed().await?;
        let mut services = self.proxy.receive_services_changed().await?;
        let mut added = self.proxy.receive_technology_added().await?;
        let mut removed = self.proxy.receive_technology_removed().await?;

        let (tx, rx) = mpsc::channel(EVENT_QUEUE);

        let forward = tx.clone();
        tokio::spawn(async move {
            while let Some(signal) = properties.next().await {
                let args = match signal.args() {
                    Ok(args) => args,
                    Err(_) => continue,
                };

                let value = match unpack(&args.value) {
                    Some(value) => value,
                    None => continue,
                };

                let event = ManagerEvent::PropertyChanged {
                    name: args.name,
                    value,
                };

                if forward.send(event).await.is_err() {
                    break;
                }
            }

            debug!("manager property signal stream ended");
        });

        let forward = tx.clone();
        tokio::spawn(async move {
            while let Some(signal) = services.next().await {
                let args = match signal.args() {
                    Ok(args) => args,
                    Err(_) => continue,
                };

                let event = ManagerEvent::ServicesChanged {
                    changed: unpack_object_list(args.changed),
                    removed: args.removed.into_iter().map(|p| p.to_string()).collect(),
                };

                if forward.send(event).await.is_err() {
                    break;
                }
            }

            debug!("service list signal stream ended");
        });

        let forward = tx.clone();
        tokio::spawn(async move {
            while let Some(signal) = added.next().await {
                let args = match signal.args() {
                    Ok(args) => args,
                    Err(_) => continue,
                };

                let event = ManagerEvent::TechnologyAdded {
                    path: args.path.to_string(),
                    properties: unpack_map(&args.properties),
                };

                if forward.send(event).await.is_err() {
                    break;
                }
            }

            debug!("technology added signal stream ended");
        });

        tokio::spawn(async move {
            while let Some(signal) = removed.next().await {
                let args = match signal.args() {
                    Ok(args) => args,
                    Err(_) => continue,
                };

                let event = ManagerEvent::TechnologyRemoved {
                    path: args.path.to_string(),
                };

                if tx.send(event).await.is_err() {
                    break;
                }
            }

            debug!("technology removed signal stream ended");
        });

        Ok(rx)
    }

    async fn properties(&self) -> Result<PropertyMap, ConnmanError> {
        Ok(unpack_map(&self.proxy.get_properties().await?))
    }

    async fn technologies(&self) -> Result<Vec<(String, PropertyMap)>, ConnmanError> {
        Ok(unpack_object_list(self.proxy.get_technologies().await?))
    }

    async fn services(&self) -> Result<Vec<(String, PropertyMap)>, ConnmanError> {
        Ok(unpack_object_list(self.proxy.get_services().await?))
    }
}

struct ZbusService {
    proxy: ConnmanServiceProxy<'static>,
}

#[async_trait]
impl ServiceObject for ZbusService {
    async fn connect(&self) -> Result<(), ConnmanError> {
        Ok(self.proxy.connect().await?)
    }

    async fn disconnect(&self) -> Result<(), ConnmanError> {
        Ok(self.proxy.disconnect().await?)
    }

    async fn remove(&self) -> Result<(), ConnmanError> {
        Ok(self.proxy.remove().await?)
    }

    async fn subscribe_properties(
        &self,
    ) -> Result<mpsc::Receiver<(String, Variant)>, ConnmanError> {
        let mut changes = self.proxy.receive_property_changed().await?;

        let (tx, rx) = mpsc::channel(EVENT_QUEUE);

        tokio::spawn(async move {
            while let Some(signal) = changes.next().await {
                let args = match signal.args() {
                    Ok(args) => args,
                    Err(_) => continue,
                };

                let value = match unpack(&args.value) {
                    Some(value) => value,
                    None => continue,
                };

                if tx.send((args.name, value)).await.is_err() {
                    break;
                }
            }
        });

        Ok(rx)
    }
}

struct ZbusTechnology {
    proxy: ConnmanTechnologyProxy<'static>,
}

#[async_trait]
impl TechnologyObject for ZbusTechnology {
    async fn set_property(&self, name: &str, value: Variant) -> Result<(), ConnmanError> {
        let value = pack(&value)
            .ok_or_else(|| ConnmanError::Operation(format!("cannot encode {:?}", value)))?;

        Ok(self.proxy.set_property(name, &value).await?)
    }

    async fn scan(&self) -> Result<(), ConnmanError> {
        Ok(self.proxy.scan().await?)
    }
}

/// Recursively unpacks a wire value into the local variant tree.
/// Nested variants are flattened; shapes Connman never sends are
/// skipped.
pub(crate) fn unpack(value: &Value<'_>) -> Option<Variant> {
    match value {
        Value::Bool(v) => Some(Variant::Bool(*v)),
        Value::U8(v) => Some(Variant::Byte(*v)),
        Value::I16(v) => Some(Variant::I16(*v)),
        Value::U16(v) => Some(Variant::U16(*v)),
        Value::I32(v) => Some(Variant::I32(*v)),
        Value::U32(v) => Some(Variant::U32(*v)),
        Value::I64(v) => Some(Variant::I64(*v)),
        Value::U64(v) => Some(Variant::U64(*v)),
        Value::Str(v) => Some(Variant::Str(v.to_string())),
        Value::ObjectPath(v) => Some(Variant::Str(v.to_string())),
        Value::Value(v) => unpack(v),
        Value::Array(items) => Some(Variant::Array(
            items.iter().filter_map(unpack).collect(),
        )),
        Value::Dict(dict) => {
            let map: HashMap<String, OwnedValue> = dict.try_clone().ok()?.try_into().ok()?;

            let mut unpacked = HashMap::new();

            for (key, value) in &map {
                if let Some(value) = unpack(value) {
                    unpacked.insert(key.clone(), value);
                }
            }

            Some(Variant::Dict(unpacked))
        }
        _ => None,
    }
}

fn unpack_map(map: &HashMap<String, OwnedValue>) -> PropertyMap {
    map.iter()
        .filter_map(|(key, value)| unpack(value).map(|value| (key.clone(), value)))
        .collect()
}

fn unpack_object_list(
    list: Vec<(OwnedObjectPath, HashMap<String, OwnedValue>)>,
) -> Vec<(String, PropertyMap)> {
    list.into_iter()
        .map(|(path, properties)| (path.to_string(), unpack_map(&properties)))
        .collect()
}

fn pack(variant: &Variant) -> Option<Value<'static>> {
    match variant {
        Variant::Bool(v) => Some(Value::from(*v)),
        Variant::Byte(v) => Some(Value::from(*v)),
        Variant::I16(v) => Some(Value::from(*v)),
        Variant::U16(v) => Some(Value::from(*v)),
        Variant::I32(v) => Some(Value::from(*v)),
        Variant::U32(v) => Some(Value::from(*v)),
        Variant::I64(v) => Some(Value::from(*v)),
        Variant::U64(v) => Some(Value::from(*v)),
        Variant::Str(v) => Some(Value::from(v.clone())),
        Variant::Array(items) => {
            let strings: Option<Vec<String>> = items
                .iter()
                .map(|item| item.as_str().map(str::to_string))
                .collect();

            strings.map(Value::from)
        }
        Variant::Dict(_) => None,
    }
}
