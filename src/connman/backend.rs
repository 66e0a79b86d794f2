use crate::connman::ConnmanError;
use crate::connman::PropertyMap;
use crate::connman::Variant;

use async_trait::async_trait;

use std::sync::Arc;

use tokio::sync::mpsc;

/// One delivery from the remote manager object, covering the four
/// signal categories the manager subscribes to.
#[derive(Clone, Debug)]
pub enum ManagerEvent {
    PropertyChanged {
        name: String,
        value: Variant,
    },
    ServicesChanged {
        changed: Vec<(String, PropertyMap)>,
        removed: Vec<String>,
    },
    TechnologyAdded {
        path: String,
        properties: PropertyMap,
    },
    TechnologyRemoved {
        path: String,
    },
}

/// Resolves the remote manager, service, and technology objects.
///
/// Production resolves over the system D-Bus; tests substitute a stub.
#[async_trait]
pub trait ConnmanBackend: Send + Sync {
    async fn manager(&self) -> Result<Arc<dyn ManagerObject>, ConnmanError>;

    async fn service(&self, path: &str) -> Result<Arc<dyn ServiceObject>, ConnmanError>;

    async fn technology(&self, path: &str) -> Result<Arc<dyn TechnologyObject>, ConnmanError>;
}

#[async_trait]
pub trait ManagerObject: Send + Sync {
    /// Subscribes to the manager's signals. Delivery ends when the
    /// receiver is dropped.
    async fn subscribe(&self) -> Result<mpsc::Receiver<ManagerEvent>, ConnmanError>;

    async fn properties(&self) -> Result<PropertyMap, ConnmanError>;

    async fn technologies(&self) -> Result<Vec<(String, PropertyMap)>, ConnmanError>;

    async fn services(&self) -> Result<Vec<(String, PropertyMap)>, ConnmanError>;
}

#[async_trait]
pub trait ServiceObject: Send + Sync {
    async fn connect(&self) -> Result<(), ConnmanError>;

    async fn disconnect(&self) -> Result<(), ConnmanError>;

    async fn remove(&self) -> Result<(), ConnmanError>;

    /// Subscribes to the service's property changes. Delivery ends
    /// when the receiver is dropped.
    async fn subscribe_properties(
        &self,
    ) -> Result<mpsc::Receiver<(String, Variant)>, ConnmanError>;
}

#[async_trait]
pub trait TechnologyObject: Send + Sync {
    async fn set_property(&self, name: &str, value: Variant) -> Result<(), ConnmanError>;

    async fn scan(&self) -> Result<(), ConnmanError>;
}
