use crate::connman::ConnmanBackend;
use crate::connman::ConnmanError;
use crate::connman::Variant;

use std::sync::Arc;

/// Stateless wrapper over one remote technology object.
///
/// Technologies are few and low-churn, so the interface handle is
/// resolved fresh on every call instead of being cached.
pub struct TechnologyProxy {
    path: String,
    backend: Arc<dyn ConnmanBackend>,
}

impl TechnologyProxy {
    pub fn new(backend: Arc<dyn ConnmanBackend>, path: &str) -> TechnologyProxy {
        TechnologyProxy {
            path: path.to_string(),
            backend,
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub async fn set_property(&self, name: &str, value: Variant) -> Result<(), ConnmanError> {
        self.backend
            .technology(&self.path)
            .await?
            .set_property(name, value)
            .await
    }

    pub async fn scan(&self) -> Result<(), ConnmanError> {
        self.backend.technology(&self.path).await?.scan().await
    }
}
