use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConnmanError {
    #[error("network backend unavailable: {0}")]
    Unavailable(String),
    #[error("manager is not set up")]
    NotSetUp,
    #[error("unknown service {0}")]
    UnknownService(String),
    #[error("unknown technology {0}")]
    UnknownTechnology(String),
    #[error("operation failed: {0}")]
    Operation(String),
    #[error(transparent)]
    Dbus(#[from] zbus::Error),
}
