mod backend;
mod dbus;
mod error;
mod listener;
mod manager;
mod model;
mod service;
mod technology;
mod variant;

pub use backend::ConnmanBackend;
pub use backend::ManagerEvent;
pub use backend::ManagerObject;
pub use backend::ServiceObject;
pub use backend::TechnologyObject;
pub use dbus::ZbusConnman;
pub use error::ConnmanError;
pub use listener::Listeners;
pub use listener::Subscription;
pub use manager::Manager;
pub use model::ManagerState;
pub use model::Service;
pub use model::ServiceState;
pub use model::Technology;
pub use service::ServiceProxy;
pub use technology::TechnologyProxy;
pub use variant::PropertyMap;
pub use variant::Variant;




#[cfg(test)]
mod test_model;
