mod configuration;
mod configuration_error;
mod device_config;
mod metrics_config;
mod network_config;

pub use configuration::Configuration;
pub use configuration_error::ConfigurationError;
pub use device_config::DeviceConfig;
pub use metrics_config::MetricsConfig;
pub use network_config::NetworkConfig;
