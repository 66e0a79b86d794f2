use crate::connman::PropertyMap;

use serde::Serialize;

/// The lifecycle state Connman reports for a service.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
pub enum ServiceState {
    Idle,
    Failure,
    Association,
    Configuration,
    Ready,
    Disconnect,
    Online,
}

impl ServiceState {
    pub fn from_wire(state: &str) -> Option<ServiceState> {
        match state {
            "idle" => Some(ServiceState::Idle),
            "failure" => Some(ServiceState::Failure),
            "association" => Some(ServiceState::Association),
            "configuration" => Some(ServiceState::Configuration),
            "ready" => Some(ServiceState::Ready),
            "disconnect" => Some(ServiceState::Disconnect),
            "online" => Some(ServiceState::Online),
            _ => None,
        }
    }

    pub fn is_connected(&self) -> bool {
        matches!(self, ServiceState::Ready | ServiceState::Online)
    }
}

/// Local snapshot of one Connman service.
///
/// Built from the daemon's property bags; unknown keys are ignored and
/// keys absent from an update leave the current values untouched.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct Service {
    pub path: String,
    pub service_type: String,
    pub name: String,
    pub auto_connect: bool,
    pub favorite: bool,
    pub security: Vec<String>,
    pub state: ServiceState,
    pub strength: u8,
}

impl Service {
    pub fn new(path: &str, properties: &PropertyMap) -> Service {
        let mut service = Service {
            path: path.to_string(),
            service_type: String::new(),
            name: String::new(),
            auto_connect: false,
            favorite: false,
            security: Vec::new(),
            state: ServiceState::Idle,
            strength: 0,
        };

        service.update(properties);

        service
    }

    pub fn update(&mut self, properties: &PropertyMap) {
        for (name, value) in properties {
            match name.as_str() {
                "Type" => {
                    if let Some(value) = value.as_str() {
                        self.service_type = value.to_string();
                    }
                }
                "Name" => {
                    if let Some(value) = value.as_str() {
                        self.name = value.to_string();
                    }
                }
                "AutoConnect" => {
                    if let Some(value) = value.as_bool() {
                        self.auto_connect = value;
                    }
                }
                "Favorite" => {
                    if let Some(value) = value.as_bool() {
                        self.favorite = value;
                    }
                }
                "Security" => {
                    if let Some(value) = value.as_string_array() {
                        self.security = value;
                    }
                }
                "State" => {
                    if let Some(state) = value.as_str().and_then(ServiceState::from_wire) {
                        self.state = state;
                    }
                }
                "Strength" => {
                    if let Some(value) = value.as_byte() {
                        self.strength = value;
                    }
                }
                _ => (),
            }
        }
    }

    /// A property bag can only materialize a new service when it names
    /// the service, so partial update notices for unknown paths are not
    /// turned into entries.
    pub fn is_complete(properties: &PropertyMap) -> bool {
        properties.contains_key("Name") && properties.contains_key("Type")
    }
}

/// Local snapshot of one Connman technology.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct Technology {
    pub path: String,
    pub technology_type: String,
    pub name: String,
    pub connected: bool,
    pub powered: bool,
}

impl Technology {
    pub fn new(path: &str, properties: &PropertyMap) -> Technology {
        let mut technology = Technology {
            path: path.to_string(),
            technology_type: String::new(),
            name: String::new(),
            connected: false,
            powered: false,
        };

        technology.update(properties);

        technology
    }

    pub fn update(&mut self, properties: &PropertyMap) {
        for (name, value) in properties {
            match name.as_str() {
                "Type" => {
                    if let Some(value) = value.as_str() {
                        self.technology_type = value.to_string();
                    }
                }
                "Name" => {
                    if let Some(value) = value.as_str() {
                        self.name = value.to_string();
                    }
                }
                "Connected" => {
                    if let Some(value) = value.as_bool() {
                        self.connected = value;
                    }
                }
                "Powered" => {
                    if let Some(value) = value.as_bool() {
                        self.powered = value;
                    }
                }
                _ => (),
            }
        }
    }
}

/// The daemon's global connectivity state.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
pub enum ManagerState {
    Offline,
    Idle,
    Ready,
    Online,
    Unknown,
}

impl ManagerState {
    pub fn from_wire(state: &str) -> ManagerState {
        match state {
            "offline" => ManagerState::Offline,
            "idle" => ManagerState::Idle,
            "ready" => ManagerState::Ready,
            "online" => ManagerState::Online,
            _ => ManagerState::Unknown,
        }
    }
}
