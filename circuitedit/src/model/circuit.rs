//! Electrical identities (net classes, net signals, components) and the
//! project library the placed devices refer to.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetClass {
    pub uuid: Uuid,
    pub name: String,
}

impl NetClass {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            uuid: Uuid::new_v4(),
            name: name.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetSignal {
    pub uuid: Uuid,
    pub name: String,
    pub net_class: Uuid,
}

impl NetSignal {
    pub fn new(name: impl Into<String>, net_class: Uuid) -> Self {
        Self {
            uuid: Uuid::new_v4(),
            name: name.into(),
            net_class,
        }
    }
}

/// A component of the circuit. Devices on a board are placed for exactly
/// one component.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentInstance {
    pub uuid: Uuid,
    pub name: String,
}

impl ComponentInstance {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            uuid: Uuid::new_v4(),
            name: name.into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Circuit {
    pub net_classes: Vec<NetClass>,
    pub net_signals: Vec<NetSignal>,
    pub components: Vec<ComponentInstance>,
}

impl Circuit {
    pub fn net_class_by_name(&self, name: &str) -> Option<&NetClass> {
        self.net_classes.iter().find(|c| c.name == name)
    }

    pub fn net_signal(&self, uuid: &Uuid) -> Option<&NetSignal> {
        self.net_signals.iter().find(|s| &s.uuid == uuid)
    }

    pub fn net_signal_by_name(&self, name: &str) -> Option<&NetSignal> {
        self.net_signals.iter().find(|s| s.name == name)
    }

    pub fn component(&self, uuid: &Uuid) -> Option<&ComponentInstance> {
        self.components.iter().find(|c| &c.uuid == uuid)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LibPackage {
    pub uuid: Uuid,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LibDevice {
    pub uuid: Uuid,
    pub name: String,
    pub package: Uuid,
}

/// Library elements copied into the project.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectLibrary {
    pub devices: Vec<LibDevice>,
    pub packages: Vec<LibPackage>,
}

impl ProjectLibrary {
    pub fn device(&self, uuid: &Uuid) -> Option<&LibDevice> {
        self.devices.iter().find(|d| &d.uuid == uuid)
    }

    pub fn package(&self, uuid: &Uuid) -> Option<&LibPackage> {
        self.packages.iter().find(|p| &p.uuid == uuid)
    }
}
