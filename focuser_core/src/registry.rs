//! Dynamically sized device registry.
//!
//! Maps device name to its focuser instance. There is no attachment cap;
//! enumeration of physical units is the host's concern, this only keeps the
//! state machines it hands us.

use std::collections::HashMap;

use crate::builder::Focuser;
use crate::error::{FocuserError, Result};

#[derive(Debug, Default)]
pub struct FocuserRegistry {
    devices: HashMap<String, Focuser>,
}

impl FocuserRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a focuser under its name. Names must be unique.
    pub fn insert(&mut self, focuser: Focuser) -> Result<()> {
        let name = focuser.name().to_string();
        if self.devices.contains_key(&name) {
            return Err(eyre::Report::new(FocuserError::State(format!(
                "device already registered: {name}"
            ))));
        }
        self.devices.insert(name, focuser);
        Ok(())
    }

    /// Remove a focuser, returning it so the caller can disconnect it.
    pub fn remove(&mut self, name: &str) -> Option<Focuser> {
        self.devices.remove(name)
    }

    pub fn get(&self, name: &str) -> Option<&Focuser> {
        self.devices.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Focuser> {
        self.devices.get_mut(name)
    }

    pub fn names(&self) -> Vec<&str> {
        self.devices.keys().map(String::as_str).collect()
    }

    pub fn len(&self) -> usize {
        self.devices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }

    /// Tick every registered device, pairing each update with its name.
    pub fn poll_all(&mut self) -> Vec<(String, crate::status::Update)> {
        let mut out = Vec::new();
        for (name, focuser) in &mut self.devices {
            for update in focuser.poll() {
                out.push((name.clone(), update));
            }
        }
        out
    }
}
