//! Device naming and registration
//!
//! The lifecycle manager publishes an attached matrix through three nested
//! resources, created in dependency order: a byte-device endpoint (the
//! chrdev major number), a device class, and finally the named device node
//! callers open. This module seams that infrastructure behind a trait so
//! the manager can be driven against the in-process registry here or a
//! fault-injecting one in tests.
//!
//! Destruction is deliberately infallible: teardown is best-effort and
//! must always make forward progress toward a clean unattached state.

use crate::error::{AttachFailure, Error, Result};

use std::collections::HashMap;
use std::string::{String, ToString};
use std::vec::Vec;

/// Byte-device endpoint id (the chrdev major number)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Major(pub u32);

/// Device class id
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ClassId(pub u32);

/// Named device node id
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub u32);

/// The naming infrastructure the lifecycle manager drives
///
/// Creation methods fail with `Error::Attach(..)` naming the step that
/// failed; the caller unwinds previously created resources in reverse.
pub trait DeviceRegistry {
    /// Register a byte-device endpoint under `name`
    fn register_chrdev(&mut self, name: &str) -> Result<Major>;

    /// Create a device class named `name`
    fn create_class(&mut self, name: &str) -> Result<ClassId>;

    /// Create the named device node backed by `class` and `major`
    fn create_node(&mut self, class: ClassId, major: Major, name: &str) -> Result<NodeId>;

    /// Destroy a device node; best-effort
    fn destroy_node(&mut self, node: NodeId);

    /// Destroy a device class; best-effort
    fn destroy_class(&mut self, class: ClassId);

    /// Unregister a byte-device endpoint; best-effort
    fn unregister_chrdev(&mut self, major: Major);
}

/// In-process device registry
///
/// Keeps the naming table in ordinary maps. Duplicate names are rejected
/// the same way the host infrastructure would reject them.
#[derive(Debug, Default)]
pub struct InProcessRegistry {
    next_id: u32,
    chrdevs: HashMap<u32, String>,
    classes: HashMap<u32, String>,
    nodes: HashMap<u32, String>,
}

impl InProcessRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    fn next_id(&mut self) -> u32 {
        self.next_id += 1;
        self.next_id
    }

    /// Whether a node with the given name currently exists
    pub fn has_node(&self, name: &str) -> bool {
        self.nodes.values().any(|n| n == name)
    }

    /// Names of all live device nodes
    pub fn node_names(&self) -> Vec<String> {
        self.nodes.values().cloned().collect()
    }

    /// True when no resource of any kind is registered
    pub fn is_empty(&self) -> bool {
        self.chrdevs.is_empty() && self.classes.is_empty() && self.nodes.is_empty()
    }
}

impl DeviceRegistry for InProcessRegistry {
    fn register_chrdev(&mut self, name: &str) -> Result<Major> {
        if self.chrdevs.values().any(|n| n == name) {
            log::error!("registry: chrdev name {:?} already registered", name);
            return Err(Error::Attach(AttachFailure::Chrdev));
        }
        let id = self.next_id();
        self.chrdevs.insert(id, name.to_string());
        log::debug!("registry: registered chrdev {:?} (major {})", name, id);
        Ok(Major(id))
    }

    fn create_class(&mut self, name: &str) -> Result<ClassId> {
        if self.classes.values().any(|n| n == name) {
            log::error!("registry: class name {:?} already exists", name);
            return Err(Error::Attach(AttachFailure::Class));
        }
        let id = self.next_id();
        self.classes.insert(id, name.to_string());
        log::debug!("registry: created class {:?}", name);
        Ok(ClassId(id))
    }

    fn create_node(&mut self, class: ClassId, major: Major, name: &str) -> Result<NodeId> {
        if !self.classes.contains_key(&class.0) || !self.chrdevs.contains_key(&major.0) {
            log::error!("registry: node {:?} references unknown class or chrdev", name);
            return Err(Error::Attach(AttachFailure::Node));
        }
        if self.nodes.values().any(|n| n == name) {
            log::error!("registry: node name {:?} already exists", name);
            return Err(Error::Attach(AttachFailure::Node));
        }
        let id = self.next_id();
        self.nodes.insert(id, name.to_string());
        log::debug!("registry: created device node {:?}", name);
        Ok(NodeId(id))
    }

    fn destroy_node(&mut self, node: NodeId) {
        if self.nodes.remove(&node.0).is_none() {
            log::warn!("registry: destroy of unknown node id {}", node.0);
        }
    }

    fn destroy_class(&mut self, class: ClassId) {
        if self.classes.remove(&class.0).is_none() {
            log::warn!("registry: destroy of unknown class id {}", class.0);
        }
    }

    fn unregister_chrdev(&mut self, major: Major) {
        if self.chrdevs.remove(&major.0).is_none() {
            log::warn!("registry: unregister of unknown major {}", major.0);
        }
    }
}
