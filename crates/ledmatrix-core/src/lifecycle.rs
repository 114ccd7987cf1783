//! Device lifecycle manager
//!
//! Binds the logical matrix device to the physical bus attachment event.
//! The manager is a cyclic state machine:
//!
//! ```text
//! Unattached -> Initializing -> Ready -> Detaching -> Unattached
//! ```
//!
//! Attach captures the bus session, runs the chip initialization
//! sequence, then publishes the external device handle (chrdev endpoint,
//! class, named node, in that dependency order). Each step's failure
//! unwinds the steps already completed and reports upward; the device
//! never reaches `Ready` half-built. Detach tears the three resources
//! down in exact reverse order, then releases the bus session.
//!
//! The bus subsystem is assumed to serialize attach/detach events; a
//! second attach while a session is live is rejected.

use crate::bus::SpiBus;
use crate::chip::Max7219;
use crate::device::{lock_slot, ChipSlot, MatrixHandle};
use crate::error::{AttachFailure, Error, Result};
use crate::registry::{ClassId, DeviceRegistry, Major, NodeId};

use std::string::{String, ToString};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Well-known device node name
pub const DEVICE_NAME: &str = "led_matrix";

/// Device class name
pub const CLASS_NAME: &str = "led_matrix_class";

/// Lifecycle state of the logical device
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceState {
    /// No bus session; all operations fail with `NotPresent`
    Unattached,
    /// Session captured, init sequence or handle creation in progress
    Initializing,
    /// Device node published; open/write accepted
    Ready,
    /// Teardown in progress; new operations fail with `NotPresent`
    Detaching,
}

/// Resources published at attach time, recorded for reverse teardown
struct Published {
    major: Major,
    class: ClassId,
    node: NodeId,
}

/// Lifecycle manager owning the chip's one-and-only bus session
pub struct Lifecycle<B: SpiBus, R: DeviceRegistry> {
    registry: R,
    device_name: String,
    class_name: String,
    state: DeviceState,
    slot: ChipSlot<B>,
    open_count: Arc<AtomicUsize>,
    published: Option<Published>,
}

impl<B: SpiBus, R: DeviceRegistry> Lifecycle<B, R> {
    /// Create a manager in the `Unattached` state with the well-known names
    pub fn new(registry: R) -> Self {
        Self::with_names(registry, DEVICE_NAME, CLASS_NAME)
    }

    /// Create a manager with custom device and class names
    pub fn with_names(registry: R, device_name: &str, class_name: &str) -> Self {
        Self {
            registry,
            device_name: device_name.to_string(),
            class_name: class_name.to_string(),
            state: DeviceState::Unattached,
            slot: Arc::new(Mutex::new(None)),
            open_count: Arc::new(AtomicUsize::new(0)),
            published: None,
        }
    }

    /// Current lifecycle state
    pub fn state(&self) -> DeviceState {
        self.state
    }

    /// Borrow the registry (naming-table inspection)
    pub fn registry(&self) -> &R {
        &self.registry
    }

    /// Number of currently open handles
    pub fn open_count(&self) -> usize {
        self.open_count.load(Ordering::Relaxed)
    }

    /// Handle a bus attachment event carrying the new session
    ///
    /// On success the device is `Ready` and the node name is published.
    /// On any failure the attempt is fully unwound, the session is
    /// released, and the state returns to `Unattached`; the caller may
    /// retry with an entirely fresh attachment.
    pub fn attach(&mut self, bus: B) -> Result<()> {
        if self.state != DeviceState::Unattached {
            log::error!("lifecycle: attach while {:?}", self.state);
            return Err(Error::Attach(AttachFailure::AlreadyAttached));
        }
        self.state = DeviceState::Initializing;

        let mut chip = Max7219::new(bus);
        if let Err(e) = chip.init().and_then(|()| chip.clear()) {
            log::error!("lifecycle: chip initialization failed: {}", e);
            self.state = DeviceState::Unattached;
            // Dropping the chip releases the session
            return Err(Error::Attach(AttachFailure::Init));
        }

        let major = match self.registry.register_chrdev(&self.device_name) {
            Ok(major) => major,
            Err(e) => {
                self.state = DeviceState::Unattached;
                return Err(e);
            }
        };
        let class = match self.registry.create_class(&self.class_name) {
            Ok(class) => class,
            Err(e) => {
                self.registry.unregister_chrdev(major);
                self.state = DeviceState::Unattached;
                return Err(e);
            }
        };
        let node = match self.registry.create_node(class, major, &self.device_name) {
            Ok(node) => node,
            Err(e) => {
                self.registry.destroy_class(class);
                self.registry.unregister_chrdev(major);
                self.state = DeviceState::Unattached;
                return Err(e);
            }
        };

        *lock_slot(&self.slot) = Some(chip);
        self.published = Some(Published { major, class, node });
        self.state = DeviceState::Ready;
        log::info!("lifecycle: {} attached and ready", self.device_name);
        Ok(())
    }

    /// Handle a bus detachment event (or driver unload)
    ///
    /// Destroys the node, class, and chrdev endpoint in exact reverse
    /// order of creation, best-effort, then releases the bus session.
    /// A write in flight when detach begins either finishes against the
    /// live session or fails with `NotPresent`. Detaching an already
    /// unattached device is a no-op.
    pub fn detach(&mut self) {
        if self.state != DeviceState::Ready {
            log::debug!("lifecycle: detach while {:?}, nothing to do", self.state);
            return;
        }
        self.state = DeviceState::Detaching;

        // Empty the slot under the write lock; open handles now fail
        let chip = lock_slot(&self.slot).take();

        if let Some(published) = self.published.take() {
            self.registry.destroy_node(published.node);
            self.registry.destroy_class(published.class);
            self.registry.unregister_chrdev(published.major);
        }

        // Last: release the bus session
        drop(chip);
        self.state = DeviceState::Unattached;
        log::info!("lifecycle: {} detached", self.device_name);
    }

    /// Open the device, returning an I/O handle
    ///
    /// Succeeds only while the device is `Ready`; otherwise the device
    /// node does not exist and the open fails with `NotPresent`.
    pub fn open(&self) -> Result<MatrixHandle<B>> {
        if self.state != DeviceState::Ready {
            return Err(Error::NotPresent);
        }
        Ok(MatrixHandle::new(
            Arc::clone(&self.slot),
            Arc::clone(&self.open_count),
        ))
    }
}

impl<B: SpiBus, R: DeviceRegistry> Drop for Lifecycle<B, R> {
    fn drop(&mut self) {
        self.detach();
    }
}
