//! Handshake bus (XBus) ports and the mailbox link.
//!
//! A bus port is the only endpoint whose reads and writes can fail, and that is
//! what makes cross-device blocking possible.
//!
//! ## Mailbox Invariant
//!
//! | Operation | Succeeds when | Effect |
//! |-----------|---------------|--------|
//! | write     | outgoing slot empty | fills the peer's slot |
//! | read      | incoming slot full  | drains the slot |
//! | has_value | always | reports whether the incoming slot is full |
//!
//! At most one value is in flight per direction. A writer that finds the slot full
//! fails and retries on a later tick, so transfers between the two devices sharing
//! a link are strictly ordered.
//!
//! ## Node State
//!
//! Every endpoint records what it last tried to do ([`XBusNodeState`]). A failed
//! write leaves it `Writing`, a failed read leaves it `Reading`, and a successful
//! transfer returns it to `Idle`. Schedulers use this to detect deadlocks.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use tracing::trace;

use super::{constrain_for_xbus, Readable, Writable};

/// Index of a node within the network it joined.
pub type NodeId = usize;

/// What a bus endpoint is currently waiting for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum XBusNodeState {
    /// No transfer pending
    #[default]
    Idle,

    /// Last read attempt found no value
    Reading,

    /// Last write attempt found the mailbox full
    Writing,
}

/// Error returned when a node cannot join a network.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum XBusError {
    /// The network already has as many nodes as it supports.
    #[error("network is full: {device_name}.{port_name} cannot join a link with {capacity} nodes")]
    NetworkFull {
        /// Device of the rejected node
        device_name: String,
        /// Port of the rejected node
        port_name: String,
        /// Maximum number of nodes on the network
        capacity: usize,
    },
}

/// Transfer contract between bus endpoints.
///
/// Endpoints only address the network by their own [`NodeId`]; routing is the
/// network's business.
pub trait XBusNetwork {
    /// Register a new node.
    ///
    /// # Returns
    ///
    /// The node's id, or an error if the network cannot take another node
    fn add_node(&self, device_name: &str, port_name: &str) -> Result<NodeId, XBusError>;

    /// Offer a value from `source` to the network.
    ///
    /// # Returns
    ///
    /// `true` if the value was accepted, `false` if it must be retried later
    fn try_transmit(&self, source: NodeId, value: i32) -> bool;

    /// Take the value pending for `receiver`, if any.
    fn try_receive(&self, receiver: NodeId) -> Option<i32>;

    /// Whether a value is pending for `receiver`, without draining it.
    fn has_value(&self, receiver: NodeId) -> bool;
}

/// A bus endpoint as seen by commands.
///
/// Reading and writing go through [`Readable`] and [`Writable`] directly: unlike
/// registers, bus ports are never wrapped, because their failures are meaningful.
pub trait XBusPort: Readable + Writable {
    /// Whether a value is waiting to be read.
    fn has_value(&self) -> bool;

    /// What this endpoint is currently waiting for.
    fn state(&self) -> XBusNodeState;
}

/// Point-to-point mailbox network connecting exactly two endpoints.
///
/// Each direction has its own single-value slot. Values are constrained to the
/// register range when transmitted.
///
/// # Examples
///
/// ```
/// use mcu_engine::io::{Readable, Writable, XBusLink, XBusPort};
///
/// let (left, right) = XBusLink::connect(("mc1", "x0"), ("mc2", "x1"));
///
/// assert!(left.try_write(42));
/// assert!(!left.try_write(43)); // mailbox still full
///
/// assert!(right.has_value());
/// assert_eq!(right.try_read(), Some(42));
/// assert_eq!(right.try_read(), None); // drained
///
/// assert!(left.try_write(43));
/// ```
#[derive(Debug, Default)]
pub struct XBusLink {
    /// Pending value destined for each node
    slots: RefCell<[Option<i32>; 2]>,

    /// Number of nodes joined so far
    joined: Cell<usize>,
}

impl XBusLink {
    /// Number of endpoints a link connects.
    pub const CAPACITY: usize = 2;

    /// Create an empty link with no endpoints.
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    /// Create a link and both of its endpoints in one step.
    ///
    /// # Arguments
    ///
    /// * `first` - (device name, port name) of the first endpoint
    /// * `second` - (device name, port name) of the second endpoint
    pub fn connect(first: (&str, &str), second: (&str, &str)) -> (Rc<XBusEndpoint>, Rc<XBusEndpoint>) {
        let link = Self::new();
        link.joined.set(Self::CAPACITY);
        let network: Rc<dyn XBusNetwork> = link;
        (
            Rc::new(XBusEndpoint::attached(network.clone(), 0, first.0, first.1)),
            Rc::new(XBusEndpoint::attached(network, 1, second.0, second.1)),
        )
    }

    fn peer(node: NodeId) -> Option<NodeId> {
        match node {
            0 => Some(1),
            1 => Some(0),
            _ => None,
        }
    }
}

impl XBusNetwork for XBusLink {
    fn add_node(&self, device_name: &str, port_name: &str) -> Result<NodeId, XBusError> {
        let id = self.joined.get();
        if id >= Self::CAPACITY {
            return Err(XBusError::NetworkFull {
                device_name: device_name.to_string(),
                port_name: port_name.to_string(),
                capacity: Self::CAPACITY,
            });
        }
        self.joined.set(id + 1);
        Ok(id)
    }

    fn try_transmit(&self, source: NodeId, value: i32) -> bool {
        let Some(destination) = Self::peer(source) else {
            return false;
        };
        let mut slots = self.slots.borrow_mut();
        if slots[destination].is_some() {
            return false;
        }
        slots[destination] = Some(constrain_for_xbus(value));
        true
    }

    fn try_receive(&self, receiver: NodeId) -> Option<i32> {
        self.slots.borrow_mut().get_mut(receiver)?.take()
    }

    fn has_value(&self, receiver: NodeId) -> bool {
        matches!(self.slots.borrow().get(receiver), Some(Some(_)))
    }
}

/// Concrete bus port attached to a network.
pub struct XBusEndpoint {
    network: Rc<dyn XBusNetwork>,
    node: NodeId,
    device_name: RefCell<String>,
    port_name: RefCell<String>,
    state: Cell<XBusNodeState>,
}

impl XBusEndpoint {
    /// Join a network as a new node.
    ///
    /// # Arguments
    ///
    /// * `network` - The network to join
    /// * `device_name` - Name of the owning device
    /// * `port_name` - Name of the port on the device (e.g. `x0`)
    ///
    /// # Returns
    ///
    /// * `Ok(XBusEndpoint)` - Joined successfully
    /// * `Err(XBusError::NetworkFull)` - The network rejected the node
    pub fn join(
        network: Rc<dyn XBusNetwork>,
        device_name: &str,
        port_name: &str,
    ) -> Result<Self, XBusError> {
        let node = network.add_node(device_name, port_name)?;
        Ok(Self::attached(network, node, device_name, port_name))
    }

    fn attached(network: Rc<dyn XBusNetwork>, node: NodeId, device_name: &str, port_name: &str) -> Self {
        Self {
            network,
            node,
            device_name: RefCell::new(device_name.to_string()),
            port_name: RefCell::new(port_name.to_string()),
            state: Cell::new(XBusNodeState::Idle),
        }
    }

    /// The node id assigned by the network.
    pub fn node(&self) -> NodeId {
        self.node
    }

    /// Name of the owning device.
    pub fn device_name(&self) -> String {
        self.device_name.borrow().clone()
    }

    /// Name of the port on the device.
    pub fn port_name(&self) -> String {
        self.port_name.borrow().clone()
    }

    /// Rename the owning device.
    pub fn set_device_name(&self, device_name: &str) {
        *self.device_name.borrow_mut() = device_name.to_string();
    }

    /// Rename the port.
    pub fn set_port_name(&self, port_name: &str) {
        *self.port_name.borrow_mut() = port_name.to_string();
    }
}

impl std::fmt::Debug for XBusEndpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("XBusEndpoint")
            .field("node", &self.node)
            .field("device_name", &self.device_name.borrow())
            .field("port_name", &self.port_name.borrow())
            .field("state", &self.state.get())
            .finish()
    }
}

impl Readable for XBusEndpoint {
    fn try_read(&self) -> Option<i32> {
        let value = self.network.try_receive(self.node);
        match value {
            Some(value) => {
                trace!(
                    device = %self.device_name.borrow(),
                    port = %self.port_name.borrow(),
                    value,
                    "xbus receive"
                );
                self.state.set(XBusNodeState::Idle);
            }
            None => self.state.set(XBusNodeState::Reading),
        }
        value
    }
}

impl Writable for XBusEndpoint {
    fn try_write(&self, value: i32) -> bool {
        let accepted = self.network.try_transmit(self.node, value);
        if accepted {
            trace!(
                device = %self.device_name.borrow(),
                port = %self.port_name.borrow(),
                value,
                "xbus transmit"
            );
            self.state.set(XBusNodeState::Idle);
        } else {
            self.state.set(XBusNodeState::Writing);
        }
        accepted
    }
}

impl XBusPort for XBusEndpoint {
    fn has_value(&self) -> bool {
        self.network.has_value(self.node)
    }

    fn state(&self) -> XBusNodeState {
        self.state.get()
    }
}
