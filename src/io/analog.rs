//! Analog ports and the analog network contract.
//!
//! An analog port is a continuously driven signal line in the range
//! [`ANALOG_LOW`]..=[`ANALOG_HIGH`](super::ANALOG_HIGH). Unlike a bus port it never blocks: the last
//! value written is the value the port drives, and a read always returns something.
//!
//! # Networks
//!
//! Several ports can be wired together. How the values driven by several writers
//! combine into the value a reader sees is a policy owned by the network, not by
//! the port, so it is expressed as the [`AnalogNetwork`] trait. A port that never
//! joined a network behaves as a standalone line and reads back what it drives.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use super::{constrain_for_analog, SyncReadable, SyncWritable, ANALOG_LOW};

/// An analog endpoint as seen by commands.
///
/// Analog ports are synchronous: reads and writes always succeed, and writes are
/// clamped to the analog range.
pub trait AnalogPort: SyncReadable + SyncWritable {}

/// Identity and driven value of a node attached to an analog network.
pub trait AnalogNetworkNode {
    /// Name of the device owning this node.
    fn device_name(&self) -> String;

    /// Name of the port on that device.
    fn port_name(&self) -> String;

    /// The value this node currently drives onto the network.
    fn driven_value(&self) -> i32;
}

/// Combination policy shared by all ports wired to the same analog line.
///
/// # Examples
///
/// A network where every reader sees the strongest signal driven by any *other*
/// node:
///
/// ```
/// use std::cell::RefCell;
/// use std::rc::Rc;
/// use mcu_engine::io::{AnalogNetwork, AnalogNetworkNode, AnalogPin, SyncReadable, SyncWritable};
///
/// #[derive(Default)]
/// struct StrongestOther {
///     nodes: RefCell<Vec<Rc<dyn AnalogNetworkNode>>>,
/// }
///
/// impl AnalogNetwork for StrongestOther {
///     fn add_node(&self, node: Rc<dyn AnalogNetworkNode>) {
///         self.nodes.borrow_mut().push(node);
///     }
///
///     fn receive_value(&self, receiver: &dyn AnalogNetworkNode) -> i32 {
///         self.nodes
///             .borrow()
///             .iter()
///             .filter(|n| n.device_name() != receiver.device_name() || n.port_name() != receiver.port_name())
///             .map(|n| n.driven_value())
///             .max()
///             .unwrap_or(0)
///     }
/// }
///
/// let network: Rc<dyn AnalogNetwork> = Rc::new(StrongestOther::default());
/// let out = AnalogPin::new("mc1", "p0");
/// let input = AnalogPin::new("mc2", "p1");
/// AnalogPin::join_network(&out, &network);
/// AnalogPin::join_network(&input, &network);
///
/// out.write(80);
/// assert_eq!(input.read(), 80);
/// ```
pub trait AnalogNetwork {
    /// Attach a node to the network.
    fn add_node(&self, node: Rc<dyn AnalogNetworkNode>);

    /// The value the given node observes on the network.
    fn receive_value(&self, receiver: &dyn AnalogNetworkNode) -> i32;
}

/// Concrete analog port.
///
/// # Examples
///
/// ```
/// use mcu_engine::io::{AnalogPin, SyncReadable, SyncWritable};
///
/// let pin = AnalogPin::new("mc1", "p0");
/// pin.write(150);
/// assert_eq!(pin.read(), 100);
/// ```
pub struct AnalogPin {
    device_name: RefCell<String>,
    port_name: RefCell<String>,
    driven: Cell<i32>,
    network: RefCell<Option<Weak<dyn AnalogNetwork>>>,
}

impl AnalogPin {
    /// Create a standalone pin driving [`ANALOG_LOW`].
    ///
    /// # Arguments
    ///
    /// * `device_name` - Name of the owning device
    /// * `port_name` - Name of the port on the device (e.g. `p0`)
    pub fn new(device_name: &str, port_name: &str) -> Rc<Self> {
        Rc::new(Self {
            device_name: RefCell::new(device_name.to_string()),
            port_name: RefCell::new(port_name.to_string()),
            driven: Cell::new(ANALOG_LOW),
            network: RefCell::new(None),
        })
    }

    /// Wire a pin to a network.
    ///
    /// The network keeps the pin alive; the pin only keeps a weak reference back,
    /// so dropping the network turns the pin into a standalone line again.
    pub fn join_network(pin: &Rc<Self>, network: &Rc<dyn AnalogNetwork>) {
        network.add_node(pin.clone());
        *pin.network.borrow_mut() = Some(Rc::downgrade(network));
    }

    /// Rename the pin (e.g. after the owning device was renamed).
    pub fn set_identity(&self, device_name: &str, port_name: &str) {
        *self.device_name.borrow_mut() = device_name.to_string();
        *self.port_name.borrow_mut() = port_name.to_string();
    }
}

impl std::fmt::Debug for AnalogPin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnalogPin")
            .field("device_name", &self.device_name.borrow())
            .field("port_name", &self.port_name.borrow())
            .field("driven", &self.driven.get())
            .field("networked", &self.network.borrow().is_some())
            .finish()
    }
}

impl AnalogNetworkNode for AnalogPin {
    fn device_name(&self) -> String {
        self.device_name.borrow().clone()
    }

    fn port_name(&self) -> String {
        self.port_name.borrow().clone()
    }

    fn driven_value(&self) -> i32 {
        self.driven.get()
    }
}

impl SyncReadable for AnalogPin {
    fn read(&self) -> i32 {
        let network = self.network.borrow().as_ref().and_then(Weak::upgrade);
        match network {
            Some(network) => constrain_for_analog(network.receive_value(self)),
            None => self.driven.get(),
        }
    }
}

impl SyncWritable for AnalogPin {
    fn write(&self, value: i32) {
        self.driven.set(constrain_for_analog(value));
    }
}

impl AnalogPort for AnalogPin {}
