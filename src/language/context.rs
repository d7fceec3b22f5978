//! Resolution context: the named endpoints and labels a program can refer to

use std::collections::HashMap;
use std::rc::Rc;

use crate::io::{AnalogPort, NullRegister, Register, XBusPort};

/// Name under which the accumulator is registered.
pub const ACCUMULATOR_NAME: &str = "acc";

/// Name under which the null register is registered.
pub const NULL_REGISTER_NAME: &str = "null";

/// Everything a program's operands can resolve to.
///
/// The context is assembled by whoever builds the device (registers and ports),
/// then handed to the command resolver, which fills in [`labels`](Self::labels).
///
/// # Examples
///
/// ```
/// use std::rc::Rc;
/// use mcu_engine::io::{AnalogPin, GeneralRegister, XBusLink};
/// use mcu_engine::language::context::ResolutionContext;
///
/// let (x0, _peer) = XBusLink::connect(("mc1", "x0"), ("mc2", "x0"));
///
/// let context = ResolutionContext::new(Rc::new(GeneralRegister::new()))
///     .with_register("dat", Rc::new(GeneralRegister::new()))
///     .with_analog_port("p0", AnalogPin::new("mc1", "p0"))
///     .with_xbus_port("x0", x0);
///
/// assert!(context.registers.contains_key("acc"));
/// assert!(context.registers.contains_key("null"));
/// assert!(context.analog_ports.contains_key("p0"));
/// ```
pub struct ResolutionContext {
    /// Register arithmetic instructions operate on implicitly
    pub accumulator: Rc<dyn Register>,

    /// Registers by name (includes the accumulator and `null`)
    pub registers: HashMap<String, Rc<dyn Register>>,

    /// Analog ports by name
    pub analog_ports: HashMap<String, Rc<dyn AnalogPort>>,

    /// Bus ports by name
    pub xbus_ports: HashMap<String, Rc<dyn XBusPort>>,

    /// Deduplicated labels in first-seen order, written by the resolver
    pub labels: Vec<String>,
}

impl ResolutionContext {
    /// Create a context around an accumulator.
    ///
    /// The accumulator is also registered as `acc`, and the `null` register is
    /// always available.
    pub fn new(accumulator: Rc<dyn Register>) -> Self {
        let mut registers: HashMap<String, Rc<dyn Register>> = HashMap::new();
        registers.insert(ACCUMULATOR_NAME.to_string(), accumulator.clone());
        registers.insert(NULL_REGISTER_NAME.to_string(), Rc::new(NullRegister));

        Self {
            accumulator,
            registers,
            analog_ports: HashMap::new(),
            xbus_ports: HashMap::new(),
            labels: Vec::new(),
        }
    }

    /// Register a named register.
    pub fn with_register(mut self, name: &str, register: Rc<dyn Register>) -> Self {
        self.registers.insert(name.to_string(), register);
        self
    }

    /// Register a named analog port.
    pub fn with_analog_port(mut self, name: &str, port: Rc<dyn AnalogPort>) -> Self {
        self.analog_ports.insert(name.to_string(), port);
        self
    }

    /// Register a named bus port.
    pub fn with_xbus_port(mut self, name: &str, port: Rc<dyn XBusPort>) -> Self {
        self.xbus_ports.insert(name.to_string(), port);
        self
    }

    /// Whether a label was defined by the program being resolved.
    pub fn is_known_label(&self, label: &str) -> bool {
        self.labels.iter().any(|l| l == label)
    }
}

impl std::fmt::Debug for ResolutionContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut registers: Vec<&String> = self.registers.keys().collect();
        registers.sort();
        let mut analog_ports: Vec<&String> = self.analog_ports.keys().collect();
        analog_ports.sort();
        let mut xbus_ports: Vec<&String> = self.xbus_ports.keys().collect();
        xbus_ports.sort();

        f.debug_struct("ResolutionContext")
            .field("registers", &registers)
            .field("analog_ports", &analog_ports)
            .field("xbus_ports", &xbus_ports)
            .field("labels", &self.labels)
            .finish()
    }
}
