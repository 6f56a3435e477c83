pub mod conditional;
pub mod context;
pub mod design_error;
pub mod generate;
pub mod lower;
pub mod register_bank;
pub mod resolve;
pub mod signal;
pub mod utils;

pub use conditional::{ConditionalBuilder, ConditionalField, ConditionalSignal};
pub use context::GenContext;
pub use design_error::DesignError;
pub use register_bank::{RegisterBank, RegisterBuilder};
pub use resolve::normalize_width;
pub use signal::{Keyword, Signal, SignalBuilder, SignalKind, SignalSource, MAX_WIDTH};

/// References a signal in a design
#[derive(Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord, Debug)]
pub struct SignalId {
	id: usize,
}

impl SignalId {
	/// Checks if the reference is valid
	pub fn is_null(&self) -> bool {
		self.id == 0
	}
}

/// References a register bank in a design
#[derive(Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord, Debug)]
pub struct RegisterId {
	id: usize,
}

impl RegisterId {
	/// Checks if the reference is valid
	pub fn is_null(&self) -> bool {
		self.id == 0
	}
}

/// References any element of a design
#[derive(Clone, Copy, Hash, PartialEq, Eq, Debug)]
pub enum NodeId {
	Signal(SignalId),
	Register(RegisterId),
}

impl From<SignalId> for NodeId {
	fn from(id: SignalId) -> Self {
		Self::Signal(id)
	}
}

impl From<RegisterId> for NodeId {
	fn from(id: RegisterId) -> Self {
		Self::Register(id)
	}
}

/// Identity common to every design element
#[derive(Clone, Debug, Default)]
pub struct Node {
	/// Name, assigned on finalization if left unset
	pub(crate) name: Option<String>,

	/// Fixed bus address
	pub(crate) address: Option<u64>,

	/// Owning element. The parent owns its children, never the other way round.
	pub(crate) parent: Option<NodeId>,
}

impl Node {
	pub fn name(&self) -> Option<&str> {
		self.name.as_deref()
	}

	pub fn address(&self) -> Option<u64> {
		self.address
	}

	pub fn parent(&self) -> Option<NodeId> {
		self.parent
	}
}

/// Owns all signals and register banks of a generated design
#[derive(Clone, Debug, Default)]
pub struct Design {
	signals: Vec<Signal>,
	registers: Vec<RegisterBank>,
}

impl Design {
	/// Creates a new empty design
	pub fn new() -> Self {
		Self::default()
	}

	/// Starts building a new plain signal
	pub fn new_signal(&mut self) -> SignalBuilder<'_> {
		SignalBuilder::new(self)
	}

	/// Starts building a new conditional signal
	pub fn new_conditional(&mut self) -> ConditionalBuilder<'_> {
		ConditionalBuilder::new(self)
	}

	/// Starts building a new register bank
	pub fn new_register(&mut self) -> RegisterBuilder<'_> {
		RegisterBuilder::new(self)
	}

	/// Adds an existing signal to the design
	pub(crate) fn add_signal(&mut self, signal: Signal) -> SignalId {
		let id = SignalId {
			id: self.signals.len() + 1,
		};

		let mut sig = signal;
		sig.id = id;
		self.signals.push(sig);
		id
	}

	/// Adds an existing register bank to the design
	pub(crate) fn add_register(&mut self, register: RegisterBank) -> RegisterId {
		let id = RegisterId {
			id: self.registers.len() + 1,
		};

		let mut reg = register;
		reg.id = id;
		self.registers.push(reg);
		id
	}

	/// Returns a reference to the signal with the given ID
	pub fn get_signal(&self, id: SignalId) -> Option<&Signal> {
		self.signals.get(id.id.checked_sub(1)?)
	}

	/// Returns a mutable reference to the signal with the given ID
	pub fn get_signal_mut(&mut self, id: SignalId) -> Option<&mut Signal> {
		self.signals.get_mut(id.id.checked_sub(1)?)
	}

	/// Returns a reference to the register bank with the given ID
	pub fn get_register(&self, id: RegisterId) -> Option<&RegisterBank> {
		self.registers.get(id.id.checked_sub(1)?)
	}

	/// Returns a mutable reference to the register bank with the given ID
	pub fn get_register_mut(&mut self, id: RegisterId) -> Option<&mut RegisterBank> {
		self.registers.get_mut(id.id.checked_sub(1)?)
	}

	pub(crate) fn signal(&self, id: SignalId) -> Result<&Signal, DesignError> {
		self.get_signal(id).ok_or(DesignError::InvalidSignalId(id))
	}

	pub(crate) fn signal_mut(&mut self, id: SignalId) -> Result<&mut Signal, DesignError> {
		self.get_signal_mut(id).ok_or(DesignError::InvalidSignalId(id))
	}

	pub(crate) fn register(&self, id: RegisterId) -> Result<&RegisterBank, DesignError> {
		self.get_register(id).ok_or(DesignError::InvalidRegisterId(id))
	}

	pub(crate) fn register_mut(&mut self, id: RegisterId) -> Result<&mut RegisterBank, DesignError> {
		self.get_register_mut(id).ok_or(DesignError::InvalidRegisterId(id))
	}

	/// Returns IDs of all elements owned by the given node
	pub fn children(&self, node: NodeId) -> Vec<NodeId> {
		let signals = self
			.signals
			.iter()
			.filter(|sig| sig.node.parent == Some(node))
			.map(|sig| NodeId::Signal(sig.id));

		let registers = self
			.registers
			.iter()
			.filter(|reg| reg.node.parent == Some(node))
			.map(|reg| NodeId::Register(reg.id));

		signals.chain(registers).collect()
	}

	/// Iterates over all signals in creation order
	pub fn signals(&self) -> impl Iterator<Item = &Signal> {
		self.signals.iter()
	}

	/// Iterates over all register banks in creation order
	pub fn registers(&self) -> impl Iterator<Item = &RegisterBank> {
		self.registers.iter()
	}
}
