use num_bigint::BigInt;

use super::utils::is_name_valid;
use super::{ConditionalSignal, Design, DesignError, Node, NodeId, SignalId};

/// Width given to signals finalized without one
pub const DEFAULT_WIRE_WIDTH: u64 = 1;

/// Widest bus accepted from external input
pub const MAX_WIDTH: u64 = 1 << 16;

const ALL_ONES_ALIASES: [&str; 7] = ["allones", "ones", "one", "allhigh", "high", "true", "~0"];
const ALL_ZEROS_ALIASES: [&str; 7] = ["allzeros", "zeros", "zero", "alllow", "low", "false", "0"];

/// Symbolic constant filling a whole bus
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Keyword {
	AllOnes,
	AllZeros,
}

impl Keyword {
	/// Recognizes a keyword alias (case insensitive)
	pub fn parse(text: &str) -> Option<Self> {
		let text = text.to_lowercase();
		if ALL_ONES_ALIASES.contains(&text.as_str()) {
			Some(Self::AllOnes)
		}
		else if ALL_ZEROS_ALIASES.contains(&text.as_str()) {
			Some(Self::AllZeros)
		}
		else {
			None
		}
	}

	/// Expression for the constant at the given width. Unsized if no width is known.
	pub fn to_verilog(self, width: Option<u64>) -> String {
		use Keyword::*;
		let bit = match self {
			AllOnes => "1'b1",
			AllZeros => "1'b0",
		};

		match (self, width) {
			(AllOnes, None) => "~0".into(),
			(AllZeros, None) => "0".into(),
			(_, Some(1)) => bit.into(),
			(_, Some(width)) => format!("{{({}){{{}}}}}", width, bit),
		}
	}
}

/// Value a signal can be bound to
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SignalSource {
	/// Integer literal, sized on resolution
	Literal(BigInt),

	/// All ones or all zeros
	Keyword(Keyword),

	/// Verilog expression, emitted verbatim
	Text(String),

	/// Another signal in the same design
	Signal(SignalId),
}

impl SignalSource {
	/// Classifies free text, recognizing keyword aliases
	pub fn from_text(text: &str) -> Self {
		match Keyword::parse(text) {
			Some(keyword) => Self::Keyword(keyword),
			None => Self::Text(text.into()),
		}
	}

	/// Referenced signal, if any
	pub fn signal(&self) -> Option<SignalId> {
		match self {
			Self::Signal(id) => Some(*id),
			_ => None,
		}
	}
}

impl From<&str> for SignalSource {
	fn from(text: &str) -> Self {
		Self::from_text(text)
	}
}

impl From<String> for SignalSource {
	fn from(text: String) -> Self {
		Self::from_text(&text)
	}
}

impl From<Keyword> for SignalSource {
	fn from(keyword: Keyword) -> Self {
		Self::Keyword(keyword)
	}
}

impl From<BigInt> for SignalSource {
	fn from(value: BigInt) -> Self {
		Self::Literal(value)
	}
}

impl From<i64> for SignalSource {
	fn from(value: i64) -> Self {
		Self::Literal(value.into())
	}
}

impl From<i32> for SignalSource {
	fn from(value: i32) -> Self {
		Self::Literal(value.into())
	}
}

impl From<u64> for SignalSource {
	fn from(value: u64) -> Self {
		Self::Literal(value.into())
	}
}

impl From<SignalId> for SignalSource {
	fn from(id: SignalId) -> Self {
		Self::Signal(id)
	}
}

/// Determines how a signal gets its value
#[derive(Clone, Debug)]
pub enum SignalKind {
	/// Optionally bound to a single source
	Plain(Option<SignalSource>),

	/// Ternary selector between two sources
	Conditional(ConditionalSignal),
}

/// Named or anonymous bit vector
#[derive(Clone, Debug)]
pub struct Signal {
	/// Self-reference
	pub(super) id: SignalId,

	pub(super) node: Node,

	/// Bit width, may stay unknown until finalization
	pub(super) width: Option<u64>,

	pub(super) kind: SignalKind,

	/// Set once finalized, locks the name
	pub(super) finalized: bool,
}

impl Signal {
	pub(super) fn new(node: Node, width: Option<u64>, kind: SignalKind) -> Self {
		Self {
			id: SignalId { id: 0 },
			node,
			width,
			kind,
			finalized: false,
		}
	}

	pub fn id(&self) -> SignalId {
		self.id
	}

	pub fn node(&self) -> &Node {
		&self.node
	}

	pub fn name(&self) -> Option<&str> {
		self.node.name()
	}

	pub fn width(&self) -> Option<u64> {
		self.width
	}

	pub fn kind(&self) -> &SignalKind {
		&self.kind
	}

	/// Bound source of a plain signal
	pub fn source(&self) -> Option<&SignalSource> {
		match &self.kind {
			SignalKind::Plain(source) => source.as_ref(),
			SignalKind::Conditional(_) => None,
		}
	}

	pub fn conditional(&self) -> Option<&ConditionalSignal> {
		match &self.kind {
			SignalKind::Conditional(cond) => Some(cond),
			SignalKind::Plain(_) => None,
		}
	}

	pub fn conditional_mut(&mut self) -> Option<&mut ConditionalSignal> {
		match &mut self.kind {
			SignalKind::Conditional(cond) => Some(cond),
			SignalKind::Plain(_) => None,
		}
	}

	/// Checks if the signal has something to resolve its value from.
	/// Conditionals always do, missing fields are reported on resolution.
	pub fn is_connected(&self) -> bool {
		match &self.kind {
			SignalKind::Plain(source) => source.is_some(),
			SignalKind::Conditional(_) => true,
		}
	}

	pub fn is_finalized(&self) -> bool {
		self.finalized
	}

	pub fn set_name(&mut self, name: &str) -> Result<(), DesignError> {
		if self.finalized {
			return Err(DesignError::NameLocked(self.id));
		}

		if !is_name_valid(name) {
			return Err(DesignError::InvalidName);
		}

		self.node.name = Some(name.into());
		Ok(())
	}

	/// Makes the signal anonymous again
	pub fn clear_name(&mut self) -> Result<(), DesignError> {
		if self.finalized {
			return Err(DesignError::NameLocked(self.id));
		}

		self.node.name = None;
		Ok(())
	}

	pub fn set_width(&mut self, width: Option<u64>) {
		self.width = width;
	}

	pub fn set_address(&mut self, address: Option<u64>) {
		self.node.address = address;
	}

	/// Binds the signal to a value source, replacing any conditional selector
	pub fn bind(&mut self, source: impl Into<SignalSource>) {
		self.kind = SignalKind::Plain(Some(source.into()));
	}

	pub fn unbind(&mut self) {
		self.kind = SignalKind::Plain(None);
	}

	/// Signals this one reads its value from
	pub(super) fn dependencies(&self) -> Vec<SignalId> {
		match &self.kind {
			SignalKind::Plain(source) => source.iter().filter_map(SignalSource::signal).collect(),
			SignalKind::Conditional(cond) => cond.operands().filter_map(|(_, source)| source.signal()).collect(),
		}
	}
}

/// Signal builder helper
pub struct SignalBuilder<'a> {
	/// Design where the signal will be added
	design: &'a mut Design,

	name: Option<String>,
	width: Option<u64>,
	address: Option<u64>,
	parent: Option<NodeId>,
	source: Option<SignalSource>,
}

impl<'a> SignalBuilder<'a> {
	/// Starts building a new signal
	pub fn new(design: &'a mut Design) -> Self {
		Self {
			design,
			name: None,
			width: None,
			address: None,
			parent: None,
			source: None,
		}
	}

	/// Sets name of the signal. Anonymous signals get one on finalization.
	pub fn name(mut self, name: &str) -> Self {
		self.name = Some(name.into());
		self
	}

	/// Sets bit width of the signal
	pub fn width(mut self, width: u64) -> Self {
		self.width = Some(width);
		self
	}

	pub fn address(mut self, address: u64) -> Self {
		self.address = Some(address);
		self
	}

	/// Sets the owning element
	pub fn parent(mut self, parent: NodeId) -> Self {
		self.parent = Some(parent);
		self
	}

	/// Binds the signal to a value source
	pub fn bind(mut self, source: impl Into<SignalSource>) -> Self {
		self.source = Some(source.into());
		self
	}

	/// Creates the signal and adds it to the design. Returns the signal ID.
	pub fn build(self) -> Result<SignalId, DesignError> {
		if let Some(name) = &self.name {
			if !is_name_valid(name) {
				return Err(DesignError::InvalidName);
			}
		}

		if let Some(SignalSource::Signal(id)) = &self.source {
			self.design.signal(*id)?;
		}

		let node = Node {
			name: self.name,
			address: self.address,
			parent: self.parent,
		};

		Ok(self
			.design
			.add_signal(Signal::new(node, self.width, SignalKind::Plain(self.source))))
	}
}
