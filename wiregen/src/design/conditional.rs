use std::fmt;

use super::utils::is_name_valid;
use super::{Design, DesignError, Node, NodeId, Signal, SignalId, SignalKind, SignalSource};

/// Identifies one of the three operands of a conditional signal
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ConditionalField {
	Condition,
	TrueBranch,
	FalseBranch,
}

impl fmt::Display for ConditionalField {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		use ConditionalField::*;
		match self {
			Condition => write!(f, "condition expression"),
			TrueBranch => write!(f, "value for a true condition"),
			FalseBranch => write!(f, "value for a false condition"),
		}
	}
}

/// Ternary selector: `(condition) ? when_true : when_false`
#[derive(Clone, Debug, Default)]
pub struct ConditionalSignal {
	pub(super) condition: Option<SignalSource>,
	pub(super) when_true: Option<SignalSource>,
	pub(super) when_false: Option<SignalSource>,
}

impl ConditionalSignal {
	pub fn get(&self, field: ConditionalField) -> Option<&SignalSource> {
		use ConditionalField::*;
		match field {
			Condition => self.condition.as_ref(),
			TrueBranch => self.when_true.as_ref(),
			FalseBranch => self.when_false.as_ref(),
		}
	}

	pub fn set(&mut self, field: ConditionalField, source: impl Into<SignalSource>) {
		use ConditionalField::*;
		let source = Some(source.into());
		match field {
			Condition => self.condition = source,
			TrueBranch => self.when_true = source,
			FalseBranch => self.when_false = source,
		}
	}

	pub fn set_condition(&mut self, source: impl Into<SignalSource>) {
		self.set(ConditionalField::Condition, source);
	}

	pub fn set_true(&mut self, source: impl Into<SignalSource>) {
		self.set(ConditionalField::TrueBranch, source);
	}

	pub fn set_false(&mut self, source: impl Into<SignalSource>) {
		self.set(ConditionalField::FalseBranch, source);
	}

	/// Returns the operand or reports which one is missing
	pub(super) fn require(&self, field: ConditionalField) -> Result<&SignalSource, DesignError> {
		self.get(field).ok_or(DesignError::IncompleteConditional(field))
	}

	/// Iterates over all operands that are set
	pub(super) fn operands(&self) -> impl Iterator<Item = (ConditionalField, &SignalSource)> {
		use ConditionalField::*;
		[Condition, TrueBranch, FalseBranch]
			.into_iter()
			.filter_map(move |field| self.get(field).map(|source| (field, source)))
	}
}

/// Conditional signal builder helper
pub struct ConditionalBuilder<'a> {
	design: &'a mut Design,
	name: Option<String>,
	width: Option<u64>,
	parent: Option<NodeId>,
	selector: ConditionalSignal,
}

impl<'a> ConditionalBuilder<'a> {
	pub fn new(design: &'a mut Design) -> Self {
		Self {
			design,
			name: None,
			width: None,
			parent: None,
			selector: ConditionalSignal::default(),
		}
	}

	pub fn name(mut self, name: &str) -> Self {
		self.name = Some(name.into());
		self
	}

	pub fn width(mut self, width: u64) -> Self {
		self.width = Some(width);
		self
	}

	pub fn parent(mut self, parent: NodeId) -> Self {
		self.parent = Some(parent);
		self
	}

	/// Sets the select expression
	pub fn condition(mut self, source: impl Into<SignalSource>) -> Self {
		self.selector.set_condition(source);
		self
	}

	/// Sets the value selected when the condition holds
	pub fn when_true(mut self, source: impl Into<SignalSource>) -> Self {
		self.selector.set_true(source);
		self
	}

	/// Sets the value selected otherwise
	pub fn when_false(mut self, source: impl Into<SignalSource>) -> Self {
		self.selector.set_false(source);
		self
	}

	/// Creates the conditional signal. Missing operands are only reported on resolution.
	pub fn build(self) -> Result<SignalId, DesignError> {
		if let Some(name) = &self.name {
			if !is_name_valid(name) {
				return Err(DesignError::InvalidName);
			}
		}

		for (_, source) in self.selector.operands() {
			if let SignalSource::Signal(id) = source {
				self.design.signal(*id)?;
			}
		}

		let node = Node {
			name: self.name,
			address: None,
			parent: self.parent,
		};

		Ok(self
			.design
			.add_signal(Signal::new(node, self.width, SignalKind::Conditional(self.selector))))
	}
}
