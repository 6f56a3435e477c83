use crate::codegen::to_sized_hex;

use super::{ConditionalField, ConditionalSignal, Design, DesignError, SignalId, SignalKind, SignalSource};

/// Slices `text` to the narrower of the two widths and zero-extends it back to `dest_width`.
///
/// Upper bits are always filled with zeros, never with the sign bit.
/// A zero width leaves the text unsliced.
pub fn normalize_width(text: &str, dest_width: Option<u64>, src_width: Option<u64>) -> String {
	let Some(dest_width) = dest_width else {
		return text.into();
	};

	let min_width = src_width.unwrap_or(dest_width).min(dest_width);
	if min_width == 0 {
		return text.into();
	}

	let sliced = if min_width == 1 {
		format!("{}[0]", text)
	}
	else {
		format!("{}[{}:0]", text, min_width - 1)
	};

	if min_width < dest_width {
		format!("{{{{({}-{}){{1'b0}}}}, {}}}", dest_width, min_width, sliced)
	}
	else {
		sliced
	}
}

fn check_width(width: Option<u64>) -> Result<(), DesignError> {
	match width {
		Some(0) => Err(DesignError::InvalidWidth { width: 0 }),
		_ => Ok(()),
	}
}

/// Width to read a bound signal at. An unknown target width stays unknown.
fn effective_width(target: Option<u64>, bound: Option<u64>) -> Option<u64> {
	match (target, bound) {
		(Some(target), Some(bound)) => Some(target.min(bound)),
		(target, _) => target,
	}
}

impl Design {
	/// Resolves the value of a signal into a Verilog expression of the requested
	/// width, or of the signal's own width if none is requested.
	pub fn resolve(&self, id: SignalId, width: Option<u64>) -> Result<String, DesignError> {
		self.check_acyclic(id)?;
		self.resolve_impl(id, width)
	}

	/// Prefers the signal's name over its value, so that declared wires are referenced
	/// instead of having their values inlined.
	pub fn name_or_value(&self, id: SignalId, width: Option<u64>) -> Result<String, DesignError> {
		self.check_acyclic(id)?;
		self.name_or_value_impl(id, width)
	}

	fn resolve_impl(&self, id: SignalId, width: Option<u64>) -> Result<String, DesignError> {
		let signal = self.signal(id)?;
		let width = width.or(signal.width);
		check_width(width)?;

		match &signal.kind {
			SignalKind::Plain(None) => Err(DesignError::UnboundSignal(id)),
			SignalKind::Plain(Some(source)) => self.resolve_source(source, width),
			SignalKind::Conditional(cond) => self.resolve_conditional(cond, width),
		}
	}

	fn name_or_value_impl(&self, id: SignalId, width: Option<u64>) -> Result<String, DesignError> {
		let signal = self.signal(id)?;
		check_width(width)?;
		check_width(signal.width)?;

		match signal.name() {
			Some(name) => Ok(normalize_width(name, width, signal.width)),
			None => self.resolve_impl(id, width),
		}
	}

	fn resolve_source(&self, source: &SignalSource, width: Option<u64>) -> Result<String, DesignError> {
		match source {
			SignalSource::Keyword(keyword) => Ok(keyword.to_verilog(width)),
			SignalSource::Text(text) => Ok(text.clone()),
			SignalSource::Literal(value) => Ok(match width {
				Some(width) => to_sized_hex(value, width, true),
				None => value.to_string(),
			}),
			SignalSource::Signal(bound_id) => {
				let bound = self.signal(*bound_id)?;
				check_width(bound.width)?;
				let bound_width = effective_width(width, bound.width);

				let text = match bound.name() {
					Some(name) => name.to_string(),
					None if bound.is_connected() => self.resolve_impl(*bound_id, bound_width)?,
					None => return Err(DesignError::DanglingSignal(*bound_id)),
				};

				Ok(normalize_width(&text, width, bound_width))
			},
		}
	}

	/// Operands that are not signals yet behave as anonymous signals bound to them:
	/// one bit wide for the condition, unconstrained for the branches.
	fn resolve_conditional(&self, cond: &ConditionalSignal, width: Option<u64>) -> Result<String, DesignError> {
		use ConditionalField::*;
		let condition = cond.require(Condition)?;
		let when_true = cond.require(TrueBranch)?;
		let when_false = cond.require(FalseBranch)?;

		let condition_str = match condition {
			SignalSource::Signal(id) => self.resolve_impl(*id, None)?,
			other => self.resolve_source(other, Some(1))?,
		};

		Ok(format!(
			"({}) ? {} : {}",
			condition_str,
			self.resolve_branch(when_true, width)?,
			self.resolve_branch(when_false, width)?
		))
	}

	fn resolve_branch(&self, branch: &SignalSource, width: Option<u64>) -> Result<String, DesignError> {
		match branch {
			SignalSource::Signal(id) => self.name_or_value_impl(*id, width),
			other => self.resolve_source(other, width),
		}
	}
}
