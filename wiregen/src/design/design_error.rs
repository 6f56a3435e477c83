use thiserror::Error;

use super::{ConditionalField, RegisterId, SignalId, MAX_WIDTH};
use crate::codegen::CodegenError;

/// Represents an error that can occur during design construction or generation.
///
/// Generation is not transactional. Text emitted before the error stays in the output.
#[derive(Clone, Debug, Error)]
pub enum DesignError {
	#[error("Invalid name")]
	InvalidName,

	#[error("Invalid signal ID")]
	InvalidSignalId(SignalId),

	#[error("Invalid register ID")]
	InvalidRegisterId(RegisterId),

	#[error("Invalid width {width} (must be between 1 and {})", MAX_WIDTH)]
	InvalidWidth { width: i64 },

	#[error("Signal name cannot be changed after finalization")]
	NameLocked(SignalId),

	#[error("Attempted to get the value of a signal that is not bound to anything")]
	UnboundSignal(SignalId),

	#[error("Dangling signal - bound to an unnamed signal that is not bound to anything")]
	DanglingSignal(SignalId),

	#[error("Unsupported binding type: {0}")]
	UnsupportedBindingType(String),

	#[error("Conditional signal has no {0}")]
	IncompleteConditional(ConditionalField),

	#[error("Signal binding chain is cyclic")]
	CyclicBinding(SignalId),

	#[error(transparent)]
	Codegen(CodegenError),
}

/// Zero width wires are reported like any other invalid width
impl From<CodegenError> for DesignError {
	fn from(err: CodegenError) -> Self {
		match err {
			CodegenError::InvalidWireWidth { .. } => Self::InvalidWidth { width: 0 },
			other => Self::Codegen(other),
		}
	}
}
