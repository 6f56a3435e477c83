pub mod codegen;
pub mod design;

pub use codegen::{CodegenError, Emitter, VerilogEmitter};
pub use design::{
	ConditionalField, Design, DesignError, GenContext, Keyword, NodeId, RegisterId, SignalId, SignalSource,
	MAX_WIDTH,
};
