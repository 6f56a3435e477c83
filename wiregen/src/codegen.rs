mod literal;
mod verilog_emitter;

pub use literal::{to_hex_literal, to_sized_hex};
pub use verilog_emitter::VerilogEmitter;

use std::fmt;
use thiserror::Error;

#[derive(Clone, Error, Debug)]
pub enum CodegenError {
	#[error(transparent)]
	FormatError(#[from] fmt::Error),

	#[error("Invalid width for wire '{name}' (must be positive)")]
	InvalidWireWidth { name: String },
}

/// Text sink for generated Verilog.
///
/// Only `write` has to be provided, everything else is formatted on top of it.
/// A zero wire width is reported as `CodegenError::InvalidWireWidth`, which turns
/// into `DesignError::InvalidWidth` once it reaches the design.
pub trait Emitter {
	/// Appends raw text
	fn write(&mut self, text: &str) -> Result<(), CodegenError>;

	fn newline(&mut self) -> Result<(), CodegenError> {
		self.write("\n")
	}

	/// Emits a single line comment
	fn comment(&mut self, text: &str) -> Result<(), CodegenError> {
		self.write(&format!("// {}\n", text))
	}

	/// Emits a wire declaration. One bit wires get no range.
	fn declare_wire(&mut self, name: &str, width: u64) -> Result<(), CodegenError> {
		if width == 0 {
			return Err(CodegenError::InvalidWireWidth { name: name.into() });
		}

		if width > 1 {
			self.write(&format!("wire [{}:0] {};\n", width - 1, name))
		}
		else {
			self.write(&format!("wire {};\n", name))
		}
	}

	/// Emits a continuous assignment
	fn assign(&mut self, name: &str, expr: &str) -> Result<(), CodegenError> {
		self.write(&format!("assign {} = {};\n", name, expr))
	}

	/// Emits a module instantiation. Ports and parameters are emitted in the given order.
	fn instantiate_module(
		&mut self,
		module_name: &str,
		instance_name: &str,
		ports: &[(String, String)],
		parameters: &[(String, String)],
	) -> Result<(), CodegenError> {
		self.write(module_name)?;
		if !parameters.is_empty() {
			self.write(" #(\n")?;
			for (index, (name, value)) in parameters.iter().enumerate() {
				self.write(&format!(
					"      .{}({}){}\n",
					name,
					value,
					if index == parameters.len() - 1 { "" } else { "," }
				))?;
			}
			self.write("  )")?;
		}

		self.write(&format!(" {} (", instance_name))?;
		if !ports.is_empty() {
			self.write("\n")?;
			for (index, (name, expr)) in ports.iter().enumerate() {
				self.write(&format!(
					"      .{} ({}){}\n",
					name,
					expr,
					if index == ports.len() - 1 { "" } else { "," }
				))?;
			}
			self.write("  ")?;
		}

		self.write(");\n")
	}
}
