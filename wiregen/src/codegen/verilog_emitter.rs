use super::{CodegenError, Emitter};
use std::fmt;

/// Emitter writing into any `fmt::Write` sink
pub struct VerilogEmitter<'a> {
	output_stream: &'a mut dyn fmt::Write,
}

impl<'a> VerilogEmitter<'a> {
	pub fn new(w: &'a mut dyn fmt::Write) -> Self {
		Self { output_stream: w }
	}
}

impl<'a> Emitter for VerilogEmitter<'a> {
	fn write(&mut self, text: &str) -> Result<(), CodegenError> {
		write!(self.output_stream, "{}", text)?;
		Ok(())
	}
}
