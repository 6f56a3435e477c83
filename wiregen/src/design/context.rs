use crate::codegen::Emitter;

/// A single generation session.
///
/// Holds the emitter every element writes through and the counters used
/// for synthetic names. Counters never leak between sessions.
pub struct GenContext<'a> {
	emitter: &'a mut dyn Emitter,
	wire_counter: usize,
	register_counter: usize,
}

impl<'a> GenContext<'a> {
	pub fn new(emitter: &'a mut dyn Emitter) -> Self {
		Self {
			emitter,
			wire_counter: 0,
			register_counter: 0,
		}
	}

	pub fn emitter(&mut self) -> &mut (dyn Emitter + 'a) {
		&mut *self.emitter
	}

	pub(crate) fn next_wire_name(&mut self) -> String {
		let name = format!("wire{}", self.wire_counter);
		self.wire_counter += 1;
		name
	}

	pub(crate) fn next_register_name(&mut self) -> String {
		let name = format!("reg{}", self.register_counter);
		self.register_counter += 1;
		name
	}
}
