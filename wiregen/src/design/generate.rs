use log::debug;

use super::signal::DEFAULT_WIRE_WIDTH;
use super::{Design, DesignError, GenContext, SignalId};

impl Design {
	/// Emits the declaration of a signal, followed by its assignment if it is bound
	pub fn generate_signal(&mut self, ctx: &mut GenContext, id: SignalId) -> Result<(), DesignError> {
		self.finalize_signal(ctx, id)?;

		let signal = self.signal(id)?;
		let name = signal.name().unwrap_or_default();
		let width = signal.width().unwrap_or(DEFAULT_WIRE_WIDTH);
		debug!("Generating signal '{}' ({} bits)", name, width);

		ctx.emitter().declare_wire(name, width)?;
		if signal.is_connected() {
			let value = self.resolve(id, None)?;
			ctx.emitter().assign(name, &value)?;
		}

		Ok(())
	}
}
