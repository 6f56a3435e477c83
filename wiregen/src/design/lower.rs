use log::{debug, error};
use petgraph::graphmap::DiGraphMap;
use std::collections::HashSet;

use super::signal::DEFAULT_WIRE_WIDTH;
use super::{ConditionalField, Design, DesignError, GenContext, Node, NodeId, Signal, SignalId, SignalKind, SignalSource};

impl Design {
	/// Fills in a missing name and width, then lowers the signal.
	///
	/// The name is locked afterwards. Repeated calls only validate the width again.
	pub fn finalize_signal(&mut self, ctx: &mut GenContext, id: SignalId) -> Result<(), DesignError> {
		let signal = self.signal_mut(id)?;
		if signal.node.name.is_none() {
			let name = ctx.next_wire_name();
			debug!("Naming anonymous signal {:?} '{}'", id, name);
			signal.node.name = Some(name);
		}

		let width = *signal.width.get_or_insert(DEFAULT_WIRE_WIDTH);
		if width == 0 {
			return Err(DesignError::InvalidWidth { width: 0 });
		}

		signal.finalized = true;
		self.lower(id)
	}

	/// Replaces every non-signal operand of the conditionals reachable from `id`
	/// with an anonymous child signal bound to it. Each operand is replaced at most once.
	pub fn lower(&mut self, id: SignalId) -> Result<(), DesignError> {
		let mut pending = vec![id];
		let mut visited = HashSet::new();

		while let Some(current) = pending.pop() {
			if !visited.insert(current) {
				continue;
			}

			self.coerce_operands(current)?;
			pending.extend(self.signal(current)?.dependencies());
		}

		self.check_acyclic(id)
	}

	fn coerce_operands(&mut self, id: SignalId) -> Result<(), DesignError> {
		let operands: Vec<(ConditionalField, SignalSource)> = match &self.signal(id)?.kind {
			SignalKind::Conditional(cond) => cond
				.operands()
				.filter(|(_, source)| source.signal().is_none())
				.map(|(field, source)| (field, source.clone()))
				.collect(),
			SignalKind::Plain(_) => return Ok(()),
		};

		for (field, source) in operands {
			let width = match field {
				ConditionalField::Condition => Some(1),
				ConditionalField::TrueBranch | ConditionalField::FalseBranch => None,
			};

			let node = Node {
				name: None,
				address: None,
				parent: Some(NodeId::Signal(id)),
			};

			let child = self.add_signal(Signal::new(node, width, SignalKind::Plain(Some(source))));
			debug!("Lowered {} of {:?} into {:?}", field, id, child);

			if let Some(cond) = self.signal_mut(id)?.conditional_mut() {
				cond.set(field, child);
			}
		}

		Ok(())
	}

	/// Makes sure no binding chain starting at `id` loops back on itself
	pub(super) fn check_acyclic(&self, id: SignalId) -> Result<(), DesignError> {
		let mut graph = DiGraphMap::<SignalId, ()>::new();
		let mut pending = vec![id];
		let mut visited = HashSet::new();

		while let Some(current) = pending.pop() {
			if !visited.insert(current) {
				continue;
			}

			graph.add_node(current);
			for dep in self.signal(current)?.dependencies() {
				graph.add_edge(current, dep, ());
				pending.push(dep);
			}
		}

		if petgraph::algo::is_cyclic_directed(&graph) {
			error!("Binding chain of signal {:?} is cyclic", id);
			return Err(DesignError::CyclicBinding(id));
		}

		Ok(())
	}
}
