use log::debug;
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;
use wiregen::{Design, DesignError, GenContext, SignalId, SignalSource, MAX_WIDTH};

use crate::CliError;

/// Top level of a JSON register map
#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
pub struct RegisterMap {
	/// Address width used by registers that do not set their own
	pub address_width: Option<i64>,

	#[serde(default)]
	pub wires: Vec<WireConfig>,

	#[serde(default)]
	pub registers: Vec<RegisterConfig>,
}

/// Plain wire (`value`) or conditional wire (`condition`, `when_true`, `when_false`)
#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
pub struct WireConfig {
	pub name: Option<String>,
	pub width: Option<i64>,
	pub value: Option<Value>,
	pub condition: Option<Value>,
	pub when_true: Option<Value>,
	pub when_false: Option<Value>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
pub struct RegisterConfig {
	pub name: Option<String>,
	pub address: Option<u64>,
	pub width: Option<i64>,
	pub address_width: Option<i64>,
	#[serde(default)]
	pub readonly: bool,
}

fn describe(value: &Value) -> &'static str {
	match value {
		Value::Null => "null",
		Value::Bool(_) => "boolean",
		Value::Number(_) => "non-integer number",
		Value::String(_) => "string",
		Value::Array(_) => "array",
		Value::Object(_) => "object",
	}
}

fn ingest_width(width: Option<i64>) -> Result<Option<u64>, DesignError> {
	match width {
		None => Ok(None),
		Some(width) => match u64::try_from(width) {
			Ok(bits) if bits > 0 && bits <= MAX_WIDTH => Ok(Some(bits)),
			_ => Err(DesignError::InvalidWidth { width }),
		},
	}
}

/// Turns a JSON binding into a signal source. Wires may only refer to wires declared before them.
fn ingest_source(value: &Value, wires: &HashMap<String, SignalId>) -> Result<SignalSource, CliError> {
	let unsupported = || CliError::from(DesignError::UnsupportedBindingType(describe(value).into()));

	match value {
		Value::Number(number) => {
			if let Some(value) = number.as_i64() {
				Ok(value.into())
			}
			else if let Some(value) = number.as_u64() {
				Ok(value.into())
			}
			else {
				Err(unsupported())
			}
		},
		Value::String(text) => Ok(SignalSource::from(text.as_str())),
		Value::Object(fields) if fields.len() == 1 => match fields.get("wire") {
			Some(Value::String(name)) => wires
				.get(name)
				.map(|id| SignalSource::Signal(*id))
				.ok_or_else(|| CliError::UnknownWire(name.clone())),
			_ => Err(unsupported()),
		},
		_ => Err(unsupported()),
	}
}

impl WireConfig {
	fn is_conditional(&self) -> bool {
		self.condition.is_some() || self.when_true.is_some() || self.when_false.is_some()
	}

	fn build(&self, design: &mut Design, wires: &HashMap<String, SignalId>) -> Result<SignalId, CliError> {
		let width = ingest_width(self.width)?;
		let ingest = |value: &Option<Value>| value.as_ref().map(|v| ingest_source(v, wires)).transpose();

		if self.is_conditional() {
			if self.value.is_some() {
				return Err(CliError::AmbiguousWire(self.name.clone().unwrap_or_default()));
			}

			let mut builder = design.new_conditional();
			if let Some(name) = &self.name {
				builder = builder.name(name);
			}
			if let Some(width) = width {
				builder = builder.width(width);
			}
			if let Some(condition) = ingest(&self.condition)? {
				builder = builder.condition(condition);
			}
			if let Some(when_true) = ingest(&self.when_true)? {
				builder = builder.when_true(when_true);
			}
			if let Some(when_false) = ingest(&self.when_false)? {
				builder = builder.when_false(when_false);
			}
			Ok(builder.build()?)
		}
		else {
			let mut builder = design.new_signal();
			if let Some(name) = &self.name {
				builder = builder.name(name);
			}
			if let Some(width) = width {
				builder = builder.width(width);
			}
			if let Some(value) = ingest(&self.value)? {
				builder = builder.bind(value);
			}
			Ok(builder.build()?)
		}
	}
}

impl RegisterMap {
	/// Builds every wire, then every register bank, emitting each as soon as it is built
	pub fn generate(&self, ctx: &mut GenContext) -> Result<Design, CliError> {
		let mut design = Design::new();
		let mut wires = HashMap::new();
		let default_address_width = ingest_width(self.address_width)?;

		for wire in &self.wires {
			let id = wire.build(&mut design, &wires)?;
			design.generate_signal(ctx, id)?;

			if let Some(name) = design.get_signal(id).and_then(|s| s.name()) {
				debug!("Declared wire '{}'", name);
				wires.insert(name.to_string(), id);
			}
		}

		for register in &self.registers {
			let mut builder = design.new_register().readonly(register.readonly);
			if let Some(name) = &register.name {
				builder = builder.name(name);
			}
			if let Some(address) = register.address {
				builder = builder.address(address);
			}
			if let Some(width) = ingest_width(register.width)? {
				builder = builder.width(width);
			}
			if let Some(address_width) = ingest_width(register.address_width)?.or(default_address_width) {
				builder = builder.address_width(address_width);
			}

			let id = builder.build()?;
			design.generate_register(ctx, id)?;
		}

		Ok(design)
	}
}

#[cfg(test)]
mod test {
	use super::*;
	use rstest::rstest;
	use serde_json::json;
	use wiregen::{Keyword, VerilogEmitter};

	#[rstest]
	#[case(json!(12), SignalSource::from(12))]
	#[case(json!(-1), SignalSource::from(-1))]
	#[case(json!(u64::MAX), SignalSource::from(u64::MAX))]
	#[case(json!("High"), SignalSource::Keyword(Keyword::AllOnes))]
	#[case(json!("a & b"), SignalSource::Text("a & b".into()))]
	fn test_ingest_source(#[case] value: Value, #[case] expected: SignalSource) -> Result<(), CliError> {
		assert_eq!(ingest_source(&value, &HashMap::new())?, expected);
		Ok(())
	}

	#[rstest]
	#[case(json!(true), "boolean")]
	#[case(json!(1.5), "non-integer number")]
	#[case(json!([1, 2]), "array")]
	#[case(json!(null), "null")]
	#[case(json!({"signal": "foo"}), "object")]
	fn test_unsupported_binding(#[case] value: Value, #[case] kind: &str) {
		let result = ingest_source(&value, &HashMap::new());
		assert!(matches!(
			result,
			Err(CliError::DesignError(DesignError::UnsupportedBindingType(ref found))) if found == kind
		));
	}

	#[rstest]
	#[case(Some(0))]
	#[case(Some(-8))]
	#[case(Some(65537))]
	#[case(Some(i64::MAX))]
	fn test_invalid_width(#[case] width: Option<i64>) {
		assert!(matches!(ingest_width(width), Err(DesignError::InvalidWidth { .. })));
	}

	#[test]
	fn test_widest_width() -> Result<(), DesignError> {
		assert_eq!(ingest_width(Some(MAX_WIDTH as i64))?, Some(MAX_WIDTH));
		assert_eq!(ingest_width(None)?, None);
		Ok(())
	}

	#[test]
	fn test_generate_map() -> Result<(), CliError> {
		let map: RegisterMap = serde_json::from_value(json!({
			"address_width": 8,
			"wires": [
				{"name": "enable", "value": "high"},
				{"name": "gated", "width": 4, "condition": {"wire": "enable"}, "when_true": 3, "when_false": "zeros"}
			],
			"registers": [
				{"name": "command", "address": 4}
			]
		}))?;

		let mut source = String::new();
		let mut emitter = VerilogEmitter::new(&mut source);
		let mut ctx = GenContext::new(&mut emitter);
		let design = map.generate(&mut ctx)?;

		assert_eq!(design.registers().count(), 1);
		assert!(source.starts_with("wire enable;\nassign enable = 1'b1;\n"));
		assert!(source.contains("assign gated = (1'b1) ? 4'h3 : {(4){1'b0}};\n"));
		assert!(source.contains("(address[7:0] == 8'h4)"));
		Ok(())
	}

	#[test]
	fn test_ambiguous_wire() -> Result<(), CliError> {
		let map: RegisterMap = serde_json::from_value(json!({
			"wires": [{"name": "both", "value": 1, "condition": "x"}]
		}))?;

		let mut source = String::new();
		let mut emitter = VerilogEmitter::new(&mut source);
		let mut ctx = GenContext::new(&mut emitter);
		assert!(matches!(map.generate(&mut ctx), Err(CliError::AmbiguousWire(..))));
		Ok(())
	}
}
