use log::debug;
use num_bigint::BigInt;

use super::utils::{bytes_for_width, is_name_valid};
use super::{normalize_width, Design, DesignError, GenContext, Keyword, Node, NodeId, RegisterId, SignalSource};
use crate::codegen::to_sized_hex;

pub const DEFAULT_REGISTER_WIDTH: u64 = 32;
pub const DEFAULT_ADDRESS_WIDTH: u64 = 32;

/// Register module every bank instantiates
const REGISTER_MODULE: &str = "callie_reg";

const BANNER: &str = "********************************";

/// Single addressable register on the bus
#[derive(Clone, Debug)]
pub struct RegisterBank {
	/// Self-reference
	pub(super) id: RegisterId,

	pub(super) node: Node,

	/// Data width in bits
	width: Option<u64>,

	/// Width of the address bus
	address_width: Option<u64>,

	/// Ignores bus writes
	readonly: bool,

	/// Derived from the width on every finalization
	width_in_bytes: u64,
}

impl RegisterBank {
	fn new(node: Node, width: Option<u64>, address_width: Option<u64>, readonly: bool) -> Self {
		Self {
			id: RegisterId { id: 0 },
			node,
			width,
			address_width,
			readonly,
			width_in_bytes: 0,
		}
	}

	pub fn id(&self) -> RegisterId {
		self.id
	}

	pub fn node(&self) -> &Node {
		&self.node
	}

	pub fn name(&self) -> Option<&str> {
		self.node.name()
	}

	pub fn address(&self) -> Option<u64> {
		self.node.address()
	}

	pub fn width(&self) -> Option<u64> {
		self.width
	}

	pub fn address_width(&self) -> Option<u64> {
		self.address_width
	}

	pub fn is_readonly(&self) -> bool {
		self.readonly
	}

	/// Number of bytes the register spans. Only valid after finalization.
	pub fn width_in_bytes(&self) -> u64 {
		self.width_in_bytes
	}

	pub fn set_name(&mut self, name: &str) -> Result<(), DesignError> {
		if !is_name_valid(name) {
			return Err(DesignError::InvalidName);
		}

		self.node.name = Some(name.into());
		Ok(())
	}

	pub fn set_width(&mut self, width: Option<u64>) {
		self.width = width;
	}

	pub fn set_address_width(&mut self, address_width: Option<u64>) {
		self.address_width = address_width;
	}

	pub fn set_address(&mut self, address: Option<u64>) {
		self.node.address = address;
	}

	pub fn set_readonly(&mut self, readonly: bool) {
		self.readonly = readonly;
	}
}

/// Register bank builder helper
pub struct RegisterBuilder<'a> {
	design: &'a mut Design,
	name: Option<String>,
	address: Option<u64>,
	parent: Option<NodeId>,
	width: Option<u64>,
	address_width: Option<u64>,
	readonly: bool,
}

impl<'a> RegisterBuilder<'a> {
	pub fn new(design: &'a mut Design) -> Self {
		Self {
			design,
			name: None,
			address: None,
			parent: None,
			width: None,
			address_width: None,
			readonly: false,
		}
	}

	pub fn name(mut self, name: &str) -> Self {
		self.name = Some(name.into());
		self
	}

	/// Sets the bus address. Registers without one are always selected.
	pub fn address(mut self, address: u64) -> Self {
		self.address = Some(address);
		self
	}

	pub fn parent(mut self, parent: NodeId) -> Self {
		self.parent = Some(parent);
		self
	}

	pub fn width(mut self, width: u64) -> Self {
		self.width = Some(width);
		self
	}

	pub fn address_width(mut self, address_width: u64) -> Self {
		self.address_width = Some(address_width);
		self
	}

	pub fn readonly(mut self, readonly: bool) -> Self {
		self.readonly = readonly;
		self
	}

	/// Creates the register bank and adds it to the design
	pub fn build(self) -> Result<RegisterId, DesignError> {
		if let Some(name) = &self.name {
			if !is_name_valid(name) {
				return Err(DesignError::InvalidName);
			}
		}

		let node = Node {
			name: self.name,
			address: self.address,
			parent: self.parent,
		};

		Ok(self
			.design
			.add_register(RegisterBank::new(node, self.width, self.address_width, self.readonly)))
	}
}

impl Design {
	/// Fills in missing name, width and address width and recomputes the byte width
	pub fn finalize_register(&mut self, ctx: &mut GenContext, id: RegisterId) -> Result<(), DesignError> {
		let reg = self.register_mut(id)?;
		if reg.node.name.is_none() {
			reg.node.name = Some(ctx.next_register_name());
		}

		let width = *reg.width.get_or_insert(DEFAULT_REGISTER_WIDTH);
		if width == 0 {
			return Err(DesignError::InvalidWidth { width: 0 });
		}
		reg.width_in_bytes = bytes_for_width(width);

		let address_width = *reg.address_width.get_or_insert(DEFAULT_ADDRESS_WIDTH);
		if address_width == 0 {
			return Err(DesignError::InvalidWidth { width: 0 });
		}

		Ok(())
	}

	/// Emits the read data wire, the chip select logic and the register module instance
	pub fn generate_register(&mut self, ctx: &mut GenContext, id: RegisterId) -> Result<(), DesignError> {
		self.finalize_register(ctx, id)?;

		let reg = self.register(id)?;
		let name = reg.name().unwrap_or_default().to_string();
		let width = reg.width().unwrap_or(DEFAULT_REGISTER_WIDTH);
		let address_width = reg.address_width().unwrap_or(DEFAULT_ADDRESS_WIDTH);
		let address = reg.address();
		let readonly = reg.is_readonly();
		let padded_width = reg.width_in_bytes() * 8;
		let owner = NodeId::Register(id);
		debug!("Generating register '{}' ({} bits, address {:?})", name, width, address);

		ctx.emitter().newline()?;
		ctx.emitter().comment(BANNER)?;
		ctx.emitter().comment(&format!("Register: {}", name))?;
		if let Some(address) = address {
			ctx.emitter().comment(&format!("Address: {:#x}", address))?;
		}

		// Driven by the register instance
		let read_data = self.new_signal().name(&name).width(width).parent(owner).build()?;
		self.generate_signal(ctx, read_data)?;

		let chip_select_name = format!("{}_chip_select", name);
		let chip_select = self.new_signal().name(&chip_select_name).parent(owner).build()?;
		let select_source = match address {
			Some(address) => {
				let address_bus = self
					.new_signal()
					.name("address")
					.width(address_width)
					.parent(owner)
					.build()?;
				let condition = format!(
					"{} == {}",
					self.name_or_value(address_bus, Some(address_width))?,
					to_sized_hex(&BigInt::from(address), address_width, false)
				);
				let selector = self
					.new_conditional()
					.parent(chip_select.into())
					.condition(SignalSource::Text(condition))
					.when_true("one")
					.when_false("zero")
					.build()?;
				SignalSource::Signal(selector)
			},
			None => SignalSource::from("true"),
		};
		self.signal_mut(chip_select)?.bind(select_source);
		self.generate_signal(ctx, chip_select)?;

		ctx.emitter().newline()?;

		let writedata = if padded_width != width {
			normalize_width("writedata", Some(padded_width), Some(width))
		}
		else {
			"writedata".into()
		};

		let write = if readonly {
			Keyword::AllZeros.to_verilog(Some(1))
		}
		else {
			"write".into()
		};

		let parameters = vec![("REGISTER_SIZE".to_string(), padded_width.to_string())];
		let ports: Vec<(String, String)> = vec![
			("clock".into(), "clk".into()),
			("resetn".into(), "resetn".into()),
			("write".into(), write),
			("chip_select".into(), chip_select_name),
			("byteenable".into(), format!("byteenable[{}:0]", padded_width / 8 - 1)),
			("writedata".into(), writedata),
			("read_data".into(), name.clone()),
		];

		ctx.emitter()
			.instantiate_module(REGISTER_MODULE, &format!("{}_register", name), &ports, &parameters)?;
		ctx.emitter().comment(BANNER)?;
		ctx.emitter().newline()?;
		Ok(())
	}
}

#[cfg(test)]
mod test {
	use super::*;
	use crate::codegen::VerilogEmitter;
	use rstest::rstest;

	fn generate<F>(build: F) -> Result<String, DesignError>
	where
		F: FnOnce(&mut Design) -> Result<RegisterId, DesignError>,
	{
		let mut source = String::new();
		let mut emitter = VerilogEmitter::new(&mut source);
		let mut ctx = GenContext::new(&mut emitter);
		let mut d = Design::new();

		let reg = build(&mut d)?;
		d.generate_register(&mut ctx, reg)?;
		Ok(source)
	}

	#[rstest]
	#[case(None, 32, 4)]
	#[case(Some(31), 31, 4)]
	#[case(Some(1), 1, 1)]
	#[case(Some(8), 8, 1)]
	#[case(Some(10), 10, 2)]
	#[case(Some(256), 256, 32)]
	fn test_width_in_bytes(
		#[case] width: Option<u64>,
		#[case] expected_width: u64,
		#[case] expected_bytes: u64,
	) -> Result<(), DesignError> {
		let mut source = String::new();
		let mut emitter = VerilogEmitter::new(&mut source);
		let mut ctx = GenContext::new(&mut emitter);
		let mut d = Design::new();

		let reg = d.new_register().build()?;
		d.get_register_mut(reg).ok_or(DesignError::InvalidRegisterId(reg))?.set_width(width);
		d.finalize_register(&mut ctx, reg)?;

		let bank = d.get_register(reg).ok_or(DesignError::InvalidRegisterId(reg))?;
		assert_eq!(bank.width(), Some(expected_width));
		assert_eq!(bank.width_in_bytes(), expected_bytes);
		assert_eq!(bank.address_width(), Some(DEFAULT_ADDRESS_WIDTH));
		Ok(())
	}

	#[test]
	fn test_register_defaults() -> Result<(), DesignError> {
		let mut source = String::new();
		let mut emitter = VerilogEmitter::new(&mut source);
		let mut ctx = GenContext::new(&mut emitter);
		let mut d = Design::new();

		let first = d.new_register().build()?;
		let second = d.new_register().build()?;
		let wire = d.new_signal().build()?;
		d.finalize_register(&mut ctx, first)?;
		d.finalize_register(&mut ctx, second)?;
		d.finalize_signal(&mut ctx, wire)?;

		assert_eq!(d.get_register(first).and_then(|r| r.name()), Some("reg0"));
		assert_eq!(d.get_register(second).and_then(|r| r.name()), Some("reg1"));
		assert_eq!(d.get_signal(wire).and_then(|s| s.name()), Some("wire0"));
		Ok(())
	}

	#[test]
	fn test_zero_width_register() {
		let result = generate(|d| d.new_register().name("broken").width(0).build());
		assert!(matches!(result, Err(DesignError::InvalidWidth { width: 0 })));
	}

	#[test]
	fn test_addressed_register() -> Result<(), DesignError> {
		let source = generate(|d| d.new_register().name("command").address(0x04).build())?;
		assert_eq!(
			source,
			"\n\
			// ********************************\n\
			// Register: command\n\
			// Address: 0x4\n\
			wire [31:0] command;\n\
			wire command_chip_select;\n\
			assign command_chip_select = (address[31:0] == 32'h4) ? 1'b1 : 1'b0[0];\n\
			\n\
			callie_reg #(\n      .REGISTER_SIZE(32)\n  ) command_register (\n\
			\x20     .clock (clk),\n\
			\x20     .resetn (resetn),\n\
			\x20     .write (write),\n\
			\x20     .chip_select (command_chip_select),\n\
			\x20     .byteenable (byteenable[3:0]),\n\
			\x20     .writedata (writedata),\n\
			\x20     .read_data (command)\n\
			\x20 );\n\
			// ********************************\n\
			\n"
		);
		Ok(())
	}

	#[test]
	fn test_unaddressed_register_is_always_selected() -> Result<(), DesignError> {
		let source = generate(|d| d.new_register().build())?;
		assert!(source.contains("// Register: reg0\n"));
		assert!(!source.contains("Address"));
		assert!(source.contains("assign reg0_chip_select = 1'b1;\n"));
		Ok(())
	}

	#[test]
	fn test_register_at_address_zero() -> Result<(), DesignError> {
		let source = generate(|d| d.new_register().name("ctrl").address(0).address_width(3).build())?;
		assert!(source.contains("// Address: 0x0\n"));
		assert!(source.contains("assign ctrl_chip_select = (address[2:0] == 3'h0) ? 1'b1 : 1'b0[0];\n"));
		Ok(())
	}

	#[test]
	fn test_unaligned_register() -> Result<(), DesignError> {
		let source = generate(|d| d.new_register().name("narrow").width(10).address(8).build())?;
		assert!(source.contains("wire [9:0] narrow;\n"));
		assert!(source.contains(".REGISTER_SIZE(16)\n"));
		assert!(source.contains(".byteenable (byteenable[1:0]),\n"));
		assert!(source.contains(".writedata ({{(16-10){1'b0}}, writedata[9:0]}),\n"));
		Ok(())
	}

	#[test]
	fn test_wide_register() -> Result<(), DesignError> {
		let source = generate(|d| {
			d.new_register()
				.name("widereg")
				.width(256)
				.address_width(10)
				.address(0x3ff)
				.build()
		})?;
		assert!(source.contains("wire [255:0] widereg;\n"));
		assert!(source.contains("(address[9:0] == 10'h3ff)"));
		assert!(source.contains(".byteenable (byteenable[31:0]),\n"));
		assert!(source.contains(".writedata (writedata),\n"));
		Ok(())
	}

	#[test]
	fn test_readonly_register() -> Result<(), DesignError> {
		let source = generate(|d| d.new_register().name("status").readonly(true).build())?;
		assert!(source.contains(".write (1'b0),\n"));
		Ok(())
	}

	#[test]
	fn test_register_owns_its_signals() -> Result<(), DesignError> {
		let mut source = String::new();
		let mut emitter = VerilogEmitter::new(&mut source);
		let mut ctx = GenContext::new(&mut emitter);
		let mut d = Design::new();

		let reg = d.new_register().name("command").address(4).build()?;
		d.generate_register(&mut ctx, reg)?;

		let names: Vec<_> = d
			.children(reg.into())
			.into_iter()
			.filter_map(|child| match child {
				NodeId::Signal(id) => d.get_signal(id).and_then(|s| s.name()).map(String::from),
				NodeId::Register(_) => None,
			})
			.collect();
		assert_eq!(names, vec!["command", "command_chip_select", "address"]);
		Ok(())
	}

	#[test]
	fn test_regenerate_with_new_widths() -> Result<(), DesignError> {
		let mut source = String::new();
		let mut emitter = VerilogEmitter::new(&mut source);
		let mut ctx = GenContext::new(&mut emitter);
		let mut d = Design::new();

		let reg = d.new_register().name("command").address(4).build()?;
		d.generate_register(&mut ctx, reg)?;

		let bank = d.get_register_mut(reg).ok_or(DesignError::InvalidRegisterId(reg))?;
		bank.set_width(Some(10));
		bank.set_address_width(Some(3));
		d.generate_register(&mut ctx, reg)?;

		let bank = d.get_register(reg).ok_or(DesignError::InvalidRegisterId(reg))?;
		assert_eq!(bank.address_width(), Some(3));
		assert_eq!(bank.width_in_bytes(), 2);
		Ok(())
	}
}
