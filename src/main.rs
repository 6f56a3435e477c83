extern crate wiregen;

mod config;

use chrono::Local;
use clap::{command, Arg, ArgAction};
use config::RegisterMap;
use log::info;
use miette::Diagnostic;
use std::fs;
use std::io;
use std::io::Write;
use thiserror::Error;
use wiregen::{CodegenError, DesignError, Emitter, GenContext, VerilogEmitter};

#[derive(Error, Diagnostic, Debug)]
pub enum CliError {
	#[error(transparent)]
	#[diagnostic(code(callie::io_error))]
	IoError(#[from] std::io::Error),

	#[error("Invalid register map: {0}")]
	#[diagnostic(
		code(callie::config),
		help("expected an object with optional 'address_width', 'wires' and 'registers' fields")
	)]
	ConfigError(#[from] serde_json::Error),

	#[error(transparent)]
	#[diagnostic(code(callie::design))]
	DesignError(#[from] DesignError),

	#[error(transparent)]
	#[diagnostic(code(callie::codegen))]
	CodegenError(#[from] CodegenError),

	#[error("Unknown wire '{0}'")]
	#[diagnostic(
		code(callie::config::unknown_wire),
		help("wires can only refer to named wires declared before them")
	)]
	UnknownWire(String),

	#[error("Wire '{0}' has both a value and a condition")]
	#[diagnostic(code(callie::config::ambiguous_wire))]
	AmbiguousWire(String),
}

fn generate(source_path: &str, content: &str, timestamp: bool) -> Result<String, CliError> {
	let map: RegisterMap = serde_json::from_str(content)?;

	let mut text = String::new();
	let mut emitter = VerilogEmitter::new(&mut text);
	emitter.comment(&format!("Generated by callie from {}", source_path))?;
	if timestamp {
		emitter.comment(&format!("Date: {}", Local::now().format("%Y-%m-%d %H:%M:%S")))?;
	}
	emitter.newline()?;

	let mut ctx = GenContext::new(&mut emitter);
	let design = map.generate(&mut ctx)?;
	info!(
		"Generated {} signals and {} registers from '{}'",
		design.signals().count(),
		design.registers().count(),
		source_path
	);

	Ok(text)
}

fn main() -> miette::Result<()> {
	env_logger::init();

	let matches = command!()
		.arg(Arg::new("source").required(true).help("JSON register map"))
		.arg(
			Arg::new("output")
				.short('o')
				.long("output")
				.help("Output file, standard output if not given"),
		)
		.arg(
			Arg::new("no-timestamp")
				.long("no-timestamp")
				.action(ArgAction::SetTrue)
				.help("Do not put the generation date in the header"),
		)
		.get_matches();

	let source_path = match matches.get_one::<String>("source") {
		None => "",
		Some(x) => x,
	};
	let timestamp = !matches.get_flag("no-timestamp");

	let content = fs::read_to_string(source_path).map_err(CliError::IoError)?;
	let text = generate(source_path, &content, timestamp)?;

	match matches.get_one::<String>("output") {
		None => io::stdout().write_all(text.as_bytes()).map_err(CliError::IoError)?,
		Some(path) => fs::write(path, text).map_err(CliError::IoError)?,
	}

	Ok(())
}
