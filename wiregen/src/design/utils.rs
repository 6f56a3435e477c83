use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
	static ref VALID_ID_REGEX: Regex = Regex::new(r"^[a-zA-Z_][0-9a-zA-Z_]*$").unwrap();
}

/// Checks if given name is a valid Verilog identifier
pub(super) fn is_name_valid(name: &str) -> bool {
	VALID_ID_REGEX.is_match(name)
}

/// Number of whole bytes needed to hold `width` bits
pub(super) fn bytes_for_width(width: u64) -> u64 {
	(width + 7) / 8
}

#[cfg(test)]
mod test {
	use super::*;

	#[test]
	fn test_valid_names() {
		assert!(is_name_valid("command"));
		assert!(is_name_valid("wire12"));
		assert!(is_name_valid("status_chip_select"));
		assert!(is_name_valid("_reg__7"));
	}

	#[test]
	fn test_invalid_names() {
		assert!(!is_name_valid("$clk"));
		assert!(!is_name_valid("1wire"));
		assert!(!is_name_valid("chip-select"));
		assert!(!is_name_valid("read data"));
		assert!(!is_name_valid(""));
	}

	#[test]
	fn test_bytes_for_width() {
		assert_eq!(bytes_for_width(1), 1);
		assert_eq!(bytes_for_width(8), 1);
		assert_eq!(bytes_for_width(9), 2);
		assert_eq!(bytes_for_width(31), 4);
		assert_eq!(bytes_for_width(256), 32);
	}
}
