use num_bigint::{BigInt, Sign};

/// Renders `value` as bare hex digits of a `width` bit two's complement word.
///
/// Values wider than `width` are truncated.
pub fn to_hex_literal(value: &BigInt, width: u64, signed: bool) -> String {
	let modulus = BigInt::from(1u8) << width;
	let mut masked = if signed { value + &modulus } else { value.clone() };
	masked %= &modulus;

	// Remainder keeps the sign of the dividend
	if masked.sign() == Sign::Minus {
		masked += &modulus;
	}

	masked.to_str_radix(16)
}

/// Renders `value` as a sized Verilog hex literal, e.g. `32'h4`
pub fn to_sized_hex(value: &BigInt, width: u64, signed: bool) -> String {
	format!("{}'h{}", width, to_hex_literal(value, width, signed))
}

#[cfg(test)]
mod test {
	use super::*;
	use rstest::rstest;

	#[rstest]
	#[case(-1, 40, "ffffffffff")]
	#[case(7, 2, "3")]
	#[case(4, 32, "4")]
	#[case(0, 8, "0")]
	#[case(-3, 4, "d")]
	#[case(0xfa, 5, "1a")]
	#[case(-40, 4, "8")]
	fn test_signed_hex(#[case] value: i64, #[case] width: u64, #[case] expected: &str) {
		assert_eq!(to_hex_literal(&value.into(), width, true), expected);
	}

	#[test]
	fn test_unsigned_hex_matches_signed_mask() {
		assert_eq!(to_hex_literal(&BigInt::from(-1), 8, false), "ff");
		assert_eq!(to_hex_literal(&BigInt::from(0x1234), 8, false), "34");
	}

	#[test]
	fn test_wide_negative_literal() {
		assert_eq!(
			to_sized_hex(&BigInt::from(-2), 257, true),
			"257'h1fffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffe"
		);
	}
}
