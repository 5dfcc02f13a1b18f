//! Rewriting of shorthand formulas into canonical dice notation before they reach the parser.

use alloc::{format, string::String};

use crate::Error;

/// Longest formula (in characters, after trimming and quote removal) that will be accepted
pub const MAX_FORMULA_LEN: usize = 100;

/// Normalizes a formula into canonical dice notation.
///
/// Surrounding whitespace and any quote characters are removed and the formula is lowercased. Then a bare number `N`
/// becomes `1dN`, and a formula starting with `d` and a digit gets a count of `1` prepended. Everything else (such as
/// `1+2`) passes through as-is.
///
/// # Errors
/// If the formula is empty after trimming, [`Error::EmptyInput`] is returned. If it's longer than
/// [`MAX_FORMULA_LEN`] characters, [`Error::FormulaTooLong`] is returned.
///
/// # Examples
/// ```
/// use droll::normalize::normalize;
///
/// assert_eq!(normalize("20")?, "1d20");
/// assert_eq!(normalize("d20+5")?, "1d20+5");
/// assert_eq!(normalize(" \"2d6\" ")?, "2d6");
/// assert_eq!(normalize("D20")?, "1d20");
/// assert_eq!(normalize("1+2")?, "1+2");
/// assert!(normalize("   ").is_err());
/// # Ok::<(), droll::Error>(())
/// ```
pub fn normalize(input: &str) -> Result<String, Error> {
	let unquoted = input.replace(['\'', '"'], "");
	let formula = unquoted.trim();
	if formula.is_empty() {
		return Err(Error::EmptyInput);
	}

	let len = formula.chars().count();
	if len > MAX_FORMULA_LEN {
		#[cfg(feature = "logging")]
		log::warn!("Formula too long ({len} characters): \"{formula}\"");
		return Err(Error::FormulaTooLong {
			len,
			max: MAX_FORMULA_LEN,
		});
	}

	let formula = formula.to_lowercase();
	if formula.bytes().all(|b| b.is_ascii_digit()) {
		return Ok(format!("1d{formula}"));
	}

	let bare_die = formula
		.strip_prefix('d')
		.is_some_and(|rest| rest.starts_with(|c: char| c.is_ascii_digit()));
	if bare_die {
		return Ok(format!("1{formula}"));
	}

	Ok(formula)
}
