//! The full formula pipeline: normalizing, parsing, rolling, and totalling a formula into a [`RollResult`].

use alloc::{string::String, vec::Vec};
use core::fmt;

#[cfg(feature = "logging")]
use log::debug;

use crate::{
	chat::{INVALID_FORMULA, ROLL_FAILED},
	dice::Roller,
	expr::{CalcError, EvalError, Expr},
	normalize::normalize,
	parse,
};

/// Outcome of rolling a formula
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub struct RollResult {
	/// Final total of the formula
	pub total: i32,

	/// Breakdown of every die and number in the formula, in source order (the groups joined by single spaces)
	pub rolls: String,

	/// Breakdown split into one entry per set of dice, number, and operator
	pub groups: Vec<String>,

	/// Normalized formula that was rolled
	pub formula: String,
}

impl fmt::Display for RollResult {
	/// Formats the value using the given formatter. [Read more][core::fmt::Debug::fmt()]
	///
	/// The output is the total followed by the breakdown in parentheses, such as `17 (6, 2d, 5, 6)`.
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{} ({})", self.total, self.rolls)
	}
}

/// Parses a formula after normalizing it.
fn parse_formula(formula: &str) -> Result<(String, Expr), Error> {
	let formula = normalize(formula)?;
	let expr = formula.parse::<Expr>()?;
	Ok((formula, expr))
}

/// Checks whether a formula would parse successfully, without rolling anything.
///
/// Rolls that fail only while evaluating (such as `1d2!` exploding past the limit) are not caught by this.
///
/// # Examples
/// ```
/// assert!(droll::validate("4d6kh3"));
/// assert!(droll::validate("d20"));
/// assert!(!droll::validate("4d6kh5"));
/// assert!(!droll::validate(""));
/// ```
#[must_use]
pub fn validate(formula: &str) -> bool {
	match parse_formula(formula) {
		Ok(..) => true,
		Err(_err) => {
			#[cfg(feature = "logging")]
			debug!("Invalid formula \"{formula}\": {_err}");
			false
		}
	}
}

/// Normalizes, parses, and rolls a formula with the given roller.
///
/// # Errors
/// If the formula is empty, too long, or fails to parse, or if rolling or totalling it fails, an error variant will
/// be returned.
///
/// # Examples
/// ```
/// use droll::dice::roller::Iter as IterRoller;
///
/// let result = droll::roll_using("4d6kh3 + 2", &mut IterRoller::new([6, 2, 5, 6]))?;
/// assert_eq!(result.total, 19);
/// assert_eq!(result.rolls, "6, 2d, 5, 6 + 2");
/// assert_eq!(result.to_string(), "19 (6, 2d, 5, 6 + 2)");
/// # Ok::<(), droll::Error>(())
/// ```
pub fn roll_using(formula: &str, rng: &mut impl Roller) -> Result<RollResult, Error> {
	let (formula, expr) = parse_formula(formula)?;
	#[cfg(feature = "logging")]
	debug!("Rolling \"{formula}\", parsed as {expr}");

	let evaled = expr.eval(rng)?;
	let total = evaled.calc()?;
	let groups = evaled.groups(None);
	let rolls = groups.join(" ");

	#[cfg(feature = "logging")]
	debug!("Rolled \"{formula}\": {total} ({rolls})");

	Ok(RollResult {
		total,
		rolls,
		groups,
		formula,
	})
}

/// Normalizes, parses, and rolls a formula with a freshly-seeded [`FastRand`](crate::dice::roller::FastRand) roller.
///
/// # Errors
/// See [`roll_using()`].
///
/// # Examples
/// ```
/// let result = droll::roll("2d6")?;
/// assert!((2..=12).contains(&result.total));
/// assert_eq!(result.formula, "2d6");
/// # Ok::<(), droll::Error>(())
/// ```
#[cfg(all(feature = "fastrand", feature = "std"))]
pub fn roll(formula: &str) -> Result<RollResult, Error> {
	roll_using(formula, &mut crate::dice::roller::FastRand::default())
}

/// Error that can occur while rolling a formula
#[derive(thiserror::Error, Debug)]
#[non_exhaustive]
pub enum Error {
	/// The formula was empty or only whitespace.
	#[error("empty dice formula")]
	EmptyInput,

	/// The formula was longer than the maximum allowed length.
	#[error("dice formula is {len} characters long, the maximum is {max}")]
	FormulaTooLong {
		/// Length of the formula in characters
		len: usize,

		/// Maximum allowed length
		max: usize,
	},

	/// The formula isn't valid dice notation.
	#[error("invalid dice formula: {0}")]
	Parse(#[from] parse::Error),

	/// Rolling the dice of the formula failed.
	#[error(transparent)]
	Eval(#[from] EvalError),

	/// Totalling the rolled formula failed.
	#[error(transparent)]
	Calc(#[from] CalcError),
}

impl Error {
	/// Checks whether the error was caused by the formula itself rather than by rolling it.
	#[must_use]
	pub const fn is_invalid_formula(&self) -> bool {
		matches!(self, Self::EmptyInput | Self::FormulaTooLong { .. } | Self::Parse(..))
	}

	/// Gets the sentinel reply a host shows for the error: [`INVALID_FORMULA`] when the formula itself is at fault,
	/// [`ROLL_FAILED`] otherwise.
	///
	/// # Examples
	/// ```
	/// use droll::dice::roller::Max as MaxRoller;
	///
	/// let err = droll::roll_using("4d6kh9", &mut MaxRoller).unwrap_err();
	/// assert_eq!(err.sentinel(), "[Invalid dice formula]");
	///
	/// let err = droll::roll_using("1d6!", &mut MaxRoller).unwrap_err();
	/// assert_eq!(err.sentinel(), "[Roll failed]");
	/// ```
	#[must_use]
	pub const fn sentinel(&self) -> &'static str {
		if self.is_invalid_formula() {
			INVALID_FORMULA
		} else {
			ROLL_FAILED
		}
	}
}
