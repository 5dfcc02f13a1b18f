//! Parser generators for generating [chumsky] parsers for dice notation and full dice expressions.
//!
//! All of the generators expect lowercase input. The [`FromStr`](core::str::FromStr) implementations for [`Dice`] and
//! [`Expr`] take care of lowercasing on their own.

use alloc::{boxed::Box, format, string::String, vec::Vec};
use core::str;

use chumsky::prelude::*;

use crate::{
	dice::{
		modifier::{Condition, Modifier},
		Dice, Sides,
	},
	expr::Expr,
};

/// Multiplicative operators, kept apart from [`Expr`] so that literal zero divisors can be rejected while folding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ProductOp {
	/// `*`
	Mul,

	/// `/`
	Div,
}

/// Checks whether an expression is a zero written out in the formula, such as `0`, `-0`, or `(0)`.
fn is_literal_zero(expr: &Expr) -> bool {
	match expr {
		Expr::Num(0) => true,
		Expr::Neg(inner) | Expr::Group(inner) => is_literal_zero(inner),
		_ => false,
	}
}

/// Generates a parser that specifically handles modifier conditions like "1", "=1", ">=5", "<3", etc.
fn condition<'src>() -> impl Parser<'src, &'src str, Condition, extra::Err<Rich<'src, char>>> + Clone {
	choice((
		just(">=").to(Condition::Gte as fn(i32) -> _),
		just("<=").to(Condition::Lte as fn(i32) -> _),
		just('>').to(Condition::Gt as fn(i32) -> _),
		just('<').to(Condition::Lt as fn(i32) -> _),
		just('=').to(Condition::Eq as fn(i32) -> _),
	))
	.or_not()
	.then(text::int(10))
	.try_map(|(condfn, val): (Option<fn(i32) -> Condition>, &str), span| {
		let val = val
			.parse()
			.map_err(|err| Rich::custom(span, format!("Modifier condition \"{val}\": {err}")))?;
		Ok(match condfn {
			Some(condfn) => condfn(val),
			None => Condition::Eq(val),
		})
	})
}

/// Generates a parser for the optional count operand of keep/drop modifiers, defaulting to 1.
fn selection_count<'src>(
	what: &'static str,
) -> impl Parser<'src, &'src str, u16, extra::Err<Rich<'src, char>>> + Clone {
	text::int(10).or_not().try_map(move |count: Option<&str>, span| {
		count
			.unwrap_or("1")
			.parse()
			.map_err(|err| Rich::custom(span, format!("{what} count: {err}")))
	})
}

/// Generates a parser for the value operand of min/max modifiers.
fn clamp_value<'src>(what: &'static str) -> impl Parser<'src, &'src str, i32, extra::Err<Rich<'src, char>>> + Clone {
	text::int(10).try_map(move |val: &str, span| {
		val.parse()
			.map_err(|err| Rich::custom(span, format!("{what} value \"{val}\": {err}")))
	})
}

/// Generates a parser that specifically handles dice modifiers like "kh3", "dl", "!", "r1", "rr<3", "min2", etc.
fn modifier<'src>() -> impl Parser<'src, &'src str, Modifier, extra::Err<Rich<'src, char>>> + Clone {
	choice((
		// Keep highest (e.g. kh, kh3, k3)
		just("kh")
			.ignore_then(selection_count("Keep highest"))
			.map(Modifier::KeepHigh),
		// Keep lowest (e.g. kl, kl2)
		just("kl")
			.ignore_then(selection_count("Keep lowest"))
			.map(Modifier::KeepLow),
		just('k')
			.ignore_then(selection_count("Keep highest"))
			.map(Modifier::KeepHigh),
		// Drop highest/lowest (e.g. dh, dl1)
		just("dh")
			.ignore_then(selection_count("Drop highest"))
			.map(Modifier::DropHigh),
		just("dl")
			.ignore_then(selection_count("Drop lowest"))
			.map(Modifier::DropLow),
		// Reroll dice (e.g. r, r1, rr1, r<=2)
		just("rr")
			.ignore_then(condition().or_not())
			.map(|cond| Modifier::Reroll { cond, recurse: true }),
		just('r')
			.ignore_then(condition().or_not())
			.map(|cond| Modifier::Reroll { cond, recurse: false }),
		// Exploding dice (e.g. !, !>4)
		just('!')
			.ignore_then(condition().or_not())
			.map(|cond| Modifier::Explode { cond }),
		// Clamp counted values (e.g. min3, max5)
		just("min").ignore_then(clamp_value("Minimum")).map(Modifier::Min),
		just("max").ignore_then(clamp_value("Maximum")).map(Modifier::Max),
	))
}

/// Generates a parser that specifically handles dice terms like "d20", "2d20kh", "8d6!", "4df", "d%", etc.
pub fn dice_part<'src>() -> impl Parser<'src, &'src str, Dice, extra::Err<Rich<'src, char>>> + Clone {
	// Parser for the kind of sides
	let sides = choice((
		just('f').to(Sides::Fate),
		just('%').to(Sides::Percentile),
		text::int(10).try_map(|sides: &str, span| {
			let sides: u16 = sides
				.parse()
				.map_err(|err| Rich::custom(span, format!("Dice sides \"{sides}\": {err}")))?;
			if sides == 0 {
				return Err(Rich::custom(span, "Dice sides \"0\": must be at least 1"));
			}
			Ok(Sides::Num(sides))
		}),
	));

	// Parser for dice expressions
	text::int(10)
		.or_not()
		.then_ignore(just('d'))
		.then(sides)
		.then(modifier().repeated().collect::<Vec<_>>())
		.try_map(|((count, sides), modifiers): ((Option<&str>, Sides), Vec<Modifier>), span| {
			let count_text = count.unwrap_or("1");
			let count: u16 = count_text
				.parse()
				.map_err(|err| Rich::custom(span, format!("Dice count \"{count_text}\": {err}")))?;
			if count == 0 {
				return Err(Rich::custom(span, "Dice count \"0\": must be at least 1"));
			}

			// Keep/drop modifiers can't select more dice than the set starts with
			for modifier in &modifiers {
				if let Some(selected) = modifier.selection_count() {
					if selected == 0 || selected > count {
						return Err(Rich::custom(
							span,
							format!("Modifier \"{modifier}\": count must be between 1 and {count}"),
						));
					}
				}
			}

			Ok(Dice {
				count,
				sides,
				modifiers,
			})
		})
}

/// Generates a parser that specifically handles dice terms like "d20", "2d20kh", "8d6!", etc.
/// and expects end of input
pub fn dice<'src>() -> impl Parser<'src, &'src str, Dice, extra::Err<Rich<'src, char>>> + Clone {
	dice_part().then_ignore(end())
}

/// Generates a parser that handles full expressions including mathematical operations, grouping with parentheses,
/// dice expressions, etc.
pub fn expr_part<'src>() -> impl Parser<'src, &'src str, Expr, extra::Err<Rich<'src, char>>> + Clone {
	// Helper function for operators
	let op = |c| just(c).padded();

	recursive(|expr| {
		// Parser for numbers
		let int = text::int(10).try_map(|num: &str, span| {
			num.parse()
				.map(Expr::Num)
				.map_err(|err| Rich::custom(span, format!("Number \"{num}\": {err}")))
		});

		// Parser for dice literals
		let dice = dice_part().map(Expr::Dice);

		// Parser for expressions enclosed in parentheses
		let atom = dice
			.or(int)
			.or(expr
				.delimited_by(just('('), just(')'))
				.map(|inner| Expr::Group(Box::new(inner))))
			.padded();

		// Parser for negative sign
		let unary = op('-').repeated().foldr(atom, |_op, rhs| Expr::Neg(Box::new(rhs)));

		// Parser for multiplication and division
		let product = unary
			.clone()
			.then(
				choice((op('*').to(ProductOp::Mul), op('/').to(ProductOp::Div)))
					.then(unary)
					.repeated()
					.collect::<Vec<_>>(),
			)
			.try_map(|(first, rest): (Expr, Vec<(ProductOp, Expr)>), span| {
				rest.into_iter().try_fold(first, |lhs, (op, rhs)| match op {
					ProductOp::Mul => Ok(Expr::Mul(Box::new(lhs), Box::new(rhs))),
					ProductOp::Div if is_literal_zero(&rhs) => {
						Err(Rich::custom(span, format!("Division of \"{lhs}\" by literal zero")))
					}
					ProductOp::Div => Ok(Expr::Div(Box::new(lhs), Box::new(rhs))),
				})
			});

		// Parser for addition and subtraction operators
		product.clone().foldl(
			choice((
				op('+').to(Expr::Add as fn(_, _) -> _),
				op('-').to(Expr::Sub as fn(_, _) -> _),
			))
			.then(product)
			.repeated(),
			|lhs, (op, rhs)| op(Box::new(lhs), Box::new(rhs)),
		)
	})
}

/// Generates a parser that handles full expressions including mathematical operations, grouping with parentheses,
/// dice expressions, etc. and expects end of input
pub fn expr<'src>() -> impl Parser<'src, &'src str, Expr, extra::Err<Rich<'src, char>>> + Clone {
	expr_part().then_ignore(end())
}

/// Error that can occur while parsing a string into a dice or expression-related structure via
/// [`FromStr`](core::str::FromStr)
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("{details}")]
pub struct Error {
	/// Description of what failed to parse, including the offending part of the input
	pub details: String,
}

impl Error {
	/// Builds an error out of every error chumsky reported while parsing the given input.
	fn from_rich(input: &str, errs: &[Rich<'_, char>]) -> Self {
		Self {
			details: errs
				.iter()
				.map(|err| {
					let span = err.span();
					let offending = input.get(span.start()..span.end()).unwrap_or_default();
					format!("{err} (near \"{offending}\")")
				})
				.collect::<Vec<_>>()
				.join("; "),
		}
	}
}

impl str::FromStr for Dice {
	type Err = Error;

	/// Parses a single set of dice.
	///
	/// # Examples
	/// ```
	/// use droll::dice::{Dice, Modifier};
	///
	/// let dice: Dice = "4D6kh3".parse()?;
	/// assert_eq!(dice, Dice::builder().count(4).sides(6).keep_high(3).build());
	/// assert!("4d6kh5".parse::<Dice>().is_err());
	/// # Ok::<(), droll::parse::Error>(())
	/// ```
	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let lc = s.to_lowercase();
		let result = dice()
			.parse(&lc)
			.into_result()
			.map_err(|errs| Error::from_rich(&lc, &errs));
		result
	}
}

impl str::FromStr for Expr {
	type Err = Error;

	/// Parses a full dice expression.
	///
	/// # Examples
	/// ```
	/// use droll::{dice::Dice, expr::Expr};
	///
	/// let expr: Expr = "1d20 + 5".parse()?;
	/// assert_eq!(expr, Expr::Add(Box::new(Expr::Dice(Dice::new(1, 20))), Box::new(Expr::Num(5))));
	/// assert!("1d20 +".parse::<Expr>().is_err());
	/// assert!("10 / 0".parse::<Expr>().is_err());
	/// # Ok::<(), droll::parse::Error>(())
	/// ```
	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let lc = s.to_lowercase();
		let result = expr()
			.parse(&lc)
			.into_result()
			.map_err(|errs| Error::from_rich(&lc, &errs));
		result
	}
}
