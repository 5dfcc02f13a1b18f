//! AST-like data structures for evaluating full mathematical dice expressions and working with their results.

use alloc::{
	boxed::Box,
	format,
	string::{String, ToString},
	vec,
	vec::Vec,
};
use core::fmt;

use crate::dice::{roller::Roller, Dice, Error as DiceError, Rolled, Sides};

/// Generates an implementation of [`HasOpType`] for an enum type.
/// This is very tightly coupled with the expected variants:
/// `Num`, `Dice`, `Group`, `Neg`, `Add`, `Sub`, `Mul`, and `Div`.
macro_rules! op_type_impl {
	($name:ty) => {
		impl HasOpType for $name {
			fn op_type(&self) -> OpType {
				match self {
					Self::Num(..) | Self::Dice(..) | Self::Group(..) => OpType::Value,
					Self::Neg(..) => OpType::Unary,
					Self::Add(..) | Self::Sub(..) => OpType::Additive,
					Self::Mul(..) | Self::Div(..) => OpType::Multiplicative,
				}
			}

			fn is_value(&self) -> bool {
				matches!(self, Self::Num(..) | Self::Dice(..) | Self::Group(..))
			}

			fn is_unary(&self) -> bool {
				matches!(self, Self::Neg(..))
			}

			fn is_additive(&self) -> bool {
				matches!(self, Self::Add(..) | Self::Sub(..))
			}

			fn is_multiplicative(&self) -> bool {
				matches!(self, Self::Mul(..) | Self::Div(..))
			}

			fn is_left_assoc_only(&self) -> bool {
				matches!(self, Self::Sub(..) | Self::Div(..))
			}
		}
	};
}

/// Individual elements of a full mathematical dice expression
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum Expr {
	/// Standalone integer
	Num(i32),

	/// Dice literal
	Dice(Dice),

	/// Expression that was enclosed in parentheses
	Group(Box<Self>),

	/// Negation of an expression (makes the result of it negative)
	Neg(Box<Self>),

	/// Sum of two expressions
	Add(Box<Self>, Box<Self>),

	/// Difference of two expressions
	Sub(Box<Self>, Box<Self>),

	/// Product of two expressions
	Mul(Box<Self>, Box<Self>),

	/// Integer quotient of two expressions (truncated toward zero)
	Div(Box<Self>, Box<Self>),
}

op_type_impl!(Expr);

impl Expr {
	/// Evaluates the expression depth-first, left to right. For most types of expressions, this will directly result
	/// in a 1:1 equivalent [`Evaled`], with the notable exception of [`Expr::Dice`]. For dice expressions, the dice
	/// they contain are rolled, resulting in an [`Evaled::Dice`] with the [`Rolled`] set of dice.
	///
	/// # Errors
	/// If an error occurs during dice rolling (such as exceeding the explosion limit), an error variant will be
	/// returned.
	///
	/// # Examples
	/// ```
	/// use droll::{dice::{roller::Iter as IterRoller, Dice}, expr::{Describe, Expr}};
	///
	/// let expr = Expr::Add(Box::new(Expr::Dice(Dice::new(1, 20))), Box::new(Expr::Num(5)));
	/// let evaled = expr.eval(&mut IterRoller::new([14]))?;
	/// assert_eq!(evaled.calc()?, 19);
	/// assert_eq!(evaled.describe(None), "14 + 5");
	/// # Ok::<(), Box<dyn std::error::Error>>(())
	/// ```
	pub fn eval(&self, rng: &mut impl Roller) -> Result<Evaled<'_>, EvalError> {
		Ok(match self {
			Self::Num(x) => Evaled::Num(*x),
			Self::Dice(dice) => Evaled::Dice(rng.roll(dice, true).map_err(|err| EvalError::Dice(self.clone(), err))?),

			Self::Group(x) => Evaled::Group(Box::new(x.eval(rng)?)),
			Self::Neg(x) => Evaled::Neg(Box::new(x.eval(rng)?)),

			Self::Add(a, b) => Evaled::Add(Box::new(a.eval(rng)?), Box::new(b.eval(rng)?)),
			Self::Sub(a, b) => Evaled::Sub(Box::new(a.eval(rng)?), Box::new(b.eval(rng)?)),
			Self::Mul(a, b) => Evaled::Mul(Box::new(a.eval(rng)?), Box::new(b.eval(rng)?)),
			Self::Div(a, b) => Evaled::Div(Box::new(a.eval(rng)?), Box::new(b.eval(rng)?)),
		})
	}

	/// Checks whether the expression is deterministic (will always yield the same value with every evaluation).
	/// A [`Self::Num`] will always return `true`, a [`Self::Dice`] will always return `false` unless the dice they
	/// contain only have one side, and all unary and binary expressions forward the check to their children.
	#[must_use]
	pub fn is_deterministic(&self) -> bool {
		match self {
			Self::Num(..) => true,
			Self::Dice(dice) => dice.sides == Sides::Num(1),
			Self::Group(x) | Self::Neg(x) => x.is_deterministic(),
			Self::Add(a, b) | Self::Sub(a, b) | Self::Mul(a, b) | Self::Div(a, b) => {
				a.is_deterministic() && b.is_deterministic()
			}
		}
	}
}

impl Describe for Expr {
	/// Builds a full usable expression string from the expressions. Parenthesised groups are written as they were
	/// parsed, and further parentheses are only added where the order of operations would otherwise change the layout
	/// (such as a sum inside a product built by hand). All strings output from this should result in the exact same
	/// expression layout when re-parsing them.
	///
	/// `list_limit` does not affect the output of this implementation in any way since there are no possible lists of
	/// elements included, so it is always safe to pass `None`.
	fn describe(&self, _list_limit: Option<usize>) -> String {
		match self {
			Self::Num(x) => x.to_string(),
			Self::Dice(dice) => dice.to_string(),

			Self::Group(x) => format!("({})", x.describe(None)),
			Self::Neg(x) => format!("-{}", paren_wrap(x.describe(None), x.is_binary())),

			Self::Add(a, b) => self.describe_binary_expr('+', a.as_ref(), b.as_ref()),
			Self::Sub(a, b) => self.describe_binary_expr('-', a.as_ref(), b.as_ref()),
			Self::Mul(a, b) => self.describe_binary_expr('*', a.as_ref(), b.as_ref()),
			Self::Div(a, b) => self.describe_binary_expr('/', a.as_ref(), b.as_ref()),
		}
	}
}

impl fmt::Display for Expr {
	/// Formats the value using the given formatter. [Read more][core::fmt::Debug::fmt()]
	///
	/// The output of this implementation is equivalent to [`Self::describe(None)`].
	///
	/// [`Self::describe(None)`]: Self::describe()
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.describe(None))
	}
}

/// Individual elements of an evaluated mathematical dice expression
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum Evaled<'a> {
	/// Standalone integer
	Num(i32),

	/// Rolled dice
	Dice(Rolled<'a>),

	/// Evaluated expression that was enclosed in parentheses
	Group(Box<Self>),

	/// Negation of an expression (makes the result of it negative)
	Neg(Box<Self>),

	/// Sum of two expressions
	Add(Box<Self>, Box<Self>),

	/// Difference of two expressions
	Sub(Box<Self>, Box<Self>),

	/// Product of two expressions
	Mul(Box<Self>, Box<Self>),

	/// Integer quotient of two expressions (truncated toward zero)
	Div(Box<Self>, Box<Self>),
}

op_type_impl!(Evaled<'_>);

impl Evaled<'_> {
	/// Calculates the final result of the evaluated expression and all of its children (if any).
	///
	/// # Errors
	/// If there is an integer overflow or division error, or an error calculating the total of a set of dice rolls, an
	/// error variant will be returned.
	pub fn calc(&self) -> Result<i32, CalcError> {
		match self {
			Self::Num(x) => Ok(*x),
			Self::Dice(rolled) => rolled
				.total()
				.map_err(|err| CalcError::Dice(self.clone().into_owned(), err)),

			Self::Group(x) => x.calc(),
			Self::Neg(x) => x
				.calc()?
				.checked_neg()
				.ok_or_else(|| CalcError::Overflow(self.clone().into_owned())),

			Self::Add(a, b) => a
				.calc()?
				.checked_add(b.calc()?)
				.ok_or_else(|| CalcError::Overflow(self.clone().into_owned())),
			Self::Sub(a, b) => a
				.calc()?
				.checked_sub(b.calc()?)
				.ok_or_else(|| CalcError::Overflow(self.clone().into_owned())),
			Self::Mul(a, b) => a
				.calc()?
				.checked_mul(b.calc()?)
				.ok_or_else(|| CalcError::Overflow(self.clone().into_owned())),
			Self::Div(a, b) => a
				.calc()?
				.checked_div(b.calc()?)
				.ok_or_else(|| CalcError::Division(self.clone().into_owned())),
		}
	}

	/// Builds the roll breakdown of the evaluated expression as a list of groups in source order: one group per
	/// number or set of rolled dice, and one per binary operator between them. Parenthesised and negated
	/// sub-expressions have their parentheses and sign attached to their first and last groups, so joining the groups
	/// with a single space results in the same text as [`Self::describe()`].
	///
	/// # Examples
	/// ```
	/// use droll::{dice::roller::Iter as IterRoller, expr::Expr};
	///
	/// let expr: Expr = "(2d6kh1 + 2) * 3".parse()?;
	/// let evaled = expr.eval(&mut IterRoller::new([4, 1]))?;
	/// assert_eq!(evaled.groups(None), ["(4, 1d", "+", "2)", "*", "3"]);
	/// # Ok::<(), Box<dyn std::error::Error>>(())
	/// ```
	#[must_use]
	pub fn groups(&self, list_limit: Option<usize>) -> Vec<String> {
		match self {
			Self::Num(x) => vec![x.to_string()],
			Self::Dice(rolled) => vec![rolled.describe(list_limit)],

			Self::Group(x) => wrap_groups(x.groups(list_limit), true),
			Self::Neg(x) => {
				let mut groups = wrap_groups(x.groups(list_limit), x.is_binary());
				if let Some(first) = groups.first_mut() {
					first.insert(0, '-');
				}
				groups
			}

			Self::Add(a, b) => self.binary_groups('+', a.as_ref(), b.as_ref(), list_limit),
			Self::Sub(a, b) => self.binary_groups('-', a.as_ref(), b.as_ref(), list_limit),
			Self::Mul(a, b) => self.binary_groups('*', a.as_ref(), b.as_ref(), list_limit),
			Self::Div(a, b) => self.binary_groups('/', a.as_ref(), b.as_ref(), list_limit),
		}
	}

	/// Builds the groups for a binary expression, adding parentheses around operands that need them.
	fn binary_groups(&self, op: char, a: &Self, b: &Self, list_limit: Option<usize>) -> Vec<String> {
		let mut groups = wrap_groups(a.groups(list_limit), needs_parens(self, a, false));
		groups.push(op.to_string());
		groups.extend(wrap_groups(b.groups(list_limit), needs_parens(self, b, true)));
		groups
	}

	/// Moves all of self's owned data into a new instance and clones any unowned data in order to create a `'static`
	/// instance of self.
	#[must_use]
	pub fn into_owned(self) -> Evaled<'static> {
		match self {
			Self::Num(x) => Evaled::Num(x),
			Self::Dice(rolled) => Evaled::Dice(rolled.into_owned()),
			Self::Group(x) => Evaled::Group(Box::new(x.into_owned())),
			Self::Neg(x) => Evaled::Neg(Box::new(x.into_owned())),
			Self::Add(a, b) => Evaled::Add(Box::new(a.into_owned()), Box::new(b.into_owned())),
			Self::Sub(a, b) => Evaled::Sub(Box::new(a.into_owned()), Box::new(b.into_owned())),
			Self::Mul(a, b) => Evaled::Mul(Box::new(a.into_owned()), Box::new(b.into_owned())),
			Self::Div(a, b) => Evaled::Div(Box::new(a.into_owned()), Box::new(b.into_owned())),
		}
	}
}

impl Describe for Evaled<'_> {
	/// Builds the roll breakdown string: the [groups](Self::groups()) joined by single spaces.
	fn describe(&self, list_limit: Option<usize>) -> String {
		self.groups(list_limit).join(" ")
	}
}

impl fmt::Display for Evaled<'_> {
	/// Formats the value using the given formatter. [Read more][core::fmt::Debug::fmt()]
	///
	/// The output of this implementation is equivalent to [`Self::describe(None)`].
	///
	/// [`Self::describe(None)`]: Self::describe()
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.describe(None))
	}
}

/// Error that can occur during [`Expr::eval()`]
#[derive(thiserror::Error, Debug)]
#[non_exhaustive]
pub enum EvalError {
	/// Dice-related error (likely during rolling)
	#[error("dice error while evaluating \"{0}\": {1}")]
	Dice(Expr, #[source] DiceError),
}

/// Error that can occur during [`Evaled::calc()`]
#[derive(thiserror::Error, Debug)]
#[non_exhaustive]
pub enum CalcError {
	/// Dice-related error (likely during totalling)
	#[error("dice error while calculating ({0}): {1}")]
	Dice(Evaled<'static>, #[source] DiceError),

	/// Integer overflow (likely during calculation of a sum or product)
	#[error("integer overflow while calculating {0}")]
	Overflow(Evaled<'static>),

	/// Division-related error (likely division by a rolled zero)
	#[error("division error while calculating {0}")]
	Division(Evaled<'static>),
}

/// Operation type for an individual expression
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[expect(clippy::exhaustive_enums, reason = "Operator precedence levels of the notation are fixed")]
pub enum OpType {
	/// Single value, no operation
	Value,

	/// Unary operation
	Unary,

	/// Additive operation (sum or difference)
	Additive,

	/// Multiplicative operation (product or quotient)
	Multiplicative,
}

/// Trait that offers [`OpType`]-related information
pub trait HasOpType {
	/// Gets the type of this expression.
	fn op_type(&self) -> OpType;

	/// Checks whether this expression is a single value.
	fn is_value(&self) -> bool;

	/// Checks whether this expression is a unary operation.
	fn is_unary(&self) -> bool;

	/// Checks whether this expression is an additive operation.
	fn is_additive(&self) -> bool;

	/// Checks whether this expression is a multiplicative operation.
	fn is_multiplicative(&self) -> bool;

	/// Checks whether this expression is an operation whose right operand can't be regrouped (difference or quotient).
	fn is_left_assoc_only(&self) -> bool;

	/// Checks whether this expression is a binary (additive or multiplicative) operation.
	fn is_binary(&self) -> bool {
		self.is_additive() || self.is_multiplicative()
	}
}

/// Trait to allow creation of expanded descriptions with an optional max number of individual listed results where
/// applicable
pub trait Describe {
	/// Builds a detailed expression string with additional information about non-deterministic elements.
	/// Any elements of the expression that can have a different result between multiple evaluations or multiple results
	/// should list all of the specific individual results that occurred (ideally, up to `list_limit` of them).
	#[must_use]
	fn describe(&self, list_limit: Option<usize>) -> String;
}

/// Trait for describing binary expressions with influence from own type.
/// Used for, e.g. wrapping parentheses around parts of expressions based on [`OpType`] of self and the expression.
trait DescribeBinaryExpr: HasOpType + Describe {
	/// Builds a detailed description for a binary expression with parentheses added to disambiguate mixed
	/// additive/multiplicative operations.
	fn describe_binary_expr(&self, op: char, a: &impl DescribeBinaryExpr, b: &impl DescribeBinaryExpr) -> String {
		format!(
			"{} {} {}",
			paren_wrap(a.describe(None), needs_parens(self, a, false)),
			op,
			paren_wrap(b.describe(None), needs_parens(self, b, true)),
		)
	}
}

impl<T: HasOpType + Describe> DescribeBinaryExpr for T {}

/// Determines whether an operand of an expression needs to be wrapped in parentheses to keep its grouping.
fn needs_parens(parent: &(impl HasOpType + ?Sized), operand: &impl HasOpType, is_rhs: bool) -> bool {
	match (parent.op_type(), operand.op_type()) {
		(OpType::Multiplicative | OpType::Unary, OpType::Additive) | (OpType::Unary, OpType::Multiplicative) => true,
		(parent_type, operand_type) => is_rhs && parent_type == operand_type && parent.is_binary(),
	}
}

/// Wraps a string in parentheses if needed.
#[must_use]
fn paren_wrap(mut text: String, wrap: bool) -> String {
	if wrap {
		text.insert(0, '(');
		text.push(')');
	}
	text
}

/// Wraps a list of groups in parentheses if needed, attaching them to the first and last groups.
#[must_use]
fn wrap_groups(mut groups: Vec<String>, wrap: bool) -> Vec<String> {
	if wrap {
		if let Some(first) = groups.first_mut() {
			first.insert(0, '(');
		}
		if let Some(last) = groups.last_mut() {
			last.push(')');
		}
	}
	groups
}
