//! All functionality for directly creating dice, rolling them, and working with their resulting rolls.
//!
//! This is the home of the dice "primitives". For using as part of a larger expression, see [`Expr::Dice`].
//!
//! [`Expr::Dice`]: crate::expr::Expr::Dice

pub mod modifier;
pub mod roller;

use alloc::{
	borrow::Cow,
	format,
	string::{String, ToString},
	vec::Vec,
};
use core::{cmp, fmt};

use self::modifier::Condition;
pub use self::{modifier::Modifier, roller::Roller};
use crate::expr::Describe;

/// Maximum number of dice a single die may chain into through explosions or recursive rerolls before rolling is
/// aborted with [`Error::RollLimit`]
pub const EXPLODE_LIMIT: u16 = 100;

/// Kind of face layout a die has
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[expect(clippy::exhaustive_enums, reason = "Dice kinds recognized by the notation are fixed")]
pub enum Sides {
	/// Regular die numbered 1 through N
	Num(u16),

	/// Fate/Fudge die with the faces -1, 0, and +1
	Fate,

	/// Percentile die numbered 1 through 100
	Percentile,
}

impl Sides {
	/// Lowest face value a die of this kind can show.
	#[must_use]
	pub const fn min_face(self) -> i32 {
		match self {
			Self::Num(..) | Self::Percentile => 1,
			Self::Fate => -1,
		}
	}

	/// Highest face value a die of this kind can show.
	#[must_use]
	pub const fn max_face(self) -> i32 {
		match self {
			Self::Num(sides) => sides as i32,
			Self::Fate => 1,
			Self::Percentile => 100,
		}
	}

	/// Checks whether a die of this kind can only ever show a single face.
	#[must_use]
	pub const fn is_single_faced(self) -> bool {
		self.min_face() >= self.max_face()
	}
}

impl fmt::Display for Sides {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Num(sides) => write!(f, "{sides}"),
			Self::Fate => f.write_str("F"),
			Self::Percentile => f.write_str("%"),
		}
	}
}

/// A set of one or more rollable dice with a specific kind of sides, along with a collection of modifiers to apply to
/// any resulting rolls from them.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[expect(clippy::exhaustive_structs, reason = "Dice terms are fully described by these fields")]
pub struct Dice {
	/// Number of dice to roll
	pub count: u16,

	/// Face layout of each die
	pub sides: Sides,

	/// Modifiers to automatically apply to rolls from this set of dice, in declaration order
	pub modifiers: Vec<Modifier>,
}

impl Dice {
	/// Creates a new set of dice matching this one but without any modifiers.
	#[must_use]
	#[inline]
	pub const fn plain(&self) -> Self {
		Self {
			count: self.count,
			sides: self.sides,
			modifiers: Vec::new(),
		}
	}

	/// Creates a new set of regular dice with a given count and number of sides.
	#[must_use]
	pub const fn new(count: u16, sides: u16) -> Self {
		Self {
			count,
			sides: Sides::Num(sides),
			modifiers: Vec::new(),
		}
	}

	/// Creates a new set of Fate dice (`NdF`).
	#[must_use]
	pub const fn fate(count: u16) -> Self {
		Self {
			count,
			sides: Sides::Fate,
			modifiers: Vec::new(),
		}
	}

	/// Creates a new set of percentile dice (`Nd%`).
	#[must_use]
	pub const fn percentile(count: u16) -> Self {
		Self {
			count,
			sides: Sides::Percentile,
			modifiers: Vec::new(),
		}
	}

	/// Creates a new dice builder.
	#[must_use]
	#[inline]
	pub fn builder() -> Builder {
		Builder::default()
	}
}

impl Default for Dice {
	/// Creates the default dice (1d20).
	#[inline]
	fn default() -> Self {
		Self::new(1, 20)
	}
}

impl fmt::Display for Dice {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		write!(
			f,
			"{}d{}{}",
			self.count,
			self.sides,
			self.modifiers.iter().map(ToString::to_string).collect::<String>()
		)
	}
}

/// Single die produced from rolling [`Dice`] and optionally applying [`Modifier`]s
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub struct DieRoll {
	/// Face that is shown on the die
	pub val: i32,

	/// Value the die contributes to its set's total. Matches [`Self::val`] unless clamped by a min/max modifier.
	pub counted: i32,

	/// Modifier that caused the addition of this die, if any
	pub added_by: Option<Modifier>,

	/// Modifier that caused the drop of this die, if any
	pub dropped_by: Option<Modifier>,

	/// Modifier that exploded this die (rolled an additional die because of it), if any
	pub exploded_by: Option<Modifier>,

	/// Modifications that were made to the value of the roll
	pub changes: Vec<ValChange>,
}

impl DieRoll {
	/// Marks this die roll as added by a given modifier, setting [`Self::added_by`].
	///
	/// # Panics
	/// Panics if `Self::added_by` is already [`Some`].
	pub fn add(&mut self, from: Modifier) {
		assert!(
			self.added_by.is_none(),
			"marking a die as added that has already been marked as added by another modifier"
		);
		self.added_by = Some(from);
	}

	/// Marks this die roll as dropped by a given modifier, setting [`Self::dropped_by`].
	///
	/// # Panics
	/// Panics if `Self::dropped_by` is already [`Some`].
	pub fn drop(&mut self, from: Modifier) {
		assert!(
			self.dropped_by.is_none(),
			"marking a die as dropped that has already been marked as dropped by another modifier"
		);
		self.dropped_by = Some(from);
	}

	/// Marks this die roll as having exploded from a given modifier, setting [`Self::exploded_by`].
	pub fn explode(&mut self, from: Modifier) {
		self.exploded_by = Some(from);
	}

	/// Replaces the die roll's face (and counted value) in place and logs the change made.
	pub fn change(&mut self, from: Modifier, new_val: i32) {
		self.changes.push(ValChange {
			before: self.val,
			after: new_val,
			cause: from,
		});
		self.val = new_val;
		self.counted = new_val;
	}

	/// Replaces only the counted value of the die roll, leaving the shown face alone, and logs the change made.
	pub fn clamp_counted(&mut self, from: Modifier, new_val: i32) {
		self.changes.push(ValChange {
			before: self.counted,
			after: new_val,
			cause: from,
		});
		self.counted = new_val;
	}

	/// Indicates whether this die roll was part of the original set (not added by a modifier).
	#[must_use]
	#[inline]
	pub const fn is_original(&self) -> bool {
		self.added_by.is_none()
	}

	/// Indicates whether this die roll was added as the result of a modifier being applied.
	/// This is the direct inverse of [`DieRoll::is_original()`].
	#[must_use]
	#[inline]
	pub const fn is_additional(&self) -> bool {
		self.added_by.is_some()
	}

	/// Indicates whether this die roll has been dropped by a modifier.
	#[must_use]
	#[inline]
	pub const fn is_dropped(&self) -> bool {
		self.dropped_by.is_some()
	}

	/// Indicates whether this die roll is being kept (has *not* been dropped by a modifier).
	/// This is the direct inverse of [`DieRoll::is_dropped()`].
	#[must_use]
	#[inline]
	pub const fn is_kept(&self) -> bool {
		self.dropped_by.is_none()
	}

	/// Indicates whether this die roll caused an explosion.
	#[must_use]
	#[inline]
	pub const fn is_exploded(&self) -> bool {
		self.exploded_by.is_some()
	}

	/// Indicates whether this die roll's face was replaced by a reroll.
	#[must_use]
	pub fn is_rerolled(&self) -> bool {
		self.changes
			.iter()
			.any(|change| matches!(change.cause, Modifier::Reroll { .. }))
	}

	/// Indicates whether this die roll's counted value differs from its shown face.
	#[must_use]
	#[inline]
	pub const fn is_clamped(&self) -> bool {
		self.counted != self.val
	}

	/// Indicates whether this die roll's value has been directly changed by a modifier.
	#[must_use]
	#[inline]
	pub fn is_changed(&self) -> bool {
		!self.changes.is_empty()
	}

	/// Creates a new die roll with the given value.
	#[must_use]
	pub const fn new(val: i32) -> Self {
		Self {
			val,
			counted: val,
			added_by: None,
			dropped_by: None,
			exploded_by: None,
			changes: Vec::new(),
		}
	}
}

impl PartialOrd for DieRoll {
	fn partial_cmp(&self, other: &Self) -> Option<cmp::Ordering> {
		Some(self.cmp(other))
	}
}

impl Ord for DieRoll {
	fn cmp(&self, other: &Self) -> cmp::Ordering {
		self.counted.cmp(&other.counted)
	}
}

impl fmt::Display for DieRoll {
	/// Formats the value using the given formatter. [Read more][core::fmt::Debug::fmt()]
	///
	/// The format of a die roll is the face shown on the die, followed by markers in this order: `!` if it exploded,
	/// `d` if it was dropped, `r` if it was rerolled, and `[N]` if the value it counts for differs from its face.
	///
	/// # Examples
	/// ```
	/// use droll::dice::DieRoll;
	///
	/// let roll = DieRoll::new(4);
	/// assert_eq!(roll.to_string(), "4");
	/// ```
	///
	/// ```
	/// use droll::dice::{DieRoll, Modifier};
	///
	/// let mut roll = DieRoll::new(2);
	/// roll.drop(Modifier::KeepHigh(3));
	/// assert_eq!(roll.to_string(), "2d");
	///
	/// let mut roll = DieRoll::new(1);
	/// roll.clamp_counted(Modifier::Min(3), 3);
	/// assert_eq!(roll.to_string(), "1[3]");
	/// ```
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(
			f,
			"{}{}{}{}",
			self.val,
			if self.is_exploded() { "!" } else { "" },
			if self.is_dropped() { "d" } else { "" },
			if self.is_rerolled() { "r" } else { "" },
		)?;

		if self.is_clamped() {
			write!(f, "[{}]", self.counted)?;
		}

		Ok(())
	}
}

/// Details about a modification made to a [`DieRoll`] as a result of a [`Modifier`] being applied to it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[expect(clippy::exhaustive_structs, reason = "A change is fully described by these fields")]
pub struct ValChange {
	/// Roll value before the change was made
	pub before: i32,

	/// Roll value after the change was made
	pub after: i32,

	/// Modifier that caused the change
	pub cause: Modifier,
}

/// Representation of the result from rolling [`Dice`]
#[derive(Debug, Clone, PartialEq, Eq)]
#[expect(clippy::exhaustive_structs, reason = "A rolled set is fully described by these fields")]
pub struct Rolled<'a> {
	/// Each individual die roll that was made
	pub rolls: Vec<DieRoll>,

	/// Dice that were rolled to produce this
	pub dice: Cow<'a, Dice>,
}

impl Rolled<'_> {
	/// Calculates the total of the counted values of all kept rolls.
	///
	/// # Errors
	/// If there is an integer overflow while summing the die rolls, an error variant is returned.
	///
	/// # Examples
	/// ```
	/// use droll::dice::{roller::{Iter as IterRoller, Roller}, Dice};
	///
	/// let dice = Dice::builder().count(4).sides(6).keep_high(3).build();
	/// let rolled = IterRoller::new([3, 6, 1, 5]).roll(&dice, true)?;
	/// assert_eq!(rolled.total()?, 14);
	/// # Ok::<(), droll::dice::Error>(())
	/// ```
	pub fn total(&self) -> Result<i32, Error> {
		let mut sum: i32 = 0;

		// Sum all rolls that haven't been dropped
		for r in self.rolls.iter().filter(|roll| roll.is_kept()) {
			sum = sum
				.checked_add(r.counted)
				.ok_or_else(|| Error::Overflow(self.clone().into_owned()))?;
		}

		Ok(sum)
	}

	/// Moves all of self's owned data into a new instance and clones any unowned data in order to create a `'static`
	/// instance of self.
	#[must_use]
	pub fn into_owned(self) -> Rolled<'static> {
		Rolled {
			rolls: self.rolls,
			dice: Cow::Owned(self.dice.into_owned()),
		}
	}

	/// Creates a new rolled set of dice from a given set of dice and an iterator of values.
	#[must_use]
	pub fn from_dice_and_rolls(dice: &Dice, rolls: impl IntoIterator<Item = i32>) -> Rolled<'_> {
		Rolled {
			rolls: rolls.into_iter().map(DieRoll::new).collect(),
			dice: Cow::Borrowed(dice),
		}
	}
}

impl Describe for Rolled<'_> {
	/// Builds a comma-separated list of all of the individual rolled dice (see [`DieRoll::fmt()`]).
	///
	/// If `list_limit` is specified and there are more rolls than it, the list of rolled dice will be truncated and
	/// appended with "X more..." (where X is the remaining roll count past the max).
	///
	/// # Examples
	/// ```
	/// use std::borrow::Cow;
	/// use droll::{dice::{Dice, DieRoll, Rolled}, expr::Describe};
	///
	/// let dice = Dice::builder().count(4).sides(6).keep_high(2).build();
	/// let kh_mod = dice.modifiers[0];
	/// let rolled = Rolled {
	/// 	rolls: vec![
	/// 		DieRoll::new(6),
	/// 		{
	/// 			let mut roll = DieRoll::new(2);
	/// 			roll.drop(kh_mod);
	/// 			roll
	/// 		},
	/// 		DieRoll::new(5),
	/// 		{
	/// 			let mut roll = DieRoll::new(3);
	/// 			roll.drop(kh_mod);
	/// 			roll
	/// 		},
	/// 	],
	/// 	dice: Cow::Borrowed(&dice),
	/// };
	///
	/// assert_eq!(rolled.describe(None), "6, 2d, 5, 3d");
	/// assert_eq!(rolled.describe(Some(2)), "6, 2d, 2 more...");
	/// ```
	///
	/// [`DieRoll::fmt()`]: ./struct.DieRoll.html#method.fmt
	fn describe(&self, list_limit: Option<usize>) -> String {
		let list_limit = list_limit.unwrap_or(usize::MAX);
		let total_rolls = self.rolls.len();
		let truncated_rolls = total_rolls.saturating_sub(list_limit);

		format!(
			"{}{}",
			self.rolls
				.iter()
				.take(list_limit)
				.map(ToString::to_string)
				.collect::<Vec<_>>()
				.join(", "),
			if truncated_rolls > 0 {
				format!(", {truncated_rolls} more...")
			} else {
				String::new()
			}
		)
	}
}

impl fmt::Display for Rolled<'_> {
	/// Formats the value using the given formatter. [Read more][core::fmt::Debug::fmt()]
	///
	/// The output is equivalent to calling [`Self::describe(None)`].
	///
	/// [`Self::describe(None)`]: Self::describe()
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		write!(f, "{}", self.describe(None))
	}
}

/// An error resulting from a dice operation
#[derive(thiserror::Error, Debug)]
#[non_exhaustive]
pub enum Error {
	/// There was an integer overflow when performing mathematical operations on roll values.
	#[error("integer overflow")]
	Overflow(Rolled<'static>),

	/// Rolling the dice specified would result in infinite rolls.
	///
	/// # Examples
	/// ```
	/// use droll::dice::{roller::{FastRand as FastRandRoller, Roller}, Dice, Error};
	///
	/// let dice = Dice::builder().count(4).sides(1).explode(None).build();
	/// assert!(matches!(FastRandRoller::default().roll(&dice, true), Err(Error::InfiniteRolls(..))));
	/// ```
	#[error("{0} would result in infinite rolls")]
	InfiniteRolls(Dice),

	/// A single die chained into more explosions or rerolls than [`EXPLODE_LIMIT`] allows.
	///
	/// # Examples
	/// ```
	/// use droll::dice::{roller::{Max as MaxRoller, Roller}, Dice, Error};
	///
	/// let dice = Dice::builder().count(2).sides(20).explode(None).build();
	/// assert!(matches!(MaxRoller.roll(&dice, true), Err(Error::RollLimit(..))));
	/// ```
	#[error("{0} exceeded the limit of chained rolls per die")]
	RollLimit(Dice),

	/// The provided symbol doesn't match to a known condition.
	///
	/// # Examples
	/// ```
	/// use droll::dice::{modifier::Condition, Error};
	///
	/// let cond = Condition::from_symbol_and_val("!", 4);
	/// assert!(matches!(cond, Err(Error::UnknownCondition(..))));
	/// ```
	#[error("unknown condition symbol: {0}")]
	UnknownCondition(String),
}

/// Builds [`Dice`] with a fluent interface.
///
/// # Examples
///
/// ## Basic dice
/// ```
/// use droll::Dice;
///
/// let dice = Dice::builder().count(2).sides(6).build();
/// assert_eq!(dice, Dice::new(2, 6));
/// ```
///
/// ## Multiple modifiers
/// ```
/// use droll::dice::{modifier::{Condition, Modifier}, Dice, Sides};
///
/// let dice = Dice::builder()
/// 	.count(6)
/// 	.sides(8)
/// 	.reroll(Some(Condition::Eq(1)), false)
/// 	.keep_high(4)
/// 	.build();
/// assert_eq!(
/// 	dice,
/// 	Dice {
/// 		count: 6,
/// 		sides: Sides::Num(8),
/// 		modifiers: vec![
/// 			Modifier::Reroll {
/// 				cond: Some(Condition::Eq(1)),
/// 				recurse: false
/// 			},
/// 			Modifier::KeepHigh(4),
/// 		],
/// 	},
/// );
/// ```
#[derive(Debug, Clone, Default)]
pub struct Builder(Dice);

impl Builder {
	/// Sets the number of dice to roll.
	#[must_use]
	pub const fn count(mut self, count: u16) -> Self {
		self.0.count = count;
		self
	}

	/// Sets the number of sides per die.
	#[must_use]
	pub const fn sides(mut self, sides: u16) -> Self {
		self.0.sides = Sides::Num(sides);
		self
	}

	/// Makes the dice Fate dice.
	#[must_use]
	pub const fn fate(mut self) -> Self {
		self.0.sides = Sides::Fate;
		self
	}

	/// Makes the dice percentile dice.
	#[must_use]
	pub const fn percentile(mut self) -> Self {
		self.0.sides = Sides::Percentile;
		self
	}

	/// Adds a reroll modifier to the dice.
	#[must_use]
	pub fn reroll(mut self, cond: Option<Condition>, recurse: bool) -> Self {
		self.0.modifiers.push(Modifier::Reroll { cond, recurse });
		self
	}

	/// Adds an exploding modifier to the dice.
	#[must_use]
	pub fn explode(mut self, cond: Option<Condition>) -> Self {
		self.0.modifiers.push(Modifier::Explode { cond });
		self
	}

	/// Adds a keep highest modifier to the dice.
	#[must_use]
	pub fn keep_high(mut self, count: u16) -> Self {
		self.0.modifiers.push(Modifier::KeepHigh(count));
		self
	}

	/// Adds a keep lowest modifier to the dice.
	#[must_use]
	pub fn keep_low(mut self, count: u16) -> Self {
		self.0.modifiers.push(Modifier::KeepLow(count));
		self
	}

	/// Adds a drop highest modifier to the dice.
	#[must_use]
	pub fn drop_high(mut self, count: u16) -> Self {
		self.0.modifiers.push(Modifier::DropHigh(count));
		self
	}

	/// Adds a drop lowest modifier to the dice.
	#[must_use]
	pub fn drop_low(mut self, count: u16) -> Self {
		self.0.modifiers.push(Modifier::DropLow(count));
		self
	}

	/// Adds a minimum modifier to the dice.
	#[must_use]
	pub fn min(mut self, min: i32) -> Self {
		self.0.modifiers.push(Modifier::Min(min));
		self
	}

	/// Adds a maximum modifier to the dice.
	#[must_use]
	pub fn max(mut self, max: i32) -> Self {
		self.0.modifiers.push(Modifier::Max(max));
		self
	}

	/// Finalizes the dice.
	#[must_use]
	pub fn build(self) -> Dice {
		self.0
	}
}
