//! Dice modifiers and their related types.

use alloc::{
	borrow::ToOwned,
	format,
	string::{String, ToString},
	vec::Vec,
};
use core::fmt;

use super::{roller::Roller, Error, Rolled, Sides, EXPLODE_LIMIT};

/// Routines that can be applied to [`Dice`](super::Dice) to automatically manipulate resulting [`Rolled`] dice sets
/// from them as part of their rolling process. Modifiers are applied in the order they were declared in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum Modifier {
	/// Rerolls dice that meet a condition, replacing their face in place.
	/// Without a condition, dice showing their lowest face are rerolled.
	///
	/// # Examples
	///
	/// ## Reroll once (`r`)
	/// ```
	/// use droll::dice::{modifier::{Condition, Modifier}, roller::{Iter as IterRoller, Roller}, Dice};
	///
	/// // Build the 4d6r1 dice set and create a roller that has predetermined values for the dice rolls
	/// let dice = Dice::builder().count(4).sides(6).reroll(Some(Condition::Eq(1)), false).build();
	/// let mut rng = IterRoller::new([3, 6, 1, 2, 4]);
	///
	/// // Roll the dice, but don't have it automatically apply its modifiers (passing `false` as the second `roll()` param).
	/// let mut rolled = rng.roll(&dice, false)?;
	/// dice.modifiers[0].apply(&mut rolled, &mut rng)?;
	///
	/// // The 1 is replaced in place by the next predetermined value, which is never rerolled again
	/// assert_eq!(rolled.rolls.iter().map(|roll| roll.val).collect::<Vec<_>>(), [3, 6, 4, 2]);
	/// assert!(rolled.rolls[2].is_rerolled());
	/// assert_eq!(rolled.total()?, 15);
	/// # Ok::<(), droll::dice::Error>(())
	/// ```
	///
	/// ## Reroll recursively (`rr`)
	/// ```
	/// use droll::dice::{modifier::{Condition, Modifier}, roller::{Iter as IterRoller, Roller}, Dice};
	///
	/// let dice = Dice::builder().count(2).sides(6).reroll(Some(Condition::Eq(1)), true).build();
	/// let rolled = IterRoller::new([1, 5, 1, 1, 4]).roll(&dice, true)?;
	/// assert_eq!(rolled.rolls.iter().map(|roll| roll.val).collect::<Vec<_>>(), [4, 5]);
	/// assert_eq!(rolled.rolls[0].changes.len(), 3);
	/// # Ok::<(), droll::dice::Error>(())
	/// ```
	Reroll {
		/// Condition that die values must meet in order to be rerolled
		cond: Option<Condition>,

		/// Whether to continue rerolling a die until it no longer meets the condition
		recurse: bool,
	},

	/// Explodes dice that meet a condition (or show their highest face without one). Each explosion rolls an
	/// additional die right after the one that caused it, and the additional dice may explode again. A single die may
	/// chain into at most [`EXPLODE_LIMIT`] additional dice.
	///
	/// # Examples
	/// ```
	/// use droll::dice::{modifier::Modifier, roller::{Iter as IterRoller, Roller}, Dice};
	///
	/// let dice = Dice::builder().count(3).sides(6).explode(None).build();
	/// let rolled = IterRoller::new([6, 2, 5, 6, 3]).roll(&dice, true)?;
	/// assert_eq!(rolled.rolls.iter().map(ToString::to_string).collect::<Vec<_>>(), ["6!", "6!", "3", "2", "5"]);
	/// assert_eq!(rolled.total()?, 22);
	/// # Ok::<(), droll::dice::Error>(())
	/// ```
	Explode {
		/// Condition that die values must meet in order to explode
		cond: Option<Condition>,
	},

	/// Keeps only the highest x dice, dropping the rest.
	///
	/// # Examples
	/// ```
	/// use droll::dice::{modifier::Modifier, roller::{Iter as IterRoller, Roller}, Dice};
	///
	/// let dice = Dice::builder().count(4).sides(6).keep_high(3).build();
	/// let rolled = IterRoller::new([6, 2, 5, 3]).roll(&dice, true)?;
	/// assert_eq!(rolled.to_string(), "6, 2d, 5, 3");
	/// assert_eq!(rolled.total()?, 14);
	/// # Ok::<(), droll::dice::Error>(())
	/// ```
	KeepHigh(u16),

	/// Keeps only the lowest x dice, dropping the rest.
	KeepLow(u16),

	/// Drops the highest x dice, keeping the rest.
	DropHigh(u16),

	/// Drops the lowest x dice, keeping the rest.
	DropLow(u16),

	/// Counts any die below the given value as that value instead, without changing its face.
	///
	/// # Examples
	/// ```
	/// use droll::dice::{modifier::Modifier, roller::{Iter as IterRoller, Roller}, Dice};
	///
	/// let dice = Dice::builder().count(3).sides(20).min(5).build();
	/// let rolled = IterRoller::new([2, 14, 5]).roll(&dice, true)?;
	/// assert_eq!(rolled.to_string(), "2[5], 14, 5");
	/// assert_eq!(rolled.total()?, 24);
	/// # Ok::<(), droll::dice::Error>(())
	/// ```
	Min(i32),

	/// Counts any die above the given value as that value instead, without changing its face.
	Max(i32),
}

impl Modifier {
	/// Applies the modifier to a set of rolls, using a given roller if any additional rolls are needed.
	///
	/// # Errors
	/// If applying the modifier would result in infinite additional rolls, or a single die chains into more than
	/// [`EXPLODE_LIMIT`] additional rolls, an error variant will be returned.
	pub fn apply(self, rolled: &mut Rolled, rng: &mut impl Roller) -> Result<(), Error> {
		match self {
			Self::Reroll { cond, recurse } => self.apply_reroll(rolled, rng, cond, recurse)?,
			Self::Explode { cond } => self.apply_explode(rolled, rng, cond)?,
			Self::KeepHigh(count) => self.apply_keep_high(rolled, count),
			Self::KeepLow(count) => self.apply_keep_low(rolled, count),
			Self::DropHigh(count) => self.apply_drop_high(rolled, count),
			Self::DropLow(count) => self.apply_drop_low(rolled, count),
			Self::Min(min) => self.apply_min(rolled, min),
			Self::Max(max) => self.apply_max(rolled, max),
		}

		Ok(())
	}

	/// Applies the [`Self::Reroll`] variant to a set of rolled dice.
	fn apply_reroll(
		self,
		rolled: &mut Rolled,
		rng: &mut impl Roller,
		cond: Option<Condition>,
		recurse: bool,
	) -> Result<(), Error> {
		let sides = rolled.dice.sides;
		let qualifies = |val: i32| cond.map_or(val == sides.min_face(), |cond| cond.check(val));

		// Prevent recursively rerolling dice that would result in infinite rerolls
		if recurse && every_face(sides, qualifies) {
			return Err(Error::InfiniteRolls((*rolled.dice).clone()));
		}

		for roll in rolled
			.rolls
			.iter_mut()
			.filter(|roll| roll.is_kept() && qualifies(roll.val))
		{
			let mut rerolls: u16 = 0;
			loop {
				let reroll = rng.roll_die(sides);
				roll.change(self, reroll.val);
				rerolls = rerolls.saturating_add(1);

				if !recurse || !qualifies(roll.val) {
					break;
				}
				if rerolls >= EXPLODE_LIMIT {
					return Err(Error::RollLimit((*rolled.dice).clone()));
				}
			}
		}

		Ok(())
	}

	/// Applies the [`Self::Explode`] variant to a set of rolled dice.
	fn apply_explode(self, rolled: &mut Rolled, rng: &mut impl Roller, cond: Option<Condition>) -> Result<(), Error> {
		let sides = rolled.dice.sides;
		let qualifies = |val: i32| cond.map_or(val == sides.max_face(), |cond| cond.check(val));

		// Prevent exploding dice that would result in infinite explosions
		if every_face(sides, qualifies) {
			return Err(Error::InfiniteRolls((*rolled.dice).clone()));
		}

		let mut exploded = Vec::with_capacity(rolled.rolls.len());
		for mut roll in rolled.rolls.drain(..) {
			if !roll.is_kept() || !qualifies(roll.val) {
				exploded.push(roll);
				continue;
			}

			// Chain additional dice after the triggering one for as long as they keep qualifying
			roll.explode(self);
			exploded.push(roll);
			let mut chained: u16 = 0;
			loop {
				let mut extra = rng.roll_die(sides);
				extra.add(self);
				chained = chained.saturating_add(1);

				let again = qualifies(extra.val);
				if again {
					extra.explode(self);
				}
				exploded.push(extra);

				if !again {
					break;
				}
				if chained >= EXPLODE_LIMIT {
					return Err(Error::RollLimit((*rolled.dice).clone()));
				}
			}
		}

		rolled.rolls = exploded;
		Ok(())
	}

	/// Applies the [`Self::KeepHigh`] variant to a set of rolled dice.
	fn apply_keep_high(self, rolled: &mut Rolled, count: u16) {
		let mut refs = kept_rolls(rolled);
		refs.sort_by(|a, b| b.cmp(a));
		refs.iter_mut().skip(count.into()).for_each(|roll| roll.drop(self));
	}

	/// Applies the [`Self::KeepLow`] variant to a set of rolled dice.
	fn apply_keep_low(self, rolled: &mut Rolled, count: u16) {
		let mut refs = kept_rolls(rolled);
		refs.sort();
		refs.iter_mut().skip(count.into()).for_each(|roll| roll.drop(self));
	}

	/// Applies the [`Self::DropHigh`] variant to a set of rolled dice.
	fn apply_drop_high(self, rolled: &mut Rolled, count: u16) {
		let mut refs = kept_rolls(rolled);
		refs.sort_by(|a, b| b.cmp(a));
		refs.iter_mut().take(count.into()).for_each(|roll| roll.drop(self));
	}

	/// Applies the [`Self::DropLow`] variant to a set of rolled dice.
	fn apply_drop_low(self, rolled: &mut Rolled, count: u16) {
		let mut refs = kept_rolls(rolled);
		refs.sort();
		refs.iter_mut().take(count.into()).for_each(|roll| roll.drop(self));
	}

	/// Applies the [`Self::Min`] variant to a set of rolled dice.
	fn apply_min(self, rolled: &mut Rolled, min: i32) {
		rolled
			.rolls
			.iter_mut()
			.filter(|roll| roll.is_kept() && roll.counted < min)
			.for_each(|roll| roll.clamp_counted(self, min));
	}

	/// Applies the [`Self::Max`] variant to a set of rolled dice.
	fn apply_max(self, rolled: &mut Rolled, max: i32) {
		rolled
			.rolls
			.iter_mut()
			.filter(|roll| roll.is_kept() && roll.counted > max)
			.for_each(|roll| roll.clamp_counted(self, max));
	}

	/// Number of dice this modifier keeps or drops, if it is a keep/drop modifier.
	#[must_use]
	pub const fn selection_count(&self) -> Option<u16> {
		match self {
			Self::KeepHigh(count) | Self::KeepLow(count) | Self::DropHigh(count) | Self::DropLow(count) => Some(*count),
			Self::Reroll { .. } | Self::Explode { .. } | Self::Min(..) | Self::Max(..) => None,
		}
	}
}

impl fmt::Display for Modifier {
	/// Formats the value using the given formatter. [Read more][core::fmt::Debug::fmt()]
	///
	/// The output is the notation the modifier is parsed from.
	///
	/// # Examples
	/// ```
	/// use droll::dice::modifier::{Condition, Modifier};
	///
	/// assert_eq!(Modifier::KeepHigh(3).to_string(), "kh3");
	/// assert_eq!(Modifier::Explode { cond: None }.to_string(), "!");
	/// assert_eq!(Modifier::Reroll { cond: Some(Condition::Lte(2)), recurse: true }.to_string(), "rr<=2");
	/// ```
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(
			f,
			"{}{}",
			match self {
				Self::Reroll { recurse, .. } => (if *recurse { "rr" } else { "r" }).to_owned(),
				Self::Explode { .. } => "!".to_owned(),
				Self::KeepHigh(count) => format!("kh{count}"),
				Self::KeepLow(count) => format!("kl{count}"),
				Self::DropHigh(count) => format!("dh{count}"),
				Self::DropLow(count) => format!("dl{count}"),
				Self::Min(min) => format!("min{min}"),
				Self::Max(max) => format!("max{max}"),
			},
			match self {
				Self::Reroll { cond: Some(cond), .. } | Self::Explode { cond: Some(cond) } => cond.to_string(),
				Self::Reroll { cond: None, .. }
				| Self::Explode { cond: None }
				| Self::KeepHigh(..)
				| Self::KeepLow(..)
				| Self::DropHigh(..)
				| Self::DropLow(..)
				| Self::Max(..)
				| Self::Min(..) => String::new(),
			}
		)
	}
}

/// Test that die values can be checked against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[expect(clippy::exhaustive_enums, reason = "Unlikely to change, no logical fallback")]
pub enum Condition {
	/// Checks whether values are equal to its own value. Symbol: `=` (or no symbol at all)
	Eq(i32),

	/// Checks whether values are greater than its own value. Symbol: `>`
	Gt(i32),

	/// Checks whether values are greater than or equal to its own value. Symbol: `>=`
	Gte(i32),

	/// Checks whether values are less than its own value. Symbol: `<`
	Lt(i32),

	/// Checks whether values are less than or equal to its own value. Symbol: `<=`
	Lte(i32),
}

impl Condition {
	/// Creates a Condition from its corresponding symbol and a given value.
	///
	/// # Errors
	/// If the symbol doesn't match to a known condition variant, an error variant will be returned.
	pub fn from_symbol_and_val(symbol: &str, val: i32) -> Result<Self, Error> {
		Ok(match symbol {
			"=" | "" => Self::Eq(val),
			">" => Self::Gt(val),
			">=" => Self::Gte(val),
			"<" => Self::Lt(val),
			"<=" => Self::Lte(val),
			_ => return Err(Error::UnknownCondition(symbol.to_owned())),
		})
	}

	/// Checks a value against the condition.
	#[must_use]
	pub const fn check(&self, val: i32) -> bool {
		match self {
			Self::Eq(expected) => val == *expected,
			Self::Gt(expected) => val > *expected,
			Self::Gte(expected) => val >= *expected,
			Self::Lt(expected) => val < *expected,
			Self::Lte(expected) => val <= *expected,
		}
	}

	/// Gets the symbol that represents the condition. Equality has no symbol in canonical notation.
	#[must_use]
	pub const fn symbol(&self) -> &'static str {
		match self {
			Self::Eq(..) => "",
			Self::Gt(..) => ">",
			Self::Gte(..) => ">=",
			Self::Lt(..) => "<",
			Self::Lte(..) => "<=",
		}
	}
}

impl fmt::Display for Condition {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(
			f,
			"{}{}",
			self.symbol(),
			match self {
				Self::Eq(expected)
				| Self::Gt(expected)
				| Self::Gte(expected)
				| Self::Lt(expected)
				| Self::Lte(expected) => expected,
			}
		)
	}
}

/// Collects mutable references to every roll that hasn't been dropped yet.
fn kept_rolls<'r>(rolled: &'r mut Rolled) -> Vec<&'r mut super::DieRoll> {
	rolled.rolls.iter_mut().filter(|roll| roll.is_kept()).collect()
}

/// Checks whether every face a die can show passes a test.
fn every_face(sides: Sides, test: impl Fn(i32) -> bool) -> bool {
	(sides.min_face()..=sides.max_face()).all(test)
}
