//! Abstractions for rolling [`DieRoll`]s using various means.

use alloc::{borrow::Cow, vec::Vec};
use core::{iter::Peekable, ops::RangeInclusive};

#[cfg(feature = "fastrand")]
use fastrand::Rng;

use super::{Dice, DieRoll, Error, Rolled, Sides};

/// Source of random integers that dice are rolled with
pub trait Roller {
	/// Picks an integer from an inclusive range. Implementations meant for real use should pick uniformly.
	#[must_use]
	fn gen_range(&mut self, range: RangeInclusive<i32>) -> i32;

	/// Rolls a single die with the given kind of sides.
	#[must_use]
	#[inline]
	fn roll_die(&mut self, sides: Sides) -> DieRoll {
		DieRoll::new(self.gen_range(sides.min_face()..=sides.max_face()))
	}

	/// Rolls a set of dice and optionally applies all of its modifiers to the rolls.
	///
	/// # Errors
	/// If any errors are encountered while applying the dice's modifiers, an error variant is returned.
	///
	/// # Examples
	/// ```
	/// use droll::dice::{roller::{Iter as IterRoller, Roller}, Dice};
	///
	/// let dice = Dice::fate(4);
	/// let rolled = IterRoller::new([-1, 0, 1, 1]).roll(&dice, true)?;
	/// assert_eq!(rolled.total()?, 1);
	/// # Ok::<(), droll::dice::Error>(())
	/// ```
	fn roll<'d, 'r>(&mut self, dice: &'d Dice, apply_mods: bool) -> Result<Rolled<'r>, Error>
	where
		'd: 'r,
		Self: Sized,
	{
		// Roll the dice!
		let mut rolls = Vec::with_capacity(dice.count.into());
		for _ in 0..dice.count {
			rolls.push(self.roll_die(dice.sides));
		}

		let mut rolled = Rolled {
			rolls,
			dice: Cow::Borrowed(dice),
		};

		// Apply all of the dice's modifiers in declaration order
		if apply_mods {
			for modifier in &dice.modifiers {
				modifier.apply(&mut rolled, self)?;
			}
		}

		#[cfg(feature = "logging")]
		log::trace!("Rolled {dice}: {rolled}");

		Ok(rolled)
	}
}

/// Generates values for rolls with [fastrand](https://github.com/smol-rs/fastrand). Each instance owns its own
/// generator, so rolls made through separate instances never share state.
#[cfg(feature = "fastrand")]
#[derive(Debug, Clone)]
#[cfg_attr(feature = "std", derive(Default))]
pub struct FastRand(Rng);

#[cfg(feature = "fastrand")]
impl FastRand {
	/// Creates a new FastRand roller that uses the given RNG instance to generate rolls.
	#[must_use]
	#[inline]
	pub const fn new(rng: Rng) -> Self {
		Self(rng)
	}

	/// Creates a new FastRand roller that uses a new RNG instance seeded with a specific value.
	#[must_use]
	#[inline]
	pub fn with_seed(seed: u64) -> Self {
		Self(Rng::with_seed(seed))
	}
}

#[cfg(feature = "fastrand")]
impl Roller for FastRand {
	#[inline]
	fn gen_range(&mut self, range: RangeInclusive<i32>) -> i32 {
		self.0.i32(range)
	}
}

/// Generates rolls that always have a specific value.
///
/// # Examples
/// ```
/// use droll::dice::{roller::{Roller, Val as ValRoller}, Dice};
///
/// let dice = Dice::new(4, 6);
/// let rolled = ValRoller(2).roll(&dice, true)?;
/// assert_eq!(rolled.total()?, 8);
/// # Ok::<(), droll::dice::Error>(())
/// ```
#[derive(Debug, Default, Clone)]
#[expect(clippy::exhaustive_structs, reason = "Highly unlikely to change")]
pub struct Val(pub i32);

impl Roller for Val {
	#[inline]
	fn gen_range(&mut self, _range: RangeInclusive<i32>) -> i32 {
		self.0
	}
}

/// Generates rolls that always have the max value.
///
/// # Examples
/// ```
/// use droll::dice::{roller::{Max as MaxRoller, Roller}, Dice};
///
/// let dice = Dice::percentile(2);
/// let rolled = MaxRoller.roll(&dice, true)?;
/// assert_eq!(rolled.total()?, 200);
/// # Ok::<(), droll::dice::Error>(())
/// ```
#[derive(Debug, Default, Clone)]
#[expect(clippy::exhaustive_structs, reason = "Highly unlikely to change")]
pub struct Max;

impl Roller for Max {
	#[inline]
	fn gen_range(&mut self, range: RangeInclusive<i32>) -> i32 {
		*range.end()
	}
}

/// Generates rolls from an iterator of values. Mostly useful for testing purposes.
///
/// # Panics
/// If the iterator runs out of values while rolling, the roller will panic.
/// Use [`Self::can_roll()`] to check beforehand if needed.
#[derive(Debug, Clone)]
pub struct Iter<I: Iterator<Item = i32>>(Peekable<I>);

impl<I: Iterator<Item = i32>> Iter<I> {
	/// Checks whether the iterator has another value available for rolling.
	#[inline]
	pub fn can_roll(&mut self) -> bool {
		self.0.peek().is_some()
	}

	/// Creates a new Iter roller from an iterable of values.
	#[must_use]
	#[inline]
	pub fn new(iter: impl IntoIterator<IntoIter = I>) -> Self {
		Self(iter.into_iter().peekable())
	}
}

impl<I: Iterator<Item = i32>> Roller for Iter<I> {
	#[inline]
	#[expect(
		clippy::expect_used,
		reason = "Mostly for testing, otherwise manual checking of can_roll() is expected"
	)]
	fn gen_range(&mut self, _range: RangeInclusive<i32>) -> i32 {
		self.0.next().expect("iterator is finished")
	}
}
