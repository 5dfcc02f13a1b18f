use crate::dice::{
	modifier::{Condition, Modifier},
	roller::{FastRand as FastRandRoller, Iter as IterRoller, Max as MaxRoller, Roller, Val as ValRoller},
	Dice, Error, Sides,
};

fn vals(rolls: &[crate::dice::DieRoll]) -> Vec<i32> {
	rolls.iter().map(|roll| roll.val).collect()
}

#[test]
fn plain_dice_total() {
	let dice = Dice::new(4, 6);
	let rolled = IterRoller::new([1, 2, 3, 4]).roll(&dice, true).unwrap();
	assert_eq!(rolled.total().unwrap(), 10);
	assert_eq!(rolled.to_string(), "1, 2, 3, 4");
}

#[test]
fn plain_dice_stay_in_range() {
	let mut rng = FastRandRoller::with_seed(0x5eed);
	for (count, sides) in [(1, 4), (3, 6), (2, 20), (10, 10), (1, 1)] {
		let dice = Dice::new(count, sides);
		for _ in 0..200 {
			let rolled = rng.roll(&dice, true).unwrap();
			assert_eq!(rolled.rolls.len(), usize::from(count));
			assert!(rolled.rolls.iter().all(|roll| (1..=i32::from(sides)).contains(&roll.val)));

			let total = rolled.total().unwrap();
			assert!((i32::from(count)..=i32::from(count) * i32::from(sides)).contains(&total));
		}
	}
}

#[test]
fn fate_dice_stay_in_range() {
	let mut rng = FastRandRoller::with_seed(42);
	let dice = Dice::fate(4);
	for _ in 0..500 {
		let rolled = rng.roll(&dice, true).unwrap();
		assert!(rolled.rolls.iter().all(|roll| (-1..=1).contains(&roll.val)));
		assert!((-4..=4).contains(&rolled.total().unwrap()));
	}
}

#[test]
fn percentile_dice_stay_in_range() {
	let mut rng = FastRandRoller::with_seed(7);
	let dice = Dice::percentile(2);
	for _ in 0..500 {
		let rolled = rng.roll(&dice, true).unwrap();
		assert!(rolled.rolls.iter().all(|roll| (1..=100).contains(&roll.val)));
	}
}

#[test]
fn keep_high() {
	let dice = Dice::builder().count(4).sides(6).keep_high(3).build();
	let rolled = IterRoller::new([6, 2, 5, 6]).roll(&dice, true).unwrap();
	assert_eq!(rolled.rolls.iter().filter(|roll| roll.is_kept()).count(), 3);
	assert_eq!(rolled.to_string(), "6, 2d, 5, 6");
	assert_eq!(rolled.total().unwrap(), 17);
}

#[test]
fn keep_low() {
	let dice = Dice::builder().count(3).sides(6).keep_low(1).build();
	let rolled = IterRoller::new([4, 2, 5]).roll(&dice, true).unwrap();
	assert_eq!(rolled.to_string(), "4d, 2, 5d");
	assert_eq!(rolled.total().unwrap(), 2);
}

#[test]
fn drop_high() {
	let dice = Dice::builder().count(3).sides(6).drop_high(1).build();
	let rolled = IterRoller::new([4, 2, 5]).roll(&dice, true).unwrap();
	assert_eq!(rolled.to_string(), "4, 2, 5d");
	assert_eq!(rolled.total().unwrap(), 6);
}

#[test]
fn drop_low_ties_drop_the_earliest_die() {
	let dice = Dice::builder().count(3).sides(6).drop_low(1).build();
	let rolled = IterRoller::new([3, 3, 5]).roll(&dice, true).unwrap();
	assert_eq!(rolled.to_string(), "3d, 3, 5");
	assert_eq!(rolled.total().unwrap(), 8);
}

#[test]
fn keep_only_considers_kept_dice() {
	let dice = Dice::builder().count(4).sides(6).drop_low(1).keep_high(2).build();
	let rolled = IterRoller::new([1, 4, 6, 3]).roll(&dice, true).unwrap();
	assert_eq!(rolled.to_string(), "1d, 4, 6, 3d");
	assert_eq!(rolled.total().unwrap(), 10);
}

#[test]
fn explode_adds_dice_after_the_trigger() {
	let dice = Dice::builder().count(2).sides(6).explode(None).build();
	let rolled = IterRoller::new([6, 2, 3]).roll(&dice, true).unwrap();
	assert_eq!(vals(&rolled.rolls), [6, 3, 2]);
	assert!(rolled.rolls[0].is_exploded());
	assert!(rolled.rolls[1].is_additional());
	assert_eq!(rolled.to_string(), "6!, 3, 2");
	assert_eq!(rolled.total().unwrap(), 11);
}

#[test]
fn explode_chains() {
	let dice = Dice::builder().count(2).sides(6).explode(None).build();
	let rolled = IterRoller::new([6, 4, 6, 1]).roll(&dice, true).unwrap();
	assert_eq!(rolled.to_string(), "6!, 6!, 1, 4");
	assert_eq!(rolled.total().unwrap(), 17);
}

#[test]
fn explode_with_condition() {
	let dice = Dice::builder().count(2).sides(6).explode(Some(Condition::Gte(5))).build();
	let rolled = IterRoller::new([5, 3, 2]).roll(&dice, true).unwrap();
	assert_eq!(rolled.to_string(), "5!, 2, 3");
	assert_eq!(rolled.total().unwrap(), 10);
}

#[test]
fn explode_chain_limit() {
	let dice = Dice::builder().count(2).sides(20).explode(None).build();
	let result = MaxRoller.roll(&dice, true);
	assert!(matches!(result, Err(Error::RollLimit(..))));
}

#[test]
fn explode_single_faced_dice() {
	let dice = Dice::builder().count(3).sides(1).explode(None).build();
	let result = ValRoller(1).roll(&dice, true);
	assert!(matches!(result, Err(Error::InfiniteRolls(..))));
}

#[test]
fn reroll_lowest_face_by_default() {
	let dice = Dice::builder().count(2).sides(6).reroll(None, false).build();
	let rolled = IterRoller::new([1, 4, 1]).roll(&dice, true).unwrap();
	assert_eq!(rolled.rolls.len(), 2);
	assert_eq!(rolled.to_string(), "1r, 4");
	assert_eq!(rolled.rolls[0].changes.len(), 1);
}

#[test]
fn reroll_with_condition() {
	let dice = Dice::builder().count(3).sides(6).reroll(Some(Condition::Lt(3)), false).build();
	let rolled = IterRoller::new([2, 5, 1, 6, 1]).roll(&dice, true).unwrap();
	assert_eq!(rolled.to_string(), "6r, 5, 1r");
	assert_eq!(rolled.total().unwrap(), 12);
}

#[test]
fn reroll_recursive_limit() {
	let dice = Dice::builder().count(1).sides(6).reroll(Some(Condition::Eq(1)), true).build();
	let result = ValRoller(1).roll(&dice, true);
	assert!(matches!(result, Err(Error::RollLimit(..))));
}

#[test]
fn reroll_recursive_every_face() {
	let dice = Dice::builder().count(2).sides(4).reroll(Some(Condition::Lte(4)), true).build();
	let result = ValRoller(1).roll(&dice, true);
	assert!(matches!(result, Err(Error::InfiniteRolls(..))));
}

#[test]
fn min_clamps_counted_value() {
	let dice = Dice::builder().count(3).sides(6).min(3).build();
	let rolled = IterRoller::new([1, 5, 2]).roll(&dice, true).unwrap();
	assert_eq!(vals(&rolled.rolls), [1, 5, 2]);
	assert_eq!(rolled.to_string(), "1[3], 5, 2[3]");
	assert_eq!(rolled.total().unwrap(), 11);
}

#[test]
fn max_clamps_counted_value() {
	let dice = Dice::builder().count(2).sides(6).max(4).build();
	let rolled = IterRoller::new([6, 3]).roll(&dice, true).unwrap();
	assert_eq!(rolled.to_string(), "6[4], 3");
	assert_eq!(rolled.total().unwrap(), 7);
}

#[test]
fn modifiers_skipped_when_not_applied() {
	let dice = Dice::builder().count(3).sides(6).keep_high(1).build();
	let rolled = IterRoller::new([1, 2, 3]).roll(&dice, false).unwrap();
	assert_eq!(rolled.to_string(), "1, 2, 3");
	assert_eq!(rolled.total().unwrap(), 6);
}

#[test]
fn total_overflow() {
	let dice = Dice::new(2, 20);
	let rolled = ValRoller(i32::MAX).roll(&dice, true).unwrap();
	assert!(matches!(rolled.total(), Err(Error::Overflow(..))));
}

#[test]
fn dice_notation() {
	assert_eq!(Dice::default().to_string(), "1d20");
	assert_eq!(Dice::fate(4).to_string(), "4dF");
	assert_eq!(Dice::percentile(1).to_string(), "1d%");
	assert_eq!(
		Dice::builder()
			.count(4)
			.sides(6)
			.reroll(Some(Condition::Eq(1)), false)
			.explode(Some(Condition::Gt(5)))
			.drop_low(1)
			.min(2)
			.build()
			.to_string(),
		"4d6r1!>5dl1min2"
	);
}

#[test]
fn single_faced_sides() {
	assert!(Sides::Num(1).is_single_faced());
	assert!(!Sides::Num(2).is_single_faced());
	assert!(!Sides::Fate.is_single_faced());
}

#[test]
fn selection_counts() {
	assert_eq!(Modifier::KeepHigh(3).selection_count(), Some(3));
	assert_eq!(Modifier::DropLow(1).selection_count(), Some(1));
	assert_eq!(Modifier::Min(2).selection_count(), None);
	assert_eq!(Modifier::Explode { cond: None }.selection_count(), None);
}

#[test]
fn clamp_counted_keeps_face() {
	let mut roll = crate::dice::DieRoll::new(1);
	roll.clamp_counted(Modifier::Min(3), 3);
	assert_eq!(roll.val, 1);
	assert_eq!(roll.counted, 3);
	assert!(roll.is_clamped());
	assert!(!roll.is_rerolled());
	assert_eq!(roll.to_string(), "1[3]");
}
