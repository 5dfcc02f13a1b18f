use crate::{
	dice::roller::{FastRand as FastRandRoller, Iter as IterRoller, Max as MaxRoller, Val as ValRoller},
	expr::CalcError,
	roll_using, validate, Error, MAX_FORMULA_LEN,
};

#[test]
fn bare_number_is_one_die() {
	let bare = roll_using("20", &mut IterRoller::new([7])).unwrap();
	let full = roll_using("1d20", &mut IterRoller::new([7])).unwrap();
	assert_eq!(bare, full);
	assert_eq!(bare.formula, "1d20");
}

#[test]
fn missing_count_is_one_die() {
	let short = roll_using("d20+5", &mut IterRoller::new([13])).unwrap();
	let full = roll_using("1d20+5", &mut IterRoller::new([13])).unwrap();
	assert_eq!(short, full);
	assert_eq!(short.total, 18);
	assert_eq!(short.formula, "1d20+5");
}

#[test]
fn quotes_are_ignored() {
	let result = roll_using("\"2d6\"", &mut IterRoller::new([1, 2])).unwrap();
	assert_eq!(result.total, 3);
	assert_eq!(result.formula, "2d6");
	assert!(validate("'d8'"));
}

#[test]
fn case_is_ignored() {
	let result = roll_using("2D6KH1", &mut IterRoller::new([1, 2])).unwrap();
	assert_eq!(result.total, 2);
	assert_eq!(result.rolls, "1d, 2");
}

#[test]
fn keep_high_breakdown() {
	let mut rng = FastRandRoller::with_seed(1234);
	for _ in 0..100 {
		let result = roll_using("4d6kh3", &mut rng).unwrap();
		let dice = result.rolls.split(", ").collect::<Vec<_>>();
		assert_eq!(dice.len(), 4);
		assert_eq!(dice.iter().filter(|die| die.ends_with('d')).count(), 1);
		assert!((3..=18).contains(&result.total));
	}
}

#[test]
fn modifier_breakdown() {
	let result = roll_using("4d6kh3 + 2", &mut IterRoller::new([6, 2, 5, 6])).unwrap();
	assert_eq!(result.total, 19);
	assert_eq!(result.rolls, "6, 2d, 5, 6 + 2");
	assert_eq!(result.groups, ["6, 2d, 5, 6", "+", "2"]);
	assert_eq!(result.to_string(), "19 (6, 2d, 5, 6 + 2)");
}

#[test]
fn flat_bonus_breakdown() {
	let mut rng = FastRandRoller::with_seed(99);
	for _ in 0..100 {
		let result = roll_using("1d20+5", &mut rng).unwrap();
		let (die, bonus) = result.rolls.split_once(" + ").unwrap();
		let die: i32 = die.parse().unwrap();
		assert!((1..=20).contains(&die));
		assert_eq!(bonus, "5");
		assert_eq!(result.total, die + 5);
	}
}

#[test]
fn results_stay_in_range() {
	let mut rng = FastRandRoller::with_seed(2024);
	for (formula, min, max) in [
		("1d20", 1, 20),
		("3d6", 3, 18),
		("4dF", -4, 4),
		("d%", 1, 100),
		("2d10 + 3", 5, 23),
		("1d4 - 1d4", -3, 3),
	] {
		for _ in 0..200 {
			let total = roll_using(formula, &mut rng).unwrap().total;
			assert!((min..=max).contains(&total), "{formula} rolled {total}");
		}
	}
}

#[test]
fn exploding_past_the_limit_fails() {
	let result = roll_using("2d20!", &mut MaxRoller);
	assert!(matches!(result, Err(Error::Eval(..))));
	assert!(!result.unwrap_err().is_invalid_formula());
	assert!(validate("2d20!"));
}

#[test]
fn division_by_rolled_zero_fails() {
	let result = roll_using("5 / (1d1 - 1)", &mut ValRoller(1));
	assert!(matches!(result, Err(Error::Calc(CalcError::Division(..)))));
	assert!(validate("5 / (1d1 - 1)"));
}

#[test]
fn empty_formula() {
	for formula in ["", "   ", "\t\n", "''", "\" \""] {
		assert!(
			matches!(roll_using(formula, &mut ValRoller(1)), Err(Error::EmptyInput)),
			"{formula:?} should be empty"
		);
		assert!(!validate(formula));
	}
}

#[test]
fn formula_length_limit() {
	let too_long = format!("{}1", "1+".repeat(50));
	assert_eq!(too_long.len(), MAX_FORMULA_LEN + 1);
	assert!(matches!(
		roll_using(&too_long, &mut ValRoller(1)),
		Err(Error::FormulaTooLong { len: 101, max: 100 })
	));
	assert!(!validate(&too_long));

	let longest = format!("{}11", "1+".repeat(49));
	assert_eq!(longest.len(), MAX_FORMULA_LEN);
	assert_eq!(roll_using(&longest, &mut ValRoller(1)).unwrap().total, 60);
}

#[test]
fn invalid_formulas() {
	for formula in ["2d", "d0", "4d6kh5", "10 / 0", "1d20 +", "hello", "2x6"] {
		let err = roll_using(formula, &mut ValRoller(1)).unwrap_err();
		assert!(matches!(err, Error::Parse(..)), "{formula}: {err}");
		assert!(err.is_invalid_formula());
		assert!(!validate(formula));
	}
}

#[test]
fn validate_matches_rolling() {
	for formula in [
		"d20", "20", "4d6kh3", "2d20!", "1d1!", "8d6r1", "4dF + 1", "", "2d", "1d20 + ", "(1d6) * 2", "3d6kh4",
		"5 / 0", "d%",
	] {
		let invalid = matches!(roll_using(formula, &mut MaxRoller), Err(err) if err.is_invalid_formula());
		assert_eq!(validate(formula), !invalid, "{formula}");
	}
}

#[test]
fn validate_is_idempotent() {
	for formula in ["1d20", "nope", "4d6kh3", ""] {
		assert_eq!(validate(formula), validate(formula));
	}
}

#[test]
fn roll_with_default_rng() {
	let result = crate::roll("d20").unwrap();
	assert!((1..=20).contains(&result.total));
	assert_eq!(result.rolls, result.total.to_string());
}

#[test]
fn breakdown_follows_source_grouping() {
	let result = roll_using("1d20+2*3", &mut IterRoller::new([14])).unwrap();
	assert_eq!(result.rolls, "14 + 2 * 3");
	assert_eq!(result.total, 20);

	let result = roll_using("2*1d6+3", &mut IterRoller::new([4])).unwrap();
	assert_eq!(result.rolls, "2 * 4 + 3");
	assert_eq!(result.total, 11);

	let result = roll_using("(1d20)+5", &mut IterRoller::new([4])).unwrap();
	assert_eq!(result.rolls, "(4) + 5");
	assert_eq!(result.groups, ["(4)", "+", "5"]);
	assert_eq!(result.total, 9);

	let result = roll_using("2 * (1d6 + 3)", &mut IterRoller::new([4])).unwrap();
	assert_eq!(result.rolls, "2 * (4 + 3)");
	assert_eq!(result.total, 14);

	let result = roll_using("-2d6", &mut IterRoller::new([3, 4])).unwrap();
	assert_eq!(result.rolls, "-3, 4");
	assert_eq!(result.total, -7);
}

#[test]
fn negated_zero_divisor_is_invalid() {
	for formula in ["10/-0", "10 / (0)", "10 / -(0)"] {
		assert!(!validate(formula), "{formula}");
		let err = roll_using(formula, &mut ValRoller(1)).unwrap_err();
		assert!(matches!(err, Error::Parse(..)), "{formula}: {err}");
	}
}

#[test]
fn uppercase_shorthand_is_one_die() {
	let upper = roll_using("D20", &mut IterRoller::new([9])).unwrap();
	let lower = roll_using("d20", &mut IterRoller::new([9])).unwrap();
	assert_eq!(upper, lower);
	assert_eq!(upper.formula, "1d20");
}
