use chumsky::Parser;

use crate::{
	dice::{
		modifier::{Condition, Modifier},
		roller::FastRand as FastRandRoller,
		Dice, Sides,
	},
	expr::Expr,
	parse,
};

fn parse_expr(input: &str) -> Expr {
	parse::expr().parse(input).into_result().unwrap()
}

fn parse_fails(input: &str) -> bool {
	parse::expr().parse(input).into_result().is_err()
}

fn calc(input: &str) -> i32 {
	parse_expr(input)
		.eval(&mut FastRandRoller::default())
		.unwrap()
		.calc()
		.unwrap()
}

#[test]
fn basic_addition() {
	assert_eq!(calc("42 + 69"), 111);
}

#[test]
fn basic_subtraction() {
	assert_eq!(calc("42 - 69"), -27);
}

#[test]
fn basic_multiplication() {
	assert_eq!(calc("42 * 69"), 2898);
}

#[test]
fn basic_division() {
	assert_eq!(calc("50 / 11"), 4);
}

#[test]
fn complex_math() {
	assert_eq!(calc("-5 * (3 + 1) - -4 / 2"), -18);
}

#[test]
fn precedence_and_associativity() {
	assert_eq!(
		parse_expr("1 + 2 * 3"),
		Expr::Add(
			Box::new(Expr::Num(1)),
			Box::new(Expr::Mul(Box::new(Expr::Num(2)), Box::new(Expr::Num(3)))),
		)
	);
	assert_eq!(
		parse_expr("(1 + 2) * 3"),
		Expr::Mul(
			Box::new(Expr::Group(Box::new(Expr::Add(
				Box::new(Expr::Num(1)),
				Box::new(Expr::Num(2)),
			)))),
			Box::new(Expr::Num(3)),
		)
	);
	assert_eq!(calc("(1 + 2) * 3"), 9);
	assert_eq!(calc("10 - 2 - 3"), 5);
	assert_eq!(calc("100 / 10 / 5"), 2);
}

#[test]
fn basic_dice() {
	assert_eq!(parse_expr("4d6"), Expr::Dice(Dice::new(4, 6)));
	assert_eq!(parse_expr("d20"), Expr::Dice(Dice::new(1, 20)));
	assert_eq!(parse_expr("4df"), Expr::Dice(Dice::fate(4)));
	assert_eq!(parse_expr("d%"), Expr::Dice(Dice::percentile(1)));
}

#[test]
fn dice_with_modifiers() {
	assert_eq!(
		parse_expr("4d6kh3"),
		Expr::Dice(Dice::builder().count(4).sides(6).keep_high(3).build())
	);
	assert_eq!(
		parse_expr("2d20k"),
		Expr::Dice(Dice::builder().count(2).sides(20).keep_high(1).build())
	);
	assert_eq!(
		parse_expr("2d20kl"),
		Expr::Dice(Dice::builder().count(2).sides(20).keep_low(1).build())
	);
	assert_eq!(
		parse_expr("4d6dl1dh1"),
		Expr::Dice(Dice::builder().count(4).sides(6).drop_low(1).drop_high(1).build())
	);
	assert_eq!(
		parse_expr("2d6!>4"),
		Expr::Dice(Dice::builder().count(2).sides(6).explode(Some(Condition::Gt(4))).build())
	);
	assert_eq!(
		parse_expr("4d6r<3"),
		Expr::Dice(Dice::builder().count(4).sides(6).reroll(Some(Condition::Lt(3)), false).build())
	);
	assert_eq!(
		parse_expr("4d6rr1"),
		Expr::Dice(Dice::builder().count(4).sides(6).reroll(Some(Condition::Eq(1)), true).build())
	);
	assert_eq!(
		parse_expr("3d6min2max5"),
		Expr::Dice(Dice::builder().count(3).sides(6).min(2).max(5).build())
	);
}

#[test]
fn modifiers_keep_declaration_order() {
	let Expr::Dice(dice) = parse_expr("4d6!r1kh3") else {
		panic!("not parsed as dice");
	};
	assert_eq!(
		dice.modifiers,
		[
			Modifier::Explode { cond: None },
			Modifier::Reroll {
				cond: Some(Condition::Eq(1)),
				recurse: false
			},
			Modifier::KeepHigh(3),
		]
	);
}

#[test]
fn surrounding_whitespace() {
	assert_eq!(
		parse_expr("  1d20   +  5 "),
		Expr::Add(Box::new(Expr::Dice(Dice::new(1, 20))), Box::new(Expr::Num(5)))
	);
}

#[test]
fn invalid_expressions() {
	for input in [
		"", "2d", "d", "d0", "0d6", "4d6kh5", "4d6kh0", "2d6dl3", "10 / 0", "1d20 +", "abc", "1d20)", "(1d20", "2x6",
		"1d20 5", "10/-0", "10 / (0)", "10 / -(0)", "10 / --0",
	] {
		assert!(parse_fails(input), "\"{input}\" should fail to parse");
	}
}

#[test]
fn error_details_point_at_input() {
	let err = "1d20 + x".parse::<Expr>().unwrap_err();
	assert!(err.details.contains("near"), "{}", err.details);
}

#[test]
fn from_str_ignores_case() {
	let dice: Dice = "4D6KH3".parse().unwrap();
	assert_eq!(dice, Dice::builder().count(4).sides(6).keep_high(3).build());

	let dice: Dice = "4DF".parse().unwrap();
	assert_eq!(dice.sides, Sides::Fate);
}

#[test]
fn canonical_notation_reparses() {
	for input in [
		"1d20 + 5",
		"4d6kh3",
		"(2d6 + 2) * 3",
		"1 - (2 - 3)",
		"-(1d4 + 1)",
		"--5",
		"4dF - 2",
		"3d6r1!>5dl1min2max5",
		"d% / 10",
		"1d20 + 2 * 3",
		"(1d20) + 5",
		"((2))",
	] {
		let expr: Expr = input.parse().unwrap();
		let reparsed: Expr = expr.to_string().parse().unwrap();
		assert_eq!(expr, reparsed, "\"{input}\" was rendered as \"{expr}\"");
	}
}

#[test]
fn dividing_by_rolled_zero_parses() {
	assert!(!parse_fails("10 / (1d1 - 1)"));
	assert!(!parse_fails("10 / -1d1"));
}
