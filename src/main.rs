fn main() -> std::process::ExitCode {
	use std::env;
	use std::io::{self, Write};
	use std::process::ExitCode;

	use ariadne::{Color, Label, Report, ReportKind, Source};
	use chumsky::Parser;
	use droll::{dice::roller::FastRand, expr::Describe, normalize::normalize};

	pretty_env_logger::init();

	let args = env::args();
	let input = if args.len() > 1 {
		// Obtain the formula by combining all args passed to the executable, so that it can be left unquoted
		// even with spaces. The first argument is ignored since it is typically the name of the executable itself.
		args.skip(1).collect::<Vec<String>>().join(" ")
	} else {
		let mut lines = io::stdin().lines();

		// If there isn't already input available in stdin, display a prompt for it
		if lines.size_hint().1.is_none() {
			print!("Enter dice formula: ");
			if let Err(err) = io::stdout().flush() {
				eprintln!("Unable to flush stdout: {err}");
			}
		}

		// Grab the first line available from stdin
		match lines.next() {
			Some(Ok(line)) => line,
			Some(Err(err)) => {
				eprintln!("Unable to read formula: {err}");
				return ExitCode::FAILURE;
			}
			None => String::new(),
		}
	};

	println!("Input: {input}");

	let formula = match normalize(&input) {
		Ok(formula) => formula,
		Err(err) => {
			eprintln!("{}: {err}", droll::chat::INVALID_FORMULA);
			return ExitCode::FAILURE;
		}
	};

	let expr = match droll::parse::expr().parse(&formula).into_result() {
		Ok(expr) => expr,
		Err(errs) => {
			for err in errs {
				let span = err.span().start..err.span().end;
				let report = Report::build(ReportKind::Error, span.clone())
					.with_message(droll::chat::INVALID_FORMULA)
					.with_label(
						Label::new(span)
							.with_message(err.to_string())
							.with_color(Color::Red),
					)
					.finish()
					.eprint(Source::from(&formula));
				if let Err(err) = report {
					eprintln!("Unable to print parse error: {err}");
				}
			}
			return ExitCode::FAILURE;
		}
	};

	println!("Parsed: {expr:?}");
	println!("Canonical: {expr}");
	println!("Deterministic: {}", expr.is_deterministic());

	let evaled = match expr.eval(&mut FastRand::default()) {
		Ok(evaled) => evaled,
		Err(err) => {
			eprintln!("{}: {err}", droll::chat::ROLL_FAILED);
			return ExitCode::FAILURE;
		}
	};

	println!();
	println!("Evaluated: {evaled:?}");
	println!("Rolls: {}", evaled.describe(None));

	match evaled.calc() {
		Ok(total) => {
			println!("Total: {total}");
			ExitCode::SUCCESS
		}
		Err(err) => {
			eprintln!("{}: {err}", droll::chat::ROLL_FAILED);
			ExitCode::FAILURE
		}
	}
}
