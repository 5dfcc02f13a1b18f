//! Adapter between the roll engine and a host chat application: command, macro, and function tool replies.
//!
//! Callers detect failures by matching the sentinel strings in replies, so their text is part of the contract.

use alloc::{
	format,
	string::{String, ToString},
};

#[cfg(feature = "logging")]
use log::debug;

use crate::{dice::Roller, engine, normalize::normalize};

/// Reply given when a formula doesn't validate
pub const INVALID_FORMULA: &str = "[Invalid dice formula]";

/// Reply given when a valid formula fails while rolling
pub const ROLL_FAILED: &str = "[Roll failed]";

/// Reply given when the roll engine isn't available to the host
pub const NOT_LOADED: &str = "[Dice roller not loaded]";

/// Formula rolled by the function tool when it isn't given one
pub const DEFAULT_TOOL_FORMULA: &str = "d20";

/// Host settings that control how rolls are surfaced
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub struct Settings {
	/// Whether the roll function tool is offered to the host at all
	pub function_tool: bool,

	/// Whether command rolls are kept out of the chat (only returned to the caller)
	pub quiet: bool,
}

impl Settings {
	/// Creates settings with the given function tool and quiet flags.
	#[must_use]
	pub const fn new(function_tool: bool, quiet: bool) -> Self {
		Self { function_tool, quiet }
	}
}

impl Default for Settings {
	/// Creates the default settings: the function tool is offered and command rolls are announced.
	fn default() -> Self {
		Self::new(true, false)
	}
}

/// Result of running the roll command
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[non_exhaustive]
pub struct Reply {
	/// Text returned to the caller: `<total> (<rolls>)`, a sentinel, or nothing for an empty formula
	pub output: String,

	/// Chat message announcing the roll, unless the roll was quiet or failed
	pub message: Option<String>,
}

/// Builds the chat message announcing a roll.
///
/// # Examples
/// ```
/// use droll::{chat::announce, dice::roller::Iter as IterRoller, roll_using};
///
/// let result = roll_using("1d20+5", &mut IterRoller::new([12]))?;
/// assert_eq!(announce("Seraphina", &result.formula, &result), "Seraphina rolls 1d20+5. The result is: 17 (12 + 5)");
/// # Ok::<(), droll::Error>(())
/// ```
#[must_use]
pub fn announce(actor: &str, formula: &str, result: &engine::RollResult) -> String {
	format!("{actor} rolls {formula}. The result is: {result}")
}

/// Rolls a formula and builds its reply text, mapping failures to [`INVALID_FORMULA`] or [`ROLL_FAILED`].
#[must_use]
pub fn roll_to_string(formula: &str, rng: &mut impl Roller) -> String {
	match engine::roll_using(formula, rng) {
		Ok(result) => result.to_string(),
		Err(err) => {
			#[cfg(feature = "logging")]
			debug!("Roll of \"{formula}\" failed: {err}");
			err.sentinel().into()
		}
	}
}

/// Runs the roll command for an actor. An empty formula produces an empty reply, an invalid one produces
/// [`INVALID_FORMULA`], and one that fails to roll produces [`ROLL_FAILED`]. Successful rolls are announced in a chat
/// message unless the settings are quiet.
///
/// # Examples
/// ```
/// use droll::{chat::{command, Settings, INVALID_FORMULA}, dice::roller::Iter as IterRoller};
///
/// let reply = command("Seraphina", "2d6", Settings::default(), &mut IterRoller::new([3, 4]));
/// assert_eq!(reply.output, "7 (3, 4)");
/// assert_eq!(reply.message.as_deref(), Some("Seraphina rolls 2d6. The result is: 7 (3, 4)"));
///
/// let reply = command("Seraphina", "2d", Settings::default(), &mut IterRoller::new([0; 0]));
/// assert_eq!(reply.output, INVALID_FORMULA);
/// assert_eq!(reply.message, None);
/// ```
#[must_use]
pub fn command(actor: &str, formula: &str, settings: Settings, rng: &mut impl Roller) -> Reply {
	let formula = formula.trim();
	if formula.is_empty() {
		return Reply::default();
	}

	if !engine::validate(formula) {
		return Reply {
			output: INVALID_FORMULA.into(),
			message: None,
		};
	}

	match engine::roll_using(formula, rng) {
		Ok(result) => Reply {
			message: (!settings.quiet).then(|| announce(actor, formula, &result)),
			output: result.to_string(),
		},
		Err(_err) => {
			#[cfg(feature = "logging")]
			debug!("Roll of \"{formula}\" failed: {_err}");
			Reply {
				output: ROLL_FAILED.into(),
				message: None,
			}
		}
	}
}

/// Runs the roll function tool: rolls quietly and describes the outcome for the persona that rolled, if any.
/// A missing or empty formula rolls [`DEFAULT_TOOL_FORMULA`]. Returns [`None`] when the settings don't offer the
/// function tool.
///
/// # Examples
/// ```
/// use droll::{chat::{function_tool_reply, Settings}, dice::roller::Iter as IterRoller};
///
/// let reply = function_tool_reply(Some("Seraphina"), Some("1d20"), Settings::default(), &mut IterRoller::new([9]));
/// assert_eq!(reply.as_deref(), Some("Seraphina rolls a 1d20. The result is: 9 (9)"));
///
/// let reply = function_tool_reply(None, None, Settings::default(), &mut IterRoller::new([20]));
/// assert_eq!(reply.as_deref(), Some("The result of a d20 roll is: 20 (20)"));
/// ```
#[must_use]
pub fn function_tool_reply(
	who: Option<&str>,
	formula: Option<&str>,
	settings: Settings,
	rng: &mut impl Roller,
) -> Option<String> {
	if !settings.function_tool {
		return None;
	}

	let formula = formula
		.map(str::trim)
		.filter(|formula| !formula.is_empty())
		.unwrap_or(DEFAULT_TOOL_FORMULA);
	let roll = command("", formula, Settings::new(true, true), rng).output;

	Some(match who.filter(|who| !who.is_empty()) {
		Some(who) => format!("{who} rolls a {formula}. The result is: {roll}"),
		None => format!("The result of a {formula} roll is: {roll}"),
	})
}

/// Expands the `rolls` text macro, whose replies spell out what went wrong instead of using the command sentinels.
///
/// # Examples
/// ```
/// use droll::{chat::macro_reply, dice::roller::Iter as IterRoller};
///
/// assert_eq!(macro_reply("'20'", &mut IterRoller::new([11])), "11 (11)");
/// assert_eq!(macro_reply("  ", &mut IterRoller::new([0; 0])), "[Error: Empty dice formula]");
/// assert_eq!(macro_reply("2x6", &mut IterRoller::new([0; 0])), "[Error: Invalid formula \"2x6\"]");
/// ```
#[must_use]
pub fn macro_reply(args: &str, rng: &mut impl Roller) -> String {
	let formula = match normalize(args) {
		Ok(formula) => formula,
		Err(engine::Error::EmptyInput) => return "[Error: Empty dice formula]".into(),
		Err(_) => return format!("[Error: Invalid formula \"{}\"]", args.trim()),
	};

	if !engine::validate(&formula) {
		#[cfg(feature = "logging")]
		debug!("Invalid roll formula: {formula}");
		return format!("[Error: Invalid formula \"{formula}\"]");
	}

	match engine::roll_using(&formula, rng) {
		Ok(result) => result.to_string(),
		Err(_) => format!("[Error: Failed to roll {formula}]"),
	}
}
