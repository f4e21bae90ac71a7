//! Turns one line of operator input into something the console can act on. Parsing is pure; nothing
//! in here talks to the device, so anything rejected here never reaches the network.

use std::num::IntErrorKind;

use crate::command::{Command, Parameter};
use crate::scenarios::{self, Scenario};

/// Why a well formed parameter command was dropped without being sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dropped {
  /// The value parsed, but is outside of the accepted range.
  OutOfRange {
    /// The parameter as typed.
    parameter: String,

    /// The offending value, as typed.
    value: String,
  },

  /// `color` was given something other than three comma separated channels.
  ColorShape(String),
}

impl std::fmt::Display for Dropped {
  fn fmt(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
    match self {
      Self::OutOfRange { parameter, value } => write!(formatter, "{parameter} value {value} out of range"),
      Self::ColorShape(value) => write!(formatter, "'{value}' is not an r,g,b triple"),
    }
  }
}

/// Everything a line of input can mean.
#[derive(Debug, PartialEq, Eq)]
pub enum Input {
  /// Blank line.
  Empty,

  /// Leave the interactive loop.
  Quit,

  /// Print the command summary.
  Help,

  /// List the effect catalog.
  Effects,

  /// List the scenario catalog.
  Scenarios,

  /// Fetch and print the device status.
  Status,

  /// Run every effect in turn.
  Test,

  /// Run a scenario.
  Scenario(&'static Scenario),

  /// Send a single, validated command.
  Send(Command),

  /// A parameter command that was understood but is not going to be sent.
  Dropped(Dropped),

  /// A value that should have been a number was not.
  InvalidNumber(String),

  /// `<param> <value>` with a parameter nobody knows about.
  UnknownParameter(String),

  /// Anything else.
  Unknown(String),
}

/// Parses one line of input. Keywords are case-insensitive and surrounding whitespace is ignored.
pub fn parse(line: &str) -> Input {
  let trimmed = line.trim();
  let lowered = trimmed.to_lowercase();

  match lowered.as_str() {
    "" => Input::Empty,
    "quit" | "exit" | "q" => Input::Quit,
    "help" | "h" | "?" => Input::Help,
    "effects" => Input::Effects,
    "scenarios" => Input::Scenarios,
    "status" => Input::Status,
    "on" => Input::Send(Command::SetPower(true)),
    "off" => Input::Send(Command::SetPower(false)),
    "auto" => Input::Send(Command::SetAuto(true)),
    "manual" => Input::Send(Command::SetAuto(false)),
    _ => {
      let mut words = trimmed.split_whitespace();

      if let (Some(parameter), Some(value)) = (words.next(), words.next()) {
        return parameter_command(parameter, value);
      }

      if let Some(scenario) = scenarios::find(&lowered) {
        return Input::Scenario(scenario);
      }

      if lowered == "test" {
        return Input::Test;
      }

      Input::Unknown(trimmed.to_string())
    }
  }
}

/// Parses an integer, remembering the original text for error reporting. Integers too large to
/// represent are out of range for every parameter, not malformed.
fn number(parameter: &str, value: &str) -> Result<i64, Input> {
  value.trim().parse::<i64>().map_err(|error| match error.kind() {
    IntErrorKind::PosOverflow | IntErrorKind::NegOverflow => Input::Dropped(Dropped::OutOfRange {
      parameter: parameter.to_string(),
      value: value.trim().to_string(),
    }),
    _ => Input::InvalidNumber(value.to_string()),
  })
}

/// Narrows `value` into `0..=max`, or explains why it was dropped.
fn bounded(parameter: &str, value: i64, max: u8) -> Result<u8, Input> {
  match u8::try_from(value) {
    Ok(narrowed) if narrowed <= max => Ok(narrowed),
    _ => Err(Input::Dropped(Dropped::OutOfRange {
      parameter: parameter.to_string(),
      value: value.to_string(),
    })),
  }
}

/// Handles the `<param> <value>` form.
fn parameter_command(parameter: &str, value: &str) -> Input {
  let name = parameter.to_lowercase();

  let command = match name.as_str() {
    "brightness" => number(&name, value)
      .and_then(|value| bounded(&name, value, u8::MAX))
      .map(Command::SetBrightness),
    "effect" => number(&name, value)
      .and_then(|value| bounded(&name, value, crate::effects::LAST_ID))
      .map(Command::SetEffect),
    "color" => color(value),
    _ => match Parameter::from_name(&name) {
      Some(known) => number(&name, value)
        .and_then(|value| bounded(&name, value, known.max()))
        .map(|value| Command::AdjustParam(known, value)),
      None => return Input::UnknownParameter(name),
    },
  };

  match command {
    Ok(command) => Input::Send(command),
    Err(input) => input,
  }
}

/// Parses `r,g,b`. Anything that is not a number is an error; anything that is not three in-range
/// channels is dropped.
fn color(value: &str) -> Result<Command, Input> {
  if !value.contains(',') {
    return Err(Input::Dropped(Dropped::ColorShape(value.to_string())));
  }

  let channels = value
    .split(',')
    .map(|channel| number("color", channel))
    .collect::<Result<Vec<i64>, Input>>()?;

  let narrowed = channels
    .iter()
    .map(|channel| bounded("color", *channel, u8::MAX))
    .collect::<Result<Vec<u8>, Input>>()?;

  match narrowed.as_slice() {
    [red, green, blue] => Ok(Command::SetColor(*red, *green, *blue)),
    _ => Err(Input::Dropped(Dropped::ColorShape(value.to_string()))),
  }
}
