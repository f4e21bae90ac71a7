use crate::command::{Command, Parameter};

/// A named, ordered sequence of commands that puts the strip into a known look.
#[derive(Debug, PartialEq, Eq)]
pub struct Scenario {
  /// What the operator types to activate it.
  pub key: &'static str,

  /// Friendly name shown when listing.
  pub name: &'static str,

  /// Sent in order, one at a time.
  pub commands: &'static [Command],
}

/// The scenario catalog.
pub static SCENARIOS: [Scenario; 6] = [
  Scenario {
    key: "party",
    name: "Party Mode",
    commands: &[
      Command::SetAuto(false),
      Command::SetEffect(3),
      Command::SetParam(Parameter::Speed, 85),
      Command::SetParam(Parameter::ColorMode, 1),
      Command::SetBrightness(255),
    ],
  },
  Scenario {
    key: "relax",
    name: "Relaxation",
    commands: &[
      Command::SetAuto(false),
      Command::SetEffect(11),
      Command::SetParam(Parameter::Speed, 15),
      Command::SetParam(Parameter::Intensity, 10),
      Command::SetColor(0, 50, 150),
    ],
  },
  Scenario {
    key: "fire",
    name: "Fireplace",
    commands: &[
      Command::SetAuto(false),
      Command::SetEffect(13),
      Command::SetParam(Parameter::Speed, 30),
      Command::SetParam(Parameter::Intensity, 60),
      Command::SetParam(Parameter::ColorMode, 0),
    ],
  },
  Scenario {
    key: "matrix",
    name: "Matrix",
    commands: &[
      Command::SetAuto(false),
      Command::SetEffect(19),
      Command::SetColor(0, 255, 0),
      Command::SetParam(Parameter::Speed, 70),
      Command::SetParam(Parameter::Intensity, 80),
    ],
  },
  Scenario {
    key: "police",
    name: "Alarm",
    commands: &[
      Command::SetAuto(false),
      Command::SetEffect(7),
      Command::SetParam(Parameter::Speed, 95),
      Command::SetParam(Parameter::Intensity, 100),
      Command::SetBrightness(255),
    ],
  },
  Scenario {
    key: "rainbow",
    name: "Rainbow",
    commands: &[
      Command::SetAuto(false),
      Command::SetEffect(5),
      Command::SetParam(Parameter::Speed, 50),
      Command::SetParam(Parameter::ColorMode, 1),
      Command::SetParam(Parameter::Intensity, 70),
    ],
  },
];

/// Finds a scenario by its exact (lowercase) key.
pub fn find(key: &str) -> Option<&'static Scenario> {
  SCENARIOS.iter().find(|scenario| scenario.key == key)
}
