/// The tunable, per-effect parameters the firmware exposes through `PARAM:<name>:<value>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Parameter {
  /// Animation speed, `0..=100`.
  Speed,

  /// Effect intensity, `0..=100`.
  Intensity,

  /// Segment or particle size, `0..=100`.
  Size,

  /// Palette selection, `0..=100`.
  ColorMode,

  /// How quickly pixels fade out, `0..=100`.
  FadeSpeed,

  /// Animation direction; only `0` and `1` are valid.
  Direction,
}

impl Parameter {
  /// Every parameter, in the order they are presented to the operator.
  pub const ALL: [Parameter; 6] = [
    Parameter::Speed,
    Parameter::Intensity,
    Parameter::Size,
    Parameter::ColorMode,
    Parameter::FadeSpeed,
    Parameter::Direction,
  ];

  /// Matches operator input (case-insensitive) against the known parameter names.
  pub fn from_name(input: &str) -> Option<Self> {
    match input.to_lowercase().as_str() {
      "speed" => Some(Self::Speed),
      "intensity" => Some(Self::Intensity),
      "size" => Some(Self::Size),
      "colormode" => Some(Self::ColorMode),
      "fadespeed" => Some(Self::FadeSpeed),
      "direction" => Some(Self::Direction),
      _ => None,
    }
  }

  /// The camelCase spelling used by the preset scenarios.
  pub fn wire_name(&self) -> &'static str {
    match self {
      Self::Speed => "speed",
      Self::Intensity => "intensity",
      Self::Size => "size",
      Self::ColorMode => "colorMode",
      Self::FadeSpeed => "fadeSpeed",
      Self::Direction => "direction",
    }
  }

  /// The lowercase spelling operators type, which is also what interactive commands send.
  pub fn typed_name(&self) -> &'static str {
    match self {
      Self::Speed => "speed",
      Self::Intensity => "intensity",
      Self::Size => "size",
      Self::ColorMode => "colormode",
      Self::FadeSpeed => "fadespeed",
      Self::Direction => "direction",
    }
  }

  /// The largest accepted value; the smallest is always zero.
  pub fn max(&self) -> u8 {
    match self {
      Self::Direction => 1,
      _ => 100,
    }
  }
}

impl std::fmt::Display for Parameter {
  fn fmt(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
    write!(formatter, "{}", self.wire_name())
  }
}

/// A single state change for the device. Values are only ever turned into their string form at the
/// http boundary, via `Display`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
  /// Power the strip on (`ON:1`) or off (`OFF:1`).
  SetPower(bool),

  /// Toggle the firmware's automatic effect cycling.
  SetAuto(bool),

  /// Select an effect by catalog id.
  SetEffect(u8),

  /// Global brightness.
  SetBrightness(u8),

  /// Tune one of the current effect's parameters, sent with the camelCase name (`PARAM:colorMode:1`).
  SetParam(Parameter, u8),

  /// Same as `SetParam`, but sent with the lowercase name the operator typed (`PARAM:colormode:1`).
  AdjustParam(Parameter, u8),

  /// Base color as red, green, blue.
  SetColor(u8, u8, u8),
}

impl std::fmt::Display for Command {
  fn fmt(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
    match self {
      Self::SetPower(true) => write!(formatter, "ON:1"),
      Self::SetPower(false) => write!(formatter, "OFF:1"),
      Self::SetAuto(enabled) => write!(formatter, "AUTO:{}", u8::from(*enabled)),
      Self::SetEffect(id) => write!(formatter, "EFFECT:{id}"),
      Self::SetBrightness(value) => write!(formatter, "BRIGHT:{value}"),
      Self::SetParam(parameter, value) => write!(formatter, "PARAM:{parameter}:{value}"),
      Self::AdjustParam(parameter, value) => write!(formatter, "PARAM:{}:{value}", parameter.typed_name()),
      Self::SetColor(red, green, blue) => write!(formatter, "COLOR:{red},{green},{blue}"),
    }
  }
}
