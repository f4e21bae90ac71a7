use serde::Deserialize;
use std::io;
use std::time::Duration;

/// Where the firmware answers when nothing else is configured.
pub const DEFAULT_ADDRESS: &str = "192.168.2.136";

/// Deserializable configuration data. Every field is optional in the toml source; anything missing
/// falls back to the values in `Default`.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct Configuration {
  /// Host name or ip address (optionally with a `:port`) of the device.
  pub address: String,

  /// Upper bound on every http request sent to the device.
  pub timeout_seconds: u64,

  /// How long to let the device settle between the commands of a scenario.
  pub command_delay_millis: u64,

  /// How long each effect stays active during the full catalog test.
  pub effect_dwell_millis: u64,
}

impl Default for Configuration {
  fn default() -> Self {
    Self {
      address: DEFAULT_ADDRESS.to_string(),
      timeout_seconds: 5,
      command_delay_millis: 200,
      effect_dwell_millis: 3000,
    }
  }
}

impl Configuration {
  /// Reads and parses a toml file.
  pub fn load<P>(path: P) -> io::Result<Self>
  where
    P: AsRef<std::path::Path>,
  {
    let contents = std::fs::read_to_string(path.as_ref()).map_err(|error| {
      log::warn!("unable to read config '{:?}' - {error}", path.as_ref());
      error
    })?;
    contents.parse()
  }

  /// The request timeout as a `Duration`.
  pub fn timeout(&self) -> Duration {
    Duration::from_secs(self.timeout_seconds)
  }

  /// The pacing used between scenario commands.
  pub fn command_delay(&self) -> Duration {
    Duration::from_millis(self.command_delay_millis)
  }

  /// The pacing used between effects of the catalog test.
  pub fn effect_dwell(&self) -> Duration {
    Duration::from_millis(self.effect_dwell_millis)
  }
}

impl std::str::FromStr for Configuration {
  type Err = io::Error;

  fn from_str(input: &str) -> Result<Self, Self::Err> {
    toml::from_str::<Self>(input)
      .map_err(|error| io::Error::new(io::ErrorKind::Other, format!("bad config - {error}")))
  }
}
