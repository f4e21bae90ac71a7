use std::io;

/// What a single run of the application does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
  /// Pre-flight check, then the read-execute loop.
  Interactive,

  /// Pre-flight check, then every effect of the catalog in turn.
  Test,

  /// Pre-flight check, then a single status print.
  Status,

  /// Usage text only; the device is never contacted.
  Help,
}

impl std::str::FromStr for Mode {
  type Err = io::Error;

  fn from_str(input: &str) -> Result<Self, Self::Err> {
    match input.to_lowercase().as_str() {
      "test" => Ok(Self::Test),
      "status" => Ok(Self::Status),
      "help" | "-h" | "--help" => Ok(Self::Help),
      other => Err(io::Error::new(
        io::ErrorKind::InvalidInput,
        format!("unknown mode '{other}' (expected test, status or help)"),
      )),
    }
  }
}

/// The resolved positional arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
  /// An address given on the command line, if any.
  pub address: Option<String>,

  /// What to do.
  pub mode: Mode,
}

/// Interprets `[TARGET] [MODE]`. A lone target is a mode when it names one and an address
/// otherwise; with two arguments the first is always the address.
pub fn resolve(target: Option<&str>, mode: Option<&str>) -> io::Result<Invocation> {
  match (target, mode) {
    (None, None) => Ok(Invocation {
      address: None,
      mode: Mode::Interactive,
    }),
    (Some(target), None) => match target.parse::<Mode>() {
      Ok(mode) => Ok(Invocation { address: None, mode }),
      Err(_) if target.starts_with('-') => Err(io::Error::new(
        io::ErrorKind::InvalidInput,
        format!("unrecognized option '{target}'"),
      )),
      Err(_) => Ok(Invocation {
        address: Some(target.to_string()),
        mode: Mode::Interactive,
      }),
    },
    (Some(target), Some(mode)) => Ok(Invocation {
      address: Some(target.to_string()),
      mode: mode.parse()?,
    }),
    (None, Some(mode)) => Ok(Invocation {
      address: None,
      mode: mode.parse()?,
    }),
  }
}
