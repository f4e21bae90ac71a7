use serde::Deserialize;
use std::collections::BTreeMap;
use std::io::{Error, ErrorKind, Result};
use std::time::Duration;

use crate::command::Command;

/// Everything that can go wrong talking to the device. None of these are fatal to the application;
/// callers decide how to report them.
#[derive(Debug, thiserror::Error)]
pub enum DeviceError {
  /// The device did not answer within the configured timeout.
  #[error("timed out after {0:?}")]
  Timeout(Duration),

  /// The request never made it; refused connection, unresolvable host, reset, etc.
  #[error("unreachable - {0}")]
  Unreachable(String),

  /// The device answered, but not with a success status.
  #[error("status {0}")]
  Rejected(u16),

  /// The device answered successfully with a body we could not understand.
  #[error("malformed response - {0}")]
  Malformed(String),
}

/// The `effectConfig` portion of the status document.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct EffectConfig {
  /// Current effect speed.
  pub speed: i64,

  /// Current effect intensity.
  pub intensity: i64,

  /// Whatever else the firmware reports (size, colorMode, ...), keyed by name.
  #[serde(flatten)]
  pub extra: BTreeMap<String, serde_json::Value>,
}

/// The json document served at `/api/status`. This is only ever displayed, never cached.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceStatus {
  /// Whether the strip is powered.
  pub on: bool,

  /// Whether the firmware is cycling effects on its own.
  pub auto: bool,

  /// Active effect id. Not trusted to be inside the catalog.
  pub effect: i64,

  /// Global brightness.
  pub brightness: u8,

  /// Base color.
  pub color: [u8; 3],

  /// Parameters of the active effect.
  pub effect_config: EffectConfig,
}

/// The narrow interface the rest of the application uses to reach the device.
#[allow(async_fn_in_trait)]
pub trait Device {
  /// Where the device lives; used for display only.
  fn address(&self) -> &str;

  /// Sends a single command, succeeding only if the device acknowledged it.
  async fn send(&self, command: &Command) -> std::result::Result<(), DeviceError>;

  /// Fetches the current device state.
  async fn status(&self) -> std::result::Result<DeviceStatus, DeviceError>;
}

/// Builds an `HttpDevice`, validating the address up front.
#[derive(Default)]
pub struct HttpDeviceBuilder {
  /// Host (and optional port) of the device.
  address: Option<String>,

  /// Request timeout.
  timeout: Option<Duration>,
}

impl HttpDeviceBuilder {
  /// Sets the device address, e.g. `192.168.2.136` or `lights.local:8080`.
  pub fn address<S>(mut self, address: S) -> Self
  where
    S: Into<String>,
  {
    self.address = Some(address.into());
    self
  }

  /// Sets the upper bound applied to every request.
  pub fn timeout(mut self, timeout: Duration) -> Self {
    self.timeout = Some(timeout);
    self
  }

  /// Validates the address and prepares the http client.
  pub fn build(self) -> Result<HttpDevice> {
    let address = self
      .address
      .ok_or_else(|| Error::new(ErrorKind::Other, "missing device address"))?;

    let base = surf::Url::parse(&format!("http://{address}/")).map_err(|error| {
      log::warn!("unable to use '{address}' as a device address - {error}");
      Error::new(ErrorKind::Other, format!("invalid device address '{address}' - {error}"))
    })?;

    Ok(HttpDevice {
      address,
      base,
      timeout: self.timeout.unwrap_or(Duration::from_secs(5)),
      client: surf::Client::new(),
    })
  }
}

/// Talks to the firmware over http using `surf`.
pub struct HttpDevice {
  /// Address as given, for display.
  address: String,

  /// `http://<address>/`.
  base: surf::Url,

  /// Bound on each request, including reading the body.
  timeout: Duration,

  /// Reused across requests.
  client: surf::Client,
}

impl HttpDevice {
  /// Starts building a device.
  pub fn builder() -> HttpDeviceBuilder {
    HttpDeviceBuilder::default()
  }

  /// The url of the command endpoint for a given command. The wire form only contains characters
  /// that are valid in a query string, so it is not percent-encoded.
  fn command_url(&self, command: &Command) -> std::result::Result<surf::Url, DeviceError> {
    let mut url = self
      .base
      .join("cmd")
      .map_err(|error| DeviceError::Unreachable(format!("bad url - {error}")))?;
    url.set_query(Some(&format!("cmd={command}")));
    Ok(url)
  }

  /// Issues a `GET`, returning the body of a successful response.
  async fn get(&self, url: surf::Url) -> std::result::Result<String, DeviceError> {
    log::debug!("GET {url}");

    let request = async {
      let mut response = self
        .client
        .get(url.as_str())
        .await
        .map_err(|error| DeviceError::Unreachable(error.to_string()))?;

      let status = response.status();

      if !status.is_success() {
        log::warn!("device responded with {status} for {url}");
        return Err(DeviceError::Rejected(u16::from(status)));
      }

      response
        .body_string()
        .await
        .map_err(|error| DeviceError::Unreachable(error.to_string()))
    };

    async_std::future::timeout(self.timeout, request).await.map_err(|_| {
      log::warn!("request to {} timed out", self.address);
      DeviceError::Timeout(self.timeout)
    })?
  }
}

impl Device for HttpDevice {
  fn address(&self) -> &str {
    &self.address
  }

  async fn send(&self, command: &Command) -> std::result::Result<(), DeviceError> {
    let url = self.command_url(command)?;
    self.get(url).await.map(|_| ())
  }

  async fn status(&self) -> std::result::Result<DeviceStatus, DeviceError> {
    let url = self
      .base
      .join("api/status")
      .map_err(|error| DeviceError::Unreachable(format!("bad url - {error}")))?;
    let body = self.get(url).await?;

    serde_json::from_str::<DeviceStatus>(&body).map_err(|error| {
      log::warn!("unable to parse status document '{body}' - {error}");
      DeviceError::Malformed(error.to_string())
    })
  }
}
