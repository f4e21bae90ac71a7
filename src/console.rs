use async_std::io::BufReadExt;
use std::io::{self, Error, ErrorKind, Write};
use std::time::Duration;

use crate::command::{Command, Parameter};
use crate::device::{Device, DeviceError, DeviceStatus};
use crate::effects;
use crate::input::{self, Input};
use crate::pacing::Pacer;
use crate::scenarios::{self, Scenario};

/// What the interactive loop should do after a line has been handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
  /// Keep reading input.
  Continue,

  /// Leave the loop.
  Quit,
}

/// Collects the pieces of a `Console`.
pub struct ConsoleBuilder<D, P, W> {
  /// The device being controlled.
  device: Option<D>,

  /// Used for every pause during scenario and test runs.
  pacer: Option<P>,

  /// Where operator facing text goes.
  output: Option<W>,

  /// Pause after each scenario command.
  command_delay: Option<Duration>,

  /// Pause after each effect of the catalog test.
  effect_dwell: Option<Duration>,
}

impl<D, P, W> ConsoleBuilder<D, P, W> {
  /// Sets the device commands are sent to.
  pub fn device(mut self, device: D) -> Self {
    self.device = Some(device);
    self
  }

  /// Sets what waits between scenario commands and test effects.
  pub fn pacer(mut self, pacer: P) -> Self {
    self.pacer = Some(pacer);
    self
  }

  /// Sets where operator facing text is written.
  pub fn output(mut self, output: W) -> Self {
    self.output = Some(output);
    self
  }

  /// Pause after each scenario command; defaults to 200ms.
  pub fn command_delay(mut self, delay: Duration) -> Self {
    self.command_delay = Some(delay);
    self
  }

  /// How long each effect runs during the catalog test; defaults to 3s.
  pub fn effect_dwell(mut self, dwell: Duration) -> Self {
    self.effect_dwell = Some(dwell);
    self
  }

  /// Fails when the device, pacer or output was never set.
  pub fn build(self) -> io::Result<Console<D, P, W>> {
    let device = self.device.ok_or_else(|| Error::new(ErrorKind::Other, "missing device"))?;
    let pacer = self.pacer.ok_or_else(|| Error::new(ErrorKind::Other, "missing pacer"))?;
    let output = self.output.ok_or_else(|| Error::new(ErrorKind::Other, "missing output"))?;

    Ok(Console {
      device,
      pacer,
      output,
      command_delay: self.command_delay.unwrap_or(Duration::from_millis(200)),
      effect_dwell: self.effect_dwell.unwrap_or(Duration::from_secs(3)),
    })
  }
}

/// The operator's side of the conversation with a device: reports on every command sent, renders
/// status and catalogs, and owns the interactive loop.
pub struct Console<D, P, W> {
  /// The device being controlled.
  device: D,

  /// Used for every pause during scenario and test runs.
  pacer: P,

  /// Where operator facing text goes.
  output: W,

  /// Pause after each scenario command.
  command_delay: Duration,

  /// Pause after each effect of the catalog test.
  effect_dwell: Duration,
}

impl<D, P, W> Console<D, P, W>
where
  D: Device,
  P: Pacer,
  W: Write,
{
  /// Starts a `ConsoleBuilder` with nothing set.
  pub fn builder() -> ConsoleBuilder<D, P, W> {
    ConsoleBuilder {
      device: None,
      pacer: None,
      output: None,
      command_delay: None,
      effect_dwell: None,
    }
  }

  /// The text written so far; mostly useful when `W` is an in-memory buffer.
  pub fn output(&self) -> &W {
    &self.output
  }

  /// Sends a command, printing one line of feedback. Transport problems are reported here and turned
  /// into `false`; they never become errors. The `io::Result` only covers writing the feedback.
  pub async fn send_command(&mut self, command: &Command) -> io::Result<bool> {
    match self.device.send(command).await {
      Ok(()) => {
        writeln!(self.output, "-> {command} ok")?;
        Ok(true)
      }
      Err(error) => {
        log::warn!("command '{command}' failed - {error}");
        writeln!(self.output, "-> {command} failed ({error})")?;
        Ok(false)
      }
    }
  }

  /// Fetches the device status. Best effort; the caller decides what to do with a failure.
  pub async fn get_status(&self) -> Result<DeviceStatus, DeviceError> {
    self.device.status().await.map_err(|error| {
      log::debug!("status request failed - {error}");
      error
    })
  }

  /// Reports whether the device is reachable at all.
  pub async fn test_connection(&mut self) -> io::Result<bool> {
    writeln!(self.output, "Testing connection to {}...", self.device.address())?;

    match self.get_status().await {
      Ok(_) => {
        writeln!(self.output, "Connection successful!")?;
        Ok(true)
      }
      Err(error) => {
        writeln!(
          self.output,
          "Cannot reach the device at {} ({error})",
          self.device.address()
        )?;
        Ok(false)
      }
    }
  }

  /// Prints the command summary.
  pub fn show_help(&mut self) -> io::Result<()> {
    let parameters = Parameter::ALL
      .iter()
      .map(|parameter| match parameter.max() {
        1 => format!("{} <0|1>", parameter.typed_name()),
        max => format!("{} <0-{max}>", parameter.typed_name()),
      })
      .collect::<Vec<String>>()
      .join(", ");
    let keys = scenarios::SCENARIOS
      .iter()
      .map(|scenario| scenario.key)
      .collect::<Vec<&str>>()
      .join(", ");

    writeln!(self.output)?;
    writeln!(self.output, "Available commands:")?;
    writeln!(
      self.output,
      "  Basic:     on/off, auto/manual, brightness <0-255>, effect <0-{}>",
      effects::LAST_ID
    )?;
    writeln!(self.output, "  Params:    {parameters}, color <r,g,b>")?;
    writeln!(self.output, "  Scenarios: {keys}")?;
    writeln!(self.output, "  Info:      effects, scenarios, status, test, help, quit")
  }

  /// Prints every effect in the catalog with its description and category.
  pub fn show_effects(&mut self) -> io::Result<()> {
    writeln!(self.output)?;
    writeln!(self.output, "Available effects:")?;
    for effect in effects::EFFECTS.iter() {
      writeln!(
        self.output,
        "  {:2}: {} - {} [{}]",
        effect.id, effect.name, effect.description, effect.category
      )?;
    }
    Ok(())
  }

  /// Prints every scenario key with its display name.
  pub fn show_scenarios(&mut self) -> io::Result<()> {
    writeln!(self.output)?;
    writeln!(self.output, "Preset scenarios:")?;
    for scenario in scenarios::SCENARIOS.iter() {
      writeln!(self.output, "  {:8} - {}", scenario.key, scenario.name)?;
    }
    Ok(())
  }

  /// Fetches the device status and prints it, or prints why it could not be fetched.
  pub async fn show_status(&mut self) -> io::Result<()> {
    let status = match self.get_status().await {
      Ok(status) => status,
      Err(error) => return writeln!(self.output, "Cannot get status ({error})"),
    };

    // The device is not trusted to report an id inside the catalog.
    let effect_name = usize::try_from(status.effect)
      .ok()
      .and_then(effects::get)
      .map(|effect| effect.name)
      .unwrap_or("unknown");
    let [red, green, blue] = status.color;

    writeln!(self.output)?;
    writeln!(self.output, "Current status:")?;
    writeln!(self.output, "  Power:      {}", if status.on { "on" } else { "off" })?;
    writeln!(self.output, "  Mode:       {}", if status.auto { "auto" } else { "manual" })?;
    writeln!(self.output, "  Effect:     {} ({effect_name})", status.effect)?;
    writeln!(self.output, "  Brightness: {}", status.brightness)?;
    writeln!(self.output, "  Color:      RGB({red}, {green}, {blue})")?;
    writeln!(self.output, "  Speed:      {}", status.effect_config.speed)?;
    writeln!(self.output, "  Intensity:  {}", status.effect_config.intensity)?;
    for (name, value) in status.effect_config.extra.iter() {
      writeln!(self.output, "  {:<11} {value}", format!("{name}:"))?;
    }
    Ok(())
  }

  /// Sends every command of a scenario in order, pausing after each. Individual failures are
  /// reported but do not stop the sequence.
  pub async fn activate_scenario(&mut self, scenario: &Scenario) -> io::Result<()> {
    writeln!(self.output, "Activating scenario: {}", scenario.key)?;

    for command in scenario.commands.iter() {
      self.send_command(command).await?;
      self.pacer.pause(self.command_delay).await;
    }

    writeln!(self.output, "Scenario activated!")
  }

  /// Puts the device into a known manual state and then shows each effect of the catalog for the
  /// configured dwell time.
  pub async fn test_all_effects(&mut self) -> io::Result<()> {
    writeln!(self.output, "Testing all effects ({:?} each)...", self.effect_dwell)?;

    self.send_command(&Command::SetAuto(false)).await?;
    self.send_command(&Command::SetPower(true)).await?;
    self.send_command(&Command::SetBrightness(u8::MAX)).await?;

    for effect in effects::EFFECTS.iter() {
      writeln!(self.output, "Testing effect {:2}: {}", effect.id, effect.name)?;
      self.send_command(&Command::SetEffect(effect.id)).await?;
      self.pacer.pause(self.effect_dwell).await;
    }

    writeln!(self.output, "Test sequence completed!")
  }

  /// Handles a single line of input.
  pub async fn execute(&mut self, line: &str) -> io::Result<Flow> {
    let parsed = input::parse(line);
    log::debug!("parsed '{line}' as {parsed:?}");

    match parsed {
      Input::Empty => (),
      Input::Quit => return Ok(Flow::Quit),
      Input::Help => self.show_help()?,
      Input::Effects => self.show_effects()?,
      Input::Scenarios => self.show_scenarios()?,
      Input::Status => self.show_status().await?,
      Input::Test => self.test_all_effects().await?,
      Input::Scenario(scenario) => self.activate_scenario(scenario).await?,
      Input::Send(command @ Command::SetEffect(id)) => {
        self.send_command(&command).await?;
        // `input::parse` only produces in-range ids.
        writeln!(self.output, "Activated: {}", effects::lookup(usize::from(id)).name)?;
      }
      Input::Send(command) => {
        self.send_command(&command).await?;
      }
      Input::Dropped(reason) => log::warn!("not sending '{}' - {reason}", line.trim()),
      Input::InvalidNumber(value) => {
        log::debug!("'{value}' is not a number");
        writeln!(self.output, "Invalid number format")?;
      }
      Input::UnknownParameter(name) => writeln!(self.output, "Unknown parameter: {name}")?,
      Input::Unknown(text) => {
        writeln!(self.output, "Unknown command: '{text}'")?;
        writeln!(self.output, "Type 'help' for available commands")?;
      }
    }

    Ok(Flow::Continue)
  }

  /// Runs the read-execute loop until `quit` or the end of `input`. Failures while handling a line
  /// are reported and the loop keeps going; only failing to read input ends it early.
  pub async fn interactive<R>(&mut self, mut input: R) -> io::Result<()>
  where
    R: async_std::io::BufRead + Unpin,
  {
    writeln!(self.output)?;
    writeln!(self.output, "LED controller - {}", self.device.address())?;
    writeln!(self.output, "{}", "=".repeat(50))?;
    self.show_help()?;

    loop {
      write!(self.output, "\nLED> ")?;
      self.output.flush()?;

      let mut line = String::new();
      let amount = input.read_line(&mut line).await.map_err(|error| {
        log::warn!("unable to read input - {error}");
        error
      })?;

      if amount == 0 {
        log::debug!("input closed, leaving interactive loop");
        writeln!(self.output)?;
        break;
      }

      match self.execute(&line).await {
        Ok(Flow::Quit) => break,
        Ok(Flow::Continue) => (),
        Err(error) => {
          log::warn!("failed handling '{}' - {error}", line.trim());
          writeln!(self.output, "Error: {error}")?;
        }
      }
    }

    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::{Console, Flow};
  use crate::command::Command;
  use crate::device::{Device, DeviceError, DeviceStatus, EffectConfig};
  use crate::pacing::Pacer;
  use std::cell::RefCell;
  use std::rc::Rc;
  use std::time::Duration;

  #[derive(Debug, Clone, PartialEq)]
  enum Event {
    Sent(String),
    Paused(Duration),
  }

  type Log = Rc<RefCell<Vec<Event>>>;

  struct FakeDevice {
    log: Log,
    status: Option<DeviceStatus>,
    failing: Vec<String>,
  }

  impl Device for FakeDevice {
    fn address(&self) -> &str {
      "fake.local"
    }

    async fn send(&self, command: &Command) -> Result<(), DeviceError> {
      let wire = command.to_string();
      self.log.borrow_mut().push(Event::Sent(wire.clone()));
      if self.failing.contains(&wire) {
        return Err(DeviceError::Rejected(500));
      }
      Ok(())
    }

    async fn status(&self) -> Result<DeviceStatus, DeviceError> {
      self
        .status
        .clone()
        .ok_or_else(|| DeviceError::Unreachable("connection refused".into()))
    }
  }

  struct FakePacer {
    log: Log,
  }

  impl Pacer for FakePacer {
    async fn pause(&self, duration: Duration) {
      self.log.borrow_mut().push(Event::Paused(duration));
    }
  }

  fn sample_status(effect: i64) -> DeviceStatus {
    let mut extra = std::collections::BTreeMap::new();
    extra.insert("colorMode".to_string(), serde_json::json!(1));
    DeviceStatus {
      on: true,
      auto: false,
      effect,
      brightness: 128,
      color: [0, 50, 150],
      effect_config: EffectConfig {
        speed: 15,
        intensity: 10,
        extra,
      },
    }
  }

  fn console(status: Option<DeviceStatus>, failing: &[&str]) -> (Console<FakeDevice, FakePacer, Vec<u8>>, Log) {
    let log: Log = Rc::new(RefCell::new(Vec::new()));
    let console = Console::builder()
      .device(FakeDevice {
        log: log.clone(),
        status,
        failing: failing.iter().map(|wire| wire.to_string()).collect(),
      })
      .pacer(FakePacer { log: log.clone() })
      .output(Vec::new())
      .command_delay(Duration::from_millis(200))
      .effect_dwell(Duration::from_secs(3))
      .build()
      .expect("console");
    (console, log)
  }

  fn sent(log: &Log) -> Vec<String> {
    log
      .borrow()
      .iter()
      .filter_map(|event| match event {
        Event::Sent(wire) => Some(wire.clone()),
        Event::Paused(_) => None,
      })
      .collect()
  }

  fn text(console: &Console<FakeDevice, FakePacer, Vec<u8>>) -> String {
    String::from_utf8_lossy(console.output()).to_string()
  }

  #[test]
  fn builder_requires_every_piece() {
    let missing = Console::<FakeDevice, FakePacer, Vec<u8>>::builder().output(Vec::new()).build();
    assert!(missing.is_err());
  }

  #[async_std::test]
  async fn party_sends_its_sequence_with_pauses() {
    let (mut console, log) = console(None, &[]);
    let flow = console.execute("party").await.expect("execute");
    assert_eq!(flow, Flow::Continue);

    let pause = Event::Paused(Duration::from_millis(200));
    let expected = ["AUTO:0", "EFFECT:3", "PARAM:speed:85", "PARAM:colorMode:1", "BRIGHT:255"]
      .iter()
      .flat_map(|wire| vec![Event::Sent(wire.to_string()), pause.clone()])
      .collect::<Vec<Event>>();
    assert_eq!(*log.borrow(), expected);
    assert!(text(&console).contains("Scenario activated!"));
  }

  #[async_std::test]
  async fn scenarios_finish_even_when_commands_fail() {
    let (mut console, log) = console(None, &["EFFECT:3"]);
    console.execute("PARTY").await.expect("execute");
    assert_eq!(sent(&log).len(), 5);
    let output = text(&console);
    assert!(output.contains("-> EFFECT:3 failed (status 500)"));
    assert!(output.contains("Scenario activated!"));
  }

  #[async_std::test]
  async fn full_catalog_test_order() {
    let (mut console, log) = console(None, &[]);
    console.execute("test").await.expect("execute");

    let mut expected = vec![
      Event::Sent("AUTO:0".into()),
      Event::Sent("ON:1".into()),
      Event::Sent("BRIGHT:255".into()),
    ];
    for id in 0..20 {
      expected.push(Event::Sent(format!("EFFECT:{id}")));
      expected.push(Event::Paused(Duration::from_secs(3)));
    }
    assert_eq!(*log.borrow(), expected);

    let output = text(&console);
    assert!(output.contains("Testing effect 19: Matrix Rain"));
    assert!(output.contains("Test sequence completed!"));
  }

  #[async_std::test]
  async fn out_of_range_values_send_nothing() {
    let (mut console, log) = console(None, &[]);
    for line in [
      "brightness 256",
      "brightness -1",
      "effect 20",
      "effect -3",
      "speed 101",
      "direction 2",
      "color 0,0,256",
      "color -1,0,0",
      "color 1,2",
      "brightness 99999999999999999999",
    ] {
      assert_eq!(console.execute(line).await.expect("execute"), Flow::Continue);
    }
    assert!(log.borrow().is_empty());
    assert_eq!(text(&console), "");
  }

  #[async_std::test]
  async fn typed_and_scenario_parameters_keep_their_own_spelling() {
    let (mut console, log) = console(None, &[]);
    console.execute("colormode 1").await.expect("execute");
    console.execute("party").await.expect("execute");

    let sent = sent(&log);
    assert_eq!(sent[0], "PARAM:colormode:1");
    assert!(sent[1..].contains(&"PARAM:colorMode:1".to_string()));
    assert!(!sent[1..].contains(&"PARAM:colormode:1".to_string()));
  }

  #[async_std::test]
  async fn valid_parameters_are_sent() {
    let (mut console, log) = console(None, &[]);
    for line in ["brightness 42", "speed 85", "colormode 1", "direction 0", "color 0,255,0", "on", "manual"] {
      console.execute(line).await.expect("execute");
    }
    assert_eq!(
      sent(&log),
      vec![
        "BRIGHT:42",
        "PARAM:speed:85",
        "PARAM:colormode:1",
        "PARAM:direction:0",
        "COLOR:0,255,0",
        "ON:1",
        "AUTO:0"
      ]
    );
  }

  #[async_std::test]
  async fn effect_echoes_its_name() {
    let (mut console, log) = console(None, &[]);
    console.execute("effect 13").await.expect("execute");
    assert_eq!(sent(&log), vec!["EFFECT:13"]);
    let output = text(&console);
    assert!(output.contains("-> EFFECT:13 ok"));
    assert!(output.contains("Activated: Fire"));
  }

  #[async_std::test]
  async fn bad_numbers_and_unknown_parameters_are_reported() {
    let (mut console, log) = console(None, &[]);
    console.execute("brightness lots").await.expect("execute");
    console.execute("hue 10").await.expect("execute");
    assert!(log.borrow().is_empty());
    let output = text(&console);
    assert!(output.contains("Invalid number format"));
    assert!(output.contains("Unknown parameter: hue"));
  }

  #[async_std::test]
  async fn failed_sends_are_false_not_errors() {
    let (mut console, _) = console(None, &["ON:1"]);
    assert!(!console.send_command(&Command::SetPower(true)).await.expect("write"));
    assert!(console.send_command(&Command::SetPower(false)).await.expect("write"));
  }

  #[async_std::test]
  async fn status_rendering() {
    let (mut console, _) = console(Some(sample_status(11)), &[]);
    console.execute("status").await.expect("execute");
    let output = text(&console);
    assert!(output.contains("Power:      on"));
    assert!(output.contains("Mode:       manual"));
    assert!(output.contains("Effect:     11 (Breathing)"));
    assert!(output.contains("Color:      RGB(0, 50, 150)"));
    assert!(output.contains("colorMode:  1"));
  }

  #[async_std::test]
  async fn status_with_unknown_effect_does_not_panic() {
    let (mut console, _) = console(Some(sample_status(42)), &[]);
    console.execute("status").await.expect("execute");
    assert!(text(&console).contains("Effect:     42 (unknown)"));
  }

  #[async_std::test]
  async fn unreachable_status() {
    let (mut console, _) = console(None, &[]);
    assert!(console.get_status().await.is_err());
    assert!(!console.test_connection().await.expect("write"));
    console.execute("status").await.expect("execute");
    let output = text(&console);
    assert!(output.contains("Cannot reach the device at fake.local"));
    assert!(output.contains("Cannot get status"));
  }

  #[async_std::test]
  async fn reachable_device_passes_preflight() {
    let (mut console, _) = console(Some(sample_status(0)), &[]);
    assert!(console.test_connection().await.expect("write"));
  }

  #[async_std::test]
  async fn unknown_commands_do_not_end_the_loop() {
    let (mut console, log) = console(None, &[]);
    let input: &[u8] = b"foobar\non\nquit\noff\n";
    console.interactive(input).await.expect("interactive");

    assert_eq!(sent(&log), vec!["ON:1"]);
    let output = text(&console);
    assert!(output.contains("Unknown command: 'foobar'"));
    assert!(output.contains("Type 'help'"));
  }

  #[async_std::test]
  async fn end_of_input_leaves_the_loop() {
    let (mut console, log) = console(None, &[]);
    let input: &[u8] = b"\n  \nauto";
    console.interactive(input).await.expect("interactive");
    assert_eq!(sent(&log), vec!["AUTO:1"]);
  }

  #[async_std::test]
  async fn listings() {
    let (mut console, _) = console(None, &[]);
    console.execute("effects").await.expect("execute");
    console.execute("scenarios").await.expect("execute");
    console.execute("help").await.expect("execute");
    let output = text(&console);
    assert!(output.contains(" 0: Lightning"));
    assert!(output.contains("19: Matrix Rain"));
    assert!(output.contains("party    - Party Mode"));
    assert!(output.contains("fadespeed <0-100>"));
    assert!(output.contains("direction <0|1>"));
    assert!(output.contains("party, relax, fire, matrix, police, rainbow"));
  }
}
