use async_std::channel;
use async_std::prelude::FutureExt;
use clap::{CommandFactory, Parser};
use std::io;

use ledremote::config::Configuration;
use ledremote::console::Console;
use ledremote::device::HttpDevice;
use ledremote::invocation::{self, Mode};
use ledremote::pacing::Sleeper;

#[derive(clap::Parser)]
#[command(
  version,
  about,
  long_about = None,
  after_help = "Examples:\n  \
    ledremote                   interactive control of the default address\n  \
    ledremote 192.168.2.50      interactive control of another address\n  \
    ledremote test              run every effect for a few seconds each\n  \
    ledremote status            print the current device state\n  \
    ledremote 10.0.0.7 status   the same, against an explicit address"
)]
struct CommandLineOptions {
  /// Device address, or one of the modes `test`, `status`, `help`.
  target: Option<String>,

  /// A mode to run against the address given as the first argument.
  mode: Option<String>,

  /// Optional toml file with `address`, `timeout_seconds`, `command_delay_millis` and
  /// `effect_dwell_millis`.
  #[arg(short = 'c', long)]
  config: Option<String>,
}

async fn run(args: CommandLineOptions) -> io::Result<()> {
  let resolved = invocation::resolve(args.target.as_deref(), args.mode.as_deref())?;

  if resolved.mode == Mode::Help {
    return CommandLineOptions::command().print_help();
  }

  let mut config = match &args.config {
    Some(path) => {
      log::info!("loading config from '{path}'");
      Configuration::load(path)?
    }
    None => Configuration::default(),
  };

  if let Some(address) = resolved.address {
    config.address = address;
  }

  log::debug!("running {:?} with {config:?}", resolved.mode);

  println!("LED remote - WiFi control for addressable LED strips");
  println!("{}", "=".repeat(60));

  let device = HttpDevice::builder()
    .address(config.address.as_str())
    .timeout(config.timeout())
    .build()?;

  let mut console = Console::builder()
    .device(device)
    .pacer(Sleeper)
    .output(io::stdout())
    .command_delay(config.command_delay())
    .effect_dwell(config.effect_dwell())
    .build()?;

  if !console.test_connection().await? {
    if resolved.mode == Mode::Interactive {
      println!("Make sure the device is powered on and connected to WiFi");
    }
    return Ok(());
  }

  match resolved.mode {
    Mode::Interactive => {
      let stdin = async_std::io::BufReader::new(async_std::io::stdin());
      console.interactive(stdin).await
    }
    Mode::Test => console.test_all_effects().await,
    Mode::Status => console.show_status().await,
    Mode::Help => Ok(()),
  }
}

/// Resolves once ctrl-c has been pressed. If the handler could not be installed this never
/// resolves.
async fn interrupted(receiver: channel::Receiver<()>) -> io::Result<()> {
  if receiver.recv().await.is_err() {
    log::warn!("interrupt channel closed; ctrl-c will not exit gracefully");
    return async_std::future::pending().await;
  }

  log::debug!("received interrupt");
  println!("\nGoodbye!");
  Ok(())
}

fn main() {
  env_logger::init();
  let args = CommandLineOptions::parse();

  let (sender, receiver) = channel::bounded(1);
  if let Err(error) = ctrlc::set_handler(move || {
    if let Err(error) = sender.try_send(()) {
      log::debug!("interrupt already pending - {error}");
    }
  }) {
    log::warn!("unable to install interrupt handler - {error}");
  }

  if let Err(error) = async_std::task::block_on(run(args).race(interrupted(receiver))) {
    eprintln!("\nError: {error}");
    std::process::exit(1);
  }
}
