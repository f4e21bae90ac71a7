use std::time::Duration;

/// Anything that can wait. Scenario and test runs go through this so that their timing can be
/// observed (and skipped) in tests.
#[allow(async_fn_in_trait)]
pub trait Pacer {
  /// Wait for roughly `duration`.
  async fn pause(&self, duration: Duration);
}

/// Real wall clock pacing.
#[derive(Debug, Default, Clone, Copy)]
pub struct Sleeper;

impl Pacer for Sleeper {
  async fn pause(&self, duration: Duration) {
    log::trace!("sleeping for {duration:?}");
    async_std::task::sleep(duration).await;
  }
}
