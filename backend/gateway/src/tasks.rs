//! Screen-bound background tasks.
//!
//! A screen owns one [`CancellationToken`]; every timer started for it is
//! tied to that token and stops as soon as the screen is left.

use std::future::Future;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Run `fut` unless `token` is cancelled first.
pub fn spawn_guarded<F>(token: CancellationToken, fut: F) -> JoinHandle<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    tokio::spawn(async move {
        tokio::select! {
            _ = token.cancelled() => debug!("screen task cancelled"),
            _ = fut => {}
        }
    })
}

/// Call `f` once after `delay`, unless `token` is cancelled first.
pub fn spawn_after<F>(delay: Duration, token: CancellationToken, f: F) -> JoinHandle<()>
where
    F: FnOnce() + Send + 'static,
{
    spawn_guarded(token, async move {
        tokio::time::sleep(delay).await;
        f();
    })
}

/// Call `f` every `period` (first call after one period) until `token` is
/// cancelled.
pub fn spawn_every<F>(period: Duration, token: CancellationToken, mut f: F) -> JoinHandle<()>
where
    F: FnMut() + Send + 'static,
{
    spawn_guarded(token, async move {
        let mut ticker = interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            f();
        }
    })
}
