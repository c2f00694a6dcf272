//! Fixed-interval poll loop
//!
//! [`poll_until`] is the one polling primitive of the crate: it runs a fetch
//! operation on a timer until a terminal predicate holds, the fetch fails,
//! a limit is reached, or the loop is cancelled. Attempts are strictly
//! sequential; the next one is only scheduled after the previous returned.

use std::future::Future;
use std::time::Duration;

use tokio::time::{self, Instant, MissedTickBehavior};

use crate::cancel::CancelToken;
use crate::config::WatchOptions;

/// Shortest spacing between two attempts; smaller intervals are raised to it
pub const MIN_INTERVAL: Duration = Duration::from_millis(1);

/// Why a poll loop stopped
#[derive(Debug)]
pub enum LoopExit<T, E> {
    /// The predicate accepted `value`
    Terminal { value: T, attempts: u32 },
    /// Attempt `attempt` failed; nothing was scheduled after it
    Failed { error: E, attempt: u32 },
    /// Attempt cap or deadline reached
    Exhausted { last: Option<T>, attempts: u32 },
    Cancelled { last: Option<T>, attempts: u32 },
}

/// Polls `fetch` every `options.interval` until `is_terminal` holds
///
/// The first attempt runs immediately. An interval below [`MIN_INTERVAL`]
/// is raised to it. `fetch` receives the 1-based attempt
/// number; `on_update` sees every successful result, terminal ones included.
pub async fn poll_until<T, E, F, Fut, P, U>(
    mut fetch: F,
    is_terminal: P,
    options: WatchOptions,
    cancel: &CancelToken,
    mut on_update: U,
) -> LoopExit<T, E>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, E>>,
    P: Fn(&T) -> bool,
    U: FnMut(&T),
{
    let deadline = options.timeout.map(|timeout| Instant::now() + timeout);
    let mut ticker = time::interval(options.interval.max(MIN_INTERVAL));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let mut attempts = 0u32;
    let mut last = None;

    loop {
        if options.max_attempts.is_some_and(|max| attempts >= max) {
            return LoopExit::Exhausted { last, attempts };
        }

        tokio::select! {
            biased;
            _ = cancel.cancelled() => return LoopExit::Cancelled { last, attempts },
            _ = wait_for(deadline) => return LoopExit::Exhausted { last, attempts },
            _ = ticker.tick() => {}
        }

        attempts += 1;
        let result = tokio::select! {
            biased;
            _ = cancel.cancelled() => return LoopExit::Cancelled { last, attempts },
            _ = wait_for(deadline) => return LoopExit::Exhausted { last, attempts },
            result = fetch(attempts) => result,
        };

        match result {
            Ok(value) => {
                on_update(&value);
                if is_terminal(&value) {
                    return LoopExit::Terminal { value, attempts };
                }
                last = Some(value);
            }
            Err(error) => {
                return LoopExit::Failed {
                    error,
                    attempt: attempts,
                };
            }
        }
    }
}

async fn wait_for(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => time::sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}
