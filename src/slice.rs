//! Time-boxed slices and the yield point between them.
//!
//! Long traversals run in slices: each slice does at least one unit of work and
//! keeps going until its [`TimeBox`] is exhausted, then the caller awaits
//! [`yield_now`] so the runtime can service everything else before the next
//! slice starts.

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::{Duration, Instant};

/// One display-refresh interval.
pub const DEFAULT_SLICE_BUDGET: Duration = Duration::from_millis(16);

#[derive(Debug, Clone, Copy)]
pub struct TimeBox {
    started: Instant,
    budget: Duration,
}

impl TimeBox {
    pub fn start(budget: Duration) -> Self {
        Self {
            started: Instant::now(),
            budget,
        }
    }

    pub fn is_exhausted(&self) -> bool {
        self.started.elapsed() >= self.budget
    }
}

/// Gives control back to the runtime for one turn.
///
/// compio has no `yield_now` of its own, so this wakes itself once and
/// returns `Pending`, which requeues the task behind everything already ready.
pub async fn yield_now() {
    YieldNow { yielded: false }.await
}

struct YieldNow {
    yielded: bool,
}

impl Future for YieldNow {
    type Output = ();

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
        if self.yielded {
            return Poll::Ready(());
        }
        self.yielded = true;
        cx.waker().wake_by_ref();
        Poll::Pending
    }
}
