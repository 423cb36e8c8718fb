//! Fixed-period activity loops.
//!
//! Every activity follows the same shape: run the body, then sleep until
//! the next period boundary. Deadlines advance by exactly one period per
//! iteration (fixed-period, not fixed-delay), so execution time never
//! accumulates as drift.
//!
//! ```text
//!  start        +P           +2P          +3P
//!    │ body ░░   │ body ░░░░░  │ body ░     │
//!    ├───────────┼─────────────┼────────────┼──▶ t
//!      sleep ──▶   sleep ──▶     sleep ──▶
//! ```
//!
//! When a body overruns its deadline the wait returns immediately and the
//! overrun is counted; the next deadline is still `previous + P`, so a late
//! activity catches up instead of shifting its phase.

use core::time::Duration;

use log::{info, warn};

/// Monotonic time source with the ability to block the calling thread.
pub trait Clock {
    /// Time elapsed since an arbitrary fixed origin.
    fn now(&self) -> Duration;

    /// Block the calling thread for `duration`.
    fn sleep(&self, duration: Duration);

    /// Milliseconds since the origin, truncated to 32 bits (wraps after
    /// ~49 days, like the sample log's timestamp column).
    fn millis(&self) -> u32 {
        self.now().as_millis() as u32
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> Duration {
        (**self).now()
    }

    fn sleep(&self, duration: Duration) {
        (**self).sleep(duration);
    }
}

/// A periodic unit of work driven by [`run_forever`].
pub trait Activity {
    fn name(&self) -> &'static str;

    fn period(&self) -> Duration;

    /// One iteration of the loop body. Must never block on another activity.
    fn run_once(&mut self);
}

/// Absolute-deadline timer (the `vTaskDelayUntil` pattern).
pub struct PeriodicTimer<C> {
    clock: C,
    period: Duration,
    next_wake: Duration,
    overruns: u32,
}

impl<C: Clock> PeriodicTimer<C> {
    /// The first deadline is one period after construction.
    pub fn new(clock: C, period: Duration) -> Self {
        let next_wake = clock.now() + period;
        Self {
            clock,
            period,
            next_wake,
            overruns: 0,
        }
    }

    /// Sleep until the current deadline, then arm the next one.
    /// Returns `false` if the deadline had already passed.
    pub fn wait(&mut self) -> bool {
        let now = self.clock.now();
        let on_time = now < self.next_wake;
        if on_time {
            self.clock.sleep(self.next_wake - now);
        } else {
            self.overruns = self.overruns.saturating_add(1);
        }
        self.next_wake += self.period;
        on_time
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Deadline the next `wait()` will sleep until.
    pub fn next_wake(&self) -> Duration {
        self.next_wake
    }

    pub fn overruns(&self) -> u32 {
        self.overruns
    }
}

/// Run `cycles` iterations of an activity against an existing timer.
pub fn run_cycles<A, C>(activity: &mut A, timer: &mut PeriodicTimer<C>, cycles: u64)
where
    A: Activity + ?Sized,
    C: Clock,
{
    for _ in 0..cycles {
        activity.run_once();
        if !timer.wait() && timer.overruns().is_power_of_two() {
            warn!(
                "Activity '{}': missed deadline ({} overruns so far)",
                activity.name(),
                timer.overruns()
            );
        }
    }
}

/// Per-thread entry point of a periodic activity. Never returns.
pub fn run_forever<A, C>(mut activity: A, clock: C) -> !
where
    A: Activity,
    C: Clock,
{
    let mut timer = PeriodicTimer::new(clock, activity.period());
    info!(
        "Activity '{}' running every {} ms",
        activity.name(),
        activity.period().as_millis()
    );
    loop {
        run_cycles(&mut activity, &mut timer, 1);
    }
}

// ═══════════════════════════════════════════════════════════════
//  Tests
// ═══════════════════════════════════════════════════════════════
