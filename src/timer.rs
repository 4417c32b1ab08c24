use std::{
    cell::{Cell, RefCell},
    collections::BTreeMap,
    fmt,
    time::Duration,
};

use crate::error::Error;

/// Shortest period accepted for a repeating timer.
///
/// A zero period would make a virtual clock spin forever on a single instant.
pub const MIN_PERIOD: Duration = Duration::from_millis(1);

/// Identifier of a scheduled timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimerId(u64);

impl TimerId {
    /// Constructs a [`TimerId`] from its raw value.
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Returns the raw value.
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for TimerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "timer#{}", self.0)
    }
}

/// Timer facility of a single-threaded event loop.
///
/// Callbacks never run concurrently with each other. A callback may schedule
/// or cancel timers (including its own) while it runs.
pub trait Scheduler {
    /// Returns the monotonic time of the event loop.
    fn now(&self) -> Duration;

    /// Calls `callback` every `period` until the timer is cancelled.
    fn set_interval(
        &self,
        period: Duration,
        callback: Box<dyn FnMut()>,
    ) -> Result<TimerId, Error>;

    /// Calls `callback` once after `delay`, unless the timer is cancelled first.
    fn set_timeout(&self, delay: Duration, callback: Box<dyn FnOnce()>)
        -> Result<TimerId, Error>;

    /// Cancels a timer.
    ///
    /// Cancelling an unknown, fired or already cancelled timer does nothing.
    fn cancel(&self, id: TimerId);
}

enum Callback {
    Once(Box<dyn FnOnce()>),
    Repeat(Box<dyn FnMut()>),
}

struct ManualTimer {
    due: Duration,
    period: Option<Duration>,
    /// `None` while the callback is running.
    callback: Option<Callback>,
}

/// A [`Scheduler`] driven by a virtual clock.
///
/// Time only moves when [`ManualScheduler::advance`] is called, which makes it
/// suitable for headless hosts and for tests.
///
/// ```
/// use std::{cell::Cell, rc::Rc, time::Duration};
/// use ratfolio::timer::{ManualScheduler, Scheduler};
///
/// let scheduler = ManualScheduler::new();
/// let ticks = Rc::new(Cell::new(0));
/// let counter = ticks.clone();
/// scheduler
///     .set_interval(
///         Duration::from_millis(100),
///         Box::new(move || counter.set(counter.get() + 1)),
///     )
///     .unwrap();
/// scheduler.advance(Duration::from_millis(350));
/// assert_eq!(ticks.get(), 3);
/// ```
#[derive(Default)]
pub struct ManualScheduler {
    now: Cell<Duration>,
    next_id: Cell<u64>,
    timers: RefCell<BTreeMap<TimerId, ManualTimer>>,
}

impl fmt::Debug for ManualScheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ManualScheduler")
            .field("now", &self.now.get())
            .field("pending", &self.pending())
            .finish()
    }
}

impl ManualScheduler {
    /// Constructs a new [`ManualScheduler`] at time zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of timers that are still scheduled.
    pub fn pending(&self) -> usize {
        self.timers.borrow().len()
    }

    /// Moves the clock forward by `by`, running every callback that falls due.
    ///
    /// Callbacks run in order of their due time; timers due at the same instant
    /// run in the order they were scheduled.
    pub fn advance(&self, by: Duration) {
        let target = self.now.get() + by;
        while let Some(id) = self.next_due(target) {
            let (due, callback) = {
                let mut timers = self.timers.borrow_mut();
                let Some(timer) = timers.get_mut(&id) else {
                    continue;
                };
                (timer.due, timer.callback.take())
            };
            self.now.set(due);
            match callback {
                Some(Callback::Once(callback)) => {
                    self.timers.borrow_mut().remove(&id);
                    callback();
                }
                Some(Callback::Repeat(mut callback)) => {
                    callback();
                    // The callback may have cancelled its own timer.
                    if let Some(timer) = self.timers.borrow_mut().get_mut(&id) {
                        timer.due += timer.period.unwrap_or(MIN_PERIOD);
                        timer.callback = Some(Callback::Repeat(callback));
                    }
                }
                None => {}
            }
        }
        self.now.set(target);
    }

    fn next_due(&self, target: Duration) -> Option<TimerId> {
        self.timers
            .borrow()
            .iter()
            .filter(|(_, timer)| timer.callback.is_some() && timer.due <= target)
            .min_by_key(|(id, timer)| (timer.due, **id))
            .map(|(id, _)| *id)
    }

    fn insert(&self, due: Duration, period: Option<Duration>, callback: Callback) -> TimerId {
        let id = TimerId::new(self.next_id.get());
        self.next_id.set(self.next_id.get() + 1);
        self.timers.borrow_mut().insert(
            id,
            ManualTimer {
                due,
                period,
                callback: Some(callback),
            },
        );
        id
    }
}

impl Scheduler for ManualScheduler {
    fn now(&self) -> Duration {
        self.now.get()
    }

    fn set_interval(
        &self,
        period: Duration,
        callback: Box<dyn FnMut()>,
    ) -> Result<TimerId, Error> {
        let period = period.max(MIN_PERIOD);
        Ok(self.insert(
            self.now.get() + period,
            Some(period),
            Callback::Repeat(callback),
        ))
    }

    fn set_timeout(
        &self,
        delay: Duration,
        callback: Box<dyn FnOnce()>,
    ) -> Result<TimerId, Error> {
        Ok(self.insert(self.now.get() + delay, None, Callback::Once(callback)))
    }

    fn cancel(&self, id: TimerId) {
        self.timers.borrow_mut().remove(&id);
    }
}
