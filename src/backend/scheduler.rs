use std::{
    cell::{Cell, RefCell},
    collections::HashMap,
    fmt,
    rc::Rc,
    time::Duration,
};

use web_sys::{
    wasm_bindgen::{prelude::Closure, JsCast},
    Performance, Window,
};

use crate::{
    error::Error,
    timer::{Scheduler, TimerId, MIN_PERIOD},
    utils::window,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TimerKind {
    Interval,
    Timeout,
}

struct BrowserTimer {
    handle: i32,
    kind: TimerKind,
    #[allow(dead_code)]
    closure: Closure<dyn FnMut()>,
}

/// Closures of fired or cancelled timers.
///
/// A closure must outlive its own invocation, so it is only dropped once no
/// timer callback is running.
#[derive(Default)]
struct Registry {
    timers: HashMap<TimerId, BrowserTimer>,
    finished: Vec<TimerId>,
    running: Option<TimerId>,
}

impl Registry {
    fn collect(&mut self) {
        let running = self.running;
        let mut kept = Vec::new();
        for id in self.finished.drain(..) {
            if Some(id) == running {
                kept.push(id);
            } else {
                self.timers.remove(&id);
            }
        }
        self.finished = kept;
    }
}

/// A [`Scheduler`] on top of the browser's `setInterval` and `setTimeout`.
pub struct BrowserScheduler {
    window: Window,
    performance: Option<Performance>,
    next_id: Cell<u64>,
    registry: Rc<RefCell<Registry>>,
}

impl BrowserScheduler {
    /// Constructs a new [`BrowserScheduler`] for the global window.
    pub fn new() -> Result<Self, Error> {
        let window = window()?;
        Ok(Self {
            performance: window.performance(),
            window,
            next_id: Cell::new(0),
            registry: Rc::new(RefCell::new(Registry::default())),
        })
    }

    fn next_id(&self) -> TimerId {
        let id = TimerId::new(self.next_id.get());
        self.next_id.set(self.next_id.get() + 1);
        id
    }

    /// Wraps `callback` so that the registry knows which timer is running.
    fn tracked(&self, id: TimerId, mut callback: impl FnMut() + 'static) -> Closure<dyn FnMut()> {
        let registry = Rc::downgrade(&self.registry);
        Closure::<dyn FnMut()>::new(move || {
            if let Some(registry) = registry.upgrade() {
                registry.borrow_mut().running = Some(id);
            }
            callback();
            if let Some(registry) = registry.upgrade() {
                registry.borrow_mut().running = None;
            }
        })
    }
}

impl Scheduler for BrowserScheduler {
    fn now(&self) -> Duration {
        let millis = match &self.performance {
            Some(performance) => performance.now(),
            None => web_sys::js_sys::Date::now(),
        };
        Duration::from_secs_f64(millis.max(0.0) / 1_000.0)
    }

    fn set_interval(
        &self,
        period: Duration,
        callback: Box<dyn FnMut()>,
    ) -> Result<TimerId, Error> {
        let id = self.next_id();
        let closure = self.tracked(id, callback);
        let handle = self
            .window
            .set_interval_with_callback_and_timeout_and_arguments_0(
                closure.as_ref().unchecked_ref(),
                period.max(MIN_PERIOD).as_millis().min(i32::MAX as u128) as i32,
            )?;

        let mut registry = self.registry.borrow_mut();
        registry.collect();
        registry.timers.insert(
            id,
            BrowserTimer {
                handle,
                kind: TimerKind::Interval,
                closure,
            },
        );
        Ok(id)
    }

    fn set_timeout(
        &self,
        delay: Duration,
        callback: Box<dyn FnOnce()>,
    ) -> Result<TimerId, Error> {
        let id = self.next_id();
        let registry = Rc::downgrade(&self.registry);
        let mut callback = Some(callback);
        let closure = self.tracked(id, move || {
            if let Some(registry) = registry.upgrade() {
                registry.borrow_mut().finished.push(id);
            }
            if let Some(callback) = callback.take() {
                callback();
            }
        });
        let handle = self
            .window
            .set_timeout_with_callback_and_timeout_and_arguments_0(
                closure.as_ref().unchecked_ref(),
                delay.as_millis().min(i32::MAX as u128) as i32,
            )?;

        let mut registry = self.registry.borrow_mut();
        registry.collect();
        registry.timers.insert(
            id,
            BrowserTimer {
                handle,
                kind: TimerKind::Timeout,
                closure,
            },
        );
        Ok(id)
    }

    fn cancel(&self, id: TimerId) {
        let mut registry = self.registry.borrow_mut();
        let Some(timer) = registry.timers.get(&id) else {
            return;
        };
        match timer.kind {
            TimerKind::Interval => self.window.clear_interval_with_handle(timer.handle),
            TimerKind::Timeout => self.window.clear_timeout_with_handle(timer.handle),
        }
        registry.finished.push(id);
        registry.collect();
    }
}

impl Drop for BrowserScheduler {
    fn drop(&mut self) {
        let mut registry = self.registry.borrow_mut();
        for timer in registry.timers.values() {
            match timer.kind {
                TimerKind::Interval => self.window.clear_interval_with_handle(timer.handle),
                TimerKind::Timeout => self.window.clear_timeout_with_handle(timer.handle),
            }
        }
        let ids: Vec<TimerId> = registry.timers.keys().copied().collect();
        registry.finished.extend(ids);
        registry.collect();
    }
}

impl fmt::Debug for BrowserScheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BrowserScheduler")
            .field("timers", &self.registry.borrow().timers.len())
            .finish()
    }
}
