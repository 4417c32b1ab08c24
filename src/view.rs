//! Navigation between the site's views with a timed cross-fade.

use std::{cell::RefCell, fmt, rc::Rc, str::FromStr, time::Duration};

use log::{debug, warn};
use serde::Deserialize;

use crate::timer::{Scheduler, TimerId};

/// Delay between a view request and the view being displayed.
pub const TRANSITION_DELAY: Duration = Duration::from_millis(500);

/// A content section of the site.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum View {
    /// Landing page.
    #[default]
    Home,
    /// About me.
    About,
    /// Skill categories.
    Skills,
    /// Project cards.
    Projects,
    /// Games.
    Games,
    /// Contact details.
    Contact,
}

impl View {
    /// Every view, in navigation order.
    pub const ALL: [View; 6] = [
        View::Home,
        View::About,
        View::Skills,
        View::Projects,
        View::Games,
        View::Contact,
    ];

    /// Returns the lowercase name of the view.
    pub const fn name(self) -> &'static str {
        match self {
            View::Home => "home",
            View::About => "about",
            View::Skills => "skills",
            View::Projects => "projects",
            View::Games => "games",
            View::Contact => "contact",
        }
    }

    /// Returns the title shown in the navigation bar.
    pub const fn title(self) -> &'static str {
        match self {
            View::Home => "Home",
            View::About => "About",
            View::Skills => "Skills",
            View::Projects => "Projects",
            View::Games => "Games",
            View::Contact => "Contact",
        }
    }

    /// Returns the short line shown when hovering the view's tab.
    pub const fn tagline(self) -> &'static str {
        match self {
            View::Home => "Welcome",
            View::About => "Who Am I?",
            View::Skills => "My Expertise",
            View::Projects => "My Work",
            View::Games => "Let's Play",
            View::Contact => "Get in Touch",
        }
    }

    /// Returns the position of the view in [`View::ALL`].
    pub fn index(self) -> usize {
        View::ALL
            .iter()
            .position(|&view| view == self)
            .unwrap_or_default()
    }

    /// Returns the next view, wrapping around.
    pub fn next(self) -> Self {
        View::ALL[(self.index() + 1) % View::ALL.len()]
    }

    /// Returns the previous view, wrapping around.
    pub fn previous(self) -> Self {
        View::ALL[(self.index() + View::ALL.len() - 1) % View::ALL.len()]
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

/// Error returned when parsing an unknown view name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown view `{0}`")]
pub struct UnknownView(pub String);

impl FromStr for View {
    type Err = UnknownView;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        View::ALL
            .into_iter()
            .find(|view| view.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownView(s.to_string()))
    }
}

/// Whether a view swap is pending.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionPhase {
    /// The displayed view is the requested one.
    Stable,
    /// The displayed view will be replaced once the delay elapses.
    Transitioning,
}

/// What the render layer needs from the coordinator on every frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewState {
    /// The view the user asked for last.
    pub requested: View,
    /// The view to render.
    pub displayed: View,
    /// Whether the displayed view is about to be replaced.
    pub transitioning: bool,
}

#[derive(Debug)]
struct Inner {
    requested: View,
    displayed: View,
    pending: Option<TimerId>,
}

type ShownListener = Box<dyn FnMut(View)>;

/// Calls the listener, unless it is already running further up the stack.
fn notify_shown(on_shown: &RefCell<Option<ShownListener>>, view: View) {
    let Ok(mut listener) = on_shown.try_borrow_mut() else {
        return;
    };
    if let Some(listener) = listener.as_mut() {
        listener(view);
    }
}

/// Coordinates navigation requests and the delayed swap of the displayed view.
///
/// Only one swap is pending at any time: a new request cancels the pending
/// swap and restarts the delay, so the latest request always wins.
pub struct ViewCoordinator {
    scheduler: Rc<dyn Scheduler>,
    delay: Duration,
    inner: Rc<RefCell<Inner>>,
    on_shown: Rc<RefCell<Option<ShownListener>>>,
}

impl ViewCoordinator {
    /// Constructs a new [`ViewCoordinator`] showing `initial`, with the default
    /// [`TRANSITION_DELAY`].
    pub fn new(scheduler: Rc<dyn Scheduler>, initial: View) -> Self {
        Self::with_delay(scheduler, initial, TRANSITION_DELAY)
    }

    /// Constructs a new [`ViewCoordinator`] with a custom transition delay.
    pub fn with_delay(scheduler: Rc<dyn Scheduler>, initial: View, delay: Duration) -> Self {
        Self {
            scheduler,
            delay,
            inner: Rc::new(RefCell::new(Inner {
                requested: initial,
                displayed: initial,
                pending: None,
            })),
            on_shown: Rc::new(RefCell::new(None)),
        }
    }

    /// Sets a listener called every time a new view gets displayed.
    ///
    /// The listener runs after the state is updated and may request views, but
    /// must not replace itself.
    pub fn on_view_shown<F>(&self, listener: F)
    where
        F: FnMut(View) + 'static,
    {
        *self.on_shown.borrow_mut() = Some(Box::new(listener));
    }

    /// Asks for `view` to be displayed.
    ///
    /// Returns `true` if a new transition was started.
    pub fn request_view(&self, view: View) -> bool {
        let mut inner = self.inner.borrow_mut();
        if inner.requested == view {
            return false;
        }
        inner.requested = view;
        if let Some(pending) = inner.pending.take() {
            self.scheduler.cancel(pending);
        }
        if inner.displayed == view {
            debug!("Back on {view} before the swap, transition cancelled");
            return false;
        }

        let state = Rc::downgrade(&self.inner);
        let on_shown = Rc::downgrade(&self.on_shown);
        let swap = Box::new(move || {
            let Some(state) = state.upgrade() else {
                return;
            };
            let shown = {
                let mut inner = state.borrow_mut();
                inner.displayed = inner.requested;
                inner.pending = None;
                inner.displayed
            };
            debug!("Showing {shown}");
            if let Some(on_shown) = on_shown.upgrade() {
                notify_shown(&on_shown, shown);
            }
        });
        match self.scheduler.set_timeout(self.delay, swap) {
            Ok(id) => {
                inner.pending = Some(id);
                true
            }
            Err(e) => {
                warn!("Unable to schedule the swap to {view}, showing it right away: {e}");
                inner.displayed = view;
                drop(inner);
                notify_shown(&self.on_shown, view);
                false
            }
        }
    }

    /// Returns the state to render.
    pub fn state(&self) -> ViewState {
        let inner = self.inner.borrow();
        ViewState {
            requested: inner.requested,
            displayed: inner.displayed,
            transitioning: inner.pending.is_some(),
        }
    }

    /// Returns the view the user asked for last.
    pub fn requested(&self) -> View {
        self.inner.borrow().requested
    }

    /// Returns the view to render.
    pub fn displayed(&self) -> View {
        self.inner.borrow().displayed
    }

    /// Returns `true` while a swap is pending.
    pub fn is_transitioning(&self) -> bool {
        self.inner.borrow().pending.is_some()
    }

    /// Returns the transition phase.
    pub fn phase(&self) -> TransitionPhase {
        if self.is_transitioning() {
            TransitionPhase::Transitioning
        } else {
            TransitionPhase::Stable
        }
    }

    /// Returns the transition delay.
    pub fn delay(&self) -> Duration {
        self.delay
    }
}

impl Drop for ViewCoordinator {
    fn drop(&mut self) {
        if let Some(pending) = self.inner.borrow_mut().pending.take() {
            self.scheduler.cancel(pending);
        }
    }
}

impl fmt::Debug for ViewCoordinator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ViewCoordinator")
            .field("delay", &self.delay)
            .field("state", &self.state())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timer::ManualScheduler;

    fn ms(value: u64) -> Duration {
        Duration::from_millis(value)
    }

    fn coordinator() -> (Rc<ManualScheduler>, ViewCoordinator) {
        let scheduler = Rc::new(ManualScheduler::new());
        let coordinator = ViewCoordinator::new(scheduler.clone(), View::Home);
        (scheduler, coordinator)
    }

    #[test]
    fn test_starts_stable_on_initial_view() {
        let (_, coordinator) = coordinator();
        assert_eq!(
            coordinator.state(),
            ViewState {
                requested: View::Home,
                displayed: View::Home,
                transitioning: false,
            }
        );
        assert_eq!(coordinator.phase(), TransitionPhase::Stable);
    }

    #[test]
    fn test_request_swaps_after_delay() {
        let (scheduler, coordinator) = coordinator();
        assert!(coordinator.request_view(View::Projects));

        assert_eq!(coordinator.displayed(), View::Home);
        assert!(coordinator.is_transitioning());
        assert_eq!(coordinator.phase(), TransitionPhase::Transitioning);

        scheduler.advance(ms(499));
        assert_eq!(coordinator.displayed(), View::Home);
        assert!(coordinator.is_transitioning());

        scheduler.advance(ms(1));
        assert_eq!(coordinator.displayed(), View::Projects);
        assert!(!coordinator.is_transitioning());
        assert_eq!(coordinator.phase(), TransitionPhase::Stable);
    }

    #[test]
    fn test_request_is_idempotent() {
        let (scheduler, coordinator) = coordinator();
        assert!(coordinator.request_view(View::About));
        scheduler.advance(ms(300));
        assert!(!coordinator.request_view(View::About));
        assert_eq!(scheduler.pending(), 1);

        // The repeated request did not restart the delay.
        scheduler.advance(ms(200));
        assert_eq!(coordinator.displayed(), View::About);
        assert!(!coordinator.request_view(View::About));
        assert_eq!(scheduler.pending(), 0);
    }

    #[test]
    fn test_latest_request_wins() {
        let (scheduler, coordinator) = coordinator();
        let shown = Rc::new(RefCell::new(Vec::new()));
        coordinator.on_view_shown({
            let shown = shown.clone();
            move |view| shown.borrow_mut().push(view)
        });

        coordinator.request_view(View::Skills);
        scheduler.advance(ms(250));
        coordinator.request_view(View::Contact);
        assert_eq!(scheduler.pending(), 1);

        for _ in 0..100 {
            scheduler.advance(ms(10));
            assert_ne!(coordinator.displayed(), View::Skills);
        }
        assert_eq!(coordinator.displayed(), View::Contact);
        assert_eq!(*shown.borrow(), vec![View::Contact]);
    }

    #[test]
    fn test_delay_restarts_from_latest_request() {
        let (scheduler, coordinator) = coordinator();
        coordinator.request_view(View::Skills);
        scheduler.advance(ms(400));
        coordinator.request_view(View::Games);
        scheduler.advance(ms(400));
        assert_eq!(coordinator.displayed(), View::Home);
        scheduler.advance(ms(100));
        assert_eq!(coordinator.displayed(), View::Games);
    }

    #[test]
    fn test_returning_to_displayed_view_cancels_transition() {
        let (scheduler, coordinator) = coordinator();
        coordinator.request_view(View::About);
        assert!(!coordinator.request_view(View::Home));
        assert!(!coordinator.is_transitioning());
        assert_eq!(scheduler.pending(), 0);

        scheduler.advance(ms(1_000));
        assert_eq!(coordinator.displayed(), View::Home);
    }

    #[test]
    fn test_listener_may_request_views() {
        let scheduler = Rc::new(ManualScheduler::new());
        let coordinator = Rc::new(ViewCoordinator::new(scheduler.clone(), View::Home));
        coordinator.on_view_shown({
            let coordinator = Rc::downgrade(&coordinator);
            move |view| {
                if view == View::About {
                    if let Some(coordinator) = coordinator.upgrade() {
                        coordinator.request_view(View::Skills);
                    }
                }
            }
        });

        coordinator.request_view(View::About);
        scheduler.advance(ms(500));
        assert_eq!(coordinator.displayed(), View::About);
        assert!(coordinator.is_transitioning());
        scheduler.advance(ms(500));
        assert_eq!(coordinator.displayed(), View::Skills);
    }

    #[test]
    fn test_drop_cancels_pending_swap() {
        let (scheduler, coordinator) = coordinator();
        coordinator.request_view(View::Games);
        drop(coordinator);
        assert_eq!(scheduler.pending(), 0);
        scheduler.advance(ms(1_000));
    }

    struct NoTimers;

    impl Scheduler for NoTimers {
        fn now(&self) -> Duration {
            Duration::ZERO
        }

        fn set_interval(
            &self,
            _period: Duration,
            _callback: Box<dyn FnMut()>,
        ) -> Result<TimerId, crate::error::Error> {
            Err(crate::error::Error::Js("no timers".into()))
        }

        fn set_timeout(
            &self,
            _delay: Duration,
            _callback: Box<dyn FnOnce()>,
        ) -> Result<TimerId, crate::error::Error> {
            Err(crate::error::Error::Js("no timers".into()))
        }

        fn cancel(&self, _id: TimerId) {}
    }

    #[test]
    fn test_unschedulable_swap_shows_view_and_notifies() {
        let coordinator = ViewCoordinator::new(Rc::new(NoTimers), View::Home);
        let shown = Rc::new(RefCell::new(Vec::new()));
        coordinator.on_view_shown({
            let shown = shown.clone();
            move |view| shown.borrow_mut().push(view)
        });

        assert!(!coordinator.request_view(View::Projects));
        assert_eq!(coordinator.displayed(), View::Projects);
        assert!(!coordinator.is_transitioning());
        assert_eq!(*shown.borrow(), vec![View::Projects]);

        coordinator.request_view(View::Contact);
        assert_eq!(*shown.borrow(), vec![View::Projects, View::Contact]);
    }

    #[test]
    fn test_view_navigation_order() {
        assert_eq!(View::Home.next(), View::About);
        assert_eq!(View::Contact.next(), View::Home);
        assert_eq!(View::Home.previous(), View::Contact);
        assert_eq!(View::Games.index(), 4);
    }

    #[test]
    fn test_parse_view() {
        assert_eq!("projects".parse::<View>(), Ok(View::Projects));
        assert_eq!(" Contact ".parse::<View>(), Ok(View::Contact));
        assert_eq!(
            "blog".parse::<View>(),
            Err(UnknownView("blog".to_string()))
        );
    }
}
