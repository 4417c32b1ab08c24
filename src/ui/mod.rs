//! The site drawn with Ratatui: a navigation bar above the displayed page.

use std::{rc::Rc, time::Duration};

use log::debug;
use ratatui::{
    layout::{Constraint, Layout, Position, Rect},
    Frame,
};

use crate::{
    config::Settings,
    content::SiteContent,
    event::{KeyCode, KeyEvent, MouseButton, MouseEvent, MouseEventKind},
    timer::Scheduler,
    view::{View, ViewCoordinator},
};

pub mod fade;
pub mod nav;
pub mod pages;

use fade::FadeTracker;

/// Something the host has to do in response to input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Open the URL in a new tab.
    OpenUrl(String),
}

/// A clickable link on the last rendered frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkRegion {
    /// Cells covered by the link.
    pub area: Rect,
    /// Where the link leads.
    pub url: String,
}

/// Application state.
pub struct App {
    content: Rc<SiteContent>,
    scheduler: Rc<dyn Scheduler>,
    coordinator: ViewCoordinator,
    fade: FadeTracker,
    hovered: Option<View>,
    nav_area: Rect,
    tabs: Vec<nav::Tab>,
    links: Vec<LinkRegion>,
}

impl App {
    /// Constructs a new [`App`] showing the configured default view.
    pub fn new(scheduler: Rc<dyn Scheduler>, settings: &Settings, content: Rc<SiteContent>) -> Self {
        let delay = settings.transition_delay();
        Self {
            coordinator: ViewCoordinator::with_delay(
                scheduler.clone(),
                settings.default_view,
                delay,
            ),
            fade: FadeTracker::new(delay),
            content,
            scheduler,
            hovered: None,
            nav_area: Rect::default(),
            tabs: Vec::new(),
            links: Vec::new(),
        }
    }

    /// Returns the view coordinator.
    pub fn coordinator(&self) -> &ViewCoordinator {
        &self.coordinator
    }

    /// Returns the view whose tab is hovered.
    pub fn hovered(&self) -> Option<View> {
        self.hovered
    }

    /// Returns the tabs of the last rendered frame.
    pub fn tabs(&self) -> &[nav::Tab] {
        &self.tabs
    }

    /// Returns the links of the last rendered frame.
    pub fn links(&self) -> &[LinkRegion] {
        &self.links
    }

    fn select(&self, view: View) {
        if self.coordinator.request_view(view) {
            debug!("Requested {view}");
        }
    }

    /// Handles a key press.
    ///
    /// Returns `true` if the key is bound to navigation, in which case the
    /// browser's default action for it should be suppressed.
    pub fn handle_key(&mut self, event: &KeyEvent) -> bool {
        if event.ctrl || event.alt {
            return false;
        }
        let current = self.coordinator.requested();
        let target = match event.code {
            KeyCode::Right | KeyCode::Tab | KeyCode::Char('l') => current.next(),
            KeyCode::Left | KeyCode::BackTab | KeyCode::Char('h') => current.previous(),
            KeyCode::Home => View::Home,
            KeyCode::Char(digit @ '1'..='6') => View::ALL[digit as usize - '1' as usize],
            _ => return false,
        };
        self.select(target);
        true
    }

    /// Handles a mouse event in grid coordinates.
    pub fn handle_mouse(&mut self, event: &MouseEvent) -> Option<Action> {
        let tab = nav::tab_at(&self.tabs, self.nav_area, event.col, event.row);
        match event.kind {
            MouseEventKind::Moved => {
                self.hovered = tab;
                None
            }
            MouseEventKind::Exited => {
                self.hovered = None;
                None
            }
            MouseEventKind::Clicked(MouseButton::Left) => {
                if let Some(view) = tab {
                    self.select(view);
                    return None;
                }
                if self.coordinator.is_transitioning() {
                    return None;
                }
                let position = Position::new(event.col, event.row);
                self.links
                    .iter()
                    .find(|link| link.area.contains(position))
                    .map(|link| Action::OpenUrl(link.url.clone()))
            }
            _ => None,
        }
    }

    /// Returns the opacity of the page area at `now`.
    fn opacity(&mut self, now: Duration) -> f64 {
        self.fade.update(self.coordinator.is_transitioning(), now)
    }

    /// Renders the frame.
    pub fn render(&mut self, frame: &mut Frame) {
        let area = frame.area();
        let state = self.coordinator.state();
        let opacity = self.opacity(self.scheduler.now());
        let [nav_area, body] =
            Layout::vertical([Constraint::Length(nav::HEIGHT), Constraint::Fill(1)]).areas(area);

        self.nav_area = nav_area;
        self.tabs = nav::render(
            frame,
            nav_area,
            &self.content.profile,
            state.requested,
            self.hovered,
        );

        let mut links = Vec::new();
        if opacity > 0.0 {
            pages::render(frame, body, state.displayed, &self.content, &mut links);
            fade::apply(frame.buffer_mut(), body, opacity);
        }
        self.links = links;

        if let Some(tab) = self
            .hovered
            .and_then(|view| self.tabs.iter().find(|tab| tab.view == view))
        {
            nav::render_tooltip(frame, area, nav_area, tab);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{config::SiteConfig, timer::ManualScheduler};
    use ratatui::{backend::TestBackend, buffer::Buffer, style::Color, Terminal};

    const DELAY: Duration = Duration::from_millis(500);

    struct Harness {
        scheduler: Rc<ManualScheduler>,
        terminal: Terminal<TestBackend>,
        app: App,
    }

    impl Harness {
        fn new() -> Self {
            let config = SiteConfig::bundled().unwrap();
            let scheduler = Rc::new(ManualScheduler::new());
            let app = App::new(
                scheduler.clone(),
                &config.settings,
                Rc::new(config.content),
            );
            Self {
                scheduler,
                terminal: Terminal::new(TestBackend::new(100, 30)).unwrap(),
                app,
            }
        }

        fn draw(&mut self) -> Buffer {
            let app = &mut self.app;
            self.terminal.draw(|frame| app.render(frame)).unwrap();
            self.terminal.backend().buffer().clone()
        }

        fn key(&mut self, code: KeyCode) {
            assert!(self.app.handle_key(&KeyEvent::new(code)));
        }

        fn click(&mut self, col: u16, row: u16) -> Option<Action> {
            self.app.handle_mouse(&MouseEvent::new(
                MouseEventKind::Clicked(MouseButton::Left),
                col,
                row,
            ))
        }

        fn tab(&self, view: View) -> Rect {
            self.app
                .tabs()
                .iter()
                .find(|tab| tab.view == view)
                .map(|tab| tab.area)
                .unwrap()
        }
    }

    fn screen(buffer: &Buffer) -> String {
        buffer
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    fn find(buffer: &Buffer, needle: &str) -> Option<Position> {
        let width = buffer.area.width as usize;
        let screen: Vec<&str> = buffer.content().iter().map(|cell| cell.symbol()).collect();
        let first = needle.chars().next()?.to_string();
        (0..screen.len()).find_map(|start| {
            let matches = needle
                .chars()
                .enumerate()
                .all(|(i, c)| screen.get(start + i).is_some_and(|s| *s == c.to_string()));
            (matches && screen[start] == first)
                .then(|| Position::new((start % width) as u16, (start / width) as u16))
        })
    }

    #[test]
    fn test_initial_render() {
        let mut harness = Harness::new();
        let buffer = harness.draw();
        let screen = screen(&buffer);
        assert!(screen.contains("<AK/>"));
        for view in View::ALL {
            assert!(screen.contains(view.title()), "{view}");
        }
        assert!(screen.contains("Aykut"));
        assert_eq!(harness.app.links().len(), 2);
    }

    #[test]
    fn test_keys_switch_after_delay() {
        let mut harness = Harness::new();
        harness.draw();
        harness.key(KeyCode::Right);
        assert_eq!(harness.app.coordinator().requested(), View::About);
        assert_eq!(harness.app.coordinator().displayed(), View::Home);

        harness.scheduler.advance(DELAY);
        assert_eq!(harness.app.coordinator().displayed(), View::About);
        harness.scheduler.advance(DELAY);
        assert!(screen(&harness.draw()).contains("About Me"));
    }

    #[test]
    fn test_key_bindings() {
        let mut harness = Harness::new();
        harness.key(KeyCode::Left);
        assert_eq!(harness.app.coordinator().requested(), View::Contact);
        harness.key(KeyCode::Char('4'));
        assert_eq!(harness.app.coordinator().requested(), View::Projects);
        harness.key(KeyCode::Char('l'));
        assert_eq!(harness.app.coordinator().requested(), View::Games);
        harness.key(KeyCode::BackTab);
        assert_eq!(harness.app.coordinator().requested(), View::Projects);
        assert!(!harness.app.handle_key(&KeyEvent::new(KeyCode::Char('9'))));
        assert_eq!(harness.app.coordinator().requested(), View::Projects);
        harness.key(KeyCode::Home);
        assert_eq!(harness.app.coordinator().requested(), View::Home);
        assert!(!harness.app.coordinator().is_transitioning());

        let mut ctrl = KeyEvent::new(KeyCode::Right);
        ctrl.ctrl = true;
        assert!(!harness.app.handle_key(&ctrl));
        assert_eq!(harness.app.coordinator().requested(), View::Home);
    }

    #[test]
    fn test_only_bound_keys_are_consumed() {
        let mut harness = Harness::new();
        for code in [KeyCode::Tab, KeyCode::BackTab, KeyCode::Home, KeyCode::Char('1')] {
            assert!(harness.app.handle_key(&KeyEvent::new(code)), "{code:?}");
        }
        for code in [
            KeyCode::Char('x'),
            KeyCode::Char('0'),
            KeyCode::Enter,
            KeyCode::Esc,
            KeyCode::Up,
            KeyCode::Unidentified,
        ] {
            assert!(!harness.app.handle_key(&KeyEvent::new(code)), "{code:?}");
        }

        let mut alt_tab = KeyEvent::new(KeyCode::Tab);
        alt_tab.alt = true;
        assert!(!harness.app.handle_key(&alt_tab));
    }

    #[test]
    fn test_click_tab_requests_view() {
        let mut harness = Harness::new();
        harness.draw();
        let skills = harness.tab(View::Skills);
        assert_eq!(harness.click(skills.x, 0), None);
        assert_eq!(harness.app.coordinator().requested(), View::Skills);
        assert!(harness.app.coordinator().is_transitioning());
    }

    #[test]
    fn test_hover_shows_tagline() {
        let mut harness = Harness::new();
        harness.draw();
        let about = harness.tab(View::About);
        harness
            .app
            .handle_mouse(&MouseEvent::new(MouseEventKind::Moved, about.x + 1, about.y));
        assert_eq!(harness.app.hovered(), Some(View::About));
        assert!(screen(&harness.draw()).contains("Who Am I?"));

        harness
            .app
            .handle_mouse(&MouseEvent::new(MouseEventKind::Exited, 0, 0));
        assert_eq!(harness.app.hovered(), None);
        assert!(!screen(&harness.draw()).contains("Who Am I?"));
    }

    #[test]
    fn test_links_only_open_when_stable() {
        let mut harness = Harness::new();
        harness.draw();
        let github = harness.app.links()[0].clone();
        assert_eq!(
            harness.click(github.area.x, github.area.y),
            Some(Action::OpenUrl(github.url.clone()))
        );

        harness.key(KeyCode::Right);
        assert_eq!(harness.click(github.area.x, github.area.y), None);
    }

    #[test]
    fn test_page_fades_during_transition() {
        let mut harness = Harness::new();
        let buffer = harness.draw();
        let name = find(&buffer, "Aykut").unwrap();
        let color = buffer[(name.x, name.y)].fg;
        assert_eq!(color, Color::LightGreen);

        harness.key(KeyCode::Right);
        harness.draw();
        harness.scheduler.advance(DELAY / 2);
        let buffer = harness.draw();
        assert_eq!(buffer[(name.x, name.y)].symbol(), "A");
        assert_ne!(buffer[(name.x, name.y)].fg, color);

        harness.scheduler.advance(DELAY / 2);
        let buffer = harness.draw();
        assert_eq!(harness.app.coordinator().displayed(), View::About);
        assert!(harness.app.links().is_empty());
        assert!(!screen(&buffer).contains("About Me"));
    }
}
