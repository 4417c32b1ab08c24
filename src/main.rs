use std::{cell::RefCell, io, rc::Rc};

use log::{debug, info, warn};
use rand::{rngs::SmallRng, SeedableRng};
use ratfolio::{
    backend::event_callback::EventCallback,
    logging,
    ratatui::{Frame, Terminal},
    utils::{open_url, random_seed, set_document_title, viewport_size, window},
    web_sys, Action, App, BrowserScheduler, CanvasSurface, CanvasSurfaceOptions, Error,
    RainConfig, RainDriver, Scheduler, SiteBackend, SiteBackendOptions, SiteConfig, View,
    WebRenderer,
};

fn document_title(view: View, name: &str) -> String {
    format!("{} | {name}", view.title())
}

fn perform(action: Option<Action>) {
    if let Some(Action::OpenUrl(url)) = action {
        if let Err(e) = open_url(&url) {
            warn!("Unable to open {url}: {e}");
        }
    }
}

/// Creates a rain canvas covering the viewport and starts the animation on it.
///
/// Without a canvas the returned driver is inert.
fn attach_rain(
    scheduler: Rc<dyn Scheduler>,
    config: RainConfig,
) -> Result<RainDriver<CanvasSurface>, Error> {
    let surface = CanvasSurface::new(CanvasSurfaceOptions::new())
        .inspect_err(|e| warn!("Unable to create the rain canvas: {e}"))
        .ok();
    Ok(RainDriver::attach(
        scheduler,
        surface,
        viewport_size()?,
        config,
        SmallRng::seed_from_u64(random_seed()),
    ))
}

/// The background animation and the window listeners that keep it in sync
/// with the page lifecycle.
struct Background {
    rain: Rc<RefCell<RainDriver<CanvasSurface>>>,
    _on_resize: EventCallback<web_sys::Event>,
    _on_pagehide: EventCallback<web_sys::PageTransitionEvent>,
    _on_pageshow: EventCallback<web_sys::PageTransitionEvent>,
}

impl Background {
    fn start(scheduler: Rc<dyn Scheduler>, config: RainConfig) -> Result<Self, Error> {
        let rain = Rc::new(RefCell::new(attach_rain(scheduler.clone(), config.clone())?));

        let on_resize = EventCallback::new(window()?, &["resize"], {
            let rain = rain.clone();
            move |_: web_sys::Event| match viewport_size() {
                Ok(dimensions) => rain.borrow_mut().resize(dimensions),
                Err(e) => warn!("Unable to read the viewport size: {e}"),
            }
        })?;
        let on_pagehide = EventCallback::new(window()?, &["pagehide"], {
            let rain = rain.clone();
            move |_: web_sys::PageTransitionEvent| rain.borrow_mut().detach()
        })?;
        // A page restored from the back/forward cache keeps its state but lost
        // the canvas on `pagehide`.
        let on_pageshow = EventCallback::new(window()?, &["pageshow"], {
            let rain = rain.clone();
            move |event: web_sys::PageTransitionEvent| {
                if !event.persisted() {
                    return;
                }
                debug!("Page restored, attaching the rain again");
                match attach_rain(scheduler.clone(), config.clone()) {
                    Ok(driver) => *rain.borrow_mut() = driver,
                    Err(e) => warn!("Unable to restore the rain: {e}"),
                }
            }
        })?;

        Ok(Self {
            rain,
            _on_resize: on_resize,
            _on_pagehide: on_pagehide,
            _on_pageshow: on_pageshow,
        })
    }
}

/// Everything the render loop keeps alive.
struct Site {
    app: Rc<RefCell<App>>,
    _background: Background,
}

impl Site {
    fn render(&self, frame: &mut Frame) {
        self.app.borrow_mut().render(frame);
    }
}

fn main() -> io::Result<()> {
    std::panic::set_hook(Box::new(console_error_panic_hook::hook));

    let SiteConfig {
        settings,
        rain: rain_config,
        content,
    } = SiteConfig::bundled()?;
    logging::init(settings.log_level()?)?;

    let scheduler: Rc<dyn Scheduler> = Rc::new(BrowserScheduler::new()?);
    let background = Background::start(scheduler.clone(), rain_config)?;
    debug!("Rain attached: {}", background.rain.borrow().is_attached());

    let name = content.profile.name.clone();
    let app = App::new(scheduler.clone(), &settings, Rc::new(content));
    set_document_title(&document_title(app.coordinator().displayed(), &name))?;
    app.coordinator().on_view_shown(move |view| {
        if let Err(e) = set_document_title(&document_title(view, &name)) {
            warn!("Unable to update the document title: {e}");
        }
    });
    let app = Rc::new(RefCell::new(app));

    let backend = SiteBackend::new_with_options(
        SiteBackendOptions::new().background_alpha(settings.panel_alpha()),
    )?;
    let mut terminal = Terminal::new(backend)?;

    terminal.on_key_event({
        let app = app.clone();
        move |event| app.borrow_mut().handle_key(&event)
    })?;
    terminal.on_mouse_event({
        let app = app.clone();
        move |event| {
            let action = app.borrow_mut().handle_mouse(&event);
            perform(action);
        }
    })?;

    info!("Site ready");
    let site = Site {
        app,
        _background: background,
    };
    terminal.draw_web(move |frame| site.render(frame))?;

    Ok(())
}
