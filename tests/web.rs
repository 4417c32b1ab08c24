#![cfg(target_arch = "wasm32")]

use std::{cell::Cell, rc::Rc, time::Duration};

use rand::{rngs::SmallRng, SeedableRng};
use ratfolio::{
    ratatui::{backend::Backend, Terminal},
    surface::{Dimensions, Rgba, Surface},
    App, BrowserScheduler, CanvasSurface, CanvasSurfaceOptions, RainConfig, RainDriver,
    Scheduler, SiteBackend, SiteBackendOptions, SiteConfig,
};
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

#[wasm_bindgen_test]
fn canvas_surface_draws() {
    let mut surface = CanvasSurface::new(CanvasSurfaceOptions::new().size((64, 32))).unwrap();
    surface.resize(Dimensions::new(128.0, 64.0)).unwrap();
    surface.set_font_size(16.0).unwrap();
    surface
        .fill_rect(0.0, 0.0, 128.0, 64.0, Rgba::new(18, 18, 18, 0.1))
        .unwrap();
    surface
        .fill_text("ア", 16.0, 16.0, Rgba::opaque(255, 255, 255))
        .unwrap();
}

#[wasm_bindgen_test]
fn browser_clock_moves_forward() {
    let scheduler = BrowserScheduler::new().unwrap();
    let before = scheduler.now();
    assert!(scheduler.now() >= before);
}

#[wasm_bindgen_test]
fn cancelled_timer_never_fires() {
    let scheduler = BrowserScheduler::new().unwrap();
    let fired = Rc::new(Cell::new(false));
    let id = scheduler
        .set_timeout(Duration::from_millis(10), {
            let fired = fired.clone();
            Box::new(move || fired.set(true))
        })
        .unwrap();
    scheduler.cancel(id);
    scheduler.cancel(id);
    assert!(!fired.get());
}

#[wasm_bindgen_test]
fn site_renders_into_backend() {
    let config = SiteConfig::bundled().unwrap();
    let backend =
        SiteBackend::new_with_options(SiteBackendOptions::new().size((800, 600))).unwrap();
    let size = backend.size().unwrap();
    assert!(size.width > 0 && size.height > 0);

    let scheduler: Rc<dyn Scheduler> = Rc::new(BrowserScheduler::new().unwrap());
    let mut app = App::new(scheduler, &config.settings, Rc::new(config.content));
    let mut terminal = Terminal::new(backend).unwrap();
    terminal.draw(|frame| app.render(frame)).unwrap();
    assert_eq!(app.links().len(), 2);
}

#[wasm_bindgen_test]
fn rain_reattaches_after_detach() {
    let scheduler: Rc<dyn Scheduler> = Rc::new(BrowserScheduler::new().unwrap());
    let attach = || {
        let surface = CanvasSurface::new(CanvasSurfaceOptions::new().size((320, 480))).unwrap();
        RainDriver::attach(
            scheduler.clone(),
            Some(surface),
            Dimensions::new(320.0, 480.0),
            RainConfig::default(),
            SmallRng::seed_from_u64(7),
        )
    };
    let mut driver = attach();
    driver.detach();
    assert!(!driver.is_attached());

    driver = attach();
    assert!(driver.is_attached());
    assert_eq!(driver.state().unwrap().columns(), 20);
}
