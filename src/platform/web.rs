//! Browser binding
//!
//! [`GameView`] mounts the game on a canvas, wires mouse/touch/keyboard
//! listeners, drives the frame loop through `requestAnimationFrame` and
//! forwards session events to a JavaScript listener as
//! `(name, value, json)`.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{
    CanvasRenderingContext2d, Event, EventTarget, HtmlCanvasElement, KeyboardEvent, MouseEvent,
    TouchEvent, Window,
};

use super::{PlatformError, now_ms, parse_content, parse_quality, with_option};
use crate::game::Game;
use crate::input::{FIRE_KEY, InputEvent, SurfaceRect};
use crate::renderer::CanvasSurface;
use crate::scheduler::{FrameAction, FrameScheduler, FrameSource};
use crate::session::{Session, SessionEvent};
use crate::settings::Settings;
use crate::sim::PlayArea;

impl From<PlatformError> for JsValue {
    fn from(e: PlatformError) -> Self {
        JsValue::from_str(&e.to_string())
    }
}

fn js_error(e: JsValue) -> PlatformError {
    PlatformError::Js(e.as_string().unwrap_or_else(|| format!("{:?}", e)))
}

/// Console logger and panic hook; safe to call more than once
pub fn init_logging() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        log::debug!("Logger already initialized");
    }
}

type FrameCallback = Closure<dyn FnMut(f64)>;

/// `requestAnimationFrame` as a [`FrameSource`]
pub struct WebFrames {
    window: Window,
    callback: Option<FrameCallback>,
}

impl FrameSource for WebFrames {
    type Handle = i32;

    fn request(&mut self) -> Option<i32> {
        let callback = self.callback.as_ref()?;
        match self
            .window
            .request_animation_frame(callback.as_ref().unchecked_ref())
        {
            Ok(handle) => Some(handle),
            Err(e) => {
                log::warn!("requestAnimationFrame failed: {:?}", e);
                None
            }
        }
    }

    fn cancel(&mut self, handle: i32) {
        if let Err(e) = self.window.cancel_animation_frame(handle) {
            log::debug!("cancelAnimationFrame failed: {:?}", e);
        }
    }
}

struct Inner {
    game: Game,
    session: Session,
    canvas: HtmlCanvasElement,
    surface: CanvasSurface,
    scheduler: FrameScheduler<WebFrames>,
    listener: Option<js_sys::Function>,
}

impl Inner {
    fn sync_rect(&mut self) {
        let r = self.canvas.get_bounding_client_rect();
        self.game.input.set_rect(SurfaceRect::new(
            r.left() as f32,
            r.top() as f32,
            r.width() as f32,
            r.height() as f32,
        ));
    }

    /// After any page-driven transition: spawn if needed, then loop or
    /// draw a single static frame
    fn refresh(&mut self) {
        self.game.sync_mode(&self.session);
        match self.scheduler.observe(self.session.mode()) {
            FrameAction::DrawOnce => self.game.draw(&mut self.surface),
            FrameAction::Loop | FrameAction::Idle => {}
        }
    }

    fn frame(&mut self, time: f64) {
        if self.scheduler.is_closed() {
            return;
        }
        self.game.frame(time, now_ms(), &mut self.session);
        self.game.draw(&mut self.surface);
        self.scheduler.on_frame(self.session.mode());
    }

    fn take_events(&mut self) -> (Option<js_sys::Function>, Vec<SessionEvent>) {
        (self.listener.clone(), self.session.drain_events())
    }
}

/// Deliver events with no borrow held, so the listener may call back in
fn dispatch(listener: Option<js_sys::Function>, events: Vec<SessionEvent>) {
    let Some(listener) = listener else {
        return;
    };
    for event in events {
        let (name, value) = event.to_pair();
        let json = match event.to_json() {
            Ok(json) => JsValue::from_str(&json),
            Err(e) => {
                log::warn!("Could not serialize '{}': {}", name, e);
                JsValue::NULL
            }
        };
        if let Err(e) = listener.call3(
            &JsValue::NULL,
            &JsValue::from_str(name),
            &JsValue::from_str(&value),
            &json,
        ) {
            log::warn!("Session listener threw on '{}': {:?}", name, e);
        }
    }
}

fn on_animation_frame(inner: &Weak<RefCell<Inner>>, time: f64) {
    let Some(inner) = inner.upgrade() else {
        return;
    };
    let pending = {
        let Ok(mut inner) = inner.try_borrow_mut() else {
            log::warn!("Frame callback re-entered, skipping");
            return;
        };
        inner.frame(time);
        inner.take_events()
    };
    dispatch(pending.0, pending.1);
}

fn feed(inner: &Rc<RefCell<Inner>>, event: InputEvent) {
    if let Ok(mut inner) = inner.try_borrow_mut() {
        inner.sync_rect();
        inner.game.handle_input(event);
    }
}

struct Listener {
    target: EventTarget,
    kind: &'static str,
    closure: Closure<dyn FnMut(Event)>,
}

#[wasm_bindgen]
pub struct GameView {
    inner: Rc<RefCell<Inner>>,
    listeners: Vec<Listener>,
}

#[wasm_bindgen]
impl GameView {
    /// Mount on the canvas with the given element id
    pub fn mount(canvas_id: &str) -> Result<GameView, JsValue> {
        Ok(Self::try_mount(canvas_id)?)
    }

    /// Leave the intro screen
    pub fn start(&self) {
        self.update(|inner| inner.session.start());
    }

    pub fn open_content(&self, kind: &str) -> Result<(), JsValue> {
        let kind = parse_content(kind)?;
        self.update(|inner| inner.session.open_content(kind));
        Ok(())
    }

    pub fn close_modal(&self) {
        self.update(|inner| inner.session.close_modal());
    }

    pub fn toggle_menu(&self) {
        self.update(|inner| inner.session.toggle_menu());
    }

    pub fn replay(&self) {
        self.update(|inner| {
            let Inner { game, session, .. } = inner;
            game.replay(session, now_ms() as u64);
        });
    }

    /// Switch the quality preset ("low", "medium", "high") and persist it
    pub fn set_quality(&self, name: &str) -> Result<(), JsValue> {
        let preset = parse_quality(name)?;
        self.update(|inner| {
            let mut settings = inner.game.world.settings.clone();
            settings.apply_preset(preset);
            inner.game.apply_settings(settings);
        });
        Ok(())
    }

    /// Turn a visual toggle on or off and persist it
    pub fn set_option(&self, name: &str, on: bool) -> Result<(), JsValue> {
        let settings = with_option(&self.inner.borrow().game.world.settings, name, on)?;
        self.update(|inner| inner.game.apply_settings(settings));
        Ok(())
    }

    pub fn quality(&self) -> String {
        self.inner.borrow().game.world.settings.quality.as_str().to_string()
    }

    /// Register `fn(name, value, json)` for session events
    pub fn set_listener(&self, listener: js_sys::Function) {
        self.update(|inner| inner.listener = Some(listener));
    }

    pub fn score(&self) -> f64 {
        self.inner.borrow().session.score() as f64
    }

    pub fn mode(&self) -> String {
        self.inner.borrow().session.mode().as_str().to_string()
    }

    /// Stop the loop for good and detach every listener
    pub fn teardown(&mut self) {
        match self.inner.try_borrow_mut() {
            Ok(mut inner) => inner.scheduler.close(),
            Err(_) => log::warn!("Teardown while the game view is busy"),
        }
        for l in self.listeners.drain(..) {
            if let Err(e) = l
                .target
                .remove_event_listener_with_callback(l.kind, l.closure.as_ref().unchecked_ref())
            {
                log::debug!("removeEventListener({}) failed: {:?}", l.kind, e);
            }
        }
        log::info!("Game view torn down");
    }
}

impl GameView {
    fn try_mount(canvas_id: &str) -> Result<GameView, PlatformError> {
        let window = web_sys::window().ok_or(PlatformError::NoWindow)?;
        let document = window.document().ok_or(PlatformError::NoDocument)?;
        let canvas: HtmlCanvasElement = document
            .get_element_by_id(canvas_id)
            .ok_or_else(|| PlatformError::CanvasNotFound(canvas_id.to_string()))?
            .dyn_into()
            .map_err(|_| PlatformError::NotACanvas(canvas_id.to_string()))?;
        let ctx: CanvasRenderingContext2d = canvas
            .get_context("2d")
            .map_err(js_error)?
            .ok_or(PlatformError::NoContext)?
            .dyn_into()
            .map_err(|_| PlatformError::NoContext)?;

        let area = PlayArea::default();
        canvas.set_width(area.width as u32);
        canvas.set_height(area.height as u32);

        let seed = now_ms() as u64;
        let inner = Rc::new(RefCell::new(Inner {
            game: Game::new(seed, area, Settings::load()),
            session: Session::new(),
            canvas: canvas.clone(),
            surface: CanvasSurface::new(ctx),
            scheduler: FrameScheduler::new(WebFrames {
                window: window.clone(),
                callback: None,
            }),
            listener: None,
        }));

        let weak = Rc::downgrade(&inner);
        let callback = FrameCallback::new(move |time: f64| on_animation_frame(&weak, time));
        inner.borrow_mut().scheduler.source_mut().callback = Some(callback);

        let mut view = GameView {
            inner,
            listeners: Vec::new(),
        };
        view.attach_input(&window, &canvas)?;
        view.update(|inner| inner.sync_rect());

        log::info!("Mounted on #{} (seed {})", canvas_id, seed);
        Ok(view)
    }

    /// Apply a page-driven change, then refresh and forward events
    fn update(&self, f: impl FnOnce(&mut Inner)) {
        let pending = {
            let Ok(mut inner) = self.inner.try_borrow_mut() else {
                log::warn!("Game view busy, call ignored");
                return;
            };
            if inner.scheduler.is_closed() {
                log::debug!("Game view torn down, call ignored");
                return;
            }
            f(&mut inner);
            inner.refresh();
            inner.take_events()
        };
        dispatch(pending.0, pending.1);
    }

    fn listen(
        &mut self,
        target: &EventTarget,
        kind: &'static str,
        handler: impl FnMut(Event) + 'static,
    ) -> Result<(), PlatformError> {
        let closure = Closure::<dyn FnMut(Event)>::new(handler);
        target
            .add_event_listener_with_callback(kind, closure.as_ref().unchecked_ref())
            .map_err(js_error)?;
        self.listeners.push(Listener {
            target: target.clone(),
            kind,
            closure,
        });
        Ok(())
    }

    fn attach_input(&mut self, window: &Window, canvas: &HtmlCanvasElement) -> Result<(), PlatformError> {
        let canvas: &EventTarget = canvas.as_ref();
        let window: &EventTarget = window.as_ref();

        let inner = self.inner.clone();
        self.listen(canvas, "mousedown", move |e| {
            if let Some(e) = e.dyn_ref::<MouseEvent>() {
                let (x, y) = (e.client_x() as f32, e.client_y() as f32);
                feed(&inner, InputEvent::MouseDown { x, y });
            }
        })?;

        let inner = self.inner.clone();
        self.listen(canvas, "mousemove", move |e| {
            if let Some(e) = e.dyn_ref::<MouseEvent>() {
                let (x, y) = (e.client_x() as f32, e.client_y() as f32);
                feed(&inner, InputEvent::MouseMove { x, y });
            }
        })?;

        let inner = self.inner.clone();
        self.listen(window, "mouseup", move |_| feed(&inner, InputEvent::MouseUp))?;

        let inner = self.inner.clone();
        self.listen(canvas, "mouseleave", move |_| feed(&inner, InputEvent::MouseLeave))?;

        let inner = self.inner.clone();
        self.listen(canvas, "touchstart", move |e| {
            e.prevent_default();
            if let Some(touch) = e.dyn_ref::<TouchEvent>().and_then(|t| t.touches().get(0)) {
                let (x, y) = (touch.client_x() as f32, touch.client_y() as f32);
                feed(&inner, InputEvent::TouchStart { x, y });
            }
        })?;

        let inner = self.inner.clone();
        self.listen(canvas, "touchmove", move |e| {
            e.prevent_default();
            if let Some(touch) = e.dyn_ref::<TouchEvent>().and_then(|t| t.touches().get(0)) {
                let (x, y) = (touch.client_x() as f32, touch.client_y() as f32);
                feed(&inner, InputEvent::TouchMove { x, y });
            }
        })?;

        let inner = self.inner.clone();
        self.listen(canvas, "touchend", move |_| feed(&inner, InputEvent::TouchEnd))?;

        let inner = self.inner.clone();
        self.listen(window, "keydown", move |e| {
            if let Some(key) = e.dyn_ref::<KeyboardEvent>() {
                let code = key.code();
                if code == FIRE_KEY {
                    // Keep the page from scrolling while firing
                    e.prevent_default();
                }
                feed(&inner, InputEvent::KeyDown(code));
            }
        })?;

        let inner = self.inner.clone();
        self.listen(window, "keyup", move |e| {
            if let Some(key) = e.dyn_ref::<KeyboardEvent>() {
                feed(&inner, InputEvent::KeyUp(key.code()));
            }
        })?;

        let inner = self.inner.clone();
        self.listen(window, "blur", move |_| {
            if let Ok(mut inner) = inner.try_borrow_mut() {
                inner.game.input.release_all();
            }
        })?;

        let inner = self.inner.clone();
        self.listen(window, "resize", move |_| {
            if let Ok(mut inner) = inner.try_borrow_mut() {
                inner.sync_rect();
            }
        })?;

        Ok(())
    }
}

impl Drop for GameView {
    fn drop(&mut self) {
        if !self.listeners.is_empty() {
            self.teardown();
        }
    }
}
