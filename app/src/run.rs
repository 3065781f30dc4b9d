//! Startup sequence, event wiring, and the animation loop.
//!
//! Order matters: every declared texture loads before the first object is
//! built, every object is built before the first frame, and only then do
//! the listeners and the frame loop come up. A single `App` behind
//! `Rc<RefCell>` is shared by all of them.

use std::cell::RefCell;
use std::rc::Rc;

use engine::consts::RESIZE_DEBOUNCE_MS;
use engine::effect::EffectKind;
use engine::engine::{Action, Engine};
use engine::scene::SceneObject;
use gloo_timers::callback::Timeout;
use wasm_bindgen::JsCast;
use wasm_bindgen::JsValue;
use wasm_bindgen::closure::Closure;
use web_sys::{Document, HtmlCanvasElement, MouseEvent, Window};

use crate::dom;
use crate::gfx::Renderer;
use crate::loader::{self, TextureCache};

/// Selector for the one full-page canvas the engine draws into.
const CANVAS_SELECTOR: &str = "canvas[data-webgl-canvas]";

/// Selectors for the optional slide navigation controls.
const PREV_SELECTOR: &str = ".sliderBtn--prev";
const NEXT_SELECTOR: &str = ".sliderBtn--next";

struct App {
    engine: Engine,
    renderer: Renderer,
    cache: TextureCache,
}

impl App {
    /// Perform the side effects one tick or navigation requested.
    fn apply_actions(&mut self, actions: &[Action]) {
        for action in actions {
            match action {
                Action::PauseMedia { object } => self.pause_object(*object),
                Action::PlayMedia { object, slide } => self.play_slide(*object, *slide),
                Action::SetCursor(cursor) => {
                    let style = self.engine.canvas().style();
                    if let Err(err) = style.set_property("cursor", cursor) {
                        log::warn!("cursor update failed: {err:?}");
                    }
                }
            }
        }
    }

    /// Pause every video the object references.
    fn pause_object(&self, index: usize) {
        let Some(object) = self.engine.core.object(index) else {
            return;
        };
        let urls = object
            .planes
            .iter()
            .map(|p| p.texture.url.as_str())
            .chain(object.textures.iter().map(|t| t.url.as_str()));
        for url in urls {
            if let Some(video) = self.cache.video(url) {
                let _ = video.pause();
            }
        }
    }

    /// Restart the settled slide's video from the top.
    fn play_slide(&self, index: usize, slide: usize) {
        let Some(object) = self.engine.core.object(index) else {
            return;
        };
        let Some(plane) = object.planes.get(slide) else {
            return;
        };
        if let Some(video) = self.cache.video(&plane.texture.url) {
            video.set_current_time(0.0);
            let _ = video.play();
        }
    }

    /// Debounced resize firing: re-fit the drawing buffer, re-read every
    /// rect, and rescale the scene.
    fn apply_resize(&mut self) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let dpr = window.device_pixel_ratio();
        fit_drawing_buffer(self.engine.canvas(), dpr);
        self.engine.resize(dpr);
    }

    fn frame(&mut self) {
        let actions = self.engine.tick();
        self.apply_actions(&actions);

        if self.engine.core.take_projection_dirty() {
            let (width, height) = (self.engine.canvas().width(), self.engine.canvas().height());
            self.renderer.set_size(width, height);
        }

        self.renderer.refresh_videos(&self.cache);
        let App { engine, renderer, .. } = self;
        renderer.render(&engine.core);
    }
}

/// Full startup: discovery, loading, engine and renderer construction,
/// event wiring, frame loop.
pub async fn start() -> Result<(), JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let document = window.document().ok_or_else(|| JsValue::from_str("no document"))?;

    let canvas: HtmlCanvasElement = document
        .query_selector(CANVAS_SELECTOR)?
        .ok_or_else(|| JsValue::from_str("no engine canvas on this page"))?
        .dyn_into()?;
    let dpr = window.device_pixel_ratio();
    fit_drawing_buffer(&canvas, dpr);

    // Parse every tagged element up front; elements with an unknown effect
    // tag are logged and dropped without affecting their siblings.
    let mut pending = Vec::new();
    let mut all_bindings = Vec::new();
    for element in dom::tagged_elements(&document) {
        let Some(tag) = dom::effect_tag(&element) else {
            continue;
        };
        match EffectKind::parse(&tag) {
            Ok(kind) => {
                let bindings = dom::texture_bindings(&element);
                all_bindings.extend(bindings.iter().cloned());
                pending.push((element, kind, bindings));
            }
            Err(err) => log::warn!("skipping element: {err}"),
        }
    }

    let mut cache = TextureCache::new();
    cache
        .load_all(&all_bindings, &document)
        .await
        .map_err(|err| JsValue::from_str(&err.to_string()))?;

    let mut renderer =
        Renderer::new(&canvas).map_err(|err| JsValue::from_str(&err.to_string()))?;
    renderer
        .upload(&cache)
        .map_err(|err| JsValue::from_str(&err.to_string()))?;
    renderer.set_size(canvas.width(), canvas.height());

    // Elements that are themselves media show their first texture and must
    // be ready before their rects are read; prime them all concurrently.
    let primes = pending
        .iter()
        .map(|(element, _, bindings)| loader::prime_element(element, bindings));
    let primed = futures::future::join_all(primes).await;

    let mut engine = Engine::new(canvas, dpr);
    for ((element, kind, bindings), primed) in pending.into_iter().zip(primed) {
        if let Err(err) = primed {
            log::warn!("skipping {} element: {err}", kind.as_str());
            continue;
        }
        let rect = dom::rect_of(&element);
        let opts = dom::opts(&element);
        match SceneObject::build(kind, rect, engine.core.canvas_rect(), bindings, &opts) {
            Ok(object) => {
                engine.register(element, object);
            }
            Err(err) => log::warn!("skipping {} element: {err}", kind.as_str()),
        }
    }
    log::info!("engine up with {} objects", engine.core.len());

    let app = Rc::new(RefCell::new(App { engine, renderer, cache }));

    // Loaded videos start paused; slide navigation starts them.
    {
        let app_ref = app.borrow();
        for index in 0..app_ref.engine.core.len() {
            app_ref.pause_object(index);
        }
    }

    wire_pointer(&window, &app)?;
    wire_resize(&window, &app)?;
    wire_nav_button(&document, PREV_SELECTOR, -1, &app)?;
    wire_nav_button(&document, NEXT_SELECTOR, 1, &app)?;
    run_frame_loop(&window, &app)?;
    Ok(())
}

/// Match the canvas drawing buffer to its CSS size at the given pixel ratio.
fn fit_drawing_buffer(canvas: &HtmlCanvasElement, dpr: f64) {
    let rect = canvas.get_bounding_client_rect();
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    {
        canvas.set_width((rect.width() * dpr) as u32);
        canvas.set_height((rect.height() * dpr) as u32);
    }
}

fn wire_pointer(window: &Window, app: &Rc<RefCell<App>>) -> Result<(), JsValue> {
    let app = Rc::clone(app);
    let closure = Closure::wrap(Box::new(move |event: MouseEvent| {
        app.borrow_mut()
            .engine
            .set_pointer_client(f64::from(event.client_x()), f64::from(event.client_y()));
    }) as Box<dyn FnMut(MouseEvent)>);
    window.add_event_listener_with_callback("pointermove", closure.as_ref().unchecked_ref())?;
    closure.forget();
    Ok(())
}

fn wire_resize(window: &Window, app: &Rc<RefCell<App>>) -> Result<(), JsValue> {
    let app = Rc::clone(app);
    debounce_resize(window, RESIZE_DEBOUNCE_MS, move || {
        app.borrow_mut().apply_resize();
    })
}

/// Trailing-edge debounce on window resize: each burst event replaces (and
/// thereby cancels) the pending timer, so `on_fire` runs once per burst.
pub fn debounce_resize(
    window: &Window,
    delay_ms: u32,
    on_fire: impl FnMut() + 'static,
) -> Result<(), JsValue> {
    let pending: Rc<RefCell<Option<Timeout>>> = Rc::new(RefCell::new(None));
    let on_fire = Rc::new(RefCell::new(on_fire));
    let closure = Closure::wrap(Box::new(move || {
        let fire = Rc::clone(&on_fire);
        let timer = Timeout::new(delay_ms, move || {
            (fire.borrow_mut())();
        });
        if let Some(previous) = pending.borrow_mut().replace(timer) {
            previous.cancel();
        }
    }) as Box<dyn FnMut()>);
    window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref())?;
    closure.forget();
    Ok(())
}

/// Wire one navigation button, if the page has it.
fn wire_nav_button(
    document: &Document,
    selector: &str,
    delta: i64,
    app: &Rc<RefCell<App>>,
) -> Result<(), JsValue> {
    let Some(button) = document.query_selector(selector)? else {
        return Ok(());
    };
    let app = Rc::clone(app);
    let closure = Closure::wrap(Box::new(move || {
        let mut app = app.borrow_mut();
        let target = app.engine.core.active_index() + delta;
        let actions = app.engine.go_to(target);
        app.apply_actions(&actions);
    }) as Box<dyn FnMut()>);
    button.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
    closure.forget();
    Ok(())
}

/// Self-rescheduling `requestAnimationFrame` loop. The closure slot holds
/// the callback so it can reach itself to schedule the next frame.
fn run_frame_loop(window: &Window, app: &Rc<RefCell<App>>) -> Result<(), JsValue> {
    let slot: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
    let starter = Rc::clone(&slot);

    let app = Rc::clone(app);
    let win = window.clone();
    *slot.borrow_mut() = Some(Closure::wrap(Box::new(move || {
        app.borrow_mut().frame();
        if let Some(callback) = starter.borrow().as_ref() {
            if let Err(err) = win.request_animation_frame(callback.as_ref().unchecked_ref()) {
                log::error!("frame scheduling failed: {err:?}");
            }
        }
    }) as Box<dyn FnMut()>));

    if let Some(callback) = slot.borrow().as_ref() {
        window.request_animation_frame(callback.as_ref().unchecked_ref())?;
    }
    Ok(())
}
