//! Top-level engine: the browser-free [`EngineCore`] and the [`Engine`]
//! wrapper that binds it to the canvas and its companion DOM elements.
//!
//! `EngineCore` is an explicit context object constructed once at startup
//! and threaded through every operation — there is no module-global state,
//! and independent instances coexist freely (which is also what makes it
//! testable on the host). Side effects the core cannot perform itself, like
//! starting a video or swapping the cursor, come back to the host as
//! [`Action`]s.

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

use web_sys::{Element, HtmlCanvasElement};

use crate::coords::{Ndc, Rect};
use crate::effect::EffectKind;
use crate::hover::{PickPlane, raycast};
use crate::scene::{MediaKind, SceneObject};
use crate::scrub;
use crate::viewport::Viewport;

/// Side effects requested from the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Pause whatever media this object is playing. Safe when nothing is.
    PauseMedia { object: usize },
    /// Start playback of this object's slide; only emitted for video-backed
    /// slides, once the rotation has visually settled on them.
    PlayMedia { object: usize, slide: usize },
    /// Swap the CSS cursor over the canvas.
    SetCursor(&'static str),
}

/// Core engine state — all logic that doesn't depend on the DOM.
///
/// Separated from [`Engine`] so it can be tested without a browser.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineCore {
    viewport: Viewport,
    canvas_rect: Rect,
    objects: Vec<SceneObject>,
    pointer: Option<Ndc>,
    hovered: Option<usize>,
    projection_dirty: bool,
}

impl EngineCore {
    /// A core for the given canvas layout. The viewport derives from it.
    #[must_use]
    pub fn new(canvas_rect: Rect, device_pixel_ratio: f64) -> Self {
        Self {
            viewport: Viewport::from_canvas_rect(canvas_rect, device_pixel_ratio),
            canvas_rect,
            objects: Vec::new(),
            pointer: None,
            hovered: None,
            projection_dirty: false,
        }
    }

    // --- Registry ---

    /// Append a built object; its registry index is its identity.
    pub fn register(&mut self, object: SceneObject) -> usize {
        self.objects.push(object);
        self.objects.len() - 1
    }

    #[must_use]
    pub fn objects(&self) -> &[SceneObject] {
        &self.objects
    }

    #[must_use]
    pub fn object(&self, index: usize) -> Option<&SceneObject> {
        self.objects.get(index)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    // --- Queries ---

    #[must_use]
    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    #[must_use]
    pub fn canvas_rect(&self) -> Rect {
        self.canvas_rect
    }

    /// Registry index of the object hovered this frame, if any. At most one
    /// object is hovered at any instant.
    #[must_use]
    pub fn hovered(&self) -> Option<usize> {
        self.hovered
    }

    /// Whether the camera projection changed since the host last asked.
    /// Reading clears the flag.
    pub fn take_projection_dirty(&mut self) -> bool {
        std::mem::take(&mut self.projection_dirty)
    }

    // --- Input ---

    /// Record the pointer position for the next tick's raycast.
    pub fn set_pointer(&mut self, ndc: Ndc) {
        self.pointer = Some(ndc);
    }

    /// Navigation command: rotate every slide-capable object so slide
    /// `target` faces front. Unbounded and possibly negative; wraps by
    /// floored modulo for playback lookup.
    ///
    /// Current media pauses immediately; playback of the new slide is
    /// requested later, by the tick on which the rotation visually settles.
    pub fn go_to(&mut self, target: i64) -> Vec<Action> {
        let mut actions = Vec::new();
        for (index, object) in self.objects.iter_mut().enumerate() {
            if let Some(slide) = object.slide.as_mut() {
                slide.go_to(target);
                actions.push(Action::PauseMedia { object: index });
            }
        }
        actions
    }

    /// The logical active index of the first slide-capable object, for
    /// host-side prev/next controls.
    #[must_use]
    pub fn active_index(&self) -> i64 {
        self.objects
            .iter()
            .find_map(|o| o.slide.as_ref())
            .map_or(0, crate::slide::SlideState::active_index)
    }

    // --- Per-frame work ---

    /// Advance one frame. `rects` carries each registered element's current
    /// bounding rect, in registry order.
    ///
    /// Repositions every mesh from live layout (correcting scroll drift),
    /// advances frame-tick uniforms, steps the interaction machines, and
    /// reports the side effects the host must perform before drawing.
    pub fn tick(&mut self, rects: &[Rect]) -> Vec<Action> {
        let mut actions = Vec::new();
        let canvas = self.canvas_rect;

        for (index, (object, dom)) in self.objects.iter_mut().zip(rects).enumerate() {
            object.reposition(*dom, canvas);
            object.uniforms.add("uTick", 1.0);

            match object.kind {
                EffectKind::CylinderSlide => {
                    if let Some(slide) = object.slide.as_mut() {
                        let step = slide.step();
                        object.uniforms.set_float("uActiveSlideIdx", slide.visual_index());
                        if let Some(settled) = step.play
                            && object.planes.get(settled).is_some_and(|p| p.texture.media == MediaKind::Video)
                        {
                            actions.push(Action::PlayMedia { object: index, slide: settled });
                        }
                    }
                }
                EffectKind::ScrollScrub => {
                    object.uniforms.set_float("uProgress", scrub::progress(*dom, canvas));
                }
                EffectKind::HoverTilt => {}
            }
        }

        self.run_hover_pass(&mut actions);
        actions
    }

    /// Raycast the stored pointer and update hover state on every object:
    /// the nearest hit aims toward the pointer, everything else relaxes.
    fn run_hover_pass(&mut self, actions: &mut Vec<Action>) {
        let hit = self.pointer.and_then(|ndc| {
            let planes: Vec<PickPlane> = self
                .objects
                .iter()
                .enumerate()
                .filter(|(_, o)| o.kind.supports_hover())
                .map(|(index, o)| PickPlane {
                    object: index,
                    center_x: o.position.x,
                    center_y: o.position.y,
                    center_z: o.group_z(),
                    width: o.geometry.width(),
                    height: o.geometry.height(),
                })
                .collect();
            raycast(ndc, &self.viewport, &planes)
        });

        let hovered = hit.map(|h| h.object);
        for (index, object) in self.objects.iter_mut().enumerate() {
            if !object.kind.supports_hover() {
                continue;
            }
            if let Some(h) = hit.filter(|h| h.object == index) {
                let scale = object.tilt_scale;
                object.hover.aim(h.uv, scale);
                object.uniforms.set_float("uHover", 1.0);
                object.uniforms.set_float("uHoverU", h.uv.0);
                object.uniforms.set_float("uHoverV", h.uv.1);
            } else {
                object.hover.relax();
                object.uniforms.set_float("uHover", 0.0);
            }
        }

        if hovered != self.hovered {
            actions.push(Action::SetCursor(if hovered.is_some() { "pointer" } else { "auto" }));
            self.hovered = hovered;
        }
    }

    /// Apply a debounced layout change: new canvas rect and renderer size,
    /// per-object reposition and rescale, fresh frustum parameters, and a
    /// dirty projection for the host to reapply before the next draw.
    pub fn resize(&mut self, canvas_rect: Rect, rects: &[Rect], device_pixel_ratio: f64) {
        self.canvas_rect = canvas_rect;
        self.viewport = Viewport::from_canvas_rect(canvas_rect, device_pixel_ratio);
        for (object, dom) in self.objects.iter_mut().zip(rects) {
            object.resize(*dom, canvas_rect);
        }
        self.projection_dirty = true;
    }
}

/// The full engine. Wraps [`EngineCore`] and owns the browser canvas plus
/// the companion element for every registered object, reading their live
/// rects each frame.
pub struct Engine {
    canvas: HtmlCanvasElement,
    elements: Vec<Element>,
    pub core: EngineCore,
}

impl Engine {
    /// An engine bound to the given canvas element.
    #[must_use]
    pub fn new(canvas: HtmlCanvasElement, device_pixel_ratio: f64) -> Self {
        let rect = rect_of(&canvas);
        Self { canvas, elements: Vec::new(), core: EngineCore::new(rect, device_pixel_ratio) }
    }

    /// Register a built object together with its companion element.
    pub fn register(&mut self, element: Element, object: SceneObject) -> usize {
        self.elements.push(element);
        self.core.register(object)
    }

    /// Advance one frame using the elements' live bounding rects.
    pub fn tick(&mut self) -> Vec<Action> {
        let rects: Vec<Rect> = self.elements.iter().map(rect_of).collect();
        self.core.tick(&rects)
    }

    /// Re-read every rect and apply the layout change to the core.
    pub fn resize(&mut self, device_pixel_ratio: f64) {
        let canvas_rect = rect_of(&self.canvas);
        let rects: Vec<Rect> = self.elements.iter().map(rect_of).collect();
        self.core.resize(canvas_rect, &rects, device_pixel_ratio);
    }

    pub fn go_to(&mut self, target: i64) -> Vec<Action> {
        self.core.go_to(target)
    }

    /// Record a pointer position in client coordinates.
    pub fn set_pointer_client(&mut self, client_x: f64, client_y: f64) {
        let ndc = Ndc::from_client(client_x, client_y, self.core.canvas_rect());
        self.core.set_pointer(ndc);
    }

    #[must_use]
    pub fn canvas(&self) -> &HtmlCanvasElement {
        &self.canvas
    }
}

/// Live bounding rect of an element, in CSS pixels.
fn rect_of<E: AsRef<Element>>(element: &E) -> Rect {
    let rect = element.as_ref().get_bounding_client_rect();
    Rect::new(rect.left(), rect.top(), rect.width(), rect.height())
}
