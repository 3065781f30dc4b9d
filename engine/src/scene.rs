//! Scene objects and the ordered registry kept in lockstep with the DOM.
//!
//! One `SceneObject` exists per tagged element, created during async
//! initialization and mutated in place for the rest of the page's life. The
//! registry preserves DOM order; the object's index in it is its identity
//! everywhere else in the engine.

#[cfg(test)]
#[path = "scene_test.rs"]
mod scene_test;

use std::f64::consts::TAU;

use serde_json::Value;

use crate::coords::{Rect, WorldPoint, world_position};
use crate::effect::{EffectKind, EngineError};
use crate::hover::HoverState;
use crate::math::{Vec3, point_to_yaw};
use crate::slide::SlideState;
use crate::uniforms::{Opts, Uniforms};

/// Whether a texture is backed by a still image or a video element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Image,
    Video,
}

/// A loaded texture assigned to a named material input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextureBinding {
    /// Shader uniform name, e.g. `uTex1`.
    pub uniform: String,
    /// Source URL; the draw layer resolves it against the texture cache.
    pub url: String,
    pub media: MediaKind,
}

/// Mesh geometry sized from the companion element, with a compounding
/// resize scale.
///
/// Resize applies the new-to-old DOM dimension ratio multiplicatively onto
/// the existing scale rather than resetting it, matching how repeated
/// resizes accumulate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Geometry {
    pub base_width: f64,
    pub base_height: f64,
    pub scale_x: f64,
    pub scale_y: f64,
}

impl Geometry {
    /// Geometry sized from the element's rect at build time.
    #[must_use]
    pub fn from_rect(rect: Rect) -> Self {
        Self { base_width: rect.width, base_height: rect.height, scale_x: 1.0, scale_y: 1.0 }
    }

    /// Compound a resize ratio onto the existing scale.
    pub fn rescale(&mut self, width_ratio: f64, height_ratio: f64) {
        self.scale_x *= width_ratio;
        self.scale_y *= height_ratio;
    }

    /// Effective width after accumulated rescales.
    #[must_use]
    pub fn width(&self) -> f64 {
        self.base_width * self.scale_x
    }

    /// Effective height after accumulated rescales.
    #[must_use]
    pub fn height(&self) -> f64 {
        self.base_height * self.scale_y
    }
}

/// One slide plane on the cylinder circumference.
#[derive(Debug, Clone, PartialEq)]
pub struct SlidePlane {
    /// Resting yaw placing the plane on the circumference, facing outward.
    pub yaw: f64,
    /// Per-plane uniforms (`uSlideIdx` and friends).
    pub uniforms: Uniforms,
    pub texture: TextureBinding,
}

/// A mesh/material/element tuple registered with the engine.
///
/// The companion element itself stays with the host; the engine sees only
/// its rect, re-read every frame. `cached_rect` is the layout last accounted
/// for by a build or resize — per-frame repositioning deliberately does not
/// refresh it, so the next resize still sees the pre-resize dimensions when
/// computing its scale ratio.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneObject {
    pub kind: EffectKind,
    pub geometry: Geometry,
    /// Material inputs shared by the whole object.
    pub uniforms: Uniforms,
    /// Textures assigned to the object's own material (non-slide kinds).
    pub textures: Vec<TextureBinding>,
    /// Slide planes; empty for kinds without slides.
    pub planes: Vec<SlidePlane>,
    /// Navigation machine for slide-capable kinds.
    pub slide: Option<SlideState>,
    pub hover: HoverState,
    pub position: WorldPoint,
    pub cached_rect: Rect,
    /// Base cylinder radius before resize scaling.
    radius: f64,
    /// Maximum hover tilt in radians.
    pub tilt_scale: f64,
}

impl SceneObject {
    /// Build a scene object for one tagged element.
    ///
    /// Step order is load-bearing: geometry is sized from the element's
    /// current rect and textures are assigned before the mesh is positioned.
    /// Fails if the element declares no textures; the caller logs and skips.
    pub fn build(
        kind: EffectKind,
        rect: Rect,
        canvas: Rect,
        textures: Vec<TextureBinding>,
        opts: &Value,
    ) -> Result<Self, EngineError> {
        if textures.is_empty() {
            return Err(EngineError::MissingTextures(kind.as_str()));
        }
        let opts = Opts::new(opts);
        let geometry = Geometry::from_rect(rect);
        let radius = opts.radius(rect.width);

        let mut uniforms = Uniforms::new();
        uniforms.set_float("uTick", 0.0);
        uniforms.set_float("uProgress", 0.0);

        let mut planes = Vec::new();
        let mut slide = None;
        let mut object_textures = Vec::new();

        if kind.supports_slides() {
            uniforms.set_float("uRadius", radius);
            uniforms.set_float("uActiveSlideIdx", 0.0);
            #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
            uniforms.set_int("uSlideTotal", textures.len() as i32);
            planes = build_planes(textures, opts.segments());
            slide = Some(SlideState::new(planes.len()));
        } else {
            object_textures = textures;
            if kind.supports_hover() {
                uniforms.set_float("uHover", 0.0);
                uniforms.set_float("uHoverU", 0.5);
                uniforms.set_float("uHoverV", 0.5);
            }
        }

        Ok(Self {
            kind,
            geometry,
            uniforms,
            textures: object_textures,
            planes,
            slide,
            hover: HoverState::default(),
            position: world_position(rect, canvas),
            cached_rect: rect,
            radius,
            tilt_scale: opts.tilt_scale(),
        })
    }

    /// Cylinder radius after accumulated resize scaling.
    #[must_use]
    pub fn radius(&self) -> f64 {
        self.radius * self.geometry.scale_x
    }

    /// Depth of the mesh group. The cylinder sits back by its radius so its
    /// front plane lands on the pixel-aligned depth; flat kinds live on it
    /// directly.
    #[must_use]
    pub fn group_z(&self) -> f64 {
        if self.kind.supports_slides() { -self.radius() } else { 0.0 }
    }

    /// Lock the mesh back onto its element's current layout. Runs every
    /// frame; leaves `cached_rect` alone so resize ratios stay correct.
    pub fn reposition(&mut self, dom: Rect, canvas: Rect) {
        self.position = world_position(dom, canvas);
    }

    /// Apply a layout change: reposition, compound the geometry scale by the
    /// new-to-old dimension ratio, and remember the new layout.
    ///
    /// Degenerate cached dimensions contribute a ratio of 1 so a zero-size
    /// initial layout cannot poison the scale.
    pub fn resize(&mut self, new_dom: Rect, new_canvas: Rect) {
        let width_ratio = ratio(new_dom.width, self.cached_rect.width);
        let height_ratio = ratio(new_dom.height, self.cached_rect.height);
        self.geometry.rescale(width_ratio, height_ratio);
        self.reposition(new_dom, new_canvas);
        self.cached_rect = new_dom;
    }
}

fn ratio(new: f64, old: f64) -> f64 {
    if old > 0.0 && new > 0.0 { new / old } else { 1.0 }
}

/// Place one plane per texture on the cylinder circumference.
///
/// Planes land on every `⌊segments/total⌋`-th circumference vertex and face
/// its outward normal, so spacing matches the discretized cylinder rather
/// than an ideal circle.
fn build_planes(textures: Vec<TextureBinding>, segments: usize) -> Vec<SlidePlane> {
    let segments = segments.max(1);
    let total = textures.len();
    let step = if total == 0 { 0 } else { segments / total };
    textures
        .into_iter()
        .enumerate()
        .map(|(idx, texture)| {
            #[allow(clippy::cast_precision_loss)]
            let angle = TAU * (idx * step) as f64 / segments as f64;
            let normal = Vec3::new(angle.sin(), 0.0, angle.cos());
            let yaw = point_to_yaw(Vec3::new(0.0, 0.0, 1.0), normal);
            let mut uniforms = Uniforms::new();
            #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
            uniforms.set_int("uSlideIdx", idx as i32);
            SlidePlane { yaw, uniforms, texture }
        })
        .collect()
}
