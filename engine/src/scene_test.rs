#![allow(clippy::float_cmp)]

use std::f64::consts::PI;

use super::*;

const EPSILON: f64 = 1e-9;

fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < EPSILON
}

fn canvas() -> Rect {
    Rect::new(0.0, 0.0, 1000.0, 800.0)
}

fn tex(n: usize, media: MediaKind) -> TextureBinding {
    TextureBinding {
        uniform: format!("uTex{n}"),
        url: format!("/assets/slide-{n}.jpg"),
        media,
    }
}

fn image_textures(count: usize) -> Vec<TextureBinding> {
    (1..=count).map(|n| tex(n, MediaKind::Image)).collect()
}

fn build(kind: EffectKind, rect: Rect, textures: Vec<TextureBinding>) -> SceneObject {
    SceneObject::build(kind, rect, canvas(), textures, &serde_json::json!({})).unwrap()
}

// --- Geometry ---

#[test]
fn geometry_starts_at_unit_scale() {
    let g = Geometry::from_rect(Rect::new(0.0, 0.0, 320.0, 240.0));
    assert_eq!(g.width(), 320.0);
    assert_eq!(g.height(), 240.0);
}

#[test]
fn rescale_compounds_multiplicatively() {
    let mut g = Geometry::from_rect(Rect::new(0.0, 0.0, 100.0, 100.0));
    g.rescale(2.0, 0.5);
    g.rescale(2.0, 0.5);
    assert!(approx_eq(g.width(), 400.0));
    assert!(approx_eq(g.height(), 25.0));
}

// --- build ---

#[test]
fn build_requires_textures() {
    let err = SceneObject::build(
        EffectKind::HoverTilt,
        Rect::new(0.0, 0.0, 100.0, 100.0),
        canvas(),
        Vec::new(),
        &serde_json::json!({}),
    );
    assert_eq!(err, Err(crate::effect::EngineError::MissingTextures("hoverTilt")));
}

#[test]
fn build_positions_mesh_at_its_element() {
    let rect = Rect::new(100.0, 200.0, 300.0, 150.0);
    let obj = build(EffectKind::ScrollScrub, rect, image_textures(1));
    assert_eq!(obj.position, world_position(rect, canvas()));
    assert_eq!(obj.cached_rect, rect);
}

#[test]
fn cylinder_build_makes_one_plane_per_texture() {
    let obj = build(EffectKind::CylinderSlide, Rect::new(0.0, 0.0, 400.0, 300.0), image_textures(5));
    assert_eq!(obj.planes.len(), 5);
    assert!(obj.textures.is_empty());
    let slide = obj.slide.as_ref().unwrap();
    assert_eq!(slide.total(), 5);
}

#[test]
fn cylinder_planes_carry_their_index() {
    let obj = build(EffectKind::CylinderSlide, Rect::new(0.0, 0.0, 400.0, 300.0), image_textures(3));
    for (i, plane) in obj.planes.iter().enumerate() {
        #[allow(clippy::cast_precision_loss)]
        let expected = i as f64;
        assert_eq!(plane.uniforms.float("uSlideIdx"), expected);
    }
}

#[test]
fn cylinder_planes_spread_around_the_circumference() {
    let obj = build(EffectKind::CylinderSlide, Rect::new(0.0, 0.0, 400.0, 300.0), image_textures(5));
    // 100 segments / 5 slides = every 20th vertex: 0.2 of a turn apart.
    assert!(approx_eq(obj.planes[0].yaw, 0.0));
    assert!(approx_eq(obj.planes[1].yaw, 0.4 * PI));
    assert!(approx_eq(obj.planes[2].yaw, 0.8 * PI));
    // Past the half turn the signed yaw flips negative.
    assert!(approx_eq(obj.planes[3].yaw, -0.8 * PI));
    assert!(approx_eq(obj.planes[4].yaw, -0.4 * PI));
}

#[test]
fn cylinder_radius_defaults_to_element_width() {
    let obj = build(EffectKind::CylinderSlide, Rect::new(0.0, 0.0, 400.0, 300.0), image_textures(5));
    assert_eq!(obj.radius(), 400.0);
    assert_eq!(obj.group_z(), -400.0);
    assert_eq!(obj.uniforms.float("uRadius"), 400.0);
    assert_eq!(obj.uniforms.float("uSlideTotal"), 5.0);
}

#[test]
fn cylinder_radius_honors_opts_override() {
    let obj = SceneObject::build(
        EffectKind::CylinderSlide,
        Rect::new(0.0, 0.0, 400.0, 300.0),
        canvas(),
        image_textures(5),
        &serde_json::json!({ "radius": 250.0 }),
    )
    .unwrap();
    assert_eq!(obj.radius(), 250.0);
}

#[test]
fn flat_kinds_keep_textures_on_the_object() {
    let obj = build(EffectKind::HoverTilt, Rect::new(0.0, 0.0, 200.0, 200.0), image_textures(2));
    assert_eq!(obj.textures.len(), 2);
    assert!(obj.planes.is_empty());
    assert!(obj.slide.is_none());
    assert_eq!(obj.group_z(), 0.0);
    assert_eq!(obj.uniforms.float("uHover"), 0.0);
}

// --- reposition / resize ---

#[test]
fn reposition_moves_mesh_but_keeps_cached_rect() {
    let rect = Rect::new(100.0, 200.0, 300.0, 150.0);
    let mut obj = build(EffectKind::ScrollScrub, rect, image_textures(1));
    let scrolled = Rect::new(100.0, 120.0, 300.0, 150.0);
    obj.reposition(scrolled, canvas());
    assert_eq!(obj.position, world_position(scrolled, canvas()));
    assert_eq!(obj.cached_rect, rect, "per-frame reposition must not refresh the cached rect");
}

#[test]
fn resize_scales_by_dimension_ratio() {
    let rect = Rect::new(0.0, 0.0, 200.0, 100.0);
    let mut obj = build(EffectKind::ScrollScrub, rect, image_textures(1));
    let grown = Rect::new(0.0, 0.0, 400.0, 150.0);
    obj.resize(grown, canvas());
    assert!(approx_eq(obj.geometry.width(), 400.0));
    assert!(approx_eq(obj.geometry.height(), 150.0));
    assert_eq!(obj.cached_rect, grown);
}

#[test]
fn repeated_identical_resize_is_idempotent() {
    let rect = Rect::new(0.0, 0.0, 200.0, 100.0);
    let mut obj = build(EffectKind::ScrollScrub, rect, image_textures(1));
    let grown = Rect::new(0.0, 0.0, 400.0, 150.0);
    obj.resize(grown, canvas());
    let after_once = obj.clone();
    obj.resize(grown, canvas());
    assert_eq!(obj, after_once);
}

#[test]
fn resize_scales_cylinder_radius() {
    let rect = Rect::new(0.0, 0.0, 400.0, 300.0);
    let mut obj = build(EffectKind::CylinderSlide, rect, image_textures(5));
    obj.resize(Rect::new(0.0, 0.0, 200.0, 300.0), canvas());
    assert!(approx_eq(obj.radius(), 200.0));
    assert!(approx_eq(obj.group_z(), -200.0));
}

#[test]
fn degenerate_cached_rect_cannot_poison_the_scale() {
    let mut obj = build(EffectKind::ScrollScrub, Rect::new(0.0, 0.0, 0.0, 0.0), image_textures(1));
    obj.resize(Rect::new(0.0, 0.0, 300.0, 200.0), canvas());
    assert_eq!(obj.geometry.scale_x, 1.0);
    assert_eq!(obj.geometry.scale_y, 1.0);
    assert_eq!(obj.cached_rect, Rect::new(0.0, 0.0, 300.0, 200.0));
}
