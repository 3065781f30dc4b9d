//! Discovery and parsing of `data-webgl` tagged elements.
//!
//! An element opts into the engine with `data-webgl="<effect>"`, names its
//! media with `data-tex1`, `data-tex2`, ... attributes, and may carry a
//! `data-opts` JSON bag for per-effect tuning. Everything here reads
//! attributes only; rect reads and registration happen in [`crate::run`].

#[cfg(test)]
#[path = "dom_test.rs"]
mod dom_test;

use engine::coords::Rect;
use engine::scene::{MediaKind, TextureBinding};
use engine::uniforms::uniform_key;
use serde_json::Value;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element};

/// Attribute that opts an element into the engine and names its effect.
pub const EFFECT_ATTR: &str = "data-webgl";

/// Optional attribute carrying a JSON bag of per-effect options.
pub const OPTS_ATTR: &str = "data-opts";

/// All tagged elements in document order.
#[must_use]
pub fn tagged_elements(document: &Document) -> Vec<Element> {
    let mut elements = Vec::new();
    if let Ok(list) = document.query_selector_all("[data-webgl]") {
        for i in 0..list.length() {
            if let Some(element) = list.get(i).and_then(|n| n.dyn_into::<Element>().ok()) {
                elements.push(element);
            }
        }
    }
    elements
}

/// The element's effect tag, e.g. `"cylinderSlide"`.
#[must_use]
pub fn effect_tag(element: &Element) -> Option<String> {
    element.get_attribute(EFFECT_ATTR)
}

/// The element's parsed `data-opts` bag. Absent or malformed JSON degrades
/// to an empty bag with a console warning rather than skipping the element.
#[must_use]
pub fn opts(element: &Element) -> Value {
    match element.get_attribute(OPTS_ATTR) {
        None => Value::Null,
        Some(raw) => parse_opts(&raw).unwrap_or_else(|err| {
            log::warn!("ignoring malformed {OPTS_ATTR}: {err}");
            Value::Null
        }),
    }
}

/// Texture bindings declared on the element, in `tex<N>` numeric order.
#[must_use]
pub fn texture_bindings(element: &Element) -> Vec<TextureBinding> {
    let names = element.get_attribute_names();
    let mut attrs = Vec::new();
    for name in names.iter() {
        if let Some(name) = name.as_string() {
            if let Some(value) = element.get_attribute(&name) {
                attrs.push((name, value));
            }
        }
    }
    bindings_from_attrs(&attrs)
}

fn parse_opts(raw: &str) -> Result<Value, serde_json::Error> {
    serde_json::from_str(raw)
}

/// Build ordered texture bindings from raw attribute pairs.
///
/// Only `data-tex<N>` attributes with a numeric suffix participate; they
/// sort by `N` so `data-tex10` lands after `data-tex2` regardless of the
/// attribute order the browser reports.
fn bindings_from_attrs(attrs: &[(String, String)]) -> Vec<TextureBinding> {
    let mut indexed: Vec<(u32, TextureBinding)> = attrs
        .iter()
        .filter_map(|(name, url)| {
            let data_key = name.strip_prefix("data-")?;
            let index: u32 = data_key.strip_prefix("tex")?.parse().ok()?;
            let uniform = uniform_key(data_key)?;
            Some((index, TextureBinding { uniform, url: url.clone(), media: media_kind_for(url) }))
        })
        .collect();
    indexed.sort_by_key(|(index, _)| *index);
    indexed.into_iter().map(|(_, binding)| binding).collect()
}

/// Classify a texture URL by file extension. Unrecognized extensions are
/// treated as still images.
fn media_kind_for(url: &str) -> MediaKind {
    let path = url.split(['?', '#']).next().unwrap_or(url);
    let extension = path.rsplit('.').next().unwrap_or_default().to_ascii_lowercase();
    match extension.as_str() {
        "mp4" | "webm" | "mov" | "m4v" | "ogv" => MediaKind::Video,
        _ => MediaKind::Image,
    }
}

/// Live bounding rect of an element, in CSS pixels.
#[must_use]
pub fn rect_of(element: &Element) -> Rect {
    let rect = element.get_bounding_client_rect();
    Rect::new(rect.left(), rect.top(), rect.width(), rect.height())
}
