//! Material uniform store and the per-element options bag.
//!
//! A material owns a mapping of uniform name to scalar value; texture
//! bindings stay in the draw layer, which looks textures up by the same
//! names. `Opts` wraps the optional `data-opts` JSON bag on a tagged element
//! with defaulted typed reads, so absent or malformed keys never fail a
//! build.

#[cfg(test)]
#[path = "uniforms_test.rs"]
mod uniforms_test;

use std::collections::BTreeMap;

use serde_json::Value;

use crate::consts::{CYLINDER_SEGMENTS, TILT_SCALE};

/// A scalar value fed into a named shader uniform slot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UniformValue {
    Float(f64),
    Int(i32),
}

impl UniformValue {
    /// Numeric view of the value regardless of variant.
    #[must_use]
    pub fn as_f64(self) -> f64 {
        match self {
            Self::Float(v) => v,
            Self::Int(v) => f64::from(v),
        }
    }
}

/// Named scalar uniforms owned by one material.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Uniforms {
    values: BTreeMap<String, UniformValue>,
}

impl Uniforms {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a uniform value.
    pub fn set(&mut self, name: &str, value: UniformValue) {
        self.values.insert(name.to_owned(), value);
    }

    pub fn set_float(&mut self, name: &str, value: f64) {
        self.set(name, UniformValue::Float(value));
    }

    pub fn set_int(&mut self, name: &str, value: i32) {
        self.set(name, UniformValue::Int(value));
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<UniformValue> {
        self.values.get(name).copied()
    }

    /// Numeric read with a `0.0` default for absent names.
    #[must_use]
    pub fn float(&self, name: &str) -> f64 {
        self.get(name).map_or(0.0, UniformValue::as_f64)
    }

    /// Add `delta` to a numeric uniform, treating absent names as `0.0`.
    pub fn add(&mut self, name: &str, delta: f64) {
        let next = self.float(name) + delta;
        self.set_float(name, next);
    }

    /// Iterate uniforms in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, UniformValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), *v))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Derive the shader uniform key for a `data-tex*` attribute name.
///
/// `"tex1"` becomes `"uTex1"`. Attribute names outside the texture family
/// yield `None` and are ignored by the loader.
#[must_use]
pub fn uniform_key(data_key: &str) -> Option<String> {
    let suffix = data_key.strip_prefix("tex")?;
    Some(format!("uTex{suffix}"))
}

/// Typed access to an element's `data-opts` JSON bag.
pub struct Opts<'a> {
    value: &'a Value,
}

impl<'a> Opts<'a> {
    /// Wrap a reference to a parsed `data-opts` value.
    #[must_use]
    pub fn new(value: &'a Value) -> Self {
        Self { value }
    }

    /// Cylinder radius override in CSS pixels. Defaults to the element width.
    #[must_use]
    pub fn radius(&self, default: f64) -> f64 {
        self.value
            .get("radius")
            .and_then(Value::as_f64)
            .unwrap_or(default)
    }

    /// Maximum hover tilt in radians. Defaults to [`TILT_SCALE`].
    #[must_use]
    pub fn tilt_scale(&self) -> f64 {
        self.value
            .get("tilt_scale")
            .and_then(Value::as_f64)
            .unwrap_or(TILT_SCALE)
    }

    /// Cylinder circumference segments. Defaults to [`CYLINDER_SEGMENTS`].
    #[must_use]
    pub fn segments(&self) -> usize {
        self.value
            .get("segments")
            .and_then(Value::as_u64)
            .map_or(CYLINDER_SEGMENTS, |v| usize::try_from(v).unwrap_or(CYLINDER_SEGMENTS))
    }
}
