//! Effect kinds: the declarative tag selecting a shader/geometry recipe.
//!
//! Elements opt in with a `data-webgl` attribute whose value names the
//! effect. Dispatch happens through this enum rather than string comparison
//! chains; an unrecognized value is a configuration error reported to the
//! host, which skips that element without touching its siblings.

#[cfg(test)]
#[path = "effect_test.rs"]
mod effect_test;

use thiserror::Error;

/// Parsed `data-webgl` attribute value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EffectKind {
    /// Slides mapped onto planes around a cylinder, navigated by index.
    CylinderSlide,
    /// A single plane that tilts toward the pointer under a hover raycast.
    HoverTilt,
    /// A single plane whose progress uniform is scrubbed by scroll position.
    ScrollScrub,
}

impl EffectKind {
    /// Parse an effect tag, rejecting unknown values.
    pub fn parse(tag: &str) -> Result<Self, EngineError> {
        match tag {
            "cylinderSlide" => Ok(Self::CylinderSlide),
            "hoverTilt" => Ok(Self::HoverTilt),
            "scrollScrub" => Ok(Self::ScrollScrub),
            other => Err(EngineError::UnknownEffectKind(other.to_owned())),
        }
    }

    /// The tag string this kind parses from.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::CylinderSlide => "cylinderSlide",
            Self::HoverTilt => "hoverTilt",
            Self::ScrollScrub => "scrollScrub",
        }
    }

    /// Whether meshes of this kind participate in the hover raycast.
    #[must_use]
    pub fn supports_hover(self) -> bool {
        matches!(self, Self::HoverTilt)
    }

    /// Whether meshes of this kind carry a slide navigation machine.
    #[must_use]
    pub fn supports_slides(self) -> bool {
        matches!(self, Self::CylinderSlide)
    }
}

/// Errors raised while building scene objects from tagged elements.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EngineError {
    /// The element's `data-webgl` value names no known effect.
    #[error("unrecognized effect kind `{0}`")]
    UnknownEffectKind(String),
    /// The element declares no `data-tex*` attributes.
    #[error("effect `{0}` requires at least one texture")]
    MissingTextures(&'static str),
}
