use super::*;

#[test]
fn parse_known_tags() {
    assert_eq!(EffectKind::parse("cylinderSlide"), Ok(EffectKind::CylinderSlide));
    assert_eq!(EffectKind::parse("hoverTilt"), Ok(EffectKind::HoverTilt));
    assert_eq!(EffectKind::parse("scrollScrub"), Ok(EffectKind::ScrollScrub));
}

#[test]
fn parse_unknown_tag_is_a_configuration_error() {
    let err = EffectKind::parse("lavaLamp");
    assert_eq!(err, Err(EngineError::UnknownEffectKind("lavaLamp".to_owned())));
}

#[test]
fn parse_is_case_sensitive() {
    assert!(EffectKind::parse("CylinderSlide").is_err());
}

#[test]
fn as_str_round_trips() {
    for kind in [EffectKind::CylinderSlide, EffectKind::HoverTilt, EffectKind::ScrollScrub] {
        assert_eq!(EffectKind::parse(kind.as_str()), Ok(kind));
    }
}

#[test]
fn only_cylinder_supports_slides() {
    assert!(EffectKind::CylinderSlide.supports_slides());
    assert!(!EffectKind::HoverTilt.supports_slides());
    assert!(!EffectKind::ScrollScrub.supports_slides());
}

#[test]
fn only_hover_tilt_supports_hover() {
    assert!(EffectKind::HoverTilt.supports_hover());
    assert!(!EffectKind::CylinderSlide.supports_hover());
    assert!(!EffectKind::ScrollScrub.supports_hover());
}

#[test]
fn error_messages_name_the_offender() {
    let msg = EngineError::UnknownEffectKind("blobs".to_owned()).to_string();
    assert!(msg.contains("blobs"));
    let msg = EngineError::MissingTextures("hoverTilt").to_string();
    assert!(msg.contains("hoverTilt"));
}
