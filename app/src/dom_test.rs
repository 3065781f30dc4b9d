use super::*;

fn attr(name: &str, value: &str) -> (String, String) {
    (name.to_owned(), value.to_owned())
}

#[test]
fn bindings_follow_numeric_suffix_order() {
    let attrs = [
        attr("data-tex10", "/j.jpg"),
        attr("data-tex2", "/b.jpg"),
        attr("data-tex1", "/a.jpg"),
    ];
    let bindings = bindings_from_attrs(&attrs);
    let uniforms: Vec<&str> = bindings.iter().map(|b| b.uniform.as_str()).collect();
    assert_eq!(uniforms, ["uTex1", "uTex2", "uTex10"]);
    assert_eq!(bindings[0].url, "/a.jpg");
}

#[test]
fn non_texture_attributes_are_ignored() {
    let attrs = [
        attr("data-webgl", "hoverTilt"),
        attr("data-opts", "{}"),
        attr("class", "hero"),
        attr("data-texture", "/nope.jpg"),
        attr("data-tex", "/no-index.jpg"),
        attr("data-texab", "/not-numeric.jpg"),
        attr("data-tex1", "/yes.jpg"),
    ];
    let bindings = bindings_from_attrs(&attrs);
    assert_eq!(bindings.len(), 1);
    assert_eq!(bindings[0].uniform, "uTex1");
}

#[test]
fn video_extensions_classify_as_video() {
    assert_eq!(media_kind_for("/clips/loop.mp4"), MediaKind::Video);
    assert_eq!(media_kind_for("/clips/loop.WebM"), MediaKind::Video);
    assert_eq!(media_kind_for("/clips/loop.mp4?v=3"), MediaKind::Video);
    assert_eq!(media_kind_for("/stills/hero.jpg"), MediaKind::Image);
    assert_eq!(media_kind_for("/stills/hero.png#frag"), MediaKind::Image);
    assert_eq!(media_kind_for("no-extension"), MediaKind::Image);
}

#[test]
fn mixed_media_bindings_keep_their_kinds() {
    let attrs = [attr("data-tex1", "/a.jpg"), attr("data-tex2", "/b.mp4")];
    let bindings = bindings_from_attrs(&attrs);
    assert_eq!(bindings[0].media, MediaKind::Image);
    assert_eq!(bindings[1].media, MediaKind::Video);
}

#[test]
fn opts_parse_accepts_objects_and_rejects_garbage() {
    assert_eq!(parse_opts("{\"radius\": 300}").unwrap()["radius"], 300);
    assert!(parse_opts("radius: 300").is_err());
}
