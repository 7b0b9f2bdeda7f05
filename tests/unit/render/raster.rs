use super::*;

const SQUARE: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" width="20" height="10">
<rect x="0" y="0" width="20" height="10" fill="#ffffff"/>
<rect x="0" y="0" width="10" height="10" fill="#ff0000"/>
</svg>"##;

fn offline() -> ResvgRasterizer {
    ResvgRasterizer::with_fontdb(Arc::new(usvg::fontdb::Database::new()))
}

#[test]
fn resvg_uses_declared_size_and_straight_alpha() {
    let img = offline().rasterize(SQUARE.as_bytes()).unwrap();
    assert_eq!(img.dimensions(), (20, 10));
    assert_eq!(img.get_pixel(2, 5).0, [255, 0, 0, 255]);
    assert_eq!(img.get_pixel(17, 5).0, [255, 255, 255, 255]);
}

#[test]
fn transparent_background_stays_transparent() {
    let svg = r#"<svg xmlns="http://www.w3.org/2000/svg" width="4" height="4"></svg>"#;
    let img = offline().rasterize(svg.as_bytes()).unwrap();
    assert!(img.pixels().all(|p| p.0[3] == 0));
}

#[test]
fn invalid_svg_is_a_render_error() {
    let err = offline().rasterize(b"not an svg").unwrap_err();
    assert!(matches!(err, GifhubError::Render(_)));
}

#[test]
fn oversized_svg_is_rejected() {
    let svg = r#"<svg xmlns="http://www.w3.org/2000/svg" width="20000" height="4"></svg>"#;
    let err = offline().rasterize(svg.as_bytes()).unwrap_err();
    assert!(err.to_string().contains("too large"));
}

#[test]
fn missing_rsvg_program_is_a_render_error_and_records_artifacts() {
    let log = Arc::new(ArtifactLog::new());
    let r = RsvgConvertRasterizer::with_program(
        "gifhub-test-definitely-not-installed",
        Arc::clone(&log),
    )
    .unwrap();

    let err = r.rasterize(SQUARE.as_bytes()).unwrap_err();
    assert!(matches!(err, GifhubError::Render(ref m) if m.contains("failed to spawn")));
    // Scratch dir plus the SVG written before the spawn attempt.
    assert_eq!(log.len(), 2);
    assert_eq!(log.remove_all(), 2);
}
