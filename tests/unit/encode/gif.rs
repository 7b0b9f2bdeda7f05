use super::*;

fn solid(w: u32, h: u32, rgb: [u8; 3]) -> RgbaImage {
    RgbaImage::from_pixel(w, h, image::Rgba([rgb[0], rgb[1], rgb[2], 255]))
}

#[test]
fn single_frame_round_trip_keeps_count_and_timing() {
    let opts = BundleOpts {
        frame_duration: Duration::from_millis(250),
        scale: 1.0,
    };
    let bytes = GifBundler::default()
        .bundle(&[solid(16, 12, [200, 40, 40])], &opts)
        .unwrap();

    let info = probe_gif(&bytes).unwrap();
    assert_eq!(info.frame_count(), 1);
    assert_eq!(info.frame_delays, vec![Duration::from_millis(250)]);
    assert_eq!((info.width, info.height), (16, 12));
}

#[test]
fn multi_frame_gif_keeps_order_and_scale() {
    let opts = BundleOpts {
        frame_duration: Duration::from_millis(1000),
        scale: 0.5,
    };
    let frames = [
        solid(20, 10, [255, 0, 0]),
        solid(20, 10, [0, 255, 0]),
        solid(20, 10, [0, 0, 255]),
    ];
    let bytes = GifBundler::default().bundle(&frames, &opts).unwrap();

    let dec = GifDecoder::new(Cursor::new(&bytes[..])).unwrap();
    let decoded = dec.into_frames().collect_frames().unwrap();
    assert_eq!(decoded.len(), 3);
    for (f, expected) in decoded.iter().zip([[255u8, 0, 0], [0, 255, 0], [0, 0, 255]]) {
        let buf = f.buffer();
        assert_eq!(buf.dimensions(), (10, 5));
        let px = buf.get_pixel(5, 2).0;
        for c in 0..3 {
            assert!(
                px[c].abs_diff(expected[c]) <= 16,
                "pixel {px:?} vs {expected:?}"
            );
        }
    }
}

#[test]
fn delays_are_never_truncated() {
    let frames = [solid(4, 4, [1, 2, 3])];
    for ms in [5, 15] {
        let opts = BundleOpts {
            frame_duration: Duration::from_millis(ms),
            scale: 1.0,
        };
        assert!(matches!(
            GifBundler::default().bundle(&frames, &opts),
            Err(GifhubError::Encode(_))
        ));
    }
    let opts = BundleOpts {
        frame_duration: Duration::from_millis(20),
        scale: 1.0,
    };
    let bytes = GifBundler::default().bundle(&frames, &opts).unwrap();
    assert_eq!(
        probe_gif(&bytes).unwrap().frame_delays,
        vec![Duration::from_millis(20)]
    );
}

#[test]
fn oversized_scale_fails_instead_of_allocating() {
    let opts = BundleOpts {
        frame_duration: Duration::from_millis(100),
        scale: 1e7,
    };
    assert!(matches!(
        GifBundler::default().bundle(&[solid(500, 560, [0, 0, 0])], &opts),
        Err(GifhubError::Encode(_))
    ));
}

#[test]
fn bundling_nothing_fails() {
    let err = GifBundler::default()
        .bundle(&[], &BundleOpts::default())
        .unwrap_err();
    assert!(matches!(err, GifhubError::Encode(_)));
}

#[test]
fn probe_rejects_garbage() {
    assert!(matches!(
        probe_gif(b"GIF89a-but-not-really"),
        Err(GifhubError::Encode(_))
    ));
}
