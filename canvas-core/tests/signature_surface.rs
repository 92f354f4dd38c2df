use canvas_core::{CanvasRect, PointerInput, PointerPhase, SignatureSurface};
use form_core::SignatureSource;
use form_core::profile::SignatureGeometry;

fn surface(container: f64) -> SignatureSurface {
    SignatureSurface::new(&SignatureGeometry::default(), container).unwrap()
}

fn identity_rect(s: &SignatureSurface) -> CanvasRect {
    CanvasRect {
        left: 0.0,
        top: 0.0,
        width: s.width() as f64,
        height: s.height() as f64,
    }
}

fn stroke(s: &mut SignatureSurface, pts: &[(f64, f64)]) {
    let rect = identity_rect(s);
    let mut phase = PointerPhase::Down;
    for &(x, y) in pts {
        s.handle(
            PointerInput {
                phase,
                client_x: x,
                client_y: y,
            },
            &rect,
        );
        phase = PointerPhase::Move;
    }
    s.handle(
        PointerInput {
            phase: PointerPhase::Up,
            client_x: 0.0,
            client_y: 0.0,
        },
        &rect,
    );
}

/// Raw premultiplied rows `0..rows`, first `cols` pixels of each.
fn region(s: &SignatureSurface, cols: u32, rows: u32) -> Vec<u8> {
    let stride = s.width() as usize * 4;
    let raw = s.raster().raw();
    (0..rows as usize)
        .flat_map(|y| raw[y * stride..y * stride + cols as usize * 4].iter().copied())
        .collect()
}

#[test]
fn draws_and_clears_interleave() {
    let mut s = surface(320.0);
    assert!(s.is_blank());
    for i in 0..4 {
        let y = 20.0 + 20.0 * i as f64;
        stroke(&mut s, &[(10.0, y), (200.0, y)]);
        assert!(!s.is_blank());
        if i % 2 == 1 {
            s.clear();
            assert!(s.is_blank());
        }
    }
}

#[test]
fn resize_of_untouched_surface_stays_blank() {
    let mut s = surface(320.0);
    s.resize(600.0).unwrap();
    s.resize(120.0).unwrap();
    assert!(s.is_blank());
    assert_eq!((s.width(), s.height()), (100, 150));
}

#[test]
fn growing_keeps_ink_at_origin() {
    let mut s = surface(220.0);
    stroke(&mut s, &[(5.0, 5.0), (150.0, 100.0), (190.0, 20.0)]);
    let before = region(&s, 200, 150);
    s.resize(520.0).unwrap();
    assert_eq!(s.width(), 500);
    assert_eq!(region(&s, 200, 150), before);
    // The new area to the right is empty.
    let stride = 500 * 4;
    let raw = s.raster().raw();
    assert!((0..150).all(|y| raw[y * stride + 800..(y + 1) * stride].iter().all(|b| *b == 0)));
}

#[test]
fn shrinking_truncates_without_rescaling() {
    let mut s = surface(320.0);
    // One stroke on the left, one far right.
    stroke(&mut s, &[(10.0, 75.0), (60.0, 75.0)]);
    stroke(&mut s, &[(250.0, 75.0), (290.0, 75.0)]);
    let left = region(&s, 100, 150);
    s.resize(120.0).unwrap();
    assert_eq!(s.width(), 100);
    assert_eq!(s.raster().raw(), left.as_slice());

    // Growing back does not bring the truncated stroke back.
    s.resize(320.0).unwrap();
    let stride = 300 * 4;
    let raw = s.raster().raw();
    assert!((0..150).all(|y| raw[y * stride + 400..(y + 1) * stride].iter().all(|b| *b == 0)));
}

#[test]
fn capture_matches_blank_state() {
    let mut s = surface(320.0);
    stroke(&mut s, &[(10.0, 10.0), (20.0, 30.0)]);
    assert!(!SignatureSource::is_blank(&s));
    let png = s.capture().unwrap();
    let decoded = image::load_from_memory(&png.bytes).unwrap().to_rgba8();
    assert!(decoded.pixels().any(|p| p.0[3] > 0));
}
