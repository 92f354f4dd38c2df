use canvas_core::{SignatureSurface, SourceRaster, normalize_logo};
use chrono::NaiveDate;
use document_core::{DocumentImages, RenderError, render_registration, render_session};
use form_core::profile::SignatureGeometry;
use form_core::{
    CapturedImage, EventProfile, FieldValues, ImageFormat, LogoSlot, RegistrationSnapshot, Session,
    Timestamp, format_datetime_en_in,
};

fn fields() -> FieldValues {
    FieldValues {
        first_name: "Kiran".into(),
        last_name: "Shetty".into(),
        phone: "9123456780".into(),
        email: "kiran@example.org".into(),
        address: "45 Residency Road".into(),
        city: "Bengaluru".into(),
        state: "Karnataka".into(),
        pincode: "560025".into(),
        handed: "Left".into(),
        specialist: "Defender".into(),
        achievement: "District runners-up".into(),
        jersey_size: "L".into(),
    }
}

fn logo(src: &str) -> CapturedImage {
    let raster = SourceRaster {
        src: src.into(),
        width: 8,
        height: 8,
        rgba: [30u8, 64, 175, 255].repeat(64),
    };
    normalize_logo(LogoSlot::Left, Some(&raster), &EventProfile::default())
}

fn photo() -> CapturedImage {
    let raster = SourceRaster {
        src: "photo.jpg".into(),
        width: 20,
        height: 24,
        rgba: [200u8, 180, 160, 255].repeat(20 * 24),
    };
    canvas_core::normalize_image(&raster).unwrap()
}

fn signature() -> CapturedImage {
    let mut pad = SignatureSurface::new(&SignatureGeometry::default(), 320.0).unwrap();
    pad.pointer_down(10.0, 10.0);
    pad.pointer_move(120.0, 80.0);
    pad.to_png().unwrap()
}

fn pdf_text(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}

fn snapshot() -> RegistrationSnapshot {
    RegistrationSnapshot::new("BTPL2026-1773050400000-42".into(), "9/3/2026".into(), fields())
        .unwrap()
}

#[test]
fn missing_first_logo_still_renders_second() {
    let logo2 = logo("img/ysc.png");
    let photo = photo();
    let sig = signature();
    let images = DocumentImages {
        photo: Some(&photo),
        signature: Some(&sig),
        logos: [None, Some(&logo2)],
    };
    let doc = render_registration(&EventProfile::default(), &snapshot(), &images, "now").unwrap();
    let text = pdf_text(&doc.bytes);
    assert!(text.contains("/Logo2 Do"));
    assert!(!text.contains("/Logo1"));
    assert!(text.contains("/Photo Do"));
    assert!(text.contains("/Signature Do"));
    assert!(doc.failed_images.is_empty());
}

#[test]
fn corrupt_logo_is_skipped_and_reported() {
    let broken = CapturedImage::new(ImageFormat::Png, 150, 150, vec![0x89, b'P', b'N', b'G']);
    let logo2 = logo("ysc.webp");
    let images = DocumentImages {
        logos: [Some(&broken), Some(&logo2)],
        ..DocumentImages::default()
    };
    let doc = render_registration(&EventProfile::default(), &snapshot(), &images, "now").unwrap();
    assert_eq!(doc.failed_images, vec!["Logo1".to_string()]);
    let text = pdf_text(&doc.bytes);
    assert!(!text.contains("/Logo1 Do"));
    assert!(text.contains("/Logo2 Do"));
}

#[test]
fn page_is_a4_with_standard_fonts() {
    let doc = render_registration(
        &EventProfile::default(),
        &snapshot(),
        &DocumentImages::default(),
        "now",
    )
    .unwrap();
    let text = pdf_text(&doc.bytes);
    assert!(text.starts_with("%PDF-"));
    assert!(text.contains("/MediaBox [0 0 595.2"), "{text}");
    assert!(text.contains("/BaseFont /Helvetica-Bold"));
    assert!(text.contains("/BaseFont /Helvetica-Oblique"));
    assert!(text.contains("/WinAnsiEncoding"));
    assert!(text.contains("(BTPL2026-1773050400000-42) Tj"));
    assert!(text.contains("(Date: 9/3/2026) Tj"));
    assert!(text.contains("(Rs. 1,000/- PER PERSON) Tj"));
    assert!(text.contains("(Achievements:) Tj"));
    assert!(text.contains("(Generated on: now) Tj"));
    // No signature captured: no signature block.
    assert!(!text.contains("Applicant Signature"));
}

#[test]
fn output_is_deterministic() {
    let logo2 = logo("ysc.png");
    let images = DocumentImages {
        logos: [None, Some(&logo2)],
        ..DocumentImages::default()
    };
    let a = render_registration(&EventProfile::default(), &snapshot(), &images, "t").unwrap();
    let b = render_registration(&EventProfile::default(), &snapshot(), &images, "t").unwrap();
    assert_eq!(a.bytes, b.bytes);
}

#[test]
fn session_flow_end_to_end() {
    let mut session = Session::new(EventProfile::default());
    assert!(matches!(
        render_session(&session, "now"),
        Err(RenderError::MissingSnapshot)
    ));

    let profile = session.profile().clone();
    for slot in LogoSlot::ALL {
        session.set_logo(slot, normalize_logo(slot, None, &profile));
    }
    session.set_photo(photo());
    let mut pad = SignatureSurface::new(&profile.signature, 400.0).unwrap();
    pad.pointer_down(5.0, 5.0);
    pad.pointer_move(60.0, 40.0);

    let local = NaiveDate::from_ymd_opt(2026, 3, 9)
        .and_then(|d| d.and_hms_opt(16, 5, 0))
        .unwrap();
    let now = Timestamp {
        epoch_ms: 1_773_072_300_000,
        local,
    };
    let id = session
        .submit(&pad, fields(), now, 0.25)
        .unwrap()
        .registration_id()
        .to_string();
    assert_eq!(id, "BTPL2026-1773072300000-250");

    let doc = render_session(&session, &format_datetime_en_in(&local)).unwrap();
    assert_eq!(doc.filename, format!("BTPL_Registration_{id}.pdf"));
    let text = pdf_text(&doc.bytes);
    for name in ["/Logo1 Do", "/Logo2 Do", "/Photo Do", "/Signature Do"] {
        assert!(text.contains(name), "{name}");
    }
    assert!(text.contains("(Generated on: 9/3/2026, 4:05:00 pm) Tj"));
}
