use std::env;
use std::fs;
use std::path::Path;

use canvas_core::{SourceRaster, capture_photo, normalize_logo};
use chrono::Local;
use document_core::{DocumentImages, render_registration};
use form_core::{
    CapturedImage, EventProfile, ImageFormat, InputLimits, LogoSlot, RegistrationSnapshot,
    format_datetime_en_in,
};

const USAGE: &str = "Usage: printout <snapshot.json> <output.pdf> [--photo P] [--signature S] \
                     [--logo1 L] [--logo2 L] [--profile F]";

#[derive(Debug, Default, PartialEq)]
struct Args {
    snapshot: String,
    output: String,
    photo: Option<String>,
    signature: Option<String>,
    logos: [Option<String>; 2],
    profile: Option<String>,
}

fn parse_args(args: &[String]) -> Result<Args, String> {
    let mut positional = Vec::new();
    let mut out = Args::default();
    let mut it = args.iter();
    while let Some(arg) = it.next() {
        if !arg.starts_with("--") {
            positional.push(arg.clone());
            continue;
        }
        let value = it
            .next()
            .cloned()
            .ok_or_else(|| format!("{arg} needs a value"))?;
        match arg.as_str() {
            "--photo" => out.photo = Some(value),
            "--signature" => out.signature = Some(value),
            "--logo1" => out.logos[0] = Some(value),
            "--logo2" => out.logos[1] = Some(value),
            "--profile" => out.profile = Some(value),
            other => return Err(format!("unknown option {other}")),
        }
    }
    let [snapshot, output]: [String; 2] = positional
        .try_into()
        .map_err(|_| "expected exactly <snapshot.json> and <output.pdf>".to_string())?;
    out.snapshot = snapshot;
    out.output = output;
    Ok(out)
}

fn load_profile(path: Option<&str>) -> Result<EventProfile, Box<dyn std::error::Error>> {
    match path {
        Some(p) => Ok(EventProfile::from_json(&fs::read_to_string(p)?)?),
        None => Ok(EventProfile::default()),
    }
}

/// Logo from a file, or the slot placeholder when it is missing or unreadable.
fn load_logo(slot: LogoSlot, path: Option<&str>, profile: &EventProfile) -> CapturedImage {
    let source = path.and_then(|p| {
        let decoded = fs::read(p)
            .map_err(|e| e.to_string())
            .and_then(|bytes| SourceRaster::decode(p, &bytes).map_err(|e| e.to_string()));
        match decoded {
            Ok(raster) => Some(raster),
            Err(e) => {
                eprintln!("warning: logo {} ({p}): {e}", slot.number());
                None
            }
        }
    });
    normalize_logo(slot, source.as_ref(), profile)
}

fn load_image(
    path: &str,
    limits: &InputLimits,
) -> Result<CapturedImage, Box<dyn std::error::Error>> {
    let bytes = fs::read(path)?;
    let mime = ImageFormat::sniff(&bytes)
        .map(|f| f.mime())
        .unwrap_or("application/octet-stream");
    Ok(capture_photo(bytes, mime, limits)?)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let raw: Vec<String> = env::args().skip(1).collect();
    let args = match parse_args(&raw) {
        Ok(a) => a,
        Err(e) => {
            eprintln!("error: {e}");
            eprintln!("{USAGE}");
            std::process::exit(2);
        }
    };

    let profile = load_profile(args.profile.as_deref())?;
    let parsed: RegistrationSnapshot = serde_json::from_str(&fs::read_to_string(&args.snapshot)?)?;
    // Re-check required fields; the JSON may have been edited by hand.
    let snapshot = RegistrationSnapshot::new(
        parsed.registration_id().to_string(),
        parsed.registration_date().to_string(),
        parsed.fields().clone(),
    )?;

    let photo = match &args.photo {
        Some(p) => Some(load_image(p, &profile.limits)?),
        None => None,
    };
    // The signature is ours, not an upload; no size cap.
    let unlimited = InputLimits {
        max_photo_bytes: u64::MAX,
        ..profile.limits
    };
    let signature = match &args.signature {
        Some(p) => Some(load_image(p, &unlimited)?),
        None => None,
    };
    let logos = LogoSlot::ALL
        .map(|slot| load_logo(slot, args.logos[slot.index()].as_deref(), &profile));

    let images = DocumentImages {
        photo: photo.as_ref(),
        signature: signature.as_ref(),
        logos: [Some(&logos[0]), Some(&logos[1])],
    };
    let generated_at = format_datetime_en_in(&Local::now().naive_local());
    let doc = render_registration(&profile, &snapshot, &images, &generated_at)?;
    for name in &doc.failed_images {
        eprintln!("warning: {name} could not be embedded");
    }

    let out = Path::new(&args.output);
    fs::write(out, &doc.bytes)?;
    eprintln!(
        "wrote {} ({} bytes, suggested name {})",
        out.display(),
        doc.bytes.len(),
        doc.filename
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn parses_positionals_and_options() {
        let args = parse_args(&strings(&[
            "snap.json",
            "--logo2",
            "ysc.png",
            "out.pdf",
            "--photo",
            "me.jpg",
        ]))
        .unwrap();
        assert_eq!(args.snapshot, "snap.json");
        assert_eq!(args.output, "out.pdf");
        assert_eq!(args.photo.as_deref(), Some("me.jpg"));
        assert_eq!(args.logos, [None, Some("ysc.png".to_string())]);
        assert_eq!(args.signature, None);
    }

    #[test]
    fn rejects_bad_usage() {
        assert!(parse_args(&strings(&["only.json"])).is_err());
        assert!(parse_args(&strings(&["a", "b", "c"])).is_err());
        assert!(parse_args(&strings(&["a", "b", "--photo"])).is_err());
        assert!(parse_args(&strings(&["a", "b", "--colour", "red"])).is_err());
    }

    #[test]
    fn missing_logo_file_falls_back_to_placeholder() {
        let profile = EventProfile::default();
        let logo = load_logo(LogoSlot::Left, Some("/nonexistent/btpl.png"), &profile);
        assert_eq!((logo.format, logo.width, logo.height), (ImageFormat::Png, 150, 150));
    }
}
