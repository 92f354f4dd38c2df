use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

// Bold fonts with Latin glyphs that common hosts carry.
const SYSTEM_FONTS: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans-Bold.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans-Bold.ttf",
    "/usr/share/fonts/TTF/DejaVuSans-Bold.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Bold.ttf",
    "/usr/share/fonts/liberation/LiberationSans-Bold.ttf",
    "/usr/share/fonts/truetype/noto/NotoSans-Bold.ttf",
    "/usr/share/fonts/noto/NotoSans-Bold.ttf",
    "/usr/share/fonts/truetype/freefont/FreeSansBold.ttf",
    "/Library/Fonts/Arial Bold.ttf",
    "/System/Library/Fonts/Supplemental/Arial Bold.ttf",
    "C:\\Windows\\Fonts\\arialbd.ttf",
];

// Pinned fallback when the host has none of the above.
const FONT_URL: &str = "https://github.com/notofonts/notofonts.github.io/raw/main/fonts/NotoSans/hinted/ttf/NotoSans-Bold.ttf";

fn is_sfnt(path: &Path) -> bool {
    fs::read(path)
        .map(|b| {
            let known: [&[u8]; 3] = [&[0, 1, 0, 0], b"true", b"OTTO"];
            b.len() > 4 && known.contains(&&b[..4])
        })
        .unwrap_or(false)
}

fn download(url: &str, target: &Path) -> bool {
    let target = target.to_str().unwrap();
    let curl = Command::new("curl")
        .args(["-L", "-f", "-s", "-o", target, url])
        .status();
    if let Ok(st) = curl
        && st.success()
    {
        return true;
    }
    let wget = Command::new("wget").args(["-q", "-O", target, url]).status();
    matches!(wget, Ok(st) if st.success())
}

fn main() {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());
    let target_font = out_dir.join("label.ttf");

    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-env-changed=FONT_TTF");

    // Allow overriding via env: FONT_TTF
    if let Ok(path) = env::var("FONT_TTF") {
        match fs::copy(&path, &target_font) {
            Ok(_) if is_sfnt(&target_font) => return,
            Ok(_) => println!("cargo:warning=FONT_TTF {path} is not a TrueType/OpenType font"),
            Err(e) => println!("cargo:warning=failed to copy FONT_TTF {path}: {e}"),
        }
    }

    for path in SYSTEM_FONTS {
        if fs::copy(path, &target_font).is_ok() && is_sfnt(&target_font) {
            println!("cargo:rerun-if-changed={path}");
            return;
        }
    }

    // Incremental build after an earlier download.
    if is_sfnt(&target_font) {
        return;
    }

    if download(FONT_URL, &target_font) && is_sfnt(&target_font) {
        return;
    }

    // Placeholder labels need real glyphs; never build with an empty font.
    panic!("No label font found and download of {FONT_URL} failed. Set FONT_TTF to a .ttf file.");
}
