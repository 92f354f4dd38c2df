//! Label font for placeholder logos, located at build time.
//!
//! The build fails rather than embed an empty font.

pub static FONT_BYTES: &[u8] = include_bytes!(concat!(env!("OUT_DIR"), "/label.ttf"));

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn font_is_sfnt() {
        assert!(FONT_BYTES.len() > 4);
        let tag = &FONT_BYTES[..4];
        let known: [&[u8]; 3] = [&[0, 1, 0, 0], b"true", b"OTTO"];
        assert!(known.contains(&tag), "{tag:?}");
    }
}
