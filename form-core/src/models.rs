use serde::{Deserialize, Serialize};

use crate::error::{FormError, Result};

/// Encoding of a captured raster payload.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ImageFormat {
    #[default]
    Png,
    Jpeg,
    Webp,
}

impl ImageFormat {
    /// Detect the encoding from an image source identifier (URL or file name).
    ///
    /// Matching is a case-insensitive substring search, checked in the order
    /// `.jpg`/`.jpeg`, `.png`, `.webp`. Anything else is treated as PNG.
    pub fn detect_from_source(src: &str) -> Self {
        let src = src.to_lowercase();
        if src.contains(".jpg") || src.contains(".jpeg") {
            ImageFormat::Jpeg
        } else if src.contains(".png") {
            ImageFormat::Png
        } else if src.contains(".webp") {
            ImageFormat::Webp
        } else {
            ImageFormat::Png
        }
    }

    /// Sniff the encoding from the leading bytes of an encoded payload.
    pub fn sniff(bytes: &[u8]) -> Option<Self> {
        if bytes.starts_with(&[0xFF, 0xD8, 0xFF]) {
            Some(ImageFormat::Jpeg)
        } else if bytes.starts_with(&[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A]) {
            Some(ImageFormat::Png)
        } else if bytes.len() >= 12 && &bytes[0..4] == b"RIFF" && &bytes[8..12] == b"WEBP" {
            Some(ImageFormat::Webp)
        } else {
            None
        }
    }

    pub fn mime(&self) -> &'static str {
        match self {
            ImageFormat::Png => "image/png",
            ImageFormat::Jpeg => "image/jpeg",
            ImageFormat::Webp => "image/webp",
        }
    }

    /// Short tag as used by document tooling ("PNG", "JPEG", "WEBP").
    pub fn tag(&self) -> &'static str {
        match self {
            ImageFormat::Png => "PNG",
            ImageFormat::Jpeg => "JPEG",
            ImageFormat::Webp => "WEBP",
        }
    }
}

/// An encoded raster payload plus its pixel dimensions.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CapturedImage {
    pub format: ImageFormat,
    pub width: u32,
    pub height: u32,
    pub bytes: Vec<u8>,
}

impl CapturedImage {
    pub fn new(format: ImageFormat, width: u32, height: u32, bytes: Vec<u8>) -> Self {
        CapturedImage {
            format,
            width,
            height,
            bytes,
        }
    }
}

/// The two header logo positions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LogoSlot {
    Left = 1,
    Right = 2,
}

impl LogoSlot {
    pub const ALL: [LogoSlot; 2] = [LogoSlot::Left, LogoSlot::Right];

    pub fn number(&self) -> u8 {
        *self as u8
    }

    pub fn index(&self) -> usize {
        match self {
            LogoSlot::Left => 0,
            LogoSlot::Right => 1,
        }
    }
}

/// Raw field values as read from the page at the moment of submission.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldValues {
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub email: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub pincode: String,
    pub handed: String,
    pub specialist: String,
    /// Free text, may be empty.
    #[serde(default)]
    pub achievement: String,
    pub jersey_size: String,
}

impl FieldValues {
    /// Required fields in page order, paired with their element ids.
    pub fn required(&self) -> [(&'static str, &str); 11] {
        [
            ("firstName", &self.first_name),
            ("lastName", &self.last_name),
            ("phone", &self.phone),
            ("email", &self.email),
            ("address", &self.address),
            ("city", &self.city),
            ("state", &self.state),
            ("pincode", &self.pincode),
            ("handed", &self.handed),
            ("specialist", &self.specialist),
            ("jerseySize", &self.jersey_size),
        ]
    }
}

/// Immutable record of one accepted submission.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationSnapshot {
    registration_id: String,
    registration_date: String,
    #[serde(flatten)]
    fields: FieldValues,
}

impl RegistrationSnapshot {
    /// Build a snapshot, rejecting any required field that is blank after trimming.
    pub fn new(
        registration_id: String,
        registration_date: String,
        fields: FieldValues,
    ) -> Result<Self> {
        if let Some((name, _)) = fields.required().iter().find(|(_, v)| v.trim().is_empty()) {
            return Err(FormError::EmptyField(name.to_string()));
        }
        Ok(RegistrationSnapshot {
            registration_id,
            registration_date,
            fields,
        })
    }

    pub fn registration_id(&self) -> &str {
        &self.registration_id
    }

    pub fn registration_date(&self) -> &str {
        &self.registration_date
    }

    pub fn fields(&self) -> &FieldValues {
        &self.fields
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.fields.first_name, self.fields.last_name)
    }

    /// Achievements text when it carries anything besides whitespace.
    pub fn achievement(&self) -> Option<&str> {
        let a = self.fields.achievement.as_str();
        if a.trim().is_empty() { None } else { Some(a) }
    }
}

#[cfg(test)]
pub(crate) fn sample_fields() -> FieldValues {
    FieldValues {
        first_name: "Asha".into(),
        last_name: "Rao".into(),
        phone: "9876543210".into(),
        email: "asha@example.com".into(),
        address: "12 MG Road".into(),
        city: "Bengaluru".into(),
        state: "Karnataka".into(),
        pincode: "560001".into(),
        handed: "Right".into(),
        specialist: "Attacker".into(),
        achievement: String::new(),
        jersey_size: "M".into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_format_from_source_substrings() {
        assert_eq!(ImageFormat::detect_from_source("img/LOGO.JPG"), ImageFormat::Jpeg);
        assert_eq!(ImageFormat::detect_from_source("a.jpeg?v=2"), ImageFormat::Jpeg);
        assert_eq!(ImageFormat::detect_from_source("/logo.png"), ImageFormat::Png);
        assert_eq!(ImageFormat::detect_from_source("ysc.webp"), ImageFormat::Webp);
        assert_eq!(ImageFormat::detect_from_source("data:image/gif;base64,"), ImageFormat::Png);
    }

    #[test]
    fn jpeg_substring_wins_over_later_extensions() {
        assert_eq!(ImageFormat::detect_from_source("x.jpg.png"), ImageFormat::Jpeg);
    }

    #[test]
    fn sniffs_magic_bytes() {
        assert_eq!(ImageFormat::sniff(&[0xFF, 0xD8, 0xFF, 0xE0]), Some(ImageFormat::Jpeg));
        assert_eq!(ImageFormat::sniff(b"RIFF\0\0\0\0WEBPVP8L"), Some(ImageFormat::Webp));
        assert_eq!(ImageFormat::sniff(b"GIF89a"), None);
    }

    #[test]
    fn snapshot_rejects_blank_required_field() {
        let mut f = sample_fields();
        f.city = "   ".into();
        let err = RegistrationSnapshot::new("X-1-2".into(), "1/1/2026".into(), f).unwrap_err();
        assert!(matches!(err, FormError::EmptyField(ref n) if n == "city"));
    }

    #[test]
    fn snapshot_allows_empty_achievement() {
        let s = RegistrationSnapshot::new("X-1-2".into(), "1/1/2026".into(), sample_fields())
            .unwrap();
        assert_eq!(s.achievement(), None);
        assert_eq!(s.full_name(), "Asha Rao");
    }

    #[test]
    fn snapshot_serializes_flat_camel_case() {
        let s = RegistrationSnapshot::new("X-1-2".into(), "1/1/2026".into(), sample_fields())
            .unwrap();
        let v = serde_json::to_value(&s).unwrap();
        assert_eq!(v["registrationId"], "X-1-2");
        assert_eq!(v["jerseySize"], "M");
        let back: RegistrationSnapshot = serde_json::from_value(v).unwrap();
        assert_eq!(back, s);
    }
}
