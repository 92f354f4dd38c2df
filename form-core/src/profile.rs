use serde::{Deserialize, Serialize};

use crate::models::LogoSlot;

/// Event-specific settings. Every field falls back to the stock event when
/// absent from a supplied profile.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EventProfile {
    /// Prefix of generated registration identifiers.
    pub id_prefix: String,
    /// Prefix of the downloaded document's file name.
    pub file_prefix: String,
    pub header: HeaderText,
    pub fee_label: String,
    pub fee_text: String,
    pub info_points: Vec<String>,
    pub footer_notice: String,
    pub footer_tagline: String,
    pub logos: [LogoPlaceholder; 2],
    pub signature: SignatureGeometry,
    pub limits: InputLimits,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeaderText {
    pub organiser: String,
    pub joiner: String,
    pub co_organiser: String,
    pub presents: String,
    pub title: String,
    pub season: String,
    pub form_title: String,
}

/// Synthetic logo used when the page's logo image cannot be read.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LogoPlaceholder {
    pub label: String,
    /// Circle colour as `#rrggbb`.
    pub background: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SignatureGeometry {
    /// Backing store height in pixels.
    pub height: u32,
    /// Horizontal space subtracted from the container width.
    pub container_padding: f64,
    pub stroke_width: f32,
    /// Ink colour as `#rrggbb`.
    pub ink: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputLimits {
    pub max_photo_bytes: u64,
    pub phone_digits: usize,
    pub pincode_digits: usize,
}

impl EventProfile {
    pub fn from_json(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str(text)
    }

    pub fn logo(&self, slot: LogoSlot) -> &LogoPlaceholder {
        &self.logos[slot.index()]
    }

    pub fn document_filename(&self, registration_id: &str) -> String {
        format!("{}_Registration_{}.pdf", self.file_prefix, registration_id)
    }
}

impl Default for EventProfile {
    fn default() -> Self {
        EventProfile {
            id_prefix: "BTPL2026".to_string(),
            file_prefix: "BTPL".to_string(),
            header: HeaderText::default(),
            fee_label: "ENTRY FEE".to_string(),
            fee_text: "Rs. 1,000/- PER PERSON".to_string(),
            info_points: vec![
                "• Jersey, Shorts & Food provided for all participants".to_string(),
                "• Last Date For Registration: 01-04-2026".to_string(),
                "• Send this form to: kanmani3153@gmail.com".to_string(),
                "• Address: Room #51, Sree Kanteerava Outdoor Stadium, Bengaluru - 560001"
                    .to_string(),
                "• For queries: 9972888592 / 9916659636".to_string(),
            ],
            footer_notice:
                "This is a computer-generated document. No physical signature required."
                    .to_string(),
            footer_tagline: "Bangalore Throwball Premier League • Youngsters Sports Club"
                .to_string(),
            logos: [
                LogoPlaceholder {
                    label: "BTPL".to_string(),
                    background: "#1e40af".to_string(),
                },
                LogoPlaceholder {
                    label: "YSC".to_string(),
                    background: "#f59e0b".to_string(),
                },
            ],
            signature: SignatureGeometry::default(),
            limits: InputLimits::default(),
        }
    }
}

impl Default for HeaderText {
    fn default() -> Self {
        HeaderText {
            organiser: "BANGALORE DISTRICT THROWBALL ASSOCIATION".to_string(),
            joiner: "&".to_string(),
            co_organiser: "YOUNGSTERS SPORTS CLUB".to_string(),
            presents: "Presents".to_string(),
            title: "BANGALORE THROWBALL PREMIER LEAGUE".to_string(),
            season: "SEASON - 1".to_string(),
            form_title: "REGISTRATION FORM".to_string(),
        }
    }
}

impl Default for SignatureGeometry {
    fn default() -> Self {
        SignatureGeometry {
            height: 150,
            container_padding: 20.0,
            stroke_width: 2.0,
            ink: "#0f172a".to_string(),
        }
    }
}

impl Default for InputLimits {
    fn default() -> Self {
        InputLimits {
            max_photo_bytes: 5 * 1024 * 1024,
            phone_digits: 10,
            pincode_digits: 6,
        }
    }
}

/// Parse a `#rrggbb` colour. Returns `None` for anything else.
pub fn parse_hex_color(s: &str) -> Option<[u8; 3]> {
    let hex = s.trim().strip_prefix('#')?;
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    Some([channel(0)?, channel(2)?, channel(4)?])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_profile_keeps_defaults() {
        let p = EventProfile::from_json(r#"{"id_prefix":"CUP2027","limits":{"phone_digits":12}}"#)
            .unwrap();
        assert_eq!(p.id_prefix, "CUP2027");
        assert_eq!(p.file_prefix, "BTPL");
        assert_eq!(p.limits.phone_digits, 12);
        assert_eq!(p.limits.pincode_digits, 6);
        assert_eq!(p.signature.height, 150);
    }

    #[test]
    fn filename_uses_prefix_and_id() {
        let p = EventProfile::default();
        assert_eq!(
            p.document_filename("BTPL2026-1-2"),
            "BTPL_Registration_BTPL2026-1-2.pdf"
        );
    }

    #[test]
    fn logo_placeholders_per_slot() {
        let p = EventProfile::default();
        assert_eq!(p.logo(LogoSlot::Left).label, "BTPL");
        assert_eq!(p.logo(LogoSlot::Right).background, "#f59e0b");
    }

    #[test]
    fn hex_colors() {
        assert_eq!(parse_hex_color("#1e40af"), Some([0x1e, 0x40, 0xaf]));
        assert_eq!(parse_hex_color("1e40af"), None);
        assert_eq!(parse_hex_color("#12345"), None);
    }
}
