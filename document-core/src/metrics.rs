//! Standard Helvetica glyph metrics, WinAnsi encoding and width-bound wrapping.

/// Font faces used on the page, all from the standard 14 set.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Face {
    Regular,
    Bold,
    Oblique,
}

impl Face {
    pub const ALL: [Face; 3] = [Face::Regular, Face::Bold, Face::Oblique];

    /// Resource name inside the page.
    pub fn resource(&self) -> &'static [u8] {
        match self {
            Face::Regular => b"F1",
            Face::Bold => b"F2",
            Face::Oblique => b"F3",
        }
    }

    pub fn base_font(&self) -> &'static [u8] {
        match self {
            Face::Regular => b"Helvetica",
            Face::Bold => b"Helvetica-Bold",
            Face::Oblique => b"Helvetica-Oblique",
        }
    }
}

// Advance widths in 1/1000 em for 0x20..=0x7E.
const HELVETICA: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // 0x20
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556, // 0x30
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778, // 0x40
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556, // 0x50
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556, // 0x60
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584, // 0x70
];

const HELVETICA_BOLD: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278, // 0x20
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 333, 333, 584, 584, 584, 611, // 0x30
    975, 722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, 722, 778, // 0x40
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 333, 278, 333, 584, 556, // 0x50
    333, 556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, 611, 611, // 0x60
    611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584, // 0x70
];

/// Width of one WinAnsi code in 1/1000 em.
pub fn glyph_width(face: Face, code: u8) -> u16 {
    let table = match face {
        Face::Bold => &HELVETICA_BOLD,
        Face::Regular | Face::Oblique => &HELVETICA,
    };
    match code {
        0x20..=0x7E => table[(code - 0x20) as usize],
        0x95 => 350,
        0x85 | 0x89 | 0x97 | 0x99 => 1000,
        0x91 | 0x92 => 222,
        0x93 | 0x94 => 333,
        // Accented Latin letters are close enough to the lowercase average.
        _ => 556,
    }
}

/// Encode text as WinAnsi. Characters without a code become `?`.
pub fn to_winansi(text: &str) -> Vec<u8> {
    text.chars().map(winansi_code).collect()
}

fn winansi_code(c: char) -> u8 {
    match c {
        ' '..='~' => c as u8,
        '\u{A0}'..='\u{FF}' => c as u32 as u8,
        '€' => 0x80,
        '‚' => 0x82,
        'ƒ' => 0x83,
        '„' => 0x84,
        '…' => 0x85,
        '†' => 0x86,
        '‡' => 0x87,
        'ˆ' => 0x88,
        '‰' => 0x89,
        'Š' => 0x8A,
        '‹' => 0x8B,
        'Œ' => 0x8C,
        'Ž' => 0x8E,
        '\u{2018}' => 0x91,
        '\u{2019}' => 0x92,
        '\u{201C}' => 0x93,
        '\u{201D}' => 0x94,
        '•' => 0x95,
        '–' => 0x96,
        '—' => 0x97,
        '˜' => 0x98,
        '™' => 0x99,
        'š' => 0x9A,
        '›' => 0x9B,
        'œ' => 0x9C,
        'ž' => 0x9E,
        'Ÿ' => 0x9F,
        _ => b'?',
    }
}

/// Width of `text` in points at `size`.
pub fn text_width_pt(face: Face, size: f32, text: &str) -> f32 {
    let units: u32 = to_winansi(text)
        .iter()
        .map(|b| glyph_width(face, *b) as u32)
        .sum();
    units as f32 * size / 1000.0
}

/// Break `text` into lines no wider than `max_width_pt`.
///
/// Explicit newlines always break. Words are packed greedily; a single word
/// wider than the limit is split between characters. Always returns at
/// least one line.
pub fn wrap_text(text: &str, face: Face, size: f32, max_width_pt: f32) -> Vec<String> {
    let width = |s: &str| text_width_pt(face, size, s);
    let mut lines = Vec::new();
    for paragraph in text.split('\n') {
        let paragraph = paragraph.trim_end_matches('\r');
        let mut current = String::new();
        for word in paragraph.split(' ') {
            let candidate = if current.is_empty() {
                word.to_string()
            } else {
                format!("{current} {word}")
            };
            if width(&candidate) <= max_width_pt {
                current = candidate;
                continue;
            }
            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            if width(word) <= max_width_pt {
                current = word.to_string();
                continue;
            }
            // Hard-split an overlong word.
            for ch in word.chars() {
                let mut next = current.clone();
                next.push(ch);
                if !current.is_empty() && width(&next) > max_width_pt {
                    lines.push(std::mem::replace(&mut current, ch.to_string()));
                } else {
                    current = next;
                }
            }
        }
        lines.push(current);
    }
    lines
}
