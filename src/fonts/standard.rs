//! The standard PDF fonts every viewer ships.
//!
//! These need no embedding: the page just names the font and the viewer
//! supplies it. Text is written in WinAnsiEncoding, so measurement uses the
//! Adobe AFM advance widths (1/1000 em) for printable ASCII. Accented Latin-1
//! letters borrow the width of their base letter.

/// One of the standard Type 1 fonts, by PostScript name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StandardFont {
    Helvetica,
    HelveticaBold,
    HelveticaOblique,
    HelveticaBoldOblique,
    Courier,
    CourierBold,
    CourierOblique,
    CourierBoldOblique,
    TimesRoman,
    TimesBold,
    TimesItalic,
    TimesBoldItalic,
}

impl StandardFont {
    pub const ALL: [StandardFont; 12] = [
        StandardFont::Helvetica,
        StandardFont::HelveticaBold,
        StandardFont::HelveticaOblique,
        StandardFont::HelveticaBoldOblique,
        StandardFont::Courier,
        StandardFont::CourierBold,
        StandardFont::CourierOblique,
        StandardFont::CourierBoldOblique,
        StandardFont::TimesRoman,
        StandardFont::TimesBold,
        StandardFont::TimesItalic,
        StandardFont::TimesBoldItalic,
    ];

    /// Look up a font by its exact PostScript name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.base_font() == name)
    }

    pub fn base_font(self) -> &'static str {
        match self {
            StandardFont::Helvetica => "Helvetica",
            StandardFont::HelveticaBold => "Helvetica-Bold",
            StandardFont::HelveticaOblique => "Helvetica-Oblique",
            StandardFont::HelveticaBoldOblique => "Helvetica-BoldOblique",
            StandardFont::Courier => "Courier",
            StandardFont::CourierBold => "Courier-Bold",
            StandardFont::CourierOblique => "Courier-Oblique",
            StandardFont::CourierBoldOblique => "Courier-BoldOblique",
            StandardFont::TimesRoman => "Times-Roman",
            StandardFont::TimesBold => "Times-Bold",
            StandardFont::TimesItalic => "Times-Italic",
            StandardFont::TimesBoldItalic => "Times-BoldItalic",
        }
    }

    /// Obliques share the upright metrics. Times italics are close enough to
    /// the upright widths for label fitting.
    fn widths(self) -> Option<&'static [u16; 95]> {
        match self {
            StandardFont::Helvetica | StandardFont::HelveticaOblique => Some(&HELVETICA),
            StandardFont::HelveticaBold | StandardFont::HelveticaBoldOblique => {
                Some(&HELVETICA_BOLD)
            }
            StandardFont::TimesRoman | StandardFont::TimesItalic => Some(&TIMES_ROMAN),
            StandardFont::TimesBold | StandardFont::TimesBoldItalic => Some(&TIMES_BOLD),
            // Monospaced
            _ => None,
        }
    }

    /// Advance width of `c` in 1/1000 em.
    pub fn char_width(self, c: char) -> u16 {
        let Some(table) = self.widths() else {
            return COURIER_WIDTH;
        };
        let c = latin1_base(c);
        match c as u32 {
            code @ 32..=126 => table[(code - 32) as usize],
            // '?' stands in for anything WinAnsi cannot encode
            _ => table[('?' as u32 - 32) as usize],
        }
    }

    /// Rendered width of `text` at `size` points.
    pub fn text_width(self, text: &str, size: f32) -> f32 {
        let units: u32 = text.chars().map(|c| self.char_width(c) as u32).sum();
        units as f32 * size / 1000.0
    }
}

/// Encode `text` as WinAnsiEncoding bytes. Unmappable characters become `?`.
pub fn encode_win_ansi(text: &str) -> Vec<u8> {
    text.chars().map(win_ansi_byte).collect()
}

fn win_ansi_byte(c: char) -> u8 {
    match c as u32 {
        code @ (0x20..=0x7E | 0xA0..=0xFF) => code as u8,
        _ => match c {
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
            '‘' => 0x91,
            '’' => 0x92,
            '“' => 0x93,
            '”' => 0x94,
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
        },
    }
}

/// ASCII letter an accented Latin-1 letter is built on.
fn latin1_base(c: char) -> char {
    match c {
        'À'..='Å' => 'A',
        'Ç' => 'C',
        'È'..='Ë' => 'E',
        'Ì'..='Ï' => 'I',
        'Ñ' => 'N',
        'Ò'..='Ö' | 'Ø' => 'O',
        'Ù'..='Ü' => 'U',
        'Ý' | 'Ÿ' => 'Y',
        'à'..='å' => 'a',
        'ç' => 'c',
        'è'..='ë' => 'e',
        'ì'..='ï' => 'i',
        'ñ' => 'n',
        'ò'..='ö' | 'ø' => 'o',
        'ù'..='ü' => 'u',
        'ý' | 'ÿ' => 'y',
        'Š' => 'S',
        'š' => 's',
        'Ž' => 'Z',
        'ž' => 'z',
        '\u{A0}' => ' ',
        other => other,
    }
}

const COURIER_WIDTH: u16 = 600;

// Widths for codes 32..=126, sixteen per row.

#[rustfmt::skip]
const HELVETICA: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556,
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556,
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556,
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584,
];

#[rustfmt::skip]
const HELVETICA_BOLD: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 333, 333, 584, 584, 584, 611,
    975, 722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 333, 278, 333, 584, 556,
    333, 556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, 611, 611,
    611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584,
];

#[rustfmt::skip]
const TIMES_ROMAN: [u16; 95] = [
    250, 333, 408, 500, 500, 833, 778, 180, 333, 333, 500, 564, 250, 333, 250, 278,
    500, 500, 500, 500, 500, 500, 500, 500, 500, 500, 278, 278, 564, 564, 564, 444,
    921, 722, 667, 667, 722, 611, 556, 722, 722, 333, 389, 722, 611, 889, 722, 722,
    556, 722, 667, 556, 611, 722, 722, 944, 722, 722, 611, 333, 278, 333, 469, 500,
    333, 444, 500, 444, 500, 444, 333, 500, 500, 278, 278, 500, 278, 778, 500, 500,
    500, 500, 333, 389, 278, 500, 500, 722, 500, 500, 444, 480, 200, 480, 541,
];

#[rustfmt::skip]
const TIMES_BOLD: [u16; 95] = [
    250, 333, 555, 500, 500, 1000, 833, 278, 333, 333, 500, 570, 250, 333, 250, 278,
    500, 500, 500, 500, 500, 500, 500, 500, 500, 500, 333, 333, 570, 570, 570, 500,
    930, 722, 667, 722, 722, 667, 611, 778, 778, 389, 500, 778, 667, 944, 722, 778,
    611, 778, 722, 556, 667, 722, 722, 1000, 722, 722, 667, 333, 278, 333, 581, 500,
    333, 500, 556, 444, 556, 444, 333, 500, 556, 278, 333, 556, 278, 833, 556, 500,
    556, 556, 444, 389, 333, 556, 500, 722, 500, 500, 444, 394, 220, 394, 520,
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_name_round_trips() {
        for font in StandardFont::ALL {
            assert_eq!(StandardFont::from_name(font.base_font()), Some(font));
        }
    }

    #[test]
    fn unknown_and_case_mismatched_names_are_not_standard() {
        assert_eq!(StandardFont::from_name("BodoniModa-Bold"), None);
        assert_eq!(StandardFont::from_name("helvetica"), None);
    }

    #[test]
    fn helvetica_reference_widths() {
        let f = StandardFont::Helvetica;
        assert_eq!(f.char_width(' '), 278);
        assert_eq!(f.char_width('A'), 667);
        assert_eq!(f.char_width('W'), 944);
        assert_eq!(f.char_width('i'), 222);
        assert_eq!(f.char_width('~'), 584);
    }

    #[test]
    fn bold_is_wider_than_regular() {
        let text = "Anna Smith";
        assert!(
            StandardFont::HelveticaBold.text_width(text, 12.0)
                > StandardFont::Helvetica.text_width(text, 12.0)
        );
    }

    #[test]
    fn courier_is_monospaced() {
        let f = StandardFont::CourierBold;
        assert_eq!(f.text_width("iiii", 10.0), f.text_width("WWWW", 10.0));
        assert_eq!(f.text_width("ab", 10.0), 12.0);
    }

    #[test]
    fn accented_letters_use_base_width() {
        let f = StandardFont::TimesRoman;
        assert_eq!(f.char_width('é'), f.char_width('e'));
        assert_eq!(f.char_width('Ö'), f.char_width('O'));
    }

    #[test]
    fn text_width_scales_with_size() {
        let f = StandardFont::Helvetica;
        assert_eq!(f.text_width("", 12.0), 0.0);
        let w12 = f.text_width("Guess", 12.0);
        let w24 = f.text_width("Guess", 24.0);
        assert!((w24 - 2.0 * w12).abs() < 1e-4);
    }

    #[test]
    fn win_ansi_encoding() {
        assert_eq!(encode_win_ansi("Zoë"), vec![b'Z', b'o', 0xEB]);
        assert_eq!(encode_win_ansi("€5"), vec![0x80, b'5']);
        assert_eq!(encode_win_ansi("日本"), b"??".to_vec());
    }
}
