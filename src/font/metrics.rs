//! Advance widths for the standard Helvetica faces (from the Adobe AFM files),
//! in 1/1000 em. The oblique face shares the upright widths.

/// Helvetica widths for U+0020..=U+007E.
const HELVETICA: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // space - /
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, // 0 - 9
    278, 278, 584, 584, 584, 556, 1015, // : - @
    667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, // A - M
    722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, // N - Z
    278, 278, 278, 469, 556, 333, // [ - `
    556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, // a - m
    556, 556, 556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, // n - z
    334, 260, 334, 584, // { - ~
];

/// Helvetica-Bold widths for U+0020..=U+007E.
const HELVETICA_BOLD: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278, // space - /
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, // 0 - 9
    333, 333, 584, 584, 584, 611, 975, // : - @
    722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, // A - M
    722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, // N - Z
    333, 278, 333, 584, 556, 333, // [ - `
    556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, // a - m
    611, 611, 611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, // n - z
    389, 280, 389, 584, // { - ~
];

/// Width table for one of the standard faces.
#[derive(Debug, Clone, Copy)]
pub struct StandardFontMetrics {
    ascii: &'static [u16; 95],
    bold: bool,
}

impl StandardFontMetrics {
    pub const HELVETICA: StandardFontMetrics = StandardFontMetrics {
        ascii: &HELVETICA,
        bold: false,
    };
    pub const HELVETICA_BOLD: StandardFontMetrics = StandardFontMetrics {
        ascii: &HELVETICA_BOLD,
        bold: true,
    };

    /// Advance width of `ch` in 1/1000 em.
    pub fn advance(&self, ch: char) -> u16 {
        let cp = ch as u32;
        if (0x20..=0x7E).contains(&cp) {
            return self.ascii[(cp - 0x20) as usize];
        }
        match ch {
            '\u{2013}' => 556,                     // en dash
            '\u{2014}' => 1000,                    // em dash
            '\u{2018}' | '\u{2019}' => 222 + 56 * self.bold as u16,
            '\u{201C}' | '\u{201D}' => 333 + 167 * self.bold as u16,
            '\u{2022}' => 350,                     // bullet
            '\u{00A0}' => 278,                     // nbsp
            '\u{00B0}' => 400,                     // degree
            '\u{00B2}' | '\u{00B3}' => 333,        // superscripts
            '\u{00B5}' => 556 + 55 * self.bold as u16,
            '\u{00A9}' | '\u{00AE}' => 737,
            '\u{00D7}' => 584,
            'À'..='Å' => self.advance('A'),
            'È'..='Ë' => self.advance('E'),
            'Ì'..='Ï' => self.advance('I'),
            'Ò'..='Ö' => self.advance('O'),
            'Ù'..='Ü' => self.advance('U'),
            'à'..='å' => self.advance('a'),
            'è'..='ë' => self.advance('e'),
            'ì'..='ï' => self.advance('i'),
            'ò'..='ö' => self.advance('o'),
            'ù'..='ü' => self.advance('u'),
            _ => 556,
        }
    }

    /// Width of a single character in points.
    pub fn char_width(&self, ch: char, font_size: f64) -> f64 {
        self.advance(ch) as f64 / 1000.0 * font_size
    }

    /// Width of a string in points.
    pub fn measure_string(&self, text: &str, font_size: f64) -> f64 {
        text.chars().map(|ch| self.char_width(ch, font_size)).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn space_width() {
        let w = StandardFontMetrics::HELVETICA.char_width(' ', 12.0);
        assert!((w - 3.336).abs() < 0.001);
    }

    #[test]
    fn tables_line_up_with_ascii() {
        let m = StandardFontMetrics::HELVETICA;
        assert_eq!(m.advance('0'), 556);
        assert_eq!(m.advance('@'), 1015);
        assert_eq!(m.advance('M'), 833);
        assert_eq!(m.advance('i'), 222);
        assert_eq!(m.advance('~'), 584);
        let b = StandardFontMetrics::HELVETICA_BOLD;
        assert_eq!(b.advance('b'), 611);
        assert_eq!(b.advance('z'), 500);
    }
}
