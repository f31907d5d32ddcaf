/// One physical key: the Latin character a US layout would produce and the
/// character the Hebrew (SI-1452) layout puts on it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct KeyCap {
    pub latin: char,
    pub hebrew: char,
}

const fn key(latin: char, hebrew: char) -> KeyCap {
    KeyCap { latin, hebrew }
}

const TOP_ROW: &[KeyCap] = &[
    key('q', '/'),
    key('w', '\''),
    key('e', 'ק'),
    key('r', 'ר'),
    key('t', 'א'),
    key('y', 'ט'),
    key('u', 'ו'),
    key('i', 'ן'),
    key('o', 'ם'),
    key('p', 'פ'),
];

const HOME_ROW: &[KeyCap] = &[
    key('a', 'ש'),
    key('s', 'ד'),
    key('d', 'ג'),
    key('f', 'כ'),
    key('g', 'ע'),
    key('h', 'י'),
    key('j', 'ח'),
    key('k', 'ל'),
    key('l', 'ך'),
    key(';', 'ף'),
    key('\'', ','),
];

const BOTTOM_ROW: &[KeyCap] = &[
    key('z', 'ז'),
    key('x', 'ס'),
    key('c', 'ב'),
    key('v', 'ה'),
    key('b', 'נ'),
    key('n', 'מ'),
    key('m', 'צ'),
    key(',', 'ת'),
    key('.', 'ץ'),
    key('/', '.'),
];

/// The standard Israeli layout. Letters that are not on a letter key in a
/// US layout (ף, comma, period) sit on the punctuation keys.
#[derive(Clone, Debug)]
pub struct HebrewLayout {
    rows: [&'static [KeyCap]; 3],
}

impl HebrewLayout {
    pub fn new() -> Self {
        Self {
            rows: [TOP_ROW, HOME_ROW, BOTTOM_ROW],
        }
    }

    pub fn rows(&self) -> &[&'static [KeyCap]] {
        &self.rows
    }

    fn keys(&self) -> impl Iterator<Item = &KeyCap> {
        self.rows.iter().flat_map(|row| row.iter())
    }

    /// Translates a key typed on a Latin layout. Uppercase is folded so
    /// Caps Lock does not matter; unmapped characters pass through.
    pub fn to_hebrew(&self, latin: char) -> char {
        let folded = latin.to_ascii_lowercase();
        self.keys()
            .find(|k| k.latin == folded)
            .map_or(latin, |k| k.hebrew)
    }

    pub fn latin_for(&self, hebrew: char) -> Option<char> {
        self.keys().find(|k| k.hebrew == hebrew).map(|k| k.latin)
    }

    /// Row and column of the key producing `hebrew`.
    pub fn position_of(&self, hebrew: char) -> Option<(usize, usize)> {
        self.rows.iter().enumerate().find_map(|(r, row)| {
            row.iter()
                .position(|k| k.hebrew == hebrew)
                .map(|c| (r, c))
        })
    }
}

impl Default for HebrewLayout {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::letters;

    #[test]
    fn every_letter_has_a_key() {
        let layout = HebrewLayout::new();
        for &ch in letters::HEBREW_LETTERS {
            assert!(layout.latin_for(ch).is_some(), "{ch} has no key");
        }
        for &(_, final_form) in letters::FINAL_FORMS {
            assert!(layout.latin_for(final_form).is_some(), "{final_form} has no key");
        }
    }

    #[test]
    fn translates_home_row() {
        let layout = HebrewLayout::new();
        let typed: String = "fjgh".chars().map(|c| layout.to_hebrew(c)).collect();
        assert_eq!(typed, "כחעי");
        assert_eq!(layout.to_hebrew('F'), 'כ');
        assert_eq!(layout.to_hebrew(' '), ' ');
        assert_eq!(layout.to_hebrew('1'), '1');
    }

    #[test]
    fn punctuation_keys_carry_letters() {
        let layout = HebrewLayout::new();
        assert_eq!(layout.to_hebrew(';'), 'ף');
        assert_eq!(layout.to_hebrew('.'), 'ץ');
        assert_eq!(layout.to_hebrew(','), 'ת');
        assert_eq!(layout.to_hebrew('/'), '.');
    }

    #[test]
    fn positions() {
        let layout = HebrewLayout::new();
        assert_eq!(layout.position_of('ש'), Some((1, 0)));
        assert_eq!(layout.position_of('ץ'), Some((2, 8)));
        assert_eq!(layout.position_of('x'), None);
    }
}
