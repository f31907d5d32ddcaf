use icu_normalizer::DecomposingNormalizerBorrowed;

/// The 22 base letters in alphabetical order.
pub const HEBREW_LETTERS: &[char] = &[
    'א', 'ב', 'ג', 'ד', 'ה', 'ו', 'ז', 'ח', 'ט', 'י', 'כ', 'ל', 'מ', 'נ', 'ס', 'ע', 'פ', 'צ',
    'ק', 'ר', 'ש', 'ת',
];

/// Base letter paired with its word-final (sofit) form.
pub const FINAL_FORMS: &[(char, char)] = &[
    ('כ', 'ך'),
    ('מ', 'ם'),
    ('נ', 'ן'),
    ('פ', 'ף'),
    ('צ', 'ץ'),
];

pub const WINDOWS_GERESH: char = '\'';
pub const MAC_GERESH: char = '\u{05F3}';

pub fn is_hebrew_letter(ch: char) -> bool {
    ('\u{05D0}'..='\u{05EA}').contains(&ch)
}

pub fn is_final_form(ch: char) -> bool {
    FINAL_FORMS.iter().any(|&(_, f)| f == ch)
}

pub fn final_form_of(base: char) -> Option<char> {
    FINAL_FORMS.iter().find(|&&(b, _)| b == base).map(|&(_, f)| f)
}

/// Total distinct keys a learner has to master: base letters plus finals.
pub fn alphabet_size() -> usize {
    HEBREW_LETTERS.len() + FINAL_FORMS.len()
}

/// Points and cantillation marks. Maqaf, paseq and sof pasuq are punctuation
/// and are kept.
fn is_vowel_or_accent_mark(ch: char) -> bool {
    matches!(ch,
        '\u{0591}'..='\u{05AF}'
        | '\u{05B0}'..='\u{05BD}'
        | '\u{05BF}'
        | '\u{05C1}'..='\u{05C2}'
        | '\u{05C4}'..='\u{05C5}'
        | '\u{05C7}')
}

/// Mac layouts emit the Hebrew punctuation geresh where Windows emits an
/// apostrophe; compare on the Windows form.
pub fn normalize_geresh(input: &str) -> String {
    input.replace(MAC_GERESH, &WINDOWS_GERESH.to_string())
}

pub fn normalize_char(ch: char) -> char {
    if ch == MAC_GERESH { WINDOWS_GERESH } else { ch }
}

/// Decompose (which also unfolds presentation forms such as U+FB2A) and drop
/// vowel points so that pointed text compares equal to plain typing.
pub fn strip_niqqud(input: &str) -> String {
    let nfd = DecomposingNormalizerBorrowed::new_nfd();
    nfd.normalize(input)
        .chars()
        .filter(|&ch| !is_vowel_or_accent_mark(ch))
        .collect()
}

pub fn normalize_text(input: &str) -> String {
    strip_niqqud(&normalize_geresh(input))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data;

    #[test]
    fn tables_match_bundled_letters() {
        let table = data::letter_table().unwrap();
        assert_eq!(table.hebrew_letters, HEBREW_LETTERS);
        for &(base, fin) in FINAL_FORMS {
            assert_eq!(table.final_letters.get(&base), Some(&fin));
        }
        assert_eq!(table.windows_geresh, WINDOWS_GERESH);
        assert_eq!(table.mac_geresh, MAC_GERESH);
    }

    #[test]
    fn final_forms_are_letters() {
        for &(base, fin) in FINAL_FORMS {
            assert!(is_hebrew_letter(base));
            assert!(is_hebrew_letter(fin));
            assert!(is_final_form(fin));
            assert!(!is_final_form(base));
            assert_eq!(final_form_of(base), Some(fin));
        }
        assert_eq!(alphabet_size(), 27);
    }

    #[test]
    fn latin_is_not_hebrew() {
        assert!(!is_hebrew_letter('a'));
        assert!(!is_hebrew_letter(' '));
        assert!(!is_hebrew_letter(MAC_GERESH));
    }

    #[test]
    fn geresh_normalization() {
        assert_eq!(normalize_geresh("ג׳ירפה"), "ג'ירפה");
        assert_eq!(normalize_char(MAC_GERESH), '\'');
        assert_eq!(normalize_char('ש'), 'ש');
    }

    #[test]
    fn niqqud_is_removed() {
        assert_eq!(strip_niqqud("שָׁלוֹם"), "שלום");
        assert_eq!(strip_niqqud("\u{FB2A}"), "ש");
        assert_eq!(strip_niqqud("בית־ספר"), "בית־ספר");
    }
}
