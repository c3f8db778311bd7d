//! Name handling for imported teachers.

use unicode_normalization::UnicodeNormalization;

/// Strip combining marks after canonical decomposition. `đ`/`Đ` have no
/// decomposition and are mapped by hand.
pub fn fold_diacritics(input: &str) -> String {
    input
        .nfd()
        .filter(|c| !('\u{0300}'..='\u{036F}').contains(c))
        .map(|c| match c {
            'đ' => 'd',
            'Đ' => 'D',
            other => other,
        })
        .collect()
}

/// "nGUYỄN văn an" → "Nguyễn Văn An"
pub fn capitalize_words(input: &str) -> String {
    input
        .split_whitespace()
        .map(|word| {
            let lower = word.to_lowercase();
            let mut chars = lower.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Split a full name into (first name, last name). The last word is the
/// given name; everything before it is the family and middle names.
pub fn split_full_name(full_name: &str) -> (String, String) {
    let mut words: Vec<&str> = full_name.split_whitespace().collect();
    let last = words.pop().unwrap_or_default();
    (capitalize_words(&words.join(" ")), capitalize_words(last))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn folds_vietnamese_letters() {
        assert_eq!(fold_diacritics("Nguyễn Thị Đào"), "Nguyen Thi Dao");
        assert_eq!(fold_diacritics("Trần Ưu Ý"), "Tran Uu Y");
        // decomposed "ế" = e + circumflex + acute
        assert_eq!(fold_diacritics("Tie\u{0302}\u{0301}n"), "Tien");
    }

    #[test]
    fn folds_accents_outside_vietnamese() {
        assert_eq!(fold_diacritics("José Müller Ñoño Çelik"), "Jose Muller Nono Celik");
        assert_eq!(fold_diacritics("Ångström"), "Angstrom");
    }

    #[test]
    fn capitalizes_each_word() {
        assert_eq!(capitalize_words("nGUYỄN   văn an"), "Nguyễn Văn An");
        assert_eq!(capitalize_words("đặng"), "Đặng");
        assert_eq!(capitalize_words(""), "");
    }

    #[test]
    fn splits_full_names() {
        assert_eq!(
            split_full_name(" nguyễn văn  an "),
            ("Nguyễn Văn".to_string(), "An".to_string())
        );
        assert_eq!(split_full_name("An"), (String::new(), "An".to_string()));
    }
}
