// Copyright (C) 2020-2024 Andy Kurnia.

use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

// letters that carry no combining mark once decomposed, so nfd keeps them.
fn unligature(c: char) -> Option<&'static str> {
    Some(match c {
        'Æ' => "AE",
        'æ' => "ae",
        'Œ' => "OE",
        'œ' => "oe",
        'ß' => "ss",
        'Ø' => "O",
        'ø' => "o",
        'Đ' => "D",
        'đ' => "d",
        'Ł' => "L",
        'ł' => "l",
        _ => return None,
    })
}

// "Crème Brûlée" -> "Creme Brulee". case is kept.
pub fn remove_diacritics(s: &str) -> String {
    let mut ret = String::with_capacity(s.len());
    for c in s.nfd() {
        if is_combining_mark(c) {
            continue;
        }
        match unligature(c) {
            Some(plain) => ret.push_str(plain),
            None => ret.push(c),
        }
    }
    ret
}

// The form words take inside the index: trimmed, no diacritics, lowercase.
pub fn fold_word(s: &str) -> String {
    remove_diacritics(s.trim()).to_lowercase()
}

// Length used to rank answers, counted on the folded form.
#[inline(always)]
pub fn letter_count(folded: &str) -> usize {
    folded.chars().count()
}
