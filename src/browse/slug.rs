//! Slug and string normalization
//!
//! Bulgarian Cyrillic is transliterated with the official streamlined system
//! (Закон за транслитерацията, 2009), including the word-final "ия" -> "ia"
//! rule; Latin diacritics are stripped.

use unicode_normalization::{char::is_combining_mark, UnicodeNormalization};

/// Latin transliteration of a single Bulgarian Cyrillic letter (lowercase input)
fn transliterate_bg(c: char) -> Option<&'static str> {
    let s = match c {
        'а' => "a",
        'б' => "b",
        'в' => "v",
        'г' => "g",
        'д' => "d",
        'е' => "e",
        'ж' => "zh",
        'з' => "z",
        'и' => "i",
        'й' => "y",
        'к' => "k",
        'л' => "l",
        'м' => "m",
        'н' => "n",
        'о' => "o",
        'п' => "p",
        'р' => "r",
        'с' => "s",
        'т' => "t",
        'у' => "u",
        'ф' => "f",
        'х' => "h",
        'ц' => "ts",
        'ч' => "ch",
        'ш' => "sh",
        'щ' => "sht",
        'ъ' => "a",
        'ь' => "y",
        'ю' => "yu",
        'я' => "ya",
        _ => return None,
    };
    Some(s)
}

/// Build a URL-safe slug: `[a-z0-9]+(-[a-z0-9]+)*`
pub fn slugify(text: &str) -> String {
    let lower: Vec<char> = text.chars().flat_map(char::to_lowercase).collect();
    let mut latin = String::with_capacity(text.len());
    for (i, &c) in lower.iter().enumerate() {
        // "ия" at the end of a word is "ia", not "iya"
        let word_end = !lower.get(i + 1).is_some_and(|n| n.is_alphabetic());
        if c == 'я' && i > 0 && lower[i - 1] == 'и' && word_end {
            latin.push('a');
            continue;
        }
        match transliterate_bg(c) {
            Some(t) => latin.push_str(t),
            None => latin.push(c),
        }
    }

    let mut slug = String::with_capacity(latin.len());
    let mut pending_dash = false;
    for c in latin.nfkd().filter(|c| !is_combining_mark(*c)) {
        if c.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c.to_ascii_lowercase());
        } else {
            pending_dash = true;
        }
    }
    slug
}

/// Canonical form of a slug path segment.
///
/// `Some(slug)` when `raw` differs from its canonical form and that form is a
/// valid slug (e.g. `Рожен-Фест` -> `rozhen-fest`); `None` when `raw` is
/// already canonical or cannot be made into a slug.
pub fn canonical_slug(raw: &str) -> Option<String> {
    if is_valid_slug(raw) {
        return None;
    }
    let slug = slugify(raw);
    is_valid_slug(&slug).then_some(slug)
}

/// True when `slug` is already in canonical slug form
pub fn is_valid_slug(slug: &str) -> bool {
    !slug.is_empty()
        && slug.len() <= 200
        && !slug.starts_with('-')
        && !slug.ends_with('-')
        && !slug.contains("--")
        && slug
            .bytes()
            .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'-')
}

/// Grouping key for free-form labels: trimmed, lowercased, inner whitespace collapsed
pub fn normalize_key(text: &str) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}
