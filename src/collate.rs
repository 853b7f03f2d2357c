use std::cmp::Ordering;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Locale-style string ordering for the list views.
///
/// Three levels, in the spirit of a root collation:
/// 1. base letters, ignoring case and accents (`"e"`, `"É"`, `"é"` tie);
/// 2. unaccented before accented (`"cote"` < `"coté"`);
/// 3. lowercase before uppercase (`"ana"` < `"Ana"`).
///
/// Text is decomposed first, so a precomposed `é` and `e` + U+0301 compare
/// equal. Strings equal on all three levels fall back to NFC code point
/// order so the result is a total order.
pub fn compare(a: &str, b: &str) -> Ordering {
    let ka = units(a);
    let kb = units(b);
    ka.iter()
        .map(|u| u.base)
        .cmp(kb.iter().map(|u| u.base))
        .then_with(|| ka.iter().map(|u| &u.marks).cmp(kb.iter().map(|u| &u.marks)))
        .then_with(|| ka.iter().map(|u| u.upper).cmp(kb.iter().map(|u| u.upper)))
        .then_with(|| a.nfc().cmp(b.nfc()))
}

/// One base letter with the marks that were stacked on it.
struct Unit {
    base: char,
    marks: Vec<char>,
    upper: bool,
}

fn units(s: &str) -> Vec<Unit> {
    let mut out: Vec<Unit> = Vec::with_capacity(s.len());
    for c in s.nfd() {
        let upper = c.is_uppercase();
        for lower in c.to_lowercase() {
            if is_combining_mark(lower) {
                if let Some(last) = out.last_mut() {
                    last.marks.push(lower);
                    continue;
                }
            }
            match expand(lower) {
                // letters NFD leaves whole: fold to ASCII, keep the original as the mark
                Some(bases) => out.extend(bases.chars().map(|base| Unit {
                    base,
                    marks: vec![lower],
                    upper,
                })),
                None => out.push(Unit {
                    base: lower,
                    marks: Vec::new(),
                    upper,
                }),
            }
        }
    }
    out
}

/// Latin letters with no canonical decomposition.
fn expand(c: char) -> Option<&'static str> {
    Some(match c {
        'æ' => "ae",
        'œ' => "oe",
        'ß' => "ss",
        'ø' => "o",
        'đ' | 'ð' => "d",
        'ł' => "l",
        'ħ' => "h",
        'ŧ' => "t",
        'ı' => "i",
        'þ' => "th",
        _ => return None,
    })
}
