//! HTML entity encoding and decoding.
//!
//! Encoding covers the five XML entities (`&amp;`, `&lt;`, `&gt;`, `&quot;`,
//! `&apos;`). Decoding also understands numeric character references and a
//! short list of common named ones (`&nbsp;`, `&raquo;`, `&mdash;`, ...).
//! Decoding is total: invalid numeric references decode to U+FFFD and
//! anything unrecognised passes through untouched.

use std::borrow::Cow;

const REPLACEMENT: char = '\u{FFFD}';

/// Escape `&`, `<`, `>`, `'` and `"` for use in attribute values.
pub fn encode_html(s: &str) -> Cow<'_, str> {
    encode_with(s, |c| matches!(c, '&' | '<' | '>' | '\'' | '"'))
}

/// Escape `&`, `<` and `>` for use inside element content.
///
/// Quotes are left alone since text content never ends up inside an
/// attribute value.
pub fn encode_text_content(s: &str) -> Cow<'_, str> {
    encode_with(s, |c| matches!(c, '&' | '<' | '>'))
}

fn encode_with(s: &str, needs_escape: impl Fn(char) -> bool) -> Cow<'_, str> {
    if !s.chars().any(&needs_escape) {
        return Cow::Borrowed(s);
    }

    let mut out = String::with_capacity(s.len() + 16);
    for c in s.chars() {
        if !needs_escape(c) {
            out.push(c);
            continue;
        }
        out.push_str(match c {
            '&' => "&amp;",
            '<' => "&lt;",
            '>' => "&gt;",
            '"' => "&quot;",
            _ => "&apos;",
        });
    }
    Cow::Owned(out)
}

/// Decode named entities known to [`named_entity`] plus decimal and
/// hexadecimal character references.
///
/// Code points of 0, above U+10FFFF, or inside the surrogate range decode to
/// U+FFFD. References without a terminating `;` are left as-is.
pub fn decode_html(s: &str) -> Cow<'_, str> {
    if !s.contains('&') {
        return Cow::Borrowed(s);
    }

    let bytes = s.as_bytes();
    let mut out = String::with_capacity(s.len());
    let mut copy_start = 0;
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] != b'&' {
            i += 1;
            continue;
        }

        if let Some((decoded, consumed)) = decode_reference(&bytes[i..]) {
            out.push_str(&s[copy_start..i]);
            out.push(decoded);
            i += consumed;
            copy_start = i;
        } else {
            i += 1;
        }
    }

    out.push_str(&s[copy_start..]);
    Cow::Owned(out)
}

/// Named references understood besides the XML five. Punctuation and
/// symbols that show up in titles and bylines.
fn named_entity(name: &[u8]) -> Option<char> {
    Some(match name {
        b"amp" => '&',
        b"lt" => '<',
        b"gt" => '>',
        b"quot" => '"',
        b"apos" => '\'',
        b"nbsp" => '\u{a0}',
        b"laquo" => '\u{ab}',
        b"raquo" => '\u{bb}',
        b"lsaquo" => '\u{2039}',
        b"rsaquo" => '\u{203a}',
        b"ndash" => '\u{2013}',
        b"mdash" => '\u{2014}',
        b"lsquo" => '\u{2018}',
        b"rsquo" => '\u{2019}',
        b"ldquo" => '\u{201c}',
        b"rdquo" => '\u{201d}',
        b"hellip" => '\u{2026}',
        b"bull" => '\u{2022}',
        b"middot" => '\u{b7}',
        b"copy" => '\u{a9}',
        b"reg" => '\u{ae}',
        b"trade" => '\u{2122}',
        b"deg" => '\u{b0}',
        b"times" => '\u{d7}',
        b"euro" => '\u{20ac}',
        b"pound" => '\u{a3}',
        _ => return None,
    })
}

/// Decode one reference at the start of `bytes` (which begins with `&`).
/// Returns the character and the number of bytes consumed.
fn decode_reference(bytes: &[u8]) -> Option<(char, usize)> {
    if bytes.get(1).is_some_and(u8::is_ascii_alphabetic) {
        let name_len = bytes[1..]
            .iter()
            .take_while(|b| b.is_ascii_alphanumeric())
            .count();
        if bytes.get(1 + name_len) != Some(&b';') {
            return None;
        }
        let decoded = named_entity(&bytes[1..1 + name_len])?;
        return Some((decoded, name_len + 2));
    }

    if bytes.get(1) != Some(&b'#') {
        return None;
    }

    let (radix, digits_start) = match bytes.get(2) {
        Some(b'x') | Some(b'X') => (16, 3),
        _ => (10, 2),
    };

    let mut end = digits_start;
    while end < bytes.len() && (bytes[end] as char).is_digit(radix) {
        end += 1;
    }
    if end == digits_start || bytes.get(end) != Some(&b';') {
        return None;
    }

    // Digits are ASCII, so this slice is valid UTF-8.
    let digits = std::str::from_utf8(&bytes[digits_start..end]).ok()?;
    let decoded = u32::from_str_radix(digits, radix)
        .ok()
        .filter(|&cp| cp != 0)
        .and_then(char::from_u32)
        .unwrap_or(REPLACEMENT);

    Some((decoded, end + 1))
}
