//! Surface-string helpers applied to a chosen translation.

use std::borrow::Cow;

use quick_xml::escape::{resolve_html5_entity, unescape};

/// Named references that also resolve without a closing `;`.
const LEGACY_ENTITIES: &[&str] = &[
    "amp", "AMP", "lt", "LT", "gt", "GT", "quot", "QUOT", "nbsp", "copy", "COPY", "reg", "REG",
];

/// Resolve HTML character references (named HTML5 entities and numeric
/// references) one at a time. A fragment that is not a valid reference,
/// such as the `&` in `AT&T`, stays literal.
pub fn unescape_html(s: &str) -> Cow<'_, str> {
    if !s.contains('&') {
        return Cow::Borrowed(s);
    }
    let mut out = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let after = &rest[amp + 1..];
        match resolve_reference(after) {
            Some((resolved, consumed)) => {
                out.push_str(&resolved);
                rest = &after[consumed..];
            }
            None => {
                out.push('&');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    Cow::Owned(out)
}

/// Resolve the reference that follows an `&`. Returns the replacement and
/// the number of bytes of `after` it spans.
fn resolve_reference(after: &str) -> Option<(Cow<'static, str>, usize)> {
    if let Some(num) = after.strip_prefix('#') {
        let (hex, digits) = match num.strip_prefix(['x', 'X']) {
            Some(h) => (true, h),
            None => (false, num),
        };
        let len = digits
            .find(|c: char| {
                if hex {
                    !c.is_ascii_hexdigit()
                } else {
                    !c.is_ascii_digit()
                }
            })
            .unwrap_or(digits.len());
        if len == 0 {
            return None;
        }
        let mut consumed = (if hex { 2 } else { 1 }) + len;
        if digits[len..].starts_with(';') {
            consumed += 1;
        }
        let reference = format!("&#{}{};", if hex { "x" } else { "" }, &digits[..len]);
        let resolved = unescape(&reference).ok()?.into_owned();
        return Some((Cow::Owned(resolved), consumed));
    }

    let len = after
        .find(|c: char| !c.is_ascii_alphanumeric())
        .unwrap_or(after.len());
    let name = &after[..len];
    if after[len..].starts_with(';') {
        if let Some(value) = resolve_html5_entity(name) {
            return Some((Cow::Borrowed(value), len + 1));
        }
    }
    LEGACY_ENTITIES
        .iter()
        .filter(|legacy| name.starts_with(**legacy))
        .max_by_key(|legacy| legacy.len())
        .and_then(|legacy| resolve_html5_entity(legacy).map(|v| (Cow::Borrowed(v), legacy.len())))
}

/// Uppercase the first character, leaving the rest untouched.
pub fn capitalize_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Characters that attach to the preceding word in plaintext.
pub const TRAILING_PUNCTUATION: &[char] = &['.', ',', '!', ':', ';', '"'];

pub fn ends_with_trailing_punctuation(word: &str) -> bool {
    word.ends_with(TRAILING_PUNCTUATION)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unescape_named_and_numeric() {
        assert_eq!(unescape_html("Tom &amp; Jerry"), "Tom & Jerry");
        assert_eq!(unescape_html("&eacute;t&eacute;"), "été");
        assert_eq!(unescape_html("it&#39;s"), "it's");
        assert_eq!(unescape_html("&#x41;"), "A");
    }

    #[test]
    fn test_unescape_passthrough() {
        assert!(matches!(unescape_html("plain"), Cow::Borrowed("plain")));
        assert_eq!(unescape_html("a & b"), "a & b");
        assert_eq!(unescape_html("&;"), "&;");
        assert_eq!(unescape_html("&#0;"), "&#0;");
        assert_eq!(unescape_html("&unknown;"), "&unknown;");
    }

    #[test]
    fn test_unescape_around_bare_ampersand() {
        assert_eq!(unescape_html("AT&T &amp; co"), "AT&T & co");
        assert_eq!(unescape_html("Ar&Ge &lt;3"), "Ar&Ge <3");
        assert_eq!(unescape_html("x &#39;y&#39; & z"), "x 'y' & z");
    }

    #[test]
    fn test_unescape_without_semicolon() {
        assert_eq!(unescape_html("&amp"), "&");
        assert_eq!(unescape_html("&ampx"), "&x");
        assert_eq!(unescape_html("it&#39s"), "it's");
        assert_eq!(unescape_html("&eacute"), "&eacute");
    }

    #[test]
    fn test_capitalize_first() {
        assert_eq!(capitalize_first("şehir merkezi"), "Şehir merkezi");
        assert_eq!(capitalize_first("iPhone"), "IPhone");
        assert_eq!(capitalize_first(""), "");
    }

    #[test]
    fn test_trailing_punctuation() {
        assert!(ends_with_trailing_punctuation("morning."));
        assert!(ends_with_trailing_punctuation("\""));
        assert!(!ends_with_trailing_punctuation("morning"));
        assert!(!ends_with_trailing_punctuation(""));
    }
}
