//! Reading and writing of flat `key=value` properties documents.
//!
//! Follows the line format of `java.util.Properties`: `#`/`!` comments,
//! `=`, `:` or whitespace separators, backslash line continuations, and the
//! `\:`, `\=`, `\t`, `\uXXXX` escapes.

use std::collections::BTreeMap;

const WHITESPACE: [char; 3] = [' ', '\t', '\x0c'];

/// Parse a properties document. Duplicate keys: last one wins.
pub fn parse(text: &str) -> BTreeMap<String, String> {
    logical_lines(text)
        .iter()
        .map(|line| {
            let (key, value) = split_entry(line);
            (unescape(key), unescape(value))
        })
        .collect()
}

/// Render a properties document, one comment line per `comments` entry
/// followed by the entries in iteration order.
pub fn render<'a>(
    comments: &[String],
    entries: impl IntoIterator<Item = (&'a str, &'a str)>,
) -> String {
    let mut out = String::new();
    for comment in comments {
        out.push('#');
        out.push_str(comment);
        out.push('\n');
    }
    for (key, value) in entries {
        out.push_str(&escape(key, true));
        out.push('=');
        out.push_str(&escape(value, false));
        out.push('\n');
    }
    out
}

fn logical_lines(text: &str) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut continuing = false;

    for raw in text.lines() {
        let trimmed = raw.trim_start_matches(WHITESPACE);
        if !continuing && (trimmed.is_empty() || trimmed.starts_with(['#', '!'])) {
            continue;
        }

        let trailing = trimmed.chars().rev().take_while(|c| *c == '\\').count();
        if trailing % 2 == 1 {
            current.push_str(&trimmed[..trimmed.len() - 1]);
            continuing = true;
        } else {
            current.push_str(trimmed);
            continuing = false;
            lines.push(std::mem::take(&mut current));
        }
    }

    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

fn split_entry(line: &str) -> (&str, &str) {
    let mut escaped = false;
    let mut key_end = line.len();
    let mut explicit_separator = false;

    for (i, c) in line.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '\\' => escaped = true,
            '=' | ':' => {
                key_end = i;
                explicit_separator = true;
                break;
            }
            ' ' | '\t' | '\x0c' => {
                key_end = i;
                break;
            }
            _ => {}
        }
    }

    let key = &line[..key_end];
    let mut rest = &line[key_end..];
    if explicit_separator {
        rest = rest[1..].trim_start_matches(WHITESPACE);
    } else {
        rest = rest.trim_start_matches(WHITESPACE);
        if let Some(stripped) = rest.strip_prefix(['=', ':']) {
            rest = stripped.trim_start_matches(WHITESPACE);
        }
    }
    (key, rest)
}

fn unescape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();

    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('t') => out.push('\t'),
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('f') => out.push('\x0c'),
            Some('u') => match take_utf16_unit(&mut chars) {
                Some(unit) => {
                    let mut units = vec![unit];
                    if (0xD800..=0xDBFF).contains(&unit) {
                        // a supplementary character is written as a surrogate pair
                        let mut lookahead = chars.clone();
                        if lookahead.next() == Some('\\') && lookahead.next() == Some('u') {
                            if let Some(low) = take_utf16_unit(&mut lookahead)
                                .filter(|low| (0xDC00..=0xDFFF).contains(low))
                            {
                                units.push(low);
                                chars = lookahead;
                            }
                        }
                    }
                    out.extend(
                        char::decode_utf16(units)
                            .map(|r| r.unwrap_or(char::REPLACEMENT_CHARACTER)),
                    );
                }
                None => out.push('u'),
            },
            Some(other) => out.push(other),
            None => {}
        }
    }
    out
}

/// Consume four hex digits as one UTF-16 code unit; leaves `chars` alone
/// if they are not there.
fn take_utf16_unit(chars: &mut std::str::Chars<'_>) -> Option<u16> {
    let hex: String = chars.clone().take(4).collect();
    if hex.len() != 4 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let unit = u16::from_str_radix(&hex, 16).ok()?;
    chars.nth(3);
    Some(unit)
}

fn escape(raw: &str, is_key: bool) -> String {
    let mut out = String::with_capacity(raw.len() + 8);
    for (i, c) in raw.chars().enumerate() {
        match c {
            ' ' if is_key || i == 0 => out.push_str("\\ "),
            '\\' => out.push_str("\\\\"),
            '\t' => out.push_str("\\t"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\x0c' => out.push_str("\\f"),
            '=' | ':' | '#' | '!' => {
                out.push('\\');
                out.push(c);
            }
            c if (c as u32) < 0x20 || (c as u32) > 0x7e => {
                let mut buf = [0u16; 2];
                for unit in c.encode_utf16(&mut buf) {
                    out.push_str(&format!("\\u{:04X}", unit));
                }
            }
            c => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_escaped_coordinate() {
        let props = parse("deployment-artifact=io.acme\\:foo-deployment\\:1.0\n");
        assert_eq!(
            props.get("deployment-artifact").map(String::as_str),
            Some("io.acme:foo-deployment:1.0")
        );
    }

    #[test]
    fn test_parse_separators_and_comments() {
        let text = "# generated\n! also a comment\n\na = 1\nb:2\nc 3\n  d=\n";
        let props = parse(text);
        assert_eq!(props.len(), 4);
        assert_eq!(props["a"], "1");
        assert_eq!(props["b"], "2");
        assert_eq!(props["c"], "3");
        assert_eq!(props["d"], "");
    }

    #[test]
    fn test_parse_continuation_lines() {
        let props = parse("key=first \\\n    second\nother=x\\\\\n");
        assert_eq!(props["key"], "first second");
        assert_eq!(props["other"], "x\\");
    }

    #[test]
    fn test_parse_unicode_escape() {
        let props = parse("name=caf\\u00E9\n");
        assert_eq!(props["name"], "café");
    }

    #[test]
    fn test_render_escapes_separators() {
        let text = render(
            &["fingerprint=00".to_string()],
            [("g:ext:1.0", "g:ext-deployment:1.0")],
        );
        assert_eq!(
            text,
            "#fingerprint=00\ng\\:ext\\:1.0=g\\:ext-deployment\\:1.0\n"
        );
        let back = parse(&text);
        assert_eq!(back["g:ext:1.0"], "g:ext-deployment:1.0");
    }

    #[test]
    fn test_supplementary_characters_round_trip() {
        let text = render(&[], [("k", "a\u{1F600}b")]);
        assert_eq!(text, "k=a\\uD83D\\uDE00b\n");
        assert_eq!(parse(&text)["k"], "a\u{1F600}b");
    }

    #[test]
    fn test_unpaired_surrogate_is_replaced() {
        let parsed = parse("hi=\\uD83Dx\nlo=\\uDE00\n");
        assert_eq!(parsed["hi"], "\u{FFFD}x");
        assert_eq!(parsed["lo"], "\u{FFFD}");
    }
}
