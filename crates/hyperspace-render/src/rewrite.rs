//! String-level HTML rewriting
//!
//! Fetched markup is frequently malformed, so nothing here parses it. All
//! matching is ASCII case-insensitive on a lowercased copy that keeps the
//! original byte offsets.

/// Rewrite `attr="/path"` (or single-quoted) to `attr="{origin}/path"`.
/// Protocol-relative values (`//host/...`) are left alone.
pub(crate) fn absolutize_attr(html: &str, attr: &str, origin: &str) -> String {
    let needle = format!("{}=", attr.to_ascii_lowercase());
    let lower = html.to_ascii_lowercase();
    let mut out = String::with_capacity(html.len());
    let mut pos = 0;

    while let Some(found) = lower[pos..].find(&needle) {
        let value_start = pos + found + needle.len();
        let quoted = match html.as_bytes().get(value_start) {
            Some(&quote @ (b'"' | b'\'')) => {
                let quote = quote as char;
                let rest = &html[value_start + 1..];
                if rest.starts_with('/') && !rest.starts_with("//") {
                    rest.find(quote).map(|len| (quote, len))
                } else {
                    None
                }
            }
            _ => None,
        };

        match quoted {
            Some((quote, len)) => {
                let path = &html[value_start + 1..value_start + 1 + len];
                out.push_str(&html[pos..value_start]);
                out.push(quote);
                out.push_str(origin);
                out.push_str(path);
                out.push(quote);
                pos = value_start + len + 2;
            }
            None => {
                out.push_str(&html[pos..value_start]);
                pos = value_start;
            }
        }
    }

    out.push_str(&html[pos..]);
    out
}

/// Byte offset just past the opening `<tag ...>`, if present.
pub(crate) fn open_tag_end(html: &str, tag: &str) -> Option<usize> {
    let needle = format!("<{}", tag.to_ascii_lowercase());
    let lower = html.to_ascii_lowercase();
    let mut pos = 0;

    while let Some(found) = lower[pos..].find(&needle) {
        let after_name = pos + found + needle.len();
        match lower.as_bytes().get(after_name) {
            // `<head>` / `<head lang=..>`, but not `<header>`
            Some(b'>') => return Some(after_name + 1),
            Some(b) if b.is_ascii_whitespace() => {
                return lower[after_name..].find('>').map(|end| after_name + end + 1);
            }
            Some(_) => pos = after_name,
            None => return None,
        }
    }

    None
}

/// Insert `fragment` right after the opening `<tag>`, or prepend it when the
/// tag is missing.
pub(crate) fn insert_after_open_tag(html: &str, tag: &str, fragment: &str) -> String {
    match open_tag_end(html, tag) {
        Some(at) => {
            let mut out = String::with_capacity(html.len() + fragment.len());
            out.push_str(&html[..at]);
            out.push_str(fragment);
            out.push_str(&html[at..]);
            out
        }
        None => format!("{}{}", fragment, html),
    }
}

pub(crate) fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}
