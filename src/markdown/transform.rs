//! Single-pass HTML-to-Markdown tag conversion.
//!
//! Not an HTML parser: a left-to-right scan that rewrites the handful of
//! inline and heading tags WordPress bodies actually use, and copies
//! every other element through verbatim. Markdown renderers accept raw
//! HTML, so lists, blockquotes, and tables stay exactly as exported —
//! converting them would only risk corrupting structure.
//!
//! Handlers for recognized tags recurse into their immediate inline
//! content; an open tag with no matching close demotes the rest of its
//! region to plain text instead of failing.

use memchr::memchr;

/// Inline nesting limit; deeper structures pass through raw.
const MAX_DEPTH: usize = 16;

/// Rewrite recognized tags to Markdown. Identity on text containing no
/// recognized markup.
pub(crate) fn transform(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    render(input, &mut out, 0);
    out
}

fn render(input: &str, out: &mut String, depth: usize) {
    let bytes = input.as_bytes();
    let mut i = 0;

    while i < bytes.len() {
        let Some(off) = memchr(b'<', &bytes[i..]) else {
            out.push_str(&input[i..]);
            return;
        };
        out.push_str(&input[i..i + off]);
        let start = i + off;

        let Some(tag) = parse_tag(&input[start..]) else {
            // not a tag; a lone '<' is ordinary text
            out.push('<');
            i = start + 1;
            continue;
        };
        let after = start + tag.len;

        if tag.closing {
            // paragraph wrappers become blank-line boundaries; any other
            // close tag reaching here had no open and passes through
            if tag.name == "p" {
                out.push('\n');
            } else {
                out.push_str(&input[start..after]);
            }
            i = after;
            continue;
        }

        i = match tag.name.as_str() {
            "p" => {
                out.push('\n');
                after
            }
            "em" | "i" => emphasis(input, start, &tag, "*", out, depth),
            "strong" | "b" => emphasis(input, start, &tag, "**", out, depth),
            "a" => link(input, start, &tag, out, depth),
            "img" => {
                image(&tag, out);
                after
            }
            "code" => inline_code(input, start, &tag, out),
            "h1" => heading(input, start, &tag, 1, out, depth),
            "h2" => heading(input, start, &tag, 2, out, depth),
            "h3" => heading(input, start, &tag, 3, out, depth),
            "h4" => heading(input, start, &tag, 4, out, depth),
            "h5" => heading(input, start, &tag, 5, out, depth),
            "h6" => heading(input, start, &tag, 6, out, depth),
            // lists, blockquotes, tables, and anything unrecognized
            _ => passthrough(input, start, &tag, out),
        };
    }
}

/// `<em>`/`<i>`/`<strong>`/`<b>` → emphasis markers around the converted
/// inline content.
fn emphasis(
    input: &str,
    start: usize,
    tag: &RawTag,
    mark: &str,
    out: &mut String,
    depth: usize,
) -> usize {
    let after = start + tag.len;
    if tag.self_closing || depth >= MAX_DEPTH {
        out.push_str(&input[start..after]);
        return after;
    }
    let Some((close_start, close_end)) = find_matching_close(&input[after..], &tag.name) else {
        // unterminated: the rest of the region is plain text
        out.push_str(&input[start..]);
        return input.len();
    };

    let mut inner = String::with_capacity(close_start);
    render(&input[after..after + close_start], &mut inner, depth + 1);
    push_wrapped(out, &inner, mark);

    after + close_end
}

/// Wrap content in emphasis markers, keeping surrounding whitespace
/// outside the markers (Markdown is pickier about this than HTML) and
/// dropping markers entirely around empty content.
fn push_wrapped(out: &mut String, content: &str, mark: &str) {
    let trimmed = content.trim();
    if trimmed.is_empty() {
        out.push_str(content);
        return;
    }

    let lead = content.len() - content.trim_start().len();
    let trail = content.len() - content.trim_end().len();
    out.push_str(&content[..lead]);
    out.push_str(mark);
    out.push_str(trimmed);
    out.push_str(mark);
    out.push_str(&content[content.len() - trail..]);
}

/// `<a href="U" title="T">text</a>` → `[text](U "T")`.
fn link(input: &str, start: usize, tag: &RawTag, out: &mut String, depth: usize) -> usize {
    let after = start + tag.len;
    if tag.self_closing || depth >= MAX_DEPTH {
        out.push_str(&input[start..after]);
        return after;
    }
    let Some((close_start, close_end)) = find_matching_close(&input[after..], "a") else {
        out.push_str(&input[start..]);
        return input.len();
    };

    let mut text = String::with_capacity(close_start);
    render(&input[after..after + close_start], &mut text, depth + 1);

    out.push('[');
    out.push_str(text.trim());
    out.push_str("](");
    out.push_str(&attr_value(tag.attrs, "href").unwrap_or_default());
    if let Some(title) = attr_value(tag.attrs, "title")
        && !title.is_empty()
    {
        out.push_str(" \"");
        out.push_str(&title);
        out.push('"');
    }
    out.push(')');

    after + close_end
}

/// `<img src="U" alt="A">` → `![A](U)`.
fn image(tag: &RawTag, out: &mut String) {
    out.push_str("![");
    out.push_str(&attr_value(tag.attrs, "alt").unwrap_or_default());
    out.push_str("](");
    out.push_str(&attr_value(tag.attrs, "src").unwrap_or_default());
    out.push(')');
}

/// Inline `<code>` → backtick span. Content is copied byte-exact; the
/// tick run grows past any backticks inside.
fn inline_code(input: &str, start: usize, tag: &RawTag, out: &mut String) -> usize {
    let after = start + tag.len;
    if tag.self_closing {
        out.push_str(&input[start..after]);
        return after;
    }
    let Some((close_start, close_end)) = find_matching_close(&input[after..], "code") else {
        out.push_str(&input[start..]);
        return input.len();
    };

    let code = &input[after..after + close_start];
    let ticks = "`".repeat(inline_ticks(code));
    out.push_str(&ticks);
    out.push_str(code);
    out.push_str(&ticks);

    after + close_end
}

/// Smallest backtick run that does not collide with the content.
fn inline_ticks(content: &str) -> usize {
    let mut max_run = 0;
    let mut run = 0;

    for c in content.chars() {
        if c == '`' {
            run += 1;
            max_run = max_run.max(run);
        } else {
            run = 0;
        }
    }

    max_run + 1
}

/// `<h1>`..`<h6>` → `#`-prefixed line on its own paragraph.
fn heading(
    input: &str,
    start: usize,
    tag: &RawTag,
    level: usize,
    out: &mut String,
    depth: usize,
) -> usize {
    let after = start + tag.len;
    if tag.self_closing || depth >= MAX_DEPTH {
        out.push_str(&input[start..after]);
        return after;
    }
    let Some((close_start, close_end)) = find_matching_close(&input[after..], &tag.name) else {
        out.push_str(&input[start..]);
        return input.len();
    };

    let mut inner = String::with_capacity(close_start);
    render(&input[after..after + close_start], &mut inner, depth + 1);

    out.push_str("\n\n");
    for _ in 0..level {
        out.push('#');
    }
    out.push(' ');
    out.push_str(inner.trim());
    out.push_str("\n\n");

    after + close_end
}

/// Copy an element through verbatim: the tag itself and, when a matching
/// close tag exists, everything up to and including it. Void and
/// unclosed tags pass through alone.
fn passthrough(input: &str, start: usize, tag: &RawTag, out: &mut String) -> usize {
    let after = start + tag.len;

    if !tag.self_closing
        && let Some((_, close_end)) = find_matching_close(&input[after..], &tag.name)
    {
        out.push_str(&input[start..after + close_end]);
        return after + close_end;
    }

    out.push_str(&input[start..after]);
    after
}

/// A raw tag at the head of a slice: `<name attrs>`, `</name>`, or
/// `<name attrs/>`.
pub(crate) struct RawTag<'a> {
    /// Lowercased tag name.
    pub(crate) name: String,
    /// Raw attribute region, whitespace-trimmed.
    pub(crate) attrs: &'a str,
    /// Total bytes from `<` through `>`.
    pub(crate) len: usize,
    pub(crate) closing: bool,
    pub(crate) self_closing: bool,
}

/// Parse the tag starting at `s` (which begins with `<`). Returns `None`
/// for anything that is not a plausible tag — comments, doctypes, a bare
/// `<`, or a tag whose `>` never arrives.
pub(crate) fn parse_tag(s: &str) -> Option<RawTag<'_>> {
    let bytes = s.as_bytes();
    debug_assert_eq!(bytes.first(), Some(&b'<'));

    let closing = bytes.get(1) == Some(&b'/');
    let name_start = if closing { 2 } else { 1 };

    let mut i = name_start;
    while i < bytes.len() && bytes[i].is_ascii_alphanumeric() {
        i += 1;
    }
    if i == name_start || !bytes[name_start].is_ascii_alphabetic() {
        return None;
    }
    let name = s[name_start..i].to_ascii_lowercase();

    match bytes.get(i) {
        Some(b'>') | Some(b'/') => {}
        Some(b) if b.is_ascii_whitespace() => {}
        _ => return None,
    }

    let attrs_start = i;
    let mut quote: Option<u8> = None;
    while i < bytes.len() {
        let b = bytes[i];
        match quote {
            Some(q) if b == q => quote = None,
            Some(_) => {}
            None if b == b'"' || b == b'\'' => quote = Some(b),
            None if b == b'>' => {
                let mut attrs_end = i;
                let mut self_closing = false;
                if attrs_end > attrs_start && bytes[attrs_end - 1] == b'/' {
                    self_closing = true;
                    attrs_end -= 1;
                }
                return Some(RawTag {
                    name,
                    attrs: s[attrs_start..attrs_end].trim(),
                    len: i + 1,
                    closing,
                    self_closing,
                });
            }
            None => {}
        }
        i += 1;
    }

    None
}

/// Find the close tag matching `name` in `region`, accounting for nested
/// same-name elements. Returns (close tag start, end after close).
fn find_matching_close(region: &str, name: &str) -> Option<(usize, usize)> {
    let bytes = region.as_bytes();
    let mut i = 0;
    let mut depth = 0usize;

    while i < bytes.len() {
        let off = memchr(b'<', &bytes[i..])?;
        let start = i + off;
        let Some(tag) = parse_tag(&region[start..]) else {
            i = start + 1;
            continue;
        };
        if tag.name == name {
            if tag.closing {
                if depth == 0 {
                    return Some((start, start + tag.len));
                }
                depth -= 1;
            } else if !tag.self_closing {
                depth += 1;
            }
        }
        i = start + tag.len;
    }

    None
}

/// Pull a named attribute value out of a raw attribute region. Handles
/// `name="value"`, `name='value'`, and bare `name=value`.
pub(crate) fn attr_value(attrs: &str, name: &str) -> Option<String> {
    let bytes = attrs.as_bytes();
    let mut i = 0;

    while i < bytes.len() {
        if !is_name_byte(bytes[i]) {
            i += 1;
            continue;
        }
        let key_start = i;
        while i < bytes.len() && is_name_byte(bytes[i]) {
            i += 1;
        }
        let key = &attrs[key_start..i];

        while i < bytes.len() && bytes[i].is_ascii_whitespace() {
            i += 1;
        }
        if bytes.get(i) != Some(&b'=') {
            continue; // bare attribute with no value
        }
        i += 1;
        while i < bytes.len() && bytes[i].is_ascii_whitespace() {
            i += 1;
        }

        let value = match bytes.get(i) {
            Some(&q) if q == b'"' || q == b'\'' => {
                i += 1;
                let val_start = i;
                while i < bytes.len() && bytes[i] != q {
                    i += 1;
                }
                let v = &attrs[val_start..i];
                if i < bytes.len() {
                    i += 1; // closing quote
                }
                v
            }
            _ => {
                let val_start = i;
                while i < bytes.len() && !bytes[i].is_ascii_whitespace() {
                    i += 1;
                }
                &attrs[val_start..i]
            }
        };

        if key.eq_ignore_ascii_case(name) {
            return Some(value.to_string());
        }
    }

    None
}

fn is_name_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'-' || b == b'_' || b == b':'
}
