//! Code block extraction and reinsertion.
//!
//! WordPress bodies mark source code with `<pre>` (optionally carrying a
//! `lang` attribute or a `<code class="language-…">` child) or with
//! highlighting-plugin shortcodes like `[sourcecode language="ruby"]`.
//! These regions are lifted out before any other processing so nothing
//! can mangle indentation or escaping inside code, and reinserted as
//! fenced or indented Markdown at the end.

use memchr::{memchr, memchr2};

use crate::error::{Error, Result};

use super::transform::{attr_value, parse_tag};
use super::{Dialect, PLACEHOLDER_MARK};

/// A source-code region held aside during conversion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeSpan {
    /// Sequential id, assigned in document order starting at 0.
    pub id: usize,
    /// Language hint from the markup, lowercased, if present.
    pub language: Option<String>,
    /// Inner text exactly as found. No entity decoding is applied.
    pub code: String,
}

fn placeholder(id: usize) -> String {
    format!("{PLACEHOLDER_MARK}{id}{PLACEHOLDER_MARK}")
}

/// Replace every recognized code block with a placeholder token.
///
/// Unterminated or ambiguous markers are left as plain text; this
/// function never fails.
pub(crate) fn extract(input: &str) -> (String, Vec<CodeSpan>) {
    let mut out = String::with_capacity(input.len());
    let mut spans: Vec<CodeSpan> = Vec::new();
    let bytes = input.as_bytes();
    let mut i = 0;

    while i < bytes.len() {
        let Some(off) = memchr2(b'<', b'[', &bytes[i..]) else {
            push_text(&mut out, &input[i..]);
            break;
        };
        push_text(&mut out, &input[i..i + off]);
        let start = i + off;

        if let Some(block) = match_code_block(&input[start..]) {
            let id = spans.len();
            out.push_str(&placeholder(id));
            spans.push(CodeSpan {
                id,
                language: block.language,
                code: block.code,
            });
            i = start + block.len;
        } else {
            out.push(bytes[start] as char);
            i = start + 1;
        }
    }

    (out, spans)
}

/// Copy non-code text, dropping any raw marker bytes that could alias a
/// placeholder. XML 1.0 forbids U+001A, so this only fires on input that
/// was already broken.
fn push_text(out: &mut String, text: &str) {
    if text.contains(PLACEHOLDER_MARK) {
        out.extend(text.chars().filter(|&c| c != PLACEHOLDER_MARK));
    } else {
        out.push_str(text);
    }
}

struct CodeBlock {
    language: Option<String>,
    code: String,
    /// Bytes consumed from the start of the match.
    len: usize,
}

fn match_code_block(s: &str) -> Option<CodeBlock> {
    if s.starts_with('<') {
        pre_block(s)
    } else {
        shortcode_block(s, "[code", "[/code]")
            .or_else(|| shortcode_block(s, "[sourcecode", "[/sourcecode]"))
    }
}

/// `<pre>…</pre>`, with the language taken from a `lang` attribute or a
/// single `<code>` child's class.
fn pre_block(s: &str) -> Option<CodeBlock> {
    let tag = parse_tag(s)?;
    if tag.name != "pre" || tag.closing || tag.self_closing {
        return None;
    }

    let body_start = tag.len;
    let (inner_end, close_len) = find_close(&s[body_start..], "pre")?;
    let inner = &s[body_start..body_start + inner_end];

    let (code, inner_lang) = unwrap_code(inner);
    let language = attr_value(tag.attrs, "lang").or(inner_lang);

    Some(CodeBlock {
        language: language.map(|l| l.to_ascii_lowercase()),
        code: code.to_string(),
        len: body_start + inner_end + close_len,
    })
}

/// Strip a lone `<code>` wrapper, returning the inner text and any
/// language hint carried on the wrapper itself.
fn unwrap_code(inner: &str) -> (&str, Option<String>) {
    let lead = inner.len() - inner.trim_start().len();
    let trimmed = &inner[lead..];
    if !trimmed.starts_with('<') {
        return (inner, None);
    }

    let Some(tag) = parse_tag(trimmed) else {
        return (inner, None);
    };
    if tag.name != "code" || tag.closing || tag.self_closing {
        return (inner, None);
    }
    let Some((close_start, close_len)) = find_close(&trimmed[tag.len..], "code") else {
        return (inner, None);
    };

    // anything beyond the wrapper means the pre has more than one child
    let after = &trimmed[tag.len + close_start + close_len..];
    if !after.trim().is_empty() {
        return (inner, None);
    }

    let code = &trimmed[tag.len..tag.len + close_start];
    let language = attr_value(tag.attrs, "lang").or_else(|| {
        let class = attr_value(tag.attrs, "class")?;
        language_from_class(&class).map(str::to_string)
    });

    (code, language)
}

/// `language-rust` / `lang-rust` / `lang:rust` class conventions.
fn language_from_class(class: &str) -> Option<&str> {
    class.split_ascii_whitespace().find_map(|c| {
        c.strip_prefix("language-")
            .or_else(|| c.strip_prefix("lang-"))
            .or_else(|| c.strip_prefix("lang:"))
    })
}

/// `[code lang="x"]…[/code]` and friends.
fn shortcode_block(s: &str, open: &str, close: &str) -> Option<CodeBlock> {
    let rest = s.strip_prefix(open)?;
    let rb = rest.as_bytes();

    let attrs_end = match rb.first() {
        Some(b']') => 0,
        Some(b) if b.is_ascii_whitespace() => memchr(b']', rb)?,
        // e.g. `[codex …` is some other shortcode
        _ => return None,
    };
    let attrs = &rest[..attrs_end];

    let body_start = open.len() + attrs_end + 1;
    let body = &s[body_start..];
    let end = body.find(close)?;

    Some(CodeBlock {
        language: attr_value(attrs, "lang")
            .or_else(|| attr_value(attrs, "language"))
            .map(|l| l.to_ascii_lowercase()),
        code: body[..end].to_string(),
        len: body_start + end + close.len(),
    })
}

/// Find `</name>` (ASCII case-insensitive) in `region`.
/// Returns (offset of `<`, byte length of the close tag).
fn find_close(region: &str, name: &str) -> Option<(usize, usize)> {
    let bytes = region.as_bytes();
    let mut i = 0;

    while i < bytes.len() {
        let off = memchr(b'<', &bytes[i..])?;
        let start = i + off;
        let rb = &bytes[start..];

        if rb.get(1) == Some(&b'/')
            && let Some(n) = rb.get(2..2 + name.len())
            && n.eq_ignore_ascii_case(name.as_bytes())
        {
            // only whitespace may sit between the name and '>'
            let mut j = 2 + name.len();
            while rb.get(j).is_some_and(u8::is_ascii_whitespace) {
                j += 1;
            }
            if rb.get(j) == Some(&b'>') {
                return Some((start, j + 1));
            }
        }

        i = start + 1;
    }

    None
}

/// Replace every placeholder with its rendered code block.
///
/// Replacement is exact one-to-one; any mismatch is reported rather than
/// silently ignored.
pub(crate) fn reinsert(text: &str, spans: &[CodeSpan], dialect: Dialect) -> Result<String> {
    let mut out = text.to_string();

    for span in spans {
        let token = placeholder(span.id);
        match out.matches(&token).count() {
            1 => out = out.replacen(&token, &render_code(span, dialect), 1),
            n => {
                return Err(Error::Placeholder(format!(
                    "placeholder {} occurs {n} times in working text",
                    span.id
                )));
            }
        }
    }

    if out.contains(PLACEHOLDER_MARK) {
        return Err(Error::Placeholder(
            "unresolved placeholder left in output".into(),
        ));
    }

    Ok(out)
}

/// Render one code span per the target dialect.
fn render_code(span: &CodeSpan, dialect: Dialect) -> String {
    // the fence supplies the boundary newlines
    let code = trim_boundary_newlines(&span.code);
    let lang = span.language.as_deref();

    match dialect {
        Dialect::Fenced => {
            let fence = "`".repeat(fence_len(code, '`'));
            match lang {
                Some(lang) => format!("\n{fence}{lang}\n{code}\n{fence}\n"),
                None => format!("\n{fence}\n{code}\n{fence}\n"),
            }
        }
        Dialect::Codehilite => {
            let fence = "~".repeat(fence_len(code, '~'));
            match lang {
                Some(lang) => format!("\n{fence}\n:::{lang}\n{code}\n{fence}\n"),
                None => format!("\n{fence}\n{code}\n{fence}\n"),
            }
        }
        Dialect::Misaka => {
            let fence = "~".repeat(fence_len(code, '~'));
            match lang {
                Some(lang) => format!("\n{fence} {{ {lang} }}\n{code}\n{fence}\n"),
                None => format!("\n{fence}\n{code}\n{fence}\n"),
            }
        }
        Dialect::Indented => {
            let mut block = String::with_capacity(code.len() + 64);
            block.push('\n');
            for line in code.lines() {
                if line.is_empty() {
                    block.push('\n');
                } else {
                    block.push_str("    ");
                    block.push_str(line);
                    block.push('\n');
                }
            }
            block
        }
    }
}

/// One boundary newline on each side belongs to the markup, not the code.
fn trim_boundary_newlines(code: &str) -> &str {
    let code = code
        .strip_prefix("\r\n")
        .or_else(|| code.strip_prefix('\n'))
        .unwrap_or(code);
    code.strip_suffix('\n')
        .map(|c| c.strip_suffix('\r').unwrap_or(c))
        .unwrap_or(code)
}

/// Smallest fence run that does not collide with a run of the fence
/// character inside the code (minimum three).
fn fence_len(content: &str, fence_char: char) -> usize {
    let mut max_run = 0;
    let mut run = 0;

    for c in content.chars() {
        if c == fence_char {
            run += 1;
            max_run = max_run.max(run);
        } else {
            run = 0;
        }
    }

    max_run.max(2) + 1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_pre_with_lang() {
        let (text, spans) = extract("a <pre lang=\"Python\">x = 1</pre> b");
        assert_eq!(text, format!("a {} b", placeholder(0)));
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].language.as_deref(), Some("python"));
        assert_eq!(spans[0].code, "x = 1");
    }

    #[test]
    fn test_extract_pre_code_language_class() {
        let input = "<pre><code class=\"language-rust\">let x = 1;</code></pre>";
        let (_, spans) = extract(input);
        assert_eq!(spans[0].language.as_deref(), Some("rust"));
        assert_eq!(spans[0].code, "let x = 1;");
    }

    #[test]
    fn test_extract_keeps_code_bytes_exact() {
        let input = "<pre>if a &lt; b:\n    print(&quot;hi&quot;)</pre>";
        let (_, spans) = extract(input);
        // entities inside code are not decoded
        assert_eq!(spans[0].code, "if a &lt; b:\n    print(&quot;hi&quot;)");
    }

    #[test]
    fn test_extract_shortcodes() {
        let (text, spans) = extract("[code lang=\"js\"]alert(1)[/code]");
        assert_eq!(text, placeholder(0));
        assert_eq!(spans[0].language.as_deref(), Some("js"));
        assert_eq!(spans[0].code, "alert(1)");

        let (_, spans) = extract("[sourcecode language=\"Ruby\"]puts 1[/sourcecode]");
        assert_eq!(spans[0].language.as_deref(), Some("ruby"));
        assert_eq!(spans[0].code, "puts 1");
    }

    #[test]
    fn test_extract_ids_in_document_order() {
        let (text, spans) = extract("<pre>a</pre>[code]b[/code]<pre>c</pre>");
        assert_eq!(
            text,
            format!("{}{}{}", placeholder(0), placeholder(1), placeholder(2))
        );
        let codes: Vec<&str> = spans.iter().map(|s| s.code.as_str()).collect();
        assert_eq!(codes, vec!["a", "b", "c"]);
        let ids: Vec<usize> = spans.iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![0, 1, 2]);
    }

    #[test]
    fn test_unterminated_markers_stay_as_text() {
        let input = "before <pre>never closed";
        let (text, spans) = extract(input);
        assert_eq!(text, input);
        assert!(spans.is_empty());

        let input = "[code lang=\"js\"]no close";
        let (text, spans) = extract(input);
        assert_eq!(text, input);
        assert!(spans.is_empty());
    }

    #[test]
    fn test_unrelated_brackets_stay_as_text() {
        let input = "arr[0] and [link text] and [codex]";
        let (text, spans) = extract(input);
        assert_eq!(text, input);
        assert!(spans.is_empty());
    }

    #[test]
    fn test_reinsert_round_trip() {
        let input = "<pre lang=\"c\">int main(void) {}</pre>";
        let (text, spans) = extract(input);
        let out = reinsert(&text, &spans, Dialect::Fenced).unwrap();
        assert_eq!(out, "\n```c\nint main(void) {}\n```\n");
    }

    #[test]
    fn test_reinsert_grows_fence_past_content() {
        let span = CodeSpan {
            id: 0,
            language: None,
            code: "```\nnested fence\n```".into(),
        };
        let out = reinsert(&placeholder(0), &[span], Dialect::Fenced).unwrap();
        assert!(out.starts_with("\n````\n"));
        assert!(out.ends_with("\n````\n"));
    }

    #[test]
    fn test_reinsert_missing_placeholder_is_reported() {
        let span = CodeSpan {
            id: 0,
            language: None,
            code: "x".into(),
        };
        let err = reinsert("no token here", &[span], Dialect::Fenced).unwrap_err();
        assert!(matches!(err, Error::Placeholder(_)));
    }

    #[test]
    fn test_reinsert_duplicated_placeholder_is_reported() {
        let span = CodeSpan {
            id: 0,
            language: None,
            code: "x".into(),
        };
        let text = format!("{}{}", placeholder(0), placeholder(0));
        let err = reinsert(&text, &[span], Dialect::Fenced).unwrap_err();
        assert!(matches!(err, Error::Placeholder(_)));
    }

    #[test]
    fn test_indented_dialect() {
        let span = CodeSpan {
            id: 0,
            language: Some("py".into()),
            code: "a\n\nb".into(),
        };
        let out = reinsert(&placeholder(0), &[span], Dialect::Indented).unwrap();
        assert_eq!(out, "\n    a\n\n    b\n");
    }

    #[test]
    fn test_raw_marker_bytes_cannot_alias_placeholders() {
        let input = format!("junk {} here <pre>x</pre>", placeholder(0));
        let (text, spans) = extract(&input);
        assert_eq!(spans.len(), 1);
        assert_eq!(text.matches(&placeholder(0)).count(), 1);
    }
}
