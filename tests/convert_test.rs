//! Behavioral tests for the body conversion pipeline.

use wpmd::{Converter, Dialect, markdownify};

#[test]
fn test_scenario_paragraph_then_code() {
    let input = "<p>Hello <strong>world</strong></p><pre><code>print(1)</code></pre>";
    let out = markdownify(input).unwrap();

    let chunks: Vec<&str> = out.split("\n\n").collect();
    assert_eq!(chunks.len(), 2);
    assert_eq!(chunks[0], "Hello **world**");
    assert_eq!(chunks[1], "```\nprint(1)\n```");
}

#[test]
fn test_tag_conversions() {
    let out = markdownify("<strong>x</strong>").unwrap();
    assert!(out.contains("**x**"));

    let out = markdownify("<a href=\"http://e.com\">t</a>").unwrap();
    assert!(out.contains("[t](http://e.com)"));

    let out = markdownify("<img src=\"/i.png\" alt=\"pic\">").unwrap();
    assert!(out.contains("![pic](/i.png)"));

    let out = markdownify("<h2>Section</h2>").unwrap();
    assert!(out.contains("## Section"));
}

#[test]
fn test_block_fragments_pass_through_byte_exact() {
    for fragment in [
        "<ul>\n<li>one</li>\n<li>two</li>\n</ul>",
        "<ol><li>first</li></ol>",
        "<blockquote>So it goes.</blockquote>",
        "<table><tr><td>cell</td></tr></table>",
    ] {
        let input = format!("<p>before</p>{fragment}<p>after</p>");
        let out = markdownify(&input).unwrap();
        assert!(
            out.contains(fragment),
            "fragment was altered: {fragment:?} not in {out:?}"
        );
    }
}

#[test]
fn test_code_round_trip_is_byte_exact() {
    let code = "def f(x):\n\treturn x < 1 and \"&amp;\" or '**'";
    let input = format!("<p>intro</p><pre>{code}</pre>");

    for dialect in [
        Dialect::Fenced,
        Dialect::Codehilite,
        Dialect::Misaka,
    ] {
        let out = Converter::new(dialect).convert(&input).unwrap();
        assert!(
            out.contains(code),
            "code bytes changed under {dialect:?}: {out:?}"
        );
    }
}

#[test]
fn test_language_hint_reaches_the_fence() {
    let out = markdownify("[sourcecode language=\"Ruby\"]puts 1[/sourcecode]").unwrap();
    assert!(out.contains("```ruby\n"));

    let out = Converter::new(Dialect::Codehilite)
        .convert("<pre lang=\"python\">x</pre>")
        .unwrap();
    assert!(out.contains(":::python\n"));
}

#[test]
fn test_malformed_markup_is_tolerated() {
    // unterminated inline tag
    let out = markdownify("fine <em>and the rest").unwrap();
    assert_eq!(out, "fine <em>and the rest");

    // unterminated code marker
    let out = markdownify("fine [code]no close").unwrap();
    assert_eq!(out, "fine [code]no close");

    // stray close
    let out = markdownify("odd</strong> end").unwrap();
    assert_eq!(out, "odd</strong> end");
}

#[test]
fn test_n_code_blocks_resolve_to_n_fences() {
    let input = "<pre>a</pre><pre>b</pre><pre>c</pre>";
    let out = markdownify(input).unwrap();
    assert_eq!(out.matches("```").count(), 6);
    assert!(!out.contains('\u{1a}'));
}

#[test]
fn test_double_escaped_entities_decode_once() {
    let out = markdownify("<p>tags look like &amp;lt;p&amp;gt;</p>").unwrap();
    assert_eq!(out, "tags look like &lt;p&gt;");
}

#[test]
fn test_entities_inside_code_are_untouched() {
    let out = markdownify("<pre>a &amp; b</pre>").unwrap();
    assert!(out.contains("a &amp; b"));

    let out = markdownify("<p>a &amp; b</p>").unwrap();
    assert_eq!(out, "a & b");
}

#[test]
fn test_wordpress_style_double_newline_paragraphs() {
    // bodies stored with blank lines instead of <p> wrappers
    let out = markdownify("first graf\n\nsecond <em>graf</em>").unwrap();
    assert_eq!(out, "first graf\n\nsecond *graf*");
}

mod properties {
    use proptest::prelude::*;

    proptest! {
        // the pipeline is the identity on markup-free prose
        #[test]
        fn markup_free_prose_is_unchanged(
            text in "[a-zA-Z0-9 .,!?'-]{1,80}(\n\n?[a-zA-Z0-9 .,!?'-]{1,80}){0,3}"
        ) {
            let out = wpmd::markdownify(&text).unwrap();
            prop_assert_eq!(out, text);
        }

        // code bytes survive any dialect
        #[test]
        fn code_survives_extraction(code in "[a-zA-Z0-9 =+(){};\n\t]{0,120}") {
            let input = format!("<pre>{code}</pre>");
            let out = wpmd::markdownify(&input).unwrap();
            prop_assert!(out.contains(code.trim_matches('\n')));
        }
    }
}
