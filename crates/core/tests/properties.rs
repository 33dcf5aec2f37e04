// ABOUTME: Property tests over generated editor-style markup: idempotence, convergence, structure.
// ABOUTME: Inputs mix paragraphs, block containers, raw text, references, markers, and blank text.

use gutenclean_core::dom::predicates::{is_truly_empty, wraps_blocks_only};
use gutenclean_core::parse::lenient;
use gutenclean_core::{normalize, MarkerPolicy, Options, ParserKind, Warning};
use proptest::prelude::*;

fn leaf() -> impl Strategy<Value = String> {
    prop_oneof![
        "[a-z]{1,6}( [a-z]{1,6})?",
        prop::sample::select(vec![
            " ", "\n", "&nbsp;", "\u{a0}", "<br>", "<img src=\"a.png\">", "<hr>",
            "<!-- wp:paragraph -->", "<!-- /wp:paragraph -->", "<!--  wp:group {\"x\":1}  -->",
            "<!-- /wp:group -->", "<!-- note -->", "caf&eacute;", "&trade; AT&T",
            "<noscript><img src=\"a.png\"></noscript>", "<pre>\n\ncode</pre>",
        ])
        .prop_map(str::to_string),
    ]
}

fn fragment() -> impl Strategy<Value = String> {
    let elements = prop::sample::select(vec![
        ("p", "p"),
        ("p", "p"),
        ("div", "div"),
        ("span", "span"),
        ("b", "b"),
        ("h2", "h2"),
        ("pre", "pre"),
        ("ul", "ul"),
        ("li", "li"),
        ("div class=\"wp-block-group\"", "div"),
        ("span class=\"wp-block-spacer\"", "span"),
    ]);
    leaf().prop_recursive(5, 64, 4, move |inner| {
        (elements.clone(), prop::collection::vec(inner, 0..4)).prop_map(
            |((open, close), children)| format!("<{}>{}</{}>", open, children.concat(), close),
        )
    })
}

fn document() -> impl Strategy<Value = String> {
    prop::collection::vec(fragment(), 0..6).prop_map(|parts| parts.concat())
}

fn option_sets() -> Vec<Options> {
    let lenient = || Options::builder().prefer_parser(ParserKind::Lenient);
    vec![
        Options::default(),
        Options::builder().extract_markers(true).deep_empty_check(true).build(),
        lenient().build(),
        lenient().strip_block_markers(false).build(),
        lenient().extract_markers(true).strip_block_markers(false).build(),
        lenient().deep_empty_check(true).build(),
        lenient().remove_empty(false).build(),
        lenient().unwrap_block_wrapped_paragraphs(false).build(),
        lenient().marker_policy(MarkerPolicy::EmptyRegions).build(),
    ]
}

/// Re-parse `html` and check the invariants every output must satisfy.
fn check_structure(html: &str, options: &Options) -> Result<(), TestCaseError> {
    let doc = lenient::parse(html)
        .map_err(|e| TestCaseError::fail(format!("output does not re-parse: {}", e)))?;
    for p in doc.elements_named("p") {
        prop_assert!(
            !doc.has_descendant_named(p, "p"),
            "nested paragraph in {:?}",
            html
        );
        if options.unwrap_block_wrapped_paragraphs {
            prop_assert!(
                !wraps_blocks_only(&doc, p),
                "block-wrapping paragraph in {:?}",
                html
            );
        }
        if options.remove_empty {
            prop_assert!(!is_truly_empty(&doc, p), "empty paragraph in {:?}", html);
        }
    }
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn prop_second_run_changes_nothing(
        html in document(),
        options in prop::sample::select(option_sets()),
    ) {
        let first = normalize(&html, &options);
        prop_assert!(first.is_ok());

        let second = normalize(&first.html, &options);
        prop_assert!(second.is_ok());
        prop_assert_eq!(&second.html, &first.html);
        prop_assert_eq!(second.stats.total_changes(), 0, "stats: {:?}", second.stats);
    }

    #[test]
    fn prop_output_has_no_illegal_paragraphs(
        html in document(),
        options in prop::sample::select(option_sets()),
    ) {
        let result = normalize(&html, &options);
        prop_assert!(result.is_ok());
        check_structure(&result.html, &options)?;
    }

    #[test]
    fn prop_html5ever_output_has_no_illegal_paragraphs(html in document()) {
        let options = Options::default();
        let result = normalize(&html, &options);
        prop_assert!(result.is_ok());
        prop_assert_eq!(result.parser, Some(ParserKind::Html5ever));
        check_structure(&result.html, &options)?;
    }

    #[test]
    fn prop_converges_well_below_cap(
        html in document(),
        options in prop::sample::select(option_sets()),
    ) {
        let result = normalize(&html, &options);
        prop_assert!(result.stats.iterations < 50);
        prop_assert!(!result
            .warnings
            .iter()
            .any(|w| matches!(w, Warning::IterationCapReached { .. })), "iteration cap reached");
    }

    #[test]
    fn prop_strip_all_leaves_no_markers(html in document()) {
        let result = normalize(&html, &Options::default());
        prop_assert!(!result.html.contains("wp:"), "markers left in {:?}", result.html);
    }
}
