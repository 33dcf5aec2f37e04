// ABOUTME: The cleaning pipeline: parse with fallback, normalize paragraphs, sweep, serialize.
// ABOUTME: Stateless entry points for single strings, raw bytes, and sequential batches.

use crate::error::Warning;
use crate::input::decode_input;
use crate::normalize::{normalize_paragraphs, sweep};
use crate::options::Options;
use crate::parse::parse_with_fallback;
use crate::result::Normalized;
use crate::serialize::{compact_markers, prettify, serialize_fragment};
use crate::stats::Stats;

const TARGET: &str = "gutenclean::pipeline";

/// Inputs with fewer non-whitespace characters than this are reported as trivial.
pub const MIN_MEANINGFUL_LEN: usize = 4;

/// Clean one HTML string.
///
/// Never fails outright: when no parser accepts the input the returned [`Normalized`]
/// carries the original text, no parser, and the error.
pub fn normalize(html: &str, options: &Options) -> Normalized {
    let mut warnings = input_warnings(html);

    let parsed = match parse_with_fallback(html, options.parser) {
        Ok(parsed) => parsed,
        Err(err) => {
            log::warn!(target: TARGET, "{}", err);
            return Normalized::failed(html, err, warnings);
        }
    };
    if let Some(first) = parsed.rejected.first() {
        warnings.push(Warning::ParserFallback {
            from: first.parser,
            to: parsed.parser,
        });
    }

    let mut doc = parsed.document;
    let mut paragraphs = normalize_paragraphs(&mut doc, options);
    let mut swept = sweep(&mut doc, options);
    let mut last_sweep = swept;
    // Removing a container can leave its paragraph empty or wrapping only blocks.
    while last_sweep.empty_blocks_removed > 0 {
        let again = normalize_paragraphs(&mut doc, options);
        if again.changes() == 0 {
            break;
        }
        log::debug!(
            target: TARGET,
            "container removal left {} paragraph change(s)",
            again.changes()
        );
        paragraphs += again;
        last_sweep = sweep(&mut doc, options);
        swept += last_sweep;
    }
    if paragraphs.cap_reached {
        warnings.push(Warning::IterationCapReached {
            cap: options.max_iterations.max(1),
        });
    }

    let mut html = serialize_fragment(&doc, options.strip_document_wrapper);
    if options.pretty_print {
        html = prettify(&html);
    }
    if options.compact_markers {
        html = compact_markers(&html);
    }

    let stats = Stats::collect(options, &paragraphs, &swept);
    log::debug!(
        target: TARGET,
        "{} change(s) in {} pass(es) with {}",
        stats.total_changes(),
        stats.iterations,
        parsed.parser
    );

    Normalized {
        html,
        stats,
        parser: Some(parsed.parser),
        warnings,
        error: None,
    }
}

/// Decode `bytes` (see [`decode_input`]) and clean the result.
pub fn normalize_bytes(bytes: &[u8], charset: Option<&str>, options: &Options) -> Normalized {
    normalize(&decode_input(bytes, charset), options)
}

/// Clean each input in turn with the same options.
pub fn normalize_batch<I, S>(inputs: I, options: &Options) -> Vec<Normalized>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    inputs
        .into_iter()
        .map(|html| normalize(html.as_ref(), options))
        .collect()
}

fn input_warnings(html: &str) -> Vec<Warning> {
    let len = html.chars().filter(|c| !c.is_whitespace()).count();
    if len == 0 {
        log::warn!(target: TARGET, "input is empty");
        vec![Warning::EmptyInput]
    } else if len < MIN_MEANINGFUL_LEN {
        log::warn!(target: TARGET, "input is trivially short ({} characters)", len);
        vec![Warning::TrivialInput { len }]
    } else {
        Vec::new()
    }
}
