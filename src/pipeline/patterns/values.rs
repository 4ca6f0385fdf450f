use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::{Regex, RegexBuilder};

use super::table::{CompiledParameter, COMPILED_VALUE_PATTERNS};
use crate::pipeline::types::ParameterReading;

/// How far before a match (on the same line) exclusion words are looked for.
const EXCLUSION_LOOKBEHIND: usize = 24;

/// Unit token printed right after a value: `%`, `fL`, `pg`, or anything
/// with a slash whose denominator starts with a letter (`mg/dL`, `/cumm`,
/// `10^3/uL`). Ranges like `12/15` are not units.
static UNIT_AFTER_VALUE: LazyLock<Regex> = LazyLock::new(|| {
    RegexBuilder::new(
        r"^[ \t]*(?P<unit>%|(?:[a-zµμ0-9^*.]+)?[ \t]?/[ \t]?[a-zµμ][a-zµμ0-9^*.]*|fl\b|pg\b|mill(?:ion)?/cumm)",
    )
    .case_insensitive(true)
    .build()
    .expect("Invalid unit pattern")
});

/// Extract every recognised parameter as `name -> value`.
pub fn parse_values(text: &str) -> BTreeMap<String, f64> {
    parse_readings(text)
        .into_iter()
        .map(|r| (r.name, r.value))
        .collect()
}

/// Extract every recognised parameter with the unit printed next to it.
/// Readings come out in table order, at most one per parameter.
pub fn parse_readings(text: &str) -> Vec<ParameterReading> {
    COMPILED_VALUE_PATTERNS
        .iter()
        .filter_map(|entry| find_reading(text, entry))
        .collect()
}

/// Try the parameter's patterns in order. The first pattern producing a
/// number outside an excluded context wins.
fn find_reading(text: &str, entry: &CompiledParameter) -> Option<ParameterReading> {
    'patterns: for (index, regex) in entry.patterns.iter().enumerate() {
        for caps in regex.captures_iter(text) {
            let (Some(whole), Some(value_match)) = (caps.get(0), caps.name("value")) else {
                continue;
            };
            if is_excluded(text, whole.start(), whole.end(), entry.exclude) {
                continue;
            }

            let raw = value_match.as_str().replace(',', "");
            let value = match raw.parse::<f64>() {
                Ok(v) if v.is_finite() => v,
                _ => {
                    tracing::debug!(
                        parameter = entry.parameter,
                        raw = %raw,
                        "Matched text is not a number, trying next pattern"
                    );
                    continue 'patterns;
                }
            };

            tracing::debug!(
                parameter = entry.parameter,
                value,
                pattern_index = index,
                "Pattern matched"
            );
            return Some(ParameterReading {
                name: entry.parameter.to_string(),
                value,
                unit: unit_after(&text[value_match.end()..]),
            });
        }
    }
    None
}

/// True if an exclusion word appears as a whole word between the
/// lookbehind start (bounded by line start) and the end of the match.
fn is_excluded(text: &str, start: usize, end: usize, exclude: &[&str]) -> bool {
    if exclude.is_empty() {
        return false;
    }
    let line_start = text[..start].rfind('\n').map(|i| i + 1).unwrap_or(0);
    let mut window_start = start.saturating_sub(EXCLUSION_LOOKBEHIND).max(line_start);
    while !text.is_char_boundary(window_start) {
        window_start += 1;
    }
    let window = text[window_start..end].to_lowercase();
    exclude.iter().any(|word| contains_word(&window, word))
}

fn contains_word(haystack: &str, word: &str) -> bool {
    haystack.match_indices(word).any(|(i, _)| {
        let before = haystack[..i].chars().next_back();
        let after = haystack[i + word.len()..].chars().next();
        !before.is_some_and(|c| c.is_alphanumeric()) && !after.is_some_and(|c| c.is_alphanumeric())
    })
}

fn unit_after(rest: &str) -> Option<String> {
    UNIT_AFTER_VALUE
        .captures(rest)
        .and_then(|caps| caps.name("unit"))
        .map(|m| m.as_str().split_whitespace().collect::<String>())
        .filter(|u| !u.is_empty())
}
