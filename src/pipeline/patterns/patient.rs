use std::sync::LazyLock;

use regex::Regex;

use super::table::compile;
use crate::models::enums::Gender;
use crate::pipeline::types::PatientInfo;

/// Dates delimited by `-` or `/`, day/month first or ISO.
const DATE: &str = r"\d{4}-\d{1,2}-\d{1,2}|\d{1,2}[-/]\d{1,2}[-/]\d{2,4}";

/// Words that end a captured name when a report packs several labels on
/// one line (`Name: Jane Doe Age: 34`).
const LABEL_WORDS: &[&str] = &[
    "age", "sex", "gender", "dob", "date", "id", "uhid", "mrn", "lab", "ref", "referred", "sample",
];

const HONORIFICS: &[&str] = &["mr", "mrs", "ms", "miss", "dr"];

fn candidates(patterns: &[&str]) -> Vec<Regex> {
    patterns
        .iter()
        .map(|p| compile(&p.replace("{date}", DATE)))
        .collect()
}

static AGE_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    candidates(&[
        r"\bage\b\s*(?:/\s*(?:sex|gender)\b)?\s*[:\-]?[ \t]*(?P<v>\d{1,3})\b",
        r"\b(?P<v>\d{1,3})\s*years?\s*old\b",
        r"\b(?P<v>\d{1,3})\s*(?:yrs?|years?)\b",
    ])
});

static GENDER_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    candidates(&[
        r"\b(?:gender|sex)\b\s*[:\-]?[ \t]*(?P<v>female|male|f|m)\b",
        r"\b\d{1,3}\s*(?:y|yrs?|years?)?\s*/\s*(?P<v>female|male|f|m)\b",
        r"\b(?P<v>female|male)\b",
    ])
});

static NAME_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    candidates(&[
        r"\bpatient(?:'s)?\s+name\b\s*[:\-]?[ \t]*(?P<v>[a-z][a-z .']{1,60})",
        r"^[ \t]*name\b\s*[:\-]?[ \t]*(?P<v>[a-z][a-z .']{1,60})",
        r"\b(?:mr|mrs|ms|miss)\.?[ \t]+(?P<v>[a-z][a-z .']{1,60})",
    ])
});

static DATE_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    candidates(&[
        r"\bdate\b[^\d\n]{0,20}(?P<v>{date})\b",
        r"\b(?:collected|reported|received)\s+on\b[^\d\n]{0,10}(?P<v>{date})\b",
        r"\b(?P<v>{date})\b",
    ])
});

static PATIENT_ID_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    candidates(&[
        r"\b(?:patient\s*id|uhid|mrn)\b\.?\s*[:\-#]?[ \t]*(?P<v>[a-z0-9][a-z0-9\-/]{1,30})",
        r"\b(?:lab|sample|reg(?:istration)?)\.?\s*(?:no|number|id)\b\.?\s*[:\-#]?[ \t]*(?P<v>[a-z0-9][a-z0-9\-/]{1,30})",
    ])
});

static LAB_NAME_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    candidates(&[
        r"\b(?:lab(?:oratory)?\s*name|lab)\s*:[ \t]*(?P<v>[a-z][a-z &.,'\-]{2,60})",
        r"^[ \t]*(?P<v>[a-z][a-z &.,'\-]{1,60}\b(?:laboratory|laboratories|diagnostics|labs|pathology)\b)",
    ])
});

/// First candidate pattern producing an accepted value wins.
fn first_accepted<T>(
    patterns: &[Regex],
    text: &str,
    accept: impl Fn(&str) -> Option<T>,
) -> Option<T> {
    patterns.iter().find_map(|regex| {
        regex
            .captures_iter(text)
            .find_map(|caps| caps.name("v").and_then(|m| accept(m.as_str())))
    })
}

/// Pull whatever patient details the report states. Absent fields stay `None`.
pub fn extract_patient_info(text: &str) -> PatientInfo {
    let info = PatientInfo {
        name: first_accepted(&NAME_PATTERNS, text, clean_name),
        age: first_accepted(&AGE_PATTERNS, text, |v| v.parse::<u32>().ok().filter(|a| *a <= 130)),
        gender: first_accepted(&GENDER_PATTERNS, text, Gender::parse_loose),
        test_date: first_accepted(&DATE_PATTERNS, text, |v| Some(v.to_string())),
        patient_id: first_accepted(&PATIENT_ID_PATTERNS, text, |v| {
            let id = v.trim_end_matches(['-', '/']);
            id.chars().any(|c| c.is_ascii_digit()).then(|| id.to_string())
        }),
        lab_name: first_accepted(&LAB_NAME_PATTERNS, text, clean_lab_name),
    };

    tracing::debug!(
        has_name = info.name.is_some(),
        has_age = info.age.is_some(),
        gender = ?info.gender,
        has_date = info.test_date.is_some(),
        "Patient info extracted"
    );
    info
}

/// Cut at a column gap or the next label, drop a leading honorific,
/// then require 2+ letters.
fn clean_name(raw: &str) -> Option<String> {
    let column = raw.split("  ").next().unwrap_or_default();
    let mut words: Vec<&str> = Vec::new();
    for word in column.split_whitespace() {
        let bare = word.trim_matches(|c: char| !c.is_alphanumeric()).to_lowercase();
        if LABEL_WORDS.contains(&bare.as_str()) {
            break;
        }
        if words.is_empty() && HONORIFICS.contains(&bare.as_str()) {
            continue;
        }
        words.push(word);
    }
    let name = words.join(" ");
    let name = name.trim_matches(|c: char| c == '.' || c.is_whitespace());
    let letters = name.chars().filter(|c| c.is_alphabetic()).count();
    (letters >= 2).then(|| name.to_string())
}

fn clean_lab_name(raw: &str) -> Option<String> {
    let name = raw
        .split("  ")
        .next()
        .unwrap_or_default()
        .trim_matches(|c: char| matches!(c, ',' | '-' | '.') || c.is_whitespace());
    (name.len() >= 3).then(|| name.to_string())
}
