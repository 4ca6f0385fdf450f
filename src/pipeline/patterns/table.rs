//! Ordered candidate patterns per blood parameter.
//!
//! Each parameter lists its patterns from the most specific (full label,
//! abbreviation in parentheses) to the most general (bare name followed by
//! a number). The first pattern that yields a number wins. Extend the
//! table to teach the extractor new report layouts; the matching logic in
//! `values.rs` never needs to change.
//!
//! Placeholders expanded at compile time:
//! - `{sep}`: optional `:`/`=`/`-` separator, any whitespace incl. newlines
//! - `{num}`: the captured value, plain (`11.2`) or thousands-grouped
//!   (`150,000`). Never starts inside a word, so `A1c` does not yield `1`.
//! - `{note}`: optional parenthesised qualifier on one line, e.g. `(Fasting)`

use std::sync::LazyLock;

use regex::{Regex, RegexBuilder};

const SEP: &str = r"\s*[:=\-]?\s*";
const NUM: &str = r"\b(?P<value>\d{1,3}(?:,\d{3})+(?:\.\d+)?|\d+(?:\.\d+)?)";
const NOTE: &str = r"(?:\s*\([^)\n]*\))?";

/// Candidate patterns for one parameter.
pub struct ParameterPatterns {
    pub parameter: &'static str,
    pub patterns: &'static [&'static str],
    /// Words that disqualify a match when they appear on the matched line
    /// up to the end of the match (e.g. `corpuscular` for hemoglobin,
    /// which would otherwise pick up MCH rows).
    pub exclude: &'static [&'static str],
}

pub static VALUE_PATTERNS: &[ParameterPatterns] = &[
    // ── Complete blood count ─────────────────────────────────
    ParameterPatterns {
        parameter: "hemoglobin",
        patterns: &[
            r"\bHa?emoglobin\s*\(\s*Hb\s*\){sep}{num}",
            r"\bHa?emoglobin\b{sep}{num}",
            r"\bHa?emoglobin\b[^\n\d]{0,40}?{num}",
            r"\bHb\b{sep}{num}",
        ],
        exclude: &["corpuscular", "glycated", "glycosylated", "a1c", "mean cell"],
    },
    ParameterPatterns {
        parameter: "white_blood_cells",
        patterns: &[
            r"\bTotal\s+(?:WBC|Leu[ck]ocyte)\s+Count{sep}{num}",
            r"\b(?:WBC|TLC)\b(?:\s+Count)?{sep}{num}",
            r"\bWhite\s+Blood\s+Cells?\b(?:\s+Count)?{sep}{num}",
            r"\bWhite\s+Blood\s+Cells?\b[^\n\d]{0,30}?{num}",
            r"\bWBC\b[^\n\d]{0,30}?{num}",
        ],
        exclude: &["absolute"],
    },
    ParameterPatterns {
        parameter: "red_blood_cells",
        patterns: &[
            r"\bTotal\s+RBC\s+Count{sep}{num}",
            r"\bRBC\b(?:\s+Count)?{sep}{num}",
            r"\bRed\s+Blood\s+Cells?\b(?:\s+Count)?{sep}{num}",
            r"\bRed\s+Blood\s+Cells?\b[^\n\d]{0,30}?{num}",
            r"\bRBC\b[^\n\d]{0,30}?{num}",
        ],
        exclude: &["nucleated"],
    },
    ParameterPatterns {
        parameter: "platelets",
        patterns: &[
            r"\bPlatelet\s+Count{sep}{num}",
            r"\bPlatelets?\b{sep}{num}",
            r"\bPlatelets?\b[^\n\d]{0,30}?{num}",
            r"\bPLT\b[^\n\d]{0,30}?{num}",
        ],
        exclude: &["volume", "distribution", "mpv", "pdw"],
    },
    ParameterPatterns {
        parameter: "hematocrit",
        patterns: &[
            r"\bPacked\s+Cell\s+Volume\s*\(\s*PCV\s*\){sep}{num}",
            r"\b(?:PCV|HCT)\b{sep}{num}",
            r"\bHa?ematocrit\b{sep}{num}",
            r"\bHa?ematocrit\b[^\n\d]{0,30}?{num}",
            r"\bPCV\b[^\n\d]{0,30}?{num}",
        ],
        exclude: &[],
    },
    // ── Blood indices ────────────────────────────────────────
    ParameterPatterns {
        parameter: "mcv",
        patterns: &[
            r"\bMean\s+Corpuscular\s+Volume\s*\(\s*MCV\s*\){sep}{num}",
            r"\bMCV\b{sep}{num}",
            r"\bMCV\b[^\n\d]{0,30}?{num}",
            r"\bMean\s+Corpuscular\s+Volume\b[^\n\d]{0,30}?{num}",
        ],
        exclude: &[],
    },
    ParameterPatterns {
        parameter: "mch",
        patterns: &[
            r"\bMean\s+Corpuscular\s+Ha?emoglobin\s*\(\s*MCH\s*\){sep}{num}",
            r"\bMCH\b{sep}{num}",
            r"\bMean\s+Corpuscular\s+Ha?emoglobin{sep}{num}",
        ],
        exclude: &[],
    },
    ParameterPatterns {
        parameter: "mchc",
        patterns: &[
            r"\bMean\s+Corpuscular\s+Ha?emoglobin\s+Concentration\s*\(\s*MCHC\s*\){sep}{num}",
            r"\bMCHC\b{sep}{num}",
            r"\bMean\s+Corpuscular\s+Ha?emoglobin\s+Concentration{sep}{num}",
        ],
        exclude: &[],
    },
    ParameterPatterns {
        parameter: "rdw",
        patterns: &[
            r"\bRed\s+Cell\s+Distribution\s+Width\s*\(\s*RDW(?:\s*-\s*CV)?\s*\){sep}{num}",
            r"\bRDW(?:\s*-\s*CV)?\b{sep}{num}",
            r"\bRed\s+Cell\s+Distribution\s+Width{sep}{num}",
        ],
        exclude: &["sd"],
    },
    // ── Differential count ───────────────────────────────────
    ParameterPatterns {
        parameter: "neutrophils",
        patterns: &[r"\bNeutrophils?\b{sep}{num}", r"\bNeutrophils?\b[^\n\d]{0,30}?{num}"],
        exclude: &["absolute"],
    },
    ParameterPatterns {
        parameter: "lymphocytes",
        patterns: &[r"\bLymphocytes?\b{sep}{num}", r"\bLymphocytes?\b[^\n\d]{0,30}?{num}"],
        exclude: &["absolute"],
    },
    ParameterPatterns {
        parameter: "eosinophils",
        patterns: &[r"\bEosinophils?\b{sep}{num}", r"\bEosinophils?\b[^\n\d]{0,30}?{num}"],
        exclude: &["absolute"],
    },
    ParameterPatterns {
        parameter: "monocytes",
        patterns: &[r"\bMonocytes?\b{sep}{num}", r"\bMonocytes?\b[^\n\d]{0,30}?{num}"],
        exclude: &["absolute"],
    },
    ParameterPatterns {
        parameter: "basophils",
        patterns: &[r"\bBasophils?\b{sep}{num}", r"\bBasophils?\b[^\n\d]{0,30}?{num}"],
        exclude: &["absolute"],
    },
    // ── Metabolic and lipid panels ───────────────────────────
    ParameterPatterns {
        parameter: "glucose",
        patterns: &[
            r"\b(?:Fasting\s+(?:Blood\s+|Plasma\s+)?(?:Glucose|Sugar)|FBS|FBG){note}{sep}{num}",
            r"\b(?:Blood\s+|Plasma\s+)?Glucose\b{note}{sep}{num}",
            r"\bBlood\s+Sugar\b{note}{sep}{num}",
            r"\bBlood\s+Sugar\b[^\n\d]{0,30}?{num}",
        ],
        exclude: &["urine"],
    },
    ParameterPatterns {
        parameter: "cholesterol",
        patterns: &[
            r"\bTotal\s+Cholesterol\b{note}{sep}{num}",
            r"\bCholesterol,?\s+Total\b{note}{sep}{num}",
            r"\bCholesterol\b{note}{sep}{num}",
            r"\bCholesterol\b[^\n\d]{0,30}?{num}",
        ],
        exclude: &["hdl", "ldl", "ratio"],
    },
    ParameterPatterns {
        parameter: "hdl",
        patterns: &[
            r"\bHDL\b(?:\s*-?\s*C(?:holesterol)?\b)?{note}{sep}{num}",
            r"\bHigh\s+Density\s+Lipoprotein\b[^\n\d]{0,30}?{num}",
        ],
        exclude: &["non-hdl", "non hdl", "ratio"],
    },
    ParameterPatterns {
        parameter: "ldl",
        patterns: &[
            r"\bLDL\b(?:\s*-?\s*C(?:holesterol)?\b)?{note}{sep}{num}",
            r"\bLow\s+Density\s+Lipoprotein\b[^\n\d]{0,30}?{num}",
        ],
        exclude: &["ratio"],
    },
    ParameterPatterns {
        parameter: "triglycerides",
        patterns: &[
            r"\bTriglycerides?\b{note}{sep}{num}",
            r"\bTriglycerides?\b[^\n\d]{0,30}?{num}",
            r"\bTG\b{sep}{num}",
        ],
        exclude: &[],
    },
    ParameterPatterns {
        parameter: "creatinine",
        patterns: &[
            r"\bSerum\s+Creatinine\b{note}{sep}{num}",
            r"\bCreatinine\b{note}{sep}{num}",
            r"\bCreatinine\b[^\n\d]{0,30}?{num}",
        ],
        exclude: &["clearance", "kinase", "ratio", "urine"],
    },
    ParameterPatterns {
        parameter: "urea",
        patterns: &[
            r"\b(?:BUN|Blood\s+Urea\s+Nitrogen)\b{note}{sep}{num}",
            r"\b(?:Blood\s+|Serum\s+)?Urea\b{note}{sep}{num}",
        ],
        exclude: &["ratio", "urine"],
    },
    // ── Diabetes, thyroid, vitamins ──────────────────────────
    ParameterPatterns {
        parameter: "hba1c",
        patterns: &[
            r"\bGlyc(?:ated|osylated)\s+Ha?emoglobin\b(?:\s*\(\s*HbA1c\s*\))?[^\n\d]{0,30}?{num}",
            r"\bHbA1c\b{note}{sep}{num}",
            r"\bA1c\b[^\n\d]{0,30}?{num}",
        ],
        exclude: &[],
    },
    ParameterPatterns {
        parameter: "tsh",
        patterns: &[
            r"\bTSH\b{note}{sep}{num}",
            r"\bThyroid\s+Stimulating\s+Hormone\b[^\n\d]{0,30}?{num}",
        ],
        exclude: &[],
    },
    ParameterPatterns {
        parameter: "vitamin_d",
        patterns: &[
            r"\b25\s*-?\s*(?:OH|Hydroxy)\s+Vitamin\s+D[23]?\b{note}{sep}{num}",
            r"\bVitamin\s+D,?\s*25\s*-?\s*(?:OH|Hydroxy)\b{note}{sep}{num}",
            r"\bVitamin\s+D[23]?\b{note}{sep}{num}",
        ],
        exclude: &[],
    },
    ParameterPatterns {
        parameter: "vitamin_b12",
        patterns: &[
            r"\bVitamin\s+B\s*-?\s*12\b{note}{sep}{num}",
            r"\bCobalamin\b[^\n\d]{0,30}?{num}",
        ],
        exclude: &[],
    },
];

/// A parameter's patterns, compiled.
pub struct CompiledParameter {
    pub parameter: &'static str,
    pub patterns: Vec<Regex>,
    pub exclude: &'static [&'static str],
}

/// Expand placeholders and compile case-insensitively. Panics on an
/// invalid pattern: the table is static, so that is a programming error
/// caught by the table tests.
pub fn compile(pattern: &str) -> Regex {
    let expanded = pattern
        .replace("{sep}", SEP)
        .replace("{num}", NUM)
        .replace("{note}", NOTE);
    RegexBuilder::new(&expanded)
        .case_insensitive(true)
        .multi_line(true)
        .build()
        .expect("Invalid extraction pattern")
}

pub static COMPILED_VALUE_PATTERNS: LazyLock<Vec<CompiledParameter>> = LazyLock::new(|| {
    VALUE_PATTERNS
        .iter()
        .map(|entry| CompiledParameter {
            parameter: entry.parameter,
            patterns: entry.patterns.iter().map(|p| compile(p)).collect(),
            exclude: entry.exclude,
        })
        .collect()
});
