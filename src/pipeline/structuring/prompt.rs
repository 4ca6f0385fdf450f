use crate::pipeline::patterns::table::VALUE_PATTERNS;

pub const EXTRACTION_SYSTEM_PROMPT: &str = r#"
You are a medical data extraction assistant. You read blood test reports
and return the values they contain as JSON.

RULES:
1. Extract ONLY values explicitly printed in the report.
2. NEVER interpret, diagnose, or advise.
3. Use null for anything not present. Do not guess.
4. Numbers must be plain JSON numbers, without units or thousands separators.
5. Respond with the JSON object only. No text before or after it.
"#;

/// Build the extraction instruction for one report's text.
pub fn build_extraction_prompt(report_text: &str) -> String {
    let parameters = VALUE_PATTERNS
        .iter()
        .map(|p| format!("    \"{}\": number_or_null", p.parameter))
        .collect::<Vec<_>>()
        .join(",\n");

    format!(
        r#"<report>
{report_text}
</report>

Extract the blood test values and patient details from the report above.
Return JSON in exactly this shape:
{{
  "blood_values": {{
{parameters}
  }},
  "patient_info": {{
    "name": "string_or_null",
    "age": number_or_null,
    "gender": "male | female | null",
    "test_date": "string_or_null",
    "patient_id": "string_or_null",
    "lab_name": "string_or_null"
  }},
  "units": {{"parameter": "unit as printed"}},
  "reference_ranges": {{"parameter": "range as printed"}}
}}"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_embeds_report_and_schema() {
        let prompt = build_extraction_prompt("Hemoglobin 13.5 g/dL");
        assert!(prompt.contains("<report>\nHemoglobin 13.5 g/dL\n</report>"));
        assert!(prompt.contains("\"blood_values\""));
        assert!(prompt.contains("\"platelets\": number_or_null"));
        assert!(prompt.contains("\"reference_ranges\""));
    }

    #[test]
    fn prompt_lists_every_extracted_parameter() {
        let prompt = build_extraction_prompt("");
        for entry in VALUE_PATTERNS {
            assert!(prompt.contains(&format!("\"{}\"", entry.parameter)));
        }
    }
}
