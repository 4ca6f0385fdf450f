use serde::Serialize;

/// Descriptive metadata for a blood parameter.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParameterInfo {
    pub full_name: String,
    pub abbreviation: String,
    pub unit: String,
    pub description: String,
    pub low_causes: Vec<String>,
    pub high_causes: Vec<String>,
}

impl ParameterInfo {
    /// Fallback descriptor for parameters without curated metadata.
    pub fn generic(parameter: &str) -> Self {
        Self {
            full_name: title_case(parameter),
            abbreviation: parameter.to_uppercase(),
            unit: "Various".into(),
            description: "Blood parameter".into(),
            low_causes: vec!["Various medical conditions".into()],
            high_causes: vec!["Various medical conditions".into()],
        }
    }
}

impl From<&InfoEntry> for ParameterInfo {
    fn from(entry: &InfoEntry) -> Self {
        let owned = |items: &[&str]| -> Vec<String> { items.iter().map(|s| s.to_string()).collect() };
        Self {
            full_name: entry.full_name.into(),
            abbreviation: entry.abbreviation.into(),
            unit: entry.unit.into(),
            description: entry.description.into(),
            low_causes: owned(entry.low_causes),
            high_causes: owned(entry.high_causes),
        }
    }
}

/// `white_blood_cells` -> `White Blood Cells`
fn title_case(parameter: &str) -> String {
    parameter
        .split('_')
        .filter(|w| !w.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

#[derive(Debug)]
pub struct InfoEntry {
    pub parameter: &'static str,
    pub full_name: &'static str,
    pub abbreviation: &'static str,
    pub unit: &'static str,
    pub description: &'static str,
    pub low_causes: &'static [&'static str],
    pub high_causes: &'static [&'static str],
}

pub static PARAMETER_INFO: &[InfoEntry] = &[
    InfoEntry {
        parameter: "hemoglobin",
        full_name: "Hemoglobin",
        abbreviation: "Hb",
        unit: "g/dL",
        description: "Protein in red blood cells that carries oxygen",
        low_causes: &["Iron deficiency", "Chronic disease", "Blood loss"],
        high_causes: &["Dehydration", "Smoking", "Living at high altitude"],
    },
    InfoEntry {
        parameter: "white_blood_cells",
        full_name: "White Blood Cells",
        abbreviation: "WBC",
        unit: "/µL",
        description: "Cells that fight infection and disease",
        low_causes: &["Viral infections", "Autoimmune disorders", "Medications"],
        high_causes: &["Bacterial infections", "Stress", "Inflammatory conditions"],
    },
    InfoEntry {
        parameter: "red_blood_cells",
        full_name: "Red Blood Cells",
        abbreviation: "RBC",
        unit: "mill/cumm",
        description: "Cells that carry oxygen throughout the body",
        low_causes: &["Anemia", "Blood loss", "Nutritional deficiency"],
        high_causes: &["Dehydration", "Smoking", "High altitude"],
    },
    InfoEntry {
        parameter: "platelets",
        full_name: "Platelets",
        abbreviation: "PLT",
        unit: "/µL",
        description: "Blood cells that help with clotting",
        low_causes: &["Bone marrow disorders", "Medications", "Autoimmune conditions"],
        high_causes: &["Inflammation", "Cancer", "Blood disorders"],
    },
    InfoEntry {
        parameter: "hematocrit",
        full_name: "Hematocrit/Packed Cell Volume",
        abbreviation: "HCT/PCV",
        unit: "%",
        description: "Percentage of blood volume made up of red blood cells",
        low_causes: &["Anemia", "Blood loss", "Overhydration"],
        high_causes: &["Dehydration", "Polycythemia", "Smoking"],
    },
    InfoEntry {
        parameter: "mcv",
        full_name: "Mean Corpuscular Volume",
        abbreviation: "MCV",
        unit: "fL",
        description: "Average size of red blood cells",
        low_causes: &["Iron deficiency", "Thalassemia"],
        high_causes: &["Vitamin B12/folate deficiency", "Alcohol use"],
    },
    InfoEntry {
        parameter: "mch",
        full_name: "Mean Corpuscular Hemoglobin",
        abbreviation: "MCH",
        unit: "pg",
        description: "Average amount of hemoglobin in each red blood cell",
        low_causes: &["Iron deficiency", "Thalassemia"],
        high_causes: &["Vitamin B12/folate deficiency", "Liver disease"],
    },
    InfoEntry {
        parameter: "mchc",
        full_name: "Mean Corpuscular Hemoglobin Concentration",
        abbreviation: "MCHC",
        unit: "g/dL",
        description: "Concentration of hemoglobin in red blood cells",
        low_causes: &["Iron deficiency", "Chronic disease"],
        high_causes: &["Hereditary spherocytosis", "Dehydration"],
    },
    InfoEntry {
        parameter: "rdw",
        full_name: "Red Cell Distribution Width",
        abbreviation: "RDW",
        unit: "%",
        description: "Variation in size of red blood cells",
        low_causes: &["Usually normal"],
        high_causes: &["Iron deficiency", "Vitamin deficiencies", "Mixed anemias"],
    },
    InfoEntry {
        parameter: "neutrophils",
        full_name: "Neutrophils",
        abbreviation: "NEUT",
        unit: "%",
        description: "Most common type of white blood cell, fights bacterial infections",
        low_causes: &["Viral infections", "Chemotherapy", "Autoimmune disorders"],
        high_causes: &["Bacterial infections", "Stress", "Inflammation"],
    },
    InfoEntry {
        parameter: "lymphocytes",
        full_name: "Lymphocytes",
        abbreviation: "LYMPH",
        unit: "%",
        description: "White blood cells that fight viral infections and make antibodies",
        low_causes: &["Immunodeficiency", "Stress", "Steroids"],
        high_causes: &["Viral infections", "Leukemia", "Lymphoma"],
    },
    InfoEntry {
        parameter: "eosinophils",
        full_name: "Eosinophils",
        abbreviation: "EOS",
        unit: "%",
        description: "White blood cells that fight parasites and allergic reactions",
        low_causes: &["Usually normal when low"],
        high_causes: &["Allergies", "Parasitic infections", "Asthma"],
    },
    InfoEntry {
        parameter: "monocytes",
        full_name: "Monocytes",
        abbreviation: "MONO",
        unit: "%",
        description: "White blood cells that become macrophages and fight infections",
        low_causes: &["Usually normal when low"],
        high_causes: &["Chronic infections", "Autoimmune disorders", "Blood cancers"],
    },
    InfoEntry {
        parameter: "basophils",
        full_name: "Basophils",
        abbreviation: "BASO",
        unit: "%",
        description: "White blood cells involved in allergic reactions",
        low_causes: &["Usually normal when low"],
        high_causes: &["Allergic reactions", "Blood disorders", "Infections"],
    },
    InfoEntry {
        parameter: "glucose",
        full_name: "Blood Glucose",
        abbreviation: "GLU",
        unit: "mg/dL",
        description: "Amount of sugar in blood",
        low_causes: &["Medication side effects", "Excessive exercise", "Poor nutrition"],
        high_causes: &["Diabetes", "Stress", "Certain medications"],
    },
    InfoEntry {
        parameter: "cholesterol",
        full_name: "Total Cholesterol",
        abbreviation: "CHOL",
        unit: "mg/dL",
        description: "Total amount of cholesterol in blood",
        low_causes: &["Malnutrition", "Liver disease", "Hyperthyroidism"],
        high_causes: &["Poor diet", "Genetics", "Sedentary lifestyle"],
    },
];

/// Panels used to group parameters in summaries. Members are canonical
/// parameter names.
pub static PANELS: &[(&str, &[&str])] = &[
    (
        "complete_blood_count",
        &[
            "hemoglobin",
            "hematocrit",
            "white_blood_cells",
            "red_blood_cells",
            "platelets",
            "mcv",
            "mch",
            "mchc",
            "rdw",
            "neutrophils",
            "lymphocytes",
            "eosinophils",
            "monocytes",
            "basophils",
        ],
    ),
    (
        "basic_metabolic",
        &["glucose", "sodium", "potassium", "chloride", "calcium", "urea", "creatinine"],
    ),
    ("lipid_panel", &["cholesterol", "hdl", "ldl", "triglycerides"]),
    (
        "liver_function",
        &["alt", "ast", "bilirubin", "albumin", "alkaline_phosphatase", "total_protein", "globulin"],
    ),
    ("diabetes", &["hba1c", "fasting_insulin"]),
    ("thyroid_function", &["tsh", "t3", "t4"]),
    ("cardiac_markers", &["troponin", "ck_mb"]),
    ("inflammatory_markers", &["esr", "crp"]),
    (
        "vitamins_minerals",
        &["vitamin_d", "vitamin_b12", "folate", "iron", "ferritin", "magnesium"],
    ),
];

/// Panel a parameter belongs to, or `"other"`.
pub fn category(parameter: &str) -> &'static str {
    let parameter = parameter.to_lowercase();
    PANELS
        .iter()
        .find(|(_, members)| members.contains(&parameter.as_str()))
        .map(|(panel, _)| *panel)
        .unwrap_or("other")
}
