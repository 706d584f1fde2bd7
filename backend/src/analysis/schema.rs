use serde_json::{Value, json};

/// Field names every model response must carry.
pub const REQUIRED_FIELDS: [&str; 6] = [
    "shouldGetFacial",
    "urgencyScore",
    "skinConcerns",
    "reasoning",
    "recommendedTreatment",
    "homeCareTips",
];

/// Structured-output schema sent with every analysis request.
pub fn skin_analysis_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "shouldGetFacial": { "type": "BOOLEAN" },
            "urgencyScore": {
                "type": "INTEGER",
                "description": "1-10 score of how much the skin needs professional attention"
            },
            "skinConcerns": {
                "type": "ARRAY",
                "items": { "type": "STRING" },
                "description": "Identified visible skin issues"
            },
            "reasoning": {
                "type": "STRING",
                "description": "Detailed explanation of the findings"
            },
            "recommendedTreatment": {
                "type": "STRING",
                "description": "Type of facial suggested (e.g., Hydrating, Deep Cleansing, Chemical Peel)"
            },
            "homeCareTips": {
                "type": "ARRAY",
                "items": { "type": "STRING" },
                "description": "Actionable advice for home maintenance"
            }
        },
        "required": REQUIRED_FIELDS,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::SkinAnalysis;

    #[test]
    fn every_required_field_is_described() {
        let schema = skin_analysis_schema();
        let properties = schema["properties"].as_object().unwrap();
        assert_eq!(properties.len(), REQUIRED_FIELDS.len());
        for field in REQUIRED_FIELDS {
            assert!(properties.contains_key(field), "{field} missing");
        }
        assert_eq!(schema["required"].as_array().unwrap().len(), 6);
    }

    #[test]
    fn schema_fields_match_the_wire_type() {
        let analysis = SkinAnalysis {
            should_get_facial: false,
            urgency_score: 2,
            skin_concerns: vec![],
            reasoning: String::new(),
            recommended_treatment: String::new(),
            home_care_tips: vec![],
        };
        let wire = serde_json::to_value(analysis).unwrap();
        let mut keys: Vec<&str> = wire.as_object().unwrap().keys().map(String::as_str).collect();
        keys.sort_unstable();
        let mut expected = REQUIRED_FIELDS.to_vec();
        expected.sort_unstable();
        assert_eq!(keys, expected);
    }
}
