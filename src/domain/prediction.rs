use crate::domain::car::FeatureRow;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A served prediction as written to the result store. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionRecord {
    pub id: String,
    pub input: FeatureRow,
    pub prediction: f64,
    pub timestamp: DateTime<Utc>,
}

impl PredictionRecord {
    pub fn new(input: FeatureRow, prediction: f64) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            input,
            prediction,
            timestamp: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_record_serializes_iso_timestamp() {
        let input = FeatureRow::from_json(&json!({
            "Doors": 4, "Year": 2020, "Owner_Count": 1,
            "Brand": "Toyota", "Model": "Corolla", "Fuel_Type": "Petrol",
            "Transmission": "Manual", "Engine_Size": 1.8, "Mileage": 15000
        }))
        .unwrap();
        let record = PredictionRecord::new(input, 12_345.5);

        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["prediction"], json!(12_345.5));
        assert_eq!(value["input"]["Brand"], json!("Toyota"));

        let ts = value["timestamp"].as_str().unwrap();
        assert!(DateTime::parse_from_rfc3339(ts).is_ok());
    }

    #[test]
    fn test_records_get_unique_ids() {
        let input = crate::domain::ml::test_rows::row("BMW", "X5", 2019, 1.0);
        let a = PredictionRecord::new(input.clone(), 1.0);
        let b = PredictionRecord::new(input, 1.0);
        assert_ne!(a.id, b.id);
    }
}
