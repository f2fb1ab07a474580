//! Car listing types shared by the split, training and prediction stages.
//!
//! Field names follow the raw dataset headers (`Doors`, `Engine_Size`, ...)
//! so the same structs read CSV files and JSON requests.

use crate::domain::errors::{EncodingError, ValidationError};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashSet;

/// How a feature column is encoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeatureKind {
    Ordinal,
    Categorical,
    Numeric,
}

impl FeatureKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FeatureKind::Ordinal => "ordinal",
            FeatureKind::Categorical => "categorical",
            FeatureKind::Numeric => "numeric",
        }
    }
}

/// Every field of a [`FeatureRow`] with its kind, in request order.
pub const FEATURE_FIELDS: &[(&str, FeatureKind)] = &[
    ("Doors", FeatureKind::Ordinal),
    ("Year", FeatureKind::Ordinal),
    ("Owner_Count", FeatureKind::Ordinal),
    ("Brand", FeatureKind::Categorical),
    ("Model", FeatureKind::Categorical),
    ("Fuel_Type", FeatureKind::Categorical),
    ("Transmission", FeatureKind::Categorical),
    ("Engine_Size", FeatureKind::Numeric),
    ("Mileage", FeatureKind::Numeric),
];

/// Looks up the kind of a feature column by name.
pub fn feature_kind(name: &str) -> Option<FeatureKind> {
    FEATURE_FIELDS
        .iter()
        .find(|(field, _)| *field == name)
        .map(|(_, kind)| *kind)
}

/// One raw car description as sent to the predictor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureRow {
    #[serde(rename = "Doors")]
    pub doors: i64,
    #[serde(rename = "Year")]
    pub year: i64,
    #[serde(rename = "Owner_Count")]
    pub owner_count: i64,
    #[serde(rename = "Brand")]
    pub brand: String,
    #[serde(rename = "Model")]
    pub model: String,
    #[serde(rename = "Fuel_Type")]
    pub fuel_type: String,
    #[serde(rename = "Transmission")]
    pub transmission: String,
    #[serde(rename = "Engine_Size")]
    pub engine_size: f64,
    #[serde(rename = "Mileage")]
    pub mileage: f64,
}

impl FeatureRow {
    /// Validates an untyped JSON object field by field.
    ///
    /// Every field is checked before a row is built, so a malformed request
    /// never reaches the encoder. Unknown keys are ignored.
    pub fn from_json(value: &Value) -> Result<Self, ValidationError> {
        let object = value.as_object().ok_or(ValidationError::NotAnObject)?;

        Ok(Self {
            doors: integer_field(object, "Doors")?,
            year: integer_field(object, "Year")?,
            owner_count: integer_field(object, "Owner_Count")?,
            brand: text_field(object, "Brand")?,
            model: text_field(object, "Model")?,
            fuel_type: text_field(object, "Fuel_Type")?,
            transmission: text_field(object, "Transmission")?,
            engine_size: number_field(object, "Engine_Size")?,
            mileage: number_field(object, "Mileage")?,
        })
    }

    pub fn ordinal(&self, column: &str) -> Option<i64> {
        match column {
            "Doors" => Some(self.doors),
            "Year" => Some(self.year),
            "Owner_Count" => Some(self.owner_count),
            _ => None,
        }
    }

    pub fn categorical(&self, column: &str) -> Option<&str> {
        match column {
            "Brand" => Some(&self.brand),
            "Model" => Some(&self.model),
            "Fuel_Type" => Some(&self.fuel_type),
            "Transmission" => Some(&self.transmission),
            _ => None,
        }
    }

    pub fn numeric(&self, column: &str) -> Option<f64> {
        match column {
            "Engine_Size" => Some(self.engine_size),
            "Mileage" => Some(self.mileage),
            _ => None,
        }
    }
}

fn required<'a>(object: &'a Map<String, Value>, field: &'static str) -> Result<&'a Value, ValidationError> {
    match object.get(field) {
        Some(Value::Null) | None => Err(ValidationError::MissingField { field }),
        Some(value) => Ok(value),
    }
}

fn integer_field(object: &Map<String, Value>, field: &'static str) -> Result<i64, ValidationError> {
    let value = required(object, field)?;
    if let Some(v) = value.as_i64() {
        return Ok(v);
    }
    // Accept 4.0 but not 4.5
    match value.as_f64() {
        Some(v) if v.fract() == 0.0 && v.abs() < i64::MAX as f64 => Ok(v as i64),
        _ => Err(ValidationError::InvalidType {
            field,
            expected: "an integer",
        }),
    }
}

fn text_field(object: &Map<String, Value>, field: &'static str) -> Result<String, ValidationError> {
    required(object, field)?
        .as_str()
        .map(str::to_string)
        .ok_or(ValidationError::InvalidType {
            field,
            expected: "a string",
        })
}

fn number_field(object: &Map<String, Value>, field: &'static str) -> Result<f64, ValidationError> {
    let v = required(object, field)?
        .as_f64()
        .ok_or(ValidationError::InvalidType {
            field,
            expected: "a number",
        })?;
    if !v.is_finite() {
        return Err(ValidationError::NonFinite { field });
    }
    Ok(v)
}

/// A listing row from the raw, train or test CSV: features plus the target price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CarListing {
    #[serde(rename = "Brand")]
    pub brand: String,
    #[serde(rename = "Model")]
    pub model: String,
    #[serde(rename = "Year")]
    pub year: i64,
    #[serde(rename = "Engine_Size")]
    pub engine_size: f64,
    #[serde(rename = "Fuel_Type")]
    pub fuel_type: String,
    #[serde(rename = "Transmission")]
    pub transmission: String,
    #[serde(rename = "Mileage")]
    pub mileage: f64,
    #[serde(rename = "Doors")]
    pub doors: i64,
    #[serde(rename = "Owner_Count")]
    pub owner_count: i64,
    #[serde(rename = "Price")]
    pub price: f64,
}

impl CarListing {
    pub fn from_parts(row: FeatureRow, price: f64) -> Self {
        Self {
            brand: row.brand,
            model: row.model,
            year: row.year,
            engine_size: row.engine_size,
            fuel_type: row.fuel_type,
            transmission: row.transmission,
            mileage: row.mileage,
            doors: row.doors,
            owner_count: row.owner_count,
            price,
        }
    }

    pub fn features(&self) -> FeatureRow {
        FeatureRow {
            doors: self.doors,
            year: self.year,
            owner_count: self.owner_count,
            brand: self.brand.clone(),
            model: self.model.clone(),
            fuel_type: self.fuel_type.clone(),
            transmission: self.transmission.clone(),
            engine_size: self.engine_size,
            mileage: self.mileage,
        }
    }
}

/// Which columns feed each encoding step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnSpec {
    pub ordinal: Vec<String>,
    pub categorical: Vec<String>,
    pub numeric: Vec<String>,
}

impl Default for ColumnSpec {
    fn default() -> Self {
        let of_kind = |kind: FeatureKind| {
            FEATURE_FIELDS
                .iter()
                .filter(|(_, k)| *k == kind)
                .map(|(name, _)| name.to_string())
                .collect()
        };
        Self {
            ordinal: of_kind(FeatureKind::Ordinal),
            categorical: of_kind(FeatureKind::Categorical),
            numeric: of_kind(FeatureKind::Numeric),
        }
    }
}

impl ColumnSpec {
    /// Checks that every listed column exists, has the matching kind and appears once.
    pub fn validate(&self) -> Result<(), EncodingError> {
        let mut seen = HashSet::new();
        let groups = [
            (&self.ordinal, FeatureKind::Ordinal),
            (&self.categorical, FeatureKind::Categorical),
            (&self.numeric, FeatureKind::Numeric),
        ];

        for (columns, expected) in groups {
            for column in columns {
                let kind = feature_kind(column).ok_or_else(|| EncodingError::UnknownColumn {
                    column: column.clone(),
                })?;
                if kind != expected {
                    return Err(EncodingError::WrongKind {
                        column: column.clone(),
                        expected: expected.as_str(),
                    });
                }
                if !seen.insert(column.as_str()) {
                    return Err(EncodingError::DuplicateColumn {
                        column: column.clone(),
                    });
                }
            }
        }
        Ok(())
    }
}
