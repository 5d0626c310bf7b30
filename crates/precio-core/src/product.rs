use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;
use serde_json::{Map, Number, Value};
use thiserror::Error;

/// Field names of the persisted document layout. Every product document is a
/// flat mapping of these names to scalar values.
pub const FIELD_NAME: &str = "name";
pub const FIELD_NAME_LOWER: &str = "name_lower";
pub const FIELD_PRICE: &str = "price";
pub const FIELD_STORE: &str = "store";
pub const FIELD_CATEGORY: &str = "category";

/// One product entry in the catalog collection.
///
/// `name_lower` is derived, not authored: it is `None` on freshly seeded
/// records and populated by the backfill job. When present it always equals
/// [`lowercase_name`] of `name`.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductRecord {
    pub name: String,
    pub name_lower: Option<String>,
    pub price: Decimal,
    pub store: String,
    pub category: String,
}

#[derive(Debug, Error)]
pub enum FieldError {
    #[error("missing field: {0}")]
    Missing(&'static str),
    #[error("field {field} has unexpected type: expected {expected}")]
    InvalidType {
        field: &'static str,
        expected: &'static str,
    },
}

impl ProductRecord {
    /// Converts the record into the flat field map persisted to the store.
    ///
    /// `name_lower` is omitted entirely when unset: the backfill job detects
    /// un-migrated documents by field absence, not by a null sentinel.
    #[must_use]
    pub fn to_fields(&self) -> Map<String, Value> {
        let mut fields = Map::new();
        fields.insert(FIELD_NAME.to_string(), Value::String(self.name.clone()));
        if let Some(lower) = &self.name_lower {
            fields.insert(FIELD_NAME_LOWER.to_string(), Value::String(lower.clone()));
        }
        // A two-decimal price always has an exact f64 neighborhood.
        let price = self.price.to_f64().and_then(Number::from_f64);
        fields.insert(
            FIELD_PRICE.to_string(),
            price.map_or(Value::Null, Value::Number),
        );
        fields.insert(FIELD_STORE.to_string(), Value::String(self.store.clone()));
        fields.insert(
            FIELD_CATEGORY.to_string(),
            Value::String(self.category.clone()),
        );
        fields
    }

    /// Parses a persisted field map back into a record.
    ///
    /// # Errors
    ///
    /// Returns [`FieldError::Missing`] if a required field is absent, or
    /// [`FieldError::InvalidType`] if a field holds the wrong scalar kind.
    pub fn from_fields(fields: &Map<String, Value>) -> Result<Self, FieldError> {
        let name = require_str(fields, FIELD_NAME)?;
        let store = require_str(fields, FIELD_STORE)?;
        let category = require_str(fields, FIELD_CATEGORY)?;

        let price_value = fields
            .get(FIELD_PRICE)
            .ok_or(FieldError::Missing(FIELD_PRICE))?;
        let price = price_value
            .as_f64()
            .and_then(Decimal::from_f64)
            .ok_or(FieldError::InvalidType {
                field: FIELD_PRICE,
                expected: "number",
            })?;

        let name_lower = match fields.get(FIELD_NAME_LOWER) {
            None => None,
            Some(Value::String(s)) => Some(s.clone()),
            Some(_) => {
                return Err(FieldError::InvalidType {
                    field: FIELD_NAME_LOWER,
                    expected: "string",
                })
            }
        };

        Ok(Self {
            name,
            name_lower,
            price,
            store,
            category,
        })
    }
}

fn require_str(fields: &Map<String, Value>, field: &'static str) -> Result<String, FieldError> {
    match fields.get(field) {
        None => Err(FieldError::Missing(field)),
        Some(Value::String(s)) => Ok(s.clone()),
        Some(_) => Err(FieldError::InvalidType {
            field,
            expected: "string",
        }),
    }
}

/// Derivation rule for the case-insensitive lookup field: standard Unicode
/// lowercase mapping. Accented characters keep their case-folded form.
#[must_use]
pub fn lowercase_name(name: &str) -> String {
    name.to_lowercase()
}
