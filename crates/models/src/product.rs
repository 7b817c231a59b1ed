use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::ModelError;

/// A product as persisted and served over the wire.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: f64,
    pub sku: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Inbound product payload; the server assigns id and timestamps.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NewProduct {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: f64,
    pub sku: String,
}

pub fn validate_name(name: &str) -> Result<(), ModelError> {
    if name.trim().is_empty() {
        return Err(ModelError::Validation("name must not be empty".into()));
    }
    Ok(())
}

pub fn validate_price(price: f64) -> Result<(), ModelError> {
    if !(price > 0.0) {
        return Err(ModelError::Validation("price must be greater than zero".into()));
    }
    Ok(())
}

/// SKU format: three lowercase alphabetic segments joined by dashes,
/// e.g. `abc-de-fgh`.
pub fn validate_sku(sku: &str) -> Result<(), ModelError> {
    let segments: Vec<&str> = sku.split('-').collect();
    let well_formed = segments.len() == 3
        && segments
            .iter()
            .all(|s| !s.is_empty() && s.chars().all(|c| c.is_ascii_lowercase()));
    if !well_formed {
        return Err(ModelError::Validation(
            "sku must match the format abc-de-fgh (three lowercase segments)".into(),
        ));
    }
    Ok(())
}

impl NewProduct {
    /// Run every field rule and collect all violations rather than stopping
    /// at the first, so clients see the full list in one response.
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut violations = Vec::new();
        for check in [
            validate_name(&self.name),
            validate_price(self.price),
            validate_sku(&self.sku),
        ] {
            if let Err(e) = check {
                violations.push(e.to_string());
            }
        }
        if violations.is_empty() {
            Ok(())
        } else {
            Err(violations)
        }
    }

    /// Promote a validated payload into a full entity.
    pub fn into_product(self) -> Product {
        let now = Utc::now();
        Product {
            id: Uuid::new_v4(),
            name: self.name,
            description: self.description,
            price: self.price,
            sku: self.sku,
            created_at: now,
            updated_at: now,
        }
    }
}

impl Product {
    /// Overwrite the mutable fields from a payload, keeping id and
    /// `created_at` stable.
    pub fn apply(&mut self, input: NewProduct) {
        self.name = input.name;
        self.description = input.description;
        self.price = input.price;
        self.sku = input.sku;
        self.updated_at = Utc::now();
    }
}
