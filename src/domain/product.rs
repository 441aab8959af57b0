use super::common::{TitleSlug, Timestamps};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Produce, meat, soap, preserves...
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductType {
    pub id: Uuid,
    #[serde(flatten)]
    pub info: TitleSlug,
}

impl ProductType {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            info: TitleSlug::new(title),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub id: Uuid,
    #[serde(flatten)]
    pub info: TitleSlug,
    pub type_id: Uuid,
    #[serde(default)]
    pub price: Option<Decimal>,
    #[serde(default)]
    pub unit: Option<String>,
    #[serde(default)]
    pub verbose_price: Option<String>,
    #[serde(default)]
    pub timestamps: Timestamps,
}

impl Product {
    pub fn new(title: impl Into<String>, type_id: Uuid) -> Self {
        Self {
            id: Uuid::new_v4(),
            info: TitleSlug::new(title),
            type_id,
            price: None,
            unit: None,
            verbose_price: None,
            timestamps: Timestamps::now(),
        }
    }

    /// Price text for listings. A verbose price wins over the numeric one.
    pub fn price_label(&self) -> Option<String> {
        if let Some(verbose) = &self.verbose_price {
            return Some(verbose.clone());
        }
        let price = self.price?;
        Some(match &self.unit {
            Some(unit) => format!("${:.2} / {}", price, unit),
            None => format!("${:.2}", price),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_price_label() {
        let mut soap = Product::new("Goat Milk Soap", Uuid::new_v4());
        assert_eq!(soap.price_label(), None);

        soap.price = Some(Decimal::from_str("6.5").unwrap());
        soap.unit = Some("bar".to_string());
        assert_eq!(soap.price_label().as_deref(), Some("$6.50 / bar"));

        soap.verbose_price = Some("3 for $18".to_string());
        assert_eq!(soap.price_label().as_deref(), Some("3 for $18"));
    }
}
