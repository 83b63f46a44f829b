//! Catalog product records.

use serde::{Deserialize, Serialize};

/// A registered product and every identifier (EAN/GTIN) it is known by.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub name: String,
    #[serde(default)]
    pub identifiers: Vec<String>,
}

impl Product {
    pub fn new<I, S>(name: impl Into<String>, identifiers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            identifiers: identifiers
                .into_iter()
                .map(|id| id.into().trim().to_string())
                .filter(|id| !id.is_empty())
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_product_identifiers_are_trimmed() {
        let product = Product::new("Coffee", [" 7891234567890 ", "", "123"]);
        assert_eq!(product.identifiers, vec!["7891234567890", "123"]);
    }
}
