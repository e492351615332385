//! Category model
//!
//! Spending/income categories referenced by transactions and category limits.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A transaction category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    /// Stable id referenced by transactions (e.g. `market`)
    pub id: String,

    /// Display name
    #[serde(default)]
    pub name: String,

    /// Display icon (usually a single emoji)
    #[serde(default)]
    pub icon: String,

    /// Unrecognized fields
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Category {
    /// Create a new category
    pub fn new(id: impl Into<String>, name: impl Into<String>, icon: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            icon: icon.into(),
            extra: Map::new(),
        }
    }
}

/// The categories a new user starts with
pub fn default_categories() -> Vec<Category> {
    [
        ("market", "Market & Alışveriş", "🛒"),
        ("fatura", "Faturalar", "📄"),
        ("ulasim", "Ulaşım", "🚌"),
        ("yemek", "Yeme & İçme", "🍽️"),
        ("eglence", "Eğlence", "🎬"),
        ("saglik", "Sağlık", "💊"),
        ("maas", "Maaş / Gelir", "💰"),
        ("yatirim", "Yatırım", "📈"),
        ("diger", "Diğer", "🔹"),
    ]
    .into_iter()
    .map(|(id, name, icon)| Category::new(id, name, icon))
    .collect()
}

/// Find a category by id
pub fn find_category<'a>(categories: &'a [Category], id: &str) -> Option<&'a Category> {
    categories.iter().find(|c| c.id == id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_default_categories() {
        let defaults = default_categories();
        assert_eq!(defaults.len(), 9);
        assert_eq!(defaults[0].id, "market");
        assert!(find_category(&defaults, "maas").is_some());
        assert!(find_category(&defaults, "missing").is_none());
    }

    #[test]
    fn test_serialization_shape() {
        let category = Category::new("market", "Market", "🛒");
        let value = serde_json::to_value(&category).unwrap();
        assert_eq!(value, json!({"id": "market", "name": "Market", "icon": "🛒"}));
    }

    #[test]
    fn test_extra_fields_preserved() {
        let value = json!({"id": "pets", "name": "Pets", "icon": "🐶", "color": "#ff0"});
        let category: Category = serde_json::from_value(value.clone()).unwrap();
        assert_eq!(serde_json::to_value(&category).unwrap(), value);
    }
}
