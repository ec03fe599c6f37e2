use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};

/// A product category, identified by its name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl Category {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            image: None,
        }
    }

    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }
}

/// Known categories, refreshed from the server and handed to whatever needs
/// to check a category selection.
#[derive(Debug, Clone, Default)]
pub struct CategoryCatalog {
    categories: Vec<Category>,
}

impl CategoryCatalog {
    pub fn new(categories: Vec<Category>) -> Self {
        Self { categories }
    }

    /// Replace the whole list with a fresh server copy.
    pub fn replace_all(&mut self, categories: Vec<Category>) {
        self.categories = categories;
    }

    pub fn add(&mut self, category: Category) {
        self.categories.push(category);
    }

    /// Remove a category by name. Returns whether it was known.
    pub fn remove(&mut self, name: &str) -> bool {
        let before = self.categories.len();
        self.categories.retain(|c| c.name != name);
        self.categories.len() != before
    }

    pub fn contains(&self, name: &str) -> bool {
        self.categories.iter().any(|c| c.name == name)
    }

    pub fn names(&self) -> Vec<&str> {
        self.categories.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    /// Every selected name must be a known category.
    pub fn validate_selection<S: AsRef<str>>(&self, selected: &[S]) -> Result<()> {
        let unknown: Vec<&str> = selected
            .iter()
            .map(AsRef::as_ref)
            .filter(|name| !self.contains(name))
            .collect();
        if unknown.is_empty() {
            Ok(())
        } else {
            Err(CoreError::validation(format!(
                "unknown categories: {}",
                unknown.join(", ")
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> CategoryCatalog {
        CategoryCatalog::new(vec![Category::new("shirt"), Category::new("pants")])
    }

    #[test]
    fn add_and_remove() {
        let mut catalog = catalog();
        catalog.add(Category::new("hat").with_image("/img/hat.png"));
        assert_eq!(catalog.names(), vec!["shirt", "pants", "hat"]);

        assert!(catalog.remove("pants"));
        assert!(!catalog.remove("pants"));
        assert_eq!(catalog.len(), 2);
    }

    #[test]
    fn replace_all_discards_local_state() {
        let mut catalog = catalog();
        catalog.add(Category::new("local-only"));
        catalog.replace_all(vec![Category::new("shoes")]);
        assert_eq!(catalog.names(), vec!["shoes"]);
    }

    #[test]
    fn selection_must_be_known() {
        let catalog = catalog();
        assert!(catalog.validate_selection(&["shirt"]).is_ok());
        assert!(catalog.validate_selection::<&str>(&[]).is_ok());

        let err = catalog
            .validate_selection(&["shirt".to_string(), "socks".into(), "ties".into()])
            .unwrap_err();
        assert_eq!(err.to_string(), "Validation failed: unknown categories: socks, ties");
    }

    #[test]
    fn image_is_optional_on_the_wire() {
        let json = serde_json::to_value(Category::new("shirt")).unwrap();
        assert_eq!(json, serde_json::json!({"name": "shirt"}));

        let parsed: Category =
            serde_json::from_value(serde_json::json!({"name": "hat", "image": "/h.png"})).unwrap();
        assert_eq!(parsed.image.as_deref(), Some("/h.png"));
    }
}
