//! Products, product versions and their size inventory.

use serde::{Deserialize, Serialize};

use crate::entity::{Editable, EntityId};
use crate::error::{CoreError, Result};
use crate::reconcile::{KeyedItem, first_duplicate};

/// Display order of size labels. Labels not listed here sort last.
pub const SIZE_ORDER: [&str; 5] = ["S", "M", "L", "XL", "2XL"];

/// Maximum number of images (stored + pending) on a product or version.
pub const MAX_IMAGES: usize = 5;

/// Stock of one size of a version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Size {
    pub size: String,
    pub quantity: i64,
}

impl Size {
    pub fn new(size: impl Into<String>, quantity: i64) -> Self {
        Self {
            size: size.into(),
            quantity,
        }
    }
}

impl KeyedItem for Size {
    type Key = String;

    fn key(&self) -> Self::Key {
        self.size.clone()
    }
}

/// Position of a label in [`SIZE_ORDER`], case-insensitive.
pub fn size_rank(label: &str) -> usize {
    SIZE_ORDER
        .iter()
        .position(|known| known.eq_ignore_ascii_case(label))
        .unwrap_or(SIZE_ORDER.len())
}

/// Stable sort into display order.
pub fn sort_sizes(sizes: &mut [Size]) {
    sizes.sort_by_key(|s| size_rank(&s.size));
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    #[serde(default)]
    pub id: EntityId,
    pub name: String,
    #[serde(default)]
    pub price: i64,
    #[serde(default)]
    pub brand: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: Vec<String>,
    #[serde(default)]
    pub sold: i64,
    #[serde(default)]
    pub stock: i64,
    #[serde(default)]
    pub images: Vec<String>,
    /// Local files queued for upload; never persisted as-is.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub file_images: Vec<String>,
    /// The queued files encoded as data URLs, sent with the next update.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub image_news: Vec<String>,
    #[serde(default)]
    pub versions: Vec<Version>,
}

impl Product {
    pub fn image_count(&self) -> usize {
        self.images.len() + self.file_images.len()
    }

    /// Drop a stored image by path. Returns whether it was present.
    pub fn remove_image(&mut self, image: &str) -> bool {
        remove_first(&mut self.images, image)
    }

    /// Queue a local file for upload. `data_url` is the file's encoded content.
    pub fn attach_image(
        &mut self,
        path: impl Into<String>,
        data_url: impl Into<String>,
    ) -> Result<()> {
        ensure_image_capacity(self.image_count())?;
        self.file_images.push(path.into());
        self.image_news.push(data_url.into());
        Ok(())
    }
}

impl Editable for Product {
    const KIND: &'static str = "product";
    const TRANSIENT_FIELDS: &'static [&'static str] = &["fileImages"];

    fn id(&self) -> EntityId {
        self.id
    }

    fn clear_transient(&mut self) {
        self.file_images.clear();
        self.image_news.clear();
    }

    fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(CoreError::validation("product name is required"));
        }
        if self.price < 0 {
            return Err(CoreError::validation("price cannot be negative"));
        }
        ensure_non_negative("stock", self.stock)?;
        ensure_non_negative("sold", self.sold)?;
        ensure_image_limit(self.image_count())
    }
}

/// A style variant of a product, holding per-size stock.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Version {
    #[serde(default)]
    pub id: EntityId,
    #[serde(default)]
    pub product_id: EntityId,
    pub style: String,
    #[serde(default)]
    pub sold: i64,
    #[serde(default)]
    pub stock: i64,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub file_images: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub image_news: Vec<String>,
    #[serde(default)]
    pub sizes: Vec<Size>,
}

impl Version {
    pub fn image_count(&self) -> usize {
        self.images.len() + self.file_images.len()
    }

    pub fn remove_image(&mut self, image: &str) -> bool {
        remove_first(&mut self.images, image)
    }

    pub fn attach_image(
        &mut self,
        path: impl Into<String>,
        data_url: impl Into<String>,
    ) -> Result<()> {
        ensure_image_capacity(self.image_count())?;
        self.file_images.push(path.into());
        self.image_news.push(data_url.into());
        Ok(())
    }

    pub fn size(&self, label: &str) -> Option<&Size> {
        self.sizes.iter().find(|s| s.size == label)
    }

    /// Add stock for a size; an existing size has the quantity added to it.
    pub fn add_size(&mut self, label: &str, quantity: i64) -> Result<()> {
        let label = label.trim();
        if label.is_empty() || quantity <= 0 {
            return Err(CoreError::validation(
                "select a size and enter a positive quantity",
            ));
        }
        match self.sizes.iter_mut().find(|s| s.size == label) {
            Some(existing) => existing.quantity += quantity,
            None => self.sizes.push(Size::new(label, quantity)),
        }
        Ok(())
    }

    pub fn set_size_quantity(&mut self, label: &str, quantity: i64) -> Result<()> {
        ensure_non_negative("quantity", quantity)?;
        let size = self
            .sizes
            .iter_mut()
            .find(|s| s.size == label)
            .ok_or_else(|| CoreError::not_found("size", label))?;
        size.quantity = quantity;
        Ok(())
    }

    pub fn reset_size(&mut self, label: &str) -> Result<()> {
        self.set_size_quantity(label, 0)
    }

    pub fn remove_size(&mut self, label: &str) -> Result<Size> {
        let index = self
            .sizes
            .iter()
            .position(|s| s.size == label)
            .ok_or_else(|| CoreError::not_found("size", label))?;
        Ok(self.sizes.remove(index))
    }

    pub fn total_quantity(&self) -> i64 {
        self.sizes.iter().map(|s| s.quantity).sum()
    }

    /// Sizes in display order, leaving `self.sizes` untouched.
    pub fn sorted_sizes(&self) -> Vec<Size> {
        let mut sizes = self.sizes.clone();
        sort_sizes(&mut sizes);
        sizes
    }
}

impl Editable for Version {
    const KIND: &'static str = "version";
    const TRANSIENT_FIELDS: &'static [&'static str] = &["fileImages"];

    fn id(&self) -> EntityId {
        self.id
    }

    fn sizes(&self) -> Option<&[Size]> {
        Some(&self.sizes)
    }

    fn clear_transient(&mut self) {
        self.file_images.clear();
        self.image_news.clear();
    }

    fn validate(&self) -> Result<()> {
        if self.style.trim().is_empty() {
            return Err(CoreError::validation("version style is required"));
        }
        for size in &self.sizes {
            if size.size.trim().is_empty() {
                return Err(CoreError::validation("size label is required"));
            }
            ensure_non_negative("quantity", size.quantity)?;
        }
        if let Some(label) = first_duplicate(&self.sizes) {
            return Err(CoreError::validation(format!(
                "size {label} is listed more than once"
            )));
        }
        ensure_image_limit(self.image_count())
    }
}

fn ensure_non_negative(field: &str, value: i64) -> Result<()> {
    if value < 0 {
        return Err(CoreError::validation(format!("{field} cannot be negative")));
    }
    Ok(())
}

fn ensure_image_limit(count: usize) -> Result<()> {
    if count > MAX_IMAGES {
        return Err(CoreError::validation(format!(
            "at most {MAX_IMAGES} images are allowed, got {count}"
        )));
    }
    Ok(())
}

fn ensure_image_capacity(count: usize) -> Result<()> {
    ensure_image_limit(count + 1)
}

fn remove_first(images: &mut Vec<String>, image: &str) -> bool {
    match images.iter().position(|i| i == image) {
        Some(index) => {
            images.remove(index);
            true
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn version_with(sizes: Vec<Size>) -> Version {
        Version {
            id: 1,
            product_id: 1,
            style: "Blue".into(),
            sizes,
            ..Version::default()
        }
    }

    #[test]
    fn sizes_sort_in_display_order() {
        let mut sizes = vec![
            Size::new("2XL", 1),
            Size::new("XS", 1),
            Size::new("m", 1),
            Size::new("S", 1),
            Size::new("3XL", 1),
            Size::new("XL", 1),
        ];
        sort_sizes(&mut sizes);
        let labels: Vec<&str> = sizes.iter().map(|s| s.size.as_str()).collect();
        assert_eq!(labels, vec!["S", "m", "XL", "2XL", "XS", "3XL"]);
    }

    #[test]
    fn adding_existing_size_accumulates() {
        let mut version = version_with(vec![Size::new("M", 2)]);
        version.add_size("M", 3).unwrap();
        version.add_size("L", 1).unwrap();

        assert_eq!(version.size("M"), Some(&Size::new("M", 5)));
        assert_eq!(version.size("L"), Some(&Size::new("L", 1)));
        assert_eq!(version.total_quantity(), 6);
    }

    #[test]
    fn adding_size_requires_label_and_positive_quantity() {
        let mut version = version_with(Vec::new());
        assert!(version.add_size("", 3).is_err());
        assert!(version.add_size("S", 0).is_err());
        assert!(version.sizes.is_empty());
    }

    #[test]
    fn reset_and_remove_sizes() {
        let mut version = version_with(vec![Size::new("S", 4), Size::new("M", 2)]);
        version.reset_size("S").unwrap();
        assert_eq!(version.size("S").map(|s| s.quantity), Some(0));

        let removed = version.remove_size("M").unwrap();
        assert_eq!(removed, Size::new("M", 2));
        assert!(matches!(
            version.remove_size("M"),
            Err(CoreError::NotFound { .. })
        ));
    }

    #[test]
    fn version_validation_rejects_duplicate_sizes() {
        let version = version_with(vec![Size::new("S", 1), Size::new("S", 2)]);
        let err = version.validate().unwrap_err();
        assert!(err.to_string().contains("size S is listed more than once"));
    }

    #[test]
    fn product_validation() {
        let mut product = Product {
            name: "Tee".into(),
            price: 150_000,
            ..Product::default()
        };
        assert!(product.validate().is_ok());

        product.price = -1;
        assert!(product.validate().is_err());

        product.price = 1;
        product.name = "  ".into();
        assert!(product.validate().is_err());
    }

    #[test]
    fn image_limit_counts_pending_attachments() {
        let mut product = Product {
            name: "Tee".into(),
            images: (0..4).map(|i| format!("/img/{i}.png")).collect(),
            ..Product::default()
        };
        product
            .attach_image("/tmp/a.png", "data:image/png;base64,YQ==")
            .unwrap();
        assert!(
            product
                .attach_image("/tmp/b.png", "data:image/png;base64,Yg==")
                .is_err()
        );
        assert_eq!(product.image_news.len(), 1);
        assert_eq!(product.image_count(), MAX_IMAGES);

        assert!(product.remove_image("/img/0.png"));
        assert!(!product.remove_image("/img/0.png"));
    }

    #[test]
    fn product_deserializes_from_api_shape() {
        let product: Product = serde_json::from_value(json!({
            "id": 12,
            "name": "Linen shirt",
            "price": 350000,
            "brand": "Coolmate",
            "description": "Breathable",
            "category": ["shirt", "men"],
            "sold": 4,
            "stock": 20,
            "images": ["/uploads/p12.png"],
            "versions": [{
                "id": 3, "productId": 12, "style": "White", "sold": 1, "stock": 5,
                "images": [], "sizes": [{"size": "M", "quantity": 5}]
            }]
        }))
        .unwrap();

        assert_eq!(product.category, vec!["shirt", "men"]);
        assert_eq!(product.versions[0].sizes, vec![Size::new("M", 5)]);
        assert!(product.file_images.is_empty());

        let back = serde_json::to_value(&product).unwrap();
        assert!(back.get("fileImages").is_none());
        assert!(back.get("imageNews").is_none());
        assert_eq!(back["versions"][0]["productId"], json!(12));
    }
}
