// In-memory inventory and the operations the session performs on it.
//
// `Inventory` owns the loaded `InventoryDocument` and the backend it
// came from. Every mutating operation changes the document first and then
// writes the whole document back through the backend. There is no rollback:
// if the write fails the error is returned and the in-memory change stays,
// so memory and storage differ until the next successful save.
//
// Name lookups ignore case. Duplicate checks on insert compare names
// exactly.

use crate::error::{InventoryError, Result};
use crate::model::{Category, InventoryDocument, Product};
use crate::storage::InventoryBackend;
use tracing::{debug, info};

/// Old and new price of one product touched by a price adjustment.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceChange {
    pub product_id: i64,
    pub name: String,
    pub old_price: f64,
    pub new_price: f64,
}

/// What a cascading category delete removed.
#[derive(Debug, Clone, PartialEq)]
pub struct CascadeDelete {
    pub category: Category,
    pub products: Vec<Product>,
}

/// The loaded inventory plus the backend that persists it.
#[derive(Debug)]
pub struct Inventory<B: InventoryBackend> {
    doc: InventoryDocument,
    backend: B,
}

fn same_name(a: &str, b: &str) -> bool {
    a.to_lowercase() == b.to_lowercase()
}

impl<B: InventoryBackend> Inventory<B> {
    /// Load the document from `backend` and take ownership of both.
    pub fn load(backend: B) -> Result<Self> {
        let doc = backend.load()?;
        Ok(Inventory { doc, backend })
    }

    pub fn document(&self) -> &InventoryDocument {
        &self.doc
    }

    pub fn categories(&self) -> &[Category] {
        &self.doc.categories
    }

    pub fn products(&self) -> &[Product] {
        &self.doc.products
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    // ---- lookups ----

    /// Case-insensitive match on the category name. If several categories
    /// share the name, the last one in document order wins.
    pub fn find_category_by_name(&self, name: &str) -> Option<&Category> {
        self.doc
            .categories
            .iter()
            .rev()
            .find(|c| same_name(&c.name, name))
    }

    pub fn find_category_id(&self, name: &str) -> Option<i64> {
        self.find_category_by_name(name).map(|c| c.id)
    }

    /// Like [`find_category_id`](Self::find_category_id) but an unknown
    /// name is a `CategoryNotFound` error.
    pub fn resolve_category(&self, name: &str) -> Result<i64> {
        self.find_category_id(name)
            .ok_or_else(|| InventoryError::CategoryNotFound(name.to_string()))
    }

    pub fn find_category_by_id(&self, id: i64) -> Option<&Category> {
        self.doc.categories.iter().find(|c| c.id == id)
    }

    /// First product whose name matches, ignoring case.
    pub fn find_product_by_name(&self, name: &str) -> Option<&Product> {
        self.doc
            .products
            .iter()
            .find(|p| same_name(&p.name, name))
    }

    fn require_category(&self, id: i64) -> Result<&Category> {
        self.find_category_by_id(id)
            .ok_or_else(|| InventoryError::CategoryNotFound(id.to_string()))
    }

    // ---- primitives, callers persist ----

    fn insert_category(&mut self, category: Category) {
        self.doc.categories.push(category);
    }

    fn insert_product(&mut self, product: Product) {
        self.doc.products.push(product);
    }

    fn remove_category_at(&mut self, index: usize) -> Category {
        self.doc.categories.remove(index)
    }

    fn remove_product_at(&mut self, index: usize) -> Product {
        self.doc.products.remove(index)
    }

    fn persist(&self) -> Result<()> {
        self.backend.save(&self.doc)
    }

    // ---- operations ----

    /// Products of category `category_id`, in document order. A category
    /// without products yields an empty list.
    pub fn list_products_in_category(&self, category_id: i64) -> Result<Vec<&Product>> {
        self.require_category(category_id)?;
        Ok(self
            .doc
            .products
            .iter()
            .filter(|p| p.category_id == category_id)
            .collect())
    }

    /// Change every price in the category by `percent` (negative lowers).
    /// Prices are not clamped at zero. The document is written once, after
    /// all products are updated, and only if at least one changed.
    pub fn adjust_category_prices(
        &mut self,
        category_id: i64,
        percent: f64,
    ) -> Result<Vec<PriceChange>> {
        self.require_category(category_id)?;
        if !percent.is_finite() {
            return Err(InventoryError::InvalidPrice {
                name: format!("category {category_id}"),
                value: percent,
            });
        }

        // Work out every new price before touching the document, so a
        // non-finite result leaves the category as it was.
        let changes: Vec<PriceChange> = self
            .doc
            .products
            .iter()
            .filter(|p| p.category_id == category_id)
            .map(|p| PriceChange {
                product_id: p.id,
                name: p.name.clone(),
                old_price: p.price,
                new_price: p.price + p.price * percent / 100.0,
            })
            .collect();
        if let Some(bad) = changes.iter().find(|c| !c.new_price.is_finite()) {
            return Err(InventoryError::InvalidPrice {
                name: bad.name.clone(),
                value: bad.new_price,
            });
        }

        for (p, c) in self
            .doc
            .products
            .iter_mut()
            .filter(|p| p.category_id == category_id)
            .zip(&changes)
        {
            p.price = c.new_price;
        }

        if !changes.is_empty() {
            self.persist()?;
        }
        info!(category_id, percent, updated = changes.len(), "adjusted prices");
        Ok(changes)
    }

    pub fn find_product_info(&self, name: &str) -> Result<&Product> {
        self.find_product_by_name(name)
            .ok_or_else(|| InventoryError::ProductNotFound(name.to_string()))
    }

    /// Remove the first product whose name matches, ignoring case.
    pub fn delete_product_by_name(&mut self, name: &str) -> Result<Product> {
        let index = self
            .doc
            .products
            .iter()
            .position(|p| same_name(&p.name, name))
            .ok_or_else(|| InventoryError::ProductNotFound(name.to_string()))?;
        let removed = self.remove_product_at(index);
        self.persist()?;
        info!(product_id = removed.id, "deleted product");
        Ok(removed)
    }

    /// Remove the category and every product that references it, then
    /// write the document once.
    pub fn delete_category_cascade(&mut self, category_id: i64) -> Result<CascadeDelete> {
        let index = self
            .doc
            .categories
            .iter()
            .position(|c| c.id == category_id)
            .ok_or_else(|| InventoryError::CategoryNotFound(category_id.to_string()))?;
        let category = self.remove_category_at(index);

        let (products, kept): (Vec<Product>, Vec<Product>) = std::mem::take(&mut self.doc.products)
            .into_iter()
            .partition(|p| p.category_id == category_id);
        self.doc.products = kept;

        self.persist()?;
        info!(
            category_id,
            products = products.len(),
            "deleted category with its products"
        );
        Ok(CascadeDelete { category, products })
    }

    /// Append a product. Rejected if its id or exact name is taken, if
    /// its category does not exist, or if its price is NaN or infinite.
    pub fn add_product(&mut self, product: Product) -> Result<()> {
        if !product.price.is_finite() {
            return Err(InventoryError::InvalidPrice {
                name: product.name,
                value: product.price,
            });
        }
        let duplicate = self
            .doc
            .products
            .iter()
            .any(|p| p.name == product.name || p.id == product.id);
        if duplicate {
            debug!(id = product.id, "rejected duplicate product");
            return Err(InventoryError::DuplicateProduct {
                id: product.id,
                name: product.name,
            });
        }
        if self.find_category_by_id(product.category_id).is_none() {
            return Err(InventoryError::UnknownCategory(product.category_id));
        }

        let id = product.id;
        self.insert_product(product);
        self.persist()?;
        info!(product_id = id, "added product");
        Ok(())
    }

    /// Append a category. Rejected if its id or exact name is taken.
    pub fn add_category(&mut self, category: Category) -> Result<()> {
        let duplicate = self
            .doc
            .categories
            .iter()
            .any(|c| c.name == category.name || c.id == category.id);
        if duplicate {
            debug!(id = category.id, "rejected duplicate category");
            return Err(InventoryError::DuplicateCategory {
                id: category.id,
                name: category.name,
            });
        }

        let id = category.id;
        self.insert_category(category);
        self.persist()?;
        info!(category_id = id, "added category");
        Ok(())
    }

    /// All category names in code-point order.
    pub fn list_category_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.doc.categories.iter().map(|c| c.name.clone()).collect();
        names.sort();
        names
    }

    /// All product names in code-point order.
    pub fn list_product_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.doc.products.iter().map(|p| p.name.clone()).collect();
        names.sort();
        names
    }
}
