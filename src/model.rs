// Data model: the shapes stored in `Magazzino.json` and `Login.json`.
// Field names on disk are the Italian keys the documents have always used, the
// Rust side uses English names and `serde(rename)` to bridge the two.
// Field declaration order is the key order written back to disk.

use serde::{Deserialize, Serialize};

/// A named grouping of products.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Category {
    #[serde(rename = "id_categoria")]
    pub id: i64,
    #[serde(rename = "nome_categoria")]
    pub name: String,
}

impl Category {
    pub fn new(id: i64, name: impl Into<String>) -> Self {
        Category {
            id,
            name: name.into(),
        }
    }
}

/// An inventory item. `category_id` references a `Category` by id.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Product {
    #[serde(rename = "id_prodotto")]
    pub id: i64,
    #[serde(rename = "id_categoria")]
    pub category_id: i64,
    #[serde(rename = "nome_prodotto")]
    pub name: String,
    #[serde(rename = "prezzo", serialize_with = "write_price")]
    pub price: f64,
}

/// Whole prices are written as JSON integers (`200`, not `200.0`), the
/// way the document is usually authored by hand.
fn write_price<S: serde::Serializer>(price: &f64, s: S) -> Result<S::Ok, S::Error> {
    // Beyond 2^53 not every integer is representable, keep the float form.
    const EXACT_LIMIT: f64 = 9_007_199_254_740_992.0;
    if price.fract() == 0.0 && price.abs() < EXACT_LIMIT {
        s.serialize_i64(*price as i64)
    } else {
        s.serialize_f64(*price)
    }
}

impl Product {
    pub fn new(id: i64, category_id: i64, name: impl Into<String>, price: f64) -> Self {
        Product {
            id,
            category_id,
            name: name.into(),
            price,
        }
    }
}

/// The whole inventory document. Both sequences keep insertion order.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct InventoryDocument {
    #[serde(rename = "Categoria")]
    pub categories: Vec<Category>,
    #[serde(rename = "Prodotto")]
    pub products: Vec<Product>,
}

/// A username/password pair from the credential document.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Credential {
    pub username: String,
    pub password: String,
}

/// Shape of `Login.json`.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct CredentialDocument {
    pub users: Vec<Credential>,
}
