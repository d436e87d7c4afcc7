//! # Product Store
//!
//! Barcode → product record mapping persisted as a pretty-printed JSON object of
//! objects of string fields. Every mutation rewrites the whole file before
//! returning, so no scanned product lives only in memory across frames.
//!
//! ```text
//! {
//!     "7896051020158": {
//!         "nome": "Palito Roliço Gina",
//!         "marca": "Gina",
//!         "categoria": "Utilidades Domésticas"
//!     }
//! }
//! ```

use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{ErrorSeverity, ScanError, ScanResult};

/// Field holding the product name.
pub const FIELD_NAME: &str = "nome";
/// Field holding the brand.
pub const FIELD_BRAND: &str = "marca";
/// Field holding the category.
pub const FIELD_CATEGORY: &str = "categoria";

/// Open-ended product description: field name → value, in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductRecord(IndexMap<String, String>);

impl ProductRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a field, keeping the original position on replace.
    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<String>) {
        self.0.insert(field.into(), value.into());
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn name(&self) -> Option<&str> {
        self.get(FIELD_NAME)
    }

    pub fn brand(&self) -> Option<&str> {
        self.get(FIELD_BRAND)
    }

    pub fn category(&self) -> Option<&str> {
        self.get(FIELD_CATEGORY)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for ProductRecord {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// Example products written when no store file exists yet.
pub fn seed_products() -> IndexMap<String, ProductRecord> {
    let mut seed = IndexMap::new();
    seed.insert(
        "7894650940174".to_string(),
        ProductRecord::from_iter([
            (
                FIELD_NAME,
                "Odorizador de ambiente aerossol brisa cítrica de verão Glade",
            ),
            (FIELD_BRAND, "Glade"),
            ("volume", "360ml"),
            ("tipo", "Spray"),
            (FIELD_CATEGORY, "Limpeza e Perfumaria"),
        ]),
    );
    seed.insert(
        "7896051020158".to_string(),
        ProductRecord::from_iter([
            (FIELD_NAME, "Palito Roliço Gina"),
            (FIELD_BRAND, "Gina"),
            ("quantidade", "200 unidades"),
            (FIELD_CATEGORY, "Utilidades Domésticas"),
        ]),
    );
    seed
}

/// File-backed product store.
///
/// Accessed from the capture thread only; there is no locking.
#[derive(Debug)]
pub struct ProductStore {
    path: PathBuf,
    products: IndexMap<String, ProductRecord>,
}

impl ProductStore {
    /// Load the store from `path`.
    ///
    /// - Missing file: the seed products are written to `path` and returned.
    /// - Unreadable or malformed file: the failure is reported and an empty
    ///   store is returned. The file is left untouched until the next `add`.
    ///
    /// # Errors
    ///
    /// Only when the seed file cannot be written.
    pub fn load(path: impl Into<PathBuf>) -> ScanResult<Self> {
        let path = path.into();

        if !path.exists() {
            info!(path = %path.display(), "product store missing, writing seed products");
            let store = Self {
                path,
                products: seed_products(),
            };
            store.save()?;
            return Ok(store);
        }

        let products = match Self::read_products(&path) {
            Ok(products) => products,
            Err(err) => {
                warn!(error = %err, "falling back to an empty product store");
                println!("Error reading the product database. Starting a new one.");
                IndexMap::new()
            }
        };
        debug!(path = %path.display(), count = products.len(), "product store loaded");

        Ok(Self { path, products })
    }

    fn read_products(path: &Path) -> ScanResult<IndexMap<String, ProductRecord>> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| ScanError::io_at("read product store", path.display().to_string(), e))?;
        serde_json::from_str(&text).map_err(|e| {
            ScanError::store(path.display().to_string(), e.to_string())
                .with_operation("load")
                .with_recovery_suggestion("Fix or delete the file; it is rewritten on the next add")
        })
    }

    /// Look up a product. A missing code is a normal outcome, not an error.
    pub fn get(&self, code: &str) -> Option<&ProductRecord> {
        self.products.get(code)
    }

    /// Insert or overwrite the record for `code`, then persist the whole store.
    ///
    /// # Errors
    ///
    /// Write failures are fatal and returned unchanged; nothing is retried.
    pub fn add(&mut self, code: impl Into<String>, record: ProductRecord) -> ScanResult<()> {
        let code = code.into();
        let name = record.name().unwrap_or("Unknown").to_string();
        self.products.insert(code.clone(), record);
        self.save()?;
        info!(code = %code, "product stored");
        println!("Product {} added successfully!", name);
        Ok(())
    }

    /// Serialize every record to the store file, replacing its contents.
    pub fn save(&self) -> ScanResult<()> {
        let mut buffer = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut serializer = serde_json::Serializer::with_formatter(&mut buffer, formatter);
        self.products.serialize(&mut serializer)?;

        std::fs::write(&self.path, buffer).map_err(|e| {
            ScanError::io_at("write product store", self.path.display().to_string(), e)
                .with_severity(ErrorSeverity::Fatal)
                .with_metadata("records", self.products.len().to_string())
        })
    }

    pub fn contains(&self, code: &str) -> bool {
        self.products.contains_key(code)
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ProductRecord)> {
        self.products.iter().map(|(k, v)| (k.as_str(), v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_store_path() -> (tempfile::TempDir, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("products.json");
        (dir, path)
    }

    #[test]
    fn missing_file_is_seeded_and_written() {
        let (_dir, path) = temp_store_path();
        let store = ProductStore::load(&path).unwrap();

        assert_eq!(store.len(), 2);
        assert!(store.contains("7894650940174"));
        assert!(store.contains("7896051020158"));
        assert!(path.exists());

        let reloaded = ProductStore::load(&path).unwrap();
        assert_eq!(reloaded.len(), 2);
    }

    #[test]
    fn malformed_file_gives_empty_store() {
        let (_dir, path) = temp_store_path();
        std::fs::write(&path, "{ not json").unwrap();

        let store = ProductStore::load(&path).unwrap();
        assert!(store.is_empty());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "{ not json");
    }

    #[test]
    fn non_string_fields_are_rejected_as_corrupt() {
        let (_dir, path) = temp_store_path();
        std::fs::write(&path, r#"{"123": {"nome": 5}}"#).unwrap();

        let store = ProductStore::load(&path).unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn get_missing_code_is_none() {
        let (_dir, path) = temp_store_path();
        let store = ProductStore::load(&path).unwrap();
        assert!(store.get("0000000000000").is_none());
    }

    #[test]
    fn add_then_get_and_reload() {
        let (_dir, path) = temp_store_path();
        let mut store = ProductStore::load(&path).unwrap();
        let record = ProductRecord::from_iter([
            (FIELD_NAME, "Café Torrado"),
            (FIELD_BRAND, "Pilão"),
            (FIELD_CATEGORY, "Bebidas"),
            ("peso", "500g"),
        ]);

        store.add("7896089011234", record.clone()).unwrap();
        assert_eq!(store.get("7896089011234"), Some(&record));

        let reloaded = ProductStore::load(&path).unwrap();
        assert_eq!(reloaded.get("7896089011234"), Some(&record));
        assert_eq!(reloaded.len(), 3);
    }

    #[test]
    fn add_overwrites_existing_code() {
        let (_dir, path) = temp_store_path();
        let mut store = ProductStore::load(&path).unwrap();
        let record = ProductRecord::from_iter([(FIELD_NAME, "Glade Lavanda")]);

        store.add("7894650940174", record.clone()).unwrap();
        assert_eq!(store.len(), 2);
        assert_eq!(store.get("7894650940174"), Some(&record));
    }

    #[test]
    fn file_is_pretty_printed_with_literal_unicode() {
        let (_dir, path) = temp_store_path();
        ProductStore::load(&path).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("\n    \"7894650940174\": {\n        \"nome\""));
        assert!(text.contains("cítrica de verão"));
    }

    #[test]
    fn record_keeps_field_order() {
        let record = ProductRecord::from_iter([("b", "1"), ("a", "2"), ("c", "3")]);
        let fields: Vec<&str> = record.iter().map(|(k, _)| k).collect();
        assert_eq!(fields, ["b", "a", "c"]);
    }
}
