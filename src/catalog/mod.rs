//! Product catalog loading and corpus blob construction.

use std::{fs::File, io::Read, path::Path};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::CatalogLoadError;

/// One product row.
///
/// Text fields that are absent in the source are stored as empty strings,
/// so blob construction never has to care whether a column existed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogItem {
    pub product_id: i64,
    pub name: String,
    pub category: String,
    pub tags: String,
    pub description: String,
    pub price: Option<f64>,
    pub carbon_footprint: Option<f64>,
    pub image_path: Option<String>,
}

impl CatalogItem {
    /// Item with only the required fields set.
    pub fn new(product_id: i64, name: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            product_id,
            name: name.into(),
            category: category.into(),
            tags: String::new(),
            description: String::new(),
            price: None,
            carbon_footprint: None,
            image_path: None,
        }
    }

    pub fn with_tags(mut self, tags: impl Into<String>) -> Self {
        self.tags = tags.into();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_price(mut self, price: f64) -> Self {
        self.price = Some(price);
        self
    }

    pub fn with_carbon_footprint(mut self, carbon_footprint: f64) -> Self {
        self.carbon_footprint = Some(carbon_footprint);
        self
    }

    pub fn with_image_path(mut self, image_path: impl Into<String>) -> Self {
        self.image_path = Some(image_path.into());
        self
    }

    /// Text the vector space is built from:
    /// `name category tags description`, single-space separated.
    pub fn blob(&self) -> String {
        let mut blob = String::with_capacity(
            self.name.len() + self.category.len() + self.tags.len() + self.description.len() + 3,
        );
        blob.push_str(&self.name);
        blob.push(' ');
        blob.push_str(&self.category);
        blob.push(' ');
        blob.push_str(&self.tags);
        blob.push(' ');
        blob.push_str(&self.description);
        blob
    }
}

/// Parse a product id the way callers hand them over:
/// integer text, optionally padded, or an integral float such as `"12.0"`.
pub fn parse_product_id(raw: &str) -> Option<i64> {
    let raw = raw.trim();
    if let Ok(id) = raw.parse::<i64>() {
        return Some(id);
    }
    let value = raw.parse::<f64>().ok()?;
    if value.is_finite() && value.fract() == 0.0 && value.abs() < i64::MAX as f64 {
        Some(value as i64)
    } else {
        None
    }
}

/// Column positions resolved from the header row.
struct Columns {
    product_id: usize,
    name: usize,
    category: usize,
    tags: Option<usize>,
    description: Option<usize>,
    price: Option<usize>,
    carbon_footprint: Option<usize>,
    image_path: Option<usize>,
}

impl Columns {
    fn resolve(headers: &csv::StringRecord) -> Result<Self, CatalogLoadError> {
        let find = |name: &str| headers.iter().position(|h| h.trim() == name);
        let require = |name: &'static str| find(name).ok_or(CatalogLoadError::MissingColumn(name));
        Ok(Self {
            product_id: require("product_id")?,
            name: require("name")?,
            category: require("category")?,
            tags: find("tags"),
            description: find("description"),
            price: find("price"),
            carbon_footprint: find("carbon_footprint"),
            image_path: find("image_path"),
        })
    }
}

fn text(record: &csv::StringRecord, column: Option<usize>) -> String {
    column
        .and_then(|c| record.get(c))
        .unwrap_or_default()
        .to_string()
}

fn optional_text(record: &csv::StringRecord, column: Option<usize>) -> Option<String> {
    column
        .and_then(|c| record.get(c))
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn number(
    record: &csv::StringRecord,
    column: Option<usize>,
    row: usize,
    name: &'static str,
) -> Result<Option<f64>, CatalogLoadError> {
    match optional_text(record, column) {
        None => Ok(None),
        Some(raw) => raw
            .parse::<f64>()
            .map(Some)
            .map_err(|_| CatalogLoadError::InvalidValue { row, column: name, value: raw }),
    }
}

/// Load a catalog CSV from disk.
pub fn load_catalog<P: AsRef<Path>>(path: P) -> Result<Vec<CatalogItem>, CatalogLoadError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| CatalogLoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let items = load_catalog_from_reader(file)?;
    info!(path = %path.display(), items = items.len(), "catalog loaded");
    Ok(items)
}

/// Load a catalog CSV from any reader. The first row must be the header.
///
/// Either every row is accepted or the whole load fails. Short rows leave
/// their trailing fields empty; rows longer than the header are rejected.
pub fn load_catalog_from_reader<R: Read>(reader: R) -> Result<Vec<CatalogItem>, CatalogLoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);
    let headers = reader.headers()?;
    let expected = headers.len();
    let columns = Columns::resolve(headers)?;

    let mut items = Vec::new();
    for (i, record) in reader.records().enumerate() {
        let record = record?;
        let row = i + 1;
        if record.len() > expected {
            return Err(CatalogLoadError::RowLength {
                row,
                expected,
                found: record.len(),
            });
        }
        let raw_id = record.get(columns.product_id).unwrap_or_default();
        let product_id = parse_product_id(raw_id).ok_or_else(|| CatalogLoadError::InvalidValue {
            row,
            column: "product_id",
            value: raw_id.to_string(),
        })?;
        items.push(CatalogItem {
            product_id,
            name: text(&record, Some(columns.name)),
            category: text(&record, Some(columns.category)),
            tags: text(&record, columns.tags),
            description: text(&record, columns.description),
            price: number(&record, columns.price, row, "price")?,
            carbon_footprint: number(&record, columns.carbon_footprint, row, "carbon_footprint")?,
            image_path: optional_text(&record, columns.image_path),
        });
    }
    debug!(rows = items.len(), "catalog rows parsed");
    Ok(items)
}

#[cfg(test)]
mod tests {
    use super::*;

    const CSV: &str = "\
product_id,name,category,tags,description,price,carbon_footprint,image_path
1,Bamboo Toothbrush,Personal Care,eco biodegradable,Soft bristles,99,0.2,https://img/1.jpg
2,Steel Bottle,Kitchen,,,450.5,,
";

    #[test]
    fn loads_rows_and_fills_missing_values() {
        let items = load_catalog_from_reader(CSV.as_bytes()).unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].product_id, 1);
        assert_eq!(items[0].price, Some(99.0));
        assert_eq!(items[0].image_path.as_deref(), Some("https://img/1.jpg"));
        assert_eq!(items[1].tags, "");
        assert_eq!(items[1].carbon_footprint, None);
        assert_eq!(items[1].image_path, None);
    }

    #[test]
    fn blob_concatenates_in_field_order() {
        let items = load_catalog_from_reader(CSV.as_bytes()).unwrap();
        assert_eq!(
            items[0].blob(),
            "Bamboo Toothbrush Personal Care eco biodegradable Soft bristles"
        );
        assert_eq!(items[1].blob(), "Steel Bottle Kitchen  ");
    }

    #[test]
    fn optional_columns_may_be_absent() {
        let csv = "product_id,name,category\n7,Jute Bag,Bags\n";
        let items = load_catalog_from_reader(csv.as_bytes()).unwrap();
        assert_eq!(items, vec![CatalogItem::new(7, "Jute Bag", "Bags")]);
    }

    #[test]
    fn missing_required_column_fails() {
        let csv = "product_id,name,tags\n1,Jute Bag,eco\n";
        let err = load_catalog_from_reader(csv.as_bytes()).unwrap_err();
        assert!(matches!(err, CatalogLoadError::MissingColumn("category")));
    }

    #[test]
    fn bad_id_or_number_fails_whole_load() {
        let csv = "product_id,name,category\n1,a,b\nx,c,d\n";
        let err = load_catalog_from_reader(csv.as_bytes()).unwrap_err();
        assert!(matches!(
            err,
            CatalogLoadError::InvalidValue { row: 2, column: "product_id", .. }
        ));

        let csv = "product_id,name,category,price\n1,a,b,cheap\n";
        let err = load_catalog_from_reader(csv.as_bytes()).unwrap_err();
        assert!(matches!(err, CatalogLoadError::InvalidValue { column: "price", .. }));
    }

    #[test]
    fn duplicate_ids_pass_through() {
        let csv = "product_id,name,category\n1,a,b\n1,c,d\n";
        let items = load_catalog_from_reader(csv.as_bytes()).unwrap();
        assert_eq!(items.len(), 2);
    }

    #[test]
    fn over_long_row_fails_whole_load() {
        let csv = "product_id,name,category\n1,a,b\n2,c,d,EXTRA,MORE\n";
        let err = load_catalog_from_reader(csv.as_bytes()).unwrap_err();
        assert!(matches!(
            err,
            CatalogLoadError::RowLength { row: 2, expected: 3, found: 5 }
        ));
    }

    #[test]
    fn short_row_leaves_fields_empty() {
        let csv = "product_id,name,category,tags\n1,a\n";
        let items = load_catalog_from_reader(csv.as_bytes()).unwrap();
        assert_eq!(items[0].category, "");
        assert_eq!(items[0].tags, "");
    }

    #[test]
    fn unreadable_path_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_catalog(dir.path().join("missing.csv")).unwrap_err();
        assert!(matches!(err, CatalogLoadError::Io { .. }));
    }

    #[test]
    fn product_id_parsing() {
        assert_eq!(parse_product_id("12"), Some(12));
        assert_eq!(parse_product_id(" 12 "), Some(12));
        assert_eq!(parse_product_id("12.0"), Some(12));
        assert_eq!(parse_product_id("-3"), Some(-3));
        assert_eq!(parse_product_id("12.5"), None);
        assert_eq!(parse_product_id("abc"), None);
        assert_eq!(parse_product_id(""), None);
        assert_eq!(parse_product_id("NaN"), None);
    }
}
