use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

/// Date format the products API stores audit dates in.
pub const DATE_FORMAT: &str = "%d/%m/%Y";

/// Render a date the way the products API stores it.
pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Product {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    pub name: String,
    pub sku: String,
    pub price: f64,
    #[serde(rename = "isFavorite", default)]
    pub is_favorite: bool,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: String,
    #[serde(default)]
    pub updated_by: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

/// Seed data files may carry numeric ids; they are kept as opaque strings.
fn deserialize_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Text(id) => id,
        RawId::Number(id) => id.to_string(),
    })
}

impl Product {
    /// Price formatted for display, e.g. `R$ 10,50`.
    pub fn display_price(&self) -> String {
        format!("R$ {:.2}", self.price).replace('.', ",")
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SortField {
    Name,
    Price,
}

impl SortField {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Price => "price",
        }
    }

    /// Label shown on the sort controls.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Name => "Nome",
            Self::Price => "Preço",
        }
    }
}

impl FromStr for SortField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "name" => Ok(Self::Name),
            "price" => Ok(Self::Price),
            _ => Err(format!("Invalid sort field: {}", s)),
        }
    }
}

impl fmt::Display for SortField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Boolean product attributes the list can be filtered on.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FilterField {
    Favorite,
}

impl FilterField {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Favorite => "favorite",
        }
    }

    /// Query-string key the products API filters this attribute by.
    pub fn query_key(&self) -> &'static str {
        match self {
            Self::Favorite => "favorite",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Favorite => "Favoritos",
        }
    }
}

impl FromStr for FilterField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "favorite" | "isFavorite" => Ok(Self::Favorite),
            _ => Err(format!("Invalid filter field: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProductFilter {
    pub field: FilterField,
    pub value: bool,
}

impl ProductFilter {
    pub fn favorites() -> Self {
        Self {
            field: FilterField::Favorite,
            value: true,
        }
    }
}

/// One request against the products collection.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ProductQuery {
    /// Unfiltered, unsorted; server order.
    #[default]
    All,
    SortedBy(SortField),
    NameLike(String),
    Filtered(ProductFilter),
}

impl ProductQuery {
    /// Query-string pairs for `GET /products`.
    pub fn to_query_pairs(&self) -> Vec<(&'static str, String)> {
        match self {
            Self::All => Vec::new(),
            Self::SortedBy(field) => vec![("_sort", field.as_str().to_string())],
            Self::NameLike(term) => vec![("name_like", term.clone())],
            Self::Filtered(filter) => vec![(filter.field.query_key(), filter.value.to_string())],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_product() -> Product {
        Product {
            id: "p-1".to_string(),
            name: "Geladeira".to_string(),
            sku: "GEL-01".to_string(),
            price: 3499.9,
            is_favorite: true,
            created_at: "01/02/2024".to_string(),
            updated_at: "03/02/2024".to_string(),
            updated_by: "Maria".to_string(),
            image: None,
        }
    }

    #[test]
    fn test_product_serializes_with_api_field_names() {
        let json = serde_json::to_value(sample_product()).unwrap();
        assert_eq!(json["isFavorite"], true);
        assert_eq!(json["created_at"], "01/02/2024");
        assert_eq!(json["updated_by"], "Maria");
        assert!(json.get("is_favorite").is_none());
        assert!(json.get("image").is_none());
    }

    #[test]
    fn test_product_deserializes_list_item_without_audit_fields() {
        let json = serde_json::json!({
            "id": "abc",
            "name": "Fogão",
            "sku": "FOG",
            "price": 10,
            "isFavorite": false,
            "image": "http://img/fogao.png"
        });
        let product: Product = serde_json::from_value(json).unwrap();
        assert_eq!(product.price, 10.0);
        assert!(product.created_at.is_empty());
        assert_eq!(product.image.as_deref(), Some("http://img/fogao.png"));
    }

    #[test]
    fn test_product_list_accepts_numeric_ids() {
        let json = serde_json::json!([
            { "id": 1, "name": "Fogão", "sku": "FOG", "price": 10 },
            { "id": "x-2", "name": "Geladeira", "sku": "GEL", "price": 20 }
        ]);
        let products: Vec<Product> = serde_json::from_value(json).unwrap();
        assert_eq!(products[0].id, "1");
        assert_eq!(products[1].id, "x-2");

        let missing = serde_json::json!({ "id": null, "name": "Fogão", "sku": "FOG", "price": 10 });
        assert!(serde_json::from_value::<Product>(missing).is_err());
    }

    #[test]
    fn test_display_price_uses_comma_decimal() {
        let mut product = sample_product();
        product.price = 10.5;
        assert_eq!(product.display_price(), "R$ 10,50");
    }

    #[test]
    fn test_format_date_is_day_month_year() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 7).unwrap();
        assert_eq!(format_date(date), "07/03/2024");
    }

    #[test]
    fn test_sort_field_parse() {
        assert_eq!("price".parse::<SortField>().unwrap(), SortField::Price);
        assert_eq!("name".parse::<SortField>().unwrap(), SortField::Name);
        assert!("sku".parse::<SortField>().is_err());
    }

    #[test]
    fn test_filter_field_parse_accepts_attribute_name() {
        assert_eq!("favorite".parse::<FilterField>().unwrap(), FilterField::Favorite);
        assert_eq!("isFavorite".parse::<FilterField>().unwrap(), FilterField::Favorite);
        assert!("price".parse::<FilterField>().is_err());
    }

    #[test]
    fn test_query_pairs() {
        assert!(ProductQuery::All.to_query_pairs().is_empty());
        assert_eq!(
            ProductQuery::SortedBy(SortField::Price).to_query_pairs(),
            vec![("_sort", "price".to_string())]
        );
        assert_eq!(
            ProductQuery::NameLike("gel".into()).to_query_pairs(),
            vec![("name_like", "gel".to_string())]
        );
        assert_eq!(
            ProductQuery::Filtered(ProductFilter::favorites()).to_query_pairs(),
            vec![("favorite", "true".to_string())]
        );
    }
}
