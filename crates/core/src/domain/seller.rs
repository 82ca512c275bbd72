use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::count::{parse_count_str, NOT_AVAILABLE};
use crate::domain::enrichment::Enrichment;

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SellerId(pub String);

impl SellerId {
    /// Lookup key; seller ids compare case-insensitively.
    pub fn normalized(&self) -> String {
        self.0.trim().to_lowercase()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SellerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// One marketplace seller profile as produced by the scraping pipeline.
///
/// The scraper's original column names are accepted as aliases so its output
/// can be loaded without a conversion step.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SellerRecord {
    #[serde(alias = "UserID")]
    pub user_id: SellerId,
    #[serde(alias = "UserName")]
    pub user_name: String,
    #[serde(alias = "Seller Rating", default, deserialize_with = "deserialize_rating")]
    pub rating: Option<f64>,
    #[serde(alias = "Sold", default = "not_available", deserialize_with = "deserialize_count")]
    pub sold_raw: String,
    #[serde(alias = "Reviews", default = "not_available", deserialize_with = "deserialize_count")]
    pub reviews_raw: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enrichment: Option<Enrichment>,
}

impl SellerRecord {
    /// Rating used in comparisons; an absent rating reads as `0.0`.
    pub fn rating_value(&self) -> f64 {
        self.rating.unwrap_or(0.0)
    }

    pub fn sold(&self) -> f64 {
        parse_count_str(&self.sold_raw)
    }

    pub fn reviews(&self) -> f64 {
        parse_count_str(&self.reviews_raw)
    }

    /// Display name as lookup keys compare it.
    pub fn normalized_name(&self) -> String {
        self.user_name.trim().to_lowercase()
    }

    pub fn rating_display(&self) -> String {
        self.rating.map(format_rating).unwrap_or_else(|| NOT_AVAILABLE.to_string())
    }
}

/// Renders ratings the way the marketplace shows them (`5.0`, `4.85`).
pub fn format_rating(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.1}")
    } else {
        format!("{value}")
    }
}

fn not_available() -> String {
    NOT_AVAILABLE.to_string()
}

fn deserialize_rating<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    let rating = match value {
        Some(Value::Number(number)) => number.as_f64(),
        Some(Value::String(raw)) => raw.trim().parse::<f64>().ok(),
        _ => None,
    };
    Ok(rating.filter(|rating| rating.is_finite()))
}

fn deserialize_count<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(raw)) => raw,
        Some(Value::Number(number)) => number.to_string(),
        _ => not_available(),
    })
}

#[cfg(test)]
mod tests {
    use super::{format_rating, SellerId, SellerRecord};

    #[test]
    fn accepts_scraper_column_names() {
        let record: SellerRecord = serde_json::from_str(
            r#"{
                "UserID": "cardking",
                "UserName": "Card King",
                "Seller Rating": 4.95,
                "Sold": "3.2K",
                "Reviews": "812",
                "Followers": "10K"
            }"#,
        )
        .expect("scraper record should deserialize");

        assert_eq!(record.user_id, SellerId("cardking".to_string()));
        assert_eq!(record.rating, Some(4.95));
        assert_eq!(record.sold(), 3_200.0);
        assert_eq!(record.reviews(), 812.0);
        assert!(record.enrichment.is_none());
    }

    #[test]
    fn unavailable_values_become_markers() {
        let record: SellerRecord = serde_json::from_str(
            r#"{"user_id": "ghost", "user_name": "Ghost", "rating": "N/A", "sold_raw": null}"#,
        )
        .expect("sparse record should deserialize");

        assert_eq!(record.rating, None);
        assert_eq!(record.rating_value(), 0.0);
        assert_eq!(record.rating_display(), "N/A");
        assert_eq!(record.sold_raw, "N/A");
        assert_eq!(record.reviews_raw, "N/A");
        assert_eq!(record.sold(), 0.0);
    }

    #[test]
    fn numeric_strings_and_numbers_are_accepted() {
        let record: SellerRecord = serde_json::from_str(
            r#"{"user_id": "a", "user_name": "A", "rating": "4.9", "sold_raw": 150, "reviews_raw": "1.1K"}"#,
        )
        .expect("mixed record should deserialize");

        assert_eq!(record.rating, Some(4.9));
        assert_eq!(record.sold_raw, "150");
        assert_eq!(record.reviews(), 1_100.0);
    }

    #[test]
    fn ratings_render_with_one_decimal_minimum() {
        assert_eq!(format_rating(5.0), "5.0");
        assert_eq!(format_rating(4.85), "4.85");
        assert_eq!(format_rating(4.9), "4.9");
    }

    #[test]
    fn display_name_normalizes_case_and_padding() {
        let record: SellerRecord =
            serde_json::from_str(r#"{"user_id": "a", "user_name": "  Card KING "}"#)
                .expect("record should deserialize");
        assert_eq!(record.normalized_name(), "card king");
    }

    #[test]
    fn seller_id_normalizes_case() {
        assert_eq!(SellerId(" CardKing ".to_string()).normalized(), "cardking");
    }
}
