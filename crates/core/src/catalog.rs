//! Retail price catalog API types
//!
//! The catalog returns heterogeneous records: reservations carry a term,
//! consumption meters carry savings-plan offers, and most descriptive fields
//! can be absent depending on the service. Everything except `retailPrice`
//! is therefore optional, and a missing `retailPrice` is kept as `NaN`.
//!
//! Items are decoded one by one so that a single malformed item does not take
//! the rest of its page down with it.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Default catalog endpoint
pub const DEFAULT_API_URL: &str =
    "https://prices.azure.com/api/retail/prices?api-version=2023-01-01-preview";

// =============================================================================
// API Response Types
// =============================================================================

/// One page of the catalog
#[derive(Debug, Deserialize, Clone, Default)]
#[serde(rename_all = "PascalCase")]
pub struct PricePage {
    #[serde(default)]
    pub billing_currency: Option<String>,
    #[serde(default)]
    pub customer_entity_id: Option<String>,
    #[serde(default)]
    pub customer_entity_type: Option<String>,
    pub items: Vec<serde_json::Value>,
    #[serde(default)]
    pub next_page_link: Option<String>,
    #[serde(default)]
    pub count: Option<u64>,
}

impl PricePage {
    /// The continuation link, if the page has a usable one
    ///
    /// The API signals the last page with either a missing field, `null`, or
    /// an empty string.
    pub fn next_link(&self) -> Option<&str> {
        self.next_page_link
            .as_deref()
            .map(str::trim)
            .filter(|link| !link.is_empty())
    }

    /// Decode every item, setting aside the ones that are not price records
    pub fn into_records(self) -> (Vec<PriceRecord>, Vec<RejectedItem>) {
        let mut records = Vec::with_capacity(self.items.len());
        let mut rejected = Vec::new();

        for (index, item) in self.items.into_iter().enumerate() {
            let sku_id = item
                .get("skuId")
                .and_then(serde_json::Value::as_str)
                .map(str::to_string);

            match serde_json::from_value::<PriceRecord>(item) {
                Ok(record) => records.push(record),
                Err(err) => rejected.push(RejectedItem {
                    index,
                    sku_id,
                    reason: err.to_string(),
                }),
            }
        }

        (records, rejected)
    }
}

/// A page item that could not be decoded as a [`PriceRecord`]
#[derive(Debug, Clone, PartialEq)]
pub struct RejectedItem {
    /// Position of the item on its page
    pub index: usize,
    pub sku_id: Option<String>,
    pub reason: String,
}

fn missing_price() -> f64 {
    f64::NAN
}

fn price_or_nan<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(f64::NAN))
}

/// A single SKU price offer
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct PriceRecord {
    #[serde(default)]
    pub currency_code: Option<String>,
    #[serde(default)]
    pub tier_minimum_units: Option<f64>,
    /// `NaN` when the catalog leaves the price out or sends `null`
    #[serde(default = "missing_price", deserialize_with = "price_or_nan")]
    pub retail_price: f64,
    #[serde(default)]
    pub unit_price: Option<f64>,
    #[serde(default)]
    pub arm_region_name: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub effective_start_date: Option<String>,
    #[serde(default)]
    pub effective_end_date: Option<String>,
    #[serde(default)]
    pub meter_id: Option<String>,
    #[serde(default)]
    pub meter_name: Option<String>,
    #[serde(default)]
    pub product_id: Option<String>,
    #[serde(default)]
    pub sku_id: Option<String>,
    #[serde(default)]
    pub product_name: Option<String>,
    #[serde(default)]
    pub sku_name: Option<String>,
    #[serde(default)]
    pub service_name: Option<String>,
    #[serde(default)]
    pub service_id: Option<String>,
    #[serde(default)]
    pub service_family: Option<String>,
    #[serde(default)]
    pub unit_of_measure: Option<String>,
    #[serde(rename = "type", default)]
    pub price_type: PriceType,
    #[serde(default)]
    pub is_primary_meter_region: Option<bool>,
    #[serde(default)]
    pub arm_sku_name: Option<String>,
    /// Commitment period as reported by the API ("1 Year", "3 Years", ...)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reservation_term: Option<String>,
    /// Normalized commitment period, populated from `reservation_term`
    #[serde(rename = "Term", default, skip_serializing_if = "Option::is_none")]
    pub term: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub savings_plan: Option<Vec<SavingsPlanOffer>>,
}

/// Savings-plan offer nested inside a consumption record
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct SavingsPlanOffer {
    #[serde(default)]
    pub unit_price: Option<f64>,
    #[serde(default)]
    pub retail_price: Option<f64>,
    #[serde(default)]
    pub term: Option<String>,
}

// =============================================================================
// Price type classification
// =============================================================================

/// Billing model of a price record
///
/// Serialized as the plain string the catalog uses, so unknown values from
/// the API survive a round trip through `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PriceType {
    Consumption,
    DevTestConsumption,
    Reservation,
    SavingsPlan,
    Spot,
    LowPriority,
    Other(String),
}

impl PriceType {
    pub fn as_str(&self) -> &str {
        match self {
            PriceType::Consumption => "Consumption",
            PriceType::DevTestConsumption => "DevTestConsumption",
            PriceType::Reservation => "Reservation",
            PriceType::SavingsPlan => "SavingsPlan",
            PriceType::Spot => "Spot",
            PriceType::LowPriority => "Low Priority",
            PriceType::Other(value) => value,
        }
    }
}

impl Default for PriceType {
    fn default() -> Self {
        PriceType::Other(String::new())
    }
}

impl From<String> for PriceType {
    fn from(value: String) -> Self {
        match value.as_str() {
            "Consumption" => PriceType::Consumption,
            "DevTestConsumption" => PriceType::DevTestConsumption,
            "Reservation" => PriceType::Reservation,
            "SavingsPlan" => PriceType::SavingsPlan,
            "Spot" => PriceType::Spot,
            "Low Priority" => PriceType::LowPriority,
            _ => PriceType::Other(value),
        }
    }
}

impl From<&str> for PriceType {
    fn from(value: &str) -> Self {
        PriceType::from(value.to_string())
    }
}

impl From<PriceType> for String {
    fn from(value: PriceType) -> Self {
        match value {
            PriceType::Other(value) => value,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for PriceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Request building
// =============================================================================

/// Build the first page URL from a base endpoint and optional query refinements
///
/// `currency` maps to `currencyCode='XYZ'` and `filter` to an OData `$filter`
/// expression. Both are URL-encoded and appended with `?` or `&` depending on
/// whether `base` already carries a query string.
pub fn build_catalog_url(base: &str, currency: Option<&str>, filter: Option<&str>) -> String {
    let mut url = base.trim().to_string();

    let mut params = Vec::new();
    if let Some(currency) = currency.map(str::trim).filter(|c| !c.is_empty()) {
        params.push(format!(
            "currencyCode={}",
            urlencoding::encode(&format!("'{}'", currency.to_uppercase()))
        ));
    }
    if let Some(filter) = filter.map(str::trim).filter(|f| !f.is_empty()) {
        params.push(format!("$filter={}", urlencoding::encode(filter)));
    }

    for param in params {
        let separator = if url.contains('?') { '&' } else { '?' };
        url.push(separator);
        url.push_str(&param);
    }

    url
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_PAGE: &str = r#"{
        "BillingCurrency": "USD",
        "CustomerEntityId": "Default",
        "CustomerEntityType": "Retail",
        "Items": [
            {
                "currencyCode": "USD",
                "tierMinimumUnits": 0.0,
                "reservationTerm": "1 Year",
                "retailPrice": 8760.0,
                "unitPrice": 8760.0,
                "armRegionName": "eastus",
                "location": "US East",
                "effectiveStartDate": "2023-05-01T00:00:00Z",
                "meterId": "0001",
                "meterName": "D2s v5",
                "productId": "DZH318Z0BQ4L",
                "skuId": "DZH318Z0BQ4L/0001",
                "productName": "Virtual Machines Dsv5 Series",
                "skuName": "D2s v5",
                "serviceName": "Virtual Machines",
                "serviceId": "DZH313Z7MMC8",
                "serviceFamily": "Compute",
                "unitOfMeasure": "1 Hour",
                "type": "Reservation",
                "isPrimaryMeterRegion": true,
                "armSkuName": "Standard_D2s_v5"
            },
            {
                "currencyCode": "USD",
                "retailPrice": 0.096,
                "armRegionName": "eastus",
                "location": "US East",
                "skuName": "D2s v5",
                "serviceName": "Virtual Machines",
                "type": "Consumption",
                "armSkuName": "Standard_D2s_v5",
                "savingsPlan": [
                    { "unitPrice": 0.06, "retailPrice": 0.06, "term": "1 Year" },
                    { "unitPrice": 0.04, "retailPrice": 0.04, "term": "3 Years" }
                ]
            }
        ],
        "NextPageLink": "https://prices.azure.com/api/retail/prices?$skip=100",
        "Count": 2
    }"#;

    #[test]
    fn test_parse_page() {
        let page: PricePage = serde_json::from_str(SAMPLE_PAGE).unwrap();

        assert_eq!(page.items.len(), 2);
        assert_eq!(page.count, Some(2));
        assert_eq!(page.billing_currency.as_deref(), Some("USD"));
        assert_eq!(
            page.next_link(),
            Some("https://prices.azure.com/api/retail/prices?$skip=100")
        );

        let (records, rejected) = page.into_records();
        assert!(rejected.is_empty());

        let reservation = &records[0];
        assert_eq!(reservation.price_type, PriceType::Reservation);
        assert_eq!(reservation.reservation_term.as_deref(), Some("1 Year"));
        assert_eq!(reservation.term, None);
        assert_eq!(reservation.is_primary_meter_region, Some(true));

        let consumption = &records[1];
        let offers = consumption.savings_plan.as_ref().unwrap();
        assert_eq!(offers.len(), 2);
        assert_eq!(offers[1].term.as_deref(), Some("3 Years"));
        assert_eq!(offers[1].retail_price, Some(0.04));
    }

    #[test]
    fn test_next_link_null_or_empty() {
        let page: PricePage =
            serde_json::from_str(r#"{"Items": [], "NextPageLink": null}"#).unwrap();
        assert_eq!(page.next_link(), None);

        let page: PricePage =
            serde_json::from_str(r#"{"Items": [], "NextPageLink": ""}"#).unwrap();
        assert_eq!(page.next_link(), None);

        let page: PricePage = serde_json::from_str(r#"{"Items": []}"#).unwrap();
        assert_eq!(page.next_link(), None);
    }

    #[test]
    fn test_page_without_items_is_rejected() {
        let result = serde_json::from_str::<PricePage>(r#"{"NextPageLink": null}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_null_or_missing_retail_price_is_nan() {
        let record: PriceRecord =
            serde_json::from_str(r#"{"retailPrice": null, "type": "Consumption"}"#).unwrap();
        assert!(record.retail_price.is_nan());

        let record: PriceRecord = serde_json::from_str(r#"{"type": "Consumption"}"#).unwrap();
        assert!(record.retail_price.is_nan());
    }

    #[test]
    fn test_malformed_item_is_set_aside() {
        let page: PricePage = serde_json::from_str(
            r#"{
                "Items": [
                    { "skuId": "A/1", "retailPrice": 1.0 },
                    { "skuId": "B/1", "retailPrice": "free" },
                    { "skuId": "C/1", "retailPrice": 3.0, "isPrimaryMeterRegion": "yes" },
                    { "skuId": "D/1", "retailPrice": null }
                ]
            }"#,
        )
        .unwrap();

        let (records, rejected) = page.into_records();

        let kept: Vec<&str> = records.iter().filter_map(|r| r.sku_id.as_deref()).collect();
        assert_eq!(kept, vec!["A/1", "D/1"]);
        assert_eq!(rejected.len(), 2);
        assert_eq!(rejected[0].index, 1);
        assert_eq!(rejected[0].sku_id.as_deref(), Some("B/1"));
        assert_eq!(rejected[1].index, 2);
        assert!(rejected[1].reason.contains("boolean"));
    }

    #[test]
    fn test_price_type_round_trip_unknown_value() {
        let record: PriceRecord =
            serde_json::from_str(r#"{"retailPrice": 1.0, "type": "Commitment"}"#).unwrap();
        assert_eq!(record.price_type, PriceType::Other("Commitment".to_string()));

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["type"], "Commitment");
    }

    #[test]
    fn test_price_type_low_priority_string() {
        assert_eq!(PriceType::from("Low Priority"), PriceType::LowPriority);
        assert_eq!(PriceType::LowPriority.to_string(), "Low Priority");
    }

    #[test]
    fn test_missing_type_defaults_to_empty_other() {
        let record: PriceRecord = serde_json::from_str(r#"{"retailPrice": 2.5}"#).unwrap();
        assert_eq!(record.price_type, PriceType::Other(String::new()));
        assert_eq!(record.retail_price, 2.5);
    }

    #[test]
    fn test_build_catalog_url_plain() {
        assert_eq!(
            build_catalog_url(DEFAULT_API_URL, None, None),
            DEFAULT_API_URL.to_string()
        );
    }

    #[test]
    fn test_build_catalog_url_with_currency_and_filter() {
        let url = build_catalog_url(
            DEFAULT_API_URL,
            Some("eur"),
            Some("serviceName eq 'Virtual Machines'"),
        );

        assert!(url.starts_with(DEFAULT_API_URL));
        assert!(url.contains("&currencyCode=%27EUR%27"));
        assert!(url.contains("&$filter=serviceName%20eq%20%27Virtual%20Machines%27"));
    }

    #[test]
    fn test_build_catalog_url_without_existing_query() {
        let url = build_catalog_url("https://example.com/prices", None, Some("x eq 1"));
        assert_eq!(url, "https://example.com/prices?$filter=x%20eq%201");
    }

    #[test]
    fn test_build_catalog_url_ignores_blank_values() {
        let url = build_catalog_url("https://example.com/prices", Some("  "), Some(""));
        assert_eq!(url, "https://example.com/prices");
    }
}
