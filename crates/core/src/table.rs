//! Final table layout
//!
//! The final table is a flat list of priced records plus a fixed column
//! layout. Sinks (CSV, Parquet, terminal) read cells through [`Column`] so
//! they all agree on column names, order and value kinds.

use crate::catalog::PriceRecord;
use serde::Serialize;
use std::borrow::Cow;

/// A record with its derived hourly price
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PricedRecord {
    #[serde(flatten)]
    pub record: PriceRecord,
    #[serde(rename = "HourlyPrice")]
    pub hourly_price: f64,
}

/// The accumulated, expanded, normalized and priced dataset
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PriceTable {
    rows: Vec<PricedRecord>,
}

impl PriceTable {
    pub fn new(rows: Vec<PricedRecord>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[PricedRecord] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PricedRecord> {
        self.rows.iter()
    }
}

impl FromIterator<PricedRecord> for PriceTable {
    fn from_iter<I: IntoIterator<Item = PricedRecord>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a PriceTable {
    type Item = &'a PricedRecord;
    type IntoIter = std::slice::Iter<'a, PricedRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}

/// Value kind of a column, used by typed sinks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Text,
    Float,
    Bool,
}

/// A single cell value
#[derive(Debug, Clone, PartialEq)]
pub enum Cell<'a> {
    Text(Option<Cow<'a, str>>),
    Float(Option<f64>),
    Bool(Option<bool>),
}

impl Cell<'_> {
    /// Render for text sinks; missing values and `NaN` become an empty string
    pub fn render(&self) -> String {
        match self {
            Cell::Text(value) => value.as_deref().unwrap_or_default().to_string(),
            Cell::Float(value) => value
                .filter(|v| !v.is_nan())
                .map(|v| v.to_string())
                .unwrap_or_default(),
            Cell::Bool(value) => value.map(|v| v.to_string()).unwrap_or_default(),
        }
    }
}

/// Columns of the final table, in output order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Column {
    CurrencyCode,
    TierMinimumUnits,
    RetailPrice,
    UnitPrice,
    ArmRegionName,
    Location,
    EffectiveStartDate,
    EffectiveEndDate,
    MeterId,
    MeterName,
    ProductId,
    SkuId,
    ProductName,
    SkuName,
    ServiceName,
    ServiceId,
    ServiceFamily,
    UnitOfMeasure,
    Type,
    IsPrimaryMeterRegion,
    ArmSkuName,
    Term,
    SavingsPlan,
    HourlyPrice,
}

impl Column {
    pub const ALL: [Column; 24] = [
        Column::CurrencyCode,
        Column::TierMinimumUnits,
        Column::RetailPrice,
        Column::UnitPrice,
        Column::ArmRegionName,
        Column::Location,
        Column::EffectiveStartDate,
        Column::EffectiveEndDate,
        Column::MeterId,
        Column::MeterName,
        Column::ProductId,
        Column::SkuId,
        Column::ProductName,
        Column::SkuName,
        Column::ServiceName,
        Column::ServiceId,
        Column::ServiceFamily,
        Column::UnitOfMeasure,
        Column::Type,
        Column::IsPrimaryMeterRegion,
        Column::ArmSkuName,
        Column::Term,
        Column::SavingsPlan,
        Column::HourlyPrice,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Column::CurrencyCode => "currencyCode",
            Column::TierMinimumUnits => "tierMinimumUnits",
            Column::RetailPrice => "retailPrice",
            Column::UnitPrice => "unitPrice",
            Column::ArmRegionName => "armRegionName",
            Column::Location => "location",
            Column::EffectiveStartDate => "effectiveStartDate",
            Column::EffectiveEndDate => "effectiveEndDate",
            Column::MeterId => "meterId",
            Column::MeterName => "meterName",
            Column::ProductId => "productId",
            Column::SkuId => "skuId",
            Column::ProductName => "productName",
            Column::SkuName => "skuName",
            Column::ServiceName => "serviceName",
            Column::ServiceId => "serviceId",
            Column::ServiceFamily => "serviceFamily",
            Column::UnitOfMeasure => "unitOfMeasure",
            Column::Type => "type",
            Column::IsPrimaryMeterRegion => "isPrimaryMeterRegion",
            Column::ArmSkuName => "armSkuName",
            Column::Term => "Term",
            Column::SavingsPlan => "savingsPlan",
            Column::HourlyPrice => "HourlyPrice",
        }
    }

    pub fn kind(self) -> ColumnKind {
        match self {
            Column::TierMinimumUnits
            | Column::RetailPrice
            | Column::UnitPrice
            | Column::HourlyPrice => ColumnKind::Float,
            Column::IsPrimaryMeterRegion => ColumnKind::Bool,
            _ => ColumnKind::Text,
        }
    }

    /// Header row for text sinks
    pub fn headers() -> Vec<&'static str> {
        Self::ALL.iter().map(|column| column.name()).collect()
    }
}

fn text(value: &Option<String>) -> Cell<'_> {
    Cell::Text(value.as_deref().map(Cow::Borrowed))
}

impl PricedRecord {
    /// Value of `column` for this row
    pub fn cell(&self, column: Column) -> Cell<'_> {
        let r = &self.record;
        match column {
            Column::CurrencyCode => text(&r.currency_code),
            Column::TierMinimumUnits => Cell::Float(r.tier_minimum_units),
            Column::RetailPrice => Cell::Float(Some(r.retail_price)),
            Column::UnitPrice => Cell::Float(r.unit_price),
            Column::ArmRegionName => text(&r.arm_region_name),
            Column::Location => text(&r.location),
            Column::EffectiveStartDate => text(&r.effective_start_date),
            Column::EffectiveEndDate => text(&r.effective_end_date),
            Column::MeterId => text(&r.meter_id),
            Column::MeterName => text(&r.meter_name),
            Column::ProductId => text(&r.product_id),
            Column::SkuId => text(&r.sku_id),
            Column::ProductName => text(&r.product_name),
            Column::SkuName => text(&r.sku_name),
            Column::ServiceName => text(&r.service_name),
            Column::ServiceId => text(&r.service_id),
            Column::ServiceFamily => text(&r.service_family),
            Column::UnitOfMeasure => text(&r.unit_of_measure),
            Column::Type => Cell::Text(Some(Cow::Borrowed(r.price_type.as_str()))),
            Column::IsPrimaryMeterRegion => Cell::Bool(r.is_primary_meter_region),
            Column::ArmSkuName => text(&r.arm_sku_name),
            Column::Term => text(&r.term),
            Column::SavingsPlan => Cell::Text(
                r.savings_plan
                    .as_ref()
                    .and_then(|offers| serde_json::to_string(offers).ok())
                    .map(Cow::Owned),
            ),
            Column::HourlyPrice => Cell::Float(Some(self.hourly_price)),
        }
    }

    /// Every cell rendered as text, in column order
    pub fn rendered(&self) -> Vec<String> {
        Column::ALL
            .iter()
            .map(|column| self.cell(*column).render())
            .collect()
    }
}
