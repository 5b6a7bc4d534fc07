//! Deduplicated reference extracts derived from the final table

use crate::table::PriceTable;
use serde::Serialize;
use std::collections::HashSet;
use std::hash::Hash;

/// Service whose SKUs go into the SKU extract
pub const VIRTUAL_MACHINES_SERVICE: &str = "Virtual Machines";

/// A region code and its display name
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct RegionEntry {
    #[serde(rename = "armRegionName")]
    pub arm_region_name: Option<String>,
    pub location: Option<String>,
}

/// A virtual machine SKU display name and its ARM code
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct SkuEntry {
    #[serde(rename = "skuName")]
    pub sku_name: Option<String>,
    #[serde(rename = "armSkuName")]
    pub arm_sku_name: Option<String>,
}

/// Keep the first occurrence of every value, preserving order
fn dedup_in_order<T, I>(values: I) -> Vec<T>
where
    T: Eq + Hash + Clone,
    I: IntoIterator<Item = T>,
{
    let mut seen = HashSet::new();
    values
        .into_iter()
        .filter(|value| seen.insert(value.clone()))
        .collect()
}

/// Distinct `(armRegionName, location)` pairs
pub fn distinct_regions(table: &PriceTable) -> Vec<RegionEntry> {
    dedup_in_order(table.iter().map(|row| RegionEntry {
        arm_region_name: row.record.arm_region_name.clone(),
        location: row.record.location.clone(),
    }))
}

/// Distinct `(skuName, armSkuName)` pairs of virtual machine SKUs
///
/// Only rows of the "Virtual Machines" service are considered, and ARM SKU
/// names containing "type" (any case) are left out. A missing ARM SKU name
/// does not exclude the row.
pub fn distinct_vm_skus(table: &PriceTable) -> Vec<SkuEntry> {
    dedup_in_order(
        table
            .iter()
            .map(|row| &row.record)
            .filter(|record| record.service_name.as_deref() == Some(VIRTUAL_MACHINES_SERVICE))
            .filter(|record| {
                !record
                    .arm_sku_name
                    .as_deref()
                    .is_some_and(|name| name.to_lowercase().contains("type"))
            })
            .map(|record| SkuEntry {
                sku_name: record.sku_name.clone(),
                arm_sku_name: record.arm_sku_name.clone(),
            }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::PriceRecord;
    use crate::table::PricedRecord;

    fn row(region: &str, location: &str, service: &str, sku: &str, arm_sku: Option<&str>) -> PricedRecord {
        PricedRecord {
            record: PriceRecord {
                arm_region_name: Some(region.to_string()),
                location: Some(location.to_string()),
                service_name: Some(service.to_string()),
                sku_name: Some(sku.to_string()),
                arm_sku_name: arm_sku.map(str::to_string),
                retail_price: 1.0,
                ..Default::default()
            },
            hourly_price: 1.0,
        }
    }

    fn table() -> PriceTable {
        PriceTable::new(vec![
            row("eastus", "US East", "Virtual Machines", "D2s v5", Some("Standard_D2s_v5")),
            row("eastus", "US East", "Virtual Machines", "D2s v5", Some("Standard_D2s_v5")),
            row("westeurope", "EU West", "Virtual Machines", "D4s v5", Some("Standard_D4s_v5")),
            row("eastus", "US East", "Storage", "Hot LRS", Some("Hot_LRS")),
            row("westeurope", "EU West", "Virtual Machines", "DC Type", Some("DedicatedHost_Type1")),
            row("eastus", "US East", "Virtual Machines", "Misc", None),
        ])
    }

    #[test]
    fn test_distinct_regions_unique_pairs() {
        let regions = distinct_regions(&table());

        assert_eq!(
            regions,
            vec![
                RegionEntry {
                    arm_region_name: Some("eastus".to_string()),
                    location: Some("US East".to_string()),
                },
                RegionEntry {
                    arm_region_name: Some("westeurope".to_string()),
                    location: Some("EU West".to_string()),
                },
            ]
        );
    }

    #[test]
    fn test_distinct_vm_skus_filters_service_and_type() {
        let skus = distinct_vm_skus(&table());
        let names: Vec<Option<&str>> = skus.iter().map(|s| s.arm_sku_name.as_deref()).collect();

        assert_eq!(
            names,
            vec![Some("Standard_D2s_v5"), Some("Standard_D4s_v5"), None]
        );
    }

    #[test]
    fn test_type_exclusion_is_case_insensitive() {
        let table = PriceTable::new(vec![row(
            "eastus",
            "US East",
            "Virtual Machines",
            "X",
            Some("some_TYPE_sku"),
        )]);
        assert!(distinct_vm_skus(&table).is_empty());
    }

    #[test]
    fn test_empty_table() {
        let table = PriceTable::default();
        assert!(distinct_regions(&table).is_empty());
        assert!(distinct_vm_skus(&table).is_empty());
    }
}
