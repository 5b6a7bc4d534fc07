//! Column normalization: spot/low-priority reclassification and term renaming

use crate::catalog::{PriceRecord, PriceType};

const SPOT_MARKER: &str = "spot";
const LOW_PRIORITY_MARKER: &str = "low priority";

/// Reclassify a price type from the SKU name
///
/// The spot rule runs first and the low-priority rule second, so a SKU name
/// carrying both markers ends up as `LowPriority`. Matching ignores case.
pub fn classify(sku_name: Option<&str>, current: &PriceType) -> PriceType {
    let Some(sku_name) = sku_name else {
        return current.clone();
    };
    let sku_name = sku_name.to_lowercase();

    let mut price_type = current.clone();
    if sku_name.contains(SPOT_MARKER) {
        price_type = PriceType::Spot;
    }
    if sku_name.contains(LOW_PRIORITY_MARKER) {
        price_type = PriceType::LowPriority;
    }
    price_type
}

/// Normalize a single record in place
pub fn normalize_record(record: &mut PriceRecord) {
    record.price_type = classify(record.sku_name.as_deref(), &record.price_type);

    if let Some(term) = record.reservation_term.take() {
        record.term = Some(term);
    }
}

/// Normalize every record; applying this twice is the same as applying it once
pub fn normalize_records(mut records: Vec<PriceRecord>) -> Vec<PriceRecord> {
    records.iter_mut().for_each(normalize_record);
    records
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(sku_name: Option<&str>, price_type: PriceType) -> PriceRecord {
        PriceRecord {
            sku_name: sku_name.map(str::to_string),
            price_type,
            retail_price: 1.0,
            ..Default::default()
        }
    }

    #[test]
    fn test_spot_is_case_insensitive() {
        assert_eq!(
            classify(Some("D2s v5 SPOT"), &PriceType::Consumption),
            PriceType::Spot
        );
        assert_eq!(
            classify(Some("d2s v5 spot"), &PriceType::Consumption),
            PriceType::Spot
        );
    }

    #[test]
    fn test_low_priority_is_case_insensitive() {
        assert_eq!(
            classify(Some("A1 low PRIORITY"), &PriceType::Consumption),
            PriceType::LowPriority
        );
    }

    #[test]
    fn test_low_priority_wins_over_spot() {
        assert_eq!(
            classify(Some("Spot Low Priority"), &PriceType::Consumption),
            PriceType::LowPriority
        );
    }

    #[test]
    fn test_other_names_keep_type() {
        assert_eq!(
            classify(Some("D2s v5"), &PriceType::Reservation),
            PriceType::Reservation
        );
        assert_eq!(classify(None, &PriceType::SavingsPlan), PriceType::SavingsPlan);
    }

    #[test]
    fn test_reservation_term_moves_to_term() {
        let mut rec = record(Some("D2s v5"), PriceType::Reservation);
        rec.reservation_term = Some("3 Years".to_string());

        normalize_record(&mut rec);

        assert_eq!(rec.reservation_term, None);
        assert_eq!(rec.term.as_deref(), Some("3 Years"));
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let mut reserved = record(Some("D4 v3"), PriceType::Reservation);
        reserved.reservation_term = Some("1 Year".to_string());
        let records = vec![
            record(Some("D2 v3 Spot"), PriceType::Consumption),
            record(Some("A1 Low Priority"), PriceType::Consumption),
            record(Some("D2 v3"), PriceType::DevTestConsumption),
            record(None, PriceType::Consumption),
            reserved,
        ];

        let once = normalize_records(records);
        let twice = normalize_records(once.clone());

        assert_eq!(once, twice);
        let types: Vec<&PriceType> = once.iter().map(|r| &r.price_type).collect();
        assert_eq!(
            types,
            vec![
                &PriceType::Spot,
                &PriceType::LowPriority,
                &PriceType::DevTestConsumption,
                &PriceType::Consumption,
                &PriceType::Reservation,
            ]
        );
        assert_eq!(once[4].term.as_deref(), Some("1 Year"));
    }
}
