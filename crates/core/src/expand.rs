//! Savings-plan expansion
//!
//! A consumption record may carry a list of savings-plan offers. Each offer is
//! promoted to its own row so that every row describes exactly one price.

use crate::catalog::{PriceRecord, PriceType, SavingsPlanOffer};
use crate::error::TransformError;

/// Expand every savings-plan offer into an independent row
///
/// Records with a non-empty `savings_plan` list produce one row per offer,
/// each a copy of the parent with `price_type`, `reservation_term` and
/// `retail_price` taken from the offer. Records without offers pass through
/// unchanged. The nested `savings_plan` list is kept on every row.
pub fn expand_savings_plans(
    records: Vec<PriceRecord>,
) -> Result<Vec<PriceRecord>, TransformError> {
    let mut expanded = Vec::with_capacity(records.len());

    for record in records {
        let has_offers = record
            .savings_plan
            .as_ref()
            .is_some_and(|offers| !offers.is_empty());

        if !has_offers {
            expanded.push(record);
            continue;
        }

        for offer in record.savings_plan.as_deref().unwrap_or_default() {
            expanded.push(apply_offer(&record, offer)?);
        }
    }

    Ok(expanded)
}

fn apply_offer(parent: &PriceRecord, offer: &SavingsPlanOffer) -> Result<PriceRecord, TransformError> {
    let retail_price = offer.retail_price.ok_or_else(|| TransformError::MissingField {
        field: "savingsPlan.retailPrice",
        sku_id: parent.sku_id.clone(),
    })?;

    let mut row = parent.clone();
    row.reservation_term = offer.term.clone();
    row.retail_price = retail_price;
    row.price_type = PriceType::SavingsPlan;
    Ok(row)
}
