//! Composition of the transformation stages

use crate::catalog::PriceRecord;
use crate::error::TransformError;
use crate::expand::expand_savings_plans;
use crate::hourly::{derive_hourly_prices, TermMatching};
use crate::normalize::normalize_records;
use crate::table::PriceTable;

/// Turn the raw catalog items into the final table
///
/// Expansion, normalization and hourly pricing run in that order. Row order
/// follows the input; callers must not read meaning into it.
pub fn transform(
    records: Vec<PriceRecord>,
    matching: TermMatching,
) -> Result<PriceTable, TransformError> {
    let expanded = expand_savings_plans(records)?;
    let normalized = normalize_records(expanded);
    Ok(derive_hourly_prices(normalized, matching))
}
