//! Hourly price derivation
//!
//! Reservation prices are quoted for the whole commitment period, every other
//! billing model is already quoted per hour. Dividing reservations by the
//! number of hours in their term puts all rows on the same footing.

use crate::catalog::{PriceRecord, PriceType};
use crate::table::{PriceTable, PricedRecord};

/// Hours in a (non-leap) year
pub const HOURS_PER_YEAR: f64 = 365.0 * 24.0;

/// How a reservation term string is turned into a number of years
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TermMatching {
    /// Look for the digits "3", "1" and "5" anywhere in the term, in that
    /// order, and take the first hit. "13 Months" therefore counts as 3 years.
    #[default]
    Substring,
    /// Accept only "<N> Year" / "<N> Years" with N one of 1, 3 or 5.
    Exact,
}

/// Number of years a term string covers, if it is recognised
pub fn term_years(term: &str, matching: TermMatching) -> Option<u32> {
    match matching {
        TermMatching::Substring => ['3', '1', '5']
            .into_iter()
            .find(|digit| term.contains(*digit))
            .and_then(|digit| digit.to_digit(10)),
        TermMatching::Exact => {
            let (count, unit) = term.trim().split_once(char::is_whitespace)?;
            if !matches!(unit.trim().to_lowercase().as_str(), "year" | "years") {
                return None;
            }
            count.parse::<u32>().ok().filter(|years| matches!(years, 1 | 3 | 5))
        }
    }
}

/// Per-hour price of a normalized record
///
/// Never fails: anything that is not a reservation with a recognised term
/// keeps its retail price.
pub fn hourly_price(record: &PriceRecord, matching: TermMatching) -> f64 {
    if record.price_type != PriceType::Reservation {
        return record.retail_price;
    }

    match record
        .term
        .as_deref()
        .and_then(|term| term_years(term, matching))
    {
        Some(years) => record.retail_price / (f64::from(years) * HOURS_PER_YEAR),
        None => record.retail_price,
    }
}

/// Attach an hourly price to every record, producing the final table
pub fn derive_hourly_prices(records: Vec<PriceRecord>, matching: TermMatching) -> PriceTable {
    records
        .into_iter()
        .map(|record| {
            let hourly_price = hourly_price(&record, matching);
            PricedRecord {
                record,
                hourly_price,
            }
        })
        .collect()
}
