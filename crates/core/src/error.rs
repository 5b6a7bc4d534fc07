//! Errors raised by the transformation stages

/// A record could not be turned into a final table row
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum TransformError {
    #[error("record {} is missing required field `{field}`", .sku_id.as_deref().unwrap_or("<unknown sku>"))]
    MissingField {
        field: &'static str,
        sku_id: Option<String>,
    },
}
