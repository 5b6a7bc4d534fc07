//! Core library for pricelist
//!
//! This crate implements the **Functional Core** of the pricelist application,
//! following the Functional Core - Imperative Shell architectural pattern.
//!
//! # Architecture Overview
//!
//! The pricelist project uses a two-crate architecture to enforce separation of concerns:
//!
//! - **`pricelist_core`** (this crate): Pure transformation functions with zero I/O
//! - **`pricelist`**: HTTP fetching, file sinks and orchestration (the Imperative Shell)
//!
//! ## Functional Core Principles
//!
//! All functions in this crate adhere to these principles:
//!
//! - **Pure functions**: Same input always produces the same output
//! - **No side effects**: No I/O operations, no external state mutations
//! - **Testable**: Can be tested with simple fixture data, no mocking required
//!
//! # Module Organization
//!
//! - [`catalog`]: Retail price API types and request URL building
//! - [`pagination`]: Next-page link frontier used by the page walker
//! - [`expand`]: Savings-plan offers promoted to rows
//! - [`normalize`]: Spot / low-priority reclassification and term renaming
//! - [`hourly`]: Uniform hourly price across billing models
//! - [`table`]: Final table rows and column layout shared by every sink
//! - [`distinct`]: Region and virtual machine SKU reference extracts
//! - [`pipeline`]: The stages above chained together
//!
//! # Example Usage
//!
//! ```rust
//! use pricelist_core::catalog::{PriceRecord, PriceType};
//! use pricelist_core::hourly::TermMatching;
//! use pricelist_core::pipeline::transform;
//!
//! let items = vec![PriceRecord {
//!     price_type: PriceType::Reservation,
//!     reservation_term: Some("1 Year".to_string()),
//!     retail_price: 8760.0,
//!     ..Default::default()
//! }];
//!
//! let table = transform(items, TermMatching::Substring).unwrap();
//!
//! assert_eq!(table.len(), 1);
//! assert_eq!(table.rows()[0].hourly_price, 1.0);
//! ```

pub mod catalog;
pub mod distinct;
pub mod error;
pub mod expand;
pub mod hourly;
pub mod normalize;
pub mod pagination;
pub mod pipeline;
pub mod table;

pub use error::TransformError;
