//! Field transformers for canonical normalization.
//!
//! Each transformer turns raw source text into a typed [`CanonicalValue`]
//! or a [`TransformError`] carrying the rejection reason.
//!
//! [`CanonicalValue`]: unify_model::CanonicalValue

#![deny(unsafe_code)]

pub mod error;
pub mod normalization;
pub mod transformer;

pub use error::TransformError;
pub use normalization::{
    DEFAULT_MIN_YEAR, DateTransformer, GenderTransformer, LocaleProfile, LookupTransformer,
    SalaryTransformer, TextTransformer, TimestampTransformer, apply_case, hash_password,
    normalize_phone, parse_integer,
};
pub use transformer::Transformer;
