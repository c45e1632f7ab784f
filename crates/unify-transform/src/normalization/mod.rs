//! Field-level normalization functions.
//!
//! - **date**: candidate-format date parsing
//! - **salary**: locale-aware currency amounts
//! - **gender**: per-source gender code tables
//! - **text**: trimming, casing, length limits
//! - **timestamp**: local epoch seconds to UTC
//! - **numeric**: integers and phone numbers
//! - **hash**: password hashing
//! - **lookup**: named code tables

pub mod date;
pub mod gender;
pub mod hash;
pub mod lookup;
pub mod numeric;
pub mod salary;
pub mod text;
pub mod timestamp;

pub use date::{DEFAULT_MIN_YEAR, DateTransformer};
pub use gender::GenderTransformer;
pub use hash::hash_password;
pub use lookup::LookupTransformer;
pub use numeric::{normalize_phone, parse_integer};
pub use salary::{LocaleProfile, SalaryTransformer};
pub use text::{TextTransformer, apply_case};
pub use timestamp::TimestampTransformer;
