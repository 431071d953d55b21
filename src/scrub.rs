//! Per-value normalizers shared by every pipeline.
//!
//! Each function here works on one cell at a time and never fails: values
//! that cannot be cleaned degrade to a sentinel chosen by the caller.

pub mod date;
pub mod identifier;
pub mod phone;

pub use date::{DateFailurePolicy, DateNormalizer, is_iso_date};
pub use identifier::is_valid_person_id;
pub use phone::normalize_phone;
