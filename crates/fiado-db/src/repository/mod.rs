//! # Repository Module
//!
//! Per-entity database queries. Multi-entity transactional operations
//! live in [`crate::engine`], not here.

pub mod customer;
pub mod debt_payment;
pub mod product;
pub mod quote;
pub mod sale;
