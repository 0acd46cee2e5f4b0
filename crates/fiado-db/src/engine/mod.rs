//! # Engine Module
//!
//! Multi-entity transactional operations.
//!
//! Every engine method that mutates state runs inside ONE sqlx
//! transaction: either the whole operation commits, or nothing does.
//! Partial application (an installment marked paid without its payment
//! record, a restocked product for an undeleted item) is a correctness
//! violation, not a degraded mode.
//!
//! - [`settlement`] - receive a payment and settle oldest debt first
//! - [`sale`] - create, cancel, and shrink sales
//! - [`reporting`] - debtors report and dashboard aggregation

pub mod reporting;
pub mod sale;
pub mod settlement;
