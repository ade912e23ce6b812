//! Day-summary calculation engine for CLT time and attendance.
//!
//! Turns up to four punches and a scheduled shift into worked, expected and
//! balance figures, informal deviation indicators, and the CLT art. 58 §1º
//! tolerance figures under an hour-bank or payroll policy. Every result
//! carries an ordered audit trail.

#![warn(missing_docs)]

pub mod api;
pub mod calculation;
pub mod config;
pub mod error;
pub mod models;
