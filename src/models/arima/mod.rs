//! ARIMA (Autoregressive Integrated Moving Average) models.
//!
//! This module provides:
//! - ARIMA models with fixed (p, d, q) orders, fitted by conditional sum of squares
//! - Differencing helpers and the polynomial expansion used for interval variance

mod diff;
mod model;

pub use diff::{difference, integrate, integrated_ar};
pub use model::{ARIMASpec, ARIMA};
