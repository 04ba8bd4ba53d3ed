//! Numeric utilities shared by the forecasting models.

pub mod ols;
pub mod optimization;
pub mod stats;

pub use ols::{ridge_fit, LeastSquaresFit};
pub use optimization::{nelder_mead, NelderMeadConfig, NelderMeadResult};
pub use stats::z_score;
