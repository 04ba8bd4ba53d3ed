//! Series transformations applied before model fitting.

mod interpolate;

pub use interpolate::interpolate_gaps;
