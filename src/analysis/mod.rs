//! Alpha-mask analysis used by deskew: cleanup, contour sampling and robust line fitting.

pub mod baseline;
pub mod contour;
pub mod mask;
