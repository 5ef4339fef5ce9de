//! Canvas geometry: subject/reflection rectangles and resolution-independent effect values.

/// Scale-invariant effect parameters.
pub mod scale;
/// Subject, product and reflection rectangles.
pub mod solver;
