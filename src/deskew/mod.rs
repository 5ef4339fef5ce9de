/// Detection policy and entry points.
pub mod orchestrator;
/// Bounds-preserving image rotation.
pub mod rotate;
