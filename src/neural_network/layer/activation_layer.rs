use super::*;

/// ReLU (Rectified Linear Unit) activation layer
pub mod relu;
/// Sigmoid activation layer
pub mod sigmoid;

pub use relu::*;
pub use sigmoid::*;
