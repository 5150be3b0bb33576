//! Curve types.
//!
//! The bootstrap produces a [`DiscountCurve`]: continuously compounded zero
//! rates on year-fraction nodes, linearly interpolated and held flat beyond
//! the first and last node.

mod discount;

pub use discount::DiscountCurve;
