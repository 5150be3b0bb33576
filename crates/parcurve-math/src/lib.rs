//! # Parcurve Math
//!
//! Numerical primitives used by curve calibration.
//!
//! This crate provides:
//!
//! - **Solvers**: Multidimensional Newton root finding with a finite-difference
//!   Jacobian
//! - **Linear Algebra**: SVD pseudo-inverse and least-squares solves
//! - **Interpolation**: Linear interpolation with configurable extrapolation

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::similar_names)]
#![allow(clippy::many_single_char_names)]
#![allow(clippy::unreadable_literal)]
#![allow(clippy::uninlined_format_args)]

pub mod error;
pub mod interpolation;
pub mod linear_algebra;
pub mod solvers;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::error::{MathError, MathResult};
    pub use crate::interpolation::{ExtrapolationMethod, Interpolator, LinearInterpolator};
    pub use crate::solvers::{
        find_root_scalar, NewtonVectorRootFinder, SolverConfig, SolverResult,
        VectorSolverResult,
    };
}

pub use error::{MathError, MathResult};
