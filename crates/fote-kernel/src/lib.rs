//! # FOTE Kernel
//!
//! First Order Taylor Expansion null finding: from four simultaneous field
//! and position measurements, estimate the field's Jacobian, classify the
//! topology of the nearby null, locate it, and check the linear model
//! against the measurements it came from.
//!
//! ## Architecture
//!
//! ```text
//! Tetrahedron            ← four probe positions
//!     │
//! ReciprocalBasis        ← k_0..k_3, one per vertex
//!     │
//! GradientTensor         ← G = Σ B_i ⊗ k_i, divergence-cleaned
//!     │
//!     ├── EigenSpectrum        ← closed-form cubic roots of G
//!     │       │
//!     │   NullClassifier       ← ten-way decision tree
//!     │
//!     ├── NullPositionSolver   ← G · Δr = −B_bary
//!     │
//!     └── reconstruction       ← max |B_i − B_model(R_i)|
//! ```
//!
//! Every stage is a pure function of one [`Sample`]; [`FoteEngine::row`]
//! runs them all and never fails, degrading to NaN/`Undetermined` fields.

pub mod classify;
pub mod config;
pub mod eigen;
pub mod error;
pub mod geometry;
pub mod gradient;
pub mod linalg;
pub mod position;
pub mod reconstruction;
pub mod sample;

pub use classify::{ClassificationResult, NullClassifier, NullType};
pub use config::FoteConfig;
pub use eigen::{EigenSpectrum, eigenvalues};
pub use error::FoteError;
pub use geometry::{ReciprocalBasis, Tetrahedron, compute_reciprocal_vectors};
pub use gradient::{GradientTensor, estimate_gradient};
pub use linalg::{Mat3, Vec3};
pub use position::{NullLocality, NullPosition, NullPositionSolver};
pub use reconstruction::max_reconstruction_error;
pub use sample::{FoteEngine, NullEstimate, NullRow, Sample};
