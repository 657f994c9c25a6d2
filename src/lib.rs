#![cfg_attr(docsrs, feature(doc_cfg))]
//! # Subdivision Limit Surface Evaluation
//!
//! Evaluates points on the smooth [limit
//! surface](https://en.wikipedia.org/wiki/Subdivision_surface) of a
//! subdivision mesh at arbitrary parametric coordinates, without performing
//! any refinement at query time.
//!
//! The crate consumes patch tables produced by a feature-adaptive refinement
//! stage (which is *not* part of this crate): a list of
//! [`PatchArray`](far::PatchArray)s, a shared control vertex index table,
//! per-patch [`PatchParam`](far::PatchParam) metadata and the adjacency
//! tables needed around extraordinary vertices. Given a face index and a
//! local `(u, v)` coordinate,
//! [`evaluate_sample()`](osd::evaluate_sample) locates the covering patch,
//! normalizes the coordinate into the patch's local domain and dispatches to
//! the closed-form basis evaluator for the patch's topological class —
//! regular bicubic B-spline, boundary, corner, or one of the two Gregory
//! end-cap classes.
//!
//! Evaluation is a pure function of its inputs plus shared read-only tables,
//! so it is safe to run in parallel across millions of samples as long as
//! distinct samples write to distinct output indices.
//!
//! The module split follows OpenSubdiv's layering: [`far`] holds the
//! serialized patch representation, [`osd`] holds buffer descriptors and the
//! CPU evaluation entry points.
//!
//! ## Limitations
//!
//! Face-varying data is always interpolated bilinearly; the smooth
//! face-varying boundary interpolation rules are not supported by the
//! feature-adaptive tables this crate consumes.
//!
//! ## Features
#![doc = document_features::document_features!()]

pub mod far;
pub mod osd;

mod error;
pub use error::{Error, Result};

/// A vertex, edge, or face index in the topology.
///
/// # Examples
///
/// ```
/// use subdiv_eval::Index;
///
/// let idx = Index::from(42u32);
/// assert_eq!(idx.0, 42);
///
/// let value: u32 = idx.into();
/// assert_eq!(value, 42);
///
/// let idx = Index::from(100usize);
/// let as_usize: usize = idx.into();
/// assert_eq!(as_usize, 100);
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, bytemuck::Pod, bytemuck::Zeroable,
)]
#[repr(transparent)]
pub struct Index(pub u32);

impl From<u32> for Index {
    fn from(value: u32) -> Self {
        Index(value)
    }
}

impl From<Index> for u32 {
    fn from(index: Index) -> Self {
        index.0
    }
}

impl From<usize> for Index {
    fn from(value: usize) -> Self {
        Index(value as u32)
    }
}

impl From<Index> for usize {
    fn from(index: Index) -> Self {
        index.0 as usize
    }
}
