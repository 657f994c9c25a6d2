//! # Far
//!
//! `far` holds the *serialized* representation of a feature-adaptive patch
//! table: per-patch parameterization metadata ([`PatchParam`]), the patch
//! arrays and shared control vertex index table ([`PatchTable`]) and the
//! (face, u, v) → patch lookup ([`PatchMap`]).
//!
//! Everything in this module is constructed once by an upstream refinement
//! stage and is immutable for the lifetime of an evaluation session; the
//! [`osd`](crate::osd) evaluators only ever read from it.

pub mod patch_map;
pub use patch_map::*;

pub mod patch_param;
pub use patch_param::*;

pub mod patch_table;
pub use patch_table::*;
