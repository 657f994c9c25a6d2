//! # Osd
//!
//! CPU evaluation of limit surface samples against a
//! [`far::PatchTable`](crate::far::PatchTable).
//!
//! Clients bind their own input and output buffers through
//! [`BufferDescriptor`]s — the evaluator owns no vertex data and allocates
//! no output storage. Up to three independent data classes can be bound per
//! sample: vertex data (evaluated with the patch's smooth basis, with
//! optional first derivatives), varying data (bilinear), and face-varying
//! data (bilinear, from the table's face-varying channel).
//!
//! The entry point is [`evaluate_sample()`]; the `rayon` feature adds a
//! batch driver, [`evaluate_samples()`], that fans samples out over disjoint
//! output chunks.

pub mod buffer_descriptor;
pub use buffer_descriptor::*;

pub mod eval_limit_context;
pub use eval_limit_context::*;

pub mod cpu_eval_limit_controller;
pub use cpu_eval_limit_controller::*;

pub(crate) mod cpu_eval_limit_kernel;
