//! Evaluation session state: the shared read-only tables plus the
//! client-bound input/output buffers for one batch of samples.

use crate::far::{PatchMap, PatchTable};
use crate::osd::BufferDescriptor;

/// A parametric sample location: a base face and a `(u, v)` coordinate in
/// that face's `[0, 1] × [0, 1]` domain.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EvalCoords {
    /// Base face index in the original mesh.
    pub face: usize,
    /// Parametric u coordinate, in `[0, 1]`.
    pub u: f32,
    /// Parametric v coordinate, in `[0, 1]`.
    pub v: f32,
}

/// Read-only evaluation session.
///
/// Borrows a fully constructed [`PatchTable`] and owns the
/// [`PatchMap`] lookup built from it. Nothing in here is mutated by
/// evaluation, so one context can serve any number of concurrent
/// [`evaluate_sample()`](crate::osd::evaluate_sample) calls.
#[derive(Debug)]
pub struct CpuEvalLimitContext<'a> {
    patch_table: &'a PatchTable,
    patch_map: PatchMap,
}

impl<'a> CpuEvalLimitContext<'a> {
    /// Build a context (and its patch lookup) over a patch table.
    pub fn new(patch_table: &'a PatchTable) -> Self {
        let patch_map = PatchMap::new(patch_table);
        Self {
            patch_table,
            patch_map,
        }
    }

    /// The patch table this context evaluates against.
    #[inline]
    pub fn patch_table(&self) -> &PatchTable {
        self.patch_table
    }

    /// The (face, u, v) → patch lookup.
    #[inline]
    pub fn patch_map(&self) -> &PatchMap {
        &self.patch_map
    }
}

/// Client buffers for the vertex data class.
///
/// The output slices are written at `out_desc.stride * index` for the
/// sample index passed to
/// [`evaluate_sample()`](crate::osd::evaluate_sample). The derivative
/// outputs are optional; an evaluator only computes derivatives when at
/// least one of them is present.
#[derive(Debug)]
pub struct VertexBuffers<'a> {
    /// Layout of the control point input data.
    pub in_desc: BufferDescriptor,
    /// Control point values, indexed through the control vertex index
    /// table.
    pub in_data: &'a [f32],
    /// Layout of the output buffers.
    pub out_desc: BufferDescriptor,
    /// Interpolated values.
    pub out: &'a mut [f32],
    /// First derivative in u, if bound.
    pub out_du: Option<&'a mut [f32]>,
    /// First derivative in v, if bound.
    pub out_dv: Option<&'a mut [f32]>,
}

/// Client buffers for the varying data class.
///
/// Varying data is always interpolated bilinearly from the four corner-like
/// control vertices of the patch, regardless of patch type; it has no
/// derivative outputs.
#[derive(Debug)]
pub struct VaryingBuffers<'a> {
    /// Layout of the per-vertex varying input data.
    pub in_desc: BufferDescriptor,
    /// Varying source values.
    pub in_data: &'a [f32],
    /// Layout of the output buffer.
    pub out_desc: BufferDescriptor,
    /// Interpolated values.
    pub out: &'a mut [f32],
}

/// Client output buffer for the face-varying data class.
///
/// The input side lives in the patch table's face-varying channel (four
/// values of `face_varying_width` components per patch); only bilinear
/// interpolation is supported for it.
#[derive(Debug)]
pub struct FaceVaryingBuffers<'a> {
    /// Layout of the output buffer.
    pub out_desc: BufferDescriptor,
    /// Interpolated values.
    pub out: &'a mut [f32],
}

/// The up-to-three independently bound data classes for one evaluation
/// batch. An unbound class (`None`) is silently skipped; binding state of
/// one class never affects another.
#[derive(Debug, Default)]
pub struct EvalBuffers<'a> {
    /// Vertex data, evaluated with the patch's smooth basis.
    pub vertex: Option<VertexBuffers<'a>>,
    /// Varying data, bilinear.
    pub varying: Option<VaryingBuffers<'a>>,
    /// Face-varying data, bilinear from the table's face-varying channel.
    pub face_varying: Option<FaceVaryingBuffers<'a>>,
}
