//! # Patch Table
//!
//! A [`PatchTable`] is a representation of the refined surface topology that
//! can be used for efficient evaluation of primvar data at arbitrary
//! locations.
//!
//! The patches are organized into patch arrays, where all patches in a patch
//! array share the same [`PatchType`]. Each patch references a contiguous
//! sub-range of the shared control vertex index table and carries a
//! [`PatchParam`](crate::far::PatchParam) that describes its
//! parameterization. The two Gregory patch types additionally reference the
//! vertex valence and quad offset tables to reconstruct the one-ring around
//! each patch corner.
//!
//! A `PatchTable` is produced by an upstream feature-adaptive refinement
//! stage and never mutated afterwards; this crate only consumes it.

use crate::far::PatchParam;
use crate::{Error, Index, Result};
use num_enum::TryFromPrimitive;

/// Patch types the evaluators understand.
///
/// The raw values match the serialized table format (the five adaptive
/// patch classes of the feature-adaptive refinement stage).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, TryFromPrimitive)]
#[repr(u32)]
pub enum PatchType {
    /// Regular interior patch: 16 control vertices, bicubic B-spline basis.
    Regular = 6,
    /// Patch along one mesh boundary: 12 control vertices, the missing row
    /// is reconstructed by reflection.
    Boundary = 7,
    /// Patch at a mesh corner where two boundaries meet: 9 control
    /// vertices.
    Corner = 8,
    /// Gregory end-cap patch around an extraordinary vertex: 4 corner
    /// control vertices plus their one-rings from the adjacency tables.
    Gregory = 9,
    /// Gregory end-cap patch with one open edge.
    GregoryBoundary = 10,
}

impl PatchType {
    /// Decode a raw patch type value from a serialized table.
    ///
    /// A value outside the known set means the upstream table construction
    /// is broken; there is no per-sample recovery from that.
    pub fn from_raw(value: u32) -> Result<Self> {
        Self::try_from(value).map_err(|_| Error::InvalidPatchType(value))
    }

    /// The number of entries each patch of this type occupies in the
    /// control vertex index table.
    #[inline]
    pub fn control_vertices_len(&self) -> usize {
        match self {
            PatchType::Regular => 16,
            PatchType::Boundary => 12,
            PatchType::Corner => 9,
            PatchType::Gregory | PatchType::GregoryBoundary => 4,
        }
    }
}

/// A contiguous run of patches sharing one [`PatchType`].
#[derive(Debug, Clone, Copy)]
pub struct PatchArray {
    /// Type of every patch in this array.
    pub patch_type: PatchType,
    /// Number of patches in this array.
    pub patch_count: usize,
    /// Base offset of this array's patches in the control vertex index
    /// table.
    pub vert_index: usize,
    /// Base offset into the quad offset table. Only meaningful for the two
    /// Gregory patch types.
    pub quad_offset_index: usize,
}

/// Raw table data handed over by the refinement stage.
///
/// Uses the init struct pattern; fill in the fields and pass the result to
/// [`PatchTable::new()`].
#[derive(Debug, Clone, Default)]
pub struct PatchTableData {
    /// Patch arrays, one per patch type run.
    pub patch_arrays: Vec<PatchArray>,
    /// Shared control vertex index table.
    pub control_vertices: Vec<Index>,
    /// Per-patch parameterization, in global patch order (array order, then
    /// patch order within each array).
    pub patch_params: Vec<PatchParam>,
    /// Vertex valence table: for every mesh vertex, `2 * max_valence + 1`
    /// entries — the signed valence (negative marks a boundary vertex)
    /// followed by `valence` interleaved (neighbor, diagonal) index pairs.
    pub vertex_valence_table: Vec<i32>,
    /// Per-Gregory-patch quad offsets, 4 per patch; each entry packs the
    /// ring offsets of the two faces incident to the patch corner into the
    /// low two bytes.
    pub quad_offset_table: Vec<u32>,
    /// Largest vertex valence in the mesh; sizes the valence table rows.
    pub max_valence: usize,
    /// Face-varying table: one fixed block of `4 * face_varying_width`
    /// values per patch, or empty when no face-varying channel is present.
    pub face_varying_data: Vec<f32>,
    /// Number of face-varying components per corner.
    pub face_varying_width: usize,
}

/// Immutable patch table consumed by the evaluation entry points.
#[derive(Debug)]
pub struct PatchTable {
    data: PatchTableData,
}

impl PatchTable {
    /// Wrap raw table data.
    ///
    /// With the default `topology_validation` feature all cross-table
    /// offsets are bounds-checked here so that the per-sample hot path can
    /// index without surprises.
    pub fn new(data: PatchTableData) -> Result<Self> {
        #[cfg(feature = "topology_validation")]
        Self::validate(&data)?;
        Ok(Self { data })
    }

    #[cfg(feature = "topology_validation")]
    fn validate(data: &PatchTableData) -> Result<()> {
        let mut patch_total = 0;
        for array in &data.patch_arrays {
            patch_total += array.patch_count;

            let cvs_len = array.patch_type.control_vertices_len();
            let end = array.vert_index + array.patch_count * cvs_len;
            if end > data.control_vertices.len() {
                return Err(Error::IndexOutOfBounds {
                    index: end,
                    max: data.control_vertices.len(),
                });
            }

            if matches!(
                array.patch_type,
                PatchType::Gregory | PatchType::GregoryBoundary
            ) {
                let end = array.quad_offset_index + array.patch_count * 4;
                if end > data.quad_offset_table.len() {
                    return Err(Error::IndexOutOfBounds {
                        index: end,
                        max: data.quad_offset_table.len(),
                    });
                }
                if data.max_valence == 0 {
                    return Err(Error::InvalidPatchTable(
                        "Gregory patches require a non-zero max valence".into(),
                    ));
                }
                let row = 2 * data.max_valence + 1;
                if data.vertex_valence_table.is_empty()
                    || data.vertex_valence_table.len() % row != 0
                {
                    return Err(Error::InvalidPatchTable(format!(
                        "vertex valence table length {} is not a multiple of {}",
                        data.vertex_valence_table.len(),
                        row
                    )));
                }
            }
        }

        if data.patch_params.len() != patch_total {
            return Err(Error::InvalidPatchTable(format!(
                "{} patch params for {} patches",
                data.patch_params.len(),
                patch_total
            )));
        }

        if !data.face_varying_data.is_empty() {
            let expected = patch_total * 4 * data.face_varying_width;
            if data.face_varying_data.len() != expected {
                return Err(Error::InvalidBufferSize {
                    expected,
                    actual: data.face_varying_data.len(),
                });
            }
        }

        Ok(())
    }

    /// The patch arrays.
    #[inline]
    pub fn patch_arrays(&self) -> &[PatchArray] {
        &self.data.patch_arrays
    }

    /// Total number of patches across all arrays.
    pub fn patches_len(&self) -> usize {
        self.data.patch_arrays.iter().map(|a| a.patch_count).sum()
    }

    /// The shared control vertex index table.
    #[inline]
    pub fn control_vertices_table(&self) -> &[Index] {
        &self.data.control_vertices
    }

    /// The control vertex index table reinterpreted as raw `u32`s, for
    /// handing to APIs that do not know about [`Index`]. Zero-copy;
    /// `Index` is a `#[repr(transparent)]` wrapper.
    #[inline]
    pub fn control_vertices_table_u32(&self) -> &[u32] {
        bytemuck::cast_slice(&self.data.control_vertices)
    }

    /// Per-patch parameterization in global patch order.
    #[inline]
    pub fn patch_params(&self) -> &[PatchParam] {
        &self.data.patch_params
    }

    /// The vertex valence table. Rows are `2 * max_valence + 1` entries
    /// wide.
    #[inline]
    pub fn vertex_valence_table(&self) -> &[i32] {
        &self.data.vertex_valence_table
    }

    /// The quad offset table for Gregory patches.
    #[inline]
    pub fn quad_offset_table(&self) -> &[u32] {
        &self.data.quad_offset_table
    }

    /// Largest vertex valence in the mesh.
    #[inline]
    pub fn max_valence(&self) -> usize {
        self.data.max_valence
    }

    /// The face-varying table, or an empty slice when no face-varying
    /// channel exists.
    #[inline]
    pub fn face_varying_data(&self) -> &[f32] {
        &self.data.face_varying_data
    }

    /// Number of face-varying components per corner.
    #[inline]
    pub fn face_varying_width(&self) -> usize {
        self.data.face_varying_width
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::far::PatchParam;

    fn regular_array(patch_count: usize) -> PatchArray {
        PatchArray {
            patch_type: PatchType::Regular,
            patch_count,
            vert_index: 0,
            quad_offset_index: 0,
        }
    }

    #[test]
    fn patch_type_raw_decode() {
        assert_eq!(PatchType::from_raw(6).unwrap(), PatchType::Regular);
        assert_eq!(PatchType::from_raw(10).unwrap(), PatchType::GregoryBoundary);
        assert!(matches!(
            PatchType::from_raw(11),
            Err(Error::InvalidPatchType(11))
        ));
        assert!(PatchType::from_raw(0).is_err());
    }

    #[test]
    fn control_vertices_cast_to_raw_u32() {
        let table = PatchTable::new(PatchTableData {
            patch_arrays: vec![regular_array(1)],
            control_vertices: (0..16u32).rev().map(Index).collect(),
            patch_params: vec![PatchParam::default()],
            ..Default::default()
        })
        .unwrap();
        let raw = table.control_vertices_table_u32();
        assert_eq!(raw.len(), 16);
        assert_eq!(raw[0], 15);
        assert_eq!(raw[15], 0);
    }

    #[test]
    fn control_vertex_counts() {
        assert_eq!(PatchType::Regular.control_vertices_len(), 16);
        assert_eq!(PatchType::Boundary.control_vertices_len(), 12);
        assert_eq!(PatchType::Corner.control_vertices_len(), 9);
        assert_eq!(PatchType::Gregory.control_vertices_len(), 4);
        assert_eq!(PatchType::GregoryBoundary.control_vertices_len(), 4);
    }

    #[cfg(feature = "topology_validation")]
    #[test]
    fn validation_rejects_short_control_vertex_table() {
        let data = PatchTableData {
            patch_arrays: vec![regular_array(1)],
            control_vertices: (0..12u32).map(Index).collect(),
            patch_params: vec![PatchParam::default()],
            ..Default::default()
        };
        assert!(matches!(
            PatchTable::new(data),
            Err(Error::IndexOutOfBounds { index: 16, max: 12 })
        ));
    }

    #[cfg(feature = "topology_validation")]
    #[test]
    fn validation_rejects_param_count_mismatch() {
        let data = PatchTableData {
            patch_arrays: vec![regular_array(1)],
            control_vertices: (0..16u32).map(Index).collect(),
            patch_params: vec![],
            ..Default::default()
        };
        assert!(PatchTable::new(data).is_err());
    }

    #[cfg(feature = "topology_validation")]
    #[test]
    fn validation_rejects_bad_face_varying_size() {
        let data = PatchTableData {
            patch_arrays: vec![regular_array(1)],
            control_vertices: (0..16u32).map(Index).collect(),
            patch_params: vec![PatchParam::default()],
            face_varying_data: vec![0.0; 7],
            face_varying_width: 2,
            ..Default::default()
        };
        assert!(matches!(
            PatchTable::new(data),
            Err(Error::InvalidBufferSize {
                expected: 8,
                actual: 7
            })
        ));
    }
}
