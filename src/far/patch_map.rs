//! # Patch Map
//!
//! [`PatchMap`] answers the question "which patch covers coordinate
//! `(u, v)` of base face `f`?". Feature-adaptive refinement splits a base
//! face into a quadtree of patch footprints, so several patches at
//! different depths can exist for one face; the map buckets them per face
//! and selects by footprint containment.
//!
//! A lookup that lands in a hole, or uses a face index the table does not
//! know, yields `None`. That is an expected negative result, not an error.

use crate::far::PatchTable;

/// Identifies one patch inside a [`PatchTable`].
///
/// Produced by [`PatchMap::find_patch()`] and borrowed by
/// [`evaluate_sample()`](crate::osd::evaluate_sample) for the duration of
/// one call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PatchHandle {
    /// Index into the patch array list.
    pub patch_array_index: usize,
    /// Global patch index (across all arrays), in patch param order.
    pub patch_index: usize,
    /// Offset of this patch's control vertices relative to its array's
    /// `vert_index`. Also the patch's offset into the quad offset table
    /// relative to `quad_offset_index` for Gregory patches (both advance
    /// four entries per patch).
    pub vertex_offset: usize,
}

/// Accelerated (face, u, v) → [`PatchHandle`] lookup.
#[derive(Debug)]
pub struct PatchMap {
    // One bucket of candidate handles per base face.
    faces: Vec<Vec<PatchHandle>>,
}

impl PatchMap {
    /// Build the lookup from a patch table's parameterization data.
    pub fn new(patch_table: &PatchTable) -> Self {
        let params = patch_table.patch_params();

        let face_count = params
            .iter()
            .map(|p| p.face_index as usize + 1)
            .max()
            .unwrap_or(0);
        let mut faces = vec![Vec::new(); face_count];

        let mut patch_index = 0;
        for (array_index, array) in patch_table.patch_arrays().iter().enumerate() {
            let cvs_len = array.patch_type.control_vertices_len();
            for local in 0..array.patch_count {
                let param = &params[patch_index];
                faces[param.face_index as usize].push(PatchHandle {
                    patch_array_index: array_index,
                    patch_index,
                    vertex_offset: local * cvs_len,
                });
                patch_index += 1;
            }
        }

        Self { faces }
    }

    /// Find the patch covering `(u, v)` on base face `face`.
    ///
    /// `u` and `v` must be in `[0, 1]`. Returns `None` for faces with no
    /// patches (holes, degenerate faces) and for out-of-range face indices.
    pub fn find_patch(
        &self,
        patch_table: &PatchTable,
        face: usize,
        u: f32,
        v: f32,
    ) -> Option<PatchHandle> {
        let candidates = self.faces.get(face)?;
        let params = patch_table.patch_params();

        for handle in candidates {
            let bits = params[handle.patch_index].bits;
            let frac = bits.param_fraction();
            let pu = bits.u() as f32 * frac;
            let pv = bits.v() as f32 * frac;
            // Closed on the high edge so (1, 1) still resolves.
            if u >= pu && u <= pu + frac && v >= pv && v <= pv + frac {
                return Some(*handle);
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::far::{PatchArray, PatchParam, PatchTable, PatchTableData, PatchType};
    use crate::Index;

    /// One base face split into four depth-1 regular patches.
    fn quadrant_table() -> PatchTable {
        let patch_params = vec![
            PatchParam::new(0, 1, 0, 0, 0),
            PatchParam::new(0, 1, 0, 1, 0),
            PatchParam::new(0, 1, 0, 0, 1),
            PatchParam::new(0, 1, 0, 1, 1),
        ];
        PatchTable::new(PatchTableData {
            patch_arrays: vec![PatchArray {
                patch_type: PatchType::Regular,
                patch_count: 4,
                vert_index: 0,
                quad_offset_index: 0,
            }],
            control_vertices: (0..64u32).map(Index).collect(),
            patch_params,
            ..Default::default()
        })
        .unwrap()
    }

    #[test]
    fn selects_covering_quadrant() {
        let table = quadrant_table();
        let map = PatchMap::new(&table);

        let handle = map.find_patch(&table, 0, 0.1, 0.1).unwrap();
        assert_eq!(handle.patch_index, 0);

        let handle = map.find_patch(&table, 0, 0.9, 0.1).unwrap();
        assert_eq!(handle.patch_index, 1);
        assert_eq!(handle.vertex_offset, 16);

        let handle = map.find_patch(&table, 0, 0.2, 0.8).unwrap();
        assert_eq!(handle.patch_index, 2);

        let handle = map.find_patch(&table, 0, 1.0, 1.0).unwrap();
        assert_eq!(handle.patch_index, 3);
    }

    #[test]
    fn unknown_face_is_not_found() {
        let table = quadrant_table();
        let map = PatchMap::new(&table);
        assert!(map.find_patch(&table, 7, 0.5, 0.5).is_none());
    }
}
