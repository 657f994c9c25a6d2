//! Sample dispatch: patch lookup, domain transform, and kernel selection
//! for one `(face, u, v)` sample at a time.

use crate::far::{PatchArray, PatchHandle, PatchTable, PatchType};
use crate::osd::cpu_eval_limit_kernel as kernel;
use crate::osd::{BufferDescriptor, CpuEvalLimitContext, EvalBuffers, EvalCoords};
use crate::{Error, Index, Result};

/// Which control vertices act as the four patch corners for bilinear
/// varying interpolation, per patch type, counterclockwise from the (0,0)
/// corner. Regular patches use the inner ring of their 4×4 grid, boundary
/// and corner patches the equivalent vertices of their reduced grids, and
/// Gregory patches are already corner-based.
const VARYING_CORNERS: [[usize; 4]; 5] = [
    [5, 6, 10, 9],
    [1, 2, 6, 5],
    [1, 2, 5, 4],
    [0, 1, 2, 3],
    [0, 1, 2, 3],
];

/// Evaluate the limit surface at one parametric sample and write the
/// results into the bound buffers at element `index`.
///
/// Returns `Ok(false)` when no patch covers the sample location (a hole, or
/// an unknown face); no buffer is touched in that case. Each bound data
/// class in `buffers` is interpolated independently; unbound classes are
/// skipped.
pub fn evaluate_sample(
    context: &CpuEvalLimitContext<'_>,
    coords: EvalCoords,
    index: usize,
    buffers: &mut EvalBuffers<'_>,
) -> Result<bool> {
    let table = context.patch_table();

    let Some(handle) = context
        .patch_map()
        .find_patch(table, coords.face, coords.u, coords.v)
    else {
        return Ok(false);
    };

    let array = table.patch_arrays()[handle.patch_array_index];
    let bits = table.patch_params()[handle.patch_index].bits;

    // Into the patch's local domain: rescale first, then rotate.
    let mut u = coords.u;
    let mut v = coords.v;
    bits.normalize(&mut u, &mut v);
    bits.rotate(&mut u, &mut v);

    let cvs_len = array.patch_type.control_vertices_len();
    let cvs = &table.control_vertices_table()[array.vert_index + handle.vertex_offset..][..cvs_len];

    if let Some(vertex) = buffers.vertex.as_mut() {
        let out_desc = vertex.out_desc;
        let out = output_element(vertex.out, out_desc, index)?;
        let out_du = match vertex.out_du.as_deref_mut() {
            Some(s) => Some(output_element(s, out_desc, index)?),
            None => None,
        };
        let out_dv = match vertex.out_dv.as_deref_mut() {
            Some(s) => Some(output_element(s, out_desc, index)?),
            None => None,
        };
        eval_vertex(
            table,
            &handle,
            &array,
            cvs,
            v,
            u,
            vertex.in_desc,
            vertex.in_data,
            out,
            out_du,
            out_dv,
        );
    }

    if let Some(varying) = buffers.varying.as_mut() {
        let corners = &VARYING_CORNERS[array.patch_type as usize - PatchType::Regular as usize];
        let ring = [
            cvs[corners[0]],
            cvs[corners[1]],
            cvs[corners[2]],
            cvs[corners[3]],
        ];
        let out = output_element(varying.out, varying.out_desc, index)?;
        kernel::eval_bilinear(v, u, &ring, varying.in_desc, varying.in_data, out);
    }

    if let Some(face_varying) = buffers.face_varying.as_mut() {
        let width = table.face_varying_width();
        // A bound output with no channel in the table is a no-op.
        if width == 0 || table.face_varying_data().is_empty() {
            return Ok(true);
        }
        let block = &table.face_varying_data()[handle.patch_index * 4 * width..][..4 * width];
        // The block holds the four corner values contiguously; interpolate
        // the first `length` of its `width` components.
        let in_desc = BufferDescriptor::new(0, face_varying.out_desc.length, width)?;
        let ring = [Index(0), Index(1), Index(2), Index(3)];
        let out = output_element(face_varying.out, face_varying.out_desc, index)?;
        kernel::eval_bilinear(v, u, &ring, in_desc, block, out);
    }

    Ok(true)
}

/// Evaluate a batch of samples in parallel, interpolating vertex data only.
///
/// Sample `i` is written to element `i` of `out` (and of `out_du`/`out_dv`
/// when given). Samples that hit no patch leave their output element
/// untouched. Returns the number of samples that were evaluated.
#[cfg(feature = "rayon")]
#[allow(clippy::too_many_arguments)]
pub fn evaluate_samples(
    context: &CpuEvalLimitContext<'_>,
    coords: &[EvalCoords],
    in_desc: BufferDescriptor,
    in_data: &[f32],
    out_desc: BufferDescriptor,
    out: &mut [f32],
    out_du: Option<&mut [f32]>,
    out_dv: Option<&mut [f32]>,
) -> Result<usize> {
    use rayon::prelude::*;

    let needed = out_desc.offset + coords.len() * out_desc.stride;
    for slice in [Some(&*out), out_du.as_deref(), out_dv.as_deref()]
        .into_iter()
        .flatten()
    {
        if slice.len() < needed {
            return Err(Error::InvalidBufferSize {
                expected: needed,
                actual: slice.len(),
            });
        }
    }

    let table = context.patch_table();

    // Per-sample output elements are disjoint stride-spaced slices, so the
    // batch runs without synchronization once they are split apart.
    let outs = split_elements(out, out_desc, coords.len());
    let mut dus = out_du.map(|s| split_elements(s, out_desc, coords.len()).into_iter());
    let mut dvs = out_dv.map(|s| split_elements(s, out_desc, coords.len()).into_iter());
    let slots: Vec<_> = outs
        .into_iter()
        .map(|o| {
            (
                o,
                dus.as_mut().and_then(Iterator::next),
                dvs.as_mut().and_then(Iterator::next),
            )
        })
        .collect();

    let evaluated = coords
        .par_iter()
        .zip(slots)
        .map(|(coords, (chunk, du, dv))| {
            let Some(handle) = context
                .patch_map()
                .find_patch(table, coords.face, coords.u, coords.v)
            else {
                return 0usize;
            };
            let array = table.patch_arrays()[handle.patch_array_index];
            let bits = table.patch_params()[handle.patch_index].bits;

            let mut u = coords.u;
            let mut v = coords.v;
            bits.normalize(&mut u, &mut v);
            bits.rotate(&mut u, &mut v);

            let cvs_len = array.patch_type.control_vertices_len();
            let cvs = &table.control_vertices_table()
                [array.vert_index + handle.vertex_offset..][..cvs_len];

            eval_vertex(
                table,
                &handle,
                &array,
                cvs,
                v,
                u,
                in_desc,
                in_data,
                chunk,
                du,
                dv,
            );
            1
        })
        .sum();

    Ok(evaluated)
}

/// Split a buffer into one `length`-sized slice per sample, `stride` floats
/// apart. The caller has already checked the buffer is large enough.
#[cfg(feature = "rayon")]
fn split_elements(
    buffer: &mut [f32],
    desc: BufferDescriptor,
    samples: usize,
) -> Vec<&mut [f32]> {
    let mut elements = Vec::with_capacity(samples);
    let mut rest = &mut buffer[desc.offset..];
    for _ in 0..samples {
        let take = desc.stride.min(rest.len());
        let (head, tail) = rest.split_at_mut(take);
        elements.push(&mut head[..desc.length]);
        rest = tail;
    }
    elements
}

/// Dispatch the vertex data class to the patch type's basis kernel.
#[allow(clippy::too_many_arguments)]
fn eval_vertex(
    table: &PatchTable,
    handle: &PatchHandle,
    array: &PatchArray,
    cvs: &[Index],
    v: f32,
    u: f32,
    in_desc: BufferDescriptor,
    in_data: &[f32],
    out: &mut [f32],
    out_du: Option<&mut [f32]>,
    out_dv: Option<&mut [f32]>,
) {
    match array.patch_type {
        PatchType::Regular => {
            kernel::eval_b_spline(v, u, cvs, in_desc, in_data, out, out_du, out_dv)
        }
        PatchType::Boundary => {
            kernel::eval_boundary(v, u, cvs, in_desc, in_data, out, out_du, out_dv)
        }
        PatchType::Corner => kernel::eval_corner(v, u, cvs, in_desc, in_data, out, out_du, out_dv),
        PatchType::Gregory => {
            let quad_offsets =
                &table.quad_offset_table()[array.quad_offset_index + handle.vertex_offset..][..4];
            kernel::eval_gregory(
                v,
                u,
                cvs,
                table.vertex_valence_table(),
                quad_offsets,
                table.max_valence(),
                in_desc,
                in_data,
                out,
                out_du,
                out_dv,
            )
        }
        PatchType::GregoryBoundary => {
            let quad_offsets =
                &table.quad_offset_table()[array.quad_offset_index + handle.vertex_offset..][..4];
            kernel::eval_gregory_boundary(
                v,
                u,
                cvs,
                table.vertex_valence_table(),
                quad_offsets,
                table.max_valence(),
                in_desc,
                in_data,
                out,
                out_du,
                out_dv,
            )
        }
    }
}

/// Borrow the `index`-th output element described by `desc`, bounds-checked.
fn output_element(out: &mut [f32], desc: BufferDescriptor, index: usize) -> Result<&mut [f32]> {
    let start = desc.offset + desc.stride * index;
    let end = start + desc.length;
    if end > out.len() {
        return Err(Error::IndexOutOfBounds {
            index: end,
            max: out.len(),
        });
    }
    Ok(&mut out[start..end])
}
