//! Basis function kernels for the five adaptive patch types plus the
//! bilinear fallback.
//!
//! Every kernel is a pure function: control point values in, interpolated
//! values (and optionally first derivatives) out. The argument order `(v,
//! u, …)` follows the serialized patch convention so that du/dv land in the
//! outputs downstream consumers expect.
//!
//! The regular, boundary and corner kernels are weight-based: they build 16
//! tensor-product basis weights and, for the boundary-adapted types, fold
//! the weights of the virtual reflected control points back onto the real
//! ones (reflection is linear, so folding weights is exact and avoids
//! materializing the virtual points). The two Gregory kernels reconstruct
//! the 20-point Gregory patch of Loop, Schaefer, Ni & Castaño
//! ("Approximating Subdivision Surfaces with Gregory Patches for Hardware
//! Tessellation") from each corner's one-ring and evaluate it as a bicubic
//! Bézier patch with rationally blended interior points.

use crate::osd::BufferDescriptor;
use crate::Index;
use smallvec::SmallVec;
use std::f32::consts::PI;

// Gregory scratch buffers, sized at runtime by element length and corner
// valence. The inline capacities keep positions-plus-a-channel data
// (length <= 4) and valences up to 12 off the heap.
type CornerScratch = SmallVec<[f32; 16]>;
type RingScratch = SmallVec<[f32; 192]>;
type FanScratch = SmallVec<[f32; 48]>;
type GridScratch = SmallVec<[f32; 64]>;

/// Edge tangent rescaling weights for valences 3..=29, from the Gregory
/// patch construction of Loop et al.
const EF: [f32; 27] = [
    0.812816, 0.5, 0.363644, 0.287514, 0.238688, 0.204544, 0.179229, 0.159657, 0.144042, 0.131276,
    0.120632, 0.111614, 0.103872, 0.09715, 0.0912559, 0.0860444, 0.0814022, 0.0772401, 0.0734867,
    0.0700842, 0.0669851, 0.0641504, 0.0615475, 0.0591488, 0.0569311, 0.0548745, 0.0529621,
];

/// Interleaved cosine/sine ring weights: even `j` selects
/// `cos(2π·(j/2)/n)`, odd `j` selects `sin(2π·((j-1)/2)/n)`.
#[inline]
fn csf(n: usize, j: usize) -> f32 {
    if j % 2 == 0 {
        (2.0 * PI * (j / 2) as f32 / n as f32).cos()
    } else {
        (2.0 * PI * ((j - 1) / 2) as f32 / n as f32).sin()
    }
}

/// Uniform cubic B-spline basis over the central knot interval.
#[inline]
fn cubic_b_spline_basis(t: f32) -> [f32; 4] {
    let s = 1.0 - t;
    [
        s * s * s / 6.0,
        (3.0 * t * t * t - 6.0 * t * t + 4.0) / 6.0,
        (-3.0 * t * t * t + 3.0 * t * t + 3.0 * t + 1.0) / 6.0,
        t * t * t / 6.0,
    ]
}

/// Analytic first derivatives of [`cubic_b_spline_basis`].
#[inline]
fn cubic_b_spline_deriv(t: f32) -> [f32; 4] {
    let s = 1.0 - t;
    [
        -s * s / 2.0,
        (3.0 * t * t - 4.0 * t) / 2.0,
        (-3.0 * t * t + 2.0 * t + 1.0) / 2.0,
        t * t / 2.0,
    ]
}

/// Cubic Bernstein basis.
#[inline]
fn cubic_bezier_basis(t: f32) -> [f32; 4] {
    let s = 1.0 - t;
    [s * s * s, 3.0 * s * s * t, 3.0 * s * t * t, t * t * t]
}

/// Analytic first derivatives of [`cubic_bezier_basis`].
#[inline]
fn cubic_bezier_deriv(t: f32) -> [f32; 4] {
    let s = 1.0 - t;
    [
        -3.0 * s * s,
        3.0 * s * (s - 2.0 * t),
        3.0 * t * (2.0 * s - t),
        3.0 * t * t,
    ]
}

/// Tensor-product weights over the 4×4 control grid. Grid index is
/// `row * 4 + col` with u running along columns and v along rows.
#[inline]
fn tensor_weights(wu: &[f32; 4], wv: &[f32; 4]) -> [f32; 16] {
    let mut w = [0.0f32; 16];
    for row in 0..4 {
        for col in 0..4 {
            w[row * 4 + col] = wv[row] * wu[col];
        }
    }
    w
}

/// Fold the weights of the virtual reflected row (grid row 0) of a
/// boundary patch onto its 12 real control points (grid rows 1..3).
///
/// The virtual points satisfy `P(0,c) = 2·P(1,c) − P(2,c)`.
fn fold_boundary_weights(w16: &[f32; 16]) -> [f32; 12] {
    let mut w = [0.0f32; 12];
    for c in 0..4 {
        w[c] = w16[4 + c] + 2.0 * w16[c];
        w[4 + c] = w16[8 + c] - w16[c];
        w[8 + c] = w16[12 + c];
    }
    w
}

/// Fold the virtual row 0, column 3 and their shared corner of a corner
/// patch onto its 9 real control points (grid rows 1..3 × cols 0..2).
fn fold_corner_weights(w16: &[f32; 16]) -> [f32; 9] {
    let mut w = [0.0f32; 9];
    for r in 0..3 {
        for c in 0..3 {
            w[r * 3 + c] = w16[(r + 1) * 4 + c];
        }
    }
    // row 0: P(0,c) = 2·P(1,c) − P(2,c)
    for c in 0..3 {
        w[c] += 2.0 * w16[c];
        w[3 + c] -= w16[c];
    }
    // column 3: P(r,3) = 2·P(r,2) − P(r,1)
    for r in 0..3 {
        let wv = w16[(r + 1) * 4 + 3];
        w[r * 3 + 2] += 2.0 * wv;
        w[r * 3 + 1] -= wv;
    }
    // corner: P(0,3) = 2·P(0,2) − P(0,1), expanded through both mirrors
    let wc = w16[3];
    w[2] += 4.0 * wc;
    w[1] -= 2.0 * wc;
    w[5] -= 2.0 * wc;
    w[4] += wc;
    w
}

/// One element of a strided input buffer.
#[inline]
fn element(in_q: &[f32], in_desc: BufferDescriptor, vert: usize) -> &[f32] {
    &in_q[in_desc.offset + vert * in_desc.stride..][..in_desc.length]
}

/// Contract control point values against basis weights.
fn apply_weights(
    weights: &[f32],
    weights_du: Option<&[f32]>,
    weights_dv: Option<&[f32]>,
    cvs: &[Index],
    in_desc: BufferDescriptor,
    in_q: &[f32],
    out: &mut [f32],
    mut out_du: Option<&mut [f32]>,
    mut out_dv: Option<&mut [f32]>,
) {
    debug_assert_eq!(weights.len(), cvs.len());
    let length = in_desc.length;

    out[..length].fill(0.0);
    if let Some(du) = out_du.as_deref_mut() {
        du[..length].fill(0.0);
    }
    if let Some(dv) = out_dv.as_deref_mut() {
        dv[..length].fill(0.0);
    }

    for (i, cv) in cvs.iter().enumerate() {
        let src = &in_q[in_desc.offset + usize::from(*cv) * in_desc.stride..][..length];
        let w = weights[i];
        for k in 0..length {
            out[k] += w * src[k];
        }
        if let (Some(wdu), Some(du)) = (weights_du, out_du.as_deref_mut()) {
            for k in 0..length {
                du[k] += wdu[i] * src[k];
            }
        }
        if let (Some(wdv), Some(dv)) = (weights_dv, out_dv.as_deref_mut()) {
            for k in 0..length {
                dv[k] += wdv[i] * src[k];
            }
        }
    }
}

/// Regular patch: bicubic B-spline over 16 control vertices.
pub(crate) fn eval_b_spline(
    v: f32,
    u: f32,
    cvs: &[Index],
    in_desc: BufferDescriptor,
    in_q: &[f32],
    out: &mut [f32],
    out_du: Option<&mut [f32]>,
    out_dv: Option<&mut [f32]>,
) {
    debug_assert_eq!(cvs.len(), 16);
    let (w, wdu, wdv) = b_spline_grid_weights(v, u, out_du.is_some() || out_dv.is_some());
    apply_weights(
        &w,
        wdu.as_ref().map(|w| &w[..]),
        wdv.as_ref().map(|w| &w[..]),
        cvs,
        in_desc,
        in_q,
        out,
        out_du,
        out_dv,
    );
}

/// Boundary patch: B-spline basis with the missing row reconstructed by
/// reflection, folded into 12 weights.
pub(crate) fn eval_boundary(
    v: f32,
    u: f32,
    cvs: &[Index],
    in_desc: BufferDescriptor,
    in_q: &[f32],
    out: &mut [f32],
    out_du: Option<&mut [f32]>,
    out_dv: Option<&mut [f32]>,
) {
    debug_assert_eq!(cvs.len(), 12);
    let (w, wdu, wdv) = b_spline_grid_weights(v, u, out_du.is_some() || out_dv.is_some());
    let w = fold_boundary_weights(&w);
    let wdu = wdu.map(|w| fold_boundary_weights(&w));
    let wdv = wdv.map(|w| fold_boundary_weights(&w));
    apply_weights(
        &w,
        wdu.as_ref().map(|w| &w[..]),
        wdv.as_ref().map(|w| &w[..]),
        cvs,
        in_desc,
        in_q,
        out,
        out_du,
        out_dv,
    );
}

/// Corner patch: B-spline basis with a missing row and column, folded into
/// 9 weights.
pub(crate) fn eval_corner(
    v: f32,
    u: f32,
    cvs: &[Index],
    in_desc: BufferDescriptor,
    in_q: &[f32],
    out: &mut [f32],
    out_du: Option<&mut [f32]>,
    out_dv: Option<&mut [f32]>,
) {
    debug_assert_eq!(cvs.len(), 9);
    let (w, wdu, wdv) = b_spline_grid_weights(v, u, out_du.is_some() || out_dv.is_some());
    let w = fold_corner_weights(&w);
    let wdu = wdu.map(|w| fold_corner_weights(&w));
    let wdv = wdv.map(|w| fold_corner_weights(&w));
    apply_weights(
        &w,
        wdu.as_ref().map(|w| &w[..]),
        wdv.as_ref().map(|w| &w[..]),
        cvs,
        in_desc,
        in_q,
        out,
        out_du,
        out_dv,
    );
}

fn b_spline_grid_weights(
    v: f32,
    u: f32,
    with_derivatives: bool,
) -> ([f32; 16], Option<[f32; 16]>, Option<[f32; 16]>) {
    let bu = cubic_b_spline_basis(u);
    let bv = cubic_b_spline_basis(v);
    let w = tensor_weights(&bu, &bv);
    if with_derivatives {
        let du = cubic_b_spline_deriv(u);
        let dv = cubic_b_spline_deriv(v);
        (
            w,
            Some(tensor_weights(&du, &bv)),
            Some(tensor_weights(&bu, &dv)),
        )
    } else {
        (w, None, None)
    }
}

/// Bilinear interpolation over a four-vertex ring ordered counterclockwise
/// from the (0,0) corner. Used for varying and face-varying data.
pub(crate) fn eval_bilinear(
    v: f32,
    u: f32,
    ring: &[Index; 4],
    in_desc: BufferDescriptor,
    in_q: &[f32],
    out: &mut [f32],
) {
    let w = [
        (1.0 - u) * (1.0 - v),
        u * (1.0 - v),
        u * v,
        (1.0 - u) * v,
    ];
    let length = in_desc.length;
    out[..length].fill(0.0);
    for (i, cv) in ring.iter().enumerate() {
        let src = &in_q[in_desc.offset + usize::from(*cv) * in_desc.stride..][..length];
        for k in 0..length {
            out[k] += w[i] * src[k];
        }
    }
}

/// Gregory end-cap patch around extraordinary vertices.
///
/// `cvs` are the four corner vertex indices; each corner's one-ring is
/// gathered from `vertex_valence_table` (rows of `2 * max_valence + 1`
/// entries) and `quad_offsets` (4 packed entries selecting the two ring
/// faces incident to this patch at each corner).
#[allow(clippy::too_many_arguments)]
pub(crate) fn eval_gregory(
    v: f32,
    u: f32,
    cvs: &[Index],
    vertex_valence_table: &[i32],
    quad_offsets: &[u32],
    max_valence: usize,
    in_desc: BufferDescriptor,
    in_q: &[f32],
    out: &mut [f32],
    out_du: Option<&mut [f32]>,
    out_dv: Option<&mut [f32]>,
) {
    eval_gregory_patch(
        v,
        u,
        cvs,
        vertex_valence_table,
        quad_offsets,
        max_valence,
        in_desc,
        in_q,
        out,
        out_du,
        out_dv,
        false,
    );
}

/// Gregory end-cap patch with one open edge. Corners whose valence table
/// entry is negative sit on the boundary and use the boundary limit mask
/// and boundary tangent construction.
#[allow(clippy::too_many_arguments)]
pub(crate) fn eval_gregory_boundary(
    v: f32,
    u: f32,
    cvs: &[Index],
    vertex_valence_table: &[i32],
    quad_offsets: &[u32],
    max_valence: usize,
    in_desc: BufferDescriptor,
    in_q: &[f32],
    out: &mut [f32],
    out_du: Option<&mut [f32]>,
    out_dv: Option<&mut [f32]>,
) {
    eval_gregory_patch(
        v,
        u,
        cvs,
        vertex_valence_table,
        quad_offsets,
        max_valence,
        in_desc,
        in_q,
        out,
        out_du,
        out_dv,
        true,
    );
}

#[allow(clippy::too_many_arguments)]
fn eval_gregory_patch(
    v: f32,
    u: f32,
    cvs: &[Index],
    vertex_valence_table: &[i32],
    quad_offsets: &[u32],
    max_valence: usize,
    in_desc: BufferDescriptor,
    in_q: &[f32],
    out: &mut [f32],
    out_du: Option<&mut [f32]>,
    out_dv: Option<&mut [f32]>,
    with_boundary: bool,
) {
    debug_assert_eq!(cvs.len(), 4);
    debug_assert!(quad_offsets.len() >= 4);

    let len = in_desc.length;
    let row_len = 2 * max_valence + 1;

    let mut valences = [0i32; 4];
    let mut opos = CornerScratch::from_elem(0.0, 4 * len);
    let mut e0 = CornerScratch::from_elem(0.0, 4 * len);
    let mut e1 = CornerScratch::from_elem(0.0, 4 * len);
    let mut ring_r = RingScratch::from_elem(0.0, 4 * max_valence * len);
    let mut f = FanScratch::from_elem(0.0, max_valence * len);

    // Per corner: limit position and the pair of limit tangent basis
    // vectors, plus the ring difference vectors feeding the face points.
    for vid in 0..4 {
        let vert = usize::from(cvs[vid]);
        let row = &vertex_valence_table[vert * row_len..][..row_len];
        let valence = row[0];
        valences[vid] = valence;
        let n = valence.unsigned_abs() as usize;
        debug_assert!(n >= 2 && n <= max_valence);
        let pos = element(in_q, in_desc, vert);

        f[..n * len].fill(0.0);
        for i in 0..n {
            let ip = (i + 1) % n;
            let im = (i + n - 1) % n;
            let neighbor = element(in_q, in_desc, row[2 * i + 1] as usize);
            let diagonal = element(in_q, in_desc, row[2 * i + 2] as usize);
            let neighbor_p = element(in_q, in_desc, row[2 * ip + 1] as usize);
            let neighbor_m = element(in_q, in_desc, row[2 * im + 1] as usize);
            let diagonal_m = element(in_q, in_desc, row[2 * im + 2] as usize);

            for k in 0..len {
                f[i * len + k] = (pos[k] * n as f32
                    + (neighbor_p[k] + neighbor[k]) * 2.0
                    + diagonal[k])
                    / (n as f32 + 5.0);
                opos[vid * len + k] += f[i * len + k];
                ring_r[(vid * max_valence + i) * len + k] = (neighbor_p[k] - neighbor_m[k]) / 3.0
                    + (diagonal[k] - diagonal_m[k]) / 6.0;
            }
        }
        for k in 0..len {
            opos[vid * len + k] /= n as f32;
        }

        if with_boundary && valence < 0 {
            boundary_corner(pos, row, n, vid, in_desc, in_q, &mut opos, &mut e0, &mut e1);
        } else {
            for i in 0..n {
                let im = (i + n - 1) % n;
                let c0 = csf(n, 2 * i);
                let c1 = csf(n, 2 * i + 1);
                for k in 0..len {
                    let e = 0.5 * (f[i * len + k] + f[im * len + k]);
                    e0[vid * len + k] += c0 * e;
                    e1[vid * len + k] += c1 * e;
                }
            }
            let ef = EF[n.saturating_sub(3).min(EF.len() - 1)];
            for k in 0..len {
                e0[vid * len + k] *= ef;
                e1[vid * len + k] *= ef;
            }
        }
    }

    // Edge and face control points of the Gregory patch. The quad offsets
    // select, per corner, which two ring faces this patch occupies.
    let mut ep = CornerScratch::from_elem(0.0, 4 * len);
    let mut em = CornerScratch::from_elem(0.0, 4 * len);
    let mut fp = CornerScratch::from_elem(0.0, 4 * len);
    let mut fm = CornerScratch::from_elem(0.0, 4 * len);

    for vid in 0..4 {
        let ip = (vid + 1) % 4;
        let im = (vid + 3) % 4;
        let n = valences[vid].unsigned_abs() as usize;
        let n_p = valences[ip].unsigned_abs() as usize;
        let n_m = valences[im].unsigned_abs() as usize;

        let start = (quad_offsets[vid] & 0x00ff) as usize;
        let prev = ((quad_offsets[vid] >> 8) & 0x00ff) as usize;
        let start_m = (quad_offsets[im] & 0x00ff) as usize;
        let prev_p = ((quad_offsets[ip] >> 8) & 0x00ff) as usize;
        debug_assert!(start < n && prev < n);

        let s1 = 3.0 - 2.0 * csf(n, 2) - csf(n_p, 2);
        let s2 = 2.0 * csf(n, 2);
        let s3 = 3.0 - 2.0 * csf(n, 2) - csf(n_m, 2);

        for k in 0..len {
            let em_ip = opos[ip * len + k]
                + e0[ip * len + k] * csf(n_p, 2 * prev_p)
                + e1[ip * len + k] * csf(n_p, 2 * prev_p + 1);
            let ep_im = opos[im * len + k]
                + e0[im * len + k] * csf(n_m, 2 * start_m)
                + e1[im * len + k] * csf(n_m, 2 * start_m + 1);

            ep[vid * len + k] = opos[vid * len + k]
                + e0[vid * len + k] * csf(n, 2 * start)
                + e1[vid * len + k] * csf(n, 2 * start + 1);
            em[vid * len + k] = opos[vid * len + k]
                + e0[vid * len + k] * csf(n, 2 * prev)
                + e1[vid * len + k] * csf(n, 2 * prev + 1);

            fp[vid * len + k] = (csf(n_p, 2) * opos[vid * len + k]
                + s1 * ep[vid * len + k]
                + s2 * em_ip
                + ring_r[(vid * max_valence + start) * len + k])
                / 3.0;
            fm[vid * len + k] = (csf(n_m, 2) * opos[vid * len + k]
                + s3 * em[vid * len + k]
                + s2 * ep_im
                - ring_r[(vid * max_valence + prev) * len + k])
                / 3.0;
        }
    }

    // Assemble the 4×4 Bézier grid; the four interior points blend the
    // paired face points rationally so the patch stays C0 against its
    // neighbors for any corner valences.
    let uu = 1.0 - u;
    let vv = 1.0 - v;
    let d11 = if u + v == 0.0 { 1.0 } else { u + v };
    let d12 = if uu + v == 0.0 { 1.0 } else { uu + v };
    let d21 = if u + vv == 0.0 { 1.0 } else { u + vv };
    let d22 = if uu + vv == 0.0 { 1.0 } else { uu + vv };

    let mut q = GridScratch::from_elem(0.0, 16 * len);
    for k in 0..len {
        q[k] = opos[k];
        q[len + k] = ep[k];
        q[2 * len + k] = em[len + k];
        q[3 * len + k] = opos[len + k];
        q[4 * len + k] = em[k];
        q[7 * len + k] = ep[len + k];
        q[8 * len + k] = ep[3 * len + k];
        q[11 * len + k] = em[2 * len + k];
        q[12 * len + k] = opos[3 * len + k];
        q[13 * len + k] = em[3 * len + k];
        q[14 * len + k] = ep[2 * len + k];
        q[15 * len + k] = opos[2 * len + k];

        q[5 * len + k] = (u * fp[k] + v * fm[k]) / d11;
        q[6 * len + k] = (uu * fm[len + k] + v * fp[len + k]) / d12;
        q[9 * len + k] = (u * fp[3 * len + k] + vv * fm[3 * len + k]) / d21;
        q[10 * len + k] = (uu * fm[2 * len + k] + vv * fp[2 * len + k]) / d22;
    }

    let bu = cubic_bezier_basis(u);
    let bv = cubic_bezier_basis(v);
    accumulate_bezier(&bu, &bv, &q, len, out);
    if let Some(du) = out_du {
        accumulate_bezier(&cubic_bezier_deriv(u), &bv, &q, len, du);
    }
    if let Some(dv) = out_dv {
        accumulate_bezier(&bu, &cubic_bezier_deriv(v), &q, len, dv);
    }
}

fn accumulate_bezier(wu: &[f32; 4], wv: &[f32; 4], q: &[f32], len: usize, out: &mut [f32]) {
    out[..len].fill(0.0);
    for row in 0..4 {
        for col in 0..4 {
            let w = wv[row] * wu[col];
            for k in 0..len {
                out[k] += w * q[(row * 4 + col) * len + k];
            }
        }
    }
}

/// Boundary corner of a Gregory boundary patch: limit mask and tangents of
/// an open fan with `n` neighbors (`n − 1` faces). The ring is stored
/// starting at the first boundary edge.
#[allow(clippy::too_many_arguments)]
fn boundary_corner(
    pos: &[f32],
    row: &[i32],
    n: usize,
    vid: usize,
    in_desc: BufferDescriptor,
    in_q: &[f32],
    opos: &mut [f32],
    e0: &mut [f32],
    e1: &mut [f32],
) {
    let len = in_desc.length;
    let first = element(in_q, in_desc, row[1] as usize);
    let last = element(in_q, in_desc, row[2 * (n - 1) + 1] as usize);

    for k in 0..len {
        opos[vid * len + k] = if n > 2 {
            (first[k] + last[k] + 4.0 * pos[k]) / 6.0
        } else {
            pos[k]
        };
        e0[vid * len + k] = (first[k] - last[k]) / 6.0;
    }

    let faces = n - 1;
    if faces < 2 {
        // valence-2 corner vertex: fall back to a plain difference for the
        // cross-boundary tangent
        for k in 0..len {
            e1[vid * len + k] = (first[k] + last[k] - 2.0 * pos[k]) / 6.0;
        }
        return;
    }

    let kf = faces as f32;
    let c = (PI / kf).cos();
    let s = (PI / kf).sin();
    let denom = 3.0 * kf + c;
    let gamma = -(4.0 * s) / denom;
    let alpha_0k = -((1.0 + 2.0 * c) * (1.0 + c).sqrt()) / (denom * (1.0 - c).sqrt());

    for k in 0..len {
        e1[vid * len + k] = gamma * pos[k] + alpha_0k * (first[k] + last[k]);
    }
    for i in 0..faces {
        let diagonal = element(in_q, in_desc, row[2 * i + 2] as usize);
        let beta = ((i as f32 * PI / kf).sin() + ((i + 1) as f32 * PI / kf).sin()) / denom;
        for k in 0..len {
            e1[vid * len + k] += beta * diagonal[k];
        }
        if i > 0 {
            let neighbor = element(in_q, in_desc, row[2 * i + 1] as usize);
            let alpha = (4.0 * (i as f32 * PI / kf).sin()) / denom;
            for k in 0..len {
                e1[vid * len + k] += alpha * neighbor[k];
            }
        }
    }
    for k in 0..len {
        e1[vid * len + k] /= 3.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scalar_desc() -> BufferDescriptor {
        BufferDescriptor::new(0, 1, 1).unwrap()
    }

    #[test]
    fn b_spline_basis_partitions_unity() {
        for &t in &[0.0, 0.25, 0.5, 0.75, 1.0] {
            let b = cubic_b_spline_basis(t);
            let sum: f32 = b.iter().sum();
            assert!((sum - 1.0).abs() < 1e-6, "sum {} at t={}", sum, t);

            let d = cubic_b_spline_deriv(t);
            let dsum: f32 = d.iter().sum();
            assert!(dsum.abs() < 1e-6, "derivative sum {} at t={}", dsum, t);
        }
    }

    #[test]
    fn bezier_basis_partitions_unity() {
        for &t in &[0.0, 0.3, 0.7, 1.0] {
            let b = cubic_bezier_basis(t);
            let sum: f32 = b.iter().sum();
            assert!((sum - 1.0).abs() < 1e-6);

            let d = cubic_bezier_deriv(t);
            let dsum: f32 = d.iter().sum();
            assert!(dsum.abs() < 1e-6);
        }
    }

    #[test]
    fn b_spline_basis_at_knot() {
        let b = cubic_b_spline_basis(0.0);
        assert!((b[0] - 1.0 / 6.0).abs() < 1e-6);
        assert!((b[1] - 4.0 / 6.0).abs() < 1e-6);
        assert!((b[2] - 1.0 / 6.0).abs() < 1e-6);
        assert!(b[3].abs() < 1e-6);
    }

    /// The boundary kernel must match the regular kernel applied to an
    /// explicit grid whose row 0 is the reflection of rows 1 and 2.
    #[test]
    fn boundary_fold_matches_explicit_reflection() {
        // 12 real scalar control values, arbitrary.
        let real: [f32; 12] = [
            0.3, -1.2, 2.0, 0.7, 1.5, 0.1, -0.4, 2.2, -0.8, 1.1, 0.6, -0.3,
        ];
        let mut grid = [0.0f32; 16];
        grid[4..16].copy_from_slice(&real);
        for c in 0..4 {
            grid[c] = 2.0 * grid[4 + c] - grid[8 + c];
        }

        let cvs12: Vec<Index> = (0..12u32).map(Index).collect();
        let cvs16: Vec<Index> = (0..16u32).map(Index).collect();

        for &(v, u) in &[(0.0, 0.0), (0.4, 0.6), (1.0, 0.5), (0.2, 1.0)] {
            let (mut a, mut a_du, mut a_dv) = ([0.0f32], [0.0f32], [0.0f32]);
            eval_boundary(
                v,
                u,
                &cvs12,
                scalar_desc(),
                &real,
                &mut a,
                Some(&mut a_du),
                Some(&mut a_dv),
            );
            let (mut b, mut b_du, mut b_dv) = ([0.0f32], [0.0f32], [0.0f32]);
            eval_b_spline(
                v,
                u,
                &cvs16,
                scalar_desc(),
                &grid,
                &mut b,
                Some(&mut b_du),
                Some(&mut b_dv),
            );
            assert!((a[0] - b[0]).abs() < 1e-5, "value at ({}, {})", u, v);
            assert!((a_du[0] - b_du[0]).abs() < 1e-5);
            assert!((a_dv[0] - b_dv[0]).abs() < 1e-5);
        }
    }

    /// Same for the corner kernel: reflect row 0, column 3, and the shared
    /// corner.
    #[test]
    fn corner_fold_matches_explicit_reflection() {
        let real: [f32; 9] = [1.0, 0.2, -0.5, 0.8, 1.4, 2.1, -1.0, 0.4, 0.9];
        let mut grid = [0.0f32; 16];
        for r in 0..3 {
            for c in 0..3 {
                grid[(r + 1) * 4 + c] = real[r * 3 + c];
            }
        }
        for r in 1..4 {
            grid[r * 4 + 3] = 2.0 * grid[r * 4 + 2] - grid[r * 4 + 1];
        }
        for c in 0..3 {
            grid[c] = 2.0 * grid[4 + c] - grid[8 + c];
        }
        grid[3] = 2.0 * grid[2] - grid[1];

        let cvs9: Vec<Index> = (0..9u32).map(Index).collect();
        let cvs16: Vec<Index> = (0..16u32).map(Index).collect();

        for &(v, u) in &[(0.0, 0.0), (0.5, 0.5), (0.9, 0.3)] {
            let mut a = [0.0f32];
            eval_corner(v, u, &cvs9, scalar_desc(), &real, &mut a, None, None);
            let mut b = [0.0f32];
            eval_b_spline(v, u, &cvs16, scalar_desc(), &grid, &mut b, None, None);
            assert!((a[0] - b[0]).abs() < 1e-5, "value at ({}, {})", u, v);
        }
    }

    #[test]
    fn bilinear_center_is_mean() {
        let ring = [Index(0), Index(1), Index(2), Index(3)];
        let values = [1.0f32, 3.0, 5.0, 7.0];
        let mut out = [0.0f32];
        eval_bilinear(0.5, 0.5, &ring, scalar_desc(), &values, &mut out);
        assert!((out[0] - 4.0).abs() < 1e-6);
    }

    #[test]
    fn bilinear_corners_pick_ring_values() {
        let ring = [Index(0), Index(1), Index(2), Index(3)];
        let values = [1.0f32, 3.0, 5.0, 7.0];
        let mut out = [0.0f32];
        eval_bilinear(0.0, 0.0, &ring, scalar_desc(), &values, &mut out);
        assert!((out[0] - 1.0).abs() < 1e-6);
        eval_bilinear(0.0, 1.0, &ring, scalar_desc(), &values, &mut out);
        assert!((out[0] - 3.0).abs() < 1e-6);
        eval_bilinear(1.0, 1.0, &ring, scalar_desc(), &values, &mut out);
        assert!((out[0] - 5.0).abs() < 1e-6);
        eval_bilinear(1.0, 0.0, &ring, scalar_desc(), &values, &mut out);
        assert!((out[0] - 7.0).abs() < 1e-6);
    }

    #[test]
    fn ring_weights_hit_known_angles() {
        // csf(4, ·) walks the quarter circle.
        assert!((csf(4, 0) - 1.0).abs() < 1e-6);
        assert!(csf(4, 1).abs() < 1e-6);
        assert!(csf(4, 2).abs() < 1e-6);
        assert!((csf(4, 3) - 1.0).abs() < 1e-6);
        assert!((csf(4, 4) + 1.0).abs() < 1e-6);
    }
}
