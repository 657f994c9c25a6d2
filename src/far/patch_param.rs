//! # Patch Parameterization
//!
//! Each patch in a [`PatchTable`](crate::far::PatchTable) covers a
//! sub-quadrant of the parametric domain of one base face. [`PatchParam`]
//! records which face, and a packed [`BitField`] with the subdivision depth,
//! the sub-quadrant origin, the rotation needed to align the patch's local
//! axes with its control vertex ordering, and the boundary edge mask.
//!
//! Raw face coordinates are transformed into the patch's local domain by
//! [`BitField::normalize()`] followed by [`BitField::rotate()`] — strictly
//! in that order, since rotation assumes a coordinate already inside the
//! unit square of the patch footprint.

/// Packed per-patch parameterization bits.
///
/// Bit layout, low to high:
///
/// | Field    | Bits | Content                                              |
/// |----------|:----:|------------------------------------------------------|
/// | depth    | 4    | subdivision level of the patch                       |
/// | non-quad | 1    | patch is the child of a non-quad base face           |
/// | rotation | 2    | quarter-turns to match control vertex winding        |
/// | v        | 10   | v origin of the patch footprint, in `2^-depth` units |
/// | u        | 10   | u origin of the patch footprint, in `2^-depth` units |
/// | boundary | 4    | boundary edge mask (informational)                   |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(transparent)]
pub struct BitField(pub u32);

impl BitField {
    /// Pack a bit field from its components.
    ///
    /// `u` and `v` are the footprint origin expressed in `2^-depth` units,
    /// i.e. integer sub-quadrant coordinates at the patch's subdivision
    /// level.
    pub fn new(depth: u32, non_quad_root: bool, rotation: u32, u: u32, v: u32) -> Self {
        debug_assert!(depth < 16);
        debug_assert!(rotation < 4);
        debug_assert!(u < 1024 && v < 1024);
        BitField(
            (depth & 0xf)
                | ((non_quad_root as u32) << 4)
                | ((rotation & 0x3) << 5)
                | ((v & 0x3ff) << 7)
                | ((u & 0x3ff) << 17),
        )
    }

    /// Same as [`new()`](Self::new) with a boundary edge mask.
    pub fn with_boundary(
        depth: u32,
        non_quad_root: bool,
        rotation: u32,
        u: u32,
        v: u32,
        boundary: u32,
    ) -> Self {
        let bits = Self::new(depth, non_quad_root, rotation, u, v);
        BitField(bits.0 | ((boundary & 0xf) << 27))
    }

    /// The subdivision level of the patch.
    #[inline]
    pub fn depth(&self) -> u32 {
        self.0 & 0xf
    }

    /// Whether the patch descends from a non-quad base face. Such patches
    /// are parameterized from depth 1, so their footprint is one level
    /// coarser than [`depth()`](Self::depth) suggests.
    #[inline]
    pub fn non_quad_root(&self) -> bool {
        (self.0 >> 4) & 0x1 != 0
    }

    /// Number of quarter-turns aligning local axes with the control vertex
    /// ordering.
    #[inline]
    pub fn rotation(&self) -> u32 {
        (self.0 >> 5) & 0x3
    }

    /// The v origin of the footprint in `2^-depth` units.
    #[inline]
    pub fn v(&self) -> u32 {
        (self.0 >> 7) & 0x3ff
    }

    /// The u origin of the footprint in `2^-depth` units.
    #[inline]
    pub fn u(&self) -> u32 {
        (self.0 >> 17) & 0x3ff
    }

    /// Boundary edge mask. Purely informational on the evaluation path;
    /// boundary and corner patches are stored pre-rotated into canonical
    /// orientation.
    #[inline]
    pub fn boundary(&self) -> u32 {
        (self.0 >> 27) & 0xf
    }

    /// The fraction of the base face's parametric space covered by this
    /// patch.
    #[inline]
    pub fn param_fraction(&self) -> f32 {
        if self.non_quad_root() {
            1.0 / (1 << (self.depth() - 1)) as f32
        } else {
            1.0 / (1 << self.depth()) as f32
        }
    }

    /// Rescale raw face coordinates into the patch's local `[0, 1] × [0, 1]`
    /// domain.
    #[inline]
    pub fn normalize(&self, u: &mut f32, v: &mut f32) {
        let frac = self.param_fraction();
        let pu = self.u() as f32 * frac;
        let pv = self.v() as f32 * frac;
        *u = (*u - pu) / frac;
        *v = (*v - pv) / frac;
    }

    /// Apply the stored quarter-turn rotation to a coordinate already in the
    /// local domain. Must be called *after* [`normalize()`](Self::normalize).
    #[inline]
    pub fn rotate(&self, u: &mut f32, v: &mut f32) {
        match self.rotation() {
            0 => (),
            1 => {
                let tmp = *v;
                *v = 1.0 - *u;
                *u = tmp;
            }
            2 => {
                *u = 1.0 - *u;
                *v = 1.0 - *v;
            }
            _ => {
                let tmp = *u;
                *u = 1.0 - *v;
                *v = tmp;
            }
        }
    }
}

/// Per-patch parameterization: the base face the patch descends from plus
/// the packed [`BitField`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PatchParam {
    /// Index of the base face this patch covers (part of).
    pub face_index: u32,
    /// Packed depth/rotation/origin bits.
    pub bits: BitField,
}

impl PatchParam {
    /// Construct a parameterization for a patch covering the sub-quadrant
    /// at `(u, v)` (in `2^-depth` units) of `face_index`.
    pub fn new(face_index: u32, depth: u32, rotation: u32, u: u32, v: u32) -> Self {
        Self {
            face_index,
            bits: BitField::new(depth, false, rotation, u, v),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bit_field_roundtrip() {
        let bits = BitField::with_boundary(3, true, 2, 5, 6, 0b1001);
        assert_eq!(bits.depth(), 3);
        assert!(bits.non_quad_root());
        assert_eq!(bits.rotation(), 2);
        assert_eq!(bits.u(), 5);
        assert_eq!(bits.v(), 6);
        assert_eq!(bits.boundary(), 0b1001);
    }

    #[test]
    fn normalize_rescales_into_unit_square() {
        // Depth 2 quadrant at (1, 2): footprint [0.25, 0.5] x [0.5, 0.75].
        let bits = BitField::new(2, false, 0, 1, 2);
        let (mut u, mut v) = (0.375, 0.625);
        bits.normalize(&mut u, &mut v);
        assert!((u - 0.5).abs() < 1e-6);
        assert!((v - 0.5).abs() < 1e-6);

        let (mut u, mut v) = (0.25, 0.5);
        bits.normalize(&mut u, &mut v);
        assert!(u.abs() < 1e-6 && v.abs() < 1e-6);
    }

    #[test]
    fn non_quad_root_uses_parent_fraction() {
        let quad = BitField::new(2, false, 0, 0, 0);
        let non_quad = BitField::new(2, true, 0, 0, 0);
        assert!((quad.param_fraction() - 0.25).abs() < 1e-6);
        assert!((non_quad.param_fraction() - 0.5).abs() < 1e-6);
    }

    #[test]
    fn rotate_is_a_quarter_turn() {
        // Four quarter turns must come back to the start.
        let bits = BitField::new(0, false, 1, 0, 0);
        let (mut u, mut v) = (0.25, 0.125);
        for _ in 0..4 {
            bits.rotate(&mut u, &mut v);
        }
        assert!((u - 0.25).abs() < 1e-6);
        assert!((v - 0.125).abs() < 1e-6);
    }

    #[test]
    fn rotations_compose() {
        let r1 = BitField::new(0, false, 1, 0, 0);
        let r2 = BitField::new(0, false, 2, 0, 0);
        let (mut u, mut v) = (0.75, 0.25);
        r1.rotate(&mut u, &mut v);
        r1.rotate(&mut u, &mut v);
        let (mut u2, mut v2) = (0.75, 0.25);
        r2.rotate(&mut u2, &mut v2);
        assert!((u - u2).abs() < 1e-6);
        assert!((v - v2).abs() < 1e-6);
    }
}
