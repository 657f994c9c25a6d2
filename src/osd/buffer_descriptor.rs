//! Buffer layout description for client-owned primvar data.

use crate::{Error, Result};

/// Describes the layout of one primvar buffer: where the data starts, how
/// many components one element carries, and how far apart consecutive
/// elements are.
///
/// All values are in `f32` units. `length` is the number of interpolated
/// components per element (3 for a position, 2 for a texture coordinate,
/// …); `stride` is the distance between consecutive elements and may exceed
/// `length` for interleaved layouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BufferDescriptor {
    /// Offset of the first element, in floats.
    pub offset: usize,
    /// Components per element.
    pub length: usize,
    /// Distance between consecutive elements, in floats.
    pub stride: usize,
}

impl BufferDescriptor {
    /// Create a descriptor, checking that one element fits inside its
    /// stride.
    pub fn new(offset: usize, length: usize, stride: usize) -> Result<Self> {
        if length == 0 || length > stride {
            return Err(Error::InvalidBufferDescriptor { length, stride });
        }
        Ok(Self {
            offset,
            length,
            stride,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_interleaved_layouts() {
        let desc = BufferDescriptor::new(4, 3, 8).unwrap();
        assert_eq!(desc.offset, 4);
        assert_eq!(desc.length, 3);
        assert_eq!(desc.stride, 8);
    }

    #[test]
    fn rejects_element_larger_than_stride() {
        assert!(BufferDescriptor::new(0, 4, 3).is_err());
        assert!(BufferDescriptor::new(0, 0, 3).is_err());
    }
}
