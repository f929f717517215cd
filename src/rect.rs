//! Surface rectangles and rectangle resolution
//!
//! A blit side is either an allocator handle, whose full-buffer rectangle
//! can be looked up, or a raw address with no intrinsic geometry. The
//! caller may supply explicit rectangles for either side; [`resolve`]
//! merges the two sources into one validated rectangle per side.
//!
//! ## Example
//!
//! ```
//! use rga_blit::{Rect, RectPair};
//!
//! // Blit the top-left quarter of a 1280x720 RGBA frame into a 640x360 one
//! let rects = RectPair {
//!     src: Rect::new(0, 0, 640, 360, 1280, 0x01),
//!     dst: Rect::new(0, 0, 640, 360, 640, 0x01),
//! };
//! assert!(rects.src.has_stride());
//! ```

use crate::error::Error;
use crate::format::{INVALID_FORMAT, rga_format};
use crate::interface::BufferAllocator;

/// Which side of a blit an item belongs to
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Side {
    /// The image being read
    Source,
    /// The image being written
    Destination,
}

impl core::fmt::Display for Side {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Source => write!(f, "Source"),
            Self::Destination => write!(f, "Destination"),
        }
    }
}

/// Rectangle within a buffer
///
/// All values are in pixels except `size`, which is the buffer size in
/// bytes. A `stride` of zero or less means the rectangle was not supplied.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Rect {
    /// Left edge within the buffer
    pub xoffset: i32,
    /// Top edge within the buffer
    pub yoffset: i32,
    /// Width of the region
    pub width: i32,
    /// Height of the region
    pub height: i32,
    /// Row stride of the buffer
    pub stride: i32,
    /// HAL pixel format id
    pub format: i32,
    /// Buffer size in bytes
    pub size: i32,
}

impl Rect {
    /// Create a rectangle with an unknown byte size
    #[allow(clippy::many_single_char_names)]
    pub fn new(x: i32, y: i32, w: i32, h: i32, stride: i32, format: i32) -> Self {
        Self {
            xoffset: x,
            yoffset: y,
            width: w,
            height: h,
            stride,
            format,
            size: 0,
        }
    }

    /// Whether the rectangle was actually supplied
    pub fn has_stride(&self) -> bool {
        self.stride > 0
    }

    /// Whether the rectangle describes a non-empty region inside a buffer
    pub fn is_valid(&self) -> bool {
        self.width > 0
            && self.height > 0
            && self.stride > 0
            && self.xoffset >= 0
            && self.yoffset >= 0
    }
}

/// Source and destination rectangles of one blit
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RectPair {
    /// Source rectangle
    pub src: Rect,
    /// Destination rectangle
    pub dst: Rect,
}

/// Reference to one side's buffer
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BufferRef<H> {
    /// Buffer owned by the platform allocator
    Handle(H),
    /// Raw virtual address with no allocator metadata
    Raw(usize),
}

/// Rectangles that passed resolution, plus each side's allocation type
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ResolvedRects {
    /// Source rectangle
    pub src: Rect,
    /// Destination rectangle
    pub dst: Rect,
    /// Source allocation type (0 for raw buffers)
    pub src_type: i32,
    /// Destination allocation type (0 for raw buffers)
    pub dst_type: i32,
}

impl ResolvedRects {
    /// The resolved pair without allocation types
    pub fn pair(&self) -> RectPair {
        RectPair {
            src: self.src,
            dst: self.dst,
        }
    }
}

/// Resolve the rectangles of a blit
///
/// Handle sides are always looked up, even when an explicit rectangle
/// replaces the inferred one. Each side independently takes its explicit
/// rectangle when that rectangle has a positive stride.
///
/// # Errors
///
/// - [`Error::Allocator`] if a handle lookup fails
/// - [`Error::MissingRect`] if a raw side has no explicit rectangle
/// - [`Error::InvalidRect`] for empty sizes, non-positive strides, or
///   negative offsets
/// - [`Error::UnsupportedFormat`] if a format has no accelerator code
pub fn resolve<A, DE>(
    allocator: &A,
    src: BufferRef<A::Handle>,
    dst: BufferRef<A::Handle>,
    explicit: Option<&RectPair>,
) -> Result<ResolvedRects, Error<A::Error, DE>>
where
    A: BufferAllocator,
{
    let (src, src_type) = resolve_side(allocator, Side::Source, src, explicit.map(|r| r.src))?;
    let (dst, dst_type) =
        resolve_side(allocator, Side::Destination, dst, explicit.map(|r| r.dst))?;
    Ok(ResolvedRects {
        src,
        dst,
        src_type,
        dst_type,
    })
}

fn resolve_side<A, DE>(
    allocator: &A,
    side: Side,
    buffer: BufferRef<A::Handle>,
    explicit: Option<Rect>,
) -> Result<(Rect, i32), Error<A::Error, DE>>
where
    A: BufferAllocator,
{
    let explicit = explicit.filter(Rect::has_stride);
    let (rect, type_tag) = match buffer {
        BufferRef::Handle(handle) => {
            let attrs = allocator.attributes(handle).map_err(Error::Allocator)?;
            (explicit.unwrap_or_else(|| attrs.rect()), attrs.type_tag)
        }
        BufferRef::Raw(_) => (explicit.ok_or(Error::MissingRect { side })?, 0),
    };

    if !rect.is_valid() {
        return Err(Error::InvalidRect { side, rect });
    }
    if rga_format(rect.format) == INVALID_FORMAT {
        return Err(Error::UnsupportedFormat {
            side,
            format: rect.format,
        });
    }
    Ok((rect, type_tag))
}
