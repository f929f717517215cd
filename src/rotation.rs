//! Rotation and geometry mapping
//!
//! This module turns a resolved rectangle pair and a [`Rotation`] into the
//! geometry the accelerator is programmed with.
//!
//! The accelerator walks the destination from a start corner, so a rotated
//! blit moves the destination origin and, for quarter turns, swaps the
//! destination's active width and height. Virtual (buffer) dimensions are
//! never transformed and the source side is always taken as-is.
//!
//! ## Rotation Modes
//!
//! | Rotation       | Orientation | Rotate mode | Axis swap | Destination origin   |
//! |----------------|-------------|-------------|-----------|----------------------|
//! | Identity       | 0           | copy        | no        | rectangle offsets    |
//! | FlipHorizontal | 0           | x-mirror    | no        | rectangle offsets    |
//! | FlipVertical   | 0           | y-mirror    | no        | rectangle offsets    |
//! | Rotate90       | 90          | rotate      | yes       | `(width - 1, 0)`     |
//! | Rotate180      | 180         | rotate      | no        | `(width - 1, height - 1)` |
//! | Rotate270      | 270         | rotate      | yes       | `(0, height - 1)`    |
//!
//! ## Example
//!
//! ```
//! use rga_blit::rotation::map;
//! use rga_blit::{Rect, RectPair, Rotation};
//!
//! let rects = RectPair {
//!     src: Rect::new(0, 0, 1080, 1920, 1088, 0x01),
//!     dst: Rect::new(0, 0, 1920, 1080, 1920, 0x01),
//! };
//! let geometry = map(&rects, Rotation::Rotate90);
//! assert_eq!((geometry.dst.active_width, geometry.dst.active_height), (1080, 1920));
//! assert_eq!((geometry.dst.x_offset, geometry.dst.y_offset), (1919, 0));
//! ```

use crate::command::{
    ROTATE_COPY, ROTATE_ROTATE, ROTATE_X_MIRROR, ROTATE_Y_MIRROR, SCALE_BICUBIC, SCALE_NEAREST,
};
use crate::config::{DitherPolicy, Rotation};
use crate::error::Error;
use crate::format::bytes_per_pixel;
use crate::rect::{Rect, RectPair};

/// Programmed geometry of one side
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SideGeometry {
    /// Buffer row stride
    pub virtual_width: u32,
    /// Buffer height
    pub virtual_height: u32,
    /// Width of the region walked by the engine
    pub active_width: u32,
    /// Height of the region walked by the engine
    pub active_height: u32,
    /// Start column
    pub x_offset: u32,
    /// Start row
    pub y_offset: u32,
}

impl SideGeometry {
    /// Untransformed geometry of a rectangle
    fn of(rect: &Rect) -> Self {
        Self {
            virtual_width: rect.stride as u32,
            virtual_height: rect.height as u32,
            active_width: rect.width as u32,
            active_height: rect.height as u32,
            x_offset: rect.xoffset as u32,
            y_offset: rect.yoffset as u32,
        }
    }
}

/// Destination clip window, inclusive on both ends
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Clip {
    /// Leftmost column
    pub xmin: u32,
    /// Rightmost column
    pub xmax: u32,
    /// Top row
    pub ymin: u32,
    /// Bottom row
    pub ymax: u32,
}

/// Geometry of a blit after rotation
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Geometry {
    /// Source geometry
    pub src: SideGeometry,
    /// Destination geometry, active size and origin rotated
    pub dst: SideGeometry,
    /// Clip window over the rotated destination
    pub clip: Clip,
    /// Rotation angle in degrees
    pub orientation: u32,
    /// Bit-blit rotate mode
    pub rotate_mode: u8,
}

impl Geometry {
    /// Scale filter for this geometry
    ///
    /// Bicubic when either axis is magnified, nearest otherwise. The test is
    /// an integer division, so any source smaller than its destination on
    /// an axis counts as magnified. An empty destination axis does not.
    pub fn scale_mode(&self) -> u8 {
        if magnified(self.src.active_width, self.dst.active_width)
            || magnified(self.src.active_height, self.dst.active_height)
        {
            SCALE_BICUBIC
        } else {
            SCALE_NEAREST
        }
    }

    /// Whether the engine can shrink the source into the destination
    ///
    /// The bit-blit engine shrinks by at most 2x on each axis.
    pub fn within_scale_range(&self) -> bool {
        self.src.active_width >> 1 <= self.dst.active_width
            && self.src.active_height >> 1 <= self.dst.active_height
    }
}

fn magnified(src: u32, dst: u32) -> bool {
    src.checked_div(dst).is_some_and(|ratio| ratio < 1)
}

/// Map a rectangle pair through a rotation
///
/// Rectangles should have passed resolution (positive sizes and strides,
/// non-negative offsets). Empty rectangles map to a zero origin and a
/// zero clip instead of wrapping.
pub fn map(rects: &RectPair, rotation: Rotation) -> Geometry {
    let src = SideGeometry::of(&rects.src);
    let mut dst = SideGeometry::of(&rects.dst);
    let (width, height) = (dst.active_width, dst.active_height);

    let (orientation, rotate_mode) = match rotation {
        Rotation::Identity => (0, ROTATE_COPY),
        Rotation::FlipHorizontal => (0, ROTATE_X_MIRROR),
        Rotation::FlipVertical => (0, ROTATE_Y_MIRROR),
        Rotation::Rotate90 => {
            (dst.x_offset, dst.y_offset) = (width.saturating_sub(1), 0);
            (90, ROTATE_ROTATE)
        }
        Rotation::Rotate180 => {
            (dst.x_offset, dst.y_offset) = (width.saturating_sub(1), height.saturating_sub(1));
            (180, ROTATE_ROTATE)
        }
        Rotation::Rotate270 => {
            (dst.x_offset, dst.y_offset) = (0, height.saturating_sub(1));
            (270, ROTATE_ROTATE)
        }
    };
    if rotation.swaps_axes() {
        (dst.active_width, dst.active_height) = (height, width);
    }

    Geometry {
        src,
        dst,
        clip: Clip {
            xmin: 0,
            xmax: dst.active_width.saturating_sub(1),
            ymin: 0,
            ymax: dst.active_height.saturating_sub(1),
        },
        orientation,
        rotate_mode,
    }
}

/// Whether to set the dither bit for a rectangle pair
pub fn dither(rects: &RectPair, policy: DitherPolicy) -> bool {
    match policy {
        DitherPolicy::Legacy => false,
        DitherPolicy::Corrected => {
            bytes_per_pixel(rects.src.format) != bytes_per_pixel(rects.dst.format)
        }
    }
}

/// Bit-blit mode fields of a descriptor
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BlitMode {
    /// Scale filter
    pub scale_mode: u8,
    /// Copy, rotate, or mirror
    pub rotate_mode: u8,
    /// Rotation angle in degrees
    pub orientation: u32,
    /// Dither enable
    pub dither: bool,
}

impl BlitMode {
    /// Derive the bit-blit mode of a mapped geometry
    ///
    /// # Errors
    ///
    /// Returns [`Error::ScaleOutOfRange`] if the destination is less than
    /// half the source on either axis.
    pub fn new<AE, DE>(geometry: &Geometry, dither: bool) -> Result<Self, Error<AE, DE>> {
        if !geometry.within_scale_range() {
            return Err(Error::ScaleOutOfRange {
                src_width: geometry.src.active_width,
                src_height: geometry.src.active_height,
                dst_width: geometry.dst.active_width,
                dst_height: geometry.dst.active_height,
            });
        }
        Ok(Self {
            scale_mode: geometry.scale_mode(),
            rotate_mode: geometry.rotate_mode,
            orientation: geometry.orientation,
            dither,
        })
    }
}
