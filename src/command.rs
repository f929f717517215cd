//! RGA register values
//!
//! This module names the values the compiler writes into a
//! [`BlitDescriptor`](crate::descriptor::BlitDescriptor), together with the
//! platform (HAL) codes a caller passes in for rotation and blending.
//!
//! ## Register Groups
//!
//! - Render mode: which engine pipeline runs (only bit-blit is emitted)
//! - Bit-blit mode: scale filter, rotate/mirror mode
//! - Alpha/ROP: alpha enable, porter-duff, dither bits
//! - MMU: per-request MMU info flag word
//!
//! ## Example
//!
//! ```
//! use rga_blit::command;
//!
//! // A premultiplied blend with plane alpha 0xFF
//! let blend = 0x00FF_0000 | command::HWC_BLENDING_PREMULT;
//! assert_eq!(blend & 0xFFFF, 0x0105);
//! ```

// Render mode

/// Bit-blit render mode (0)
///
/// Copy/scale/rotate from the source image into the destination image.
pub const RENDER_BITBLT: u8 = 0;

// Bit-blit scale modes

/// Nearest-neighbour scaling (0)
pub const SCALE_NEAREST: u8 = 0;

/// Bilinear scaling (1)
///
/// Never selected by the blit compiler.
pub const SCALE_BILINEAR: u8 = 1;

/// Bicubic scaling (2)
///
/// Selected whenever either axis is magnified.
pub const SCALE_BICUBIC: u8 = 2;

// Bit-blit rotate modes

/// Straight copy, no rotation (0)
pub const ROTATE_COPY: u8 = 0;

/// Rotate (and scale) by the descriptor's sine/cosine (1)
pub const ROTATE_ROTATE: u8 = 1;

/// Mirror along the X axis (2)
pub const ROTATE_X_MIRROR: u8 = 2;

/// Mirror along the Y axis (3)
pub const ROTATE_Y_MIRROR: u8 = 3;

// Alpha/ROP flag bits

/// Alpha blending enable (bit 0 of the alpha/ROP flag)
pub const ALPHA_FLAG_ENABLE: u8 = 1 << 0;

/// Porter-duff enable (bit 3 of the alpha/ROP flag)
pub const ALPHA_FLAG_PD_ENABLE: u8 = 1 << 3;

/// Alpha calculation mode (bit 4 of the alpha/ROP flag)
///
/// Set: `alpha' = alpha + (alpha >> 7)`. Clear: `alpha' = alpha`.
pub const ALPHA_FLAG_CAL_MODE: u8 = 1 << 4;

/// Dither enable (bit 5 of the alpha/ROP flag)
pub const ALPHA_FLAG_DITHER: u8 = 1 << 5;

// Alpha modes (bits 0-1 of the alpha/ROP mode)

/// Blend with the global (plane) alpha only
pub const ALPHA_MODE_GLOBAL: u8 = 0;

/// Blend with the source per-pixel alpha only
pub const ALPHA_MODE_PER_PIXEL: u8 = 1;

/// Blend with per-pixel alpha multiplied by the global alpha
pub const ALPHA_MODE_MIX: u8 = 2;

// Porter-duff modes

/// Porter-duff SRC_OVER with a plain per-pixel source
pub const PD_MODE_SRC_OVER: u16 = 3;

/// Porter-duff SRC_OVER with per-pixel alpha scaled by the plane alpha
pub const PD_MODE_SRC_OVER_MIX: u16 = 9;

// MMU info

/// MMU page size selector written into the MMU flag word
pub const MMU_PAGE_SIZE: u8 = 2;

// Platform (HAL) transform codes

/// Flip source image horizontally
pub const HAL_TRANSFORM_FLIP_H: i32 = 0x01;

/// Flip source image vertically
pub const HAL_TRANSFORM_FLIP_V: i32 = 0x02;

/// Rotate source image 90 degrees clockwise
pub const HAL_TRANSFORM_ROT_90: i32 = 0x04;

/// Rotate source image 180 degrees
pub const HAL_TRANSFORM_ROT_180: i32 = 0x03;

/// Rotate source image 270 degrees clockwise
pub const HAL_TRANSFORM_ROT_270: i32 = 0x07;

// Platform (HAL) blending codes

/// No blending (0x0100)
///
/// A blend constant of zero is treated the same way.
pub const HWC_BLENDING_NONE: u32 = 0x0100;

/// Premultiplied source-over (0x0105)
pub const HWC_BLENDING_PREMULT: u32 = 0x0105;

/// Straight (coverage) source-over (0x0405)
pub const HWC_BLENDING_COVERAGE: u32 = 0x0405;
