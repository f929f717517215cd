//! Pixel format translation
//!
//! Buffers are described with platform (HAL) pixel-format ids. The
//! accelerator uses its own format codes; [`rga_format`] translates between
//! the two over a small closed set and returns [`INVALID_FORMAT`] for
//! anything else.
//!
//! | HAL format          | HAL id | RGA code |
//! |---------------------|--------|----------|
//! | RGBA_8888           | 0x01   | 0x00     |
//! | RGBX_8888           | 0x02   | 0x01     |
//! | RGB_888             | 0x03   | 0x02     |
//! | RGB_565             | 0x04   | 0x04     |
//! | BGRA_8888           | 0x05   | 0x03     |
//! | YCrCb_NV12          | 0x20   | 0x0A     |
//! | YCrCb_NV12_VIDEO    | 0x21   | 0x0A     |
//! | YCrCb_NV12_10       | 0x22   | 0x20     |
//!
//! ## Example
//!
//! ```
//! use rga_blit::format::{rga_format, HalFormat, INVALID_FORMAT};
//!
//! assert_eq!(rga_format(HalFormat::Nv12 as i32), 0x0A);
//! assert_eq!(rga_format(0x7777), INVALID_FORMAT);
//! ```

/// Sentinel returned for a HAL format with no RGA equivalent
pub const INVALID_FORMAT: i32 = -1;

/// RGA format code for packed RGBA 8:8:8:8
pub const RK_FORMAT_RGBA_8888: i32 = 0x00;
/// RGA format code for packed RGBX 8:8:8:8
pub const RK_FORMAT_RGBX_8888: i32 = 0x01;
/// RGA format code for packed RGB 8:8:8
pub const RK_FORMAT_RGB_888: i32 = 0x02;
/// RGA format code for packed BGRA 8:8:8:8
pub const RK_FORMAT_BGRA_8888: i32 = 0x03;
/// RGA format code for packed RGB 5:6:5
pub const RK_FORMAT_RGB_565: i32 = 0x04;
/// RGA format code for semi-planar YCbCr 4:2:0
pub const RK_FORMAT_YCBCR_420_SP: i32 = 0x0A;
/// RGA format code for 10-bit semi-planar YCbCr 4:2:0
pub const RK_FORMAT_YCBCR_420_SP_10B: i32 = 0x20;

/// Platform pixel formats the accelerator can read or write
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(i32)]
pub enum HalFormat {
    /// 32-bit RGBA, alpha in the top byte
    Rgba8888 = 0x01,
    /// 32-bit RGB with an ignored fourth byte
    Rgbx8888 = 0x02,
    /// 24-bit packed RGB
    Rgb888 = 0x03,
    /// 16-bit RGB 5:6:5
    Rgb565 = 0x04,
    /// 32-bit BGRA
    Bgra8888 = 0x05,
    /// Semi-planar 4:2:0 YUV
    Nv12 = 0x20,
    /// Semi-planar 4:2:0 YUV allocated for video decode
    Nv12Video = 0x21,
    /// 10-bit semi-planar 4:2:0 YUV
    Nv12_10 = 0x22,
}

impl HalFormat {
    /// Look up a raw HAL format id
    pub fn from_raw(raw: i32) -> Option<Self> {
        match raw {
            0x01 => Some(Self::Rgba8888),
            0x02 => Some(Self::Rgbx8888),
            0x03 => Some(Self::Rgb888),
            0x04 => Some(Self::Rgb565),
            0x05 => Some(Self::Bgra8888),
            0x20 => Some(Self::Nv12),
            0x21 => Some(Self::Nv12Video),
            0x22 => Some(Self::Nv12_10),
            _ => None,
        }
    }

    /// Accelerator format code for this format
    pub fn rga_code(self) -> i32 {
        match self {
            Self::Rgba8888 => RK_FORMAT_RGBA_8888,
            Self::Rgbx8888 => RK_FORMAT_RGBX_8888,
            Self::Rgb888 => RK_FORMAT_RGB_888,
            Self::Rgb565 => RK_FORMAT_RGB_565,
            Self::Bgra8888 => RK_FORMAT_BGRA_8888,
            Self::Nv12 | Self::Nv12Video => RK_FORMAT_YCBCR_420_SP,
            Self::Nv12_10 => RK_FORMAT_YCBCR_420_SP_10B,
        }
    }

    /// Bytes per pixel of a packed format
    ///
    /// Planar YUV formats have no single per-pixel size and return `None`.
    pub fn bytes_per_pixel(self) -> Option<u32> {
        match self {
            Self::Rgba8888 | Self::Rgbx8888 | Self::Bgra8888 => Some(4),
            Self::Rgb888 => Some(3),
            Self::Rgb565 => Some(2),
            Self::Nv12 | Self::Nv12Video | Self::Nv12_10 => None,
        }
    }

    /// Whether each pixel carries its own alpha channel
    pub fn has_per_pixel_alpha(self) -> bool {
        matches!(self, Self::Rgba8888 | Self::Bgra8888)
    }
}

/// Translate a raw HAL format id to an RGA format code
///
/// Returns [`INVALID_FORMAT`] for ids outside the supported set.
pub fn rga_format(raw: i32) -> i32 {
    HalFormat::from_raw(raw).map_or(INVALID_FORMAT, HalFormat::rga_code)
}

/// Bytes per pixel of a raw HAL format id, `None` when unknown or planar
pub fn bytes_per_pixel(raw: i32) -> Option<u32> {
    HalFormat::from_raw(raw).and_then(HalFormat::bytes_per_pixel)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rgb_formats_translate() {
        assert_eq!(rga_format(0x01), RK_FORMAT_RGBA_8888);
        assert_eq!(rga_format(0x02), RK_FORMAT_RGBX_8888);
        assert_eq!(rga_format(0x03), RK_FORMAT_RGB_888);
        assert_eq!(rga_format(0x04), RK_FORMAT_RGB_565);
        assert_eq!(rga_format(0x05), RK_FORMAT_BGRA_8888);
    }

    #[test]
    fn test_both_nv12_variants_share_a_code() {
        assert_eq!(rga_format(HalFormat::Nv12 as i32), RK_FORMAT_YCBCR_420_SP);
        assert_eq!(
            rga_format(HalFormat::Nv12Video as i32),
            RK_FORMAT_YCBCR_420_SP
        );
        assert_eq!(
            rga_format(HalFormat::Nv12_10 as i32),
            RK_FORMAT_YCBCR_420_SP_10B
        );
    }

    #[test]
    fn test_unknown_formats_yield_sentinel() {
        for raw in [i32::MIN, -1, 0, 0x06, 0x11, 0x23, 0x100, i32::MAX] {
            assert_eq!(rga_format(raw), INVALID_FORMAT, "raw {raw:#x}");
        }
    }

    #[test]
    fn test_per_pixel_alpha_formats() {
        assert!(HalFormat::Rgba8888.has_per_pixel_alpha());
        assert!(HalFormat::Bgra8888.has_per_pixel_alpha());
        assert!(!HalFormat::Rgbx8888.has_per_pixel_alpha());
        assert!(!HalFormat::Nv12.has_per_pixel_alpha());
    }

    #[test]
    fn test_bytes_per_pixel() {
        assert_eq!(bytes_per_pixel(0x01), Some(4));
        assert_eq!(bytes_per_pixel(0x03), Some(3));
        assert_eq!(bytes_per_pixel(0x04), Some(2));
        assert_eq!(bytes_per_pixel(0x20), None);
        assert_eq!(bytes_per_pixel(0x99), None);
    }
}
