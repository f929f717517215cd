//! Blend mode encoding
//!
//! A platform blend constant packs the plane alpha into bits 16-23 and the
//! blend operation into bits 0-15. [`encode`] turns it, together with the
//! source format, into the accelerator's alpha/porter-duff controls.

use crate::command::{
    ALPHA_FLAG_CAL_MODE, ALPHA_FLAG_ENABLE, ALPHA_FLAG_PD_ENABLE, ALPHA_MODE_GLOBAL, ALPHA_MODE_MIX,
    ALPHA_MODE_PER_PIXEL, HWC_BLENDING_COVERAGE, HWC_BLENDING_PREMULT, PD_MODE_SRC_OVER,
    PD_MODE_SRC_OVER_MIX,
};
use crate::format::HalFormat;

/// Alpha/porter-duff fields of a descriptor
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AlphaControl {
    /// Alpha/ROP flag bits
    pub flag: u8,
    /// Alpha/ROP mode; alpha mode in bits 0-1
    pub mode: u8,
    /// Global (plane) alpha
    pub global_alpha: u8,
    /// Porter-duff mode
    pub pd_mode: u16,
}

impl AlphaControl {
    /// Blending disabled
    pub const NONE: Self = Self {
        flag: 0,
        mode: 0,
        global_alpha: 0,
        pd_mode: 0,
    };

    fn enabled(alpha_mode: u8, global_alpha: u8, pd_mode: Option<u16>) -> Self {
        let mut flag = ALPHA_FLAG_ENABLE | ALPHA_FLAG_CAL_MODE;
        if pd_mode.is_some() {
            flag |= ALPHA_FLAG_PD_ENABLE;
        }
        Self {
            flag,
            mode: alpha_mode & 0x3,
            global_alpha,
            pd_mode: pd_mode.unwrap_or(0),
        }
    }

    /// Whether alpha blending is on
    pub fn is_enabled(&self) -> bool {
        self.flag & ALPHA_FLAG_ENABLE != 0
    }
}

/// Plane alpha of a blend constant
pub fn plane_alpha(blend: u32) -> u8 {
    (blend >> 16) as u8
}

/// Blend operation of a blend constant
pub fn operation(blend: u32) -> u32 {
    blend & 0xFFFF
}

/// Encode a blend constant for a source format
///
/// Only premultiplied and coverage source-over are accelerated; any other
/// operation, including "none" and zero, leaves blending off.
///
/// # Example
///
/// ```
/// use rga_blit::blend::encode;
///
/// let alpha = encode(0x00FF_0105, 0x01);
/// assert_eq!((alpha.flag, alpha.mode, alpha.pd_mode), (0x19, 1, 3));
/// ```
pub fn encode(blend: u32, src_format: i32) -> AlphaControl {
    let alpha = plane_alpha(blend);
    let per_pixel = HalFormat::from_raw(src_format).is_some_and(HalFormat::has_per_pixel_alpha);

    match operation(blend) {
        HWC_BLENDING_PREMULT if per_pixel && alpha < u8::MAX => {
            AlphaControl::enabled(ALPHA_MODE_MIX, alpha, Some(PD_MODE_SRC_OVER_MIX))
        }
        HWC_BLENDING_PREMULT if per_pixel => {
            AlphaControl::enabled(ALPHA_MODE_PER_PIXEL, 0, Some(PD_MODE_SRC_OVER))
        }
        HWC_BLENDING_COVERAGE if per_pixel && alpha < u8::MAX => {
            AlphaControl::enabled(ALPHA_MODE_MIX, alpha, None)
        }
        HWC_BLENDING_COVERAGE if per_pixel => AlphaControl::enabled(ALPHA_MODE_PER_PIXEL, 0, None),
        HWC_BLENDING_PREMULT | HWC_BLENDING_COVERAGE => {
            AlphaControl::enabled(ALPHA_MODE_GLOBAL, alpha, None)
        }
        _ => AlphaControl::NONE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RGBA: i32 = HalFormat::Rgba8888 as i32;
    const BGRA: i32 = HalFormat::Bgra8888 as i32;
    const RGBX: i32 = HalFormat::Rgbx8888 as i32;
    const NV12: i32 = HalFormat::Nv12 as i32;

    #[test]
    fn test_opaque_premultiplied_rgba() {
        let a = encode(0x00FF_0105, RGBA);
        assert_eq!(a, AlphaControl {
            flag: 0x19,
            mode: ALPHA_MODE_PER_PIXEL,
            global_alpha: 0,
            pd_mode: PD_MODE_SRC_OVER,
        });
    }

    #[test]
    fn test_translucent_premultiplied_mixes_plane_alpha() {
        let a = encode(0x0080_0105, BGRA);
        assert_eq!(a, AlphaControl {
            flag: 0x19,
            mode: ALPHA_MODE_MIX,
            global_alpha: 0x80,
            pd_mode: PD_MODE_SRC_OVER_MIX,
        });
    }

    #[test]
    fn test_coverage_never_enables_porter_duff() {
        let a = encode(0x0040_0405, RGBA);
        assert_eq!((a.flag, a.mode, a.global_alpha, a.pd_mode), (0x11, 2, 0x40, 0));
        let a = encode(0x00FF_0405, RGBA);
        assert_eq!((a.flag, a.mode, a.global_alpha, a.pd_mode), (0x11, 1, 0, 0));
    }

    #[test]
    fn test_formats_without_alpha_use_plane_alpha() {
        for format in [RGBX, NV12, 0x7777] {
            for op in [HWC_BLENDING_PREMULT, HWC_BLENDING_COVERAGE] {
                let a = encode(0x00C0_0000 | op, format);
                assert_eq!(a, AlphaControl {
                    flag: 0x11,
                    mode: ALPHA_MODE_GLOBAL,
                    global_alpha: 0xC0,
                    pd_mode: 0,
                });
            }
        }
    }

    #[test]
    fn test_other_operations_disable_blending() {
        for blend in [0, 0x0100, 0x00FF_0100, 0x00FF_0106, 0x0001_0000] {
            let a = encode(blend, RGBA);
            assert_eq!(a, AlphaControl::NONE, "{blend:#x}");
            assert!(!a.is_enabled());
        }
    }

    #[test]
    fn test_encoding_is_stateless() {
        let first = encode(0x0080_0105, RGBA);
        let _ = encode(0x00FF_0405, RGBX);
        assert_eq!(encode(0x0080_0105, RGBA), first);
    }

    #[test]
    fn test_packed_fields() {
        assert_eq!(plane_alpha(0xAB_CD_0105), 0xCD);
        assert_eq!(operation(0x00FF_0405), 0x0405);
    }
}
