//! Accelerator command descriptor
//!
//! [`BlitDescriptor`] is the register image of one blit. It starts zeroed
//! and is filled in by the compiler stages in order: addressing, active
//! geometry, bit-blit mode, alpha, and finally the MMU block. Submission
//! consumes it through [`DeviceChannel::submit`](crate::DeviceChannel::submit).

use bitflags::bitflags;
use log::debug;

use crate::address::SideAddress;
use crate::blend::AlphaControl;
use crate::command::{ALPHA_FLAG_DITHER, MMU_PAGE_SIZE, RENDER_BITBLT};
use crate::lut;
use crate::rotation::{BlitMode, Clip, SideGeometry};

bitflags! {
    /// MMU info flag word
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct MmuFlags: u32 {
        /// MMU enable
        const ENABLE = 1;
        /// Flush the source TLB before the blit
        const SRC_FLUSH = 1 << 1;
        /// Flush the destination TLB before the blit
        const DST_FLUSH = 1 << 2;
        /// Flush the command TLB before the blit
        const CMD_FLUSH = 1 << 3;
        /// Page size selector (bits 4-5)
        const PAGE_SIZE = 0b11 << 4;
        /// Translate source addresses
        const SRC_MMU = 1 << 8;
        /// Translate destination addresses
        const DST_MMU = 1 << 10;
        /// Per-side translation bits are valid
        const TRANSLATE = 1 << 31;
    }
}

impl MmuFlags {
    /// Page size selector as flag bits
    pub fn page_size(size: u8) -> Self {
        Self::from_bits_retain(u32::from(size & 0b11) << 4)
    }
}

/// Image info of one side
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ImageInfo {
    /// Luma (or packed RGB) address, or fd on current drivers
    pub yrgb_addr: usize,
    /// Chroma address
    pub uv_addr: usize,
    /// Second chroma address
    pub v_addr: usize,
    /// RGA format code
    pub format: i32,
    /// Active width
    pub act_w: u32,
    /// Active height
    pub act_h: u32,
    /// Active start column
    pub x_offset: u32,
    /// Active start row
    pub y_offset: u32,
    /// Virtual (stride) width
    pub vir_w: u32,
    /// Virtual height
    pub vir_h: u32,
    /// Alpha/RGB channel swap
    pub alpha_swap: u8,
}

/// File descriptors handed over on transitional drivers
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FdInfo {
    /// Source fd in bits 0-15, destination fd in bits 16-31
    pub packed: u32,
    /// Byte offset into the source buffer
    pub src_offset: u32,
    /// Byte offset into the destination buffer
    pub dst_offset: u32,
}

/// MMU info block
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MmuInfo {
    /// MMU enable
    pub mmu_en: u8,
    /// Page table base
    pub base_addr: usize,
    /// Flag word
    pub flags: MmuFlags,
}

impl Default for MmuInfo {
    fn default() -> Self {
        Self {
            mmu_en: 0,
            base_addr: 0,
            flags: MmuFlags::empty(),
        }
    }
}

/// Register image of one blit
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BlitDescriptor {
    /// Source image
    pub src: ImageInfo,
    /// Destination image
    pub dst: ImageInfo,
    /// Destination clip window
    pub clip: Clip,
    /// Engine pipeline
    pub render_mode: u8,
    /// Scale filter
    pub scale_mode: u8,
    /// Copy, rotate, or mirror
    pub rotate_mode: u8,
    /// Fixed-point sine of the rotation angle
    pub sina: i32,
    /// Fixed-point cosine of the rotation angle
    pub cosa: i32,
    /// Alpha/ROP flag bits
    pub alpha_rop_flag: u8,
    /// Alpha/ROP mode
    pub alpha_rop_mode: u8,
    /// Global (plane) alpha
    pub alpha_global_value: u8,
    /// Porter-duff mode
    pub pd_mode: u16,
    /// Colour space conversion mode
    pub yuv2rgb_mode: u8,
    /// Fd hand-over block
    pub fds: FdInfo,
    /// MMU block
    pub mmu: MmuInfo,
}

impl BlitDescriptor {
    /// Create a zeroed descriptor
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the source addresses, virtual size, and format
    pub fn set_src_virtual(&mut self, address: &SideAddress, geometry: &SideGeometry, format: i32) {
        set_virtual(&mut self.src, address, geometry, format);
    }

    /// Set the destination addresses, virtual size, format, and clip
    pub fn set_dst_virtual(
        &mut self,
        address: &SideAddress,
        geometry: &SideGeometry,
        format: i32,
        clip: Clip,
    ) {
        set_virtual(&mut self.dst, address, geometry, format);
        self.clip = clip;
    }

    /// Set the source active region
    pub fn set_src_active(&mut self, geometry: &SideGeometry) {
        set_active(&mut self.src, geometry);
    }

    /// Set the destination active region
    pub fn set_dst_active(&mut self, geometry: &SideGeometry) {
        set_active(&mut self.dst, geometry);
    }

    /// Select bit-blit rendering
    ///
    /// Also loads the sine and cosine of the rotation angle.
    pub fn set_bitblt_mode(&mut self, mode: &BlitMode) {
        self.render_mode = RENDER_BITBLT;
        self.scale_mode = mode.scale_mode;
        self.rotate_mode = mode.rotate_mode;
        self.sina = lut::sin(mode.orientation);
        self.cosa = lut::cos(mode.orientation);
        if mode.dither {
            self.alpha_rop_flag |= ALPHA_FLAG_DITHER;
        }
        self.yuv2rgb_mode = 0;
    }

    /// Select bit-blit rendering, leaving the mode fields untouched
    pub fn set_render_bitblt(&mut self) {
        self.render_mode = RENDER_BITBLT;
    }

    /// Merge alpha/porter-duff controls
    pub fn set_alpha(&mut self, alpha: &AlphaControl) {
        self.alpha_rop_flag |= alpha.flag;
        self.alpha_rop_mode |= alpha.mode;
        self.alpha_global_value = alpha.global_alpha;
        self.pd_mode = alpha.pd_mode;
    }

    /// Record the file descriptors handed over through the fd block
    ///
    /// Offsets are always zero.
    pub fn set_fds(&mut self, src: Option<i32>, dst: Option<i32>) {
        let low = |fd: Option<i32>| fd.map_or(0, |fd| fd as u32 & 0xFFFF);
        self.fds = FdInfo {
            packed: low(src) | (low(dst) << 16),
            src_offset: 0,
            dst_offset: 0,
        };
    }

    /// Enable the MMU for the sides that need it
    ///
    /// Does nothing when neither side needs translation.
    pub fn set_mmu(&mut self, src: bool, dst: bool) {
        if !src && !dst {
            return;
        }
        let mut flags = MmuFlags::page_size(MMU_PAGE_SIZE) | MmuFlags::ENABLE | MmuFlags::TRANSLATE;
        flags.set(MmuFlags::SRC_MMU, src);
        flags.set(MmuFlags::DST_MMU, dst);
        self.mmu = MmuInfo {
            mmu_en: 1,
            base_addr: 0,
            flags,
        };
    }

    /// Log every field at debug level
    pub fn log_dump(&self) {
        for (name, image) in [("src", &self.src), ("dst", &self.dst)] {
            debug!(
                "{}: addr=[{:#x},{:#x},{:#x}] fmt={:#x} act=[{},{}] off=[{},{}] vir=[{},{}]",
                name,
                image.yrgb_addr,
                image.uv_addr,
                image.v_addr,
                image.format,
                image.act_w,
                image.act_h,
                image.x_offset,
                image.y_offset,
                image.vir_w,
                image.vir_h,
            );
        }
        debug!(
            "clip=[{},{},{},{}] render={} scale={} rotate={} sin={} cos={}",
            self.clip.xmin,
            self.clip.xmax,
            self.clip.ymin,
            self.clip.ymax,
            self.render_mode,
            self.scale_mode,
            self.rotate_mode,
            self.sina,
            self.cosa,
        );
        debug!(
            "alpha: flag={:#x} mode={:#x} global={} pd={} fds={:#x} mmu: en={} flags={:#x}",
            self.alpha_rop_flag,
            self.alpha_rop_mode,
            self.alpha_global_value,
            self.pd_mode,
            self.fds.packed,
            self.mmu.mmu_en,
            self.mmu.flags.bits(),
        );
    }
}

fn set_virtual(image: &mut ImageInfo, address: &SideAddress, geometry: &SideGeometry, format: i32) {
    image.yrgb_addr = address.yrgb;
    image.uv_addr = address.uv;
    image.v_addr = address.v;
    image.vir_w = geometry.virtual_width;
    image.vir_h = geometry.virtual_height;
    image.format = format;
    image.alpha_swap = 0;
}

fn set_active(image: &mut ImageInfo, geometry: &SideGeometry) {
    image.act_w = geometry.active_width;
    image.act_h = geometry.active_height;
    image.x_offset = geometry.x_offset;
    image.y_offset = geometry.y_offset;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::{ALPHA_MODE_PER_PIXEL, PD_MODE_SRC_OVER, ROTATE_ROTATE, SCALE_BICUBIC};
    use crate::lut::FIXED_ONE;

    #[test]
    fn test_new_descriptor_is_zeroed() {
        let desc = BlitDescriptor::new();
        assert_eq!(desc.mmu.flags.bits(), 0);
        assert_eq!(desc.fds.packed, 0);
        assert_eq!(desc.alpha_rop_flag, 0);
        assert_eq!(desc, BlitDescriptor::default());
    }

    #[test]
    fn test_mmu_flag_words() {
        let mut desc = BlitDescriptor::new();
        desc.set_mmu(true, true);
        assert_eq!(desc.mmu.mmu_en, 1);
        assert_eq!(desc.mmu.flags.bits(), 0x8000_0521);

        let mut desc = BlitDescriptor::new();
        desc.set_mmu(true, false);
        assert_eq!(desc.mmu.flags.bits(), 0x8000_0121);

        let mut desc = BlitDescriptor::new();
        desc.set_mmu(false, true);
        assert_eq!(desc.mmu.flags.bits(), 0x8000_0421);

        let mut desc = BlitDescriptor::new();
        desc.set_mmu(false, false);
        assert_eq!(desc.mmu, MmuInfo::default());
    }

    #[test]
    fn test_fd_packing() {
        let mut desc = BlitDescriptor::new();
        desc.set_fds(Some(0x12), Some(0x34));
        assert_eq!(desc.fds.packed, 0x0034_0012);

        desc.set_fds(None, Some(9));
        assert_eq!(desc.fds.packed, 0x0009_0000);
        assert_eq!((desc.fds.src_offset, desc.fds.dst_offset), (0, 0));
    }

    #[test]
    fn test_bitblt_mode_loads_trig() {
        let mut desc = BlitDescriptor::new();
        desc.set_bitblt_mode(&BlitMode {
            scale_mode: SCALE_BICUBIC,
            rotate_mode: ROTATE_ROTATE,
            orientation: 90,
            dither: true,
        });
        assert_eq!((desc.sina, desc.cosa), (FIXED_ONE, 0));
        assert_eq!(desc.alpha_rop_flag, ALPHA_FLAG_DITHER);
        assert_eq!(desc.render_mode, RENDER_BITBLT);
        assert_eq!(desc.scale_mode, SCALE_BICUBIC);

        desc.set_alpha(&AlphaControl {
            flag: 0x19,
            mode: ALPHA_MODE_PER_PIXEL,
            global_alpha: 0,
            pd_mode: PD_MODE_SRC_OVER,
        });
        assert_eq!(desc.alpha_rop_flag, 0x39);
        assert_eq!(desc.pd_mode, PD_MODE_SRC_OVER);
    }

    #[test]
    fn test_virtual_and_active_info() {
        let geometry = SideGeometry {
            virtual_width: 1920,
            virtual_height: 1080,
            active_width: 1080,
            active_height: 1920,
            x_offset: 1919,
            y_offset: 0,
        };
        let address = SideAddress {
            yrgb: 5,
            uv: 0x1000,
            v: 0x2000,
            shared_fd: None,
            mmu: false,
        };
        let clip = Clip {
            xmin: 0,
            xmax: 1079,
            ymin: 0,
            ymax: 1919,
        };
        let mut desc = BlitDescriptor::new();
        desc.set_dst_virtual(&address, &geometry, 0x0A, clip);
        desc.set_dst_active(&geometry);
        assert_eq!(desc.dst, ImageInfo {
            yrgb_addr: 5,
            uv_addr: 0x1000,
            v_addr: 0x2000,
            format: 0x0A,
            act_w: 1080,
            act_h: 1920,
            x_offset: 1919,
            y_offset: 0,
            vir_w: 1920,
            vir_h: 1080,
            alpha_swap: 0,
        });
        assert_eq!(desc.clip, clip);
        assert_eq!(desc.src, ImageInfo::default());
    }
}
