//! Buffer addressing strategies
//!
//! How a buffer is handed to the accelerator depends on the driver
//! generation. Older drivers only understand CPU virtual addresses, newer
//! ones accept shareable file descriptors. The strategy is chosen once from
//! the driver version and then applied to each side of every blit.
//!
//! | Strategy     | Version           | Encoding                                         | MMU                 |
//! |--------------|-------------------|--------------------------------------------------|---------------------|
//! | Legacy       | `<= 1.003`        | `(addr, addr + area, addr + area * 5/4)`         | always              |
//! | Transitional | `1.003 < v < 2.0` | fd through the fd block, else the legacy triplet | type tag, or always |
//! | Current      | `>= 2.0`          | `(fd or 0, addr, addr + area)`                   | no fd, or type tag  |
//!
//! `area` is the side's virtual width times virtual height.

use crate::config::AcceleratorVersion;
use crate::error::Error;
use crate::rect::Side;

/// Addressing strategy of a driver generation
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AddressingStrategy {
    /// Virtual address triplets only
    Legacy,
    /// File descriptors through the fd block, virtual triplets otherwise
    Transitional,
    /// File descriptor in the luma slot, addresses in the chroma slots
    Current,
}

impl AddressingStrategy {
    /// Strategy for a driver version
    pub fn for_version(version: AcceleratorVersion) -> Self {
        if version <= AcceleratorVersion::LEGACY_MAX {
            Self::Legacy
        } else if version < AcceleratorVersion::CURRENT_MIN {
            Self::Transitional
        } else {
            Self::Current
        }
    }

    /// Address one side of a blit
    ///
    /// `location` must have been through [`BufferLocation::validate`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoAddress`] if the strategy needs a virtual address
    /// and the buffer only has a file descriptor.
    pub fn address<AE, DE>(
        self,
        side: Side,
        location: &BufferLocation,
        virtual_width: u32,
        virtual_height: u32,
    ) -> Result<SideAddress, Error<AE, DE>> {
        let area = (virtual_width as usize).wrapping_mul(virtual_height as usize);
        let needs_mmu = location.needs_mmu();

        match (self, location.fd) {
            (Self::Transitional, Some(fd)) => Ok(SideAddress {
                shared_fd: Some(fd),
                mmu: needs_mmu,
                ..SideAddress::default()
            }),
            (Self::Legacy | Self::Transitional, _) => {
                let base = location.address.ok_or(Error::NoAddress { side })?;
                Ok(SideAddress {
                    yrgb: base,
                    uv: base.wrapping_add(area),
                    v: base.wrapping_add(area).wrapping_add(area / 4),
                    shared_fd: None,
                    mmu: true,
                })
            }
            (Self::Current, fd) => {
                let base = location.address.unwrap_or(0);
                Ok(SideAddress {
                    yrgb: fd.map_or(0, |fd| fd as usize),
                    uv: base,
                    v: base.wrapping_add(area),
                    shared_fd: None,
                    mmu: fd.is_none() || needs_mmu,
                })
            }
        }
    }
}

/// Where a buffer lives, as reported by the allocator or the caller
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BufferLocation {
    /// Shareable file descriptor
    pub fd: Option<i32>,
    /// CPU virtual address
    pub address: Option<usize>,
    /// Allocation type; non-zero buffers need MMU translation
    pub type_tag: i32,
}

impl BufferLocation {
    /// Whether the accelerator must translate this buffer through its MMU
    pub fn needs_mmu(&self) -> bool {
        self.type_tag != 0
    }

    /// Check that the buffer can be addressed at all
    ///
    /// Negative descriptors and null addresses count as absent. Descriptor
    /// zero cannot be passed to the driver: it is dropped in favour of the
    /// virtual address when there is one.
    ///
    /// # Errors
    ///
    /// - [`Error::NoAddress`] if there is neither a descriptor nor an address
    /// - [`Error::ZeroFd`] if the only way to reach the buffer is descriptor 0
    pub fn validate<AE, DE>(self, side: Side) -> Result<Self, Error<AE, DE>> {
        let fd = self.fd.filter(|fd| *fd >= 0);
        let address = self.address.filter(|addr| *addr != 0);
        let fd = match (fd, address) {
            (None, None) => return Err(Error::NoAddress { side }),
            (Some(0), None) => return Err(Error::ZeroFd { side }),
            (Some(0), Some(_)) => None,
            (fd, _) => fd,
        };
        Ok(Self {
            fd,
            address,
            type_tag: self.type_tag,
        })
    }
}

/// Addressing fields of one side of a descriptor
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SideAddress {
    /// Luma (or packed RGB) slot
    pub yrgb: usize,
    /// Chroma slot
    pub uv: usize,
    /// Second chroma slot
    pub v: usize,
    /// Descriptor handed over through the fd block
    pub shared_fd: Option<i32>,
    /// Whether the accelerator MMU translates this side
    pub mmu: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::convert::Infallible;

    type TestResult<T> = Result<T, Error<Infallible, Infallible>>;

    fn location(fd: Option<i32>, address: Option<usize>, type_tag: i32) -> BufferLocation {
        BufferLocation {
            fd,
            address,
            type_tag,
        }
    }

    fn address(
        strategy: AddressingStrategy,
        loc: BufferLocation,
        w: u32,
        h: u32,
    ) -> TestResult<SideAddress> {
        strategy.address(Side::Source, &loc, w, h)
    }

    #[test]
    fn test_strategy_boundaries() {
        let v = |text: &[u8]| AcceleratorVersion::parse(text).unwrap();
        assert_eq!(
            AddressingStrategy::for_version(v(b"1.0")),
            AddressingStrategy::Legacy
        );
        assert_eq!(
            AddressingStrategy::for_version(v(b"1.003")),
            AddressingStrategy::Legacy
        );
        assert_eq!(
            AddressingStrategy::for_version(v(b"1.0031")),
            AddressingStrategy::Transitional
        );
        assert_eq!(
            AddressingStrategy::for_version(v(b"1.999")),
            AddressingStrategy::Transitional
        );
        assert_eq!(
            AddressingStrategy::for_version(v(b"2.00")),
            AddressingStrategy::Current
        );
        assert_eq!(
            AddressingStrategy::for_version(v(b"3.02")),
            AddressingStrategy::Current
        );
    }

    #[test]
    fn test_legacy_triplet() {
        let loc = location(None, Some(0x1000_0000), 0);
        let a = address(AddressingStrategy::Legacy, loc, 1920, 1080).unwrap();
        assert_eq!(a, SideAddress {
            yrgb: 0x1000_0000,
            uv: 0x1000_0000 + 2_073_600,
            v: 0x1000_0000 + 2_592_000,
            shared_fd: None,
            mmu: true,
        });
    }

    #[test]
    fn test_legacy_ignores_fd_but_needs_address() {
        let a = address(
            AddressingStrategy::Legacy,
            location(Some(9), Some(0x4000), 1),
            16,
            16,
        )
        .unwrap();
        assert_eq!((a.yrgb, a.uv, a.v), (0x4000, 0x4100, 0x4140));
        assert!(a.mmu);

        let result = address(AddressingStrategy::Legacy, location(Some(9), None, 0), 16, 16);
        assert!(matches!(
            result,
            Err(Error::NoAddress { side: Side::Source })
        ));
    }

    #[test]
    fn test_transitional_prefers_fd() {
        let a = address(
            AddressingStrategy::Transitional,
            location(Some(7), Some(0x4000), 0),
            64,
            64,
        )
        .unwrap();
        assert_eq!(a, SideAddress {
            shared_fd: Some(7),
            ..SideAddress::default()
        });

        let a = address(
            AddressingStrategy::Transitional,
            location(Some(7), None, 3),
            64,
            64,
        )
        .unwrap();
        assert!(a.mmu);
    }

    #[test]
    fn test_transitional_falls_back_to_triplet() {
        let a = address(
            AddressingStrategy::Transitional,
            location(None, Some(0x8000), 0),
            10,
            10,
        )
        .unwrap();
        assert_eq!((a.yrgb, a.uv, a.v), (0x8000, 0x8064, 0x807D));
        assert_eq!(a.shared_fd, None);
        assert!(a.mmu);
    }

    #[test]
    fn test_current_layout() {
        let a = address(
            AddressingStrategy::Current,
            location(Some(12), Some(0x1_0000), 0),
            100,
            50,
        )
        .unwrap();
        assert_eq!(a, SideAddress {
            yrgb: 12,
            uv: 0x1_0000,
            v: 0x1_0000 + 5000,
            shared_fd: None,
            mmu: false,
        });

        let a = address(
            AddressingStrategy::Current,
            location(Some(12), None, 1),
            100,
            50,
        )
        .unwrap();
        assert_eq!((a.yrgb, a.uv, a.v, a.mmu), (12, 0, 5000, true));

        let a = address(
            AddressingStrategy::Current,
            location(None, Some(0x2000), 0),
            4,
            4,
        )
        .unwrap();
        assert_eq!((a.yrgb, a.uv, a.v, a.mmu), (0, 0x2000, 0x2010, true));
    }

    #[test]
    fn test_validate_rejects_unreachable_buffers() {
        let r: TestResult<_> = location(None, None, 0).validate(Side::Destination);
        assert!(matches!(
            r,
            Err(Error::NoAddress {
                side: Side::Destination
            })
        ));

        let r: TestResult<_> = location(Some(-1), Some(0), 0).validate(Side::Source);
        assert!(matches!(r, Err(Error::NoAddress { .. })));

        let r: TestResult<_> = location(Some(0), None, 0).validate(Side::Source);
        assert!(matches!(r, Err(Error::ZeroFd { side: Side::Source })));
    }

    #[test]
    fn test_mmu_follows_type_tag() {
        assert!(location(Some(3), None, 4).needs_mmu());
        assert!(!location(Some(3), None, 0).needs_mmu());

        let a = address(AddressingStrategy::Current, location(Some(3), None, 4), 16, 16).unwrap();
        assert!(a.mmu);
        let a = address(AddressingStrategy::Current, location(Some(3), None, 0), 16, 16).unwrap();
        assert!(!a.mmu);
    }

    #[test]
    fn test_huge_virtual_area_wraps() {
        let area = (u32::MAX as usize).wrapping_mul(u32::MAX as usize);
        let a = address(
            AddressingStrategy::Legacy,
            location(None, Some(0x1000), 1),
            u32::MAX,
            u32::MAX,
        )
        .unwrap();
        assert_eq!(a.uv, 0x1000_usize.wrapping_add(area));

        let a = address(
            AddressingStrategy::Current,
            location(Some(3), None, 0),
            u32::MAX,
            u32::MAX,
        )
        .unwrap();
        assert_eq!(a.v, area);
    }

    #[test]
    fn test_validate_normalizes() {
        let r: TestResult<_> = location(Some(0), Some(0x1000), 2).validate(Side::Source);
        assert_eq!(r.unwrap(), location(None, Some(0x1000), 2));

        let r: TestResult<_> = location(Some(-1), Some(0x1000), 0).validate(Side::Source);
        assert_eq!(r.unwrap(), location(None, Some(0x1000), 0));

        let r: TestResult<_> = location(Some(5), None, 0).validate(Side::Source);
        assert_eq!(r.unwrap(), location(Some(5), None, 0));
    }
}
