//! Platform collaborator traits
//!
//! The compiler never talks to the kernel or the buffer allocator itself.
//! The platform provides two implementations:
//!
//! - [`BufferAllocator`]: resolves opaque buffer handles to their
//!   attributes, file descriptor, and mapped address
//! - [`DeviceChannel`]: reports the driver version and submits finished
//!   descriptors, blocking until the accelerator completes
//!
//! ## Example
//!
//! ```
//! use core::convert::Infallible;
//! use rga_blit::{BlitDescriptor, BufferAllocator, BufferAttributes, DeviceChannel};
//!
//! struct Gralloc;
//!
//! impl BufferAllocator for Gralloc {
//!     type Handle = u32;
//!     type Error = i32;
//!
//!     fn attributes(&self, _handle: u32) -> Result<BufferAttributes, i32> {
//!         Ok(BufferAttributes {
//!             width: 1280,
//!             height: 720,
//!             stride: 1280,
//!             format: 0x01,
//!             size: 1280 * 720 * 4,
//!             type_tag: 0,
//!         })
//!     }
//!
//!     fn fd(&self, handle: u32) -> Result<Option<i32>, i32> {
//!         Ok(Some(handle as i32 + 3))
//!     }
//!
//!     fn map_address(&self, _handle: u32) -> Result<Option<usize>, i32> {
//!         Ok(None)
//!     }
//! }
//!
//! struct RgaDevice;
//!
//! impl DeviceChannel for RgaDevice {
//!     type Error = Infallible;
//!
//!     fn read_version(&mut self, buf: &mut [u8]) -> Result<(), Infallible> {
//!         buf[..4].copy_from_slice(b"2.00");
//!         Ok(())
//!     }
//!
//!     fn submit(&mut self, _descriptor: &BlitDescriptor) -> Result<(), Infallible> {
//!         Ok(())
//!     }
//! }
//! ```

use core::fmt::Debug;

use crate::descriptor::BlitDescriptor;
use crate::error::ErrorStatus;
use crate::rect::Rect;

/// Size of the buffer handed to [`DeviceChannel::read_version`]
pub const VERSION_BUF_LEN: usize = 16;

/// Intrinsic attributes of an allocated buffer
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BufferAttributes {
    /// Width in pixels
    pub width: i32,
    /// Height in pixels
    pub height: i32,
    /// Row stride in pixels
    pub stride: i32,
    /// HAL pixel format id
    pub format: i32,
    /// Allocation size in bytes
    pub size: i32,
    /// Allocation type; non-zero buffers need MMU translation
    pub type_tag: i32,
}

impl BufferAttributes {
    /// Rectangle covering the whole buffer
    pub fn rect(&self) -> Rect {
        Rect {
            xoffset: 0,
            yoffset: 0,
            width: self.width,
            height: self.height,
            stride: self.stride,
            format: self.format,
            size: self.size,
        }
    }
}

/// Trait for the platform buffer allocator
///
/// Handles are opaque to the compiler; only the allocator knows how to
/// turn them into geometry and memory.
pub trait BufferAllocator {
    /// Opaque buffer handle
    type Handle: Copy + Debug;

    /// Error type for lookups
    ///
    /// Must report an errno-style status so failures propagate to
    /// integer-status callers.
    type Error: Debug + ErrorStatus;

    /// Look up a buffer's intrinsic attributes
    ///
    /// # Errors
    ///
    /// Returns an error if the handle is unknown or unsupported.
    fn attributes(&self, handle: Self::Handle) -> Result<BufferAttributes, Self::Error>;

    /// Look up the buffer's shareable file descriptor
    ///
    /// `Ok(None)` (or a negative descriptor) means the buffer has none.
    ///
    /// # Errors
    ///
    /// Returns an error if the lookup itself fails.
    fn fd(&self, handle: Self::Handle) -> Result<Option<i32>, Self::Error>;

    /// Look up the buffer's CPU-mapped address
    ///
    /// `Ok(None)` (or a zero address) means the buffer is not mapped.
    ///
    /// # Errors
    ///
    /// Returns an error if the lookup itself fails.
    fn map_address(&self, handle: Self::Handle) -> Result<Option<usize>, Self::Error>;
}

/// Trait for the accelerator device channel
///
/// Implementations usually wrap the opened device node and issue one
/// ioctl per call.
pub trait DeviceChannel {
    /// Error type for device calls
    type Error: Debug + ErrorStatus;

    /// Read the driver's version string
    ///
    /// `buf` is [`VERSION_BUF_LEN`] zeroed bytes; the implementation writes
    /// the version text (e.g. `"1.003"`), optionally NUL terminated.
    ///
    /// # Errors
    ///
    /// Returns an error if the driver cannot be queried.
    fn read_version(&mut self, buf: &mut [u8]) -> Result<(), Self::Error>;

    /// Submit a descriptor and wait for the accelerator to finish
    ///
    /// # Errors
    ///
    /// Returns an error if the driver rejects the descriptor or the
    /// accelerator reports a failure.
    fn submit(&mut self, descriptor: &BlitDescriptor) -> Result<(), Self::Error>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attributes_rect_covers_buffer() {
        let attrs = BufferAttributes {
            width: 1920,
            height: 1080,
            stride: 2048,
            format: 0x20,
            size: 2048 * 1080 * 3 / 2,
            type_tag: 1,
        };
        let rect = attrs.rect();
        assert_eq!((rect.xoffset, rect.yoffset), (0, 0));
        assert_eq!((rect.width, rect.height, rect.stride), (1920, 1080, 2048));
        assert_eq!(rect.format, 0x20);
        assert_eq!(rect.size, attrs.size);
    }
}
