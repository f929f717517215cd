//! Rockchip RGA Blit Compiler
//!
//! Compiles 2D blit requests into command descriptors for the Rockchip RGA
//! 2D accelerator.
//!
//! ## Features
//!
//! - `no_std` compatible
//! - Source/destination from allocator handles or raw addresses
//! - Copy, scale, mirror, and quarter-turn rotation
//! - Premultiplied and coverage source-over blending
//! - Addressing for every driver generation (virtual, fd hand-over, fd-first)
//! - One submission in flight at a time
//!
//! ## Usage
//!
//! ```rust
//! use core::convert::Infallible;
//! use rga_blit::{
//!     Accelerator, BlitDescriptor, BufferAllocator, BufferAttributes, BufferRef, Builder,
//!     DeviceChannel, Rotation,
//! };
//!
//! # struct Gralloc;
//! # impl BufferAllocator for Gralloc {
//! #     type Handle = u32;
//! #     type Error = i32;
//! #     fn attributes(&self, _handle: u32) -> Result<BufferAttributes, i32> {
//! #         Ok(BufferAttributes {
//! #             width: 1920,
//! #             height: 1080,
//! #             stride: 1920,
//! #             format: 0x01,
//! #             size: 1920 * 1080 * 4,
//! #             type_tag: 0,
//! #         })
//! #     }
//! #     fn fd(&self, handle: u32) -> Result<Option<i32>, i32> { Ok(Some(handle as i32 + 3)) }
//! #     fn map_address(&self, _handle: u32) -> Result<Option<usize>, i32> { Ok(None) }
//! # }
//! # struct RgaDevice;
//! # impl DeviceChannel for RgaDevice {
//! #     type Error = Infallible;
//! #     fn read_version(&mut self, buf: &mut [u8]) -> Result<(), Infallible> {
//! #         buf[..4].copy_from_slice(b"2.00");
//! #         Ok(())
//! #     }
//! #     fn submit(&mut self, _descriptor: &BlitDescriptor) -> Result<(), Infallible> { Ok(()) }
//! # }
//! let rga = match Accelerator::new(Gralloc, RgaDevice, Builder::new().build()) {
//!     Ok(rga) => rga,
//!     Err(_) => return,
//! };
//!
//! // Rotate buffer 1 into buffer 2, no blending
//! let status = rga.blit_status(
//!     BufferRef::Handle(1),
//!     BufferRef::Handle(2),
//!     None,
//!     Rotation::Rotate180,
//!     0,
//! );
//! assert_eq!(status, 0);
//! ```

#![no_std]

#[cfg(test)]
extern crate alloc;

/// Blit compilation and submission
pub mod accelerator;
/// Buffer addressing strategies
pub mod address;
/// Blend mode encoding
pub mod blend;
/// RGA register values
pub mod command;
/// Accelerator configuration types and builder
pub mod config;
/// Accelerator command descriptor
pub mod descriptor;
/// Error types for the blit compiler
pub mod error;
/// Pixel format translation
pub mod format;
/// Platform collaborator traits
pub mod interface;
/// Fixed-point trigonometry tables
pub mod lut;
/// Surface rectangles and rectangle resolution
pub mod rect;
/// Rotation and geometry mapping
pub mod rotation;

pub use accelerator::{Accelerator, BlitRequest, BlitResult};
pub use address::{AddressingStrategy, BufferLocation};
pub use config::{AcceleratorVersion, Builder, Config, DitherPolicy, Rotation, ScaleLimit};
pub use descriptor::{BlitDescriptor, MmuFlags};
pub use error::{BuilderError, Error, ErrorStatus};
pub use format::HalFormat;
pub use interface::{BufferAllocator, BufferAttributes, DeviceChannel, VERSION_BUF_LEN};
pub use rect::{BufferRef, Rect, RectPair, Side};
