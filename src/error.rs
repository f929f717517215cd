//! Error types for the blit compiler
//!
//! This module defines error types for configuration building
//! ([`BuilderError`]) and blit requests ([`Error`]).
//!
//! ## Error Types
//!
//! - [`BuilderError`] - Errors during configuration construction
//! - [`Error`] - Per-request errors: bad arguments, resolution failures,
//!   device failures
//! - [`ErrorStatus`] - errno-style status reported by collaborator errors
//!
//! Every [`Error`] maps to a negative errno through [`Error::status`], which
//! is what integer-status callers receive.
//!
//! ## Example
//!
//! ```
//! use rga_blit::{AcceleratorVersion, BuilderError};
//!
//! let result = AcceleratorVersion::parse(b"unknown");
//! assert!(matches!(result, Err(BuilderError::InvalidVersion)));
//! ```

use core::convert::Infallible;
use core::fmt::Debug;

use crate::rect::{Rect, Side};

/// I/O error
pub const EIO: i32 = 5;
/// No such device
pub const ENODEV: i32 = 19;
/// Invalid argument
pub const EINVAL: i32 = 22;

/// errno-style status of a collaborator error
///
/// Implemented by the error types of [`BufferAllocator`](crate::BufferAllocator)
/// and [`DeviceChannel`](crate::DeviceChannel) so their failures can be
/// propagated as integer status codes.
pub trait ErrorStatus {
    /// Negative errno describing the failure
    fn status(&self) -> i32;
}

/// Raw errno values, in either sign convention
///
/// Zero is not a failure code and maps to `-EIO`.
impl ErrorStatus for i32 {
    fn status(&self) -> i32 {
        match *self {
            0 => -EIO,
            code if code > 0 => -code,
            code => code,
        }
    }
}

impl ErrorStatus for Infallible {
    fn status(&self) -> i32 {
        match *self {}
    }
}

/// Errors that can occur while compiling or submitting a blit
///
/// Generic over the allocator error (`AE`) and the device channel error
/// (`DE`) so callers can match on the underlying collaborator failure.
#[derive(Debug)]
pub enum Error<AE, DE> {
    /// Buffer attribute, fd, or address lookup failed
    ///
    /// Wraps the error of the [`BufferAllocator`](crate::BufferAllocator)
    /// implementation.
    Allocator(AE),
    /// Reading the version or submitting the descriptor failed
    ///
    /// Wraps the error of the [`DeviceChannel`](crate::DeviceChannel)
    /// implementation.
    Device(DE),
    /// The device reported a version string that is not a number
    InvalidVersion,
    /// A raw buffer side has no explicit rectangle with a positive stride
    MissingRect {
        /// Side without a usable rectangle
        side: Side,
    },
    /// A rectangle has a non-positive size or stride, or a negative offset
    InvalidRect {
        /// Offending side
        side: Side,
        /// The rejected rectangle
        rect: Rect,
    },
    /// The pixel format has no accelerator equivalent
    UnsupportedFormat {
        /// Offending side
        side: Side,
        /// Raw HAL format id
        format: i32,
    },
    /// The buffer resolved to neither a file descriptor nor an address
    NoAddress {
        /// Offending side
        side: Side,
    },
    /// The buffer resolved to file descriptor zero and no address
    ///
    /// The driver cannot tell descriptor zero from "no descriptor".
    ZeroFd {
        /// Offending side
        side: Side,
    },
    /// The destination is less than half the source on some axis
    ///
    /// The bit-blit engine shrinks by at most 2x per axis. Only returned
    /// under `ScaleLimit::Reject`.
    ScaleOutOfRange {
        /// Source active width
        src_width: u32,
        /// Source active height
        src_height: u32,
        /// Destination active width
        dst_width: u32,
        /// Destination active height
        dst_height: u32,
    },
}

impl<AE: ErrorStatus, DE: ErrorStatus> Error<AE, DE> {
    /// Negative errno for this error
    ///
    /// Collaborator errors keep their own status; everything else is
    /// `-EINVAL`.
    pub fn status(&self) -> i32 {
        match self {
            Self::Allocator(e) => e.status(),
            Self::Device(e) => e.status(),
            Self::InvalidVersion => -ENODEV,
            Self::MissingRect { .. }
            | Self::InvalidRect { .. }
            | Self::UnsupportedFormat { .. }
            | Self::NoAddress { .. }
            | Self::ZeroFd { .. }
            | Self::ScaleOutOfRange { .. } => -EINVAL,
        }
    }
}

impl<AE, DE> core::fmt::Display for Error<AE, DE> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Allocator(_) => write!(f, "Buffer allocator error"),
            Self::Device(_) => write!(f, "RGA device error"),
            Self::InvalidVersion => write!(f, "Invalid RGA version string"),
            Self::MissingRect { side } => write!(f, "{side} has no rectangle for render"),
            Self::InvalidRect { side, rect } => write!(
                f,
                "{side} rectangle is invalid: [{},{},{},{}] stride {}",
                rect.xoffset, rect.yoffset, rect.width, rect.height, rect.stride
            ),
            Self::UnsupportedFormat { side, format } => {
                write!(f, "{side} format {format:#x} is not supported")
            }
            Self::NoAddress { side } => write!(f, "{side} has no fd and no address"),
            Self::ZeroFd { side } => write!(f, "{side} fd is zero, driver does not support it"),
            Self::ScaleOutOfRange {
                src_width,
                src_height,
                dst_width,
                dst_height,
            } => write!(
                f,
                "Cannot shrink {src_width}x{src_height} to {dst_width}x{dst_height} (max 2x per axis)"
            ),
        }
    }
}

impl<AE: Debug, DE: Debug> core::error::Error for Error<AE, DE> {}

/// Errors that can occur when building configuration
#[derive(Debug, PartialEq)]
pub enum BuilderError {
    /// A version string does not start with a decimal number
    ///
    /// See [`AcceleratorVersion::parse()`](crate::config::AcceleratorVersion::parse).
    InvalidVersion,
}

impl core::fmt::Display for BuilderError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::InvalidVersion => write!(f, "Version must be a decimal number like \"2.00\""),
        }
    }
}

impl core::error::Error for BuilderError {}
