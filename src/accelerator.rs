//! Blit compilation and submission

use core::sync::atomic::{AtomicBool, Ordering};

use log::{debug, error, warn};
use spin::Mutex;

use crate::address::{AddressingStrategy, BufferLocation};
use crate::blend;
use crate::config::{AcceleratorVersion, Config, Rotation, ScaleLimit};
use crate::descriptor::BlitDescriptor;
use crate::error::Error;
use crate::format::rga_format;
use crate::interface::{BufferAllocator, DeviceChannel, VERSION_BUF_LEN};
use crate::rect::{self, BufferRef, Rect, RectPair, Side};
use crate::rotation::{self, BlitMode};

/// Result of an accelerator operation
pub type BlitResult<T, A, D> = core::result::Result<
    T,
    Error<<A as BufferAllocator>::Error, <D as DeviceChannel>::Error>,
>;

/// One blit, as requested by the caller
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BlitRequest<H> {
    /// Buffer to read
    pub src: BufferRef<H>,
    /// Buffer to write
    pub dst: BufferRef<H>,
    /// Rectangles overriding the buffers' full extents
    pub rects: Option<RectPair>,
    /// Rotation applied to the source
    pub rotation: Rotation,
    /// Platform blend constant; plane alpha in bits 16-23
    pub blend: u32,
}

/// RGA blit service
///
/// Owns the platform collaborators and the driver version, which is read
/// once at construction. Compilation needs only a shared reference; the
/// device channel sits behind a lock so at most one blit is in flight.
///
/// The lock is a `spin::Mutex`. A thread that blits while another blit is
/// in flight busy-waits until the accelerator finishes, so concurrent
/// callers burn CPU for the length of a blit. Callers that need to park
/// instead should serialize requests before they reach the service.
pub struct Accelerator<A, D>
where
    A: BufferAllocator,
    D: DeviceChannel,
{
    /// Buffer handle lookups
    allocator: A,
    /// Device channel, locked for compile and submit
    channel: Mutex<D>,
    /// Service configuration
    config: Config,
    /// Driver version
    version: AcceleratorVersion,
    /// Addressing strategy of `version`
    strategy: AddressingStrategy,
    /// Log the next request in full
    log_once: AtomicBool,
}

impl<A, D> Accelerator<A, D>
where
    A: BufferAllocator,
    D: DeviceChannel,
{
    /// Create a new Accelerator
    ///
    /// Reads the driver version through `channel` unless `config` fixes it.
    ///
    /// # Errors
    ///
    /// - [`Error::Device`] if the version cannot be read
    /// - [`Error::InvalidVersion`] if the driver reports something that is
    ///   not a number
    pub fn new(allocator: A, mut channel: D, config: Config) -> BlitResult<Self, A, D> {
        let version = match config.version {
            Some(version) => version,
            None => {
                let mut buf = [0u8; VERSION_BUF_LEN];
                channel.read_version(&mut buf).map_err(Error::Device)?;
                AcceleratorVersion::parse(&buf).map_err(|_| {
                    error!("RGA reported an invalid version: {:?}", buf);
                    Error::InvalidVersion
                })?
            }
        };
        let strategy = AddressingStrategy::for_version(version);
        debug!("RGA version {}, {:?} addressing", version, strategy);

        Ok(Self {
            allocator,
            channel: Mutex::new(channel),
            config,
            version,
            strategy,
            log_once: AtomicBool::new(false),
        })
    }

    /// Driver version in use
    pub fn version(&self) -> AcceleratorVersion {
        self.version
    }

    /// Addressing strategy in use
    pub fn strategy(&self) -> AddressingStrategy {
        self.strategy
    }

    /// Service configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Log the next request's rectangles and descriptor at debug level
    pub fn set_log_once(&self, enabled: bool) {
        self.log_once.store(enabled, Ordering::Relaxed);
    }

    /// Full-buffer rectangles of two handles
    ///
    /// # Errors
    ///
    /// Fails like the rectangle stage of [`compile`](Self::compile).
    pub fn rects(&self, src: A::Handle, dst: A::Handle) -> BlitResult<RectPair, A, D> {
        rect::resolve(
            &self.allocator,
            BufferRef::Handle(src),
            BufferRef::Handle(dst),
            None,
        )
        .map(|resolved| resolved.pair())
    }

    /// Compile a request into a descriptor without submitting it
    ///
    /// # Errors
    ///
    /// - [`Error::Allocator`] if a handle lookup fails
    /// - [`Error::MissingRect`], [`Error::InvalidRect`],
    ///   [`Error::UnsupportedFormat`] for unusable rectangles
    /// - [`Error::NoAddress`], [`Error::ZeroFd`] for unreachable buffers
    /// - [`Error::ScaleOutOfRange`] for a shrink beyond 2x
    pub fn compile(&self, request: &BlitRequest<A::Handle>) -> BlitResult<BlitDescriptor, A, D> {
        let verbose = self.verbose();
        if verbose {
            if let Some(rects) = &request.rects {
                log_rects("Requested", rects);
            }
        }

        let resolved = rect::resolve(
            &self.allocator,
            request.src,
            request.dst,
            request.rects.as_ref(),
        )?;
        let rects = resolved.pair();
        if verbose {
            log_rects("Resolved", &rects);
        }

        let src_location =
            self.locate(request.src, resolved.src_type)?.validate(Side::Source)?;
        let dst_location = self
            .locate(request.dst, resolved.dst_type)?
            .validate(Side::Destination)?;

        let alpha = blend::encode(request.blend, rects.src.format);
        let geometry = rotation::map(&rects, request.rotation);
        let mode = match BlitMode::new(&geometry, rotation::dither(&rects, self.config.dither)) {
            Ok(mode) => Some(mode),
            Err(e) if self.config.scale_limit == ScaleLimit::Reject => return Err(e),
            Err(e) => {
                warn!("RGA blit mode skipped: {}", e);
                None
            }
        };

        let src_address = self.strategy.address(
            Side::Source,
            &src_location,
            geometry.src.virtual_width,
            geometry.src.virtual_height,
        )?;
        let dst_address = self.strategy.address(
            Side::Destination,
            &dst_location,
            geometry.dst.virtual_width,
            geometry.dst.virtual_height,
        )?;

        let mut desc = BlitDescriptor::new();
        desc.set_src_virtual(&src_address, &geometry.src, rga_format(rects.src.format));
        desc.set_dst_virtual(
            &dst_address,
            &geometry.dst,
            rga_format(rects.dst.format),
            geometry.clip,
        );
        if src_address.shared_fd.is_some() || dst_address.shared_fd.is_some() {
            desc.set_fds(src_address.shared_fd, dst_address.shared_fd);
        }
        desc.set_src_active(&geometry.src);
        desc.set_dst_active(&geometry.dst);
        match mode {
            Some(mode) => desc.set_bitblt_mode(&mode),
            None => desc.set_render_bitblt(),
        }
        desc.set_alpha(&alpha);
        desc.set_mmu(src_address.mmu, dst_address.mmu);

        if verbose {
            desc.log_dump();
        }
        Ok(desc)
    }

    /// Compile and submit a request
    ///
    /// Holds the device lock from compilation until the accelerator
    /// finishes. The log-once flag is cleared afterwards, whatever the
    /// outcome.
    ///
    /// # Errors
    ///
    /// Returns any [`compile`](Self::compile) error, or [`Error::Device`] if
    /// the driver rejects the descriptor.
    pub fn submit(&self, request: &BlitRequest<A::Handle>) -> BlitResult<(), A, D> {
        let mut channel = self.channel.lock();
        let result = self.compile(request).and_then(|desc| {
            channel.submit(&desc).map_err(|e| {
                error!("RGA blit failed: {:?}", e);
                Error::Device(e)
            })
        });
        drop(channel);

        if let Err(e) = &result {
            if !matches!(e, Error::Device(_)) {
                error!("RGA blit rejected: {}", e);
            }
        }
        self.log_once.store(false, Ordering::Relaxed);
        result
    }

    /// Blit between any combination of handles and raw buffers
    ///
    /// A raw side must come with an explicit rectangle in `rects`.
    ///
    /// # Errors
    ///
    /// See [`submit`](Self::submit).
    pub fn blit(
        &self,
        src: BufferRef<A::Handle>,
        dst: BufferRef<A::Handle>,
        rects: Option<&RectPair>,
        rotation: Rotation,
        blend: u32,
    ) -> BlitResult<(), A, D> {
        self.submit(&BlitRequest {
            src,
            dst,
            rects: rects.copied(),
            rotation,
            blend,
        })
    }

    /// [`blit`](Self::blit) reporting 0 or a negative errno
    pub fn blit_status(
        &self,
        src: BufferRef<A::Handle>,
        dst: BufferRef<A::Handle>,
        rects: Option<&RectPair>,
        rotation: Rotation,
        blend: u32,
    ) -> i32 {
        match self.blit(src, dst, rects, rotation, blend) {
            Ok(()) => 0,
            Err(e) => e.status(),
        }
    }

    /// Release the collaborators
    pub fn into_parts(self) -> (A, D, Config) {
        (self.allocator, self.channel.into_inner(), self.config)
    }

    fn verbose(&self) -> bool {
        self.config.log_requests || self.log_once.load(Ordering::Relaxed)
    }

    fn locate(
        &self,
        buffer: BufferRef<A::Handle>,
        type_tag: i32,
    ) -> BlitResult<BufferLocation, A, D> {
        match buffer {
            BufferRef::Handle(handle) => {
                let address = self.allocator.map_address(handle).map_err(Error::Allocator)?;
                let fd = self.allocator.fd(handle).map_err(Error::Allocator)?;
                Ok(BufferLocation {
                    fd,
                    address,
                    type_tag,
                })
            }
            BufferRef::Raw(address) => Ok(BufferLocation {
                fd: None,
                address: Some(address),
                type_tag,
            }),
        }
    }
}

fn log_rects(label: &str, rects: &RectPair) {
    let fmt = |r: &Rect| {
        (
            r.xoffset, r.yoffset, r.width, r.height, r.stride, r.format, r.size,
        )
    };
    debug!(
        "{} Src:{:?} => Dst:{:?}",
        label,
        fmt(&rects.src),
        fmt(&rects.dst)
    );
}
