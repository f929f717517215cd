//! Accelerator configuration types and builder

pub use crate::error::BuilderError;

use crate::command::{
    HAL_TRANSFORM_FLIP_H, HAL_TRANSFORM_FLIP_V, HAL_TRANSFORM_ROT_90, HAL_TRANSFORM_ROT_180,
    HAL_TRANSFORM_ROT_270,
};

/// Version units per whole version number (versions are kept in millionths)
const VERSION_SCALE: u32 = 1_000_000;

/// Accelerator driver version
///
/// Parsed from the string the driver reports and kept in millionths, so
/// `1.003` and `2.0` compare exactly.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AcceleratorVersion(u32);

impl AcceleratorVersion {
    /// Last version of the earliest generation (1.003)
    pub const LEGACY_MAX: Self = Self(1_003_000);
    /// First version of the current generation (2.0)
    pub const CURRENT_MIN: Self = Self(2 * VERSION_SCALE);

    /// Create a version from its whole part and millionths
    ///
    /// `from_parts(1, 3_000)` is version 1.003.
    pub fn from_parts(major: u32, micros: u32) -> Self {
        Self(
            major
                .saturating_mul(VERSION_SCALE)
                .saturating_add(micros.min(VERSION_SCALE - 1)),
        )
    }

    /// Parse a driver version string
    ///
    /// Reads the leading decimal number the way C `atof` does: leading
    /// whitespace is skipped and anything after the number (including a NUL
    /// terminator) is ignored. Digits past the sixth decimal place are
    /// dropped.
    ///
    /// # Errors
    ///
    /// Returns `BuilderError::InvalidVersion` if the string does not start
    /// with a digit, or the number does not fit.
    ///
    /// # Example
    ///
    /// ```
    /// use rga_blit::AcceleratorVersion;
    ///
    /// let version = AcceleratorVersion::parse(b"1.003\0").unwrap();
    /// assert_eq!(version, AcceleratorVersion::LEGACY_MAX);
    /// ```
    pub fn parse(text: &[u8]) -> Result<Self, BuilderError> {
        let mut bytes = text
            .iter()
            .copied()
            .skip_while(u8::is_ascii_whitespace)
            .peekable();
        if bytes.peek() == Some(&b'+') {
            bytes.next();
        }

        let mut major: u32 = 0;
        let mut digits = 0;
        while let Some(d) = bytes.peek().copied().filter(u8::is_ascii_digit) {
            major = major
                .checked_mul(10)
                .and_then(|m| m.checked_add(u32::from(d - b'0')))
                .ok_or(BuilderError::InvalidVersion)?;
            digits += 1;
            bytes.next();
        }

        let mut micros: u32 = 0;
        if bytes.peek() == Some(&b'.') {
            bytes.next();
            let mut unit = VERSION_SCALE / 10;
            while let Some(d) = bytes.peek().copied().filter(u8::is_ascii_digit) {
                micros += u32::from(d - b'0') * unit;
                unit /= 10;
                digits += 1;
                bytes.next();
            }
        }

        if digits == 0 {
            return Err(BuilderError::InvalidVersion);
        }
        major
            .checked_mul(VERSION_SCALE)
            .and_then(|m| m.checked_add(micros))
            .map(Self)
            .ok_or(BuilderError::InvalidVersion)
    }

    /// Whole part of the version
    pub fn major(self) -> u32 {
        self.0 / VERSION_SCALE
    }

    /// Fractional part in millionths
    pub fn micros(self) -> u32 {
        self.0 % VERSION_SCALE
    }
}

impl core::fmt::Display for AcceleratorVersion {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}.{:06}", self.major(), self.micros())
    }
}

/// Blit rotation relative to the source image
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Rotation {
    /// No rotation
    #[default]
    Identity,
    /// Mirror left to right
    FlipHorizontal,
    /// Mirror top to bottom
    FlipVertical,
    /// Rotate 90 degrees clockwise
    Rotate90,
    /// Rotate 180 degrees
    Rotate180,
    /// Rotate 270 degrees clockwise
    Rotate270,
}

impl Rotation {
    /// Map a platform transform code to a rotation
    ///
    /// Codes other than a single flip or rotation are treated as identity.
    pub fn from_hal_transform(transform: i32) -> Self {
        match transform {
            HAL_TRANSFORM_FLIP_H => Self::FlipHorizontal,
            HAL_TRANSFORM_FLIP_V => Self::FlipVertical,
            HAL_TRANSFORM_ROT_90 => Self::Rotate90,
            HAL_TRANSFORM_ROT_180 => Self::Rotate180,
            HAL_TRANSFORM_ROT_270 => Self::Rotate270,
            _ => Self::Identity,
        }
    }

    /// Whether the destination's width and height trade places
    pub fn swaps_axes(self) -> bool {
        matches!(self, Self::Rotate90 | Self::Rotate270)
    }
}

/// How the dither bit is decided
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DitherPolicy {
    /// Never dither
    ///
    /// Earlier releases compared the source format's bytes-per-pixel with
    /// itself, so the bit was always clear. Existing consumers of the
    /// descriptor keep seeing a clear bit.
    #[default]
    Legacy,
    /// Dither when source and destination bytes-per-pixel differ
    Corrected,
}

/// What to do with a shrink the bit-blit engine cannot perform
///
/// The engine shrinks by at most 2x on each axis.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ScaleLimit {
    /// Submit anyway, with the bit-blit mode fields left clear
    ///
    /// Earlier releases ignored the failed mode setup and still submitted
    /// the descriptor. Existing consumers keep seeing the same output.
    #[default]
    Submit,
    /// Fail the request with `Error::ScaleOutOfRange` before submission
    Reject,
}

/// Accelerator configuration
///
/// Use `Builder` to create a Config.
#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    /// Version to use instead of asking the driver
    pub version: Option<AcceleratorVersion>,
    /// Dither bit policy
    pub dither: DitherPolicy,
    /// Handling of shrinks beyond 2x
    pub scale_limit: ScaleLimit,
    /// Log every request's rectangles and descriptor at debug level
    pub log_requests: bool,
}

/// Builder for constructing accelerator configuration
///
/// # Example
///
/// ```
/// use rga_blit::{AcceleratorVersion, Builder, DitherPolicy};
///
/// let config = Builder::new()
///     .version(AcceleratorVersion::from_parts(2, 0))
///     .dither(DitherPolicy::Corrected)
///     .build();
/// assert_eq!(config.dither, DitherPolicy::Corrected);
/// ```
#[must_use]
#[derive(Default)]
pub struct Builder {
    version: Option<AcceleratorVersion>,
    dither: DitherPolicy,
    scale_limit: ScaleLimit,
    log_requests: bool,
}

impl Builder {
    /// Create a new Builder with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a fixed version instead of reading it from the driver
    pub fn version(mut self, version: AcceleratorVersion) -> Self {
        self.version = Some(version);
        self
    }

    /// Parse and use a fixed version string
    ///
    /// # Errors
    ///
    /// Returns `BuilderError::InvalidVersion` if the string is not a number.
    pub fn version_str(self, version: &str) -> Result<Self, BuilderError> {
        Ok(self.version(AcceleratorVersion::parse(version.as_bytes())?))
    }

    /// Set the dither bit policy
    pub fn dither(mut self, policy: DitherPolicy) -> Self {
        self.dither = policy;
        self
    }

    /// Set the handling of shrinks beyond 2x
    pub fn scale_limit(mut self, limit: ScaleLimit) -> Self {
        self.scale_limit = limit;
        self
    }

    /// Log every request at debug level
    pub fn log_requests(mut self, enabled: bool) -> Self {
        self.log_requests = enabled;
        self
    }

    /// Build the configuration
    pub fn build(self) -> Config {
        Config {
            version: self.version,
            dither: self.dither,
            scale_limit: self.scale_limit,
            log_requests: self.log_requests,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_driver_strings() {
        assert_eq!(
            AcceleratorVersion::parse(b"1.003").unwrap(),
            AcceleratorVersion::from_parts(1, 3_000)
        );
        assert_eq!(
            AcceleratorVersion::parse(b"2.00\0\0\0").unwrap(),
            AcceleratorVersion::CURRENT_MIN
        );
        assert_eq!(
            AcceleratorVersion::parse(b"  1.3 rk3288").unwrap(),
            AcceleratorVersion::from_parts(1, 300_000)
        );
        assert_eq!(
            AcceleratorVersion::parse(b"3").unwrap(),
            AcceleratorVersion::from_parts(3, 0)
        );
    }

    #[test]
    fn test_parse_keeps_small_fractions_ordered() {
        let v = AcceleratorVersion::parse(b"1.0031").unwrap();
        assert!(v > AcceleratorVersion::LEGACY_MAX);
        let v = AcceleratorVersion::parse(b"1.999999").unwrap();
        assert!(v < AcceleratorVersion::CURRENT_MIN);
    }

    #[test]
    fn test_parse_rejects_non_numbers() {
        assert_eq!(
            AcceleratorVersion::parse(b""),
            Err(BuilderError::InvalidVersion)
        );
        assert_eq!(
            AcceleratorVersion::parse(b"v2.0"),
            Err(BuilderError::InvalidVersion)
        );
        assert_eq!(
            AcceleratorVersion::parse(b"-1.0"),
            Err(BuilderError::InvalidVersion)
        );
        assert_eq!(
            AcceleratorVersion::parse(b"99999999.0"),
            Err(BuilderError::InvalidVersion)
        );
    }

    #[test]
    fn test_version_display() {
        let v = AcceleratorVersion::from_parts(1, 3_000);
        assert_eq!(alloc::format!("{v}"), "1.003000");
        assert_eq!(
            alloc::format!("{}", AcceleratorVersion::CURRENT_MIN),
            "2.000000"
        );
    }

    #[test]
    fn test_hal_transforms() {
        assert_eq!(Rotation::from_hal_transform(0), Rotation::Identity);
        assert_eq!(Rotation::from_hal_transform(0x01), Rotation::FlipHorizontal);
        assert_eq!(Rotation::from_hal_transform(0x02), Rotation::FlipVertical);
        assert_eq!(Rotation::from_hal_transform(0x03), Rotation::Rotate180);
        assert_eq!(Rotation::from_hal_transform(0x04), Rotation::Rotate90);
        assert_eq!(Rotation::from_hal_transform(0x07), Rotation::Rotate270);
        assert_eq!(Rotation::from_hal_transform(0x05), Rotation::Identity);
    }

    #[test]
    fn test_builder_defaults() {
        let config = Builder::new().build();
        assert_eq!(config.version, None);
        assert_eq!(config.dither, DitherPolicy::Legacy);
        assert_eq!(config.scale_limit, ScaleLimit::Submit);
        assert!(!config.log_requests);
    }

    #[test]
    fn test_builder_scale_limit() {
        let config = Builder::new().scale_limit(ScaleLimit::Reject).build();
        assert_eq!(config.scale_limit, ScaleLimit::Reject);
    }

    #[test]
    fn test_builder_version_str() {
        let config = Builder::new().version_str("1.2").unwrap().build();
        assert_eq!(config.version, Some(AcceleratorVersion::from_parts(1, 200_000)));
        assert!(Builder::new().version_str("abc").is_err());
    }
}
