//! Limits applied while decoding untrusted input.

use crate::Error;

/// Bounds on the lengths a decoder will accept.
///
/// Every length prefix read off the wire is checked against these limits before any memory is
/// allocated for it. The default accepts everything the wire format can express.
///
/// # Examples
///
/// ```
/// use kwire_codec::Limits;
///
/// let limits = Limits::default().with_max_array_len(1024).with_max_bytes_len(1 << 20);
/// assert_eq!(limits.max_array_len, 1024);
/// assert_eq!(limits.max_tagged_fields, Limits::DEFAULT.max_tagged_fields);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Limits {
    /// Maximum number of elements in an array.
    pub max_array_len: usize,

    /// Maximum length of a string, byte buffer, or tagged field payload.
    pub max_bytes_len: usize,

    /// Maximum number of entries in a tagged field section.
    pub max_tagged_fields: usize,
}

impl Limits {
    /// Accepts any length representable on the wire.
    pub const DEFAULT: Self = Self {
        max_array_len: u32::MAX as usize,
        max_bytes_len: u32::MAX as usize,
        max_tagged_fields: u32::MAX as usize,
    };

    /// Sets the maximum array length.
    pub const fn with_max_array_len(mut self, max: usize) -> Self {
        self.max_array_len = max;
        self
    }

    /// Sets the maximum string/bytes length.
    pub const fn with_max_bytes_len(mut self, max: usize) -> Self {
        self.max_bytes_len = max;
        self
    }

    /// Sets the maximum number of tagged fields per section.
    pub const fn with_max_tagged_fields(mut self, max: usize) -> Self {
        self.max_tagged_fields = max;
        self
    }

    pub(crate) fn check_array_len(&self, len: usize) -> Result<(), Error> {
        check(len, self.max_array_len)
    }

    pub(crate) fn check_bytes_len(&self, len: usize) -> Result<(), Error> {
        check(len, self.max_bytes_len)
    }

    pub(crate) fn check_tagged_fields(&self, count: usize) -> Result<(), Error> {
        check(count, self.max_tagged_fields)
    }
}

impl Default for Limits {
    fn default() -> Self {
        Self::DEFAULT
    }
}

fn check(len: usize, max: usize) -> Result<(), Error> {
    if len > max {
        return Err(Error::LengthExceeded(len, max));
    }
    Ok(())
}
