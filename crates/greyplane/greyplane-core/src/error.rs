//! Surface and page generation errors

/// Errors returned by binding and page generation.
///
/// Pixel access itself never fails: an unbound surface reads 0 and ignores
/// writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// The host object is not a framebuffer.
    TypeMismatch,
    /// The host framebuffer could not lend its backing buffer.
    BufferUnavailable,
    /// A caller-supplied buffer is shorter than the configured width.
    BufferTooSmall {
        /// Minimum length in bytes
        required: usize,
        /// Length actually supplied
        actual: usize,
    },
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::TypeMismatch => write!(f, "Object is not a framebuffer"),
            Self::BufferUnavailable => write!(f, "Framebuffer backing buffer is not writable"),
            Self::BufferTooSmall { required, actual } => {
                write!(f, "Buffer too small: {actual} bytes, need at least {required}")
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        assert_eq!(Error::TypeMismatch.to_string(), "Object is not a framebuffer");
        assert_eq!(
            Error::BufferTooSmall { required: 72, actual: 10 }.to_string(),
            "Buffer too small: 10 bytes, need at least 72"
        );
    }
}
