//! Top-level error and its mapping to process exit codes.

use crate::cli::CliError;
use crate::codec::CodecError;
use crate::raster::{CropError, ImageError};
use crate::ssd::SsdError;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Cli(#[from] CliError),

    #[error(transparent)]
    Codec(#[from] CodecError),

    #[error(transparent)]
    Crop(#[from] CropError),

    #[error(transparent)]
    Image(#[from] ImageError),

    #[error(transparent)]
    Ssd(#[from] SsdError),
}

/// What went wrong, independent of which stage noticed it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    InvalidArgument,
    MissingArgument,
    InvalidInputFile,
    NotAPng,
    Codec,
    InvalidRegion,
    UnsupportedFormat,
    OutOfMemory,
    Io,
    InvalidBuffer,
}

impl ErrorKind {
    /// Process exit status. Zero is reserved for success.
    pub const fn exit_code(self) -> u8 {
        match self {
            Self::InvalidArgument => 2,
            Self::MissingArgument => 3,
            Self::InvalidInputFile => 4,
            Self::NotAPng => 5,
            Self::Codec => 6,
            Self::InvalidRegion => 7,
            Self::UnsupportedFormat => 8,
            Self::OutOfMemory => 9,
            Self::Io => 10,
            Self::InvalidBuffer => 11,
        }
    }
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Cli(CliError::InvalidArgument(_)) => ErrorKind::InvalidArgument,
            Self::Cli(CliError::MissingArgument(_)) => ErrorKind::MissingArgument,
            Self::Cli(CliError::InvalidInputFile { .. }) => ErrorKind::InvalidInputFile,

            Self::Codec(CodecError::NotAPng { .. }) => ErrorKind::NotAPng,
            Self::Codec(CodecError::Open { .. }) => ErrorKind::InvalidInputFile,
            Self::Codec(CodecError::Create { .. }) | Self::Codec(CodecError::Write(_)) => {
                ErrorKind::Io
            }
            Self::Codec(CodecError::OutOfMemory { .. }) => ErrorKind::OutOfMemory,
            Self::Codec(CodecError::Encode(png::EncodingError::IoError(_))) => ErrorKind::Io,
            Self::Codec(
                CodecError::Decode(_) | CodecError::Encode(_) | CodecError::EmptyImage { .. },
            ) => ErrorKind::Codec,

            Self::Crop(CropError::InvalidRegion { .. }) => ErrorKind::InvalidRegion,
            Self::Crop(CropError::OutOfMemory { .. }) => ErrorKind::OutOfMemory,
            Self::Crop(CropError::Internal(_)) => ErrorKind::InvalidBuffer,

            Self::Image(ImageError::OutOfMemory { .. }) => ErrorKind::OutOfMemory,
            Self::Image(ImageError::InvalidBuffer { .. } | ImageError::TooLarge { .. }) => {
                ErrorKind::InvalidBuffer
            }

            Self::Ssd(SsdError::UnsupportedFormat { .. }) => ErrorKind::UnsupportedFormat,
            Self::Ssd(SsdError::OutOfMemory { .. }) => ErrorKind::OutOfMemory,
            Self::Ssd(SsdError::Io { .. }) => ErrorKind::Io,
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.kind().exit_code()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raster::{CropRect, PixelLayout};
    use std::collections::HashSet;

    const ALL: [ErrorKind; 10] = [
        ErrorKind::InvalidArgument,
        ErrorKind::MissingArgument,
        ErrorKind::InvalidInputFile,
        ErrorKind::NotAPng,
        ErrorKind::Codec,
        ErrorKind::InvalidRegion,
        ErrorKind::UnsupportedFormat,
        ErrorKind::OutOfMemory,
        ErrorKind::Io,
        ErrorKind::InvalidBuffer,
    ];

    #[test]
    fn exit_codes_are_distinct_and_nonzero() {
        let codes: HashSet<u8> = ALL.iter().map(|k| k.exit_code()).collect();
        assert_eq!(codes.len(), ALL.len());
        assert!(!codes.contains(&0));
    }

    #[test]
    fn stage_errors_map_to_kinds() {
        let err = Error::from(CropError::InvalidRegion {
            requested: CropRect::new(200, 200, 640, 480),
            image_size: (800, 600),
        });
        assert_eq!(err.kind(), ErrorKind::InvalidRegion);

        let err = Error::from(SsdError::UnsupportedFormat {
            layout: PixelLayout::Rgb16,
        });
        assert_eq!(err.kind(), ErrorKind::UnsupportedFormat);

        let err = Error::from(CodecError::NotAPng {
            path: "x.png".into(),
        });
        assert_eq!(err.kind(), ErrorKind::NotAPng);

        let err = Error::from(CliError::MissingArgument("--out"));
        assert_eq!(err.kind(), ErrorKind::MissingArgument);
    }

    #[test]
    fn region_message_names_the_request() {
        let err = Error::from(CropError::InvalidRegion {
            requested: CropRect::new(200, 200, 640, 480),
            image_size: (800, 600),
        });
        let msg = err.to_string();
        assert!(msg.contains("cx: 200"), "{msg}");
        assert!(msg.contains("800x600"), "{msg}");
    }
}
