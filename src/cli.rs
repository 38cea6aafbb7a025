//! Command line: flags, defaults, and request validation.
//!
//! Every flag can also come from a `PNGCROP_*` environment variable
//! (or a `.env` file loaded by the binary). Flags win.

use std::fs::File;
use std::path::{Path, PathBuf};

use clap::{ArgAction, Parser};

use crate::raster::CropRect;

pub const DEFAULT_X: u32 = 200;
pub const DEFAULT_Y: u32 = 200;
pub const DEFAULT_WIDTH: u32 = 640;
pub const DEFAULT_HEIGHT: u32 = 480;

/// `-h` is the crop height, so help is only available as `--help`.
#[derive(Parser, Debug, Clone)]
#[command(
    name = "pngcrop",
    version,
    about = "Crop a PNG and optionally dump the crop as packed RGB565 (SSD) pixels",
    disable_help_flag = true
)]
pub struct Args {
    /// Input PNG file
    #[arg(short = 'p', long = "png", env = "PNGCROP_PNG", value_name = "PATH")]
    pub png: Option<PathBuf>,

    /// Output PNG file
    #[arg(short = 'o', long = "out", env = "PNGCROP_OUT", value_name = "PATH")]
    pub out: Option<PathBuf>,

    /// Left edge of the crop rectangle
    #[arg(short = 'x', long = "cx", env = "PNGCROP_CX", default_value_t = DEFAULT_X)]
    pub cx: u32,

    /// Top edge of the crop rectangle
    #[arg(short = 'y', long = "cy", env = "PNGCROP_CY", default_value_t = DEFAULT_Y)]
    pub cy: u32,

    /// Width of the crop rectangle
    #[arg(short = 'w', long = "width", env = "PNGCROP_WIDTH", default_value_t = DEFAULT_WIDTH)]
    pub width: u32,

    /// Height of the crop rectangle
    #[arg(short = 'h', long = "height", env = "PNGCROP_HEIGHT", default_value_t = DEFAULT_HEIGHT)]
    pub height: u32,

    /// Also write the crop as raw 16-bit RGB565 to this file
    #[arg(short = 's', long = "ssd", env = "PNGCROP_SSD", value_name = "PATH")]
    pub ssd: Option<PathBuf>,

    /// Do not print progress
    #[arg(short = 'q', long)]
    pub quiet: bool,

    /// Print help
    #[arg(long, action = ArgAction::Help)]
    help: Option<bool>,
}

impl Args {
    /// Checks required paths and the input file, producing a [`CropRequest`].
    pub fn into_request(self) -> Result<CropRequest, CliError> {
        let input = self.png.ok_or(CliError::MissingArgument("--png"))?;
        let output = self.out.ok_or(CliError::MissingArgument("--out"))?;
        check_input_file(&input)?;

        Ok(CropRequest {
            rect: CropRect::new(self.cx, self.cy, self.width, self.height),
            input,
            output,
            ssd: self.ssd,
        })
    }
}

/// A validated crop job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CropRequest {
    pub rect: CropRect,
    pub input: PathBuf,
    pub output: PathBuf,
    pub ssd: Option<PathBuf>,
}

impl CropRequest {
    /// Request with the default rectangle.
    pub fn new(input: impl Into<PathBuf>, output: impl Into<PathBuf>) -> Self {
        Self {
            rect: CropRect::new(DEFAULT_X, DEFAULT_Y, DEFAULT_WIDTH, DEFAULT_HEIGHT),
            input: input.into(),
            output: output.into(),
            ssd: None,
        }
    }

    pub fn with_rect(mut self, rect: CropRect) -> Self {
        self.rect = rect;
        self
    }

    pub fn with_ssd(mut self, ssd: impl Into<PathBuf>) -> Self {
        self.ssd = Some(ssd.into());
        self
    }
}

/// The input must be a regular file we can open for reading.
fn check_input_file(path: &Path) -> Result<(), CliError> {
    let invalid = |reason: String| CliError::InvalidInputFile {
        path: path.to_path_buf(),
        reason,
    };

    let meta = std::fs::metadata(path).map_err(|e| invalid(e.to_string()))?;
    if !meta.is_file() {
        return Err(invalid("not a regular file".to_string()));
    }
    File::open(path).map_err(|e| invalid(e.to_string()))?;
    Ok(())
}

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("{0}")]
    InvalidArgument(#[from] clap::Error),

    #[error("Input and/or Output file name missing: {0} is required")]
    MissingArgument(&'static str),

    #[error("Invalid file: {} ({reason})", path.display())]
    InvalidInputFile { path: PathBuf, reason: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Args, clap::Error> {
        Args::try_parse_from(std::iter::once("pngcrop").chain(args.iter().copied()))
    }

    #[test]
    fn defaults_match_original_tool() {
        let args = parse(&["-p", "in.png", "-o", "out.png"]).unwrap();
        assert_eq!(
            (args.cx, args.cy, args.width, args.height),
            (200, 200, 640, 480)
        );
        assert!(args.ssd.is_none());
    }

    #[test]
    fn short_and_long_flags() {
        let args = parse(&[
            "-x", "1", "-y", "2", "-w", "3", "-h", "4", "-s", "dump.ssd", "--png", "a.png",
            "--out", "b.png",
        ])
        .unwrap();
        assert_eq!((args.cx, args.cy, args.width, args.height), (1, 2, 3, 4));
        assert_eq!(args.ssd.as_deref(), Some(Path::new("dump.ssd")));

        let args = parse(&["--cx", "5", "--cy", "6", "--width", "7", "--height", "8"]).unwrap();
        assert_eq!((args.cx, args.cy, args.width, args.height), (5, 6, 7, 8));
    }

    #[test]
    fn negative_and_garbage_numbers_are_rejected() {
        assert!(parse(&["-x", "-5"]).is_err());
        assert!(parse(&["--width", "wide"]).is_err());
    }

    #[test]
    fn unknown_flag_and_missing_value_are_rejected() {
        assert!(parse(&["--bogus"]).is_err());
        assert!(parse(&["-p"]).is_err());
    }

    #[test]
    fn missing_paths_are_reported() {
        let args = parse(&["-o", "out.png"]).unwrap();
        assert!(matches!(
            args.into_request(),
            Err(CliError::MissingArgument("--png"))
        ));

        let args = parse(&["-p", "in.png"]).unwrap();
        assert!(matches!(
            args.into_request(),
            Err(CliError::MissingArgument("--out"))
        ));
    }

    #[test]
    fn directory_is_not_a_valid_input() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().to_str().unwrap();
        let args = parse(&["-p", input, "-o", "out.png"]).unwrap();
        assert!(matches!(
            args.into_request(),
            Err(CliError::InvalidInputFile { .. })
        ));
    }

    #[test]
    fn nonexistent_input_is_invalid() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("nope.png");
        let args = parse(&["-p", input.to_str().unwrap(), "-o", "out.png"]).unwrap();
        assert!(matches!(
            args.into_request(),
            Err(CliError::InvalidInputFile { .. })
        ));
    }

    #[test]
    fn regular_file_produces_request() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("in.png");
        std::fs::write(&input, b"anything").unwrap();

        let args = parse(&["-p", input.to_str().unwrap(), "-o", "out.png", "-w", "10"]).unwrap();
        let request = args.into_request().unwrap();
        assert_eq!(request.rect, CropRect::new(200, 200, 10, 480));
        assert_eq!(request.output, PathBuf::from("out.png"));
    }
}
