//! Row progress reporting for the decode and encode stages.
//!
//! The codec functions take a `&mut dyn ProgressObserver` instead of
//! sharing a row count through global state.

use std::io::Write;

/// Which codec pass is reporting.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Stage {
    Decode,
    Encode,
}

/// Receives progress from the PNG decode/encode passes.
///
/// Every `begin` is matched by exactly one `finish`, including when the
/// stage fails part way through.
pub trait ProgressObserver {
    /// Header of the decoded source image is known.
    fn image_info(&mut self, _width: u32, _height: u32, _bit_depth: u8) {}

    fn begin(&mut self, stage: Stage, total_rows: u32);

    /// `rows_done` rows of the current stage have been processed.
    fn row_done(&mut self, stage: Stage, rows_done: u32);

    fn finish(&mut self, stage: Stage, success: bool);
}

/// Discards all progress.
#[derive(Debug, Default, Clone, Copy)]
pub struct Silent;

impl ProgressObserver for Silent {
    fn begin(&mut self, _stage: Stage, _total_rows: u32) {}
    fn row_done(&mut self, _stage: Stage, _rows_done: u32) {}
    fn finish(&mut self, _stage: Stage, _success: bool) {}
}

/// Prints a percentage that is rewritten in place as rows complete.
pub struct ConsoleProgress<W: Write> {
    out: W,
    total_rows: u32,
    last_percent: Option<u32>,
}

impl ConsoleProgress<std::io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl<W: Write> ConsoleProgress<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            total_rows: 0,
            last_percent: None,
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

// Console output is best effort: a closed stdout must not fail the crop.
impl<W: Write> ProgressObserver for ConsoleProgress<W> {
    fn image_info(&mut self, _width: u32, _height: u32, bit_depth: u8) {
        writeln!(self.out, "Pixel bit depth: {}", bit_depth).ok();
    }

    fn begin(&mut self, stage: Stage, total_rows: u32) {
        self.total_rows = total_rows;
        self.last_percent = None;
        let label = match stage {
            Stage::Decode => "Reading Image:   ",
            Stage::Encode => "Writing Image...   ",
        };
        write!(self.out, "{}", label).ok();
        self.out.flush().ok();
    }

    fn row_done(&mut self, _stage: Stage, rows_done: u32) {
        if self.total_rows == 0 {
            return;
        }
        let percent = (u64::from(rows_done) * 100 / u64::from(self.total_rows)) as u32;
        if self.last_percent == Some(percent) {
            return;
        }
        if self.last_percent.is_some() {
            write!(self.out, "\x08\x08\x08").ok();
        }
        write!(self.out, "{:02}%", percent.min(99)).ok();
        self.last_percent = Some(percent);
        self.out.flush().ok();
    }

    fn finish(&mut self, _stage: Stage, success: bool) {
        if self.last_percent.is_some() {
            write!(self.out, "\x08\x08\x08").ok();
        }
        writeln!(self.out, "{}", if success { "Done" } else { "Failed" }).ok();
        self.out.flush().ok();
        self.last_percent = None;
    }
}

/// Brackets one stage: `begin` on creation, `finish` on drop.
///
/// Dropping without [`StageScope::complete`] reports failure, so early
/// returns through `?` still close the stage.
pub(crate) struct StageScope<'a> {
    observer: &'a mut dyn ProgressObserver,
    stage: Stage,
    completed: bool,
}

impl<'a> StageScope<'a> {
    pub(crate) fn begin(
        observer: &'a mut dyn ProgressObserver,
        stage: Stage,
        total_rows: u32,
    ) -> Self {
        observer.begin(stage, total_rows);
        Self {
            observer,
            stage,
            completed: false,
        }
    }

    pub(crate) fn row_done(&mut self, rows_done: u32) {
        self.observer.row_done(self.stage, rows_done);
    }

    pub(crate) fn complete(mut self) {
        self.completed = true;
    }
}

impl Drop for StageScope<'_> {
    fn drop(&mut self) {
        self.observer.finish(self.stage, self.completed);
    }
}
