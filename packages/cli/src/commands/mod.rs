pub mod apply;
pub mod check;
pub mod init;
pub mod preview;
pub mod scan;

pub use apply::{apply, ApplyArgs};
pub use check::{check, CheckArgs};
pub use init::{init, InitArgs};
pub use preview::{preview, PreviewArgs};
pub use scan::{scan, ScanArgs};

use anyhow::{anyhow, Result};
use std::path::Path;

/// Output format shared by commands that can emit JSON
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

pub(crate) fn read_input(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|err| anyhow!("Cannot read {}: {}", path.display(), err))
}

/// 1-based line and column of a byte offset
pub(crate) fn line_col(source: &str, offset: usize) -> (usize, usize) {
    let before = &source[..offset.min(source.len())];
    let line = before.matches('\n').count() + 1;
    let column = before.rfind('\n').map(|nl| offset - nl).unwrap_or(offset + 1);
    (line, column)
}
