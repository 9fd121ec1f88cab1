use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};

/// One labelled image of a dataset list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sample {
    pub path: PathBuf,
    pub label: i32,
}

/// Reads a dataset list: one `relative_path label` pair per line, paths
/// relative to the directory holding the list file.
pub fn load_file_list(path: &Path) -> Result<Vec<Sample>> {
    let text =
        fs::read_to_string(path).with_context(|| format!("reading dataset list {}", path.display()))?;
    let base = path.parent().unwrap_or_else(|| Path::new(""));
    parse_file_list(&text, base).with_context(|| format!("parsing dataset list {}", path.display()))
}

/// Parses dataset list `text`, resolving entries against `base`.
///
/// Blank lines are skipped. A line without an integer label, or with extra
/// fields, is rejected with its 1-based line number.
pub fn parse_file_list(text: &str, base: &Path) -> Result<Vec<Sample>> {
    let mut samples = Vec::new();
    for (idx, line) in text.lines().enumerate() {
        let lineno = idx + 1;
        let mut fields = line.split_whitespace();
        let Some(file) = fields.next() else {
            continue;
        };
        let Some(label) = fields.next() else {
            bail!("line {lineno}: missing label for '{file}'");
        };
        let label: i32 = label
            .parse()
            .with_context(|| format!("line {lineno}: label '{label}' is not an integer"))?;
        if let Some(extra) = fields.next() {
            bail!("line {lineno}: unexpected field '{extra}'");
        }
        samples.push(Sample {
            path: base.join(file),
            label,
        });
    }
    Ok(samples)
}
