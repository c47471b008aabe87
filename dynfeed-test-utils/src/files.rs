// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

/// Writes `lines` newline-terminated to a fresh `.jsonl` temp file.
///
/// The file is removed when the returned handle is dropped.
pub fn jsonl_file<S: AsRef<str>>(lines: &[S]) -> NamedTempFile {
    let mut file = tempfile::Builder::new()
        .prefix("dynfeed-")
        .suffix(".jsonl")
        .tempfile()
        .expect("failed to create temp file");
    for line in lines {
        writeln!(file, "{}", line.as_ref()).expect("failed to write temp file");
    }
    file.flush().expect("failed to flush temp file");
    file
}

/// A `.jsonl` temp file whose second line is not valid UTF-8, between `first`
/// and `third`.
pub fn jsonl_file_with_invalid_utf8(first: &str, third: &str) -> NamedTempFile {
    let mut file = jsonl_file(&[first]);
    file.write_all(b"{\"attributes\":{\"VesselName\":\"\xff\xfe\"}}\n")
        .expect("failed to write temp file");
    writeln!(file, "{third}").expect("failed to write temp file");
    file.flush().expect("failed to flush temp file");
    file
}

/// Replaces the content of `path` with `lines`.
pub fn write_lines<S: AsRef<str>>(path: &Path, lines: &[S]) {
    let content: String = lines
        .iter()
        .map(|line| format!("{}\n", line.as_ref()))
        .collect();
    std::fs::write(path, content).expect("failed to rewrite file");
}
