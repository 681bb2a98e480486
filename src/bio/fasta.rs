//! Aligned FASTA handling: deriving unaligned sequences from reference alignments

use crate::BenchError;
use std::fs;
use std::path::Path;

/// Characters treated as alignment gaps in sequence lines
pub const GAP_CHARS: &[u8] = b"-.";

/// Remove gap characters from every sequence line of an aligned FASTA.
///
/// Header lines (starting with `>`) and line endings are copied verbatim, so
/// the record structure of the input is preserved. Fails if the content does
/// not look like FASTA at all.
pub fn strip_gaps(aligned: &[u8]) -> Result<Vec<u8>, BenchError> {
    let first_line = aligned
        .split(|&c| c == b'\n')
        .map(trim_line_end)
        .find(|line| !line.iter().all(u8::is_ascii_whitespace));

    match first_line {
        None => {
            return Err(BenchError::DatasetPreparation(
                "file contains no sequence records".to_string(),
            ))
        }
        Some(line) if line[0] != b'>' => {
            return Err(BenchError::DatasetPreparation(
                "file does not start with a FASTA header".to_string(),
            ))
        }
        Some(_) => {}
    }

    let mut unaligned = Vec::with_capacity(aligned.len());
    for line in aligned.split_inclusive(|&c| c == b'\n') {
        if line.first() == Some(&b'>') {
            unaligned.extend_from_slice(line);
        } else {
            unaligned.extend(line.iter().copied().filter(|c| !GAP_CHARS.contains(c)));
        }
    }

    Ok(unaligned)
}

/// Derive the unaligned form of `source` into `target`.
///
/// The output is staged next to the target and renamed into place, so an
/// interrupted derivation never leaves a truncated file that a later run
/// would mistake for a finished one.
pub fn write_unaligned(source: &Path, target: &Path) -> Result<(), BenchError> {
    let aligned = fs::read(source)?;
    let unaligned = strip_gaps(&aligned)?;

    let file_name = target
        .file_name()
        .ok_or_else(|| BenchError::DatasetPreparation(format!("invalid target path {:?}", target)))?;
    let mut staged_name = file_name.to_os_string();
    staged_name.push(".partial");
    let staged = target.with_file_name(staged_name);

    fs::write(&staged, &unaligned)?;
    fs::rename(&staged, target)?;
    Ok(())
}

fn trim_line_end(line: &[u8]) -> &[u8] {
    line.strip_suffix(b"\r").unwrap_or(line)
}
