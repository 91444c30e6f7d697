use std::collections::HashSet;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use tracing::debug;

use crate::core::error::{CheckError, CheckResult};

/// Upper bound on sampled lines, so classification cost is deterministic
/// regardless of artifact size.
pub const MAX_EVIDENCE_LINES: usize = 5000;

/// Minimum printable-ASCII run length extracted from class files.
const MIN_STRING_RUN: usize = 4;

/// Text/metadata member extensions read verbatim.
const TEXT_EXTENSIONS: [&str; 6] = ["json", "toml", "properties", "mf", "txt", "cfg"];

/// A bounded, deduplicated text corpus sampled from an archive's members.
///
/// Class files are reduced to printable-string runs; text members are read
/// as-is. Everything is read in memory — no extraction directory is ever
/// created, so there is nothing to clean up on any exit path.
#[derive(Debug, Default)]
pub struct MappingEvidence {
    lines: Vec<String>,
    truncated: bool,
}

impl MappingEvidence {
    /// Sample evidence from every class and text member of the archive.
    pub fn from_archive(path: &Path) -> CheckResult<Self> {
        let file = File::open(path).map_err(|source| CheckError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut archive =
            zip::ZipArchive::new(file).map_err(|e| CheckError::ArtifactCorrupt {
                path: path.to_path_buf(),
                detail: e.to_string(),
            })?;

        let mut evidence = Self::default();
        let mut seen = HashSet::new();
        let mut buffer = Vec::new();

        for index in 0..archive.len() {
            if evidence.truncated {
                break;
            }
            let mut entry =
                archive
                    .by_index(index)
                    .map_err(|e| CheckError::ArtifactCorrupt {
                        path: path.to_path_buf(),
                        detail: format!("member #{index}: {e}"),
                    })?;
            let name = entry.name().to_string();

            if name.ends_with(".class") {
                buffer.clear();
                entry
                    .read_to_end(&mut buffer)
                    .map_err(|e| CheckError::ArtifactCorrupt {
                        path: path.to_path_buf(),
                        detail: format!("member '{name}': {e}"),
                    })?;
                for run in printable_runs(&buffer) {
                    if !evidence.push_line(&mut seen, run) {
                        break;
                    }
                }
            } else if is_text_member(&name) {
                buffer.clear();
                entry
                    .read_to_end(&mut buffer)
                    .map_err(|e| CheckError::ArtifactCorrupt {
                        path: path.to_path_buf(),
                        detail: format!("member '{name}': {e}"),
                    })?;
                let text = String::from_utf8_lossy(&buffer);
                for line in text.lines() {
                    let line = line.trim();
                    if line.is_empty() {
                        continue;
                    }
                    if !evidence.push_line(&mut seen, line.to_string()) {
                        break;
                    }
                }
            }
        }

        debug!(
            "Sampled {} evidence lines from {:?} (truncated: {})",
            evidence.lines.len(),
            path,
            evidence.truncated
        );
        Ok(evidence)
    }

    /// Build evidence directly from lines; used by the classifier tests.
    pub fn from_lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut evidence = Self::default();
        let mut seen = HashSet::new();
        for line in lines {
            if !evidence.push_line(&mut seen, line.into()) {
                break;
            }
        }
        evidence
    }

    /// Returns false once the corpus bound is reached.
    fn push_line(&mut self, seen: &mut HashSet<String>, line: String) -> bool {
        if self.lines.len() >= MAX_EVIDENCE_LINES {
            self.truncated = true;
            return false;
        }
        if seen.insert(line.clone()) {
            self.lines.push(line);
        }
        true
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn is_truncated(&self) -> bool {
        self.truncated
    }
}

fn is_text_member(name: &str) -> bool {
    let lower = name.to_ascii_lowercase();
    TEXT_EXTENSIONS
        .iter()
        .any(|ext| lower.rsplit('.').next() == Some(*ext))
}

/// Extract printable-ASCII runs of at least `MIN_STRING_RUN` characters,
/// classic `strings(1)` semantics.
fn printable_runs(bytes: &[u8]) -> Vec<String> {
    let mut runs = Vec::new();
    let mut current = String::new();
    for &byte in bytes {
        if (0x20..=0x7e).contains(&byte) {
            current.push(byte as char);
        } else {
            if current.len() >= MIN_STRING_RUN {
                runs.push(std::mem::take(&mut current));
            } else {
                current.clear();
            }
        }
    }
    if current.len() >= MIN_STRING_RUN {
        runs.push(current);
    }
    runs
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;
    use zip::write::SimpleFileOptions;

    fn write_jar(path: &Path, entries: &[(&str, &[u8])]) {
        let file = File::create(path).unwrap();
        let mut writer = zip::ZipWriter::new(file);
        for (name, bytes) in entries {
            writer
                .start_file(*name, SimpleFileOptions::default())
                .unwrap();
            writer.write_all(bytes).unwrap();
        }
        writer.finish().unwrap();
    }

    #[test]
    fn extracts_printable_runs_from_class_bytes() {
        let mut bytes = vec![0xca, 0xfe, 0xba, 0xbe, 0x00, 0x00];
        bytes.extend_from_slice(b"net/minecraft/class_1234");
        bytes.push(0x00);
        bytes.extend_from_slice(b"ab"); // below the minimum run length
        bytes.push(0x01);
        bytes.extend_from_slice(b"method_5678");

        let runs = printable_runs(&bytes);
        assert_eq!(runs, vec!["net/minecraft/class_1234", "method_5678"]);
    }

    #[test]
    fn samples_class_and_text_members() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("mod.jar");
        let mut class_bytes = vec![0x00];
        class_bytes.extend_from_slice(b"func_71410_x");
        class_bytes.push(0x00);
        write_jar(
            &path,
            &[
                ("com/example/Example.class", class_bytes.as_slice()),
                ("fabric.mod.json", b"{\n  \"id\": \"examplemod\"\n}\n"),
                ("assets/icon.png", &[0x89, 0x50, 0x4e, 0x47]),
            ],
        );

        let evidence = MappingEvidence::from_archive(&path).unwrap();
        assert!(evidence.lines().iter().any(|l| l == "func_71410_x"));
        assert!(evidence.lines().iter().any(|l| l.contains("examplemod")));
        // PNG bytes contribute nothing.
        assert!(!evidence.lines().iter().any(|l| l.contains("PNG")));
    }

    #[test]
    fn corpus_is_deduplicated_by_construction() {
        let evidence = MappingEvidence::from_lines(["same", "same", "other"]);
        assert_eq!(evidence.len(), 2);
    }

    #[test]
    fn corpus_is_bounded() {
        let lines = (0..MAX_EVIDENCE_LINES + 100).map(|i| format!("line {i}"));
        let evidence = MappingEvidence::from_lines(lines);
        assert_eq!(evidence.len(), MAX_EVIDENCE_LINES);
        assert!(evidence.is_truncated());
    }

    #[test]
    fn text_member_detection_is_extension_based() {
        assert!(is_text_member("fabric.mod.json"));
        assert!(is_text_member("META-INF/mods.toml"));
        assert!(is_text_member("META-INF/MANIFEST.MF"));
        assert!(!is_text_member("assets/icon.png"));
        assert!(!is_text_member("com/example/Example.class"));
    }
}
