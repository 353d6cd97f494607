// WHY: the conversion chain keys every step off the detected type, so the
// mapping table must be exhaustive and default to plain text

use std::ffi::OsStr;
use std::fmt;
use std::path::Path;
use tracing::debug;

use crate::exec::{run_command, ExecutableLocator};

/// File formats the conversion chain understands. `Txt` is terminal: once a
/// file is detected as plain text no further conversion runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileKind {
    Pdf,
    Ps,
    Txt,
}

impl FileKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FileKind::Pdf => "pdf",
            FileKind::Ps => "ps",
            FileKind::Txt => "txt",
        }
    }
}

impl fmt::Display for FileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The system file-identification utility.
const FILE_PROBE: &str = "file";

/// Map a probe token or a filename extension onto a kind.
///
/// The same table serves both sources: "pdf" and "fdf" can be either a
/// `file --brief` first word or an extension, "postscript" only the former.
/// Everything unrecognized is assumed to be text.
fn kind_from_token(token: &str) -> FileKind {
    match token {
        "pdf" | "fdf" => FileKind::Pdf,
        "postscript" | "ps" => FileKind::Ps,
        _ => FileKind::Txt,
    }
}

fn kind_from_extension(path: &Path) -> FileKind {
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default();
    kind_from_token(&ext)
}

/// Determine the type of `path`.
///
/// Prefers the system `file` probe when installed; falls back to the
/// lowercased filename extension otherwise. Never fails: unmapped results
/// default to `Txt`.
pub fn detect_file_kind(path: &Path, locator: &dyn ExecutableLocator) -> FileKind {
    if locator.is_available(FILE_PROBE) {
        match run_command(FILE_PROBE, &[OsStr::new("--brief"), path.as_os_str()]) {
            Ok(out) if out.success => {
                let token = out
                    .text
                    .split_whitespace()
                    .next()
                    .unwrap_or("")
                    .to_lowercase();
                let kind = kind_from_token(&token);
                debug!(path = %path.display(), token, %kind, "file probe classified input");
                return kind;
            }
            Ok(_) | Err(_) => {
                debug!(path = %path.display(), "file probe failed, falling back to extension");
            }
        }
    }

    let kind = kind_from_extension(path);
    debug!(path = %path.display(), %kind, "classified input by extension");
    kind
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Locator that reports every tool absent, forcing the extension path.
    struct NoTools;

    impl ExecutableLocator for NoTools {
        fn is_available(&self, _program: &str) -> bool {
            false
        }
    }

    #[test]
    fn token_mapping_table() {
        assert_eq!(kind_from_token("pdf"), FileKind::Pdf);
        assert_eq!(kind_from_token("fdf"), FileKind::Pdf);
        assert_eq!(kind_from_token("postscript"), FileKind::Ps);
        assert_eq!(kind_from_token("ps"), FileKind::Ps);
        assert_eq!(kind_from_token("ascii"), FileKind::Txt);
        assert_eq!(kind_from_token("utf-8"), FileKind::Txt);
        assert_eq!(kind_from_token(""), FileKind::Txt);
    }

    #[test]
    fn extension_fallback_is_case_insensitive() {
        let locator = NoTools;
        assert_eq!(detect_file_kind(Path::new("paper.PDF"), &locator), FileKind::Pdf);
        assert_eq!(detect_file_kind(Path::new("figure.Ps"), &locator), FileKind::Ps);
        assert_eq!(detect_file_kind(Path::new("notes.txt"), &locator), FileKind::Txt);
    }

    #[test]
    fn extension_fallback_defaults_to_text() {
        let locator = NoTools;
        assert_eq!(detect_file_kind(Path::new("README"), &locator), FileKind::Txt);
        assert_eq!(detect_file_kind(Path::new("archive.tar.gz"), &locator), FileKind::Txt);
    }

    #[test]
    fn fdf_extension_maps_to_pdf() {
        let locator = NoTools;
        assert_eq!(detect_file_kind(Path::new("form.fdf"), &locator), FileKind::Pdf);
    }

    #[test]
    fn display_matches_token_names() {
        assert_eq!(FileKind::Pdf.to_string(), "pdf");
        assert_eq!(FileKind::Ps.to_string(), "ps");
        assert_eq!(FileKind::Txt.to_string(), "txt");
    }
}
