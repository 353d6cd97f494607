// WHY: input documents reach the normalizer through a chain of external
// converters (ps -> pdf -> txt); each step writes a temp artifact that is
// dropped as soon as the next step supersedes it

use std::ffi::OsStr;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use tempfile::{Builder, NamedTempFile};
use tracing::{debug, info};

use crate::error::{DocdiffError, Result};
use crate::exec::{run_command, ExecutableLocator};
use crate::filetype::{detect_file_kind, FileKind};

/// External command that rewrites a file one step closer to plain text.
#[derive(Debug)]
pub struct Converter {
    pub program: &'static str,
    pub options: &'static [&'static str],
    /// Suffix of the temp artifact this converter produces.
    pub suffix: &'static str,
    /// Shown verbatim when the tool is not installed.
    pub missing_hint: &'static str,
}

const PS2PDF: Converter = Converter {
    program: "ps2pdf",
    options: &[],
    suffix: ".pdf",
    missing_hint: "Could not find 'ps2pdf', which is needed for ps to pdf conversion.",
};

const PDFTOTEXT: Converter = Converter {
    program: "pdftotext",
    options: &["-nopgbrk", "-enc", "UTF-8"],
    suffix: ".txt",
    missing_hint: "Could not find 'pdftotext', which is needed for pdf to text conversion.\n\
        pdftotext is part of the 'xPdf' suite of programs, obtainable at:\n  \
        http://www.foolabs.com/xpdf/",
};

/// Converter that brings `kind` one step closer to plain text, or `None`
/// when the file already is plain text.
pub fn converter_for(kind: FileKind) -> Option<&'static Converter> {
    match kind {
        FileKind::Ps => Some(&PS2PDF),
        FileKind::Pdf => Some(&PDFTOTEXT),
        FileKind::Txt => None,
    }
}

/// Plain-text outcome of a conversion chain.
///
/// A converted result owns its final temp artifact, so the file lives
/// exactly as long as the caller keeps this value; the original input is
/// never owned and never deleted.
#[derive(Debug)]
pub enum PlainText {
    Original(PathBuf),
    Converted(NamedTempFile),
}

impl PlainText {
    pub fn path(&self) -> &Path {
        match self {
            PlainText::Original(path) => path,
            PlainText::Converted(tmp) => tmp.path(),
        }
    }

    /// Open the text for buffered reading.
    pub fn open(&self) -> std::io::Result<BufReader<File>> {
        Ok(BufReader::new(File::open(self.path())?))
    }
}

/// Prefix for temp artifacts derived from the input's stem, so related
/// intermediates are recognizable in the temp directory.
pub(crate) fn stem_prefix(path: &Path) -> String {
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("unknown");
    format!("{stem}_")
}

/// Applies converters to a file until plain text is obtained.
pub struct ConversionChain<'a> {
    locator: &'a dyn ExecutableLocator,
}

impl<'a> ConversionChain<'a> {
    pub fn new(locator: &'a dyn ExecutableLocator) -> Self {
        Self { locator }
    }

    /// Repeatedly detect-and-convert until `input` is plain text.
    ///
    /// The type graph is acyclic (ps -> pdf -> txt), so at most two
    /// conversions run. Missing tools and unconvertible types are
    /// unrecoverable: no normalized output is possible without them.
    pub fn resolve_to_text(&self, input: &Path) -> Result<PlainText> {
        let prefix = stem_prefix(input);
        let mut current: Option<NamedTempFile> = None;

        loop {
            let path = current
                .as_ref()
                .map(|tmp| tmp.path().to_path_buf())
                .unwrap_or_else(|| input.to_path_buf());

            let kind = detect_file_kind(&path, self.locator);
            debug!(path = %path.display(), %kind, "conversion chain step");

            if kind == FileKind::Txt {
                return Ok(match current {
                    Some(tmp) => PlainText::Converted(tmp),
                    None => PlainText::Original(input.to_path_buf()),
                });
            }

            let converter = converter_for(kind)
                .ok_or_else(|| DocdiffError::UnhandledType(kind.to_string()))?;

            let next = self.apply(converter, &path, &prefix)?;
            // Rebinding drops the superseded intermediate; the original
            // input is never a NamedTempFile, so it survives the run.
            current = Some(next);
        }
    }

    fn apply(&self, converter: &Converter, input: &Path, prefix: &str) -> Result<NamedTempFile> {
        if !self.locator.is_available(converter.program) {
            return Err(DocdiffError::MissingTool {
                tool: converter.program.to_string(),
                hint: converter.missing_hint.to_string(),
            });
        }

        let artifact = Builder::new().prefix(prefix).suffix(converter.suffix).tempfile()?;
        info!(
            tool = converter.program,
            input = %input.display(),
            output = %artifact.path().display(),
            "converting"
        );

        let mut args: Vec<&OsStr> = converter.options.iter().map(OsStr::new).collect();
        args.push(input.as_os_str());
        args.push(artifact.path().as_os_str());

        let outcome = run_command(converter.program, &args)?;
        if !outcome.success {
            return Err(DocdiffError::ToolFailed {
                tool: converter.program.to_string(),
                input: input.display().to_string(),
                output: outcome.text,
            });
        }

        Ok(artifact)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    /// Locator with a fixed set of available tools.
    struct FakeLocator {
        available: HashSet<&'static str>,
    }

    impl FakeLocator {
        fn with(tools: &[&'static str]) -> Self {
            Self {
                available: tools.iter().copied().collect(),
            }
        }
    }

    impl ExecutableLocator for FakeLocator {
        fn is_available(&self, program: &str) -> bool {
            program
                .split_whitespace()
                .next()
                .is_some_and(|base| self.available.contains(base))
        }
    }

    #[test]
    fn registry_covers_every_non_terminal_kind() {
        assert_eq!(converter_for(FileKind::Ps).unwrap().program, "ps2pdf");
        assert_eq!(converter_for(FileKind::Pdf).unwrap().program, "pdftotext");
        assert!(converter_for(FileKind::Txt).is_none());
    }

    #[test]
    fn registry_steps_strictly_toward_text() {
        // ps produces .pdf, pdf produces .txt: two steps maximum, no cycle.
        assert_eq!(converter_for(FileKind::Ps).unwrap().suffix, ".pdf");
        assert_eq!(converter_for(FileKind::Pdf).unwrap().suffix, ".txt");
    }

    #[test]
    fn pdftotext_selects_utf8_without_page_breaks() {
        let options = converter_for(FileKind::Pdf).unwrap().options;
        assert!(options.contains(&"-nopgbrk"));
        assert!(options.contains(&"-enc"));
        assert!(options.contains(&"UTF-8"));
    }

    #[test]
    fn txt_input_needs_no_conversion() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("plain.txt");
        std::fs::write(&path, "already text").unwrap();

        let locator = FakeLocator::with(&[]);
        let chain = ConversionChain::new(&locator);
        let text = chain.resolve_to_text(&path).unwrap();

        assert!(matches!(text, PlainText::Original(_)));
        assert_eq!(text.path(), path.as_path());
    }

    #[test]
    fn missing_ps2pdf_is_fatal_with_tool_specific_hint() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("figure.ps");
        std::fs::write(&path, "%!PS-Adobe-3.0").unwrap();

        let locator = FakeLocator::with(&[]);
        let chain = ConversionChain::new(&locator);
        let err = chain.resolve_to_text(&path).unwrap_err();

        match err {
            DocdiffError::MissingTool { tool, hint } => {
                assert_eq!(tool, "ps2pdf");
                assert!(hint.contains("ps2pdf"));
                assert!(hint.contains("ps to pdf"));
            }
            other => panic!("expected MissingTool, got {other:?}"),
        }
    }

    #[test]
    fn missing_pdftotext_names_the_xpdf_suite() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("paper.pdf");
        std::fs::write(&path, "%PDF-1.4").unwrap();

        let locator = FakeLocator::with(&[]);
        let chain = ConversionChain::new(&locator);
        let err = chain.resolve_to_text(&path).unwrap_err();

        match err {
            DocdiffError::MissingTool { tool, hint } => {
                assert_eq!(tool, "pdftotext");
                assert!(hint.contains("xPdf"));
            }
            other => panic!("expected MissingTool, got {other:?}"),
        }
    }

    #[test]
    fn stem_prefix_uses_file_stem() {
        assert_eq!(stem_prefix(Path::new("/tmp/paper.pdf")), "paper_");
        assert_eq!(stem_prefix(Path::new("notes")), "notes_");
    }
}
