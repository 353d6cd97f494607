// WHY: single composition point so the CLI and the diff path normalize
// documents identically

use std::io::Write;
use std::path::Path;
use tempfile::{Builder, NamedTempFile};
use tracing::info;

use crate::convert::{stem_prefix, ConversionChain};
use crate::error::Result;
use crate::exec::ExecutableLocator;
use crate::normalize::SentenceNormalizer;

/// Normalize any supported document into `sink`.
///
/// Runs the conversion chain to plain text, then the sentence reflow, and
/// flushes the sink before returning. Intermediate artifacts are released
/// when the chain result goes out of scope; the sink's lifetime belongs to
/// the caller.
pub fn normalize_file<W: Write>(
    input: &Path,
    sink: &mut W,
    locator: &dyn ExecutableLocator,
) -> Result<()> {
    let chain = ConversionChain::new(locator);
    let text = chain.resolve_to_text(input)?;

    info!(input = %input.display(), text = %text.path().display(), "normalizing");

    let reader = text.open()?;
    let mut normalizer = SentenceNormalizer::new();
    normalizer.normalize(reader, sink)?;
    Ok(())
}

/// Normalize a document into a fresh named temp file.
///
/// Used when two documents must be compared: each side gets its own
/// artifact, named after the input's stem, owned by the caller.
pub fn normalize_to_tempfile(input: &Path, locator: &dyn ExecutableLocator) -> Result<NamedTempFile> {
    let prefix = stem_prefix(input);
    let mut out = Builder::new().prefix(&prefix).suffix(".txt").tempfile()?;
    normalize_file(input, &mut out, locator)?;
    Ok(out)
}
