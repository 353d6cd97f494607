// WHY: which diff viewer runs is a user preference with a sane fallback
// order; the core only needs "first installed program wins"

use std::ffi::OsStr;
use std::path::Path;
use tracing::{debug, info};

use crate::error::{DocdiffError, Result};
use crate::exec::{base_program, run_command, ExecutableLocator};
use crate::pipeline::normalize_to_tempfile;

/// Diff viewers in preference order, most preferred first.
///
/// kdiff3 handles the unicode that pdftotext produces well; word wrap is
/// forced on since normalized sentences can be long. Entries may carry
/// switches; only the base program is probed for availability.
pub const DIFF_VIEWERS: &[&str] = &[
    "kdiff3 --cs WordWrap=1 --cs ShowWhiteSpaceCharacters=0",
    "meld",
    "tkdiff",
    "xxdiff",
    "gvimdiff",
    "vimdiff",
    "diff",
    "opendiff",
];

/// Base program names of the known viewers, for help text and errors.
pub fn viewer_names() -> Vec<&'static str> {
    DIFF_VIEWERS.iter().filter_map(|v| base_program(v)).collect()
}

/// First candidate whose base program is installed.
fn find_first<'v>(candidates: &[&'v str], locator: &dyn ExecutableLocator) -> Option<&'v str> {
    candidates.iter().copied().find(|c| locator.is_available(c))
}

/// Check a `--diffviewer` argument up front: it must either prefix-match a
/// known viewer or name an installed program.
pub fn validate_preference(preference: &str, locator: &dyn ExecutableLocator) -> Result<()> {
    let matches_known = viewer_names().iter().any(|name| name.starts_with(preference));
    if !matches_known && !locator.is_available(preference) {
        return Err(DocdiffError::UnknownViewer {
            name: preference.to_string(),
            known: viewer_names().join(", "),
        });
    }
    Ok(())
}

/// Pick the viewer to run: the preference verbatim first (it may name a
/// program outside the list), then known viewers matching it as a prefix,
/// then the full preference order.
fn select_viewer<'v>(
    preference: Option<&'v str>,
    locator: &dyn ExecutableLocator,
) -> Result<&'v str> {
    let mut candidates: Vec<&str> = Vec::new();
    if let Some(pref) = preference {
        candidates.push(pref);
        candidates.extend(DIFF_VIEWERS.iter().copied().filter(|v| v.starts_with(pref)));
    }
    candidates.extend(DIFF_VIEWERS.iter().copied());

    find_first(&candidates, locator)
        .ok_or_else(|| DocdiffError::NoViewer(viewer_names().join(", ")))
}

/// Show the diff between two documents.
///
/// Both inputs are normalized to temp files, the first available viewer runs
/// on the pair, and its combined output is echoed to stdout for viewers like
/// `diff` that report there. The temp files are released on return.
pub fn view_diff(
    left: &Path,
    right: &Path,
    preference: Option<&str>,
    locator: &dyn ExecutableLocator,
) -> Result<()> {
    let fleft = normalize_to_tempfile(left, locator)?;
    let fright = normalize_to_tempfile(right, locator)?;

    let viewer = select_viewer(preference, locator)?;
    info!(viewer, "showing diff");

    let mut parts = viewer.split_whitespace();
    let program = parts.next().unwrap_or(viewer);
    let mut args: Vec<&OsStr> = parts.map(OsStr::new).collect();
    args.push(fleft.path().as_os_str());
    args.push(fright.path().as_os_str());

    // Viewers signal "files differ" through their exit status (diff exits
    // 1), so the status is logged but never treated as a failure.
    let outcome = run_command(program, &args)?;
    debug!(success = outcome.success, "viewer exited");
    print!("{}", outcome.text);

    Ok(())
}
