use thiserror::Error;

/// Top-level error type for all docdiff operations.
///
/// None of these are recoverable mid-run: the conversion chain has no
/// fallback path, so the caller reports the message and stops.
#[derive(Debug, Error)]
pub enum DocdiffError {
    /// A required external converter or probe is not installed.
    #[error("{hint}")]
    MissingTool { tool: String, hint: String },

    /// The detector produced a type with no registered converter.
    #[error("don't know how to handle file type '{0}'")]
    UnhandledType(String),

    /// No diff viewer from the preference list is installed.
    #[error("could not find a suitable diff viewer from the list: {0}")]
    NoViewer(String),

    /// A `--diffviewer` argument named nothing installed and matched no
    /// known viewer.
    #[error("program '{name}' not found, and no viewer from the list {known} starts with '{name}'")]
    UnknownViewer { name: String, known: String },

    /// An external converter ran but exited non-zero.
    #[error("'{tool}' failed on {input}: {output}")]
    ToolFailed {
        tool: String,
        input: String,
        output: String,
    },

    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, DocdiffError>;
