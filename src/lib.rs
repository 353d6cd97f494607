pub mod convert;
pub mod error;
pub mod exec;
pub mod filetype;
pub mod normalize;
pub mod pipeline;
pub mod viewer;

// Re-export main types for convenient access
pub use convert::{converter_for, ConversionChain, PlainText};
pub use error::{DocdiffError, Result};
pub use exec::{ExecutableLocator, SystemLocator};
pub use filetype::{detect_file_kind, FileKind};
pub use normalize::SentenceNormalizer;
pub use pipeline::{normalize_file, normalize_to_tempfile};
