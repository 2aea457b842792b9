use std::path::PathBuf;

/// Errors raised while loading or compiling a contact schema.
///
/// Validation failures of a submission are not errors; they are reported
/// through [`crate::Verdict`].
#[derive(Debug, thiserror::Error)]
pub enum FormError {
    #[error("failed to read schema {}: {source}", .path.display())]
    SchemaRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse schema {}: {message}", .path.display())]
    SchemaParse { path: PathBuf, message: String },

    #[error("failed to compile schema: {message}")]
    SchemaCompile { message: String },

    #[error("invalid contact schema: {reason}")]
    InvalidSchema { reason: String },
}
