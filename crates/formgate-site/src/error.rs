use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum SiteError {
    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse site config: {message}")]
    Parse { message: String },

    #[error("invalid site config: {reason}")]
    Invalid { reason: String },

    #[error("layout {} has no {slot} slot", .path.display())]
    LayoutSlot { path: PathBuf, slot: &'static str },
}
