use std::path::PathBuf;

/// Failures at the file boundary. The pipeline degrades these to empty tables.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed csv in {}: {source}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}

impl PipelineError {
    pub fn path(&self) -> &std::path::Path {
        match self {
            PipelineError::Io { path, .. } | PipelineError::Csv { path, .. } => path,
        }
    }
}
