use std::fmt::Display;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub mod codes;


pub use codes::{describe_error_code, ErrorCode};

/// The unified error type for dataproc
#[derive(Error, Debug)]
pub enum DataprocError {
    #[error("[E{code:04}] Configuration load error: {message}")]
    ConfigLoad {
        code: u16,
        message: String,
        path: Option<PathBuf>,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("[E{code:04}] Configuration save error: {message}")]
    ConfigSave {
        code: u16,
        message: String,
        path: Option<PathBuf>,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("[E{code:04}] Item {index} failed: {message}")]
    ItemProcess {
        code: u16,
        message: String,
        index: usize,
    },
}

impl DataprocError {
    /// Create a configuration load error for a path
    pub fn config_load(code: u16, message: impl Into<String>, path: impl AsRef<Path>) -> Self {
        Self::ConfigLoad {
            code,
            message: message.into(),
            path: Some(path.as_ref().to_path_buf()),
            source: None,
        }
    }

    /// Create a configuration save error
    pub fn config_save(code: u16, message: impl Into<String>, path: Option<PathBuf>) -> Self {
        Self::ConfigSave {
            code,
            message: message.into(),
            path,
            source: None,
        }
    }

    /// Create an item processing error for the item at `index`
    pub fn item(code: u16, index: usize, message: impl Into<String>) -> Self {
        Self::ItemProcess {
            code,
            message: message.into(),
            index,
        }
    }

    /// Add a source error to this error
    pub fn with_source(
        mut self,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        match &mut self {
            Self::ConfigLoad { source: src, .. } | Self::ConfigSave { source: src, .. } => {
                *src = Some(source.into());
            }
            Self::ItemProcess { .. } => {}
        }
        self
    }

    /// Add context to the error message
    pub fn with_context(mut self, context: impl Display) -> Self {
        match &mut self {
            Self::ConfigLoad { message, .. }
            | Self::ConfigSave { message, .. }
            | Self::ItemProcess { message, .. } => {
                *message = format!("{}: {}", message, context);
            }
        }
        self
    }

    /// Get the error code
    pub fn code(&self) -> u16 {
        match self {
            Self::ConfigLoad { code, .. }
            | Self::ConfigSave { code, .. }
            | Self::ItemProcess { code, .. } => *code,
        }
    }

    /// Get the bare message, without code prefix
    pub fn message(&self) -> &str {
        match self {
            Self::ConfigLoad { message, .. }
            | Self::ConfigSave { message, .. }
            | Self::ItemProcess { message, .. } => message,
        }
    }

    /// Path involved in a configuration error, if any
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::ConfigLoad { path, .. } | Self::ConfigSave { path, .. } => path.as_deref(),
            Self::ItemProcess { .. } => None,
        }
    }

    /// Whether this is a load error caused by a missing file
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::ConfigLoad {
                code: ErrorCode::CONFIG_NOT_FOUND,
                ..
            }
        )
    }

    /// Get a user-friendly error message
    pub fn user_message(&self) -> String {
        match self {
            Self::ConfigLoad { message, path, .. } | Self::ConfigSave { message, path, .. } => {
                match path {
                    Some(p) => format!(
                        "{} ({}): {}",
                        describe_error_code(self.code()),
                        p.display(),
                        message
                    ),
                    None => format!("{}: {}", describe_error_code(self.code()), message),
                }
            }
            Self::ItemProcess { message, index, .. } => {
                format!("Item {} could not be processed: {}", index, message)
            }
        }
    }
}

/// Result type alias using DataprocError
pub type Result<T> = std::result::Result<T, DataprocError>;
