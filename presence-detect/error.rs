use std::path::PathBuf;

#[derive(Debug)]
pub enum CollectError {
    Image { path: PathBuf, source: image::ImageError },
    ImageTooSmall { width: u32, height: u32, min_size: u32 },
    InvalidConfig(String),
}

impl std::fmt::Display for CollectError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CollectError::Image { path, source } => {
                write!(f, "Failed to read image {}: {}", path.display(), source)
            }
            CollectError::ImageTooSmall { width, height, min_size } => {
                write!(f, "Image {}x{} too small (minimum {}x{})", width, height, min_size, min_size)
            }
            CollectError::InvalidConfig(msg) => write!(f, "Invalid collector config: {}", msg),
        }
    }
}

impl std::error::Error for CollectError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CollectError::Image { source, .. } => Some(source),
            _ => None,
        }
    }
}

pub type CollectResult<T> = Result<T, CollectError>;
