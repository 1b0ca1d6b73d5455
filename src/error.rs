//! Application errors and how they are shown to the player

use std::fmt;

/// Everything the shell can fail at
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Browser window is not available")]
    NoWindow,

    #[error("No canvas element with id `{0}`")]
    NoCanvas(String),

    #[error("Failed to create rendering surface: {0}")]
    Surface(#[from] wgpu::CreateSurfaceError),

    #[error("No compatible graphics adapter: {0}")]
    Adapter(#[from] wgpu::RequestAdapterError),

    #[error("Failed to create graphics device: {0}")]
    Device(#[from] wgpu::RequestDeviceError),

    #[error("There was a networking error in the connection to {url}")]
    Network { url: String, reason: Option<String> },

    #[error("Invalid settings: {0}")]
    Settings(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl AppError {
    /// Modal dialog describing this error
    pub fn dialog(&self) -> Dialog {
        match self {
            AppError::Network { .. } => Dialog::new("Connection Error", self.to_string()),
            AppError::Settings(_) => Dialog::new("Settings Error", self.to_string()),
            _ => Dialog::new("Startup Error", self.to_string()),
        }
    }
}

/// A single-button modal message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dialog {
    pub title: String,
    pub body: String,
    pub button: String,
}

impl Dialog {
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
            button: "OK".to_string(),
        }
    }
}

impl fmt::Display for Dialog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\n\n{}", self.title, self.body)
    }
}
