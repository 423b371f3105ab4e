use thiserror::Error;

#[derive(Debug, Error)]
pub enum InferenceError {
    #[error("failed to read image data: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to decode image: {0}")]
    Decode(#[from] image::ImageError),
    #[error("unsupported image format: {0}")]
    UnsupportedFormat(String),
    #[error("preprocessing failed: {0}")]
    Preprocessing(String),
    #[error("model error: {0}")]
    Model(tract_onnx::prelude::TractError),
    #[error("model returned no output values")]
    EmptyOutput,
}

impl InferenceError {
    /// Failures caused by the uploaded bytes rather than the server.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            InferenceError::Io(_)
                | InferenceError::Decode(_)
                | InferenceError::UnsupportedFormat(_)
        )
    }
}
