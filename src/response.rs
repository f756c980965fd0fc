use serde::Serialize;

/// Envelope wrapped around every business response, success and error alike.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub status: &'static str,
    pub data: Option<T>,
    pub message: String,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T, message: &str) -> Self {
        Self {
            status: "success",
            data: Some(data),
            message: message.into(),
        }
    }
}

impl ApiResponse<()> {
    /// Success with no payload (delete confirmations).
    pub fn success_message(message: &str) -> Self {
        Self {
            status: "success",
            data: None,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: "error",
            data: None,
            message: message.into(),
        }
    }
}
