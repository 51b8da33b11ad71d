use thiserror::Error;

#[derive(Error, Debug)]
pub enum HimayaError {
    #[error("{message}")]
    InvalidMethod { message: String },

    #[error("The promo code {code} is not valid.")]
    InvalidPromoCode { code: String },

    #[error("{message}")]
    InvalidEmail { message: String },

    #[error("The mobile number provided {value} is not valid.")]
    InvalidPhoneNumber { value: String },

    #[error("The account {value} is neither an email address nor a mobile number.")]
    AmbiguousAccountType { value: String },

    #[error("{message}")]
    DecodeError { message: String },

    #[error("{service} request failed: {message}")]
    UpstreamError { service: String, message: String },

    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Template error: {0}")]
    TemplateError(#[from] tera::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },
}

impl HimayaError {
    pub fn decode(message: impl Into<String>) -> Self {
        HimayaError::DecodeError {
            message: message.into(),
        }
    }

    pub fn upstream(service: impl Into<String>, message: impl Into<String>) -> Self {
        HimayaError::UpstreamError {
            service: service.into(),
            message: message.into(),
        }
    }

    /// HTTP 狀態碼 (回傳給 gateway 的 statusCode)
    pub fn status_code(&self) -> u16 {
        match self {
            HimayaError::InvalidMethod { .. }
            | HimayaError::InvalidPromoCode { .. }
            | HimayaError::InvalidEmail { .. }
            | HimayaError::InvalidPhoneNumber { .. }
            | HimayaError::AmbiguousAccountType { .. } => 422,
            HimayaError::DecodeError { .. } => 400,
            HimayaError::UpstreamError { .. } | HimayaError::ApiError(_) => 502,
            HimayaError::IoError(_)
            | HimayaError::SerializationError(_)
            | HimayaError::TemplateError(_)
            | HimayaError::ConfigError { .. }
            | HimayaError::InvalidConfigValueError { .. }
            | HimayaError::MissingConfigError { .. } => 500,
        }
    }

    /// Machine-readable code, also sent as the `x-amzn-ErrorType` header.
    pub fn code(&self) -> &'static str {
        match self {
            HimayaError::InvalidMethod { .. } => "Invalid HTTP Method",
            HimayaError::InvalidPromoCode { .. } => "Invalid Promo Code",
            HimayaError::InvalidEmail { .. } => "Invalid Email Address",
            HimayaError::InvalidPhoneNumber { .. } => "Invalid Mobile Number",
            HimayaError::AmbiguousAccountType { .. } => "Ambiguous Account Type",
            HimayaError::DecodeError { .. } => "Invalid Payload",
            HimayaError::UpstreamError { .. } | HimayaError::ApiError(_) => "Upstream Failure",
            _ => "Internal Error",
        }
    }

    pub fn is_client_error(&self) -> bool {
        (400..500).contains(&self.status_code())
    }
}

pub type Result<T> = std::result::Result<T, HimayaError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_errors_map_to_422() {
        let err = HimayaError::InvalidPromoCode {
            code: "FREE".to_string(),
        };
        assert_eq!(err.status_code(), 422);
        assert_eq!(err.code(), "Invalid Promo Code");
        assert_eq!(err.to_string(), "The promo code FREE is not valid.");
        assert!(err.is_client_error());
    }

    #[test]
    fn test_decode_and_upstream_statuses() {
        assert_eq!(HimayaError::decode("bad base64").status_code(), 400);
        assert_eq!(HimayaError::decode("bad base64").code(), "Invalid Payload");

        let upstream = HimayaError::upstream("breach API", "status 503");
        assert_eq!(upstream.status_code(), 502);
        assert_eq!(upstream.code(), "Upstream Failure");
        assert!(!upstream.is_client_error());
    }

    #[test]
    fn test_server_side_serialization_errors_are_internal() {
        let err: HimayaError = serde_json::from_str::<serde_json::Value>("{")
            .unwrap_err()
            .into();
        assert_eq!(err.status_code(), 500);
        assert_eq!(err.code(), "Internal Error");
    }

    #[test]
    fn test_config_errors_are_internal() {
        let err = HimayaError::MissingConfigError {
            field: "HIBP_API_KEY".to_string(),
        };
        assert_eq!(err.status_code(), 500);
        assert_eq!(err.code(), "Internal Error");
    }
}
