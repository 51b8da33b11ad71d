use crate::utils::codec::base64_decode_standard;
use crate::utils::error::{HimayaError, Result};
use aws_lambda_events::encodings::Body;
use http::header::CONTENT_TYPE;
use http::HeaderValue;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub use aws_lambda_events::apigw::{
    ApiGatewayProxyRequest as GatewayEvent, ApiGatewayProxyResponse as ResponseEnvelope,
};

// HeaderName requires lowercase; lookups stay case-insensitive
const ERROR_TYPE_HEADER: &str = "x-amzn-errortype";

/// Accessors the handlers need on an API Gateway proxy request. Each one fails
/// with the error the caller gets back in the response envelope.
pub trait GatewayRequestExt {
    fn require_method(&self, expected: &str) -> Result<()>;
    fn require_body(&self) -> Result<String>;
    fn query_param(&self, name: &str) -> Result<&str>;
}

impl GatewayRequestExt for GatewayEvent {
    fn require_method(&self, expected: &str) -> Result<()> {
        if self.http_method.as_str().eq_ignore_ascii_case(expected) {
            return Ok(());
        }

        Err(HimayaError::InvalidMethod {
            message: format!(
                "This lambda function only accepts the {} HTTP method.",
                expected
            ),
        })
    }

    /// 取得請求內容；若 gateway 標記為 base64 則先解碼
    fn require_body(&self) -> Result<String> {
        let body = self
            .body
            .as_deref()
            .filter(|b| !b.trim().is_empty())
            .ok_or_else(|| HimayaError::decode("The request body is missing."))?;

        if self.is_base64_encoded {
            base64_decode_standard(body)
        } else {
            Ok(body.to_string())
        }
    }

    fn query_param(&self, name: &str) -> Result<&str> {
        self.query_string_parameters.first(name).ok_or_else(|| {
            HimayaError::decode(format!("The query string parameter '{}' is missing.", name))
        })
    }
}

/// Invocation metadata echoed in response bodies as `context_data`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InvocationContext {
    pub function_name: String,
    pub function_version: String,
    pub invoked_function_arn: String,
    pub memory_limit_in_mb: i32,
    pub aws_request_id: String,
    pub log_group_name: String,
    pub log_stream_name: String,
}

#[cfg(feature = "lambda")]
impl From<&lambda_runtime::Context> for InvocationContext {
    fn from(context: &lambda_runtime::Context) -> Self {
        Self {
            function_name: context.env_config.function_name.clone(),
            function_version: context.env_config.version.clone(),
            invoked_function_arn: context.invoked_function_arn.clone(),
            memory_limit_in_mb: context.env_config.memory,
            aws_request_id: context.request_id.clone(),
            log_group_name: context.env_config.log_group.clone(),
            log_stream_name: context.env_config.log_stream.clone(),
        }
    }
}

pub fn json_response<T: Serialize>(body: &T) -> Result<ResponseEnvelope> {
    let mut response = ResponseEnvelope::default();
    response.status_code = 200;
    response
        .headers
        .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    response.body = Some(Body::Text(serde_json::to_string(body)?));
    Ok(response)
}

/// Plain-text error response; the error code doubles as `x-amzn-ErrorType`.
pub fn error_response(error: &HimayaError) -> ResponseEnvelope {
    let mut response = ResponseEnvelope::default();
    response.status_code = i64::from(error.status_code());
    response
        .headers
        .insert(CONTENT_TYPE, HeaderValue::from_static("text/plain"));
    response
        .headers
        .insert(ERROR_TYPE_HEADER, HeaderValue::from_static(error.code()));
    response.body = Some(Body::Text(format!("{}: {}", error.code(), error)));
    response
}

pub fn into_response<T: Serialize>(result: Result<T>) -> ResponseEnvelope {
    match result.and_then(|body| json_response(&body)) {
        Ok(response) => response,
        Err(e) => {
            if e.is_client_error() {
                tracing::warn!("⚠️ Request rejected: {} ({})", e, e.code());
            } else {
                tracing::error!("❌ Request failed: {} ({})", e, e.code());
            }
            error_response(&e)
        }
    }
}

pub fn response_text(response: &ResponseEnvelope) -> &str {
    match &response.body {
        Some(Body::Text(text)) => text,
        Some(Body::Binary(bytes)) => std::str::from_utf8(bytes).unwrap_or_default(),
        _ => "",
    }
}

// 僅回傳非敏感的執行環境變數
const ECHOED_ENVIRONMENT: &[&str] = &[
    "AWS_REGION",
    "AWS_EXECUTION_ENV",
    "AWS_LAMBDA_FUNCTION_NAME",
    "AWS_LAMBDA_FUNCTION_VERSION",
    "AWS_LAMBDA_FUNCTION_MEMORY_SIZE",
    "REGION",
    "BUCKET",
];

pub fn environment_snapshot<I>(vars: I) -> BTreeMap<String, String>
where
    I: IntoIterator<Item = (String, String)>,
{
    vars.into_iter()
        .filter(|(key, _)| ECHOED_ENVIRONMENT.contains(&key.as_str()))
        .collect()
}
