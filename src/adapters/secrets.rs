use crate::utils::error::{HimayaError, Result};
use aws_sdk_secretsmanager::error::DisplayErrorContext;
use aws_sdk_secretsmanager::Client as SecretsClient;
use secrecy::SecretString;

/// Resolves the breach API key from Secrets Manager. The secret may hold the
/// raw key or a JSON object with an `api_key` field.
pub async fn load_api_key(client: &SecretsClient, secret_id: &str) -> Result<SecretString> {
    let output = client
        .get_secret_value()
        .secret_id(secret_id)
        .send()
        .await
        .map_err(|e| HimayaError::upstream("Secrets Manager", DisplayErrorContext(&e).to_string()))?;

    let raw = output
        .secret_string()
        .ok_or_else(|| HimayaError::MissingConfigError {
            field: format!("secret string of {}", secret_id),
        })?;

    Ok(SecretString::from(parse_secret(raw)))
}

fn parse_secret(raw: &str) -> String {
    match serde_json::from_str::<serde_json::Value>(raw) {
        Ok(serde_json::Value::Object(map)) => map
            .get("api_key")
            .and_then(|v| v.as_str())
            .unwrap_or(raw)
            .to_string(),
        _ => raw.trim().to_string(),
    }
}
