use crate::utils::error::{HimayaError, Result};
use crate::utils::validation::{validate_non_empty_string, validate_path, Validate};
use std::env;

#[derive(Debug, Clone)]
pub struct LambdaConfig {
    pub region: String,
    pub breach_table_bucket: Option<String>,
    pub breach_table_key: String,
    pub api_key_secret_id: Option<String>,
}

impl LambdaConfig {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            region: env::var("REGION").unwrap_or_else(|_| "eu-west-1".to_string()),
            breach_table_bucket: non_empty_var("BUCKET"),
            breach_table_key: env::var("BREACH_TABLE_KEY")
                .unwrap_or_else(|_| "breaches.json".to_string()),
            api_key_secret_id: non_empty_var("HIBP_API_KEY_SECRET_ID"),
        })
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

impl Validate for LambdaConfig {
    fn validate(&self) -> Result<()> {
        validate_aws_region("REGION", &self.region)?;

        if let Some(bucket) = &self.breach_table_bucket {
            validate_s3_bucket_name("BUCKET", bucket)?;
        }

        validate_path("BREACH_TABLE_KEY", &self.breach_table_key)?;

        tracing::info!("✅ Lambda configuration validation passed");
        Ok(())
    }
}

fn validate_s3_bucket_name(field_name: &str, bucket_name: &str) -> Result<()> {
    if bucket_name.len() < 3 || bucket_name.len() > 63 {
        return Err(HimayaError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: bucket_name.to_string(),
            reason: "S3 bucket name must be between 3 and 63 characters".to_string(),
        });
    }

    if !bucket_name
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '.')
    {
        return Err(HimayaError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: bucket_name.to_string(),
            reason: "S3 bucket name can only contain lowercase letters, numbers, hyphens, and dots"
                .to_string(),
        });
    }

    if bucket_name.starts_with('-') || bucket_name.ends_with('-') {
        return Err(HimayaError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: bucket_name.to_string(),
            reason: "S3 bucket name cannot start or end with a hyphen".to_string(),
        });
    }

    Ok(())
}

fn validate_aws_region(field_name: &str, region: &str) -> Result<()> {
    validate_non_empty_string(field_name, region)?;

    if !region
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
    {
        return Err(HimayaError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: region.to_string(),
            reason: "AWS region can only contain lowercase letters, numbers, and hyphens"
                .to_string(),
        });
    }

    Ok(())
}
