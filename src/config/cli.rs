use crate::config::DEFAULT_BREACH_API;
use crate::utils::error::Result;
use crate::utils::validation::{validate_path, validate_url, Validate};
use clap::Parser;

#[derive(Debug, Clone, Parser)]
#[command(name = "transform-breaches")]
#[command(about = "Fetch the breach catalogue and reshape it into a name-keyed lookup table")]
pub struct CliConfig {
    #[arg(long, default_value = DEFAULT_BREACH_API)]
    pub source_url: String,

    #[arg(long, default_value = "breaches.json")]
    pub output_path: String,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validate_url("source_url", &self.source_url)?;
        validate_path("output_path", &self.output_path)?;
        Ok(())
    }
}
