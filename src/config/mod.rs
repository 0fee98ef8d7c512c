pub mod cli;
pub mod file;

use crate::core::export::ExportFormat;
use crate::core::ConfigProvider;
use crate::utils::validation::{
    validate_non_empty_string, validate_positive_number, validate_range, validate_url, Validate,
};
use clap::Parser;

#[derive(Debug, Clone, Parser)]
#[command(name = "fipei")]
#[command(about = "Batch FIPE vehicle price lookups over HTTP or as a one-shot export")]
pub struct CliConfig {
    #[arg(
        long,
        env = "FIPE_API_BASE",
        default_value = "https://brasilapi.com.br/api/fipe/preco/v1"
    )]
    pub api_base: String,

    #[arg(long, env = "PORT", default_value = "3000")]
    pub port: u16,

    #[arg(long, env = "FIPE_CONCURRENCY", default_value = "5")]
    pub concurrency: usize,

    #[arg(
        long,
        value_delimiter = ',',
        help = "Resolve these codes once and export, instead of serving"
    )]
    pub codes: Vec<String>,

    #[arg(long, help = "File with codes as free text, merged after --codes")]
    pub input_file: Option<String>,

    #[arg(long, help = "Inline free text with codes, merged after the input file")]
    pub text: Option<String>,

    #[arg(long, default_value = "./output")]
    pub output_path: String,

    #[arg(long, value_enum, help = "Export format for batch mode (default: both)")]
    pub format: Option<ExportFormat>,

    #[arg(long, help = "TOML configuration file overlay")]
    pub config: Option<String>,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,
}

impl CliConfig {
    /// One-shot batch export instead of serving HTTP.
    pub fn is_batch_mode(&self) -> bool {
        !self.codes.is_empty() || self.input_file.is_some() || self.text.is_some()
    }
}

impl ConfigProvider for CliConfig {
    fn api_base(&self) -> &str {
        self.api_base.trim_end_matches('/')
    }

    fn concurrency(&self) -> usize {
        self.concurrency
    }

    fn port(&self) -> u16 {
        self.port
    }

    fn output_path(&self) -> &str {
        &self.output_path
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> crate::utils::error::Result<()> {
        validate_url("api_base", &self.api_base)?;
        validate_positive_number("concurrency", self.concurrency, 1)?;
        validate_range("concurrency", self.concurrency, 1, 100)?;
        validate_non_empty_string("output_path", &self.output_path)?;
        Ok(())
    }
}
