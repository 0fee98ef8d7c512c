use clap::Parser;
use fipei::config::file::FileConfig;
use fipei::core::codes::merge_text_sources;
use fipei::core::export::{summarize, write_exports};
use fipei::core::ConfigProvider;
use fipei::utils::{logger, validation::Validate};
use fipei::{BatchEngine, CliConfig, FipeClient, LocalStorage};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut config = CliConfig::parse();

    logger::init_cli_logger(config.verbose);

    tracing::info!("Starting fipei");
    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    if let Some(path) = config.config.clone() {
        let file = FileConfig::from_file(&path)?;
        file.apply(&mut config);
        tracing::debug!("Applied configuration overlay from {}", path);
    }

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        eprintln!("❌ {}", e);
        std::process::exit(1);
    }

    if config.is_batch_mode() {
        if let Err(e) = run_batch_export(config).await {
            tracing::error!("❌ Batch export failed: {}", e);
            eprintln!("❌ {}", e);
            std::process::exit(1);
        }
    } else {
        fipei::server::serve(config).await?;
    }

    Ok(())
}

/// One-shot mode: resolve the given codes and write export artifacts instead
/// of serving HTTP.
async fn run_batch_export(config: CliConfig) -> fipei::Result<()> {
    let client = FipeClient::new(ConfigProvider::api_base(&config))?;
    let engine = BatchEngine::from_config(client, &config);

    let mut sources = Vec::new();
    if let Some(path) = &config.input_file {
        sources.push(LocalStorage::new(".").read_text(path).await?);
    }
    if let Some(text) = &config.text {
        sources.push(text.clone());
    }
    let source_refs: Vec<&str> = sources.iter().map(String::as_str).collect();
    let text = merge_text_sources(&source_refs);

    let response = engine.run(&config.codes, &text).await?;

    let summary = summarize(&response.results);
    tracing::info!(
        "{} de {} codigo(s) retornaram dados",
        summary.ok_count,
        summary.count
    );

    let storage = LocalStorage::new(config.output_path.clone());
    let written = write_exports(&storage, &response.results, config.format).await?;

    println!("✅ Consulta FIPE concluida!");
    for filename in &written {
        println!("📁 {}/{}", config.output_path, filename);
    }

    Ok(())
}
