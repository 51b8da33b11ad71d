use clap::Parser;
use himaya::config::BreachApiConfig;
use himaya::utils::{logger, validation::Validate};
use himaya::{BreachTable, CliConfig, HibpClient, LocalStorage};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = CliConfig::parse();

    // 初始化日誌
    logger::init_cli_logger(config.verbose);

    tracing::info!("Starting breach table transform");
    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        eprintln!("❌ {}", e);
        std::process::exit(1);
    }

    let client = HibpClient::new(&BreachApiConfig {
        base_url: config.source_url.clone(),
        ..BreachApiConfig::default()
    })?;

    let catalogue = match client.all_breaches().await {
        Ok(catalogue) => catalogue,
        Err(e) => {
            tracing::error!("❌ Failed to fetch breach catalogue: {} ({})", e, e.code());
            eprintln!("❌ {}", e);
            std::process::exit(2);
        }
    };
    tracing::info!("📥 Fetched {} breaches", catalogue.len());

    let table = BreachTable::from_catalogue(catalogue);

    // 輸出路徑拆成目錄與檔名交給 LocalStorage
    let output = std::path::Path::new(&config.output_path);
    let base_path = output
        .parent()
        .map(|p| p.to_string_lossy().into_owned())
        .unwrap_or_default();
    let file_name = output
        .file_name()
        .map(|f| f.to_string_lossy().into_owned())
        .unwrap_or_else(|| "breaches.json".to_string());

    let storage = LocalStorage::new(base_path);
    table.save(&storage, &file_name).await?;

    println!("✅ Breach table written: {} entries", table.len());
    println!("📁 Output saved to: {}", config.output_path);

    Ok(())
}
