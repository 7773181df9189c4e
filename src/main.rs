use anyhow::Context;
use clap::Parser;
use content_analyzer::{cli, config, error, gateway, learning, scanner, server};
use cli::{Cli, Commands};
use config::Config;
use content_analyzer_common::AnalysisResult;
use dialoguer::Confirm;
use gateway::{AnalysisGateway, AnalysisOutcome};
use indicatif::{ProgressBar, ProgressStyle};
use learning::{FeedbackEvent, FileStorage, PreferenceStore};
use serde::Serialize;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// `analyze --output` で書き出す1件分
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AnalyzedUpload {
    file_name: String,
    upload_id: String,
    fallback: bool,
    analysis: AnalysisResult,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mut config = Config::load()?;
    if let Some(provider) = cli.ai_provider {
        config.provider = provider;
    }
    if let Some(dir) = cli.storage_dir.clone() {
        config.storage_dir = Some(dir);
    }

    let storage_dir = config.storage_dir();
    debug!("learning storage: {}", storage_dir.display());
    let store = Arc::new(PreferenceStore::new(Arc::new(FileStorage::new(storage_dir))));

    match cli.command {
        Commands::Serve { addr } => {
            let gateway = build_gateway(&config, store.clone());
            let addr: SocketAddr = addr
                .as_deref()
                .unwrap_or(&config.bind_addr)
                .parse()
                .context("invalid bind address")?;

            println!("🌐 content-analyzer - API server ({})", gateway.provider_name());
            let state = server::AppState {
                gateway: Arc::new(gateway),
                store,
            };
            server::serve(state, addr, config.max_body_bytes).await?;
        }

        Commands::Analyze { path, context, output, recursive, no_learn, feedback } => {
            let gateway = build_gateway(&config, store.clone());
            let options = AnalyzeOptions {
                context: context.as_deref(),
                no_learn,
                feedback,
            };
            let results = run_analyze(&gateway, &store, &config, &path, recursive, &options).await?;

            if let Some(output) = output {
                write_results(&output, &results)?;
                println!("✔ Results saved: {}", output.display());
            }

            println!("\n✅ Done");
        }

        Commands::Feedback { category, not_helpful, upload_id } => {
            let event = FeedbackEvent::new(upload_id, category, !not_helpful);
            let profile = store.record_feedback(&event)?;
            println!(
                "✔ Recorded {} feedback for \"{}\" (weight now {:.1})",
                if event.helpful { "👍" } else { "👎" },
                event.category,
                profile.category_weights.get(&event.category).copied().unwrap_or_default()
            );
        }

        Commands::Profile { context, json, reset } => {
            if reset {
                if store.reset()? {
                    println!("✔ Learning data cleared");
                } else {
                    println!("No learning data to clear");
                }
                return Ok(());
            }

            if json {
                println!("{}", serde_json::to_string_pretty(&store.load())?);
                return Ok(());
            }

            let stats = store.summary_stats();
            println!("Learning profile:");
            println!("  Level: {}", stats.level);
            println!("  Top category: {}", stats.top_category);
            println!("  Uploads: {}", stats.total_uploads);
            println!("  Categories: {}", stats.category_count);

            if context {
                let summary = store.build_personalization_summary();
                if summary.is_empty() {
                    println!("\n(no personalization yet: at least 3 uploads are needed)");
                } else {
                    println!("\n{}", summary);
                }
            }
        }

        Commands::Config { set_api_key, set_provider, show } => {
            // CLIの一時的な上書きを保存しないよう読み直す
            let mut stored = Config::load()?;

            if let Some(key) = set_api_key {
                stored.set_api_key(key)?;
                println!("✔ API key saved");
            }

            if let Some(provider) = set_provider {
                stored.set_provider(provider)?;
                println!("✔ Provider set to {}", provider);
            }

            if show {
                println!("Config ({}):", Config::config_path()?.display());
                println!("  Provider: {}", config.provider);
                println!("  Model: {}", config.model());
                println!("  Endpoint: {}", config.base_url());
                println!("  Max tokens: {}", config.max_tokens);
                println!("  Max image size: {}px", config.max_image_size);
                println!("  Bind address: {}", config.bind_addr);
                println!("  Storage: {}", config.storage_dir().display());
                println!("  API key: {}", if config.api_key().is_some() { "set" } else { "not set" });
            }
        }
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "content_analyzer={level},tower_http={level}",
            level = default_level
        ))
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn build_gateway(config: &Config, store: Arc<PreferenceStore>) -> AnalysisGateway {
    if config.api_key().is_none() {
        eprintln!(
            "⚠ {} is not set; analyses will return the fallback result",
            config.provider.api_key_env()
        );
    }
    AnalysisGateway::new(gateway::build_provider(config), store, config.max_tokens)
}

struct AnalyzeOptions<'a> {
    context: Option<&'a str>,
    no_learn: bool,
    feedback: bool,
}

async fn run_analyze(
    gateway: &AnalysisGateway,
    store: &PreferenceStore,
    config: &Config,
    path: &Path,
    recursive: bool,
    options: &AnalyzeOptions<'_>,
) -> anyhow::Result<Vec<AnalyzedUpload>> {
    println!("🔍 content-analyzer - analyze\n");

    println!("[1/3] Scanning images...");
    let images = scanner::scan_path(path, recursive)?;
    if images.is_empty() {
        return Err(error::AnalyzerError::NoImagesFound(path.display().to_string()).into());
    }
    println!("✔ Found {} image(s)\n", images.len());

    println!("[2/3] Encoding...");
    let encoded = scanner::encode_images(&images, config.max_image_size);
    println!("✔ Encoded\n");

    println!("[3/3] Analyzing via {}...", gateway.provider_name());
    let pb = ProgressBar::new(encoded.len() as u64);
    pb.set_style(
        ProgressStyle::with_template("{bar:30} {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );

    let mut results = Vec::new();
    for (info, data_uri) in encoded {
        pb.set_message(info.file_name.clone());

        let data_uri = match data_uri {
            Ok(uri) => uri,
            Err(e) => {
                pb.println(format!("⚠ Skipping {}: {}", info.file_name, e));
                pb.inc(1);
                continue;
            }
        };

        let outcome = gateway.analyze(&data_uri, &info.file_name, options.context).await;
        let upload_id = scanner::upload_id(&data_uri);
        pb.suspend(|| print_outcome(&info.file_name, &upload_id, &outcome));

        if !options.no_learn {
            store.record_upload(&outcome.analysis)?;
        }

        if options.feedback {
            let helpful = pb.suspend(|| {
                Confirm::new()
                    .with_prompt(format!("Was the analysis of {} helpful?", info.file_name))
                    .default(true)
                    .interact()
            })?;
            store.record_feedback(&FeedbackEvent::new(
                upload_id.clone(),
                outcome.analysis.category.clone(),
                helpful,
            ))?;
        }

        results.push(AnalyzedUpload {
            file_name: info.file_name,
            upload_id,
            fallback: outcome.is_fallback(),
            analysis: outcome.analysis,
        });
        pb.inc(1);
    }
    pb.finish_and_clear();

    let stats = store.summary_stats();
    println!(
        "✔ Analyzed {} image(s) · learning level: {} ({} uploads)",
        results.len(),
        stats.level,
        stats.total_uploads
    );

    Ok(results)
}

fn print_outcome(file_name: &str, upload_id: &str, outcome: &AnalysisOutcome) {
    let analysis = &outcome.analysis;
    println!("\n📸 {} [{}]", file_name, upload_id);
    if let Some(note) = outcome.note() {
        println!("  ⚠ {}", note);
    }
    println!("  Category: {}", analysis.category);

    for item in &analysis.items {
        println!(
            "  - {} x{} ({:.0}%)",
            item.name,
            item.quantity,
            item.confidence * 100.0
        );
    }

    if !analysis.price_comparison.is_empty() {
        println!("  Prices:");
        for quote in &analysis.price_comparison {
            println!(
                "    {}: {} per {} (total {}, {})",
                quote.store, quote.price, quote.per, quote.total, quote.availability
            );
        }
    }

    if !analysis.project_suggestions.is_empty() {
        println!("  Projects: {}", analysis.project_suggestions.join(" / "));
    }

    for rec in &analysis.recommendations {
        println!("  💡 {}", rec);
    }
}

fn write_results(output: &Path, results: &[AnalyzedUpload]) -> anyhow::Result<()> {
    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(results)?;
    std::fs::write(output, json)?;
    Ok(())
}
