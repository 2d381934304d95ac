use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use suzume::config::Config;
use suzume::resize::encoder::EncoderRegistry;
use suzume::resize::processor::ResizeService;

/// Suzume - small HTTP service that resizes uploaded images
#[derive(Parser, Debug)]
#[command(name = "suzume")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "config.yaml")]
    config: PathBuf,
}

#[tokio::main]
async fn main() {
    // Initialize logging subsystem
    suzume::logging::init_subscriber().expect("Failed to initialize logging subsystem");

    // Parse command-line arguments
    let args = Args::parse();

    // Load configuration, falling back to defaults when no file exists
    let config = Config::load_or_default(&args.config).unwrap_or_else(|e| {
        eprintln!("Failed to load configuration: {}", e);
        std::process::exit(1);
    });

    tracing::info!(
        config_file = %args.config.display(),
        server_address = %config.server.address,
        server_port = config.server.port,
        policy = ?config.resize.mode,
        kernel = config.resize.kernel.as_str(),
        jpeg_quality = config.resize.jpeg_quality,
        "Configuration loaded successfully"
    );

    // Build the pipeline with its dependencies injected
    let registry = EncoderRegistry::with_defaults(config.resize.jpeg_quality);
    let service = Arc::new(ResizeService::new(
        config.resize.policy(),
        config.resize.kernel,
        registry,
    ));

    let app = suzume::server::router(service, config.server.max_upload_size);

    let listen_addr = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&listen_addr)
        .await
        .unwrap_or_else(|e| {
            eprintln!("Failed to bind {}: {}", listen_addr, e);
            std::process::exit(1);
        });

    tracing::info!(address = %listen_addr, "Starting Suzume image resizer");

    // Serve forever (blocks until shutdown)
    axum::serve(listener, app).await.expect("server error");
}
