// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

use anyhow::{Context, Result};
use clap::Parser;
use std::sync::Arc;
use tracing::info;

use tutka_scanner::api::{create_router, ApiState};
use tutka_scanner::config::AppConfig;
use tutka_scanner::dns::DnsClient;
use tutka_scanner::http_client::HttpClient;

#[derive(Parser, Debug)]
#[command(name = "tutka", about = "Web exposure and compliance scanner")]
struct Cli {
    /// Bind host (overrides TUTKA_BIND_HOST)
    #[arg(long)]
    host: Option<String>,

    /// Bind port (overrides TUTKA_PORT)
    #[arg(long)]
    port: Option<u16>,
}

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    print!("\x1b[92m");
    println!("   ______      __  __");
    println!("  /_  __/_  __/ /_/ /______ _");
    println!("   / / / / / / __/ //_/ __ `/");
    print!("\x1b[91m");
    println!("  / / / /_/ / /_/ ,< / /_/ /");
    println!(" /_/  \\__,_/\\__/_/|_|\\__,_/");
    print!("\x1b[0m");
    println!();
    print!("\x1b[1m\x1b[97m");
    println!("     Web Exposure & Compliance Scanner");
    print!("\x1b[0m");
    println!();

    let cli = Cli::parse();

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(num_cpus::get())
        .thread_name("tutka-worker")
        .enable_all()
        .build()?;

    runtime.block_on(async_main(cli))
}

async fn async_main(cli: Cli) -> Result<()> {
    let mut config = AppConfig::from_env();
    if let Some(host) = cli.host {
        config.bind_host = host;
    }
    if let Some(port) = cli.port {
        config.port = port;
    }

    let client = Arc::new(
        HttpClient::new(config.primary_timeout_secs)?
            .with_max_body_size(config.max_body_bytes),
    );
    let dns = Arc::new(DnsClient::new().context("Failed to create DNS client")?);

    let bind_addr = format!("{}:{}", config.bind_host, config.port);
    let state = Arc::new(ApiState {
        client,
        dns,
        config,
    });

    let router = create_router(state);

    info!("[SUCCESS] Tutka listening on {}", bind_addr);

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", bind_addr))?;

    axum::serve(listener, router)
        .await
        .context("Server terminated")?;

    Ok(())
}
