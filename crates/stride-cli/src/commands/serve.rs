//! Server command implementation

use std::path::Path;

use anyhow::{Context, Result};
use stride_core::Settings;

pub async fn cmd_serve(
    settings: Settings,
    host: &str,
    port: u16,
    static_dir: Option<&Path>,
    allowed_origins: Vec<String>,
) -> Result<()> {
    println!("🚀 Starting Stride web server...");
    println!("   Listening: http://{}:{}", host, port);
    if let Some(dir) = static_dir {
        println!("   Static files: {}", dir.display());
    }
    if !allowed_origins.is_empty() {
        println!("   CORS origins: {}", allowed_origins.join(", "));
    }
    if host != "127.0.0.1" && host != "localhost" {
        println!();
        println!("   ⚠️  No authentication - only expose to trusted networks!");
    }
    println!();
    println!("   Press Ctrl+C to stop");

    let static_dir_str = match static_dir {
        Some(p) => Some(
            p.to_str()
                .context("static_dir path must be valid UTF-8")?,
        ),
        None => None,
    };

    let config = stride_server::ServerConfig { allowed_origins };
    stride_server::serve(settings, host, port, static_dir_str, config).await?;

    Ok(())
}
