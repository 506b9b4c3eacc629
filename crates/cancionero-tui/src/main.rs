mod action;
mod app;
mod app_state;
mod component;
mod components;
mod focus;
mod theme;
mod widgets;

use cancionero_core::config::Config;
use cancionero_core::platform;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // ── Command line: optional base URL override ─────────────────────────────
    let mut base_override: Option<String> = None;
    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "--help" | "-h" => {
                print_usage();
                return Ok(());
            }
            "--version" | "-V" => {
                println!("cancionero {}", env!("CARGO_PKG_VERSION"));
                return Ok(());
            }
            other if !other.starts_with('-') => {
                base_override = Some(other.to_string());
            }
            other => {
                anyhow::bail!("argumento desconocido: {} (prueba --help)", other);
            }
        }
    }

    let data_dir = platform::data_dir();
    std::fs::create_dir_all(&data_dir)?;

    let log_path = data_dir.join("tui.log");
    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)?;

    // Allow RUST_LOG override; default to debug for app code but suppress noisy
    // connection-level DEBUG from HTTP client internals (hyper_util, reqwest).
    let log_filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "debug,hyper_util=warn,reqwest=warn,hyper=warn".to_string());
    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_env_filter(log_filter.as_str())
        .with_ansi(false)
        .init();

    // Print log path to stderr so the operator can tail it immediately.
    eprintln!("cancionero log: {}", log_path.display());

    tracing::info!("cancionero starting…");

    // ── Load config ──────────────────────────────────────────────────────────
    let mut config = Config::load().unwrap_or_default();
    if let Some(url) = base_override {
        config.source.base_url = url;
    }
    tracing::info!("songs base url: {}", config.source.base_url);

    // ── Run TUI ──────────────────────────────────────────────────────────────
    let app = app::App::new(config);
    app.run().await?;

    Ok(())
}

fn print_usage() {
    println!("cancionero: visor de canciones para la terminal");
    println!();
    println!("uso: cancionero [BASE_URL]");
    println!();
    println!("pide <BASE_URL>/songs/index.json y luego la letra de cada canción;");
    println!("sin argumento usa el base_url de config.toml (http://127.0.0.1:8000");
    println!("de fábrica).");
}
