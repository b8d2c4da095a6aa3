use std::time::Instant;

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use webpanel_core::{CheckButton, Page, RadioGroup, Slider, Span};
use webpanel_server::{PanelHandle, PanelServer, ServerConfig};

/// Environment variable naming a JSON configuration file.
const CONFIG_ENV: &str = "WEBPANEL_CONFIG";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,webpanel_server=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("webpanel demo starting...");

    let config = load_config()?;
    let mut page = build_page(&config.title);
    if let Some(extra) = &config.head_extra {
        page = page.with_head(extra.clone());
    }

    let bind_addr = config.bind_addr;
    let server = PanelServer::new(config, page);
    let handle = server.handle();

    let server_handle = tokio::spawn(async move {
        if let Err(e) = server.run().await {
            tracing::error!("Panel server error: {}", e);
        }
    });

    let demo_handle = tokio::spawn(async move {
        drive_demo(handle).await;
    });

    tracing::info!("Panel ready at http://{}", bind_addr);

    tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Received Ctrl+C, shutting down...");
        }
        _ = server_handle => {
            tracing::warn!("Panel server stopped");
        }
        _ = demo_handle => {
            tracing::warn!("Demo driver stopped");
        }
    }

    tracing::info!("Shutdown complete");
    Ok(())
}

/// Defaults, overridden by the file named in `WEBPANEL_CONFIG` if set.
fn load_config() -> anyhow::Result<ServerConfig> {
    let Ok(path) = std::env::var(CONFIG_ENV) else {
        return Ok(ServerConfig::default());
    };
    let text = std::fs::read_to_string(&path)
        .with_context(|| format!("reading configuration from {path}"))?;
    let config = ServerConfig::from_json(&text)
        .with_context(|| format!("parsing configuration in {path}"))?;
    tracing::info!("Loaded configuration from {}", path);
    Ok(config)
}

fn build_page(title: &str) -> Page {
    Page::new(
        title.to_string(),
        vec![
            Span::new("uptime", "0 s").into(),
            Slider::new("level", 0, 100, 50).into(),
            Span::new("level_echo", "50").into(),
            CheckButton::new("led", "LED", false).into(),
            RadioGroup::new("mode")
                .option("mode_auto", "Automatic")
                .option("mode_manual", "Manual")
                .selected("mode_auto")
                .into(),
            Span::new("blink", "tick").into(),
        ],
    )
}

/// Server-side application logic: counts uptime, mirrors the slider into a
/// span, and toggles a span's visibility once per second.
async fn drive_demo(handle: PanelHandle) {
    let mut interval = tokio::time::interval(tokio::time::Duration::from_secs(1));
    let started = Instant::now();
    let mut last_level = None;

    loop {
        interval.tick().await;
        let seconds = started.elapsed().as_secs();

        let level = handle
            .update(|page, clock| {
                page.set_text("uptime", format!("{seconds} s"), clock);
                page.set_visible("blink", seconds % 2 == 0, clock);

                let level = page.slider_mut("level").map(|slider| slider.value());
                if let Some(level) = level {
                    if last_level != Some(level) {
                        page.set_text("level_echo", level.to_string(), clock);
                    }
                }
                level
            })
            .await;

        if level.is_none() {
            tracing::error!("Demo page is missing its slider");
            break;
        }
        if level != last_level {
            tracing::debug!("Slider level now {:?}", level);
            last_level = level;
        }
    }
}
