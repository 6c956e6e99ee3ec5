use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tokio::net::TcpListener;
use tokio::signal;
use tracing::{error, info};

use capacity_console::cache::SnapshotCache;
use capacity_console::clients::AnalyticsClient;
use capacity_console::clients::drilldown::Drilldown;
use capacity_console::clients::refresh::Dashboard;
use capacity_console::export::{CommandClipboard, CommandLauncher};
use capacity_console::{AppState, config, routes};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("capacity_console=info")),
        )
        .init();

    let config_path = std::env::args()
        .skip(1)
        .zip(std::env::args().skip(2))
        .find_map(|(k, v)| {
            if k == "-config" || k == "--config" {
                Some(v)
            } else {
                None
            }
        })
        .or_else(|| std::env::args().nth(1).filter(|a| !a.starts_with('-')))
        .unwrap_or_else(|| "/etc/capacity-console/config.yaml".to_string());

    let cfg = config::Config::load(&PathBuf::from(&config_path)).unwrap_or_else(|e| {
        eprintln!("error loading config: {}", e);
        std::process::exit(1);
    });

    let client = AnalyticsClient::new(
        cfg.api_origin.clone(),
        Duration::from_secs(cfg.request_timeout_secs),
    )
    .unwrap_or_else(|e| {
        eprintln!("error building http client: {}", e);
        std::process::exit(1);
    });
    let client = Arc::new(client);

    let drilldown = Arc::new(Drilldown::new(client.clone()));
    let dashboard = Arc::new(Dashboard::new(
        client,
        SnapshotCache::new(cfg.cache_path.clone()),
        drilldown.clone(),
        cfg.tenants.clone(),
        cfg.refresh_hour,
    ));
    let cfg = Arc::new(cfg);

    // Shutdown signal
    let (shutdown_tx, shutdown_rx) = tokio::sync::watch::channel(());

    // Initial load, then the daily schedule
    let initial = dashboard.clone();
    tokio::spawn(async move {
        initial.refresh().await;
    });
    let scheduled = dashboard.clone();
    tokio::spawn(async move {
        scheduled.run_scheduler(shutdown_rx).await;
    });

    let state = AppState {
        dashboard,
        drilldown,
        config: cfg.clone(),
        clipboard: Arc::new(CommandClipboard::new(cfg.assistant.clipboard_command.clone())),
        launcher: Arc::new(CommandLauncher::new(cfg.assistant.launcher_command.clone())),
    };

    let router = routes::build_router(state);

    let listen_addr = cfg.listen_addr();
    let listener = TcpListener::bind(&listen_addr).await.unwrap_or_else(|e| {
        eprintln!("failed to bind {}: {}", listen_addr, e);
        std::process::exit(1);
    });

    info!(
        api = %cfg.api_origin,
        "capacity-console listening on {}", listen_addr
    );

    axum::serve(listener, router)
        .with_graceful_shutdown(async move {
            shutdown_signal().await;
            let _ = shutdown_tx.send(());
        })
        .await
        .unwrap_or_else(|e| {
            eprintln!("server error: {}", e);
            std::process::exit(1);
        });
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("failed to listen for ctrl+c: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                error!("failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
