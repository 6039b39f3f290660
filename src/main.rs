use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use dotenvy::dotenv;
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use board_scheduler::config::{DatabaseConfig, EnvironmentConfig, StoreBackend};
use board_scheduler::repositories::{MemoryStore, PgStore, Store};
use board_scheduler::{create_router, database, AppState};

#[tokio::main]
async fn main() -> Result<()> {
    // Cargar variables de entorno
    dotenv().ok();

    let config = EnvironmentConfig::from_env()?;

    // Configurar logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config.log_level.clone())),
        )
        .init();

    info!("🪵 Board Scheduler - API de planificación de tablas");
    info!("==================================================");

    let store: Arc<dyn Store> = match config.store_backend {
        StoreBackend::Postgres => {
            let db_config = DatabaseConfig::from_env()?;
            let pool = match database::connect(&db_config).await {
                Ok(pool) => pool,
                Err(e) => {
                    error!("❌ Error conectando a la base de datos: {}", e);
                    return Err(anyhow::anyhow!("Error de base de datos: {}", e));
                }
            };
            Arc::new(PgStore::new(pool))
        }
        StoreBackend::Memory => {
            info!("🧪 Usando almacenamiento en memoria");
            Arc::new(MemoryStore::new())
        }
    };

    if config.is_development() && config.cors_origins.is_empty() {
        warn!("⚠️ CORS abierto a cualquier origen (sin CORS_ORIGINS)");
    }

    let addr: SocketAddr = config.server_url().parse()?;
    let app = create_router(AppState::new(store, config));

    info!("🌐 Servidor iniciando en http://{}", addr);
    info!("🔍 Endpoints disponibles:");
    info!("   GET  /test - Endpoint de prueba");
    info!("📋 Solicitudes:");
    info!("   GET|POST /api/requests");
    info!("   GET  /api/requests/pending?limit=");
    info!("   GET  /api/requests/finished?limit=&offset=");
    info!("   GET|PUT|DELETE /api/requests/:id");
    info!("   POST /api/requests/:id/assignments");
    info!("   POST /api/requests/:id/tasks");
    info!("🚛 Tareas:");
    info!("   GET|POST /api/tasks");
    info!("   GET  /api/tasks/mine[/enriched]");
    info!("   GET  /api/tasks/by-date/:date[/enriched]");
    info!("   GET  /api/tasks/by-vehicle/:id");
    info!("   POST /api/tasks/:id/assign | /api/tasks/:id/complete");
    info!("   PUT|DELETE /api/tasks/:id/schedule");
    info!("   DELETE /api/tasks/:id");
    info!("🗓️  Timeline:");
    info!("   GET  /api/timeline/:date");
    info!("🚗 Vehículos y ubicaciones:");
    info!("   GET|POST /api/vehicles");
    info!("   GET|POST /api/locations");
    info!("👤 Sesión:");
    info!("   GET  /api/session/me");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!("❌ Servidor terminó con error: {}", e);
        return Err(e.into());
    }

    info!("👋 Servidor terminado");
    Ok(())
}

/// Señal de apagado graceful
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("No se pudo escuchar Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!("No se pudo instalar el handler de SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("🛑 Señal Ctrl+C recibida, apagando servidor...");
        },
        _ = terminate => {
            info!("🛑 Señal de terminación recibida, apagando servidor...");
        },
    }
}
