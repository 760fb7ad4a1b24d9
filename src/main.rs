use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use dotenvy::dotenv;
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use fleet_telematics::config::{DatabaseConfig, EnvironmentConfig, StorageBackend};
use fleet_telematics::database::DatabaseConnection;
use fleet_telematics::repositories::{
    InMemoryVehicleRepository, PgVehicleRepository, VehicleRepository,
};
use fleet_telematics::state::AppState;
use fleet_telematics::{create_app, SERVICE_NAME};

#[tokio::main]
async fn main() -> Result<()> {
    // Cargar variables de entorno
    dotenv().ok();

    // Configurar logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("🚗 {}", SERVICE_NAME);
    info!("================================================");

    let config = EnvironmentConfig::from_env()?;
    info!("⚙️ Entorno: {} | almacén: {}", config.environment, config.storage_backend);

    // Inicializar almacén de vehículos
    let (repository, db_connection): (Arc<dyn VehicleRepository>, Option<DatabaseConnection>) =
        match config.storage_backend {
            StorageBackend::Postgres => {
                let db_config = DatabaseConfig::from_env()?;
                let connection = match DatabaseConnection::connect(&db_config).await {
                    Ok(conn) => conn,
                    Err(e) => {
                        error!("❌ Error conectando a la base de datos: {:#}", e);
                        return Err(e);
                    }
                };
                let repository: Arc<dyn VehicleRepository> =
                    Arc::new(PgVehicleRepository::new(connection.pool().clone()));
                (repository, Some(connection))
            }
            StorageBackend::Memory => {
                info!("🧪 Usando almacén en memoria, los datos no persisten");
                let repository: Arc<dyn VehicleRepository> =
                    Arc::new(InMemoryVehicleRepository::new());
                (repository, None)
            }
        };

    let addr: SocketAddr = config
        .server_url()
        .parse()
        .with_context(|| format!("Dirección de servidor inválida: {}", config.server_url()))?;
    let app = create_app(AppState::new(repository, config));

    info!("🌐 Servidor iniciando en http://{}", addr);
    info!("🔍 Endpoints disponibles:");
    info!("   GET    /health - Health check");
    info!("   POST   /api/vehicles - Crear vehículo");
    info!("   GET    /api/vehicles - Listar vehículos");
    info!("   GET    /api/vehicles/statistics - Estadísticas de flota");
    info!("   GET    /api/vehicles/area - Vehículos en un área");
    info!("   GET    /api/vehicles/type/:type - Vehículos por tipo");
    info!("   GET    /api/vehicles/:id - Obtener vehículo");
    info!("   PUT    /api/vehicles/:id - Reemplazar vehículo");
    info!("   PATCH  /api/vehicles/:id/location - Actualizar posición");
    info!("   DELETE /api/vehicles/:id - Eliminar vehículo");

    // Iniciar servidor en background
    let server_handle = tokio::spawn(async move {
        let listener = tokio::net::TcpListener::bind(addr).await?;
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| {
                error!("❌ Error del servidor: {}", e);
                e
            })
    });

    // Esperar a que el servidor termine
    if let Err(e) = server_handle.await? {
        error!("❌ Servidor terminó con error: {}", e);
    }

    if let Some(connection) = db_connection {
        connection.close().await;
    }

    info!("👋 Servidor terminado");
    Ok(())
}

/// Señal de apagado graceful
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("❌ No se pudo instalar el handler de Ctrl+C: {}", e);
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
                error!("❌ No se pudo instalar el handler de SIGTERM: {}", e);
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
