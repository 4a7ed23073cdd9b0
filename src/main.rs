use std::error::Error;
use std::sync::Arc;

use sqlx::postgres::{PgPool, PgPoolOptions};
use tokio::sync::watch;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use tracking_service::adapters::http::{api_router, with_middleware, RecordHandlers, RecordServices};
use tracking_service::adapters::postgres::MIGRATOR;
use tracking_service::adapters::{
    InMemoryEventBus, InMemoryRecordStore, PostgresRecordStore, RedisEventConsumer,
    RedisEventPublisher,
};
use tracking_service::application::{EventDispatcher, RecordSyncHandler};
use tracking_service::config::{AppConfig, DatabaseConfig, ServerConfig};
use tracking_service::domain::records::TrackedRecord;
use tracking_service::ports::{EventPublisher, EventSubscriber, RecordRepository};

type BoxError = Box<dyn Error + Send + Sync>;

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    let config = AppConfig::load()?;
    init_tracing(&config.server);
    config.validate()?;

    info!(
        environment = ?config.server.environment,
        storage = ?config.storage.backend,
        event_bus = config.event_bus.enabled,
        "Starting tracking service"
    );

    // Without Redis the in-process bus doubles as the sync event source.
    let local_bus = Arc::new(InMemoryEventBus::routing_only());
    let publisher: Arc<dyn EventPublisher> = if config.event_bus.enabled {
        let redis =
            RedisEventPublisher::connect(&config.event_bus.url, config.event_bus.exchange.clone())
                .await?;
        info!(exchange = %config.event_bus.exchange, "Publishing events to Redis");
        Arc::new(redis)
    } else {
        warn!("Event bus disabled; events stay in process");
        local_bus.clone()
    };
    let (dispatcher, dispatcher_task) = EventDispatcher::spawn(publisher);

    let pool = if config.storage.uses_postgres() {
        Some(connect_database(&config.database).await?)
    } else {
        None
    };

    let services = RecordServices {
        sleep: handlers(pool.as_ref(), &dispatcher),
        physical_activities: handlers(pool.as_ref(), &dispatcher),
        body_fats: handlers(pool.as_ref(), &dispatcher),
        logs: handlers(pool.as_ref(), &dispatcher),
        environments: handlers(pool.as_ref(), &dispatcher),
    };

    let (consumer_stop, consumer_stop_rx) = watch::channel(false);
    let consumer_task = if config.event_bus.enabled {
        let consumer =
            RedisEventConsumer::new(&config.event_bus.url, config.event_bus.exchange.clone())?;
        subscribe_all_sync(&consumer, &services);
        Some(tokio::spawn(async move {
            if let Err(e) = consumer.run(consumer_stop_rx).await {
                warn!(error = %e, "Redis consumer stopped");
            }
        }))
    } else {
        subscribe_all_sync(local_bus.as_ref(), &services);
        None
    };

    let app = with_middleware(api_router(services), &config.server);
    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "Listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Some(task) = consumer_task {
        let _ = consumer_stop.send(true);
        task.await?;
    }

    info!("Draining pending events");
    if let Err(e) = dispatcher.flush().await {
        warn!(error = %e, "Event flush failed during shutdown");
    }
    dispatcher.shutdown();
    dispatcher_task.await?;

    if let Some(pool) = pool {
        pool.close().await;
    }
    Ok(())
}

fn init_tracing(server: &ServerConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&server.log_level));
    let registry = tracing_subscriber::registry().with(filter);

    if server.is_production() {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_current_span(false))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_target(true).compact())
            .init();
    }
}

async fn connect_database(config: &DatabaseConfig) -> Result<PgPool, BoxError> {
    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(config.acquire_timeout())
        .connect(&config.url)
        .await?;

    if config.run_migrations {
        MIGRATOR.run(&pool).await?;
        info!("Database migrations applied");
    }
    Ok(pool)
}

fn handlers<R: TrackedRecord>(
    pool: Option<&PgPool>,
    dispatcher: &EventDispatcher,
) -> RecordHandlers<R> {
    let repository: Arc<dyn RecordRepository<R>> = match pool {
        Some(pool) => Arc::new(PostgresRecordStore::<R>::new(pool.clone())),
        None => Arc::new(InMemoryRecordStore::<R>::new()),
    };
    RecordHandlers::new(repository, dispatcher.clone())
}

fn subscribe_all_sync(bus: &dyn EventSubscriber, services: &RecordServices) {
    subscribe_sync(bus, &services.sleep);
    subscribe_sync(bus, &services.physical_activities);
    subscribe_sync(bus, &services.body_fats);
    subscribe_sync(bus, &services.logs);
    subscribe_sync(bus, &services.environments);
}

fn subscribe_sync<R: TrackedRecord>(bus: &dyn EventSubscriber, handlers: &RecordHandlers<R>) {
    let routing_key = RecordSyncHandler::<R>::routing_key();
    bus.subscribe(
        &routing_key,
        Arc::new(RecordSyncHandler::new(handlers.add_handler())),
    );
    info!(routing_key = %routing_key, "Sync handler subscribed");
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
