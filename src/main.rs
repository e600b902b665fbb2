use incident_intake::core::config::{Config, NotifierKind};
use incident_intake::core::middleware;
use incident_intake::core::openapi::{ApiDoc, SwaggerInfoModifier};
use incident_intake::features::auth::{CsrfValidator, SessionTokenStore};
use incident_intake::features::intake::routes as intake_routes;
use incident_intake::features::intake::services::{
    FixedWindowRateLimiter, IntakeService, LogRecorder,
};
use incident_intake::features::notifications::services::{
    IncidentNotifier, Mailer, TicketingClient,
};
use incident_intake::features::users::services::{
    InMemoryPageDirectory, InMemoryUserDirectory, PageDirectory, UserDirectory,
};
use axum::{middleware::from_fn, Router};
use std::sync::Arc;
use tower_http::request_id::{PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::{DefaultOnRequest, DefaultOnResponse, TraceLayer};
use tracing::Level;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::Modify;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

fn main() -> anyhow::Result<()> {
    // Build Tokio runtime with configurable worker threads
    let worker_threads = std::env::var("TOKIO_WORKER_THREADS")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or_else(|| {
            std::thread::available_parallelism()
                .map(|p| p.get())
                .unwrap_or(4)
        });

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(worker_threads)
        .max_blocking_threads(worker_threads * 4)
        .enable_all()
        .build()?;

    runtime.block_on(async_main(worker_threads))
}

async fn async_main(worker_threads: usize) -> anyhow::Result<()> {
    // Load .env file BEFORE initializing logger so RUST_LOG is available
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env().map_err(|e| anyhow::anyhow!(e))?;

    let available_cpus = std::thread::available_parallelism()
        .map(|p| p.get())
        .unwrap_or(1);
    tracing::info!(
        "System info: available_cpus={}, tokio_worker_threads={}, pid={}",
        available_cpus,
        worker_threads,
        std::process::id()
    );

    tracing::info!("Configuration loaded successfully");

    // Directories backing reporter resolution and page/revision lookup.
    // In-memory stores here; a deployment wires these to its own user and
    // content databases.
    let user_directory: Arc<dyn UserDirectory> = Arc::new(InMemoryUserDirectory::new());
    let page_directory: Arc<dyn PageDirectory> = Arc::new(InMemoryPageDirectory::new());
    tracing::info!("User and page directories initialized");

    // Session-bound CSRF tokens
    let token_store = Arc::new(SessionTokenStore::new());
    let csrf: Arc<dyn CsrfValidator> = token_store;
    tracing::info!("Session token store initialized");

    // Per-reporter fixed-window rate limiter
    let rate_limiter = Arc::new(FixedWindowRateLimiter::new(&config.rate_limit));
    tracing::info!(
        "Rate limiter initialized: {} reports per {}s",
        config.rate_limit.max_reports,
        config.rate_limit.window_secs
    );

    // Recorder for the internal moderation log
    let recorder = Arc::new(LogRecorder::new());

    // Notifier for immediate-threat reports
    let notifier: Arc<dyn IncidentNotifier> = match config.reporting.notifier {
        NotifierKind::Email => {
            tracing::info!("Notifier: email via {}", config.mailer.smtp_host);
            Arc::new(Mailer::new(
                config.mailer.clone(),
                config.app.base_url.clone(),
                config.reporting.developer_mode,
            ))
        }
        NotifierKind::Ticket => {
            tracing::info!("Notifier: ticketing via {}", config.ticketing.endpoint);
            Arc::new(
                TicketingClient::new(
                    config.ticketing.clone(),
                    config.app.base_url.clone(),
                    config.reporting.developer_mode,
                )
                .map_err(|e| anyhow::anyhow!(e))?,
            )
        }
    };

    // Intake pipeline
    let intake_service = Arc::new(IntakeService::new(
        config.reporting.clone(),
        Arc::clone(&user_directory),
        Arc::clone(&page_directory),
        Arc::clone(&csrf),
        rate_limiter,
        recorder,
        notifier,
    ));
    tracing::info!(
        "Intake service initialized (enabled={}, developer_mode={})",
        config.reporting.enabled,
        config.reporting.developer_mode
    );

    // Build application router with dynamic swagger config
    let swagger_modifier = SwaggerInfoModifier {
        title: config.swagger.title.clone(),
        version: config.swagger.version.clone(),
        description: config.swagger.description.clone(),
    };

    let mut openapi = ApiDoc::openapi();
    swagger_modifier.modify(&mut openapi);

    // Build swagger router
    let swagger = if let Some(credentials) = config.swagger.credentials() {
        tracing::info!("Swagger UI basic auth enabled");
        Router::new()
            .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", openapi))
            .layer(from_fn(middleware::basic_auth_middleware(Arc::new(
                credentials,
            ))))
    } else {
        tracing::info!("Swagger UI basic auth disabled (no credentials configured)");
        Router::new().merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", openapi))
    };

    // Report intake routes: every request carries a resolved reporter
    let report_routes = intake_routes::routes(intake_service).route_layer(
        axum::middleware::from_fn_with_state(
            Arc::clone(&user_directory),
            middleware::reporter_middleware,
        ),
    );

    // Simple health check endpoint (no auth required)
    async fn health_check() -> axum::http::StatusCode {
        axum::http::StatusCode::OK
    }
    let health_route = Router::new().route("/health", axum::routing::get(health_check));

    let app = Router::new()
        .merge(swagger)
        .merge(report_routes)
        .merge(health_route)
        .layer(middleware::cors_layer(
            config.app.cors_allowed_origins.clone(),
        ))
        // Propagate X-Request-Id to response headers
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(middleware::MakeSpanWithRequestId)
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        // Generate X-Request-Id using UUID v7 (or use client-provided one)
        .layer(SetRequestIdLayer::x_request_id(middleware::MakeRequestUuid));

    // Start server
    let addr = config.app.server_address();
    let socket_addr: std::net::SocketAddr = addr
        .parse()
        .map_err(|e| anyhow::anyhow!("Invalid address: {}", e))?;

    // Use socket2 for TCP listener configuration
    let socket = socket2::Socket::new(
        socket2::Domain::for_address(socket_addr),
        socket2::Type::STREAM,
        Some(socket2::Protocol::TCP),
    )?;

    socket.set_reuse_address(true)?;
    #[cfg(unix)]
    socket.set_reuse_port(true)?;
    socket.set_nodelay(true)?;

    socket.set_recv_buffer_size(256 * 1024)?;
    socket.set_send_buffer_size(256 * 1024)?;

    #[cfg(target_os = "linux")]
    {
        let keepalive = socket2::TcpKeepalive::new()
            .with_time(std::time::Duration::from_secs(60))
            .with_interval(std::time::Duration::from_secs(10))
            .with_retries(3);
        socket.set_tcp_keepalive(&keepalive)?;
    }
    #[cfg(not(target_os = "linux"))]
    {
        let keepalive = socket2::TcpKeepalive::new().with_time(std::time::Duration::from_secs(60));
        socket.set_tcp_keepalive(&keepalive)?;
    }

    socket.set_nonblocking(true)?;
    socket.bind(&socket_addr.into())?;
    socket.listen(65535)?;

    let listener = tokio::net::TcpListener::from_std(socket.into())?;
    tracing::info!("Server listening on {}", format!("http://{}", addr));
    tracing::info!(
        "Swagger UI available at {}",
        format!("http://{}/swagger-ui/", addr)
    );

    axum::serve(listener, app).await?;

    Ok(())
}
