//! services/api/src/bin/api.rs

use api_lib::{
    adapters::{db::PgStore, files::FsBlobStore},
    config::Config,
    error::ApiError,
    web::{
        auth::{change_password_handler, login_handler, logout_handler, signup_handler},
        media::{delete_media_handler, upload_media_handler},
        public::public_guide_handler,
        require_auth,
        sections::{
            create_section_handler, delete_section_handler, get_section_handler,
            update_section_handler,
        },
        users::{
            create_user_handler, delete_user_handler, list_users_handler,
            reset_password_handler, update_user_handler,
        },
        welcomebooks::{
            access_status_handler, activate_access_handler, create_welcomebook_handler,
            deactivate_access_handler, delete_welcomebook_handler, get_welcomebook_handler,
            list_welcomebooks_handler, transfer_welcomebook_handler, update_welcomebook_handler,
            visit_count_handler,
        },
        ApiDoc, AppState,
    },
};
use axum::{
    extract::DefaultBodyLimit,
    http::{
        header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE},
        HeaderValue, Method,
    },
    middleware as axum_middleware,
    routing::{delete, get, patch, post},
    Router,
};
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, services::ServeDir};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

// Video uploads run up to 50 MiB; leave headroom for multipart framing.
const MAX_BODY_BYTES: usize = 52 * 1024 * 1024;

#[tokio::main]
async fn main() -> Result<(), ApiError> {
    // --- 1. Load Configuration & Set Up Logging ---
    let config = Arc::new(Config::from_env()?);
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(config.log_level.to_string()))
        .with(tracing_subscriber::fmt::layer())
        .init();
    info!("Configuration loaded. Starting server...");

    // --- 2. Connect to Database & Run Migrations ---
    info!("Connecting to database...");
    let db_pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&config.database_url)
        .await?;
    let store = Arc::new(PgStore::new(db_pool.clone()));
    info!("Running database migrations...");
    store.run_migrations().await?;
    info!("Database migrations complete.");

    // --- 3. Initialize Adapters & Shared State ---
    let blobs = Arc::new(FsBlobStore::new(config.uploads_dir.clone()));
    let app_state = AppState {
        store,
        blobs,
        config: config.clone(),
    };

    let cors = CorsLayer::new()
        .allow_origin(
            config
                .allowed_origin
                .parse::<HeaderValue>()
                .map_err(|e| ApiError::Internal(format!("invalid ALLOWED_ORIGIN: {e}")))?,
        )
        .allow_credentials(true)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE, ACCEPT]);

    // --- 4. Create the Web Router ---
    // Public routes (no auth required)
    let public_routes = Router::new()
        .route("/auth/signup", post(signup_handler))
        .route("/auth/login", post(login_handler))
        .route("/auth/logout", post(logout_handler))
        .route("/p/{slug}", get(public_guide_handler));

    // Protected routes (auth required)
    let protected_routes = Router::new()
        .route("/auth/change-password", post(change_password_handler))
        .route("/users", get(list_users_handler).post(create_user_handler))
        .route(
            "/users/{id}",
            patch(update_user_handler).delete(delete_user_handler),
        )
        .route("/users/{id}/reset-password", post(reset_password_handler))
        .route(
            "/welcomebooks",
            get(list_welcomebooks_handler).post(create_welcomebook_handler),
        )
        .route(
            "/welcomebooks/{id}",
            get(get_welcomebook_handler)
                .put(update_welcomebook_handler)
                .delete(delete_welcomebook_handler),
        )
        .route(
            "/welcomebooks/{id}/transfer",
            post(transfer_welcomebook_handler),
        )
        .route(
            "/welcomebooks/{id}/sensitive-access",
            get(access_status_handler)
                .post(activate_access_handler)
                .delete(deactivate_access_handler),
        )
        .route("/welcomebooks/{id}/visits", get(visit_count_handler))
        .route("/sections", post(create_section_handler))
        .route(
            "/sections/{id}",
            get(get_section_handler)
                .put(update_section_handler)
                .delete(delete_section_handler),
        )
        .route("/media", post(upload_media_handler))
        .route("/media/{id}", delete(delete_media_handler))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            require_auth,
        ));

    // Combine API routes
    let api_router = Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(cors)
        .with_state(app_state);

    // Serve uploaded media alongside the API and merge in the Swagger UI.
    let app = Router::new()
        .merge(api_router)
        .nest_service("/uploads", ServeDir::new(&config.uploads_dir))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()));

    // --- 5. Start the Server ---
    info!("Starting server on {}", config.bind_address);
    info!(
        "Swagger UI available at http://{}/swagger-ui",
        config.bind_address
    );
    let listener = tokio::net::TcpListener::bind(&config.bind_address).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
