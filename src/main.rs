use std::sync::Arc;

use axum::{
    http::{header, HeaderValue, Method},
    routing::{get, post, put},
    Router,
};
use tower_http::cors::{AllowHeaders, AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use studiobook_api::config::Config;
use studiobook_api::middleware::auth::JwtSecret;
use studiobook_api::services::email::EmailService;
use studiobook_api::services::push::PushService;
use studiobook_api::{db, routes, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;
    let config = Arc::new(config);

    let pool = db::create_pool(&config.database_url).await?;
    db::run_migrations(&pool).await?;
    info!("Database connected and migrations applied");

    let push = Arc::new(PushService::new(config.fcm_api_key.clone()));

    let email = EmailService::new(&config).map(Arc::new);
    if email.is_some() {
        info!("SMTP email service configured");
    } else {
        info!("SMTP not configured — email features disabled");
    }

    let state = AppState {
        db: pool,
        config: config.clone(),
        push,
        email,
    };

    // Build CORS: allow the dashboard origin and its subdomains. In
    // development (localhost), all origins are allowed.
    let base_url = config.app_base_url.clone();
    let cors_origin = {
        let base = base_url.clone();
        AllowOrigin::predicate(move |origin: &HeaderValue, _| {
            let o = match origin.to_str() {
                Ok(s) => s,
                Err(_) => return false,
            };
            if o.starts_with("http://localhost") || o.starts_with("http://127.0.0.1") {
                return true;
            }
            if o == base {
                return true;
            }
            if let Some(idx) = base.find("://") {
                let after_scheme = &base[idx + 3..];
                let domain = after_scheme.split('/').next().unwrap_or(after_scheme);
                let domain_clean = domain.split(':').next().unwrap_or(domain);
                if o.contains(&format!(".{domain_clean}")) {
                    return true;
                }
            }
            false
        })
    };

    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers(AllowHeaders::list([
            header::AUTHORIZATION,
            header::CONTENT_TYPE,
            header::ACCEPT,
        ]))
        .allow_origin(cors_origin);

    let jwt_secret = JwtSecret(config.jwt_secret.clone());

    let app = Router::new()
        .route("/health", get(routes::health::health_check))
        // Auth
        .route("/auth/login", post(routes::auth::login))
        .route("/auth/me", get(routes::auth::me))
        .route("/auth/push-token", post(routes::auth::register_push_token))
        // Studios
        .route("/studios", get(routes::studios::list_studios).post(routes::studios::create_studio))
        .route("/studios/{id}", get(routes::studios::get_studio).put(routes::studios::update_studio))
        .route("/studios/{id}/schedules", get(routes::schedules::list_schedules))
        // Schedules
        .route("/schedules", post(routes::schedules::add_schedule))
        .route("/schedules/block-day", post(routes::schedules::block_day))
        .route("/schedules/{id}", put(routes::schedules::update_schedule).delete(routes::schedules::delete_schedule))
        // Bookings
        .route("/bookings", get(routes::bookings::list_bookings))
        .route("/bookings/{id}/confirm", post(routes::bookings::confirm_booking))
        .route("/bookings/{id}/cancel", post(routes::bookings::cancel_booking))
        .route("/bookings/{id}/archive", post(routes::bookings::archive_booking))
        .route("/bookings/{id}/status", put(routes::bookings::update_booking_status))
        // Payments
        .route("/bookings/{id}/payment", get(routes::payments::get_payment))
        .route("/bookings/{id}/payment/confirm", post(routes::payments::confirm_payment))
        // Notifications
        .route("/notifications", get(routes::notifications::list_notifications))
        .route("/notifications/read-all", post(routes::notifications::mark_all_read))
        .route("/notifications/{id}/read", post(routes::notifications::mark_read))
        // Feedback
        .route("/feedback", get(routes::feedback::list_feedback))
        // Chatbot FAQs
        .route("/faqs", get(routes::faqs::list_faqs).post(routes::faqs::create_faq))
        .route("/faqs/{id}", put(routes::faqs::update_faq).delete(routes::faqs::delete_faq))
        .layer(axum::Extension(jwt_secret))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state);

    let addr = format!("{}:{}", config.host, config.port);
    info!("studiobook API listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
