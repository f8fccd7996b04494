use axum::{
    middleware,
    routing::{delete, get, post},
    Router,
};
use dotenvy::dotenv;
use sqlx::sqlite::SqlitePoolOptions;
use std::env;
use std::net::SocketAddr;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::trace::TraceLayer;

use portal::web::middleware::auth as auth_middleware;
use portal::web::routes::{admin_auth, admins, auth, contact, members, messages, users};

#[tokio::main]
async fn main() {
    dotenv().ok();
    tracing_subscriber::fmt::init();

    let db_url = env::var("DATABASE_URL").expect("DATABASE_URL must be set in .env");
    tracing::info!(%db_url, "connecting to database");

    let pool = SqlitePoolOptions::new()
        .connect(&db_url)
        .await
        .expect("cannot connect to database");

    sqlx::migrate!()
        .run(&pool)
        .await
        .expect("cannot run migrations");

    // Routes that need a valid student session.
    let user_routes = Router::new()
        .route("/api/logout", post(auth::logout_handler))
        .route("/api/contact-admin", post(contact::contact_admin_handler))
        .route("/api/messages", post(messages::user_send_message_handler))
        .route(
            "/api/messages/:conversation_id",
            get(messages::user_list_messages_handler),
        )
        .route("/api/users/:user_id/profile", get(members::profile_handler))
        .layer(middleware::from_fn_with_state(
            pool.clone(),
            auth_middleware::require_user,
        ));

    // Routes that need a valid admin session. Superadmin-only checks live in
    // the admin service.
    let admin_routes = Router::new()
        .route("/api/admin/logout", post(admin_auth::logout_handler))
        .route("/api/admin/stats", get(users::stats_handler))
        .route(
            "/api/admin/users/pending",
            get(users::pending_users_handler),
        )
        .route("/api/admin/users/approve", post(users::approve_user_handler))
        .route("/api/admin/users/reject", post(users::reject_user_handler))
        .route(
            "/api/admin/users",
            get(users::list_users_handler).post(users::add_user_handler),
        )
        .route(
            "/api/admin/users/:user_id",
            get(users::get_user_handler)
                .put(users::update_user_handler)
                .delete(users::delete_user_handler),
        )
        .route(
            "/api/admin/contact-requests",
            get(contact::list_requests_handler),
        )
        .route(
            "/api/admin/contact-requests/resolve",
            post(contact::resolve_request_handler),
        )
        .route(
            "/api/admin/contact-requests/:request_id",
            delete(contact::delete_request_handler),
        )
        .route(
            "/api/admin/message-requests",
            get(messages::message_requests_handler),
        )
        .route(
            "/api/admin/message-requests/accept",
            post(messages::accept_request_handler),
        )
        .route(
            "/api/admin/conversations/from-request",
            post(messages::start_from_request_handler),
        )
        .route("/api/admin/messages", post(messages::send_message_handler))
        .route(
            "/api/admin/messages/:conversation_id",
            get(messages::list_messages_handler),
        )
        .route(
            "/api/admin/admins",
            get(admins::list_admins_handler).post(admins::save_admin_handler),
        )
        .route(
            "/api/admin/admins/:admin_id",
            delete(admins::delete_admin_handler),
        )
        .layer(middleware::from_fn_with_state(
            pool.clone(),
            auth_middleware::require_admin,
        ));

    let app = Router::new()
        // Public routes
        .route("/api/register", post(auth::register_handler))
        .route("/api/login", post(auth::login_handler))
        .route("/api/session", get(auth::session_handler))
        .route("/api/admin/login", post(admin_auth::login_handler))
        .route("/api/admin/session", get(admin_auth::session_handler))
        .route("/api/members", get(members::members_handler))
        .route("/api/alumni", get(members::alumni_handler))
        // Protected routes
        .merge(user_routes)
        .merge(admin_routes)
        // Layers
        .layer(TraceLayer::new_for_http())
        .layer(CatchPanicLayer::new())
        // State
        .with_state(pool);

    let host = env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
    let port: u16 = env::var("PORT")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(3000);
    let addr: SocketAddr = format!("{}:{}", host, port)
        .parse()
        .expect("cannot parse host/port");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("cannot bind listener");
    tracing::info!("server running on http://{}", addr);

    axum::serve(listener, app).await.unwrap();
}
