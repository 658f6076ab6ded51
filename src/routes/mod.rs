use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use crate::config::{apply_security_headers, create_cors_layer};
use crate::handlers::{attendance, auth, blog, events, health_check, session};
use crate::registry::AppRegistry;

pub fn create_routes(registry: AppRegistry) -> Router {
    let api = Router::new()
        .route("/auth/signup", post(auth::signup))
        .route("/auth/signin", post(auth::signin))
        .route("/auth/me", get(auth::me))
        .route(
            "/events",
            get(events::list_events).post(events::create_event),
        )
        .route(
            "/events/:id",
            get(events::get_event)
                .put(events::update_event)
                .delete(events::delete_event),
        )
        .route(
            "/events/:id/attendance",
            get(attendance::attendance_status)
                .put(attendance::join_event)
                .delete(attendance::leave_event),
        )
        .route("/me/attending", get(attendance::my_attending))
        .route("/session", get(session::get_session))
        .route("/blog/title-suggestions", post(blog::suggest_titles));

    let router = Router::new()
        .route("/health", get(health_check))
        .nest("/api", api)
        .with_state(registry)
        .layer(TraceLayer::new_for_http())
        .layer(create_cors_layer());

    apply_security_headers(router)
}
