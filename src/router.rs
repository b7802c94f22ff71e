use crate::app_state::AppState;
use crate::{handlers_api, handlers_pages};
use axum::{
    http::{header, HeaderValue, Method},
    routing::get,
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
    set_header::SetResponseHeaderLayer,
    trace::TraceLayer,
};

pub fn build_router(state: AppState) -> Router {
    let static_files: Router<AppState> = Router::new()
        .nest_service("/static", ServeDir::new(&state.config.assets_dir))
        .layer(SetResponseHeaderLayer::overriding(
            header::CACHE_CONTROL,
            HeaderValue::from_static("public, max-age=300"),
        ));

    let api = Router::new()
        .route("/tenants", get(handlers_api::list_tenants))
        .route(
            "/tenants/:tenant_slug/machines",
            get(handlers_api::list_machines),
        )
        .route(
            "/tenants/:tenant_slug/machines/:machine_id/reviews",
            get(handlers_api::list_review_records),
        )
        .route(
            "/tenants/:tenant_slug/machines/:machine_id/reviews/:hash",
            get(handlers_api::get_review_record),
        );

    let api = if state.config.cors_allow_any {
        api.layer(
            CorsLayer::new()
                .allow_methods([Method::GET])
                .allow_headers(Any)
                .allow_origin(Any),
        )
    } else {
        api
    };

    Router::new()
        .route("/", get(handlers_pages::launch_page))
        .route("/healthz", get(handlers_api::healthz))
        .route(
            "/tenants/:tenant_slug/machines/:machine_id/board",
            get(handlers_pages::machine_board),
        )
        .merge(api)
        .merge(static_files)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
