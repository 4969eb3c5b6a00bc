use axum::http::{HeaderValue, Method, header};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tracing::warn;

/// CORS for browser callers. With an allow-list only those origins get CORS
/// headers; without one every origin does. Requests without `Origin` are
/// never affected.
pub fn cors_layer(allowed_origins: Option<&[String]>) -> CorsLayer {
    let base = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]);

    match allowed_origins {
        None => base.allow_origin(Any),
        Some(origins) => {
            let values: Vec<HeaderValue> = origins
                .iter()
                .filter_map(|origin| {
                    HeaderValue::from_str(origin)
                        .inspect_err(|_| warn!(origin = %origin, "ignoring invalid CORS origin"))
                        .ok()
                })
                .collect();
            base.allow_origin(AllowOrigin::list(values))
        }
    }
}
