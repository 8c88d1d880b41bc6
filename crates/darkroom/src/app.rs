use std::time::Duration;

use axum::{
    http::{header, Method, StatusCode},
    routing::{get, post, put},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::{
    handlers::{carousel, health::health, images, projects},
    state::AppState,
};

/// Create the application router with all routes and middleware.
pub fn create_app(state: AppState, request_timeout: Duration) -> Router {
    // CORS configuration for API endpoints
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
        ])
        .allow_headers([header::CONTENT_TYPE]);

    // API routes with CORS
    let api_routes = Router::new()
        // Project routes
        .route(
            "/projects",
            get(projects::list_published).post(projects::create),
        )
        .route("/projects/all", get(projects::list_all))
        .route(
            "/projects/category/{category}",
            get(projects::list_by_category),
        )
        .route(
            "/projects/{id}",
            get(projects::get_by_id)
                .put(projects::update)
                .delete(projects::delete),
        )
        // Image routes, nested under their project
        .route(
            "/projects/{id}/images",
            get(images::list_for_project).post(images::add),
        )
        .route("/projects/{id}/images/reorder", post(images::reorder))
        .route(
            "/projects/{id}/images/{image_id}",
            put(images::update).delete(images::delete),
        )
        .route("/images/status/{status}", get(images::list_by_status))
        .route("/images/featured", get(images::list_featured))
        // Carousel routes
        .route("/carousel", get(carousel::list_active).post(carousel::create))
        .route("/carousel/all", get(carousel::list_all))
        .route("/carousel/analytics", get(carousel::analytics))
        .route("/carousel/reorder", post(carousel::reorder))
        .route(
            "/carousel/{id}",
            get(carousel::get_by_id)
                .put(carousel::update)
                .delete(carousel::delete),
        )
        .route("/carousel/{id}/view", post(carousel::increment_view))
        .route("/carousel/{id}/click", post(carousel::increment_click))
        .layer(cors);

    // Main application router
    Router::new()
        .route("/health", get(health))
        .nest("/api", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            request_timeout,
        ))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use http_body_util::BodyExt;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::config::Config;

    async fn test_app() -> Router {
        let config = Config {
            request_timeout_seconds: 10,
            dynamodb_table_name: "darkroom".to_string(),
            dynamodb_endpoint_url: None,
        };
        let state = AppState::new(&config).await.unwrap();
        create_app(state, config.request_timeout())
    }

    fn get_request(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn read_json(response: axum::response::Response) -> Value {
        let body = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let app = test_app().await;

        let response = app.oneshot(get_request("/health")).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_list_projects_empty() {
        let app = test_app().await;

        let response = app.oneshot(get_request("/api/projects")).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);

        let json = read_json(response).await;
        assert_eq!(json, json!([]));
    }

    #[tokio::test]
    async fn test_create_and_get_project() {
        let app = test_app().await;

        // Create a project; the id is derived from the title
        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/api/projects",
                json!({"title": "Mountain Series", "category": "landscape"}),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);

        let project = read_json(response).await;
        assert_eq!(project["project_id"], "mountain-series");
        assert_eq!(project["status"], "draft");
        assert_eq!(project["image_count"], 0);

        // Get the project with its (empty) image list
        let response = app
            .oneshot(get_request("/api/projects/mountain-series"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);

        let body = read_json(response).await;
        assert_eq!(body["project"]["title"], "Mountain Series");
        assert_eq!(body["images"], json!([]));
    }

    #[tokio::test]
    async fn test_get_nonexistent_project() {
        let app = test_app().await;

        let response = app
            .oneshot(get_request("/api/projects/no-such-project"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_duplicate_project_conflict() {
        let app = test_app().await;

        let payload = json!({"title": "Mountain Series", "category": "landscape"});

        let response = app
            .clone()
            .oneshot(json_request("POST", "/api/projects", payload.clone()))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);

        let response = app
            .oneshot(json_request("POST", "/api/projects", payload))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_unusable_title_is_rejected() {
        let app = test_app().await;

        // Nothing slug-worthy survives in this title
        let response = app
            .oneshot(json_request(
                "POST",
                "/api/projects",
                json!({"title": "!!!", "category": "landscape"}),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_add_image_and_list() {
        let app = test_app().await;

        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/api/projects",
                json!({"title": "Mountain Series", "category": "landscape"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);

        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/api/projects/mountain-series/images",
                json!({
                    "title": "Dawn Ridge",
                    "file_name": "dawn-ridge.jpg",
                    "file_path": "/photos/dawn-ridge.jpg"
                }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);

        let image = read_json(response).await;
        assert_eq!(image["sort_order"], 1);
        assert_eq!(image["project_id"], "mountain-series");

        // The image shows up in the project listing and in the count
        let response = app
            .clone()
            .oneshot(get_request("/api/projects/mountain-series/images"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let images = read_json(response).await;
        assert_eq!(images.as_array().unwrap().len(), 1);

        let response = app
            .oneshot(get_request("/api/projects/mountain-series"))
            .await
            .unwrap();
        let body = read_json(response).await;
        assert_eq!(body["project"]["image_count"], 1);
    }

    #[tokio::test]
    async fn test_unknown_status_is_rejected() {
        let app = test_app().await;

        let response = app
            .oneshot(get_request("/api/images/status/archived"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_carousel_view_and_analytics() {
        let app = test_app().await;

        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/api/carousel",
                json!({"title": "Winter Light", "image_path": "/carousel/winter.jpg"}),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);

        let item = read_json(response).await;
        let item_id = item["item_id"].as_str().unwrap().to_string();
        assert_eq!(item["position"], 1);

        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                &format!("/api/carousel/{item_id}/view"),
                json!({}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);

        let response = app
            .oneshot(get_request("/api/carousel/analytics"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let analytics = read_json(response).await;
        assert_eq!(analytics["total_views"], 1);
        assert_eq!(analytics["total_clicks"], 0);
        assert_eq!(analytics["items"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_delete_project_cascade() {
        let app = test_app().await;

        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/api/projects",
                json!({"title": "Mountain Series", "category": "landscape"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);

        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/api/projects/mountain-series/images",
                json!({
                    "title": "Dawn Ridge",
                    "file_name": "dawn-ridge.jpg",
                    "file_path": "/photos/dawn-ridge.jpg"
                }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("DELETE")
                    .uri("/api/projects/mountain-series")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);

        // The project is gone; its image listing is empty rather than an error
        let response = app
            .clone()
            .oneshot(get_request("/api/projects/mountain-series"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = app
            .oneshot(get_request("/api/projects/mountain-series/images"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let images = read_json(response).await;
        assert_eq!(images, json!([]));
    }
}
