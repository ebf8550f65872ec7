use super::protocol::{DeleteRequest, GetRequest, GetResponse, PutRequest, Request, Response};
use super::service::FloodNode;

use axum::{Extension, Json, http::StatusCode};
use std::sync::Arc;

pub async fn handle_request(
    Extension(node): Extension<Arc<FloodNode>>,
    Json(req): Json<Request>,
) -> StatusCode {
    node.handle_request(req);
    StatusCode::OK
}

pub async fn handle_response(
    Extension(node): Extension<Arc<FloodNode>>,
    Json(resp): Json<Response>,
) -> StatusCode {
    node.handle_response(resp);
    StatusCode::OK
}

pub async fn handle_get(
    Extension(node): Extension<Arc<FloodNode>>,
    Json(req): Json<GetRequest>,
) -> (StatusCode, Json<GetResponse>) {
    match node.lookup(&req.resource_id).await {
        Ok(resource) => (
            StatusCode::OK,
            Json(GetResponse {
                resource_id: req.resource_id,
                resource: Some(resource),
            }),
        ),
        Err(e) => {
            tracing::info!("GET: {}", e);
            (
                StatusCode::NOT_FOUND,
                Json(GetResponse {
                    resource_id: req.resource_id,
                    resource: None,
                }),
            )
        }
    }
}

pub async fn handle_put(
    Extension(node): Extension<Arc<FloodNode>>,
    Json(req): Json<PutRequest>,
) -> StatusCode {
    node.put(req.resource_id, req.resource);
    StatusCode::OK
}

pub async fn handle_delete(
    Extension(node): Extension<Arc<FloodNode>>,
    Json(req): Json<DeleteRequest>,
) -> StatusCode {
    node.delete(&req.resource_id);
    StatusCode::OK
}
