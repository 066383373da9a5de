// SPDX-License-Identifier: MIT

mod error;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use std::net::SocketAddr;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use crate::error::Result;
use crate::workflow::{WorkflowDefinition, WorkflowEngine, WorkflowInstance};

pub use error::{ApiError, ApiResult, ErrorResponse};

/// Build the HTTP router over a shared engine
pub fn router(engine: WorkflowEngine) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/workflows", get(list_workflows).post(create_workflow))
        .route("/workflows/{definition_id}", get(get_workflow))
        .route(
            "/workflows/{definition_id}/instances",
            get(list_instances).post(create_instance),
        )
        .route("/instances/{instance_id}", get(get_instance))
        .route(
            "/instances/{instance_id}/actions/{action_id}",
            post(execute_action),
        )
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(CorsLayer::permissive())
        .with_state(engine)
}

pub async fn serve(engine: WorkflowEngine, addr: SocketAddr) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    log::info!("Listening on http://{}", addr);
    axum::serve(listener, router(engine)).await?;

    Ok(())
}

async fn health_check(State(engine): State<WorkflowEngine>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "definitions": engine.list_definitions().await.len(),
        "instances": engine.instance_count().await,
    }))
}

async fn list_workflows(State(engine): State<WorkflowEngine>) -> Json<Vec<WorkflowDefinition>> {
    let definitions = engine.list_definitions().await;
    Json(definitions.iter().map(|d| d.as_ref().clone()).collect())
}

async fn create_workflow(
    State(engine): State<WorkflowEngine>,
    Json(definition): Json<WorkflowDefinition>,
) -> ApiResult<(StatusCode, Json<WorkflowDefinition>)> {
    let stored = engine.create_definition(definition).await?;
    Ok((StatusCode::CREATED, Json(stored.as_ref().clone())))
}

async fn get_workflow(
    State(engine): State<WorkflowEngine>,
    Path(definition_id): Path<String>,
) -> ApiResult<Json<WorkflowDefinition>> {
    let definition = engine.get_definition(&definition_id).await?;
    Ok(Json(definition.as_ref().clone()))
}

async fn list_instances(
    State(engine): State<WorkflowEngine>,
    Path(definition_id): Path<String>,
) -> ApiResult<Json<Vec<WorkflowInstance>>> {
    Ok(Json(engine.list_instances(&definition_id).await?))
}

async fn create_instance(
    State(engine): State<WorkflowEngine>,
    Path(definition_id): Path<String>,
) -> ApiResult<(StatusCode, Json<WorkflowInstance>)> {
    let instance = engine.create_instance(&definition_id).await?;
    Ok((StatusCode::CREATED, Json(instance)))
}

async fn get_instance(
    State(engine): State<WorkflowEngine>,
    Path(instance_id): Path<String>,
) -> ApiResult<Json<WorkflowInstance>> {
    Ok(Json(engine.get_instance(&instance_id).await?))
}

async fn execute_action(
    State(engine): State<WorkflowEngine>,
    Path((instance_id, action_id)): Path<(String, String)>,
) -> ApiResult<Json<WorkflowInstance>> {
    Ok(Json(engine.execute_action(&instance_id, &action_id).await?))
}
