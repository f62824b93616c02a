use crate::server::{Result, ServerError, ServerRouter, authoring::AuthoringEnabled, json::Json};
use axum::{extract::State, http::StatusCode};
use axum_extra::routing::{RouterExt, TypedPath};
use postsmith_common::model::post::PostRequest;
use postsmith_content::client::{ContentClient, CreatedPost};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub fn routes() -> ServerRouter {
    ServerRouter::new().typed_post(create_post)
}

#[derive(Clone, Eq, PartialEq, Debug, Hash, Serialize)]
struct CreatePostResponse {
    message: &'static str,
    #[serde(flatten)]
    post: CreatedPost,
}

#[derive(TypedPath, Deserialize)]
#[typed_path("/api/create-post", rejection(ServerError))]
struct CreatePostPath();

async fn create_post(
    CreatePostPath(): CreatePostPath,
    _: AuthoringEnabled,
    State(client): State<Arc<ContentClient>>,
    Json(request): Json<PostRequest>,
) -> Result<(StatusCode, Json<CreatePostResponse>)> {
    let post = tokio::task::spawn_blocking(move || client.create_post(request)).await??;

    Ok((
        StatusCode::CREATED,
        Json(CreatePostResponse {
            message: "Post created successfully!",
            post,
        }),
    ))
}
