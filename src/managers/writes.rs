//! Write tools. Each function validates its arguments and builds the POST
//! request; sending is left to the shared handler.

use crate::errors::ToolError;
use crate::managers::payload::JsonBody;
use crate::services::args::ToolArgs;
use crate::services::transport::ApiRequest;
use serde_json::Value;

pub fn create_library(args: &ToolArgs) -> Result<ApiRequest, ToolError> {
    let name = args.require_string("name")?;
    let folders = args.require_string("folders")?;
    let media_type = args.require_string("media_type")?;

    let body = JsonBody::new()
        .insert("name", name)
        .insert("folders", folder_list(&folders))
        .insert("mediaType", media_type)
        .optional_string(args, "icon", "icon")
        .optional_string(args, "provider", "provider");
    Ok(ApiRequest::post("/libraries", Some(body.into_value())))
}

/// `"/a, /b"` becomes `[{"fullPath": "/a"}, {"fullPath": "/b"}]`.
pub fn folder_list(raw: &str) -> Value {
    Value::Array(
        raw.split(',')
            .map(|path| serde_json::json!({ "fullPath": path.trim() }))
            .collect(),
    )
}

pub fn create_collection(args: &ToolArgs) -> Result<ApiRequest, ToolError> {
    let body = named_in_library(args)?;
    Ok(ApiRequest::post("/collections", Some(body.into_value())))
}

pub fn add_to_collection(args: &ToolArgs) -> Result<ApiRequest, ToolError> {
    let collection_id = args.require_string("collection_id")?;
    let body = JsonBody::new().require_string(args, "book_id", "id")?;
    Ok(ApiRequest::post(
        format!("/collections/{}/book", collection_id),
        Some(body.into_value()),
    ))
}

pub fn create_playlist(args: &ToolArgs) -> Result<ApiRequest, ToolError> {
    let body = named_in_library(args)?;
    Ok(ApiRequest::post("/playlists", Some(body.into_value())))
}

pub fn add_to_playlist(args: &ToolArgs) -> Result<ApiRequest, ToolError> {
    let playlist_id = args.require_string("playlist_id")?;
    let body = JsonBody::new()
        .require_string(args, "item_id", "libraryItemId")?
        .optional_string(args, "episode_id", "episodeId");
    Ok(ApiRequest::post(
        format!("/playlists/{}/item", playlist_id),
        Some(body.into_value()),
    ))
}

pub fn check_podcast_episodes(args: &ToolArgs) -> Result<ApiRequest, ToolError> {
    let podcast_id = args.require_string("podcast_id")?;
    Ok(ApiRequest::post(
        format!("/podcasts/{}/check-new-episodes", podcast_id),
        None,
    ))
}

pub fn create_backup(_args: &ToolArgs) -> Result<ApiRequest, ToolError> {
    Ok(ApiRequest::post("/backups", None))
}

pub fn update_progress(args: &ToolArgs) -> Result<ApiRequest, ToolError> {
    let body = JsonBody::new()
        .require_string(args, "item_id", "libraryItemId")?
        .require_f64(args, "progress", "currentTime")?
        .optional_positive_f64(args, "duration", "duration")
        .flag_if_true(args, "is_finished", "isFinished")
        .optional_string(args, "episode_id", "episodeId");
    Ok(ApiRequest::post("/me/progress", Some(body.into_value())))
}

fn named_in_library(args: &ToolArgs) -> Result<JsonBody, ToolError> {
    Ok(JsonBody::new()
        .require_string(args, "library_id", "libraryId")?
        .require_string(args, "name", "name")?
        .optional_string(args, "description", "description"))
}
