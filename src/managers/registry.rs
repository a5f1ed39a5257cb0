use crate::errors::ToolError;
use crate::managers::builders::{
    get_by_id, get_by_id_with, root_get, simple_get, ApiCaller, ApiHandler, PathTemplate,
};
use crate::managers::sub_resources::{ItemResource, LibraryResource, UserResource};
use crate::managers::{views, writes};
use crate::services::args::ToolArgs;
use crate::services::config::ApiScope;
use crate::services::tool_executor::ToolHandler;
use crate::services::transport::ApiRequest;
use std::collections::HashMap;
use std::sync::Arc;

type RequestBuilder = fn(&ToolArgs) -> Result<ApiRequest, ToolError>;

fn custom(api: &ApiCaller, build: RequestBuilder) -> Arc<dyn ToolHandler> {
    Arc::new(ApiHandler::new(api.clone(), ApiScope::Api, build))
}

/// Every tool of the catalog, keyed by tool name.
pub fn build_handlers(api: &ApiCaller) -> HashMap<String, Arc<dyn ToolHandler>> {
    let mut handlers: HashMap<String, Arc<dyn ToolHandler>> = HashMap::new();
    let mut add = |name: &str, handler: Arc<dyn ToolHandler>| {
        handlers.insert(name.to_string(), handler);
    };

    // libraries
    add("libraries", simple_get(api, "/libraries"));
    add(
        "library",
        get_by_id_with::<LibraryResource>(api, PathTemplate::new("/libraries/{id}"), "library_id"),
    );
    add("create_library", custom(api, writes::create_library));

    // items and authors
    add(
        "item",
        get_by_id_with::<ItemResource>(api, PathTemplate::new("/items/{id}"), "item_id"),
    );
    add("author", get_by_id(api, PathTemplate::new("/authors/{id}"), "author_id"));
    add(
        "author_image",
        get_by_id(api, PathTemplate::new("/authors/{id}/image"), "author_id"),
    );
    add("series", get_by_id(api, PathTemplate::new("/series/{id}"), "series_id"));

    // current user and playback
    add("me", custom(api, views::me_request));
    add("update_progress", custom(api, writes::update_progress));
    add("sessions", simple_get(api, "/sessions"));
    add("session", get_by_id(api, PathTemplate::new("/sessions/{id}"), "session_id"));

    // podcasts
    add("podcasts", custom(api, views::podcasts_request));
    add("podcast", custom(api, views::podcast_request));
    add(
        "check_podcast_episodes",
        custom(api, writes::check_podcast_episodes),
    );

    // collections
    add("collections", simple_get(api, "/collections"));
    add(
        "collection",
        get_by_id(api, PathTemplate::new("/collections/{id}"), "collection_id"),
    );
    add("create_collection", custom(api, writes::create_collection));
    add("add_to_collection", custom(api, writes::add_to_collection));

    // playlists
    add("playlists", simple_get(api, "/playlists"));
    add(
        "playlist",
        get_by_id(api, PathTemplate::new("/playlists/{id}"), "playlist_id"),
    );
    add("create_playlist", custom(api, writes::create_playlist));
    add("add_to_playlist", custom(api, writes::add_to_playlist));

    // users
    add("users", simple_get(api, "/users"));
    add("users_online", simple_get(api, "/users/online"));
    add(
        "user",
        get_by_id_with::<UserResource>(api, PathTemplate::new("/users/{id}"), "user_id"),
    );

    // server
    add("ping", root_get(api, "/ping"));
    add("healthcheck", root_get(api, "/healthcheck"));
    add("status", root_get(api, "/status"));
    add("backups", simple_get(api, "/backups"));
    add("create_backup", custom(api, writes::create_backup));
    add("filesystem", simple_get(api, "/filesystem"));
    add("authorize", simple_get(api, "/authorize"));
    add("tags", simple_get(api, "/tags"));
    add("genres", simple_get(api, "/genres"));

    handlers
}
