//! Read tools whose path depends on more than one argument.

use crate::errors::ToolError;
use crate::services::args::ToolArgs;
use crate::services::transport::ApiRequest;

/// Views of the authenticated user, checked in declaration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MeView {
    ListeningSessions,
    ListeningStats,
    ItemsInProgress,
    Progress {
        item_id: String,
        episode_id: Option<String>,
    },
    Profile,
}

impl MeView {
    pub fn from_args(args: &ToolArgs) -> Self {
        if args.flag("listening-sessions") {
            return MeView::ListeningSessions;
        }
        if args.flag("listening-stats") {
            return MeView::ListeningStats;
        }
        if args.flag("items-in-progress") {
            return MeView::ItemsInProgress;
        }
        if let Some(item_id) = args.optional_string("progress_item_id") {
            return MeView::Progress {
                item_id,
                episode_id: args.optional_string("progress_episode_id"),
            };
        }
        MeView::Profile
    }

    pub fn path(&self) -> String {
        match self {
            MeView::ListeningSessions => "/me/listening-sessions".to_string(),
            MeView::ListeningStats => "/me/listening-stats".to_string(),
            MeView::ItemsInProgress => "/me/items-in-progress".to_string(),
            MeView::Progress {
                item_id,
                episode_id: Some(episode_id),
            } => format!("/me/progress/{}/{}", item_id, episode_id),
            MeView::Progress {
                item_id,
                episode_id: None,
            } => format!("/me/progress/{}", item_id),
            MeView::Profile => "/me".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PodcastsView {
    Feed,
    Opml,
    All,
}

impl PodcastsView {
    pub fn from_args(args: &ToolArgs) -> Self {
        if args.flag("feed") {
            PodcastsView::Feed
        } else if args.flag("opml") {
            PodcastsView::Opml
        } else {
            PodcastsView::All
        }
    }

    pub fn path(self) -> &'static str {
        match self {
            PodcastsView::Feed => "/podcasts/feed",
            PodcastsView::Opml => "/podcasts/opml",
            PodcastsView::All => "/podcasts",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PodcastView {
    Downloads,
    SearchEpisode,
    Episode(String),
    Details,
}

impl PodcastView {
    pub fn from_args(args: &ToolArgs) -> Self {
        if args.flag("downloads") {
            return PodcastView::Downloads;
        }
        if args.flag("search-episode") {
            return PodcastView::SearchEpisode;
        }
        match args.optional_string("episode_id") {
            Some(episode_id) => PodcastView::Episode(episode_id),
            None => PodcastView::Details,
        }
    }

    pub fn path(&self, podcast_id: &str) -> String {
        match self {
            PodcastView::Downloads => format!("/podcasts/{}/downloads", podcast_id),
            PodcastView::SearchEpisode => format!("/podcasts/{}/search-episode", podcast_id),
            PodcastView::Episode(episode_id) => {
                format!("/podcasts/{}/episode/{}", podcast_id, episode_id)
            }
            PodcastView::Details => format!("/podcasts/{}", podcast_id),
        }
    }
}

pub fn me_request(args: &ToolArgs) -> Result<ApiRequest, ToolError> {
    Ok(ApiRequest::get(MeView::from_args(args).path()))
}

pub fn podcasts_request(args: &ToolArgs) -> Result<ApiRequest, ToolError> {
    Ok(ApiRequest::get(PodcastsView::from_args(args).path()))
}

pub fn podcast_request(args: &ToolArgs) -> Result<ApiRequest, ToolError> {
    let podcast_id = args.require_string("podcast_id")?;
    Ok(ApiRequest::get(
        PodcastView::from_args(args).path(&podcast_id),
    ))
}
