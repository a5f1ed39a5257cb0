//! Mutually exclusive sub-resource views.
//!
//! Each tool with optional nested views declares them as an enum whose `ALL`
//! slice is the precedence order. When a caller sets several flags, the
//! earliest variant in `ALL` wins; later flags are ignored, not rejected.

use crate::services::args::ToolArgs;
use std::fmt::Debug;

pub trait SubResource: Copy + Eq + Debug + Send + Sync + 'static {
    /// Every variant, highest precedence first.
    const ALL: &'static [Self];

    /// Argument flag name, also used verbatim as the path suffix.
    fn flag(self) -> &'static str;

    fn select(args: &ToolArgs) -> Option<Self> {
        Self::ALL.iter().copied().find(|choice| args.flag(choice.flag()))
    }

    fn apply(base: String, choice: Option<Self>) -> String {
        match choice {
            Some(choice) => format!("{}/{}", base, choice.flag()),
            None => base,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LibraryResource {
    Items,
    Authors,
    Series,
    Collections,
    Playlists,
    Personalized,
    FilterData,
    Stats,
    Search,
    EpisodeDownloads,
    RecentEpisodes,
}

impl SubResource for LibraryResource {
    const ALL: &'static [Self] = &[
        LibraryResource::Items,
        LibraryResource::Authors,
        LibraryResource::Series,
        LibraryResource::Collections,
        LibraryResource::Playlists,
        LibraryResource::Personalized,
        LibraryResource::FilterData,
        LibraryResource::Stats,
        LibraryResource::Search,
        LibraryResource::EpisodeDownloads,
        LibraryResource::RecentEpisodes,
    ];

    fn flag(self) -> &'static str {
        match self {
            LibraryResource::Items => "items",
            LibraryResource::Authors => "authors",
            LibraryResource::Series => "series",
            LibraryResource::Collections => "collections",
            LibraryResource::Playlists => "playlists",
            LibraryResource::Personalized => "personalized",
            LibraryResource::FilterData => "filterdata",
            LibraryResource::Stats => "stats",
            LibraryResource::Search => "search",
            LibraryResource::EpisodeDownloads => "episode-downloads",
            LibraryResource::RecentEpisodes => "recent-episodes",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemResource {
    Cover,
    ToneObject,
}

impl SubResource for ItemResource {
    const ALL: &'static [Self] = &[ItemResource::Cover, ItemResource::ToneObject];

    fn flag(self) -> &'static str {
        match self {
            ItemResource::Cover => "cover",
            ItemResource::ToneObject => "tone-object",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserResource {
    ListeningSessions,
    ListeningStats,
}

impl SubResource for UserResource {
    const ALL: &'static [Self] = &[UserResource::ListeningSessions, UserResource::ListeningStats];

    fn flag(self) -> &'static str {
        match self {
            UserResource::ListeningSessions => "listening-sessions",
            UserResource::ListeningStats => "listening-stats",
        }
    }
}
