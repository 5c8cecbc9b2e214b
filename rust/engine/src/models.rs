use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, uniffi::Record)]
pub struct EngineConfig {
    pub db_path: String,
    pub auth_delay_ms: u64,
    pub seed_demo_data: bool,
}

/// Canonical catalog record. Membership in the favorites / watch-later /
/// my-videos lists is carried on the entry itself; `group_label` sub-partitions
/// favorites and is empty for ungrouped entries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, uniffi::Record)]
pub struct CatalogEntry {
    pub id: i64,
    pub title: String,
    pub thumbnail: String,
    pub author: String,
    pub avatar: Option<String>,
    pub role: String,
    pub description: String,
    pub viewed_at_epoch: i64,
    pub duration: String,
    pub category: String,
    pub favorites: bool,
    pub later: bool,
    pub my_videos: bool,
    pub group_label: String,
}

/// Payload for the my-videos upload form. The engine assigns id, position and
/// the initial view timestamp.
#[derive(Debug, Clone, Serialize, Deserialize, uniffi::Record)]
pub struct VideoDraft {
    pub title: String,
    pub thumbnail: String,
    pub author: String,
    pub avatar: Option<String>,
    pub role: String,
    pub description: String,
    pub duration: String,
    pub category: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, uniffi::Enum)]
pub enum ListKind {
    Favorites,
    Later,
    MyVideos,
}

/// How a thumbnail URI should be rendered by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, uniffi::Enum)]
pub enum MediaKind {
    Image,
    VideoClip,
}

#[derive(Debug, Clone, PartialEq, uniffi::Record)]
pub struct VideoGroup {
    pub label: String,
    pub entries: Vec<CatalogEntry>,
}

#[derive(Debug, Clone, PartialEq, uniffi::Record)]
pub struct HistoryGroup {
    pub day_label: String,
    pub entries: Vec<CatalogEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize, uniffi::Record)]
pub struct CategoryTab {
    pub id: String,
    pub name: String,
    pub clicks: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, uniffi::Enum)]
pub enum NotificationLevel {
    All,
    None,
    Custom,
}

#[derive(Debug, Clone, Serialize, Deserialize, uniffi::Record)]
pub struct Channel {
    pub id: i64,
    pub name: String,
    pub owner: String,
    pub is_public: bool,
    pub is_active: bool,
    pub avatar: Option<String>,
    pub banner: Option<String>,
    pub subscribers: u32,
    pub video_count: u32,
    pub description: Option<String>,
    pub category: Option<String>,
    pub is_favorite: bool,
    pub is_subscribed: bool,
    pub notification_level: NotificationLevel,
}

#[derive(Debug, Clone, Serialize, Deserialize, uniffi::Record)]
pub struct ChannelDraft {
    pub name: String,
    pub owner: String,
    pub is_public: bool,
    pub avatar: Option<String>,
    pub banner: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, uniffi::Enum)]
pub enum CollaboratorRole {
    SuperAdmin,
    Admin,
    User,
}

#[derive(Debug, Clone, Serialize, Deserialize, uniffi::Record)]
pub struct Collaborator {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub role: CollaboratorRole,
    pub active: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, uniffi::Record)]
pub struct TeamMember {
    pub id: String,
    pub name: String,
    pub email: String,
    pub avatar: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, uniffi::Record)]
pub struct Team {
    pub id: String,
    pub name: String,
    pub members: Vec<TeamMember>,
}

#[derive(Debug, Clone, Serialize, Deserialize, uniffi::Record)]
pub struct StorageGrant {
    pub user_id: String,
    pub name: String,
    pub email: String,
    pub avatar_url: Option<String>,
    pub allocated_gb: u32,
    pub used_gb: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, uniffi::Record)]
pub struct EducationalSeat {
    pub id: String,
    pub name: String,
    pub active: bool,
    pub created_at_epoch: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, uniffi::Record)]
pub struct UserProfile {
    pub id: String,
    pub email: String,
    pub name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, uniffi::Enum)]
pub enum LoginOutcome {
    Authenticated { user: UserProfile },
    InvalidCredentials,
    TransientFailure { detail: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, uniffi::Enum)]
pub enum ThemeMode {
    Light,
    Dark,
}

#[derive(Debug, Clone, uniffi::Record)]
pub struct BridgeHealth {
    pub engine_ready: bool,
    pub db_accessible: bool,
    pub last_error: Option<String>,
}

impl CollaboratorRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SuperAdmin => "super_admin",
            Self::Admin => "admin",
            Self::User => "user",
        }
    }

    pub fn parse(value: &str) -> Self {
        match value {
            "super_admin" => Self::SuperAdmin,
            "admin" => Self::Admin,
            _ => Self::User,
        }
    }
}

impl NotificationLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::All => "all",
            Self::None => "none",
            Self::Custom => "custom",
        }
    }

    pub fn parse(value: &str) -> Self {
        match value {
            "all" => Self::All,
            "custom" => Self::Custom,
            _ => Self::None,
        }
    }
}

impl ThemeMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }

    pub fn parse(value: &str) -> Self {
        match value {
            "light" => Self::Light,
            _ => Self::Dark,
        }
    }
}
