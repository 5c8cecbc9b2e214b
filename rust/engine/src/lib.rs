mod auth;
mod errors;
mod models;
mod projections;
mod seed;
mod store;

use std::sync::Arc;

use chrono::{Local, Utc};
use uuid::Uuid;

use errors::EngineError;
use models::{
    BridgeHealth, CatalogEntry, CategoryTab, Channel, ChannelDraft, Collaborator,
    CollaboratorRole, EducationalSeat, EngineConfig, HistoryGroup, ListKind, LoginOutcome,
    MediaKind, NotificationLevel, StorageGrant, Team, TeamMember, ThemeMode, UserProfile,
    VideoDraft, VideoGroup,
};
use store::{ChannelFlag, Database, AUTH_PROFILE_KEY, AUTH_TOKEN_KEY, BOOT_ERROR_KEY};

uniffi::setup_scaffolding!();

#[derive(uniffi::Object)]
pub struct Engine {
    db: Database,
    auth: Arc<dyn AuthBackend>,
}

#[uniffi::export]
impl Engine {
    #[uniffi::constructor]
    pub fn new(config: EngineConfig) -> Result<Arc<Self>, EngineError> {
        let auth = Arc::new(FixedDelayAuth::new(config.auth_delay_ms));
        Self::with_auth_backend(config, auth)
    }

    // -- catalog and projections -------------------------------------------

    pub fn list_catalog(&self) -> Result<Vec<CatalogEntry>, EngineError> {
        self.db.list_catalog()
    }

    pub fn videos_by_category(&self, category: String) -> Result<Vec<CatalogEntry>, EngineError> {
        let entries = self.db.list_catalog()?;
        Ok(projections::filter_by_category(&entries, &category))
    }

    pub fn search_catalog(&self, query: String) -> Result<Vec<CatalogEntry>, EngineError> {
        let entries = self.db.list_catalog()?;
        Ok(projections::search(&entries, &query))
    }

    /// Full collection ordered by view time, most recent first.
    pub fn recently_viewed(&self) -> Result<Vec<CatalogEntry>, EngineError> {
        let entries = self.db.list_catalog()?;
        Ok(projections::sort_by_viewed_at_desc(&entries))
    }

    /// Viewing history grouped by calendar day in the viewer's time zone,
    /// most recent day first.
    pub fn history(&self) -> Result<Vec<HistoryGroup>, EngineError> {
        let entries = self.db.list_catalog()?;
        let offset = *Local::now().offset();
        Ok(projections::history_by_day(&entries, offset))
    }

    pub fn favorites(&self) -> Result<Vec<CatalogEntry>, EngineError> {
        let entries = self.db.list_catalog()?;
        Ok(projections::favorites(&entries))
    }

    pub fn favorite_groups(&self) -> Result<Vec<VideoGroup>, EngineError> {
        let entries = self.db.list_catalog()?;
        Ok(projections::favorite_groups(&entries))
    }

    pub fn ungrouped_favorites(&self) -> Result<Vec<CatalogEntry>, EngineError> {
        let entries = self.db.list_catalog()?;
        Ok(projections::ungrouped_favorites(&entries))
    }

    pub fn watch_later(&self) -> Result<Vec<CatalogEntry>, EngineError> {
        let entries = self.db.list_catalog()?;
        Ok(entries.into_iter().filter(|entry| entry.later).collect())
    }

    pub fn my_videos(&self) -> Result<Vec<CatalogEntry>, EngineError> {
        let entries = self.db.list_catalog()?;
        Ok(entries.into_iter().filter(|entry| entry.my_videos).collect())
    }

    pub fn media_kind(&self, uri: String) -> MediaKind {
        projections::media_kind(&uri)
    }

    // -- catalog mutations --------------------------------------------------

    pub fn add_video(&self, draft: VideoDraft) -> Result<CatalogEntry, EngineError> {
        self.db.add_video(&draft, Utc::now().timestamp())
    }

    pub fn update_video_details(
        &self,
        id: i64,
        title: String,
        description: String,
        category: String,
    ) -> Result<(), EngineError> {
        self.db
            .update_video_details(id, &title, &description, &category)
    }

    pub fn set_membership(
        &self,
        id: i64,
        list: ListKind,
        member: bool,
    ) -> Result<(), EngineError> {
        self.db.set_membership(id, list, member)
    }

    pub fn set_group_label(&self, id: i64, label: String) -> Result<(), EngineError> {
        self.db.set_group_label(id, &label)
    }

    pub fn rename_group(&self, old_label: String, new_label: String) -> Result<u64, EngineError> {
        self.db.rename_group(&old_label, &new_label)
    }

    pub fn remove_video(&self, id: i64) -> Result<(), EngineError> {
        self.db.remove_video(id)
    }

    pub fn record_view(&self, id: i64) -> Result<(), EngineError> {
        self.db.record_view(id, Utc::now().timestamp())
    }

    // -- categories ---------------------------------------------------------

    pub fn list_categories(&self) -> Result<Vec<CategoryTab>, EngineError> {
        self.db.list_categories()
    }

    pub fn add_category(&self, name: String) -> Result<CategoryTab, EngineError> {
        self.db.add_category(&name)
    }

    pub fn rename_category(&self, id: String, name: String) -> Result<(), EngineError> {
        self.db.rename_category(&id, &name)
    }

    pub fn remove_category(&self, id: String) -> Result<(), EngineError> {
        self.db.remove_category(&id)
    }

    pub fn record_category_visit(&self, name: String) -> Result<(), EngineError> {
        self.db.record_category_visit(&name)
    }

    // -- channels -----------------------------------------------------------

    pub fn list_channels(&self) -> Result<Vec<Channel>, EngineError> {
        self.db.list_channels()
    }

    pub fn add_channel(&self, draft: ChannelDraft) -> Result<Channel, EngineError> {
        self.db.add_channel(&draft)
    }

    pub fn update_channel(&self, channel: Channel) -> Result<(), EngineError> {
        if self.db.get_channel(channel.id)?.is_none() {
            return Err(EngineError::NotFound {
                detail: format!("channel {}", channel.id),
            });
        }
        self.db.upsert_channel(&channel)
    }

    pub fn delete_channel(&self, id: i64) -> Result<(), EngineError> {
        self.db.delete_channel(id)
    }

    pub fn set_channel_active(&self, id: i64, active: bool) -> Result<(), EngineError> {
        self.db.set_channel_flag(id, ChannelFlag::Active, active)
    }

    pub fn set_channel_favorite(&self, id: i64, favorite: bool) -> Result<(), EngineError> {
        self.db.set_channel_flag(id, ChannelFlag::Favorite, favorite)
    }

    pub fn set_channel_subscribed(&self, id: i64, subscribed: bool) -> Result<(), EngineError> {
        self.db.set_channel_flag(id, ChannelFlag::Subscribed, subscribed)
    }

    pub fn set_channel_notifications(
        &self,
        id: i64,
        level: NotificationLevel,
    ) -> Result<(), EngineError> {
        self.db.set_channel_notifications(id, level)
    }

    pub fn favorite_channels(&self) -> Result<Vec<Channel>, EngineError> {
        let channels = self.db.list_channels()?;
        Ok(channels.into_iter().filter(|c| c.is_favorite).collect())
    }

    pub fn subscribed_channels(&self) -> Result<Vec<Channel>, EngineError> {
        let channels = self.db.list_channels()?;
        Ok(channels.into_iter().filter(|c| c.is_subscribed).collect())
    }

    /// Active channels the user has not subscribed to yet.
    pub fn recommended_channels(&self) -> Result<Vec<Channel>, EngineError> {
        let channels = self.db.list_channels()?;
        Ok(channels
            .into_iter()
            .filter(|c| c.is_active && !c.is_subscribed)
            .collect())
    }

    // -- administrative console ---------------------------------------------

    pub fn list_collaborators(&self) -> Result<Vec<Collaborator>, EngineError> {
        self.db.list_collaborators()
    }

    pub fn add_collaborator(
        &self,
        name: String,
        email: String,
        role: CollaboratorRole,
    ) -> Result<Collaborator, EngineError> {
        self.db.add_collaborator(&name, &email, role)
    }

    pub fn set_collaborator_role(
        &self,
        id: i64,
        role: CollaboratorRole,
    ) -> Result<(), EngineError> {
        self.db.set_collaborator_role(id, role)
    }

    pub fn set_collaborator_active(&self, id: i64, active: bool) -> Result<(), EngineError> {
        self.db.set_collaborator_active(id, active)
    }

    pub fn remove_collaborator(&self, id: i64) -> Result<(), EngineError> {
        self.db.remove_collaborator(id)
    }

    pub fn list_teams(&self) -> Result<Vec<Team>, EngineError> {
        self.db.list_teams()
    }

    pub fn create_team(&self, name: String) -> Result<Team, EngineError> {
        let id = Uuid::new_v4().to_string();
        self.db.create_team(&id, &name)
    }

    pub fn rename_team(&self, id: String, name: String) -> Result<(), EngineError> {
        self.db.rename_team(&id, &name)
    }

    pub fn delete_team(&self, id: String) -> Result<(), EngineError> {
        self.db.delete_team(&id)
    }

    pub fn add_team_member(&self, team_id: String, member: TeamMember) -> Result<(), EngineError> {
        self.db.add_team_member(&team_id, &member)
    }

    pub fn remove_team_member(
        &self,
        team_id: String,
        member_id: String,
    ) -> Result<(), EngineError> {
        self.db.remove_team_member(&team_id, &member_id)
    }

    pub fn list_storage_grants(&self) -> Result<Vec<StorageGrant>, EngineError> {
        self.db.list_storage_grants()
    }

    pub fn set_storage_allocation(&self, user_id: String, gb: u32) -> Result<(), EngineError> {
        self.db.set_storage_allocation(&user_id, gb)
    }

    // -- educational seats --------------------------------------------------

    pub fn list_seats(&self) -> Result<Vec<EducationalSeat>, EngineError> {
        self.db.load_seats()
    }

    pub fn get_seat(&self, id: String) -> Result<Option<EducationalSeat>, EngineError> {
        let seats = self.db.load_seats()?;
        Ok(seats.into_iter().find(|seat| seat.id == id))
    }

    pub fn create_seat(&self, name: String, active: bool) -> Result<EducationalSeat, EngineError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(EngineError::InvalidInput {
                detail: "seat name cannot be empty".to_string(),
            });
        }

        let seat = EducationalSeat {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            active,
            created_at_epoch: Utc::now().timestamp(),
        };
        let mut seats = self.db.load_seats()?;
        seats.push(seat.clone());
        self.db.save_seats(&seats)?;
        Ok(seat)
    }

    pub fn update_seat(
        &self,
        id: String,
        name: String,
        active: bool,
    ) -> Result<EducationalSeat, EngineError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(EngineError::InvalidInput {
                detail: "seat name cannot be empty".to_string(),
            });
        }

        let mut seats = self.db.load_seats()?;
        let seat = seats
            .iter_mut()
            .find(|seat| seat.id == id)
            .ok_or_else(|| EngineError::NotFound {
                detail: format!("educational seat {id}"),
            })?;
        seat.name = name.to_string();
        seat.active = active;
        let updated = seat.clone();
        self.db.save_seats(&seats)?;
        Ok(updated)
    }

    pub fn delete_seat(&self, id: String) -> Result<bool, EngineError> {
        let mut seats = self.db.load_seats()?;
        let before = seats.len();
        seats.retain(|seat| seat.id != id);
        if seats.len() == before {
            return Ok(false);
        }
        self.db.save_seats(&seats)?;
        Ok(true)
    }

    // -- preferences --------------------------------------------------------

    pub fn theme_mode(&self) -> Result<ThemeMode, EngineError> {
        self.db.theme_mode()
    }

    pub fn set_theme_mode(&self, mode: ThemeMode) -> Result<(), EngineError> {
        self.db.set_theme_mode(mode)
    }

    // -- authentication -----------------------------------------------------

    pub fn login(&self, email: String, password: String) -> Result<LoginOutcome, EngineError> {
        let outcome = self.auth.login(&email, &password);
        if let LoginOutcome::Authenticated { user } = &outcome {
            self.db
                .set_preference(AUTH_TOKEN_KEY, &Uuid::new_v4().to_string())?;
            self.db
                .set_preference(AUTH_PROFILE_KEY, &serde_json::to_string(user)?)?;
            log::debug!("session opened for {}", user.email);
        }
        Ok(outcome)
    }

    pub fn logout(&self) -> Result<(), EngineError> {
        self.auth.logout();
        self.db.delete_preference(AUTH_TOKEN_KEY)?;
        self.db.delete_preference(AUTH_PROFILE_KEY)?;
        Ok(())
    }

    pub fn current_user(&self) -> Result<Option<UserProfile>, EngineError> {
        if self.db.get_preference(AUTH_TOKEN_KEY)?.is_none() {
            return Ok(None);
        }
        let Some(payload) = self.db.get_preference(AUTH_PROFILE_KEY)? else {
            return Ok(None);
        };
        match serde_json::from_str(&payload) {
            Ok(user) => Ok(Some(user)),
            Err(err) => {
                log::warn!("discarding unreadable session profile: {err}");
                Ok(None)
            }
        }
    }

    pub fn is_authenticated(&self) -> Result<bool, EngineError> {
        Ok(self.db.get_preference(AUTH_TOKEN_KEY)?.is_some())
    }

    // -- diagnostics --------------------------------------------------------

    pub fn bridge_health(&self) -> Result<BridgeHealth, EngineError> {
        let last_error = self.db.get_preference(BOOT_ERROR_KEY)?;
        Ok(BridgeHealth {
            engine_ready: true,
            db_accessible: self.db.path().exists(),
            last_error,
        })
    }
}

impl Engine {
    /// Constructor seam for tests and for hosts that bring a real backend.
    pub fn with_auth_backend(
        config: EngineConfig,
        auth: Arc<dyn AuthBackend>,
    ) -> Result<Arc<Self>, EngineError> {
        validate_config(&config)?;

        let db = Database::new(&config.db_path);
        db.init()?;

        let engine = Arc::new(Self { db, auth });

        // Seeding failures surface through bridge health, never abort boot.
        if config.seed_demo_data {
            if let Err(err) = engine.seed_if_empty() {
                log::warn!("demo data seeding failed: {err}");
                let _ = engine.db.set_preference(BOOT_ERROR_KEY, &err.to_string());
            }
        }

        Ok(engine)
    }

    fn seed_if_empty(&self) -> Result<(), EngineError> {
        if self.db.catalog_len()? > 0 {
            return Ok(());
        }

        let catalog = seed::demo_catalog();
        for entry in &catalog {
            self.db.insert_entry(entry)?;
        }
        for name in seed::default_categories() {
            self.db.add_category(name)?;
        }
        for channel in seed::demo_channels() {
            self.db.upsert_channel(&channel)?;
        }
        for collaborator in seed::demo_collaborators() {
            self.db.add_collaborator(
                &collaborator.name,
                &collaborator.email,
                collaborator.role,
            )?;
        }
        for grant in seed::demo_storage_grants() {
            self.db.upsert_storage_grant(&grant)?;
        }
        log::debug!("seeded demo data: {} catalog entries", catalog.len());
        Ok(())
    }
}

fn validate_config(config: &EngineConfig) -> Result<(), EngineError> {
    if config.db_path.trim().is_empty() {
        return Err(EngineError::InvalidConfig {
            detail: "db_path cannot be empty".to_string(),
        });
    }
    Ok(())
}

const _: fn() = || {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Engine>();
};

pub use auth::{AuthBackend, FixedDelayAuth};
pub use errors::EngineError as UniFfiEngineError;
pub use models::{
    BridgeHealth as UniFfiBridgeHealth, CatalogEntry as UniFfiCatalogEntry,
    Channel as UniFfiChannel, EngineConfig as UniFfiEngineConfig,
    HistoryGroup as UniFfiHistoryGroup, LoginOutcome as UniFfiLoginOutcome,
    VideoGroup as UniFfiVideoGroup,
};
