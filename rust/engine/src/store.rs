use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, NaiveDateTime, SecondsFormat, TimeZone, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::errors::EngineError;
use crate::models::{
    CatalogEntry, CategoryTab, Channel, ChannelDraft, Collaborator, CollaboratorRole,
    EducationalSeat, ListKind, NotificationLevel, StorageGrant, Team, TeamMember, ThemeMode,
    VideoDraft,
};

pub const SEATS_KEY: &str = "educational_seats";
pub const THEME_KEY: &str = "theme-mode";
pub const AUTH_TOKEN_KEY: &str = "auth.token";
pub const AUTH_PROFILE_KEY: &str = "auth.profile";
pub const BOOT_ERROR_KEY: &str = "boot_error";

#[derive(Debug, Clone)]
pub struct Database {
    path: PathBuf,
}

impl Database {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn init(&self) -> Result<(), EngineError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|err| EngineError::Database {
                detail: format!("failed creating db parent directory: {err}"),
            })?;
        }

        let conn = self.conn()?;
        conn.execute_batch(
            r#"
            PRAGMA journal_mode = WAL;
            PRAGMA foreign_keys = ON;

            CREATE TABLE IF NOT EXISTS "user_preferences" (
                "id" TEXT PRIMARY KEY NOT NULL,
                "preferenceValue" TEXT
            );

            CREATE TABLE IF NOT EXISTS "catalog_entries" (
                "id" INTEGER PRIMARY KEY NOT NULL,
                "position" INTEGER NOT NULL,
                "title" TEXT NOT NULL,
                "thumbnail" TEXT NOT NULL DEFAULT (''),
                "author" TEXT NOT NULL DEFAULT (''),
                "avatar" TEXT,
                "role" TEXT NOT NULL DEFAULT (''),
                "description" TEXT NOT NULL DEFAULT (''),
                "viewedAt" TEXT NOT NULL,
                "duration" TEXT NOT NULL DEFAULT (''),
                "category" TEXT NOT NULL DEFAULT (''),
                "favorites" INTEGER NOT NULL DEFAULT (0),
                "later" INTEGER NOT NULL DEFAULT (0),
                "myVideos" INTEGER NOT NULL DEFAULT (0),
                "groupLabel" TEXT NOT NULL DEFAULT ('')
            );

            CREATE TABLE IF NOT EXISTS "categories" (
                "id" TEXT PRIMARY KEY NOT NULL,
                "name" TEXT NOT NULL,
                "clicks" INTEGER NOT NULL DEFAULT (0)
            );

            CREATE TABLE IF NOT EXISTS "channels" (
                "id" INTEGER PRIMARY KEY NOT NULL,
                "name" TEXT NOT NULL,
                "owner" TEXT NOT NULL,
                "isPublic" INTEGER NOT NULL DEFAULT (1),
                "isActive" INTEGER NOT NULL DEFAULT (1),
                "avatar" TEXT,
                "banner" TEXT,
                "subscribers" INTEGER NOT NULL DEFAULT (0),
                "videoCount" INTEGER NOT NULL DEFAULT (0),
                "description" TEXT,
                "category" TEXT,
                "isFavorite" INTEGER NOT NULL DEFAULT (0),
                "isSubscribed" INTEGER NOT NULL DEFAULT (0),
                "notificationLevel" TEXT NOT NULL DEFAULT ('none')
            );

            CREATE TABLE IF NOT EXISTS "collaborators" (
                "id" INTEGER PRIMARY KEY NOT NULL,
                "name" TEXT NOT NULL,
                "email" TEXT NOT NULL,
                "role" TEXT NOT NULL DEFAULT ('user'),
                "active" INTEGER NOT NULL DEFAULT (1)
            );

            CREATE TABLE IF NOT EXISTS "teams" (
                "id" TEXT PRIMARY KEY NOT NULL,
                "name" TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS "team_members" (
                "teamId" TEXT NOT NULL,
                "memberId" TEXT NOT NULL,
                "name" TEXT NOT NULL,
                "email" TEXT NOT NULL,
                "avatar" TEXT,
                PRIMARY KEY ("teamId", "memberId"),
                FOREIGN KEY ("teamId") REFERENCES "teams"("id") ON DELETE CASCADE
            );

            CREATE TABLE IF NOT EXISTS "storage_grants" (
                "userId" TEXT PRIMARY KEY NOT NULL,
                "name" TEXT NOT NULL,
                "email" TEXT NOT NULL,
                "avatarUrl" TEXT,
                "allocatedGb" INTEGER NOT NULL DEFAULT (0),
                "usedGb" INTEGER NOT NULL DEFAULT (0)
            );
            "#,
        )?;
        Ok(())
    }

    // -- catalog ------------------------------------------------------------

    pub fn list_catalog(&self) -> Result<Vec<CatalogEntry>, EngineError> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT "id", "title", "thumbnail", "author", "avatar", "role", "description",
                   "viewedAt", "duration", "category", "favorites", "later", "myVideos",
                   "groupLabel"
            FROM "catalog_entries"
            ORDER BY "position" ASC
            "#,
        )?;
        let rows = stmt.query_map([], row_to_entry)?;

        let mut out = Vec::new();
        for row in rows {
            out.push(row?);
        }
        Ok(out)
    }

    pub fn get_entry(&self, id: i64) -> Result<Option<CatalogEntry>, EngineError> {
        let conn = self.conn()?;
        let entry = conn
            .query_row(
                r#"
                SELECT "id", "title", "thumbnail", "author", "avatar", "role", "description",
                       "viewedAt", "duration", "category", "favorites", "later", "myVideos",
                       "groupLabel"
                FROM "catalog_entries"
                WHERE "id" = ?1
                "#,
                params![id],
                row_to_entry,
            )
            .optional()?;
        Ok(entry)
    }

    pub fn catalog_len(&self) -> Result<u64, EngineError> {
        let conn = self.conn()?;
        let count: i64 =
            conn.query_row(r#"SELECT COUNT(*) FROM "catalog_entries""#, [], |row| {
                row.get(0)
            })?;
        Ok(count as u64)
    }

    /// Seeds one entry with an explicit id, keeping the collection's insertion
    /// order equal to the seed order.
    pub fn insert_entry(&self, entry: &CatalogEntry) -> Result<(), EngineError> {
        let conn = self.conn()?;
        let inserted = conn.execute(
            r#"
            INSERT OR IGNORE INTO "catalog_entries" (
                "id", "position", "title", "thumbnail", "author", "avatar", "role",
                "description", "viewedAt", "duration", "category", "favorites", "later",
                "myVideos", "groupLabel"
            )
            VALUES (?1, (SELECT COALESCE(MAX("position"), 0) + 1 FROM "catalog_entries"),
                    ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)
            "#,
            params![
                entry.id,
                entry.title,
                entry.thumbnail,
                entry.author,
                entry.avatar,
                entry.role,
                entry.description,
                epoch_seconds_to_iso(entry.viewed_at_epoch),
                entry.duration,
                entry.category,
                entry.favorites,
                entry.later,
                entry.my_videos,
                entry.group_label,
            ],
        )?;
        if inserted == 0 {
            return Err(EngineError::InvalidInput {
                detail: format!("catalog entry id {} already exists", entry.id),
            });
        }
        Ok(())
    }

    pub fn add_video(
        &self,
        draft: &VideoDraft,
        viewed_at_epoch: i64,
    ) -> Result<CatalogEntry, EngineError> {
        let title = draft.title.trim();
        if title.is_empty() {
            return Err(EngineError::InvalidInput {
                detail: "video title cannot be empty".to_string(),
            });
        }

        let conn = self.conn()?;
        let next_id: i64 = conn.query_row(
            r#"SELECT COALESCE(MAX("id"), 0) + 1 FROM "catalog_entries""#,
            [],
            |row| row.get(0),
        )?;
        conn.execute(
            r#"
            INSERT INTO "catalog_entries" (
                "id", "position", "title", "thumbnail", "author", "avatar", "role",
                "description", "viewedAt", "duration", "category", "myVideos"
            )
            VALUES (?1, (SELECT COALESCE(MAX("position"), 0) + 1 FROM "catalog_entries"),
                    ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, 1)
            "#,
            params![
                next_id,
                title,
                draft.thumbnail,
                draft.author,
                draft.avatar,
                draft.role,
                draft.description,
                epoch_seconds_to_iso(viewed_at_epoch),
                draft.duration,
                draft.category,
            ],
        )?;

        self.get_entry(next_id)?.ok_or_else(|| EngineError::Database {
            detail: format!("inserted catalog entry {next_id} is missing"),
        })
    }

    pub fn update_video_details(
        &self,
        id: i64,
        title: &str,
        description: &str,
        category: &str,
    ) -> Result<(), EngineError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(EngineError::InvalidInput {
                detail: "video title cannot be empty".to_string(),
            });
        }

        let conn = self.conn()?;
        let rows = conn.execute(
            r#"
            UPDATE "catalog_entries"
            SET "title" = ?1, "description" = ?2, "category" = ?3
            WHERE "id" = ?4
            "#,
            params![title, description, category, id],
        )?;
        require_found(rows, || format!("catalog entry {id}"))
    }

    pub fn set_membership(
        &self,
        id: i64,
        list: ListKind,
        member: bool,
    ) -> Result<(), EngineError> {
        let conn = self.conn()?;
        let rows = match (list, member) {
            // Leaving favorites also dissolves the entry's group assignment.
            (ListKind::Favorites, false) => conn.execute(
                r#"UPDATE "catalog_entries" SET "favorites" = 0, "groupLabel" = '' WHERE "id" = ?1"#,
                params![id],
            )?,
            (ListKind::Favorites, true) => conn.execute(
                r#"UPDATE "catalog_entries" SET "favorites" = 1 WHERE "id" = ?1"#,
                params![id],
            )?,
            (ListKind::Later, value) => conn.execute(
                r#"UPDATE "catalog_entries" SET "later" = ?1 WHERE "id" = ?2"#,
                params![value, id],
            )?,
            (ListKind::MyVideos, value) => conn.execute(
                r#"UPDATE "catalog_entries" SET "myVideos" = ?1 WHERE "id" = ?2"#,
                params![value, id],
            )?,
        };
        require_found(rows, || format!("catalog entry {id}"))
    }

    /// A non-empty label promotes the entry into favorites; grouping only
    /// exists inside that list.
    pub fn set_group_label(&self, id: i64, label: &str) -> Result<(), EngineError> {
        let label = label.trim();
        let conn = self.conn()?;
        let rows = if label.is_empty() {
            conn.execute(
                r#"UPDATE "catalog_entries" SET "groupLabel" = '' WHERE "id" = ?1"#,
                params![id],
            )?
        } else {
            conn.execute(
                r#"UPDATE "catalog_entries" SET "groupLabel" = ?1, "favorites" = 1 WHERE "id" = ?2"#,
                params![label, id],
            )?
        };
        require_found(rows, || format!("catalog entry {id}"))
    }

    pub fn rename_group(&self, old_label: &str, new_label: &str) -> Result<u64, EngineError> {
        let new_label = new_label.trim();
        if new_label.is_empty() {
            return Err(EngineError::InvalidInput {
                detail: "group name cannot be empty".to_string(),
            });
        }

        let conn = self.conn()?;
        let rows = conn.execute(
            r#"
            UPDATE "catalog_entries"
            SET "groupLabel" = ?1
            WHERE "favorites" = 1 AND "groupLabel" = ?2
            "#,
            params![new_label, old_label.trim()],
        )?;
        Ok(rows as u64)
    }

    pub fn remove_video(&self, id: i64) -> Result<(), EngineError> {
        let conn = self.conn()?;
        conn.execute(
            r#"DELETE FROM "catalog_entries" WHERE "id" = ?1"#,
            params![id],
        )?;
        Ok(())
    }

    pub fn record_view(&self, id: i64, viewed_at_epoch: i64) -> Result<(), EngineError> {
        let conn = self.conn()?;
        let rows = conn.execute(
            r#"UPDATE "catalog_entries" SET "viewedAt" = ?1 WHERE "id" = ?2"#,
            params![epoch_seconds_to_iso(viewed_at_epoch), id],
        )?;
        require_found(rows, || format!("catalog entry {id}"))
    }

    // -- categories ---------------------------------------------------------

    pub fn list_categories(&self) -> Result<Vec<CategoryTab>, EngineError> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            r#"SELECT "id", "name", "clicks" FROM "categories" ORDER BY "name" ASC"#,
        )?;
        let rows = stmt.query_map([], |row| {
            Ok(CategoryTab {
                id: row.get(0)?,
                name: row.get(1)?,
                clicks: row.get(2)?,
            })
        })?;

        let mut out = Vec::new();
        for row in rows {
            out.push(row?);
        }
        Ok(out)
    }

    pub fn add_category(&self, name: &str) -> Result<CategoryTab, EngineError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(EngineError::InvalidInput {
                detail: "category name cannot be empty".to_string(),
            });
        }
        let id = name.to_lowercase();

        let conn = self.conn()?;
        conn.execute(
            r#"
            INSERT INTO "categories" ("id", "name")
            VALUES (?1, ?2)
            ON CONFLICT("id") DO UPDATE SET "name" = excluded."name"
            "#,
            params![id, name],
        )?;
        let clicks: i64 = conn.query_row(
            r#"SELECT "clicks" FROM "categories" WHERE "id" = ?1"#,
            params![id],
            |row| row.get(0),
        )?;
        Ok(CategoryTab {
            id,
            name: name.to_string(),
            clicks,
        })
    }

    pub fn rename_category(&self, id: &str, name: &str) -> Result<(), EngineError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(EngineError::InvalidInput {
                detail: "category name cannot be empty".to_string(),
            });
        }

        let conn = self.conn()?;
        let rows = conn.execute(
            r#"UPDATE "categories" SET "name" = ?1 WHERE "id" = ?2"#,
            params![name, id],
        )?;
        require_found(rows, || format!("category {id}"))
    }

    pub fn remove_category(&self, id: &str) -> Result<(), EngineError> {
        let conn = self.conn()?;
        conn.execute(r#"DELETE FROM "categories" WHERE "id" = ?1"#, params![id])?;
        Ok(())
    }

    /// Advisory browse counter; unknown names are a silent no-op.
    pub fn record_category_visit(&self, name: &str) -> Result<(), EngineError> {
        let conn = self.conn()?;
        conn.execute(
            r#"
            UPDATE "categories"
            SET "clicks" = "clicks" + 1
            WHERE lower("name") = lower(?1) OR "id" = lower(?1)
            "#,
            params![name.trim()],
        )?;
        Ok(())
    }

    // -- channels -----------------------------------------------------------

    pub fn list_channels(&self) -> Result<Vec<Channel>, EngineError> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT "id", "name", "owner", "isPublic", "isActive", "avatar", "banner",
                   "subscribers", "videoCount", "description", "category", "isFavorite",
                   "isSubscribed", "notificationLevel"
            FROM "channels"
            ORDER BY "id" ASC
            "#,
        )?;
        let rows = stmt.query_map([], row_to_channel)?;

        let mut out = Vec::new();
        for row in rows {
            out.push(row?);
        }
        Ok(out)
    }

    pub fn add_channel(&self, draft: &ChannelDraft) -> Result<Channel, EngineError> {
        let name = draft.name.trim();
        let owner = draft.owner.trim();
        if name.is_empty() || owner.is_empty() {
            return Err(EngineError::InvalidInput {
                detail: "channel name and owner cannot be empty".to_string(),
            });
        }

        let conn = self.conn()?;
        let next_id: i64 = conn.query_row(
            r#"SELECT COALESCE(MAX("id"), 0) + 1 FROM "channels""#,
            [],
            |row| row.get(0),
        )?;
        conn.execute(
            r#"
            INSERT INTO "channels" (
                "id", "name", "owner", "isPublic", "avatar", "banner", "description",
                "category"
            )
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
            params![
                next_id,
                name,
                owner,
                draft.is_public,
                draft.avatar,
                draft.banner,
                draft.description,
                draft.category,
            ],
        )?;

        self.get_channel(next_id)?.ok_or_else(|| EngineError::Database {
            detail: format!("inserted channel {next_id} is missing"),
        })
    }

    pub fn get_channel(&self, id: i64) -> Result<Option<Channel>, EngineError> {
        let conn = self.conn()?;
        let channel = conn
            .query_row(
                r#"
                SELECT "id", "name", "owner", "isPublic", "isActive", "avatar", "banner",
                       "subscribers", "videoCount", "description", "category", "isFavorite",
                       "isSubscribed", "notificationLevel"
                FROM "channels"
                WHERE "id" = ?1
                "#,
                params![id],
                row_to_channel,
            )
            .optional()?;
        Ok(channel)
    }

    pub fn upsert_channel(&self, channel: &Channel) -> Result<(), EngineError> {
        let conn = self.conn()?;
        conn.execute(
            r#"
            INSERT INTO "channels" (
                "id", "name", "owner", "isPublic", "isActive", "avatar", "banner",
                "subscribers", "videoCount", "description", "category", "isFavorite",
                "isSubscribed", "notificationLevel"
            )
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)
            ON CONFLICT("id") DO UPDATE SET
                "name" = excluded."name",
                "owner" = excluded."owner",
                "isPublic" = excluded."isPublic",
                "isActive" = excluded."isActive",
                "avatar" = excluded."avatar",
                "banner" = excluded."banner",
                "subscribers" = excluded."subscribers",
                "videoCount" = excluded."videoCount",
                "description" = excluded."description",
                "category" = excluded."category",
                "isFavorite" = excluded."isFavorite",
                "isSubscribed" = excluded."isSubscribed",
                "notificationLevel" = excluded."notificationLevel"
            "#,
            params![
                channel.id,
                channel.name,
                channel.owner,
                channel.is_public,
                channel.is_active,
                channel.avatar,
                channel.banner,
                channel.subscribers,
                channel.video_count,
                channel.description,
                channel.category,
                channel.is_favorite,
                channel.is_subscribed,
                channel.notification_level.as_str(),
            ],
        )?;
        Ok(())
    }

    pub fn set_channel_flag(
        &self,
        id: i64,
        column: ChannelFlag,
        value: bool,
    ) -> Result<(), EngineError> {
        let conn = self.conn()?;
        let sql = match column {
            ChannelFlag::Active => {
                r#"UPDATE "channels" SET "isActive" = ?1 WHERE "id" = ?2"#
            }
            ChannelFlag::Favorite => {
                r#"UPDATE "channels" SET "isFavorite" = ?1 WHERE "id" = ?2"#
            }
            ChannelFlag::Subscribed => {
                r#"UPDATE "channels" SET "isSubscribed" = ?1 WHERE "id" = ?2"#
            }
        };
        let rows = conn.execute(sql, params![value, id])?;
        require_found(rows, || format!("channel {id}"))
    }

    pub fn set_channel_notifications(
        &self,
        id: i64,
        level: NotificationLevel,
    ) -> Result<(), EngineError> {
        let conn = self.conn()?;
        let rows = conn.execute(
            r#"UPDATE "channels" SET "notificationLevel" = ?1 WHERE "id" = ?2"#,
            params![level.as_str(), id],
        )?;
        require_found(rows, || format!("channel {id}"))
    }

    pub fn delete_channel(&self, id: i64) -> Result<(), EngineError> {
        let conn = self.conn()?;
        conn.execute(r#"DELETE FROM "channels" WHERE "id" = ?1"#, params![id])?;
        Ok(())
    }

    // -- collaborators ------------------------------------------------------

    pub fn list_collaborators(&self) -> Result<Vec<Collaborator>, EngineError> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT "id", "name", "email", "role", "active"
            FROM "collaborators"
            ORDER BY "id" ASC
            "#,
        )?;
        let rows = stmt.query_map([], row_to_collaborator)?;

        let mut out = Vec::new();
        for row in rows {
            out.push(row?);
        }
        Ok(out)
    }

    pub fn add_collaborator(
        &self,
        name: &str,
        email: &str,
        role: CollaboratorRole,
    ) -> Result<Collaborator, EngineError> {
        let name = name.trim();
        let email = email.trim();
        if name.is_empty() || email.is_empty() {
            return Err(EngineError::InvalidInput {
                detail: "collaborator name and email cannot be empty".to_string(),
            });
        }

        let conn = self.conn()?;
        let next_id: i64 = conn.query_row(
            r#"SELECT COALESCE(MAX("id"), 0) + 1 FROM "collaborators""#,
            [],
            |row| row.get(0),
        )?;
        conn.execute(
            r#"
            INSERT INTO "collaborators" ("id", "name", "email", "role", "active")
            VALUES (?1, ?2, ?3, ?4, 1)
            "#,
            params![next_id, name, email, role.as_str()],
        )?;

        Ok(Collaborator {
            id: next_id,
            name: name.to_string(),
            email: email.to_string(),
            role,
            active: true,
        })
    }

    pub fn set_collaborator_role(
        &self,
        id: i64,
        role: CollaboratorRole,
    ) -> Result<(), EngineError> {
        let conn = self.conn()?;
        let rows = conn.execute(
            r#"UPDATE "collaborators" SET "role" = ?1 WHERE "id" = ?2"#,
            params![role.as_str(), id],
        )?;
        require_found(rows, || format!("collaborator {id}"))
    }

    pub fn set_collaborator_active(&self, id: i64, active: bool) -> Result<(), EngineError> {
        let conn = self.conn()?;
        let rows = conn.execute(
            r#"UPDATE "collaborators" SET "active" = ?1 WHERE "id" = ?2"#,
            params![active, id],
        )?;
        require_found(rows, || format!("collaborator {id}"))
    }

    pub fn remove_collaborator(&self, id: i64) -> Result<(), EngineError> {
        let conn = self.conn()?;
        conn.execute(
            r#"DELETE FROM "collaborators" WHERE "id" = ?1"#,
            params![id],
        )?;
        Ok(())
    }

    // -- teams --------------------------------------------------------------

    pub fn list_teams(&self) -> Result<Vec<Team>, EngineError> {
        let conn = self.conn()?;
        let mut stmt =
            conn.prepare(r#"SELECT "id", "name" FROM "teams" ORDER BY "name" ASC"#)?;
        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;

        let mut teams = Vec::new();
        for row in rows {
            let (id, name) = row?;
            let members = self.team_members(&conn, &id)?;
            teams.push(Team { id, name, members });
        }
        Ok(teams)
    }

    pub fn create_team(&self, id: &str, name: &str) -> Result<Team, EngineError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(EngineError::InvalidInput {
                detail: "team name cannot be empty".to_string(),
            });
        }

        let conn = self.conn()?;
        conn.execute(
            r#"INSERT INTO "teams" ("id", "name") VALUES (?1, ?2)"#,
            params![id, name],
        )?;
        Ok(Team {
            id: id.to_string(),
            name: name.to_string(),
            members: Vec::new(),
        })
    }

    pub fn rename_team(&self, id: &str, name: &str) -> Result<(), EngineError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(EngineError::InvalidInput {
                detail: "team name cannot be empty".to_string(),
            });
        }

        let conn = self.conn()?;
        let rows = conn.execute(
            r#"UPDATE "teams" SET "name" = ?1 WHERE "id" = ?2"#,
            params![name, id],
        )?;
        require_found(rows, || format!("team {id}"))
    }

    pub fn delete_team(&self, id: &str) -> Result<(), EngineError> {
        let conn = self.conn()?;
        conn.execute(r#"DELETE FROM "teams" WHERE "id" = ?1"#, params![id])?;
        Ok(())
    }

    pub fn add_team_member(&self, team_id: &str, member: &TeamMember) -> Result<(), EngineError> {
        if member.id.trim().is_empty() || member.name.trim().is_empty() {
            return Err(EngineError::InvalidInput {
                detail: "team member id and name cannot be empty".to_string(),
            });
        }

        let conn = self.conn()?;
        let exists: Option<String> = conn
            .query_row(
                r#"SELECT "id" FROM "teams" WHERE "id" = ?1"#,
                params![team_id],
                |row| row.get(0),
            )
            .optional()?;
        if exists.is_none() {
            return Err(EngineError::NotFound {
                detail: format!("team {team_id}"),
            });
        }

        conn.execute(
            r#"
            INSERT INTO "team_members" ("teamId", "memberId", "name", "email", "avatar")
            VALUES (?1, ?2, ?3, ?4, ?5)
            ON CONFLICT("teamId", "memberId") DO UPDATE SET
                "name" = excluded."name",
                "email" = excluded."email",
                "avatar" = excluded."avatar"
            "#,
            params![team_id, member.id, member.name, member.email, member.avatar],
        )?;
        Ok(())
    }

    pub fn remove_team_member(&self, team_id: &str, member_id: &str) -> Result<(), EngineError> {
        let conn = self.conn()?;
        conn.execute(
            r#"DELETE FROM "team_members" WHERE "teamId" = ?1 AND "memberId" = ?2"#,
            params![team_id, member_id],
        )?;
        Ok(())
    }

    fn team_members(
        &self,
        conn: &Connection,
        team_id: &str,
    ) -> Result<Vec<TeamMember>, EngineError> {
        let mut stmt = conn.prepare(
            r#"
            SELECT "memberId", "name", "email", "avatar"
            FROM "team_members"
            WHERE "teamId" = ?1
            ORDER BY "name" ASC
            "#,
        )?;
        let rows = stmt.query_map(params![team_id], |row| {
            Ok(TeamMember {
                id: row.get(0)?,
                name: row.get(1)?,
                email: row.get(2)?,
                avatar: row.get(3)?,
            })
        })?;

        let mut out = Vec::new();
        for row in rows {
            out.push(row?);
        }
        Ok(out)
    }

    // -- storage grants -----------------------------------------------------

    pub fn list_storage_grants(&self) -> Result<Vec<StorageGrant>, EngineError> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT "userId", "name", "email", "avatarUrl", "allocatedGb", "usedGb"
            FROM "storage_grants"
            ORDER BY "name" ASC
            "#,
        )?;
        let rows = stmt.query_map([], |row| {
            Ok(StorageGrant {
                user_id: row.get(0)?,
                name: row.get(1)?,
                email: row.get(2)?,
                avatar_url: row.get(3)?,
                allocated_gb: row.get(4)?,
                used_gb: row.get(5)?,
            })
        })?;

        let mut out = Vec::new();
        for row in rows {
            out.push(row?);
        }
        Ok(out)
    }

    pub fn upsert_storage_grant(&self, grant: &StorageGrant) -> Result<(), EngineError> {
        let conn = self.conn()?;
        conn.execute(
            r#"
            INSERT INTO "storage_grants" (
                "userId", "name", "email", "avatarUrl", "allocatedGb", "usedGb"
            )
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            ON CONFLICT("userId") DO UPDATE SET
                "name" = excluded."name",
                "email" = excluded."email",
                "avatarUrl" = excluded."avatarUrl",
                "allocatedGb" = excluded."allocatedGb",
                "usedGb" = excluded."usedGb"
            "#,
            params![
                grant.user_id,
                grant.name,
                grant.email,
                grant.avatar_url,
                grant.allocated_gb,
                grant.used_gb,
            ],
        )?;
        Ok(())
    }

    pub fn set_storage_allocation(&self, user_id: &str, gb: u32) -> Result<(), EngineError> {
        let conn = self.conn()?;
        let used: Option<u32> = conn
            .query_row(
                r#"SELECT "usedGb" FROM "storage_grants" WHERE "userId" = ?1"#,
                params![user_id],
                |row| row.get(0),
            )
            .optional()?;
        let used = used.ok_or_else(|| EngineError::NotFound {
            detail: format!("storage grant for user {user_id}"),
        })?;
        if gb < used {
            return Err(EngineError::InvalidInput {
                detail: format!("allocation {gb} GB is below current usage {used} GB"),
            });
        }

        conn.execute(
            r#"UPDATE "storage_grants" SET "allocatedGb" = ?1 WHERE "userId" = ?2"#,
            params![gb, user_id],
        )?;
        Ok(())
    }

    // -- educational seats (JSON blob under a fixed preference key) ---------

    pub fn load_seats(&self) -> Result<Vec<EducationalSeat>, EngineError> {
        let Some(payload) = self.get_preference(SEATS_KEY)? else {
            return Ok(Vec::new());
        };
        match serde_json::from_str(&payload) {
            Ok(seats) => Ok(seats),
            Err(err) => {
                log::warn!("discarding unreadable seat store: {err}");
                Ok(Vec::new())
            }
        }
    }

    pub fn save_seats(&self, seats: &[EducationalSeat]) -> Result<(), EngineError> {
        let payload = serde_json::to_string(seats)?;
        self.set_preference(SEATS_KEY, &payload)
    }

    // -- preferences --------------------------------------------------------

    pub fn set_preference(&self, key: &str, value: &str) -> Result<(), EngineError> {
        let conn = self.conn()?;
        conn.execute(
            r#"
            INSERT INTO "user_preferences" ("id", "preferenceValue")
            VALUES (?1, ?2)
            ON CONFLICT("id") DO UPDATE SET "preferenceValue" = excluded."preferenceValue"
            "#,
            params![key, value],
        )?;
        Ok(())
    }

    pub fn get_preference(&self, key: &str) -> Result<Option<String>, EngineError> {
        let conn = self.conn()?;
        let val = conn
            .query_row(
                r#"SELECT "preferenceValue" FROM "user_preferences" WHERE "id" = ?1"#,
                params![key],
                |row| row.get::<_, Option<String>>(0),
            )
            .optional()?;
        Ok(val.flatten())
    }

    pub fn delete_preference(&self, key: &str) -> Result<(), EngineError> {
        let conn = self.conn()?;
        conn.execute(
            r#"DELETE FROM "user_preferences" WHERE "id" = ?1"#,
            params![key],
        )?;
        Ok(())
    }

    pub fn theme_mode(&self) -> Result<ThemeMode, EngineError> {
        let saved = self.get_preference(THEME_KEY)?;
        Ok(saved
            .map(|value| ThemeMode::parse(&value))
            .unwrap_or(ThemeMode::Dark))
    }

    pub fn set_theme_mode(&self, mode: ThemeMode) -> Result<(), EngineError> {
        self.set_preference(THEME_KEY, mode.as_str())
    }

    fn conn(&self) -> Result<Connection, EngineError> {
        Connection::open(&self.path).map_err(EngineError::from)
    }
}

#[derive(Debug, Clone, Copy)]
pub enum ChannelFlag {
    Active,
    Favorite,
    Subscribed,
}

fn require_found(rows: usize, what: impl Fn() -> String) -> Result<(), EngineError> {
    if rows == 0 {
        return Err(EngineError::NotFound { detail: what() });
    }
    Ok(())
}

fn row_to_entry(row: &Row<'_>) -> rusqlite::Result<CatalogEntry> {
    let viewed_at: String = row.get(7)?;
    Ok(CatalogEntry {
        id: row.get(0)?,
        title: row.get(1)?,
        thumbnail: row.get(2)?,
        author: row.get(3)?,
        avatar: row.get(4)?,
        role: row.get(5)?,
        description: row.get(6)?,
        viewed_at_epoch: parse_timestamp_to_epoch_seconds(&viewed_at).unwrap_or(0),
        duration: row.get(8)?,
        category: row.get(9)?,
        favorites: row.get(10)?,
        later: row.get(11)?,
        my_videos: row.get(12)?,
        group_label: row.get(13)?,
    })
}

fn row_to_channel(row: &Row<'_>) -> rusqlite::Result<Channel> {
    let level: String = row.get(13)?;
    Ok(Channel {
        id: row.get(0)?,
        name: row.get(1)?,
        owner: row.get(2)?,
        is_public: row.get(3)?,
        is_active: row.get(4)?,
        avatar: row.get(5)?,
        banner: row.get(6)?,
        subscribers: row.get(7)?,
        video_count: row.get(8)?,
        description: row.get(9)?,
        category: row.get(10)?,
        is_favorite: row.get(11)?,
        is_subscribed: row.get(12)?,
        notification_level: NotificationLevel::parse(&level),
    })
}

fn row_to_collaborator(row: &Row<'_>) -> rusqlite::Result<Collaborator> {
    let role: String = row.get(3)?;
    Ok(Collaborator {
        id: row.get(0)?,
        name: row.get(1)?,
        email: row.get(2)?,
        role: CollaboratorRole::parse(&role),
        active: row.get(4)?,
    })
}

pub fn epoch_seconds_to_iso(epoch_seconds: i64) -> String {
    Utc.timestamp_opt(epoch_seconds, 0)
        .single()
        .map(|time| time.to_rfc3339_opts(SecondsFormat::Millis, true))
        .unwrap_or_else(|| Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true))
}

pub fn parse_timestamp_to_epoch_seconds(value: &str) -> Option<i64> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(raw_number) = trimmed.parse::<i64>() {
        if raw_number > 10_000_000_000 {
            return Some(raw_number / 1000);
        }
        return Some(raw_number);
    }

    if let Ok(parsed) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(parsed.timestamp());
    }

    const CANDIDATE_FORMATS: [&str; 3] = [
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%dT%H:%M:%S",
    ];

    for format in CANDIDATE_FORMATS {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Some(Utc.from_utc_datetime(&parsed).timestamp());
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn open_db(dir: &tempfile::TempDir, name: &str) -> Database {
        let db = Database::new(dir.path().join(name));
        db.init().expect("db init");
        db
    }

    fn sample_entry(id: i64) -> CatalogEntry {
        CatalogEntry {
            id,
            title: format!("Video {id}"),
            thumbnail: "/videos/demo.mp4".to_string(),
            author: "Francis Sanchez".to_string(),
            avatar: Some("/img/imageDashboard.jpg".to_string()),
            role: "Profesor de Cultura".to_string(),
            description: "Clase de ejemplo".to_string(),
            viewed_at_epoch: 1_744_727_400 + id,
            duration: "15:45".to_string(),
            category: "Historia".to_string(),
            favorites: false,
            later: false,
            my_videos: false,
            group_label: String::new(),
        }
    }

    #[test]
    fn catalog_preserves_insertion_order() {
        let tmp = tempdir().expect("tmpdir");
        let db = open_db(&tmp, "order.sqlite");

        for id in [7, 3, 5] {
            db.insert_entry(&sample_entry(id)).expect("insert");
        }

        let ids: Vec<i64> = db
            .list_catalog()
            .expect("list")
            .iter()
            .map(|entry| entry.id)
            .collect();
        assert_eq!(ids, vec![7, 3, 5]);
    }

    #[test]
    fn duplicate_seed_id_is_rejected() {
        let tmp = tempdir().expect("tmpdir");
        let db = open_db(&tmp, "dup.sqlite");

        db.insert_entry(&sample_entry(1)).expect("insert");
        let err = db.insert_entry(&sample_entry(1)).expect_err("duplicate");
        assert!(matches!(err, EngineError::InvalidInput { .. }));
    }

    #[test]
    fn membership_toggle_signals_missing_ids() {
        let tmp = tempdir().expect("tmpdir");
        let db = open_db(&tmp, "membership.sqlite");
        db.insert_entry(&sample_entry(1)).expect("insert");

        db.set_membership(1, ListKind::Later, true).expect("toggle");
        assert!(db.get_entry(1).expect("get").expect("entry").later);

        let err = db
            .set_membership(99, ListKind::Later, true)
            .expect_err("missing id");
        assert!(matches!(err, EngineError::NotFound { .. }));
    }

    #[test]
    fn leaving_favorites_clears_the_group_label() {
        let tmp = tempdir().expect("tmpdir");
        let db = open_db(&tmp, "leave.sqlite");
        db.insert_entry(&sample_entry(1)).expect("insert");

        db.set_group_label(1, "Clase A").expect("label");
        db.set_membership(1, ListKind::Favorites, false)
            .expect("unfavorite");

        let entry = db.get_entry(1).expect("get").expect("entry");
        assert!(!entry.favorites);
        assert_eq!(entry.group_label, "");
    }

    #[test]
    fn group_label_promotes_entry_into_favorites() {
        let tmp = tempdir().expect("tmpdir");
        let db = open_db(&tmp, "promote.sqlite");
        db.insert_entry(&sample_entry(5)).expect("insert");

        db.set_group_label(5, "Clase A").expect("label");

        let entry = db.get_entry(5).expect("get").expect("entry");
        assert!(entry.favorites);
        assert_eq!(entry.group_label, "Clase A");
    }

    #[test]
    fn remove_video_is_idempotent() {
        let tmp = tempdir().expect("tmpdir");
        let db = open_db(&tmp, "remove.sqlite");
        db.insert_entry(&sample_entry(1)).expect("insert");

        db.remove_video(1).expect("first remove");
        db.remove_video(1).expect("second remove");
        assert!(db.list_catalog().expect("list").is_empty());
    }

    #[test]
    fn rename_group_moves_every_member() {
        let tmp = tempdir().expect("tmpdir");
        let db = open_db(&tmp, "rename.sqlite");
        for id in 1..=3 {
            db.insert_entry(&sample_entry(id)).expect("insert");
            db.set_group_label(id, "Clase A").expect("label");
        }

        let moved = db.rename_group("Clase A", "Clase B").expect("rename");
        assert_eq!(moved, 3);
        assert_eq!(db.rename_group("Clase A", "Clase C").expect("rename"), 0);

        let err = db.rename_group("Clase B", "   ").expect_err("blank name");
        assert!(matches!(err, EngineError::InvalidInput { .. }));
    }

    #[test]
    fn add_video_assigns_next_id_and_joins_my_videos() {
        let tmp = tempdir().expect("tmpdir");
        let db = open_db(&tmp, "draft.sqlite");
        db.insert_entry(&sample_entry(4)).expect("insert");

        let draft = VideoDraft {
            title: "  Nuevo video  ".to_string(),
            thumbnail: "/videos/nuevo.mp4".to_string(),
            author: "María Gómez".to_string(),
            avatar: None,
            role: "Profesora de Matemáticas".to_string(),
            description: String::new(),
            duration: "12:00".to_string(),
            category: "Matemáticas".to_string(),
        };
        let entry = db.add_video(&draft, 1_744_727_400).expect("add");

        assert_eq!(entry.id, 5);
        assert_eq!(entry.title, "Nuevo video");
        assert!(entry.my_videos);

        let blank = VideoDraft {
            title: "  ".to_string(),
            ..draft
        };
        let err = db.add_video(&blank, 0).expect_err("blank title");
        assert!(matches!(err, EngineError::InvalidInput { .. }));
    }

    #[test]
    fn record_view_updates_the_timestamp() {
        let tmp = tempdir().expect("tmpdir");
        let db = open_db(&tmp, "view.sqlite");
        db.insert_entry(&sample_entry(1)).expect("insert");

        db.record_view(1, 1_800_000_000).expect("record");
        let entry = db.get_entry(1).expect("get").expect("entry");
        assert_eq!(entry.viewed_at_epoch, 1_800_000_000);

        let err = db.record_view(42, 0).expect_err("missing id");
        assert!(matches!(err, EngineError::NotFound { .. }));
    }

    #[test]
    fn categories_roundtrip_with_visit_counter() {
        let tmp = tempdir().expect("tmpdir");
        let db = open_db(&tmp, "categories.sqlite");

        db.add_category("Matemática").expect("add");
        db.add_category("Ciencia").expect("add");
        db.record_category_visit("matemática").expect("visit");
        db.record_category_visit("matemática").expect("visit");
        db.record_category_visit("desconocida").expect("no-op");

        let tabs = db.list_categories().expect("list");
        assert_eq!(tabs.len(), 2);
        let math = tabs
            .iter()
            .find(|tab| tab.name == "Matemática")
            .expect("math tab");
        assert_eq!(math.clicks, 2);

        db.rename_category(&math.id, "Álgebra").expect("rename");
        db.remove_category("ciencia").expect("remove");
        db.remove_category("ciencia").expect("idempotent remove");
        let tabs = db.list_categories().expect("list");
        assert_eq!(tabs.len(), 1);
        assert_eq!(tabs[0].name, "Álgebra");
    }

    #[test]
    fn channel_flags_and_deletion() {
        let tmp = tempdir().expect("tmpdir");
        let db = open_db(&tmp, "channels.sqlite");

        let channel = db
            .add_channel(&ChannelDraft {
                name: "Canal Principal".to_string(),
                owner: "Juan Pérez".to_string(),
                is_public: true,
                avatar: None,
                banner: None,
                description: Some("Canal educativo principal".to_string()),
                category: Some("Educación".to_string()),
            })
            .expect("add channel");

        db.set_channel_flag(channel.id, ChannelFlag::Subscribed, true)
            .expect("subscribe");
        db.set_channel_notifications(channel.id, NotificationLevel::All)
            .expect("notifications");

        let listed = db.list_channels().expect("list");
        assert_eq!(listed.len(), 1);
        assert!(listed[0].is_subscribed);
        assert_eq!(listed[0].notification_level, NotificationLevel::All);

        let err = db
            .set_channel_flag(99, ChannelFlag::Favorite, true)
            .expect_err("missing channel");
        assert!(matches!(err, EngineError::NotFound { .. }));

        db.delete_channel(channel.id).expect("delete");
        db.delete_channel(channel.id).expect("idempotent delete");
        assert!(db.list_channels().expect("list").is_empty());
    }

    #[test]
    fn collaborator_roles_survive_reload() {
        let tmp = tempdir().expect("tmpdir");
        let db = open_db(&tmp, "collaborators.sqlite");

        let collaborator = db
            .add_collaborator(
                "Francis Pachas Lume",
                "francisLume@yachaytube.edu.pe",
                CollaboratorRole::SuperAdmin,
            )
            .expect("add");
        db.set_collaborator_role(collaborator.id, CollaboratorRole::Admin)
            .expect("role");
        db.set_collaborator_active(collaborator.id, false)
            .expect("active");

        let listed = db.list_collaborators().expect("list");
        assert_eq!(listed[0].role, CollaboratorRole::Admin);
        assert!(!listed[0].active);

        db.remove_collaborator(collaborator.id).expect("remove");
        db.remove_collaborator(collaborator.id)
            .expect("idempotent remove");
    }

    #[test]
    fn team_members_cascade_with_their_team() {
        let tmp = tempdir().expect("tmpdir");
        let db = open_db(&tmp, "teams.sqlite");

        let team = db.create_team("team-1", "Docentes").expect("create");
        db.add_team_member(
            &team.id,
            &TeamMember {
                id: "u1".to_string(),
                name: "María Gómez".to_string(),
                email: "maria@ejemplo.com".to_string(),
                avatar: None,
            },
        )
        .expect("add member");

        let err = db
            .add_team_member(
                "missing-team",
                &TeamMember {
                    id: "u2".to_string(),
                    name: "Carlos".to_string(),
                    email: "carlos@ejemplo.com".to_string(),
                    avatar: None,
                },
            )
            .expect_err("missing team");
        assert!(matches!(err, EngineError::NotFound { .. }));

        assert_eq!(db.list_teams().expect("list")[0].members.len(), 1);

        db.delete_team(&team.id).expect("delete");
        assert!(db.list_teams().expect("list").is_empty());

        // cascade removed the membership rows too
        let conn = Connection::open(db.path()).expect("open");
        let count: i64 = conn
            .query_row(r#"SELECT COUNT(*) FROM "team_members""#, [], |row| {
                row.get(0)
            })
            .expect("count");
        assert_eq!(count, 0);
    }

    #[test]
    fn storage_allocation_cannot_drop_below_usage() {
        let tmp = tempdir().expect("tmpdir");
        let db = open_db(&tmp, "storage.sqlite");

        db.upsert_storage_grant(&StorageGrant {
            user_id: "1".to_string(),
            name: "Juan Pérez".to_string(),
            email: "juan@ejemplo.com".to_string(),
            avatar_url: None,
            allocated_gb: 20,
            used_gb: 15,
        })
        .expect("seed grant");

        db.set_storage_allocation("1", 50).expect("raise");
        let err = db.set_storage_allocation("1", 10).expect_err("below usage");
        assert!(matches!(err, EngineError::InvalidInput { .. }));

        let err = db.set_storage_allocation("99", 10).expect_err("missing");
        assert!(matches!(err, EngineError::NotFound { .. }));

        assert_eq!(db.list_storage_grants().expect("list")[0].allocated_gb, 50);
    }

    #[test]
    fn missing_seat_store_reads_as_empty() {
        let tmp = tempdir().expect("tmpdir");
        let db = open_db(&tmp, "seats.sqlite");
        assert!(db.load_seats().expect("load").is_empty());

        db.save_seats(&[EducationalSeat {
            id: "seat-1".to_string(),
            name: "Aula 101".to_string(),
            active: true,
            created_at_epoch: 1_744_727_400,
        }])
        .expect("save");
        assert_eq!(db.load_seats().expect("load").len(), 1);

        db.set_preference(SEATS_KEY, "not json").expect("corrupt");
        assert!(db.load_seats().expect("load").is_empty());
    }

    #[test]
    fn theme_defaults_to_dark() {
        let tmp = tempdir().expect("tmpdir");
        let db = open_db(&tmp, "theme.sqlite");

        assert_eq!(db.theme_mode().expect("theme"), ThemeMode::Dark);
        db.set_theme_mode(ThemeMode::Light).expect("set");
        assert_eq!(db.theme_mode().expect("theme"), ThemeMode::Light);
    }
}
