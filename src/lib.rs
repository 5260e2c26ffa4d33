pub mod analytics;
pub mod business_hours;
pub mod calendar;
pub mod config;
pub mod date_util;
pub mod error;
pub mod fetch;
pub mod storage;
pub mod ticket;
pub mod url;
pub mod window;

pub use analytics::{analyze, DashboardReport};
pub use business_hours::{calculate_business_hours, BusinessHours};
pub use calendar::HolidayCalendar;
pub use error::{Error, Result};
pub use storage::repository::Board;
pub use storage::Database;
pub use ticket::{normalize, NormalizedTicket, RawTask};
pub use window::Window;

use std::path::Path;

use chrono::NaiveDateTime;

use storage::repository;

/// How long fetched board data is served from the cache.
pub const CACHE_TTL_SECS: u64 = 300;

/// Cache key for a board's task list.
pub fn cache_key(board_key: &str, include_archive: bool) -> String {
    let archive = if include_archive { "with" } else { "without" };
    format!("asana-data-{board_key}-{archive}-archive")
}

/// How a board's tickets are loaded.
#[derive(Debug, Clone, Copy)]
pub struct LoadOptions {
    /// Also fetch the board's archive project.
    pub include_archive: bool,
    /// Bypass the cache.
    pub refresh: bool,
    /// Keep tickets older than 12 months.
    pub all_history: bool,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            include_archive: true,
            refresh: false,
            all_history: false,
        }
    }
}

/// Main entry point: boards, configuration, cached task loading and
/// normalization. The Asana client is only needed for network fetches.
pub struct DeskPulse {
    db: Database,
    client: Option<asanaclient::Client>,
}

impl DeskPulse {
    pub fn new(db: Database) -> Self {
        Self { db, client: None }
    }

    pub fn with_client(mut self, client: asanaclient::Client) -> Self {
        self.client = Some(client);
        self
    }

    pub fn db(&self) -> &Database {
        &self.db
    }

    fn client(&self) -> Result<&asanaclient::Client> {
        self.client.as_ref().ok_or_else(|| {
            Error::Config("no Asana client; set ASANA_TOKEN to fetch board data".into())
        })
    }

    // ── Config commands ────────────────────────────────────────────

    pub async fn config_get(&self, key: &str) -> Result<Option<String>> {
        self.db
            .reader()
            .call({
                let key = key.to_string();
                move |conn| repository::get_config(conn, &key)
            })
            .await
            .map_err(|e| Error::Database(e.to_string()))
    }

    /// Store a config value after checking it is valid for its key.
    pub async fn config_set(&self, key: &str, value: &str) -> Result<()> {
        config::validate(key, value)?;
        self.db
            .writer()
            .call({
                let key = key.to_string();
                let value = value.to_string();
                move |conn| repository::set_config(conn, &key, &value)
            })
            .await
            .map_err(|e| Error::Database(e.to_string()))
    }

    pub async fn config_list(&self) -> Result<Vec<(String, String)>> {
        self.db
            .reader()
            .call(|conn| repository::list_config(conn))
            .await
            .map_err(|e| Error::Database(e.to_string()))
    }

    /// The configured holiday calendar, or the bundled US calendar.
    pub async fn calendar(&self) -> Result<HolidayCalendar> {
        let path = self.config_get(config::HOLIDAYS_PATH).await?;
        config::load_calendar(path.as_deref())
    }

    pub async fn default_window(&self) -> Result<Window> {
        let value = self.config_get(config::DEFAULT_WINDOW).await?;
        config::default_window(value.as_deref())
    }

    pub async fn page_size(&self) -> Result<Option<u32>> {
        let value = self.config_get(config::PAGE_SIZE).await?;
        Ok(value.and_then(|v| v.parse().ok()))
    }

    // ── Board commands ─────────────────────────────────────────────

    /// Register a board. Project and archive accept a GID or project URL.
    /// Without a display name, the project's Asana name is used when a
    /// client is available.
    pub async fn board_add(
        &self,
        board_key: &str,
        project: &str,
        archive: Option<&str>,
        display_name: Option<&str>,
    ) -> Result<Board> {
        if board_key.trim().is_empty() {
            return Err(Error::InvalidIdentifier("board name is empty".into()));
        }
        let project_gid = url::resolve_project_gid(project)?;
        let archive_gid = archive.map(url::resolve_project_gid).transpose()?;

        let display_name = match (display_name, &self.client) {
            (Some(name), _) => Some(name.to_string()),
            (None, Some(client)) => client.projects().get(&project_gid).await.map(|p| p.name).ok(),
            (None, None) => None,
        };

        self.db
            .writer()
            .call({
                let board_key = board_key.to_string();
                move |conn| {
                    repository::add_board(
                        conn,
                        &board_key,
                        &project_gid,
                        archive_gid.as_deref(),
                        display_name.as_deref(),
                    )?;
                    repository::clear_cache(conn, Some(&board_key))?;
                    repository::get_board(conn, &board_key)
                }
            })
            .await?
            .ok_or_else(|| Error::NotFound(format!("board {board_key}")))
    }

    pub async fn board_remove(&self, board_key: &str) -> Result<bool> {
        self.db
            .writer()
            .call({
                let board_key = board_key.to_string();
                move |conn| repository::remove_board(conn, &board_key)
            })
            .await
            .map_err(|e| Error::Database(e.to_string()))
    }

    pub async fn board_list(&self) -> Result<Vec<Board>> {
        self.db
            .reader()
            .call(|conn| repository::list_boards(conn))
            .await
            .map_err(|e| Error::Database(e.to_string()))
    }

    pub async fn board(&self, board_key: &str) -> Result<Board> {
        self.db
            .reader()
            .call({
                let board_key = board_key.to_string();
                move |conn| repository::get_board(conn, &board_key)
            })
            .await?
            .ok_or_else(|| {
                Error::NotFound(format!(
                    "board '{board_key}'. Run: deskpulse board add {board_key} <PROJECT_GID_OR_URL>"
                ))
            })
    }

    pub async fn cache_clear(&self, board_key: Option<&str>) -> Result<usize> {
        self.db
            .writer()
            .call({
                let board_key = board_key.map(str::to_string);
                move |conn| repository::clear_cache(conn, board_key.as_deref())
            })
            .await
            .map_err(|e| Error::Database(e.to_string()))
    }

    // ── Loading ────────────────────────────────────────────────────

    /// Raw tasks for a board, served from the cache when it is younger
    /// than [`CACHE_TTL_SECS`] unless `refresh` is set.
    pub async fn board_tasks(
        &self,
        board_key: &str,
        include_archive: bool,
        refresh: bool,
    ) -> Result<Vec<RawTask>> {
        let board = self.board(board_key).await?;
        let key = cache_key(&board.board_key, include_archive);

        if !refresh {
            let cached = self
                .db
                .reader()
                .call({
                    let key = key.clone();
                    move |conn| repository::get_cached_tasks(conn, &key, CACHE_TTL_SECS)
                })
                .await?;
            if let Some(payload) = cached {
                match serde_json::from_str::<Vec<RawTask>>(&payload) {
                    Ok(tasks) => {
                        log::info!(
                            "Using cached data for {} ({} tasks)",
                            board.label(),
                            tasks.len()
                        );
                        return Ok(tasks);
                    }
                    Err(e) => log::warn!("Discarding unreadable cache entry {key}: {e}"),
                }
            }
        }

        let tasks = fetch::fetch_board(self.client()?, &board, include_archive).await?;
        let payload =
            serde_json::to_string(&tasks).map_err(|e| Error::InvalidResponse(e.to_string()))?;
        let count = tasks.len();
        self.db
            .writer()
            .call({
                let board_key = board.board_key.clone();
                move |conn| repository::put_cached_tasks(conn, &key, &board_key, &payload, count)
            })
            .await?;
        log::info!("Fetched {count} tasks for {}", board.label());
        Ok(tasks)
    }

    /// Normalized tickets for a board. Unless `opts.all_history` is set,
    /// only tickets created in the 12 months before `now` are kept, whether
    /// the tasks came from the cache or a fresh fetch.
    pub async fn board_tickets(
        &self,
        board_key: &str,
        opts: LoadOptions,
        now: NaiveDateTime,
    ) -> Result<Vec<NormalizedTicket>> {
        let tasks = self
            .board_tasks(board_key, opts.include_archive, opts.refresh)
            .await?;
        let calendar = self.calendar().await?;
        let tickets = normalize(&tasks, &calendar, now);
        if opts.all_history {
            return Ok(tickets);
        }
        let recent = analytics::last_twelve_months(&tickets, now);
        log::debug!(
            "Kept {} of {} tickets created in the last 12 months",
            recent.len(),
            tickets.len()
        );
        Ok(recent)
    }

    /// Normalized tickets from an Asana JSON export (`{"data": [...]}`).
    pub async fn file_tickets(
        &self,
        path: &Path,
        now: NaiveDateTime,
    ) -> Result<Vec<NormalizedTicket>> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("{}: {e}", path.display())))?;
        let tasks = ticket::parse_task_export(&text)?;
        let calendar = self.calendar().await?;
        Ok(normalize(&tasks, &calendar, now))
    }
}
