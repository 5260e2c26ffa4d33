pub mod retry;

use asanaclient::Client;

use crate::error::Result;
use crate::storage::repository::Board;
use crate::ticket::RawTask;
use retry::retry_api;

/// Fields the normalizer reads. Anything else Asana returns is ignored.
pub const TASK_OPT_FIELDS: &str = "gid,name,created_at,modified_at,completed_at,\
assignee,assignee.name,custom_fields,custom_fields.gid,custom_fields.name,\
custom_fields.enum_value,custom_fields.enum_value.name,custom_fields.number_value,\
custom_fields.text_value,custom_fields.display_value";

/// Every task in a project, following pagination.
pub async fn fetch_project_tasks(client: &Client, project_gid: &str) -> Result<Vec<RawTask>> {
    let query = [("project", project_gid), ("opt_fields", TASK_OPT_FIELDS)];
    let tasks: Result<Vec<RawTask>> = retry_api!(client.get_all("/tasks", &query));
    let tasks = tasks?;
    log::debug!("Fetched {} tasks from project {project_gid}", tasks.len());
    Ok(tasks)
}

/// Tasks of a board's main project, plus its archive when requested.
///
/// A failed archive fetch is logged and the main project's tasks are
/// still returned.
pub async fn fetch_board(
    client: &Client,
    board: &Board,
    include_archive: bool,
) -> Result<Vec<RawTask>> {
    let mut tasks = fetch_project_tasks(client, &board.project_gid).await?;

    if let (true, Some(archive_gid)) = (include_archive, board.archive_gid.as_deref()) {
        match fetch_project_tasks(client, archive_gid).await {
            Ok(archived) => {
                log::info!(
                    "Fetched {} archived tasks for board {}",
                    archived.len(),
                    board.board_key
                );
                tasks.extend(archived);
            }
            Err(e) => {
                log::warn!("Could not fetch archive for board {}: {e}", board.board_key);
            }
        }
    }

    Ok(tasks)
}
