use crate::error::{Error, Result};

const ASANA_APP: &str = "https://app.asana.com";

/// What an Asana link points at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AsanaLink {
    Project {
        project_gid: String,
    },
    Task {
        task_gid: String,
        project_gid: Option<String>,
    },
}

/// Parse an Asana project or task link.
///
/// Accepted shapes:
/// - `/0/<project>`, `/0/<project>/<view>` and `/0/<project>/<task>`
/// - `/1/<workspace>/project/<project>/...` and `/1/<workspace>/task/<task>`
pub fn parse_asana_link(input: &str) -> Result<AsanaLink> {
    let url = url::Url::parse(input).map_err(|e| Error::UrlParse(e.to_string()))?;
    if !url.host_str().unwrap_or("").ends_with("asana.com") {
        return Err(Error::UrlParse(format!("not an Asana URL: {input}")));
    }

    let segments: Vec<&str> = url
        .path_segments()
        .map(|s| s.filter(|seg| !seg.is_empty()).collect())
        .unwrap_or_default();

    match segments.as_slice() {
        ["0", project, rest @ ..] if is_gid(project) => match rest.first() {
            Some(task) if is_gid(task) => Ok(AsanaLink::Task {
                task_gid: task.to_string(),
                project_gid: Some(project.to_string()),
            }),
            _ => Ok(AsanaLink::Project {
                project_gid: project.to_string(),
            }),
        },
        ["1", workspace, "project", project, ..] if is_gid(workspace) && is_gid(project) => {
            Ok(AsanaLink::Project {
                project_gid: project.to_string(),
            })
        }
        ["1", workspace, "task", task, ..] if is_gid(workspace) && is_gid(task) => {
            Ok(AsanaLink::Task {
                task_gid: task.to_string(),
                project_gid: None,
            })
        }
        _ => Err(Error::UrlParse(format!("unsupported Asana URL: {input}"))),
    }
}

/// Asana GIDs are all digits.
pub fn is_gid(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_ascii_digit())
}

/// Project GID from a raw GID or a project URL.
pub fn resolve_project_gid(input: &str) -> Result<String> {
    let input = input.trim();
    if is_gid(input) {
        return Ok(input.to_string());
    }
    if !input.contains("asana.com") {
        return Err(Error::InvalidIdentifier(format!(
            "expected a project GID or Asana project URL, got '{input}'"
        )));
    }
    match parse_asana_link(input)? {
        AsanaLink::Project { project_gid } => Ok(project_gid),
        AsanaLink::Task { .. } => Err(Error::InvalidIdentifier(format!(
            "'{input}' links to a task, not a project"
        ))),
    }
}

/// Permalink to a task in the context of its project.
pub fn task_url(project_gid: &str, task_gid: &str) -> String {
    format!("{ASANA_APP}/0/{project_gid}/{task_gid}")
}
