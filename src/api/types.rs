//! Wire types for the gitpod.v1 environment and runner services
//!
//! Responses follow the proto3 JSON mapping: camelCase keys, and fields holding
//! their default value (zero counts, UNSPECIFIED phase) are omitted entirely.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle phase of an environment
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EnvironmentPhase {
    #[default]
    #[serde(rename = "ENVIRONMENT_PHASE_UNSPECIFIED", alias = "unspecified")]
    Unspecified,
    #[serde(rename = "ENVIRONMENT_PHASE_CREATING", alias = "creating")]
    Creating,
    #[serde(rename = "ENVIRONMENT_PHASE_STARTING", alias = "starting")]
    Starting,
    #[serde(rename = "ENVIRONMENT_PHASE_RUNNING", alias = "running")]
    Running,
    #[serde(rename = "ENVIRONMENT_PHASE_UPDATING", alias = "updating")]
    Updating,
    #[serde(rename = "ENVIRONMENT_PHASE_STOPPING", alias = "stopping")]
    Stopping,
    #[serde(rename = "ENVIRONMENT_PHASE_STOPPED", alias = "stopped")]
    Stopped,
    #[serde(rename = "ENVIRONMENT_PHASE_DELETING", alias = "deleting")]
    Deleting,
    #[serde(rename = "ENVIRONMENT_PHASE_DELETED", alias = "deleted")]
    Deleted,
    /// A phase this client does not know about yet
    #[serde(other)]
    Unknown,
}

impl EnvironmentPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            EnvironmentPhase::Unspecified => "ENVIRONMENT_PHASE_UNSPECIFIED",
            EnvironmentPhase::Creating => "ENVIRONMENT_PHASE_CREATING",
            EnvironmentPhase::Starting => "ENVIRONMENT_PHASE_STARTING",
            EnvironmentPhase::Running => "ENVIRONMENT_PHASE_RUNNING",
            EnvironmentPhase::Updating => "ENVIRONMENT_PHASE_UPDATING",
            EnvironmentPhase::Stopping => "ENVIRONMENT_PHASE_STOPPING",
            EnvironmentPhase::Stopped => "ENVIRONMENT_PHASE_STOPPED",
            EnvironmentPhase::Deleting => "ENVIRONMENT_PHASE_DELETING",
            EnvironmentPhase::Deleted => "ENVIRONMENT_PHASE_DELETED",
            EnvironmentPhase::Unknown => "UNKNOWN",
        }
    }
}

impl std::fmt::Display for EnvironmentPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Creator {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub principal: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnvironmentMetadata {
    pub organization_id: Option<String>,
    pub creator: Option<Creator>,
    pub created_at: Option<DateTime<Utc>>,
    pub last_started_at: Option<DateTime<Utc>>,
    pub project_id: Option<String>,
    pub runner_id: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContextUrl {
    pub url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitializerSpec {
    pub context_url: Option<ContextUrl>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentInitializer {
    #[serde(default)]
    pub specs: Vec<InitializerSpec>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentSpec {
    pub initializer: Option<ContentInitializer>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnvironmentSpec {
    pub content: Option<ContentSpec>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GitStatus {
    pub total_changed_files: Option<u32>,
    pub total_unpushed_commits: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentStatus {
    pub git: Option<GitStatus>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnvironmentStatus {
    #[serde(default)]
    pub phase: EnvironmentPhase,
    pub content: Option<ContentStatus>,
}

/// An environment as returned by ListEnvironments
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Environment {
    pub id: String,
    #[serde(default)]
    pub metadata: EnvironmentMetadata,
    #[serde(default)]
    pub spec: EnvironmentSpec,
    #[serde(default)]
    pub status: EnvironmentStatus,
}

impl Environment {
    pub fn phase(&self) -> EnvironmentPhase {
        self.status.phase
    }

    fn git(&self) -> Option<&GitStatus> {
        self.status.content.as_ref()?.git.as_ref()
    }

    /// Uncommitted changed files; absent means zero
    pub fn changed_files(&self) -> u32 {
        self.git().and_then(|g| g.total_changed_files).unwrap_or(0)
    }

    /// Commits not yet pushed; absent means zero
    pub fn unpushed_commits(&self) -> u32 {
        self.git().and_then(|g| g.total_unpushed_commits).unwrap_or(0)
    }

    /// Context URL of the first content initializer spec
    pub fn project_url(&self) -> Option<&str> {
        self.spec
            .content
            .as_ref()?
            .initializer
            .as_ref()?
            .specs
            .first()?
            .context_url
            .as_ref()?
            .url
            .as_deref()
            .filter(|url| !url.is_empty())
    }

    pub fn creator_id(&self) -> Option<&str> {
        self.metadata
            .creator
            .as_ref()
            .map(|c| c.id.as_str())
            .filter(|id| !id.is_empty())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationRequest {
    pub page_size: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_token: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnvironmentFilter {
    pub status_phases: Vec<EnvironmentPhase>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListEnvironmentsRequest {
    pub organization_id: String,
    pub pagination: PaginationRequest,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter: Option<EnvironmentFilter>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct PaginationResponse {
    #[serde(
        default,
        rename = "nextToken",
        alias = "nextPageToken",
        alias = "next_token",
        alias = "next_page_token"
    )]
    pub next_token: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ListEnvironmentsResponse {
    #[serde(default)]
    pub environments: Vec<Environment>,
    #[serde(default)]
    pub pagination: PaginationResponse,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteEnvironmentRequest {
    pub environment_id: String,
    pub organization_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GetRunnerRequest {
    pub runner_id: String,
}

/// Where a runner executes environments
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunnerKind {
    #[default]
    #[serde(rename = "RUNNER_KIND_UNSPECIFIED")]
    Unspecified,
    #[serde(rename = "RUNNER_KIND_LOCAL")]
    Local,
    #[serde(rename = "RUNNER_KIND_REMOTE")]
    Remote,
    #[serde(rename = "RUNNER_KIND_LOCAL_CONFIGURATION")]
    LocalConfiguration,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Runner {
    #[serde(default)]
    pub kind: RunnerKind,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct GetRunnerResponse {
    #[serde(default)]
    pub runner: Runner,
}
