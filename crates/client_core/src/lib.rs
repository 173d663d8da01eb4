use std::sync::atomic::{AtomicU32, Ordering};

use reqwest::Client;
use shared::{
    domain::{ProjectId, ProjectRecord},
    protocol::{DraftField, IconUpload, ProjectDraft, ICON_FIELD},
};
use tokio::sync::{broadcast, Mutex};
use tracing::{info, warn};
use url::Url;

pub mod error;
pub use error::AdminApiError;

/// Default backend address the admin panel talks to in production.
pub const PRODUCTION_API_URL: &str = "https://portfolio-backend-clhc.onrender.com";

/// Authority the development backend serves icons from; records coming back
/// with this host still need to render against the deployed backend.
pub const DEV_ICON_AUTHORITY: &str = "localhost:5000";

/// Construction-time settings for [`ProjectListController`]. The base
/// address is always injected; nothing in the library reads it from a
/// global.
#[derive(Debug, Clone)]
pub struct PanelConfig {
    pub api_base_url: String,
    pub icon_rewrite: Option<IconHostRewrite>,
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            api_base_url: PRODUCTION_API_URL.to_string(),
            icon_rewrite: Some(IconHostRewrite::default()),
        }
    }
}

/// Presentation-layer rule: icon URLs whose authority equals
/// `dev_authority` are rewritten to `public_authority` before being used as
/// image sources. Everything else passes through untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IconHostRewrite {
    pub dev_authority: String,
    pub public_authority: String,
}

impl Default for IconHostRewrite {
    fn default() -> Self {
        Self {
            dev_authority: DEV_ICON_AUTHORITY.to_string(),
            public_authority: PRODUCTION_API_URL
                .trim_start_matches("https://")
                .to_string(),
        }
    }
}

impl IconHostRewrite {
    pub fn apply(&self, raw: &str) -> String {
        let Ok(mut url) = Url::parse(raw) else {
            return raw.to_string();
        };
        let authority = match (url.host_str(), url.port()) {
            (Some(host), Some(port)) => format!("{host}:{port}"),
            (Some(host), None) => host.to_string(),
            _ => return raw.to_string(),
        };
        if authority != self.dev_authority {
            return raw.to_string();
        }

        let (host, port) = match self.public_authority.rsplit_once(':') {
            Some((host, port)) if port.chars().all(|c| c.is_ascii_digit()) => {
                (host, port.parse::<u16>().ok())
            }
            _ => (self.public_authority.as_str(), None),
        };
        if url.set_host(Some(host)).is_err() || url.set_port(port).is_err() {
            return raw.to_string();
        }
        url.to_string()
    }
}

/// Which remote operation an event or pending counter refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Refresh,
    Submit,
    Delete,
}

/// Events the view layer re-renders from. The cache snapshot is published
/// wholesale after every successful refresh; failures are surfaced here as
/// well as through each operation's return value.
#[derive(Debug, Clone)]
pub enum PanelEvent {
    ProjectsRefreshed(Vec<ProjectRecord>),
    DraftReset,
    RemoteOperationFailed { operation: Operation, message: String },
}

/// Both halves of a mutating operation: the create/delete request itself
/// and the unconditional follow-up refresh. The follow-up runs (and its
/// result is reported) even when the request half failed; there is no
/// rollback, the refreshed snapshot is simply whatever the backend holds.
#[derive(Debug)]
pub struct MutationOutcome {
    pub request: Result<(), AdminApiError>,
    pub refresh: Result<Vec<ProjectRecord>, AdminApiError>,
}

/// Point-in-time view of how many requests of each kind are in flight.
/// Overlapping requests are permitted; the last refresh to resolve wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingOperations {
    pub refresh: u32,
    pub submit: u32,
    pub delete: u32,
}

impl PendingOperations {
    pub fn is_idle(&self) -> bool {
        self.refresh == 0 && self.submit == 0 && self.delete == 0
    }
}

#[derive(Default)]
struct InFlight {
    refresh: AtomicU32,
    submit: AtomicU32,
    delete: AtomicU32,
}

#[derive(Default)]
struct PanelState {
    projects: Vec<ProjectRecord>,
    draft: ProjectDraft,
    icon: Option<IconUpload>,
}

/// Owns the local view of the remote project collection and mediates every
/// mutation through it. The cached collection is a point-in-time snapshot,
/// fully replaced after each round trip, never patched incrementally.
pub struct ProjectListController {
    http: Client,
    base_url: String,
    icon_rewrite: Option<IconHostRewrite>,
    inner: Mutex<PanelState>,
    in_flight: InFlight,
    events: broadcast::Sender<PanelEvent>,
}

impl ProjectListController {
    pub fn new(config: PanelConfig) -> Self {
        let (events, _) = broadcast::channel(64);
        Self {
            http: Client::new(),
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            icon_rewrite: config.icon_rewrite,
            inner: Mutex::new(PanelState::default()),
            in_flight: InFlight::default(),
            events,
        }
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<PanelEvent> {
        self.events.subscribe()
    }

    /// Re-fetch the whole collection and replace the cache. On failure the
    /// previous snapshot stays displayed (stale-but-available); the cache
    /// is never cleared by a failed read.
    pub async fn refresh(&self) -> Result<Vec<ProjectRecord>, AdminApiError> {
        self.in_flight.refresh.fetch_add(1, Ordering::SeqCst);
        let fetched = self.fetch_collection().await;
        self.in_flight.refresh.fetch_sub(1, Ordering::SeqCst);

        match fetched {
            Ok(projects) => {
                {
                    let mut inner = self.inner.lock().await;
                    inner.projects = projects.clone();
                }
                info!(count = projects.len(), "project list refreshed");
                let _ = self
                    .events
                    .send(PanelEvent::ProjectsRefreshed(projects.clone()));
                Ok(projects)
            }
            Err(err) => {
                warn!("project list refresh failed: {err}");
                self.report_failure(Operation::Refresh, &err);
                Err(err)
            }
        }
    }

    /// Set one draft field by key. Any string is accepted, including empty.
    pub async fn update_draft(&self, field: DraftField, value: impl Into<String>) {
        let mut inner = self.inner.lock().await;
        inner.draft.set_field(field, value);
    }

    /// Replace or clear the staged icon attachment.
    pub async fn set_icon_attachment(&self, icon: Option<IconUpload>) {
        let mut inner = self.inner.lock().await;
        inner.icon = icon;
    }

    /// Package the draft (text fields plus the optional icon) as a
    /// multipart create request. The draft is reset to empty before the
    /// backend's answer is known, deliberately: a failed create leaves an
    /// empty form and a refreshed table, exactly like a successful one.
    pub async fn submit_draft(&self) -> MutationOutcome {
        self.in_flight.submit.fetch_add(1, Ordering::SeqCst);
        let (draft, icon) = {
            let mut inner = self.inner.lock().await;
            let draft = std::mem::take(&mut inner.draft);
            let icon = inner.icon.take();
            (draft, icon)
        };
        let _ = self.events.send(PanelEvent::DraftReset);

        let request = self.post_create(draft, icon).await;
        self.in_flight.submit.fetch_sub(1, Ordering::SeqCst);
        match &request {
            Ok(()) => info!("project created"),
            Err(err) => {
                warn!("project create failed: {err}");
                self.report_failure(Operation::Submit, err);
            }
        }

        let refresh = self.refresh().await;
        MutationOutcome { request, refresh }
    }

    /// Delete by identifier, then refresh unconditionally. The cached
    /// collection is only ever changed by the refresh reflecting the
    /// backend's state, never by the delete itself.
    pub async fn delete_record(&self, id: ProjectId) -> MutationOutcome {
        self.in_flight.delete.fetch_add(1, Ordering::SeqCst);
        let request = self.send_delete(id).await;
        self.in_flight.delete.fetch_sub(1, Ordering::SeqCst);
        match &request {
            Ok(()) => info!(project_id = id.0, "project deleted"),
            Err(err) => {
                warn!(project_id = id.0, "project delete failed: {err}");
                self.report_failure(Operation::Delete, err);
            }
        }

        let refresh = self.refresh().await;
        MutationOutcome { request, refresh }
    }

    /// Raw cached snapshot, in backend order.
    pub async fn projects(&self) -> Vec<ProjectRecord> {
        self.inner.lock().await.projects.clone()
    }

    /// The rendered subset: records with a non-empty name. A filter over
    /// the cache, not a mutation of it.
    pub async fn visible_projects(&self) -> Vec<ProjectRecord> {
        self.inner
            .lock()
            .await
            .projects
            .iter()
            .filter(|record| record.has_display_name())
            .cloned()
            .collect()
    }

    pub async fn draft(&self) -> ProjectDraft {
        self.inner.lock().await.draft.clone()
    }

    pub async fn icon_attachment(&self) -> Option<IconUpload> {
        self.inner.lock().await.icon.clone()
    }

    pub fn pending(&self) -> PendingOperations {
        PendingOperations {
            refresh: self.in_flight.refresh.load(Ordering::SeqCst),
            submit: self.in_flight.submit.load(Ordering::SeqCst),
            delete: self.in_flight.delete.load(Ordering::SeqCst),
        }
    }

    /// Image source for a record's icon, with the dev-host rewrite applied.
    pub fn display_icon_url(&self, record: &ProjectRecord) -> Option<String> {
        let raw = record.icon_url.as_deref()?;
        match &self.icon_rewrite {
            Some(rewrite) => Some(rewrite.apply(raw)),
            None => Some(raw.to_string()),
        }
    }

    fn report_failure(&self, operation: Operation, err: &AdminApiError) {
        let _ = self.events.send(PanelEvent::RemoteOperationFailed {
            operation,
            message: err.to_string(),
        });
    }

    fn collection_url(&self) -> String {
        format!("{}/api/apps", self.base_url)
    }

    async fn fetch_collection(&self) -> Result<Vec<ProjectRecord>, AdminApiError> {
        let url = self.collection_url();
        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|source| AdminApiError::Transport {
                url: url.clone(),
                source,
            })?;
        let status = response.status();
        if !status.is_success() {
            return Err(AdminApiError::Status { url, status });
        }
        response
            .json::<Vec<ProjectRecord>>()
            .await
            .map_err(|source| AdminApiError::Decode { url, source })
    }

    async fn post_create(
        &self,
        draft: ProjectDraft,
        icon: Option<IconUpload>,
    ) -> Result<(), AdminApiError> {
        let url = self.collection_url();
        let mut form = reqwest::multipart::Form::new();
        for (name, value) in draft.text_fields() {
            form = form.text(name, value.to_string());
        }
        if let Some(icon) = icon {
            let mut part = reqwest::multipart::Part::bytes(icon.bytes).file_name(icon.filename);
            if let Some(mime) = icon.mime_type.as_deref() {
                part = part.mime_str(mime).map_err(AdminApiError::Attachment)?;
            }
            form = form.part(ICON_FIELD, part);
        }

        let response = self
            .http
            .post(&url)
            .multipart(form)
            .send()
            .await
            .map_err(|source| AdminApiError::Transport {
                url: url.clone(),
                source,
            })?;
        let status = response.status();
        if !status.is_success() {
            return Err(AdminApiError::Status { url, status });
        }
        Ok(())
    }

    async fn send_delete(&self, id: ProjectId) -> Result<(), AdminApiError> {
        let url = format!("{}/{}", self.collection_url(), id.0);
        let response = self
            .http
            .delete(&url)
            .send()
            .await
            .map_err(|source| AdminApiError::Transport {
                url: url.clone(),
                source,
            })?;
        let status = response.status();
        if !status.is_success() {
            return Err(AdminApiError::Status { url, status });
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
