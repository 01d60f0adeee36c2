use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::{Context, Result};
use async_trait::async_trait;

use threadscrape_common::SearchDraft;

/// Where the last submitted search form lives between visits.
#[async_trait]
pub trait DraftStore: Send + Sync {
    /// `None` when nothing has been saved yet.
    async fn load(&self) -> Result<Option<SearchDraft>>;

    async fn save(&self, draft: &SearchDraft) -> Result<()>;

    /// Saved draft, or the form defaults.
    async fn load_or_default(&self) -> Result<SearchDraft> {
        Ok(self.load().await?.unwrap_or_default())
    }
}

/// JSON file on disk. Parent directories are created on first save.
pub struct FileDraftStore {
    path: PathBuf,
}

impl FileDraftStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl DraftStore for FileDraftStore {
    async fn load(&self) -> Result<Option<SearchDraft>> {
        let raw = match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(e).with_context(|| format!("reading {}", self.path.display()))
            }
        };
        let draft = serde_json::from_str(&raw)
            .with_context(|| format!("parsing {}", self.path.display()))?;
        Ok(Some(draft))
    }

    async fn save(&self, draft: &SearchDraft) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .with_context(|| format!("creating {}", parent.display()))?;
        }
        let json = serde_json::to_string_pretty(draft)?;
        tokio::fs::write(&self.path, json)
            .await
            .with_context(|| format!("writing {}", self.path.display()))?;
        Ok(())
    }
}

/// Process-local store, for tests and ephemeral deployments.
#[derive(Default)]
pub struct MemoryDraftStore {
    draft: Mutex<Option<SearchDraft>>,
}

impl MemoryDraftStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DraftStore for MemoryDraftStore {
    async fn load(&self) -> Result<Option<SearchDraft>> {
        Ok(self.draft.lock().unwrap_or_else(|e| e.into_inner()).clone())
    }

    async fn save(&self, draft: &SearchDraft) -> Result<()> {
        *self.draft.lock().unwrap_or_else(|e| e.into_inner()) = Some(draft.clone());
        Ok(())
    }
}
