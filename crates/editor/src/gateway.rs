//! Persistence gateway
//!
//! The editing session only talks to storage through `PersistenceGateway`.
//! Two implementations ship here: an in-memory store for tests and tooling,
//! and a directory of `.form.json` files.

use async_trait::async_trait;
use formforge_core::{BuilderError, BuilderResult, FormId, Timestamped};
use formforge_ir::FormDocument;
use formforge_ir::serialization::{
    form_path, is_form_file, load_form_from_string, save_form_to_string,
};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, info};

/// Storage behind an editing session
#[async_trait]
pub trait PersistenceGateway: Send + Sync {
    /// Fetch a form; `FormNotFound` when absent
    async fn load(&self, id: &FormId) -> BuilderResult<FormDocument>;

    /// Persist a form and return the stored copy
    ///
    /// The returned document carries the store's `updated_at` and an
    /// incremented `version`.
    async fn save(&self, form: &FormDocument) -> BuilderResult<FormDocument>;

    /// List stored forms, newest first
    async fn list(&self) -> BuilderResult<Vec<FormDocument>>;
}

/// Stamp a document the way a store does on write
fn stamp(form: &FormDocument) -> FormDocument {
    let mut stored = form.clone();
    stored.touch();
    stored.version = form.version.saturating_add(1);
    stored
}

fn newest_first(forms: &mut [FormDocument]) {
    forms.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
}

// ============================================================================
// InMemoryGateway
// ============================================================================

/// In-memory form store (for testing and development)
#[derive(Default)]
pub struct InMemoryGateway {
    forms: RwLock<HashMap<FormId, FormDocument>>,
    fail_saves: AtomicBool,
}

impl InMemoryGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store seeded with forms
    pub fn with_forms(forms: impl IntoIterator<Item = FormDocument>) -> Self {
        let gateway = Self::new();
        {
            let mut map = gateway.forms.write();
            for form in forms {
                map.insert(form.id.clone(), form);
            }
        }
        gateway
    }

    /// Make every subsequent save fail until switched off
    pub fn fail_saves(&self, fail: bool) {
        self.fail_saves.store(fail, Ordering::SeqCst);
    }

    /// Stored copy of a form, without going through the async API
    pub fn get(&self, id: &FormId) -> Option<FormDocument> {
        self.forms.read().get(id).cloned()
    }

    /// Number of stored forms
    pub fn len(&self) -> usize {
        self.forms.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.forms.read().is_empty()
    }
}

#[async_trait]
impl PersistenceGateway for InMemoryGateway {
    async fn load(&self, id: &FormId) -> BuilderResult<FormDocument> {
        self.forms
            .read()
            .get(id)
            .cloned()
            .ok_or_else(|| BuilderError::FormNotFound(id.to_string()))
    }

    async fn save(&self, form: &FormDocument) -> BuilderResult<FormDocument> {
        if self.fail_saves.load(Ordering::SeqCst) {
            return Err(BuilderError::persistence("store is unavailable"));
        }
        let stored = stamp(form);
        self.forms.write().insert(stored.id.clone(), stored.clone());
        debug!(form = %stored.id, version = stored.version, "stored form in memory");
        Ok(stored)
    }

    async fn list(&self) -> BuilderResult<Vec<FormDocument>> {
        let mut forms: Vec<_> = self.forms.read().values().cloned().collect();
        newest_first(&mut forms);
        Ok(forms)
    }
}

// ============================================================================
// FileGateway
// ============================================================================

/// Directory of `<form-id>.form.json` files
#[derive(Debug, Clone)]
pub struct FileGateway {
    root: PathBuf,
}

impl FileGateway {
    /// Create a gateway rooted at `root`; the directory is created on first save
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Root directory of the store
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path a form is stored at; ids that would leave the root are rejected
    pub fn path_for(&self, id: &FormId) -> BuilderResult<PathBuf> {
        form_path(&self.root, id)
    }
}

#[async_trait]
impl PersistenceGateway for FileGateway {
    async fn load(&self, id: &FormId) -> BuilderResult<FormDocument> {
        let path = self.path_for(id)?;
        let json = match tokio::fs::read_to_string(&path).await {
            Ok(json) => json,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(BuilderError::FormNotFound(id.to_string()));
            }
            Err(e) => {
                return Err(BuilderError::FileRead {
                    path,
                    message: e.to_string(),
                });
            }
        };
        load_form_from_string(&json).map_err(|e| BuilderError::FileRead {
            path,
            message: format!("Invalid form file format: {}", e),
        })
    }

    async fn save(&self, form: &FormDocument) -> BuilderResult<FormDocument> {
        let path = self.path_for(&form.id)?;
        tokio::fs::create_dir_all(&self.root)
            .await
            .map_err(|e| BuilderError::DirectoryCreate {
                path: self.root.clone(),
                message: e.to_string(),
            })?;

        let stored = stamp(form);
        let json = save_form_to_string(&stored)?;
        tokio::fs::write(&path, json)
            .await
            .map_err(|e| BuilderError::FileWrite {
                path: path.clone(),
                message: e.to_string(),
            })?;

        info!(form = %stored.id, path = %path.display(), "saved form");
        Ok(stored)
    }

    async fn list(&self) -> BuilderResult<Vec<FormDocument>> {
        let mut entries = match tokio::fs::read_dir(&self.root).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut forms = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if !is_form_file(&path) {
                continue;
            }
            let json = tokio::fs::read_to_string(&path).await?;
            match load_form_from_string(&json) {
                Ok(form) => forms.push(form),
                Err(e) => debug!(path = %path.display(), error = %e, "skipping unreadable form file"),
            }
        }
        newest_first(&mut forms);
        Ok(forms)
    }
}

// ============================================================================
// Tests
// ============================================================================
