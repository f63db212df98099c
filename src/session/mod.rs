//! Catalog session
//!
//! The single owner of catalog state. The presentation layer forwards user intents
//! (search typed, genre chosen, item clicked, file chosen, submit, download) here and
//! renders what it reads back. Intents are handled one at a time.

mod selection;
mod workflow;

pub use selection::Selection;
pub use workflow::{AddWorkflow, DraftField, DraftItem, DraftUpdate, SubmitError};

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::catalog::{CatalogItem, CatalogStore, GenreFilter, ItemId};
use crate::config::AppConfig;
use crate::export::{export_item, ExportError, ExportResult, ExportSettings};
use crate::ingest::{DataUrl, IngestError, IngestOutcome, IngestTicket, Ingestor};
use crate::search::{visible_items, FilterCriteria};

/// Catalog state plus the selection and upload workflow around it
pub struct CatalogSession {
    store: CatalogStore,
    criteria: FilterCriteria,
    selection: Selection,
    /// `Some` while the upload dialog is open
    workflow: Option<AddWorkflow>,
    ingestor: Ingestor,
    export_settings: ExportSettings,
}

impl CatalogSession {
    pub fn new(store: CatalogStore) -> Self {
        Self {
            store,
            criteria: FilterCriteria::default(),
            selection: Selection::default(),
            workflow: None,
            ingestor: Ingestor::new(),
            export_settings: ExportSettings::default(),
        }
    }

    /// Build a session as described by `config`
    pub fn from_config(config: &AppConfig) -> Self {
        let store = if config.catalog.load_starter_items {
            CatalogStore::with_starter_items()
        } else {
            CatalogStore::new()
        };

        let mut session = Self::new(store);
        session.export_settings = config.export.settings();
        session
    }

    pub fn store(&self) -> &CatalogStore {
        &self.store
    }

    pub fn export_settings(&self) -> &ExportSettings {
        &self.export_settings
    }

    // --- Search ---

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.criteria.query = query.into();
    }

    pub fn query(&self) -> &str {
        &self.criteria.query
    }

    pub fn set_genre_filter(&mut self, genre: impl Into<GenreFilter>) {
        self.criteria.genre = genre.into();
    }

    pub fn genre_filter(&self) -> GenreFilter {
        self.criteria.genre
    }

    pub fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    /// Items matching the current criteria, newest first
    pub fn visible_items(&self) -> Vec<&CatalogItem> {
        visible_items(self.store.items(), &self.criteria)
    }

    // --- Detail selection ---

    /// Open `id` in the detail view, or close it with `None`.
    ///
    /// Ids that are not in the store leave the selection unchanged.
    pub fn select_item(&mut self, id: Option<ItemId>) {
        match id {
            Some(id) if self.store.get(id).is_some() => self.selection.select(id),
            Some(id) => log::warn!("Ignoring selection of unknown item {}", id),
            None => self.selection.dismiss(),
        }
    }

    pub fn selection(&self) -> Option<&CatalogItem> {
        self.selection.selected().and_then(|id| self.store.get(id))
    }

    // --- Add workflow ---

    /// Open the upload dialog with an empty draft. Does nothing if already open.
    ///
    /// A fresh draft never receives an image read that was started before it opened.
    pub fn open_add_workflow(&mut self) {
        if self.workflow.is_none() {
            self.ingestor.cancel();
            self.workflow = Some(AddWorkflow::default());
        }
    }

    /// Cancel the upload dialog, discarding the draft
    pub fn close_add_workflow(&mut self) {
        if self.workflow.take().is_some() {
            log::debug!("Add workflow cancelled");
        }
        self.ingestor.cancel();
    }

    pub fn is_add_workflow_open(&self) -> bool {
        self.workflow.is_some()
    }

    pub fn draft(&self) -> Option<&DraftItem> {
        self.workflow.as_ref().map(AddWorkflow::draft)
    }

    /// Latest ingested image for the upload dialog preview
    pub fn preview(&self) -> Option<&DataUrl> {
        self.workflow.as_ref().and_then(AddWorkflow::preview)
    }

    /// Apply a partial edit to the draft. Returns `false` when no workflow is open.
    pub fn update_draft(&mut self, update: DraftUpdate) -> bool {
        match self.workflow.as_mut() {
            Some(workflow) => {
                workflow.draft.apply(update);
                true
            }
            None => false,
        }
    }

    /// Start reading an image file for the draft.
    ///
    /// Returns `None` without reading anything when no workflow is open.
    pub fn ingest_file(&mut self, path: PathBuf) -> Option<IngestTicket> {
        if self.workflow.is_none() {
            log::warn!("Ignoring {}: add workflow is not open", path.display());
            return None;
        }
        Some(self.ingestor.start(path))
    }

    /// Start an ingestion from any source, e.g. dropped or pasted data
    pub fn ingest_with<F>(&mut self, job: F) -> Option<IngestTicket>
    where
        F: FnOnce() -> Result<DataUrl, IngestError> + Send + 'static,
    {
        if self.workflow.is_none() {
            log::warn!("Ignoring image: add workflow is not open");
            return None;
        }
        Some(self.ingestor.start_with(job))
    }

    /// Is an image still being read?
    pub fn is_ingesting(&self) -> bool {
        self.ingestor.is_pending()
    }

    /// Apply a finished ingestion, if any, to the draft and preview.
    ///
    /// Returns the outcome so the caller can report failures.
    pub fn poll_ingestion(&mut self) -> Option<Result<IngestTicket, IngestError>> {
        let outcome = self.ingestor.poll()?;
        Some(self.apply_ingestion(outcome))
    }

    /// Like [`poll_ingestion`](Self::poll_ingestion) but blocks up to `timeout`
    pub fn wait_ingestion(
        &mut self,
        timeout: Duration,
    ) -> Option<Result<IngestTicket, IngestError>> {
        let outcome = self.ingestor.wait(timeout)?;
        Some(self.apply_ingestion(outcome))
    }

    fn apply_ingestion(&mut self, outcome: IngestOutcome) -> Result<IngestTicket, IngestError> {
        let image = match outcome.result {
            Ok(image) => image,
            Err(e) => {
                log::warn!("{}", e);
                return Err(e);
            }
        };

        match self.workflow.as_mut() {
            Some(workflow) => {
                log::info!("Image ready ({})", image.mime());
                workflow.preview = Some(image.clone());
                workflow.draft.image = Some(image);
            }
            None => log::debug!("Dropping image for closed add workflow"),
        }

        Ok(outcome.ticket)
    }

    /// Commit the draft to the catalog.
    ///
    /// On success the new item is first in the store and the workflow is closed.
    /// On failure nothing changes and the workflow stays open.
    pub fn submit_draft(&mut self) -> Result<ItemId, SubmitError> {
        let workflow = self.workflow.as_ref().ok_or(SubmitError::WorkflowClosed)?;

        let item = workflow.draft.to_new_item().inspect_err(|e| {
            log::warn!("Rejected draft: {}", e);
        })?;

        let id = self.store.insert(item).id;
        self.workflow = None;
        self.ingestor.cancel();
        Ok(id)
    }

    // --- Download ---

    /// Write the icon for `id` into `dir`
    pub fn download_item(&self, id: ItemId, dir: &Path) -> Result<ExportResult, ExportError> {
        let item = self.store.get(id).ok_or(ExportError::UnknownItem(id))?;
        log::info!("Downloading icon \"{}\"", item.title);
        export_item(item, dir, &self.export_settings)
    }
}

impl Default for CatalogSession {
    fn default() -> Self {
        Self::new(CatalogStore::new())
    }
}
