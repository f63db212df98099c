//! The "add icon" workflow and its draft

use std::fmt;
use thiserror::Error;

use crate::catalog::{Genre, NewItem};
use crate::ingest::DataUrl;

/// Draft fields that must be filled before submitting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DraftField {
    Title,
    Image,
}

impl fmt::Display for DraftField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Title => f.write_str("title"),
            Self::Image => f.write_str("image"),
        }
    }
}

/// Errors returned when submitting a draft
#[derive(Error, Debug, PartialEq, Eq)]
pub enum SubmitError {
    #[error("Missing required fields: {}", join_fields(.0))]
    MissingRequiredField(Vec<DraftField>),

    #[error("The add workflow is not open")]
    WorkflowClosed,
}

fn join_fields(fields: &[DraftField]) -> String {
    fields.iter().map(|f| f.to_string()).collect::<Vec<_>>().join(", ")
}

/// An icon being put together in the upload dialog
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DraftItem {
    /// May be empty until the user types one
    pub title: String,
    pub genre: Genre,
    /// Empty until an ingestion completes
    pub image: Option<DataUrl>,
}

impl DraftItem {
    /// Fields still blocking submission, in display order
    pub fn missing_fields(&self) -> Vec<DraftField> {
        let mut missing = Vec::new();
        if self.title.is_empty() {
            missing.push(DraftField::Title);
        }
        if self.image.is_none() {
            missing.push(DraftField::Image);
        }
        missing
    }

    pub fn apply(&mut self, update: DraftUpdate) {
        if let Some(title) = update.title {
            self.title = title;
        }
        if let Some(genre) = update.genre {
            self.genre = genre;
        }
        if let Some(image) = update.image {
            self.image = Some(image);
        }
    }

    /// Turn a complete draft into an item ready for the store
    pub(crate) fn to_new_item(&self) -> Result<NewItem, SubmitError> {
        let missing = self.missing_fields();
        match &self.image {
            Some(image) if missing.is_empty() => Ok(NewItem {
                title: self.title.clone(),
                genre: self.genre,
                image: image.clone().into(),
            }),
            _ => Err(SubmitError::MissingRequiredField(missing)),
        }
    }
}

/// A partial edit of the draft. Unset fields are left alone.
#[derive(Debug, Clone, Default)]
pub struct DraftUpdate {
    pub title: Option<String>,
    pub genre: Option<Genre>,
    pub image: Option<DataUrl>,
}

impl DraftUpdate {
    pub fn title(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Self::default()
        }
    }

    pub fn genre(genre: Genre) -> Self {
        Self {
            genre: Some(genre),
            ..Self::default()
        }
    }

    pub fn image(image: DataUrl) -> Self {
        Self {
            image: Some(image),
            ..Self::default()
        }
    }
}

/// State of an open upload dialog
#[derive(Debug, Default)]
pub struct AddWorkflow {
    pub(crate) draft: DraftItem,
    /// Latest ingested image, shown before the draft is submitted
    pub(crate) preview: Option<DataUrl>,
}

impl AddWorkflow {
    pub fn draft(&self) -> &DraftItem {
        &self.draft
    }

    pub fn preview(&self) -> Option<&DataUrl> {
        self.preview.as_ref()
    }
}
