use std::future::Future;
use std::sync::Arc;

use parking_lot::Mutex;

use super::ListPage;
use crate::context::AppContext;
use crate::domain::{Editable, Listed};
use crate::error::SyncError;
use crate::orchestrator::{Fetcher, Settled};
use crate::phase::Phase;
use crate::reconcile::{ChangeSet, FieldErrors, Validate};

/// Result of submitting an update sheet.
#[derive(Debug, Clone, PartialEq)]
pub enum UpdateOutcome<R> {
    /// Nothing differs from the fetched values; no mutation was sent.
    Unchanged,
    Updated(R),
}

impl<R> UpdateOutcome<R> {
    pub fn updated(self) -> Option<R> {
        match self {
            UpdateOutcome::Updated(record) => Some(record),
            UpdateOutcome::Unchanged => None,
        }
    }
}

struct EditState<F> {
    edited: Option<F>,
    errors: FieldErrors,
}

impl<F> Default for EditState<F> {
    fn default() -> Self {
        Self {
            edited: None,
            errors: FieldErrors::new(),
        }
    }
}

/// Edit sheet for one record at a time.
///
/// Opening a record fetches it by id; a late response for a record that is
/// no longer open is dropped. Submitting compares the edited form to the
/// fetched values and sends only the fields that changed.
pub struct UpdateSheet<R: Editable> {
    ctx: AppContext,
    record: Fetcher<String, R>,
    edit: Arc<Mutex<EditState<R::Form>>>,
}

impl<R: Editable> Clone for UpdateSheet<R> {
    fn clone(&self) -> Self {
        Self {
            ctx: self.ctx.clone(),
            record: self.record.clone(),
            edit: Arc::clone(&self.edit),
        }
    }
}

impl<R: Editable + Listed> UpdateSheet<R> {
    pub fn new(ctx: &AppContext) -> Self {
        Self {
            ctx: ctx.clone(),
            record: ctx.fetcher(R::LABEL),
            edit: Arc::new(Mutex::new(EditState::default())),
        }
    }

    /// Open the sheet on `id`, or close it with `None`.
    ///
    /// The previously open record and any edits to it are discarded at once.
    pub fn open(&self, id: Option<String>) -> impl Future<Output = Settled> + Send + 'static {
        self.close();
        let client = self.ctx.client().clone();
        self.record.select(id, move |id| {
            client.run::<R::ById>(R::by_id_variables(&id))
        })
    }

    pub fn close(&self) {
        *self.edit.lock() = EditState::default();
        self.record.clear();
    }

    /// The record as fetched (or as last updated from this sheet).
    pub fn record(&self) -> Option<R> {
        self.record.data()
    }

    pub fn phase(&self) -> Phase {
        self.record.phase()
    }

    /// Form values as fetched.
    pub fn original(&self) -> Option<R::Form> {
        self.record.with_data(R::to_form)
    }

    /// Current form values: the edits, or the fetched values if untouched.
    pub fn form(&self) -> Option<R::Form> {
        let edited = self.edit.lock().edited.clone();
        edited.or_else(|| self.original())
    }

    /// Change the form. Does nothing until a record is loaded.
    ///
    /// Validation errors from the last submit are cleared; the next submit
    /// checks the form again.
    pub fn edit(&self, f: impl FnOnce(&mut R::Form)) -> bool {
        let Some(original) = self.original() else {
            return false;
        };
        let mut state = self.edit.lock();
        f(state.edited.get_or_insert(original));
        state.errors = FieldErrors::default();
        true
    }

    pub fn errors(&self) -> FieldErrors {
        self.edit.lock().errors.clone()
    }

    /// Send the changed fields.
    ///
    /// An unchanged form returns `Unchanged` without validating or sending.
    /// Validation and lifecycle errors are returned inline; request failures
    /// are also toasted. The form is kept on every failure.
    pub async fn submit(&self) -> Result<UpdateOutcome<R>, SyncError> {
        let record = self
            .record
            .data()
            .ok_or(SyncError::NotSelected(R::LABEL))?;
        let original = record.to_form();
        let edited = self.form().unwrap_or_else(|| original.clone());

        let changes = ChangeSet::between(&original, &edited)?;
        if changes.is_empty() {
            self.edit.lock().errors = FieldErrors::default();
            tracing::info!(record = R::LABEL, id = record.id(), "no changes to submit");
            return Ok(UpdateOutcome::Unchanged);
        }

        record.check_editable()?;

        let errors = edited.validate();
        self.edit.lock().errors = errors.clone();
        if !errors.is_empty() {
            return Err(SyncError::Validation(errors));
        }

        tracing::debug!(
            record = R::LABEL,
            id = record.id(),
            fields = ?changes.field_names(),
            "submitting partial update"
        );
        let patch: R::Form = changes.into_patch()?;
        let request = self
            .ctx
            .client()
            .run::<R::Update>(R::update_variables(record.id(), patch));

        match request.await {
            Ok(updated) => {
                let still_open = self
                    .record
                    .update_data(|current| {
                        if current.id() == updated.id() {
                            *current = updated.clone();
                            true
                        } else {
                            false
                        }
                    })
                    .unwrap_or(false);
                if still_open {
                    self.edit.lock().edited = None;
                }
                Ok(UpdateOutcome::Updated(updated))
            }
            Err(error) => {
                self.ctx.toasts().catch_error(&error);
                Err(error)
            }
        }
    }

    /// `submit`, then reconcile the updated record into `page`.
    pub async fn submit_to(&self, page: &ListPage<R>) -> Result<UpdateOutcome<R>, SyncError> {
        let outcome = self.submit().await?;
        if let UpdateOutcome::Updated(record) = &outcome {
            page.on_updated(record.clone());
        }
        Ok(outcome)
    }
}
