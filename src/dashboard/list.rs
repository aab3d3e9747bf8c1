use std::future::Future;

use parking_lot::Mutex;

use crate::context::AppContext;
use crate::domain::{Creatable, Deletable, Listed};
use crate::error::SyncError;
use crate::orchestrator::{Fetcher, Settled};
use crate::phase::{FetchState, Phase};
use crate::reconcile::{FieldErrors, Snapshot, Validate};

/// A table of records of one kind, kept in sync with mutations.
///
/// The list is fetched once per `load`; creates, updates and deletes made
/// from this page are merged into the loaded snapshot by id.
pub struct ListPage<R> {
    ctx: AppContext,
    list: Fetcher<(), Snapshot<R>>,
}

/// Core or node coldtag table.
pub type DeviceListPage<D> = ListPage<D>;

impl<R> Clone for ListPage<R> {
    fn clone(&self) -> Self {
        Self {
            ctx: self.ctx.clone(),
            list: self.list.clone(),
        }
    }
}

impl<R: Listed> ListPage<R> {
    pub fn new(ctx: &AppContext) -> Self {
        Self {
            ctx: ctx.clone(),
            list: ctx.fetcher(R::LABEL),
        }
    }

    /// (Re)fetch the whole list.
    pub fn load(&self) -> impl Future<Output = Settled> + Send + 'static {
        let request = self.ctx.client().run::<R::All>(());
        self.list
            .load((), async move { request.await.map(Snapshot::from) })
    }

    /// Append a record returned by a create mutation.
    pub fn on_created(&self, record: R) {
        tracing::debug!(list = R::LABEL, id = record.id(), "appending created record");
        self.list
            .update_data_or_default(|snapshot| snapshot.on_created(record));
    }

    /// Replace a record in place. Returns false if it is not on this page.
    pub fn on_updated(&self, record: R) -> bool {
        let id = record.id().to_string();
        let replaced = self
            .list
            .update_data(|snapshot| snapshot.on_updated(record))
            .unwrap_or(false);
        if !replaced {
            tracing::debug!(list = R::LABEL, %id, "updated record not loaded; ignoring");
        }
        replaced
    }

    pub fn on_deleted(&self, id: &str) -> Option<R> {
        self.list
            .update_data(|snapshot| snapshot.on_deleted(id))
            .flatten()
    }

    /// Validate `form`, create the record and append it.
    ///
    /// Validation failures come back inline and are not toasted.
    pub async fn create(&self, form: &R::CreateForm) -> Result<R, SyncError>
    where
        R: Creatable,
    {
        let errors = form.validate();
        if !errors.is_empty() {
            return Err(SyncError::Validation(errors));
        }

        let request = self.ctx.client().run::<R::Create>(R::create_variables(form));
        let created = self.toast_on_error(request.await)?;
        self.on_created(created.clone());
        Ok(created)
    }

    /// Delete the record and drop it from the page.
    pub async fn delete(&self, id: &str) -> Result<R, SyncError>
    where
        R: Deletable,
    {
        let request = self.ctx.client().run::<R::Delete>(R::delete_variables(id));
        let deleted = self.toast_on_error(request.await)?;
        self.on_deleted(id);
        Ok(deleted)
    }

    pub fn records(&self) -> Vec<R> {
        self.list
            .data()
            .map(Snapshot::into_vec)
            .unwrap_or_default()
    }

    pub fn get(&self, id: &str) -> Option<R> {
        self.list
            .with_data(|snapshot| snapshot.get(id).cloned())
            .flatten()
    }

    pub fn state(&self) -> FetchState<Snapshot<R>> {
        self.list.state()
    }

    pub fn phase(&self) -> Phase {
        self.list.phase()
    }

    pub(crate) fn context(&self) -> &AppContext {
        &self.ctx
    }

    pub(crate) fn toast_on_error<T>(&self, result: Result<T, SyncError>) -> Result<T, SyncError> {
        if let Err(error) = &result {
            if !error.is_inline() {
                self.ctx.toasts().catch_error(error);
            }
        }
        result
    }
}

/// Form state of a "create" sheet.
pub struct CreateSheet<R: Creatable> {
    form: Mutex<R::CreateForm>,
    errors: Mutex<FieldErrors>,
}

impl<R: Creatable> Default for CreateSheet<R> {
    fn default() -> Self {
        Self {
            form: Mutex::new(R::CreateForm::default()),
            errors: Mutex::new(FieldErrors::new()),
        }
    }
}

impl<R: Listed + Creatable> CreateSheet<R> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn form(&self) -> R::CreateForm {
        self.form.lock().clone()
    }

    pub fn edit(&self, f: impl FnOnce(&mut R::CreateForm)) {
        f(&mut self.form.lock());
    }

    pub fn errors(&self) -> FieldErrors {
        self.errors.lock().clone()
    }

    /// Create through `page`. The form is cleared on success and kept on failure.
    pub async fn submit(&self, page: &ListPage<R>) -> Result<R, SyncError> {
        let form = self.form();
        match page.create(&form).await {
            Ok(created) => {
                *self.form.lock() = R::CreateForm::default();
                *self.errors.lock() = FieldErrors::new();
                Ok(created)
            }
            Err(SyncError::Validation(errors)) => {
                *self.errors.lock() = errors.clone();
                Err(SyncError::Validation(errors))
            }
            Err(error) => Err(error),
        }
    }
}
