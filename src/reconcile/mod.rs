//! Reconciliation - applying mutation results to already-loaded data.
//!
//! A page holds a `Snapshot` of records it fetched. After a create, update
//! or delete mutation returns, the authoritative record is merged into the
//! snapshot by identity key instead of refetching the whole list.
//!
//! Before an update is sent, `ChangeSet::between` compares the edited form
//! against the values originally fetched. An empty change set means the
//! mutation is skipped; otherwise only the changed fields go on the wire.
//!
//! ## Example
//!
//! ```ignore
//! let changes = ChangeSet::between(&original, &edited)?;
//! if changes.is_empty() {
//!     return Ok(UpdateOutcome::Unchanged);
//! }
//! let patch: DeviceUpdateForm = changes.into_patch()?;
//! let updated = client.run::<UpdateCoreColdtag>(CoreColdtag::update_variables(id, patch)).await?;
//! snapshot.on_updated(updated);
//! ```

mod diff;
mod snapshot;
mod validate;

pub use diff::ChangeSet;
pub use snapshot::Snapshot;
pub use validate::{FieldErrors, Validate};

/// A record with a stable identity key, as returned by the GraphQL API.
pub trait Record: Clone + Send + Sync + 'static {
    /// GraphQL `__typename` of the record.
    const TYPENAME: &'static str;

    /// The identity key used for reconciliation.
    fn id(&self) -> &str;
}
