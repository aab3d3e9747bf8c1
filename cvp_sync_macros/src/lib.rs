mod record;

use proc_macro::TokenStream;

/// Derive macro for the `Record` trait.
///
/// # Usage
///
/// ```ignore
/// #[derive(Clone, Serialize, Deserialize, Record)]
/// #[record(typename = "CoreColdtag")]
/// struct CoreColdtag {
///     #[record(id)]
///     pub id: String,
///     pub mac_address: String,
/// }
/// ```
///
/// - `#[record(typename = "...")]` sets the GraphQL `__typename`.
///   If omitted, defaults to the struct name.
/// - `#[record(id)]` marks the field used as the identity key.
///   If omitted, defaults to a field named `id`.
#[proc_macro_derive(Record, attributes(record))]
pub fn derive_record(input: TokenStream) -> TokenStream {
    record::derive_record(input)
}
