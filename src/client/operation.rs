use std::collections::BTreeMap;

use serde::de::{DeserializeOwned, Deserializer, Error as _};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OperationKind {
    Query,
    Mutation,
}

/// A named GraphQL query or mutation with typed variables and response.
///
/// `Response` is the shape of the envelope's `data`; `output` picks the part
/// callers care about (usually the record or list under the root field).
pub trait Operation: 'static {
    const NAME: &'static str;
    const KIND: OperationKind;
    const DOCUMENT: &'static str;

    type Variables: Serialize;
    type Response: DeserializeOwned;
    type Output: Send + 'static;

    fn output(response: Self::Response) -> Self::Output;
}

/// The single root field of an operation's `data`, whatever its name.
///
/// Every dashboard operation selects exactly one root field
/// (`displayCoreColdtag`, `updateRouteCycle`, ...).
#[derive(Debug, Clone, PartialEq)]
pub struct Root<T>(pub T);

impl<'de, T: DeserializeOwned> Deserialize<'de> for Root<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let mut fields: BTreeMap<String, T> = BTreeMap::deserialize(deserializer)?;
        if fields.len() != 1 {
            return Err(D::Error::custom(format!(
                "expected exactly one root field, got {}",
                fields.len()
            )));
        }
        match fields.pop_first() {
            Some((_, value)) => Ok(Root(value)),
            None => Err(D::Error::custom("empty data object")),
        }
    }
}

/// `{ all: [...] }` selection.
#[derive(Debug, Clone, Deserialize)]
pub struct All<T> {
    pub all: Vec<T>,
}

/// `{ byId: {...} }` selection.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ById<T> {
    pub by_id: T,
}

/// Declare an `Operation` as a unit struct.
///
/// ```ignore
/// operation! {
///     /// All core coldtags.
///     pub DisplayCoreColdtagAll: Query<(), Root<All<CoreColdtag>>> -> Vec<CoreColdtag> {
///         |data| data.0.all
///     } = "query DisplayCoreColdtagAll { displayCoreColdtag { all { id } } }";
/// }
/// ```
#[macro_export]
macro_rules! operation {
    ($(
        $(#[$meta:meta])*
        $vis:vis $name:ident : $kind:ident < $vars:ty, $resp:ty > -> $out:ty {
            |$data:ident| $extract:expr
        } = $doc:expr;
    )+) => {
        $(
            $(#[$meta])*
            #[derive(Debug, Clone, Copy, Default)]
            $vis struct $name;

            impl $crate::client::Operation for $name {
                const NAME: &'static str = stringify!($name);
                const KIND: $crate::client::OperationKind = $crate::client::OperationKind::$kind;
                const DOCUMENT: &'static str = $doc;

                type Variables = $vars;
                type Response = $resp;
                type Output = $out;

                fn output($data: Self::Response) -> Self::Output {
                    $extract
                }
            }
        )+
    };
}
