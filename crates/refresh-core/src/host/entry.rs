//! Entry point configuration.
//!
//! Bundler configs accept an entry in several shapes:
//!
//! ```js
//! entry: "./src/index.js"
//! entry: ["./polyfills.js", "./src/index.js"]
//! entry: { main: "./src/index.js", admin: ["./src/admin.js"] }
//! entry: () => fetchEntries()
//! ```
//!
//! [`EntrySpec`] models all four. The host resolves it to a plain
//! name → requests map when the build runs.

use futures::future::{BoxFuture, FutureExt};
use serde::{Deserialize, Deserializer, Serialize};
use indexmap::IndexMap;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

/// Entry name used when the config gives a bare string or list.
pub const DEFAULT_ENTRY_NAME: &str = "main";

/// Entry used when the config has none.
pub const DEFAULT_ENTRY: &str = "./src";

/// Resolved entries: entry name → module requests, in load order. Entry names
/// keep the order the config declared them in.
pub type EntryMap = IndexMap<String, Vec<String>>;

/// The value side of a mapped entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EntryValue {
    Single(String),
    List(Vec<String>),
}

impl EntryValue {
    /// The requests in load order.
    pub fn into_requests(self) -> Vec<String> {
        match self {
            Self::Single(request) => vec![request],
            Self::List(requests) => requests,
        }
    }
}

/// A zero-argument producer evaluated by the host at build time.
///
/// The returned future may resolve to any [`EntrySpec`], including another
/// producer.
#[derive(Clone)]
pub struct EntryProducer(Arc<dyn Fn() -> BoxFuture<'static, EntrySpec> + Send + Sync>);

impl EntryProducer {
    /// Invoke the producer.
    pub fn call(&self) -> BoxFuture<'static, EntrySpec> {
        (self.0)()
    }
}

impl fmt::Debug for EntryProducer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("EntryProducer(..)")
    }
}

/// Build entry points, in any of the shapes a config may use.
#[derive(Debug, Clone)]
pub enum EntrySpec {
    /// `"./src/index.js"`
    Single(String),
    /// `["./a.js", "./b.js"]`
    List(Vec<String>),
    /// `{ main: "./a.js", admin: ["./b.js"] }`
    Map(IndexMap<String, EntryValue>),
    /// `() => ...`, evaluated when the build runs.
    Deferred(EntryProducer),
}

impl EntrySpec {
    /// Wrap an (async) producer function.
    pub fn deferred<F, Fut>(producer: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = EntrySpec> + Send + 'static,
    {
        Self::Deferred(EntryProducer(Arc::new(move || producer().boxed())))
    }

    /// Whether this spec must be evaluated before its requests are known.
    pub fn is_deferred(&self) -> bool {
        matches!(self, Self::Deferred(_))
    }

    /// Resolve to entry name → requests, awaiting producers as needed.
    pub fn resolve(&self) -> BoxFuture<'_, EntryMap> {
        async move {
            match self {
                Self::Deferred(producer) => {
                    let produced = producer.call().await;
                    produced.resolve().await
                }
                Self::Single(request) => {
                    EntryMap::from([(DEFAULT_ENTRY_NAME.to_string(), vec![request.clone()])])
                }
                Self::List(requests) => {
                    EntryMap::from([(DEFAULT_ENTRY_NAME.to_string(), requests.clone())])
                }
                Self::Map(entries) => entries
                    .iter()
                    .map(|(name, value)| (name.clone(), value.clone().into_requests()))
                    .collect(),
            }
        }
        .boxed()
    }
}

impl Default for EntrySpec {
    fn default() -> Self {
        Self::Single(DEFAULT_ENTRY.to_string())
    }
}

/// Structural equality. Producers are equal only when they are the same producer.
impl PartialEq for EntrySpec {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Single(a), Self::Single(b)) => a == b,
            (Self::List(a), Self::List(b)) => a == b,
            (Self::Map(a), Self::Map(b)) => a == b,
            (Self::Deferred(a), Self::Deferred(b)) => Arc::ptr_eq(&a.0, &b.0),
            _ => false,
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawEntry {
    Single(String),
    List(Vec<String>),
    Map(IndexMap<String, EntryValue>),
}

impl<'de> Deserialize<'de> for EntrySpec {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match RawEntry::deserialize(deserializer)? {
            RawEntry::Single(request) => Self::Single(request),
            RawEntry::List(requests) => Self::List(requests),
            RawEntry::Map(entries) => Self::Map(entries),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_resolve_single_and_list() {
        let single = EntrySpec::Single("./src/index.js".to_string());
        assert_eq!(
            single.resolve().await,
            EntryMap::from([("main".to_string(), vec!["./src/index.js".to_string()])])
        );

        let list = EntrySpec::List(vec!["./a.js".to_string(), "./b.js".to_string()]);
        assert_eq!(list.resolve().await["main"], vec!["./a.js", "./b.js"]);
    }

    #[tokio::test]
    async fn test_resolve_nested_producers() {
        let spec = EntrySpec::deferred(|| async {
            EntrySpec::deferred(|| async { EntrySpec::Single("./late.js".to_string()) })
        });
        assert!(spec.is_deferred());
        assert_eq!(spec.resolve().await["main"], vec!["./late.js"]);
    }

    #[test]
    fn test_deserialize_shapes() {
        let single: EntrySpec = serde_json::from_str(r#""./src/index.js""#).unwrap();
        assert_eq!(single, EntrySpec::Single("./src/index.js".to_string()));

        let list: EntrySpec = serde_json::from_str(r#"["./a.js", "./b.js"]"#).unwrap();
        assert_eq!(
            list,
            EntrySpec::List(vec!["./a.js".to_string(), "./b.js".to_string()])
        );

        let map: EntrySpec =
            serde_json::from_str(r#"{"main": "./a.js", "admin": ["./b.js", "./c.js"]}"#).unwrap();
        let EntrySpec::Map(entries) = map else {
            panic!("expected map entry");
        };
        assert_eq!(entries["main"], EntryValue::Single("./a.js".to_string()));
        assert_eq!(
            entries["admin"],
            EntryValue::List(vec!["./b.js".to_string(), "./c.js".to_string()])
        );

        assert!(serde_json::from_str::<EntrySpec>("42").is_err());
    }

    #[tokio::test]
    async fn test_map_keeps_declared_order() {
        let map: EntrySpec =
            serde_json::from_str(r#"{"main": "./main.js", "admin": "./admin.js", "docs": "./docs.js"}"#)
                .unwrap();

        let names: Vec<_> = map.resolve().await.into_keys().collect();
        assert_eq!(names, vec!["main", "admin", "docs"]);
    }

    #[test]
    fn test_deferred_equality_is_identity() {
        let a = EntrySpec::deferred(|| async { EntrySpec::default() });
        let b = EntrySpec::deferred(|| async { EntrySpec::default() });
        assert_eq!(a, a.clone());
        assert_ne!(a, b);
    }
}
