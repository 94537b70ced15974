//! Entry augmentation: load the refresh bootstrap before any user code.

use crate::host::{EntrySpec, EntryValue};

/// Prepend `bootstrap` to every entry in `entry`.
///
/// | input                        | output                                 |
/// |------------------------------|----------------------------------------|
/// | `"./a.js"`                   | `[bootstrap, "./a.js"]`                |
/// | `["./a.js", "./b.js"]`       | `[bootstrap, "./a.js", "./b.js"]`      |
/// | `{ x: "./a.js", y: [..] }`   | each value becomes `[bootstrap, ..]`   |
/// | `() => spec`                 | `() => inject_refresh_entry(spec)`     |
///
/// Not idempotent: calling it on its own output adds a second bootstrap.
pub fn inject_refresh_entry(entry: EntrySpec, bootstrap: &str) -> EntrySpec {
    match entry {
        EntrySpec::Single(request) => EntrySpec::List(vec![bootstrap.to_string(), request]),
        EntrySpec::List(requests) => EntrySpec::List(prepend(bootstrap, requests)),
        EntrySpec::Map(entries) => EntrySpec::Map(
            entries
                .into_iter()
                .map(|(name, value)| {
                    let requests = prepend(bootstrap, value.into_requests());
                    (name, EntryValue::List(requests))
                })
                .collect(),
        ),
        EntrySpec::Deferred(producer) => {
            let bootstrap = bootstrap.to_string();
            EntrySpec::deferred(move || {
                let produced = producer.call();
                let bootstrap = bootstrap.clone();
                async move { inject_refresh_entry(produced.await, &bootstrap) }
            })
        }
    }
}

fn prepend(bootstrap: &str, requests: Vec<String>) -> Vec<String> {
    let mut out = Vec::with_capacity(requests.len() + 1);
    out.push(bootstrap.to_string());
    out.extend(requests);
    out
}
