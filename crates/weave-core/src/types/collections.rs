//! Hash collections used for internal indexes.
//!
//! FxHash is not DoS-resistant, which is fine for in-process ids. Anything
//! whose iteration order is observable by callers uses `BTreeMap`/`BTreeSet`
//! or an explicit insertion-order vector instead.

pub use rustc_hash::{FxHashMap, FxHashSet};
