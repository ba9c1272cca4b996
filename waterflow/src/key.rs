#[cfg(not(feature = "std"))]
use alloc::collections::BTreeMap;
#[cfg(feature = "std")]
use std::collections::HashMap;

/// Index-keyed arena for resident items.
#[cfg(feature = "std")]
pub(crate) type ItemMap<T> = HashMap<usize, T>;
#[cfg(not(feature = "std"))]
pub(crate) type ItemMap<T> = BTreeMap<usize, T>;
