//! String interning for account names, currencies, tags and file names.
//!
//! A ledger repeats the same handful of accounts and currencies thousands
//! of times. The parser routes every such string through a
//! [`StringInterner`] so each distinct value is allocated once and every
//! node that mentions it holds a cheap [`InternedStr`] handle.
//!
//! An interner is owned by a single parse. Callers that want to share
//! strings across files can pass the same interner to several parses.
//!
//! # Example
//!
//! ```
//! use beanfront_core::intern::StringInterner;
//!
//! let mut interner = StringInterner::new();
//!
//! let s1 = interner.intern("Expenses:Food");
//! let s2 = interner.intern("Expenses:Food");
//! let s3 = interner.intern("Assets:Bank");
//!
//! assert!(s1.ptr_eq(&s2));
//! assert!(!s1.ptr_eq(&s3));
//! assert_eq!(interner.len(), 2);
//! ```

use std::borrow::Borrow;
use std::cmp::Ordering;
use std::collections::HashSet;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::Deref;
use std::sync::Arc;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A shared, immutable name.
///
/// Cloning bumps a reference count. Handles handed out by one interner for
/// equal text point at the same allocation, so equality usually short-cuts
/// on the pointer.
#[derive(Debug, Clone, Eq)]
pub struct InternedStr(Arc<str>);

impl InternedStr {
    /// Wrap text directly, bypassing any interner.
    pub fn new(s: impl Into<Arc<str>>) -> Self {
        Self(s.into())
    }

    /// The text of this handle.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns true if both handles share one allocation.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl Default for InternedStr {
    fn default() -> Self {
        Self::new("")
    }
}

impl PartialEq for InternedStr {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other) || self.as_str() == other.as_str()
    }
}

macro_rules! eq_text {
    ($($ty:ty),*) => {$(
        impl PartialEq<$ty> for InternedStr {
            fn eq(&self, other: &$ty) -> bool {
                self.as_str() == AsRef::<str>::as_ref(other)
            }
        }
    )*};
}

eq_text!(str, &str, String);

impl Ord for InternedStr {
    fn cmp(&self, other: &Self) -> Ordering {
        self.as_str().cmp(other.as_str())
    }
}

impl PartialOrd for InternedStr {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

// Must agree with `Borrow<str>`: hash the text, never the pointer.
impl Hash for InternedStr {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.as_str().hash(state);
    }
}

impl Deref for InternedStr {
    type Target = str;

    fn deref(&self) -> &str {
        self.as_str()
    }
}

impl AsRef<str> for InternedStr {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl Borrow<str> for InternedStr {
    fn borrow(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for InternedStr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for InternedStr {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for InternedStr {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl Serialize for InternedStr {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for InternedStr {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(Self::from)
    }
}

/// Hands out one shared allocation per distinct name.
#[derive(Debug, Default)]
pub struct StringInterner {
    pool: HashSet<Arc<str>>,
}

impl StringInterner {
    /// An empty pool.
    pub fn new() -> Self {
        Self::default()
    }

    /// An empty pool sized for `capacity` distinct names.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            pool: HashSet::with_capacity(capacity),
        }
    }

    /// The canonical handle for `s`, allocating it on first sight.
    pub fn intern(&mut self, s: &str) -> InternedStr {
        let shared = match self.pool.get(s) {
            Some(shared) => Arc::clone(shared),
            None => {
                let shared: Arc<str> = Arc::from(s);
                self.pool.insert(Arc::clone(&shared));
                shared
            }
        };
        InternedStr(shared)
    }

    /// Returns true if `s` has been interned.
    pub fn contains(&self, s: &str) -> bool {
        self.pool.contains(s)
    }

    /// Distinct names in the pool.
    pub fn len(&self) -> usize {
        self.pool.len()
    }

    /// Returns true if nothing has been interned yet.
    pub fn is_empty(&self) -> bool {
        self.pool.is_empty()
    }
}
