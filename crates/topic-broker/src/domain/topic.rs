//! # Topics
//!
//! A topic is a pure value: a name plus a runtime type witness. Two topics are
//! equal iff both parts are equal, so `("t1", i32)` and `("t1", String)` are
//! distinct channels.
//!
//! `Topic<T>` is the typed handle callers keep around; [`AnyTopic`] is its
//! type-erased form used as a registry key and in notifications.

use std::any::{type_name, TypeId};
use std::collections::HashSet;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;
use std::sync::Arc;

/// Runtime witness of a Rust type.
///
/// Equality and hashing use the `TypeId` only; the type name is kept for
/// diagnostics.
#[derive(Debug, Clone, Copy)]
pub struct TypeWitness {
    type_id: TypeId,
    type_name: &'static str,
}

impl TypeWitness {
    /// Witness for `T`.
    #[must_use]
    pub fn of<T: 'static>() -> Self {
        Self {
            type_id: TypeId::of::<T>(),
            type_name: type_name::<T>(),
        }
    }

    #[must_use]
    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    #[must_use]
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }
}

impl PartialEq for TypeWitness {
    fn eq(&self, other: &Self) -> bool {
        self.type_id == other.type_id
    }
}

impl Eq for TypeWitness {}

impl Hash for TypeWitness {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.type_id.hash(state);
    }
}

impl fmt::Display for TypeWitness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_name)
    }
}

/// Type-erased topic (`name`, `witness`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AnyTopic {
    name: Arc<str>,
    witness: TypeWitness,
}

impl AnyTopic {
    pub fn new(name: impl Into<Arc<str>>, witness: TypeWitness) -> Self {
        Self {
            name: name.into(),
            witness,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn witness(&self) -> TypeWitness {
        self.witness
    }

    /// Returns `true` if this topic carries the witness of `T`.
    #[must_use]
    pub fn is<T: 'static>(&self) -> bool {
        self.witness == TypeWitness::of::<T>()
    }
}

impl fmt::Display for AnyTopic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}<{}>", self.name, self.witness)
    }
}

impl AsRef<AnyTopic> for AnyTopic {
    fn as_ref(&self) -> &AnyTopic {
        self
    }
}

/// Typed topic handle.
///
/// ```rust,ignore
/// let speed = Topic::<f64>::of("train.speed");
/// assert_eq!(speed.name(), "train.speed");
/// ```
pub struct Topic<T> {
    inner: AnyTopic,
    _type: PhantomData<fn() -> T>,
}

impl<T: 'static> Topic<T> {
    /// Create a topic named `name` carrying values of type `T`.
    pub fn of(name: impl Into<Arc<str>>) -> Self {
        Self {
            inner: AnyTopic::new(name, TypeWitness::of::<T>()),
            _type: PhantomData,
        }
    }

    /// Recover a typed handle from an erased topic, if the witness is `T`.
    #[must_use]
    pub fn from_erased(topic: &AnyTopic) -> Option<Self> {
        topic.is::<T>().then(|| Self {
            inner: topic.clone(),
            _type: PhantomData,
        })
    }
}

impl<T> Topic<T> {
    #[must_use]
    pub fn name(&self) -> &str {
        self.inner.name()
    }

    #[must_use]
    pub fn witness(&self) -> TypeWitness {
        self.inner.witness()
    }

    /// The type-erased form of this topic.
    #[must_use]
    pub fn erased(&self) -> &AnyTopic {
        &self.inner
    }
}

impl<T> Clone for Topic<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
            _type: PhantomData,
        }
    }
}

impl<T> PartialEq for Topic<T> {
    fn eq(&self, other: &Self) -> bool {
        self.inner == other.inner
    }
}

impl<T> Eq for Topic<T> {}

impl<T> PartialEq<AnyTopic> for Topic<T> {
    fn eq(&self, other: &AnyTopic) -> bool {
        &self.inner == other
    }
}

impl<T> Hash for Topic<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.inner.hash(state);
    }
}

impl<T> fmt::Debug for Topic<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Topic")
            .field("name", &self.inner.name)
            .field("type", &self.inner.witness.type_name)
            .finish()
    }
}

impl<T> fmt::Display for Topic<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.inner.fmt(f)
    }
}

impl<T> AsRef<AnyTopic> for Topic<T> {
    fn as_ref(&self) -> &AnyTopic {
        &self.inner
    }
}

impl<T> From<Topic<T>> for AnyTopic {
    fn from(topic: Topic<T>) -> Self {
        topic.inner
    }
}

/// Immutable set of topics delivered with a notification.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TopicSet {
    topics: HashSet<AnyTopic>,
}

impl TopicSet {
    /// A set holding exactly one topic.
    #[must_use]
    pub fn single(topic: AnyTopic) -> Self {
        Self {
            topics: HashSet::from([topic]),
        }
    }

    #[must_use]
    pub fn contains(&self, topic: impl AsRef<AnyTopic>) -> bool {
        self.topics.contains(topic.as_ref())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.topics.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.topics.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &AnyTopic> {
        self.topics.iter()
    }
}

impl FromIterator<AnyTopic> for TopicSet {
    fn from_iter<I: IntoIterator<Item = AnyTopic>>(iter: I) -> Self {
        Self {
            topics: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a TopicSet {
    type Item = &'a AnyTopic;
    type IntoIter = std::collections::hash_set::Iter<'a, AnyTopic>;

    fn into_iter(self) -> Self::IntoIter {
        self.topics.iter()
    }
}

impl fmt::Display for TopicSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<String> = self.topics.iter().map(ToString::to_string).collect();
        names.sort();
        write!(f, "{{{}}}", names.join(", "))
    }
}
