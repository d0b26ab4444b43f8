use uuid::Uuid;

use crate::resource::ResourceKind;

/// Returns the cache key for a single resource.
///
/// # Examples
///
/// ```
/// use taskstash_core::cache::resource_key;
/// use taskstash_core::resource::ResourceKind;
/// use uuid::Uuid;
///
/// let key = resource_key(ResourceKind::Task, Uuid::nil());
/// assert_eq!(key, "task:00000000-0000-0000-0000-000000000000");
/// ```
pub fn resource_key(kind: ResourceKind, id: Uuid) -> String {
    format!("{}:{}", kind.as_str(), id)
}

/// Returns the cache key for a kind's full collection.
///
/// # Examples
///
/// ```
/// use taskstash_core::cache::list_key;
/// use taskstash_core::resource::ResourceKind;
///
/// assert_eq!(list_key(ResourceKind::Project), "project:list");
/// ```
pub fn list_key(kind: ResourceKind) -> String {
    format!("{}:list", kind.as_str())
}
