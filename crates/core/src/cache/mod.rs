mod error;
mod keys;
mod serialization;
mod traits;

pub use error::{CacheError, Result};
pub use keys::{list_key, resource_key};
pub use serialization::{
    deserialize_resource, deserialize_resources, serialize_resource, serialize_resources,
    SerializationError,
};
pub use traits::Cache;
