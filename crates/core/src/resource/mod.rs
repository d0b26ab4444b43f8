mod error;
mod inputs;
mod types;
mod validation;

pub use error::{FieldError, ValidationError};
pub use inputs::{ProjectInput, TaskInput, DESCRIPTION_MAX_LEN, TITLE_MAX_LEN};
pub use types::{Project, Resource, ResourceKind, Task};
pub use validation::{check_max_len, check_required};
