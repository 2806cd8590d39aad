pub mod error_code;

mod composition_error;
mod config_error;
mod validation_error;
mod weave_error;

pub use composition_error::CompositionError;
pub use config_error::ConfigError;
pub use error_code::WeaveErrorCode;
pub use validation_error::ValidationError;
pub use weave_error::{EntityKind, WeaveError, WeaveResult};
