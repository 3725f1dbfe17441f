use std::fmt::{Debug, Display};

/// Log a failed `Result` and carry on, for call sites with nowhere to
/// propagate the error to.
pub trait OrLog {
    fn or_log(&self, context: impl Display);
}

impl<T, E: Debug> OrLog for Result<T, E> {
    fn or_log(&self, context: impl Display) {
        if let Err(e) = &self {
            tracing::error!("Error: {:?} ({})", e, context);
        }
    }
}
