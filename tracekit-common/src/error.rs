use std::result;
use thiserror::Error;

pub type Result<T> = result::Result<T, TraceKitError>;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ErrorContext {
    pub contexts: Vec<String>,
}

impl std::fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        for (i, context) in self.contexts.iter().enumerate() {
            writeln!(f, "    Context[{i}]: {context}")?;
        }
        Ok(())
    }
}

#[derive(Error, Debug)]
pub enum TraceKitError {
    #[error("Invalid transform kind: {0}\n{1}")]
    InvalidKindError(String, ErrorContext),

    #[error("Transform index out of range: {0}\n{1}")]
    IndexOutOfRangeError(String, ErrorContext),

    #[error("Aggregation target not found: {0}\n{1}")]
    TargetNotFoundError(String, ErrorContext),

    #[error("Transform specification error: {0}\n{1}")]
    SpecificationError(String, ErrorContext),

    #[error("Internal error: {0}\n{1}")]
    InternalError(String, ErrorContext),

    #[cfg(feature = "json")]
    #[error("Serde JSON Error: {0}\n{1}")]
    SerdeJsonError(serde_json::Error, ErrorContext),
}

impl TraceKitError {
    /// Append a new context level to the error
    pub fn with_context<S, F>(self, context_fn: F) -> Self
    where
        F: FnOnce() -> S,
        S: Into<String>,
    {
        use TraceKitError::*;
        match self {
            InvalidKindError(msg, mut context) => {
                context.contexts.push(context_fn().into());
                TraceKitError::InvalidKindError(msg, context)
            }
            IndexOutOfRangeError(msg, mut context) => {
                context.contexts.push(context_fn().into());
                TraceKitError::IndexOutOfRangeError(msg, context)
            }
            TargetNotFoundError(msg, mut context) => {
                context.contexts.push(context_fn().into());
                TraceKitError::TargetNotFoundError(msg, context)
            }
            SpecificationError(msg, mut context) => {
                context.contexts.push(context_fn().into());
                TraceKitError::SpecificationError(msg, context)
            }
            InternalError(msg, mut context) => {
                context.contexts.push(context_fn().into());
                TraceKitError::InternalError(msg, context)
            }
            #[cfg(feature = "json")]
            SerdeJsonError(err, mut context) => {
                context.contexts.push(context_fn().into());
                TraceKitError::SerdeJsonError(err, context)
            }
        }
    }

    pub fn invalid_kind<S: Into<String>>(message: S) -> Self {
        Self::InvalidKindError(message.into(), Default::default())
    }

    pub fn index_out_of_range<S: Into<String>>(message: S) -> Self {
        Self::IndexOutOfRangeError(message.into(), Default::default())
    }

    pub fn target_not_found<S: Into<String>>(message: S) -> Self {
        Self::TargetNotFoundError(message.into(), Default::default())
    }

    pub fn specification<S: Into<String>>(message: S) -> Self {
        Self::SpecificationError(message.into(), Default::default())
    }

    pub fn internal<S: Into<String>>(message: S) -> Self {
        Self::InternalError(message.into(), Default::default())
    }

    /// Duplicate error. Not a precise Clone because serde_json::Error isn't Clone,
    /// so wrapped JSON errors are converted to specification errors
    pub fn duplicate(&self) -> Self {
        use TraceKitError::*;
        match self {
            InvalidKindError(msg, context) => InvalidKindError(msg.clone(), context.clone()),
            IndexOutOfRangeError(msg, context) => {
                IndexOutOfRangeError(msg.clone(), context.clone())
            }
            TargetNotFoundError(msg, context) => TargetNotFoundError(msg.clone(), context.clone()),
            SpecificationError(msg, context) => SpecificationError(msg.clone(), context.clone()),
            InternalError(msg, context) => InternalError(msg.clone(), context.clone()),
            #[cfg(feature = "json")]
            SerdeJsonError(err, context) => SpecificationError(err.to_string(), context.clone()),
        }
    }
}

pub trait ResultWithContext<R> {
    fn with_context<S, F>(self, context_fn: F) -> Result<R>
    where
        F: FnOnce() -> S,
        S: Into<String>;
}

impl<R, E> ResultWithContext<R> for result::Result<R, E>
where
    E: Into<TraceKitError>,
{
    fn with_context<S, F>(self, context_fn: F) -> Result<R>
    where
        F: FnOnce() -> S,
        S: Into<String>,
    {
        match self {
            Ok(val) => Ok(val),
            Err(err) => {
                let trace_kit_error: TraceKitError = err.into();
                Err(trace_kit_error.with_context(context_fn))
            }
        }
    }
}

impl<R> ResultWithContext<R> for Option<R> {
    fn with_context<S, F>(self, context_fn: F) -> Result<R>
    where
        F: FnOnce() -> S,
        S: Into<String>,
    {
        match self {
            Some(val) => Ok(val),
            None => Err(TraceKitError::internal(context_fn().into())),
        }
    }
}

#[cfg(feature = "json")]
impl From<serde_json::Error> for TraceKitError {
    fn from(err: serde_json::Error) -> Self {
        Self::SerdeJsonError(err, Default::default())
    }
}
