//! The unified error handling system for the application.
//!
//! Only genuinely unexpected conditions (bad configuration, IO, server
//! startup) travel as [`ProxyError`]. Discovery, credential and
//! placeholder misses are plain `Option`s, and upstream failures on the
//! proxy path are normalised by [`UpstreamError`].

pub use types::ProxyError;
pub use upstream::UpstreamError;

/// A unified `Result` type for the entire application.
pub type Result<T> = std::result::Result<T, ProxyError>;

pub mod macros;
pub mod types;
pub mod upstream;

/// Context Trait for adding context to errors.
pub trait Context<T, E> {
    /// 附加固定的上下文描述
    #[track_caller]
    fn context<C>(self, context: C) -> Result<T>
    where
        C: std::fmt::Display;

    /// 出错时才计算上下文描述
    #[track_caller]
    fn with_context<C, F>(self, context: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: std::fmt::Display;
}

impl<T, E> Context<T, E> for std::result::Result<T, E>
where
    E: Into<ProxyError>,
{
    #[track_caller]
    fn context<C>(self, context: C) -> Result<T>
    where
        C: std::fmt::Display,
    {
        self.with_context(|| context)
    }

    #[track_caller]
    fn with_context<C, F>(self, context: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: std::fmt::Display,
    {
        match self {
            Ok(value) => Ok(value),
            Err(error) => Err(ProxyError::Context {
                context: context().to_string(),
                source: Box::new(error.into()),
            }),
        }
    }
}

#[cfg(test)]
mod tests;
