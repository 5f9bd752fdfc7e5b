use thiserror::Error;

/// Raised only by [`TrafficManager::check_consistency`][crate::TrafficManager::check_consistency].
///
/// Normal operation never fails: denials are `false`, and stray releases
/// are no-ops.
#[derive(Debug, Error)]
pub enum TrafficError {
    #[error("reservation tables inconsistent: {0}")]
    Inconsistent(String),
}

pub type TrafficResult<T> = Result<T, TrafficError>;
