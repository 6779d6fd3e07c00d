use thiserror::Error;

/// Why a raw username was rejected before any request was made.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Username should not be empty")]
    Empty,

    #[error("Invalid Username")]
    Invalid,
}

/// Failure of a single stats fetch. The display text is what ends up on the
/// message card.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// The relay or endpoint answered with a non-success status.
    #[error("Unable to fetch user details")]
    Status(u16),

    /// The request never produced a response.
    #[error("{0}")]
    Transport(String),

    /// The response body was not the shape we asked for.
    #[error("Unexpected response from server: {0}")]
    Decode(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SearchError {
    #[error("A search is already in progress")]
    Busy,
}
