#[derive(Debug, thiserror::Error)]
pub enum DomainError {
    #[error("unknown search field: '{0}' (expected: title, author)")]
    UnknownSearchField(String),
}
