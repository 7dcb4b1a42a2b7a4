use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("invalid persisted todo: {0}")]
    InvalidRow(String),
    #[error("todo id sequence exhausted")]
    IdsExhausted,
    #[error("todo store lock poisoned")]
    Poisoned,
}
