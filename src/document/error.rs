use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum EditError {
    #[error("change batch contains no edits")]
    EmptyBatch,
}
