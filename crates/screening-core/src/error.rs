use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScreeningError {
    #[error("Data unavailable: {0}")]
    DataUnavailable(String),

    #[error("Collaborator error: {0}")]
    Collaborator(String),

    #[error("Collaborator timeout: {0}")]
    CollaboratorTimeout(String),
}
