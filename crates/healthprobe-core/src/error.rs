use thiserror::Error;

#[derive(Debug, Error)]
pub enum HealthprobeError {
    #[error("command exited with status {status}\nstdout: {stdout}\nstderr: {stderr}")]
    CommandFailed {
        status: i32,
        stdout: String,
        stderr: String,
    },

    #[error("required environment variable not set: {0}")]
    MissingEnv(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, HealthprobeError>;
