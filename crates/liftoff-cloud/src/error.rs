/// Failure running an external CLI (`az`, `docker`).
///
/// Only the program and sub-command are kept: later arguments may carry
/// registry passwords or secret settings.
#[derive(Debug, thiserror::Error)]
pub enum ExecError {
    #[error("{program} CLI not found on PATH")]
    NotFound {
        program: String,
        source: std::io::Error,
    },

    #[error("`{command}` failed\n{stderr}")]
    CommandFailed { command: String, stderr: String },

    #[error("{program} output was not valid UTF-8")]
    InvalidUtf8 {
        program: String,
        source: std::string::FromUtf8Error,
    },

    #[error("failed to write to {program} stdin")]
    StdinWrite {
        program: String,
        source: std::io::Error,
    },
}

impl ExecError {
    /// Whether the CLI reported that the addressed resource does not exist.
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::CommandFailed { stderr, .. } => {
                stderr.contains("NotFound")
                    || stderr.contains("could not be found")
                    || stderr.contains("was not found")
                    || stderr.contains("does not exist")
            }
            _ => false,
        }
    }
}
