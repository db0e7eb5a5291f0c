use thiserror::Error;

/// Error surface for supervisor command invocations.
#[derive(Debug, Error)]
pub enum SupervisorError {
    #[error("failed to run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{command} failed (status {status}): {output}")]
    Command {
        command: String,
        status: String,
        output: String,
    },
}
