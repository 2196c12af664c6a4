use std::{io, path::PathBuf};

use wildcat_evaluator::role::RoleError;
use wildcat_training::{corpus::CorpusError, network::NetworkError, supervised::TrainingError};

#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum AgentError {
    #[display("{}: {source}", path.display())]
    Io { path: PathBuf, source: io::Error },
    #[display("{}: {source}", path.display())]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[display("no saved weights for role `{role}` at {}", path.display())]
    MissingWeights { role: String, path: PathBuf },
    #[display("{} holds weights for role `{found}`, expected `{expected}`", path.display())]
    RoleMismatch {
        path: PathBuf,
        expected: String,
        found: String,
    },
    #[display("unknown role `{name}`")]
    UnknownRole { name: String },
    #[display("role `{role}`: {source}")]
    Network { role: String, source: NetworkError },
    #[display("{source}")]
    Role { source: RoleError },
    #[display("{source}")]
    Corpus { source: CorpusError },
    #[display("role `{role}`: {source}")]
    Training { role: String, source: TrainingError },
}

impl From<RoleError> for AgentError {
    fn from(source: RoleError) -> Self {
        Self::Role { source }
    }
}

impl From<CorpusError> for AgentError {
    fn from(source: CorpusError) -> Self {
        Self::Corpus { source }
    }
}
