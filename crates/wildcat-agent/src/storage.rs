//! On-disk layout of an agent directory.
//!
//! ```text
//! <agent>/
//!     <role>/
//!         utility.json    saved scorer
//!         training/       corpus files for supervised pre-fit
//! ```
//!
//! # Weights file
//!
//! `utility.json` is a pretty-printed [`StoredScorer`]: the role name, the UTC time it was
//! saved, and the network (layer sizes plus one flat parameter vector per layer). The role
//! name is checked on read, so copying one role's file over another's is reported as
//! [`AgentError::RoleMismatch`] rather than loading a scorer of the wrong shape.
//!
//! # Training directory
//!
//! Every regular file in `training/` is read as a corpus, in file name order. Files can be
//! produced by `wildcat field` or written by hand; see
//! [`Corpus`](wildcat_training::corpus::Corpus) for the format.

use std::{
    fs::{self, File},
    io::{BufReader, BufWriter, Write as _},
    path::{Path, PathBuf},
};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use wildcat_training::network::FeedForwardNet;

use crate::AgentError;

pub const WEIGHTS_FILE: &str = "utility.json";
pub const TRAINING_DIR: &str = "training";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredScorer {
    pub role: String,
    pub saved_at: DateTime<Utc>,
    pub network: FeedForwardNet,
}

#[must_use]
pub fn role_dir(agent_dir: &Path, role: &str) -> PathBuf {
    agent_dir.join(role)
}

#[must_use]
pub fn weights_path(agent_dir: &Path, role: &str) -> PathBuf {
    role_dir(agent_dir, role).join(WEIGHTS_FILE)
}

#[must_use]
pub fn training_dir(agent_dir: &Path, role: &str) -> PathBuf {
    role_dir(agent_dir, role).join(TRAINING_DIR)
}

/// Creates `<agent>/<role>/training/` and any missing parents.
pub fn create_role_dirs(agent_dir: &Path, role: &str) -> Result<(), AgentError> {
    let path = training_dir(agent_dir, role);
    fs::create_dir_all(&path).map_err(|source| AgentError::Io { path, source })
}

pub fn write(path: &Path, stored: &StoredScorer) -> Result<(), AgentError> {
    let io_error = |source| AgentError::Io {
        path: path.to_owned(),
        source,
    };
    let file = File::create(path).map_err(io_error)?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, stored).map_err(|source| AgentError::Json {
        path: path.to_owned(),
        source,
    })?;
    writeln!(writer).map_err(io_error)?;
    writer.flush().map_err(io_error)
}

/// Reads the scorer saved for `role`.
///
/// A missing file is [`AgentError::MissingWeights`]; so is a file saved for another role
/// name, reported as [`AgentError::RoleMismatch`].
pub fn read(agent_dir: &Path, role: &str) -> Result<StoredScorer, AgentError> {
    let path = weights_path(agent_dir, role);
    if !path.is_file() {
        return Err(AgentError::MissingWeights {
            role: role.to_owned(),
            path,
        });
    }
    let file = File::open(&path).map_err(|source| AgentError::Io {
        path: path.clone(),
        source,
    })?;
    let stored: StoredScorer =
        serde_json::from_reader(BufReader::new(file)).map_err(|source| AgentError::Json {
            path: path.clone(),
            source,
        })?;
    if stored.role != role {
        return Err(AgentError::RoleMismatch {
            path,
            expected: role.to_owned(),
            found: stored.role,
        });
    }
    Ok(stored)
}
