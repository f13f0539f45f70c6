//! Beacon parsing for cross-references
//!
//! A beacon identifies another object, optionally qualified by its class:
//!
//! - `weaviate://localhost/Article/550e8400-e29b-41d4-a716-446655440000`
//! - `weaviate://localhost/550e8400-e29b-41d4-a716-446655440000`

use std::fmt;
use std::str::FromStr;

use thiserror::Error;
use url::Url;
use uuid::Uuid;

/// Scheme used when rendering beacons
pub const BEACON_SCHEME: &str = "weaviate";

/// Peer name of beacons pointing into the local node
pub const LOCAL_PEER: &str = "localhost";

/// Errors that can occur while parsing a beacon
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ReferenceError {
    #[error("invalid cref URI: {0}")]
    InvalidUri(#[from] url::ParseError),

    #[error("invalid cref URI: path must be of format '<class>/<uuid>', but got '{0}'")]
    InvalidPath(String),

    #[error("invalid cref URI: last path segment must be uuid, but got '{0}'")]
    InvalidId(String),
}

/// Parsed cross-reference
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reference {
    /// Host part of the beacon
    pub peer_name: String,
    /// Target class, when the beacon names it
    pub class: Option<String>,
    /// Target object id
    pub target_id: Uuid,
}

impl Reference {
    /// Create a local reference
    pub fn local(class: Option<String>, target_id: Uuid) -> Self {
        Self {
            peer_name: LOCAL_PEER.to_string(),
            class,
            target_id,
        }
    }

    /// Parse a beacon string
    pub fn parse(beacon: &str) -> Result<Self, ReferenceError> {
        let uri = Url::parse(beacon)?;
        let path = uri.path();
        if path.is_empty() {
            return Err(ReferenceError::InvalidPath(path.to_string()));
        }

        let segments: Vec<&str> = path.split('/').collect();
        let (class, id) = match segments.as_slice() {
            ["", class, id] => (Some(class.to_string()), *id),
            ["", id] => (None, *id),
            _ => return Err(ReferenceError::InvalidPath(path.to_string())),
        };
        let target_id =
            Uuid::parse_str(id).map_err(|_| ReferenceError::InvalidId(id.to_string()))?;

        Ok(Self {
            peer_name: uri.host_str().unwrap_or_default().to_string(),
            class: class.filter(|c| !c.is_empty()),
            target_id,
        })
    }

    /// Render the reference as a beacon string
    pub fn to_beacon(&self) -> String {
        match &self.class {
            Some(class) => format!(
                "{BEACON_SCHEME}://{}/{class}/{}",
                self.peer_name, self.target_id
            ),
            None => format!("{BEACON_SCHEME}://{}/{}", self.peer_name, self.target_id),
        }
    }
}

impl FromStr for Reference {
    type Err = ReferenceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Reference::parse(s)
    }
}

impl fmt::Display for Reference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_beacon())
    }
}
