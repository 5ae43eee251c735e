//! Pet record wire types and the fetcher seam.
//!
//! Everything downstream of this module works on [`PetRecord`] values;
//! where the record came from (HTTP service, test double) is hidden
//! behind the [`PetFetcher`] trait.

mod client;

pub use client::HttpPetFetcher;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Unique identifier for a pet record.
pub type PetId = i64;

/// One pet record as served by the pet base API.
///
/// `parents` and `children` default to empty when the server omits them,
/// so consumers never see "absent" as a distinct case from "empty".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PetRecord {
    /// Record id.
    pub id: PetId,
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Ids of this pet's parents.
    #[serde(default)]
    pub parents: Vec<PetId>,
    /// Ids of this pet's children.
    #[serde(default)]
    pub children: Vec<PetId>,
    /// Set when this record is a stand-in for a failed fetch.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl PetRecord {
    /// Stand-in record for an id whose fetch failed. Carries the error
    /// message as its name so the node still renders, and empty relation
    /// lists so traversal terminates at it.
    pub fn placeholder(id: PetId, message: impl Into<String>) -> Self {
        let message = message.into();
        Self {
            id,
            name: message.clone(),
            parents: Vec::new(),
            children: Vec::new(),
            error: Some(message),
        }
    }

    /// True when this record stands in for a failed fetch.
    pub fn is_placeholder(&self) -> bool {
        self.error.is_some()
    }
}

/// Asynchronous source of pet records.
///
/// Implementations must be idempotent and safe to call repeatedly for
/// the same id. Failures are reported as `Err`, never as panics.
#[async_trait]
pub trait PetFetcher: Send + Sync {
    async fn fetch(&self, id: PetId) -> Result<PetRecord>;
}
