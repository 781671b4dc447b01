//! Core types for block constraints on queries and for the block state
//! reported back through the `_meta` field.

use alloy_primitives::{BlockHash, BlockNumber};
use serde::Serialize;
use thegraph_core::types::DeploymentId;

/// Block selection accompanying a query. At most one variant applies per
/// query; an absent `block` argument maps to `Unconstrained`.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd)]
pub enum BlockConstraint {
    Unconstrained,
    Hash(BlockHash),
    Number(BlockNumber),
}

/// The block the returned data is consistent with.
///
/// `hash` is `Some` exactly when the query pinned a block (`Hash` or
/// `Number` constraint). For `Unconstrained` queries the hash is suppressed
/// even when the chain index knows it: the latest block may still be
/// reorganized, and reporting its hash would imply false immutability.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
pub struct ResolvedBlock {
    pub number: BlockNumber,
    pub hash: Option<BlockHash>,
}

/// Payload of the `_meta` field: the resolved block plus the deployment
/// that served the query, passed through unchanged.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct MetaResult {
    pub block: ResolvedBlock,
    pub deployment: DeploymentId,
}
