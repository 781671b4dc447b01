use alloy_primitives::{BlockHash, BlockNumber};
use thegraph_core::types::DeploymentId;

#[derive(thiserror::Error, Clone, Debug, Eq, PartialEq)]
pub enum Error {
    /// The deployment is not known to the chain index.
    #[error("unknown deployment: {0}")]
    UnknownDeployment(DeploymentId),
    /// The deployment is known, but has not indexed any blocks yet.
    #[error("deployment has not started indexing yet: {0}")]
    NotStartedIndexing(DeploymentId),
    /// The requested block number is beyond the latest indexed block.
    #[error("block not indexed: {requested}, latest: {latest}")]
    BlockNotIndexed {
        requested: BlockNumber,
        latest: BlockNumber,
    },
    /// The requested block was indexed, but its data has since been pruned.
    #[error("block not available: {requested}, earliest: {earliest}")]
    BlockNotAvailable {
        requested: BlockNumber,
        earliest: BlockNumber,
    },
    /// The requested block hash does not match any indexed block for the
    /// deployment.
    #[error("unknown block hash: {0}")]
    UnknownBlockHash(BlockHash),
}
