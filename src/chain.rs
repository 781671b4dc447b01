use std::collections::{BTreeMap, HashMap};

use alloy_primitives::{BlockHash, BlockNumber};
use thegraph_core::types::{BlockPointer, DeploymentId};

use crate::errors::Error;

/// Read interface over per-deployment indexing progress. Each call observes a
/// single, internally consistent snapshot; all operations are safe to invoke
/// concurrently.
pub trait ChainIndex {
    /// The latest indexed block for the deployment.
    fn latest(&self, deployment: &DeploymentId) -> Result<BlockPointer, Error>;
    /// The hash of the indexed block with the given number.
    fn hash_of(
        &self,
        deployment: &DeploymentId,
        number: BlockNumber,
    ) -> Result<BlockHash, Error>;
    /// The number of the indexed block with the given hash.
    fn number_of(
        &self,
        deployment: &DeploymentId,
        hash: &BlockHash,
    ) -> Result<BlockNumber, Error>;
}

/// In-memory chain index tracking, for each deployment, the blocks indexed so
/// far and the earliest block still available (the pruning floor).
#[derive(Default)]
pub struct Chain(BTreeMap<DeploymentId, DeploymentBlocks>);

#[derive(Default)]
struct DeploymentBlocks {
    earliest: BlockNumber,
    number_to_hash: BTreeMap<BlockNumber, BlockHash>,
    hash_to_number: HashMap<BlockHash, BlockNumber>,
}

impl DeploymentBlocks {
    fn latest(&self) -> Option<(BlockNumber, BlockHash)> {
        self.number_to_hash
            .last_key_value()
            .map(|(&number, &hash)| (number, hash))
    }

    fn remove(&mut self, number: BlockNumber) {
        if let Some(hash) = self.number_to_hash.remove(&number) {
            self.hash_to_number.remove(&hash);
        }
    }
}

impl Chain {
    /// Make the deployment known to the index, without any indexed blocks.
    pub fn register(&mut self, deployment: DeploymentId) {
        self.0.entry(deployment).or_default();
    }

    /// Record a newly indexed block, advancing the deployment head. The first
    /// insert for a deployment creates it.
    pub fn insert(&mut self, deployment: DeploymentId, block: BlockPointer) {
        tracing::trace!(%deployment, ?block);
        let blocks = self.0.entry(deployment).or_default();
        blocks.remove(block.number);
        blocks.hash_to_number.insert(block.hash, block.number);
        blocks.number_to_hash.insert(block.number, block.hash);
    }

    /// Rewind the deployment head to the given block, discarding everything
    /// above it. The head block itself is replaced, since a reorg may have
    /// moved it to another fork.
    pub fn revert(&mut self, deployment: &DeploymentId, head: &BlockPointer) {
        tracing::trace!(%deployment, block = ?head, "revert");
        let blocks = match self.0.get_mut(deployment) {
            Some(blocks) => blocks,
            None => return,
        };
        let discarded = blocks.number_to_hash.split_off(&head.number);
        for hash in discarded.values() {
            blocks.hash_to_number.remove(hash);
        }
        blocks.hash_to_number.insert(head.hash, head.number);
        blocks.number_to_hash.insert(head.number, head.hash);
    }

    /// Raise the pruning floor. Blocks below `earliest` are dropped and
    /// answer `BlockNotAvailable` afterwards. The floor never moves down.
    pub fn prune(&mut self, deployment: &DeploymentId, earliest: BlockNumber) {
        let blocks = match self.0.get_mut(deployment) {
            Some(blocks) => blocks,
            None => return,
        };
        if earliest <= blocks.earliest {
            return;
        }
        let retained = blocks.number_to_hash.split_off(&earliest);
        let pruned = std::mem::replace(&mut blocks.number_to_hash, retained);
        for hash in pruned.values() {
            blocks.hash_to_number.remove(hash);
        }
        blocks.earliest = earliest;
    }

    fn deployment(&self, deployment: &DeploymentId) -> Result<&DeploymentBlocks, Error> {
        self.0
            .get(deployment)
            .ok_or(Error::UnknownDeployment(*deployment))
    }
}

impl ChainIndex for Chain {
    fn latest(&self, deployment: &DeploymentId) -> Result<BlockPointer, Error> {
        let blocks = self.deployment(deployment)?;
        let (number, hash) = blocks
            .latest()
            .ok_or(Error::NotStartedIndexing(*deployment))?;
        Ok(BlockPointer { number, hash })
    }

    fn hash_of(
        &self,
        deployment: &DeploymentId,
        number: BlockNumber,
    ) -> Result<BlockHash, Error> {
        let blocks = self.deployment(deployment)?;
        let (latest, _) = blocks
            .latest()
            .ok_or(Error::NotStartedIndexing(*deployment))?;
        if number > latest {
            return Err(Error::BlockNotIndexed {
                requested: number,
                latest,
            });
        }
        // A miss at or above the floor is a gap left by pruning.
        blocks
            .number_to_hash
            .get(&number)
            .copied()
            .ok_or(Error::BlockNotAvailable {
                requested: number,
                earliest: blocks.earliest,
            })
    }

    fn number_of(
        &self,
        deployment: &DeploymentId,
        hash: &BlockHash,
    ) -> Result<BlockNumber, Error> {
        let blocks = self.deployment(deployment)?;
        blocks
            .hash_to_number
            .get(hash)
            .copied()
            .ok_or(Error::UnknownBlockHash(*hash))
    }
}
