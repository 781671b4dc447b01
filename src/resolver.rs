use thegraph_core::types::DeploymentId;

use crate::{
    blocks::{BlockConstraint, MetaResult, ResolvedBlock},
    chain::ChainIndex,
    errors::Error,
};

/// Maps a `(deployment, constraint)` pair to the `_meta` payload, consulting
/// the chain index. Stateless; one resolution per call, no retries.
pub struct BlockResolver<I> {
    chain_index: I,
}

impl<I: ChainIndex> BlockResolver<I> {
    pub fn new(chain_index: I) -> Self {
        Self { chain_index }
    }

    /// Resolve the block the query's data is consistent with. On success the
    /// returned number and hash (if present) refer to the same block.
    pub fn resolve(
        &self,
        deployment: &DeploymentId,
        constraint: &BlockConstraint,
    ) -> Result<MetaResult, Error> {
        let block = match constraint {
            BlockConstraint::Unconstrained => {
                let latest = self.chain_index.latest(deployment)?;
                // The hash is suppressed even though the index knows it: the
                // latest block may still be reorganized.
                ResolvedBlock {
                    number: latest.number,
                    hash: None,
                }
            }
            BlockConstraint::Number(number) => {
                let hash = self.chain_index.hash_of(deployment, *number)?;
                ResolvedBlock {
                    number: *number,
                    hash: Some(hash),
                }
            }
            BlockConstraint::Hash(hash) => {
                let number = self.chain_index.number_of(deployment, hash)?;
                ResolvedBlock {
                    number,
                    hash: Some(*hash),
                }
            }
        };
        Ok(MetaResult {
            block,
            deployment: *deployment,
        })
    }
}

#[cfg(test)]
mod tests {
    use alloy_primitives::{BlockHash, BlockNumber, U256};
    use assert_matches::assert_matches;
    use thegraph_core::types::BlockPointer;

    use crate::chain::Chain;

    use super::*;

    fn deployment() -> DeploymentId {
        "QmWmyoMoctfbAaiEs2G46gpeUmhqFRDW6KWo64y5r581Vz"
            .parse()
            .unwrap()
    }

    fn block(number: BlockNumber) -> BlockPointer {
        BlockPointer {
            number,
            hash: BlockHash::from(U256::from(0xAA00 + number)),
        }
    }

    /// Deployment with blocks 90..=100 indexed, blocks below 95 pruned.
    fn resolver() -> BlockResolver<Chain> {
        let mut chain = Chain::default();
        for number in 90..=100 {
            chain.insert(deployment(), block(number));
        }
        chain.prune(&deployment(), 95);
        BlockResolver::new(chain)
    }

    #[test]
    fn unconstrained_reports_latest_without_hash() {
        let meta = resolver()
            .resolve(&deployment(), &BlockConstraint::Unconstrained)
            .unwrap();
        assert_eq!(meta.block, ResolvedBlock { number: 100, hash: None });
        assert_eq!(meta.deployment, deployment());
    }

    #[test]
    fn number_constraint_reports_hash() {
        // same block as latest, but pinned, so the hash is present
        let meta = resolver()
            .resolve(&deployment(), &BlockConstraint::Number(100))
            .unwrap();
        assert_eq!(
            meta.block,
            ResolvedBlock {
                number: 100,
                hash: Some(block(100).hash),
            },
        );
    }

    #[test]
    fn hash_constraint_reports_number() {
        let meta = resolver()
            .resolve(&deployment(), &BlockConstraint::Hash(block(97).hash))
            .unwrap();
        assert_eq!(
            meta.block,
            ResolvedBlock {
                number: 97,
                hash: Some(block(97).hash),
            },
        );
    }

    #[test]
    fn number_and_hash_resolve_to_the_same_block() {
        let resolver = resolver();
        for number in 95..=100 {
            let by_number = resolver
                .resolve(&deployment(), &BlockConstraint::Number(number))
                .unwrap();
            let hash = by_number.block.hash.unwrap();
            let by_hash = resolver
                .resolve(&deployment(), &BlockConstraint::Hash(hash))
                .unwrap();
            assert_eq!(by_number.block, by_hash.block);
        }
    }

    #[test]
    fn number_beyond_latest() {
        assert_matches!(
            resolver().resolve(&deployment(), &BlockConstraint::Number(101)),
            Err(Error::BlockNotIndexed {
                requested: 101,
                latest: 100,
            })
        );
    }

    #[test]
    fn number_below_pruning_floor() {
        assert_matches!(
            resolver().resolve(&deployment(), &BlockConstraint::Number(94)),
            Err(Error::BlockNotAvailable {
                requested: 94,
                earliest: 95,
            })
        );
    }

    #[test]
    fn unknown_hash() {
        let hash = BlockHash::from(U256::from(0xFF));
        assert_matches!(
            resolver().resolve(&deployment(), &BlockConstraint::Hash(hash)),
            Err(Error::UnknownBlockHash(h)) if h == hash
        );
    }

    #[test]
    fn unknown_deployment() {
        let unknown: DeploymentId = "QmSLQfPFcz2pKRJZUH16Sk26EFpRgdxTYGnMiKvWgKRM2a"
            .parse()
            .unwrap();
        for constraint in [
            BlockConstraint::Unconstrained,
            BlockConstraint::Number(100),
            BlockConstraint::Hash(block(100).hash),
        ] {
            assert_matches!(
                resolver().resolve(&unknown, &constraint),
                Err(Error::UnknownDeployment(d)) if d == unknown
            );
        }
    }
}
