//! The GraphQL-compatible edges of the `_meta` field: parsing the `block`
//! argument object into a `BlockConstraint`, and serializing a `MetaResult`
//! into the `_meta` selection-set JSON. No GraphQL engine involved; both ends
//! operate on JSON values.

use anyhow::{anyhow, bail};
use itertools::Itertools as _;
use serde_json::{json, Value};

use crate::blocks::{BlockConstraint, MetaResult};

/// Parse the `block: {hash | number}` argument. An absent argument (JSON
/// null) or an empty object maps to `Unconstrained`; more than one field is
/// rejected as conflicting. Mutual exclusivity beyond "at most one present"
/// is the caller's concern.
pub fn parse_block_constraint(value: &Value) -> anyhow::Result<BlockConstraint> {
    let fields = match value {
        Value::Null => return Ok(BlockConstraint::Unconstrained),
        Value::Object(fields) => fields,
        _ => bail!("malformed block constraint"),
    };
    let field = fields
        .iter()
        .at_most_one()
        .map_err(|_| anyhow!("conflicting block constraints"))?;
    match field {
        None => Ok(BlockConstraint::Unconstrained),
        Some((key, value)) => match (key.as_str(), value) {
            ("hash", Value::String(hash)) => hash
                .parse()
                .map(BlockConstraint::Hash)
                .map_err(|err| anyhow!("malformed block hash: {err}")),
            ("number", Value::Number(number)) => number
                .as_u64()
                .map(BlockConstraint::Number)
                .ok_or_else(|| anyhow!("block number out of range")),
            ("hash" | "number", _) => Err(anyhow!("malformed block constraint")),
            _ => Err(anyhow!("unexpected block constraint: {key}")),
        },
    }
}

/// Serialize the `_meta` payload. `block.hash` renders as JSON null when the
/// query was unconstrained; `block.number` and `deployment` are always
/// present.
pub fn meta_response(meta: &MetaResult) -> Value {
    json!({
        "block": meta.block,
        "deployment": meta.deployment.to_string(),
    })
}
