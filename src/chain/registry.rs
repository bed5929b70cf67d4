// Unit registry ABI and receipt decoding
use alloy::primitives::{Address, Bytes, B256, U256};
use alloy::sol_types::SolCall;

use super::TxReceipt;

alloy::sol! {
    contract Registry {
        function create(address owner, bytes32 unitHash, uint256[] dependencies) external payable returns (uint256 unitId);

        event CreateUnit(uint256 indexed unitId, address indexed owner, bytes32 indexed unitHash);
    }
}

/// Calldata for `create(owner, unitHash, dependencies)`.
pub fn encode_create(owner: Address, unit_hash: B256, dependencies: Vec<U256>) -> Bytes {
    Registry::createCall {
        owner,
        unitHash: unit_hash,
        dependencies,
    }
    .abi_encode()
    .into()
}

/// Unit id from the first indexed topic of the first log (topic 0 is the event signature).
pub fn unit_id_from_receipt(receipt: &TxReceipt) -> Option<U256> {
    receipt
        .logs
        .first()
        .and_then(|log| log.topics.get(1))
        .map(|topic| U256::from_be_slice(topic.as_slice()))
}
