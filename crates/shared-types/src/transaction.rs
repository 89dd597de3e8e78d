//! Signed transactions as delivered by consensus.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::errors::PayloadError;
use crate::identity::Identity;
use crate::payloads::Payload;
use primitive_types::U256;

/// The signed portion of a transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionBody {
    /// Payload type string; resolved to a route by the dispatcher.
    pub payload_type: String,
    pub payload: Vec<u8>,
    /// Maximum fee the sender consents to pay.
    pub fee: U256,
    pub nonce: u64,
}

/// A transaction delivered by consensus.
///
/// Signature verification happens upstream; this core trusts `sender`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub sender: Identity,
    pub body: TransactionBody,
    pub signature: Vec<u8>,
}

impl Transaction {
    /// Build an unsigned transaction carrying `payload`.
    pub fn new<P: Payload>(
        sender: Identity,
        payload: &P,
        fee: U256,
        nonce: u64,
    ) -> Result<Self, PayloadError> {
        Ok(Self {
            sender,
            body: TransactionBody {
                payload_type: P::TYPE.as_str().to_string(),
                payload: payload.encode()?,
                fee,
                nonce,
            },
            signature: Vec::new(),
        })
    }

    /// SHA-256 over the sender and encoded body.
    pub fn hash(&self) -> [u8; 32] {
        let mut hasher = Sha256::new();
        hasher.update(self.sender.as_bytes());
        hasher.update(self.body.payload_type.as_bytes());
        hasher.update(&self.body.payload);
        let mut fee = [0u8; 32];
        self.body.fee.to_big_endian(&mut fee);
        hasher.update(fee);
        hasher.update(self.body.nonce.to_be_bytes());
        hasher.finalize().into()
    }
}
