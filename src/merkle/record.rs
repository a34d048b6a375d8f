//! Entitlement records and leaf encoding
//!
//! A record is one (address, amount) entitlement row. Records are only
//! constructed through validated parsing, so everything downstream of the
//! tree builder works on well-formed data.

use ethers::types::{Address, U256};
use serde::{Deserialize, Serialize};

use super::{DistributorError, DistributorResult};

/// Size of one canonical encoded leaf in bytes
pub const ENCODED_LEAF_SIZE: usize = 64;

/// Declared field types for the leaf encoding, carried in the serialized
/// artifact so the encoding is self-describing to independent verifiers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeafSchema {
    pub fields: Vec<String>,
}

impl LeafSchema {
    /// The `{address, uint256}` schema used by distribution trees
    pub fn address_uint256() -> Self {
        Self {
            fields: vec!["address".to_string(), "uint256".to_string()],
        }
    }

    /// Reject any field layout this crate does not encode
    pub fn ensure_supported(&self) -> DistributorResult<()> {
        if *self != Self::address_uint256() {
            return Err(DistributorError::Encoding(format!(
                "unsupported leaf schema: {:?}",
                self.fields
            )));
        }
        Ok(())
    }
}

impl Default for LeafSchema {
    fn default() -> Self {
        Self::address_uint256()
    }
}

/// One entitlement record: 20-byte address and unsigned 256-bit amount
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Record {
    pub address: Address,
    pub amount: U256,
}

impl Record {
    pub fn new(address: Address, amount: U256) -> Self {
        Self { address, amount }
    }

    /// Parse a record from its textual form.
    ///
    /// The address must be 0x-hex for exactly 20 bytes; the amount must be
    /// a plain unsigned decimal that fits in 256 bits. Anything else is an
    /// encoding error, never a silently-zeroed value.
    pub fn parse(address: &str, amount: &str) -> DistributorResult<Self> {
        if address.is_empty() {
            return Err(DistributorError::Encoding("empty address".to_string()));
        }
        let parsed_address: Address = address.parse().map_err(|e| {
            DistributorError::Encoding(format!("malformed address {:?}: {}", address, e))
        })?;

        // U256::from_dec_str maps "" to zero; a blank amount cell must fail
        if amount.is_empty() {
            return Err(DistributorError::Encoding("empty amount".to_string()));
        }
        let parsed_amount = U256::from_dec_str(amount).map_err(|e| {
            DistributorError::Encoding(format!("malformed amount {:?}: {}", amount, e))
        })?;

        Ok(Self {
            address: parsed_address,
            amount: parsed_amount,
        })
    }

    /// Canonical leaf encoding: 32-byte left-padded address followed by
    /// the 32-byte big-endian amount, per the `{address, uint256}` schema.
    pub fn encode(&self) -> [u8; ENCODED_LEAF_SIZE] {
        let mut out = [0u8; ENCODED_LEAF_SIZE];
        out[12..32].copy_from_slice(self.address.as_bytes());
        self.amount.to_big_endian(&mut out[32..64]);
        out
    }

    /// Full 0x-hex rendering of the address
    pub fn address_hex(&self) -> String {
        format!("0x{}", hex::encode(self.address.as_bytes()))
    }
}
