use crate::data::instruction::Instruction;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

/// Content hash of an ordered instruction sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct GenomeHash([u8; 32]);

impl GenomeHash {
    /// Digests `instructions`. Every instruction is terminated by `;` so that
    /// both order and length change the result.
    #[must_use]
    pub fn of(instructions: &[Instruction]) -> Self {
        let mut hasher = Sha256::new();
        for instruction in instructions {
            hasher.update(instruction.to_string().as_bytes());
            hasher.update(b";");
        }
        Self(hasher.finalize().into())
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// First eight hex digits, for compact reports.
    #[must_use]
    pub fn short(&self) -> String {
        hex::encode(&self.0[..4])
    }
}

impl fmt::Display for GenomeHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

impl TryFrom<String> for GenomeHash {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        let bytes = hex::decode(&value).map_err(|e| format!("invalid genome hash: {e}"))?;
        let digest: [u8; 32] = bytes
            .try_into()
            .map_err(|_| "genome hash must be 32 bytes".to_string())?;
        Ok(Self(digest))
    }
}

impl From<GenomeHash> for String {
    fn from(value: GenomeHash) -> Self {
        value.to_string()
    }
}
