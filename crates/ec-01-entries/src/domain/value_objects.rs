//! # Value Objects
//!
//! Small immutable records embedded in entries: programs, asset amounts,
//! value references and asset definitions. Each hashed record spells out
//! its field order in a hand-written `WriteForHash` impl.

use serde::{Deserialize, Serialize};
use shared_types::{AssetId, ByteSink, EncodingResult, Hash, Sha3Hasher, WriteForHash};

// =============================================================================
// ENTRY TYPE TAGS
// =============================================================================

/// Domain-separation prefix mixed into every entry ID.
pub const ENTRY_ID_PREFIX: &[u8] = b"entryid:";

pub const TYPE_TX_HEADER: &str = "txheader";
pub const TYPE_MUX: &str = "mux1";
pub const TYPE_OUTPUT: &str = "output1";
pub const TYPE_RETIREMENT: &str = "retirement1";
pub const TYPE_SPEND: &str = "spend1";
pub const TYPE_ISSUANCE: &str = "issuance1";
pub const TYPE_NONCE: &str = "nonce1";
pub const TYPE_TIME_RANGE: &str = "timerange1";
pub const TYPE_BLOCK_HEADER: &str = "blockheader";

// =============================================================================
// PROGRAM
// =============================================================================

/// A VM version paired with bytecode.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Program {
    pub vm_version: u64,
    #[serde(with = "shared_types::serde_hex::bytes")]
    pub code: Vec<u8>,
}

impl Program {
    pub fn new(vm_version: u64, code: Vec<u8>) -> Self {
        Self { vm_version, code }
    }
}

impl WriteForHash for Program {
    fn write_for_hash<W: ByteSink + ?Sized>(&self, w: &mut W) -> EncodingResult<()> {
        self.vm_version.write_for_hash(w)?;
        self.code.write_for_hash(w)
    }
}

// =============================================================================
// VALUE FLOW
// =============================================================================

/// A quantity of one asset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetAmount {
    pub asset_id: AssetId,
    pub amount: u64,
}

impl AssetAmount {
    pub fn new(asset_id: AssetId, amount: u64) -> Self {
        Self { asset_id, amount }
    }
}

impl WriteForHash for AssetAmount {
    fn write_for_hash<W: ByteSink + ?Sized>(&self, w: &mut W) -> EncodingResult<()> {
        self.asset_id.write_for_hash(w)?;
        self.amount.write_for_hash(w)
    }
}

/// Where value flows in from: slot `position` of the entry `ref_id`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValueSource {
    pub ref_id: Hash,
    pub value: AssetAmount,
    pub position: u64,
}

impl WriteForHash for ValueSource {
    fn write_for_hash<W: ByteSink + ?Sized>(&self, w: &mut W) -> EncodingResult<()> {
        self.ref_id.write_for_hash(w)?;
        self.value.write_for_hash(w)?;
        self.position.write_for_hash(w)
    }
}

/// Where value flows out to: slot `position` of the entry `ref_id`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValueDestination {
    pub ref_id: Hash,
    pub value: AssetAmount,
    pub position: u64,
}

// =============================================================================
// ASSET DEFINITION
// =============================================================================

/// The data an asset ID commits to.
///
/// `data` is the hash of the issuer's free-form asset definition document,
/// not the document itself.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetDefinition {
    pub initial_block_id: Hash,
    pub issuance_program: Program,
    pub data: Hash,
}

impl AssetDefinition {
    /// `SHA3(write_for_hash(self))`.
    pub fn compute_asset_id(&self) -> EncodingResult<AssetId> {
        let mut hasher = Sha3Hasher::new();
        self.write_for_hash(&mut hasher)?;
        Ok(AssetId::from(<[u8; 32]>::from(hasher.finalize())))
    }
}

impl WriteForHash for AssetDefinition {
    fn write_for_hash<W: ByteSink + ?Sized>(&self, w: &mut W) -> EncodingResult<()> {
        self.initial_block_id.write_for_hash(w)?;
        self.issuance_program.write_for_hash(w)?;
        self.data.write_for_hash(w)
    }
}

/// Compute an asset ID from its raw components.
///
/// `asset_definition` is the issuer's document; it is hashed before being
/// committed to.
pub fn compute_asset_id(
    issuance_program: &[u8],
    initial_block_id: Hash,
    vm_version: u64,
    asset_definition: &[u8],
) -> EncodingResult<AssetId> {
    AssetDefinition {
        initial_block_id,
        issuance_program: Program::new(vm_version, issuance_program.to_vec()),
        data: shared_types::sha3_256(asset_definition),
    }
    .compute_asset_id()
}
