//! Multi-key inclusion proofs
//!
//! The in-memory engine produces proofs with the same components as a
//! Verkle multiproof: commitments along each key's path, one
//! depth/extension byte per stem, the stems of leaves that prove absence,
//! and a multipoint opening (`D` plus an IPA proof). The opening is a
//! BLAKE3 transcript rather than a real polynomial opening, so the proofs
//! have the right shape and size but are not verifiable.

use super::engine::{ProofError, SerializeError};
use super::node::{InternalNode, VerkleNode};
use crate::model::{Commitment, Key, Stem, Value};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Halving rounds of the IPA argument over a width-256 domain
pub const IPA_ROUNDS: usize = 8;

/// Serialized IPA proof: `IPA_ROUNDS` left and right commitments plus the
/// final evaluation, 32 bytes each
pub const IPA_PROOF_SIZE: usize = (2 * IPA_ROUNDS + 1) * 32;

/// Stem has no leaf; the path ends in an empty slot
pub const EXT_STATUS_ABSENT_EMPTY: u8 = 0;
/// Path ends in a leaf holding a different stem
pub const EXT_STATUS_ABSENT_OTHER: u8 = 1;
/// Path ends in the stem's own leaf
pub const EXT_STATUS_PRESENT: u8 = 2;

const D_TAG: u8 = 0x10;
const IPA_LEFT_TAG: u8 = 0x11;
const IPA_RIGHT_TAG: u8 = 0x12;
const IPA_FINAL_TAG: u8 = 0x13;

/// Pack a depth and an extension status into one byte
pub fn extension_status(depth: usize, status: u8) -> u8 {
    ((depth as u8) << 3) | status
}

/// Inner-product argument part of a multipoint opening
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct IpaProof {
    pub cl: [[u8; 32]; IPA_ROUNDS],
    pub cr: [[u8; 32]; IPA_ROUNDS],
    pub final_evaluation: [u8; 32],
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MultiPointProof {
    pub d: Commitment,
    pub ipa: IpaProof,
}

/// An engine-side proof for a set of keys
#[derive(Clone, Debug)]
pub struct Proof {
    /// Requested keys, sorted and deduplicated
    pub keys: Vec<Key>,
    /// Value of each key at proof time, aligned with `keys`
    pub values: Vec<Option<Value>>,
    /// Commitments of every node below the root on the keys' paths, in path order
    pub commitments: Vec<Commitment>,
    /// One byte per distinct stem, see [`extension_status`]
    pub extension_statuses: Vec<u8>,
    /// Stems of leaves proving absence of other stems
    pub poa_stems: Vec<Stem>,
    pub multipoint: MultiPointProof,
}

/// A proof in its transferable form
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerkleProof {
    pub other_stems: Vec<Stem>,
    pub depth_extension_present: Vec<u8>,
    pub commitments_by_path: Vec<Commitment>,
    pub d: Vec<u8>,
    pub ipa_proof: IpaProof,
}

impl VerkleProof {
    /// Length of the bincode encoding
    pub fn encoded_len(&self) -> Result<usize, SerializeError> {
        Ok(bincode::serialized_size(self)? as usize)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuffixStateDiff {
    pub suffix: u8,
    pub current_value: Option<Value>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StemStateDiff {
    pub stem: Stem,
    pub suffix_diffs: Vec<SuffixStateDiff>,
}

/// The values a proof touches, grouped by stem
pub type StateDiff = Vec<StemStateDiff>;

pub(crate) fn build(root: &InternalNode, keys: &[Key]) -> Result<Proof, ProofError> {
    if keys.is_empty() {
        return Err(ProofError::EmptyKeySet);
    }
    let root_commitment = root.commitment().ok_or(ProofError::Uncommitted)?;

    let mut keys = keys.to_vec();
    keys.sort();
    keys.dedup();

    let mut collector = PathCollector::default();
    let mut values = Vec::with_capacity(keys.len());
    for key in &keys {
        values.push(collector.walk(root, key)?);
    }

    // A requested stem never needs to be proven as "some other stem"
    for key in &keys {
        collector.poa_stems.remove(&key.stem());
    }

    let commitments: Vec<Commitment> = collector.by_path.into_values().collect();
    let extension_statuses: Vec<u8> = collector.statuses.into_values().collect();
    let multipoint = open(root_commitment, &commitments, &extension_statuses, &values);

    Ok(Proof {
        keys,
        values,
        commitments,
        extension_statuses,
        poa_stems: collector.poa_stems.into_iter().collect(),
        multipoint,
    })
}

pub(crate) fn serialize(proof: &Proof) -> Result<(VerkleProof, StateDiff), SerializeError> {
    if proof.keys.len() != proof.values.len() {
        return Err(SerializeError::Mismatch {
            keys: proof.keys.len(),
            values: proof.values.len(),
        });
    }

    let verkle_proof = VerkleProof {
        other_stems: proof.poa_stems.clone(),
        depth_extension_present: proof.extension_statuses.clone(),
        commitments_by_path: proof.commitments.clone(),
        d: proof.multipoint.d.as_bytes().to_vec(),
        ipa_proof: proof.multipoint.ipa.clone(),
    };

    let mut diff: StateDiff = Vec::new();
    for (key, value) in proof.keys.iter().zip(&proof.values) {
        let entry = SuffixStateDiff {
            suffix: key.suffix(),
            current_value: *value,
        };
        match diff.last_mut() {
            Some(last) if last.stem == key.stem() => last.suffix_diffs.push(entry),
            _ => diff.push(StemStateDiff {
                stem: key.stem(),
                suffix_diffs: vec![entry],
            }),
        }
    }

    Ok((verkle_proof, diff))
}

#[derive(Default)]
struct PathCollector {
    by_path: BTreeMap<Vec<u8>, Commitment>,
    statuses: BTreeMap<Stem, u8>,
    poa_stems: BTreeSet<Stem>,
}

impl PathCollector {
    fn walk(&mut self, root: &InternalNode, key: &Key) -> Result<Option<Value>, ProofError> {
        let stem = key.stem();
        let path = key.as_bytes();
        let mut node = root;
        let mut depth = 0;

        loop {
            let child_depth = depth + 1;
            match node.child(path[depth]) {
                None => {
                    self.statuses
                        .entry(stem)
                        .or_insert(extension_status(child_depth, EXT_STATUS_ABSENT_EMPTY));
                    return Ok(None);
                }
                Some(VerkleNode::Opaque(_)) => {
                    return Err(ProofError::OpaqueOnPath { depth: child_depth });
                }
                Some(VerkleNode::Internal(child)) => {
                    let commitment = child.commitment().ok_or(ProofError::Uncommitted)?;
                    self.by_path.insert(path[..child_depth].to_vec(), commitment);
                    node = child;
                    depth = child_depth;
                }
                Some(VerkleNode::Leaf(leaf)) => {
                    let commitment = leaf.commitment().ok_or(ProofError::Uncommitted)?;
                    self.by_path.insert(path[..child_depth].to_vec(), commitment);

                    if leaf.stem() == &stem {
                        self.statuses
                            .insert(stem, extension_status(child_depth, EXT_STATUS_PRESENT));
                        return Ok(leaf.value(key.suffix()).copied());
                    }

                    self.statuses
                        .entry(stem)
                        .or_insert(extension_status(child_depth, EXT_STATUS_ABSENT_OTHER));
                    self.poa_stems.insert(*leaf.stem());
                    return Ok(None);
                }
            }
        }
    }
}

fn open(
    root: Commitment,
    commitments: &[Commitment],
    statuses: &[u8],
    values: &[Option<Value>],
) -> MultiPointProof {
    let mut transcript = root.as_bytes().to_vec();
    for commitment in commitments {
        transcript.extend_from_slice(commitment.as_bytes());
    }
    transcript.extend_from_slice(statuses);
    for value in values {
        match value {
            Some(value) => transcript.extend_from_slice(value),
            None => transcript.push(0),
        }
    }
    let d = Commitment::digest_tagged(D_TAG, &[&transcript]);

    let round = |tag: u8, i: usize| *Commitment::digest_tagged(tag, &[d.as_bytes(), &[i as u8]]).as_bytes();
    let ipa = IpaProof {
        cl: std::array::from_fn(|i| round(IPA_LEFT_TAG, i)),
        cr: std::array::from_fn(|i| round(IPA_RIGHT_TAG, i)),
        final_evaluation: *Commitment::digest_tagged(IPA_FINAL_TAG, &[d.as_bytes()]).as_bytes(),
    };

    MultiPointProof { d, ipa }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extension_status_packing() {
        assert_eq!(extension_status(0, EXT_STATUS_PRESENT), 2);
        assert_eq!(extension_status(3, EXT_STATUS_ABSENT_OTHER), (3 << 3) | 1);
        assert_eq!(extension_status(31, EXT_STATUS_PRESENT) >> 3, 31);
    }

    #[test]
    fn test_ipa_proof_size_is_seventeen_words() {
        assert_eq!(IPA_PROOF_SIZE, 17 * 32);
    }

    #[test]
    fn test_build_rejects_uncommitted_and_empty() {
        let root = InternalNode::new();
        assert!(matches!(build(&root, &[]), Err(ProofError::EmptyKeySet)));
        assert!(matches!(
            build(&root, &[Key::from_bytes([0; 32])]),
            Err(ProofError::Uncommitted)
        ));
    }

    #[test]
    fn test_serialize_rejects_misaligned_values() {
        let mut root = VerkleNode::Internal(InternalNode::new());
        root.commit();
        let key = Key::from_bytes([5; 32]);
        let mut proof = build(root.as_internal().unwrap(), &[key]).unwrap();
        proof.values.clear();

        assert!(matches!(
            serialize(&proof),
            Err(SerializeError::Mismatch { keys: 1, values: 0 })
        ));
    }
}
