//! Proof size accounting

use crate::trie::{VerkleProof, IPA_PROOF_SIZE};

/// Estimate the serialized size of a proof in bytes
///
/// `32 * other_stems + depth_extension_present + 32 * commitments_by_path
/// + d + IPA_PROOF_SIZE`. The IPA proof is charged at its fixed size
/// whatever it contains. This is an accounting estimate for reports, not
/// the length of any wire encoding; see [`VerkleProof::encoded_len`] for
/// the latter.
pub fn estimate_proof_size(proof: &VerkleProof) -> usize {
    proof.other_stems.len() * 32
        + proof.depth_extension_present.len()
        + proof.commitments_by_path.len() * 32
        + proof.d.len()
        + IPA_PROOF_SIZE
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Commitment, STEM_SIZE};
    use crate::trie::IpaProof;

    fn proof(other_stems: usize, ext: usize, commitments: usize, d: usize) -> VerkleProof {
        VerkleProof {
            other_stems: vec![[0; STEM_SIZE]; other_stems],
            depth_extension_present: vec![0; ext],
            commitments_by_path: vec![Commitment::ZERO; commitments],
            d: vec![0; d],
            ipa_proof: IpaProof {
                cl: [[0; 32]; 8],
                cr: [[0; 32]; 8],
                final_evaluation: [0; 32],
            },
        }
    }

    #[test]
    fn test_formula() {
        assert_eq!(estimate_proof_size(&proof(2, 5, 3, 48)), 757);
    }

    #[test]
    fn test_empty_proof_costs_ipa_only() {
        assert_eq!(estimate_proof_size(&proof(0, 0, 0, 0)), 17 * 32);
    }
}
