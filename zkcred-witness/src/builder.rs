//! Claim-to-witness orchestration.
//!
//! The builder owns no state beyond the hashing capability and the attestor
//! key it was handed; each call runs one claim through canonicalization,
//! signing, Merkle proving, and nullifier derivation, then re-verifies the
//! assembled witness before returning it.

use halo2curves_axiom::bn256::Fr;
use tracing::debug;
use zkcred_crypto::eddsa::SigningKey;
use zkcred_crypto::field::{fr_from_decimal, fr_from_hex_str};
use zkcred_crypto::limbs::to_registers_64x4;
use zkcred_crypto::recover::recover_u_point;
use zkcred_crypto::NativeHasher;
use zkcred_merkle::{MembershipSet, MerkleProof, COMMITMENT_TREE_DEPTH, MEMBERSHIP_TREE_DEPTH};

use crate::claim::{BalanceClaim, EmailClaim, Erc721Claim, SocialClaim};
use crate::message::{balance_message, email_message, erc721_message, social_message};
use crate::nullifier::{identity_commitment, identity_nullifier, session_nullifier, SessionNonce};
use crate::witness::{BalanceWitness, EmailWitness, Erc721Witness, SocialWitness};
use crate::WitnessError;

/// Builds one witness per call from an explicit claim configuration.
pub struct AttestationBuilder<'a> {
    hasher: &'a NativeHasher,
    attestor: &'a SigningKey,
}

impl<'a> AttestationBuilder<'a> {
    pub fn new(hasher: &'a NativeHasher, attestor: &'a SigningKey) -> Self {
        Self { hasher, attestor }
    }

    /// Witness for a balance-threshold claim.
    ///
    /// Signs the attestation message and, independently, the bare subject
    /// address, binding the identity to the committed owner set.
    pub fn balance_witness(
        &self,
        claim: &BalanceClaim,
        nonce: &SessionNonce,
    ) -> Result<BalanceWitness, WitnessError> {
        claim.validate()?;

        let (address, proof) = self.owner_set_proof(&claim.owner_set, &claim.subject_address)?;
        let message = balance_message(
            proof.root,
            &claim.token_address,
            claim.network,
            &claim.threshold,
        )?;

        let balance_signature = self.attestor.sign(self.hasher, self.hasher.digest(&message));
        let address_signature = self
            .attestor
            .sign(self.hasher, self.hasher.digest(&[address]));
        let public = self.attestor.verifying_key().point();

        let witness = BalanceWitness {
            address,
            address_pub_key_x: public.x,
            address_pub_key_y: public.y,
            address_r8x: address_signature.r8.x,
            address_r8y: address_signature.r8.y,
            address_s: address_signature.s,
            balance_message: message,
            balance_pub_key_x: public.x,
            balance_pub_key_y: public.y,
            balance_r8x: balance_signature.r8.x,
            balance_r8y: balance_signature.r8.y,
            balance_s: balance_signature.s,
            path_indices: proof.path_indices,
            siblings: proof.siblings,
            nonce: nonce.elements(),
            nullifier: session_nullifier(self.hasher, nonce),
        };
        witness.self_check(self.hasher)?;
        debug!(kind = "balance", "witness assembled and self-checked");
        Ok(witness)
    }

    /// Witness for an ERC-721 ownership claim.
    pub fn erc721_witness(
        &self,
        claim: &Erc721Claim,
        nonce: &SessionNonce,
    ) -> Result<Erc721Witness, WitnessError> {
        claim.validate()?;

        let message = erc721_message(&claim.subject_address, &claim.token_address);
        let digest = self.hasher.digest_bytes(&message);
        let signature = self.attestor.sign(self.hasher, digest);
        let public = self.attestor.verifying_key().point();

        let witness = Erc721Witness {
            message,
            token_address: claim.token_address.as_bytes().to_vec(),
            pub_key_x: public.x,
            pub_key_y: public.y,
            r8x: signature.r8.x,
            r8y: signature.r8.y,
            s: signature.s,
            m: digest,
            nonce: nonce.elements(),
            nullifier: session_nullifier(self.hasher, nonce),
        };
        witness.self_check(self.hasher)?;
        debug!(kind = "erc721", "witness assembled and self-checked");
        Ok(witness)
    }

    /// Witness for an email-domain claim.
    pub fn email_witness(
        &self,
        claim: &EmailClaim,
        nonce: &SessionNonce,
    ) -> Result<EmailWitness, WitnessError> {
        claim.validate()?;

        let message = email_message(&claim.domain)?;
        let signature = self
            .attestor
            .sign(self.hasher, self.hasher.digest_bytes(&message));
        let public = self.attestor.verifying_key().point();

        let witness = EmailWitness {
            message,
            pub_key_x: public.x,
            pub_key_y: public.y,
            r8x: signature.r8.x,
            r8y: signature.r8.y,
            s: signature.s,
            nonce: nonce.elements(),
            nullifier: session_nullifier(self.hasher, nonce),
        };
        witness.self_check(self.hasher)?;
        debug!(kind = "email", "witness assembled and self-checked");
        Ok(witness)
    }

    /// Witness for a social-identity claim.
    ///
    /// Derives the auxiliary point from the precomputed signature, commits
    /// it into the commitment set, and binds the identity-scoped nullifier.
    pub fn social_witness(&self, claim: &SocialClaim) -> Result<SocialWitness, WitnessError> {
        claim.validate()?;

        let (address, owners_proof) =
            self.owner_set_proof(&claim.owner_set, &claim.subject_address)?;
        let message = social_message(owners_proof.root, &claim.service);
        let signature = self.attestor.sign(self.hasher, self.hasher.digest(&message));
        let public = self.attestor.verifying_key().point();

        let u = recover_u_point(&claim.signature.r, &claim.signature.digest)?;
        let s_registers = to_registers_64x4(&claim.signature.s);
        let pubkey = claim.signature.pubkey();
        let commitment = identity_commitment(self.hasher, &s_registers, &u, &pubkey);

        let mut commitment_leaves = claim
            .commitment_pool
            .iter()
            .map(|s| {
                fr_from_decimal(s)
                    .map_err(|_| WitnessError::InvalidClaim(format!("bad commitment: {s}")))
            })
            .collect::<Result<Vec<Fr>, _>>()?;
        let own_index = commitment_leaves.len();
        commitment_leaves.push(commitment);
        let commitment_tree = zkcred_merkle::MerkleTree::build(
            self.hasher,
            &commitment_leaves,
            COMMITMENT_TREE_DEPTH,
        )?;
        let commitment_proof = commitment_tree.prove(own_index)?;

        let witness = SocialWitness {
            seal_hub_u: u.registers(),
            seal_hub_s: s_registers,
            seal_hub_pub_key: pubkey.registers(),
            seal_hub_address: address,
            seal_hub_path_indices: commitment_proof.path_indices,
            seal_hub_siblings: commitment_proof.siblings,
            seal_hub_merkle_root: commitment_proof.root,
            attestation_message: message,
            attestation_pub_key_x: public.x,
            attestation_pub_key_y: public.y,
            attestation_r8x: signature.r8.x,
            attestation_r8y: signature.r8.y,
            attestation_s: signature.s,
            owners_path_indices: owners_proof.path_indices,
            owners_siblings: owners_proof.siblings,
            nullifier: identity_nullifier(
                self.hasher,
                &s_registers,
                &u.registers(),
                address,
            ),
        };
        witness.self_check(self.hasher)?;
        debug!(kind = "social", "witness assembled and self-checked");
        Ok(witness)
    }

    /// Normalize the owner set, prove the subject's membership, and return
    /// the subject address as a field element along with the proof.
    fn owner_set_proof(
        &self,
        owner_set: &[String],
        subject_address: &str,
    ) -> Result<(Fr, MerkleProof), WitnessError> {
        let set = MembershipSet::new(owner_set)?;
        let index = set.index_of(subject_address)?;
        let tree = set.tree(self.hasher, MEMBERSHIP_TREE_DEPTH)?;
        let proof = tree.prove(index)?;
        let address = fr_from_hex_str(subject_address)?;
        Ok((address, proof))
    }
}
