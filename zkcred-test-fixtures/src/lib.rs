//! Deterministic fixtures shared across crates and the CLI.
//!
//! Everything here is seeded: the attestor key, the owner set, the session
//! nonce, and the precomputed secp256k1 signature are all reproducible, so
//! witness files generated from these fixtures are byte-identical across
//! runs.

use halo2curves_axiom::bn256::Fr;
use k256::ecdsa::SigningKey as EcdsaSigningKey;
use k256::FieldBytes;
use num_bigint::BigUint;
use once_cell::sync::OnceCell;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use zkcred_crypto::eddsa::SigningKey;
use zkcred_crypto::recover::{
    ethereum_address, personal_message_digest, public_key_coordinates, sign_prehash,
};
use zkcred_crypto::NativeHasher;
use zkcred_witness::{
    AttestationBuilder, BalanceClaim, BalanceWitness, EmailClaim, EmailWitness, Erc721Claim,
    Erc721Witness, Network, PrecomputedSignature, SessionNonce, SocialClaim, SocialWitness,
};

const ATTESTOR_SEED: &[u8] = b"zkcred fixture attestor seed";
const ECDSA_KEY_BYTES: [u8; 32] = [7u8; 32];
const OWNER_SET_SEED: u64 = 0x5eed;
const OWNER_SET_SIZE: usize = 20;
const LINK_MESSAGE: &str = "link my identity";
const FIXTURE_TOKEN: &str = "0x722B0676F457aFe13e479eB2a8A4De88BA15B2c6";
const FIXTURE_DOMAIN: &str = "proofmail.org";

static FIXTURES: OnceCell<TestFixtures> = OnceCell::new();

/// Pre-built witnesses and the material they were derived from.
pub struct TestFixtures {
    attestor: SigningKey,
    subject_address: String,
    owner_set: Vec<String>,
    balance_claim: BalanceClaim,
    balance_witness: BalanceWitness,
    erc721_witness: Erc721Witness,
    email_witness: EmailWitness,
    social_witness: SocialWitness,
}

impl TestFixtures {
    pub fn attestor(&self) -> &SigningKey {
        &self.attestor
    }

    pub fn subject_address(&self) -> &str {
        &self.subject_address
    }

    pub fn owner_set(&self) -> &[String] {
        &self.owner_set
    }

    pub fn balance_claim(&self) -> &BalanceClaim {
        &self.balance_claim
    }

    pub fn balance_witness(&self) -> &BalanceWitness {
        &self.balance_witness
    }

    pub fn erc721_witness(&self) -> &Erc721Witness {
        &self.erc721_witness
    }

    pub fn email_witness(&self) -> &EmailWitness {
        &self.email_witness
    }

    pub fn social_witness(&self) -> &SocialWitness {
        &self.social_witness
    }

    /// A deterministic session nonce for tests that need one.
    pub fn session_nonce() -> SessionNonce {
        SessionNonce::new(Fr::from(314_159u64), Fr::from(271_828u64))
    }
}

/// Lazily built fixtures shared across the whole test process.
pub fn fixtures() -> &'static TestFixtures {
    FIXTURES.get_or_init(|| build_fixtures().expect("failed to build zkcred test fixtures"))
}

/// A snarkjs-shaped proof document with its public signals, for exercising
/// calldata reformatting without a live prover.
pub fn sample_proof_json() -> (&'static str, Vec<String>) {
    let proof = r#"{
        "pi_a": ["1368015179489954701390400359078579693043519447331113978918064868415326638035", "9918110051302171585080402603319702774565515993150576347155970296011118125764", "1"],
        "pi_b": [["2725019753478801796453339367788033689375851816420509565303521482350756874229", "7273165102799931111715871471550377909735733521218303035754523677688038059653"], ["2512659008974376214222774206987427162027254181373325676825515531566330959255", "957874124722006818841961785324909313781880061366718538693995380805373202866"], ["1", "0"]],
        "pi_c": ["153742856793751299594610622366420860868899149888228198415436262849703014848", "141458621724864034185200104739376510495277150695679034675307894469021387465", "1"],
        "protocol": "groth16",
        "curve": "bn128"
    }"#;
    let signals = vec![
        "33".to_string(),
        "0x6d".to_string(),
        "109".to_string(),
    ];
    (proof, signals)
}

fn build_fixtures() -> Result<TestFixtures, zkcred_witness::WitnessError> {
    let hasher = NativeHasher::init();
    let attestor = SigningKey::from_seed(ATTESTOR_SEED);
    let builder = AttestationBuilder::new(&hasher, &attestor);
    let nonce = TestFixtures::session_nonce();

    let ecdsa_key = EcdsaSigningKey::from_bytes(FieldBytes::from_slice(&ECDSA_KEY_BYTES))
        .expect("fixture ecdsa key bytes");
    let subject_address = ethereum_address(&ecdsa_key).expect("fixture address");

    let mut owner_set = random_addresses(OWNER_SET_SEED, OWNER_SET_SIZE);
    owner_set.push(subject_address.clone());

    let balance_claim = BalanceClaim {
        subject_address: subject_address.clone(),
        token_address: FIXTURE_TOKEN.to_string(),
        network: Network::Testnet,
        threshold: BigUint::from(1u8),
        balance: BigUint::from(1_000_000u64),
        owner_set: owner_set.clone(),
    };
    let balance_witness = builder.balance_witness(&balance_claim, &nonce)?;

    let erc721_witness = builder.erc721_witness(
        &Erc721Claim {
            subject_address: subject_address.clone(),
            token_address: FIXTURE_TOKEN.to_string(),
        },
        &nonce,
    )?;

    let email_witness = builder.email_witness(
        &EmailClaim {
            domain: FIXTURE_DOMAIN.to_string(),
        },
        &nonce,
    )?;

    let digest = personal_message_digest(LINK_MESSAGE);
    let (r, s) = sign_prehash(&ecdsa_key, &digest).expect("sign fixture digest");
    let pubkey = public_key_coordinates(&ecdsa_key).expect("fixture pubkey");
    let social_witness = builder.social_witness(&SocialClaim {
        subject_address: subject_address.clone(),
        service: "farcaster".to_string(),
        owner_set: owner_set.clone(),
        signature: PrecomputedSignature {
            r,
            s,
            digest,
            pubkey_x: pubkey.x,
            pubkey_y: pubkey.y,
        },
        commitment_pool: seeded_commitment_pool(99),
    })?;

    Ok(TestFixtures {
        attestor,
        subject_address,
        owner_set,
        balance_claim,
        balance_witness,
        erc721_witness,
        email_witness,
        social_witness,
    })
}

fn random_addresses(seed: u64, count: usize) -> Vec<String> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    (0..count)
        .map(|_| {
            let mut bytes = [0u8; 20];
            rng.fill(&mut bytes);
            format!("0x{}", hex::encode(bytes))
        })
        .collect()
}

fn seeded_commitment_pool(count: usize) -> Vec<String> {
    let mut rng = ChaCha8Rng::seed_from_u64(OWNER_SET_SEED + 1);
    (0..count)
        .map(|_| {
            // Commitments are field elements; 248 random bits always fit.
            let mut bytes = [0u8; 31];
            rng.fill(&mut bytes);
            BigUint::from_bytes_be(&bytes).to_str_radix(10)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixtures_build_and_self_check() {
        let hasher = NativeHasher::init();
        let f = fixtures();
        f.balance_witness().self_check(&hasher).unwrap();
        f.erc721_witness().self_check(&hasher).unwrap();
        f.email_witness().self_check(&hasher).unwrap();
        f.social_witness().self_check(&hasher).unwrap();
    }

    #[test]
    fn fixtures_are_deterministic() {
        let first = serde_json::to_string(fixtures().balance_witness()).unwrap();
        let second = serde_json::to_string(fixtures().balance_witness()).unwrap();
        assert_eq!(first, second);

        let rebuilt = build_fixtures().unwrap();
        assert_eq!(
            serde_json::to_string(rebuilt.balance_witness()).unwrap(),
            first
        );
    }

    #[test]
    fn owner_set_contains_subject() {
        let f = fixtures();
        assert!(f
            .owner_set()
            .iter()
            .any(|o| o.eq_ignore_ascii_case(f.subject_address())));
    }
}
