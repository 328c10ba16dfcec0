//! End-to-end builder tests: every valid claim yields a witness that passes
//! its own checks, and every single-field mutation makes the check fail.

use halo2curves_axiom::bn256::Fr;
use halo2curves_axiom::ff::Field;
use k256::ecdsa::SigningKey as EcdsaSigningKey;
use k256::FieldBytes;
use num_bigint::BigUint;
use proptest::prelude::*;
use zkcred_crypto::eddsa::SigningKey;
use zkcred_crypto::recover::{
    ethereum_address, personal_message_digest, public_key_coordinates, sign_prehash,
};
use zkcred_crypto::NativeHasher;
use zkcred_witness::{
    AttestationBuilder, BalanceClaim, EmailClaim, Erc721Claim, Network, PrecomputedSignature,
    SessionNonce, SocialClaim, WitnessError,
};

const SUBJECT: &str = "0xbf74483DB914192bb0a9577f3d8Fb29a6d4c08eE";
const TOKEN: &str = "0x722B0676F457aFe13e479eB2a8A4De88BA15B2c6";

fn other_owners() -> Vec<String> {
    [
        "0x8ac28b06fC1eEAA8646c0d8A5e835B96e93D6799",
        "0xdb2BA58f1CB7b10698A9Be268cB846809F0B05e4",
        "0x9B55710351F7f4ae1727c66A140734c483CD1269",
        "0x17Faf610A5538DB09282650596B4B7858195e32E",
        "0x2f996d1EABd2325Df2d7532fEEA3EF336FF15b71",
        "0x477b73ce3A4D9Fe4547c4AFf901F991751aaCbE0",
        "0xC21CB669C1829c07AECBB985b223EC5F1172F88d",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn owner_set() -> Vec<String> {
    let mut set = vec![SUBJECT.to_string()];
    set.extend(other_owners());
    set
}

fn attestor() -> SigningKey {
    SigningKey::from_seed(b"integration attestor seed")
}

fn nonce() -> SessionNonce {
    SessionNonce::new(Fr::from(314159u64), Fr::from(271828u64))
}

fn balance_claim() -> BalanceClaim {
    BalanceClaim {
        subject_address: SUBJECT.to_string(),
        token_address: TOKEN.to_string(),
        network: Network::Testnet,
        threshold: BigUint::from(1u8),
        balance: BigUint::from(5u8),
        owner_set: owner_set(),
    }
}

fn social_claim() -> SocialClaim {
    let key = EcdsaSigningKey::from_bytes(FieldBytes::from_slice(&[7u8; 32]))
        .expect("fixture key bytes");
    let digest = personal_message_digest("link my identity");
    let (r, s) = sign_prehash(&key, &digest).expect("sign fixture digest");
    let pubkey = public_key_coordinates(&key).expect("pubkey coordinates");
    let subject = ethereum_address(&key).expect("fixture address");
    let mut owners = other_owners();
    owners.push(subject.clone());
    SocialClaim {
        subject_address: subject,
        service: "farcaster".to_string(),
        owner_set: owners,
        signature: PrecomputedSignature {
            r,
            s,
            digest,
            pubkey_x: pubkey.x,
            pubkey_y: pubkey.y,
        },
        commitment_pool: (1..100u64).map(|i| (i * i + 1).to_string()).collect(),
    }
}

#[test]
fn balance_witness_passes_self_check() {
    let hasher = NativeHasher::init();
    let attestor = attestor();
    let builder = AttestationBuilder::new(&hasher, &attestor);
    let witness = builder.balance_witness(&balance_claim(), &nonce()).unwrap();
    witness.self_check(&hasher).unwrap();
}

#[test]
fn erc721_witness_passes_self_check() {
    let hasher = NativeHasher::init();
    let attestor = attestor();
    let builder = AttestationBuilder::new(&hasher, &attestor);
    let claim = Erc721Claim {
        subject_address: SUBJECT.to_string(),
        token_address: TOKEN.to_string(),
    };
    let witness = builder.erc721_witness(&claim, &nonce()).unwrap();
    witness.self_check(&hasher).unwrap();
    assert_eq!(witness.message.len(), 88);
}

#[test]
fn email_witness_passes_self_check() {
    let hasher = NativeHasher::init();
    let attestor = attestor();
    let builder = AttestationBuilder::new(&hasher, &attestor);
    let claim = EmailClaim {
        domain: "proofmail.org".to_string(),
    };
    let witness = builder.email_witness(&claim, &nonce()).unwrap();
    witness.self_check(&hasher).unwrap();
    assert_eq!(witness.message.len(), 90);
}

#[test]
fn social_witness_passes_self_check() {
    let hasher = NativeHasher::init();
    let attestor = attestor();
    let builder = AttestationBuilder::new(&hasher, &attestor);
    let witness = builder.social_witness(&social_claim()).unwrap();
    witness.self_check(&hasher).unwrap();
    assert_eq!(witness.seal_hub_siblings.len(), 30);
    assert_eq!(witness.owners_siblings.len(), 20);
}

#[test]
fn every_balance_witness_mutation_fails_self_check() {
    let hasher = NativeHasher::init();
    let attestor = attestor();
    let builder = AttestationBuilder::new(&hasher, &attestor);
    let witness = builder.balance_witness(&balance_claim(), &nonce()).unwrap();

    let mutations: Vec<(&str, Box<dyn Fn(&mut zkcred_witness::BalanceWitness)>)> = vec![
        ("message tag", Box::new(|w| w.balance_message[0] += Fr::one())),
        ("merkle root in message", Box::new(|w| w.balance_message[1] += Fr::one())),
        ("token in message", Box::new(|w| w.balance_message[2] += Fr::one())),
        ("network byte", Box::new(|w| w.balance_message[3] += Fr::one())),
        ("threshold in message", Box::new(|w| w.balance_message[4] += Fr::one())),
        ("address pubkey x", Box::new(|w| w.address_pub_key_x += Fr::one())),
        ("balance pubkey y", Box::new(|w| w.balance_pub_key_y += Fr::one())),
        ("address R8x", Box::new(|w| w.address_r8x += Fr::one())),
        ("balance R8y", Box::new(|w| w.balance_r8y += Fr::one())),
        ("address S", Box::new(|w| w.address_s += 1u8)),
        ("balance S", Box::new(|w| w.balance_s += 1u8)),
        ("sibling", Box::new(|w| w.siblings[0] += Fr::one())),
        ("deep sibling", Box::new(|w| w.siblings[19] += Fr::one())),
        ("path bit", Box::new(|w| w.path_indices[0] ^= 1)),
        ("nonce r2", Box::new(|w| w.nonce[0] += Fr::one())),
        ("nonce s2", Box::new(|w| w.nonce[1] += Fr::one())),
        ("nullifier", Box::new(|w| w.nullifier += Fr::one())),
        ("leaf address", Box::new(|w| w.address += Fr::one())),
    ];

    for (label, mutate) in mutations {
        let mut mutated = witness.clone();
        mutate(&mut mutated);
        assert!(
            mutated.self_check(&hasher).is_err(),
            "mutation '{label}' should fail the self-check"
        );
    }
}

#[test]
fn every_social_witness_mutation_fails_self_check() {
    let hasher = NativeHasher::init();
    let attestor = attestor();
    let builder = AttestationBuilder::new(&hasher, &attestor);
    let witness = builder.social_witness(&social_claim()).unwrap();

    let mutations: Vec<(&str, Box<dyn Fn(&mut zkcred_witness::SocialWitness)>)> = vec![
        ("signature register", Box::new(|w| w.seal_hub_s[0] ^= 1)),
        ("aux point register", Box::new(|w| w.seal_hub_u[0][2] ^= 1)),
        ("pubkey register", Box::new(|w| w.seal_hub_pub_key[1][0] ^= 1)),
        ("commitment sibling", Box::new(|w| w.seal_hub_siblings[7] += Fr::one())),
        ("commitment path bit", Box::new(|w| w.seal_hub_path_indices[3] ^= 1)),
        ("commitment root", Box::new(|w| w.seal_hub_merkle_root += Fr::one())),
        ("owners sibling", Box::new(|w| w.owners_siblings[0] += Fr::one())),
        ("owners path bit", Box::new(|w| w.owners_path_indices[0] ^= 1)),
        ("message root", Box::new(|w| w.attestation_message[1] += Fr::one())),
        ("attestation S", Box::new(|w| w.attestation_s += 1u8)),
        ("subject address", Box::new(|w| w.seal_hub_address += Fr::one())),
        ("nullifier", Box::new(|w| w.nullifier += Fr::one())),
    ];

    for (label, mutate) in mutations {
        let mut mutated = witness.clone();
        mutate(&mut mutated);
        assert!(
            mutated.self_check(&hasher).is_err(),
            "mutation '{label}' should fail the self-check"
        );
    }
}

#[test]
fn threshold_matrix_follows_geq_semantics() {
    let hasher = NativeHasher::init();
    let attestor = attestor();
    let builder = AttestationBuilder::new(&hasher, &attestor);

    let values: Vec<BigUint> = vec![
        BigUint::from(0u8),
        BigUint::from(1u8),
        BigUint::parse_bytes(b"6b87c4e204970e6", 16).unwrap(),
        (BigUint::from(1u8) << 256) - 1u8,
    ];

    for balance in &values {
        for threshold in &values {
            let mut claim = balance_claim();
            claim.balance = balance.clone();
            claim.threshold = threshold.clone();
            let result = builder.balance_witness(&claim, &nonce());
            if balance >= threshold {
                assert!(
                    result.is_ok(),
                    "balance {balance} >= threshold {threshold} should succeed"
                );
            } else {
                assert!(
                    matches!(result, Err(WitnessError::InvalidClaim(_))),
                    "balance {balance} < threshold {threshold} should fail"
                );
            }
        }
    }
}

#[test]
fn network_byte_appears_verbatim() {
    let hasher = NativeHasher::init();
    let attestor = attestor();
    let builder = AttestationBuilder::new(&hasher, &attestor);

    let mut claim = balance_claim();
    claim.network = Network::Mainnet;
    let witness = builder.balance_witness(&claim, &nonce()).unwrap();
    assert_eq!(witness.balance_message[3], Fr::from(0x6d));

    claim.network = Network::Testnet;
    let witness = builder.balance_witness(&claim, &nonce()).unwrap();
    assert_eq!(witness.balance_message[3], Fr::from(0x67));
}

#[test]
fn stale_owner_set_invalidates_witness() {
    let hasher = NativeHasher::init();
    let attestor = attestor();
    let builder = AttestationBuilder::new(&hasher, &attestor);
    let witness = builder.balance_witness(&balance_claim(), &nonce()).unwrap();

    let mut grown = balance_claim();
    grown
        .owner_set
        .push("0x8132Fc22Bf132078695D95eAC4f72B4BB852802b".to_string());
    let rebuilt = builder.balance_witness(&grown, &nonce()).unwrap();

    // The root moved, so the old proof no longer matches the new message.
    let mut stale = witness.clone();
    stale.balance_message[1] = rebuilt.balance_message[1];
    assert!(stale.self_check(&hasher).is_err());
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(8))]

    #[test]
    fn arbitrary_valid_claims_self_check(
        subject_bytes in prop::array::uniform20(any::<u8>()),
        extra_owner_bytes in prop::collection::vec(prop::array::uniform20(any::<u8>()), 1..6),
        threshold in 0u128..u128::MAX / 2,
        surplus in 0u128..u128::MAX / 2,
        mainnet in any::<bool>(),
    ) {
        let hasher = NativeHasher::init();
        let attestor = attestor();
        let builder = AttestationBuilder::new(&hasher, &attestor);

        let subject = format!("0x{}", hex::encode(subject_bytes));
        let mut owners = vec![subject.clone()];
        owners.extend(
            extra_owner_bytes
                .iter()
                .map(|bytes| format!("0x{}", hex::encode(bytes))),
        );

        let claim = BalanceClaim {
            subject_address: subject,
            token_address: TOKEN.to_string(),
            network: if mainnet { Network::Mainnet } else { Network::Testnet },
            threshold: BigUint::from(threshold),
            balance: BigUint::from(threshold) + BigUint::from(surplus),
            owner_set: owners,
        };
        let witness = builder.balance_witness(&claim, &nonce()).unwrap();
        prop_assert!(witness.self_check(&hasher).is_ok());
    }
}
