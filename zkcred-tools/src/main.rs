use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing::info;
use tracing_subscriber::EnvFilter;
use zkcred_crypto::eddsa::SigningKey;
use zkcred_crypto::field::fr_to_decimal;
use zkcred_crypto::NativeHasher;
use zkcred_export::{to_calldata, Groth16Proof};
use zkcred_witness::{
    AttestationBuilder, BalanceClaim, BalanceWitness, EmailClaim, EmailWitness, Erc721Claim,
    Erc721Witness, SessionNonce, SocialClaim, SocialWitness,
};

const DEFAULT_OUTPUT_DIR: &str = "inputs";

#[derive(Parser)]
#[command(
    name = "zkcred-tools",
    about = "Utility commands for attestation witness files"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build a witness file from a claim-config JSON file.
    GenInputs(GenInputsArgs),
    /// Write the deterministic sample witnesses for every claim kind.
    GenSampleInputs(GenSampleInputsArgs),
    /// Reformat an externally generated proof into verifier calldata.
    ExportCalldata(ExportCalldataArgs),
    /// Parse a witness file, re-run its self-check, and print a summary.
    ShowWitness(ShowWitnessArgs),
}

/// Claim kind selecting the canonical message layout and witness shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ClaimKind {
    Balance,
    Erc721,
    Email,
    Social,
}

impl ClaimKind {
    fn file_name(&self) -> &'static str {
        match self {
            ClaimKind::Balance => "input-balance.json",
            ClaimKind::Erc721 => "input-erc721.json",
            ClaimKind::Email => "input-email.json",
            ClaimKind::Social => "input-social.json",
        }
    }
}

#[derive(Args)]
struct GenInputsArgs {
    /// Claim kind the config file describes.
    #[arg(long, value_enum)]
    kind: ClaimKind,
    /// Path to the claim-config JSON file.
    #[arg(long)]
    config: PathBuf,
    /// Attestor signing seed as hex bytes.
    #[arg(long)]
    seed: String,
    /// Output directory for the witness file.
    #[arg(long, default_value = DEFAULT_OUTPUT_DIR)]
    output_dir: PathBuf,
}

#[derive(Args)]
struct GenSampleInputsArgs {
    /// Output directory for the witness files.
    #[arg(long, default_value = DEFAULT_OUTPUT_DIR)]
    output_dir: PathBuf,
}

#[derive(Args)]
struct ExportCalldataArgs {
    /// Path to the proof JSON produced by the external prover.
    #[arg(long)]
    proof: PathBuf,
    /// Path to the public-signals JSON array.
    #[arg(long)]
    public: PathBuf,
    /// Output file; prints to stdout when omitted.
    #[arg(long)]
    out: Option<PathBuf>,
}

#[derive(Args)]
struct ShowWitnessArgs {
    /// Claim kind of the witness file.
    #[arg(long, value_enum)]
    kind: ClaimKind,
    /// Path to the witness JSON file.
    path: PathBuf,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::GenInputs(args) => gen_inputs(args),
        Commands::GenSampleInputs(args) => gen_sample_inputs(args),
        Commands::ExportCalldata(args) => export_calldata(args),
        Commands::ShowWitness(args) => show_witness(args),
    }
}

fn gen_inputs(args: GenInputsArgs) -> Result<()> {
    let seed = hex::decode(args.seed.trim_start_matches("0x"))
        .context("attestor seed must be hex bytes")?;
    let attestor = SigningKey::from_seed(&seed);
    let hasher = NativeHasher::init();
    let builder = AttestationBuilder::new(&hasher, &attestor);
    let nonce = SessionNonce::from_entropy(&mut rand::thread_rng());

    let config = fs::read_to_string(&args.config)
        .with_context(|| format!("failed to read {}", args.config.display()))?;

    let witness_json = match args.kind {
        ClaimKind::Balance => {
            let claim: BalanceClaim =
                serde_json::from_str(&config).context("failed to parse balance claim config")?;
            serde_json::to_string_pretty(&builder.balance_witness(&claim, &nonce)?)?
        }
        ClaimKind::Erc721 => {
            let claim: Erc721Claim =
                serde_json::from_str(&config).context("failed to parse erc721 claim config")?;
            serde_json::to_string_pretty(&builder.erc721_witness(&claim, &nonce)?)?
        }
        ClaimKind::Email => {
            let claim: EmailClaim =
                serde_json::from_str(&config).context("failed to parse email claim config")?;
            serde_json::to_string_pretty(&builder.email_witness(&claim, &nonce)?)?
        }
        ClaimKind::Social => {
            let claim: SocialClaim =
                serde_json::from_str(&config).context("failed to parse social claim config")?;
            serde_json::to_string_pretty(&builder.social_witness(&claim)?)?
        }
    };

    write_witness(&args.output_dir, args.kind, &witness_json)
}

fn gen_sample_inputs(args: GenSampleInputsArgs) -> Result<()> {
    let fixtures = zkcred_test_fixtures::fixtures();
    write_witness(
        &args.output_dir,
        ClaimKind::Balance,
        &serde_json::to_string_pretty(fixtures.balance_witness())?,
    )?;
    write_witness(
        &args.output_dir,
        ClaimKind::Erc721,
        &serde_json::to_string_pretty(fixtures.erc721_witness())?,
    )?;
    write_witness(
        &args.output_dir,
        ClaimKind::Email,
        &serde_json::to_string_pretty(fixtures.email_witness())?,
    )?;
    write_witness(
        &args.output_dir,
        ClaimKind::Social,
        &serde_json::to_string_pretty(fixtures.social_witness())?,
    )
}

fn write_witness(output_dir: &Path, kind: ClaimKind, json: &str) -> Result<()> {
    fs::create_dir_all(output_dir)
        .with_context(|| format!("failed to create {}", output_dir.display()))?;
    let path = output_dir.join(kind.file_name());
    fs::write(&path, json).with_context(|| format!("failed to write {}", path.display()))?;
    info!(path = %path.display(), "wrote witness file");
    println!("Generated {}", path.display());
    Ok(())
}

fn export_calldata(args: ExportCalldataArgs) -> Result<()> {
    let proof_json = fs::read_to_string(&args.proof)
        .with_context(|| format!("failed to read {}", args.proof.display()))?;
    let proof: Groth16Proof =
        serde_json::from_str(&proof_json).context("failed to parse proof json")?;

    let public_json = fs::read_to_string(&args.public)
        .with_context(|| format!("failed to read {}", args.public.display()))?;
    let signals: Vec<String> =
        serde_json::from_str(&public_json).context("failed to parse public signals json")?;

    let calldata = to_calldata(&proof, &signals)?;
    let rendered = serde_json::to_string_pretty(&calldata)?;
    match args.out {
        Some(path) => {
            fs::write(&path, rendered)
                .with_context(|| format!("failed to write {}", path.display()))?;
            println!("Wrote calldata to {}", path.display());
        }
        None => println!("{rendered}"),
    }
    Ok(())
}

fn show_witness(args: ShowWitnessArgs) -> Result<()> {
    let json = fs::read_to_string(&args.path)
        .with_context(|| format!("failed to read {}", args.path.display()))?;
    let hasher = NativeHasher::init();

    match args.kind {
        ClaimKind::Balance => {
            let witness: BalanceWitness =
                serde_json::from_str(&json).context("failed to parse balance witness")?;
            witness.self_check(&hasher)?;
            println!("kind: balance");
            println!("owners merkle root: {}", fr_to_decimal(&witness.balance_message[1]));
            println!("nullifier: {}", fr_to_decimal(&witness.nullifier));
        }
        ClaimKind::Erc721 => {
            let witness: Erc721Witness =
                serde_json::from_str(&json).context("failed to parse erc721 witness")?;
            witness.self_check(&hasher)?;
            println!("kind: erc721");
            println!("message digest: {}", fr_to_decimal(&witness.m));
            println!("nullifier: {}", fr_to_decimal(&witness.nullifier));
        }
        ClaimKind::Email => {
            let witness: EmailWitness =
                serde_json::from_str(&json).context("failed to parse email witness")?;
            witness.self_check(&hasher)?;
            println!("kind: email");
            println!("nullifier: {}", fr_to_decimal(&witness.nullifier));
        }
        ClaimKind::Social => {
            let witness: SocialWitness =
                serde_json::from_str(&json).context("failed to parse social witness")?;
            witness.self_check(&hasher)?;
            println!("kind: social");
            println!(
                "commitment merkle root: {}",
                fr_to_decimal(&witness.seal_hub_merkle_root)
            );
            println!("nullifier: {}", fr_to_decimal(&witness.nullifier));
        }
    }
    println!("self-check: ok");
    Ok(())
}
