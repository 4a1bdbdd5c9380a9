use std::path::{Path, PathBuf};

use ark_bn254::{Bn254, Fr};
use clap::{Args, Parser, Subcommand};
use common::constants::{
    PROOF_FILE, PROOF_JSON_FILE, PROVING_KEY_FILE, PUBLIC_INPUT_JSON_FILE,
    SOLIDITY_VERIFIER_FILE, VERIFYING_KEY_FILE,
};
use common::serializable::write_atomic;
use eyre::{bail, Result, WrapErr};
use rankone_core::{
    circuits,
    export::{self, ProofJson},
    groth16::{self, Proof, ToxicWaste, VerifyingKey},
    r1cs::{self, Assignment, CompileConfig},
    utils::errors::ArtifactError,
};
use tracing_subscriber::{self, fmt::format::FmtSpan, prelude::*, EnvFilter};

/// Compile the `A + B = Sum` circuit, prove it with Groth16 and check the result.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log a timing line when each span closes
    #[clap(long, global = true)]
    timings: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Setup, export the Solidity verifier and keys, prove, write the JSON calldata and verify
    Demo(DemoArgs),
    /// Check a proof.json / input.json pair against a verifying key file
    Verify(VerifyArgs),
}

#[derive(Args, Debug)]
struct DemoArgs {
    /// Directory the artifacts are written to
    #[clap(short, long, default_value = ".")]
    out_dir: PathBuf,

    /// Seed for a reproducible toy setup. Fresh OS randomness when omitted
    #[clap(long)]
    seed: Option<u64>,

    #[clap(long, default_value_t = 1)]
    a: u64,

    #[clap(long, default_value_t = 2)]
    b: u64,

    #[clap(long, default_value_t = 3)]
    sum: u64,
}

#[derive(Args, Debug)]
struct VerifyArgs {
    /// Directory holding the artifacts written by `demo`
    #[clap(short, long, default_value = ".")]
    dir: PathBuf,

    #[clap(long)]
    vk: Option<PathBuf>,

    #[clap(long)]
    proof: Option<PathBuf>,

    #[clap(long)]
    input: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.timings);
    match cli.command {
        Commands::Demo(args) => demo(args),
        Commands::Verify(args) => verify(args),
    }
}

fn init_tracing(timings: bool) {
    let log_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let span_events = if timings {
        FmtSpan::CLOSE
    } else {
        FmtSpan::NONE
    };
    let log_layer = tracing_subscriber::fmt::layer()
        .with_span_events(span_events)
        .compact()
        .with_target(false)
        .with_file(false)
        .with_line_number(false)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_filter(log_filter);
    tracing_subscriber::registry().with(log_layer).init();
}

fn seed_bytes(seed: u64) -> [u8; 32] {
    let mut bytes = [0u8; 32];
    bytes[..8].copy_from_slice(&seed.to_be_bytes());
    bytes
}

fn demo(args: DemoArgs) -> Result<()> {
    let dir = args.out_dir.as_path();
    let circuit = circuits::sum::<Fr>();
    let r1cs = r1cs::compile(&circuit, &CompileConfig::reject_unconstrained())?;
    tracing::info!(
        constraints = r1cs.num_constraints(),
        public = r1cs.num_public(),
        private = r1cs.num_private(),
        "compiled circuit"
    );

    let toxic_waste = match args.seed {
        Some(seed) => {
            tracing::warn!("seeded setup: anyone who knows the seed can forge proofs");
            ToxicWaste::from_seed(seed_bytes(seed))
        }
        None => ToxicWaste::sample(&mut rand::thread_rng()),
    };
    let (pk, vk) = groth16::setup::<Bn254>(&r1cs, toxic_waste)?;

    write_atomic(
        &dir.join(SOLIDITY_VERIFIER_FILE),
        export::export_solidity(&vk).as_bytes(),
    )
    .wrap_err("writing the Solidity verifier")?;
    export::save(&vk, &dir.join(VERIFYING_KEY_FILE))?;
    export::save(&pk, &dir.join(PROVING_KEY_FILE))?;

    let assignment = Assignment::new()
        .set("A", args.a)
        .set("B", args.b)
        .set("Sum", args.sum);
    let witness = r1cs::generate_witness_from_assignment(&r1cs, &assignment)
        .wrap_err("the assignment does not satisfy A + B = Sum")?;
    let proof = groth16::prove(&pk, &witness, &mut rand::thread_rng())?;
    let public_input = witness.public_input();

    export::save(&proof, &dir.join(PROOF_FILE))?;
    export::save_json(&ProofJson::from(&proof), &dir.join(PROOF_JSON_FILE))?;
    export::save_json(
        &export::public_input_to_json(public_input.as_slice()),
        &dir.join(PUBLIC_INPUT_JSON_FILE),
    )?;
    tracing::info!(dir = %dir.display(), "artifacts written");

    if !groth16::verify(&vk, public_input.as_slice(), &proof)? {
        bail!("freshly generated proof failed to verify");
    }
    tracing::info!("proof verified");
    Ok(())
}

fn verify(args: VerifyArgs) -> Result<()> {
    let path_or = |explicit: Option<PathBuf>, name: &str| -> PathBuf {
        explicit.unwrap_or_else(|| args.dir.join(name))
    };
    let vk_path = path_or(args.vk.clone(), VERIFYING_KEY_FILE);
    let proof_path = path_or(args.proof.clone(), PROOF_JSON_FILE);
    let input_path = path_or(args.input.clone(), PUBLIC_INPUT_JSON_FILE);

    let vk: VerifyingKey<Bn254> = load_with_context(&vk_path, export::load)?;
    let proof_json: ProofJson = load_with_context(&proof_path, export::load_json)?;
    let input: Vec<String> = load_with_context(&input_path, export::load_json)?;

    let proof = Proof::<Bn254>::try_from(&proof_json)?;
    let public_input = export::public_input_from_json(&input)?;

    if groth16::verify(&vk, &public_input, &proof)? {
        tracing::info!("proof verified");
        Ok(())
    } else {
        bail!("proof is invalid for the given public input")
    }
}

fn load_with_context<T>(
    path: &Path,
    load: impl FnOnce(&Path) -> Result<T, ArtifactError>,
) -> Result<T> {
    load(path).wrap_err_with(|| format!("loading {}", path.display()))
}
