//! ztidentity CLI — `ztid` command.
//!
//! Mines new overlay identities, and inspects or validates existing ones
//! given either as an encoded string or as an identity file/directory.

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;

use ztidentity::identity::{accept_digest, FORMAT_MARKER};
use ztidentity::storage::{ensure_vacant, load_identity, read_identity_file, save_identity};
use ztidentity::{memory_hard_hash, mine_identities, Identity};

// ── CLI structure ─────────────────────────────────────────────────────────────

/// ztid — mine, inspect and validate overlay network identities.
#[derive(Parser, Debug)]
#[command(
    name = "ztid",
    about = "ztidentity CLI",
    version,
    long_about = "ztid — ztidentity CLI\n\nMine overlay network identities whose 40-bit address is bound to\ntheir keys by a memory-hard proof of work, and inspect or validate\nexisting identities."
)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Mine new identities
    Generate {
        /// Save to this directory instead of printing secrets
        /// (one sub-directory per identity when --count > 1)
        #[arg(long)]
        out: Option<PathBuf>,

        /// Number of identities to mine
        #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
        count: u32,

        /// Worker threads (default: available parallelism)
        #[arg(long)]
        jobs: Option<usize>,

        /// Print one JSON object per identity (not with --out)
        #[arg(long, conflicts_with = "out")]
        json: bool,
    },

    /// Show the fields of an identity string, file or directory
    Inspect {
        /// Identity string, identity file, or identity directory
        identity: String,
    },

    /// Recompute the proof of work of an identity and check its keys
    Validate {
        /// Identity string, identity file, or identity directory
        identity: String,
    },

    /// Print the memory-hard digest of 64 bytes given as hex
    Hash {
        /// 128 hex characters
        input: String,
    },
}

/// JSON shape printed by `ztid generate --json`.
#[derive(Serialize)]
struct IdentityRecord {
    id: String,
    public_key: String,
    private_key: String,
}

impl From<&Identity> for IdentityRecord {
    fn from(identity: &Identity) -> Self {
        Self {
            id: identity.id_string(),
            public_key: identity.public_key_string(),
            private_key: identity.private_key_string(),
        }
    }
}

// ── Main entry point ──────────────────────────────────────────────────────────

fn main() {
    env_logger::init();

    let cli = Cli::parse();
    let verbose = cli.verbose;

    let result = match cli.command {
        Commands::Generate {
            out,
            count,
            jobs,
            json,
        } => cmd_generate(out.as_deref(), count as usize, jobs, json, verbose),
        Commands::Inspect { identity } => cmd_inspect(&identity, verbose),
        Commands::Validate { identity } => cmd_validate(&identity, verbose),
        Commands::Hash { input } => cmd_hash(&input, verbose),
    };

    if let Err(e) = result {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}

// ── Helpers ───────────────────────────────────────────────────────────────────

/// Resolve an argument that is either a path or an encoded identity.
fn resolve_identity(arg: &str) -> Result<Identity> {
    let path = Path::new(arg);
    if path.is_dir() {
        return load_identity(path)
            .with_context(|| format!("failed to load identity from {}", path.display()));
    }
    if path.is_file() {
        return read_identity_file(path)
            .with_context(|| format!("failed to read identity file {}", path.display()));
    }
    arg.parse::<Identity>()
        .context("argument is neither an identity path nor an identity string")
}

fn default_jobs() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}

// ── Command implementations ───────────────────────────────────────────────────

/// `ztid generate [--out DIR] [--count N] [--jobs N] [--json]`
fn cmd_generate(
    out: Option<&Path>,
    count: usize,
    jobs: Option<usize>,
    json: bool,
    verbose: bool,
) -> Result<()> {
    let jobs = jobs.unwrap_or_else(default_jobs);
    if let (Some(dir), 1) = (out, count) {
        ensure_vacant(dir)
            .with_context(|| format!("refusing to save into {}", dir.display()))?;
    }
    let started = Instant::now();
    let identities = mine_identities(count, jobs).context("failed to mine identities")?;
    log::info!(
        "mined {} identities in {:.2?}",
        identities.len(),
        started.elapsed()
    );

    match out {
        Some(dir) => {
            let targets: Vec<PathBuf> = identities
                .iter()
                .map(|identity| {
                    if count == 1 {
                        dir.to_path_buf()
                    } else {
                        dir.join(identity.id_string())
                    }
                })
                .collect();
            // Refuse the whole batch before writing any of it.
            for target in &targets {
                ensure_vacant(target)
                    .with_context(|| format!("refusing to save into {}", target.display()))?;
            }

            for (identity, target) in identities.iter().zip(&targets) {
                save_identity(identity, target)
                    .with_context(|| format!("failed to save identity to {}", target.display()))?;
                println!("Created identity {}", identity.id_string());
                println!("  Dir:  {}", target.display());
                if verbose {
                    println!("  Public: {}", identity.public_key_string());
                }
            }
        }
        None => {
            for identity in &identities {
                if json {
                    let line = serde_json::to_string(&IdentityRecord::from(identity))
                        .context("failed to encode identity as JSON")?;
                    println!("{line}");
                } else {
                    println!("{}", identity.private_key_string());
                }
            }
        }
    }

    if verbose {
        eprintln!(
            "Mined {} identit{} in {:.2?} using {} thread(s)",
            identities.len(),
            if identities.len() == 1 { "y" } else { "ies" },
            started.elapsed(),
            jobs.clamp(1, count)
        );
    }

    Ok(())
}

/// `ztid inspect IDENTITY`
fn cmd_inspect(arg: &str, verbose: bool) -> Result<()> {
    let identity = resolve_identity(arg)?;

    println!("Identity: {}", identity.id_string());
    println!("  Address:       {}", identity.address());
    println!("  Marker:        {FORMAT_MARKER}");
    println!(
        "  Agreement key: {}",
        hex::encode(identity.agreement_public_key())
    );
    println!(
        "  Signing key:   {}",
        hex::encode(identity.signing_public_key())
    );
    println!(
        "  Private key:   {}",
        if identity.has_private_key() {
            "present"
        } else {
            "absent"
        }
    );

    if verbose {
        println!("  Public:        {}", identity.public_key_string());
    }

    Ok(())
}

/// `ztid validate IDENTITY`
fn cmd_validate(arg: &str, verbose: bool) -> Result<()> {
    let identity = resolve_identity(arg)?;
    let started = Instant::now();
    identity
        .validate()
        .map_err(|e| anyhow!("identity {} is invalid: {e}", identity.id_string()))?;

    println!("Identity {}: valid", identity.id_string());
    if verbose {
        println!(
            "  Checked:  proof of work{}",
            if identity.has_private_key() {
                ", key pairs"
            } else {
                ""
            }
        );
        println!("  Elapsed:  {:.2?}", started.elapsed());
    }

    Ok(())
}

/// `ztid hash HEX`
fn cmd_hash(input: &str, verbose: bool) -> Result<()> {
    let mut bytes = [0u8; 64];
    hex::decode_to_slice(input.trim(), &mut bytes)
        .context("input must be exactly 128 hex characters")?;

    let digest = memory_hard_hash(&bytes).context("failed to compute digest")?;
    println!("{}", digest.to_hex());

    if verbose {
        match accept_digest(&digest) {
            Some(address) => println!("  Accepted: yes (address {address})"),
            None => println!("  Accepted: no"),
        }
    }

    Ok(())
}
