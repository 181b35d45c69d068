use anyhow::Result;
use clap::{Parser, Subcommand};
mod auth;
use sealkit::{Encoding, KdfParams, Storage, inspect, open_with_passphrase, seal_with_passphrase};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

const EXTENSION: &str = "skit";

#[derive(Debug, clap::Args)]
struct KdfArgs {
    /// PBKDF2 iteration count (default: 16384)
    #[arg(long, env = "SEALKIT_ITERATIONS")]
    iterations: Option<u32>,

    /// Salt length in bytes (default: 16)
    #[arg(long = "salt-len")]
    salt_len: Option<usize>,
}

impl KdfArgs {
    fn to_kdf_params(&self) -> Result<KdfParams> {
        let default = KdfParams::default();

        Ok(KdfParams::new(
            self.iterations.unwrap_or(default.iterations()),
            self.salt_len.unwrap_or(default.salt_len()),
        )?)
    }
}

#[derive(Debug, Parser)]
#[command(name = "sealkit")]
#[command(
    version,
    about = "Encrypt files with AES-256-CBC + HMAC-SHA384 under a passphrase."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Encrypts a file under a passphrase
    #[command(arg_required_else_help = true)]
    Encrypt {
        input: PathBuf,

        /// Output path (default: <INPUT>.skit)
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,

        /// Base64-armour the ciphertext
        #[arg(short, long, default_value_t = false)]
        armour: bool,

        /// Overwrite the output if it exists
        #[arg(short, long, default_value_t = false)]
        force: bool,

        #[command(flatten)]
        kdf: KdfArgs,
    },

    /// Decrypts a file produced by `encrypt`
    #[command(arg_required_else_help = true)]
    Decrypt {
        input: PathBuf,

        /// Output path (default: <INPUT> without .skit)
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,

        /// Overwrite the output if it exists
        #[arg(short, long, default_value_t = false)]
        force: bool,
    },

    /// Shows the header of an encrypted file
    #[command(arg_required_else_help = true)]
    Inspect { input: PathBuf },
}

fn encrypted_path(input: &Path) -> PathBuf {
    let mut name = input.as_os_str().to_owned();
    name.push(".");
    name.push(EXTENSION);
    PathBuf::from(name)
}

fn decrypted_path(input: &Path) -> PathBuf {
    if input.extension().is_some_and(|ext| ext == EXTENSION) {
        input.with_extension("")
    } else {
        let mut name = input.as_os_str().to_owned();
        name.push(".out");
        PathBuf::from(name)
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("SEALKIT_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    init_tracing();
    let args = Cli::parse();

    match args.command {
        Commands::Encrypt {
            input,
            output,
            armour,
            force,
            kdf,
        } => {
            let kdf = kdf.to_kdf_params()?;
            let plaintext = Storage::new(&input).load()?;
            let output = Storage::new(output.unwrap_or_else(|| encrypted_path(&input)));
            output.ensure_writable(force)?;

            let encoding = if armour {
                Encoding::Armoured
            } else {
                Encoding::Raw
            };

            let passphrase = auth::read_new_passphrase()?;
            let sealed = seal_with_passphrase(passphrase.as_bytes(), &plaintext, kdf, encoding)?;
            drop(passphrase);

            output.save(&sealed)?;
            println!(
                "encrypted {} to {}",
                input.display(),
                output.path().display()
            );
        }
        Commands::Decrypt {
            input,
            output,
            force,
        } => {
            let sealed = Storage::new(&input).load()?;
            let output = Storage::new(output.unwrap_or_else(|| decrypted_path(&input)));
            output.ensure_writable(force)?;

            let passphrase = auth::read_passphrase()?;
            let plaintext = open_with_passphrase(passphrase.as_bytes(), &sealed)?;
            drop(passphrase);

            output.save(&plaintext)?;
            println!(
                "decrypted {} to {}",
                input.display(),
                output.path().display()
            );
        }
        Commands::Inspect { input } => {
            let data = Storage::new(&input).load()?;
            println!("{}", inspect(&data)?);
        }
    }

    Ok(())
}
