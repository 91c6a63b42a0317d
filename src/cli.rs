use clap::{Args, Parser, Subcommand};
use devkit_uuid::{UuidFormat, UuidVersion};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "devkit")]
#[command(about = "Developer utilities: UUID generation, validation and SHA-1 digests")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate time-based or random UUIDs (v1, v4, v7)
    Generate(GenerateArgs),
    /// Generate a name-based (v5) UUID
    V5(V5Args),
    /// Check whether strings are canonical UUIDs
    Validate {
        /// Strings to check
        #[arg(required = true)]
        candidates: Vec<String>,
    },
    /// Show the version, variant and embedded timestamp of a UUID
    Inspect {
        /// UUID to decode
        uuid: String,
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Print the SHA-1 digest of text or a file
    Sha1(Sha1Args),
}

#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// UUID version: v1, v4 or v7 (defaults to DEVKIT_DEFAULT_VERSION, then v4)
    #[arg(value_name = "VERSION")]
    pub uuid_version: Option<UuidVersion>,
    /// Number of UUIDs to generate
    #[arg(short = 'n', long, default_value_t = 1)]
    pub count: usize,
    #[command(flatten)]
    pub output: OutputArgs,
}

#[derive(Args, Debug)]
pub struct V5Args {
    /// Namespace UUID, or one of dns, url, oid, x500
    pub namespace: String,
    /// Name to hash within the namespace
    pub name: String,
    #[command(flatten)]
    pub output: OutputArgs,
}

#[derive(Args, Debug)]
pub struct OutputArgs {
    /// Output format: hyphenated, simple, braced or urn
    #[arg(long, default_value_t = UuidFormat::Hyphenated)]
    pub format: UuidFormat,
    /// Upper-case hex digits
    #[arg(short = 'U', long)]
    pub uppercase: bool,
    /// Print JSON instead of one UUID per line
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct Sha1Args {
    /// Text to hash (its UTF-8 bytes)
    #[arg(required_unless_present = "file", conflicts_with = "file")]
    pub text: Option<String>,
    /// Hash the contents of this file instead
    #[arg(long)]
    pub file: Option<PathBuf>,
}
