//! Command-line surface.

use clap::{Parser, ValueEnum};

/// Trivium stream cipher file tool.
///
/// Ciphertext is framed as 10 IV bytes followed by the XOR of the plaintext
/// with the keystream; decryption reads the IV back from the same place. A
/// key file holds exactly 10 bytes of raw key material.
#[derive(Parser, Debug)]
#[command(name = "trivium", version, about)]
pub struct Cli {
    /// Processing mode: e=encrypt, d=decrypt, g=generate key
    #[arg(short = 'm', long = "mode", value_enum)]
    pub mode: Mode,

    /// Key file; "-" reads from stdin (mode g writes the new key to stdout)
    #[arg(short = 'k', long = "key-file", default_value = "-")]
    pub key_file: String,

    /// Input file; "-" reads from stdin
    #[arg(short = 'i', long = "input", default_value = "-")]
    pub input: String,

    /// Output file; "-" writes to stdout
    #[arg(short = 'o', long = "output", default_value = "-")]
    pub output: String,
}

/// What a single invocation does. Exactly one mode per run.
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum Mode {
    /// Encrypt, prepending a freshly generated random IV to the output
    #[value(name = "e")]
    Encrypt,

    /// Decrypt, taking the IV from the first 10 bytes of the input
    #[value(name = "d")]
    Decrypt,

    /// Generate a new random key and write it to the key file
    #[value(name = "g")]
    Genkey,
}
