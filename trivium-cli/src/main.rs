//! Command-line driver for the Trivium stream cipher: encrypt, decrypt or
//! generate a key, streaming between files or standard streams.

use std::process;

use clap::Parser;

mod args;
mod stream;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp(None)
        .init();

    let cli = args::Cli::parse();
    if let Err(err) = stream::run(&cli) {
        eprintln!("trivium: {:#}", err);
        process::exit(1);
    }
}
