//! lrukv CLI Client
//!
//! Command-line interface for the cache server. `get` and `set` accept
//! several keys/pairs and issue one request per key or pair, each over
//! its own connection.

use clap::{Parser, Subcommand};
use lrukv::Client;

/// lrukv CLI
#[derive(Parser, Debug)]
#[command(name = "lrukv-cli")]
#[command(about = "CLI for the lrukv cache server")]
struct Args {
    /// Server address
    #[arg(short, long, default_value = "127.0.0.1:5555")]
    server: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Get one or more keys
    Get {
        /// Keys to look up
        #[arg(required = true)]
        keys: Vec<String>,
    },

    /// Set one or more key-value pairs
    Set {
        /// Alternating keys and values: k1 v1 [k2 v2 ...]
        #[arg(required = true)]
        pairs: Vec<String>,
    },

    /// Show cache occupancy
    Stats,

    /// Ask the server to shut down
    Exit,
}

fn main() {
    let args = Args::parse();
    let client = Client::new(&args.server);

    let outcome = match args.command {
        Commands::Get { keys } => run_all(keys.iter().map(|key| client.get(key))),
        Commands::Set { pairs } => {
            if pairs.len() % 2 != 0 {
                eprintln!("set expects key-value pairs; no value given for {:?}", pairs.last().unwrap());
                std::process::exit(2);
            }
            run_all(pairs.chunks(2).map(|pair| client.set(&pair[0], &pair[1])))
        }
        Commands::Stats => run_all(std::iter::once(client.stats())),
        Commands::Exit => run_all(std::iter::once(client.shutdown())),
    };

    if let Err(e) = outcome {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

/// Print each reply as it arrives; stop at the first transport failure
fn run_all(results: impl Iterator<Item = lrukv::Result<String>>) -> lrukv::Result<()> {
    for result in results {
        println!("{}", result?);
    }
    Ok(())
}
