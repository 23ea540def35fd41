//! # ntcore CLI — Command-Line Demo
//!
//! A thin `clap`-derived front end over the library: each subcommand
//! exercises one corner of the engine (sieve generation, heuristic
//! factorization, Dirichlet-table queries) so the crate's output can be
//! spot-checked from a shell without writing a Rust program against it.

use anyhow::Result;
use clap::{Parser, Subcommand};

use ntcore::dirichlet::DiriTable;
use ntcore::factor::{ChaChaRandomSource, FactorConfig};
use ntcore::{factor, sieve};

#[derive(Parser)]
#[command(name = "ntcore", about = "Number-theory computation core")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List primes up to `max`, or just their count with `--count-only`.
    Primes {
        #[arg(long)]
        max: u64,
        #[arg(long)]
        count_only: bool,
    },
    /// Heuristically factor `n` (trial division, Pollard-rho, Lenstra ECF).
    Factor {
        #[arg(long)]
        n: u64,
        /// Seed the random source for reproducible Pollard/Lenstra runs.
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Print the prime-counting function `π(x)`.
    Pi {
        #[arg(long)]
        x: i64,
    },
    /// Print the Mertens function `M(x) = Σ_{n≤x} μ(n)`.
    Mertens {
        #[arg(long)]
        x: i64,
    },
    /// Print the divisor-count sum `D_k(x) = Σ_{n≤x} d_k(n)` for `u^{⋆k}`.
    Dk {
        #[arg(long)]
        x: i64,
        #[arg(long)]
        k: u32,
    },
}

fn main() -> Result<()> {
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_default();
    if log_format == "json" {
        tracing_subscriber::fmt().json().with_target(false).init();
    } else {
        tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .with_target(false)
            .init();
    }

    let cli = Cli::parse();

    match cli.command {
        Commands::Primes { max, count_only } => {
            let primes = sieve::generate_primes(max);
            if count_only {
                println!("{}", primes.len());
            } else {
                for p in primes {
                    println!("{p}");
                }
            }
        }
        Commands::Factor { n, seed } => {
            let conf = FactorConfig::default();
            let primes = sieve::generate_primes(((n as f64).sqrt() as u64).max(2) + 1);
            let mut rng = match seed {
                Some(s) => ChaChaRandomSource::from_seed(s),
                None => ChaChaRandomSource::from_os_entropy(),
            };
            let (factors, cofactor) = factor::factor_heuristic(n, &primes, &conf, &mut rng)?;
            if cofactor != 1 {
                eprintln!("warning: {n} could not be fully factored, cofactor {cofactor} remains");
            }
            let rendered: Vec<String> = factors
                .entries()
                .iter()
                .map(|(p, e)| format!("{p}^{e}"))
                .collect();
            println!("{}", rendered.join(" * "));
        }
        Commands::Pi { x } => {
            let mut table = DiriTable::init(x, 0);
            table.compute_pi();
            println!("{}", table.sparse(1));
        }
        Commands::Mertens { x } => {
            let mut table = DiriTable::init(x, 0);
            let mu = sieve::MobiusSieve::build(table.y() as u64);
            let buf: Vec<i8> = (0..=table.y()).map(|n| mu.get(n as u64)).collect();
            table.compute_mertens(&buf);
            println!("{}", table.sparse(1));
        }
        Commands::Dk { x, k } => {
            let table = ntcore::dirichlet::conv::dk(x, 0, k, 0);
            println!("{}", table.sparse(1));
        }
    }
    Ok(())
}
