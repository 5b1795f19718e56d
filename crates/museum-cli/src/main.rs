//! Museum CLI
//!
//! Runs the persistence demonstrations against a persistence unit

use clap::Parser;
use museum_core::logging_facility::{init, Profile};
use museum_cli::{run, RunOptions};
use museum_store::config::DEFAULT_UNIT;
use museum_store::EntityManagerFactory;

#[derive(Debug, Parser)]
#[command(name = "museum")]
#[command(about = "Museum - ORM persistence demonstrations", long_about = None)]
struct Cli {
    /// Persistence unit to open
    #[arg(long, default_value = DEFAULT_UNIT)]
    unit: String,

    /// Insert the sample dataset when the database has no museums
    #[arg(long)]
    seed: bool,

    /// Also run the association navigation examples
    #[arg(long)]
    associations: bool,

    /// Also run the entity equality examples
    #[arg(long)]
    equality: bool,
}

fn main() {
    dotenvy::dotenv().ok();
    init(Profile::from_env());

    let cli = Cli::parse();
    let options = RunOptions {
        seed: cli.seed,
        associations: cli.associations,
        equality: cli.equality,
    };

    let result = EntityManagerFactory::from_unit_name(&cli.unit).and_then(|emf| {
        let stdin = std::io::stdin();
        let stdout = std::io::stdout();
        run(&emf, &options, &mut stdin.lock(), &mut stdout.lock())?;
        emf.close()
    });

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
