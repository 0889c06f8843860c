use std::path::PathBuf;
use std::process;

use clap::Parser;

use tky2jgd::{par, Point};

/// Tokyo Datum to JGD2000 coordinate transformer.
///
/// Prints the converted latitude and longitude to standard output,
/// or the pair `-9999.0 -9999.0` when the point is outside of the
/// mesh coverage.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
    /// Latitude of the point to convert [deg], Tokyo Datum
    latitude: f64,

    /// Longitude of the point to convert [deg], Tokyo Datum
    longitude: f64,

    /// Path to the gridded correction parameter file
    #[arg(long, default_value = "data/TKY2JGD.par")]
    par: PathBuf,
}

fn main() {
    let cli = Cli::parse();

    if !cli.par.exists() {
        eprintln!("Error: parameter file not found \"{}\"", cli.par.display());
        process::exit(1);
    }

    let tf = par::from_path(&cli.par).unwrap_or_else(|e| {
        eprintln!("Error: {e}");
        process::exit(1);
    });

    match tf.forward(&Point::new(cli.latitude, cli.longitude)) {
        Some(result) => println!("{} {}", result.latitude(), result.longitude()),
        None => println!("-9999.0 -9999.0"),
    }
}
