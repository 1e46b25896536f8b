use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use speedup::{chart, compute_speedups, Measurement, Model};

#[derive(Debug, Parser)]
#[command(about = "build parallel speedup charts and Amdahl's Law models from timing measurements")]
struct Opts {
    /// Path to input CSV of worker counts and elapsed seconds.
    input: PathBuf,

    /// Destination for the rendered chart.
    #[arg(short, long, default_value = "results_graph.png")]
    output: PathBuf,

    /// Predict the speedup at the given worker counts.
    predictions: Vec<u32>,
}

fn main() -> Result<()> {
    let opts = Opts::parse();

    let mut measurements = Vec::new();
    let mut input = csv::Reader::from_path(&opts.input)?;
    for record in input.records() {
        let record = record?;
        let m = Measurement::workers_and_elapsed_secs(record[0].parse()?, record[1].parse()?);
        measurements.push(m);
    }

    let points = compute_speedups(&measurements)?;

    if points.len() > 1 {
        let model = Model::build(&points);
        println!(
            "Amdahl's Law parameters: p={:.6}, serial fraction={:.6}",
            model.parallel,
            model.serial_fraction()
        );
        if model.embarrassingly_parallel() {
            println!("\tlinearly scalable");
        } else {
            println!("\tmax speedup: {:.6}", model.max_speedup());
        }
        for n in &opts.predictions {
            println!("{},{}", n, model.speedup_at_workers(f64::from(*n)));
        }
    }

    chart::render(&measurements, &points, &opts.output)?;
    println!("Speedup chart saved to {}", opts.output.display());

    Ok(())
}
