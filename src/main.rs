//! segmentlens: customer segment lookup using pre-fitted K-Means models
//!
//! Loads the artifacts once, refuses to continue without a scaler or models,
//! then predicts and describes the segment of the customer given on the
//! command line.

use anyhow::Result;
use clap::Parser;
use segmentlens::{init_tracing, report, Args, ModelContext, ModelRepository, RepositoryConfig};
use std::time::Instant;

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing()?;

    if args.verbose {
        println!("segmentlens - Credit Card Customer Segmentation");
        println!("===============================================\n");
    }

    let repository = ModelRepository::new(RepositoryConfig::new(&args.artifacts));
    let loaded = repository.load();

    if args.list_models {
        print!("{}", report::render_model_list(loaded.models.keys().map(String::as_str)));
        return Ok(());
    }

    // halt before reading any input without a usable scaler and model set
    let context = ModelContext::from_loaded(&loaded)?;

    let option = args.selected_model()?;
    println!("{}", report::render_model_summary(option));

    let features = args.feature_vector()?;
    if args.verbose {
        println!("Input: {features:?}\n");
    }

    let start_time = Instant::now();
    let prediction = context.predict(option.name, &features)?;

    print!("{}", report::render_prediction(&prediction));
    if args.verbose {
        println!(
            "\nPrediction time: {:.3}ms",
            start_time.elapsed().as_secs_f64() * 1000.0
        );
    }

    Ok(())
}
