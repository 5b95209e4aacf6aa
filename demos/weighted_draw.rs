//! Draw from a small weighted table and compare empirical frequencies to the weights.
//!
//! Run with `RUST_LOG=debug` to see construction logging.

use fukubiki::WeightedSampler;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let values = ["common", "uncommon", "rare", "never"];
    let weights = [60.0, 30.0, 10.0, 0.0];
    let draws = 100_000usize;

    let mut sampler = WeightedSampler::with_seed(values, weights, 7)?;
    let total = sampler.table().total_weight();

    let mut counts = [0usize; 4];
    for _ in 0..draws {
        counts[sampler.draw_index()] += 1;
    }

    println!("{draws} draws, total weight {total}");
    for ((v, w), c) in values.iter().zip(weights).zip(counts) {
        println!(
            "  {v:>9}  expected={:.4}  observed={:.4}",
            w / total,
            c as f64 / draws as f64
        );
    }

    // Construction errors are ordinary values.
    if let Err(e) = WeightedSampler::new(["a", "a"], [1.0, 1.0]) {
        println!("rejected: {e}");
    }

    Ok(())
}
