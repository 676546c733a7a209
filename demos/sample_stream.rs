//! Replays the demonstration stream and prints the ranking before and after
//! a clear.
//!
//! Run with: cargo run --example sample_stream

use iprank::tracker::{SAMPLE_STREAM, TopAddresses};

fn print_ranking(top: &TopAddresses) {
    let rendered: Vec<String> = top
        .ranked()
        .iter()
        .map(|entry| format!("{} ({})", entry.key, entry.count))
        .collect();
    println!("[{}]", rendered.join(", "));
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut top = TopAddresses::default();
    for addr in SAMPLE_STREAM {
        top.observe_str(addr)?;
    }

    println!(
        "{} observations, {} distinct addresses",
        top.total_observations(),
        top.distinct()
    );
    print_ranking(&top);

    top.clear();
    print_ranking(&top);
    Ok(())
}
