//! DHAT heap profiler for iprank.
//!
//! Run with: cargo run --bin dhat_profile --release --features dhat-heap
//! View results: Open dhat-heap.json in <https://nnethercote.github.io/dh_view/dh_view.html>

#[global_allocator]
static ALLOC: dhat::Alloc = dhat::Alloc;

use iprank::addr::Ipv4Key;
use iprank::builder::RankingBuilder;
use iprank::traits::HitRanking;

/// Simple XorShift64 RNG for deterministic workloads.
struct XorShift64 {
    state: u64,
}

impl XorShift64 {
    fn new(seed: u64) -> Self {
        Self { state: seed.max(1) }
    }

    fn next_u64(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.state = x;
        x
    }

    fn next_f64(&mut self) -> f64 {
        const SCALE: f64 = 1.0 / (u64::MAX as f64);
        (self.next_u64() as f64) * SCALE
    }
}

/// 90% of observations land on 10% of the address universe.
fn hotset_workload<R: HitRanking<Ipv4Key>>(
    ranking: &mut R,
    operations: usize,
    universe: u32,
    seed: u64,
) {
    let mut rng = XorShift64::new(seed);
    let hot_size = universe / 10;

    for _ in 0..operations {
        let raw = if rng.next_f64() < 0.9 {
            (rng.next_u64() % u64::from(hot_size)) as u32
        } else {
            hot_size + (rng.next_u64() % u64::from(universe - hot_size)) as u32
        };
        ranking.observe(Ipv4Key::new(raw));
    }
}

/// Every address in the universe once per pass, so counts stay tied.
fn scan_workload<R: HitRanking<Ipv4Key>>(ranking: &mut R, operations: usize, universe: u32) {
    for i in 0..operations {
        ranking.observe(Ipv4Key::new(i as u32 % universe));
    }
}

/// A stream of never-repeating addresses followed by a rising newcomer that
/// has to fight its way into a full ranking.
fn churn_workload<R: HitRanking<Ipv4Key>>(ranking: &mut R, operations: usize) {
    let base = 0x0A00_0000u32;
    for i in 0..operations {
        ranking.observe(Ipv4Key::new(base + i as u32));
        if i % 8 == 0 {
            ranking.observe(Ipv4Key::new(base - 1 - (i as u32 % 64)));
        }
    }
}

fn profile(name: &str, capacity: usize, expected: usize) {
    println!("=== Profiling top-{} ({}) ===", capacity, name);
    let operations = 200_000;
    let universe = 65_536;

    let mut top = RankingBuilder::new(capacity)
        .expected_addresses(expected)
        .build::<Ipv4Key>();

    hotset_workload(&mut top, operations, universe, 42);
    scan_workload(&mut top, operations / 2, universe);
    churn_workload(&mut top, operations / 4);

    println!("  Distinct addresses: {}", top.distinct());
    println!("  Ranked: {}", top.tracked_len());
    println!("  Approx bytes: {}", top.approx_bytes());

    top.clear();
    println!("  Approx bytes after clear: {}", top.approx_bytes());
}

fn main() {
    let _profiler = dhat::Profiler::new_heap();

    println!("iprank DHAT Heap Profiling");
    println!("==========================\n");

    profile("growing store", 100, 0);
    profile("pre-sized store", 100, 120_000);
    profile("wide ranking", 10_000, 0);

    println!("\n==========================");
    println!("Profiling complete!");
    println!(
        "View results: Open dhat-heap.json in <https://nnethercote.github.io/dh_view/dh_view.html>"
    );
}
