//! memkit micro-benchmarks
//!
//! Wall-clock timing loops for the hot allocator paths. For statistically
//! rigorous numbers use `cargo bench -p memkit-core` instead; this binary
//! exists for quick before/after comparisons during development.

use memkit::{Arena, InlineChunk, InlineNetBuf, NetBuf, NetBufWriter, SlotPool, TrackedSlotPool};
use std::time::{Duration, Instant};

fn main() {
    println!("=== memkit Benchmark ===\n");

    let rounds: usize = std::env::args()
        .nth(1)
        .and_then(|s| s.parse().ok())
        .unwrap_or(1_000_000);

    println!("Rounds: {}\n", rounds);

    bench_pool(rounds);
    bench_tracked(rounds);
    bench_arena(rounds);
    bench_netbuf(rounds);

    println!("\n=== Benchmark Complete ===");
}

fn report(name: &str, ops: usize, elapsed: Duration) {
    let per_op = elapsed.as_nanos() as f64 / ops as f64;
    let rate = ops as f64 / elapsed.as_secs_f64();
    println!("{:<32} {:>8.1} ns/op {:>14.0} ops/sec", name, per_op, rate);
}

fn bench_pool(rounds: usize) {
    let mut pool: SlotPool<u64, 1024> = SlotPool::new();

    let start = Instant::now();
    for i in 0..rounds {
        if let Ok(h) = pool.allocate(i as u64) {
            let _ = pool.deallocate(h);
        }
    }
    report("pool allocate+deallocate", rounds, start.elapsed());
}

fn bench_tracked(rounds: usize) {
    let mut pool: TrackedSlotPool<u64, 1024> = TrackedSlotPool::new();

    let start = Instant::now();
    for i in 0..rounds {
        if let Ok(h) = pool.allocate(i as u64) {
            let _ = pool.deallocate(h);
        }
    }
    report("tracked allocate+deallocate", rounds, start.elapsed());

    // Iteration cost over a half-full pool.
    for i in 0..512 {
        let _ = pool.allocate(i);
    }
    let passes = rounds / 512 + 1;
    let start = Instant::now();
    let mut sum = 0u64;
    for _ in 0..passes {
        for (_, v) in pool.iter_live() {
            sum = sum.wrapping_add(*v);
        }
    }
    let elapsed = start.elapsed();
    std::hint::black_box(sum);
    report("tracked iter_live (512 live)", passes * 512, elapsed);
}

fn bench_arena(rounds: usize) {
    let mut arena = Arena::new(InlineChunk::<4096>::new());

    let start = Instant::now();
    for _ in 0..rounds {
        if let Ok(r) = arena.alloc(64) {
            let _ = arena.free(r);
        }
    }
    report("arena alloc+free (checked)", rounds, start.elapsed());

    let mut arena = Arena::unchecked(InlineChunk::<4096>::new());
    let start = Instant::now();
    for _ in 0..rounds {
        if let Ok(r) = arena.alloc(64) {
            let _ = arena.free(r);
        }
    }
    report("arena alloc+free (unchecked)", rounds, start.elapsed());
}

fn bench_netbuf(rounds: usize) {
    let mut writer = NetBufWriter::new(InlineNetBuf::<4096>::new());
    let payload = [0x42u8; 64];

    let start = Instant::now();
    let mut bytes = 0u64;
    for _ in 0..rounds {
        let outcome = writer.write(&payload);
        bytes += outcome.copied() as u64;
        if !outcome.is_complete() {
            writer.netbuf_mut().first();
        }
    }
    let elapsed = start.elapsed();
    report("netbuf clamped write (64B)", rounds, elapsed);
    println!(
        "{:<32} {:>8.1} MB/sec",
        "netbuf write throughput",
        bytes as f64 / elapsed.as_secs_f64() / 1e6
    );
}
