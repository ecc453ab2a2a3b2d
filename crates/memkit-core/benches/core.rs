//! Benchmarks for the pool, arena, and netbuf hot paths

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use memkit_core::chain::{ChainedNetBuf, SliceChain};
use memkit_core::netbuf::{HeapNetBuf, NetBuf, NetBufReader, NetBufWriter};
use memkit_core::{Arena, HeapChunk, SlotPool, TrackedSlotPool};

fn benchmark_pool(c: &mut Criterion) {
    let mut group = c.benchmark_group("pool");

    let mut pool: SlotPool<u64, 1024> = SlotPool::new();
    group.bench_function("allocate_deallocate", |b| {
        b.iter(|| {
            let h = pool.allocate(black_box(7)).unwrap();
            black_box(pool.deallocate(h).unwrap());
        });
    });

    let mut tracked: TrackedSlotPool<u64, 1024> = TrackedSlotPool::new();
    group.bench_function("tracked_allocate_deallocate", |b| {
        b.iter(|| {
            let h = tracked.allocate(black_box(7)).unwrap();
            black_box(tracked.deallocate(h).unwrap());
        });
    });

    // Live iteration over a half-full pool
    let mut populated: TrackedSlotPool<u64, 1024> = TrackedSlotPool::new();
    for i in 0..512 {
        let _ = populated.allocate(i);
    }
    group.bench_function("tracked_iter_live_512", |b| {
        b.iter(|| {
            let sum: u64 = populated.iter_live().map(|(_, v)| *v).sum();
            black_box(sum)
        });
    });

    group.finish();
}

fn benchmark_arena(c: &mut Criterion) {
    let mut group = c.benchmark_group("arena");

    let mut checked = Arena::new(HeapChunk::new(64 * 1024));
    group.bench_function("alloc_free_64", |b| {
        b.iter(|| {
            let r = checked.alloc(black_box(64)).unwrap();
            black_box(checked.free(r).unwrap());
        });
    });

    let mut unchecked = Arena::unchecked(HeapChunk::new(64 * 1024));
    group.bench_function("alloc_free_64_unchecked", |b| {
        b.iter(|| {
            let r = unchecked.alloc(black_box(64)).unwrap();
            black_box(unchecked.free(r).unwrap());
        });
    });

    let mut typed = Arena::new(HeapChunk::new(64 * 1024));
    group.bench_function("place_destroy_u64", |b| {
        b.iter(|| {
            let v = typed.place(black_box(42u64)).unwrap();
            typed.destroy(v).map_err(|(e, _)| e).unwrap();
        });
    });

    group.finish();
}

fn benchmark_netbuf(c: &mut Criterion) {
    let mut group = c.benchmark_group("netbuf");

    let mut writer = NetBufWriter::new(HeapNetBuf::new(4096));
    let payload = [0xA5u8; 64];
    group.throughput(Throughput::Bytes(4096));
    group.bench_function("writer_fill_4k", |b| {
        b.iter(|| {
            writer.netbuf_mut().first();
            while writer.size() >= payload.len() {
                writer.write(black_box(&payload));
            }
        });
    });

    group.finish();
}

fn benchmark_chain(c: &mut Criterion) {
    let mut group = c.benchmark_group("chain");

    let segment = vec![0x5Au8; 256];
    let segments: Vec<&[u8]> = (0..8).map(|_| &segment[..]).collect();
    group.throughput(Throughput::Bytes(2048));
    group.bench_function("reader_drain_8x256", |b| {
        b.iter(|| {
            let mut reader = NetBufReader::new(ChainedNetBuf::new(SliceChain::new(&segments)));
            let mut out = [0u8; 256];
            let mut total = 0usize;
            loop {
                total += reader.read(&mut out).copied();
                if !reader.netbuf_mut().next() {
                    break;
                }
            }
            black_box(total)
        });
    });

    group.finish();
}

criterion_group!(benches, benchmark_pool, benchmark_arena, benchmark_netbuf, benchmark_chain);
criterion_main!(benches);
