//! Basic memkit walkthrough
//!
//! Exercises every allocator and buffer type in the toolkit once: slot
//! pools, the tracked pool, byte and typed arenas, netbuf writers and
//! readers, chained segment walks, and an OS-backed region.
//!
//! # Environment Variables
//!
//! - `MEMKIT_FLUSH_EPRINT=1` - Flush debug output immediately
//! - `MEMKIT_LOG_LEVEL=debug` - Set log level (off, error, warn, info, debug, trace)

use memkit::{
    init_logging, kinfo, region_arena, Arena, ChainedNetBuf, InlineChunk, InlineNetBuf, MemError,
    NetBuf, NetBufReader, NetBufWriter, SliceChain, SlotPool, TrackedSlotPool,
};

// MEMKIT_LOG_LEVEL=debug MEMKIT_FLUSH_EPRINT=1 cargo run -p memkit-basic
fn main() -> Result<(), MemError> {
    println!("=== memkit Basic Example ===\n");

    // Reads MEMKIT_FLUSH_EPRINT and MEMKIT_LOG_LEVEL
    init_logging();

    pools()?;
    arenas()?;
    netbufs()?;
    chains()?;
    regions()?;

    println!("\n=== Example Complete ===");
    Ok(())
}

/// Fixed pools with generation-checked handles.
fn pools() -> Result<(), MemError> {
    println!("--- Slot pool ---");

    let mut pool: SlotPool<&'static str, 4> = SlotPool::new();
    let a = pool.allocate("alpha")?;
    let b = pool.allocate("bravo")?;
    println!("allocated {} of {} slots", pool.count_allocated(), pool.capacity());

    *pool.lock(b)? = "BRAVO";
    println!("slot b now holds {:?}", pool.lock(b)?);

    let released = pool.deallocate(a)?;
    println!("released slot a ({:?})", released);

    // The slot was re-stamped on release; the old handle is dead.
    assert!(matches!(pool.lock(a), Err(MemError::InvalidHandle)));
    println!("stale handle rejected");

    // Tracked pools additionally know their live set.
    let mut tracked: TrackedSlotPool<u32, 8> = TrackedSlotPool::new();
    for n in [10, 20, 30] {
        tracked.allocate(n)?;
    }
    print!("live values, most recent first:");
    for (_, v) in tracked.iter_live() {
        print!(" {}", v);
    }
    println!();

    kinfo!("pool walkthrough done");
    Ok(())
}

/// Byte spans and typed values with LIFO release.
fn arenas() -> Result<(), MemError> {
    println!("\n--- Arena ---");

    let mut arena = Arena::new(InlineChunk::<512>::new());

    let head = arena.alloc(16)?;
    let body = arena.alloc(64)?;
    arena.get_mut(body)?.fill(b'x');
    println!("used {} of {} bytes", arena.used(), arena.capacity());

    // Freeing an older span reclaims everything allocated after it too.
    let reclaimed = arena.free(head)?;
    println!("freed head, reclaimed {} bytes (body included)", reclaimed);
    assert!(matches!(arena.free(body), Err(MemError::InvalidHandle)));

    // Typed values run their destructor on destroy, newest first.
    let mut counter = arena.place([0u32; 4])?;
    arena.value_mut(&mut counter)[0] = 41;
    arena.value_mut(&mut counter)[0] += 1;
    println!("typed value holds {}", arena.value(&counter)[0]);
    arena.destroy(counter).map_err(|(e, _)| e)?;
    println!("arena empty again: {} bytes used", arena.used());

    Ok(())
}

/// Single-buffer writers and readers.
fn netbufs() -> Result<(), MemError> {
    println!("\n--- NetBuf writer / reader ---");

    let mut writer = NetBufWriter::new(InlineNetBuf::<64>::new());
    writer.write_exact(b"PING 12345\r\n")?;
    println!(
        "wrote {} bytes, {} free",
        writer.netbuf().length_processed(),
        writer.size()
    );

    // Clamped writes report how much actually landed.
    let outcome = writer.write(&[b'.'; 128]);
    println!("oversized write put {} of 128 bytes", outcome.copied());
    assert!(!outcome.is_complete());

    // Walk the same buffer back out.
    let mut netbuf = writer.into_inner();
    netbuf.first();
    let mut reader = NetBufReader::new(netbuf);
    let mut line = [0u8; 12];
    reader.read_exact(&mut line)?;
    println!("read back {:?}", String::from_utf8_lossy(&line));

    Ok(())
}

/// Chained walks over scattered segments.
fn chains() -> Result<(), MemError> {
    println!("\n--- Chained netbuf ---");

    let segments: [&[u8]; 3] = [b"GET /index.html", b" HTTP/1.1", b"\r\n"];
    let mut reader = NetBufReader::new(ChainedNetBuf::new(SliceChain::new(&segments)));

    let mut assembled = Vec::new();
    loop {
        let mut buf = [0u8; 8];
        let outcome = reader.read(&mut buf);
        if outcome.copied() > 0 {
            assembled.extend_from_slice(&buf[..outcome.copied()]);
        } else if !reader.netbuf_mut().next() {
            break;
        }
    }
    println!(
        "assembled {} bytes across {} segments: {:?}",
        assembled.len(),
        segments.len(),
        String::from_utf8_lossy(&assembled)
    );

    Ok(())
}

/// OS-backed storage regions.
fn regions() -> Result<(), MemError> {
    println!("\n--- OS-backed region ---");

    let mut arena = region_arena(64 * 1024)?;
    println!(
        "mapped {} bytes ({} pages, guard-fenced)",
        arena.capacity(),
        arena.capacity() / memkit::page_size()
    );

    let r = arena.alloc(1024)?;
    arena.get_mut(r)?.fill(0x5A);
    let reclaimed = arena.free(r)?;
    println!("scratch roundtrip reclaimed {} bytes", reclaimed);

    Ok(())
}
