//! `free` and `heap_dump`.

use core::fmt::{self, Write};

use crate::platform::{HeapIntrospection, HeapRegion};
use crate::system::shell::{Command, Context, EXIT_SUCCESS};

/// `free`: print the free heap size in bytes.
pub fn free_command<P: HeapIntrospection>() -> Command<P> {
    Command {
        name: "free",
        help: Some("Get the total size of heap memory available"),
        hint: None,
        handler: free::<P>,
    }
}

/// `heap_dump`: print per-region allocator statistics.
pub fn heap_dump_command<P: HeapIntrospection>() -> Command<P> {
    Command {
        name: "heap_dump",
        help: Some("Dump the current heap stats"),
        hint: None,
        handler: heap_dump::<P>,
    }
}

fn free<P: HeapIntrospection>(ctx: &mut Context<'_, P>, _argc: usize, _argv: &[&str]) -> i32 {
    let free = ctx.platform().free_heap_size();
    let _ = writeln!(ctx, "{}", free);
    EXIT_SUCCESS
}

fn heap_dump<P: HeapIntrospection>(
    ctx: &mut Context<'_, P>,
    _argc: usize,
    _argv: &[&str],
) -> i32 {
    let regions = ctx.platform().heap_regions();
    let _ = write_heap_summary(ctx, &regions);
    EXIT_SUCCESS
}

/// Write the allocator report printed by `heap_dump`.
///
/// One block per region followed by totals. `min_free` is summed across
/// regions; `largest_free_block` is the largest of any region.
///
/// # Examples
///
/// ```rust
/// use libconsole::platform::HeapRegion;
/// use libconsole::system::commands::write_heap_summary;
///
/// let region = HeapRegion { address: 0x3ffb_0000, len: 1024, free: 512, ..Default::default() };
/// let mut report = String::new();
/// write_heap_summary(&mut report, &[region]).unwrap();
///
/// assert!(report.contains("At 0x3ffb0000 len 1024 free 512"));
/// assert!(report.contains("Totals:"));
/// ```
pub fn write_heap_summary<W: Write>(out: &mut W, regions: &[HeapRegion]) -> fmt::Result {
    writeln!(out, "Heap summary for capabilities 0x{:08X}:", 0)?;

    let mut totals = HeapRegion::default();
    for region in regions {
        writeln!(
            out,
            "  At 0x{:08x} len {} free {} allocated {} min_free {}",
            region.address, region.len, region.free, region.allocated, region.min_free
        )?;
        writeln!(
            out,
            "    largest_free_block {} alloc_blocks {} free_blocks {} total_blocks {}",
            region.largest_free_block, region.alloc_blocks, region.free_blocks, region.total_blocks
        )?;

        totals.free = totals.free.saturating_add(region.free);
        totals.allocated = totals.allocated.saturating_add(region.allocated);
        totals.min_free = totals.min_free.saturating_add(region.min_free);
        totals.largest_free_block = totals.largest_free_block.max(region.largest_free_block);
    }

    writeln!(out, "  Totals:")?;
    writeln!(
        out,
        "    free {} allocated {} min_free {} largest_free_block {}",
        totals.free, totals.allocated, totals.min_free, totals.largest_free_block
    )
}
