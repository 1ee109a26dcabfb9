use criterion::{criterion_group, criterion_main};

mod console;
#[path = "../tests/common/fdt.rs"]
mod fdt;

criterion_group!(
    benches,
    console::format::bench_printf,
    console::format::bench_hexdump_row,
    console::tokenizer::bench_split,
    console::tokenizer::bench_scanner,
    console::dtb::bench_find_bootarg,
    console::dtb::bench_path_lookup
);
criterion_main!(benches);
