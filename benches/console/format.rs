use criterion::{Criterion, Throughput};
use fwshell::format::{Arg, printf};
use fwshell::printf;
use std::hint::black_box;

type Sink = heapless::Vec<u8, 256>;

pub fn bench_printf(c: &mut Criterion) {
    let mut group = c.benchmark_group("printf");
    let args = [
        Arg::Str("x1"),
        Arg::Word(0x0000_0000_3b40_0000),
        Arg::Int(-2),
        Arg::Byte(0x7f),
    ];
    let format = "Initial value of %s: 0x%w, EL%i, %b\n";
    group.throughput(Throughput::Elements(1));
    group.bench_function("mixed_directives", |b| {
        b.iter_batched_ref(
            Sink::new,
            |out| printf(out, black_box(format), black_box(&args)),
            criterion::BatchSize::SmallInput,
        )
    });
    group.finish();
}

pub fn bench_hexdump_row(c: &mut Criterion) {
    let mut group = c.benchmark_group("hexdump_row");
    let row: [u8; 16] = *b"Hello, hexdump!\n";
    group.throughput(Throughput::Bytes(row.len() as u64));
    group.bench_function("row", |b| {
        b.iter_batched_ref(
            Sink::new,
            |out| {
                printf!(out, "%w: ", 0x8_0000u64).unwrap();
                for (column, byte) in black_box(&row).iter().enumerate() {
                    printf!(out, "%b", *byte).unwrap();
                    if column % 2 == 1 {
                        printf!(out, " ").unwrap();
                    }
                }
            },
            criterion::BatchSize::SmallInput,
        )
    });
    group.finish();
}
