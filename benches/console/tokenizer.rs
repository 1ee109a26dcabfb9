use criterion::{BatchSize, Criterion, Throughput};
use fwshell::shell::tokenizer::{Argv, DELIMITERS, Scanner, split};
use std::hint::black_box;

const LINE: &[u8] = b"  hexdump \t0x80000   256  extra tokens to\tcount past the limit\n\0";

pub fn bench_split(c: &mut Criterion) {
    let mut group = c.benchmark_group("split");
    group.throughput(Throughput::Bytes(LINE.len() as u64));
    group.bench_function("in_place", |b| {
        b.iter_batched_ref(
            || LINE.to_vec(),
            |line| {
                let argv: Argv<'_, 10> = split(line, DELIMITERS).unwrap();
                black_box(argv.argc())
            },
            BatchSize::SmallInput,
        )
    });
    group.finish();
}

pub fn bench_scanner(c: &mut Criterion) {
    let mut group = c.benchmark_group("scanner");
    group.throughput(Throughput::Bytes(LINE.len() as u64));
    group.bench_function("count_tokens", |b| {
        b.iter(|| Scanner::new(black_box(LINE)).count())
    });
    group.finish();
}
