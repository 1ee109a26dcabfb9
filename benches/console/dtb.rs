use crate::fdt::{FdtBuilder, rpi3_blob};
use criterion::{Criterion, Throughput};
use fwshell::dtb::{Fdt, find_bootarg};
use std::hint::black_box;

fn wide_blob() -> Vec<u8> {
    let mut builder = FdtBuilder::new();
    builder.begin_node("");
    for i in 0..64 {
        builder
            .begin_node(&format!("device@{i:x}"))
            .property_str("compatible", "vendor,device")
            .property("reg", &[0u8; 16])
            .end_node();
    }
    builder
        .begin_node("chosen")
        .property_str("bootargs", "console=serial0,115200 root=/dev/mmcblk0p2 rootwait")
        .end_node()
        .end_node();
    builder.build()
}

pub fn bench_find_bootarg(c: &mut Criterion) {
    let mut group = c.benchmark_group("find_bootarg");
    let small = rpi3_blob("console=serial0,115200");
    let wide = wide_blob();

    group.throughput(Throughput::Bytes(small.len() as u64));
    group.bench_function("rpi3", |b| b.iter(|| find_bootarg(black_box(&small))));

    group.throughput(Throughput::Bytes(wide.len() as u64));
    group.bench_function("64_siblings", |b| b.iter(|| find_bootarg(black_box(&wide))));
    group.finish();
}

pub fn bench_path_lookup(c: &mut Criterion) {
    let mut group = c.benchmark_group("path_lookup");
    let blob = rpi3_blob("console=serial0,115200");
    let fdt = Fdt::new(&blob).unwrap();
    group.bench_function("unit_address", |b| {
        b.iter(|| fdt.find_str(black_box("/soc/serial@7e215040"), black_box("status")))
    });
    group.bench_function("name_only", |b| {
        b.iter(|| fdt.find_str(black_box("/soc/serial"), black_box("compatible")))
    });
    group.finish();
}
