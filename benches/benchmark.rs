use criterion::{criterion_group, criterion_main, Criterion};

use seedseeker::lcg::Lcg;
use seedseeker::lfg::{CarryMode, Lfg};
use seedseeker::mt19937::{reverse_mt19937, Mt19937};
use seedseeker::ran3::{reverse_ran3, Ran3};
use seedseeker::xoshiro::{reverse_xoshiro, Xoshiro256StarStar};

pub fn criterion_benchmark(c: &mut Criterion) {
    let mut lcg = Lcg::new(2147483647, 48271, 0, 1).unwrap();
    c.bench_function("Lcg::next", move |b| b.iter(|| lcg.next()));

    let mut lfg = Lfg::new(
        2147483647,
        5,
        17,
        CarryMode::NoCarry,
        false,
        (0..17).map(|i| i * 999_331 + 7).collect(),
    )
    .unwrap();
    c.bench_function("Lfg::next", move |b| b.iter(|| lfg.next()));

    let mut xoshiro = Xoshiro256StarStar::new(1, 2, 3, 4).unwrap();
    c.bench_function("Xoshiro256StarStar::next", move |b| {
        b.iter(|| xoshiro.next())
    });

    let mut ran3 = Ran3::new(100);
    c.bench_function("Ran3::next", move |b| b.iter(|| ran3.next()));

    let mut mt = Mt19937::new(19650218);
    c.bench_function("Mt19937::next", move |b| b.iter(|| mt.next()));

    let lcg_output: Vec<u64> = Lcg::new(2147483647, 48271, 0, 1).unwrap().take(200).collect();
    c.bench_function("reverse_lcg", move |b| {
        b.iter(|| seedseeker::lcg::reverse_lcg(lcg_output.clone().into_iter()))
    });

    let xoshiro_output: Vec<u64> = Xoshiro256StarStar::new(1, 2, 3, 4)
        .unwrap()
        .take(64)
        .collect();
    c.bench_function("reverse_xoshiro", move |b| {
        b.iter(|| reverse_xoshiro(xoshiro_output.clone().into_iter()))
    });

    let ran3_output: Vec<i32> = Ran3::new(100).take(55).collect();
    c.bench_function("reverse_ran3", move |b| {
        b.iter(|| reverse_ran3(ran3_output.clone().into_iter()))
    });

    let mt_output: Vec<u32> = Mt19937::new(19650218).take(624).collect();
    c.bench_function("reverse_mt19937", move |b| {
        b.iter(|| reverse_mt19937(mt_output.clone().into_iter()))
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
