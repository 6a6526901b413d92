use criterion::{criterion_group, BatchSize, Criterion};
use merkleme_cryptography::Keccak256;
use merkleme_merkle::Tree;
use rand::{rngs::StdRng, Rng, SeedableRng};

const SAMPLE_SIZE: usize = 100;

fn bench_prove(c: &mut Criterion) {
    for n in [1_000, 10_000, 100_000] {
        let members: Vec<String> = (0..n).map(|i| format!("0x{:040x}", i)).collect();
        let tree = Tree::<Keccak256>::new(&members).unwrap();
        let mut sampler = StdRng::seed_from_u64(0);

        c.bench_function(
            &format!("{}/n={} items={}", module_path!(), n, SAMPLE_SIZE),
            |b| {
                b.iter_batched(
                    || {
                        (0..SAMPLE_SIZE)
                            .map(|_| members[sampler.gen_range(0..n)].clone())
                            .collect::<Vec<_>>()
                    },
                    |sample| {
                        for member in sample {
                            tree.prove(member.as_bytes()).unwrap();
                        }
                    },
                    BatchSize::SmallInput,
                )
            },
        );
    }
}

criterion_group! {
    name = benches;
    config = Criterion::default().sample_size(10);
    targets = bench_prove
}
