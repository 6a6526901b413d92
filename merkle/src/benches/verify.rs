use criterion::{criterion_group, Criterion};
use merkleme_cryptography::{Hasher, Keccak256};
use merkleme_merkle::Tree;

fn bench_verify(c: &mut Criterion) {
    for n in [1_000, 100_000] {
        let members: Vec<String> = (0..n).map(|i| format!("0x{:040x}", i)).collect();
        let tree = Tree::<Keccak256>::new(&members).unwrap();
        let root = tree.root();
        let member = members[n / 2].as_bytes();
        let proof = tree.prove(member).unwrap();

        c.bench_function(&format!("{}/n={}", module_path!(), n), |b| {
            let mut hasher = Keccak256::new();
            b.iter(|| assert!(proof.verify(&mut hasher, member, &root).unwrap()))
        });
    }
}

criterion_group! {
    name = benches;
    config = Criterion::default().sample_size(10);
    targets = bench_verify
}
