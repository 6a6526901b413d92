use criterion::criterion_main;

mod prove;
mod verify;

criterion_main!(build::benches, prove::benches, verify::benches);
