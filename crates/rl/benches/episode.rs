use criterion::{criterion_group, criterion_main, Criterion};
use rl::ReinforceTrainer;
use seqenv::SequenceEnv;

fn bench_reinforce_episode(c: &mut Criterion) {
    fastrand::seed(0);
    let env = SequenceEnv::default_demo().unwrap();
    let mut trainer = ReinforceTrainer::new(env, 1e-3, 0.99);
    c.bench_function("reinforce_episode", |b| {
        b.iter(|| trainer.run_episode().unwrap());
    });
}

criterion_group!(benches, bench_reinforce_episode);
criterion_main!(benches);
