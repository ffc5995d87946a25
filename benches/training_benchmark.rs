use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use ndarray::Array2;
use quest_dqn::agent::{DqnAgent, EpsilonSchedule};
use quest_dqn::network::ValueNetwork;
use quest_dqn::replay_buffer::{ReplayBuffer, Transition};
use quest_dqn::simulator::{Action, Simulator, OBSERVATION_SIZE};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn filled_buffer(rng: &mut StdRng) -> ReplayBuffer {
    let mut sim = Simulator::new(1000);
    let mut buffer = ReplayBuffer::new(5000).unwrap();
    let mut obs = sim.reset();
    for _ in 0..5000 {
        let action = Action::ALL[rng.gen_range(0..Action::COUNT)];
        let result = sim.step(action, rng);
        buffer.add(Transition {
            state: obs,
            action,
            reward: result.reward,
            next_state: result.observation.clone(),
            done: result.done,
        });
        obs = if result.done { sim.reset() } else { result.observation };
    }
    buffer
}

fn bench_simulator_step(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(0);
    let mut sim = Simulator::new(usize::MAX);
    c.bench_function("simulator_auto_progress_step", |b| {
        b.iter(|| black_box(sim.step(Action::AutoProgress, &mut rng)))
    });
}

fn bench_forward(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(1);
    let mut network = ValueNetwork::new(OBSERVATION_SIZE, 64, Action::COUNT, &mut rng).unwrap();
    let inputs = Array2::from_elem((32, OBSERVATION_SIZE), 0.5f32);
    c.bench_function("forward_batch_32", |b| {
        b.iter(|| black_box(network.forward(inputs.view()).unwrap()))
    });
}

fn bench_train_step(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(2);
    let buffer = filled_buffer(&mut rng);
    let mut agent = DqnAgent::new(
        OBSERVATION_SIZE,
        64,
        Action::COUNT,
        EpsilonSchedule::fixed(0.05),
        0.99,
        0.001,
        &mut rng,
    )
    .unwrap();

    c.bench_function("dqn_train_batch_32", |b| {
        b.iter_batched(
            || buffer.sample(32, &mut rng).unwrap(),
            |batch| black_box(agent.train_on_batch(&batch).unwrap()),
            BatchSize::SmallInput,
        )
    });
}

criterion_group!(benches, bench_simulator_step, bench_forward, bench_train_step);
criterion_main!(benches);
