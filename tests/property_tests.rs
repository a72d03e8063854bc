#[cfg(test)]
mod property_tests {
    use ndarray::{array, Array1};
    use proptest::prelude::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    use metis::network::{Activation, Layer, QNetwork};
    use metis::replay_buffer::{Experience, MinibatchSource, ReplayBuffer};
    use metis::schedule::{ConstantDecay, DecaySchedule, LinearDecay};
    use metis::strategy::{
        ActionSelection, EpsilonGreedyStrategy, GreedyStrategy, RandomStrategy,
    };
    use metis::types::Action;

    fn experience(tag: f32) -> Experience {
        Experience {
            state: array![tag],
            action: Action::new(0),
            reward: tag,
            next_state: array![tag + 1.0],
        }
    }

    proptest! {
        #[test]
        fn random_actions_stay_in_range(num_actions in 1usize..64, seed in any::<u64>()) {
            let mut strategy = RandomStrategy::with_rng(num_actions, SmallRng::seed_from_u64(seed));
            let state = array![0.0];
            for _ in 0..100 {
                let action = strategy.select_action(state.view()).unwrap();
                prop_assert!(action.index < num_actions);
            }
        }

        #[test]
        fn linear_decay_never_increases(
            start in 0.0f32..1.0,
            end in 0.0f32..1.0,
            steps in 1u32..500,
        ) {
            prop_assume!(end <= start);
            let mut decay = LinearDecay::new(start, end, steps);
            let mut previous = decay.epsilon();
            for _ in 0..100 {
                let value = decay.epsilon();
                prop_assert!(value <= previous + 1e-6);
                previous = value;
            }
        }

        #[test]
        fn replay_buffer_never_exceeds_capacity(
            capacity in 1usize..32,
            pushes in 0usize..100,
        ) {
            let mut buffer = ReplayBuffer::new(capacity);
            for tag in 0..pushes {
                buffer.push(experience(tag as f32));
            }
            prop_assert_eq!(buffer.len(), pushes.min(capacity));
        }

        #[test]
        fn sampled_columns_stay_parallel(
            pushes in 1usize..50,
            seed in any::<u64>(),
        ) {
            let mut buffer = ReplayBuffer::with_rng(64, SmallRng::seed_from_u64(seed));
            for tag in 0..pushes {
                buffer.push(experience(tag as f32));
            }
            let batch = buffer.sample_minibatch(pushes).unwrap();
            for row in 0..batch.len() {
                let tag = batch.prev_states[[row, 0]];
                prop_assert_eq!(batch.rewards[row], tag);
                prop_assert_eq!(batch.next_states[[row, 0]], tag + 1.0);
            }
        }

        #[test]
        fn epsilon_zero_matches_greedy(
            state in prop::collection::vec(-10.0f32..10.0, 3),
            seed in any::<u64>(),
        ) {
            let layer = Layer::new(3, 3, Activation::Linear)
                .with_weights(ndarray::Array2::eye(3))
                .with_biases(Array1::zeros(3));
            let q = QNetwork::new(&[3, 3], &[Activation::Linear])
                .with_layers(vec![layer])
                .into_shared();

            let state = Array1::from_vec(state);
            let mut greedy = GreedyStrategy::new(q.clone());
            let mut strategy = EpsilonGreedyStrategy::with_rng(
                q,
                3,
                ConstantDecay(0.0),
                SmallRng::seed_from_u64(seed),
            );

            prop_assert_eq!(
                strategy.select_action(state.view()).unwrap(),
                greedy.select_action(state.view()).unwrap()
            );
        }
    }
}
