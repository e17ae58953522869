#[cfg(test)]
mod tests {
    use bitfit_core::constants::*;
    use bitfit_core::enums::{AiPattern, Difficulty};
    use bitfit_core::moves::MoveId;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use crate::adapt::Adaptation;
    use crate::brain::{AiMode, BossBrain, BossContext};
    use crate::decide::{choose, situational_weights, Decision, Range, Situation};
    use crate::habits::{HabitFrequencies, HabitWindow, ObservedAction};
    use crate::profiles::{base_weights, get_tier, DecisionWeights};

    fn neutral_ctx(own_x: f32, opponent_x: f32) -> BossContext {
        BossContext {
            own_x,
            opponent_x,
            own_health_frac: 1.0,
            opponent_health_frac: 1.0,
            own_meter: 0.0,
            opponent_action: None,
            opponent_move: None,
        }
    }

    // ---- Profiles ----

    #[test]
    fn test_tier_reaction_frames() {
        assert_eq!(get_tier(Difficulty::Easy).reaction_frames, 30);
        assert_eq!(get_tier(Difficulty::Normal).reaction_frames, 18);
        assert_eq!(get_tier(Difficulty::Hard).reaction_frames, 9);
        assert_eq!(get_tier(Difficulty::Expert).reaction_frames, 6);
        assert_eq!(get_tier(Difficulty::Expert).combo_length, 7);
    }

    #[test]
    fn test_pattern_weights_sum_to_one() {
        for pattern in [AiPattern::Aggressive, AiPattern::Balanced, AiPattern::Defensive] {
            let total = base_weights(pattern).total();
            assert!((total - 1.0).abs() < 1e-9, "{pattern:?} sums to {total}");
        }
    }

    // ---- Range & scoring ----

    #[test]
    fn test_range_bands() {
        assert_eq!(Range::classify(79.9), Range::Close);
        assert_eq!(Range::classify(-50.0), Range::Close);
        assert_eq!(Range::classify(80.0), Range::Mid);
        assert_eq!(Range::classify(149.0), Range::Mid);
        assert_eq!(Range::classify(150.0), Range::Far);
    }

    #[test]
    fn test_close_range_favours_attack() {
        let base = base_weights(AiPattern::Balanced);
        let situation = Situation {
            range: Range::Close,
            own_health_frac: 1.0,
            habits: HabitFrequencies::default(),
        };
        let w = situational_weights(base, &situation);
        assert!((w.attack - 0.75).abs() < 1e-9);
        assert!((w.defend - 0.36).abs() < 1e-9);
        assert!((w.reposition - 0.2).abs() < 1e-9);
    }

    #[test]
    fn test_far_range_favours_reposition() {
        let base = base_weights(AiPattern::Balanced);
        let situation = Situation {
            range: Range::Far,
            own_health_frac: 1.0,
            habits: HabitFrequencies::default(),
        };
        let w = situational_weights(base, &situation);
        assert!((w.reposition - 0.4).abs() < 1e-9);
        assert!((w.attack - 0.25).abs() < 1e-9);
    }

    #[test]
    fn test_low_health_turns_aggressive() {
        let base = base_weights(AiPattern::Balanced);
        let situation = Situation {
            range: Range::Mid,
            own_health_frac: 0.2,
            habits: HabitFrequencies::default(),
        };
        let w = situational_weights(base, &situation);
        assert!(w.attack > base.attack);
        assert!(w.defend < base.defend);
    }

    #[test]
    fn test_blocking_opponent_shifts_to_reposition() {
        let base = base_weights(AiPattern::Balanced);
        let situation = Situation {
            range: Range::Mid,
            own_health_frac: 1.0,
            habits: HabitFrequencies {
                block: 0.5,
                ..HabitFrequencies::default()
            },
        };
        let w = situational_weights(base, &situation);
        assert!(w.reposition > base.reposition);
        assert!(w.attack < base.attack);
    }

    #[test]
    fn test_choose_partitions_roll() {
        let w = base_weights(AiPattern::Balanced);
        assert_eq!(choose(&w, 0.0), Decision::Attack);
        assert_eq!(choose(&w, 0.49), Decision::Attack);
        assert_eq!(choose(&w, 0.6), Decision::Defend);
        assert_eq!(choose(&w, 0.99), Decision::Reposition);
        assert_eq!(choose(&w, 1.0), Decision::Reposition);
    }

    #[test]
    fn test_choose_exhaustion_falls_back_to_recenter() {
        let zero = DecisionWeights {
            attack: 0.0,
            defend: 0.0,
            reposition: 0.0,
        };
        assert_eq!(choose(&zero, 0.5), Decision::Recenter);
        let nan = DecisionWeights {
            attack: f64::NAN,
            ..base_weights(AiPattern::Balanced)
        };
        assert_eq!(choose(&nan, 0.5), Decision::Recenter);
        let negative = DecisionWeights {
            defend: -1.0,
            ..base_weights(AiPattern::Balanced)
        };
        assert_eq!(choose(&negative, 0.5), Decision::Recenter);
        assert_eq!(
            choose(&base_weights(AiPattern::Balanced), f64::NAN),
            Decision::Recenter
        );
    }

    #[test]
    fn test_choose_skips_zero_weight_options() {
        let w = DecisionWeights {
            attack: 0.0,
            defend: 1.0,
            reposition: 0.0,
        };
        assert_eq!(choose(&w, 0.0), Decision::Defend);
        assert_eq!(choose(&w, 1.0), Decision::Defend);
    }

    // ---- Habits ----

    #[test]
    fn test_habit_window_is_bounded() {
        let mut window = HabitWindow::default();
        for _ in 0..25 {
            window.observe(ObservedAction::Attack, Some(MoveId::LightPunch));
        }
        assert_eq!(window.len(), AI_OBSERVATION_WINDOW);
        for _ in 0..5 {
            window.observe(ObservedAction::Block, None);
        }
        let freq = window.frequencies();
        assert!((freq.attack - 0.5).abs() < 1e-9);
        assert!((freq.block - 0.5).abs() < 1e-9);
        assert_eq!(freq.jump, 0.0);
    }

    #[test]
    fn test_held_action_observed_once() {
        let mut brain = BossBrain::new(Difficulty::Normal, AiPattern::Balanced);
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let ctx = BossContext {
            opponent_action: Some(ObservedAction::Block),
            ..neutral_ctx(300.0, 100.0)
        };
        for _ in 0..20 {
            brain.update(&ctx, &mut rng);
        }
        assert_eq!(brain.habits().len(), 1);

        let attack = BossContext {
            opponent_action: Some(ObservedAction::Attack),
            opponent_move: Some(MoveId::LightPunch),
            ..ctx
        };
        brain.update(&attack, &mut rng);
        let follow_up = BossContext {
            opponent_move: Some(MoveId::MediumPunch),
            ..attack
        };
        brain.update(&follow_up, &mut rng);
        assert_eq!(brain.habits().len(), 3);
    }

    #[test]
    fn test_habit_window_records_move_ids() {
        let mut brain = BossBrain::new(Difficulty::Normal, AiPattern::Balanced);
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        let base = neutral_ctx(300.0, 100.0);
        let sequence = [
            (ObservedAction::Attack, Some(MoveId::LightPunch)),
            (ObservedAction::Attack, Some(MoveId::LightPunch)),
            (ObservedAction::Attack, Some(MoveId::HeavyKick)),
            (ObservedAction::Block, None),
            (ObservedAction::Special, Some(MoveId::Fireball)),
        ];
        for (action, move_id) in sequence {
            let ctx = BossContext {
                opponent_action: Some(action),
                opponent_move: move_id,
                ..base
            };
            brain.update(&ctx, &mut rng);
        }

        let moves: Vec<MoveId> = brain.habits().recent_moves().collect();
        assert_eq!(moves, vec![MoveId::LightPunch, MoveId::HeavyKick, MoveId::Fireball]);
        assert_eq!(brain.habits().len(), 4);
        let blocks = brain
            .habits()
            .observations()
            .filter(|o| o.action == ObservedAction::Block)
            .count();
        assert_eq!(blocks, 1);
        let freq = brain.habits().frequencies();
        assert!((freq.attack - 0.5).abs() < 1e-9);
        assert!((freq.special - 0.25).abs() < 1e-9);
    }

    // ---- Adaptation ----

    #[test]
    fn test_adaptation_saturates_on_winning_streak() {
        let mut adapt = Adaptation::default();
        for _ in 0..1000 {
            adapt.update(0.9, 0.1);
        }
        assert_eq!(adapt.scalar(), 1.0);
        for _ in 0..5000 {
            adapt.update(0.1, 0.9);
        }
        assert_eq!(adapt.scalar(), -1.0);
    }

    #[test]
    fn test_adaptation_holds_when_even() {
        let mut adapt = Adaptation::default();
        for _ in 0..100 {
            adapt.update(0.5, 0.5);
        }
        assert_eq!(adapt.scalar(), 0.0);
    }

    #[test]
    fn test_effective_parameters_follow_scalar() {
        let base = get_tier(Difficulty::Normal);
        let mut adapt = Adaptation::default();
        for _ in 0..200 {
            adapt.update(0.9, 0.1);
        }
        let eased = adapt.effective(&base);
        assert_eq!(eased.reaction_frames, 23);
        assert_eq!(eased.combo_length, 2);
        assert!((eased.mistake_chance - 0.1).abs() < 1e-9);

        for _ in 0..400 {
            adapt.update(0.1, 0.9);
        }
        let tightened = adapt.effective(&base);
        assert_eq!(tightened.reaction_frames, 13);
        assert_eq!(tightened.combo_length, 4);
        assert!((tightened.mistake_chance - 0.3).abs() < 1e-9);
    }

    #[test]
    fn test_winning_boss_is_slower_but_cleaner() {
        let base = get_tier(Difficulty::Hard);
        let mut adapt = Adaptation::default();
        adapt.update(0.9, 0.1);
        assert!(adapt.scalar() > 0.0);
        let winning = adapt.effective(&base);
        assert!(winning.reaction_frames >= base.reaction_frames);
        assert!(winning.combo_length <= base.combo_length);
        assert!(winning.mistake_chance < base.mistake_chance);

        let mut adapt = Adaptation::default();
        adapt.update(0.1, 0.9);
        assert!(adapt.scalar() < 0.0);
        let losing = adapt.effective(&base);
        assert!(losing.reaction_frames <= base.reaction_frames);
        assert!(losing.combo_length >= base.combo_length);
        assert!(losing.mistake_chance > base.mistake_chance);
    }

    proptest! {
        #[test]
        fn prop_adaptation_stays_bounded(
            steps in prop::collection::vec((0.0f64..=1.0, 0.0f64..=1.0), 0..3000)
        ) {
            let mut adapt = Adaptation::default();
            for (own, opp) in steps {
                adapt.update(own, opp);
                prop_assert!((-1.0..=1.0).contains(&adapt.scalar()));
            }
        }

        #[test]
        fn prop_effective_parameters_valid(scalar_steps in -300i32..300) {
            let mut adapt = Adaptation::default();
            let (own, opp) = if scalar_steps >= 0 { (0.9, 0.1) } else { (0.1, 0.9) };
            for _ in 0..scalar_steps.unsigned_abs() {
                adapt.update(own, opp);
            }
            for difficulty in [Difficulty::Easy, Difficulty::Normal, Difficulty::Hard, Difficulty::Expert] {
                let eff = adapt.effective(&get_tier(difficulty));
                prop_assert!(eff.reaction_frames >= 1);
                prop_assert!(eff.combo_length >= 1);
                prop_assert!((0.0..=1.0).contains(&eff.mistake_chance));
            }
        }
    }

    // ---- Brain ----

    #[test]
    fn test_no_decision_before_reaction_time() {
        let mut brain = BossBrain::new(Difficulty::Normal, AiPattern::Balanced);
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let ctx = neutral_ctx(300.0, 100.0);
        for _ in 0..get_tier(Difficulty::Normal).reaction_frames {
            let out = brain.update(&ctx, &mut rng);
            assert_eq!(out, Default::default());
        }
        assert!(brain.last_decision().is_none());
        brain.update(&ctx, &mut rng);
        assert!(brain.last_decision().is_some());
    }

    #[test]
    fn test_reacts_to_close_attack() {
        let mut brain = BossBrain::new(Difficulty::Expert, AiPattern::Balanced);
        let mut rng = ChaCha8Rng::seed_from_u64(21);
        let ctx = BossContext {
            opponent_action: Some(ObservedAction::Attack),
            opponent_move: Some(MoveId::HeavyPunch),
            ..neutral_ctx(200.0, 150.0)
        };
        let reacted = (0..=get_tier(Difficulty::Expert).reaction_frames).any(|_| {
            let out = brain.update(&ctx, &mut rng);
            out.block || out.attack == Some(MoveId::HeavyPunch)
        });
        assert!(reacted);
    }

    #[test]
    fn test_block_held_then_counter() {
        let mut brain = BossBrain::new(Difficulty::Expert, AiPattern::Balanced);
        let mut rng = ChaCha8Rng::seed_from_u64(8);
        let ctx = BossContext {
            opponent_action: Some(ObservedAction::Attack),
            opponent_move: Some(MoveId::HeavyPunch),
            ..neutral_ctx(200.0, 150.0)
        };

        let mut started = false;
        for _ in 0..2000 {
            if brain.update(&ctx, &mut rng).block {
                started = true;
                break;
            }
        }
        assert!(started, "boss never blocked");
        assert_eq!(brain.mode(), AiMode::Blocking);

        let mut held = 1;
        loop {
            let out = brain.update(&ctx, &mut rng);
            if !out.block {
                assert_eq!(out.attack, Some(MoveId::LightPunch));
                break;
            }
            held += 1;
        }
        assert_eq!(held, AI_BLOCK_HOLD_FRAMES);
        assert_eq!(brain.mode(), AiMode::Neutral);
    }

    #[test]
    fn test_same_seed_same_decisions() {
        let run = |seed: u64| {
            let mut brain = BossBrain::new(Difficulty::Hard, AiPattern::Aggressive);
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            (0..600)
                .map(|i| {
                    let x = 100.0 + (i % 200) as f32;
                    brain.update(&neutral_ctx(x, 200.0), &mut rng)
                })
                .collect::<Vec<_>>()
        };
        assert_eq!(run(42), run(42));
    }

    #[test]
    fn test_reset_round_clears_momentum() {
        let mut brain = BossBrain::new(Difficulty::Normal, AiPattern::Balanced);
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let ctx = BossContext {
            own_health_frac: 0.95,
            opponent_health_frac: 0.05,
            ..neutral_ctx(300.0, 100.0)
        };
        for _ in 0..50 {
            brain.update(&ctx, &mut rng);
        }
        assert!(brain.adaptation() > 0.0);
        brain.reset_round();
        assert_eq!(brain.adaptation(), 0.0);
        assert_eq!(brain.mode(), AiMode::Neutral);
    }
}
