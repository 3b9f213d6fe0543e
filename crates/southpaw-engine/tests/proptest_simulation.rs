//! Property tests for the simulation driver and animation math: progression
//! stays inside the unit interval under arbitrary configuration, and the
//! fixed-step accumulator only cares about total elapsed time, never about
//! how the host chunks its deltas.

use proptest::prelude::*;
use southpaw_engine::prelude::*;

fn animation_from(
    cycle_time: f32,
    speed: f32,
    phase: f32,
    alternate: bool,
    reversed: bool,
    easing: Easing,
) -> Animation {
    let mut anim = Animation::new(cycle_time, CYCLES_INFINITE);
    anim.state_mut().set_speed(speed);
    anim.state_mut().set_phase(phase);
    anim.state_mut().set_alternate(alternate);
    anim.state_mut().set_reversed(reversed);
    anim.state_mut().set_easing(easing);
    anim.play();
    anim
}

fn easing_strategy() -> impl Strategy<Value = Easing> {
    prop_oneof![
        Just(Easing::Linear),
        Just(Easing::QuadIn),
        Just(Easing::QuadOut),
        Just(Easing::QuadInOut),
        Just(Easing::CubicIn),
        Just(Easing::CubicOut),
        Just(Easing::SmoothStep),
    ]
}

proptest! {
    // -- 1. animation progression bounds ---------------------------------

    #[test]
    fn progression_stays_in_unit_interval(
        cycle_time in 0.05f32..5.0,
        speed in 0.1f32..4.0,
        phase in 0.0f32..1.0,
        alternate: bool,
        reversed: bool,
        easing in easing_strategy(),
        steps in proptest::collection::vec(0.0f32..0.3, 1..60),
    ) {
        let mut anim = animation_from(cycle_time, speed, phase, alternate, reversed, easing);
        for dt in steps {
            anim.update(dt);
            let p = anim.progression();
            prop_assert!(
                (0.0..=1.0).contains(&p),
                "progression {} out of range (cycle_time={}, phase={}, alt={}, rev={})",
                p, cycle_time, phase, alternate, reversed
            );
        }
    }

    #[test]
    fn finite_animation_always_terminates_stopped(
        cycle_time in 0.05f32..1.0,
        cycles in 1i32..6,
        speed in 0.5f32..3.0,
    ) {
        let mut anim = Animation::new(cycle_time, cycles);
        anim.state_mut().set_speed(speed);
        anim.play();

        // Worst case wall time plus margin, fed in coarse slices.
        let budget = cycle_time * cycles as f32 / speed + 1.0;
        let mut fed = 0.0f32;
        while fed < budget {
            anim.update(0.05);
            fed += 0.05;
        }
        prop_assert!(anim.state().is_stopped());
        prop_assert_eq!(anim.state().cycle_index(), cycles);
    }

    // -- 2. accumulator chunking invariance ------------------------------

    #[test]
    fn fixed_step_count_depends_only_on_total_time(
        deltas in proptest::collection::vec(0u64..50, 1..40),
    ) {
        let config = SceneConfig {
            gravity: [0.0, 0.0],
            ..SceneConfig::default()
        };
        let step = config.time_step_ms;

        let mut chunked = Scene::new(config.clone());
        let total: u64 = deltas.iter().sum();
        for delta in &deltas {
            chunked.update_by(*delta);
        }

        let mut whole = Scene::new(config);
        whole.update_by(total);

        prop_assert_eq!(chunked.fixed_step_count(), whole.fixed_step_count());
        prop_assert_eq!(chunked.fixed_step_count(), total / step);
    }

    #[test]
    fn alpha_is_always_a_valid_blend_weight(
        deltas in proptest::collection::vec(0u64..50, 1..40),
    ) {
        let mut scene = Scene::new(SceneConfig {
            gravity: [0.0, 0.0],
            ..SceneConfig::default()
        });
        for delta in deltas {
            scene.update_by(delta);
            let alpha = scene.alpha();
            prop_assert!((0.0..1.0).contains(&alpha), "alpha {} out of [0,1)", alpha);
        }
    }

    // -- 3. lifecycle command sequences keep the hierarchy sound ---------

    #[test]
    fn random_commands_preserve_hierarchy_invariants(
        ops in proptest::collection::vec(0u8..5, 1..80),
        picks in proptest::collection::vec(0usize..16, 80),
    ) {
        let mut manager: ObjectManager<u32> = ObjectManager::new();
        let mut queue: CommandQueue<u32> = CommandQueue::new();
        let mut known: Vec<ObjectId> = Vec::new();

        for (step, op) in ops.into_iter().enumerate() {
            let pick = |n: usize| known.get(picks[step % picks.len()] % n.max(1)).copied();
            match op {
                0 => queue.spawn(format!("obj{step}"), (step % 7) as i32, None, step as u32),
                1 => {
                    if let Some(id) = pick(known.len()) {
                        queue.delete(id);
                    }
                }
                2 => {
                    if let Some(id) = pick(known.len()) {
                        queue.set_enabled(id, step % 2 == 0);
                    }
                }
                3 => {
                    if let (Some(a), Some(b)) = (pick(known.len()), known.first().copied()) {
                        // Cycles must be rejected, not applied.
                        let _ = queue.set_parent(a, Some(b));
                    }
                }
                _ => {
                    if let Some(id) = pick(known.len()) {
                        queue.set_layer(id, (step % 9) as i32 - 4);
                    }
                }
            }

            let report = queue.apply(&mut manager);
            known.extend(report.spawned);
            manager.process_objects(&mut NoHooks);
            known.retain(|id| manager.contains(*id));

            // Invariants after every commit batch.
            for id in manager.live_ids() {
                let meta = manager.meta(id).unwrap();
                prop_assert!(!meta.pending().any(), "live object with pending flags");
                match meta.parent() {
                    Some(parent) => {
                        prop_assert!(manager.contains(parent), "dangling parent");
                        let pdepth = manager.meta(parent).unwrap().depth();
                        prop_assert_eq!(meta.depth(), pdepth + 1);
                    }
                    None => prop_assert_eq!(meta.depth(), 0),
                }
                for child in meta.children() {
                    prop_assert!(manager.contains(*child), "dangling child");
                }
            }
        }
    }
}
