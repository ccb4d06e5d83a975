use coin_gas::sim::{Disk, ExchangeRule, SimulationLoop, resolve};
use coin_gas::{Preset, SimConfig};
use glam::Vec2;
use proptest::prelude::*;
use rand::{RngCore, SeedableRng};
use rand_pcg::Pcg32;

/// Every draw is zero bits, so every fair coin flip lands on "move"
struct AlwaysMove;

impl RngCore for AlwaysMove {
    fn next_u32(&mut self) -> u32 {
        0
    }
    fn next_u64(&mut self) -> u64 {
        0
    }
    fn fill_bytes(&mut self, dst: &mut [u8]) {
        dst.fill(0);
    }
}

fn preset_strategy() -> impl Strategy<Value = Preset> {
    prop_oneof![Just(Preset::Classic), Just(Preset::Large), Just(Preset::Pooled)]
}

fn rule_strategy() -> impl Strategy<Value = ExchangeRule> {
    prop_oneof![Just(ExchangeRule::Bernoulli), Just(ExchangeRule::UniformSplit)]
}

#[test]
fn head_on_collision_hands_every_coin_over() {
    let mut a = Disk::new(Vec2::new(100.0, 300.0), Vec2::new(50.0, 0.0), 40.0, 4);
    let mut b = Disk::new(Vec2::new(170.0, 300.0), Vec2::new(-50.0, 0.0), 40.0, 0);

    let outcome = resolve(&mut a, &mut b, ExchangeRule::Bernoulli, 4, &mut AlwaysMove);

    assert!(outcome.occurred);
    assert!((a.vel() - Vec2::new(-50.0, 0.0)).length() < 1e-4);
    assert!((b.vel() - Vec2::new(50.0, 0.0)).length() < 1e-4);
    assert_eq!((a.coins(), b.coins()), (0, 4));
}

#[test]
fn far_apart_disks_never_collide() {
    let mut a = Disk::new(Vec2::new(0.0, 0.0), Vec2::new(300.0, 200.0), 40.0, 4);
    let mut b = Disk::new(Vec2::new(500.0, 500.0), Vec2::new(-300.0, 100.0), 40.0, 0);
    let (a0, b0) = (a.clone(), b.clone());

    let outcome = resolve(&mut a, &mut b, ExchangeRule::Bernoulli, 4, &mut AlwaysMove);

    assert!(!outcome.occurred);
    assert_eq!((a, b), (a0, b0));
}

#[test]
fn large_preset_approaches_equilibrium() -> coin_gas::Result<()> {
    // 8 coins over 6 disks: the 0-coin bucket dominates and the average
    // over buckets of disk count is always the disk count.
    let mut sim = SimulationLoop::new(&SimConfig {
        seed: Some(2024),
        ..SimConfig::from_preset(Preset::Large)
    })?;
    sim.run(Some(60 * 600), coin_gas::sim::Pacing::Unpaced)?;

    let snap = sim.stats().snapshot();
    assert!(snap.collision_count > 100, "only {} collisions", snap.collision_count);
    let avg = snap.running_average().unwrap();
    assert!((avg.iter().sum::<f64>() - 6.0).abs() < 1e-9);
    assert!(avg[0] > avg[4]);
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn runs_conserve_coins_and_stay_in_bounds(
        seed in any::<u64>(),
        preset in preset_strategy(),
        rule in rule_strategy(),
        ticks in 1u64..400,
    ) {
        let config = SimConfig {
            seed: Some(seed),
            exchange: rule,
            ..SimConfig::from_preset(preset)
        };
        let mut sim = SimulationLoop::new(&config)?;
        let bounds = sim.world().bounds();
        let total = sim.world().total_coins();
        let max = sim.world().max_coins();

        for _ in 0..ticks {
            sim.tick(sim.fixed_dt())?;
            prop_assert_eq!(sim.world().coin_sum(), total);
            for disk in sim.world().disks() {
                prop_assert!(disk.coins() <= max);
                prop_assert!(disk.is_contained(bounds), "escaped: {:?}", disk.pos());
            }
        }

        let snap = sim.stats().snapshot();
        prop_assert_eq!(snap.observations(), snap.collision_count * sim.world().disk_count() as u64);
    }

    #[test]
    fn isolated_collision_conserves_energy(
        angle in 0.0f32..std::f32::consts::TAU,
        gap in 1.0f32..79.0,
        va in (-500.0f32..500.0, -500.0f32..500.0),
        vb in (-500.0f32..500.0, -500.0f32..500.0),
        coins in (0u32..=4, 0u32..=4),
        seed in any::<u64>(),
    ) {
        let center = Vec2::new(400.0, 300.0);
        let offset = Vec2::from_angle(angle) * gap;
        let mut a = Disk::new(center, Vec2::new(va.0, va.1), 40.0, coins.0);
        let mut b = Disk::new(center + offset, Vec2::new(vb.0, vb.1), 40.0, coins.1);
        let energy = a.kinetic_energy() + b.kinetic_energy();

        let mut rng = Pcg32::seed_from_u64(seed);
        let outcome = resolve(&mut a, &mut b, ExchangeRule::Bernoulli, 8, &mut rng);

        prop_assert!(outcome.occurred);
        let after = a.kinetic_energy() + b.kinetic_energy();
        prop_assert!((after - energy).abs() <= 1e-4 * energy.max(1.0));
        prop_assert_eq!(a.coins() + b.coins(), coins.0 + coins.1);
    }

    #[test]
    fn pairs_at_or_beyond_contact_are_untouched(
        angle in 0.0f32..std::f32::consts::TAU,
        gap in 81.0f32..400.0,
        coins in (0u32..=4, 0u32..=4),
    ) {
        let center = Vec2::new(400.0, 300.0);
        let mut a = Disk::new(center, Vec2::new(10.0, -20.0), 40.0, coins.0);
        let mut b = Disk::new(center + Vec2::from_angle(angle) * gap, Vec2::new(-5.0, 7.0), 40.0, coins.1);
        let (a0, b0) = (a.clone(), b.clone());

        let outcome = resolve(&mut a, &mut b, ExchangeRule::UniformSplit, 8, &mut AlwaysMove);

        prop_assert!(!outcome.occurred);
        prop_assert_eq!(a, a0);
        prop_assert_eq!(b, b0);
    }
}
