use std::time::Duration;

use engine::rng::Rng;
use engine::timer::{Delay, Interval};
use serde::{Deserialize, Serialize};

use crate::config::ParticleSettings;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Flower {
    CherryBlossom,
    Hibiscus,
    Blossom,
    Rosette,
    Bouquet,
    Rose,
}

impl Flower {
    pub const ALL: [Flower; 6] = [
        Flower::CherryBlossom,
        Flower::Hibiscus,
        Flower::Blossom,
        Flower::Rosette,
        Flower::Bouquet,
        Flower::Rose,
    ];

    pub fn glyph(self) -> &'static str {
        match self {
            Flower::CherryBlossom => "\u{1F338}",
            Flower::Hibiscus => "\u{1F33A}",
            Flower::Blossom => "\u{1F33C}",
            Flower::Rosette => "\u{1F3F5}\u{FE0F}",
            Flower::Bouquet => "\u{1F490}",
            Flower::Rose => "\u{1F339}",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Particle {
    pub id: u64,
    pub flower: Flower,
    /// Horizontal position as a percentage of the container width.
    pub left_percent: f32,
    pub size_rem: f32,
    #[serde(rename = "duration_ms", with = "crate::serde_millis")]
    pub duration: Duration,
    #[serde(rename = "delay_ms", with = "crate::serde_millis")]
    pub delay: Duration,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ParticleEffect {
    Spawn(Particle),
    Remove { id: u64 },
}

/// Spawns decorative floating flowers: a staggered burst at start, then one
/// per interval. Each flower removes itself once its animation is over.
#[derive(Debug, Clone)]
pub struct ParticleSpawner {
    settings: ParticleSettings,
    rng: Rng,
    next_id: u64,
    burst_left: u32,
    burst_timer: Delay,
    interval: Interval,
    live: Vec<(u64, Delay)>,
    spawning: bool,
}

impl ParticleSpawner {
    pub fn new(settings: ParticleSettings) -> Self {
        Self {
            rng: Rng::new(settings.seed),
            next_id: 0,
            burst_left: 0,
            burst_timer: Delay::new(Duration::ZERO),
            interval: Interval::new(settings.spawn_interval),
            live: Vec::new(),
            spawning: settings.enabled,
            settings,
        }
    }

    pub fn live_count(&self) -> usize {
        self.live.len()
    }

    pub fn is_spawning(&self) -> bool {
        self.spawning
    }

    /// Stops new spawns. Flowers already on screen still expire normally.
    pub fn stop(&mut self) {
        if self.spawning {
            tracing::info!(live = self.live.len(), "particle spawner stopped");
        }
        self.spawning = false;
        self.burst_left = 0;
    }

    /// Spawns the first burst flower immediately and schedules the rest.
    pub fn start(&mut self) -> Vec<ParticleEffect> {
        if !self.spawning || self.settings.burst_count == 0 {
            return Vec::new();
        }
        self.burst_left = self.settings.burst_count - 1;
        self.burst_timer = Delay::new(self.settings.burst_stagger);
        vec![self.spawn()]
    }

    pub fn advance(&mut self, dt: Duration) -> Vec<ParticleEffect> {
        let mut out = Vec::new();

        self.live.retain_mut(|(id, lifetime)| {
            if lifetime.tick(dt).is_some() {
                out.push(ParticleEffect::Remove { id: *id });
                false
            } else {
                true
            }
        });

        if !self.spawning {
            return out;
        }

        let mut left = dt;
        while self.burst_left > 0 {
            let Some(overshoot) = self.burst_timer.tick(left) else {
                break;
            };
            left = overshoot;
            self.burst_left -= 1;
            self.burst_timer = Delay::new(self.settings.burst_stagger);
            out.push(self.spawn());
        }

        for _ in 0..self.interval.tick(dt) {
            out.push(self.spawn());
        }
        out
    }

    fn spawn(&mut self) -> ParticleEffect {
        let id = self.next_id;
        self.next_id += 1;

        let flower = Flower::ALL[self.rng.below(Flower::ALL.len())];
        let particle = Particle {
            id,
            flower,
            left_percent: self.rng.range_f32(0.0, 100.0),
            size_rem: self.rng.range_f32(1.0, 3.0),
            duration: Duration::from_secs_f32(self.rng.range_f32(15.0, 30.0)),
            delay: Duration::from_secs_f32(self.rng.range_f32(0.0, 2.0)),
        };
        self.live
            .push((id, Delay::new(particle.duration + self.settings.linger)));
        tracing::trace!(id, ?flower, "particle spawned");
        ParticleEffect::Spawn(particle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spawned(effects: &[ParticleEffect]) -> usize {
        effects
            .iter()
            .filter(|e| matches!(e, ParticleEffect::Spawn(_)))
            .count()
    }

    #[test]
    fn burst_is_staggered() {
        let mut spawner = ParticleSpawner::new(ParticleSettings::default());
        assert_eq!(spawned(&spawner.start()), 1);
        assert_eq!(spawned(&spawner.advance(Duration::from_millis(399))), 0);
        assert_eq!(spawned(&spawner.advance(Duration::from_millis(1))), 1);
        // Remaining eight land at 800..=3600 ms.
        assert_eq!(spawned(&spawner.advance(Duration::from_millis(3200))), 8);
        assert_eq!(spawner.live_count(), 10);
    }

    #[test]
    fn interval_keeps_spawning_after_burst() {
        let mut spawner = ParticleSpawner::new(ParticleSettings::default());
        spawner.start();
        spawner.advance(Duration::from_millis(3999));
        assert_eq!(spawned(&spawner.advance(Duration::from_millis(1))), 1);
        assert_eq!(spawned(&spawner.advance(Duration::from_millis(4000))), 1);
    }

    #[test]
    fn flowers_expire_after_animation_and_linger() {
        let settings = ParticleSettings {
            burst_count: 1,
            spawn_interval: Duration::from_secs(3600),
            ..ParticleSettings::default()
        };
        let mut spawner = ParticleSpawner::new(settings);
        let first = spawner.start();
        let ParticleEffect::Spawn(particle) = first[0] else {
            panic!("expected a spawn");
        };
        assert!((0.0..=100.0).contains(&particle.left_percent));
        assert!((1.0..=3.0).contains(&particle.size_rem));

        let lifetime = particle.duration + settings.linger;
        assert!(spawner.advance(lifetime - Duration::from_millis(1)).is_empty());
        assert_eq!(
            spawner.advance(Duration::from_millis(1)),
            vec![ParticleEffect::Remove { id: particle.id }]
        );
        assert_eq!(spawner.live_count(), 0);
    }

    #[test]
    fn stop_halts_spawning_but_not_expiry() {
        let mut spawner = ParticleSpawner::new(ParticleSettings::default());
        spawner.start();
        spawner.stop();
        assert_eq!(spawned(&spawner.advance(Duration::from_secs(8))), 0);
        let removed = spawner.advance(Duration::from_secs(60));
        assert_eq!(removed, vec![ParticleEffect::Remove { id: 0 }]);
    }

    #[test]
    fn disabled_spawner_is_silent() {
        let mut spawner = ParticleSpawner::new(ParticleSettings {
            enabled: false,
            ..ParticleSettings::default()
        });
        assert!(spawner.start().is_empty());
        assert!(spawner.advance(Duration::from_secs(60)).is_empty());
    }
}
