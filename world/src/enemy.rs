use glam::Vec2;
use rand::Rng;
use starfall_core::{
    Aabb, DifficultyScale, EnemyId, EnemyKind, EnemySnapshot, HitOutcome, Hull, MovementPattern,
    Playfield,
};

use crate::projectile::{HostileProjectile, Shot};

const FLASH_TICKS: u32 = 5;
const ZIGZAG_PERIOD: u32 = 30;
const ZIGZAG_LATERAL_FACTOR: f32 = 1.5;
const CHASE_FACTOR: f32 = 0.7;
const LARGE_FIRE_INTERVAL: u32 = 120;
const LARGE_SHOT_SPEED: f32 = 4.0;
const LARGE_SHOT_SIZE: f32 = 6.0;

#[derive(Clone, Copy, Debug)]
enum Motion {
    Straight,
    Zigzag { direction: f32, timer: u32 },
    Sine { origin_x: f32, amplitude: f32, frequency: f32 },
    Chase,
}

/// Regular enemy or boss minion.
#[derive(Clone, Debug)]
pub(crate) struct Enemy {
    pub(crate) id: EnemyId,
    pub(crate) kind: EnemyKind,
    pub(crate) bounds: Aabb,
    pub(crate) hull: Hull,
    pub(crate) score: u32,
    pub(crate) projectiles: Vec<HostileProjectile>,
    pub(crate) marked: bool,
    speed: f32,
    motion: Motion,
    flash: u32,
    fire_timer: u32,
}

impl Enemy {
    pub(crate) fn new<R: Rng>(
        id: EnemyId,
        kind: EnemyKind,
        position: Vec2,
        scale: DifficultyScale,
        pattern: Option<MovementPattern>,
        rng: &mut R,
    ) -> Self {
        let stats = kind.stats();
        let pattern = pattern.unwrap_or_else(|| MovementPattern::from_roll(rng.gen::<f32>()));
        let motion = match pattern {
            MovementPattern::Straight => Motion::Straight,
            MovementPattern::Zigzag => Motion::Zigzag {
                direction: 1.0,
                timer: 0,
            },
            MovementPattern::Sine => Motion::Sine {
                origin_x: position.x,
                amplitude: rng.gen_range(50.0..110.0),
                frequency: rng.gen_range(0.03..0.07),
            },
            MovementPattern::Chase => Motion::Chase,
        };

        Self {
            id,
            kind,
            bounds: Aabb::new(position, stats.size),
            hull: Hull::new(scale.scale_health(stats.health)),
            score: scale.scale_score(stats.score),
            projectiles: Vec::new(),
            marked: false,
            speed: scale.scale_speed(stats.speed),
            motion,
            flash: 0,
            fire_timer: 0,
        }
    }

    pub(crate) fn pattern(&self) -> MovementPattern {
        match self.motion {
            Motion::Straight => MovementPattern::Straight,
            Motion::Zigzag { .. } => MovementPattern::Zigzag,
            Motion::Sine { .. } => MovementPattern::Sine,
            Motion::Chase => MovementPattern::Chase,
        }
    }

    /// Moves the enemy one tick and returns a shot when a large enemy fires.
    pub(crate) fn advance(&mut self, player_center_x: f32, playfield: &Playfield) -> Option<Shot> {
        for projectile in &mut self.projectiles {
            projectile.advance(playfield);
        }

        self.flash = self.flash.saturating_sub(1);
        self.bounds.origin.y += self.speed;

        let max_x = (playfield.width() - self.bounds.size.x).max(0.0);
        match &mut self.motion {
            Motion::Straight => {}
            Motion::Zigzag { direction, timer } => {
                *timer += 1;
                if *timer >= ZIGZAG_PERIOD {
                    *direction = -*direction;
                    *timer = 0;
                }
                self.bounds.origin.x += self.speed * ZIGZAG_LATERAL_FACTOR * *direction;
                if self.bounds.origin.x <= 0.0 {
                    *direction = 1.0;
                }
                if self.bounds.origin.x >= max_x {
                    *direction = -1.0;
                }
            }
            Motion::Sine {
                origin_x,
                amplitude,
                frequency,
            } => {
                let sway = (self.bounds.origin.y * *frequency).sin() * *amplitude;
                self.bounds.origin.x = (*origin_x + sway).clamp(0.0, max_x);
            }
            Motion::Chase => {
                let center_x = self.bounds.center().x;
                let step = self.speed * CHASE_FACTOR;
                if center_x < player_center_x {
                    self.bounds.origin.x += step;
                } else if center_x > player_center_x {
                    self.bounds.origin.x -= step;
                }
                self.bounds.origin.x = self.bounds.origin.x.clamp(0.0, max_x);
            }
        }

        if self.kind != EnemyKind::Large {
            return None;
        }
        self.fire_timer += 1;
        if self.fire_timer < LARGE_FIRE_INTERVAL || self.bounds.origin.y < 0.0 {
            return None;
        }
        self.fire_timer = 0;
        let muzzle = Vec2::new(
            self.bounds.center().x,
            self.bounds.origin.y + self.bounds.size.y,
        );
        Some(Shot {
            position: muzzle,
            velocity: Vec2::new(0.0, self.speed + LARGE_SHOT_SPEED),
            size: LARGE_SHOT_SIZE,
        })
    }

    pub(crate) fn has_escaped(&self, playfield: &Playfield) -> bool {
        self.bounds.origin.y > playfield.height()
    }

    pub(crate) fn hit(&mut self, damage: u32) -> HitOutcome {
        self.flash = FLASH_TICKS;
        let outcome = self.hull.damage(damage);
        if outcome == HitOutcome::Killed {
            self.marked = true;
        }
        outcome
    }

    pub(crate) fn snapshot(&self) -> EnemySnapshot {
        EnemySnapshot {
            id: self.id,
            kind: self.kind,
            bounds: self.bounds,
            hull: self.hull,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn enemy(kind: EnemyKind, pattern: MovementPattern, x: f32) -> Enemy {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        Enemy::new(
            EnemyId::new(1),
            kind,
            Vec2::new(x, 0.0),
            DifficultyScale::UNIT,
            Some(pattern),
            &mut rng,
        )
    }

    #[test]
    fn lethal_hit_marks_enemy() {
        let mut small = enemy(EnemyKind::Small, MovementPattern::Straight, 10.0);
        assert_eq!(small.hull.health(), 15);
        assert_eq!(small.hit(20), HitOutcome::Killed);
        assert!(small.marked);
        assert_eq!(small.hull.health(), 0);
    }

    #[test]
    fn zigzag_flips_direction_on_period() {
        let playfield = Playfield::new(800.0, 600.0);
        let mut zig = enemy(EnemyKind::Small, MovementPattern::Zigzag, 300.0);
        for _ in 0..29 {
            let _ = zig.advance(0.0, &playfield);
        }
        let rightmost = zig.bounds.origin.x;
        assert!(rightmost > 300.0);
        let _ = zig.advance(0.0, &playfield);
        assert!(zig.bounds.origin.x < rightmost);
    }

    #[test]
    fn chase_drifts_toward_player_and_stays_inside() {
        let playfield = Playfield::new(200.0, 600.0);
        let mut chaser = enemy(EnemyKind::Medium, MovementPattern::Chase, 100.0);
        for _ in 0..200 {
            let _ = chaser.advance(500.0, &playfield);
        }
        assert_eq!(chaser.bounds.origin.x, 200.0 - 32.0);
    }

    #[test]
    fn large_enemies_fire_downward() {
        let playfield = Playfield::new(800.0, 2_000.0);
        let mut large = enemy(EnemyKind::Large, MovementPattern::Straight, 100.0);
        let shots: Vec<Shot> = (0..LARGE_FIRE_INTERVAL)
            .filter_map(|_| large.advance(0.0, &playfield))
            .collect();
        assert_eq!(shots.len(), 1);
        assert!(shots[0].velocity.y > 0.0);
    }

    #[test]
    fn enemy_below_the_field_has_escaped() {
        let playfield = Playfield::new(800.0, 10.0);
        let mut small = enemy(EnemyKind::Small, MovementPattern::Straight, 0.0);
        let _ = small.advance(0.0, &playfield);
        let _ = small.advance(0.0, &playfield);
        assert!(!small.has_escaped(&playfield));
        let _ = small.advance(0.0, &playfield);
        assert!(small.has_escaped(&playfield));
    }
}
