use glam::Vec2;
use starfall_core::{Aabb, MissileId, Playfield, TargetRef};

const SIZE: Vec2 = Vec2::new(6.0, 15.0);
const SPEED: f32 = 5.0;
const LIFETIME: u32 = 300;
const ACQUISITION_RADIUS: f32 = 500.0;
const OFF_FIELD_MARGIN: f32 = 50.0;
const BLAST_RADIUS: f32 = 80.0;
const BLAST_DAMAGE: f32 = 25.0;

/// Damage dealt to the target a missile strikes directly.
pub(crate) const DIRECT_DAMAGE: u32 = 50;

/// Something a missile can home in on.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Quarry {
    pub(crate) target: TargetRef,
    pub(crate) bounds: Aabb,
}

/// Outcome of advancing a missile by one tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Flight {
    Cruising,
    Detonated { struck: Option<TargetRef> },
    Lost,
}

#[derive(Clone, Debug)]
pub(crate) struct Missile {
    pub(crate) id: MissileId,
    pub(crate) bounds: Aabb,
    pub(crate) target: Option<TargetRef>,
    pub(crate) lifetime: u32,
    pub(crate) marked: bool,
}

impl Missile {
    pub(crate) fn new(id: MissileId, launch: Vec2, target: Option<TargetRef>) -> Self {
        Self {
            id,
            bounds: Aabb::new(launch, SIZE),
            target,
            lifetime: LIFETIME,
            marked: false,
        }
    }

    /// Blast centre of the missile.
    pub(crate) fn position(&self) -> Vec2 {
        self.bounds.origin
    }

    /// Steers toward the held target, re-acquiring one when it is gone.
    pub(crate) fn advance(&mut self, quarries: &[Quarry], playfield: &Playfield) -> Flight {
        if self.marked {
            return Flight::Lost;
        }

        self.lifetime = self.lifetime.saturating_sub(1);
        if self.lifetime == 0 {
            self.marked = true;
            return Flight::Detonated { struck: None };
        }

        let held = self
            .target
            .and_then(|target| quarries.iter().find(|quarry| quarry.target == target));
        let quarry = match held {
            Some(quarry) => Some(*quarry),
            None => self.acquire(quarries),
        };
        self.target = quarry.map(|quarry| quarry.target);

        match quarry {
            Some(quarry) => {
                let offset = quarry.bounds.center() - self.position();
                if offset.length_squared() > 0.0 {
                    self.bounds.origin += offset.normalize() * SPEED;
                }
                if self.bounds.overlaps(&quarry.bounds) {
                    self.marked = true;
                    return Flight::Detonated {
                        struck: Some(quarry.target),
                    };
                }
            }
            None => self.bounds.origin.y -= SPEED,
        }

        let Vec2 { x, y } = self.bounds.origin;
        if y < -OFF_FIELD_MARGIN
            || y > playfield.height() + OFF_FIELD_MARGIN
            || x < -OFF_FIELD_MARGIN
            || x > playfield.width() + OFF_FIELD_MARGIN
        {
            self.marked = true;
            return Flight::Lost;
        }
        Flight::Cruising
    }

    fn acquire(&self, quarries: &[Quarry]) -> Option<Quarry> {
        let position = self.position();
        quarries
            .iter()
            .map(|quarry| (quarry, quarry.bounds.center().distance(position)))
            .filter(|(_, distance)| *distance < ACQUISITION_RADIUS)
            .min_by(|(_, a), (_, b)| a.total_cmp(b))
            .map(|(quarry, _)| *quarry)
    }
}

/// Splash damage at `distance` from a blast, if within the blast radius.
pub(crate) fn blast_damage(distance: f32) -> Option<u32> {
    if distance >= BLAST_RADIUS {
        return None;
    }
    let falloff = (1.0 - distance / BLAST_RADIUS).max(0.0);
    Some((BLAST_DAMAGE * falloff).floor() as u32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use starfall_core::{BossId, EnemyId};

    fn quarry(target: TargetRef, x: f32, y: f32) -> Quarry {
        Quarry {
            target,
            bounds: Aabb::new(Vec2::new(x, y), Vec2::splat(24.0)),
        }
    }

    #[test]
    fn unguided_missile_detonates_at_end_of_lifetime() {
        let playfield = Playfield::new(800.0, 100_000.0);
        let mut missile = Missile::new(MissileId::new(0), Vec2::new(100.0, 90_000.0), None);
        let mut ticks = 0;
        let flight = loop {
            ticks += 1;
            match missile.advance(&[], &playfield) {
                Flight::Cruising => continue,
                other => break other,
            }
        };
        assert_eq!(flight, Flight::Detonated { struck: None });
        assert_eq!(ticks, LIFETIME);
    }

    #[test]
    fn reacquires_nearest_when_target_vanishes() {
        let playfield = Playfield::new(800.0, 600.0);
        let near = TargetRef::Enemy(EnemyId::new(2));
        let far = TargetRef::Boss(BossId::new(0));
        let mut missile = Missile::new(
            MissileId::new(0),
            Vec2::new(100.0, 500.0),
            Some(TargetRef::Enemy(EnemyId::new(9))),
        );
        let quarries = [quarry(far, 600.0, 100.0), quarry(near, 100.0, 300.0)];
        assert_eq!(missile.advance(&quarries, &playfield), Flight::Cruising);
        assert_eq!(missile.target, Some(near));
    }

    #[test]
    fn ignores_targets_beyond_acquisition_radius() {
        let playfield = Playfield::new(2_000.0, 2_000.0);
        let mut missile = Missile::new(MissileId::new(0), Vec2::new(0.0, 1_900.0), None);
        let quarries = [quarry(TargetRef::Enemy(EnemyId::new(1)), 1_500.0, 0.0)];
        let _ = missile.advance(&quarries, &playfield);
        assert_eq!(missile.target, None);
        assert_eq!(missile.bounds.origin, Vec2::new(0.0, 1_895.0));
    }

    #[test]
    fn contact_detonates_on_held_target() {
        let playfield = Playfield::new(800.0, 600.0);
        let enemy = TargetRef::Enemy(EnemyId::new(4));
        let mut missile = Missile::new(MissileId::new(0), Vec2::new(100.0, 140.0), Some(enemy));
        let quarries = [quarry(enemy, 95.0, 100.0)];
        let mut flight = Flight::Cruising;
        for _ in 0..20 {
            flight = missile.advance(&quarries, &playfield);
            if flight != Flight::Cruising {
                break;
            }
        }
        assert_eq!(
            flight,
            Flight::Detonated {
                struck: Some(enemy)
            }
        );
    }

    #[test]
    fn blast_damage_falls_off_linearly() {
        assert_eq!(blast_damage(0.0), Some(25));
        assert_eq!(blast_damage(40.0), Some(12));
        assert_eq!(blast_damage(79.0), Some(0));
        assert_eq!(blast_damage(80.0), None);
    }
}
