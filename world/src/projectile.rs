use glam::Vec2;
use starfall_core::{
    Aabb, HostileProjectileId, HostileProjectileSnapshot, Playfield, ProjectileId,
    ProjectileSnapshot,
};

/// Player projectile travelling along a fixed velocity.
#[derive(Clone, Debug)]
pub(crate) struct Projectile {
    pub(crate) id: ProjectileId,
    pub(crate) bounds: Aabb,
    pub(crate) velocity: Vec2,
    pub(crate) damage: u32,
    pub(crate) marked: bool,
}

impl Projectile {
    pub(crate) fn advance(&mut self, playfield: &Playfield) {
        if self.marked {
            return;
        }
        self.bounds.origin += self.velocity;
        let origin = self.bounds.origin;
        if origin.y < -self.bounds.size.y
            || origin.x < -self.bounds.size.x
            || origin.x > playfield.width()
        {
            self.marked = true;
        }
    }

    pub(crate) fn snapshot(&self) -> ProjectileSnapshot {
        ProjectileSnapshot {
            id: self.id,
            bounds: self.bounds,
            damage: self.damage,
        }
    }
}

/// Round fired at the player by the boss or a large enemy.
#[derive(Clone, Debug)]
pub(crate) struct HostileProjectile {
    pub(crate) id: HostileProjectileId,
    pub(crate) position: Vec2,
    pub(crate) velocity: Vec2,
    pub(crate) size: f32,
    pub(crate) marked: bool,
}

impl HostileProjectile {
    pub(crate) fn advance(&mut self, playfield: &Playfield) {
        if self.marked {
            return;
        }
        self.position += self.velocity;
        let Vec2 { x, y } = self.position;
        if y > playfield.height() || y < -self.size || x < 0.0 || x > playfield.width() {
            self.marked = true;
        }
    }

    pub(crate) fn snapshot(&self) -> HostileProjectileSnapshot {
        HostileProjectileSnapshot {
            id: self.id,
            position: self.position,
            size: self.size,
        }
    }
}

/// Blueprint for a hostile projectile before the world assigns an identifier.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Shot {
    pub(crate) position: Vec2,
    pub(crate) velocity: Vec2,
    pub(crate) size: f32,
}
