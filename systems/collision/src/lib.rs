#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Collision system that pairs overlapping entities and requests resolutions.
//!
//! The pass works on a frozen [`CombatView`]. Damage is mirrored onto local
//! copies of every hull and shield so that a target destroyed earlier in the
//! pass is never matched again, each projectile strikes at most one target and
//! the player takes at most one hit per tick.

use starfall_core::{
    boss_ram_damage, enemy_ram_damage, strike, Aabb, BossId, Command, CombatView, EnemyId,
    HitOutcome, Hull, Shield, TargetRef,
};

#[derive(Clone, Copy, Debug)]
struct EnemyTarget {
    id: EnemyId,
    bounds: Aabb,
    hull: Hull,
}

#[derive(Clone, Copy, Debug)]
struct BossTarget {
    id: BossId,
    bounds: Aabb,
    hull: Hull,
    shield: Option<Shield>,
}

impl BossTarget {
    fn strike(&mut self, damage: u32) -> HitOutcome {
        strike(&mut self.hull, self.shield.as_mut(), damage)
    }
}

/// Pure system that emits resolution commands for overlapping entities.
#[derive(Debug, Default)]
pub struct Collision {
    enemies: Vec<EnemyTarget>,
    spent: Vec<bool>,
}

impl Collision {
    /// Creates a collision system with empty scratch buffers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Tests every relevant pair in `view` and emits one command per match.
    pub fn handle(&mut self, view: &CombatView, out: &mut Vec<Command>) {
        self.enemies.clear();
        self.enemies
            .extend(view.enemies.iter().map(|enemy| EnemyTarget {
                id: enemy.id,
                bounds: enemy.bounds,
                hull: enemy.hull,
            }));
        self.spent.clear();
        self.spent.resize(view.projectiles.len(), false);
        let mut boss = view.boss.map(|boss| BossTarget {
            id: boss.id,
            bounds: boss.bounds,
            hull: boss.hull,
            shield: boss.shield,
        });

        self.projectiles_against_enemies(view, out);
        if let Some(boss) = boss.as_mut() {
            self.projectiles_against_boss(view, boss, out);
        }

        let player = &view.player;
        let mut player_hit = player.invulnerable;
        let speed = player.velocity.length();

        if !player_hit {
            if let Some(enemy) = self
                .enemies
                .iter_mut()
                .find(|enemy| !enemy.hull.is_destroyed() && enemy.bounds.overlaps(&player.bounds))
            {
                let _ = enemy.hull.damage(enemy_ram_damage(speed));
                out.push(Command::ResolveRam {
                    target: TargetRef::Enemy(enemy.id),
                });
                player_hit = true;
            }
        }

        if !player_hit {
            if let Some(boss) = boss
                .as_mut()
                .filter(|boss| !boss.hull.is_destroyed() && boss.bounds.overlaps(&player.bounds))
            {
                let _ = boss.strike(boss_ram_damage(speed));
                out.push(Command::ResolveRam {
                    target: TargetRef::Boss(boss.id),
                });
                player_hit = true;
            }
        }

        for power_up in &view.power_ups {
            if power_up.bounds.overlaps(&player.bounds) {
                out.push(Command::CollectPowerUp {
                    power_up: power_up.id,
                });
            }
        }

        if !player_hit {
            let center = player.bounds.center();
            let reach = player.bounds.size.x * 0.5;
            if let Some(shot) = view
                .hostile_projectiles
                .iter()
                .find(|shot| shot.position.distance(center) < reach + shot.size * 0.5)
            {
                out.push(Command::ResolveHostileHit {
                    projectile: shot.id,
                });
            }
        }
    }

    fn projectiles_against_enemies(&mut self, view: &CombatView, out: &mut Vec<Command>) {
        for (projectile, spent) in view.projectiles.iter().zip(self.spent.iter_mut()) {
            let Some(enemy) = self.enemies.iter_mut().find(|enemy| {
                !enemy.hull.is_destroyed() && enemy.bounds.overlaps(&projectile.bounds)
            }) else {
                continue;
            };
            let _ = enemy.hull.damage(projectile.damage);
            *spent = true;
            out.push(Command::ResolveProjectileHit {
                projectile: projectile.id,
                target: TargetRef::Enemy(enemy.id),
            });
        }
    }

    fn projectiles_against_boss(
        &mut self,
        view: &CombatView,
        boss: &mut BossTarget,
        out: &mut Vec<Command>,
    ) {
        for (projectile, spent) in view.projectiles.iter().zip(self.spent.iter_mut()) {
            if boss.hull.is_destroyed() {
                return;
            }
            if *spent || !boss.bounds.overlaps(&projectile.bounds) {
                continue;
            }
            let _ = boss.strike(projectile.damage);
            *spent = true;
            out.push(Command::ResolveProjectileHit {
                projectile: projectile.id,
                target: TargetRef::Boss(boss.id),
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec2;
    use starfall_core::{
        BossPhase, BossSnapshot, EnemyKind, EnemySnapshot, HostileProjectileId,
        HostileProjectileSnapshot, PlayerSnapshot, PowerUpId, PowerUpKind, PowerUpSnapshot,
        ProjectileId, ProjectileSnapshot, WeaponKind,
    };

    use super::*;

    fn player_at(origin: Vec2) -> PlayerSnapshot {
        PlayerSnapshot {
            bounds: Aabb::new(origin, Vec2::new(36.0, 48.0)),
            velocity: Vec2::ZERO,
            invulnerable: false,
            health: 100,
            lives: 3,
            weapon: WeaponKind::Basic,
        }
    }

    fn view() -> CombatView {
        CombatView {
            player: player_at(Vec2::new(382.0, 532.0)),
            enemies: Vec::new(),
            boss: None,
            projectiles: Vec::new(),
            hostile_projectiles: Vec::new(),
            power_ups: Vec::new(),
        }
    }

    fn enemy(id: u32, origin: Vec2, health: u32) -> EnemySnapshot {
        EnemySnapshot {
            id: EnemyId::new(id),
            kind: EnemyKind::Small,
            bounds: Aabb::new(origin, Vec2::new(24.0, 24.0)),
            hull: Hull::new(health),
        }
    }

    fn projectile(id: u32, origin: Vec2) -> ProjectileSnapshot {
        ProjectileSnapshot {
            id: ProjectileId::new(id),
            bounds: Aabb::new(origin, Vec2::new(4.0, 10.0)),
            damage: 10,
        }
    }

    #[test]
    fn projectile_strikes_only_the_first_overlapping_enemy() {
        let mut view = view();
        view.enemies = vec![
            enemy(1, Vec2::new(100.0, 100.0), 15),
            enemy(2, Vec2::new(105.0, 100.0), 15),
        ];
        view.projectiles = vec![projectile(7, Vec2::new(110.0, 105.0))];

        let mut out = Vec::new();
        Collision::new().handle(&view, &mut out);
        assert_eq!(
            out,
            vec![Command::ResolveProjectileHit {
                projectile: ProjectileId::new(7),
                target: TargetRef::Enemy(EnemyId::new(1)),
            }]
        );
    }

    #[test]
    fn destroyed_targets_are_not_matched_again() {
        let mut view = view();
        view.enemies = vec![
            enemy(1, Vec2::new(100.0, 100.0), 15),
            enemy(2, Vec2::new(105.0, 100.0), 15),
        ];
        view.projectiles = (0..3)
            .map(|id| projectile(id, Vec2::new(110.0, 105.0)))
            .collect();

        let mut out = Vec::new();
        Collision::new().handle(&view, &mut out);
        let targets: Vec<_> = out
            .iter()
            .filter_map(|command| match command {
                Command::ResolveProjectileHit { target, .. } => Some(*target),
                _ => None,
            })
            .collect();
        assert_eq!(
            targets,
            vec![
                TargetRef::Enemy(EnemyId::new(1)),
                TargetRef::Enemy(EnemyId::new(1)),
                TargetRef::Enemy(EnemyId::new(2)),
            ]
        );
    }

    #[test]
    fn boss_takes_hits_until_destroyed() {
        let mut view = view();
        view.boss = Some(BossSnapshot {
            id: BossId::new(3),
            level: 1,
            bounds: Aabb::new(Vec2::new(300.0, 50.0), Vec2::new(200.0, 150.0)),
            hull: Hull::new(15),
            shield: None,
            phase: BossPhase::Attack,
        });
        view.projectiles = (0..3)
            .map(|id| projectile(id, Vec2::new(350.0, 100.0)))
            .collect();

        let mut out = Vec::new();
        Collision::new().handle(&view, &mut out);
        assert_eq!(out.len(), 2, "third projectile passes through the wreck");
    }

    #[test]
    fn invulnerable_player_still_collects_power_ups() {
        let mut view = view();
        view.player.invulnerable = true;
        view.enemies = vec![enemy(1, Vec2::new(390.0, 540.0), 15)];
        view.power_ups = vec![PowerUpSnapshot {
            id: PowerUpId::new(4),
            kind: PowerUpKind::Health,
            bounds: Aabb::new(Vec2::new(385.0, 540.0), Vec2::new(20.0, 20.0)),
        }];

        let mut out = Vec::new();
        Collision::new().handle(&view, &mut out);
        assert_eq!(
            out,
            vec![Command::CollectPowerUp {
                power_up: PowerUpId::new(4)
            }]
        );
    }

    #[test]
    fn player_takes_one_hit_per_tick() {
        let mut view = view();
        view.enemies = vec![
            enemy(1, Vec2::new(390.0, 540.0), 30),
            enemy(2, Vec2::new(395.0, 545.0), 30),
        ];
        view.hostile_projectiles = vec![HostileProjectileSnapshot {
            id: HostileProjectileId::new(9),
            position: Vec2::new(400.0, 556.0),
            size: 8.0,
        }];

        let mut out = Vec::new();
        Collision::new().handle(&view, &mut out);
        assert_eq!(
            out,
            vec![Command::ResolveRam {
                target: TargetRef::Enemy(EnemyId::new(1))
            }]
        );
    }

    #[test]
    fn hostile_projectiles_use_a_circle_test() {
        let mut view = view();
        let center = view.player.bounds.center();
        view.hostile_projectiles = vec![
            HostileProjectileSnapshot {
                id: HostileProjectileId::new(1),
                position: center + Vec2::new(23.0, 0.0),
                size: 8.0,
            },
            HostileProjectileSnapshot {
                id: HostileProjectileId::new(2),
                position: center + Vec2::new(21.0, 0.0),
                size: 8.0,
            },
        ];

        let mut out = Vec::new();
        Collision::new().handle(&view, &mut out);
        assert_eq!(
            out,
            vec![Command::ResolveHostileHit {
                projectile: HostileProjectileId::new(2)
            }]
        );
    }
}
