//! Deterministic opening formations for regular waves.

use std::f32::consts::{PI, TAU};

use glam::Vec2;
use starfall_core::{EnemyKind, Playfield};

const SMALL_HALF_WIDTH: f32 = 12.0;
const LARGE_HALF_WIDTH: f32 = 24.0;

/// Shape of the opening formation, chosen by `(wave - 1) mod 4`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Formation {
    /// A staggered horizontal line of small enemies.
    Line,
    /// Two diagonal wings alternating enemy types.
    Vee,
    /// A large enemy ringed by smaller ones, with an outer ring after wave 3.
    Circle,
    /// Rows and columns in a checkerboard of types.
    Grid,
}

impl Formation {
    /// Formation opening the provided wave.
    #[must_use]
    pub fn for_wave(wave: u32) -> Self {
        match wave.saturating_sub(1) % 4 {
            0 => Formation::Line,
            1 => Formation::Vee,
            2 => Formation::Circle,
            _ => Formation::Grid,
        }
    }

    /// Enemy kinds and top-left positions making up the formation.
    #[must_use]
    pub fn layout(self, wave: u32, playfield: &Playfield) -> Vec<(EnemyKind, Vec2)> {
        match self {
            Formation::Line => line(wave, playfield),
            Formation::Vee => vee(wave, playfield),
            Formation::Circle => circle(wave, playfield),
            Formation::Grid => grid(wave, playfield),
        }
    }
}

fn ring_count(wave: u32) -> u32 {
    8 + (wave / 2).min(6)
}

fn line(wave: u32, playfield: &Playfield) -> Vec<(EnemyKind, Vec2)> {
    let count = ring_count(wave);
    let spacing = playfield.width() / count as f32;
    (0..count)
        .map(|index| {
            let index = index as f32;
            let x = spacing * index + spacing * 0.5 - SMALL_HALF_WIDTH;
            (EnemyKind::Small, Vec2::new(x, -50.0 - index * 20.0))
        })
        .collect()
}

fn vee(wave: u32, playfield: &Playfield) -> Vec<(EnemyKind, Vec2)> {
    let rows = 4 + (wave / 3).min(4);
    let middle = playfield.width() * 0.5;
    let mut layout = Vec::with_capacity(rows as usize * 2);
    for row in 0..rows {
        let kind = EnemyKind::ALL[row as usize % EnemyKind::ALL.len()];
        let row = row as f32;
        let y = -50.0 - row * 20.0;
        layout.push((kind, Vec2::new(middle - 40.0 - row * 30.0, y)));
        layout.push((kind, Vec2::new(middle + 40.0 + row * 30.0, y)));
    }
    layout
}

fn circle(wave: u32, playfield: &Playfield) -> Vec<(EnemyKind, Vec2)> {
    let center = Vec2::new(playfield.width() * 0.5 - LARGE_HALF_WIDTH, -100.0);
    let mut layout = vec![(EnemyKind::Large, center)];

    let count = ring_count(wave);
    let radius = 80.0 + wave as f32 * 3.0;
    for index in 0..count {
        let angle = TAU / count as f32 * index as f32;
        let kind = if index % 3 == 0 {
            EnemyKind::Medium
        } else {
            EnemyKind::Small
        };
        layout.push((kind, center + Vec2::new(angle.cos(), angle.sin()) * radius));
    }

    if wave > 3 {
        let outer_radius = radius + 60.0;
        let outer_count = count + 4;
        let offset = PI / outer_count as f32;
        for index in 0..outer_count {
            let angle = TAU / outer_count as f32 * index as f32 + offset;
            layout.push((
                EnemyKind::Small,
                center + Vec2::new(angle.cos(), angle.sin()) * outer_radius,
            ));
        }
    }
    layout
}

fn grid(wave: u32, playfield: &Playfield) -> Vec<(EnemyKind, Vec2)> {
    let rows = 3 + (wave / 4).min(3);
    let columns = 4 + (wave / 3).min(3);
    let spacing = playfield.width() / columns as f32;
    let mut layout = Vec::with_capacity((rows * columns) as usize);
    for row in 0..rows {
        for column in 0..columns {
            let kind = if wave < 4 {
                if (row + column) % 2 == 0 {
                    EnemyKind::Small
                } else {
                    EnemyKind::Medium
                }
            } else {
                EnemyKind::ALL[((row + column) % 3) as usize]
            };
            let position = Vec2::new(
                column as f32 * spacing + 50.0,
                -150.0 + row as f32 * 40.0,
            );
            layout.push((kind, position));
        }
    }
    layout
}
