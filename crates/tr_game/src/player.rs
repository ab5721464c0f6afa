use tr_core::collision::CollisionGrid;
use tr_core::{CycleId, Entity, TextureLoader};

use crate::config::{CycleConfig, PlayerConfig};

/// Cycle handles registered on the player entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlayerCycles {
    pub idle: CycleId,
    pub run_left: CycleId,
    pub run_right: CycleId,
}

/// What the controller did on one tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StepOutcome {
    pub moved_x: i32,
    pub blocked: bool,
    pub switched_cycle: bool,
}

/// Walks the player left or right a fixed number of pixels per tick and keeps
/// the animation cycle in sync with the direction.
#[derive(Debug, Clone)]
pub struct PlayerController {
    pub speed: i32,
    pub cycles: PlayerCycles,
}

impl PlayerController {
    /// Build the player entity from config: sprite sheet, start rect and the
    /// three cycles. Starts in `idle`.
    pub fn spawn(
        config: &PlayerConfig,
        loader: &mut dyn TextureLoader,
    ) -> Result<(Entity, PlayerController), String> {
        let mut player = Entity::new();
        player.set_image(&config.sprite_sheet, loader);
        player.set_dest(config.start);

        let mut register = |cycle: CycleConfig| {
            player.register_cycle(
                cycle.row,
                config.frame_width,
                config.frame_height,
                cycle.frames,
                cycle.speed,
            )
        };
        let cycles = PlayerCycles {
            idle: register(config.idle),
            run_left: register(config.run_left),
            run_right: register(config.run_right),
        };
        player.select_cycle(cycles.idle)?;
        log::info!(
            "Player spawned at ({}, {}) with {} cycles",
            config.start.x,
            config.start.y,
            player.animator().cycle_count()
        );

        Ok((
            player,
            PlayerController {
                speed: config.speed,
                cycles,
            },
        ))
    }

    pub fn desired_cycle(&self, direction: i32) -> CycleId {
        match direction.signum() {
            -1 => self.cycles.run_left,
            1 => self.cycles.run_right,
            _ => self.cycles.idle,
        }
    }

    /// One tick of movement. `direction` is -1, 0 or 1. The player moves the
    /// full `speed` only if the destination is clear; otherwise it stays put.
    pub fn step(&self, player: &mut Entity, direction: i32, grid: &CollisionGrid) -> StepOutcome {
        let mut outcome = StepOutcome::default();

        let wanted = self.desired_cycle(direction);
        if player.current_cycle() != Some(wanted) {
            match player.select_cycle(wanted) {
                Ok(()) => outcome.switched_cycle = true,
                Err(err) => log::error!("Player cycle switch failed: {}", err),
            }
        }

        let dx = direction.signum() * self.speed;
        if dx != 0 {
            let dest = player.dest();
            if grid.map_collision(&dest, dx) {
                outcome.blocked = true;
            } else {
                player.set_dest(dest.translated(dx, 0));
                outcome.moved_x = dx;
            }
        }
        outcome
    }
}
