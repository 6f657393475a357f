//! One play session: the player, the enemy, the road and the score, stepped
//! together at fixed dt. Keeping this free of window and GPU types means the
//! whole simulation is exercisable from plain unit tests.

use crate::collision::collides;
use crate::enemy::EnemyCar;
use crate::player::{MoveIntent, PlayerCar};
use crate::road::Road;
use crate::sprite::CarModel;
use lr_core::geometry::RoadGeometry;
use lr_core::score::ScoreTimer;
use lr_core::time::FIXED_DT;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    Running,
    /// The cars' opaque silhouettes touched this tick. Edge event: the caller
    /// transitions to game-over; the session itself keeps no such state.
    Collision,
}

pub struct GameSession {
    pub geometry: RoadGeometry,
    pub player: PlayerCar,
    pub enemy: EnemyCar,
    pub road: Road,
    pub score: ScoreTimer,
    assets_dir: PathBuf,
}

impl GameSession {
    pub fn new(assets_dir: &Path, model: CarModel, viewport: (u32, u32)) -> Self {
        let geometry = RoadGeometry::resolve(viewport.0, viewport.1);
        let player = PlayerCar::new(assets_dir, model, &geometry);
        let enemy = EnemyCar::new(assets_dir, &geometry);
        let road = Road::load(
            assets_dir,
            (geometry.viewport_width, geometry.viewport_height),
        );
        Self {
            geometry,
            player,
            enemy,
            road,
            score: ScoreTimer::new(),
            assets_dir: assets_dir.to_path_buf(),
        }
    }

    /// One fixed step: move the player, drop the enemy, scroll the road,
    /// advance the score, then check collision, strictly in that order.
    pub fn tick(&mut self, intent: MoveIntent) -> SessionEvent {
        self.player.step(intent, &self.geometry);
        self.enemy.step(&self.geometry, self.score.score());
        self.road.step();
        self.score.tick(FIXED_DT);

        if collides(&self.player.collider(), &self.enemy.collider()) {
            SessionEvent::Collision
        } else {
            SessionEvent::Running
        }
    }

    /// Retry after game over: same cars, fresh score, player back at the
    /// bottom center, enemy respawned for the reset score tier.
    pub fn restart(&mut self) {
        self.score.reset();
        self.player.reset(&self.geometry);
        self.enemy.respawn(&self.geometry, 0);
    }

    pub fn set_player_model(&mut self, number: u8) {
        if let Some(model) = CarModel::new(number) {
            self.player.set_model(model, &self.geometry);
        }
    }

    /// Resize fan-out in the required order: geometry, road rescale, player
    /// remap, enemy remap. Must run before the next draw of the same frame.
    pub fn handle_resize(&mut self, width: u32, height: u32) {
        let old = self.geometry;
        self.geometry = RoadGeometry::resolve(width, height);
        self.road.handle_resize((
            self.geometry.viewport_width,
            self.geometry.viewport_height,
        ));
        self.player.handle_resize(&old, &self.geometry);
        self.enemy.handle_resize(&old, &self.geometry);
    }

    pub fn assets_dir(&self) -> &Path {
        &self.assets_dir
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_session() -> GameSession {
        // No assets present: both cars run on the 60x100 fallback sprite.
        GameSession::new(
            Path::new("/nonexistent/assets"),
            CarModel::default(),
            (800, 600),
        )
    }

    #[test]
    fn idle_ticks_advance_score_eventually() {
        let mut session = test_session();
        // Park the player in a corner so the falling enemy cannot reach it
        // while we advance a few seconds of simulation.
        session.player.x = session.geometry.lane_min_x();
        session.player.y = session.geometry.viewport_height as f32
            - session.player.height() as f32;
        session.enemy.x =
            (session.geometry.viewport_width - session.geometry.road_right) as f32
                - session.enemy.width() as f32;
        session.enemy.y = -(session.enemy.height() as f32);

        for _ in 0..61 {
            session.tick(MoveIntent::default());
        }
        assert!(session.score.score() >= 1);
    }

    #[test]
    fn overlapping_cars_report_collision() {
        let mut session = test_session();
        session.enemy.x = session.player.x;
        session.enemy.y = session.player.y;
        session.enemy.speed = 0.0;
        let event = session.tick(MoveIntent::default());
        assert_eq!(event, SessionEvent::Collision);
    }

    #[test]
    fn restart_resets_score_and_positions() {
        let mut session = test_session();
        for _ in 0..120 {
            session.score.tick(lr_core::time::FIXED_DT);
        }
        session.player.x = session.geometry.lane_min_x();
        session.restart();
        assert_eq!(session.score.score(), 0);
        assert!(session.enemy.y < 0.0);
        let expected_x =
            ((session.geometry.viewport_width - session.player.width()) / 2) as f32;
        assert_eq!(session.player.x, expected_x);
    }

    #[test]
    fn resize_updates_geometry_and_road() {
        let mut session = test_session();
        session.handle_resize(1024, 768);
        assert_eq!(session.geometry.viewport_width, 1024);
        assert_eq!(session.road.image.dimensions(), (1024, 768));
        assert!(session.player.x >= session.geometry.lane_min_x());
    }

    #[test]
    fn model_switch_ignores_out_of_range_digits() {
        let mut session = test_session();
        let before = session.player.model;
        session.set_player_model(9);
        assert_eq!(session.player.model, before);
        session.set_player_model(4);
        assert_eq!(session.player.model.number(), 4);
    }
}
