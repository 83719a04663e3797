use glam::{Mat4, Vec2, Vec3};
use serde::{Deserialize, Serialize};
use snake3d_common::{Direction, GridCell};
use snake3d_scene::{DrawableHandle, SceneChild, SceneError, SceneNode};
use std::collections::VecDeque;

use crate::board::Board;
use crate::interp::{GridProjection, interpolate_angle, interpolate_position};

/// Head cube edge, in half-pitch units.
const HEAD_SCALE: f32 = 1.0;
/// Body cube edge, in half-pitch units.
const BODY_SCALE: f32 = 1.7;
/// Height of the head's centre, in half-pitch units.
const HEAD_LIFT: f32 = 0.9;
/// Slot of the head transform node under the snake root.
const HEAD_SLOT: usize = 0;

/// Geometry for the snake's scene nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SnakeMeshes {
    pub head: DrawableHandle,
    pub body: DrawableHandle,
}

/// Why a collision was fatal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeathCause {
    OutOfBounds,
    Obstacle,
    Trail,
}

/// Result of checking the head cell after a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Collision {
    None,
    Dead(DeathCause),
    Ate,
}

/// Continuous draw pose of the head, in render space before world scaling.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnakePose {
    pub position: Vec2,
    pub angle_degrees: f32,
}

/// The player's snake.
///
/// The committed `position` only changes in `tick`. Between ticks the head
/// is drawn between `position` and `next_position`, and a queued turn
/// rotates the head from the moment it was queued until the tick commits it.
///
/// The trail holds the cells behind the head, nearest first, one per eaten
/// food. Its scene sub-graph is a root with the head node in slot 0 and one
/// body node per trail segment after it.
#[derive(Debug, Clone)]
pub struct Snake {
    position: GridCell,
    next_position: GridCell,
    heading: Direction,
    queued_heading: Direction,
    trail: VecDeque<GridCell>,
    trail_angles: VecDeque<f32>,
    current_angle: f32,
    turn_from_angle: f32,
    pending_angle: f32,
    turn_started_at: f32,
    projection: GridProjection,
    half_pitch: f32,
    meshes: SnakeMeshes,
    model: SceneNode,
}

impl Snake {
    /// A resting snake at the board centre with an empty trail.
    pub fn new(board: &Board, meshes: SnakeMeshes) -> Self {
        let half_pitch = board.pitch() / 2.0;
        let head = SceneNode::new("head_tr").with_child(SceneNode::leaf(
            "head",
            Mat4::from_scale(Vec3::splat(HEAD_SCALE * half_pitch)),
            meshes.head,
        ));
        let model = SceneNode::new("snake")
            .with_transform(Mat4::from_scale(Vec3::splat(board.world_scale())))
            .with_child(head);

        let rest = Direction::None.angle_degrees();
        Self {
            position: board.center(),
            next_position: board.center(),
            heading: Direction::None,
            queued_heading: Direction::None,
            trail: VecDeque::new(),
            trail_angles: VecDeque::new(),
            current_angle: rest,
            turn_from_angle: rest,
            pending_angle: rest,
            turn_started_at: 0.0,
            projection: *board.projection(),
            half_pitch,
            meshes,
            model,
        }
    }

    pub fn position(&self) -> GridCell {
        self.position
    }

    pub fn next_position(&self) -> GridCell {
        self.next_position
    }

    pub fn heading(&self) -> Direction {
        self.heading
    }

    pub fn queued_heading(&self) -> Direction {
        self.queued_heading
    }

    pub fn trail(&self) -> &VecDeque<GridCell> {
        &self.trail
    }

    pub fn trail_angles(&self) -> &VecDeque<f32> {
        &self.trail_angles
    }

    /// Segments eaten since the last reset.
    pub fn segments(&self) -> usize {
        self.trail.len()
    }

    pub fn current_angle(&self) -> f32 {
        self.current_angle
    }

    pub fn pending_angle(&self) -> f32 {
        self.pending_angle
    }

    pub fn model(&self) -> &SceneNode {
        &self.model
    }

    /// Head and trail cells.
    pub fn occupied(&self) -> impl Iterator<Item = GridCell> + '_ {
        std::iter::once(self.position).chain(self.trail.iter().copied())
    }

    /// Buffer a heading for the next tick. `progress` is the fraction of the
    /// current tick already elapsed; the head turns from there to the tick.
    ///
    /// Reversal onto the committed heading is refused silently, as is the
    /// heading already queued. A later accepted request before the tick
    /// replaces this one.
    pub fn queue_direction(&mut self, dir: Direction, progress: f32) -> bool {
        if dir == Direction::None
            || dir == self.queued_heading
            || dir.is_anti_parallel(self.heading)
        {
            return false;
        }
        self.turn_from_angle = self.pending_angle;
        self.pending_angle = dir.angle_degrees();
        self.turn_started_at = progress.clamp(0.0, 1.0);
        self.queued_heading = dir;
        tracing::debug!(?dir, from = self.turn_from_angle, to = self.pending_angle, "turn queued");
        true
    }

    /// Advance one cell.
    pub fn tick(&mut self) {
        if !self.trail.is_empty() {
            self.trail.push_front(self.position);
            self.trail.pop_back();
            self.trail_angles.push_front(self.current_angle);
            self.trail_angles.pop_back();
        }
        self.heading = self.queued_heading;
        self.position = self.next_position;
        self.next_position = self.position.step(self.heading);
        self.current_angle = self.pending_angle;
        self.turn_from_angle = self.pending_angle;
        self.turn_started_at = 0.0;
        self.sync_body();
    }

    /// Interpolated head pose at `progress` through the current tick.
    pub fn render_pose(&self, progress: f32) -> SnakePose {
        let position = interpolate_position(
            &self.projection,
            self.position,
            self.next_position,
            progress,
            1.0,
        );
        let angle_degrees = interpolate_angle(
            self.turn_from_angle,
            self.pending_angle,
            progress - self.turn_started_at,
            1.0 - self.turn_started_at,
        );
        SnakePose {
            position,
            angle_degrees,
        }
    }

    /// Height of the head's centre above the floor, before world scaling.
    pub fn head_height(&self) -> f32 {
        HEAD_LIFT * self.half_pitch
    }

    /// Move the head node to `pose`.
    pub fn sync_scene(&mut self, pose: &SnakePose) -> Result<(), SceneError> {
        let z = self.head_height();
        let head = self.model.child_node_mut(HEAD_SLOT)?;
        head.set_transform(
            Mat4::from_translation(pose.position.extend(z))
                * Mat4::from_rotation_z(pose.angle_degrees.to_radians()),
        );
        Ok(())
    }

    /// Dead if off the board, on an obstacle or on the trail; otherwise Ate
    /// if on the food. Death takes precedence.
    pub fn check_collision(&self, board: &Board, food: GridCell) -> Collision {
        if !board.contains(self.position) {
            Collision::Dead(DeathCause::OutOfBounds)
        } else if board.is_obstacle(self.position) {
            Collision::Dead(DeathCause::Obstacle)
        } else if self.trail.contains(&self.position) {
            Collision::Dead(DeathCause::Trail)
        } else if self.position == food {
            Collision::Ate
        } else {
            Collision::None
        }
    }

    /// Grow by one segment. The tail cell (or the head's own cell for the
    /// first segment) is doubled at the tail end, so the next tick drops the
    /// copy and the tail holds still for one tick.
    pub fn on_ate(&mut self) {
        let cell = self.trail.back().copied().unwrap_or(self.position);
        let angle = self
            .trail_angles
            .back()
            .copied()
            .unwrap_or(self.current_angle);
        self.trail.push_back(cell);
        self.trail_angles.push_back(angle);

        let index = self.trail.len();
        let segment = SceneNode::new(format!("body_tr_{index}")).with_child(SceneNode::leaf(
            "body",
            Mat4::from_scale(Vec3::splat(BODY_SCALE * self.half_pitch)),
            self.meshes.body,
        ));
        self.model.add_child(segment);
        self.sync_body();
    }

    /// Back to a resting snake at `center`, trail and body nodes cleared.
    pub fn on_death(&mut self, center: GridCell) {
        let rest = Direction::None.angle_degrees();
        self.position = center;
        self.next_position = center;
        self.heading = Direction::None;
        self.queued_heading = Direction::None;
        self.trail.clear();
        self.trail_angles.clear();
        self.current_angle = rest;
        self.turn_from_angle = rest;
        self.pending_angle = rest;
        self.turn_started_at = 0.0;
        self.model.truncate_children(HEAD_SLOT + 1);
    }

    fn sync_body(&mut self) {
        let z = BODY_SCALE * self.half_pitch / 2.0;
        let segments = self.model.children_mut().iter_mut().skip(HEAD_SLOT + 1);
        for (child, (cell, angle)) in segments.zip(self.trail.iter().zip(&self.trail_angles)) {
            if let SceneChild::Node(node) = child {
                node.set_transform(
                    Mat4::from_translation(self.projection.project(*cell).extend(z))
                        * Mat4::from_rotation_z(angle.to_radians()),
                );
            }
        }
    }

    #[cfg(test)]
    pub(crate) fn place(&mut self, position: GridCell, heading: Direction) {
        self.position = position;
        self.heading = heading;
        self.queued_heading = heading;
        self.next_position = position.step(heading);
        self.current_angle = heading.angle_degrees();
        self.turn_from_angle = self.current_angle;
        self.pending_angle = self.current_angle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Mat4;

    fn meshes() -> SnakeMeshes {
        SnakeMeshes {
            head: DrawableHandle(0),
            body: DrawableHandle(1),
        }
    }

    fn board(size: u32) -> Board {
        Board::new(size, 2.0 / size as f32, [])
    }

    #[test]
    fn starts_resting_at_centre() {
        let b = board(10);
        let s = Snake::new(&b, meshes());
        assert_eq!(s.position(), GridCell::new(5, 5));
        assert_eq!(s.heading(), Direction::None);
        assert_eq!(s.segments(), 0);
        assert_eq!(s.model().collect_draws(Mat4::IDENTITY).len(), 1);
    }

    #[test]
    fn straight_move() {
        let b = board(10);
        let mut s = Snake::new(&b, meshes());
        s.place(GridCell::new(5, 5), Direction::Right);
        s.tick();
        assert_eq!(s.position(), GridCell::new(6, 5));
        assert_eq!(s.next_position(), GridCell::new(7, 5));
        assert_eq!(s.segments(), 0);
    }

    #[test]
    fn first_turn_applies_after_the_next_tick() {
        let b = board(10);
        let mut s = Snake::new(&b, meshes());
        assert!(s.queue_direction(Direction::Up, 0.0));
        s.tick();
        // resting snake had nowhere to go this tick
        assert_eq!(s.position(), GridCell::new(5, 5));
        assert_eq!(s.heading(), Direction::Up);
        s.tick();
        assert_eq!(s.position(), GridCell::new(5, 4));
    }

    #[test]
    fn anti_parallel_turn_is_ignored() {
        let b = board(10);
        for h in Direction::CARDINALS {
            let mut s = Snake::new(&b, meshes());
            s.place(GridCell::new(5, 5), h);
            assert!(!s.queue_direction(h.opposite(), 0.3));
            assert_eq!(s.queued_heading(), h);
            assert_eq!(s.pending_angle(), h.angle_degrees());
        }
    }

    #[test]
    fn later_turn_overwrites_earlier() {
        let b = board(10);
        let mut s = Snake::new(&b, meshes());
        s.place(GridCell::new(5, 5), Direction::Right);
        assert!(s.queue_direction(Direction::Up, 0.1));
        assert!(s.queue_direction(Direction::Down, 0.2));
        assert_eq!(s.queued_heading(), Direction::Down);
        s.tick();
        s.tick();
        assert_eq!(s.position(), GridCell::new(6, 6));
    }

    #[test]
    fn queuing_the_current_heading_is_a_no_op() {
        let b = board(10);
        let mut s = Snake::new(&b, meshes());
        s.place(GridCell::new(5, 5), Direction::Right);
        assert!(!s.queue_direction(Direction::Right, 0.2));
        assert!(s.queue_direction(Direction::Up, 0.4));
        // pressing the in-flight turn again leaves its animation alone
        assert!(!s.queue_direction(Direction::Up, 0.6));
        assert!((s.render_pose(0.7).angle_degrees - 315.0).abs() < 1e-3);
        // turning back to the committed heading cancels the turn
        assert!(s.queue_direction(Direction::Right, 0.8));
        assert_eq!(s.queued_heading(), Direction::Right);
    }

    #[test]
    fn render_pose_interpolates_between_cells() {
        let b = board(10);
        let mut s = Snake::new(&b, meshes());
        s.place(GridCell::new(5, 5), Direction::Right);
        let p = b.projection();
        assert_eq!(s.render_pose(0.0).position, p.project(GridCell::new(5, 5)));
        assert!(s.render_pose(1.0).position.abs_diff_eq(p.project(GridCell::new(6, 5)), 1e-6));
        assert_eq!(s.render_pose(0.5).angle_degrees, 270.0);
    }

    #[test]
    fn turn_animates_from_queue_time_to_tick() {
        let b = board(10);
        let mut s = Snake::new(&b, meshes());
        s.place(GridCell::new(5, 5), Direction::Right);
        s.queue_direction(Direction::Up, 0.5);
        // 270 -> 0 runs through 360
        assert_eq!(s.render_pose(0.5).angle_degrees, 270.0);
        assert!((s.render_pose(0.75).angle_degrees - 315.0).abs() < 1e-4);
        assert!((s.render_pose(1.0).angle_degrees - 360.0).abs() < 1e-4);
        s.tick();
        assert_eq!(s.render_pose(0.0).angle_degrees, 0.0);
    }

    #[test]
    fn turn_queued_at_tick_end_does_not_divide_by_zero() {
        let b = board(10);
        let mut s = Snake::new(&b, meshes());
        s.place(GridCell::new(5, 5), Direction::Right);
        s.queue_direction(Direction::Down, 1.0);
        let pose = s.render_pose(1.0);
        assert!(pose.angle_degrees.is_finite());
        assert_eq!(pose.angle_degrees, 270.0);
    }

    #[test]
    fn eating_grows_trail_and_scene() {
        let b = board(10);
        let mut s = Snake::new(&b, meshes());
        s.place(GridCell::new(5, 5), Direction::Right);
        for k in 1..=3 {
            s.on_ate();
            assert_eq!(s.segments(), k);
            assert_eq!(s.trail_angles().len(), k);
            assert_eq!(s.model().child_count(), k + 1);
            s.tick();
            s.tick();
            assert_eq!(s.segments(), k);
        }
        let draws = s.model().collect_draws(Mat4::IDENTITY);
        assert_eq!(draws.len(), 4);
        assert_eq!(draws.iter().filter(|d| d.drawable == DrawableHandle(1)).count(), 3);
    }

    #[test]
    fn trail_follows_head() {
        let b = board(10);
        let mut s = Snake::new(&b, meshes());
        s.place(GridCell::new(2, 2), Direction::Right);
        s.on_ate();
        s.on_ate();
        s.tick();
        s.tick();
        s.tick();
        assert_eq!(s.position(), GridCell::new(5, 2));
        let trail: Vec<GridCell> = s.trail().iter().copied().collect();
        assert_eq!(trail, vec![GridCell::new(4, 2), GridCell::new(3, 2)]);
    }

    #[test]
    fn tail_holds_still_for_one_tick_after_eating() {
        let b = board(10);
        let mut s = Snake::new(&b, meshes());
        s.place(GridCell::new(3, 2), Direction::Right);
        for _ in 0..3 {
            s.on_ate();
        }
        for _ in 0..3 {
            s.tick();
        }
        let cells = |s: &Snake| s.trail().iter().copied().collect::<Vec<_>>();
        assert_eq!(
            cells(&s),
            vec![GridCell::new(5, 2), GridCell::new(4, 2), GridCell::new(3, 2)]
        );

        s.on_ate();
        s.tick();
        assert_eq!(s.position(), GridCell::new(7, 2));
        assert_eq!(
            cells(&s),
            vec![
                GridCell::new(6, 2),
                GridCell::new(5, 2),
                GridCell::new(4, 2),
                GridCell::new(3, 2),
            ]
        );
        let distinct: std::collections::HashSet<_> = s.trail().iter().collect();
        assert_eq!(distinct.len(), s.segments());
    }

    #[test]
    fn body_nodes_track_trail() {
        let b = board(10);
        let mut s = Snake::new(&b, meshes());
        s.place(GridCell::new(2, 2), Direction::Right);
        s.on_ate();
        s.tick();
        s.tick();
        let body = s.model().child_node(1).unwrap();
        let origin = body.transform().w_axis.truncate();
        let expected = b.projection().project(s.trail()[0]);
        assert!((origin.x - expected.x).abs() < 1e-6);
        assert!((origin.y - expected.y).abs() < 1e-6);
    }

    #[test]
    fn collision_on_trail_cell_is_fatal() {
        let b = board(10);
        let mut s = Snake::new(&b, meshes());
        s.place(GridCell::new(4, 4), Direction::Right);
        s.on_ate();
        s.on_ate();
        s.on_ate();
        s.trail = VecDeque::from(vec![
            GridCell::new(3, 4),
            GridCell::new(4, 4),
            GridCell::new(4, 5),
        ]);
        s.position = GridCell::new(4, 4);
        assert_eq!(s.trail()[1], s.position());
        assert_eq!(
            s.check_collision(&b, GridCell::new(0, 0)),
            Collision::Dead(DeathCause::Trail)
        );
    }

    #[test]
    fn collision_order() {
        let b = Board::new(5, 0.4, [GridCell::new(1, 1)]);
        let mut s = Snake::new(&b, meshes());
        s.place(GridCell::new(4, 2), Direction::Right);
        s.tick();
        assert_eq!(
            s.check_collision(&b, s.position()),
            Collision::Dead(DeathCause::OutOfBounds)
        );
        s.place(GridCell::new(1, 1), Direction::Right);
        assert_eq!(
            s.check_collision(&b, GridCell::new(1, 1)),
            Collision::Dead(DeathCause::Obstacle)
        );
        s.place(GridCell::new(2, 2), Direction::Right);
        assert_eq!(s.check_collision(&b, GridCell::new(2, 2)), Collision::Ate);
        assert_eq!(s.check_collision(&b, GridCell::new(0, 0)), Collision::None);
    }

    #[test]
    fn death_resets_in_place() {
        let b = board(10);
        let mut s = Snake::new(&b, meshes());
        s.place(GridCell::new(1, 1), Direction::Down);
        s.on_ate();
        s.on_ate();
        s.on_death(b.center());
        assert_eq!(s.position(), b.center());
        assert_eq!(s.heading(), Direction::None);
        assert_eq!(s.queued_heading(), Direction::None);
        assert_eq!(s.segments(), 0);
        assert!(s.trail_angles().is_empty());
        assert_eq!(s.model().child_count(), 1);
        assert_eq!(s.model().child_node(0).unwrap().name(), "head_tr");
    }

    #[test]
    fn sync_scene_moves_head() {
        let b = board(10);
        let mut s = Snake::new(&b, meshes());
        let pose = SnakePose {
            position: Vec2::new(0.3, -0.1),
            angle_degrees: 90.0,
        };
        s.sync_scene(&pose).unwrap();
        let head = s.model().child_node(0).unwrap();
        let origin = head.transform().w_axis.truncate();
        assert!((origin.x - 0.3).abs() < 1e-6);
        assert!((origin.y + 0.1).abs() < 1e-6);
        assert!((origin.z - s.head_height()).abs() < 1e-6);
    }
}
