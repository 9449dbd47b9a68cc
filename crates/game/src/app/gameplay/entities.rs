use engine::{Rect, Vec2};

const GOAL_WIDTH: f32 = 2.0;
const GOAL_HEIGHT: f32 = 2.0;
const GOAL_RETRIGGER_COOLDOWN_SECONDS: f32 = 2.0;
const PICKUP_SIZE: f32 = 1.0;
const PICKUP_BOB_AMPLITUDE: f32 = 0.25;
const PICKUP_BOB_FREQUENCY_RADIANS: f32 = 2.0;
const ENEMY_SIZE: f32 = 1.6;
const ENEMY_PATROL_STEP: f32 = 0.05;
const ENEMY_ARRIVAL_TOLERANCE: f32 = 0.5;

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum EntityKind {
    Goal { target_level: i32 },
    Pickup,
    Enemy { patrol_a: Vec2, patrol_b: Vec2 },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum OverlapEvent {
    GoalReached { target_level: i32 },
    PickupCollected,
    EnemyTouched,
}

/// Level object that reacts to the player body overlapping it. Events
/// are edge-triggered: one fires when overlap begins, not while it
/// persists.
#[derive(Debug, Clone)]
pub(crate) struct TriggerEntity {
    kind: EntityKind,
    base_position: Vec2,
    position: Vec2,
    width: f32,
    height: f32,
    active: bool,
    was_overlapping: bool,
    cooldown_seconds: f32,
    age_seconds: f32,
    moving_to_b: bool,
}

impl TriggerEntity {
    pub(crate) fn goal(position: Vec2, target_level: i32) -> Self {
        Self::new(
            EntityKind::Goal { target_level },
            position,
            GOAL_WIDTH,
            GOAL_HEIGHT,
        )
    }

    pub(crate) fn pickup(position: Vec2) -> Self {
        Self::new(EntityKind::Pickup, position, PICKUP_SIZE, PICKUP_SIZE)
    }

    pub(crate) fn enemy(patrol_a: Vec2, patrol_b: Vec2) -> Self {
        Self::new(
            EntityKind::Enemy { patrol_a, patrol_b },
            patrol_a,
            ENEMY_SIZE,
            ENEMY_SIZE,
        )
    }

    fn new(kind: EntityKind, position: Vec2, width: f32, height: f32) -> Self {
        Self {
            kind,
            base_position: position,
            position,
            width,
            height,
            active: true,
            was_overlapping: false,
            cooldown_seconds: 0.0,
            age_seconds: 0.0,
            moving_to_b: true,
        }
    }

    pub(crate) fn kind(&self) -> &EntityKind {
        &self.kind
    }

    pub(crate) fn position(&self) -> Vec2 {
        self.position
    }

    pub(crate) fn is_active(&self) -> bool {
        self.active
    }

    pub(crate) fn bounding_box(&self) -> Rect {
        Rect::from_center_size(self.position, self.width, self.height)
    }

    pub(crate) fn tick(&mut self, dt_seconds: f32) {
        if !self.active {
            return;
        }
        self.age_seconds += dt_seconds;
        if self.cooldown_seconds > 0.0 {
            self.cooldown_seconds -= dt_seconds;
        }

        match self.kind {
            EntityKind::Goal { .. } => {}
            EntityKind::Pickup => {
                self.position.y = self.base_position.y
                    + PICKUP_BOB_AMPLITUDE
                        * (PICKUP_BOB_FREQUENCY_RADIANS * self.age_seconds).sin();
            }
            EntityKind::Enemy { patrol_a, patrol_b } => {
                let target = if self.moving_to_b { patrol_b } else { patrol_a };
                self.step_toward(target);
                if self.position.distance_to(target) <= ENEMY_ARRIVAL_TOLERANCE {
                    self.moving_to_b = !self.moving_to_b;
                }
            }
        }
    }

    fn step_toward(&mut self, target: Vec2) {
        let distance = self.position.distance_to(target);
        if distance <= f32::EPSILON {
            return;
        }
        let step = ENEMY_PATROL_STEP.min(distance);
        self.position.x += (target.x - self.position.x) / distance * step;
        self.position.y += (target.y - self.position.y) / distance * step;
    }

    /// Checks overlap against the player body and returns the event to
    /// dispatch, if any. Goals rearm after a cooldown; pickups deactivate
    /// on collection.
    pub(crate) fn overlap_event(&mut self, body: &Rect) -> Option<OverlapEvent> {
        if !self.active {
            return None;
        }
        let overlapping = self.bounding_box().overlaps(body);
        let entered = overlapping && !self.was_overlapping;
        self.was_overlapping = overlapping;
        if !entered {
            return None;
        }

        match self.kind {
            EntityKind::Goal { target_level } => {
                if self.cooldown_seconds > 0.0 {
                    return None;
                }
                self.cooldown_seconds = GOAL_RETRIGGER_COOLDOWN_SECONDS;
                Some(OverlapEvent::GoalReached { target_level })
            }
            EntityKind::Pickup => {
                self.active = false;
                Some(OverlapEvent::PickupCollected)
            }
            EntityKind::Enemy { .. } => Some(OverlapEvent::EnemyTouched),
        }
    }
}

/// Ticks every entity and gathers the overlap events for this frame, in
/// entity order. While `goals_armed` is false, goal entities are ticked
/// but skip overlap checks entirely, so their edge trigger is not
/// latched by an overlap the caller would discard.
pub(crate) fn collect_overlap_events(
    entities: &mut [TriggerEntity],
    body: &Rect,
    dt_seconds: f32,
    goals_armed: bool,
) -> Vec<OverlapEvent> {
    let mut events = Vec::new();
    for entity in entities.iter_mut() {
        entity.tick(dt_seconds);
        if !goals_armed && matches!(entity.kind(), EntityKind::Goal { .. }) {
            continue;
        }
        if let Some(event) = entity.overlap_event(body) {
            events.push(event);
        }
    }
    events
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f32 = 1.0 / 60.0;

    fn body_at(x: f32, y: f32) -> Rect {
        Rect::from_center_size(Vec2::new(x, y), 1.8, 1.8)
    }

    fn far_body() -> Rect {
        body_at(1000.0, 1000.0)
    }

    #[test]
    fn goal_event_is_edge_triggered() {
        let mut goal = TriggerEntity::goal(Vec2::new(0.0, 0.0), 2);

        let first = goal.overlap_event(&body_at(0.5, 0.0));
        assert_eq!(first, Some(OverlapEvent::GoalReached { target_level: 2 }));

        let held = goal.overlap_event(&body_at(0.5, 0.0));
        assert_eq!(held, None);
    }

    #[test]
    fn goal_cooldown_blocks_quick_reentry() {
        let mut goal = TriggerEntity::goal(Vec2::new(0.0, 0.0), 1);

        assert!(goal.overlap_event(&body_at(0.0, 0.0)).is_some());
        assert!(goal.overlap_event(&far_body()).is_none());
        assert!(goal.overlap_event(&body_at(0.0, 0.0)).is_none());

        for _ in 0..121 {
            goal.tick(DT);
        }
        assert!(goal.overlap_event(&far_body()).is_none());
        assert!(goal.overlap_event(&body_at(0.0, 0.0)).is_some());
    }

    #[test]
    fn pickup_collects_exactly_once() {
        let mut pickup = TriggerEntity::pickup(Vec2::new(0.0, 0.0));

        assert_eq!(
            pickup.overlap_event(&body_at(0.0, 0.0)),
            Some(OverlapEvent::PickupCollected)
        );
        assert!(!pickup.is_active());
        assert_eq!(pickup.overlap_event(&body_at(0.0, 0.0)), None);
    }

    #[test]
    fn pickup_bobs_around_its_base() {
        let mut pickup = TriggerEntity::pickup(Vec2::new(3.0, 5.0));

        let mut highest = f32::MIN;
        let mut lowest = f32::MAX;
        for _ in 0..240 {
            pickup.tick(DT);
            highest = highest.max(pickup.position().y);
            lowest = lowest.min(pickup.position().y);
        }

        assert!(highest > 5.2);
        assert!(lowest < 4.8);
        assert!(highest <= 5.0 + PICKUP_BOB_AMPLITUDE + 1e-4);
        assert!(lowest >= 5.0 - PICKUP_BOB_AMPLITUDE - 1e-4);
        assert_eq!(pickup.position().x, 3.0);
    }

    #[test]
    fn enemy_patrols_between_its_points() {
        let a = Vec2::new(0.0, 0.0);
        let b = Vec2::new(4.0, 0.0);
        let mut enemy = TriggerEntity::enemy(a, b);

        for _ in 0..75 {
            enemy.tick(DT);
        }
        assert!(enemy.position().x > 2.5);

        for _ in 0..75 {
            enemy.tick(DT);
        }
        assert!(enemy.position().x < 2.0);
    }

    #[test]
    fn enemy_touch_fires_every_entry() {
        let mut enemy = TriggerEntity::enemy(Vec2::new(0.0, 0.0), Vec2::new(0.0, 0.0));

        assert_eq!(
            enemy.overlap_event(&body_at(0.0, 0.0)),
            Some(OverlapEvent::EnemyTouched)
        );
        assert_eq!(enemy.overlap_event(&far_body()), None);
        assert_eq!(
            enemy.overlap_event(&body_at(0.0, 0.0)),
            Some(OverlapEvent::EnemyTouched)
        );
    }

    #[test]
    fn collect_gathers_events_in_entity_order() {
        let mut entities = vec![
            TriggerEntity::pickup(Vec2::new(0.0, 0.0)),
            TriggerEntity::goal(Vec2::new(0.5, 0.0), 3),
        ];

        let events = collect_overlap_events(&mut entities, &body_at(0.0, 0.0), DT, true);

        assert_eq!(
            events,
            vec![
                OverlapEvent::PickupCollected,
                OverlapEvent::GoalReached { target_level: 3 },
            ]
        );
    }

    #[test]
    fn unarmed_goals_do_not_latch_their_edge_trigger() {
        let mut entities = vec![TriggerEntity::goal(Vec2::new(0.0, 0.0), 2)];
        let body = body_at(0.0, 0.0);

        for _ in 0..3 {
            let events = collect_overlap_events(&mut entities, &body, DT, false);
            assert!(events.is_empty());
        }

        // Arming while still overlapping fires the entry edge now.
        let events = collect_overlap_events(&mut entities, &body, DT, true);
        assert_eq!(events, vec![OverlapEvent::GoalReached { target_level: 2 }]);
    }

    #[test]
    fn arming_gate_does_not_affect_pickups() {
        let mut entities = vec![TriggerEntity::pickup(Vec2::new(0.0, 0.0))];

        let events = collect_overlap_events(&mut entities, &body_at(0.0, 0.0), DT, false);
        assert_eq!(events, vec![OverlapEvent::PickupCollected]);
    }
}
