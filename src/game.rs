//! Game controller: owns the session, the live hearts and the task queue, and
//! runs the `Playing -> Won -> (reset) -> Playing` flow against a [`Stage`].

use std::collections::HashMap;

use tracing::{debug, info, trace};

use crate::config::GameConfig;
use crate::geometry::{Point, grid_positions, rect_positions};
use crate::heart::{
    Capabilities, Heart, HeartClass, HeartFactory, HeartId, HeartVariant, InputOutcome,
    InteractionStrategy,
};
use crate::reveal::is_target_revealed;
use crate::scheduler::{CancelToken, Scheduler};
use crate::session::{GameSession, Phase};
use crate::stage::{Corner, Stage};

/// Deferred work. Timers carry heart ids; stale ids are ignored on arrival.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Task {
    BuildField,
    ShowTarget,
    FinalizeClear(HeartId),
    EndTapShake(HeartId),
}

/// Heart counts of the last field build, per layer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FieldLayout {
    pub base: usize,
    pub light: usize,
    pub offset: usize,
    pub cover: usize,
}

impl FieldLayout {
    pub fn total(&self) -> usize {
        self.base + self.light + self.offset + self.cover
    }
}

/// How a session was won.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WinCause {
    Revealed,
    TargetClicked,
}

pub struct Game<S: Stage> {
    stage: S,
    config: GameConfig,
    factory: HeartFactory,
    reduced_motion: bool,
    session: GameSession,
    hearts: HashMap<HeartId, Heart>,
    scheduler: Scheduler<Task>,
    field_token: CancelToken,
    rng: fastrand::Rng,
    next_id: u32,
    corner: Corner,
    layout: FieldLayout,
}

impl<S: Stage> Game<S> {
    pub fn new(stage: S, config: GameConfig, caps: Capabilities) -> Self {
        Self::with_rng(stage, config, caps, fastrand::Rng::new())
    }

    /// Deterministic layouts for tests and replays.
    pub fn with_seed(stage: S, config: GameConfig, caps: Capabilities, seed: u64) -> Self {
        Self::with_rng(stage, config, caps, fastrand::Rng::with_seed(seed))
    }

    fn with_rng(stage: S, config: GameConfig, caps: Capabilities, rng: fastrand::Rng) -> Self {
        let strategy = InteractionStrategy::resolve(caps);
        let mut scheduler = Scheduler::new();
        let field_token = scheduler.token();
        debug!(?strategy, reduced_motion = caps.reduced_motion, "game created");
        Self {
            stage,
            factory: HeartFactory::new(&config, strategy),
            config,
            reduced_motion: caps.reduced_motion,
            session: GameSession::new(),
            hearts: HashMap::new(),
            scheduler,
            field_token,
            rng,
            next_id: 0,
            corner: Corner::TopLeft,
            layout: FieldLayout::default(),
        }
    }

    /// Start a fresh session. The field itself is built on the next frame so
    /// the target has been laid out in its new corner before it is measured.
    pub fn reset(&mut self) {
        self.session.reset();
        self.stage.set_counter(0);
        self.stage.set_modal_visible(false);
        self.corner = Corner::random(&mut self.rng);
        self.stage.place_target(self.corner, self.config.corner_inset);

        // anything still queued belongs to the previous field
        let dropped = self.scheduler.cancel(self.field_token);
        self.field_token = self.scheduler.token();
        self.scheduler
            .next_frame(Task::BuildField, Some(self.field_token));
        info!(corner = ?self.corner, dropped, "session reset");
    }

    /// Advance the clock to `now_ms` and run everything that became due.
    pub fn tick(&mut self, now_ms: f64) {
        self.scheduler.advance_to(now_ms);
        while let Some(task) = self.scheduler.pop_due() {
            self.run(task);
        }
    }

    fn run(&mut self, task: Task) {
        match task {
            Task::BuildField => self.build_field(),
            Task::ShowTarget => self.stage.set_target_hidden(false),
            Task::FinalizeClear(id) => self.finalize_clear(id),
            Task::EndTapShake(id) => {
                if let Some(heart) = self.hearts.get_mut(&id) {
                    if heart.end_tap_shake() {
                        self.stage.set_heart_class(id, HeartClass::Shaking, false);
                    }
                }
            }
        }
    }

    fn clear_hearts(&mut self) {
        for id in self.hearts.keys() {
            self.stage.unmount_heart(*id);
        }
        self.hearts.clear();
        self.session.clear_count();
        self.stage.set_counter(0);
    }

    fn build_field(&mut self) {
        self.clear_hearts();
        self.stage.set_target_hidden(true);

        let viewport = self.stage.viewport();
        let spacing = self.config.spacing;
        let jitter = self.config.grid_jitter;
        let base = grid_positions(&mut self.rng, viewport, spacing, jitter, Point::default());
        let offset = grid_positions(
            &mut self.rng,
            viewport,
            spacing,
            jitter,
            Point::new(spacing / 2.0, spacing / 2.0),
        );
        self.spawn_layer(&base.points, HeartVariant::Plain);
        self.spawn_layer(&base.points, HeartVariant::Light);
        self.spawn_layer(&offset.points, HeartVariant::Beige);

        let cover_rect = self
            .stage
            .target_rect()
            .padded(spacing * self.config.cover_padding);
        let cover = rect_positions(
            &mut self.rng,
            cover_rect,
            self.config.cover_spacing(),
            self.config.cover_jitter,
        );
        self.spawn_layer(&cover.points, HeartVariant::Beige);

        self.layout = FieldLayout {
            base: base.len(),
            light: base.len(),
            offset: offset.len(),
            cover: cover.len(),
        };
        self.scheduler
            .next_frame(Task::ShowTarget, Some(self.field_token));
        debug!(
            hearts = self.layout.total(),
            cover = self.layout.cover,
            width = viewport.width,
            height = viewport.height,
            "heart field built"
        );
    }

    fn spawn_layer(&mut self, points: &[Point], variant: HeartVariant) {
        for (index, position) in points.iter().enumerate() {
            let id = HeartId(self.next_id);
            self.next_id = self.next_id.wrapping_add(1);
            let heart = self
                .factory
                .build(&mut self.rng, id, *position, variant, index);
            self.stage.mount_heart(&heart);
            self.hearts.insert(id, heart);
        }
    }

    /// Pointer entered a heart.
    pub fn hover_heart(&mut self, id: HeartId) {
        let Some(heart) = self.hearts.get_mut(&id) else {
            return;
        };
        if heart.on_hover() == InputOutcome::Clear {
            self.trigger_clear(id);
        }
    }

    /// Pointer pressed on a heart.
    pub fn press_heart(&mut self, id: HeartId) {
        let Some(heart) = self.hearts.get_mut(&id) else {
            return;
        };
        match heart.on_press(self.reduced_motion) {
            InputOutcome::Armed { shake: true } => {
                self.stage.set_heart_class(id, HeartClass::Shaking, true);
                self.scheduler.after(
                    self.config.tap_shake_ms,
                    Task::EndTapShake(id),
                    Some(self.field_token),
                );
            }
            InputOutcome::Clear => {
                self.trigger_clear(id);
            }
            InputOutcome::Armed { shake: false } | InputOutcome::Ignored => {}
        }
    }

    /// Start clearing a heart. Returns false if it was unknown or already clearing.
    pub fn trigger_clear(&mut self, id: HeartId) -> bool {
        let Some(heart) = self.hearts.get_mut(&id) else {
            return false;
        };
        if !heart.begin_clear() {
            return false;
        }
        if !self.reduced_motion {
            self.stage.set_heart_class(id, HeartClass::Shaking, true);
        }
        self.stage.set_heart_class(id, HeartClass::Cleared, true);
        self.scheduler.after(
            self.config.clear_delay(self.reduced_motion),
            Task::FinalizeClear(id),
            Some(self.field_token),
        );

        let cleared = self.session.record_clear();
        self.stage.set_counter(cleared);
        trace!(heart = id.0, cleared, "heart cleared");
        true
    }

    fn finalize_clear(&mut self, id: HeartId) {
        let Some(mut heart) = self.hearts.remove(&id) else {
            return;
        };
        if !heart.finalize() {
            // not clearing; put it back untouched
            self.hearts.insert(id, heart);
            return;
        }
        self.stage.set_heart_class(id, HeartClass::Shaking, false);
        self.stage.set_heart_class(id, HeartClass::Removed, true);
        self.stage.unmount_heart(id);

        if !self.session.is_won() && is_target_revealed(&self.stage) {
            self.declare_win(WinCause::Revealed);
        }
    }

    /// The target itself was clicked: always a win while playing.
    pub fn click_target(&mut self) {
        self.declare_win(WinCause::TargetClicked);
    }

    fn declare_win(&mut self, cause: WinCause) -> bool {
        if !self.session.win() {
            return false;
        }
        self.stage.set_modal_visible(true);
        info!(?cause, cleared = self.session.cleared(), "session won");
        true
    }

    pub fn phase(&self) -> Phase {
        self.session.phase()
    }

    pub fn cleared(&self) -> u32 {
        self.session.cleared()
    }

    pub fn live_hearts(&self) -> usize {
        self.hearts.len()
    }

    pub fn heart(&self, id: HeartId) -> Option<&Heart> {
        self.hearts.get(&id)
    }

    /// Ids of the live hearts in creation order.
    pub fn heart_ids(&self) -> Vec<HeartId> {
        let mut ids: Vec<HeartId> = self.hearts.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    pub fn last_layout(&self) -> FieldLayout {
        self.layout
    }

    pub fn corner(&self) -> Corner {
        self.corner
    }

    pub fn strategy(&self) -> InteractionStrategy {
        self.factory.strategy()
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn pending_tasks(&self) -> usize {
        self.scheduler.pending()
    }

    pub fn now(&self) -> f64 {
        self.scheduler.now()
    }

    pub fn stage(&self) -> &S {
        &self.stage
    }

    pub fn stage_mut(&mut self) -> &mut S {
        &mut self.stage
    }
}
