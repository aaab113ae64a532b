//! Heart decoys: visual parameters, interaction handlers and the factory that
//! builds them.

use crate::config::GameConfig;
use crate::geometry::{Point, random_between};

/// Monotonic per-game identifier; also written to `data-heart-id` in the DOM.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HeartId(pub u32);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HeartVariant {
    Plain,
    Light,
    Beige,
}

impl HeartVariant {
    /// Extra CSS class, if any.
    pub fn class(self) -> Option<&'static str> {
        match self {
            HeartVariant::Plain => None,
            HeartVariant::Light => Some("heart--light"),
            HeartVariant::Beige => Some("heart--beige"),
        }
    }
}

/// Lifecycle of a heart. Only moves forward except for the transient
/// first-tap `Shaking`, which falls back to `Active`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum HeartState {
    Active,
    Shaking,
    Cleared,
    Removed,
}

/// Presentational state classes toggled on heart elements.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HeartClass {
    Shaking,
    Cleared,
    Removed,
}

impl HeartClass {
    pub fn as_str(self) -> &'static str {
        match self {
            HeartClass::Shaking => "is-shaking",
            HeartClass::Cleared => "is-cleared",
            HeartClass::Removed => "is-removed",
        }
    }
}

/// What the device can do, read once at startup.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Capabilities {
    pub hover: bool,
    pub reduced_motion: bool,
}

/// How hearts get cleared on this device.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InteractionStrategy {
    /// A single hover-enter clears.
    HoverClear,
    /// Touch-primary: first press arms, second press clears.
    TapTwiceClear,
}

impl InteractionStrategy {
    pub fn resolve(caps: Capabilities) -> Self {
        if caps.hover {
            InteractionStrategy::HoverClear
        } else {
            InteractionStrategy::TapTwiceClear
        }
    }
}

/// Per-heart handler state for the resolved strategy.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Interaction {
    Hover { disarmed: bool },
    TapTwice { armed: bool },
}

impl Interaction {
    fn for_strategy(strategy: InteractionStrategy) -> Self {
        match strategy {
            InteractionStrategy::HoverClear => Interaction::Hover { disarmed: false },
            InteractionStrategy::TapTwiceClear => Interaction::TapTwice { armed: false },
        }
    }
}

/// Result of feeding an input event to a heart.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputOutcome {
    Ignored,
    /// First tap on a touch device; `shake` says whether feedback should play.
    Armed { shake: bool },
    Clear,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HeartStyle {
    pub size: f64,
    pub rotation_deg: f64,
    pub z_index: i32,
    /// Even-indexed hearts carry the gradient SVG.
    pub decorated: bool,
}

#[derive(Clone, Debug)]
pub struct Heart {
    pub id: HeartId,
    pub position: Point,
    pub variant: HeartVariant,
    pub style: HeartStyle,
    state: HeartState,
    interaction: Interaction,
}

impl Heart {
    pub fn state(&self) -> HeartState {
        self.state
    }

    pub fn interaction(&self) -> Interaction {
        self.interaction
    }

    pub fn is_armed(&self) -> bool {
        matches!(self.interaction, Interaction::TapTwice { armed: true })
    }

    /// Hover-enter. One-shot: the handler disarms itself after firing.
    pub fn on_hover(&mut self) -> InputOutcome {
        match &mut self.interaction {
            Interaction::Hover { disarmed } if !*disarmed => {
                *disarmed = true;
                InputOutcome::Clear
            }
            _ => InputOutcome::Ignored,
        }
    }

    /// Discrete press (pointerdown).
    pub fn on_press(&mut self, reduced_motion: bool) -> InputOutcome {
        match &mut self.interaction {
            Interaction::TapTwice { armed } if !*armed => {
                *armed = true;
                if !reduced_motion && self.state == HeartState::Active {
                    self.state = HeartState::Shaking;
                }
                InputOutcome::Armed {
                    shake: !reduced_motion,
                }
            }
            Interaction::TapTwice { .. } => InputOutcome::Clear,
            Interaction::Hover { .. } => InputOutcome::Ignored,
        }
    }

    /// End of the first-tap shake. No-op once clearing has started.
    pub fn end_tap_shake(&mut self) -> bool {
        if self.state == HeartState::Shaking {
            self.state = HeartState::Active;
            true
        } else {
            false
        }
    }

    /// Start clearing. Returns false when already cleared or removed.
    pub fn begin_clear(&mut self) -> bool {
        if self.state >= HeartState::Cleared {
            return false;
        }
        self.state = HeartState::Cleared;
        true
    }

    /// Final step after the clear delay. Returns false unless the heart was `Cleared`.
    pub fn finalize(&mut self) -> bool {
        if self.state != HeartState::Cleared {
            return false;
        }
        self.state = HeartState::Removed;
        true
    }
}

/// Builds hearts with randomized visuals and the strategy picked at startup.
#[derive(Clone, Debug)]
pub struct HeartFactory {
    strategy: InteractionStrategy,
    size: (f64, f64),
    rotation: (f64, f64),
    z_index: (i32, i32),
}

impl HeartFactory {
    pub fn new(config: &GameConfig, strategy: InteractionStrategy) -> Self {
        Self {
            strategy,
            size: config.heart_size,
            rotation: config.rotation,
            z_index: config.z_index,
        }
    }

    pub fn strategy(&self) -> InteractionStrategy {
        self.strategy
    }

    pub fn build(
        &self,
        rng: &mut fastrand::Rng,
        id: HeartId,
        position: Point,
        variant: HeartVariant,
        index: usize,
    ) -> Heart {
        let style = HeartStyle {
            size: random_between(rng, self.size.0, self.size.1),
            rotation_deg: random_between(rng, self.rotation.0, self.rotation.1),
            z_index: rng.i32(self.z_index.0..self.z_index.1),
            decorated: index % 2 == 0,
        };
        Heart {
            id,
            position,
            variant,
            style,
            state: HeartState::Active,
            interaction: Interaction::for_strategy(self.strategy),
        }
    }
}

/// Gradient heart drawn inside decorated hearts.
pub const HEART_SVG: &str = r##"<svg viewBox="0 0 60 56" xmlns="http://www.w3.org/2000/svg" aria-hidden="true"><defs><linearGradient id="heartGradient" x1="0%" y1="0%" x2="100%" y2="100%"><stop offset="0%" stop-color="#ff8fb0" /><stop offset="55%" stop-color="#ff8a5b" /><stop offset="100%" stop-color="#7f8bff" /></linearGradient></defs><path d="M30 54 C10 40 2 30 2 18 C2 9 9 2 18 2 C24 2 29 5 30 11 C31 5 36 2 42 2 C51 2 58 9 58 18 C58 30 50 40 30 54 Z" fill="url(#heartGradient)" /></svg>"##;
