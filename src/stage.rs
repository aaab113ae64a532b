//! The rendering environment the game writes to and measures.
//!
//! `dom::DomStage` is the browser implementation; `MemoryStage` keeps a small
//! box-and-z-order model of the page so the whole game runs natively.

use std::collections::HashMap;

use crate::geometry::{Point, Rect, Size};
use crate::heart::{Heart, HeartClass, HeartId};

/// What sits on top at a point.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Hit {
    /// The target or one of its descendants.
    Target,
    Heart(HeartId),
    /// Something else (playfield, chrome).
    Other,
    /// Outside the document.
    Nothing,
}

/// Where the target sits for a round.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Corner {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl Corner {
    pub const ALL: [Corner; 4] = [
        Corner::TopLeft,
        Corner::TopRight,
        Corner::BottomLeft,
        Corner::BottomRight,
    ];

    pub fn random(rng: &mut fastrand::Rng) -> Self {
        Self::ALL[rng.usize(..Self::ALL.len())]
    }

    pub fn is_top(self) -> bool {
        matches!(self, Corner::TopLeft | Corner::TopRight)
    }

    pub fn is_left(self) -> bool {
        matches!(self, Corner::TopLeft | Corner::BottomLeft)
    }
}

/// Read side of the stage: enough to run the reveal check.
pub trait Probe {
    fn viewport(&self) -> Size;
    /// Current box of the target; zero-sized when not laid out.
    fn target_rect(&self) -> Rect;
    /// Topmost hit-testable element at `point`.
    fn element_at(&self, point: Point) -> Hit;
}

pub trait Stage: Probe {
    fn mount_heart(&mut self, heart: &Heart);
    fn unmount_heart(&mut self, id: HeartId);
    fn set_heart_class(&mut self, id: HeartId, class: HeartClass, on: bool);
    /// Pin the target to `corner`, `inset` (fraction of the viewport) from both edges.
    fn place_target(&mut self, corner: Corner, inset: f64);
    fn set_target_hidden(&mut self, hidden: bool);
    fn set_counter(&mut self, cleared: u32);
    fn set_modal_visible(&mut self, visible: bool);
}

/// Text shown in the counter element.
pub fn counter_label(cleared: u32) -> String {
    format!("Hearts cleared: {cleared}")
}

/// Stacking order of the target; hearts start at 3.
const TARGET_Z: i32 = 2;

#[derive(Clone, Debug)]
struct MountedHeart {
    rect: Rect,
    z_index: i32,
    order: u64,
    classes: Vec<HeartClass>,
}

/// In-memory page. Hearts are hit-tested as unrotated squares; cleared and
/// removed hearts do not take pointer hits, matching the stylesheet.
#[derive(Clone, Debug)]
pub struct MemoryStage {
    viewport: Size,
    target_size: Size,
    target_rect: Rect,
    target_hidden: bool,
    hearts: HashMap<HeartId, MountedHeart>,
    /// Classes each heart carried when it left the tree.
    detached: HashMap<HeartId, Vec<HeartClass>>,
    mount_seq: u64,
    counter: String,
    modal_visible: bool,
    modal_aria_hidden: bool,
}

impl MemoryStage {
    pub fn new(viewport: Size, target_size: Size) -> Self {
        Self {
            viewport,
            target_size,
            target_rect: Rect::default(),
            target_hidden: false,
            hearts: HashMap::new(),
            detached: HashMap::new(),
            mount_seq: 0,
            counter: counter_label(0),
            modal_visible: false,
            modal_aria_hidden: true,
        }
    }

    pub fn mounted(&self) -> usize {
        self.hearts.len()
    }

    pub fn is_mounted(&self, id: HeartId) -> bool {
        self.hearts.contains_key(&id)
    }

    pub fn has_class(&self, id: HeartId, class: HeartClass) -> bool {
        self.hearts
            .get(&id)
            .is_some_and(|h| h.classes.contains(&class))
    }

    /// Classes a heart had at the moment it was unmounted.
    pub fn detached_classes(&self, id: HeartId) -> Option<&[HeartClass]> {
        self.detached.get(&id).map(Vec::as_slice)
    }

    pub fn counter_text(&self) -> &str {
        &self.counter
    }

    pub fn modal_visible(&self) -> bool {
        self.modal_visible
    }

    pub fn modal_aria_hidden(&self) -> bool {
        self.modal_aria_hidden
    }

    pub fn target_hidden(&self) -> bool {
        self.target_hidden
    }

    /// Hearts currently covering `point`, any state.
    pub fn hearts_at(&self, point: Point) -> Vec<HeartId> {
        self.hearts
            .iter()
            .filter(|(_, h)| h.rect.contains(point))
            .map(|(id, _)| *id)
            .collect()
    }

    /// Stretch or hide the target box, e.g. to simulate a layout that has not happened yet.
    pub fn set_target_size(&mut self, size: Size) {
        self.target_size = size;
        self.target_rect.width = size.width;
        self.target_rect.height = size.height;
    }
}

impl Probe for MemoryStage {
    fn viewport(&self) -> Size {
        self.viewport
    }

    fn target_rect(&self) -> Rect {
        self.target_rect
    }

    fn element_at(&self, point: Point) -> Hit {
        if point.x < 0.0
            || point.y < 0.0
            || point.x >= self.viewport.width
            || point.y >= self.viewport.height
        {
            return Hit::Nothing;
        }
        let top_heart = self
            .hearts
            .iter()
            .filter(|(_, h)| {
                h.rect.contains(point)
                    && !h.classes.contains(&HeartClass::Cleared)
                    && !h.classes.contains(&HeartClass::Removed)
            })
            .max_by_key(|(_, h)| (h.z_index, h.order))
            .map(|(id, h)| (*id, h.z_index));

        let target_hit = !self.target_hidden && self.target_rect.contains(point);
        match top_heart {
            Some((id, z)) if !target_hit || z > TARGET_Z => Hit::Heart(id),
            _ if target_hit => Hit::Target,
            _ => Hit::Other,
        }
    }
}

impl Stage for MemoryStage {
    fn mount_heart(&mut self, heart: &Heart) {
        self.mount_seq += 1;
        self.hearts.insert(
            heart.id,
            MountedHeart {
                rect: Rect::new(
                    heart.position.x,
                    heart.position.y,
                    heart.style.size,
                    heart.style.size,
                ),
                z_index: heart.style.z_index,
                order: self.mount_seq,
                classes: Vec::new(),
            },
        );
    }

    fn unmount_heart(&mut self, id: HeartId) {
        if let Some(h) = self.hearts.remove(&id) {
            self.detached.insert(id, h.classes);
        }
    }

    fn set_heart_class(&mut self, id: HeartId, class: HeartClass, on: bool) {
        if let Some(h) = self.hearts.get_mut(&id) {
            h.classes.retain(|c| *c != class);
            if on {
                h.classes.push(class);
            }
        }
    }

    fn place_target(&mut self, corner: Corner, inset: f64) {
        let dx = self.viewport.width * inset;
        let dy = self.viewport.height * inset;
        let left = if corner.is_left() {
            dx
        } else {
            self.viewport.width - dx - self.target_size.width
        };
        let top = if corner.is_top() {
            dy
        } else {
            self.viewport.height - dy - self.target_size.height
        };
        self.target_rect = Rect::new(left, top, self.target_size.width, self.target_size.height);
    }

    fn set_target_hidden(&mut self, hidden: bool) {
        self.target_hidden = hidden;
    }

    fn set_counter(&mut self, cleared: u32) {
        self.counter = counter_label(cleared);
    }

    fn set_modal_visible(&mut self, visible: bool) {
        self.modal_visible = visible;
        self.modal_aria_hidden = !visible;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::heart::{HeartFactory, HeartVariant, InteractionStrategy};

    #[test]
    fn corners_are_inset_from_edges() {
        let mut stage = MemoryStage::new(Size::new(1000.0, 500.0), Size::new(100.0, 80.0));
        stage.place_target(Corner::TopLeft, 0.06);
        assert_eq!(stage.target_rect(), Rect::new(60.0, 30.0, 100.0, 80.0));
        stage.place_target(Corner::BottomRight, 0.06);
        assert_eq!(stage.target_rect(), Rect::new(840.0, 390.0, 100.0, 80.0));
    }

    #[test]
    fn hearts_above_target_win_hit_tests() {
        let mut stage = MemoryStage::new(Size::new(400.0, 400.0), Size::new(100.0, 100.0));
        stage.place_target(Corner::TopLeft, 0.0);
        let probe = Point::new(50.0, 50.0);
        assert_eq!(stage.element_at(probe), Hit::Target);

        let factory = HeartFactory::new(&GameConfig::default(), InteractionStrategy::HoverClear);
        let mut rng = fastrand::Rng::with_seed(4);
        let heart = factory.build(&mut rng, HeartId(1), Point::new(20.0, 20.0), HeartVariant::Plain, 0);
        stage.mount_heart(&heart);
        assert_eq!(stage.element_at(probe), Hit::Heart(HeartId(1)));

        stage.set_heart_class(HeartId(1), HeartClass::Cleared, true);
        assert_eq!(stage.element_at(probe), Hit::Target);
        assert!(stage.has_class(HeartId(1), HeartClass::Cleared));

        stage.set_target_hidden(true);
        assert_eq!(stage.element_at(probe), Hit::Other);
        assert_eq!(stage.element_at(Point::new(-1.0, 5.0)), Hit::Nothing);
    }
}
