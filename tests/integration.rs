// Native integration tests for the `heart-hunt` crate.
// These drive the full game against the in-memory stage with a fake clock, so
// they run under `cargo test` on the host without a browser.

use heart_hunt::geometry::{Size, rect_dims};
use heart_hunt::stage::Probe;
use heart_hunt::{Capabilities, Game, GameConfig, HeartState, MemoryStage, Phase};

const FRAME: f64 = 16.0;

fn hover() -> Capabilities {
    Capabilities {
        hover: true,
        reduced_motion: false,
    }
}

fn started(viewport: Size, caps: Capabilities, seed: u64) -> Game<MemoryStage> {
    let stage = MemoryStage::new(viewport, Size::new(140.0, 110.0));
    let mut game = Game::with_seed(stage, GameConfig::default(), caps, seed);
    game.reset();
    game.tick(FRAME); // build field
    game.tick(FRAME * 2.0); // show target
    game
}

#[test]
fn field_for_800x600_has_three_full_layers_plus_cover() {
    let game = started(Size::new(800.0, 600.0), hover(), 3);
    let layout = game.last_layout();
    assert_eq!(layout.base, 165);
    assert_eq!(layout.light, 165);
    assert_eq!(layout.offset, 165);

    let padded = game.stage().target_rect().padded(60.0 * 0.6);
    let (cols, rows) = rect_dims(padded, 54.0);
    assert_eq!(layout.cover, cols * rows);
    assert_eq!(game.live_hearts(), 495 + layout.cover);
    assert_eq!(game.stage().mounted(), game.live_hearts());
    assert_eq!(game.phase(), Phase::Playing);
}

#[test]
fn target_starts_fully_covered() {
    for seed in 0..8 {
        let game = started(Size::new(800.0, 600.0), hover(), seed);
        assert!(!game.stage().target_hidden());
        assert!(!heart_hunt::reveal::is_target_revealed(game.stage()));
    }
}

#[test]
fn clearing_twice_counts_once() {
    let mut game = started(Size::new(400.0, 300.0), hover(), 5);
    let id = game.heart_ids()[10];
    assert!(game.trigger_clear(id));
    assert!(!game.trigger_clear(id));
    game.hover_heart(id);
    assert_eq!(game.cleared(), 1);
    assert_eq!(game.stage().counter_text(), "Hearts cleared: 1");

    game.tick(FRAME * 2.0 + 380.0);
    assert!(game.heart(id).is_none());
    assert!(!game.trigger_clear(id));
    assert_eq!(game.cleared(), 1);
}

#[test]
fn count_rises_per_clear_and_resets_to_zero() {
    let mut game = started(Size::new(400.0, 300.0), hover(), 6);
    for (n, id) in game.heart_ids().into_iter().take(12).enumerate() {
        game.hover_heart(id);
        assert_eq!(game.cleared(), n as u32 + 1);
    }
    game.reset();
    assert_eq!(game.cleared(), 0);
    game.tick(1_000.0);
    assert_eq!(game.live_hearts(), game.last_layout().total());
    assert_eq!(game.phase(), Phase::Playing);
    assert_eq!(game.stage().counter_text(), "Hearts cleared: 0");
}

#[test]
fn touch_with_reduced_motion_needs_two_taps() {
    let caps = Capabilities {
        hover: false,
        reduced_motion: true,
    };
    let mut game = started(Size::new(400.0, 300.0), caps, 8);
    let id = game.heart_ids()[0];

    game.hover_heart(id);
    game.press_heart(id);
    let heart = game.heart(id).unwrap();
    assert_eq!(heart.state(), HeartState::Active);
    assert!(heart.is_armed());
    assert_eq!(game.cleared(), 0);

    game.press_heart(id);
    assert_eq!(game.heart(id).unwrap().state(), HeartState::Cleared);
    assert_eq!(game.cleared(), 1);

    let now = game.now();
    game.tick(now + 99.0);
    assert!(game.heart(id).is_some());
    game.tick(now + 100.0);
    assert!(game.heart(id).is_none());
    assert!(!game.stage().is_mounted(id));
    assert_eq!(game.cleared(), 1);
}

#[test]
fn clicking_the_target_wins_immediately() {
    let mut game = started(Size::new(800.0, 600.0), hover(), 9);
    assert!(!game.stage().modal_visible());
    game.click_target();
    assert_eq!(game.phase(), Phase::Won);
    assert!(game.stage().modal_visible());
    assert!(!game.stage().modal_aria_hidden());

    // repeated wins are absorbed
    game.click_target();
    assert_eq!(game.phase(), Phase::Won);

    game.reset();
    assert_eq!(game.phase(), Phase::Playing);
    assert!(!game.stage().modal_visible());
    assert!(game.stage().modal_aria_hidden());
}

#[test]
fn uncovering_every_sample_point_wins() {
    let mut game = started(Size::new(500.0, 400.0), hover(), 12);
    let viewport = game.stage().viewport();
    let samples = heart_hunt::reveal::sample_points(game.stage().target_rect(), viewport);

    let mut covering: Vec<_> = samples
        .iter()
        .flat_map(|p| game.stage().hearts_at(*p))
        .collect();
    covering.sort_unstable();
    covering.dedup();
    assert!(!covering.is_empty());

    for id in &covering {
        game.hover_heart(*id);
    }
    assert_eq!(game.phase(), Phase::Playing);
    assert_eq!(game.cleared(), covering.len() as u32);

    let now = game.now();
    game.tick(now + 380.0);
    assert_eq!(game.phase(), Phase::Won);
    assert!(game.stage().modal_visible());
    assert!(game.live_hearts() > 0);
}

#[test]
fn zero_sized_target_never_auto_wins() {
    let mut game = started(Size::new(300.0, 200.0), hover(), 2);
    game.stage_mut().set_target_size(Size::new(0.0, 0.0));
    for id in game.heart_ids() {
        game.hover_heart(id);
    }
    game.tick(10_000.0);
    assert_eq!(game.live_hearts(), 0);
    assert_eq!(game.phase(), Phase::Playing);
}
