// Configuration knobs flow through to the generated field.

use heart_hunt::geometry::{Size, grid_dims};
use heart_hunt::{Capabilities, Game, GameConfig, MemoryStage};

#[test]
fn custom_spacing_changes_layer_sizes() {
    let config = GameConfig {
        spacing: 100.0,
        ..GameConfig::default()
    };
    assert!(config.validate().is_ok());
    let viewport = Size::new(1024.0, 768.0);
    let stage = MemoryStage::new(viewport, Size::new(120.0, 120.0));
    let mut game = Game::with_seed(stage, config, Capabilities::default(), 77);
    game.reset();
    game.tick(16.0);

    let (cols, rows) = grid_dims(viewport, 100.0);
    assert_eq!((cols, rows), (12, 9));
    assert_eq!(game.last_layout().base, cols * rows);
    assert_eq!(game.last_layout().offset, cols * rows);
}

#[test]
fn hearts_respect_configured_ranges() {
    let config = GameConfig {
        heart_size: (20.0, 21.0),
        z_index: (4, 5),
        ..GameConfig::default()
    };
    let stage = MemoryStage::new(Size::new(300.0, 300.0), Size::new(60.0, 60.0));
    let mut game = Game::with_seed(stage, config, Capabilities::default(), 1);
    game.reset();
    game.tick(16.0);
    for id in game.heart_ids() {
        let heart = game.heart(id).unwrap();
        assert!((20.0..=21.0).contains(&heart.style.size));
        assert_eq!(heart.style.z_index, 4);
    }
}
