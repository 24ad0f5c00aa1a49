// tests/map_tests.rs

mod common;

use common::{init_logging, FakeImages, RecordingBackend};
use std::fs;
use tilegrid_editor::{
    load_map, Diagnostics, Map, MapError, MapStore, Region, SpriteDatabaseLoader, SpriteId, Tile,
    TileKind,
};

#[test]
fn create_map_matches_editor_defaults() {
    let map = Map::create(16, 16, 3, 16, 16, "test", Diagnostics::QUIET).unwrap();
    assert_eq!(map.map_width(), 256);
    assert_eq!(map.map_height(), 256);
    assert_eq!(map.tile_count(), 768);
}

#[test]
fn save_and_reload_keeps_header_and_raw_grid() {
    init_logging();
    let root = tempfile::tempdir().unwrap();
    let store = MapStore::new(root.path());

    let mut map = Map::create(5, 4, 3, 16, 16, "forest", Diagnostics::VERBOSE).unwrap();
    for layer in 0..3 {
        for row in 0..4 {
            for col in 0..5 {
                map.set_raw(layer, row, col, layer * 100 + row * 10 + col).unwrap();
            }
        }
    }
    store.save(&mut map, Diagnostics::VERBOSE).unwrap();

    let storage = map.storage_path().expect("saved map has a storage path");
    let loaded = load_map(storage, Diagnostics::QUIET).unwrap();

    assert_eq!(loaded.metadata(), map.metadata());
    for layer in 0..3 {
        for row in 0..4 {
            let a: Vec<u32> = map.raw_row(layer, row).unwrap().collect();
            let b: Vec<u32> = loaded.raw_row(layer, row).unwrap().collect();
            assert_eq!(a, b);
        }
    }
}

#[test]
fn metadata_file_is_a_single_comma_line() {
    let root = tempfile::tempdir().unwrap();
    let store = MapStore::new(root.path());
    let mut map = Map::create(16, 16, 3, 16, 16, "test", Diagnostics::QUIET).unwrap();
    let dir = store.save(&mut map, Diagnostics::QUIET).unwrap();

    let md = fs::read_to_string(dir.join("test.md")).unwrap();
    let expected_dir = format!("{}/", dir.display());
    assert_eq!(md, format!("16,16,3,16,16,{expected_dir}\n"));

    let layer = fs::read_to_string(dir.join("test_2.lr")).unwrap();
    assert_eq!(layer.lines().count(), 16);
    assert!(layer.lines().all(|l| l == "0,".repeat(16)));
}

#[test]
fn tampered_layer_file_is_a_dimension_mismatch() {
    let root = tempfile::tempdir().unwrap();
    let store = MapStore::new(root.path());
    let mut map = Map::create(3, 3, 1, 8, 8, "cave", Diagnostics::QUIET).unwrap();
    let dir = store.save(&mut map, Diagnostics::QUIET).unwrap();

    fs::write(dir.join("cave_0.lr"), "0,0,0,\n0,0,0,\n").unwrap();
    let err = store.load("cave", Diagnostics::QUIET).unwrap_err();
    assert!(matches!(
        err,
        MapError::DimensionMismatch {
            expected: (3, 3),
            found: (2, 3),
            ..
        }
    ));
}

#[test]
fn legacy_metadata_is_rejected_as_corrupt() {
    let root = tempfile::tempdir().unwrap();
    let dir = root.path().join("old");
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("old.md"), "40x30\n").unwrap();

    let err = load_map(&dir, Diagnostics::QUIET).unwrap_err();
    assert!(matches!(err, MapError::CorruptMetadata { .. }));
}

#[test]
fn reloaded_map_draws_placed_sprites() {
    let root = tempfile::tempdir().unwrap();
    let manifest = root.path().join("sprite.db");
    fs::write(&manifest, "tiles.png\n").unwrap();
    let mut images = FakeImages::default().with(root.path().join("tiles.png"), 80, 80);
    let mut backend = RecordingBackend::default();
    let (catalog, _) = SpriteDatabaseLoader::default()
        .load(&manifest, &mut images, &mut backend, Diagnostics::QUIET)
        .unwrap();

    let store = MapStore::new(root.path().join("asset"));
    let mut map = Map::create(4, 3, 2, 16, 16, "town", Diagnostics::QUIET).unwrap();
    map.place_sprite(0, 1, 2, SpriteId(6)).unwrap();
    map.set_tile(1, 2, 3, Tile::ranged(SpriteId(0), SpriteId(1))).unwrap();
    store.save(&mut map, Diagnostics::QUIET).unwrap();

    let mut loaded = store.load("town", Diagnostics::QUIET).unwrap();
    loaded.init_tile_geometry(Diagnostics::QUIET).unwrap();
    for layer in 0..2 {
        assert_eq!(
            loaded.tile(layer, 1, 2).unwrap().region,
            Region::new(32, 16, 16, 16)
        );
    }

    loaded.draw_map(&catalog, &mut backend, 0).unwrap();
    assert_eq!(backend.draws.len(), 2);
    assert_eq!(backend.draws[0].src, Region::new(16, 16, 16, 16));
    assert_eq!(backend.draws[0].dest, Region::new(32, 16, 16, 16));
    // Animation ranges are not persisted; the layer value keeps the first frame.
    assert_eq!(backend.draws[1].src, Region::new(0, 0, 16, 16));
    assert_eq!(backend.draws[1].dest, Region::new(48, 32, 16, 16));
}

#[test]
fn event_tile_reloads_as_the_same_empty_cell() {
    let root = tempfile::tempdir().unwrap();
    let store = MapStore::new(root.path());
    let mut map = Map::create(2, 1, 1, 8, 8, "gate", Diagnostics::QUIET).unwrap();
    let event = Tile {
        sprite_id: Some(SpriteId(4)),
        kind: TileKind::Event,
        ..Tile::default()
    };
    map.set_tile(0, 0, 1, event).unwrap();
    let before = map.tile(0, 0, 1).unwrap();
    assert_eq!(before.sprite_id, None);
    store.save(&mut map, Diagnostics::QUIET).unwrap();

    let loaded = store.load("gate", Diagnostics::QUIET).unwrap();
    assert_eq!(loaded.raw(0, 0, 1).unwrap(), 0);
    assert_eq!(loaded.tile(0, 0, 1).unwrap().sprite_id, before.sprite_id);
}
