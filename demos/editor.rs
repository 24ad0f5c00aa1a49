use anyhow::Context;
use macroquad::prelude::*;
use tilegrid_editor::render::{MacroquadBackend, MacroquadImageLoader, RenderBackend};
use tilegrid_editor::{EditorConfig, Map, MapStore, SpriteDatabaseLoader, SpriteId};

fn window_conf() -> Conf {
    Conf {
        window_title: "EDITOR".into(),
        window_width: 1280,
        window_height: 768,
        ..Default::default()
    }
}

#[macroquad::main(window_conf)]
async fn main() {
    env_logger::init();
    if let Err(e) = run().await {
        log::error!("{e:#}");
    }
}

async fn run() -> anyhow::Result<()> {
    let cfg = match std::env::args().nth(1) {
        Some(path) => EditorConfig::load(&path).with_context(|| format!("Reading config {path}"))?,
        None => EditorConfig::default(),
    };
    let diag = cfg.diagnostics();

    let mut map = Map::create(16, 16, 3, cfg.cell_width, cfg.cell_height, "test", diag)?;
    println!("{}", map.metadata());

    let store = MapStore::new(&cfg.asset_root);
    store.save(&mut map, diag).context("Saving map")?;
    map.init_tile_geometry(diag)?;

    let mut backend = MacroquadBackend::new();
    let (catalog, count) = SpriteDatabaseLoader::from_config(&cfg)
        .load(&cfg.sprite_db, &mut MacroquadImageLoader, &mut backend, diag)
        .with_context(|| format!("Loading sprite database {}", cfg.sprite_db.display()))?;

    let mut selected = SpriteId(0);
    let mut tick = 0u64;

    loop {
        clear_background(WHITE);

        if is_mouse_button_down(MouseButton::Left) {
            let (x, y) = mouse_position();
            if let Some((row, col)) = map.pick(x, y) {
                map.place_sprite(0, row, col, selected)?;
            }
        }
        if is_key_pressed(KeyCode::Right) && selected.0 + 1 < count as u32 {
            selected.0 += 1;
        }
        if is_key_pressed(KeyCode::Left) && selected.0 > 0 {
            selected.0 -= 1;
        }
        if is_key_pressed(KeyCode::S) {
            store.save(&mut map, diag).context("Saving map")?;
        }
        if is_key_pressed(KeyCode::Escape) {
            break;
        }

        map.draw_map(&catalog, &mut backend, tick / 8)?;
        let preview = catalog.draw_sprite(selected, map.map_width() + 16, 16)?;
        backend.draw(&preview)?;

        tick += 1;
        next_frame().await;
    }
    Ok(())
}
