//! Load saved scenes, lay them out, and print each box as markup.
//!
//! Usage: `cargo run -p tagbox-core --example render_markup [scene.json ...]`
//! With no arguments, renders every fixture under `crates/tagbox-core/tests/fixtures`.

use std::env;
use std::fs;
use std::path::PathBuf;
use tagbox_core::{LayoutEngine, emit_document, persist};

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let paths: Vec<PathBuf> = if args.len() > 1 {
        args[1..].iter().map(PathBuf::from).collect()
    } else {
        let mut paths = Vec::new();
        if let Ok(entries) = fs::read_dir("crates/tagbox-core/tests/fixtures") {
            for entry in entries.flatten() {
                let path = entry.path();
                if path.extension().is_some_and(|e| e == "json") {
                    paths.push(path);
                }
            }
        }
        paths.sort();
        paths
    };

    let engine = LayoutEngine::default();
    let mut rendered = 0;
    let mut skipped = 0;

    for path in &paths {
        let input = match fs::read_to_string(path) {
            Ok(s) => s,
            Err(e) => {
                eprintln!("SKIP {}: {}", path.display(), e);
                skipped += 1;
                continue;
            }
        };

        let mut scene = persist::from_json(&input);
        engine.relayout(&mut scene.tree);
        scene.refresh_connections();

        println!("── {} ──", path.display());
        println!("{}", emit_document(&scene.tree));
        for c in scene.connections.iter() {
            let points: Vec<String> = c
                .route()
                .iter()
                .map(|p| format!("({:.0}, {:.0})", p.x, p.y))
                .collect();
            println!("{} → {}: {}", c.from, c.to, points.join(" → "));
        }
        println!();
        rendered += 1;
    }

    println!("Rendered: {}, Skipped: {}", rendered, skipped);
}
