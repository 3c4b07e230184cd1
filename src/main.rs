//! Tabdock console demo.
//!
//! Runs the drag-and-drop scenarios between simulated windows and prints the
//! resulting tab order of each window. Set `RUST_LOG` for protocol logging.

use std::sync::Arc;

use tabdock::app::App;
use tabdock::database::connection::Database;
use tabdock::managers::tab_collection::TabCollection;
use tabdock::managers::window_scene::WindowScene;
use tabdock::services::settings_engine::{SettingsEngine, SettingsEngineTrait};
use tabdock::types::drag::{DropItem, DropSession};
use tabdock::types::tab::{Link, TabRecord};
use tracing_subscriber::EnvFilter;

fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("tabdock=info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    println!();
    println!("Tabdock v{} (demo mode)", env!("CARGO_PKG_VERSION"));
    println!();

    let app = match demo_app() {
        Ok(app) => app,
        Err(e) => {
            eprintln!("Failed to start: {}", e);
            std::process::exit(1);
        }
    };

    demo_reorder(&app);
    demo_transfer(&app);
    demo_cancel(&app);
    demo_teardown_before_drop(&app);
    demo_new_window(&app);
    demo_external_link(&app);
    demo_persistence(&app);
}

fn demo_app() -> Result<App, Box<dyn std::error::Error>> {
    let mut settings = SettingsEngine::new(None);
    settings.load()?;
    let db = Database::open_in_memory()?;
    Ok(App::with_database(settings, Arc::new(db)))
}

fn section(name: &str) {
    println!("───────────────────────────────────────────────────────────────");
    println!("  {}", name);
    println!("───────────────────────────────────────────────────────────────");
}

fn window_with(app: &App, sites: &[&str]) -> WindowScene {
    let tabs = sites
        .iter()
        .map(|site| TabRecord::with_link(Link::new(format!("https://{}", site), Some(site.to_string())), false))
        .collect();
    app.open_window_with(TabCollection::from_parts(tabs, 0, false))
}

fn show(label: &str, window: &WindowScene) {
    let titles: Vec<&str> = window.tabs().tabs().iter().map(TabRecord::display_title).collect();
    println!(
        "  {:<8} {:?} (current: {})",
        label,
        titles,
        window.tabs().current_tab().display_title()
    );
}

fn demo_reorder(app: &App) {
    section("Reorder within one window");
    let mut a = window_with(app, &["github.com", "rust-lang.org", "crates.io"]);
    show("before", &a);

    if let Some(item) = a.items_for_beginning(2) {
        let session = DropSession::local(item.gesture, vec![item.drop_item_for(a.id())]);
        a.perform_drop(Some(0), &session);
        if let Some(gesture) = item.gesture {
            println!("  teardown: {:?}", a.drag_session_did_end(gesture));
        }
    }
    show("after", &a);
    println!();
}

fn demo_transfer(app: &App) {
    section("Transfer to another window");
    let mut a = window_with(app, &["github.com", "rust-lang.org"]);
    a.tabs_mut().select(1);
    let mut b = app.open_window();
    show("A", &a);
    show("B", &b);

    if let Some(item) = a.items_for_beginning(0) {
        let session = DropSession::local(item.gesture, vec![item.drop_item_for(b.id())]);
        let outcome = b.perform_drop(Some(0), &session);
        println!("  accepted by B: {}", outcome.accepted.len());
        if let Some(gesture) = item.gesture {
            println!("  teardown in A: {:?}", a.drag_session_did_end(gesture));
        }
    }
    a.process_notices();
    show("A", &a);
    show("B", &b);
    println!();
}

fn demo_cancel(app: &App) {
    section("Cancelled drag");
    let mut a = window_with(app, &["github.com", "rust-lang.org"]);
    if let Some(gesture) = a.items_for_beginning(0).and_then(|item| item.gesture) {
        println!("  teardown: {:?}", a.drag_session_did_end(gesture));
    }
    show("A", &a);
    println!();
}

fn demo_teardown_before_drop(app: &App) {
    section("Teardown delivered before the drop");
    let mut a = window_with(app, &["github.com", "rust-lang.org"]);
    let mut b = app.open_window();

    if let Some(item) = a.items_for_beginning(1) {
        if let Some(gesture) = item.gesture {
            println!("  early teardown in A: {:?}", a.drag_session_did_end(gesture));
        }
        let session = DropSession::local(item.gesture, vec![item.drop_item_for(b.id())]);
        b.perform_drop(None, &session);
    }
    println!("  A released via notice: {}", a.process_notices().len());
    show("A", &a);
    show("B", &b);
    println!();
}

fn demo_new_window(app: &App) {
    section("Drag out into a new window");
    let mut a = window_with(app, &["github.com", "rust-lang.org"]);
    let opened = a
        .open_tab_activity(0)
        .and_then(|activity| app.open_window_for_activity(&activity));
    a.process_notices();
    show("A", &a);
    if let Some(window) = opened {
        show("new", &window);
    }
    println!();
}

fn demo_external_link(app: &App) {
    section("Link dropped from another application");
    let mut a = window_with(app, &["github.com"]);
    let session = DropSession::external(vec![DropItem::external(Link::new("https://docs.rs/", None))]);
    a.perform_drop(Some(1), &session);
    show("A", &a);
    println!();
}

fn demo_persistence(app: &App) {
    section("Window state persistence");
    let a = window_with(app, &["github.com", "rust-lang.org", "crates.io"]);
    match app.save_window(&a).and_then(|_| app.restore_windows()) {
        Ok(windows) => {
            for window in &windows {
                show("restored", window);
            }
        }
        Err(e) => println!("  persistence failed: {}", e),
    }
    println!();
}
