// Language override example for prefscope
//
// Run with: cargo run --example override_usage

use prefscope::{PreferenceService, Scope};
use serde_json::json;
use std::path::Path;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    // User settings in ./example_config, workspace settings in ./example_workspace
    let prefs = PreferenceService::builder("override-demo")
        .config_dir("./example_config")
        .workspace_file("./example_workspace/.prefs/settings.json")
        .with_folder("./example_workspace/backend")
        .with_defaults(json!({
            "editor.tabSize": 4,
            "editor.fontSize": 14,
            "[markdown]": { "editor.wordWrap": "on" }
        }))
        .build()?;

    println!("📦 prefscope Override Example\n");

    // Print every change as it is committed
    prefs.events().on_change(|change| {
        println!(
            "  🔔 [{}] {}: {:?} -> {:?}",
            change.scope, change.key, change.old_value, change.new_value
        );
    });

    println!("🔧 Setting Swift overrides in the workspace...");
    prefs.set("[swift].editor.tabSize", json!(6), Scope::Workspace, None)?;
    prefs.set("[swift].editor.fontSize", json!(16), Scope::Workspace, None)?;

    let raw = prefs.document(Scope::Workspace, None)?;
    println!("✅ Workspace document:");
    println!("{}\n", raw.to_json_string(true)?);

    println!("🔍 Effective values:");
    for key in ["editor.tabSize", "[swift].editor.tabSize", "[rust].editor.tabSize"] {
        println!("  {key} = {:?}", prefs.get(key, None));
    }
    println!();

    println!("📁 Folder scope beats the workspace override for files in backend/...");
    let file = Path::new("./example_workspace/backend/main.swift");
    prefs.set("editor.tabSize", json!(2), Scope::Folder, Some(file))?;
    let inspection = prefs.inspect("[swift].editor.tabSize", Some(file));
    println!("{}\n", serde_json::to_string_pretty(&inspection)?);

    println!("🔄 Removing the Swift group...");
    prefs.reset("[swift]", Scope::Workspace, None)?;
    println!(
        "✅ [swift].editor.tabSize is back to {:?}\n",
        prefs.get("[swift].editor.tabSize", None)
    );

    // Cleanup
    prefs.clear_scope(Scope::Folder, Some(file))?;
    std::fs::remove_dir_all("./example_config").ok();
    std::fs::remove_dir_all("./example_workspace").ok();

    println!("✨ Example completed!");
    Ok(())
}
