//! `adjutant tools` — List the registered tools.

use adjutant_config::AppConfig;

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;
    let registry = adjutant_tools::default_registry(&config);

    let mut defs = registry.definitions();
    defs.sort_by(|a, b| a.name.cmp(&b.name));

    println!("Registered tools ({}):", defs.len());
    println!();
    for def in defs {
        println!("  {:<30} {}", def.name, def.description);
    }

    Ok(())
}
