//! The `pathfinder init` command.

use std::path::Path;

use anyhow::Result;

const SAMPLE_CONFIG: &str = r#"# pathfinder configuration

default_quiz = "assessments/career.toml"
default_catalog = "catalogs/careers.toml"

# "strict" only accepts listed options; "permissive" stores any answer.
answer_policy = "strict"

[api]
# Overrides PATHFINDER_API_BASE_URL when set.
# base_url = "http://localhost:5000"
timeout_secs = 30
token = "${PATHFINDER_TOKEN}"
"#;

const CAREER_ASSESSMENT: &str = include_str!("../../../../assessments/career.toml");
const CAREER_CATALOG: &str = include_str!("../../../../catalogs/careers.toml");

pub fn execute() -> Result<()> {
    write_if_absent(Path::new("pathfinder.toml"), SAMPLE_CONFIG)?;
    write_if_absent(Path::new("assessments/career.toml"), CAREER_ASSESSMENT)?;
    write_if_absent(Path::new("catalogs/careers.toml"), CAREER_CATALOG)?;

    println!("\nNext steps:");
    println!("  1. Point [api] in pathfinder.toml at your back end");
    println!("  2. Run: pathfinder validate --quiz assessments/career.toml");
    println!("  3. Run: pathfinder take --save progress.json");

    Ok(())
}

fn write_if_absent(path: &Path, content: &str) -> Result<()> {
    if path.exists() {
        println!("{} already exists, skipping.", path.display());
        return Ok(());
    }
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, content)?;
    println!("Created {}", path.display());
    Ok(())
}
