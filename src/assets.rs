use crate::error::ErrorReport;
use crate::level::Level;
use rust_embed::RustEmbed;

// Level documents shipped inside the binary
#[derive(RustEmbed)]
#[folder = "levels/"]
pub struct BuiltinLevels;

/// Names of the built-in levels, sorted, without the `.txt` extension
pub fn level_names() -> Vec<String> {
    let mut names: Vec<String> = BuiltinLevels::iter()
        .filter_map(|file| file.strip_suffix(".txt").map(str::to_string))
        .collect();
    names.sort();
    names
}

pub fn level_text(name: &str) -> Option<String> {
    let file = BuiltinLevels::get(&format!("{name}.txt"))?;
    Some(String::from_utf8_lossy(&file.data).into_owned())
}

/// Parses a built-in level, using its file name as the default level name
pub fn load_level(name: &str) -> Option<Result<Level, ErrorReport>> {
    level_text(name).map(|text| Level::parse(name, &text))
}
