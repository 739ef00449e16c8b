use std::fs;
use std::path::{Path, PathBuf};

use egui::{FontData, FontDefinitions, FontFamily};

const SYSTEM_FONT_DIRS: &[&str] = &[
    "/usr/share/fonts/truetype/msttcorefonts",
    "/usr/share/fonts/TTF",
    "/usr/share/fonts/truetype",
    "/usr/local/share/fonts",
    "/Library/Fonts",
    "/System/Library/Fonts/Supplemental",
    "C:\\Windows\\Fonts",
];

const BOLD_FAMILY: &str = "bold";

/// Family of the bold variant of the installed font. Always registered by [install];
/// it falls back to the proportional fonts when no bold file exists.
pub fn bold_family() -> FontFamily {
    FontFamily::Name(BOLD_FAMILY.into())
}

/// file names tried for the regular face of `name`
fn regular_files(name: &str) -> Vec<String> {
    vec![format!("{name}.ttf"), format!("{}.ttf", name.to_lowercase())]
}

/// file names tried for the bold face of `name`, e.g. `Arial Bold.ttf` or `arialbd.ttf`
fn bold_files(name: &str) -> Vec<String> {
    vec![
        format!("{name} Bold.ttf"),
        format!("{name}_Bold.ttf"),
        format!("{}bd.ttf", name.to_lowercase()),
    ]
}

/// First of `file_names` found in the given directories.
pub fn find_font(file_names: &[String], dirs: &[PathBuf]) -> Option<PathBuf> {
    dirs.iter()
        .flat_map(|dir| file_names.iter().map(move |file_name| dir.join(file_name)))
        .find(|path| path.is_file())
}

fn system_font_dirs() -> Vec<PathBuf> {
    SYSTEM_FONT_DIRS.iter().map(PathBuf::from).collect()
}

/// Makes the named system font the first proportional font of `ctx` and its bold face the
/// first font of [bold_family]. Missing faces fall back to egui's built-in proportional font.
pub fn install(ctx: &egui::Context, name: &str) {
    let dirs = system_font_dirs();
    let regular = find_font(&regular_files(name), &dirs);
    let bold = find_font(&bold_files(name), &dirs);
    if regular.is_none() {
        log::warn!("font '{name}' not found; using the built-in font");
    }
    if bold.is_none() {
        log::warn!("bold font '{name}' not found; titles use the regular font");
    }
    ctx.set_fonts(font_definitions(name, regular.as_deref(), bold.as_deref()));
}

fn font_definitions(name: &str, regular: Option<&Path>, bold: Option<&Path>) -> FontDefinitions {
    let mut fonts = FontDefinitions::default();

    if let Some(data) = regular.and_then(read_font) {
        fonts.font_data.insert(name.to_owned(), data);
        fonts
            .families
            .entry(FontFamily::Proportional)
            .or_default()
            .insert(0, name.to_owned());
    }

    let mut bold_fonts = fonts.families.get(&FontFamily::Proportional).cloned().unwrap_or_default();
    if let Some(data) = bold.and_then(read_font) {
        let bold_name = format!("{name} Bold");
        fonts.font_data.insert(bold_name.clone(), data);
        bold_fonts.insert(0, bold_name);
    }
    fonts.families.insert(bold_family(), bold_fonts);
    fonts
}

fn read_font(path: &Path) -> Option<FontData> {
    match fs::read(path) {
        Ok(data) => {
            log::info!("using font {}", path.display());
            Some(FontData::from_owned(data))
        }
        Err(e) => {
            log::warn!("cannot read font {}: {e}; using the built-in font", path.display());
            None
        }
    }
}
