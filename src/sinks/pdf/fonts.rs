use anyhow::{anyhow, Context, Result};
use pdf_gen::id_arena_crate::Id;
use pdf_gen::Font;
use std::path::{Path, PathBuf};

/// Name of the family compiled into the binary
pub const BUNDLED_FONT: &str = "DejaVuSansMono";

/// Font IDs for the document, populated during render.
pub struct FontIds {
    pub regular: Id<Font>,
    pub bold: Id<Font>,
    pub italic: Id<Font>,
    pub bold_italic: Id<Font>,
}

impl FontIds {
    /// The variant matching a highlighted token's style
    pub fn styled(&self, bold: bool, italic: bool) -> Id<Font> {
        match (bold, italic) {
            (true, true) => self.bold_italic,
            (true, false) => self.bold,
            (false, true) => self.italic,
            (false, false) => self.regular,
        }
    }
}

/// Loaded font data before being added to the document.
///
/// Supports two loading modes:
/// - "DejaVuSansMono": the bundled family, with all four variants
/// - "./path/to/Font": a family read from disk using the usual naming conventions,
///   `Font-Regular.ttf` (or `Font.ttf`), `Font-Bold.ttf`, `Font-Italic.ttf` or
///   `Font-Oblique.ttf`, and so on. Missing variants fall back to the regular face.
pub struct LoadedFonts {
    pub regular: Font,
    pub bold: Font,
    pub italic: Font,
    pub bold_italic: Font,
}

impl LoadedFonts {
    pub fn load(font_name: &str) -> Result<LoadedFonts> {
        match font_name {
            BUNDLED_FONT => Self::load_dejavu_sans_mono(),
            _ => Self::load_from_path(font_name),
        }
    }

    fn load_dejavu_sans_mono() -> Result<LoadedFonts> {
        let regular =
            Font::load(include_bytes!("../../../assets/fonts/DejaVuSansMono.ttf").to_vec())
                .with_context(|| "Failed to load DejaVuSansMono.ttf")?;
        let bold =
            Font::load(include_bytes!("../../../assets/fonts/DejaVuSansMono-Bold.ttf").to_vec())
                .with_context(|| "Failed to load DejaVuSansMono-Bold.ttf")?;
        let italic =
            Font::load(include_bytes!("../../../assets/fonts/DejaVuSansMono-Oblique.ttf").to_vec())
                .with_context(|| "Failed to load DejaVuSansMono-Oblique.ttf")?;
        let bold_italic = Font::load(
            include_bytes!("../../../assets/fonts/DejaVuSansMono-BoldOblique.ttf").to_vec(),
        )
        .with_context(|| "Failed to load DejaVuSansMono-BoldOblique.ttf")?;
        Ok(LoadedFonts {
            regular,
            bold,
            italic,
            bold_italic,
        })
    }

    fn load_from_path(font_path: &str) -> Result<LoadedFonts> {
        let base = PathBuf::from(font_path);

        let regular_path = find_font_file(&base, &["Regular", "regular", ""])?;
        let regular = load_font(&regular_path)?;

        let bold = try_load_variant(&base, &["Bold", "bold"], &regular_path)?;
        let italic = try_load_variant(
            &base,
            &["Italic", "It", "Oblique", "italic", "oblique"],
            &regular_path,
        )?;
        let bold_italic = try_load_variant(
            &base,
            &["BoldItalic", "BoldIt", "BoldOblique", "bolditalic"],
            &regular_path,
        )?;

        Ok(LoadedFonts {
            regular,
            bold,
            italic,
            bold_italic,
        })
    }
}

fn load_font(path: &Path) -> Result<Font> {
    let data = std::fs::read(path)
        .with_context(|| format!("Failed to read font file: {}", path.display()))?;
    Font::load(data).with_context(|| format!("Failed to parse font file: {}", path.display()))
}

fn variant_path(base: &Path, suffix: &str) -> PathBuf {
    if suffix.is_empty() {
        PathBuf::from(format!("{}.ttf", base.display()))
    } else {
        PathBuf::from(format!("{}-{}.ttf", base.display(), suffix))
    }
}

fn find_font_file(base: &Path, suffixes: &[&str]) -> Result<PathBuf> {
    // a single .ttf is used for every variant
    if base
        .extension()
        .is_some_and(|e| e.eq_ignore_ascii_case("ttf"))
    {
        if base.exists() {
            return Ok(base.to_path_buf());
        }
        return Err(anyhow!("Font file not found: {}", base.display()));
    }

    let candidates: Vec<PathBuf> = suffixes.iter().map(|s| variant_path(base, s)).collect();
    if let Some(found) = candidates.iter().find(|p| p.exists()) {
        return Ok(found.clone());
    }

    let tried: Vec<String> = candidates.iter().map(|p| p.display().to_string()).collect();
    Err(anyhow!(
        "Could not find font file. Tried: {}. \
        \nHint: set `font` in the [pdf] table of notebook.toml to a family like ./fonts/MyFont, \
        with files named MyFont-Regular.ttf, MyFont-Bold.ttf, etc.",
        tried.join(", ")
    ))
}

fn try_load_variant(base: &Path, suffixes: &[&str], fallback_path: &Path) -> Result<Font> {
    let found = suffixes
        .iter()
        .map(|s| variant_path(base, s))
        .find(|p| p.exists());
    match found {
        Some(path) => load_font(&path),
        None => load_font(fallback_path),
    }
}
