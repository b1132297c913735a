//! Named palettes stored one per file under `colors/`.

use super::{StorageRoot, remove_file, write_file};
use crate::color::Rgb;
use crate::error::{PomoError, Result};
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    pub name: String,
    pub fg1: Rgb,
    pub fg2: Rgb,
}

impl Palette {
    fn render(&self) -> String {
        format!("{}\n{}\n", self.fg1, self.fg2)
    }

    /// Two whitespace separated hex tokens; anything after them is ignored.
    fn parse(name: &str, contents: &str) -> Option<Self> {
        let mut tokens = contents.split_whitespace();
        let fg1 = Rgb::parse(tokens.next()?).ok()?;
        let fg2 = Rgb::parse(tokens.next()?).ok()?;
        Some(Self {
            name: name.to_string(),
            fg1,
            fg2,
        })
    }
}

pub struct ColorStore {
    dir: PathBuf,
}

impl ColorStore {
    pub fn new(storage: &StorageRoot) -> Self {
        Self {
            dir: storage.colors_dir(),
        }
    }

    /// Names become file names, so they may not escape the colors directory.
    fn path_for(&self, name: &str) -> Result<PathBuf> {
        let valid = !name.is_empty()
            && !name.starts_with('.')
            && !name.contains(['/', '\\'])
            && !name.chars().any(char::is_whitespace);
        if !valid {
            return Err(PomoError::InvalidPaletteName(name.to_string()));
        }
        Ok(self.dir.join(name))
    }

    /// Overwrites an existing palette of the same name.
    pub fn save(&self, name: &str, fg1: Rgb, fg2: Rgb) -> Result<Palette> {
        let path = self.path_for(name)?;
        let palette = Palette {
            name: name.to_string(),
            fg1,
            fg2,
        };
        write_file(&path, &palette.render())?;
        tracing::info!(name, fg1 = %fg1, fg2 = %fg2, "palette saved");
        Ok(palette)
    }

    pub fn load(&self, name: &str) -> Result<Palette> {
        let path = self.path_for(name)?;
        let contents = match fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(PomoError::PaletteNotFound(name.to_string()));
            }
            Err(e) => return Err(PomoError::io_at("reading", &path, e)),
        };
        Palette::parse(name, &contents).ok_or_else(|| {
            tracing::warn!(name, "palette file is malformed");
            PomoError::PaletteNotFound(name.to_string())
        })
    }

    pub fn delete(&self, name: &str) -> Result<()> {
        let path = self.path_for(name)?;
        if remove_file(&path)? {
            tracing::info!(name, "palette deleted");
            Ok(())
        } else {
            Err(PomoError::PaletteNotFound(name.to_string()))
        }
    }

    /// Lazily walks the colors directory in enumeration order. Hidden and
    /// unparseable entries are skipped. Call again to restart.
    pub fn list(&self) -> impl Iterator<Item = Palette> + use<> {
        fs::read_dir(&self.dir)
            .into_iter()
            .flatten()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().map(|t| t.is_file()).unwrap_or(false))
            .filter_map(|entry| {
                let name = entry.file_name().into_string().ok()?;
                if name.starts_with('.') {
                    return None;
                }
                let contents = fs::read_to_string(entry.path()).ok()?;
                Palette::parse(&name, &contents)
            })
    }
}
