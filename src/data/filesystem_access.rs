//! Well-known directories used for default output locations.

use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy)]
pub enum FsAccess {
    Current,
}

impl FsAccess {
    /// Default directory for annotated frames written by headless runs, e.g. `./runs/measure`.
    pub fn save_out(subs: &[&str]) -> anyhow::Result<PathBuf> {
        Self::Current.raw_path_with_subs(subs)
    }

    fn get_path(&self) -> anyhow::Result<PathBuf> {
        match self {
            FsAccess::Current => std::env::current_dir()
                .map_err(|e| anyhow::anyhow!("Unable to resolve the {:?} directory: {}", self, e)),
        }
    }

    /// Constructs a path under the base directory with the provided subdirectories, creating it.
    pub fn raw_path_with_subs(&self, subs: &[&str]) -> anyhow::Result<PathBuf> {
        let mut d = self.get_path()?;
        for sub in subs {
            d.push(sub);
        }
        Self::create_directory(&d)?;
        Ok(d)
    }

    /// Creates the specified directory if it does not exist.
    pub fn create_directory(path: &Path) -> anyhow::Result<()> {
        if !path.exists() {
            std::fs::create_dir_all(path)?;
        }
        Ok(())
    }
}
