/*!
 * Relocation of translated include fragments.
 *
 * Translation mirrors `docs/includes/` to `docs/<lang>/includes/`, but the
 * site expects language fragments under `docs/includes/<lang>/`. This pass
 * moves them there once all translation jobs are done.
 */

use anyhow::{Context, Result};
use log::{debug, info};
use std::fs;
use std::path::{Path, PathBuf};

use crate::translation::core::INCLUDES_DIR;

/// One completed move
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relocation {
    /// Language code
    pub language: String,
    /// Directory that was moved
    pub from: PathBuf,
    /// Where it ended up
    pub to: PathBuf,
}

/// Move `<root>/<lang>/includes` to `<root>/includes/<lang>` for every language
///
/// The folder is first renamed to the staging name `<root>/<lang>/<lang>`
/// and then moved. A staging folder left behind by an interrupted run is
/// picked up as well. When the destination already exists the trees are
/// merged and files from the new translation overwrite older ones.
pub fn relocate_includes<P: AsRef<Path>>(source_root: P, lang_codes: &[String]) -> Result<Vec<Relocation>> {
    let source_root = source_root.as_ref();
    let mut relocations = Vec::new();

    for lang in lang_codes {
        let src_folder = source_root.join(lang).join(INCLUDES_DIR);
        let staging_folder = source_root.join(lang).join(lang);
        let dest_folder = source_root.join(INCLUDES_DIR).join(lang);

        if src_folder.is_dir() {
            move_dir(&src_folder, &staging_folder)?;
        }

        if staging_folder.is_dir() {
            fs::create_dir_all(source_root.join(INCLUDES_DIR))
                .with_context(|| format!("Failed to create {:?}", source_root.join(INCLUDES_DIR)))?;
            move_dir(&staging_folder, &dest_folder)?;
            info!("Moved {} includes to {}", lang, dest_folder.display());

            relocations.push(Relocation {
                language: lang.clone(),
                from: src_folder,
                to: dest_folder,
            });
        } else {
            debug!("No includes to relocate for {}", lang);
        }
    }

    Ok(relocations)
}

/// Rename `from` to `to`, merging into `to` when it already exists
fn move_dir(from: &Path, to: &Path) -> Result<()> {
    if !to.exists() {
        return fs::rename(from, to).with_context(|| format!("Failed to move {:?} to {:?}", from, to));
    }

    merge_dir(from, to)?;
    fs::remove_dir_all(from).with_context(|| format!("Failed to remove {:?}", from))
}

fn merge_dir(from: &Path, to: &Path) -> Result<()> {
    for entry in fs::read_dir(from).with_context(|| format!("Failed to read {:?}", from))? {
        let entry = entry?;
        let source = entry.path();
        let target = to.join(entry.file_name());

        if entry.file_type()?.is_dir() {
            if target.is_dir() {
                merge_dir(&source, &target)?;
                continue;
            }
            if target.exists() {
                fs::remove_file(&target)?;
            }
        } else if target.is_dir() {
            fs::remove_dir_all(&target)?;
        } else if target.exists() {
            // rename does not replace existing files on every platform
            fs::remove_file(&target)?;
        }

        fs::rename(&source, &target).with_context(|| format!("Failed to move {:?} to {:?}", source, target))?;
    }

    Ok(())
}
