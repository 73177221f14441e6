//! Skill loader for reading skill packages from the filesystem.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use async_fs as afs;
use futures_lite::stream::StreamExt;
use tracing::debug;

use crate::package::{
    ASSETS_DIR, MarkdownFile, REFERENCES_DIR, SCRIPTS_DIR, SKILL_MD, SkillPackage,
    directory_name,
};
use crate::SkillError;

/// Discovers skill directories and loads them into [`SkillPackage`]s.
///
/// # Example
///
/// ```rust,ignore
/// let loader = SkillLoader::new().add_path("skills");
///
/// for dir in loader.discover().await? {
///     let package = SkillLoader::load(&dir).await?;
///     println!("{}: {} reference files", package.name, package.references.len());
/// }
/// ```
#[derive(Debug, Default)]
pub struct SkillLoader {
    paths: Vec<PathBuf>,
}

/// A directory entry found while walking a skill.
#[derive(Debug)]
struct Entry {
    path: PathBuf,
    relative: String,
    is_dir: bool,
}

impl SkillLoader {
    /// Create a new skill loader with no paths.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a collection directory to search for skills.
    ///
    /// The structure expected is:
    /// ```text
    /// path/
    /// └── skill-name/
    ///     └── SKILL.md
    /// ```
    #[must_use]
    pub fn add_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.paths.push(path.into());
        self
    }

    /// List every skill directory under the configured paths.
    ///
    /// Hidden directories are skipped; plain files are ignored. Results are
    /// sorted by path.
    ///
    /// # Errors
    ///
    /// Returns an error if a configured path is missing, is not a directory,
    /// or cannot be listed.
    pub async fn discover(&self) -> Result<Vec<PathBuf>, SkillError> {
        let mut dirs = Vec::new();

        for base_path in &self.paths {
            ensure_directory(base_path).await?;

            for entry in list_dir(base_path, "").await? {
                if entry.is_dir && !entry.relative.starts_with('.') {
                    dirs.push(entry.path);
                }
            }
        }

        dirs.sort();
        debug!(count = dirs.len(), "discovered skill directories");
        Ok(dirs)
    }

    /// Load a skill package from a specific directory.
    ///
    /// A missing `SKILL.md` is not an error here; the package simply has no
    /// entry-point file and the rules report it.
    ///
    /// # Errors
    ///
    /// Returns an error if any file or directory inside the skill cannot be read.
    pub async fn load(dir: &Path) -> Result<SkillPackage, SkillError> {
        let mut package = SkillPackage::new(dir);
        package.name = skill_name(dir).await?;

        for entry in list_dir(dir, "").await? {
            package.add_entry(&entry.relative);

            if !entry.is_dir {
                if entry.relative == SKILL_MD {
                    let content = read_lossy(&entry.path).await?;
                    package.skill_md = Some(MarkdownFile::parse(dir, SKILL_MD, &content));
                }
                continue;
            }

            let nested = walk(&entry.path, &entry.relative).await?;
            match entry.relative.as_str() {
                REFERENCES_DIR => {
                    for file in nested.into_iter().filter(|e| !e.is_dir) {
                        if file.relative.ends_with(".md") {
                            let content = read_lossy(&file.path).await?;
                            package
                                .references
                                .push(MarkdownFile::parse(dir, &file.relative, &content));
                        }
                        package.reference_paths.insert(file.relative);
                    }
                }
                SCRIPTS_DIR => package.scripts = files_only(nested),
                ASSETS_DIR => package.assets = files_only(nested),
                _ => {
                    for inner in nested {
                        package.add_entry(&inner.relative);
                    }
                }
            }
        }

        debug!(
            skill = %package.name,
            references = package.references.len(),
            scripts = package.scripts.len(),
            assets = package.assets.len(),
            "loaded skill package"
        );
        Ok(package)
    }
}

/// Fail unless `path` exists and is a directory.
///
/// # Errors
///
/// Returns [`SkillError::NotFound`] or [`SkillError::NotADirectory`], or
/// [`SkillError::ReadFile`] if the metadata can't be read.
pub async fn ensure_directory(path: &Path) -> Result<(), SkillError> {
    match afs::metadata(path).await {
        Ok(meta) if meta.is_dir() => Ok(()),
        Ok(_) => Err(SkillError::NotADirectory {
            path: path.to_path_buf(),
        }),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Err(SkillError::NotFound {
            path: path.to_path_buf(),
        }),
        Err(source) => Err(SkillError::ReadFile {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Name of the skill at `dir`. Paths such as `.` or `..` have no final
/// component, so they are resolved first.
async fn skill_name(dir: &Path) -> Result<String, SkillError> {
    if dir.file_name().is_some() {
        return Ok(directory_name(dir));
    }
    let resolved = afs::canonicalize(dir)
        .await
        .map_err(|source| SkillError::ReadFile {
            path: dir.to_path_buf(),
            source,
        })?;
    Ok(directory_name(&resolved))
}

fn files_only(entries: Vec<Entry>) -> Vec<String> {
    entries
        .into_iter()
        .filter(|e| !e.is_dir)
        .map(|e| e.relative)
        .collect()
}

async fn read_lossy(path: &Path) -> Result<String, SkillError> {
    let bytes = afs::read(path).await.map_err(|source| SkillError::ReadFile {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// List the direct children of `dir`, sorted by name.
async fn list_dir(dir: &Path, prefix: &str) -> Result<Vec<Entry>, SkillError> {
    let mut entries = afs::read_dir(dir)
        .await
        .map_err(|source| SkillError::ReadFile {
            path: dir.to_path_buf(),
            source,
        })?;

    let mut found = Vec::new();
    while let Some(entry) = entries
        .try_next()
        .await
        .map_err(|source| SkillError::ReadFile {
            path: dir.to_path_buf(),
            source,
        })?
    {
        let path = entry.path();
        let file_type = entry
            .file_type()
            .await
            .map_err(|source| SkillError::ReadFile {
                path: path.clone(),
                source,
            })?;

        let name = entry.file_name().to_string_lossy().into_owned();
        let relative = if prefix.is_empty() {
            name
        } else {
            format!("{prefix}/{name}")
        };
        let is_dir = if file_type.is_symlink() {
            // dangling links count as plain files
            afs::metadata(&path).await.is_ok_and(|meta| meta.is_dir())
        } else {
            file_type.is_dir()
        };
        found.push(Entry {
            path,
            relative,
            is_dir,
        });
    }

    found.sort_by(|a, b| a.relative.cmp(&b.relative));
    Ok(found)
}

/// Every entry below `dir`, sorted by relative path.
///
/// Symlinked directories are followed, each real directory at most once.
async fn walk(dir: &Path, prefix: &str) -> Result<Vec<Entry>, SkillError> {
    let mut all = Vec::new();
    let mut visited = HashSet::new();
    let mut pending = vec![(dir.to_path_buf(), prefix.to_string())];

    while let Some((current, current_prefix)) = pending.pop() {
        let resolved = afs::canonicalize(&current)
            .await
            .map_err(|source| SkillError::ReadFile {
                path: current.clone(),
                source,
            })?;
        if !visited.insert(resolved) {
            debug!(dir = %current.display(), "skipping directory already walked");
            continue;
        }

        for entry in list_dir(&current, &current_prefix).await? {
            if entry.is_dir {
                pending.push((entry.path.clone(), entry.relative.clone()));
            }
            all.push(entry);
        }
    }

    all.sort_by(|a, b| a.relative.cmp(&b.relative));
    Ok(all)
}
