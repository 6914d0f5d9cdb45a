//! Finding archives in a server directory
//! and running the detectors on them, concurrently.

use std::{
    future::Future,
    path::{Path, PathBuf},
    pin::Pin,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    },
};

use serde::{Deserialize, Serialize};
use sp_core::{
    do_jobs, err, file_utils::read_dir_items, info, pt, IntoIoError, IoError, ProbeConfig,
};
use sp_versions::Package;

use crate::{EnvironmentInfo, ExecutableInfo, Registry};

/// Everything found in a server directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanReport {
    pub environment: EnvironmentInfo,
    /// Recognized executables only, in no particular order.
    pub executables: Vec<ExecutableInfo>,
    /// In no particular order.
    pub packages: Vec<Package>,
}

/// Runs a [`Registry`] over directories.
///
/// Cheap to clone, every clone shares the same registry.
#[derive(Clone)]
pub struct Scanner {
    registry: Arc<Registry>,
    config: Arc<ProbeConfig>,
}

impl Default for Scanner {
    fn default() -> Self {
        Self::new(Registry::default(), ProbeConfig::default())
    }
}

type WalkFuture = Pin<Box<dyn Future<Output = Vec<PathBuf>> + Send>>;

impl Scanner {
    #[must_use]
    pub fn new(registry: Registry, config: ProbeConfig) -> Self {
        Self {
            registry: Arc::new(registry),
            config: Arc::new(config),
        }
    }

    #[must_use]
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    #[must_use]
    pub fn config(&self) -> &ProbeConfig {
        &self.config
    }

    /// Archives directly inside `dir` (not in subdirectories).
    ///
    /// # Errors
    /// If `dir` couldn't be read.
    pub async fn find_archives(&self, dir: &Path) -> Result<Vec<PathBuf>, IoError> {
        Ok(read_dir_items(dir)
            .await?
            .into_iter()
            .filter(|n| n.is_file && self.config.is_archive(&n.path))
            .map(|n| n.path)
            .collect())
    }

    /// Archives anywhere under `dir`.
    ///
    /// Every subdirectory is read by its own task.
    /// Once the number of files seen (of any kind) reaches
    /// [`ProbeConfig::file_limit`] the search stops, and whatever
    /// was found so far is returned. Symlinked directories
    /// aren't followed. Unreadable subdirectories are skipped.
    ///
    /// # Errors
    /// If `dir` itself couldn't be read.
    pub async fn find_archives_recursive(&self, dir: &Path) -> Result<Vec<PathBuf>, IoError> {
        let visited = Arc::new(AtomicUsize::new(0));
        let items = read_dir_items(dir).await?;
        let found = walk_items(items, Arc::clone(&self.config), Arc::clone(&visited)).await;

        if visited.load(Ordering::Relaxed) >= self.config.file_limit {
            pt!(
                "Stopped searching {dir:?} after {} files, results may be incomplete",
                self.config.file_limit
            );
        }
        Ok(found)
    }

    /// Detects the executable in each archive, one task per archive.
    /// Archives that aren't (unambiguously) a server are left out.
    pub async fn detect_executables(&self, paths: Vec<PathBuf>) -> Vec<ExecutableInfo> {
        let jobs = paths.into_iter().map(|path| {
            let registry = Arc::clone(&self.registry);
            tokio::task::spawn_blocking(move || registry.detect_executable(&path))
        });

        do_jobs(jobs, self.config.job_limit())
            .await
            .into_iter()
            .filter_map(|n| match n {
                Ok(info) => (!info.is_unknown()).then_some(info),
                Err(error) => {
                    err!("Executable detection task failed: {error}");
                    None
                }
            })
            .collect()
    }

    /// Detects the packages in each archive, one task per archive.
    pub async fn detect_packages(&self, paths: Vec<PathBuf>) -> Vec<Package> {
        let jobs = paths.into_iter().map(|path| {
            let registry = Arc::clone(&self.registry);
            tokio::task::spawn_blocking(move || registry.detect_packages(&path))
        });

        let mut packages = Vec::new();
        for result in do_jobs(jobs, self.config.job_limit()).await {
            match result {
                Ok(found) => packages.extend(found),
                Err(error) => err!("Package detection task failed: {error}"),
            }
        }
        packages
    }

    /// Inspects a whole server directory.
    ///
    /// The environment is detected first, since MCDR moves
    /// the actual server into a subdirectory. Executables are
    /// searched for in the server directory itself, packages in
    /// the mod directories and MCDR plugin directories.
    ///
    /// A working directory or package directory that can't be
    /// read is logged and skipped.
    ///
    /// # Errors
    /// If `dir` itself couldn't be read.
    pub async fn scan(&self, dir: &Path) -> Result<ScanReport, IoError> {
        info!("Scanning server at {dir:?}");
        tokio::fs::read_dir(dir).await.dir(dir)?;

        let environment = {
            let registry = Arc::clone(&self.registry);
            let dir = dir.to_owned();
            tokio::task::spawn_blocking(move || registry.detect_environment(&dir))
        }
        .await
        .unwrap_or_else(|error| {
            err!("Environment detection task failed: {error}");
            EnvironmentInfo::new(dir)
        });

        let working_directory = environment.working_directory();
        let executables = match self.find_archives(&working_directory).await {
            Ok(archives) => self.detect_executables(archives).await,
            Err(error) => {
                err!("Couldn't search server directory: {error}");
                Vec::new()
            }
        };

        let mut package_dirs: Vec<PathBuf> = self
            .config
            .mod_directories
            .iter()
            .map(|n| working_directory.join(n))
            .collect();
        package_dirs.extend(environment.plugin_directories().iter().cloned());
        package_dirs.sort();
        package_dirs.dedup();

        let mut archives = Vec::new();
        for package_dir in package_dirs {
            if !package_dir.is_dir() {
                continue;
            }
            match self.find_archives_recursive(&package_dir).await {
                Ok(found) => archives.extend(found),
                Err(error) => err!("Couldn't search {package_dir:?}: {error}"),
            }
        }
        archives.sort();
        archives.dedup();
        let packages = self.detect_packages(archives).await;

        pt!(
            "Found {} executable(s) and {} package(s)",
            executables.len(),
            packages.len()
        );
        Ok(ScanReport {
            environment,
            executables,
            packages,
        })
    }
}

fn walk(dir: PathBuf, config: Arc<ProbeConfig>, visited: Arc<AtomicUsize>) -> WalkFuture {
    Box::pin(async move {
        match read_dir_items(&dir).await {
            Ok(items) => walk_items(items, config, visited).await,
            Err(error) => {
                err!("Skipping unreadable directory: {error}");
                Vec::new()
            }
        }
    })
}

/// Collects archives among `items`, then searches
/// the subdirectories concurrently and merges their
/// results into this task's list.
async fn walk_items(
    items: Vec<sp_core::file_utils::DirItem>,
    config: Arc<ProbeConfig>,
    visited: Arc<AtomicUsize>,
) -> Vec<PathBuf> {
    let mut found = Vec::new();
    let mut subdirs = Vec::new();

    for item in items {
        if item.is_dir {
            if !item.is_symlink {
                subdirs.push(item.path);
            }
            continue;
        }
        if visited.fetch_add(1, Ordering::Relaxed) >= config.file_limit {
            return found;
        }
        if item.is_file && config.is_archive(&item.path) {
            found.push(item.path);
        }
    }

    if visited.load(Ordering::Relaxed) >= config.file_limit {
        return found;
    }

    let tasks = subdirs
        .into_iter()
        .map(|dir| tokio::spawn(walk(dir, Arc::clone(&config), Arc::clone(&visited))));
    for result in do_jobs(tasks, None).await {
        match result {
            Ok(n) => found.extend(n),
            Err(error) => err!("Directory search task failed: {error}"),
        }
    }
    found
}
