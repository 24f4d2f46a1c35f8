use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

pub mod level;
pub mod script;

pub use level::{
    read_save_game, write_save_game, ActivationContext, ActivationListener, AudioSink, EventBus,
    EventSource, ItemWorld, Level, LevelError, LevelObject, ListenerId, LoadListener,
    ObjectHandle, ResolutionError, ResolveUid, SaveGame, SaveGameError, SaveListener, SaveStore,
    Uid, UidTable, SAVE_VERSION,
};
pub use script::{
    p, print, printf, puts, ConsoleOutput, GiantJewelBox, JewelColor, Point, PrintSink, Rect,
    SpawnDescriptor, SpawnPolicy, TargetRef, TypeAliasError, TypeAliases,
};

pub const ROOT_ENV_VAR: &str = "SCRIPTING_ROOT";
pub const SAVE_DIR_ENV_VAR: &str = "SCRIPTING_SAVE_DIR";

#[derive(Debug, Clone)]
pub struct ScriptPaths {
    pub root: PathBuf,
    pub save_dir: PathBuf,
}

impl ScriptPaths {
    pub fn save_file(&self, level_name: &str) -> PathBuf {
        self.save_dir.join(format!("{level_name}.save.json"))
    }
}

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("failed to read environment variable {var}: {source}")]
    EnvVar {
        var: &'static str,
        #[source]
        source: env::VarError,
    },
    #[error("failed to resolve current executable path: {0}")]
    CurrentExe(#[source] std::io::Error),
    #[error("current executable path has no parent directory: {0}")]
    ExeHasNoParent(PathBuf),
    #[error("failed to create save directory at {path}: {source}")]
    CreateSaveDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error(
        "SCRIPTING_ROOT is set but does not point to a valid project root: {path}\n\
A valid root must contain Cargo.toml and either crates/ or levels/."
    )]
    InvalidEnvRoot { path: PathBuf },
    #[error(
        "Could not detect project root by walking upward from executable directory: {start_dir}\n\
Set {env_var} explicitly, for example:\n\
Bash/zsh: export {env_var}=\"/path/to/project\""
    )]
    RootNotFound {
        start_dir: PathBuf,
        env_var: &'static str,
    },
}

/// Resolves the project root and the directory save files are written to.
/// The save directory is created when it does not exist yet.
pub fn resolve_script_paths() -> Result<ScriptPaths, StartupError> {
    let root = resolve_root()?;
    let save_dir = match read_optional_env(SAVE_DIR_ENV_VAR)? {
        Some(value) => PathBuf::from(value),
        None => root.join("cache").join("saves"),
    };

    fs::create_dir_all(&save_dir).map_err(|source| StartupError::CreateSaveDir {
        path: save_dir.clone(),
        source,
    })?;

    Ok(ScriptPaths { root, save_dir })
}

fn read_optional_env(var: &'static str) -> Result<Option<String>, StartupError> {
    match env::var(var) {
        Ok(value) if value.trim().is_empty() => Ok(None),
        Ok(value) => Ok(Some(value)),
        Err(env::VarError::NotPresent) => Ok(None),
        Err(source) => Err(StartupError::EnvVar { var, source }),
    }
}

fn resolve_root() -> Result<PathBuf, StartupError> {
    if let Some(value) = read_optional_env(ROOT_ENV_VAR)? {
        let normalized = normalize_path(&PathBuf::from(value));
        if is_repo_marker(&normalized) {
            return Ok(normalized);
        }
        return Err(StartupError::InvalidEnvRoot { path: normalized });
    }

    let exe = env::current_exe().map_err(StartupError::CurrentExe)?;
    let exe_dir = exe
        .parent()
        .map(Path::to_path_buf)
        .ok_or_else(|| StartupError::ExeHasNoParent(exe.clone()))?;

    exe_dir
        .ancestors()
        .find(|candidate| is_repo_marker(candidate))
        .map(normalize_path)
        .ok_or_else(|| StartupError::RootNotFound {
            start_dir: normalize_path(&exe_dir),
            env_var: ROOT_ENV_VAR,
        })
}

fn is_repo_marker(path: &Path) -> bool {
    let cargo_toml = path.join("Cargo.toml").is_file();
    let has_crates = path.join("crates").is_dir();
    let has_levels = path.join("levels").is_dir();

    cargo_toml && (has_crates || has_levels)
}

fn normalize_path(path: &Path) -> PathBuf {
    fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}
