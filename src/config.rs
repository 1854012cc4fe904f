use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use serde::{Deserialize, Serialize};

pub const DEFAULT_WORKBOOK: &str = "datos.xlsx";
pub const DEFAULT_MAX_WORDS: usize = 100;
pub const CONFIG_FILE_NAME: &str = ".student-dashboard.toml";

/// Command-line arguments.
#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Workbook with the student records
    #[arg(value_name = "WORKBOOK", env = "STUDENT_DASHBOARD_DATA")]
    pub workbook: Option<PathBuf>,

    /// Sheet to read (default: first sheet)
    #[arg(long, value_name = "NAME")]
    pub sheet: Option<String>,

    /// Maximum number of terms in the themes view
    #[arg(long, value_name = "COUNT", value_parser = parse_max_words)]
    pub max_words: Option<usize>,

    /// Configuration file (default: .student-dashboard.toml if present)
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

fn parse_max_words(s: &str) -> std::result::Result<usize, String> {
    match s.parse::<usize>() {
        Ok(0) => Err("must be at least 1".to_string()),
        Ok(n) => Ok(n),
        Err(e) => Err(e.to_string()),
    }
}

/// Optional settings file. Every field may be omitted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FileConfig {
    pub workbook: Option<PathBuf>,
    pub sheet: Option<String>,
    pub max_words: Option<usize>,
}

impl FileConfig {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("parsing config file {}", path.display()))
    }
}

/// Effective settings: CLI over config file over defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub workbook: PathBuf,
    pub sheet: Option<String>,
    pub max_words: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            workbook: PathBuf::from(DEFAULT_WORKBOOK),
            sheet: None,
            max_words: DEFAULT_MAX_WORDS,
        }
    }
}

impl Config {
    /// Resolve settings from parsed CLI arguments.
    ///
    /// An explicit `--config` must exist; the default file is optional.
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        Self::from_cli_in(cli, Path::new("."))
    }

    /// Same as [`Config::from_cli`], looking for the default config file in `dir`.
    pub fn from_cli_in(cli: &Cli, dir: &Path) -> Result<Self> {
        let default_file = dir.join(CONFIG_FILE_NAME);
        let file = match &cli.config {
            Some(path) => FileConfig::load_from_file(path)?,
            None if default_file.exists() => FileConfig::load_from_file(&default_file)?,
            None => FileConfig::default(),
        };
        let mut config = Self::default();
        config.merge_file(&file);
        config.merge_cli(cli);
        config.validate()?;
        config.workbook = resolve_workbook(&config.workbook);
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        anyhow::ensure!(self.max_words > 0, "max_words must be at least 1");
        anyhow::ensure!(
            !self.workbook.as_os_str().is_empty(),
            "workbook path must not be empty"
        );
        Ok(())
    }

    pub fn merge_file(&mut self, file: &FileConfig) {
        if let Some(ref workbook) = file.workbook {
            self.workbook = workbook.clone();
        }
        if let Some(ref sheet) = file.sheet {
            self.sheet = Some(sheet.clone());
        }
        if let Some(max_words) = file.max_words {
            self.max_words = max_words;
        }
    }

    pub fn merge_cli(&mut self, cli: &Cli) {
        if let Some(ref workbook) = cli.workbook {
            self.workbook = workbook.clone();
        }
        if let Some(ref sheet) = cli.sheet {
            self.sheet = Some(sheet.clone());
        }
        if let Some(max_words) = cli.max_words {
            self.max_words = max_words;
        }
    }
}

/// A relative path that does not exist in the working directory is looked
/// up next to the executable; otherwise it is returned unchanged.
pub fn resolve_workbook(path: &Path) -> PathBuf {
    let exe_dir = std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf));
    resolve_workbook_from(path, exe_dir.as_deref())
}

fn resolve_workbook_from(path: &Path, exe_dir: Option<&Path>) -> PathBuf {
    if path.is_absolute() || path.exists() {
        return path.to_path_buf();
    }
    exe_dir
        .map(|dir| dir.join(path))
        .filter(|candidate| candidate.exists())
        .unwrap_or_else(|| path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    fn cli(args: &[&str]) -> Cli {
        Cli::parse_from(std::iter::once("student-dashboard").chain(args.iter().copied()))
    }

    #[test]
    fn defaults_when_nothing_given() {
        let config = Config::default();
        assert_eq!(config.workbook, PathBuf::from("datos.xlsx"));
        assert_eq!(config.sheet, None);
        assert_eq!(config.max_words, DEFAULT_MAX_WORDS);
    }

    #[test]
    fn file_values_override_defaults() -> Result<()> {
        let mut file = tempfile::NamedTempFile::new()?;
        file.write_all(b"sheet = \"Hoja1\"\nmax_words = 40\n")?;

        let loaded = FileConfig::load_from_file(file.path())?;
        let mut config = Config::default();
        config.merge_file(&loaded);
        assert_eq!(config.sheet.as_deref(), Some("Hoja1"));
        assert_eq!(config.max_words, 40);
        assert_eq!(config.workbook, PathBuf::from("datos.xlsx"));
        Ok(())
    }

    #[test]
    fn cli_takes_precedence_over_file() {
        let file = FileConfig {
            workbook: Some("otro.xlsx".into()),
            sheet: Some("Hoja1".into()),
            max_words: Some(40),
        };
        let args = cli(&["notas.xlsx", "--max-words", "15"]);

        let mut config = Config::default();
        config.merge_file(&file);
        config.merge_cli(&args);
        assert_eq!(config.workbook, PathBuf::from("notas.xlsx"));
        assert_eq!(config.sheet.as_deref(), Some("Hoja1"));
        assert_eq!(config.max_words, 15);
    }

    #[test]
    fn invalid_config_file_is_an_error() -> Result<()> {
        let mut file = tempfile::NamedTempFile::new()?;
        file.write_all(b"max_words = \"many\"")?;
        assert!(FileConfig::load_from_file(file.path()).is_err());
        Ok(())
    }

    #[test]
    fn absolute_paths_are_kept() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.xlsx");
        assert_eq!(resolve_workbook(&path), path);
    }

    #[test]
    fn relative_workbook_falls_back_to_executable_dir() {
        let exe_dir = tempfile::tempdir().unwrap();
        let name = Path::new("student-dashboard-fallback-datos.xlsx");
        std::fs::write(exe_dir.path().join(name), b"").unwrap();

        assert_eq!(
            resolve_workbook_from(name, Some(exe_dir.path())),
            exe_dir.path().join(name)
        );
        let elsewhere = tempfile::tempdir().unwrap();
        assert_eq!(resolve_workbook_from(name, Some(elsewhere.path())), name);
        assert_eq!(resolve_workbook_from(name, None), name);
    }

    #[test]
    fn default_config_file_is_read_from_dir() -> Result<()> {
        let dir = tempfile::tempdir()?;
        std::fs::write(dir.path().join(CONFIG_FILE_NAME), "sheet = \"Notas\"\nmax_words = 25\n")?;

        let config = Config::from_cli_in(&cli(&["notas.xlsx"]), dir.path())?;
        assert_eq!(config.sheet.as_deref(), Some("Notas"));
        assert_eq!(config.max_words, 25);
        assert_eq!(config.workbook, PathBuf::from("notas.xlsx"));

        let empty = tempfile::tempdir()?;
        let config = Config::from_cli_in(&cli(&["notas.xlsx"]), empty.path())?;
        assert_eq!(config.sheet, None);
        assert_eq!(config.max_words, DEFAULT_MAX_WORDS);
        Ok(())
    }

    #[test]
    fn explicit_config_file_must_exist() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("panel.toml");
        std::fs::write(&path, "max_words = 30\n")?;
        let path_arg = path.to_string_lossy().into_owned();

        let config = Config::from_cli_in(&cli(&["notas.xlsx", "--config", &path_arg]), dir.path())?;
        assert_eq!(config.max_words, 30);

        let missing = dir.path().join("missing.toml").to_string_lossy().into_owned();
        assert!(Config::from_cli_in(&cli(&["notas.xlsx", "--config", &missing]), dir.path()).is_err());
        Ok(())
    }

    #[test]
    fn env_var_supplies_workbook() {
        std::env::set_var("STUDENT_DASHBOARD_DATA", "desde-entorno.xlsx");
        let from_env = cli(&[]);
        let explicit = cli(&["notas.xlsx"]);
        std::env::remove_var("STUDENT_DASHBOARD_DATA");

        assert_eq!(from_env.workbook, Some(PathBuf::from("desde-entorno.xlsx")));
        assert_eq!(explicit.workbook, Some(PathBuf::from("notas.xlsx")));
    }

    #[test]
    fn zero_max_words_is_rejected() -> Result<()> {
        assert!(Cli::try_parse_from(["student-dashboard", "--max-words", "0"]).is_err());

        let dir = tempfile::tempdir()?;
        std::fs::write(dir.path().join(CONFIG_FILE_NAME), "max_words = 0\n")?;
        let err = Config::from_cli_in(&cli(&["notas.xlsx"]), dir.path()).unwrap_err();
        assert!(err.to_string().contains("max_words"));
        Ok(())
    }
}
