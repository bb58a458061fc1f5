//! Configuration: built-in defaults with an optional `tally.toml` overlay.
//!
//! The file location comes from `TALLY_CONFIG`, falling back to
//! `./tally.toml` (the tool runs inside the repository it updates, so the
//! config lives next to the README). A missing file yields the defaults;
//! an unreadable or unparseable file is a hard error at startup.

use std::path::{Path, PathBuf};
use std::time::Duration;
use std::{env, fs};

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use serde::Deserialize;

use tally_core::{Couple, Markers, Partner};
use tally_tools::Author;

pub const CONFIG_PATH_ENV: &str = "TALLY_CONFIG";
const DEFAULT_CONFIG_FILE: &str = "tally.toml";

const DEFAULT_README: &str = "README.md";
const DEFAULT_BRANCH: &str = "main";
const DEFAULT_COMMIT_MESSAGE: &str = "chore: Update README with duration and ages [skip ci]";
const DEFAULT_NOTIFY_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config at {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config at {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("invalid config: {message}")]
    Invalid { message: String },
}

/// Every tunable of a run, resolved and validated. Immutable once loaded;
/// the pipeline takes it by reference.
#[derive(Debug, Clone)]
pub struct TallyConfig {
    pub readme_path: PathBuf,
    pub markers: Markers,
    pub couple: Couple,
    pub branch: String,
    pub commit_message: String,
    pub authors: Vec<Author>,
    pub notify_timeout: Duration,
}

impl Default for TallyConfig {
    fn default() -> Self {
        Self {
            readme_path: PathBuf::from(DEFAULT_README),
            markers: Markers::default(),
            couple: Couple {
                start: Utc
                    .with_ymd_and_hms(2014, 4, 14, 12, 0, 0)
                    .single()
                    .expect("default start instant is valid"),
                partners: [
                    Partner {
                        name: "Jeff".to_string(),
                        born: NaiveDate::from_ymd_opt(1997, 8, 9)
                            .expect("default birth date is valid"),
                    },
                    Partner {
                        name: "Jacqueline".to_string(),
                        born: NaiveDate::from_ymd_opt(1998, 8, 4)
                            .expect("default birth date is valid"),
                    },
                ],
            },
            branch: DEFAULT_BRANCH.to_string(),
            commit_message: DEFAULT_COMMIT_MESSAGE.to_string(),
            authors: vec![
                Author {
                    name: "arcestia".to_string(),
                    email: "7936962+arcestia@users.noreply.github.com".to_string(),
                },
                Author {
                    name: "scarletnine".to_string(),
                    email: "15015459+scarletnine@users.noreply.github.com".to_string(),
                },
            ],
            notify_timeout: Duration::from_secs(DEFAULT_NOTIFY_TIMEOUT_SECS),
        }
    }
}

impl TallyConfig {
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from_path(&config_path())
    }

    pub fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "No config file, using defaults");
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let raw: RawConfig = toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        let config = Self::from_raw(raw)?;
        tracing::info!(path = %path.display(), "Loaded config");
        Ok(config)
    }

    /// Commit identity for a run, selected by the reference instant's hour.
    ///
    /// A single-entry author list degenerates to a fixed identity.
    #[must_use]
    pub fn author_for_hour(&self, hour: u32) -> &Author {
        &self.authors[hour as usize % self.authors.len()]
    }

    fn from_raw(raw: RawConfig) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(readme) = raw.readme {
            if let Some(path) = readme.path {
                config.readme_path = path;
            }
            if let Some(start) = readme.start_marker {
                config.markers.start = start;
            }
            if let Some(end) = readme.end_marker {
                config.markers.end = end;
            }
            if config.markers.start.trim().is_empty() || config.markers.end.trim().is_empty() {
                return Err(ConfigError::Invalid {
                    message: "readme markers must be non-empty".to_string(),
                });
            }
        }

        if let Some(couple) = raw.couple {
            if let Some(start) = couple.start {
                config.couple.start = parse_instant(&start)?;
            }
            if let Some(partners) = couple.partners {
                let partners: Vec<Partner> = partners
                    .into_iter()
                    .map(|p| {
                        Ok(Partner {
                            born: parse_date(&p.born, &p.name)?,
                            name: p.name,
                        })
                    })
                    .collect::<Result<_, ConfigError>>()?;
                let count = partners.len();
                config.couple.partners =
                    partners.try_into().map_err(|_| ConfigError::Invalid {
                        message: format!("couple.partners must list exactly 2 people, got {count}"),
                    })?;
            }
        }

        if let Some(git) = raw.git {
            if let Some(branch) = git.branch {
                config.branch = branch;
            }
            if let Some(message) = git.commit_message {
                config.commit_message = message;
            }
            if let Some(authors) = git.authors {
                if authors.is_empty() {
                    return Err(ConfigError::Invalid {
                        message: "git.authors must not be empty".to_string(),
                    });
                }
                config.authors = authors
                    .into_iter()
                    .map(|a| Author {
                        name: a.name,
                        email: a.email,
                    })
                    .collect();
            }
        }

        if let Some(notify) = raw.notify
            && let Some(secs) = notify.timeout_secs
        {
            config.notify_timeout = Duration::from_secs(secs);
        }

        Ok(config)
    }
}

#[must_use]
pub fn config_path() -> PathBuf {
    env::var_os(CONFIG_PATH_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE))
}

fn parse_instant(raw: &str) -> Result<DateTime<Utc>, ConfigError> {
    raw.parse::<DateTime<Utc>>()
        .map_err(|err| ConfigError::Invalid {
            message: format!("couple.start {raw:?}: {err}"),
        })
}

fn parse_date(raw: &str, who: &str) -> Result<NaiveDate, ConfigError> {
    raw.parse::<NaiveDate>().map_err(|err| ConfigError::Invalid {
        message: format!("birth date {raw:?} for {who}: {err}"),
    })
}

#[derive(Debug, Default, Deserialize)]
struct RawConfig {
    readme: Option<RawReadme>,
    couple: Option<RawCouple>,
    git: Option<RawGit>,
    notify: Option<RawNotify>,
}

#[derive(Debug, Default, Deserialize)]
struct RawReadme {
    path: Option<PathBuf>,
    start_marker: Option<String>,
    end_marker: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct RawCouple {
    start: Option<String>,
    partners: Option<Vec<RawPartner>>,
}

#[derive(Debug, Deserialize)]
struct RawPartner {
    name: String,
    born: String,
}

#[derive(Debug, Default, Deserialize)]
struct RawGit {
    branch: Option<String>,
    commit_message: Option<String>,
    authors: Option<Vec<RawAuthor>>,
}

#[derive(Debug, Deserialize)]
struct RawAuthor {
    name: String,
    email: String,
}

#[derive(Debug, Default, Deserialize)]
struct RawNotify {
    timeout_secs: Option<u64>,
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    fn write_config(content: &str) -> (tempfile::TempDir, PathBuf) {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("tally.toml");
        let mut file = fs::File::create(&path).expect("create");
        file.write_all(content.as_bytes()).expect("write");
        (dir, path)
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let config = TallyConfig::load_from_path(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config.readme_path, PathBuf::from("README.md"));
        assert_eq!(config.branch, "main");
        assert_eq!(config.couple.partners[0].name, "Jeff");
        assert_eq!(config.authors.len(), 2);
    }

    #[test]
    fn partial_overlay_keeps_other_defaults() {
        let (_dir, path) = write_config("[git]\nbranch = \"trunk\"\n");
        let config = TallyConfig::load_from_path(&path).unwrap();
        assert_eq!(config.branch, "trunk");
        assert_eq!(config.readme_path, PathBuf::from("README.md"));
        assert_eq!(config.couple.partners[1].name, "Jacqueline");
    }

    #[test]
    fn couple_overlay_parses_dates() {
        let (_dir, path) = write_config(
            r#"
[couple]
start = "2020-01-02T03:04:05Z"
partners = [
    { name = "A", born = "1990-01-01" },
    { name = "B", born = "1991-02-03" },
]
"#,
        );
        let config = TallyConfig::load_from_path(&path).unwrap();
        assert_eq!(
            config.couple.start,
            Utc.with_ymd_and_hms(2020, 1, 2, 3, 4, 5).unwrap()
        );
        assert_eq!(config.couple.partners[1].born.to_string(), "1991-02-03");
    }

    #[test]
    fn invalid_birth_date_is_rejected() {
        let (_dir, path) = write_config(
            r#"
[couple]
partners = [
    { name = "A", born = "not-a-date" },
    { name = "B", born = "1991-02-03" },
]
"#,
        );
        let err = TallyConfig::load_from_path(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { .. }));
    }

    #[test]
    fn wrong_partner_count_is_rejected() {
        let (_dir, path) = write_config(
            "[couple]\npartners = [ { name = \"A\", born = \"1990-01-01\" } ]\n",
        );
        let err = TallyConfig::load_from_path(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { .. }));
    }

    #[test]
    fn unparseable_toml_is_a_parse_error() {
        let (_dir, path) = write_config("[git\nbranch=");
        let err = TallyConfig::load_from_path(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn author_rotates_by_hour() {
        let config = TallyConfig::default();
        assert_eq!(config.author_for_hour(0).name, "arcestia");
        assert_eq!(config.author_for_hour(1).name, "scarletnine");
        assert_eq!(config.author_for_hour(14).name, "arcestia");
    }
}
