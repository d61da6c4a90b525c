use std::fmt;
use std::path::{Path, PathBuf};

use quiz_core::model::{Question, QuestionBank};

pub const DEFAULT_DB_URL: &str = "sqlite://quiz.sqlite3";
pub const MEMORY_DB_URL: &str = "sqlite::memory:";

const DEFAULT_BANK: &str = include_str!("../assets/questions.json");

#[derive(Debug)]
pub enum ConfigError {
    InvalidDbUrl { raw: String },
    Bank { source_name: String, reason: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidDbUrl { raw } => write!(f, "invalid --db value: {raw}"),
            ConfigError::Bank {
                source_name,
                reason,
            } => write!(f, "cannot load question bank {source_name}: {reason}"),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Turn `path`, `sqlite:path` or `sqlite://path` into an absolute `sqlite://` URL.
pub fn normalize_sqlite_url(raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim();
    if trimmed == MEMORY_DB_URL {
        return Ok(trimmed.to_owned());
    }

    let rest = trimmed
        .strip_prefix("sqlite://")
        .or_else(|| trimmed.strip_prefix("sqlite:"))
        .unwrap_or(trimmed);
    let (path_str, query) = match rest.split_once('?') {
        Some((path, query)) => (path, Some(query)),
        None => (rest, None),
    };
    if path_str.is_empty() {
        return Err(ConfigError::InvalidDbUrl {
            raw: raw.to_owned(),
        });
    }

    let path = Path::new(path_str);
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| PathBuf::from("."))
            .join(path)
    };
    Ok(match query {
        Some(query) => format!("sqlite://{}?{query}", absolute.display()),
        None => format!("sqlite://{}", absolute.display()),
    })
}

/// Make sure the database file and its parent directory exist.
pub fn prepare_sqlite_file(db_url: &str) -> Result<(), Box<dyn std::error::Error>> {
    if db_url == MEMORY_DB_URL {
        return Ok(());
    }

    let path = db_url
        .strip_prefix("sqlite://")
        .ok_or_else(|| ConfigError::InvalidDbUrl {
            raw: db_url.to_owned(),
        })?;
    let path = path.split('?').next().unwrap_or(path);
    if path.is_empty() {
        return Err(ConfigError::InvalidDbUrl {
            raw: db_url.to_owned(),
        }
        .into());
    }

    let path = Path::new(path);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    if !path.exists() {
        std::fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(path)?;
    }
    Ok(())
}

/// Load the bank at `path`, or the built-in bank when none is given.
pub fn load_bank(path: Option<&Path>) -> Result<QuestionBank, ConfigError> {
    let (source_name, raw) = match path {
        Some(path) => {
            let name = path.display().to_string();
            let raw = std::fs::read_to_string(path).map_err(|err| ConfigError::Bank {
                source_name: name.clone(),
                reason: err.to_string(),
            })?;
            (name, raw)
        }
        None => ("(built-in)".to_owned(), DEFAULT_BANK.to_owned()),
    };
    parse_bank(&source_name, &raw)
}

fn parse_bank(source_name: &str, raw: &str) -> Result<QuestionBank, ConfigError> {
    let fail = |err: &dyn fmt::Display| ConfigError::Bank {
        source_name: source_name.to_owned(),
        reason: err.to_string(),
    };
    let questions: Vec<Question> = serde_json::from_str(raw).map_err(|err| fail(&err))?;
    let bank = QuestionBank::new(questions).map_err(|err| fail(&err))?;
    tracing::debug!(
        source = source_name,
        questions = bank.len(),
        "question bank loaded"
    );
    Ok(bank)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn built_in_bank_loads() {
        let bank = load_bank(None).unwrap();
        assert_eq!(bank.len(), 15);
        let topics: Vec<_> = bank
            .topics()
            .iter()
            .map(|t| t.as_str().to_owned())
            .collect();
        assert_eq!(topics, ["coding", "music", "history", "science", "maths"]);
    }

    #[test]
    fn invalid_bank_is_reported() {
        let raw =
            r#"[{"id":1,"topic":"x","type":"mcq","question":"q","choices":["a"],"answer":3}]"#;
        let err = parse_bank("inline", raw).unwrap_err();
        let message = err.to_string();
        assert!(message.starts_with("cannot load question bank inline"));

        assert!(parse_bank("inline", "not json").is_err());
    }

    #[test]
    fn missing_bank_file_is_reported() {
        let err = load_bank(Some(Path::new("/definitely/not/here.json"))).unwrap_err();
        assert!(matches!(err, ConfigError::Bank { .. }));
    }

    #[test]
    fn sqlite_urls_become_absolute() {
        assert_eq!(normalize_sqlite_url(MEMORY_DB_URL).unwrap(), MEMORY_DB_URL);
        assert_eq!(
            normalize_sqlite_url("sqlite:///tmp/quiz.db").unwrap(),
            "sqlite:///tmp/quiz.db"
        );
        assert_eq!(
            normalize_sqlite_url("sqlite:/tmp/quiz.db?mode=rwc").unwrap(),
            "sqlite:///tmp/quiz.db?mode=rwc"
        );
        let relative = normalize_sqlite_url("quiz.sqlite3").unwrap();
        assert!(relative.starts_with("sqlite:///"));
        assert!(relative.ends_with("/quiz.sqlite3"));
        assert!(normalize_sqlite_url("sqlite://").is_err());
    }
}
