use std::{fs, path::Path};

use url::Url;

use crate::{
    ConfigLoadError,
    models::sources::{EnvConfig, FileDatabaseConfig},
};

const DEFAULT_DATABASE_PORT: u16 = 5432;

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|value| !value.is_empty())
}

/// PostgreSQL URL for the primary pool.
///
/// `DATABASE_URL` is taken verbatim. Otherwise the config file's
/// `database.url` or the `DATABASE_HOST` / `DATABASE_USER` /
/// `DATABASE_NAME` parts are used, and a password is filled in when the
/// URL carries none.
pub fn resolve_database_url(
    env: &EnvConfig,
    file_database: &FileDatabaseConfig,
) -> Result<Option<String>, ConfigLoadError> {
    if let Some(url) = non_blank(env.database_url.as_deref()) {
        return Ok(Some(url.to_string()));
    }

    let mut url = match non_blank(file_database.url.as_deref()) {
        Some(raw) => Url::parse(raw)
            .map_err(|source| ConfigLoadError::InvalidDatabaseUrl { source })?,
        None => match url_from_parts(env)? {
            Some(url) => url,
            None => return Ok(None),
        },
    };

    if url.password().is_none()
        && let Some(password) = database_password(env, file_database)?
    {
        url.set_password(Some(&password))
            .map_err(|_| ConfigLoadError::InvalidDatabasePassword)?;
    }

    Ok(Some(url.to_string()))
}

fn url_from_parts(env: &EnvConfig) -> Result<Option<Url>, ConfigLoadError> {
    let (Some(host), Some(user), Some(name)) = (
        non_blank(env.database_host.as_deref()),
        non_blank(env.database_user.as_deref()),
        non_blank(env.database_name.as_deref()),
    ) else {
        return Ok(None);
    };

    let port = env.database_port.unwrap_or(DEFAULT_DATABASE_PORT);
    let mut url = Url::parse(&format!("postgresql://{host}:{port}/{name}"))
        .map_err(|source| ConfigLoadError::InvalidDatabaseUrl { source })?;
    url.set_username(user).map_err(|_| {
        ConfigLoadError::InvalidDatabaseUsername {
            username: user.to_string(),
        }
    })?;
    Ok(Some(url))
}

/// `DATABASE_PASSWORD`, else the first non-empty password file
/// (`DATABASE_PASSWORD_FILE`, then `database.password_file`).
fn database_password(
    env: &EnvConfig,
    file_database: &FileDatabaseConfig,
) -> Result<Option<String>, ConfigLoadError> {
    if let Some(password) = non_blank(env.database_password.as_deref()) {
        return Ok(Some(password.to_string()));
    }

    let files = [
        env.database_password_file.as_deref(),
        file_database.password_file.as_deref(),
    ];
    for path in files.into_iter().flatten() {
        let secret = read_password_file(path)?;
        if !secret.is_empty() {
            return Ok(Some(secret));
        }
    }
    Ok(None)
}

fn read_password_file(path: &Path) -> Result<String, ConfigLoadError> {
    fs::read_to_string(path)
        .map(|contents| contents.trim().to_string())
        .map_err(|source| ConfigLoadError::SecretFileIo {
            path: path.to_path_buf(),
            source,
        })
}
