use anyhow::{Context, Result};
use log::debug;
use std::path::PathBuf;
use std::time::Duration;

use crate::{
    api::{AdminApi, AdminClient},
    http::build_client,
    notify::{Notifier, TerminalNotifier},
    page::{DEFAULT_STALE_AFTER, PackagesPage},
    runtime::Runtime,
};

/// Environment variable holding the admin bearer token.
pub const TOKEN_ENV: &str = "PKGADMIN_TOKEN";

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Connection settings collected from the command line.
#[derive(Debug, Clone)]
pub struct Settings {
    pub api_url: Option<String>,
    pub token_file: Option<PathBuf>,
    pub timeout: Duration,
    pub stale_after: Duration,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_url: None,
            token_file: None,
            timeout: DEFAULT_TIMEOUT,
            stale_after: DEFAULT_STALE_AFTER,
        }
    }
}

pub struct Config<R: Runtime, A: AdminApi, N: Notifier> {
    pub runtime: R,
    pub api: A,
    pub notifier: N,
    pub stale_after: Duration,
}

impl<R: Runtime> Config<R, AdminClient, TerminalNotifier> {
    pub fn new(runtime: R, settings: Settings) -> Result<Self> {
        let token = load_token(&runtime, settings.token_file.as_ref())?;
        let client = build_client(token.as_deref(), settings.timeout)?;
        let api = AdminClient::new(client, settings.api_url);
        debug!("Using admin API at {}", api.api_url());

        Ok(Self {
            runtime,
            api,
            notifier: TerminalNotifier,
            stale_after: settings.stale_after,
        })
    }
}

impl<R: Runtime, A: AdminApi, N: Notifier> Config<R, A, N> {
    /// Splits the config into the runtime and a page bound to the API.
    pub fn into_page(self) -> (R, PackagesPage<A, N>) {
        let page = PackagesPage::new(self.api, self.notifier, self.stale_after);
        (self.runtime, page)
    }
}

/// The token comes from `token_file` when given, otherwise from
/// `PKGADMIN_TOKEN`. Running without a token is allowed.
fn load_token<R: Runtime>(runtime: &R, token_file: Option<&PathBuf>) -> Result<Option<String>> {
    let token = match token_file {
        Some(path) => Some(
            runtime
                .read_to_string(path)
                .with_context(|| format!("Failed to read the admin token from {:?}", path))?,
        ),
        None => runtime.env_var(TOKEN_ENV).ok(),
    };

    Ok(token
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::MockRuntime;
    use mockall::predicate::eq;
    use mockito::{Matcher, Server};

    async fn verify_authorization_header(token: Option<&str>) {
        let mut runtime = MockRuntime::new();
        let token_clone = token.map(|t| t.to_string());
        runtime
            .expect_env_var()
            .with(eq(TOKEN_ENV))
            .returning(move |_| token_clone.clone().ok_or(std::env::VarError::NotPresent));

        let mut server = Server::new_async().await;
        let expected_header = match token {
            Some(t) => Matcher::Exact(format!("Bearer {}", t)),
            None => Matcher::Missing,
        };
        let mock = server
            .mock("PUT", "/api/packages/1/feature")
            .match_header("Authorization", expected_header)
            .with_status(200)
            .create_async()
            .await;

        let settings = Settings {
            api_url: Some(server.url()),
            ..Default::default()
        };
        let config = Config::new(runtime, settings).unwrap();
        config.api.feature_package(&"1".into()).await.unwrap();

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_config_new_with_token() {
        verify_authorization_header(Some("test_token")).await;
    }

    #[tokio::test]
    async fn test_config_new_without_token() {
        verify_authorization_header(None).await;
    }

    #[test]
    fn test_load_token_from_file_wins() {
        let mut runtime = MockRuntime::new();
        runtime
            .expect_read_to_string()
            .with(eq(PathBuf::from("/etc/pkgadmin/token")))
            .returning(|_| Ok("file-token\n".to_string()));
        runtime.expect_env_var().never();

        let token = load_token(&runtime, Some(&PathBuf::from("/etc/pkgadmin/token"))).unwrap();
        assert_eq!(token.as_deref(), Some("file-token"));
    }

    #[test]
    fn test_load_token_missing_file_fails() {
        let mut runtime = MockRuntime::new();
        runtime
            .expect_read_to_string()
            .returning(|_| Err(anyhow::anyhow!("No such file")));

        let err = load_token(&runtime, Some(&PathBuf::from("/nope"))).unwrap_err();
        assert!(err.to_string().contains("Failed to read the admin token"));
    }

    #[test]
    fn test_load_token_blank_env_is_none() {
        let mut runtime = MockRuntime::new();
        runtime
            .expect_env_var()
            .with(eq(TOKEN_ENV))
            .returning(|_| Ok("   ".to_string()));

        assert_eq!(load_token(&runtime, None).unwrap(), None);
    }
}
