//! Sync CLI command

use crate::config::paths::SitePaths;
use crate::config::registry::SiteRegistry;
use crate::config::settings::{RemoteSettings, Settings};
use crate::error::SiteResult;
use crate::runlog::RunLog;
use crate::sync::{FileSync, SyncDirection};

/// Command-line overrides for the remote endpoint
#[derive(Debug, Default)]
pub struct RemoteOverrides {
    pub host: Option<String>,
    pub user: Option<String>,
    pub path: Option<String>,
}

/// Handle `sync [--direction push|pull] [--remote-*] [--save-config]`
pub fn handle_sync(
    paths: &SitePaths,
    registry: &SiteRegistry,
    settings: &Settings,
    log: &RunLog,
    direction: SyncDirection,
    overrides: RemoteOverrides,
    save_config: bool,
) -> SiteResult<()> {
    log.info("Starting file sync");

    let remote = merge_remote(&settings.remote, overrides);
    let sync = FileSync::new(paths.clone(), registry.clone(), remote);

    if save_config {
        let config_path = sync.save_remote_config()?;
        log.info(&format!("Remote config saved: {}", config_path.display()));
    }

    let outcome = match direction {
        SyncDirection::Push => sync.push()?,
        SyncDirection::Pull => sync.pull()?,
    };

    log.info(&outcome.summary());
    log.info(&format!("Sync log: {}", outcome.log_file.display()));

    Ok(())
}

fn merge_remote(base: &RemoteSettings, overrides: RemoteOverrides) -> RemoteSettings {
    let mut remote = base.clone();
    if let Some(host) = overrides.host {
        remote.host = host;
    }
    if let Some(user) = overrides.user {
        remote.user = user;
    }
    if let Some(path) = overrides.path {
        remote.path = path;
    }
    remote
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overrides_take_precedence() {
        let base = RemoteSettings {
            host: "old.example.com".into(),
            user: "deploy".into(),
            ..RemoteSettings::default()
        };
        let merged = merge_remote(
            &base,
            RemoteOverrides {
                host: Some("new.example.com".into()),
                user: None,
                path: None,
            },
        );
        assert_eq!(merged.host, "new.example.com");
        assert_eq!(merged.user, "deploy");
    }
}
