use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_ENV: &str = "DOCKHAND_CONFIG";

#[derive(Debug, Clone, Default)]
pub struct LoadedConfig {
    pub source: Option<String>,
    pub host: Option<String>,
    pub theme: ThemeSpec,
}

#[derive(Debug, Clone, Deserialize, Default)]
struct DockhandConfigFile {
    #[serde(default)]
    host: Option<String>,
    #[serde(default, alias = "style")]
    theme: ThemeSpec,
}

/// Colour overrides; each value is a colour name, `#rrggbb` or a 0-255 index.
#[derive(Debug, Clone, Deserialize, Default, Eq, PartialEq)]
pub struct ThemeSpec {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub header: Option<String>,
    #[serde(default)]
    pub selected_fg: Option<String>,
    #[serde(default)]
    pub selected_bg: Option<String>,
    #[serde(default)]
    pub running: Option<String>,
    #[serde(default)]
    pub exited: Option<String>,
    #[serde(default, alias = "paused")]
    pub other: Option<String>,
    #[serde(default)]
    pub help: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

pub fn load(explicit: Option<&Path>) -> Result<LoadedConfig> {
    let env_path = std::env::var(CONFIG_ENV).ok();
    let home = std::env::var("HOME").ok();
    match discover_config_path(explicit, env_path.as_deref(), home.as_deref()) {
        Some(path) => load_from_path(&path),
        None => Ok(LoadedConfig::default()),
    }
}

fn load_from_path(path: &Path) -> Result<LoadedConfig> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    let parsed = parse(&raw).with_context(|| format!("failed to parse config {}", path.display()))?;

    Ok(LoadedConfig {
        source: Some(path.display().to_string()),
        ..parsed
    })
}

fn parse(raw: &str) -> Result<LoadedConfig> {
    if raw.trim().is_empty() {
        return Ok(LoadedConfig::default());
    }

    let file: DockhandConfigFile = serde_yaml::from_str(raw)?;
    Ok(LoadedConfig {
        source: None,
        host: file.host.filter(|host| !host.trim().is_empty()),
        theme: file.theme,
    })
}

fn discover_config_path(
    explicit: Option<&Path>,
    env_path: Option<&str>,
    home: Option<&str>,
) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }

    if let Some(path) = env_path
        && !path.trim().is_empty()
    {
        return Some(PathBuf::from(path));
    }

    let cwd_candidates = [
        PathBuf::from("dockhand.yaml"),
        PathBuf::from("dockhand.yml"),
        PathBuf::from(".dockhand.yaml"),
    ];
    for candidate in cwd_candidates {
        if candidate.exists() {
            return Some(candidate);
        }
    }

    if let Some(home) = home {
        let user_candidates = [
            PathBuf::from(home).join(".config/dockhand/config.yaml"),
            PathBuf::from(home).join(".config/dockhand/config.yml"),
        ];
        for candidate in user_candidates {
            if candidate.exists() {
                return Some(candidate);
            }
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::{ThemeSpec, discover_config_path, load_from_path, parse};
    use std::fs;
    use std::path::Path;

    #[test]
    fn parses_host_and_theme_overrides() {
        let config = parse(
            "host: tcp://10.0.0.5:2375\ntheme:\n  running: green\n  exited: \"#ff0000\"\n  help: \"244\"\n",
        )
        .expect("valid config");

        assert_eq!(config.host.as_deref(), Some("tcp://10.0.0.5:2375"));
        assert_eq!(config.theme.running.as_deref(), Some("green"));
        assert_eq!(config.theme.exited.as_deref(), Some("#ff0000"));
        assert_eq!(config.theme.help.as_deref(), Some("244"));
        assert_eq!(config.theme.title, None);
    }

    #[test]
    fn style_and_paused_aliases_are_accepted() {
        let config = parse("style:\n  paused: yellow\n").expect("valid config");
        assert_eq!(config.theme.other.as_deref(), Some("yellow"));
    }

    #[test]
    fn empty_document_uses_defaults() {
        let config = parse("  \n").expect("empty config");
        assert_eq!(config.host, None);
        assert_eq!(config.theme, ThemeSpec::default());
    }

    #[test]
    fn blank_host_is_ignored() {
        let config = parse("host: \"  \"\n").expect("valid config");
        assert_eq!(config.host, None);
    }

    #[test]
    fn malformed_file_reports_its_path() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("dockhand.yaml");
        fs::write(&path, "theme: [not, a, map]\n").expect("write config");

        let error = load_from_path(&path).unwrap_err();
        assert!(format!("{error:#}").contains("failed to parse config"));
        assert!(format!("{error:#}").contains("dockhand.yaml"));
    }

    #[test]
    fn loaded_file_records_its_source() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.yaml");
        fs::write(&path, "host: unix:///run/docker.sock\n").expect("write config");

        let config = load_from_path(&path).expect("valid config");
        assert_eq!(config.source, Some(path.display().to_string()));
        assert_eq!(config.host.as_deref(), Some("unix:///run/docker.sock"));
    }

    #[test]
    fn explicit_path_wins_over_environment() {
        let explicit = Path::new("/etc/dockhand/custom.yaml");
        assert_eq!(
            discover_config_path(Some(explicit), Some("/tmp/env.yaml"), None),
            Some(explicit.to_path_buf())
        );
        assert_eq!(
            discover_config_path(None, Some("/tmp/env.yaml"), None),
            Some(Path::new("/tmp/env.yaml").to_path_buf())
        );
    }

    #[test]
    fn home_config_is_discovered() {
        let home = tempfile::tempdir().expect("tempdir");
        let config_dir = home.path().join(".config/dockhand");
        fs::create_dir_all(&config_dir).expect("config dir");
        let path = config_dir.join("config.yml");
        fs::write(&path, "theme: {}\n").expect("write config");

        let home = home.path().to_str().expect("utf-8 temp path");
        assert_eq!(discover_config_path(None, Some("  "), Some(home)), Some(path));
    }
}
