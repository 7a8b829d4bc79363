use crate::error::{DecideError, Result};
use crate::types::config::DecideConfig;
use std::path::{Path, PathBuf};
use toml::{Table, Value};

pub const DEFAULT_CONFIG_FILE: &str = "decide.toml";
pub const DEFAULT_LOCAL_FILE: &str = ".decide/local.toml";
pub const DEFAULT_GLOBAL_CONFIG_FILE: &str = ".config/decide/config.toml";

/// Loads the merged config for `root`. Missing layers are skipped, so a
/// directory without any config file gets the defaults.
pub fn load_config(root: &Path) -> Result<DecideConfig> {
    let global = std::env::var_os("HOME")
        .map(PathBuf::from)
        .map(|home| home.join(DEFAULT_GLOBAL_CONFIG_FILE));
    load_config_with_global(root, global.as_deref())
}

pub(crate) fn load_config_with_global(
    root: &Path,
    global_path: Option<&Path>,
) -> Result<DecideConfig> {
    let project = root.join(DEFAULT_CONFIG_FILE);
    let local = root.join(DEFAULT_LOCAL_FILE);
    let layers = global_path
        .into_iter()
        .chain([project.as_path(), local.as_path()]);

    let mut merged = Table::new();
    for path in layers {
        match read_layer(path)? {
            Some(layer) => overlay(&mut merged, layer),
            None => tracing::debug!(path = %path.display(), "config layer absent"),
        }
    }

    let cfg: DecideConfig = Value::Table(merged)
        .try_into()
        .map_err(|e: toml::de::Error| DecideError::ConfigParse(e.to_string()))?;
    cfg.validate()?;
    Ok(cfg)
}

fn read_layer(path: &Path) -> Result<Option<Table>> {
    if !path.is_file() {
        return Ok(None);
    }
    tracing::debug!(path = %path.display(), "merging config layer");
    let content = std::fs::read_to_string(path)?;
    content
        .parse::<Table>()
        .map(Some)
        .map_err(|e| DecideError::ConfigParse(format!("{}: {}", path.display(), e)))
}

/// Later layers win key by key; nested tables merge instead of replacing.
fn overlay(base: &mut Table, layer: Table) {
    for (key, value) in layer {
        match (base.get_mut(&key), value) {
            (Some(Value::Table(existing)), Value::Table(nested)) => overlay(existing, nested),
            (_, value) => {
                base.insert(key, value);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::config::{RatingPolicy, ScoreStyle, Settings};
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn load_config_defaults_when_project_file_missing() {
        let dir = TempDir::new().expect("temp dir should be created");
        let cfg = load_config_with_global(dir.path(), None).expect("load should not fail");
        assert_eq!(cfg.settings(), Settings::default());
    }

    #[test]
    fn load_config_merges_global_project_and_local_in_order() {
        let root = TempDir::new().expect("root temp dir should be created");
        let global_root = TempDir::new().expect("global temp dir should be created");
        let global_path = global_root.path().join("config.toml");

        fs::write(
            &global_path,
            r#"
[weighting]
avg_points_per_feature = 5
seed = 11

[scoring]
rating_policy = "strict"
"#,
        )
        .expect("global config should write");

        fs::write(
            root.path().join(DEFAULT_CONFIG_FILE),
            r#"
[weighting]
avg_points_per_feature = 4

[limits]
max_options = 3
"#,
        )
        .expect("project config should write");

        fs::create_dir_all(root.path().join(".decide")).expect("local dir should create");
        fs::write(
            root.path().join(DEFAULT_LOCAL_FILE),
            r#"
[scoring]
style = "fraction"
"#,
        )
        .expect("local override should write");

        let settings = load_config_with_global(root.path(), Some(&global_path))
            .expect("load should succeed")
            .settings();

        assert_eq!(settings.avg_points_per_feature, 4);
        assert_eq!(settings.seed, Some(11));
        assert_eq!(settings.max_options, 3);
        assert_eq!(settings.rating_policy, RatingPolicy::Strict);
        assert_eq!(settings.score_style, ScoreStyle::Fraction);
    }

    #[test]
    fn load_config_reads_global_layer_without_project_file() {
        let root = TempDir::new().expect("root temp dir should be created");
        let global_root = TempDir::new().expect("global temp dir should be created");
        let global_path = global_root.path().join("config.toml");
        fs::write(
            &global_path,
            r#"
[weighting]
seed = 7

[scoring]
rating_policy = "strict"
"#,
        )
        .expect("global config should write");

        let settings = load_config_with_global(root.path(), Some(&global_path))
            .expect("load should succeed")
            .settings();

        assert_eq!(settings.seed, Some(7));
        assert_eq!(settings.rating_policy, RatingPolicy::Strict);
        assert_eq!(settings.avg_points_per_feature, 3);
    }

    #[test]
    fn load_config_rejects_invalid_merged_values() {
        let root = TempDir::new().expect("root temp dir should be created");
        fs::write(
            root.path().join(DEFAULT_CONFIG_FILE),
            r#"
[limits]
max_features = 0
"#,
        )
        .expect("project config should write");

        let result = load_config_with_global(root.path(), None);
        assert!(matches!(result, Err(DecideError::ConfigParse(_))));
    }
}
