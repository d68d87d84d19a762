use crate::analysis::VarScoping;
use crate::diagnostic::RuleName;
use crate::linter::LintOptions;
use crate::rules::{NoRedeclareOptions, NoShadowOptions, NoUseBeforeDefineOptions};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Contents of `scopelint.toml`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ScopelintConfig {
    /// Extra gitignore-style patterns to skip
    pub exclude: Vec<String>,
    pub var_scoping: VarScoping,
    /// Rules turned off entirely
    pub disable: Vec<RuleName>,
    pub rules: RulesConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct RulesConfig {
    #[serde(rename = "no-redeclare")]
    pub no_redeclare: NoRedeclareOptions,
    #[serde(rename = "no-shadow")]
    pub no_shadow: NoShadowOptions,
    #[serde(rename = "no-use-before-define")]
    pub no_use_before_define: NoUseBeforeDefineOptions,
}

impl ScopelintConfig {
    /// Lint options for this config. A non-empty `only` list overrides the
    /// enabled set; `disable` still applies.
    pub fn lint_options(&self, only: &[RuleName]) -> LintOptions {
        let selected: Vec<RuleName> = if only.is_empty() {
            RuleName::all().to_vec()
        } else {
            RuleName::all().iter().copied().filter(|r| only.contains(r)).collect()
        };
        let rules = selected
            .into_iter()
            .filter(|rule| !self.disable.contains(rule))
            .collect();

        LintOptions {
            rules,
            var_scoping: self.var_scoping,
            no_redeclare: self.rules.no_redeclare.clone(),
            no_shadow: self.rules.no_shadow.clone(),
            no_use_before_define: self.rules.no_use_before_define,
        }
    }
}

pub fn default_config_path() -> PathBuf {
    PathBuf::from("scopelint.toml")
}

pub fn load_config(path: Option<&Path>) -> anyhow::Result<Option<ScopelintConfig>> {
    let path = path.map(Path::to_path_buf).unwrap_or_else(default_config_path);
    if !path.exists() {
        return Ok(None);
    }

    let contents = std::fs::read_to_string(&path)?;
    let config: ScopelintConfig = toml::from_str(&contents)?;
    Ok(Some(config))
}

pub fn write_config(path: &Path, config: &ScopelintConfig, force: bool) -> anyhow::Result<()> {
    if path.exists() && !force {
        anyhow::bail!("config already exists at {} (use --force to overwrite)", path.display());
    }

    let contents = toml::to_string_pretty(config)?;
    std::fs::write(path, contents)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbol::HoistPolicy;
    use tempfile::TempDir;

    #[test]
    fn test_missing_config_is_none() {
        let dir = TempDir::new().unwrap();
        let loaded = load_config(Some(&dir.path().join("scopelint.toml"))).unwrap();
        assert!(loaded.is_none());
    }

    #[test]
    fn test_parse_rule_tables() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("scopelint.toml");
        std::fs::write(
            &path,
            r#"
exclude = ["generated/"]
var_scoping = "function"
disable = ["no-redeclare"]

[rules.no-shadow]
hoist = "all"
allow = ["done"]

[rules.no-use-before-define]
functions = false
"#,
        )
        .unwrap();

        let config = load_config(Some(&path)).unwrap().unwrap();
        assert_eq!(config.exclude, vec!["generated/"]);
        assert_eq!(config.var_scoping, VarScoping::Function);
        assert_eq!(config.rules.no_shadow.hoist, HoistPolicy::All);
        assert!(config.rules.no_shadow.ignore_type_value_shadow);
        assert!(!config.rules.no_use_before_define.functions);
        assert!(config.rules.no_use_before_define.classes);

        let options = config.lint_options(&[]);
        assert_eq!(options.rules, vec![RuleName::NoShadow, RuleName::NoUseBeforeDefine]);
    }

    #[test]
    fn test_nofunc_shorthand_and_unknown_hoist() {
        let config: ScopelintConfig = toml::from_str(
            r#"
[rules]
no-use-before-define = "nofunc"

[rules.no-shadow]
hoist = "sometimes"
"#,
        )
        .unwrap();
        assert!(!config.rules.no_use_before_define.functions);
        assert_eq!(config.rules.no_shadow.hoist, HoistPolicy::Never);
    }

    #[test]
    fn test_only_rules_respect_disable() {
        let config = ScopelintConfig {
            disable: vec![RuleName::NoShadow],
            ..ScopelintConfig::default()
        };
        let options = config.lint_options(&[RuleName::NoShadow, RuleName::NoRedeclare]);
        assert_eq!(options.rules, vec![RuleName::NoRedeclare]);
    }

    #[test]
    fn test_write_config_refuses_overwrite() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("scopelint.toml");
        let config = ScopelintConfig::default();

        write_config(&path, &config, false).unwrap();
        assert!(write_config(&path, &config, false).is_err());
        write_config(&path, &config, true).unwrap();

        let loaded = load_config(Some(&path)).unwrap().unwrap();
        assert_eq!(loaded, config);
    }
}
