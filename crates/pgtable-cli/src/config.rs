use pgtable::{EntityDef, Options, Table};
use serde::Deserialize;
use std::collections::BTreeSet;
use std::path::Path;

/// A loaded `pgtable.toml`.
#[derive(Debug, Clone)]
pub struct ProjectConfig {
    pub file: ConfigFile,
}

impl ProjectConfig {
    pub fn load(config_path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(config_path).map_err(|e| {
            anyhow::anyhow!(
                "failed to read config file {}: {e}",
                config_path.display()
            )
        })?;

        let file = ConfigFile::parse(&raw).map_err(|e| {
            anyhow::anyhow!(
                "failed to parse config file {}: {e:#}",
                config_path.display()
            )
        })?;

        tracing::debug!(
            path = %config_path.display(),
            entities = file.entities.len(),
            "loaded config"
        );
        Ok(Self { file })
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    #[serde(default)]
    pub tag_name: Option<String>,
    #[serde(default)]
    pub table_name_prefix: Option<String>,
    #[serde(default, rename = "entity")]
    pub entities: Vec<EntityDef>,
}

impl ConfigFile {
    pub fn parse(raw: &str) -> anyhow::Result<Self> {
        let file: ConfigFile = toml::from_str(raw)?;
        file.validate()?;
        Ok(file)
    }

    fn validate(&self) -> anyhow::Result<()> {
        if self.entities.is_empty() {
            anyhow::bail!("no [[entity]] defined");
        }
        let mut seen = BTreeSet::new();
        for entity in &self.entities {
            if !seen.insert(entity.name.as_str()) {
                anyhow::bail!("duplicate entity: {}", entity.name);
            }
        }
        Ok(())
    }

    pub fn options(&self) -> Options {
        let mut options = Options::new();
        if let Some(tag) = &self.tag_name {
            options = options.tag_name(tag.as_str());
        }
        if let Some(prefix) = &self.table_name_prefix {
            options = options.table_name_prefix(prefix.as_str());
        }
        options
    }

    /// Reflect the named entity, or every entity when `name` is `None`.
    ///
    /// Entities whose description is invalid are reported as errors.
    pub fn tables(&self, name: Option<&str>) -> anyhow::Result<Vec<(&str, Table)>> {
        let options = self.options();
        let selected: Vec<&EntityDef> = match name {
            Some(name) => {
                let Some(def) = self.entities.iter().find(|e| e.name == name) else {
                    anyhow::bail!("unknown entity: {name}");
                };
                vec![def]
            }
            None => self.entities.iter().collect(),
        };

        selected
            .into_iter()
            .map(|def| {
                let table = Table::new(def, &options);
                if let Some(err) = table.err() {
                    anyhow::bail!("entity {}: {err}", def.name);
                }
                Ok((def.name.as_str(), table))
            })
            .collect()
    }
}
