use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;
use serde_json::Value;

use crate::EzmlError;
use crate::EzmlResult;
use crate::Variables;

/// Configuration loaded from an `ezml.toml` file.
///
/// ```toml
/// template = "page.ezml"
/// data = ["base.json", "override.toml"]
/// ```
#[derive(Debug, Default, Deserialize)]
pub struct EzmlConfig {
	/// Default template file, relative to the project root.
	#[serde(default)]
	pub template: Option<PathBuf>,
	/// Variable data files, merged in listed order (later files win).
	#[serde(default)]
	pub data: Vec<PathBuf>,
}

impl EzmlConfig {
	/// Load the config from `ezml.toml` at the given root directory.
	/// Returns `None` if the file does not exist.
	pub fn load(root: &Path) -> EzmlResult<Option<EzmlConfig>> {
		let config_path = root.join("ezml.toml");

		if !config_path.exists() {
			return Ok(None);
		}

		let content = std::fs::read_to_string(&config_path)?;
		let config: EzmlConfig =
			toml::from_str(&content).map_err(|e| EzmlError::ConfigParse(e.to_string()))?;

		Ok(Some(config))
	}

	/// Read every configured data file and merge the variables in listed
	/// order.
	pub fn load_variables(&self, root: &Path) -> EzmlResult<Variables> {
		let mut variables = Variables::new();

		for rel_path in &self.data {
			variables.extend(read_variables_file(&root.join(rel_path))?);
		}

		Ok(variables)
	}
}

/// Read a single data file into a variable map. The format follows the file
/// extension (json, toml, yaml/yml) and the top level must be an object;
/// its entries become the variables.
pub fn read_variables_file(path: &Path) -> EzmlResult<Variables> {
	let display = path.display().to_string();
	let content = std::fs::read_to_string(path).map_err(|e| {
		EzmlError::DataFile {
			path: display.clone(),
			reason: e.to_string(),
		}
	})?;

	let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("");
	let value: Value = match extension {
		"json" => {
			serde_json::from_str(&content).map_err(|e| {
				EzmlError::DataFile {
					path: display.clone(),
					reason: e.to_string(),
				}
			})?
		}
		"toml" => {
			toml::from_str(&content).map_err(|e| {
				EzmlError::DataFile {
					path: display.clone(),
					reason: e.to_string(),
				}
			})?
		}
		"yaml" | "yml" => {
			serde_yaml_ng::from_str(&content).map_err(|e| {
				EzmlError::DataFile {
					path: display.clone(),
					reason: e.to_string(),
				}
			})?
		}
		other => return Err(EzmlError::UnsupportedDataFormat(other.to_string())),
	};

	let Value::Object(map) = value else {
		return Err(EzmlError::DataFile {
			path: display,
			reason: "top level must be an object/table of variables".to_string(),
		});
	};

	Ok(map.into_iter().collect())
}
