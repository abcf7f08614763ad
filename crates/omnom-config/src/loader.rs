//! Loader for configuration split across several files.
//!
//! Any file may name further files with `include`, resolved relative to the
//! including file. All files are merged into one document before
//! environment variables are resolved. A top-level section may appear in
//! only one file, and a file may not include itself, directly or through
//! other files.

use crate::{parse_document, Config, ConfigError};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Loads a configuration file together with its includes.
pub struct ConfigLoader {
	/// Directory the top-level path is resolved against
	base_dir: PathBuf,
	/// Canonical paths of the files being expanded, outermost first
	include_stack: Vec<PathBuf>,
	/// Sections merged so far
	merged: toml::Table,
	/// File each merged section was read from
	origins: HashMap<String, PathBuf>,
}

impl ConfigLoader {
	pub fn new(base_dir: impl AsRef<Path>) -> Self {
		Self {
			base_dir: base_dir.as_ref().to_path_buf(),
			include_stack: Vec::new(),
			merged: toml::Table::new(),
			origins: HashMap::new(),
		}
	}

	/// Loads `config_path` and everything it includes into one [`Config`].
	pub async fn load_config(
		&mut self,
		config_path: impl AsRef<Path>,
	) -> Result<Config, ConfigError> {
		let path = locate(&self.base_dir, config_path.as_ref())?;
		self.merge_file(path).await?;

		Config::from_table(std::mem::take(&mut self.merged))
	}

	async fn merge_file(&mut self, path: PathBuf) -> Result<(), ConfigError> {
		let identity = path.canonicalize()?;
		if let Some(start) = self.include_stack.iter().position(|p| p == &identity) {
			let chain: Vec<String> = self.include_stack[start..]
				.iter()
				.chain(std::iter::once(&identity))
				.map(|p| p.display().to_string())
				.collect();
			return Err(ConfigError::Validation(format!(
				"Include cycle: {}",
				chain.join(" -> ")
			)));
		}

		let text = tokio::fs::read_to_string(&path).await?;
		let mut document = parse_document(&text)?;
		let includes = take_includes(&mut document)?;

		for (section, value) in document {
			if let Some(first) = self.origins.get(&section) {
				return Err(ConfigError::Validation(format!(
					"Section '{}' is defined in both {} and {}",
					section,
					first.display(),
					path.display()
				)));
			}
			self.origins.insert(section.clone(), path.clone());
			self.merged.insert(section, value);
		}

		let dir = path.parent().map(Path::to_path_buf).unwrap_or_default();
		self.include_stack.push(identity);
		for include in includes {
			let target = locate(&dir, &include)?;
			Box::pin(self.merge_file(target)).await?;
		}
		self.include_stack.pop();

		Ok(())
	}
}

/// Resolves `path` against `dir` and checks that the file exists.
fn locate(dir: &Path, path: &Path) -> Result<PathBuf, ConfigError> {
	let resolved = if path.is_absolute() {
		path.to_path_buf()
	} else {
		dir.join(path)
	};

	if !resolved.is_file() {
		return Err(ConfigError::Io(std::io::Error::new(
			std::io::ErrorKind::NotFound,
			format!("Configuration file not found: {}", resolved.display()),
		)));
	}

	Ok(resolved)
}

/// Removes the `include` key, a string or array of strings, from `document`.
fn take_includes(document: &mut toml::Table) -> Result<Vec<PathBuf>, ConfigError> {
	match document.remove("include") {
		None => Ok(Vec::new()),
		Some(toml::Value::String(path)) => Ok(vec![PathBuf::from(path)]),
		Some(toml::Value::Array(items)) => items
			.into_iter()
			.map(|item| match item {
				toml::Value::String(path) => Ok(PathBuf::from(path)),
				other => Err(ConfigError::Validation(format!(
					"include entries must be strings, found {}",
					other.type_str()
				))),
			})
			.collect(),
		Some(other) => Err(ConfigError::Validation(format!(
			"include must be a string or an array of strings, found {}",
			other.type_str()
		))),
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::fs;
	use tempfile::TempDir;

	const MESSAGING: &str = r#"
[messaging]
originator = "OmNomNom"
primary = "log"
[messaging.implementations.log]
"#;

	#[tokio::test]
	async fn test_single_file_config() {
		let temp_dir = TempDir::new().unwrap();
		let config_path = temp_dir.path().join("config.toml");

		let config_content = format!("[server]\nport = 8088\n{}", MESSAGING);
		fs::write(&config_path, config_content).unwrap();

		let mut loader = ConfigLoader::new(temp_dir.path());
		let config = loader.load_config(&config_path).await.unwrap();

		assert_eq!(config.server.port, 8088);
		assert_eq!(config.messaging.primary, "log");
	}

	#[tokio::test]
	async fn test_config_with_includes() {
		let temp_dir = TempDir::new().unwrap();

		let main_config = r#"
include = ["messaging.toml", "orders.toml"]

[server]
host = "127.0.0.1"
"#;

		let orders_config = r#"
[[orders]]
name = "Hannah Hungry"
phone = "+319876543210"
items = "1 x Hipster Burger + Fries"
"#;

		fs::write(temp_dir.path().join("main.toml"), main_config).unwrap();
		fs::write(temp_dir.path().join("messaging.toml"), MESSAGING).unwrap();
		fs::write(temp_dir.path().join("orders.toml"), orders_config).unwrap();

		let mut loader = ConfigLoader::new(temp_dir.path());
		let config = loader.load_config("main.toml").await.unwrap();

		assert_eq!(config.server.host, "127.0.0.1");
		assert_eq!(config.messaging.primary, "log");
		assert_eq!(config.orders.len(), 1);
	}

	#[tokio::test]
	async fn test_single_include_string() {
		let temp_dir = TempDir::new().unwrap();

		fs::write(
			temp_dir.path().join("main.toml"),
			"include = \"messaging.toml\"\n",
		)
		.unwrap();
		fs::write(temp_dir.path().join("messaging.toml"), MESSAGING).unwrap();

		let config = Config::from_file(temp_dir.path().join("main.toml").to_str().unwrap())
			.await
			.unwrap();
		assert_eq!(config.messaging.originator, "OmNomNom");
	}

	#[tokio::test]
	async fn test_duplicate_section_error() {
		let temp_dir = TempDir::new().unwrap();

		let main_config = format!("include = [\"duplicate.toml\"]\n{}", MESSAGING);

		fs::write(temp_dir.path().join("main.toml"), main_config).unwrap();
		fs::write(temp_dir.path().join("duplicate.toml"), MESSAGING).unwrap();

		let mut loader = ConfigLoader::new(temp_dir.path());
		let result = loader.load_config("main.toml").await;

		let error_msg = result.unwrap_err().to_string();
		assert!(error_msg.contains("Section 'messaging' is defined in both"));
	}

	#[tokio::test]
	async fn test_self_include_detection() {
		let temp_dir = TempDir::new().unwrap();

		let config = format!("include = [\"self.toml\"]\n{}", MESSAGING);
		fs::write(temp_dir.path().join("self.toml"), config).unwrap();

		let mut loader = ConfigLoader::new(temp_dir.path());
		let result = loader.load_config("self.toml").await;

		let error_msg = result.unwrap_err().to_string();
		assert!(error_msg.starts_with("Validation error: Include cycle:"));
	}

	#[tokio::test]
	async fn test_indirect_cycle_detection() {
		let temp_dir = TempDir::new().unwrap();

		fs::write(
			temp_dir.path().join("a.toml"),
			format!("include = \"b.toml\"\n{}", MESSAGING),
		)
		.unwrap();
		fs::write(temp_dir.path().join("b.toml"), "include = \"a.toml\"\n").unwrap();

		let mut loader = ConfigLoader::new(temp_dir.path());
		let error_msg = loader.load_config("a.toml").await.unwrap_err().to_string();

		assert!(error_msg.contains("Include cycle"));
		assert!(error_msg.contains("b.toml"));
	}

	#[tokio::test]
	async fn test_nested_include_is_relative_to_including_file() {
		let temp_dir = TempDir::new().unwrap();
		let nested = temp_dir.path().join("conf.d");
		fs::create_dir(&nested).unwrap();

		fs::write(
			temp_dir.path().join("main.toml"),
			"include = [\"conf.d/messaging.toml\"]\n[server]\nport = 9090\n",
		)
		.unwrap();
		fs::write(
			nested.join("messaging.toml"),
			format!("include = \"orders.toml\"\n{}", MESSAGING),
		)
		.unwrap();
		fs::write(
			nested.join("orders.toml"),
			"[[orders]]\nname = \"Ada\"\nphone = \"+10000000001\"\nitems = \"Soup\"\n",
		)
		.unwrap();

		let mut loader = ConfigLoader::new(temp_dir.path());
		let config = loader.load_config("main.toml").await.unwrap();

		assert_eq!(config.server.port, 9090);
		assert_eq!(config.messaging.primary, "log");
		assert_eq!(config.orders.len(), 1);
		assert_eq!(config.orders[0].name, "Ada");
	}

	#[tokio::test]
	async fn test_env_value_expanded_once_across_includes() {
		let temp_dir = TempDir::new().unwrap();
		std::env::set_var("OMNOM_TEST_FILE_KEY", "abc${OMNOM_TEST_FILE_UNSET}def");

		fs::write(
			temp_dir.path().join("main.toml"),
			"include = \"messaging.toml\"\n",
		)
		.unwrap();
		fs::write(
			temp_dir.path().join("messaging.toml"),
			r#"
[messaging]
primary = "messagebird"
[messaging.implementations.messagebird]
api_key = "${OMNOM_TEST_FILE_KEY}"
"#,
		)
		.unwrap();

		let config = Config::from_file(temp_dir.path().join("main.toml").to_str().unwrap())
			.await
			.unwrap();
		let api_key = config.messaging.implementations["messagebird"]
			.get("api_key")
			.and_then(|v| v.as_str());
		assert_eq!(api_key, Some("abc${OMNOM_TEST_FILE_UNSET}def"));

		std::env::remove_var("OMNOM_TEST_FILE_KEY");
	}

	#[tokio::test]
	async fn test_include_must_hold_strings() {
		let temp_dir = TempDir::new().unwrap();
		fs::write(temp_dir.path().join("main.toml"), "include = [1]\n").unwrap();

		let mut loader = ConfigLoader::new(temp_dir.path());
		let error_msg = loader.load_config("main.toml").await.unwrap_err().to_string();

		assert!(error_msg.contains("include entries must be strings, found integer"));
	}

	#[tokio::test]
	async fn test_missing_include() {
		let temp_dir = TempDir::new().unwrap();

		fs::write(
			temp_dir.path().join("main.toml"),
			"include = [\"missing.toml\"]\n",
		)
		.unwrap();

		let mut loader = ConfigLoader::new(temp_dir.path());
		let result = loader.load_config("main.toml").await;

		assert!(matches!(result, Err(ConfigError::Io(_))));
	}
}
