use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use sashquote_core::config::{
    AppConfig, CATALOG_PATH_ENV, CONFIG_PATH_ENV, DEFAULT_CONFIG_FILE, DEFAULT_MARGIN_ENV,
    LOG_FORMAT_ENV, LOG_LEVEL_ENV,
};
use toml::Value;

use super::CommandResult;

pub fn run(config: &AppConfig) -> CommandResult {
    let config_file_path = detect_config_path();
    let config_file_doc = load_config_file_doc(config_file_path.as_deref());

    let mut lines = vec!["effective config (source precedence: env > file > default):".to_string()];

    lines.push(render_line(
        "quoting.default_margin_percent",
        &config.quoting.default_margin_percent.to_string(),
        field_source(
            "quoting.default_margin_percent",
            Some(DEFAULT_MARGIN_ENV),
            config_file_doc.as_ref(),
            config_file_path.as_deref(),
        ),
    ));
    lines.push(render_line(
        "quoting.show_gst",
        &config.quoting.show_gst.to_string(),
        field_source(
            "quoting.show_gst",
            None,
            config_file_doc.as_ref(),
            config_file_path.as_deref(),
        ),
    ));
    lines.push(render_line(
        "catalog.path",
        &config.catalog.path.display().to_string(),
        field_source(
            "catalog.path",
            Some(CATALOG_PATH_ENV),
            config_file_doc.as_ref(),
            config_file_path.as_deref(),
        ),
    ));
    lines.push(render_line(
        "logging.level",
        &config.logging.level,
        field_source(
            "logging.level",
            Some(LOG_LEVEL_ENV),
            config_file_doc.as_ref(),
            config_file_path.as_deref(),
        ),
    ));
    lines.push(render_line(
        "logging.format",
        &format!("{:?}", config.logging.format),
        field_source(
            "logging.format",
            Some(LOG_FORMAT_ENV),
            config_file_doc.as_ref(),
            config_file_path.as_deref(),
        ),
    ));

    CommandResult::success(lines.join("\n"))
}

fn detect_config_path() -> Option<PathBuf> {
    if let Some(path) = env::var_os(CONFIG_PATH_ENV).map(PathBuf::from) {
        if path.exists() {
            return Some(path);
        }
    }

    let root = PathBuf::from(DEFAULT_CONFIG_FILE);
    if root.exists() {
        return Some(root);
    }

    None
}

fn load_config_file_doc(path: Option<&Path>) -> Option<Value> {
    let path = path?;
    let raw = fs::read_to_string(path).ok()?;
    raw.parse::<Value>().ok()
}

fn field_source(
    key_path: &str,
    env_key: Option<&str>,
    config_file_doc: Option<&Value>,
    config_file_path: Option<&Path>,
) -> String {
    if let Some(env_key) = env_key {
        if env::var_os(env_key).is_some() {
            return format!("env ({env_key})");
        }
    }

    if let Some(doc) = config_file_doc {
        if contains_path(doc, key_path) {
            let file_path = config_file_path
                .map(|path| path.display().to_string())
                .unwrap_or_else(|| "config file".to_string());
            return format!("file ({file_path})");
        }
    }

    "default".to_string()
}

fn contains_path(root: &Value, key_path: &str) -> bool {
    let mut current = root;
    for key in key_path.split('.') {
        let Some(next) = current.get(key) else {
            return false;
        };
        current = next;
    }
    true
}

fn render_line(key: &str, value: &str, source: String) -> String {
    format!("- {key} = {value} (source: {source})")
}
