//! 配置加载
//!
//! 优先级：环境变量 > `~/.config/agent-notify/config.json` > 默认值

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::notification::Channel;

pub const DEFAULT_TITLE_PREFIX: &str = "Agent";
pub const DEFAULT_TAIL_LINES: usize = 20;
pub const DEFAULT_POLL_INTERVAL: f64 = 1.0;

pub const ENV_CONFIG_PATH: &str = "AGENT_NOTIFY_CONFIG";
pub const ENV_TITLE_PREFIX: &str = "AGENT_NOTIFY_TITLE_PREFIX";
pub const ENV_CHANNELS: &str = "AGENT_NOTIFY_CHANNELS";
pub const ENV_TAIL_LINES: &str = "AGENT_NOTIFY_TAIL_LINES";
pub const ENV_POLL_INTERVAL: &str = "AGENT_NOTIFY_POLL_INTERVAL";

/// 运行配置，显式传给每个命令
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AppConfig {
    pub title_prefix: String,
    pub channels: Vec<String>,
    pub tail_lines: usize,
    pub poll_interval: f64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            title_prefix: DEFAULT_TITLE_PREFIX.to_string(),
            channels: vec!["desktop".to_string()],
            tail_lines: DEFAULT_TAIL_LINES,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }
}

impl AppConfig {
    /// 未通过 `--channel` 指定时使用的渠道
    pub fn default_channel(&self) -> Channel {
        Channel::from_configured(&self.channels)
    }
}

/// `channels` 可以是数组，也可以是逗号分隔的字符串
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ChannelsField {
    List(Vec<String>),
    Text(String),
}

#[derive(Debug, Default, Deserialize)]
struct FileConfig {
    title_prefix: Option<String>,
    channels: Option<ChannelsField>,
    tail_lines: Option<usize>,
    poll_interval: Option<f64>,
}

/// 默认配置文件路径
pub fn default_config_path() -> Option<PathBuf> {
    if let Ok(path) = std::env::var(ENV_CONFIG_PATH) {
        if !path.is_empty() {
            return Some(PathBuf::from(path));
        }
    }
    dirs::home_dir().map(|home| home.join(".config/agent-notify/config.json"))
}

/// 旧版 TOML 配置文件，不再读取
pub const LEGACY_CONFIG_PATH: &str = ".agentnotify/config.toml";

/// 只有旧版配置存在时返回其路径，用于提示迁移
pub fn legacy_config_to_migrate(home: &Path, config_path: Option<&Path>) -> Option<PathBuf> {
    if config_path.is_some_and(Path::exists) {
        return None;
    }
    let legacy = home.join(LEGACY_CONFIG_PATH);
    legacy.is_file().then_some(legacy)
}

/// 从默认路径和进程环境变量加载
pub fn load_config() -> AppConfig {
    let path = default_config_path();
    if let Some(legacy) = dirs::home_dir().and_then(|home| legacy_config_to_migrate(&home, path.as_deref())) {
        warn!(
            legacy = %legacy.display(),
            "Legacy TOML config is not read; move its settings to ~/.config/agent-notify/config.json"
        );
    }
    load_config_from(path.as_deref(), |key| std::env::var(key).ok())
}

/// 从指定文件和环境变量来源加载；非法值记录警告后忽略
pub fn load_config_from<F>(path: Option<&Path>, env: F) -> AppConfig
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = AppConfig::default();

    if let Some(file) = path.and_then(read_file_config) {
        if let Some(prefix) = file.title_prefix {
            config.title_prefix = prefix;
        }
        if let Some(channels) = file.channels {
            config.channels = match channels {
                ChannelsField::List(items) => parse_channels(items.iter().map(String::as_str)),
                ChannelsField::Text(text) => parse_channels(text.split(',')),
            };
        }
        match file.tail_lines {
            Some(0) => warn!("Ignoring tail_lines = 0 in config file"),
            Some(lines) => config.tail_lines = lines,
            None => {}
        }
        if let Some(interval) = file.poll_interval {
            if valid_interval(interval) {
                config.poll_interval = interval;
            } else {
                warn!(poll_interval = interval, "Ignoring invalid poll_interval in config file");
            }
        }
    }

    if let Some(prefix) = env(ENV_TITLE_PREFIX) {
        config.title_prefix = prefix;
    }
    if let Some(channels) = env(ENV_CHANNELS) {
        config.channels = parse_channels(channels.split(','));
    }
    if let Some(raw) = env(ENV_TAIL_LINES) {
        match raw.trim().parse::<usize>() {
            Ok(lines) if lines > 0 => config.tail_lines = lines,
            _ => warn!(value = %raw, "Ignoring invalid {}", ENV_TAIL_LINES),
        }
    }
    if let Some(raw) = env(ENV_POLL_INTERVAL) {
        match raw.trim().parse::<f64>() {
            Ok(interval) if valid_interval(interval) => config.poll_interval = interval,
            _ => warn!(value = %raw, "Ignoring invalid {}", ENV_POLL_INTERVAL),
        }
    }

    config
}

fn valid_interval(interval: f64) -> bool {
    interval.is_finite() && interval > 0.0
}

fn read_file_config(path: &Path) -> Option<FileConfig> {
    if !path.is_file() {
        return None;
    }
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Failed to read config file");
            return None;
        }
    };
    match serde_json::from_str::<FileConfig>(&content) {
        Ok(file) => {
            debug!(path = %path.display(), "Loaded config file");
            Some(file)
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Ignoring malformed config file");
            None
        }
    }
}

/// 去空白、转小写、丢弃空项；结果为空时默认 desktop
pub fn parse_channels<'a>(parts: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    let channels: Vec<String> = parts
        .into_iter()
        .map(|part| part.trim().to_lowercase())
        .filter(|part| !part.is_empty())
        .collect();
    if channels.is_empty() {
        vec!["desktop".to_string()]
    } else {
        channels
    }
}
