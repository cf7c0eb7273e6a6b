// Configuration loading, validation, and default generation
use serde::Deserialize;
use std::fs;

#[derive(Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub server: Srv,
}

#[derive(Deserialize, Clone)]
#[serde(default)]
pub struct Srv {
    pub listen_addr: String,
    pub directory: String,
    pub buffer_size: usize,
    pub read_timeout: u64,
    pub max_message_size: u64,
    pub log_level: String,
    pub logging: bool,
}

impl Default for Srv {
    fn default() -> Self {
        Srv {
            listen_addr: "0.0.0.0:4221".to_string(),
            directory: ".".to_string(),
            buffer_size: 1024,
            read_timeout: 20,
            max_message_size: 1 << 30,
            log_level: "info".to_string(),
            logging: true,
        }
    }
}

impl Srv {
    pub fn validate(&mut self) -> bool {
        let mut valid = true;

        if self.listen_addr.parse::<std::net::SocketAddr>().is_err() {
            crate::log::error(&format!("listen_addr '{}' is not a valid address (expected ip:port)", self.listen_addr));
            valid = false;
        }

        if self.buffer_size < 64 {
            crate::log::warn(&format!("buffer_size too small ({}), using 1024", self.buffer_size));
            self.buffer_size = 1024;
        }
        if self.read_timeout == 0 {
            crate::log::warn("read_timeout is 0, using 20");
            self.read_timeout = 20;
        }
        if self.max_message_size == 0 {
            self.max_message_size = 1 << 30;
        }
        if !std::path::Path::new(&self.directory).is_dir() {
            crate::log::warn(&format!("served directory '{}' does not exist", self.directory));
        }

        valid
    }
}

fn atomic_write(path: &str, content: &str) -> std::io::Result<()> {
    let tmp = format!("{path}.tmp");
    fs::write(&tmp, content)?;
    fs::rename(&tmp, path)?;
    Ok(())
}

pub fn load_config() -> Config {
    let p = path();
    let mut cfg = match fs::read_to_string(&p) {
        Ok(txt) => match toml::from_str(&txt) {
            Ok(c) => {
                crate::log::info(&format!("Loaded {p}"));
                c
            }
            Err(e) => {
                crate::log::error(&format!("Parse error {p}: {e}"));
                crate::log::warn("Using defaults");
                Config::default()
            }
        },
        Err(_) => {
            let cfg = Config::default();
            let content = generate_config(&cfg);
            if atomic_write(&p, &content).is_ok() {
                crate::log::info(&format!("Generated {p}"));
            } else {
                crate::log::warn(&format!("No config at '{p}', using defaults"));
            }
            cfg
        }
    };

    if let Some(dir) = directory_override() {
        cfg.server.directory = dir;
    }

    if !cfg.server.validate() {
        if cfg.server.listen_addr.parse::<std::net::SocketAddr>().is_err() {
            let fallback = "0.0.0.0:4221";
            crate::log::warn(&format!("listen_addr invalid, using {fallback}"));
            cfg.server.listen_addr = fallback.to_string();
        }
    }

    cfg
}

fn generate_config(cfg: &Config) -> String {
    let mut doc = toml::Table::new();
    let mut srv = toml::Table::new();
    srv.insert("listen_addr".into(), toml::Value::String(cfg.server.listen_addr.clone()));
    srv.insert("directory".into(), toml::Value::String(cfg.server.directory.clone()));
    srv.insert("buffer_size".into(), toml::Value::Integer(cfg.server.buffer_size as i64));
    srv.insert("read_timeout".into(), toml::Value::Integer(cfg.server.read_timeout as i64));
    srv.insert("max_message_size".into(), toml::Value::Integer(cfg.server.max_message_size as i64));
    srv.insert("log_level".into(), toml::Value::String(cfg.server.log_level.clone()));
    srv.insert("logging".into(), toml::Value::Boolean(cfg.server.logging));
    doc.insert("server".into(), toml::Value::Table(srv));
    match toml::to_string_pretty(&doc) {
        Ok(s) => s,
        Err(e) => {
            crate::log::error(&format!("Config serialization failed: {e}"));
            String::new()
        }
    }
}

fn path() -> String {
    let args: Vec<String> = std::env::args().collect();
    args.windows(2)
        .find(|w| w[0] == "--config")
        .map(|w| w[1].clone())
        .unwrap_or_else(|| "config.toml".to_string())
}

/// The served directory can be set from the command line, overriding the
/// config file value.
fn directory_override() -> Option<String> {
    let args: Vec<String> = std::env::args().collect();
    args.windows(2)
        .find(|w| w[0] == "--directory")
        .map(|w| w[1].clone())
}
