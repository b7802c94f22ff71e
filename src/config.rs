use std::env;
use std::path::PathBuf;

#[derive(Clone, Debug)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub assets_dir: PathBuf,
    pub cors_allow_any: bool,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        Ok(Self {
            host: env::var("DUPLYNX_HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: env::var("DUPLYNX_PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .map_err(|_| "DUPLYNX_PORT must be a valid u16".to_string())?,
            assets_dir: env::var("DUPLYNX_ASSETS_DIR")
                .unwrap_or_else(|_| "web/static".to_string())
                .into(),
            cors_allow_any: parse_bool(
                "DUPLYNX_CORS_ALLOW_ANY",
                &env::var("DUPLYNX_CORS_ALLOW_ANY").unwrap_or_else(|_| "true".to_string()),
            )?,
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_bool(name: &str, raw: &str) -> Result<bool, String> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(format!("{} must be a boolean (true/false)", name)),
    }
}
