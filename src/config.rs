use crate::args::{Args, DeletionMethod};
use crate::error::{Error, Result};
use ini::{Ini, ParseOption};
use std::path::Path;
use std::str::FromStr;
use url::Url;

pub const DEFAULT_CONFIG_FILE: &str = "config.ini";

const DEFAULTS: &str = "Defaults";
const QUEUES: &str = "Queues";
const ACTIONS: &str = "Actions";

/// Everything a run needs, resolved once from flags, the config file and built-in defaults
/// (in that order of precedence).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub username: String,
    pub password: String,
    pub host: String,
    pub vhost: String,
    pub port: u16,
    pub api_port: Option<u16>,
    pub pattern: String,
    pub dry_run: bool,
    pub deletion_method: DeletionMethod,
}

impl Settings {
    /// Loads the config file named by `--config`, or `config.ini` if it exists, and merges
    /// it with the flags.
    pub fn load(args: &Args) -> Result<Settings> {
        let ini = match &args.config {
            Some(path) => Ini::load_from_file_opt(path, parse_option())?,
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => {
                Ini::load_from_file_opt(DEFAULT_CONFIG_FILE, parse_option())?
            }
            None => Ini::new(),
        };
        Settings::resolve(args, &ini)
    }

    pub fn resolve(args: &Args, ini: &Ini) -> Result<Settings> {
        let get = |section: &str, key: &str| ini.get_from(Some(section), key).map(str::to_string);

        let pattern = args
            .pattern
            .clone()
            .or_else(|| get(QUEUES, "name_regex"))
            .ok_or_else(|| {
                Error::Config(
                    "no queue name pattern, pass --pattern or set name_regex under [Queues]"
                        .to_string(),
                )
            })?;

        let port = match args.port {
            Some(port) => port,
            None => parse_or(get(DEFAULTS, "port"), "port", 5672)?,
        };

        let api_port = match args.api_port {
            Some(port) => Some(port),
            None => get(DEFAULTS, "api_port")
                .map(|value| parse_value::<u16>(&value, "api_port"))
                .transpose()?,
        };

        let dry_run = match args.dry_run {
            Some(dry_run) => dry_run,
            None => match get(ACTIONS, "deletion_dry_run") {
                Some(value) => parse_bool(&value)?,
                None => true,
            },
        };

        let deletion_method = match args.delete_via {
            Some(method) => method,
            None => match get(ACTIONS, "deletion_method") {
                Some(value) => parse_method(&value)?,
                None => DeletionMethod::Http,
            },
        };

        let string = |flag: &Option<String>, key: &str, default: &str| {
            flag.clone()
                .or_else(|| get(DEFAULTS, key))
                .unwrap_or_else(|| default.to_string())
        };

        Ok(Settings {
            username: string(&args.username, "username", "guest"),
            password: string(&args.password, "password", "guest"),
            host: string(&args.host, "host", "http://localhost:15672"),
            vhost: string(&args.vhost, "vhost", "/"),
            port,
            api_port,
            pattern,
            dry_run,
            deletion_method,
        })
    }

    /// Management API base, e.g. `http://localhost:15672/api`.
    ///
    /// With an API port the host is a bare hostname, otherwise it is a base URL.
    pub fn endpoint(&self) -> Result<String> {
        let base = match self.api_port {
            Some(api_port) => format!("http://{}:{}", self.host, api_port),
            None => self.host.trim_end_matches('/').to_string(),
        };
        let url = Url::parse(&base)?;
        if url.host_str().is_none() {
            return Err(Error::Config(format!("host is missing in '{}'", base)));
        }
        Ok(format!("{}/api", base.trim_end_matches('/')))
    }

    /// Hostname for the AMQP connection.
    pub fn amqp_host(&self) -> Result<String> {
        if self.api_port.is_some() {
            return Ok(self.host.clone());
        }
        let url = Url::parse(&self.host)?;
        url.host_str()
            .map(str::to_string)
            .ok_or_else(|| Error::Config(format!("host is missing in '{}'", self.host)))
    }
}

// values are taken literally: regexes are full of backslashes and quotes
fn parse_option() -> ParseOption {
    ParseOption {
        enabled_quote: false,
        enabled_escape: false,
        ..ParseOption::default()
    }
}

fn parse_value<T: FromStr>(value: &str, key: &str) -> Result<T> {
    value
        .trim()
        .parse()
        .map_err(|_| Error::Config(format!("invalid value '{}' for {}", value, key)))
}

fn parse_or<T: FromStr>(value: Option<String>, key: &str, default: T) -> Result<T> {
    match value {
        Some(value) => parse_value(&value, key),
        None => Ok(default),
    }
}

fn parse_bool(value: &str) -> Result<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "yes" | "true" | "on" => Ok(true),
        "0" | "no" | "false" | "off" => Ok(false),
        _ => Err(Error::Config(format!("invalid value '{}' for deletion_dry_run", value))),
    }
}

fn parse_method(value: &str) -> Result<DeletionMethod> {
    match value.trim().to_lowercase().as_str() {
        "http" => Ok(DeletionMethod::Http),
        "amqp" => Ok(DeletionMethod::Amqp),
        _ => Err(Error::Config(format!("invalid value '{}' for deletion_method", value))),
    }
}
