use clap::{Parser, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug, Default)]
#[command(version, about = r#"Deletes RabbitMQ queues whose names match a pattern.
Nothing is deleted unless dry run is switched off. See examples below"#,
    long_about = None, after_long_help = color_print::cstr!(r#"
Every flag falls back to the config file (<i>config.ini</> by default):

  [Defaults]
  username = guest
  password = guest
  host = http://localhost:15672
  vhost = /
  port = 5672
  api_port = 15672

  [Queues]
  name_regex = ^tmp_.*

  [Actions]
  deletion_dry_run = true
  deletion_method = http

<bold>Examples</>:
- Show which queues starting with "tmp_" would be deleted from vhost '/'
  <green><i>prune_rmq --pattern '^tmp_'</></>

- Actually delete them. Short flag '-d' works too
  <green><i>prune_rmq --pattern '^tmp_' --dry-run=false</></>

- Delete queues ending in "_error" anywhere in the name. The pattern is matched from the start of the name, so use '.*' to skip the prefix
  <green><i>prune_rmq --pattern '.*_error$' --dry-run=false</></>

- Connect to a remote server, list queues via API port 15672 and delete them over AMQP on port 5672 in vhost 'myapp'
  <green><i>prune_rmq --host rabbit.local --api_port 15672 --port 5672 --vhost myapp --delete-via amqp --pattern 'session\.' --dry-run=false</></>

- Use another config file and print diagnostics
  <green><i>prune_rmq --config staging.ini --debug</></>
"#))]
pub struct Args {
    #[arg(short, long, help = "Path to the INI config file [default: config.ini]")]
    pub config: Option<PathBuf>,

    #[arg(long, help = "RabbitMQ admin username")]
    pub username: Option<String>,

    #[arg(long, help = "RabbitMQ admin password")]
    pub password: Option<String>,

    #[arg(
        long,
        help = "RabbitMQ host. A base URL like 'http://localhost:15672', or a bare hostname when --api_port is given"
    )]
    pub host: Option<String>,

    #[arg(short, long, help = "Virtual host")]
    pub vhost: Option<String>,

    #[arg(short = 'f', long, help = "Regex for queue names, matched from the start of the name")]
    pub pattern: Option<String>,

    #[arg(long, help = "AMQP port, used with --delete-via amqp")]
    pub port: Option<u16>,

    #[arg(long = "api_port", visible_alias = "api-port", help = "Management API port")]
    pub api_port: Option<u16>,

    #[arg(
        short,
        long,
        num_args = 0..=1,
        default_missing_value = "true",
        help = "Dry run (change nothing). Pass --dry-run=false to delete [default: true]"
    )]
    pub dry_run: Option<bool>,

    #[arg(long, value_enum, help = "How matching queues are deleted [default: http]")]
    pub delete_via: Option<DeletionMethod>,

    #[arg(long, default_value_t = false, help = "Print debug diagnostics")]
    pub debug: bool,
}

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DeletionMethod {
    /// DELETE through the management API
    #[default]
    Http,
    /// queue.delete over an AMQP connection
    Amqp,
}
