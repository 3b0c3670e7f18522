use crate::collector::QueueDescriptor;
use crate::config::Settings;
use crate::error::{Error, Result};
use amqprs::channel::{Channel, QueueDeleteArguments};
use amqprs::connection::{Connection, OpenConnectionArguments};
use rabbitmq_http_client::blocking_api::Client;
use tokio::runtime::{Builder, Runtime};
use tracing::{debug, info, warn};

pub trait QueueLister {
    /// Every queue on the broker, across all vhosts.
    fn list_queues(&self) -> Result<Vec<QueueDescriptor>>;
}

pub trait QueueDeleter {
    fn delete_queue(&mut self, queue: &QueueDescriptor) -> Result<()>;
}

type RmqClient = Client<String, String, String>;

/// Management HTTP API client. Lists queues and can delete them with `DELETE /api/queues/{vhost}/{name}`.
pub struct ManagementClient {
    rc: RmqClient,
}

impl ManagementClient {
    pub fn new(endpoint: &str, username: &str, password: &str) -> ManagementClient {
        ManagementClient {
            rc: Client::new(endpoint.to_string(), username.to_string(), password.to_string()),
        }
    }
}

impl QueueLister for ManagementClient {
    fn list_queues(&self) -> Result<Vec<QueueDescriptor>> {
        let queues = self
            .rc
            .list_queues()
            .map_err(|e| Error::Listing(e.to_string()))?;
        debug!(count = queues.len(), "listed queues");
        Ok(queues.into_iter().map(QueueDescriptor::from).collect())
    }
}

// Shared reference so one client can list and delete in the same run.
impl QueueDeleter for &ManagementClient {
    fn delete_queue(&mut self, queue: &QueueDescriptor) -> Result<()> {
        self.rc
            .delete_queue(&queue.vhost, &queue.name, false)
            .map_err(|e| Error::Deletion(e.to_string()))
    }
}

/// Deletes queues with `queue.delete` over a single AMQP connection.
///
/// The connection and its channel are opened on the first deletion and closed on drop.
pub struct AmqpDeleter {
    runtime: Runtime,
    con_args: OpenConnectionArguments,
    session: Option<(Connection, Channel)>,
}

impl AmqpDeleter {
    pub fn new(settings: &Settings) -> Result<AmqpDeleter> {
        let host = settings.amqp_host()?;
        let mut con_args = OpenConnectionArguments::new(
            &host,
            settings.port,
            &settings.username,
            &settings.password,
        );
        con_args.virtual_host(&settings.vhost);

        let runtime = Builder::new_current_thread().enable_all().build()?;

        Ok(AmqpDeleter {
            runtime,
            con_args,
            session: None,
        })
    }

    pub fn is_connected(&self) -> bool {
        self.session.is_some()
    }
}

impl QueueDeleter for AmqpDeleter {
    fn delete_queue(&mut self, queue: &QueueDescriptor) -> Result<()> {
        let AmqpDeleter {
            runtime,
            con_args,
            session,
        } = self;

        let result: Result<()> = runtime.block_on(async move {
            let reusable = matches!(session.as_ref(), Some((connection, _)) if connection.is_open());
            if !reusable {
                let connection = Connection::open(con_args).await?;
                info!(name = %connection.connection_name(), "AMQP connection established");
                let channel = connection.open_channel(None).await?;
                *session = Some((connection, channel));
            } else if let Some((connection, channel)) = session.as_mut() {
                // the broker closes the channel after a failed method
                if !channel.is_open() {
                    *channel = connection.open_channel(None).await?;
                }
            }

            if let Some((_, channel)) = session.as_ref() {
                let messages = channel
                    .queue_delete(QueueDeleteArguments::new(&queue.name))
                    .await?;
                debug!(queue = %queue.name, ?messages, "queue.delete ok");
            }
            Ok(())
        });
        result
    }
}

impl Drop for AmqpDeleter {
    fn drop(&mut self) {
        if let Some((connection, channel)) = self.session.take() {
            self.runtime.block_on(async {
                if let Err(e) = channel.close().await {
                    warn!("failed to close AMQP channel: {}", e);
                }
                if let Err(e) = connection.close().await {
                    warn!("failed to close AMQP connection: {}", e);
                }
            });
            debug!("AMQP connection closed");
        }
    }
}
