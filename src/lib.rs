mod args;
mod broker;
mod collector;
mod config;
mod error;

pub use crate::args::{Args, DeletionMethod};
pub use crate::broker::{AmqpDeleter, ManagementClient, QueueDeleter, QueueLister};
pub use crate::collector::{collect_queues, QueueDescriptor, QueueFilter};
pub use crate::config::{Settings, DEFAULT_CONFIG_FILE};
pub use crate::error::{Error, Result};

use std::io::{self, Write};
use tracing::debug;

/// What happened to a queue that passed the filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    WouldDelete(QueueDescriptor),
    Deleted(QueueDescriptor),
    Failed(QueueDescriptor, String),
}

pub fn run(args: Args) -> Result<()> {
    let settings = Settings::load(&args)?;
    // compile before touching the network
    let filter = QueueFilter::new(&settings.pattern, &settings.vhost)?;
    let endpoint = settings.endpoint()?;

    println!(
        "Connecting to endpoint '{}' and vhost '{}'",
        endpoint, settings.vhost
    );
    debug!(method = ?settings.deletion_method, dry_run = settings.dry_run, "resolved settings");

    let client = ManagementClient::new(&endpoint, &settings.username, &settings.password);
    let mut out = io::stdout().lock();

    match settings.deletion_method {
        DeletionMethod::Http => {
            let mut deleter = &client;
            clean(&client, &mut deleter, &filter, settings.dry_run, &mut out)?;
        }
        DeletionMethod::Amqp => {
            let mut deleter = AmqpDeleter::new(&settings)?;
            clean(&client, &mut deleter, &filter, settings.dry_run, &mut out)?;
        }
    }

    Ok(())
}

/// Lists all queues and prunes the ones matching `filter`. A listing failure aborts
/// before anything is filtered or deleted.
pub fn clean<L, D>(
    lister: &L,
    deleter: &mut D,
    filter: &QueueFilter,
    dry_run: bool,
    out: &mut dyn Write,
) -> Result<Vec<Outcome>>
where
    L: QueueLister + ?Sized,
    D: QueueDeleter + ?Sized,
{
    let queues = lister.list_queues()?;
    prune(queues, filter, dry_run, deleter, out)
}

/// Reports or deletes every queue that passes `filter`. A failed deletion is reported
/// and the remaining queues are still processed.
pub fn prune<D>(
    queues: Vec<QueueDescriptor>,
    filter: &QueueFilter,
    dry_run: bool,
    deleter: &mut D,
    out: &mut dyn Write,
) -> Result<Vec<Outcome>>
where
    D: QueueDeleter + ?Sized,
{
    let mut outcomes = Vec::new();

    for queue in collect_queues(queues, filter) {
        if dry_run {
            writeln!(
                out,
                "[DRY RUN] Would delete queue {} on vhost {}",
                queue.name, queue.vhost
            )?;
            outcomes.push(Outcome::WouldDelete(queue));
            continue;
        }

        match deleter.delete_queue(&queue) {
            Ok(()) => {
                writeln!(out, "✓ Queue {} deleted on vhost {}", queue.name, queue.vhost)?;
                outcomes.push(Outcome::Deleted(queue));
            }
            Err(e) => {
                writeln!(
                    out,
                    "✗ Error deleting queue {} on vhost {}: {}",
                    queue.name, queue.vhost, e
                )?;
                outcomes.push(Outcome::Failed(queue, e.to_string()));
            }
        }
    }

    Ok(outcomes)
}
