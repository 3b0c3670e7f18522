use crate::error::Result;
use rabbitmq_http_client::responses::QueueInfo;
use regex::Regex;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueueDescriptor {
    pub name: String,
    pub vhost: String,
}

impl QueueDescriptor {
    pub fn new(name: impl Into<String>, vhost: impl Into<String>) -> QueueDescriptor {
        QueueDescriptor {
            name: name.into(),
            vhost: vhost.into(),
        }
    }
}

impl From<QueueInfo> for QueueDescriptor {
    fn from(info: QueueInfo) -> QueueDescriptor {
        QueueDescriptor {
            name: info.name,
            vhost: info.vhost,
        }
    }
}

/// Selects queues whose name starts with a match of the pattern and which live in
/// exactly the given vhost.
#[derive(Debug, Clone)]
pub struct QueueFilter {
    pattern: Regex,
    vhost: String,
}

impl QueueFilter {
    pub fn new(pattern: &str, vhost: &str) -> Result<QueueFilter> {
        let pattern = Regex::new(pattern)?;
        Ok(QueueFilter {
            pattern,
            vhost: vhost.to_string(),
        })
    }

    pub fn matches(&self, queue: &QueueDescriptor) -> bool {
        // leftmost match starting at 0: "tmp" matches "tmp_1" but "_1" does not
        queue.vhost == self.vhost
            && self
                .pattern
                .find(&queue.name)
                .is_some_and(|m| m.start() == 0)
    }
}

pub fn collect_queues(queues: Vec<QueueDescriptor>, filter: &QueueFilter) -> Vec<QueueDescriptor> {
    queues
        .into_iter()
        .filter(|queue| {
            let hit = filter.matches(queue);
            if !hit {
                debug!(queue = %queue.name, vhost = %queue.vhost, "skipping queue");
            }
            hit
        })
        .collect()
}
