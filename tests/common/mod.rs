use prune_rmq::{Args, DeletionMethod};
use rabbitmq_http_client::blocking_api::Client;
use rabbitmq_http_client::commons::QueueType;
use rabbitmq_http_client::requests::{QueueParams, VirtualHostParams};
use rand::distr::Alphanumeric;
use rand::Rng;
use std::error::Error;

pub const API_HOST: &str = "http://localhost:15672";

/// Creates a throwaway vhost on a local RabbitMQ and removes it on drop.
pub struct TestClient<'a> {
    client: Client<&'a str, &'a str, &'a str>,
    pub vhost: String,
}

impl<'a> TestClient<'a> {
    pub fn new() -> Result<TestClient<'a>, Box<dyn Error>> {
        let vhost: String = rand::rng()
            .sample_iter(&Alphanumeric)
            .take(16)
            .map(char::from)
            .collect();

        let client = Client::new("http://localhost:15672/api", "guest", "guest");
        client.create_vhost(&VirtualHostParams {
            name: &vhost,
            description: None,
            tags: None,
            default_queue_type: None,
            tracing: false,
        })?;

        Ok(TestClient { client, vhost })
    }

    pub fn create_queue(&self, name: &str) -> Result<(), Box<dyn Error>> {
        self.client.declare_queue(
            &self.vhost,
            &QueueParams {
                name,
                queue_type: QueueType::Classic,
                durable: false,
                auto_delete: false,
                exclusive: false,
                arguments: None,
            },
        )?;
        Ok(())
    }

    pub fn list_queues(&self) -> Result<Vec<String>, Box<dyn Error>> {
        let queues = self.client.list_queues_in(&self.vhost)?;
        Ok(queues.into_iter().map(|x| x.name).collect())
    }
}

impl Drop for TestClient<'_> {
    fn drop(&mut self) {
        self.client.delete_vhost(&self.vhost, true).unwrap();
    }
}

pub fn create_args(client: &TestClient, pattern: &str, dry_run: bool) -> Args {
    Args {
        username: Some("guest".to_string()),
        password: Some("guest".to_string()),
        host: Some(API_HOST.to_string()),
        vhost: Some(client.vhost.clone()),
        pattern: Some(pattern.to_string()),
        dry_run: Some(dry_run),
        delete_via: Some(DeletionMethod::Http),
        ..Args::default()
    }
}
