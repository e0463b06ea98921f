use tracing::warn;

/// Strategy for probing the query backend.
#[derive(Debug, Clone, Copy)]
pub struct HealthStrategy;

impl super::CommandStrategy for HealthStrategy {
    type Input = ();

    async fn execute(&self, _input: Self::Input) -> anyhow::Result<()> {
        let common = super::init_common_components()?;
        let url = common.client.base_url().to_string();

        match common.client.health().await {
            Ok(health) => {
                println!("Backend: {url}");
                println!("  Status: {}", health.status);
                if let Some(qdrant) = &health.qdrant {
                    println!("  Vector store: {qdrant}");
                }
                if let Some(openai) = &health.openai {
                    println!("  Model provider: {openai}");
                }
                for (key, value) in &health.extra {
                    println!("  {key}: {value}");
                }
                Ok(())
            }
            Err(e) => {
                warn!("Health check against {url} failed: {e}");
                anyhow::bail!("Backend at {url} is not reachable: {e}")
            }
        }
    }
}
