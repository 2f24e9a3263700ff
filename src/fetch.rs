use crate::imports::*;
use crate::types::*;

use ::futures::future::join_all;
use ::reqwest::header::{CONTENT_TYPE, LOCATION};
use ::reqwest::redirect;
use ::std::time::Duration;

const MAX_REDIRECTS: usize = 5;

#[derive(Debug)]
pub struct Fetcher {
    client: reqwest::Client,
}

impl Fetcher {
    pub fn new(timeout: Duration) -> Result<Fetcher> {
        let client = reqwest::Client::builder()
            .user_agent(concatcp!(
                env!("CARGO_PKG_NAME"),
                "/",
                env!("CARGO_PKG_VERSION")
            ))
            .redirect(redirect::Policy::none())
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Fetcher { client })
    }

    pub fn client(&self) -> &reqwest::Client {
        &self.client
    }

    /// Fetches every resource concurrently, returning bodies in input order.
    /// A failed fetch becomes None after logging the error.
    pub async fn fetch_all(&self, resources: &[Resource]) -> Vec<Option<String>> {
        join_all(resources.iter().map(|resource| self.fetch_one(resource))).await
    }

    pub async fn fetch_resources(&self, resources: &[Resource]) -> ResourceMap {
        let bodies = self.fetch_all(resources).await;
        resources.iter().cloned().zip(bodies).collect()
    }

    async fn fetch_one(&self, resource: &Resource) -> Option<String> {
        let inner = async {
            let mut url = resource.url().to_string();
            for _ in 0..=MAX_REDIRECTS {
                info!("Fetching: {:?}", url);
                let request = match resource {
                    Resource::Get(_) => self.client.get(&url),
                    Resource::Post { body, .. } => self
                        .client
                        .post(&url)
                        .header(CONTENT_TYPE, "application/json")
                        .body(body.clone()),
                };
                let response = request.send().await?;
                let status = response.status();
                if status.is_redirection() {
                    let target = response
                        .headers()
                        .get(LOCATION)
                        .and_then(|value| value.to_str().ok())
                        .ok_or_else(|| anyhow!("Redirect without Location header"))?;
                    url = resolve_redirect(&url, target)?;
                    debug!("Redirected to: {:?}", url);
                    continue;
                }
                ensure!(status.is_success(), "Unexpected response status: {}", status);
                return Ok(sanitize_body(&response.text().await?));
            }
            bail!("Stopped after {} redirects", MAX_REDIRECTS);
        };
        match inner
            .await
            .with_context(|| format!("Failed to fetch: {:?}", resource.url()))
        {
            Ok(body) => Some(body),
            Err(error) => {
                error!("{:?}", error);
                None
            }
        }
    }
}

fn resolve_redirect(base: &str, location: &str) -> Result<String> {
    let base_url = reqwest::Url::parse(base)?;
    Ok(base_url.join(location)?.to_string())
}

/// Undoes known escaping artifacts in fetched markup before any parsing.
pub fn sanitize_body(body: &str) -> String {
    body.replace("&amp;", "&").replace('\\', "")
}
