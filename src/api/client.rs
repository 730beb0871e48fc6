//! Site HTTP client.

use reqwest::{header, Client, Response};
use url::Url;

use crate::error::{Error, Result};

/// Default site origin.
pub const SITE_BASE: &str = "https://www.webtoons.com";

/// Browser user agent sent with every request unless configured otherwise.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/130.0.0.0 Safari/537.36";

/// A fetched HTML document together with the URL it was finally served from.
#[derive(Debug, Clone)]
pub struct Document {
    pub final_url: Url,
    pub body: String,
}

/// HTTP client for the comic site.
///
/// Cheap to clone; clones share the connection pool and cookie store.
#[derive(Debug, Clone)]
pub struct WebtoonClient {
    client: Client,
    site: Url,
}

impl WebtoonClient {
    /// Create a client for the given site origin.
    pub fn new(site: Url, user_agent: &str) -> Result<Self> {
        let client = Client::builder()
            .user_agent(user_agent)
            .cookie_store(true)
            .build()
            .map_err(|e| Error::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client, site })
    }

    /// Site origin used for lookup URLs and the image `Referer`.
    pub fn site(&self) -> &Url {
        &self.site
    }

    /// GET a page, following redirects, and return its body and final URL.
    pub async fn get_document(&self, url: &Url) -> Result<Document> {
        tracing::debug!("GET {}", url);

        let response = self.client.get(url.clone()).send().await?;
        let response = check_status(url, response)?;
        let final_url = response.url().clone();
        if &final_url != url {
            tracing::debug!("Redirected to {}", final_url);
        }

        let body = response.text().await?;
        Ok(Document { final_url, body })
    }

    /// GET an image with the site set as `Referer`; the body is left unread
    /// so the caller can stream it.
    pub async fn get_image(&self, url: &Url) -> Result<Response> {
        tracing::debug!("GET image {}", url);

        let response = self
            .client
            .get(url.clone())
            .header(header::REFERER, self.referer())
            .send()
            .await?;

        check_status(url, response)
    }

    fn referer(&self) -> String {
        self.site.origin().ascii_serialization()
    }
}

fn check_status(url: &Url, response: Response) -> Result<Response> {
    let status = response.status();
    tracing::debug!("Response status: {}", status);

    if !status.is_success() {
        return Err(Error::Fetch {
            url: url.to_string(),
            status,
        });
    }

    Ok(response)
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header as header_eq, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn client_for(server: &MockServer) -> WebtoonClient {
        WebtoonClient::new(Url::parse(&server.uri()).unwrap(), DEFAULT_USER_AGENT).unwrap()
    }

    #[tokio::test]
    async fn test_get_document_follows_redirect() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/lookup"))
            .respond_with(
                ResponseTemplate::new(301)
                    .insert_header("Location", format!("{}/canonical/page", server.uri())),
            )
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/canonical/page"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>ok</html>"))
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let url = Url::parse(&format!("{}/lookup", server.uri())).unwrap();
        let doc = client.get_document(&url).await.unwrap();

        assert_eq!(doc.final_url.path(), "/canonical/page");
        assert_eq!(doc.body, "<html>ok</html>");
    }

    #[tokio::test]
    async fn test_get_document_non_success_is_fetch_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let url = Url::parse(&format!("{}/missing", server.uri())).unwrap();
        let err = client.get_document(&url).await.unwrap_err();

        match err {
            Error::Fetch { status, .. } => assert_eq!(status, reqwest::StatusCode::NOT_FOUND),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_get_image_sends_referer() {
        let server = MockServer::start().await;
        let site = Url::parse(&server.uri()).unwrap();
        Mock::given(method("GET"))
            .and(path("/img.jpg"))
            .and(header_eq("referer", site.origin().ascii_serialization().as_str()))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![1u8, 2, 3]))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let url = site.join("/img.jpg").unwrap();
        let response = client.get_image(&url).await.unwrap();

        assert_eq!(response.bytes().await.unwrap().as_ref(), &[1, 2, 3]);
    }
}
