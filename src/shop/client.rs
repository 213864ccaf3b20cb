// src/shop/client.rs
use crate::extractors::product::ProductDetailExtractor;
use crate::shop::models::ProductDetails;
use crate::utils::error::FetchError;
use reqwest::header;
use std::time::Duration;

// Storefronts serve a stripped page (or a bot wall) to unknown agents.
const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/58.0.3029.110 Safari/537.3";

pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Creates a reqwest client configured for product page requests.
pub fn build_client(timeout: Duration) -> Result<reqwest::Client, reqwest::Error> {
    reqwest::Client::builder()
        .user_agent(BROWSER_USER_AGENT)
        .timeout(timeout)
        .build()
}

/// Downloads a product page. The URL is passed through unchanged.
pub async fn fetch_product_page(client: &reqwest::Client, url: &str) -> Result<String, FetchError> {
    tracing::info!("Downloading product page from: {}", url);

    let response = client.get(url)
        .header(header::ACCEPT, "text/html,application/xhtml+xml,*/*")
        .send()
        .await?; // Propagates reqwest::Error as FetchError::Network

    let status = response.status();
    if !status.is_success() {
        tracing::error!("HTTP error status: {} for URL: {}", status, url);
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(FetchError::NotFound(url.to_string()));
        }
        return Err(FetchError::Http(status));
    }

    let body = response.text().await?;
    tracing::debug!("Successfully downloaded {} bytes from {}", body.len(), url);

    Ok(body)
}

/// Fetches and extracts, handing back the raw page alongside the details.
pub async fn try_scrape_product_details(
    client: &reqwest::Client,
    url: &str,
    extractor: &ProductDetailExtractor,
) -> Result<(String, ProductDetails), FetchError> {
    let html = fetch_product_page(client, url).await?;
    let details = extractor.extract_from_html(&html);
    Ok((html, details))
}

/// Fetch + extract pipeline. A transport failure is logged and yields an empty record.
pub async fn scrape_product_details(
    client: &reqwest::Client,
    url: &str,
    extractor: &ProductDetailExtractor,
) -> ProductDetails {
    match try_scrape_product_details(client, url, extractor).await {
        Ok((_, details)) => details,
        Err(e) => {
            tracing::error!("Error making request: {}", e);
            ProductDetails::empty()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Port 1 on loopback is never listening; the connect fails immediately.
    const UNREACHABLE_URL: &str = "http://127.0.0.1:1/products/master-shirt";

    fn test_client() -> reqwest::Client {
        build_client(Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn test_connection_error_yields_empty_record() {
        let client = test_client();
        let extractor = ProductDetailExtractor::default();

        let details = scrape_product_details(&client, UNREACHABLE_URL, &extractor).await;

        assert_eq!(details, ProductDetails::empty());
        assert_eq!(details.into_tuple(), (None, None, vec![], vec![], None));
    }

    #[tokio::test]
    async fn test_connection_error_is_network_error() {
        let client = test_client();
        let result = fetch_product_page(&client, UNREACHABLE_URL).await;
        assert!(matches!(result, Err(FetchError::Network(_))));
    }

    /// Serves one canned response on a loopback port and returns the page URL.
    async fn serve_once(status_line: &'static str) -> String {
        use tokio::io::{AsyncReadExt, AsyncWriteExt};

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                match socket.read(&mut buf).await {
                    Ok(0) | Err(_) => break,
                    Ok(n) => request.extend_from_slice(&buf[..n]),
                }
            }
            let response = format!(
                "{}\r\nContent-Type: text/html\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
                status_line
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.ok();
        });
        format!("http://{}/products/master-shirt", addr)
    }

    #[tokio::test]
    async fn test_not_found_status_is_not_found_error() {
        let url = serve_once("HTTP/1.1 404 Not Found").await;
        let result = fetch_product_page(&test_client(), &url).await;
        match result {
            Err(FetchError::NotFound(missing)) => assert_eq!(missing, url),
            other => panic!("expected NotFound, got {:?}", other.map(|body| body.len())),
        }
    }

    #[tokio::test]
    async fn test_server_error_status_is_http_error() {
        let url = serve_once("HTTP/1.1 500 Internal Server Error").await;
        let result = fetch_product_page(&test_client(), &url).await;
        assert!(matches!(
            result,
            Err(FetchError::Http(status)) if status == reqwest::StatusCode::INTERNAL_SERVER_ERROR
        ));
    }

    #[tokio::test]
    async fn test_error_status_yields_empty_record() {
        let extractor = ProductDetailExtractor::default();
        for status_line in ["HTTP/1.1 404 Not Found", "HTTP/1.1 500 Internal Server Error"] {
            let url = serve_once(status_line).await;
            let details = scrape_product_details(&test_client(), &url, &extractor).await;
            assert_eq!(details, ProductDetails::empty(), "status line: {}", status_line);
        }
    }

    #[test]
    fn test_invalid_url_yields_empty_record() {
        let client = test_client();
        let extractor = ProductDetailExtractor::default();
        let details = tokio_test::block_on(scrape_product_details(&client, "not a url", &extractor));
        assert!(!details.has_listing());
        assert_eq!(details, ProductDetails::empty());
    }
}
