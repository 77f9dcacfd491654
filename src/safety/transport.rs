use reqwest::{RequestBuilder, Response};
use tracing::debug;

use crate::config::RetryConfig;

/// Send `request`, retrying transport errors and 5xx responses.
///
/// After `max_retries` extra attempts the last response or error is returned
/// as-is. Requests whose body cannot be cloned are sent once.
pub async fn send_with_retry(
    request: RequestBuilder,
    retry: &RetryConfig,
) -> Result<Response, reqwest::Error> {
    let mut attempt: u32 = 0;
    loop {
        let Some(this_try) = request.try_clone() else {
            return request.send().await;
        };

        match this_try.send().await {
            Ok(response)
                if response.status().is_server_error() && attempt < retry.max_retries =>
            {
                debug!(
                    status = %response.status(),
                    attempt = attempt + 1,
                    "Server error, retrying"
                );
            }
            Ok(response) => return Ok(response),
            Err(err) if !err.is_builder() && attempt < retry.max_retries => {
                debug!(error = %err, attempt = attempt + 1, "Request failed, retrying");
            }
            Err(err) => return Err(err),
        }

        attempt += 1;
        tokio::time::sleep(retry.delay()).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn fast_retry(max_retries: u32) -> RetryConfig {
        RetryConfig {
            max_retries,
            delay_ms: 0,
        }
    }

    #[tokio::test]
    async fn test_retries_server_errors() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search"))
            .respond_with(ResponseTemplate::new(503))
            .up_to_n_times(2)
            .expect(2)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/search"))
            .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
            .expect(1)
            .mount(&server)
            .await;

        let client = reqwest::Client::new();
        let request = client.get(format!("{}/search", server.uri()));
        let response = send_with_retry(request, &fast_retry(2)).await.unwrap();
        assert!(response.status().is_success());

        server.verify().await;
    }

    #[tokio::test]
    async fn test_gives_up_after_max_retries() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .expect(2)
            .mount(&server)
            .await;

        let client = reqwest::Client::new();
        let response = send_with_retry(client.get(server.uri()), &fast_retry(1))
            .await
            .unwrap();
        assert_eq!(response.status().as_u16(), 500);

        server.verify().await;
    }

    #[tokio::test]
    async fn test_client_errors_are_not_retried() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .expect(1)
            .mount(&server)
            .await;

        let client = reqwest::Client::new();
        let response = send_with_retry(client.get(server.uri()), &fast_retry(3))
            .await
            .unwrap();
        assert_eq!(response.status().as_u16(), 404);

        server.verify().await;
    }
}
