use reqwest::{Client, ClientBuilder, Response, header::HeaderMap};
use serde::de::DeserializeOwned;

use crate::{http_error::HttpError, ratelimit::RateLimiter};

pub struct RequestClient {
    client: Client,
    rate_limiter: RateLimiter,
}

impl RequestClient {
    pub fn new() -> anyhow::Result<Self> {
        let client = ClientBuilder::new().build()?;
        let rate_limiter = RateLimiter::new();
        Ok(Self {
            client,
            rate_limiter,
        })
    }

    pub async fn fetch_url_response(&self, url: &str, headers: HeaderMap) -> anyhow::Result<Response> {
        // Wait (non-blocking) until we're allowed to make a request according
        // to our self-imposed rate-limiting policy.
        self.rate_limiter.wait_until_ready().await;

        let response = self.client.get(url).headers(headers).send().await?;
        Ok(response)
    }

    /// GETs `url` and decodes the body as `T`. Non-success statuses become an
    /// [`HttpError`].
    pub async fn get_json<T: DeserializeOwned>(&self, url: &str, headers: HeaderMap) -> anyhow::Result<T> {
        let response = self.fetch_url_response(url, headers).await?;
        let status = response.status();
        if !status.is_success() {
            return Err(HttpError {
                status: status.as_u16(),
                url: url.to_string(),
            }
            .into());
        }
        let body = response.json::<T>().await?;
        Ok(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timetable_api::ScheduleResponse;
    use reqwest::header::HeaderValue;
    use tokio::{
        io::{AsyncReadExt, AsyncWriteExt},
        net::{TcpListener, TcpStream},
    };

    const SCHEDULE_BODY: &str = r#"{"ResultDataSchedule":[{"NgayHoc":"25/02/2026","TietHoc":"1-3"}]}"#;

    /// Answers `/missing` with 404, requests without an `apikey` header with
    /// 401, and everything else with a one-record schedule.
    async fn serve(listener: TcpListener) {
        while let Ok((socket, _)) = listener.accept().await {
            tokio::spawn(respond(socket));
        }
    }

    async fn respond(mut socket: TcpStream) {
        let mut buf = vec![0u8; 8192];
        let mut read = 0;
        while read < buf.len() {
            let n = socket.read(&mut buf[read..]).await.unwrap();
            read += n;
            if n == 0 || buf[..read].windows(4).any(|w| w == b"\r\n\r\n") {
                break;
            }
        }
        let request = String::from_utf8_lossy(&buf[..read]).to_lowercase();

        let (status, body) = if request.starts_with("get /missing") {
            ("404 Not Found", "{}")
        } else if !request.contains("\r\napikey: k\r\n") {
            ("401 Unauthorized", "{}")
        } else {
            ("200 OK", SCHEDULE_BODY)
        };
        let response = format!(
            "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );
        socket.write_all(response.as_bytes()).await.unwrap();
        let _ = socket.shutdown().await;
    }

    async fn local_server() -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(serve(listener));
        format!("http://{addr}")
    }

    fn local_client() -> RequestClient {
        RequestClient {
            client: ClientBuilder::new().no_proxy().build().unwrap(),
            rate_limiter: RateLimiter::new(),
        }
    }

    #[tokio::test]
    async fn failure_status_becomes_http_error() {
        let base = local_server().await;
        let client = local_client();

        let url = format!("{base}/missing");
        let err = client
            .get_json::<serde_json::Value>(&url, HeaderMap::new())
            .await
            .unwrap_err();
        let http_error = err.downcast_ref::<HttpError>().unwrap();
        assert_eq!(http_error.status, 404);
        assert_eq!(http_error.url, url);
    }

    #[tokio::test]
    async fn success_body_is_decoded_with_headers_sent() {
        let base = local_server().await;
        let client = local_client();
        let url = format!("{base}/DrawingSchedules?namhoc=2025&hocky=2&tuan=24");

        let err = client
            .get_json::<ScheduleResponse>(&url, HeaderMap::new())
            .await
            .unwrap_err();
        assert_eq!(err.downcast_ref::<HttpError>().unwrap().status, 401);

        let mut headers = HeaderMap::new();
        headers.insert("apikey", HeaderValue::from_static("k"));
        let records = client
            .get_json::<ScheduleResponse>(&url, headers)
            .await
            .unwrap()
            .into_records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].date, "25/02/2026");
        assert_eq!(records[0].periods, "1-3");
    }
}
