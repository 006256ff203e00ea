use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::config::ProviderConfig;
use crate::data_source::{DailyRowsRequest, DataSource, RowBatch, SourceError};
use crate::http_client::{HttpClient, HttpRequest, HttpResponse, ReqwestHttpClient};
use crate::retry::RetryConfig;
use crate::ROW_COLUMNS;

/// Quandl datatable adapter returning CSV rows.
#[derive(Clone)]
pub struct QuandlSource {
    http_client: Arc<dyn HttpClient>,
    provider: ProviderConfig,
    retry: RetryConfig,
}

impl QuandlSource {
    pub fn new(
        http_client: Arc<dyn HttpClient>,
        provider: ProviderConfig,
        retry: RetryConfig,
    ) -> Self {
        Self {
            http_client,
            provider,
            retry,
        }
    }

    /// Adapter backed by a real reqwest client.
    pub fn with_reqwest(provider: ProviderConfig, retry: RetryConfig) -> Self {
        Self::new(Arc::new(ReqwestHttpClient::new()), provider, retry)
    }

    /// Query URL without the api key, safe to log.
    fn public_url(&self, req: &DailyRowsRequest) -> String {
        format!(
            "{}?date.gte={}&date.lte={}&ticker={}&qopts.columns={}",
            self.provider.endpoint,
            req.range.start().compact(),
            req.range.end().compact(),
            urlencoding::encode(req.ticker.as_str()),
            urlencoding::encode(ROW_COLUMNS),
        )
    }

    fn request_url(&self, req: &DailyRowsRequest) -> String {
        let mut url = self.public_url(req);
        if let Some(api_key) = &self.provider.api_key {
            url.push_str("&api_key=");
            url.push_str(&urlencoding::encode(api_key));
        }
        url
    }

    async fn fetch_rows(&self, req: DailyRowsRequest) -> Result<RowBatch, SourceError> {
        let url = self.request_url(&req);
        debug!(source = self.id(), url = %self.public_url(&req), "requesting daily rows");

        let attempts = self.retry.attempts();
        let mut attempt = 0;
        loop {
            let request = HttpRequest::get(url.as_str())
                .with_header("accept", "text/csv")
                .with_timeout_ms(self.provider.timeout_ms);
            let has_next = attempt + 1 < attempts;

            match self.http_client.execute(request).await {
                Ok(response) if response.is_success() => {
                    return Ok(match &response.interrupted {
                        None => RowBatch::from_csv_body(&response.body),
                        Some(error) => {
                            warn!(ticker = %req.ticker, error = %error, "quandl body interrupted");
                            RowBatch::from_partial_csv_body(
                                &response.body,
                                SourceError::unavailable(format!(
                                    "quandl body interrupted: {}",
                                    error.message()
                                )),
                            )
                        }
                    });
                }
                Ok(response) if has_next && self.retry.should_retry_status(response.status) => {
                    warn!(
                        ticker = %req.ticker,
                        status = response.status,
                        attempt = attempt + 1,
                        "quandl returned retryable status"
                    );
                }
                Ok(response) => return Err(status_error(&response)),
                Err(error) if has_next && self.retry.should_retry_error(&error) => {
                    warn!(
                        ticker = %req.ticker,
                        error = %error,
                        attempt = attempt + 1,
                        "quandl transport error, retrying"
                    );
                }
                Err(error) => {
                    return Err(SourceError::unavailable(format!(
                        "quandl transport error: {}",
                        error.message()
                    )));
                }
            }

            tokio::time::sleep(self.retry.delay_for_attempt(attempt)).await;
            attempt += 1;
        }
    }
}

fn status_error(response: &HttpResponse) -> SourceError {
    let message = format!("quandl returned status {}", response.status);
    match response.status {
        429 => SourceError::rate_limited(message),
        408 | 500..=599 => SourceError::unavailable(message),
        _ => SourceError::invalid_request(message),
    }
}

impl DataSource for QuandlSource {
    fn id(&self) -> &'static str {
        "quandl"
    }

    fn daily_rows<'a>(
        &'a self,
        req: DailyRowsRequest,
    ) -> Pin<Box<dyn Future<Output = Result<RowBatch, SourceError>> + Send + 'a>> {
        Box::pin(self.fetch_rows(req))
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::data_source::SourceErrorKind;
    use crate::http_client::{HttpError, StaticHttpClient};
    use crate::{DateRange, Ticker, TradeDate};

    fn request(ticker: &str) -> DailyRowsRequest {
        let range = DateRange::new(
            TradeDate::parse("2017-01-01").expect("valid"),
            TradeDate::parse("2017-06-30").expect("valid"),
        )
        .expect("valid range");
        DailyRowsRequest::new(Ticker::parse(ticker).expect("valid"), range)
    }

    fn provider(api_key: Option<&str>) -> ProviderConfig {
        ProviderConfig {
            api_key: api_key.map(str::to_owned),
            ..ProviderConfig::default()
        }
    }

    fn fast_retry() -> RetryConfig {
        RetryConfig::fixed(Duration::from_millis(1), 2)
    }

    #[test]
    fn builds_quandl_query_string() {
        let source = QuandlSource::new(
            Arc::new(StaticHttpClient::new()),
            provider(Some("secret")),
            RetryConfig::no_retry(),
        );
        let url = source.request_url(&request("cof"));
        assert!(url.starts_with("https://www.quandl.com/api/v3/datatables/WIKI/PRICES.csv?"));
        assert!(url.contains("date.gte=20170101&date.lte=20170630&ticker=COF"));
        assert!(url.contains("qopts.columns=ticker%2Cdate%2Copen%2Chigh%2Clow%2Cclose%2Cvolume"));
        assert!(url.ends_with("&api_key=secret"));
        assert!(!source.public_url(&request("cof")).contains("secret"));
    }

    #[test]
    fn omits_api_key_when_unset() {
        let source = QuandlSource::new(
            Arc::new(StaticHttpClient::new()),
            provider(None),
            RetryConfig::no_retry(),
        );
        assert!(!source.request_url(&request("MSFT")).contains("api_key"));
    }

    #[tokio::test]
    async fn returns_rows_without_header() {
        let client = StaticHttpClient::new().with_response(
            "ticker=MSFT",
            HttpResponse::ok("ticker,date,open,high,low,close,volume\nMSFT,2017-01-03,62.79,62.84,62.125,62.58,20694101.0\n"),
        );
        let source = QuandlSource::new(Arc::new(client), provider(None), fast_retry());

        let batch = source.daily_rows(request("MSFT")).await.expect("fetch ok");
        assert_eq!(batch.rows, vec!["MSFT,2017-01-03,62.79,62.84,62.125,62.58,20694101.0"]);
    }

    #[tokio::test]
    async fn interrupted_body_returns_rows_read_so_far() {
        let body = "ticker,date,open,high,low,close,volume\n\
COF,2017-01-03,88.55,89.6,87.79,88.87,3441067.0\n\
COF,2017-01-04,89.13,90.77,89.13,90.3,2630905.0\n\
COF,2017-01-05,90.0,90";
        let client = Arc::new(StaticHttpClient::new().with_response(
            "ticker=COF",
            HttpResponse::ok(body).with_interruption(HttpError::new("connection reset")),
        ));
        let source = QuandlSource::new(client.clone(), provider(None), fast_retry());

        let batch = source.daily_rows(request("COF")).await.expect("partial rows");
        assert_eq!(batch.len(), 2);
        let error = batch.interrupted.expect("interruption reported");
        assert_eq!(error.kind(), SourceErrorKind::Unavailable);
        assert_eq!(client.requested_urls().len(), 1);
    }

    #[tokio::test]
    async fn retries_transport_errors_until_exhausted() {
        let client = Arc::new(StaticHttpClient::new().with_error("ticker=COF", HttpError::connect("refused")));
        let source = QuandlSource::new(client.clone(), provider(None), fast_retry());

        let err = source.daily_rows(request("COF")).await.expect_err("must fail");
        assert_eq!(err.kind(), SourceErrorKind::Unavailable);
        assert_eq!(client.requested_urls().len(), 3);
    }

    #[tokio::test]
    async fn client_errors_are_not_retried() {
        let client = Arc::new(
            StaticHttpClient::new()
                .with_response("ticker=COF", HttpResponse::with_status(400, "{\"quandl_error\":{}}")),
        );
        let source = QuandlSource::new(client.clone(), provider(None), fast_retry());

        let err = source.daily_rows(request("COF")).await.expect_err("must fail");
        assert_eq!(err.kind(), SourceErrorKind::InvalidRequest);
        assert_eq!(client.requested_urls().len(), 1);
    }

    #[tokio::test]
    async fn rate_limit_surfaces_after_retries() {
        let client = Arc::new(
            StaticHttpClient::new().with_response("ticker=COF", HttpResponse::with_status(429, "")),
        );
        let source = QuandlSource::new(client.clone(), provider(None), fast_retry());

        let err = source.daily_rows(request("COF")).await.expect_err("must fail");
        assert_eq!(err.kind(), SourceErrorKind::RateLimited);
        assert_eq!(client.requested_urls().len(), 3);
    }
}
