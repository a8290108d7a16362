// SPDX-FileCopyrightText: 2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

use std::sync::Arc;

use cookie::Cookie;
use log::debug;
use reqwest::{
    cookie::{CookieStore as _, Jar},
    header::HeaderValue,
    Method, RequestBuilder,
};
use url::Url;

use crate::{config::Config, error::Result, metadata};

pub(crate) const CSRF_COOKIE: &str = "csrf_token";
pub(crate) const CSRF_HEADER: &str = "X-CSRF-Token";

/// Whether requests with this method change server state and therefore need
/// the anti-forgery token.
pub(crate) fn is_mutating(method: &Method) -> bool {
    [Method::POST, Method::PUT, Method::PATCH, Method::DELETE].contains(method)
}

/// Finds the anti-forgery token in a `Cookie` header value.
pub(crate) fn csrf_token(cookies: &str) -> Option<String> {
    Cookie::split_parse(cookies)
        .filter_map(|cookie| cookie.ok())
        .find(|cookie| cookie.name() == CSRF_COOKIE)
        .map(|cookie| cookie.value().to_owned())
}

/// Every request to the backend goes through here, so the session cookies and
/// the anti-forgery header are handled in one place.
#[derive(Clone)]
pub(crate) struct Http {
    client: reqwest::Client,
    jar: Arc<Jar>,
    base_url: Url,
}

impl Http {
    pub(crate) fn new(config: &Config) -> Result<Self> {
        let jar = Arc::new(Jar::default());
        let client = reqwest::Client::builder()
            .cookie_provider(Arc::clone(&jar))
            .user_agent(metadata::USER_AGENT.as_str())
            .timeout(config.request_timeout())
            .build()?;

        Ok(Self {
            client,
            jar,
            base_url: config.base_url().clone(),
        })
    }

    pub(crate) fn url(&self, path: &str) -> Result<Url> {
        Ok(self.base_url.join(path)?)
    }

    fn stored_csrf_token(&self, url: &Url) -> Option<String> {
        self.jar
            .cookies(url)
            .as_ref()
            .and_then(|value: &HeaderValue| value.to_str().ok())
            .and_then(csrf_token)
    }

    pub(crate) fn request(&self, method: Method, path: &str) -> Result<RequestBuilder> {
        let url = self.url(path)?;
        let token = if is_mutating(&method) {
            let token = self.stored_csrf_token(&url);
            if token.is_none() {
                debug!("No {} cookie for {} {}", CSRF_COOKIE, method, url);
            }
            token
        } else {
            None
        };

        let builder = self.client.request(method, url);
        Ok(match token {
            Some(token) => builder.header(CSRF_HEADER, token),
            None => builder,
        })
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::{net::SocketAddr, time::Duration};

    use axum::{
        http::{header::SET_COOKIE, HeaderMap},
        routing::get,
        Router,
    };

    use crate::config::ConfigBuilder;

    use super::*;

    /// Replies with the anti-forgery header it received, or `-` when none was
    /// sent. `GET /api/me` hands out the cookie.
    async fn echo_server() -> SocketAddr {
        async fn issue() -> ([(axum::http::HeaderName, &'static str); 1], &'static str) {
            ([(SET_COOKIE, "csrf_token=tok123; Path=/")], "{}")
        }

        async fn echo(headers: HeaderMap) -> String {
            headers
                .get(CSRF_HEADER)
                .and_then(|value| value.to_str().ok())
                .unwrap_or("-")
                .to_owned()
        }

        let app = Router::new()
            .route("/api/me", get(issue))
            .route("/echo", get(echo).post(echo).put(echo).delete(echo).patch(echo));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let _handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        addr
    }

    pub(crate) fn http_for(addr: SocketAddr) -> Http {
        let config = ConfigBuilder::new(Url::parse(&format!("http://{addr}/")).unwrap())
            .with_request_timeout(Duration::from_secs(5))
            .into_config()
            .unwrap();
        Http::new(&config).unwrap()
    }

    async fn echoed(http: &Http, method: Method) -> String {
        http.request(method, "/echo")
            .unwrap()
            .send()
            .await
            .unwrap()
            .text()
            .await
            .unwrap()
    }

    #[test]
    fn finds_token_among_other_cookies() {
        assert_eq!(
            csrf_token("session=abc; csrf_token=xyz; theme=dark").as_deref(),
            Some("xyz")
        );
        assert_eq!(csrf_token("session=abc"), None);
        assert_eq!(csrf_token(""), None);
    }

    #[test]
    fn only_state_changing_methods_mutate() {
        assert!(is_mutating(&Method::POST));
        assert!(is_mutating(&Method::PUT));
        assert!(is_mutating(&Method::PATCH));
        assert!(is_mutating(&Method::DELETE));
        assert!(!is_mutating(&Method::GET));
        assert!(!is_mutating(&Method::HEAD));
        assert!(!is_mutating(&Method::OPTIONS));
    }

    #[tokio::test]
    async fn mutating_request_without_cookie_has_no_header() {
        let http = http_for(echo_server().await);

        assert_eq!(echoed(&http, Method::POST).await, "-");
    }

    #[tokio::test]
    async fn attaches_token_to_mutating_requests_only() {
        let http = http_for(echo_server().await);
        let _ = http
            .request(Method::GET, "/api/me")
            .unwrap()
            .send()
            .await
            .unwrap();

        for method in [Method::POST, Method::PUT, Method::PATCH, Method::DELETE] {
            assert_eq!(echoed(&http, method).await, "tok123");
        }
        assert_eq!(echoed(&http, Method::GET).await, "-");
    }
}
