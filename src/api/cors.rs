//! Cross-origin policy for the `/api` routes.

use anyhow::{Context, Result, bail};
use axum::http::{HeaderValue, Method, request::Parts};
use std::sync::Arc;
use tower_http::cors::{AllowHeaders, AllowOrigin, CorsLayer};
use tracing::warn;
use url::Url;

use crate::config::ServerConfig;
use crate::constants::cors::ALWAYS_ALLOWED_ORIGINS;

/// One allowed origin. Exact origins compare after normalization, so
/// `http://localhost:80` and `http://localhost` are the same origin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OriginPattern {
    Exact(String),
    /// `scheme://*.suffix[:port]`. The `*` stands for one or more labels.
    Subdomain {
        scheme: String,
        suffix: String,
        port: Option<u16>,
    },
}

impl OriginPattern {
    pub fn parse(raw: &str) -> Result<Self> {
        let raw = raw.trim().trim_end_matches('/');
        if raw.is_empty() {
            bail!("origin is empty");
        }

        if let Some((scheme, rest)) = raw.split_once("://*.") {
            if rest.trim_matches('.').is_empty() {
                bail!("wildcard origin {raw:?} has no domain after '*'");
            }
            let probe = Url::parse(&format!("{scheme}://wildcard.{rest}"))
                .with_context(|| format!("invalid wildcard origin {raw:?}"))?;
            if !matches!(probe.scheme(), "http" | "https") {
                bail!("origin {raw:?} must be an http(s) URL");
            }
            let suffix = probe
                .host_str()
                .and_then(|host| host.strip_prefix("wildcard"))
                .with_context(|| format!("wildcard origin {raw:?} has no host"))?;

            return Ok(Self::Subdomain {
                scheme: probe.scheme().to_string(),
                suffix: suffix.to_string(),
                port: probe.port_or_known_default(),
            });
        }

        Ok(Self::Exact(normalize(raw)?))
    }

    #[must_use]
    pub fn matches(&self, origin: &Url) -> bool {
        match self {
            Self::Exact(expected) => origin.origin().ascii_serialization() == *expected,
            Self::Subdomain {
                scheme,
                suffix,
                port,
            } => {
                let Some(host) = origin.host_str() else {
                    return false;
                };
                origin.scheme() == scheme
                    && host.len() > suffix.len()
                    && host.ends_with(suffix.as_str())
                    && origin.port_or_known_default() == *port
            }
        }
    }
}

fn normalize(raw: &str) -> Result<String> {
    let url = Url::parse(raw).with_context(|| format!("invalid origin {raw:?}"))?;
    if !matches!(url.scheme(), "http" | "https") || url.host_str().is_none() {
        bail!("origin {raw:?} must be an http(s) URL with a host");
    }
    Ok(url.origin().ascii_serialization())
}

/// The full set of origins the API answers cross-origin requests for.
#[derive(Debug, Clone, Default)]
pub struct AllowedOrigins {
    patterns: Vec<OriginPattern>,
}

impl AllowedOrigins {
    /// Configured frontend URL first, then the built-in list, then extras.
    /// Entries that fail to parse are skipped with a warning.
    #[must_use]
    pub fn from_config(server: &ServerConfig) -> Self {
        let raw = std::iter::once(server.frontend_url.as_str())
            .chain(ALWAYS_ALLOWED_ORIGINS.iter().copied())
            .chain(server.extra_allowed_origins.iter().map(String::as_str));

        let mut patterns: Vec<OriginPattern> = Vec::new();
        for origin in raw {
            match OriginPattern::parse(origin) {
                Ok(pattern) if !patterns.contains(&pattern) => patterns.push(pattern),
                Ok(_) => {}
                Err(e) => warn!("Ignoring allowed origin {:?}: {:#}", origin, e),
            }
        }

        Self { patterns }
    }

    #[must_use]
    pub fn is_allowed(&self, origin: &str) -> bool {
        Url::parse(origin).is_ok_and(|url| self.patterns.iter().any(|p| p.matches(&url)))
    }

    #[must_use]
    pub fn patterns(&self) -> &[OriginPattern] {
        &self.patterns
    }
}

/// GET/POST/PUT/DELETE/OPTIONS, any request header, credentials allowed.
#[must_use]
pub fn cors_layer(server: &ServerConfig) -> CorsLayer {
    let allowed = Arc::new(AllowedOrigins::from_config(server));

    CorsLayer::new()
        .allow_origin(AllowOrigin::predicate(
            move |origin: &HeaderValue, _parts: &Parts| {
                origin.to_str().is_ok_and(|o| allowed.is_allowed(o))
            },
        ))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        // A literal `*` is not allowed together with credentials.
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true)
}
