//! Client metadata extraction from HTTP request headers.

use axum::http::{HeaderMap, HeaderName, header};
use std::net::{IpAddr, SocketAddr};

use crate::domain::visit_event::ClientInfo;

static SEC_CH_UA_PLATFORM: HeaderName = HeaderName::from_static("sec-ch-ua-platform");
static X_FORWARDED_FOR: HeaderName = HeaderName::from_static("x-forwarded-for");
static X_REAL_IP: HeaderName = HeaderName::from_static("x-real-ip");

/// Builds [`ClientInfo`] from request headers and the peer address.
///
/// When `behind_proxy` is set, the client IP is taken from the first
/// `X-Forwarded-For` entry (or `X-Real-IP`) and falls back to the peer.
pub fn client_info_from_headers(
    headers: &HeaderMap,
    peer: SocketAddr,
    behind_proxy: bool,
) -> ClientInfo {
    let user_agent = header_str(headers, &header::USER_AGENT);

    ClientInfo {
        ip: Some(client_ip(headers, peer, behind_proxy).to_string()),
        platform: extract_platform(headers, user_agent.as_deref()),
        language: extract_language(headers),
        referer: header_str(headers, &header::REFERER),
        user_agent,
    }
}

fn header_str(headers: &HeaderMap, name: &HeaderName) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Resolves the client IP, honouring proxy headers only when trusted.
pub fn client_ip(headers: &HeaderMap, peer: SocketAddr, behind_proxy: bool) -> IpAddr {
    if behind_proxy {
        let forwarded = header_str(headers, &X_FORWARDED_FOR)
            .and_then(|v| v.split(',').next().and_then(|ip| ip.trim().parse::<IpAddr>().ok()));
        if let Some(ip) = forwarded {
            return ip;
        }
        if let Some(ip) = header_str(headers, &X_REAL_IP).and_then(|v| v.parse::<IpAddr>().ok()) {
            return ip;
        }
    }
    peer.ip()
}

/// Primary language tag from `Accept-Language`, e.g. `en-US` from
/// `en-US,en;q=0.9`.
pub fn extract_language(headers: &HeaderMap) -> Option<String> {
    let raw = header_str(headers, &header::ACCEPT_LANGUAGE)?;
    let first = raw.split(',').next()?.split(';').next()?.trim();

    if first.is_empty() || first == "*" {
        None
    } else {
        Some(first.to_string())
    }
}

/// Platform from the `Sec-CH-UA-Platform` client hint, or guessed from the
/// user agent.
pub fn extract_platform(headers: &HeaderMap, user_agent: Option<&str>) -> Option<String> {
    if let Some(hint) = header_str(headers, &SEC_CH_UA_PLATFORM) {
        let hint = hint.trim_matches('"');
        if !hint.is_empty() {
            return Some(hint.to_string());
        }
    }

    let ua = user_agent?;
    // Order matters: Android UAs contain "Linux", iOS UAs contain "Mac OS X".
    let platform = if ua.contains("Android") {
        "Android"
    } else if ua.contains("iPhone") || ua.contains("iPad") || ua.contains("iPod") {
        "iOS"
    } else if ua.contains("Windows") {
        "Windows"
    } else if ua.contains("Mac OS X") || ua.contains("Macintosh") {
        "macOS"
    } else if ua.contains("CrOS") {
        "Chrome OS"
    } else if ua.contains("Linux") {
        "Linux"
    } else {
        return None;
    };

    Some(platform.to_string())
}
