//! User agent sniffing.
//!
//! Views with `sys.auto_switch_tpl` enabled serve the `spider` template
//! directory to crawlers and the `mobile` directory to handheld browsers.

use http::header::{HeaderName, ACCEPT, USER_AGENT, VIA};
use http::HeaderMap;
use once_cell::sync::Lazy;
use regex::Regex;

/// Substrings identifying known crawlers, matched case-insensitively.
pub const ROBOTS: &[&str] = &[
    "TencentTraveler",
    "Baiduspider+",
    "BaiduGame",
    "Googlebot",
    "msnbot",
    "Sosospider+",
    "Sogou web spider",
    "ia_archiver",
    "Yahoo! Slurp",
    "YoudaoBot",
    "Yahoo Slurp",
    "MSNBot",
    "Java (Often spam bot)",
    "BaiDuSpider",
    "Voila",
    "Yandex bot",
    "BSpider",
    "twiceler",
    "Sogou Spider",
    "Speedy Spider",
    "Google AdSense",
    "Heritrix",
    "Python-urllib",
    "Alexa (IA Archiver)",
    "Ask",
    "Exabot",
    "Custo",
    "OutfoxBot/YodaoBot",
    "yacy",
    "SurveyBot",
    "legs",
    "lwp-trivial",
    "Nutch",
    "StackRambler",
    "The web archive (IA Archiver)",
    "Perl tool",
    "MJ12bot",
    "Netcraft",
    "MSIECrawler",
    "WGet tools",
    "larbin",
    "Fish search",
];

static MOBILE_AGENT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"(?i)(android|bb\d+|meego).+mobile|avantgo|bada/|blackberry|blazer|compal|",
        r"elaine|fennec|hiptop|iemobile|ip(hone|od)|iris|kindle|lge |maemo|midp|mmp|",
        r"mobile.+firefox|netfront|opera m(ob|in)i|palm( os)?|phone|p(ixi|re)/|plucker|",
        r"pocket|psp|series(4|6)0|symbian|treo|up\.(browser|link)|vodafone|wap|",
        r"windows (ce|phone)|xda|xiino",
    ))
    .expect("mobile user agent pattern is valid")
});

/// Returns the crawler entry matching `user_agent`, if any.
///
/// # Examples
///
/// ```
/// use cross_rs_views::agent::is_robot;
///
/// assert_eq!(
///     is_robot("Mozilla/5.0 (compatible; Googlebot/2.1)"),
///     Some("Googlebot")
/// );
/// assert_eq!(is_robot("Mozilla/5.0 (X11; Linux x86_64)"), None);
/// ```
pub fn is_robot(user_agent: &str) -> Option<&'static str> {
    if user_agent.is_empty() {
        return None;
    }

    let agent = user_agent.to_lowercase();
    ROBOTS
        .iter()
        .copied()
        .find(|robot| agent.contains(&robot.to_lowercase()))
}

/// Returns `true` if the request comes from a mobile device.
///
/// A WAP profile header, a `Via` header mentioning WAP, an `Accept` header
/// offering WML, or a user agent matching the known handheld browsers all
/// count.
pub fn is_mobile(user_agent: &str, headers: &HeaderMap) -> bool {
    if headers.contains_key("x-wap-profile") {
        return true;
    }

    let header = |name: HeaderName| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
    };

    header(VIA).to_ascii_lowercase().contains("wap")
        || header(ACCEPT).to_ascii_uppercase().contains("VND.WAP.WML")
        || MOBILE_AGENT.is_match(user_agent)
}

/// Returns the `User-Agent` header, or an empty string.
pub fn user_agent(headers: &HeaderMap) -> &str {
    headers
        .get(USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use http::HeaderValue;

    use super::*;

    const IPHONE: &str = "Mozilla/5.0 (iPhone; CPU iPhone OS 17_0 like Mac OS X) AppleWebKit/605.1.15";
    const DESKTOP: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 Chrome/120.0";

    #[test]
    fn test_robot_detection_is_case_insensitive() {
        assert_eq!(is_robot("mozilla/5.0 (compatible; baiduspider/2.0)"), Some("BaiDuSpider"));
        assert_eq!(is_robot("Mozilla/5.0 (compatible; Baiduspider+(+http://x))"), Some("Baiduspider+"));
        assert_eq!(is_robot("msnbot/2.0b"), Some("msnbot"));
        assert_eq!(is_robot("MJ12BOT/v1.4"), Some("MJ12bot"));
    }

    #[test]
    fn test_robot_returns_first_listed_match() {
        // "Sogou web spider" appears before "Sogou Spider" in the list.
        assert_eq!(is_robot("Sogou web spider/4.0"), Some("Sogou web spider"));
    }

    #[test]
    fn test_not_a_robot() {
        assert_eq!(is_robot(""), None);
        assert_eq!(is_robot("curl/8.0"), None);
    }

    #[test]
    fn test_mobile_by_user_agent() {
        let headers = HeaderMap::new();
        assert!(is_mobile(IPHONE, &headers));
        assert!(is_mobile("Mozilla/5.0 (Linux; Android 14) Mobile Safari", &headers));
        assert!(!is_mobile(DESKTOP, &headers));
    }

    #[test]
    fn test_mobile_by_headers() {
        let mut headers = HeaderMap::new();
        headers.insert("x-wap-profile", HeaderValue::from_static("http://wap.example.com/uaprof.xml"));
        assert!(is_mobile(DESKTOP, &headers));

        let mut headers = HeaderMap::new();
        headers.insert(VIA, HeaderValue::from_static("1.1 WAP-gateway"));
        assert!(is_mobile(DESKTOP, &headers));

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("text/html, text/vnd.wap.wml"));
        assert!(is_mobile(DESKTOP, &headers));
    }

    #[test]
    fn test_user_agent_header() {
        let mut headers = HeaderMap::new();
        assert_eq!(user_agent(&headers), "");
        headers.insert(USER_AGENT, HeaderValue::from_static(DESKTOP));
        assert_eq!(user_agent(&headers), DESKTOP);
    }
}
