//! Link generation.
//!
//! [`LinkBuilder`] turns a controller reference and optional parameters into
//! a URL in one of four styles selected by `url.type`:
//!
//! | Type | Variant | Controller segment | Parameters |
//! |---|---|---|---|
//! | 1 | [`UrlType::QueryValues`] | `/?/controller<dot>action` | values joined by `dot` |
//! | 2 | [`UrlType::PathQuery`] | `/<index>/controller<dot>action` | `?` + form-encoded query |
//! | 3 | [`UrlType::QueryPairs`] | `/?/controller<dot>action` | `key<dot>value` pairs |
//! | 4 | [`UrlType::PathPairs`] | `/<index>/controller<dot>action` | `key<dot>value` pairs |
//!
//! With `url.rewrite` enabled the entry script is omitted and the controller
//! segment is `/controller<dot>action` for every type.
//!
//! # Examples
//!
//! ```
//! use std::sync::Arc;
//!
//! use cross_rs_core::settings::UrlSettings;
//! use cross_rs_http::urls::alias::AliasResolver;
//! use cross_rs_http::urls::link::{LinkBuilder, LinkParams};
//!
//! let url = UrlSettings { url_type: 1, dot: "-".into(), ..UrlSettings::default() };
//! let builder = LinkBuilder::new(url, "", Arc::new(AliasResolver::empty()));
//!
//! let params = LinkParams::from([("id", "5")]);
//! assert_eq!(builder.link(Some("news:show"), Some(&params)).unwrap(), "/?/news-show-5");
//! ```

use std::fmt;
use std::sync::Arc;

use cross_rs_core::settings::{Settings, UrlSettings};
use cross_rs_core::signing::{ParamEncryptor, SignedParamEncryptor};
use cross_rs_core::{CrossError, CrossResult};

use super::alias::{AliasResolver, ControllerRef};
use crate::querydict::{form_encode, QueryDict};

/// The entry script that may be dropped from query-style links.
const DEFAULT_INDEX: &str = "index.php";

/// The link formatting style selected by `url.type`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UrlType {
    /// `1`: query-routed, parameter values joined by `dot`.
    QueryValues,
    /// `2`: path-routed, parameters as a standard query string.
    PathQuery,
    /// `3`: query-routed, `key<dot>value` parameter pairs.
    QueryPairs,
    /// `4`: path-routed, `key<dot>value` parameter pairs.
    PathPairs,
}

impl UrlType {
    /// Returns the configuration value of this style.
    pub const fn code(self) -> i64 {
        match self {
            Self::QueryValues => 1,
            Self::PathQuery => 2,
            Self::QueryPairs => 3,
            Self::PathPairs => 4,
        }
    }
}

impl TryFrom<i64> for UrlType {
    type Error = CrossError;

    fn try_from(code: i64) -> Result<Self, Self::Error> {
        match code {
            1 => Ok(Self::QueryValues),
            2 => Ok(Self::PathQuery),
            3 => Ok(Self::QueryPairs),
            4 => Ok(Self::PathPairs),
            other => Err(CrossError::UnsupportedUrlType(other)),
        }
    }
}

/// Parameters attached to a link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkParams {
    /// A raw query string such as `"a=1&b=2"`.
    Query(String),
    /// Ordered key/value pairs.
    Pairs(Vec<(String, String)>),
}

impl LinkParams {
    /// Builds ordered pairs from any iterator of displayable keys and values.
    pub fn pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: fmt::Display,
        V: fmt::Display,
    {
        Self::Pairs(
            pairs
                .into_iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )
    }

    /// Returns `true` if there is nothing to encode.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Query(query) => query.is_empty(),
            Self::Pairs(pairs) => pairs.is_empty(),
        }
    }

    /// Returns the parameters as ordered pairs, parsing a query string first.
    ///
    /// A key repeated in a query string keeps its first position and its last value.
    fn to_pairs(&self) -> Vec<(String, String)> {
        match self {
            Self::Query(query) => QueryDict::parse(query)
                .pairs()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            Self::Pairs(pairs) => pairs.clone(),
        }
    }

    /// Returns the parameter values in order.
    fn to_values(&self) -> Vec<String> {
        match self {
            Self::Query(query) => QueryDict::parse(query).values().map(str::to_string).collect(),
            Self::Pairs(pairs) => pairs.iter().map(|(_, v)| v.clone()).collect(),
        }
    }
}

impl From<&str> for LinkParams {
    fn from(query: &str) -> Self {
        Self::Query(query.to_string())
    }
}

impl From<String> for LinkParams {
    fn from(query: String) -> Self {
        Self::Query(query)
    }
}

impl<K: fmt::Display, V: fmt::Display> From<Vec<(K, V)>> for LinkParams {
    fn from(pairs: Vec<(K, V)>) -> Self {
        Self::pairs(pairs)
    }
}

impl<K: fmt::Display, V: fmt::Display, const N: usize> From<[(K, V); N]> for LinkParams {
    fn from(pairs: [(K, V); N]) -> Self {
        Self::pairs(pairs)
    }
}

/// Builds links for one site.
#[derive(Clone)]
pub struct LinkBuilder {
    url: UrlSettings,
    base: String,
    aliases: Arc<AliasResolver>,
    encryptor: Option<Arc<dyn ParamEncryptor>>,
}

impl fmt::Debug for LinkBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LinkBuilder")
            .field("url", &self.url)
            .field("base", &self.base)
            .field("aliases", &self.aliases.len())
            .field("secure", &self.encryptor.is_some())
            .finish()
    }
}

impl LinkBuilder {
    /// Creates a builder without parameter encryption.
    pub fn new(url: UrlSettings, base: impl Into<String>, aliases: Arc<AliasResolver>) -> Self {
        Self {
            url,
            base: base.into(),
            aliases,
            encryptor: None,
        }
    }

    /// Sets the encryptor used by [`secure_link`](Self::secure_link).
    #[must_use]
    pub fn with_encryptor(mut self, encryptor: Arc<dyn ParamEncryptor>) -> Self {
        self.encryptor = Some(encryptor);
        self
    }

    /// Creates a builder from typed settings.
    ///
    /// The base URL is `sys.site_url`, aliases come from the `router`
    /// section, and secure links are enabled when `secret_key` is set.
    /// Parameters secured with one of `secret_key_fallbacks` still decrypt.
    pub fn from_settings(settings: &Settings) -> CrossResult<Self> {
        let aliases = Arc::new(AliasResolver::from_router(&settings.router)?);
        let builder = Self::new(settings.url.clone(), settings.sys.site_url.clone(), aliases);

        if settings.secret_key.is_empty() {
            Ok(builder)
        } else {
            let encryptor = SignedParamEncryptor::new(settings.secret_key.clone())
                .with_fallback_keys(settings.secret_key_fallbacks.clone());
            Ok(builder.with_encryptor(Arc::new(encryptor)))
        }
    }

    /// Returns the base URL links start with.
    pub fn base(&self) -> &str {
        &self.base
    }

    /// Replaces the base URL links start with.
    pub fn set_base(&mut self, base: impl Into<String>) {
        self.base = base.into();
    }

    /// Returns the link formatting settings.
    pub const fn url_settings(&self) -> &UrlSettings {
        &self.url
    }

    /// Returns the alias resolver.
    pub fn aliases(&self) -> &AliasResolver {
        &self.aliases
    }

    /// Returns the encryptor behind secure links, if one is configured.
    pub fn encryptor(&self) -> Option<&dyn ParamEncryptor> {
        self.encryptor.as_deref()
    }

    /// Returns the configured style.
    pub fn url_type(&self) -> CrossResult<UrlType> {
        UrlType::try_from(self.url.url_type)
    }

    /// Formats the controller part of a link.
    ///
    /// # Errors
    ///
    /// Returns [`CrossError::UnsupportedUrlType`] when rewriting is off and
    /// `url.type` is not `1..=4`.
    pub fn controller_segment(&self, target: &ControllerRef) -> CrossResult<String> {
        let mut segment = String::from("/");

        if !self.url.rewrite {
            let index = &self.url.index;
            match self.url_type()? {
                UrlType::QueryValues | UrlType::QueryPairs => {
                    if !index.eq_ignore_ascii_case(DEFAULT_INDEX) {
                        segment.push_str(index);
                    }
                    segment.push('?');
                }
                UrlType::PathQuery | UrlType::PathPairs => segment.push_str(index),
            }
            segment.push('/');
        }

        segment.push_str(&target.controller);
        if let Some(action) = &target.action {
            segment.push_str(&self.url.dot);
            segment.push_str(action);
        }

        Ok(segment)
    }

    /// Encodes parameters for the configured style, without a leading delimiter.
    ///
    /// # Errors
    ///
    /// Returns [`CrossError::UnsupportedUrlType`] when `url.type` is not `1..=4`.
    pub fn encode_params(&self, params: &LinkParams) -> CrossResult<String> {
        let dot = self.url.dot.as_str();

        let encoded = match self.url_type()? {
            // Keys are dropped: only values become path segments.
            UrlType::QueryValues => params.to_values().join(dot),
            UrlType::PathQuery => match params {
                LinkParams::Query(query) => query.clone(),
                LinkParams::Pairs(pairs) => pairs
                    .iter()
                    .map(|(k, v)| format!("{}={}", form_encode(k), form_encode(v)))
                    .collect::<Vec<_>>()
                    .join("&"),
            },
            UrlType::QueryPairs | UrlType::PathPairs => {
                let mut joined = String::new();
                for (key, value) in params.to_pairs() {
                    joined.push_str(&key);
                    joined.push_str(dot);
                    joined.push_str(&value);
                    joined.push_str(dot);
                }
                joined
                    .trim_end_matches(|c: char| dot.contains(c))
                    .to_string()
            }
        };

        Ok(encoded)
    }

    /// Formats the parameter part of a link, including its leading delimiter.
    ///
    /// The delimiter is `?` for [`UrlType::PathQuery`] and `dot` otherwise;
    /// nothing is emitted when the encoded parameters are empty. With
    /// `encrypt`, the encoded parameters are secured before the delimiter is
    /// added.
    ///
    /// # Errors
    ///
    /// Returns [`CrossError::UnsupportedUrlType`] for an unknown style, and
    /// [`CrossError::ImproperlyConfigured`] when encryption is requested but
    /// no encryptor is configured.
    pub fn build_params(&self, params: &LinkParams, encrypt: bool) -> CrossResult<String> {
        let mut encoded = self.encode_params(params)?;
        if encoded.is_empty() {
            return Ok(String::new());
        }

        if encrypt {
            let encryptor = self.encryptor.as_ref().ok_or_else(|| {
                CrossError::ImproperlyConfigured(
                    "secure links require a secret key".to_string(),
                )
            })?;
            encoded = encryptor.encrypt(&encoded);
        }

        let delimiter = match self.url_type()? {
            UrlType::PathQuery => "?",
            UrlType::QueryValues | UrlType::QueryPairs | UrlType::PathPairs => &self.url.dot,
        };

        Ok(format!("{delimiter}{encoded}"))
    }

    /// Builds a link.
    ///
    /// `controller` is resolved through the alias table; `None` or an empty
    /// reference produces a link without a controller segment.
    ///
    /// # Errors
    ///
    /// Returns [`CrossError::UnsupportedUrlType`] for an unknown style and
    /// [`CrossError::InvalidArgument`] for a malformed controller reference.
    pub fn link(&self, controller: Option<&str>, params: Option<&LinkParams>) -> CrossResult<String> {
        self.build_link(controller, params, false)
    }

    /// Builds a link whose parameters are secured by the configured encryptor.
    pub fn secure_link(
        &self,
        controller: Option<&str>,
        params: Option<&LinkParams>,
    ) -> CrossResult<String> {
        self.build_link(controller, params, true)
    }

    /// Builds a link, securing the parameters when `secure` is set.
    pub fn build_link(
        &self,
        controller: Option<&str>,
        params: Option<&LinkParams>,
        secure: bool,
    ) -> CrossResult<String> {
        let controller_segment = match controller.filter(|c| !c.is_empty()) {
            Some(reference) => {
                let target = self.aliases.resolve(reference)?;
                self.controller_segment(&target)?
            }
            None => String::new(),
        };

        let params_segment = match params {
            Some(params) => self.build_params(params, secure)?,
            None => String::new(),
        };

        let ext = self.url.ext.as_str();
        let mut url = self.base.clone();
        url.push_str(&controller_segment);

        if ext.is_empty() {
            url.push_str(&params_segment);
        } else {
            match self.url_type()? {
                UrlType::PathQuery => {
                    url.push_str(ext);
                    url.push_str(&params_segment);
                }
                UrlType::QueryValues | UrlType::QueryPairs | UrlType::PathPairs => {
                    url.push_str(&params_segment);
                    url.push_str(ext);
                }
            }
        }

        tracing::debug!(controller = ?controller, secure, %url, "link built");
        Ok(url)
    }
}
