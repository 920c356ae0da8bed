//! Controller references and alias resolution.
//!
//! Links name their target as `"controller"` or `"controller:action"`. Before
//! a link is formatted, the [`AliasResolver`] swaps internal controller and
//! action names for the public names configured in the `router` section.
//!
//! # Examples
//!
//! ```
//! use cross_rs_http::urls::alias::{AliasResolver, AliasTarget, ControllerRef};
//! use indexmap::IndexMap;
//!
//! let mut table = IndexMap::new();
//! table.insert("article".to_string(), AliasTarget::Controller("news".to_string()));
//! let resolver = AliasResolver::new(table).unwrap();
//!
//! assert_eq!(resolver.resolve("article").unwrap(), ControllerRef::new("news", None));
//! assert_eq!(
//!     resolver.resolve("user:login").unwrap(),
//!     ControllerRef::new("user", Some("login")),
//! );
//! ```

use std::fmt;

use indexmap::IndexMap;

use cross_rs_core::settings::RouterEntry;
use cross_rs_core::{CrossError, CrossResult};

/// Separator between controller and action in a controller reference.
pub const ACTION_SEPARATOR: char = ':';

/// A controller with an optional action.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ControllerRef {
    /// The controller name.
    pub controller: String,
    /// The action name, if any.
    pub action: Option<String>,
}

impl ControllerRef {
    /// Creates a reference from its parts.
    pub fn new(controller: impl Into<String>, action: Option<&str>) -> Self {
        Self {
            controller: controller.into(),
            action: action.map(str::to_string),
        }
    }

    /// Parses `"controller"` or `"controller:action"`.
    ///
    /// Only the first `:` separates; an empty action (`"news:"`) is treated
    /// as no action.
    ///
    /// # Errors
    ///
    /// Returns [`CrossError::InvalidArgument`] for an empty reference or an
    /// empty controller part.
    pub fn parse(reference: &str) -> CrossResult<Self> {
        let (controller, action) = match reference.split_once(ACTION_SEPARATOR) {
            Some((controller, action)) => (controller, Some(action).filter(|a| !a.is_empty())),
            None => (reference, None),
        };

        if controller.is_empty() {
            return Err(CrossError::InvalidArgument(format!(
                "controller reference '{reference}' has no controller"
            )));
        }

        Ok(Self::new(controller, action))
    }
}

impl fmt::Display for ControllerRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.action {
            Some(action) => write!(f, "{}{ACTION_SEPARATOR}{action}", self.controller),
            None => f.write_str(&self.controller),
        }
    }
}

/// What a name in the alias table maps to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AliasTarget {
    /// The whole reference is replaced by this controller name.
    Controller(String),
    /// Actions of this controller are renamed.
    Actions(IndexMap<String, String>),
}

/// Translates controller references into their public form.
///
/// Built once at startup and shared immutably by the link builders.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AliasResolver {
    table: IndexMap<String, AliasTarget>,
}

impl AliasResolver {
    /// Creates a resolver with no aliases.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Creates a resolver over an alias table.
    ///
    /// Resolution must be idempotent, so tables that chain aliases are
    /// rejected: a controller alias may not point at another controller
    /// alias, and an action alias may not point at another action alias of
    /// the same controller, and a controller alias keyed `controller:action`
    /// may not match the output of an action alias of that controller.
    /// Targets must be non-empty, and controller targets may not contain `:`.
    ///
    /// # Errors
    ///
    /// Returns [`CrossError::ImproperlyConfigured`] when the table violates
    /// one of the rules above.
    pub fn new(table: IndexMap<String, AliasTarget>) -> CrossResult<Self> {
        for (name, target) in &table {
            match target {
                AliasTarget::Controller(to) => {
                    if to.is_empty() || to.contains(ACTION_SEPARATOR) {
                        return Err(CrossError::ImproperlyConfigured(format!(
                            "alias '{name}' has invalid controller target '{to}'"
                        )));
                    }
                    if to != name && matches!(table.get(to), Some(AliasTarget::Controller(_))) {
                        return Err(CrossError::ImproperlyConfigured(format!(
                            "alias '{name}' points at '{to}', which is itself aliased"
                        )));
                    }
                    if let Some((controller, action)) = name.split_once(ACTION_SEPARATOR) {
                        let shadows_action_alias = matches!(
                            table.get(controller),
                            Some(AliasTarget::Actions(actions))
                                if actions.values().any(|renamed| renamed == action)
                        );
                        if shadows_action_alias {
                            return Err(CrossError::ImproperlyConfigured(format!(
                                "alias '{name}' captures the output of an action alias of '{controller}'"
                            )));
                        }
                    }
                }
                AliasTarget::Actions(actions) => {
                    for (from, to) in actions {
                        if to.is_empty() {
                            return Err(CrossError::ImproperlyConfigured(format!(
                                "action alias '{name}:{from}' has an empty target"
                            )));
                        }
                        if to != from && actions.contains_key(to) {
                            return Err(CrossError::ImproperlyConfigured(format!(
                                "action alias '{name}:{from}' points at '{to}', which is itself aliased"
                            )));
                        }
                    }
                }
            }
        }

        tracing::debug!(aliases = table.len(), "alias table built");
        Ok(Self { table })
    }

    /// Builds a resolver from the `router` configuration section.
    ///
    /// Router entries map public names to internal ones
    /// (`public = "internal"`, or `[router.public] public_action =
    /// "internal_action"`). Link generation needs the reverse direction, so
    /// controller entries are flipped to `internal -> public`, and action maps
    /// stay under their controller key with each pair flipped. When two
    /// entries collide, the later one wins.
    pub fn from_router(router: &IndexMap<String, RouterEntry>) -> CrossResult<Self> {
        let mut table = IndexMap::new();

        for (public, entry) in router {
            let (key, target) = match entry {
                RouterEntry::Controller(internal) => {
                    (internal.clone(), AliasTarget::Controller(public.clone()))
                }
                RouterEntry::Actions(actions) => {
                    let flipped = actions
                        .iter()
                        .map(|(public_action, internal_action)| {
                            (internal_action.clone(), public_action.clone())
                        })
                        .collect();
                    (public.clone(), AliasTarget::Actions(flipped))
                }
            };

            if let Some(previous) = table.insert(key.clone(), target) {
                tracing::warn!(name = %key, ?previous, "router alias overridden by a later entry");
            }
        }

        Self::new(table)
    }

    /// Resolves a controller reference to its public form.
    ///
    /// 1. A reference equal to a controller alias key becomes that alias,
    ///    without an action.
    /// 2. Otherwise the reference is parsed. A reference without an action
    ///    (`"news"` or `"news:"`) is matched against the controller aliases
    ///    again; one with an action has the action renamed if the controller
    ///    has an action alias for it.
    ///
    /// # Errors
    ///
    /// Returns [`CrossError::InvalidArgument`] for an empty or malformed reference.
    pub fn resolve(&self, reference: &str) -> CrossResult<ControllerRef> {
        if reference.is_empty() {
            return Err(CrossError::InvalidArgument(
                "empty controller reference".to_string(),
            ));
        }

        if let Some(AliasTarget::Controller(alias)) = self.table.get(reference) {
            return Ok(ControllerRef::new(alias.clone(), None));
        }

        let mut parsed = ControllerRef::parse(reference)?;
        if parsed.action.is_none() {
            if let Some(AliasTarget::Controller(alias)) = self.table.get(&parsed.controller) {
                return Ok(ControllerRef::new(alias.clone(), None));
            }
            return Ok(parsed);
        }

        let renamed = match (self.table.get(&parsed.controller), parsed.action.as_deref()) {
            (Some(AliasTarget::Actions(actions)), Some(action)) => actions.get(action).cloned(),
            _ => None,
        };
        if renamed.is_some() {
            parsed.action = renamed;
        }

        Ok(parsed)
    }

    /// Returns the alias registered under `name`.
    pub fn get(&self, name: &str) -> Option<&AliasTarget> {
        self.table.get(name)
    }

    /// Returns the number of entries in the table.
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// Returns `true` if no aliases are configured.
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}
