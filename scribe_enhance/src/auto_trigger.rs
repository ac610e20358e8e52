// Copyright 2025 the Scribe Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Auto-trigger policy: which enhanced callbacks deliver their event
//! immediately, before the original callback runs.

use alloc::rc::Rc;
use alloc::string::{String, ToString};
use hashbrown::HashSet;
use serde_json::Value;

/// Selects event names, either by set membership or by predicate.
pub enum NameFilter {
    /// Explicit set of event names.
    Names(HashSet<String>),
    /// Arbitrary predicate over the event name.
    Predicate(Rc<dyn Fn(&str) -> bool>),
}

impl core::fmt::Debug for NameFilter {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Names(names) => f.debug_tuple("Names").field(names).finish(),
            Self::Predicate(_) => f.debug_tuple("Predicate").finish_non_exhaustive(),
        }
    }
}

impl NameFilter {
    /// Build a set filter from any iterable of names.
    pub fn names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Names(names.into_iter().map(Into::into).collect())
    }

    /// Build a predicate filter.
    pub fn predicate(f: impl Fn(&str) -> bool + 'static) -> Self {
        Self::Predicate(Rc::new(f))
    }

    fn passes(&self, name: &str) -> bool {
        match self {
            Self::Names(names) => names.contains(name),
            Self::Predicate(f) => f(name),
        }
    }
}

/// Auto-trigger configuration for an enhancer.
///
/// `Include` and `Exclude` are separate variants, so a configuration can
/// never carry both; the invalid combinations representable in loose config
/// data are rejected by [`AutoTrigger::try_from`].
#[derive(Debug)]
pub enum AutoTrigger {
    /// Trigger all configured events (`true`) or none (`false`).
    Toggle(bool),
    /// Trigger exactly the events the filter selects.
    Include(NameFilter),
    /// Trigger every event except the ones the filter selects.
    Exclude(NameFilter),
}

impl From<bool> for AutoTrigger {
    fn from(enabled: bool) -> Self {
        Self::Toggle(enabled)
    }
}

/// Whether the event named `event_name` should be delivered immediately when
/// its enhanced callback fires.
///
/// No option means no auto-trigger.
///
/// ```
/// use scribe_enhance::{AutoTrigger, NameFilter, is_auto_triggered};
///
/// assert!(!is_auto_triggered("on_click", None));
/// assert!(is_auto_triggered("on_click", Some(&AutoTrigger::Toggle(true))));
///
/// let only_clicks = AutoTrigger::Include(NameFilter::names(["on_click"]));
/// assert!(is_auto_triggered("on_click", Some(&only_clicks)));
/// assert!(!is_auto_triggered("on_focus", Some(&only_clicks)));
/// ```
pub fn is_auto_triggered(event_name: &str, option: Option<&AutoTrigger>) -> bool {
    match option {
        None => false,
        Some(AutoTrigger::Toggle(enabled)) => *enabled,
        Some(AutoTrigger::Include(filter)) => filter.passes(event_name),
        Some(AutoTrigger::Exclude(filter)) => !filter.passes(event_name),
    }
}

/// Errors from enhancer configuration.
#[derive(Debug, thiserror::Error)]
pub enum EnhanceError {
    /// An auto-trigger option in config data was neither a boolean nor an
    /// include/exclude object over event-name strings.
    #[error("invalid auto-trigger option: {0}")]
    InvalidAutoTrigger(Value),
}

impl TryFrom<&Value> for AutoTrigger {
    type Error = EnhanceError;

    /// Parse an auto-trigger option from loose configuration data.
    ///
    /// Accepted shapes are a boolean, `{"include": [names…]}`, and
    /// `{"exclude": [names…]}`. Anything else, such as other JSON types, an
    /// object with both or neither key, or non-string names, fails with
    /// [`EnhanceError::InvalidAutoTrigger`] naming the offending value;
    /// invalid configuration is never silently defaulted.
    fn try_from(value: &Value) -> Result<Self, EnhanceError> {
        let invalid = || EnhanceError::InvalidAutoTrigger(value.clone());
        match value {
            Value::Bool(enabled) => Ok(Self::Toggle(*enabled)),
            Value::Object(fields) if fields.len() == 1 => {
                let (key, names) = fields.iter().next().expect("len checked above");
                let names = names.as_array().ok_or_else(invalid)?;
                let names: HashSet<String> = names
                    .iter()
                    .map(|name| name.as_str().map(ToString::to_string))
                    .collect::<Option<_>>()
                    .ok_or_else(invalid)?;
                match key.as_str() {
                    "include" => Ok(Self::Include(NameFilter::Names(names))),
                    "exclude" => Ok(Self::Exclude(NameFilter::Names(names))),
                    _ => Err(invalid()),
                }
            }
            _ => Err(invalid()),
        }
    }
}
