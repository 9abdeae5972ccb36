//! Per-component deployment state.
//!
//! [`StateTracker`] is a passive record of what the external deployer last
//! reported for each component. It enforces no transition rules: any state
//! may follow any other.
//!
//! Entries are keyed by component name and survive deletion of the
//! component, so the last known `resource_id` stays available for cleanup.

use std::fmt;

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Deployment lifecycle marker.
///
/// Serialized in lower case. Decoding rejects anything outside these six.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeploymentState {
    Undeployed,
    Deploying,
    Deployed,
    Updating,
    Destroying,
    Error,
}

impl DeploymentState {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeploymentState::Undeployed => "undeployed",
            DeploymentState::Deploying => "deploying",
            DeploymentState::Deployed => "deployed",
            DeploymentState::Updating => "updating",
            DeploymentState::Destroying => "destroying",
            DeploymentState::Error => "error",
        }
    }
}

impl fmt::Display for DeploymentState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for DeploymentState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "undeployed" => Ok(DeploymentState::Undeployed),
            "deploying" => Ok(DeploymentState::Deploying),
            "deployed" => Ok(DeploymentState::Deployed),
            "updating" => Ok(DeploymentState::Updating),
            "destroying" => Ok(DeploymentState::Destroying),
            "error" => Ok(DeploymentState::Error),
            other => Err(format!("unknown deployment state: {other}")),
        }
    }
}

/// The recorded deployment status of one component.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentStateInfo {
    pub state: DeploymentState,
    /// Provider-side identifier reported by the deployer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_id: Option<String>,
    /// Only meaningful when `state` is [`DeploymentState::Error`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    #[serde(deserialize_with = "crate::timestamp::deserialize")]
    pub last_updated: DateTime<Utc>,
}

impl ComponentStateInfo {
    pub fn undeployed(at: DateTime<Utc>) -> Self {
        ComponentStateInfo {
            state: DeploymentState::Undeployed,
            resource_id: None,
            error_message: None,
            last_updated: at,
        }
    }
}

/// Name-keyed map of [`ComponentStateInfo`], kept in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StateTracker {
    entries: IndexMap<String, ComponentStateInfo>,
}

impl StateTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrites the entry for `name` and stamps `last_updated` with now.
    pub fn set_state(
        &mut self,
        name: &str,
        state: DeploymentState,
        resource_id: Option<String>,
        error_message: Option<String>,
    ) -> &ComponentStateInfo {
        let info = ComponentStateInfo {
            state,
            resource_id,
            error_message,
            last_updated: Utc::now(),
        };
        let (index, _) = self.entries.insert_full(name.to_string(), info);
        &self.entries[index]
    }

    /// Returns the entry for `name`, creating an `Undeployed` entry first if
    /// none exists.
    ///
    /// This is a mutating read: the synthesized entry is stored and becomes
    /// part of the serialized design. Use [`peek`](Self::peek) for a pure
    /// lookup.
    pub fn get_or_init(&mut self, name: &str) -> &ComponentStateInfo {
        self.entries
            .entry(name.to_string())
            .or_insert_with(|| ComponentStateInfo::undeployed(Utc::now()))
    }

    /// Returns the entry for `name` without creating one.
    pub fn peek(&self, name: &str) -> Option<&ComponentStateInfo> {
        self.entries.get(name)
    }

    /// Moves the entry stored under `old` (if any) to `new`, keeping its
    /// position in the map.
    pub(crate) fn rename(&mut self, old: &str, new: &str) {
        if !self.entries.contains_key(old) {
            return;
        }
        // A retained entry left behind by a deleted component named `new`
        // is superseded by the renamed component's history.
        self.entries.shift_remove(new);
        let Some(index) = self.entries.get_index_of(old) else {
            return;
        };
        if let Some((_, info)) = self.entries.shift_remove_index(index) {
            self.entries.shift_insert(index, new.to_string(), info);
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ComponentStateInfo)> {
        self.entries.iter().map(|(name, info)| (name.as_str(), info))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_read_creates_undeployed_entry() {
        let mut tracker = StateTracker::new();
        assert!(tracker.peek("api").is_none());

        let first = tracker.get_or_init("api").clone();
        assert_eq!(first.state, DeploymentState::Undeployed);
        assert_eq!(first.resource_id, None);
        assert_eq!(tracker.len(), 1);

        let second = tracker.get_or_init("api").clone();
        assert_eq!(first, second);
    }

    #[test]
    fn set_state_overwrites_without_transition_rules() {
        let mut tracker = StateTracker::new();
        tracker.set_state("db", DeploymentState::Destroying, None, None);
        let info = tracker
            .set_state("db", DeploymentState::Deploying, Some("i-123".into()), None)
            .clone();
        assert_eq!(info.state, DeploymentState::Deploying);
        assert_eq!(info.resource_id.as_deref(), Some("i-123"));
        assert_eq!(tracker.len(), 1);
    }

    #[test]
    fn set_state_clears_fields_not_supplied() {
        let mut tracker = StateTracker::new();
        tracker.set_state(
            "db",
            DeploymentState::Error,
            Some("i-1".into()),
            Some("quota exceeded".into()),
        );
        tracker.set_state("db", DeploymentState::Updating, None, None);
        let info = tracker.peek("db").unwrap();
        assert_eq!(info.resource_id, None);
        assert_eq!(info.error_message, None);
    }

    #[test]
    fn rename_keeps_position() {
        let mut tracker = StateTracker::new();
        tracker.set_state("a", DeploymentState::Deployed, None, None);
        tracker.set_state("b", DeploymentState::Deploying, None, None);
        tracker.set_state("c", DeploymentState::Error, None, None);

        tracker.rename("b", "b2");

        let names: Vec<&str> = tracker.iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["a", "b2", "c"]);
        assert_eq!(tracker.peek("b2").unwrap().state, DeploymentState::Deploying);
        assert!(tracker.peek("b").is_none());
    }

    #[test]
    fn rename_supersedes_retained_entry_of_new_name() {
        let mut tracker = StateTracker::new();
        tracker.set_state("old", DeploymentState::Deployed, Some("r-old".into()), None);
        tracker.set_state("web", DeploymentState::Deployed, Some("r-web".into()), None);

        tracker.rename("web", "old");

        assert_eq!(tracker.len(), 1);
        assert_eq!(tracker.peek("old").unwrap().resource_id.as_deref(), Some("r-web"));
    }

    #[test]
    fn rename_without_entry_is_noop() {
        let mut tracker = StateTracker::new();
        tracker.set_state("a", DeploymentState::Deployed, None, None);
        tracker.rename("missing", "a");
        assert_eq!(tracker.peek("a").unwrap().state, DeploymentState::Deployed);
    }

    #[test]
    fn state_parses_case_insensitively() {
        assert_eq!("ERROR".parse::<DeploymentState>().unwrap(), DeploymentState::Error);
        assert!("paused".parse::<DeploymentState>().is_err());
    }

    #[test]
    fn absent_optionals_are_omitted() {
        let info = ComponentStateInfo::undeployed(Utc::now());
        let json = serde_json::to_value(&info).unwrap();
        assert!(json.get("resource_id").is_none());
        assert!(json.get("error_message").is_none());
        assert_eq!(json["state"], "undeployed");
    }
}
