//! The policy table and its mutation operator.
//!
//! # Representation
//!
//! A policy stores one action per observation in a flat array indexed by
//! [`Observation::index`]. Lookups are a single array access, and cloning a policy
//! copies the whole table, so a mutated policy never shares state with its parent
//! and can be handed to another thread as-is.
//!
//! # Mutation
//!
//! [`Policy::mutate`] performs `count` independent draws, each picking a key
//! uniformly from all 243 observations and a new action uniformly from
//! [`Action::MUTATION_TARGETS`]. Keys are not deduplicated: when a key is drawn
//! twice only its last assignment survives, and a draw may reassign a key to the
//! action it already had. The number of entries that actually differ from the
//! parent is therefore at most `count`.
//!
//! # Textual Form
//!
//! Policies serialize as a map from the textual form of each observation to the
//! action name, ordered by observation index:
//!
//! ```text
//! {
//!   ".....": "move_random",
//!   "o....": "move_left",
//!   ...
//!   "#####": "move_random"
//! }
//! ```
//!
//! Deserialization rejects maps that do not cover every observation or that
//! name an observation more than once.

use std::{collections::BTreeMap, fmt};

use rand::Rng;
use robby_engine::{Action, Observation, UnrecognizedActionError};
use serde::{
    Deserialize, Deserializer, Serialize,
    de::{self, MapAccess, Visitor},
};

use crate::rule;

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum PolicyError {
    #[display("policy table has {len} entries, expected {}", Observation::COUNT)]
    IncompleteTable { len: usize },
    #[display("policy table has no action for observation {observation}")]
    MissingObservation { observation: Observation },
    #[display("policy table maps observation {observation} more than once")]
    DuplicateObservation { observation: Observation },
    #[display("policy table contains an unrecognized action")]
    UnrecognizedAction(UnrecognizedActionError),
}

impl From<UnrecognizedActionError> for PolicyError {
    fn from(err: UnrecognizedActionError) -> Self {
        Self::UnrecognizedAction(err)
    }
}

/// A total mapping from observations to actions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(into = "BTreeMap<Observation, Action>")]
pub struct Policy {
    table: [Action; Observation::COUNT],
}

impl Default for Policy {
    fn default() -> Self {
        Self::default_strategy()
    }
}

impl Policy {
    /// Builds a policy by applying `rule` to every observation.
    ///
    /// ```
    /// use robby_engine::{Action, Observation};
    /// use robby_policy::Policy;
    ///
    /// let policy = Policy::from_fn(|obs| {
    ///     if obs.center.is_item() { Action::PickUp } else { Action::MoveRandom }
    /// });
    /// assert_eq!(policy.count_of(Action::PickUp), 81);
    /// ```
    pub fn from_fn<F>(mut rule: F) -> Self
    where
        F: FnMut(Observation) -> Action,
    {
        let mut table = [Action::NoOp; Observation::COUNT];
        for (entry, observation) in table.iter_mut().zip(Observation::all()) {
            *entry = rule(observation);
        }
        Self { table }
    }

    /// A policy mapping every observation to `action`.
    #[must_use]
    pub fn uniform(action: Action) -> Self {
        Self {
            table: [action; Observation::COUNT],
        }
    }

    /// The reference heuristic, see [`rule::default_rule`].
    #[must_use]
    pub fn default_strategy() -> Self {
        Self::from_fn(rule::default_rule)
    }

    /// Builds a policy from raw action codes in observation-index order.
    pub fn from_codes<I>(codes: I) -> Result<Self, PolicyError>
    where
        I: IntoIterator<Item = u8>,
    {
        let actions = codes
            .into_iter()
            .map(Action::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        let len = actions.len();
        let table = actions
            .try_into()
            .map_err(|_| PolicyError::IncompleteTable { len })?;
        Ok(Self { table })
    }

    /// Builds a policy from `(observation, action)` pairs.
    ///
    /// Every observation must appear exactly once, in any order.
    pub fn from_entries<I>(entries: I) -> Result<Self, PolicyError>
    where
        I: IntoIterator<Item = (Observation, Action)>,
    {
        let mut table = [None; Observation::COUNT];
        for (observation, action) in entries {
            let entry = &mut table[observation.index()];
            if entry.is_some() {
                return Err(PolicyError::DuplicateObservation { observation });
            }
            *entry = Some(action);
        }

        let mut actions = [Action::NoOp; Observation::COUNT];
        for ((observation, entry), action) in Observation::all().zip(table).zip(&mut actions) {
            *action = entry.ok_or(PolicyError::MissingObservation { observation })?;
        }
        Ok(Self { table: actions })
    }

    /// Raw action codes in observation-index order.
    pub fn codes(&self) -> impl Iterator<Item = u8> + '_ {
        self.table.iter().map(|action| action.code())
    }

    #[must_use]
    pub fn action_for(&self, observation: Observation) -> Action {
        self.table[observation.index()]
    }

    /// Iterates over all entries in observation-index order.
    pub fn iter(&self) -> impl Iterator<Item = (Observation, Action)> + '_ {
        Observation::all().zip(self.table.iter().copied())
    }

    /// Number of observations mapped to `action`.
    #[must_use]
    pub fn count_of(&self, action: Action) -> usize {
        self.table.iter().filter(|a| **a == action).count()
    }

    /// Number of observations on which `self` and `other` disagree.
    #[must_use]
    pub fn diff_count(&self, other: &Self) -> usize {
        self.table
            .iter()
            .zip(&other.table)
            .filter(|(a, b)| a != b)
            .count()
    }

    /// Returns a mutated copy of this policy.
    ///
    /// Performs `count` independent reassignments as described in the
    /// [module documentation](crate::policy). `mutate(0)` returns an exact copy.
    #[must_use]
    pub fn mutate<R>(&self, count: usize, rng: &mut R) -> Self
    where
        R: Rng + ?Sized,
    {
        let mut table = self.table;
        for _ in 0..count {
            let index = rng.random_range(0..Observation::COUNT);
            let target = rng.random_range(0..Action::MUTATION_TARGETS.len());
            table[index] = Action::MUTATION_TARGETS[target];
        }
        Self { table }
    }
}

impl From<Policy> for BTreeMap<Observation, Action> {
    fn from(policy: Policy) -> Self {
        policy.iter().collect()
    }
}

impl<'de> Deserialize<'de> for Policy {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let entries = deserializer.deserialize_map(EntriesVisitor)?;
        Self::from_entries(entries).map_err(de::Error::custom)
    }
}

/// Collects map entries as-is so repeated keys reach [`Policy::from_entries`].
struct EntriesVisitor;

impl<'de> Visitor<'de> for EntriesVisitor {
    type Value = Vec<(Observation, Action)>;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a map from observations to actions")
    }

    fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut entries = Vec::with_capacity(Observation::COUNT);
        while let Some(entry) = map.next_entry()? {
            entries.push(entry);
        }
        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng as _;
    use rand_pcg::Pcg32;
    use robby_engine::Cell;

    use super::*;

    #[test]
    fn test_default_strategy_counts() {
        let policy = Policy::default_strategy();
        assert_eq!(policy.iter().count(), Observation::COUNT);
        assert_eq!(policy.count_of(Action::PickUp), 81);
        assert_eq!(policy.count_of(Action::MoveRandom), 32);
        assert_eq!(policy.count_of(Action::NoOp), 0);
    }

    #[test]
    fn test_lookup_matches_rule() {
        let policy = Policy::default_strategy();
        for obs in Observation::all() {
            assert_eq!(policy.action_for(obs), rule::default_rule(obs));
        }
    }

    #[test]
    fn test_mutate_one_changes_exactly_one_entry() {
        let mut rng = rand::rng();
        let policy = Policy::uniform(Action::NoOp);
        for _ in 0..100 {
            let mutated = policy.mutate(1, &mut rng);
            assert_eq!(mutated.count_of(Action::NoOp), Observation::COUNT - 1);
            assert_eq!(mutated.diff_count(&policy), 1);
        }
    }

    #[test]
    fn test_mutate_changes_at_most_count_entries() {
        let mut rng = Pcg32::seed_from_u64(1);
        let policy = Policy::uniform(Action::NoOp);
        for count in 0..=20 {
            let mutated = policy.mutate(count, &mut rng);
            assert!(mutated.diff_count(&policy) <= count);
            assert!(mutated.diff_count(&policy) >= 1 || count == 0);
        }
    }

    #[test]
    fn test_mutate_zero_is_exact_copy() {
        let mut rng = rand::rng();
        let policy = Policy::default_strategy();
        assert_eq!(policy.mutate(0, &mut rng), policy);
    }

    #[test]
    fn test_mutate_leaves_parent_untouched() {
        let mut rng = rand::rng();
        let policy = Policy::uniform(Action::NoOp);
        let mutated = policy.mutate(50, &mut rng);
        assert_eq!(policy.count_of(Action::NoOp), Observation::COUNT);
        assert_eq!(
            mutated.count_of(Action::NoOp),
            Observation::COUNT - mutated.diff_count(&policy)
        );
    }

    #[test]
    fn test_mutate_never_assigns_no_op() {
        let mut rng = rand::rng();
        let policy = Policy::uniform(Action::PickUp).mutate(1000, &mut rng);
        assert_eq!(policy.count_of(Action::NoOp), 0);
    }

    #[test]
    fn test_from_codes() {
        let policy = Policy::default_strategy();
        let rebuilt = Policy::from_codes(policy.codes()).unwrap();
        assert_eq!(rebuilt, policy);

        let err = Policy::from_codes([0; 10]).unwrap_err();
        assert_eq!(err, PolicyError::IncompleteTable { len: 10 });

        let mut codes = policy.codes().collect::<Vec<_>>();
        codes[17] = 9;
        let err = Policy::from_codes(codes).unwrap_err();
        assert_eq!(
            err,
            PolicyError::UnrecognizedAction(UnrecognizedActionError { code: 9 })
        );
    }

    #[test]
    fn test_unrecognized_action_is_reported_as_source() {
        use std::error::Error as _;

        let err = PolicyError::from(UnrecognizedActionError { code: 9 });
        let source = err.source().unwrap().to_string();
        assert_eq!(source, "unrecognized action code: 9");
        assert!(!err.to_string().contains(&source), "{err}");
    }

    #[test]
    fn test_json_dump_has_every_observation() {
        let policy = Policy::default_strategy();
        let value = serde_json::to_value(&policy).unwrap();
        let object = value.as_object().unwrap();
        assert_eq!(object.len(), Observation::COUNT);
        assert_eq!(object["####o"], "pick_up");
        assert_eq!(object["#####"], "move_random");
        assert_eq!(object["o...."], "move_left");

        let deserialized: Policy = serde_json::from_value(value).unwrap();
        assert_eq!(deserialized, policy);
    }

    #[test]
    fn test_json_rejects_incomplete_table() {
        let mut map = BTreeMap::from(Policy::uniform(Action::NoOp));
        let missing =
            Observation::new(Cell::Wall, Cell::Item, Cell::Empty, Cell::Empty, Cell::Item);
        map.remove(&missing);
        let json = serde_json::to_string(&map).unwrap();

        let err = serde_json::from_str::<Policy>(&json).unwrap_err();
        assert!(err.to_string().contains(&missing.to_string()));
    }

    #[test]
    fn test_json_rejects_repeated_observation() {
        let json = serde_json::to_string(&Policy::uniform(Action::NoOp)).unwrap();
        let json = json.replacen('{', r#"{".....":"pick_up","#, 1);

        let err = serde_json::from_str::<Policy>(&json).unwrap_err();
        assert!(err.to_string().contains("more than once"), "{err}");
    }

    #[test]
    fn test_from_entries() {
        let policy = Policy::default_strategy();
        let mut entries = policy.iter().collect::<Vec<_>>();
        entries.reverse();
        assert_eq!(Policy::from_entries(entries.clone()).unwrap(), policy);

        let repeated = entries[0];
        entries.push((repeated.0, Action::NoOp));
        assert_eq!(
            Policy::from_entries(entries.clone()),
            Err(PolicyError::DuplicateObservation {
                observation: repeated.0
            })
        );

        entries.truncate(Observation::COUNT - 1);
        let dropped = policy.iter().next().unwrap().0;
        assert_eq!(
            Policy::from_entries(entries),
            Err(PolicyError::MissingObservation {
                observation: dropped
            })
        );
    }
}
