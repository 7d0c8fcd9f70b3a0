//! Node/edge export of the relationship graph, for renderers.

use std::collections::{BTreeMap, HashSet};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
  contact::{Contact, Field},
  dimension::ViewDimension,
  group::{Group, UNKNOWN, build_value_groups, group_token},
};

/// Highest level a rating field can hold; the lowest is 1.
pub const MAX_LEVEL: u8 = 10;

/// Label of an edge between same-level contacts who share a location.
pub const SAME_LOCATION: &str = "same location";

/// The level of a rating attribute, or `None` if it is blank, not an
/// integer, or outside `1..=MAX_LEVEL`.
pub fn rating_level(raw: &str) -> Option<u8> {
  raw.trim().parse::<u8>().ok().filter(|l| (1..=MAX_LEVEL).contains(l))
}

fn same_location(a: &Contact, b: &Contact) -> bool {
  let la = group_token(&a.location);
  !la.is_empty() && la == group_token(&b.location)
}

/// A stored similarity edge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimilarityEdge {
  pub id:           i64,
  pub person1:      String,
  pub person2:      String,
  pub shared_value: String,
  pub recorded_at:  DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
  pub id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
  pub source: String,
  pub target: String,
  pub label:  String,
}

/// `{ "nodes": [...], "edges": [...] }`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Graph {
  pub nodes: Vec<Node>,
  pub edges: Vec<Edge>,
}

impl Graph {
  fn add_node(&mut self, seen: &mut HashSet<String>, name: &str) {
    if seen.insert(name.to_owned()) {
      self.nodes.push(Node { id: name.to_owned() });
    }
  }

  /// Every name as a node, no edges.
  pub fn from_names<'a>(names: impl IntoIterator<Item = &'a str>) -> Self {
    let mut graph = Self::default();
    let mut seen = HashSet::new();
    for name in names {
      graph.add_node(&mut seen, name);
    }
    graph
  }

  /// One edge per stored similarity edge.
  pub fn from_edges(edges: &[SimilarityEdge]) -> Self {
    let mut graph = Self::default();
    let mut seen = HashSet::new();
    for e in edges {
      graph.add_node(&mut seen, &e.person1);
      graph.add_node(&mut seen, &e.person2);
      graph.edges.push(Edge {
        source: e.person1.clone(),
        target: e.person2.clone(),
        label:  e.shared_value.clone(),
      });
    }
    graph
  }

  /// One edge per unordered member pair in each group.
  ///
  /// The unknown bucket contributes nodes but no edges.
  pub fn from_groups(groups: &[Group]) -> Self {
    let mut graph = Self::default();
    let mut seen = HashSet::new();
    let buckets = groups.iter().map(|g| (g.token.as_str(), g.members.as_slice()));
    graph.add_cliques(&mut seen, buckets);
    graph
  }

  fn add_cliques<'g>(
    &mut self,
    seen: &mut HashSet<String>,
    buckets: impl IntoIterator<Item = (&'g str, &'g [String])>,
  ) {
    for (token, members) in buckets {
      for m in members {
        self.add_node(seen, m);
      }
      if token == UNKNOWN {
        continue;
      }
      for (i, a) in members.iter().enumerate() {
        for b in &members[i + 1..] {
          self.edges.push(Edge {
            source: a.clone(),
            target: b.clone(),
            label:  token.to_owned(),
          });
        }
      }
    }
  }

  /// Draw a view dimension directly from the contacts, in load order.
  pub fn for_view(view: ViewDimension, contacts: &[Contact]) -> Self {
    match view {
      ViewDimension::Location => Self::by_location(contacts),
      ViewDimension::TalentRating | ViewDimension::Closeness => {
        Self::by_level(contacts, view.field())
      }
    }
  }

  /// Every contact as a node; one clique per shared (trimmed, lowercased)
  /// location. Contacts without a location get no edges.
  fn by_location(contacts: &[Contact]) -> Self {
    let mut graph = Self::from_names(contacts.iter().map(|c| c.name.as_str()));
    let mut seen: HashSet<String> = graph.nodes.iter().map(|n| n.id.clone()).collect();
    let groups = build_value_groups(contacts, Field::Location);
    graph.add_cliques(&mut seen, groups.iter().map(|(t, m)| (t.as_str(), m.as_slice())));
    graph
  }

  /// Tiered view over a 1..=10 rating field.
  ///
  /// Nodes run from the highest level down, then unrated contacts. Contacts
  /// on the same level and in the same location are linked. Every rated
  /// contact below the top level hangs off the nearest higher level that has
  /// anyone in it, preferring someone in the same location. Unrated contacts
  /// get no edges.
  fn by_level(contacts: &[Contact], field: Field) -> Self {
    let mut levels: BTreeMap<u8, Vec<&Contact>> = BTreeMap::new();
    let mut unrated = Vec::new();
    for c in contacts {
      match rating_level(c.get(field)) {
        Some(level) => levels.entry(level).or_default().push(c),
        None => unrated.push(c),
      }
    }

    let mut graph = Self::default();
    let mut seen = HashSet::new();
    for c in levels.values().rev().flatten().chain(&unrated) {
      graph.add_node(&mut seen, &c.name);
    }

    for members in levels.values().rev() {
      for (i, a) in members.iter().enumerate() {
        for b in &members[i + 1..] {
          if a.name != b.name && same_location(a, b) {
            graph.edges.push(Edge {
              source: a.name.clone(),
              target: b.name.clone(),
              label:  SAME_LOCATION.to_owned(),
            });
          }
        }
      }
    }

    for (level, members) in levels.iter().rev() {
      let Some((above, higher)) = levels.range(level + 1..).next() else {
        continue;
      };
      for c in members {
        let parent = higher.iter().find(|h| same_location(h, c)).or(higher.first());
        if let Some(parent) = parent {
          graph.edges.push(Edge {
            source: parent.name.clone(),
            target: c.name.clone(),
            label:  format!("level {above}"),
          });
        }
      }
    }

    graph
  }
}
