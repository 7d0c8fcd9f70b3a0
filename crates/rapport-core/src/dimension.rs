//! Dimensions: the axes along which contacts are related.
//!
//! A comparison dimension is judged by the oracle and yields similarity edges.
//! A grouping dimension is purely categorical and yields token groups.
//! A view dimension is drawn straight from contact attributes on request and
//! stores nothing.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoStaticStr};

use crate::{Error, contact::Field};

// ─── Comparison ──────────────────────────────────────────────────────────────

#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  Serialize,
  Deserialize,
  Display,
  EnumIter,
  EnumString,
  IntoStaticStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ComparisonDimension {
  Interests,
  Goals,
  Skills,
}

impl ComparisonDimension {
  /// The contact attribute compared along this dimension.
  pub fn field(self) -> Field {
    match self {
      Self::Interests => Field::Interests,
      Self::Goals => Field::CareerGoals,
      Self::Skills => Field::Skills,
    }
  }

  /// Name of the edge table backing this dimension.
  pub fn table(self) -> &'static str {
    match self {
      Self::Interests => "interest_edges",
      Self::Goals => "goal_edges",
      Self::Skills => "skill_edges",
    }
  }

  /// Plural noun used in oracle instructions.
  pub fn noun(self) -> &'static str {
    match self {
      Self::Interests => "interests",
      Self::Goals => "career goals",
      Self::Skills => "skills",
    }
  }

  /// Two near-miss phrasings that should still count as shared.
  pub fn similarity_hint(self) -> (&'static str, &'static str) {
    match self {
      Self::Interests => ("math", "competitive math"),
      Self::Goals => ("become muscular", "bench 215"),
      Self::Skills => ("coding in java", "building a backend"),
    }
  }
}

// ─── Grouping ────────────────────────────────────────────────────────────────

#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  Serialize,
  Deserialize,
  Display,
  EnumIter,
  EnumString,
  IntoStaticStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum GroupDimension {
  Company,
  PreviousCompany,
  College,
  HighSchool,
  Industry,
}

impl GroupDimension {
  pub fn field(self) -> Field {
    match self {
      Self::Company => Field::CurrentCompany,
      Self::PreviousCompany => Field::PreviousCompanies,
      Self::College => Field::College,
      Self::HighSchool => Field::HighSchool,
      Self::Industry => Field::Industry,
    }
  }

  /// Name of the group table backing this dimension.
  pub fn table(self) -> &'static str {
    match self {
      Self::Company => "company_groups",
      Self::PreviousCompany => "previous_company_groups",
      Self::College => "college_groups",
      Self::HighSchool => "high_school_groups",
      Self::Industry => "industry_groups",
    }
  }
}

// ─── View ────────────────────────────────────────────────────────────────────

#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  Serialize,
  Deserialize,
  Display,
  EnumIter,
  EnumString,
  IntoStaticStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ViewDimension {
  /// Contacts sharing a location form a clique.
  Location,
  /// Contacts tiered by their 1 to 10 talent rating.
  TalentRating,
  /// Contacts tiered by their 1 to 10 closeness.
  Closeness,
}

impl ViewDimension {
  pub fn field(self) -> Field {
    match self {
      Self::Location => Field::Location,
      Self::TalentRating => Field::TalentRating,
      Self::Closeness => Field::Closeness,
    }
  }
}

// ─── Any ─────────────────────────────────────────────────────────────────────

/// Any dimension, as named on the command line or in a URL path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dimension {
  Comparison(ComparisonDimension),
  Grouping(GroupDimension),
  View(ViewDimension),
}

impl FromStr for Dimension {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    let s = s.trim();
    if let Ok(d) = s.parse::<ComparisonDimension>() {
      return Ok(Self::Comparison(d));
    }
    if let Ok(d) = s.parse::<GroupDimension>() {
      return Ok(Self::Grouping(d));
    }
    s.parse::<ViewDimension>()
      .map(Self::View)
      .map_err(|_| Error::UnknownDimension(s.to_owned()))
  }
}

impl fmt::Display for Dimension {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Comparison(d) => fmt::Display::fmt(d, f),
      Self::Grouping(d) => fmt::Display::fmt(d, f),
      Self::View(d) => fmt::Display::fmt(d, f),
    }
  }
}

#[cfg(test)]
mod tests {
  use std::collections::HashSet;

  use strum::IntoEnumIterator as _;

  use super::*;

  #[test]
  fn dimension_names_round_trip() {
    for d in ComparisonDimension::iter() {
      let parsed: Dimension = d.to_string().parse().unwrap();
      assert_eq!(parsed, Dimension::Comparison(d));
    }
    for d in GroupDimension::iter() {
      let parsed: Dimension = d.to_string().parse().unwrap();
      assert_eq!(parsed, Dimension::Grouping(d));
    }
    for d in ViewDimension::iter() {
      let parsed: Dimension = d.to_string().parse().unwrap();
      assert_eq!(parsed, Dimension::View(d));
    }
    assert_eq!(
      "talent_rating".parse::<Dimension>().unwrap(),
      Dimension::View(ViewDimension::TalentRating),
    );
  }

  #[test]
  fn unknown_dimension_is_an_error() {
    let err = "talent".parse::<Dimension>().unwrap_err();
    assert!(matches!(err, Error::UnknownDimension(ref s) if s == "talent"));
  }

  #[test]
  fn tables_are_distinct() {
    let mut seen = HashSet::new();
    for d in ComparisonDimension::iter() {
      assert!(seen.insert(d.table()));
    }
    for d in GroupDimension::iter() {
      assert!(seen.insert(d.table()));
    }
  }

  #[test]
  fn dimensions_select_expected_fields() {
    assert_eq!(ComparisonDimension::Goals.field(), Field::CareerGoals);
    assert_eq!(GroupDimension::Company.field(), Field::CurrentCompany);
    assert_eq!(GroupDimension::PreviousCompany.field(), Field::PreviousCompanies);
    assert_eq!(ViewDimension::Location.field(), Field::Location);
  }
}
