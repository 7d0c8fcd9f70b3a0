//! Contact: a person record in the network.
//!
//! Every attribute is free text and the empty string means "unset". `name` is
//! the natural key used to match incoming submissions against stored records.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use strum::{Display, EnumIter, EnumString, IntoEnumIterator as _, IntoStaticStr};

use crate::{Error, Result};

// ─── Record ──────────────────────────────────────────────────────────────────

/// A fully-populated contact record.
///
/// Multi-valued attributes (see [`FieldKind::Set`]) hold comma-delimited
/// token lists.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
  // Identity
  pub name:               String,
  pub email:              String,
  pub phone:              String,
  pub location:           String,
  // Employment
  pub current_company:    String,
  pub previous_companies: String,
  pub industry:           String,
  pub job_title:          String,
  // Relationship
  pub relationship_type:  String,
  pub closeness:          String,
  pub reliability:        String,
  // Background
  pub interests:          String,
  pub college:            String,
  pub high_school:        String,
  // Profile
  pub career_goals:       String,
  pub skills:             String,
  pub talent_rating:      String,
}

impl Contact {
  /// A contact with only its name set.
  pub fn named(name: impl Into<String>) -> Self {
    Self { name: name.into(), ..Self::default() }
  }

  pub fn get(&self, field: Field) -> &str {
    match field {
      Field::Name => &self.name,
      Field::Email => &self.email,
      Field::Phone => &self.phone,
      Field::Location => &self.location,
      Field::CurrentCompany => &self.current_company,
      Field::PreviousCompanies => &self.previous_companies,
      Field::Industry => &self.industry,
      Field::JobTitle => &self.job_title,
      Field::RelationshipType => &self.relationship_type,
      Field::Closeness => &self.closeness,
      Field::Reliability => &self.reliability,
      Field::Interests => &self.interests,
      Field::College => &self.college,
      Field::HighSchool => &self.high_school,
      Field::CareerGoals => &self.career_goals,
      Field::Skills => &self.skills,
      Field::TalentRating => &self.talent_rating,
    }
  }

  pub fn get_mut(&mut self, field: Field) -> &mut String {
    match field {
      Field::Name => &mut self.name,
      Field::Email => &mut self.email,
      Field::Phone => &mut self.phone,
      Field::Location => &mut self.location,
      Field::CurrentCompany => &mut self.current_company,
      Field::PreviousCompanies => &mut self.previous_companies,
      Field::Industry => &mut self.industry,
      Field::JobTitle => &mut self.job_title,
      Field::RelationshipType => &mut self.relationship_type,
      Field::Closeness => &mut self.closeness,
      Field::Reliability => &mut self.reliability,
      Field::Interests => &mut self.interests,
      Field::College => &mut self.college,
      Field::HighSchool => &mut self.high_school,
      Field::CareerGoals => &mut self.career_goals,
      Field::Skills => &mut self.skills,
      Field::TalentRating => &mut self.talent_rating,
    }
  }

  /// Builder-style setter, mostly useful in tests and importers.
  pub fn with(mut self, field: Field, value: impl Into<String>) -> Self {
    *self.get_mut(field) = value.into();
    self
  }
}

// ─── Fields ──────────────────────────────────────────────────────────────────

/// One of the seventeen contact attributes, in schema order.
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
pub enum Field {
  Name,
  Email,
  Phone,
  Location,
  CurrentCompany,
  PreviousCompanies,
  Industry,
  JobTitle,
  RelationshipType,
  Closeness,
  Reliability,
  Interests,
  College,
  HighSchool,
  CareerGoals,
  Skills,
  TalentRating,
}

/// How a field combines an existing value with an incoming one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
  /// Incoming value replaces the existing one.
  Scalar,
  /// Comma-delimited token set; incoming tokens are unioned in.
  Set,
}

impl Field {
  pub fn kind(self) -> FieldKind {
    match self {
      Field::PreviousCompanies
      | Field::Industry
      | Field::Skills
      | Field::CareerGoals
      | Field::Interests => FieldKind::Set,
      _ => FieldKind::Scalar,
    }
  }

  pub fn as_str(self) -> &'static str { self.into() }

  /// Human-readable name, e.g. `"Career Goals"`.
  pub fn label(self) -> &'static str {
    match self {
      Field::Name => "Name",
      Field::Email => "Email",
      Field::Phone => "Phone",
      Field::Location => "Location",
      Field::CurrentCompany => "Current Company",
      Field::PreviousCompanies => "Previous Companies",
      Field::Industry => "Industry",
      Field::JobTitle => "Job Title",
      Field::RelationshipType => "Relationship Type",
      Field::Closeness => "Closeness",
      Field::Reliability => "Reliability",
      Field::Interests => "Interests",
      Field::College => "College",
      Field::HighSchool => "High School",
      Field::CareerGoals => "Career Goals",
      Field::Skills => "Skills",
      Field::TalentRating => "Talent Rating",
    }
  }
}

// ─── Submission ──────────────────────────────────────────────────────────────

/// An incoming reconciliation request.
///
/// All fields are optional at the wire level so that a missing field can be
/// reported by name instead of being silently written as empty.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContactSubmission {
  pub name:               Option<String>,
  pub email:              Option<String>,
  pub phone:              Option<String>,
  pub location:           Option<String>,
  pub current_company:    Option<String>,
  pub previous_companies: Option<String>,
  pub industry:           Option<String>,
  pub job_title:          Option<String>,
  pub relationship_type:  Option<String>,
  pub closeness:          Option<String>,
  pub reliability:        Option<String>,
  pub interests:          Option<String>,
  pub college:            Option<String>,
  pub high_school:        Option<String>,
  pub career_goals:       Option<String>,
  pub skills:             Option<String>,
  pub talent_rating:      Option<String>,
}

fn require(value: Option<String>, field: Field) -> Result<String> {
  value.ok_or(Error::MergeFieldMissing(field))
}

impl ContactSubmission {
  /// Decode a submission from an arbitrary JSON body.
  ///
  /// A field present with a non-string value is reported by name; `null` is
  /// treated as absent.
  pub fn from_json(body: Value) -> Result<Self> {
    if let Value::Object(map) = &body {
      for field in Field::iter() {
        match map.get(field.as_str()) {
          None | Some(Value::Null | Value::String(_)) => {}
          Some(_) => {
            return Err(Error::InvalidField { field, reason: "expected a string".into() });
          }
        }
      }
    }
    Ok(serde_json::from_value(body)?)
  }

  /// Validate presence of every field and produce a [`Contact`].
  ///
  /// Fails on the first absent field in schema order, or if `name` is blank.
  pub fn into_contact(self) -> Result<Contact> {
    let contact = Contact {
      name:               require(self.name, Field::Name)?.trim().to_owned(),
      email:              require(self.email, Field::Email)?,
      phone:              require(self.phone, Field::Phone)?,
      location:           require(self.location, Field::Location)?,
      current_company:    require(self.current_company, Field::CurrentCompany)?,
      previous_companies: require(self.previous_companies, Field::PreviousCompanies)?,
      industry:           require(self.industry, Field::Industry)?,
      job_title:          require(self.job_title, Field::JobTitle)?,
      relationship_type:  require(self.relationship_type, Field::RelationshipType)?,
      closeness:          require(self.closeness, Field::Closeness)?,
      reliability:        require(self.reliability, Field::Reliability)?,
      interests:          require(self.interests, Field::Interests)?,
      college:            require(self.college, Field::College)?,
      high_school:        require(self.high_school, Field::HighSchool)?,
      career_goals:       require(self.career_goals, Field::CareerGoals)?,
      skills:             require(self.skills, Field::Skills)?,
      talent_rating:      require(self.talent_rating, Field::TalentRating)?,
    };

    if contact.name.is_empty() {
      return Err(Error::InvalidField {
        field:  Field::Name,
        reason: "must not be blank".into(),
      });
    }

    Ok(contact)
  }
}

impl From<Contact> for ContactSubmission {
  fn from(c: Contact) -> Self {
    Self {
      name:               Some(c.name),
      email:              Some(c.email),
      phone:              Some(c.phone),
      location:           Some(c.location),
      current_company:    Some(c.current_company),
      previous_companies: Some(c.previous_companies),
      industry:           Some(c.industry),
      job_title:          Some(c.job_title),
      relationship_type:  Some(c.relationship_type),
      closeness:          Some(c.closeness),
      reliability:        Some(c.reliability),
      interests:          Some(c.interests),
      college:            Some(c.college),
      high_school:        Some(c.high_school),
      career_goals:       Some(c.career_goals),
      skills:             Some(c.skills),
      talent_rating:      Some(c.talent_rating),
    }
  }
}
