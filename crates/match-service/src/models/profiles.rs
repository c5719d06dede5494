use std::{cmp::Ordering, fmt::Display, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    Male,
    Female,
    Diverse,
}

impl Gender {
    pub const ALL: [Gender; 3] = [Gender::Male, Gender::Female, Gender::Diverse];

    /// Lowercase column values that parse to this gender. The candidate query
    /// matches `lower(btrim(gender))` against this list.
    pub fn aliases(&self) -> &'static [&'static str] {
        match self {
            Gender::Male => &["male", "m"],
            Gender::Female => &["female", "f"],
            Gender::Diverse => &["diverse", "d", "other"],
        }
    }
}

impl FromStr for Gender {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase();
        Gender::ALL
            .into_iter()
            .find(|g| g.aliases().contains(&normalized.as_str()))
            .ok_or_else(|| format!("unknown gender '{}'", normalized))
    }
}

impl Display for Gender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Gender::Male => write!(f, "male"),
            Gender::Female => write!(f, "female"),
            Gender::Diverse => write!(f, "diverse"),
        }
    }
}

/// Who a user wants to see while browsing. Unset or unrecognised values count as `Any`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case", tag = "type", content = "gender")]
pub enum GenderPreference {
    #[default]
    Any,
    Only(Gender),
}

impl GenderPreference {
    pub fn from_column(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            None | Some("") => GenderPreference::Any,
            Some(v) if v.eq_ignore_ascii_case("any") || v.eq_ignore_ascii_case("all") => {
                GenderPreference::Any
            }
            Some(v) => v
                .parse::<Gender>()
                .map(GenderPreference::Only)
                .unwrap_or_default(),
        }
    }

    pub fn accepts(&self, gender: Option<Gender>) -> bool {
        match self {
            GenderPreference::Any => true,
            GenderPreference::Only(wanted) => gender == Some(*wanted),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ProfileType {
    #[default]
    Person,
    /// Clubs, bars and other places that check in like users but are never browsed.
    Venue,
}

impl ProfileType {
    /// Lowercase column values that mark a venue.
    pub const VENUE_ALIASES: [&'static str; 3] = ["venue", "club", "location"];

    pub fn from_column(value: &str) -> Self {
        let normalized = value.trim().to_ascii_lowercase();
        if Self::VENUE_ALIASES.contains(&normalized.as_str()) {
            ProfileType::Venue
        } else {
            ProfileType::Person
        }
    }
}

#[derive(Clone, Debug, PartialEq, FromRow)]
pub struct ProfileRow {
    pub id: Uuid,
    pub display_name: String,
    pub gender: Option<String>,
    pub gender_preference: Option<String>,
    pub profile_type: String,
    pub avatar_url: Option<String>,
    pub last_active_at: Option<DateTime<Utc>>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Profile {
    pub id: Uuid,
    pub display_name: String,
    pub gender: Option<Gender>,
    pub gender_preference: GenderPreference,
    pub profile_type: ProfileType,
    pub avatar_url: Option<String>,
    pub last_active_at: Option<DateTime<Utc>>,
}

impl From<ProfileRow> for Profile {
    fn from(row: ProfileRow) -> Self {
        Profile {
            id: row.id,
            display_name: row.display_name,
            gender: row.gender.as_deref().and_then(|g| g.parse().ok()),
            gender_preference: GenderPreference::from_column(row.gender_preference.as_deref()),
            profile_type: ProfileType::from_column(&row.profile_type),
            avatar_url: row.avatar_url,
            last_active_at: row.last_active_at,
        }
    }
}

impl Profile {
    pub fn has_photo(&self) -> bool {
        self.avatar_url
            .as_deref()
            .is_some_and(|url| !url.trim().is_empty())
    }

    /// Most recently active first, never-active last, then by id.
    pub fn cmp_activity(&self, other: &Profile) -> Ordering {
        match (self.last_active_at, other.last_active_at) {
            (Some(a), Some(b)) => b.cmp(&a),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        }
        .then_with(|| self.id.cmp(&other.id))
    }
}

/// A profile surfaced while browsing.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    pub id: Uuid,
    pub display_name: String,
    pub gender: Option<Gender>,
    pub avatar_url: String,
    pub last_active_at: Option<DateTime<Utc>>,
}

impl From<Profile> for Candidate {
    fn from(profile: Profile) -> Self {
        Candidate {
            id: profile.id,
            display_name: profile.display_name,
            gender: profile.gender,
            avatar_url: profile.avatar_url.unwrap_or_default(),
            last_active_at: profile.last_active_at,
        }
    }
}

#[derive(Clone, Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query, rename_all = "camelCase")]
pub struct CandidateOptions {
    /// Leave out profiles the caller already liked.
    #[serde(default)]
    #[param(default = false)]
    pub exclude_liked: bool,
    /// Clamped to the configured page size.
    pub limit: Option<usize>,
}

/// Filter pushed down to the profile store.
#[derive(Clone, Debug, PartialEq)]
pub struct CandidateQuery {
    pub viewer: Uuid,
    pub gender: Option<Gender>,
    pub exclude: Vec<Uuid>,
    pub limit: usize,
}

impl CandidateQuery {
    /// The row filter a store applies before ranking and `LIMIT`.
    pub fn admits(&self, profile: &Profile) -> bool {
        profile.id != self.viewer
            && profile.profile_type == ProfileType::Person
            && profile.has_photo()
            && self.preference().accepts(profile.gender)
            && !self.exclude.contains(&profile.id)
    }

    pub fn preference(&self) -> GenderPreference {
        self.gender
            .map_or(GenderPreference::Any, GenderPreference::Only)
    }

    /// Values bound to the gender predicate of the candidate query.
    pub fn gender_aliases(&self) -> Option<Vec<String>> {
        self.gender
            .map(|g| g.aliases().iter().map(|a| a.to_string()).collect())
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;
    use rstest::rstest;

    use super::*;

    fn profile(last_active_at: Option<DateTime<Utc>>) -> Profile {
        Profile {
            id: Uuid::new_v4(),
            display_name: "someone".to_string(),
            gender: None,
            gender_preference: GenderPreference::Any,
            profile_type: ProfileType::Person,
            avatar_url: Some("https://cdn.example/a.jpg".to_string()),
            last_active_at,
        }
    }

    #[rstest]
    #[case(None, GenderPreference::Any)]
    #[case(Some(""), GenderPreference::Any)]
    #[case(Some("any"), GenderPreference::Any)]
    #[case(Some("ALL"), GenderPreference::Any)]
    #[case(Some("female"), GenderPreference::Only(Gender::Female))]
    #[case(Some(" Male "), GenderPreference::Only(Gender::Male))]
    #[case(Some("nonsense"), GenderPreference::Any)]
    fn test_gender_preference_from_column(
        #[case] column: Option<&str>,
        #[case] expected: GenderPreference,
    ) {
        assert_eq!(GenderPreference::from_column(column), expected);
    }

    #[rstest]
    #[case("F", Some(Gender::Female))]
    #[case(" female ", Some(Gender::Female))]
    #[case("m", Some(Gender::Male))]
    #[case("Other", Some(Gender::Diverse))]
    #[case("x", None)]
    fn test_gender_parses_column_aliases(#[case] column: &str, #[case] expected: Option<Gender>) {
        assert_eq!(column.parse::<Gender>().ok(), expected);
    }

    #[test]
    fn test_alias_tables_agree_with_parsers() {
        for gender in Gender::ALL {
            for alias in gender.aliases() {
                assert_eq!(alias.parse::<Gender>(), Ok(gender));
                assert_eq!(alias.to_ascii_lowercase(), *alias);
            }
            assert!(gender.aliases().contains(&gender.to_string().as_str()));
        }
        for alias in ProfileType::VENUE_ALIASES {
            assert_eq!(ProfileType::from_column(alias), ProfileType::Venue);
        }
    }

    #[test]
    fn test_query_binds_every_alias_of_the_wanted_gender() {
        let mut query = CandidateQuery {
            viewer: Uuid::new_v4(),
            gender: None,
            exclude: Vec::new(),
            limit: 10,
        };
        assert_eq!(query.gender_aliases(), None);

        query.gender = Some(Gender::Female);
        assert_eq!(
            query.gender_aliases(),
            Some(vec!["female".to_string(), "f".to_string()])
        );
    }

    #[test]
    fn test_query_admits() {
        let viewer = profile(None);
        let mut query = CandidateQuery {
            viewer: viewer.id,
            gender: Some(Gender::Female),
            exclude: Vec::new(),
            limit: 10,
        };

        let mut woman = profile(None);
        woman.gender = Some(Gender::Female);
        assert!(query.admits(&woman));
        assert!(!query.admits(&viewer));

        let mut venue = woman.clone();
        venue.profile_type = ProfileType::Venue;
        assert!(!query.admits(&venue));

        let mut no_photo = woman.clone();
        no_photo.avatar_url = None;
        assert!(!query.admits(&no_photo));

        query.exclude.push(woman.id);
        assert!(!query.admits(&woman));
    }

    #[rstest]
    #[case("venue", ProfileType::Venue)]
    #[case(" Venue", ProfileType::Venue)]
    #[case("Club", ProfileType::Venue)]
    #[case("person", ProfileType::Person)]
    #[case("", ProfileType::Person)]
    fn test_profile_type_from_column(#[case] column: &str, #[case] expected: ProfileType) {
        assert_eq!(ProfileType::from_column(column), expected);
    }

    #[test]
    fn test_preference_accepts() {
        let only_female = GenderPreference::Only(Gender::Female);
        assert!(only_female.accepts(Some(Gender::Female)));
        assert!(!only_female.accepts(Some(Gender::Male)));
        assert!(!only_female.accepts(None));
        assert!(GenderPreference::Any.accepts(None));
    }

    #[test]
    fn test_has_photo() {
        let mut p = profile(None);
        assert!(p.has_photo());
        p.avatar_url = Some("   ".to_string());
        assert!(!p.has_photo());
        p.avatar_url = None;
        assert!(!p.has_photo());
    }

    #[test]
    fn test_cmp_activity_orders_recent_first_then_id() {
        let now = Utc::now();
        let recent = profile(Some(now));
        let older = profile(Some(now - Duration::hours(3)));
        let never = profile(None);
        let mut tied_a = profile(Some(now));
        let mut tied_b = profile(Some(now));
        tied_a.id = Uuid::from_u128(1);
        tied_b.id = Uuid::from_u128(2);

        assert_eq!(recent.cmp_activity(&older), Ordering::Less);
        assert_eq!(never.cmp_activity(&older), Ordering::Greater);
        assert_eq!(tied_a.cmp_activity(&tied_b), Ordering::Less);
    }
}
