//! The closed set of supported type tags.
//!
//! Each [`TypeTag`] variant is bound to one pure validator. Tag names are
//! resolved through a static `match`; lookups are case-sensitive, so `int`
//! is not a supported tag.

use std::fmt;
use std::str::FromStr;

use crate::list::validate_list;
use crate::primitives;

/// A supported value type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeTag {
    Int,
    String,
    Boolean,
    List,
    Date,
    Email,
    Uuid,
    AuthToken,
}

impl TypeTag {
    pub const ALL: [TypeTag; 8] = [
        TypeTag::Int,
        TypeTag::String,
        TypeTag::Boolean,
        TypeTag::List,
        TypeTag::Date,
        TypeTag::Email,
        TypeTag::Uuid,
        TypeTag::AuthToken,
    ];

    /// Tags whose values must be double-quoted inside a list or object.
    pub const QUOTED: [TypeTag; 5] = [
        TypeTag::String,
        TypeTag::Date,
        TypeTag::Email,
        TypeTag::Uuid,
        TypeTag::AuthToken,
    ];

    /// Tags whose values must appear bare inside a list or object.
    pub const RAW: [TypeTag; 2] = [TypeTag::Int, TypeTag::Boolean];

    /// Wire name as it appears in learned models.
    pub fn name(&self) -> &'static str {
        match self {
            TypeTag::Int => "Int",
            TypeTag::String => "String",
            TypeTag::Boolean => "Boolean",
            TypeTag::List => "List",
            TypeTag::Date => "Date",
            TypeTag::Email => "Email",
            TypeTag::Uuid => "UUID",
            TypeTag::AuthToken => "Auth-Token",
        }
    }

    pub fn from_name(name: &str) -> Option<TypeTag> {
        match name {
            "Int" => Some(TypeTag::Int),
            "String" => Some(TypeTag::String),
            "Boolean" => Some(TypeTag::Boolean),
            "List" => Some(TypeTag::List),
            "Date" => Some(TypeTag::Date),
            "Email" => Some(TypeTag::Email),
            "UUID" => Some(TypeTag::Uuid),
            "Auth-Token" => Some(TypeTag::AuthToken),
            _ => None,
        }
    }

    /// Check a raw value against this tag.
    pub fn is_valid(&self, raw: &str) -> bool {
        (self.validator())(raw)
    }

    fn validator(&self) -> fn(&str) -> bool {
        match self {
            TypeTag::Int => primitives::is_int,
            TypeTag::String => primitives::is_string,
            TypeTag::Boolean => primitives::is_boolean,
            TypeTag::List => validate_list,
            TypeTag::Date => primitives::is_date,
            TypeTag::Email => primitives::is_email,
            TypeTag::Uuid => primitives::is_uuid,
            TypeTag::AuthToken => primitives::is_auth_token,
        }
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for TypeTag {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TypeTag::from_name(s).ok_or_else(|| format!("unsupported type tag: '{}'", s))
    }
}

// ── Name-based API ──────────────────────────────────────────────────

/// Whether `tag` names a supported type.
pub fn is_supported(tag: &str) -> bool {
    TypeTag::from_name(tag).is_some()
}

/// Validate `raw` against the tag named `tag`. Unknown tags fail.
pub fn validate(tag: &str, raw: &str) -> bool {
    TypeTag::from_name(tag).is_some_and(|t| t.is_valid(raw))
}

/// Validate `raw` against a list of allowed tag names, OR-combined.
///
/// An empty list places no constraint on the value. Unknown names in the
/// list never match.
pub fn validate_any<S: AsRef<str>>(raw: &str, tags: &[S]) -> bool {
    tags.is_empty() || tags.iter().any(|tag| validate(tag.as_ref(), raw))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_tag_round_trips_through_its_name() {
        for tag in TypeTag::ALL {
            assert_eq!(TypeTag::from_name(tag.name()), Some(tag));
            assert_eq!(tag.to_string().parse::<TypeTag>(), Ok(tag));
        }
    }

    #[test]
    fn quoting_families_are_disjoint_and_exclude_list() {
        for tag in TypeTag::QUOTED {
            assert!(!TypeTag::RAW.contains(&tag));
        }
        assert!(!TypeTag::QUOTED.contains(&TypeTag::List));
        assert!(!TypeTag::RAW.contains(&TypeTag::List));
        assert_eq!(TypeTag::QUOTED.len() + TypeTag::RAW.len() + 1, TypeTag::ALL.len());
    }

    #[test]
    fn lookup_is_case_sensitive() {
        assert!(is_supported("UUID"));
        assert!(is_supported("Auth-Token"));
        assert!(!is_supported("uuid"));
        assert!(!is_supported("int"));
        assert!(!is_supported("Float"));
        assert!(!is_supported(""));
    }

    #[test]
    fn unknown_tag_fails_closed() {
        assert!(!validate("Float", "1.5"));
        assert!(!validate("", "anything"));
    }

    #[test]
    fn validate_dispatches_by_name() {
        assert!(validate("Int", "42"));
        assert!(validate("Boolean", "false"));
        assert!(validate("List", "[1, \"a\"]"));
        assert!(validate("UUID", "46da6390-7c78-4a1c-9efa-7c0396067ce4"));
        assert!(!validate("Int", "\"42\""));
    }

    #[test]
    fn any_of_is_or_combined() {
        let id_types = ["Int", "UUID"];
        assert!(validate_any("12345", &id_types));
        assert!(validate_any("46da6390-7c78-4a1c-9efa-7c0396067ce4", &id_types));
        assert!(!validate_any("46da6390-7c78-4a1c-9efa-7c0396067ce4aaaaaaa", &id_types));

        let flexible = vec!["Int".to_string(), "String".to_string()];
        assert!(validate_any("SKU-999", &flexible));
    }

    #[test]
    fn empty_allowed_list_places_no_constraint() {
        let none: [&str; 0] = [];
        assert!(validate_any("whatever", &none));
    }

    #[test]
    fn unknown_names_in_list_never_match() {
        assert!(!validate_any("1", &["Float", "Decimal"]));
        assert!(validate_any("1", &["Float", "Int"]));
    }
}
