//! Parsing of hierarchical resource names.
//!
//! Notification rules live under a project or an organization and are named
//! `{parentType}/{parentID}/rules/{ruleID}`, for example
//! `projects/c0md3mm0c7bet3vico8g/rules/cnrqv9pgq5bc73c5bjog`.

use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

const RULES_SEGMENT: &str = "rules";

/// The kind of collection that owns a notification rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParentType {
    /// `projects/{id}`
    Projects,
    /// `organizations/{id}`
    Organizations,
}

impl ParentType {
    /// The name segment used on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Projects => "projects",
            Self::Organizations => "organizations",
        }
    }

    fn from_segment(segment: &str) -> Option<Self> {
        match segment {
            "projects" => Some(Self::Projects),
            "organizations" => Some(Self::Organizations),
            _ => None,
        }
    }
}

impl fmt::Display for ParentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A project or organization that owns a collection of rules.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Parent {
    /// Whether this is a project or an organization.
    pub kind: ParentType,
    /// The project or organization ID.
    pub id: String,
}

impl Parent {
    /// Parse a parent of the form `{parentType}/{parentID}`.
    pub fn parse(name: &str) -> Result<Self> {
        let parts: Vec<&str> = name.split('/').collect();
        if parts.len() != 2 {
            return Err(Error::InvalidResourceName(name.to_string()));
        }
        let kind = ParentType::from_segment(parts[0])
            .ok_or_else(|| Error::InvalidResourceName(name.to_string()))?;
        Ok(Self {
            kind,
            id: parts[1].to_string(),
        })
    }
}

impl fmt::Display for Parent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.kind, self.id)
    }
}

impl FromStr for Parent {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// A parsed notification rule name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RuleName {
    /// The owning project or organization.
    pub parent: Parent,
    /// The rule ID within the parent.
    pub rule_id: String,
}

impl RuleName {
    /// Parse `{parentType}/{parentID}/rules/{ruleID}`.
    ///
    /// The name must have exactly four `/`-separated segments, the first of
    /// which is `projects` or `organizations` and the third `rules`.
    pub fn parse(name: &str) -> Result<Self> {
        let parts: Vec<&str> = name.split('/').collect();
        if parts.len() != 4 {
            return Err(Error::InvalidResourceName(name.to_string()));
        }

        let kind = ParentType::from_segment(parts[0])
            .ok_or_else(|| Error::InvalidResourceName(name.to_string()))?;

        if parts[2] != RULES_SEGMENT {
            return Err(Error::InvalidResourceName(name.to_string()));
        }

        Ok(Self {
            parent: Parent {
                kind,
                id: parts[1].to_string(),
            },
            rule_id: parts[3].to_string(),
        })
    }

    /// The parent type segment.
    pub fn parent_type(&self) -> ParentType {
        self.parent.kind
    }

    /// The parent ID segment.
    pub fn parent_id(&self) -> &str {
        &self.parent.id
    }
}

impl fmt::Display for RuleName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.parent, RULES_SEGMENT, self.rule_id)
    }
}

impl FromStr for RuleName {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// Split a generic four-segment name `{a}/{aID}/{b}/{bID}` into `(aID, bID)`.
///
/// Used for contacts (`projects/{p}/contacts/{c}`) and contact groups
/// (`organizations/{o}/contactGroups/{g}`), where only the IDs matter.
pub fn parse_resource_name(name: &str) -> Result<(String, String)> {
    let parts: Vec<&str> = name.split('/').collect();
    if parts.len() != 4 {
        return Err(Error::InvalidResourceName(name.to_string()));
    }
    Ok((parts[1].to_string(), parts[3].to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_project_rule() {
        let name = RuleName::parse("projects/p1/rules/r1").unwrap();
        assert_eq!(name.parent_type(), ParentType::Projects);
        assert_eq!(name.parent_id(), "p1");
        assert_eq!(name.rule_id, "r1");
        assert_eq!(name.parent.to_string(), "projects/p1");
    }

    #[test]
    fn test_parse_organization_rule() {
        let name: RuleName = "organizations/o1/rules/r9".parse().unwrap();
        assert_eq!(name.parent_type(), ParentType::Organizations);
        assert_eq!(name.parent_id(), "o1");
        assert_eq!(name.rule_id, "r9");
        assert_eq!(name.to_string(), "organizations/o1/rules/r9");
    }

    #[test]
    fn test_parse_rejects_wrong_segment_count() {
        for name in [
            "",
            "projects",
            "projects/p1",
            "projects/p1/rules",
            "projects/p1/rules/r1/extra",
        ] {
            let err = RuleName::parse(name).unwrap_err();
            assert!(
                matches!(err, Error::InvalidResourceName(ref n) if n == name),
                "expected failure for {:?}",
                name
            );
        }
    }

    #[test]
    fn test_parse_rejects_unknown_parent_type() {
        assert!(RuleName::parse("devices/d1/rules/r1").is_err());
        assert!(RuleName::parse("Projects/p1/rules/r1").is_err());
        assert!(RuleName::parse("project/p1/rules/r1").is_err());
    }

    #[test]
    fn test_parse_rejects_missing_rules_marker() {
        assert!(RuleName::parse("projects/p1/contacts/c1").is_err());
        assert!(RuleName::parse("projects/p1/rule/r1").is_err());
    }

    #[test]
    fn test_parent_parse() {
        let parent = Parent::parse("organizations/o1").unwrap();
        assert_eq!(parent.kind, ParentType::Organizations);
        assert_eq!(parent.id, "o1");

        assert!(Parent::parse("projects").is_err());
        assert!(Parent::parse("devices/d1").is_err());
        assert!(Parent::parse("projects/p1/rules/r1").is_err());
    }

    #[test]
    fn test_parse_resource_name() {
        let (project, contact) = parse_resource_name("projects/p1/contacts/c1").unwrap();
        assert_eq!(project, "p1");
        assert_eq!(contact, "c1");

        let (org, group) = parse_resource_name("organizations/o1/contactGroups/g1").unwrap();
        assert_eq!(org, "o1");
        assert_eq!(group, "g1");

        assert!(parse_resource_name("projects/p1").is_err());
    }
}
