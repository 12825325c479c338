//! Container kinds and the condition types each one supports

use crate::condition::normalize_type;
use crate::error::{FieldsError, Result};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Checks available to every kind
const CURRENT_USER: [&str; 4] = [
    "current_user_id",
    "current_user_role",
    "current_user_capability",
    "blog_id",
];

/// Where a group of fields is shown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContainerKind {
    PostMeta,
    TermMeta,
    UserMeta,
    CommentMeta,
    ThemeOptions,
    NavMenuItem,
    Network,
}

impl ContainerKind {
    pub const ALL: [ContainerKind; 7] = [
        ContainerKind::PostMeta,
        ContainerKind::TermMeta,
        ContainerKind::UserMeta,
        ContainerKind::CommentMeta,
        ContainerKind::ThemeOptions,
        ContainerKind::NavMenuItem,
        ContainerKind::Network,
    ];

    /// Parse a kind name, normalized like condition types
    pub fn parse(name: &str) -> Result<Self> {
        let normalized = normalize_type(name);
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == normalized)
            .ok_or_else(|| FieldsError::InvalidContainerType(name.to_string()))
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ContainerKind::PostMeta => "post_meta",
            ContainerKind::TermMeta => "term_meta",
            ContainerKind::UserMeta => "user_meta",
            ContainerKind::CommentMeta => "comment_meta",
            ContainerKind::ThemeOptions => "theme_options",
            ContainerKind::NavMenuItem => "nav_menu_item",
            ContainerKind::Network => "network",
        }
    }

    /// Types decided once per request, before the editor is rendered
    pub fn static_types(&self) -> &'static [&'static str] {
        const POST: [&str; 6] = [
            "post_id",
            "post_type",
            CURRENT_USER[0],
            CURRENT_USER[1],
            CURRENT_USER[2],
            CURRENT_USER[3],
        ];
        const TERM: [&str; 6] = [
            "term",
            "term_taxonomy",
            CURRENT_USER[0],
            CURRENT_USER[1],
            CURRENT_USER[2],
            CURRENT_USER[3],
        ];
        const USER: [&str; 5] = [
            "user_id",
            CURRENT_USER[0],
            CURRENT_USER[1],
            CURRENT_USER[2],
            CURRENT_USER[3],
        ];

        match self {
            ContainerKind::PostMeta => &POST,
            ContainerKind::TermMeta => &TERM,
            ContainerKind::UserMeta => &USER,
            ContainerKind::CommentMeta
            | ContainerKind::ThemeOptions
            | ContainerKind::NavMenuItem
            | ContainerKind::Network => &CURRENT_USER,
        }
    }

    /// Types that can change while the editor is open
    pub fn dynamic_types(&self) -> &'static [&'static str] {
        match self {
            ContainerKind::PostMeta => &[
                "post_parent_id",
                "post_ancestor_id",
                "post_format",
                "post_level",
                "post_template",
                "post_term",
            ],
            ContainerKind::TermMeta => &["term_level", "term_parent", "term_ancestor"],
            ContainerKind::UserMeta => &["user_role", "user_capability"],
            _ => &[],
        }
    }

    pub fn is_static(&self, condition_type: &str) -> bool {
        self.static_types().contains(&condition_type)
    }

    pub fn is_dynamic(&self, condition_type: &str) -> bool {
        self.dynamic_types().contains(&condition_type)
    }

    /// Accepts any spelling `normalize_type` folds to a supported type
    pub fn supports(&self, condition_type: &str) -> bool {
        let name = normalize_type(condition_type);
        self.is_static(&name) || self.is_dynamic(&name)
    }
}

impl FromStr for ContainerKind {
    type Err = FieldsError;

    fn from_str(s: &str) -> Result<Self> {
        ContainerKind::parse(s)
    }
}

impl fmt::Display for ContainerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for ContainerKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ContainerKind {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        ContainerKind::parse(&name).map_err(serde::de::Error::custom)
    }
}
