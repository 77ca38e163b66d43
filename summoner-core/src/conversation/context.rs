//! Conversation context carried between turns

use serde::{Deserialize, Serialize};
use std::fmt;

/// Lane or position on the map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Top,
    Jungle,
    Mid,
    Bot,
    Support,
}

impl Role {
    pub const ALL: [Role; 5] = [Role::Top, Role::Jungle, Role::Mid, Role::Bot, Role::Support];

    /// Exact token match (`"mid"`, `"support"`, …).
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "top" => Some(Role::Top),
            "jungle" => Some(Role::Jungle),
            "mid" => Some(Role::Mid),
            "bot" => Some(Role::Bot),
            "support" => Some(Role::Support),
            _ => None,
        }
    }

    /// Usual position for a champion class tag.
    pub fn from_class_tag(tag: &str) -> Option<Self> {
        match tag {
            "Marksman" => Some(Role::Bot),
            "Support" => Some(Role::Support),
            "Mage" | "Assassin" => Some(Role::Mid),
            "Tank" | "Fighter" => Some(Role::Top),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Top => "top",
            Role::Jungle => "jungle",
            Role::Mid => "mid",
            Role::Bot => "bot",
            Role::Support => "support",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Self-reported experience of the player.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SkillLevel {
    #[default]
    Beginner,
    Intermediate,
    Advanced,
    Expert,
}

impl SkillLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            SkillLevel::Beginner => "beginner",
            SkillLevel::Intermediate => "intermediate",
            SkillLevel::Advanced => "advanced",
            SkillLevel::Expert => "expert",
        }
    }

    /// French label used in prompts
    pub fn label(&self) -> &'static str {
        match self {
            SkillLevel::Beginner => "débutant",
            SkillLevel::Intermediate => "intermédiaire",
            SkillLevel::Advanced => "avancé",
            SkillLevel::Expert => "expert",
        }
    }
}

impl fmt::Display for SkillLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What the assistant remembers about the current conversation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConversationContext {
    /// Canonical identifier of the champion being discussed
    pub subject: Option<String>,
    pub role: Option<Role>,
    pub skill_level: SkillLevel,
    /// Label of the last answered intent or topic
    pub last_topic: Option<String>,
}

impl ConversationContext {
    pub fn new() -> Self {
        Self::default()
    }
}
