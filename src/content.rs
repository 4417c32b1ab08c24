//! Static content of the site.
//!
//! Everything here is plain data: it is loaded once at startup and only read
//! afterwards.

use serde::Deserialize;

/// An external link.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Link {
    /// Text shown for the link.
    pub label: String,
    /// Target URL.
    pub url: String,
}

/// The site owner.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Profile {
    /// Name shown on the home page and in the document title.
    pub name: String,
    /// One line under the name.
    pub tagline: String,
    /// Short text shown on the left of the navigation bar.
    pub logo: String,
    /// Links shown on the home page.
    pub links: Vec<Link>,
}

/// The about page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct About {
    /// Heading of the page.
    pub title: String,
    /// Paragraphs, in order.
    pub paragraphs: Vec<String>,
}

/// A group of related skills.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SkillCategory {
    /// Name of the category.
    pub category: String,
    /// Optional description.
    #[serde(default)]
    pub description: String,
    /// Skills in this category.
    #[serde(default)]
    pub items: Vec<String>,
}

/// A project card.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Project {
    /// Project title.
    pub title: String,
    /// Optional description.
    #[serde(default)]
    pub description: String,
    /// Technologies used.
    #[serde(default)]
    pub tags: Vec<String>,
    /// Where to find the project.
    #[serde(default)]
    pub url: Option<String>,
}

/// A game entry.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Game {
    /// Game title.
    pub title: String,
    /// Optional description.
    #[serde(default)]
    pub description: String,
    /// Where to play.
    #[serde(default)]
    pub url: Option<String>,
}

/// Contact details.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Contact {
    /// Social media profiles.
    pub social: Vec<Link>,
    /// Email address.
    pub email: Option<String>,
    /// Phone number.
    pub phone: Option<String>,
    /// Postal or city address.
    pub address: Option<String>,
}

/// All the content rendered by the site.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SiteContent {
    /// The site owner.
    pub profile: Profile,
    /// The about page.
    pub about: About,
    /// Skill categories.
    pub skills: Vec<SkillCategory>,
    /// Projects.
    pub projects: Vec<Project>,
    /// Games.
    pub games: Vec<Game>,
    /// Contact details.
    pub contact: Contact,
}
