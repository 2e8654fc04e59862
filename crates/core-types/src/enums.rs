use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Folds a label to lowercase and drops separators, so that
/// "Static Post", "static_post" and "STATIC-POST" compare equal.
fn fold_label(value: &str) -> String {
    value
        .chars()
        .filter(|c| !matches!(c, ' ' | '_' | '-'))
        .flat_map(char::to_lowercase)
        .collect()
}

/// The media type of a published post, as reported by the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum MediaType {
    Image,
    Video,
    CarouselAlbum,
    Reel,
}

impl MediaType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaType::Image => "IMAGE",
            MediaType::Video => "VIDEO",
            MediaType::CarouselAlbum => "CAROUSEL_ALBUM",
            MediaType::Reel => "REELS",
        }
    }
}

impl FromStr for MediaType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match fold_label(s).as_str() {
            "image" => Ok(MediaType::Image),
            "video" => Ok(MediaType::Video),
            "carouselalbum" | "carousel" => Ok(MediaType::CarouselAlbum),
            "reel" | "reels" => Ok(MediaType::Reel),
            _ => Err(CoreError::UnknownVariant { kind: "media type", value: s.to_string() }),
        }
    }
}

/// The format of a planned post idea.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum PostFormat {
    Reel,
    Story,
    StaticPost,
    Carousel,
}

impl PostFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            PostFormat::Reel => "Reel",
            PostFormat::Story => "Story",
            PostFormat::StaticPost => "Static Post",
            PostFormat::Carousel => "Carousel",
        }
    }
}

impl FromStr for PostFormat {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match fold_label(s).as_str() {
            "reel" | "reels" => Ok(PostFormat::Reel),
            "story" | "stories" => Ok(PostFormat::Story),
            "staticpost" | "static" | "image" => Ok(PostFormat::StaticPost),
            "carousel" | "carouselalbum" => Ok(PostFormat::Carousel),
            _ => Err(CoreError::UnknownVariant { kind: "post format", value: s.to_string() }),
        }
    }
}

/// The voice a post idea is written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Tone {
    Professional,
    Casual,
    Humorous,
    Inspirational,
    Educational,
}

impl Tone {
    pub fn as_str(&self) -> &'static str {
        match self {
            Tone::Professional => "Professional",
            Tone::Casual => "Casual",
            Tone::Humorous => "Humorous",
            Tone::Inspirational => "Inspirational",
            Tone::Educational => "Educational",
        }
    }
}

impl FromStr for Tone {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match fold_label(s).as_str() {
            "professional" => Ok(Tone::Professional),
            "casual" => Ok(Tone::Casual),
            "humorous" | "funny" => Ok(Tone::Humorous),
            "inspirational" => Ok(Tone::Inspirational),
            "educational" => Ok(Tone::Educational),
            _ => Err(CoreError::UnknownVariant { kind: "tone", value: s.to_string() }),
        }
    }
}

/// Where a scheduled post idea came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum IdeaSource {
    /// Produced by the strategy generator.
    #[default]
    Generated,
    /// Entered by hand.
    Manual,
}

impl IdeaSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            IdeaSource::Generated => "generated",
            IdeaSource::Manual => "manual",
        }
    }
}

impl FromStr for IdeaSource {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match fold_label(s).as_str() {
            "generated" | "ai" => Ok(IdeaSource::Generated),
            "manual" => Ok(IdeaSource::Manual),
            _ => Err(CoreError::UnknownVariant { kind: "idea source", value: s.to_string() }),
        }
    }
}

// Serde and Display plumbing shared by all label enums.
macro_rules! label_conversions {
    ($($ty:ty),* $(,)?) => {
        $(
            impl fmt::Display for $ty {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    f.write_str(self.as_str())
                }
            }

            impl TryFrom<String> for $ty {
                type Error = CoreError;

                fn try_from(value: String) -> Result<Self, Self::Error> {
                    value.parse()
                }
            }

            impl From<$ty> for String {
                fn from(value: $ty) -> Self {
                    value.as_str().to_string()
                }
            }
        )*
    };
}

label_conversions!(MediaType, PostFormat, Tone, IdeaSource);
