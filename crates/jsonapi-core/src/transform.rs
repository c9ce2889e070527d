// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Key and type naming transforms.
//!
//! The transform set is closed; each variant maps to a pure string function.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Naming transform applied to output keys and resource type tokens.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyTransform {
    /// Leave names as they are.
    #[default]
    None,
    /// `video_clip` → `VideoClip`.
    Camel,
    /// `video_clip` → `videoClip`.
    CamelLower,
    /// `video_clip` → `video-clip`.
    Dash,
    /// `VideoClip` → `video_clip`.
    Underscore,
}

impl KeyTransform {
    /// Applies the transform to `input`.
    pub fn apply(self, input: &str) -> String {
        match self {
            Self::None => input.to_owned(),
            Self::Camel => camelize(input, true),
            Self::CamelLower => camelize(input, false),
            Self::Dash => dasherize(input),
            Self::Underscore => underscore(input),
        }
    }

    /// Configuration name of the transform.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Camel => "camel",
            Self::CamelLower => "camel_lower",
            Self::Dash => "dash",
            Self::Underscore => "underscore",
        }
    }
}

impl fmt::Display for KeyTransform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for KeyTransform {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "none" => Ok(Self::None),
            "camel" => Ok(Self::Camel),
            "camel_lower" => Ok(Self::CamelLower),
            "dash" => Ok(Self::Dash),
            "underscore" => Ok(Self::Underscore),
            other => Err(ConfigError::UnknownTransform(other.to_owned())),
        }
    }
}

/// Joins `_`-separated words into camel case.
///
/// Words after the first are capitalized with the remainder lowercased.
/// `upper_first` controls the case of the very first character.
pub fn camelize(input: &str, upper_first: bool) -> String {
    let mut out = String::with_capacity(input.len());
    let mut words = input.split('_');
    if let Some(first) = words.next() {
        let mut chars = first.chars();
        if let Some(c) = chars.next() {
            if upper_first {
                out.extend(c.to_uppercase());
            } else {
                out.extend(c.to_lowercase());
            }
            out.push_str(chars.as_str());
        }
    }
    for word in words {
        let mut chars = word.chars();
        if let Some(c) = chars.next() {
            out.extend(c.to_uppercase());
            out.push_str(&chars.as_str().to_lowercase());
        }
    }
    out
}

/// Replaces underscores with dashes.
pub fn dasherize(input: &str) -> String {
    input.replace('_', "-")
}

/// Lower snake case: word boundaries in camel case become `_`, dashes become `_`.
///
/// Acronym runs stay together: `HTMLPage` → `html_page`.
pub fn underscore(input: &str) -> String {
    let chars: Vec<char> = input.chars().collect();
    let mut out = String::with_capacity(input.len() + 4);
    for (i, &c) in chars.iter().enumerate() {
        if c == '-' {
            out.push('_');
            continue;
        }
        if c.is_ascii_uppercase() && i > 0 {
            let prev = chars[i - 1];
            let next_is_lower = chars.get(i + 1).is_some_and(char::is_ascii_lowercase);
            let boundary = prev.is_ascii_lowercase()
                || prev.is_ascii_digit()
                || (prev.is_ascii_uppercase() && next_is_lower);
            if boundary {
                out.push('_');
            }
        }
        out.push(c.to_ascii_lowercase());
    }
    out
}

/// Strips module qualification and generic arguments from a type path.
///
/// `app::media::Video` → `Video`, `Media::Video` → `Video`,
/// `app::Wrapper<app::Video>` → `Wrapper`.
pub fn demodulize(path: &str) -> &str {
    let base = path.split('<').next().unwrap_or(path);
    base.rsplit("::").next().unwrap_or(base)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn camelize_variants() {
        assert_eq!(camelize("video_clip", true), "VideoClip");
        assert_eq!(camelize("video_clip", false), "videoClip");
        assert_eq!(camelize("post", true), "Post");
        assert_eq!(camelize("some_URL", true), "SomeUrl");
        assert_eq!(camelize("a__b", true), "AB");
        assert_eq!(camelize("", true), "");
    }

    #[test]
    fn underscore_splits_words_and_acronyms() {
        assert_eq!(underscore("VideoClip"), "video_clip");
        assert_eq!(underscore("HTMLPage"), "html_page");
        assert_eq!(underscore("Video"), "video");
        assert_eq!(underscore("video-clip"), "video_clip");
        assert_eq!(underscore("Mp4File"), "mp4_file");
    }

    #[test]
    fn demodulize_handles_rust_and_nested_paths() {
        assert_eq!(demodulize("app::media::Video"), "Video");
        assert_eq!(demodulize("Media::Video"), "Video");
        assert_eq!(demodulize("Video"), "Video");
        assert_eq!(demodulize("app::Wrapper<app::Video>"), "Wrapper");
    }

    #[test]
    fn apply_dispatches_by_variant() {
        assert_eq!(KeyTransform::None.apply("blog_post"), "blog_post");
        assert_eq!(KeyTransform::Dash.apply("blog_post"), "blog-post");
        assert_eq!(KeyTransform::Camel.apply("blog_post"), "BlogPost");
        assert_eq!(KeyTransform::CamelLower.apply("blog_post"), "blogPost");
        assert_eq!(KeyTransform::Underscore.apply("BlogPost"), "blog_post");
    }

    #[test]
    fn parse_known_names_and_reject_others() {
        for t in [
            KeyTransform::None,
            KeyTransform::Camel,
            KeyTransform::CamelLower,
            KeyTransform::Dash,
            KeyTransform::Underscore,
        ] {
            assert_eq!(t.as_str().parse::<KeyTransform>().unwrap(), t);
        }
        let err = "kebab".parse::<KeyTransform>().unwrap_err();
        assert!(matches!(err, ConfigError::UnknownTransform(ref name) if name == "kebab"));
    }

    #[test]
    fn serde_names_match_config_names() {
        let parsed: KeyTransform = serde_json::from_str("\"camel_lower\"").unwrap();
        assert_eq!(parsed, KeyTransform::CamelLower);
        assert_eq!(serde_json::to_string(&KeyTransform::Dash).unwrap(), "\"dash\"");
    }
}
