//! Region-specific crisis support directory.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// A crisis support line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CrisisHotline {
    /// Service name.
    pub name: &'static str,
    /// Number to call or text.
    pub number: &'static str,
    /// Opening hours.
    pub available: &'static str,
    /// Whether the number accepts text messages.
    pub can_text: bool,
}

/// Crisis support available in one region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CrisisResources {
    /// Region code.
    pub region: Region,
    /// Display name of the region.
    pub name: &'static str,
    /// Support lines, most general first.
    pub hotlines: &'static [CrisisHotline],
    /// Web chat services.
    pub web_chats: &'static [&'static str],
    /// Emergency services number.
    pub emergency: &'static str,
}

const fn hotline(name: &'static str, number: &'static str, can_text: bool) -> CrisisHotline {
    CrisisHotline {
        name,
        number,
        available: "24/7",
        can_text,
    }
}

static NEW_ZEALAND: CrisisResources = CrisisResources {
    region: Region::Nz,
    name: "New Zealand",
    hotlines: &[
        hotline("Need to Talk?", "1737", true),
        hotline("Lifeline", "0800 543 354", false),
        hotline("Depression Helpline", "0800 111 777", false),
        hotline("Youthline", "0800 376 633", true),
    ],
    web_chats: &[
        "https://1737.org.nz/chat",
        "https://www.lifeline.org.nz/services/chat",
        "https://www.youthline.co.nz/web-chat",
    ],
    emergency: "111",
};

static AUSTRALIA: CrisisResources = CrisisResources {
    region: Region::Au,
    name: "Australia",
    hotlines: &[
        hotline("Lifeline", "13 11 14", true),
        hotline("Beyond Blue", "1300 22 4636", false),
        hotline("Kids Helpline", "1800 55 1800", false),
    ],
    web_chats: &["https://www.lifeline.org.au/crisis-chat/"],
    emergency: "000",
};

static UNITED_STATES: CrisisResources = CrisisResources {
    region: Region::Us,
    name: "United States",
    hotlines: &[
        hotline("988 Suicide & Crisis Lifeline", "988", true),
        hotline("Crisis Text Line", "741741", true),
    ],
    web_chats: &["https://988lifeline.org/chat"],
    emergency: "911",
};

static UNITED_KINGDOM: CrisisResources = CrisisResources {
    region: Region::Uk,
    name: "United Kingdom",
    hotlines: &[
        hotline("Samaritans", "116 123", false),
        hotline("Shout", "85258", true),
    ],
    web_chats: &[],
    emergency: "999",
};

static CANADA: CrisisResources = CrisisResources {
    region: Region::Ca,
    name: "Canada",
    hotlines: &[hotline("9-8-8 Suicide Crisis Helpline", "988", true)],
    web_chats: &[],
    emergency: "911",
};

/// Region with a crisis resource table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Region {
    /// New Zealand.
    #[default]
    Nz,
    /// Australia.
    Au,
    /// United States.
    Us,
    /// United Kingdom.
    Uk,
    /// Canada.
    Ca,
}

impl Region {
    /// Every supported region, in settings order.
    pub const ALL: [Self; 5] = [Self::Nz, Self::Au, Self::Us, Self::Uk, Self::Ca];

    /// Returns the region code used in settings.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Nz => "NZ",
            Self::Au => "AU",
            Self::Us => "US",
            Self::Uk => "UK",
            Self::Ca => "CA",
        }
    }

    /// Returns the crisis resources for this region.
    ///
    /// # Examples
    ///
    /// ```
    /// use aimate::safety::domain::Region;
    ///
    /// let resources = Region::Nz.resources();
    /// assert_eq!(resources.emergency, "111");
    /// assert!(resources.hotlines.iter().any(|line| line.number == "1737"));
    /// ```
    #[must_use]
    pub const fn resources(self) -> &'static CrisisResources {
        match self {
            Self::Nz => &NEW_ZEALAND,
            Self::Au => &AUSTRALIA,
            Self::Us => &UNITED_STATES,
            Self::Uk => &UNITED_KINGDOM,
            Self::Ca => &CANADA,
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Error returned for unsupported region codes.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unsupported region code: {0}")]
pub struct ParseRegionError(pub String);

impl FromStr for Region {
    type Err = ParseRegionError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let code = raw.trim();
        if code.eq_ignore_ascii_case("GB") {
            return Ok(Self::Uk);
        }
        Self::ALL
            .into_iter()
            .find(|region| region.code().eq_ignore_ascii_case(code))
            .ok_or_else(|| ParseRegionError(raw.to_owned()))
    }
}

impl TryFrom<String> for Region {
    type Error = ParseRegionError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Region> for String {
    fn from(value: Region) -> Self {
        value.code().to_owned()
    }
}
