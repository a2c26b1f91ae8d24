use crate::data::lenient;
use serde::Deserialize;
use serde_json::{Map, Value};
use url::Url;

/// Record as served by the API. Every field may be missing.
#[derive(Deserialize, Debug, Default, Clone)]
#[serde(rename_all = "camelCase", default)]
pub struct RawStudent {
    #[serde(deserialize_with = "lenient")]
    pub name: Option<RawName>,
    #[serde(deserialize_with = "lenient")]
    pub mascot: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub media: Option<RawMedia>,
    #[serde(deserialize_with = "lenient")]
    pub acknowledgement: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub backgrounds: Option<RawBackgrounds>,
    #[serde(deserialize_with = "lenient")]
    pub courses: Option<Vec<Value>>,
    #[serde(deserialize_with = "lenient")]
    pub personal_statement: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub fun_fact: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub computer: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub quote: Option<RawQuote>,
    #[serde(deserialize_with = "lenient")]
    pub links: Option<Map<String, Value>>,
    #[serde(deserialize_with = "lenient")]
    pub divider: Option<String>,
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(rename_all = "camelCase", default)]
pub struct RawName {
    #[serde(deserialize_with = "lenient")]
    pub preferred: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub first: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub middle_initial: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub last: Option<String>,
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(rename_all = "camelCase", default)]
pub struct RawMedia {
    #[serde(deserialize_with = "lenient")]
    pub src: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub has_image: Option<bool>,
    #[serde(deserialize_with = "lenient")]
    pub caption: Option<String>,
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(default)]
pub struct RawBackgrounds {
    #[serde(deserialize_with = "lenient")]
    pub personal: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub professional: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub academic: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub subject: Option<String>,
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(default)]
pub struct RawCourse {
    #[serde(deserialize_with = "lenient")]
    pub dept: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub num: Option<Value>,
    #[serde(deserialize_with = "lenient")]
    pub name: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub code: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub reason: Option<String>,
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(default)]
pub struct RawQuote {
    #[serde(deserialize_with = "lenient")]
    pub text: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub author: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Student {
    pub display_name: String,
    pub mascot: Option<String>,
    pub image: Option<Image>,
    pub acknowledgement: Option<String>,
    pub backgrounds: Backgrounds,
    pub courses: Vec<Course>,
    pub personal_statement: Option<String>,
    pub fun_fact: Option<String>,
    pub computer: Option<String>,
    pub quote: Option<Quote>,
    pub links: Vec<Link>,
    pub divider: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Image {
    pub url: String,
    pub caption: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Backgrounds {
    pub personal: Option<String>,
    pub professional: Option<String>,
    pub academic: Option<String>,
    pub subject: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Course {
    pub dept: String,
    pub num: String,
    pub name: String,
    pub code: Option<String>,
    pub reason: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Quote {
    pub text: String,
    pub author: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    pub label: String,
    pub url: String,
}

pub const DEFAULT_DIVIDER: &str = "|";
pub const PLACEHOLDER_NAME: &str = "Student";

fn non_empty(s: Option<String>) -> Option<String> {
    s.filter(|s| !s.trim().is_empty())
}

impl RawName {
    /// Preferred-or-first, middle initial and last name, skipping blanks.
    pub fn display_name(&self) -> String {
        let given = self
            .preferred
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .or(self.first.as_deref());

        [given, self.middle_initial.as_deref(), self.last.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl RawMedia {
    fn resolve(self, origin: &Url) -> Option<Image> {
        if self.has_image != Some(true) {
            return None;
        }
        let src = non_empty(self.src)?;
        let src = src.trim();

        let url = match Url::parse(src) {
            Ok(absolute) if matches!(absolute.scheme(), "http" | "https") => src.to_string(),
            _ => match origin.join(src) {
                Ok(joined) => joined.to_string(),
                Err(e) => {
                    warn!(?e, ?src, "Unable to resolve image path against API origin");
                    return None;
                }
            },
        };

        Some(Image {
            url,
            caption: non_empty(self.caption),
        })
    }
}

impl RawCourse {
    fn normalize(self) -> Course {
        let num = match self.num {
            Some(Value::String(s)) => s,
            Some(Value::Number(n)) => n.to_string(),
            _ => String::new(),
        };

        Course {
            dept: self.dept.unwrap_or_default(),
            num,
            name: self.name.unwrap_or_default(),
            code: non_empty(self.code),
            reason: non_empty(self.reason),
        }
    }
}

impl Student {
    /// Pushes every default and derivation into one place, so nothing
    /// downstream needs to inspect the raw shape.
    pub fn normalize(raw: RawStudent, origin: &Url) -> Self {
        let RawStudent {
            name,
            mascot,
            media,
            acknowledgement,
            backgrounds,
            courses,
            personal_statement,
            fun_fact,
            computer,
            quote,
            links,
            divider,
        } = raw;

        let backgrounds = backgrounds.map_or_else(Backgrounds::default, |b| Backgrounds {
            personal: non_empty(b.personal),
            professional: non_empty(b.professional),
            academic: non_empty(b.academic),
            subject: non_empty(b.subject),
        });

        let quote = quote.and_then(|RawQuote { text, author }| {
            Some(Quote {
                text: non_empty(text)?,
                author: non_empty(author),
            })
        });

        let links = links
            .unwrap_or_default()
            .into_iter()
            .filter_map(|(label, url)| match url {
                Value::String(url) if !url.trim().is_empty() => Some(Link { label, url }),
                _ => None,
            })
            .collect();

        Self {
            display_name: name.as_ref().map(RawName::display_name).unwrap_or_default(),
            mascot: non_empty(mascot),
            image: media.and_then(|media| media.resolve(origin)),
            acknowledgement: non_empty(acknowledgement),
            backgrounds,
            courses: courses
                .unwrap_or_default()
                .into_iter()
                .filter_map(|course| RawCourse::deserialize(course).ok())
                .map(RawCourse::normalize)
                .collect(),
            personal_statement: non_empty(personal_statement),
            fun_fact: non_empty(fun_fact),
            computer: non_empty(computer),
            quote,
            links,
            divider: non_empty(divider).unwrap_or_else(|| DEFAULT_DIVIDER.to_string()),
        }
    }

    pub fn title_name(&self) -> &str {
        if self.display_name.is_empty() {
            PLACEHOLDER_NAME
        } else {
            &self.display_name
        }
    }
}

impl Backgrounds {
    /// Headed paragraphs that carry data, in display order.
    pub fn sections(&self) -> impl Iterator<Item = (&'static str, &str)> {
        [
            ("Personal Background", self.personal.as_deref()),
            ("Professional Background", self.professional.as_deref()),
            ("Academic Background", self.academic.as_deref()),
            ("Background in the Subject", self.subject.as_deref()),
        ]
        .into_iter()
        .filter_map(|(heading, text)| Some((heading, text?)))
    }
}
