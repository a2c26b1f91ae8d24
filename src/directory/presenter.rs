use crate::{
    data::student::{Course, Link, Student},
    directory::visibility::SectionVisibility,
    maud_conveniences::{labelled, section_heading, subtitle},
};
use maud::{Markup, Render, html};

/// One record as it will be shown: every section already gated on both its
/// visibility flag and the presence of data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordView<'a> {
    pub title: Option<String>,
    pub acknowledgement: Option<&'a str>,
    pub figure: Option<Figure<'a>>,
    pub backgrounds: Vec<(&'static str, &'a str)>,
    pub courses: &'a [Course],
    pub personal_statement: Option<&'a str>,
    pub quote: Option<String>,
    pub fun_fact: Option<&'a str>,
    pub computer: Option<&'a str>,
    pub links: &'a [Link],
    pub divider: &'a str,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Figure<'a> {
    pub src: &'a str,
    pub alt: &'a str,
    pub caption: Option<&'a str>,
}

impl<'a> RecordView<'a> {
    pub fn compose(student: &'a Student, visibility: SectionVisibility) -> Self {
        let shows = |flag| visibility.contains(flag);
        let divider = student.divider.as_str();

        let mut title_parts = Vec::with_capacity(2);
        if shows(SectionVisibility::NAME) {
            title_parts.push(student.title_name());
        }
        if let Some(mascot) = student
            .mascot
            .as_deref()
            .filter(|_| shows(SectionVisibility::MASCOT))
        {
            title_parts.push(mascot);
        }
        let separator = format!(" {divider} ");
        let title = (!title_parts.is_empty()).then(|| title_parts.join(separator.as_str()));

        let figure = student
            .image
            .as_ref()
            .filter(|_| shows(SectionVisibility::IMAGE))
            .map(|image| Figure {
                src: &image.url,
                alt: image.caption.as_deref().unwrap_or(student.title_name()),
                caption: image.caption.as_deref(),
            });

        let backgrounds = if shows(SectionVisibility::BACKGROUNDS) {
            student.backgrounds.sections().collect()
        } else {
            Vec::new()
        };

        let quote = student
            .quote
            .as_ref()
            .filter(|_| shows(SectionVisibility::QUOTE))
            .map(|quote| match quote.author.as_deref() {
                Some(author) => format!("{} - {author}", quote.text),
                None => quote.text.clone(),
            });

        let extra = shows(SectionVisibility::EXTRA_INFO);

        Self {
            title,
            acknowledgement: student.acknowledgement.as_deref(),
            figure,
            backgrounds,
            courses: if shows(SectionVisibility::CLASSES) {
                student.courses.as_slice()
            } else {
                &[]
            },
            personal_statement: student
                .personal_statement
                .as_deref()
                .filter(|_| shows(SectionVisibility::PERSONAL_STATEMENT)),
            quote,
            fun_fact: student.fun_fact.as_deref().filter(|_| extra),
            computer: student.computer.as_deref().filter(|_| extra),
            links: if shows(SectionVisibility::LINKS) {
                student.links.as_slice()
            } else {
                &[]
            },
            divider,
        }
    }
}

impl Render for Course {
    fn render(&self) -> Markup {
        html! {
            li data-course=[self.code.as_deref()] {
                strong {(self.dept) " " (self.num)}
                " - "
                (self.name)
                @if let Some(reason) = &self.reason {
                    " (" (reason) ")"
                }
            }
        }
    }
}

impl Render for RecordView<'_> {
    fn render(&self) -> Markup {
        let divider = format!(" {} ", self.divider);

        html! {
            article class="rounded-lg shadow-md bg-gray-800 p-4 text-left" {
                @if let Some(title) = &self.title {
                    (subtitle(title))
                }
                @if let Some(acknowledgement) = self.acknowledgement {
                    (labelled("Acknowledgement", acknowledgement))
                }
                @if let Some(figure) = &self.figure {
                    figure class="my-4" {
                        img src=(figure.src) alt=(figure.alt) class="max-w-xs h-auto rounded";
                        @if let Some(caption) = figure.caption {
                            figcaption class="text-sm italic" {(caption)}
                        }
                    }
                }
                @for (heading, text) in &self.backgrounds {
                    (section_heading(*heading))
                    p {(text)}
                }
                @if !self.courses.is_empty() {
                    (section_heading("Courses"))
                    ul class="list-disc ml-6" {
                        @for course in self.courses {
                            (course)
                        }
                    }
                }
                @if let Some(statement) = self.personal_statement {
                    (section_heading("Personal Statement"))
                    p {(statement)}
                }
                @if let Some(quote) = &self.quote {
                    (labelled("Quote", quote))
                }
                @if let Some(fun_fact) = self.fun_fact {
                    (labelled("Fun Fact", fun_fact))
                }
                @if let Some(computer) = self.computer {
                    (labelled("Computer", computer))
                }
                @if !self.links.is_empty() {
                    (section_heading("Links"))
                    p {
                        @for (i, link) in self.links.iter().enumerate() {
                            @if i > 0 {
                                (divider)
                            }
                            a href=(link.url) target="_blank" rel="noreferrer" class="text-blue-200 underline" {(link.label)}
                        }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::student::RawStudent;
    use serde_json::{Value, json};
    use url::Url;

    fn student(value: Value) -> Student {
        let raw: RawStudent = serde_json::from_value(value).unwrap();
        Student::normalize(raw, &Url::parse("https://dvonb.xyz/").unwrap())
    }

    fn full() -> Student {
        student(json!({
            "name": {"first": "Carls", "last": "Laguerre"},
            "mascot": "Cosmic Lynx",
            "divider": "💠",
            "acknowledgement": "All mine",
            "media": {"src": "/img/c.jpg", "hasImage": true, "caption": "Carls"},
            "backgrounds": {"personal": "Haiti", "professional": "Harris Teeter", "academic": "CPCC", "subject": "Some"},
            "courses": [{"dept": "ITIS", "num": "3135", "name": "Web App Dev", "reason": "Required"}],
            "personalStatement": "Cloud developer",
            "quote": {"text": "Keep going", "author": "Me"},
            "funFact": "12,000 steps",
            "computer": "Macbook Air",
            "links": {"GitHub": "https://github.com/c", "Empty": ""}
        }))
    }

    fn rendered(student: &Student, visibility: SectionVisibility) -> String {
        RecordView::compose(student, visibility).render().into_string()
    }

    #[test]
    fn title_joins_name_and_mascot_with_divider() {
        let s = full();
        let view = RecordView::compose(&s, SectionVisibility::all());
        assert_eq!(view.title.as_deref(), Some("Carls Laguerre 💠 Cosmic Lynx"));

        let view = RecordView::compose(&s, SectionVisibility::all() - SectionVisibility::NAME);
        assert_eq!(view.title.as_deref(), Some("Cosmic Lynx"));

        let view = RecordView::compose(
            &s,
            SectionVisibility::all() - SectionVisibility::NAME - SectionVisibility::MASCOT,
        );
        assert_eq!(view.title, None);
    }

    #[test]
    fn nameless_record_uses_placeholder() {
        let s = student(json!({}));
        let view = RecordView::compose(&s, SectionVisibility::all());
        assert_eq!(view.title.as_deref(), Some("Student"));
    }

    #[test]
    fn hiding_image_removes_only_the_figure() {
        let s = full();
        let everything = rendered(&s, SectionVisibility::all());
        let without_image = rendered(&s, SectionVisibility::all().toggled(SectionVisibility::IMAGE));

        assert!(everything.contains("<figure"));
        assert!(!without_image.contains("<figure"));

        let figure_start = everything.find("<figure").unwrap();
        let figure_end = everything.find("</figure>").unwrap() + "</figure>".len();
        let mut expected = everything.clone();
        expected.replace_range(figure_start..figure_end, "");
        assert_eq!(without_image, expected);
    }

    #[test]
    fn sections_render_in_fixed_order() {
        let out = rendered(&full(), SectionVisibility::all());
        let order = [
            "Carls Laguerre",
            "Acknowledgement",
            "<figure",
            "Personal Background",
            "Professional Background",
            "Academic Background",
            "Background in the Subject",
            "Courses",
            "Personal Statement",
            "Quote",
            "Fun Fact",
            "Computer",
            "Links",
        ];
        let positions: Vec<_> = order.iter().map(|needle| out.find(needle).unwrap()).collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]), "{out}");
    }

    #[test]
    fn courses_and_links_formatting() {
        let out = rendered(&full(), SectionVisibility::all());
        assert!(out.contains("<strong>ITIS 3135</strong> - Web App Dev (Required)"));
        assert!(out.contains("https://github.com/c"));
        assert!(!out.contains("Empty"));
        assert!(out.contains("Keep going - Me"));
    }

    #[test]
    fn course_code_tags_its_list_item() {
        let s = student(json!({
            "courses": [
                {"dept": "ITIS", "num": 3135, "name": "Web", "code": "itis-3135"},
                {"dept": "ITSC", "num": 2600, "name": "Pro"}
            ]
        }));
        let out = rendered(&s, SectionVisibility::all());
        assert!(out.contains(r#"<li data-course="itis-3135"><strong>ITIS 3135</strong>"#), "{out}");
        assert!(out.contains("<li><strong>ITSC 2600</strong>"));
    }

    #[test]
    fn absent_data_suppresses_only_its_section() {
        let s = student(json!({"name": {"first": "Ada"}, "courses": [], "funFact": "Counts"}));
        let out = rendered(&s, SectionVisibility::all());
        assert!(out.contains("Ada"));
        assert!(out.contains("Fun Fact"));
        assert!(!out.contains("Courses"));
        assert!(!out.contains("Links"));
        assert!(!out.contains("<figure"));
    }

    #[test]
    fn extra_info_gates_fun_fact_and_computer() {
        let s = full();
        let view = RecordView::compose(&s, SectionVisibility::all() - SectionVisibility::EXTRA_INFO);
        assert_eq!(view.fun_fact, None);
        assert_eq!(view.computer, None);
        assert!(view.quote.is_some());
    }
}
