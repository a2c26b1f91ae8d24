use crate::{
    directory::{
        DirectoryMode, DirectoryView, IndexStatus, Lookup, LookupFailure, Presentation,
        presenter::RecordView, visibility::FIELDS,
    },
    error::ErrorClass,
    maud_conveniences::{action_button, alert, notice, section_heading, title},
};
use maud::{Markup, Render, html};
use serde_json::json;
use uuid::Uuid;

/// The swappable `#directory` fragment for one view.
pub struct DirectoryPanel<'a> {
    pub id: Uuid,
    pub view: &'a DirectoryView,
}

impl DirectoryPanel<'_> {
    fn url(&self, action: &str) -> String {
        format!("/internal/directory/{}/{action}", self.id)
    }

    fn search(&self) -> Markup {
        let (heading, placeholder, button) = match self.view.mode() {
            DirectoryMode::PreloadAndSearch => {
                ("Search by Name", "Search by first or last name...", "Search")
            }
            DirectoryMode::OnDemandBrowse => ("Look up a Student", "Enter a prefix...", "Look up"),
        };

        html! {
            section class="mb-4" {
                (section_heading(heading))
                form hx-post=(self.url("search")) hx-target="#directory" hx-swap="outerHTML" class="flex flex-row space-x-2" {
                    input type="text" name="query" value=(self.view.query()) placeholder=(placeholder) class="shadow appearance-none border rounded w-full max-w-md py-2 px-3 leading-tight focus:outline-none focus:shadow-outline bg-gray-700 border-gray-600";
                    button type="submit" class="bg-blue-500 hover:bg-blue-700 font-bold py-2 px-4 rounded" {(button)}
                }
                @if self.view.mode() == DirectoryMode::PreloadAndSearch {
                    @let found = self.view.filtered().len();
                    p class="mt-2" {
                        strong {"Found " (found) " student" @if found != 1 {"s"}}
                    }
                }
            }
        }
    }

    fn field_toggles(&self) -> Markup {
        let visibility = self.view.visibility();

        html! {
            section class="mb-4" {
                (section_heading("Display Fields"))
                div class="grid grid-cols-2 md:grid-cols-3 gap-2" {
                    @for (flag, slug, label) in FIELDS {
                        label class="text-gray-300 cursor-pointer" {
                            input type="checkbox" class="mr-2" checked[visibility.contains(flag)] hx-post=(self.url(&format!("toggle/{slug}"))) hx-target="#directory" hx-swap="outerHTML";
                            (label)
                        }
                    }
                }
            }
        }
    }

    fn preloaded_records(&self) -> Markup {
        let visibility = self.view.visibility();
        let filtered = self.view.filtered();
        if filtered.is_empty() {
            return Markup::default();
        }

        html! {
            section {
                div class="mb-4" {
                    @match self.view.presentation() {
                        Presentation::Slideshow => (action_button(&self.url("presentation"), "Show All Students")),
                        Presentation::ShowAll => (action_button(&self.url("presentation"), "Show Slideshow")),
                    }
                }
                @match self.view.presentation() {
                    Presentation::Slideshow => {
                        @if let (Some((index, len)), Some(student)) = (self.view.position(), self.view.current()) {
                            div class="flex flex-row items-center space-x-2 mb-4" {
                                (action_button(&self.url("previous"), "Previous"))
                                span {"Student " (index + 1) " of " (len)}
                                (action_button(&self.url("next"), "Next"))
                            }
                            (RecordView::compose(student, visibility))
                        }
                    },
                    Presentation::ShowAll => {
                        div class="flex flex-col space-y-8" {
                            @for student in filtered {
                                (RecordView::compose(student, visibility))
                            }
                        }
                    },
                }
            }
        }
    }

    fn lookup(&self) -> Markup {
        match self.view.lookup() {
            Lookup::Idle => Markup::default(),
            Lookup::Pending { prefix, .. } => html! {
                p class="italic" {"Loading " (prefix) "..."}
            },
            Lookup::Found { student, .. } => RecordView::compose(student, self.view.visibility()).render(),
            Lookup::Failed(LookupFailure { class, message }) => match class {
                ErrorClass::Validation | ErrorClass::NotFound => notice(message),
                ErrorClass::ServiceUnavailable | ErrorClass::Internal => {
                    alert("Service unavailable", message)
                }
            },
        }
    }

    fn browser(&self) -> Markup {
        let page = self.view.page();
        if page.total_pages == 0 {
            return Markup::default();
        }
        let previous_page = page.number.saturating_sub(1);
        let next_page = page.number + 1;

        html! {
            section class="mt-4" {
                (section_heading("Browse Students"))
                p class="text-sm text-gray-300 mb-2" {(self.view.index().len()) " students indexed"}
                div class="grid grid-cols-2 sm:grid-cols-3 md:grid-cols-5 gap-2 mb-4" {
                    @for prefix in page.items {
                        button type="button" class="block rounded-lg shadow-md p-2 text-center bg-gray-700 hover:bg-gray-600" hx-post=(self.url("select")) hx-vals=(json!({"prefix": prefix}).to_string()) hx-target="#directory" hx-swap="outerHTML" {
                            (prefix)
                        }
                    }
                }
                div class="flex flex-row items-center space-x-2" {
                    (action_button(&self.url(&format!("page/{previous_page}")), "Previous Page"))
                    span {"Page " (page.number + 1) " of " (page.total_pages)}
                    (action_button(&self.url(&format!("page/{next_page}")), "Next Page"))
                }
            }
        }
    }
}

impl Render for DirectoryPanel<'_> {
    fn render(&self) -> Markup {
        html! {
            div id="directory" class="mx-auto bg-gray-800 p-8 rounded shadow-md max-w-4xl w-full flex flex-col" {
                (title("Introduction JSON Data"))
                @if let IndexStatus::Unavailable { reason } = self.view.index_status() {
                    (alert("Directory unavailable", reason))
                }
                (self.search())
                (self.field_toggles())
                @match self.view.mode() {
                    DirectoryMode::PreloadAndSearch => (self.preloaded_records()),
                    DirectoryMode::OnDemandBrowse => {
                        (self.lookup())
                        (self.browser())
                    },
                }
            }
        }
    }
}
