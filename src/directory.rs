use crate::{
    client::DirectoryClient,
    data::{prefix_index::PrefixIndex, student::Student},
    directory::{
        pagination::{Page, Paginator},
        visibility::SectionVisibility,
    },
    error::{ErrorClass, RollcallError, RollcallResult},
};
use serde::Deserialize;

pub mod pagination;
pub mod presenter;
pub mod render;
pub mod search;
pub mod visibility;

/// How records reach the visitor.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DirectoryMode {
    /// Fetch every record on mount, then search and page through them locally.
    #[default]
    #[serde(alias = "preload")]
    PreloadAndSearch,
    /// Only the index is fetched up front; records are looked up one at a time.
    #[serde(alias = "browse")]
    OnDemandBrowse,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum Presentation {
    #[default]
    Slideshow,
    ShowAll,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum IndexStatus {
    Ready,
    Unavailable { reason: String },
}

/// Identifies one on-demand lookup, so that a slow response can't clobber a newer one.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct LookupTicket(u64);

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LookupFailure {
    pub class: ErrorClass,
    pub message: String,
}

impl From<&RollcallError> for LookupFailure {
    fn from(e: &RollcallError) -> Self {
        Self {
            class: e.class(),
            message: e.to_string(),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Lookup {
    #[default]
    Idle,
    Pending {
        ticket: LookupTicket,
        prefix: String,
    },
    Found {
        prefix: String,
        student: Box<Student>,
    },
    Failed(LookupFailure),
}

/// Everything one mounted directory knows. Only the transition methods
/// below change it.
#[derive(Clone, Debug)]
pub struct DirectoryView {
    mode: DirectoryMode,
    paginator: Paginator,
    index: PrefixIndex,
    index_status: IndexStatus,
    students: Vec<Student>,
    query: String,
    visibility: SectionVisibility,
    presentation: Presentation,
    cursor: usize,
    page: usize,
    lookup: Lookup,
    tickets_issued: u64,
}

impl DirectoryView {
    pub fn new(mode: DirectoryMode, paginator: Paginator) -> Self {
        Self {
            mode,
            paginator,
            index: PrefixIndex::default(),
            index_status: IndexStatus::Ready,
            students: Vec::new(),
            query: String::new(),
            visibility: SectionVisibility::default(),
            presentation: Presentation::default(),
            cursor: 0,
            page: 0,
            lookup: Lookup::Idle,
            tickets_issued: 0,
        }
    }

    /// Fetches what the mode needs before first render. Never fails: an
    /// unavailable index leaves an empty, flagged directory.
    pub async fn mount(client: &DirectoryClient, mode: DirectoryMode, paginator: Paginator) -> Self {
        let mut view = Self::new(mode, paginator);
        view.load_index(client.fetch_index().await);

        if mode == DirectoryMode::PreloadAndSearch && !view.index.is_empty() {
            let students = client.fetch_students(&view.index).await;
            view.load_students(students);
        }

        view
    }

    pub fn load_index(&mut self, result: RollcallResult<PrefixIndex>) {
        match result {
            Ok(index) => {
                self.index = index;
                self.index_status = IndexStatus::Ready;
            }
            Err(e) => {
                warn!(%e, "Student index unavailable");
                self.index = PrefixIndex::default();
                self.index_status = IndexStatus::Unavailable {
                    reason: e.to_string(),
                };
            }
        }
        self.page = 0;
    }

    pub fn load_students(&mut self, students: Vec<Student>) {
        self.students = students;
        self.cursor = 0;
    }

    pub const fn mode(&self) -> DirectoryMode {
        self.mode
    }

    pub const fn index(&self) -> &PrefixIndex {
        &self.index
    }

    pub const fn index_status(&self) -> &IndexStatus {
        &self.index_status
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub const fn visibility(&self) -> SectionVisibility {
        self.visibility
    }

    pub const fn presentation(&self) -> Presentation {
        self.presentation
    }

    pub const fn lookup(&self) -> &Lookup {
        &self.lookup
    }

    pub fn filtered(&self) -> Vec<&Student> {
        search::filter(&self.students, &self.query)
    }

    /// Slideshow position as `(index, len)`, or `None` when nothing matches.
    pub fn position(&self) -> Option<(usize, usize)> {
        let len = self.filtered().len();
        (len > 0).then(|| (self.cursor.min(len - 1), len))
    }

    pub fn current(&self) -> Option<&Student> {
        let (index, _) = self.position()?;
        self.filtered().get(index).copied()
    }

    pub fn page(&self) -> Page<'_, String> {
        self.paginator
            .page(self.index.as_slice(), i64::try_from(self.page).unwrap_or(i64::MAX))
    }

    /// Any change to the query sends the slideshow back to the first match.
    /// Resubmitting the same query keeps the current record.
    pub fn set_query(&mut self, query: &str) {
        if self.query != query {
            self.query = query.to_string();
            self.cursor = 0;
        }
    }

    pub fn toggle_field(&mut self, field: SectionVisibility) {
        self.visibility = self.visibility.toggled(field);
    }

    pub fn next(&mut self) {
        let Some((index, len)) = self.position() else {
            return;
        };
        self.cursor = if index + 1 >= len { 0 } else { index + 1 };
    }

    pub fn previous(&mut self) {
        let Some((index, len)) = self.position() else {
            return;
        };
        self.cursor = if index == 0 { len - 1 } else { index - 1 };
    }

    pub fn toggle_presentation(&mut self) {
        self.presentation = match self.presentation {
            Presentation::Slideshow => Presentation::ShowAll,
            Presentation::ShowAll => Presentation::Slideshow,
        };
    }

    pub fn go_to_page(&mut self, requested: i64) {
        self.page = self.paginator.clamp(requested, self.index.len());
    }

    /// Starts a lookup, or records the validation failure inline for a blank prefix.
    pub fn begin_lookup(&mut self, prefix: &str) -> RollcallResult<LookupTicket> {
        let prefix = prefix.trim();
        if prefix.is_empty() {
            let e = RollcallError::EmptyPrefix;
            self.lookup = Lookup::Failed(LookupFailure::from(&e));
            return Err(e);
        }

        self.tickets_issued += 1;
        let ticket = LookupTicket(self.tickets_issued);
        self.lookup = Lookup::Pending {
            ticket,
            prefix: prefix.to_string(),
        };
        Ok(ticket)
    }

    /// Applies a finished lookup. Returns `false` if a newer lookup has been
    /// issued since, in which case the result is dropped.
    pub fn complete_lookup(&mut self, ticket: LookupTicket, result: RollcallResult<Student>) -> bool {
        let prefix = match &self.lookup {
            Lookup::Pending {
                ticket: pending,
                prefix,
            } if *pending == ticket => prefix.clone(),
            _ => {
                debug!(?ticket, "Discarding stale lookup");
                return false;
            }
        };

        self.lookup = match result {
            Ok(student) => Lookup::Found {
                prefix,
                student: Box::new(student),
            },
            Err(e) => {
                info!(?prefix, %e, "Lookup failed");
                Lookup::Failed(LookupFailure::from(&e))
            }
        };
        true
    }
}
