use casebook_types::{Case, CaseRow};

/// The case collection and the active selection. Cases are replaced whole,
/// matched by id; nothing is edited in place.
#[derive(Debug, Clone, Default)]
pub struct CaseStore {
    cases: Vec<Case>,
    selected_id: Option<String>,
}

impl CaseStore {
    pub fn new(cases: Vec<Case>) -> Self {
        Self { cases, selected_id: None }
    }

    pub fn cases(&self) -> &[Case] { &self.cases }

    pub fn get(&self, id: &str) -> Option<&Case> {
        self.cases.iter().find(|c| c.id == id)
    }

    pub fn selected_id(&self) -> Option<&str> { self.selected_id.as_deref() }

    /// Looked up on every call; a selection id that no longer matches reads as
    /// "no case selected".
    pub fn selected(&self) -> Option<&Case> {
        self.selected_id.as_deref().and_then(|id| self.get(id))
    }

    /// Sets the selection id, returning the case it resolves to (if any).
    pub fn select(&mut self, id: Option<&str>) -> Option<&Case> {
        self.selected_id = id.map(str::to_string);
        self.selected()
    }

    /// Swaps in `case` for the stored case with the same id. Returns false and
    /// leaves the collection untouched when the id is unknown.
    pub fn replace(&mut self, case: Case) -> bool {
        match self.cases.iter_mut().find(|c| c.id == case.id) {
            Some(slot) => {
                *slot = case;
                true
            }
            None => false,
        }
    }

    pub fn rows(&self) -> Vec<CaseRow> {
        project_rows(&self.cases, self.selected_id.as_deref())
    }
}

/// Case list projection: rows ordered by reason text. The input slice is not touched.
pub fn project_rows(cases: &[Case], selected_id: Option<&str>) -> Vec<CaseRow> {
    let mut sorted: Vec<&Case> = cases.iter().collect();
    sorted.sort_by(|a, b| {
        a.reason
            .to_lowercase()
            .cmp(&b.reason.to_lowercase())
            .then_with(|| a.reason.cmp(&b.reason))
    });
    sorted
        .into_iter()
        .map(|c| CaseRow {
            id: c.id.clone(),
            reason: c.reason.clone(),
            selected: selected_id == Some(c.id.as_str()),
        })
        .collect()
}
