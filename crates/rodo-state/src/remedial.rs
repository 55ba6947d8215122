//! # Remedial Actions
//!
//! Corrective tasks raised against an assessment, e.g. "update the privacy
//! policy" for an area with a NEGATIVE verdict.
//!
//! ## Status
//!
//! ```text
//! New ──▶ InProgress ──▶ Completed
//!  ▲          │              │
//!  └──────────┴──────────────┘   (any change to a different status)
//! ```
//!
//! Every change is appended to `status_history` with the acting user and
//! date. A fresh action's history holds one `New` entry by `System`.
//!
//! ## Deadlines
//!
//! An action that is not completed is *overdue* once its due date has
//! passed, and *approaching* when the due date is between today and seven
//! days from now, inclusive.

use std::cmp::Ordering;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use rodo_core::ActionId;
use rodo_scoring::RiskLevel;

/// Days ahead of the due date at which an action counts as approaching.
pub const APPROACHING_WINDOW_DAYS: i64 = 7;

/// User recorded for system-generated history entries.
pub const SYSTEM_USER: &str = "System";

// ─── Enums ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActionPriority {
    #[serde(alias = "Wysoki")]
    High,
    #[serde(alias = "Średni")]
    Medium,
    #[serde(alias = "Niski")]
    Low,
}

impl ActionPriority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::High => "HIGH",
            Self::Medium => "MEDIUM",
            Self::Low => "LOW",
        }
    }

    /// Sort rank, most urgent first.
    fn rank(&self) -> u8 {
        match self {
            Self::High => 0,
            Self::Medium => 1,
            Self::Low => 2,
        }
    }
}

impl std::fmt::Display for ActionPriority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ActionPriority {
    type Err = ActionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "HIGH" | "Wysoki" => Ok(Self::High),
            "MEDIUM" | "Średni" => Ok(Self::Medium),
            "LOW" | "Niski" => Ok(Self::Low),
            other => Err(ActionError::Validation(format!("unknown priority: {other:?}"))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActionStatus {
    #[serde(alias = "Nowe")]
    New,
    #[serde(alias = "W trakcie")]
    InProgress,
    #[serde(alias = "Zakończone")]
    Completed,
}

impl ActionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::New => "NEW",
            Self::InProgress => "IN_PROGRESS",
            Self::Completed => "COMPLETED",
        }
    }

    fn rank(&self) -> u8 {
        match self {
            Self::New => 0,
            Self::InProgress => 1,
            Self::Completed => 2,
        }
    }
}

impl std::fmt::Display for ActionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ActionStatus {
    type Err = ActionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "NEW" | "Nowe" => Ok(Self::New),
            "IN_PROGRESS" | "W trakcie" => Ok(Self::InProgress),
            "COMPLETED" | "Zakończone" => Ok(Self::Completed),
            other => Err(ActionError::Validation(format!("unknown action status: {other:?}"))),
        }
    }
}

// ─── Errors ──────────────────────────────────────────────────────────

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ActionError {
    #[error("validation error: {0}")]
    Validation(String),

    /// Status change to the status the action already has.
    #[error("action is already {0}")]
    UnchangedStatus(ActionStatus),

    #[error("{0} not found")]
    NotFound(ActionId),
}

// ─── Records ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    /// Sequential within the action, starting at 1.
    pub id: u32,
    pub name: String,
    /// File kind as given by the uploader ("pdf", "docx", ...).
    pub kind: String,
    pub uploaded_at: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusChange {
    pub status: ActionStatus,
    pub date: NaiveDate,
    pub user: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    /// Sequential within the action, starting at 1.
    pub id: u32,
    pub text: String,
    pub date: NaiveDate,
    pub user: String,
}

/// Input for [`RemedialAction::create`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewAction {
    pub title: String,
    pub description: String,
    pub priority: ActionPriority,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
    #[serde(default)]
    pub assignee: String,
    /// Name of the assessment area the action addresses.
    #[serde(default)]
    pub area: String,
    #[serde(default)]
    pub risk_level: Option<RiskLevel>,
    #[serde(default)]
    pub gdpr_articles: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemedialAction {
    pub id: ActionId,
    pub title: String,
    pub description: String,
    pub priority: ActionPriority,
    pub status: ActionStatus,
    pub due_date: Option<NaiveDate>,
    pub assignee: String,
    pub created_at: NaiveDate,
    pub updated_at: NaiveDate,
    pub area: String,
    pub risk_level: Option<RiskLevel>,
    pub gdpr_articles: Vec<String>,
    pub attachments: Vec<Attachment>,
    pub status_history: Vec<StatusChange>,
    pub comments: Vec<Comment>,
}

impl RemedialAction {
    /// Create a `New` action. Title and description must not be blank.
    pub fn create(input: NewAction, today: NaiveDate) -> Result<Self, ActionError> {
        require_text("title", &input.title)?;
        require_text("description", &input.description)?;

        Ok(Self {
            id: ActionId::new(),
            title: input.title.trim().to_string(),
            description: input.description.trim().to_string(),
            priority: input.priority,
            status: ActionStatus::New,
            due_date: input.due_date,
            assignee: input.assignee,
            created_at: today,
            updated_at: today,
            area: input.area,
            risk_level: input.risk_level,
            gdpr_articles: input.gdpr_articles,
            attachments: Vec::new(),
            status_history: vec![StatusChange {
                status: ActionStatus::New,
                date: today,
                user: SYSTEM_USER.to_string(),
            }],
            comments: Vec::new(),
        })
    }

    pub fn change_status(
        &mut self,
        to: ActionStatus,
        user: &str,
        today: NaiveDate,
    ) -> Result<(), ActionError> {
        if self.status == to {
            return Err(ActionError::UnchangedStatus(to));
        }
        require_text("user", user)?;
        tracing::debug!(action = %self.id, from = %self.status, to = %to, "action status changed");
        self.status = to;
        self.updated_at = today;
        self.status_history.push(StatusChange {
            status: to,
            date: today,
            user: user.to_string(),
        });
        Ok(())
    }

    pub fn add_comment(
        &mut self,
        text: &str,
        user: &str,
        today: NaiveDate,
    ) -> Result<&Comment, ActionError> {
        require_text("comment", text)?;
        require_text("user", user)?;
        let id = next_id(self.comments.iter().map(|c| c.id));
        self.comments.push(Comment {
            id,
            text: text.trim().to_string(),
            date: today,
            user: user.to_string(),
        });
        self.updated_at = today;
        Ok(&self.comments[self.comments.len() - 1])
    }

    pub fn add_attachment(
        &mut self,
        name: &str,
        kind: &str,
        today: NaiveDate,
    ) -> Result<&Attachment, ActionError> {
        require_text("attachment name", name)?;
        let id = next_id(self.attachments.iter().map(|a| a.id));
        self.attachments.push(Attachment {
            id,
            name: name.trim().to_string(),
            kind: kind.trim().to_string(),
            uploaded_at: today,
        });
        self.updated_at = today;
        Ok(&self.attachments[self.attachments.len() - 1])
    }

    /// Days from `today` to the due date; negative once passed.
    pub fn days_until_due(&self, today: NaiveDate) -> Option<i64> {
        self.due_date.map(|due| (due - today).num_days())
    }

    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        self.status != ActionStatus::Completed
            && self.days_until_due(today).is_some_and(|days| days < 0)
    }

    pub fn is_approaching(&self, today: NaiveDate) -> bool {
        self.status != ActionStatus::Completed
            && self
                .days_until_due(today)
                .is_some_and(|days| (0..=APPROACHING_WINDOW_DAYS).contains(&days))
    }
}

fn require_text(field: &str, value: &str) -> Result<(), ActionError> {
    if value.trim().is_empty() {
        return Err(ActionError::Validation(format!("{field} must not be empty")));
    }
    Ok(())
}

fn next_id(existing: impl Iterator<Item = u32>) -> u32 {
    existing.max().unwrap_or(0) + 1
}

// ─── Query ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    Title,
    Priority,
    Status,
    DueDate,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

/// Filter and ordering over a set of actions. Unset fields do not filter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionQuery {
    #[serde(default)]
    pub status: Option<ActionStatus>,
    #[serde(default)]
    pub priority: Option<ActionPriority>,
    /// Case-insensitive substring of title or description.
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default)]
    pub sort: Option<SortKey>,
    #[serde(default)]
    pub direction: SortDirection,
}

impl ActionQuery {
    pub fn matches(&self, action: &RemedialAction) -> bool {
        if self.status.is_some_and(|s| s != action.status) {
            return false;
        }
        if self.priority.is_some_and(|p| p != action.priority) {
            return false;
        }
        match self.search.as_deref().map(str::trim) {
            Some(term) if !term.is_empty() => {
                let term = term.to_lowercase();
                action.title.to_lowercase().contains(&term)
                    || action.description.to_lowercase().contains(&term)
            }
            _ => true,
        }
    }

    /// Matching actions, sorted when a key is set. The sort is stable.
    pub fn apply<'a>(
        &self,
        actions: impl IntoIterator<Item = &'a RemedialAction>,
    ) -> Vec<&'a RemedialAction> {
        let mut matched: Vec<&RemedialAction> =
            actions.into_iter().filter(|a| self.matches(a)).collect();
        if let Some(key) = self.sort {
            matched.sort_by(|a, b| {
                let ord = compare_by(key, a, b);
                match self.direction {
                    SortDirection::Asc => ord,
                    SortDirection::Desc => ord.reverse(),
                }
            });
        }
        matched
    }
}

fn compare_by(key: SortKey, a: &RemedialAction, b: &RemedialAction) -> Ordering {
    match key {
        SortKey::Title => a.title.to_lowercase().cmp(&b.title.to_lowercase()),
        SortKey::Priority => a.priority.rank().cmp(&b.priority.rank()),
        SortKey::Status => a.status.rank().cmp(&b.status.rank()),
        // Undated actions sort after dated ones.
        SortKey::DueDate => match (a.due_date, b.due_date) {
            (Some(x), Some(y)) => x.cmp(&y),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        },
    }
}

// ─── Book ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusCounts {
    pub new: usize,
    pub in_progress: usize,
    pub completed: usize,
    pub overdue: usize,
    pub approaching: usize,
    pub total: usize,
}

/// The remedial actions of one assessment, in creation order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionBook {
    actions: Vec<RemedialAction>,
}

impl ActionBook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, action: RemedialAction) -> &RemedialAction {
        self.actions.push(action);
        &self.actions[self.actions.len() - 1]
    }

    pub fn get(&self, id: ActionId) -> Option<&RemedialAction> {
        self.actions.iter().find(|a| a.id == id)
    }

    pub fn get_mut(&mut self, id: ActionId) -> Result<&mut RemedialAction, ActionError> {
        self.actions
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or(ActionError::NotFound(id))
    }

    pub fn remove(&mut self, id: ActionId) -> Result<RemedialAction, ActionError> {
        let idx = self
            .actions
            .iter()
            .position(|a| a.id == id)
            .ok_or(ActionError::NotFound(id))?;
        Ok(self.actions.remove(idx))
    }

    pub fn query(&self, query: &ActionQuery) -> Vec<&RemedialAction> {
        query.apply(&self.actions)
    }

    pub fn iter(&self) -> impl Iterator<Item = &RemedialAction> {
        self.actions.iter()
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    pub fn counts(&self, today: NaiveDate) -> StatusCounts {
        let mut counts = StatusCounts::default();
        for action in &self.actions {
            match action.status {
                ActionStatus::New => counts.new += 1,
                ActionStatus::InProgress => counts.in_progress += 1,
                ActionStatus::Completed => counts.completed += 1,
            }
            counts.overdue += usize::from(action.is_overdue(today));
            counts.approaching += usize::from(action.is_approaching(today));
            counts.total += 1;
        }
        counts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn input(title: &str, priority: ActionPriority, due: Option<&str>) -> NewAction {
        NewAction {
            title: title.to_string(),
            description: format!("{title} - opis"),
            priority,
            due_date: due.map(date),
            assignee: "Jan Kowalski".to_string(),
            area: "Bezpieczeństwo danych".to_string(),
            risk_level: Some(RiskLevel::High),
            gdpr_articles: vec!["Art. 32".to_string()],
        }
    }

    fn action(title: &str, priority: ActionPriority, due: Option<&str>) -> RemedialAction {
        RemedialAction::create(input(title, priority, due), date("2025-05-01")).unwrap()
    }

    #[test]
    fn create_seeds_history() {
        let a = action("Aktualizacja polityki", ActionPriority::High, Some("2025-06-01"));
        assert_eq!(a.status, ActionStatus::New);
        assert_eq!(a.status_history.len(), 1);
        assert_eq!(a.status_history[0].user, SYSTEM_USER);
        assert_eq!(a.status_history[0].status, ActionStatus::New);
        assert_eq!(a.created_at, date("2025-05-01"));
    }

    #[test]
    fn create_rejects_blank_fields() {
        let mut i = input("x", ActionPriority::Low, None);
        i.title = "   ".to_string();
        assert!(RemedialAction::create(i, date("2025-05-01")).is_err());

        let mut i = input("x", ActionPriority::Low, None);
        i.description = String::new();
        assert!(RemedialAction::create(i, date("2025-05-01")).is_err());
    }

    #[test]
    fn status_change_appends_history() {
        let mut a = action("Szkolenie", ActionPriority::Medium, None);
        a.change_status(ActionStatus::InProgress, "Anna Nowak", date("2025-05-03"))
            .unwrap();
        a.change_status(ActionStatus::Completed, "Anna Nowak", date("2025-05-10"))
            .unwrap();
        assert_eq!(a.status_history.len(), 3);
        assert_eq!(a.updated_at, date("2025-05-10"));
        // Reopening is allowed.
        a.change_status(ActionStatus::New, "Jan Kowalski", date("2025-05-11"))
            .unwrap();
        assert_eq!(a.status, ActionStatus::New);
    }

    #[test]
    fn status_change_to_same_status_rejected() {
        let mut a = action("Szkolenie", ActionPriority::Medium, None);
        assert_eq!(
            a.change_status(ActionStatus::New, "x", date("2025-05-03")),
            Err(ActionError::UnchangedStatus(ActionStatus::New))
        );
        assert_eq!(a.status_history.len(), 1);
    }

    #[test]
    fn comments_and_attachments_are_sequential() {
        let mut a = action("Rejestr", ActionPriority::Low, None);
        assert_eq!(a.add_comment("Rozpoczęto", "Jan", date("2025-05-02")).unwrap().id, 1);
        assert_eq!(a.add_comment("Postęp", "Anna", date("2025-05-03")).unwrap().id, 2);
        assert!(a.add_comment("  ", "Anna", date("2025-05-03")).is_err());
        assert_eq!(a.comments.len(), 2);

        let att = a.add_attachment("rejestr.xlsx", "xlsx", date("2025-05-04")).unwrap();
        assert_eq!(att.id, 1);
        assert!(a.add_attachment("", "pdf", date("2025-05-04")).is_err());
        assert_eq!(a.attachments.len(), 1);
    }

    #[test]
    fn overdue_and_approaching() {
        let today = date("2025-05-10");
        let past = action("a", ActionPriority::High, Some("2025-05-09"));
        let due_today = action("b", ActionPriority::High, Some("2025-05-10"));
        let in_week = action("c", ActionPriority::High, Some("2025-05-17"));
        let later = action("d", ActionPriority::High, Some("2025-05-18"));
        let undated = action("e", ActionPriority::High, None);

        assert!(past.is_overdue(today));
        assert!(!past.is_approaching(today));
        assert!(!due_today.is_overdue(today));
        assert!(due_today.is_approaching(today));
        assert!(in_week.is_approaching(today));
        assert!(!later.is_approaching(today));
        assert!(!undated.is_overdue(today));
        assert!(!undated.is_approaching(today));

        let mut done = past.clone();
        done.change_status(ActionStatus::Completed, "x", today).unwrap();
        assert!(!done.is_overdue(today));
    }

    #[test]
    fn query_filters() {
        let mut book = ActionBook::new();
        book.insert(action("Polityka prywatności", ActionPriority::High, None));
        book.insert(action("Szkolenie pracowników", ActionPriority::Low, None));
        let mut third = action("Rejestr czynności", ActionPriority::High, None);
        third.change_status(ActionStatus::InProgress, "x", date("2025-05-02")).unwrap();
        book.insert(third);

        let q = ActionQuery {
            priority: Some(ActionPriority::High),
            ..Default::default()
        };
        assert_eq!(book.query(&q).len(), 2);

        let q = ActionQuery {
            status: Some(ActionStatus::InProgress),
            ..Default::default()
        };
        assert_eq!(book.query(&q)[0].title, "Rejestr czynności");

        let q = ActionQuery {
            search: Some("SZKOLENIE".to_string()),
            ..Default::default()
        };
        assert_eq!(book.query(&q).len(), 1);

        // Description is searched too.
        let q = ActionQuery {
            search: Some("prywatności - opis".to_string()),
            ..Default::default()
        };
        assert_eq!(book.query(&q).len(), 1);
    }

    #[test]
    fn query_sorts() {
        let mut book = ActionBook::new();
        book.insert(action("B", ActionPriority::Low, Some("2025-06-01")));
        book.insert(action("a", ActionPriority::High, None));
        book.insert(action("C", ActionPriority::Medium, Some("2025-05-15")));

        let titles = |q: &ActionQuery| -> Vec<String> {
            book.query(q).iter().map(|a| a.title.clone()).collect()
        };

        let mut q = ActionQuery {
            sort: Some(SortKey::Title),
            ..Default::default()
        };
        assert_eq!(titles(&q), ["a", "B", "C"]);
        q.direction = SortDirection::Desc;
        assert_eq!(titles(&q), ["C", "B", "a"]);

        q = ActionQuery {
            sort: Some(SortKey::Priority),
            ..Default::default()
        };
        assert_eq!(titles(&q), ["a", "C", "B"]);

        q = ActionQuery {
            sort: Some(SortKey::DueDate),
            ..Default::default()
        };
        assert_eq!(titles(&q), ["C", "B", "a"]);
    }

    #[test]
    fn book_remove_and_counts() {
        let mut book = ActionBook::new();
        let id = book.insert(action("a", ActionPriority::High, Some("2025-04-01"))).id;
        book.insert(action("b", ActionPriority::High, Some("2025-05-12")));
        let counts = book.counts(date("2025-05-10"));
        assert_eq!(counts.new, 2);
        assert_eq!(counts.overdue, 1);
        assert_eq!(counts.approaching, 1);
        assert_eq!(counts.total, 2);

        book.remove(id).unwrap();
        assert_eq!(book.len(), 1);
        assert_eq!(book.remove(id), Err(ActionError::NotFound(id)));
    }

    #[test]
    fn polish_labels_deserialize() {
        let p: ActionPriority = serde_json::from_str("\"Średni\"").unwrap();
        assert_eq!(p, ActionPriority::Medium);
        let s: ActionStatus = serde_json::from_str("\"W trakcie\"").unwrap();
        assert_eq!(s, ActionStatus::InProgress);
        assert_eq!("Zakończone".parse::<ActionStatus>().unwrap(), ActionStatus::Completed);
        assert!("DONE".parse::<ActionStatus>().is_err());
    }
}
