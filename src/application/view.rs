use crate::domain::todo::{Draft, Todo, TodoId};

pub const EMPTY_MESSAGE: &str = "No todos available";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    pub id: TodoId,
    pub title: String,
    pub description: String,
}

/// What the list pane shows for a given list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListView {
    Empty,
    Rows(Vec<Row>),
}

impl ListView {
    pub fn project(list: &[Todo]) -> Self {
        if list.is_empty() { return ListView::Empty; }
        ListView::Rows(
            list.iter()
                .map(|t| Row { id: t.id, title: t.title.clone(), description: t.description.clone() })
                .collect(),
        )
    }

    pub fn rows(&self) -> &[Row] {
        match self { ListView::Empty => &[], ListView::Rows(rows) => rows }
    }
}

pub fn submit_label(draft: &Draft) -> &'static str {
    if draft.is_editing() { "Update" } else { "Add" }
}
