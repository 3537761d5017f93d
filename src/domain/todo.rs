use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::SyncError;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct TodoId(pub i64);

impl fmt::Display for TodoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "{}", self.0) }
}

/// A todo as persisted by the collection.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Todo {
    pub id: TodoId,
    pub title: String,
    pub description: String,
}

impl Todo {
    pub fn fields(&self) -> TodoFields {
        TodoFields { title: self.title.clone(), description: self.description.clone() }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct TodoFields {
    pub title: String,
    pub description: String,
}

impl TodoFields {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self { title: title.into(), description: description.into() }
    }

    pub fn get(&self, field: Field) -> &str {
        match field { Field::Title => &self.title, Field::Description => &self.description }
    }

    /// Both fields must contain something other than whitespace.
    pub fn validate(&self) -> Result<(), SyncError> {
        for field in Field::ALL {
            if self.get(field).trim().is_empty() { return Err(SyncError::EmptyField(field)); }
        }
        Ok(())
    }
}

/// JSON body sent on create and update. A new draft serialises `"id": null`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TodoPayload {
    pub id: Option<TodoId>,
    pub title: String,
    pub description: String,
}

impl TodoPayload {
    pub fn new(id: Option<TodoId>, fields: &TodoFields) -> Self {
        Self { id, title: fields.title.clone(), description: fields.description.clone() }
    }

    pub fn fields(&self) -> TodoFields { TodoFields::new(self.title.clone(), self.description.clone()) }
}

/// The entry bound to the form: either a todo that does not exist yet, or an
/// edit of an existing one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Draft {
    New(TodoFields),
    Editing(TodoId, TodoFields),
}

impl Default for Draft {
    fn default() -> Self { Draft::New(TodoFields::default()) }
}

impl Draft {
    pub fn id(&self) -> Option<TodoId> {
        match self { Draft::New(_) => None, Draft::Editing(id, _) => Some(*id) }
    }

    pub fn fields(&self) -> &TodoFields {
        match self { Draft::New(f) | Draft::Editing(_, f) => f }
    }

    pub fn is_editing(&self) -> bool { matches!(self, Draft::Editing(..)) }

    /// Replaces one field and leaves the other and the mode untouched.
    pub fn set(&mut self, field: Field, value: impl Into<String>) {
        let fields = match self { Draft::New(f) | Draft::Editing(_, f) => f };
        match field {
            Field::Title => fields.title = value.into(),
            Field::Description => fields.description = value.into(),
        }
    }

    pub fn payload(&self) -> TodoPayload { TodoPayload::new(self.id(), self.fields()) }
}

impl From<&Todo> for Draft {
    fn from(todo: &Todo) -> Self { Draft::Editing(todo.id, todo.fields()) }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field { Title, Description }

impl Field {
    pub const ALL: [Field; 2] = [Field::Title, Field::Description];

    pub fn name(self) -> &'static str {
        match self { Field::Title => "title", Field::Description => "description" }
    }

    pub fn next(self) -> Self {
        match self { Field::Title => Field::Description, Field::Description => Field::Title }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.name()) }
}

impl FromStr for Field {
    type Err = SyncError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "title" => Ok(Field::Title),
            "description" => Ok(Field::Description),
            other => Err(SyncError::UnknownField(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_draft_serialises_null_id() {
        let mut draft = Draft::default();
        draft.set(Field::Title, "A");
        draft.set(Field::Description, "B");
        let json = serde_json::to_value(draft.payload()).unwrap();
        assert_eq!(json, serde_json::json!({ "id": null, "title": "A", "description": "B" }));
    }

    #[test]
    fn editing_draft_carries_its_id() {
        let todo = Todo { id: TodoId(7), title: "A".into(), description: "B".into() };
        let draft = Draft::from(&todo);
        assert!(draft.is_editing());
        assert_eq!(draft.id(), Some(TodoId(7)));
        assert_eq!(serde_json::to_value(draft.payload()).unwrap()["id"], 7);
    }

    #[test]
    fn set_only_touches_the_named_field() {
        let mut draft = Draft::Editing(TodoId(3), TodoFields::new("old", "desc"));
        draft.set(Field::Title, "new");
        assert_eq!(draft, Draft::Editing(TodoId(3), TodoFields::new("new", "desc")));
    }

    #[test]
    fn field_names_are_checked() {
        assert_eq!("title".parse::<Field>().unwrap(), Field::Title);
        assert_eq!("description".parse::<Field>().unwrap(), Field::Description);
        assert!(matches!("priority".parse::<Field>(), Err(SyncError::UnknownField(name)) if name == "priority"));
    }

    #[test]
    fn blank_fields_fail_validation() {
        assert!(TodoFields::new("A", "B").validate().is_ok());
        assert!(matches!(TodoFields::new("  ", "B").validate(), Err(SyncError::EmptyField(Field::Title))));
        assert!(matches!(TodoFields::new("A", "").validate(), Err(SyncError::EmptyField(Field::Description))));
    }

    #[test]
    fn list_body_decodes_integer_ids() {
        let todos: Vec<Todo> = serde_json::from_str(r#"[{"id":1,"title":"A","description":"B"}]"#).unwrap();
        assert_eq!(todos[0].id, TodoId(1));
    }
}
