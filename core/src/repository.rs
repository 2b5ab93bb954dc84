//! Repository contract and the in-memory store behind it.
//!
//! # Design
//! Handlers only see `TodoRepository`, so the store can be swapped without
//! touching routing. `MemTodoRepository` deep-copies its seed on
//! construction: each invocation owns a private copy, concurrent invocations
//! never share mutable state, and writes vanish with the instance.

use std::collections::BTreeMap;

use serde_json::{Map, Value};

use crate::error::RepoError;
use crate::types::Todo;

/// CRUD capability set over todo records.
pub trait TodoRepository {
    /// All records. Order is implementation-defined.
    fn list(&self) -> Vec<Todo>;

    /// The record with `id`, or `None`. Absence is never an error.
    fn get(&self, id: &str) -> Option<Todo>;

    /// Insert a new record. Fails with `DuplicateKey` if `id` is taken;
    /// existing records are never overwritten.
    fn create(&mut self, todo: Todo) -> Result<Todo, RepoError>;

    /// Merge `fields` into the record with `id` and return the result, or
    /// `None` if there is no such record.
    fn update(&mut self, id: &str, fields: Map<String, Value>) -> Option<Todo>;

    /// Remove the record with `id`. Returns whether one was removed.
    fn delete(&mut self, id: &str) -> bool;
}

/// `TodoRepository` over a `BTreeMap`; `list` yields records by ascending id.
#[derive(Debug, Clone, Default)]
pub struct MemTodoRepository {
    todos: BTreeMap<String, Todo>,
}

impl MemTodoRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a repository holding a copy of `seed`. A later duplicate id in
    /// the seed replaces an earlier one.
    pub fn from_seed(seed: &[Todo]) -> Self {
        let todos = seed
            .iter()
            .map(|todo| (todo.id.clone(), todo.clone()))
            .collect();
        Self { todos }
    }

    pub fn len(&self) -> usize {
        self.todos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.todos.is_empty()
    }
}

impl TodoRepository for MemTodoRepository {
    fn list(&self) -> Vec<Todo> {
        self.todos.values().cloned().collect()
    }

    fn get(&self, id: &str) -> Option<Todo> {
        self.todos.get(id).cloned()
    }

    fn create(&mut self, todo: Todo) -> Result<Todo, RepoError> {
        if self.todos.contains_key(&todo.id) {
            return Err(RepoError::DuplicateKey(todo.id));
        }
        self.todos.insert(todo.id.clone(), todo.clone());
        Ok(todo)
    }

    fn update(&mut self, id: &str, fields: Map<String, Value>) -> Option<Todo> {
        let todo = self.todos.get_mut(id)?;
        todo.merge(fields);
        Some(todo.clone())
    }

    fn delete(&mut self, id: &str) -> bool {
        self.todos.remove(id).is_some()
    }
}
