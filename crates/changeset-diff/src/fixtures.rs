//! Small entity graph shared by the unit tests.
//!
//! `Node` has a single edge to `Detail` and a list edge to `Item`s. `Detail`
//! points back at a `Node` and `Item` can point at another `Item`, so cycles
//! of both shapes can be built. Edges sit behind locks so links can be made
//! after the entities are shared.

use std::sync::{Arc, RwLock};

use serde_json::{json, Value};

use changeset_types::{EntityRef, FieldDescriptor, Trackable};

/// Stands in for a shared trait whose fields should not be compared.
pub trait Stamped {}

/// Stands in for a shared base whose fields should not be compared.
pub struct AuditBase;

#[derive(Debug)]
pub struct Node {
    pub id: String,
    pub title: String,
    pub count: i64,
    pub flag: bool,
    pub ratio: f64,
    pub payload: Vec<u8>,
    pub stamped_by: String,
    pub detail: RwLock<Option<Arc<Detail>>>,
    pub items: RwLock<Option<Vec<Arc<Item>>>>,
}

#[derive(Debug)]
pub struct Detail {
    pub id: String,
    pub label: String,
    pub count: i64,
    pub node: RwLock<Option<Arc<Node>>>,
}

#[derive(Debug)]
pub struct Item {
    pub id: String,
    pub weight: i64,
    pub note: String,
    pub next: RwLock<Option<Arc<Item>>>,
}

impl Node {
    pub fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            title: format!("title-{id}"),
            count: 1,
            flag: true,
            ratio: 0.5,
            payload: vec![1, 2, 3],
            stamped_by: "system".into(),
            detail: RwLock::new(None),
            items: RwLock::new(None),
        }
    }

    /// Same key and scalars, no edges.
    pub fn twin(&self) -> Self {
        Self {
            id: self.id.clone(),
            title: self.title.clone(),
            count: self.count,
            flag: self.flag,
            ratio: self.ratio,
            payload: self.payload.clone(),
            stamped_by: self.stamped_by.clone(),
            detail: RwLock::new(None),
            items: RwLock::new(None),
        }
    }

    pub fn set_detail(&self, detail: Option<Arc<Detail>>) {
        *self.detail.write().unwrap() = detail;
    }

    pub fn set_items(&self, items: Vec<Arc<Item>>) {
        *self.items.write().unwrap() = Some(items);
    }
}

impl Detail {
    pub fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            label: format!("label-{id}"),
            count: 10,
            node: RwLock::new(None),
        }
    }

    pub fn twin(&self) -> Self {
        Self {
            id: self.id.clone(),
            label: self.label.clone(),
            count: self.count,
            node: RwLock::new(None),
        }
    }

    pub fn set_node(&self, node: Option<Arc<Node>>) {
        *self.node.write().unwrap() = node;
    }
}

impl Item {
    pub fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            weight: 3,
            note: "n/a".into(),
            next: RwLock::new(None),
        }
    }

    pub fn twin(&self) -> Self {
        Self {
            id: self.id.clone(),
            weight: self.weight,
            note: self.note.clone(),
            next: RwLock::new(None),
        }
    }

    pub fn set_next(&self, next: Option<Arc<Item>>) {
        *self.next.write().unwrap() = next;
    }
}

impl Trackable<String> for Node {
    fn key(&self) -> String {
        self.id.clone()
    }

    fn describe() -> Vec<FieldDescriptor<String>> {
        vec![
            FieldDescriptor::key("id"),
            FieldDescriptor::scalar("title"),
            FieldDescriptor::scalar("count"),
            FieldDescriptor::scalar("flag"),
            FieldDescriptor::scalar("ratio"),
            FieldDescriptor::scalar("payload"),
            FieldDescriptor::scalar("stamped_by").declared_by::<dyn Stamped>(),
            FieldDescriptor::single::<Detail>("detail"),
            FieldDescriptor::list::<Item>("items"),
        ]
    }

    fn scalar(&self, field: &str) -> Value {
        match field {
            "id" => json!(self.id),
            "title" => json!(self.title),
            "count" => json!(self.count),
            "flag" => json!(self.flag),
            "ratio" => json!(self.ratio),
            "payload" => json!(self.payload),
            "stamped_by" => json!(self.stamped_by),
            _ => Value::Null,
        }
    }

    fn single(&self, edge: &str) -> Option<EntityRef<String>> {
        match edge {
            "detail" => self
                .detail
                .read()
                .unwrap()
                .clone()
                .map(|d| d as EntityRef<String>),
            _ => None,
        }
    }

    fn list(&self, edge: &str) -> Option<Vec<EntityRef<String>>> {
        match edge {
            "items" => self.items.read().unwrap().as_ref().map(|items| {
                items
                    .iter()
                    .map(|i| Arc::clone(i) as EntityRef<String>)
                    .collect()
            }),
            _ => None,
        }
    }
}

impl Trackable<String> for Detail {
    fn key(&self) -> String {
        self.id.clone()
    }

    fn describe() -> Vec<FieldDescriptor<String>> {
        vec![
            FieldDescriptor::key("id"),
            FieldDescriptor::scalar("label"),
            FieldDescriptor::scalar("count"),
            FieldDescriptor::single::<Node>("node"),
        ]
    }

    fn scalar(&self, field: &str) -> Value {
        match field {
            "id" => json!(self.id),
            "label" => json!(self.label),
            "count" => json!(self.count),
            _ => Value::Null,
        }
    }

    fn single(&self, edge: &str) -> Option<EntityRef<String>> {
        match edge {
            "node" => self
                .node
                .read()
                .unwrap()
                .clone()
                .map(|n| n as EntityRef<String>),
            _ => None,
        }
    }
}

impl Trackable<String> for Item {
    fn key(&self) -> String {
        self.id.clone()
    }

    fn describe() -> Vec<FieldDescriptor<String>> {
        vec![
            FieldDescriptor::key("id"),
            FieldDescriptor::scalar("weight"),
            FieldDescriptor::scalar("note").declared_by::<AuditBase>(),
            FieldDescriptor::single::<Item>("next"),
        ]
    }

    fn scalar(&self, field: &str) -> Value {
        match field {
            "id" => json!(self.id),
            "weight" => json!(self.weight),
            "note" => json!(self.note),
            _ => Value::Null,
        }
    }

    fn single(&self, edge: &str) -> Option<EntityRef<String>> {
        match edge {
            "next" => self
                .next
                .read()
                .unwrap()
                .clone()
                .map(|n| n as EntityRef<String>),
            _ => None,
        }
    }
}
