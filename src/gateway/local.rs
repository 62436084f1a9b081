// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Offline document store kept in the local SQLite file.
//!
//! Every written node is one row keyed by its full path. Reads assemble the
//! subtree below a path, so a collection read returns the same id → record
//! map a hosted store would. A path with no row of its own or below it is
//! looked up inside the nearest stored ancestor.

use std::path::Path;

use rusqlite::{Connection, OptionalExtension, params};
use serde_json::{Map, Value};

use super::Gateway;
use crate::error::Result;

pub struct SqliteGateway {
    conn: Connection,
}

impl SqliteGateway {
    pub fn open(path: &Path) -> Result<Self> {
        Self::from_connection(Connection::open(path)?)
    }

    pub fn in_memory() -> Result<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    pub fn from_connection(conn: Connection) -> Result<Self> {
        crate::db::init_documents(&conn)?;
        Ok(Self { conn })
    }

    fn remove_subtree(&self, path: &str) -> Result<()> {
        let prefix = format!("{}/", path);
        self.conn.execute("DELETE FROM documents WHERE path=?1", params![path])?;
        self.conn.execute(
            "DELETE FROM documents WHERE substr(path, 1, ?2)=?1",
            params![prefix, prefix.chars().count() as i64],
        )?;
        Ok(())
    }

    fn row(&self, path: &str) -> Result<Option<String>> {
        Ok(self
            .conn
            .query_row(
                "SELECT body FROM documents WHERE path=?1",
                params![path],
                |r| r.get(0),
            )
            .optional()?)
    }

    /// Nearest stored row above `path`, with the segments left to walk inside it.
    fn ancestor_row(&self, path: &str) -> Result<Option<(String, Value, Vec<String>)>> {
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        for cut in (1..segments.len()).rev() {
            let parent = segments[..cut].join("/");
            if let Some(body) = self.row(&parent)? {
                let rest = segments[cut..].iter().map(|s| s.to_string()).collect();
                return Ok(Some((parent, serde_json::from_str(&body)?, rest)));
            }
        }
        Ok(None)
    }

    fn strip_from_ancestor(&self, path: &str) -> Result<()> {
        if let Some((parent, mut body, rest)) = self.ancestor_row(path)? {
            if remove_at(&mut body, &rest) {
                self.conn.execute(
                    "UPDATE documents SET body=?2 WHERE path=?1",
                    params![parent, serde_json::to_string(&body)?],
                )?;
            }
        }
        Ok(())
    }
}

fn normalize(path: &str) -> &str {
    path.trim_matches('/')
}

fn insert_at(node: &mut Value, segments: &[&str], value: Value) {
    let Some((first, rest)) = segments.split_first() else {
        *node = value;
        return;
    };
    if !node.is_object() {
        *node = Value::Object(Map::new());
    }
    if let Value::Object(map) = node {
        let child = map.entry(first.to_string()).or_insert(Value::Null);
        insert_at(child, rest, value);
    }
}

fn lookup<'a>(node: &'a Value, segments: &[String]) -> Option<&'a Value> {
    segments.iter().try_fold(node, |n, seg| match n {
        Value::Object(map) => map.get(seg),
        Value::Array(items) => seg.parse::<usize>().ok().and_then(|i| items.get(i)),
        _ => None,
    })
}

fn remove_at(node: &mut Value, segments: &[String]) -> bool {
    let Some((last, parents)) = segments.split_last() else {
        return false;
    };
    let mut cur = node;
    for seg in parents {
        let next = match cur {
            Value::Object(map) => map.get_mut(seg),
            Value::Array(items) => seg.parse::<usize>().ok().and_then(|i| items.get_mut(i)),
            _ => None,
        };
        match next {
            Some(v) => cur = v,
            None => return false,
        }
    }
    match cur {
        Value::Object(map) => map.remove(last).is_some(),
        // array slots go null, as a hosted store drops the key
        Value::Array(items) => match last.parse::<usize>() {
            Ok(i) if i < items.len() => {
                items[i] = Value::Null;
                true
            }
            _ => false,
        },
        _ => false,
    }
}

impl Gateway for SqliteGateway {
    fn get_document(&self, path: &str) -> Result<Option<Value>> {
        let path = normalize(path);
        let exact = self.row(path)?;

        let prefix = format!("{}/", path);
        let mut stmt = self.conn.prepare(
            "SELECT path, body FROM documents WHERE substr(path, 1, ?2)=?1 ORDER BY path",
        )?;
        let rows = stmt.query_map(params![prefix, prefix.chars().count() as i64], |r| {
            Ok((r.get::<_, String>(0)?, r.get::<_, String>(1)?))
        })?;
        let mut children = Vec::new();
        for row in rows {
            children.push(row?);
        }

        if exact.is_none() && children.is_empty() {
            return Ok(self.ancestor_row(path)?.and_then(|(_, body, rest)| {
                lookup(&body, &rest).filter(|v| !v.is_null()).cloned()
            }));
        }
        let mut root = match exact {
            Some(body) => serde_json::from_str(&body)?,
            None => Value::Object(Map::new()),
        };
        for (child_path, body) in children {
            let rel = &child_path[prefix.len()..];
            let segments: Vec<&str> = rel.split('/').filter(|s| !s.is_empty()).collect();
            insert_at(&mut root, &segments, serde_json::from_str(&body)?);
        }
        Ok(Some(root))
    }

    fn put_document(&self, path: &str, body: &Value) -> Result<()> {
        let path = normalize(path);
        let tx = self.conn.unchecked_transaction()?;
        self.remove_subtree(path)?;
        self.strip_from_ancestor(path)?;
        if !body.is_null() {
            self.conn.execute(
                "INSERT INTO documents(path, body) VALUES (?1, ?2)",
                params![path, serde_json::to_string(body)?],
            )?;
        }
        tx.commit()?;
        Ok(())
    }

    fn delete_document(&self, path: &str) -> Result<()> {
        let path = normalize(path);
        let tx = self.conn.unchecked_transaction()?;
        self.remove_subtree(path)?;
        self.strip_from_ancestor(path)?;
        tx.commit()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn subtree_is_assembled_from_rows() {
        let gw = SqliteGateway::in_memory().unwrap();
        gw.put_document("users/u1/expenses/a", &json!({"amount": 1}))
            .unwrap();
        gw.put_document("users/u1/expenses/b", &json!({"amount": 2}))
            .unwrap();
        gw.put_document("users/u2/expenses/c", &json!({"amount": 3}))
            .unwrap();

        let got = gw.get_document("users/u1/expenses").unwrap().unwrap();
        assert_eq!(got, json!({"a": {"amount": 1}, "b": {"amount": 2}}));
        assert!(gw.get_document("users/u3").unwrap().is_none());
    }

    #[test]
    fn put_replaces_descendants_and_children_merge_into_parent() {
        let gw = SqliteGateway::in_memory().unwrap();
        gw.put_document("users/u1/profile", &json!({"fullName": "A"}))
            .unwrap();
        gw.put_document("users/u1/profile/totalExpenses", &json!(12.5))
            .unwrap();
        let got = gw.get_document("users/u1/profile").unwrap().unwrap();
        assert_eq!(got, json!({"fullName": "A", "totalExpenses": 12.5}));

        gw.put_document("users/u1/profile", &json!({"fullName": "B"}))
            .unwrap();
        let got = gw.get_document("/users/u1/profile/").unwrap().unwrap();
        assert_eq!(got, json!({"fullName": "B"}));
    }

    #[test]
    fn delete_removes_subtree_only() {
        let gw = SqliteGateway::in_memory().unwrap();
        gw.put_document("users/u1/budgets/x", &json!({"a": 1})).unwrap();
        gw.put_document("users/u1/budgets-old/y", &json!({"a": 2}))
            .unwrap();
        gw.delete_document("users/u1/budgets").unwrap();
        assert!(gw.get_document("users/u1/budgets").unwrap().is_none());
        assert!(gw.get_document("users/u1/budgets-old").unwrap().is_some());
    }

    #[test]
    fn values_inside_a_stored_ancestor_are_reachable() {
        let gw = SqliteGateway::in_memory().unwrap();
        gw.put_document("users/u1/profile", &json!({"fullName": "A", "totalExpenses": 25}))
            .unwrap();
        assert_eq!(
            gw.get_document("users/u1/profile/totalExpenses").unwrap(),
            Some(json!(25))
        );
        assert!(gw.get_document("users/u1/profile/phone").unwrap().is_none());

        gw.put_document(
            "users/u1/expenses",
            &json!({"a": {"amount": 1}, "b": {"amount": 2}}),
        )
        .unwrap();
        assert_eq!(
            gw.get_document("users/u1/expenses/b/amount").unwrap(),
            Some(json!(2))
        );
        gw.delete_document("users/u1/expenses/a").unwrap();
        assert!(gw.get_document("users/u1/expenses/a").unwrap().is_none());
        assert_eq!(
            gw.get_document("users/u1/expenses").unwrap().unwrap(),
            json!({"b": {"amount": 2}})
        );
    }

    #[test]
    fn writing_below_an_ancestor_replaces_the_nested_value() {
        let gw = SqliteGateway::in_memory().unwrap();
        gw.put_document("users/u1/profile", &json!({"fullName": "A", "totalExpenses": 25}))
            .unwrap();
        gw.put_document("users/u1/profile/totalExpenses", &json!(40))
            .unwrap();
        gw.delete_document("users/u1/profile/totalExpenses").unwrap();
        assert!(gw.get_document("users/u1/profile/totalExpenses").unwrap().is_none());
        assert_eq!(
            gw.get_document("users/u1/profile").unwrap().unwrap(),
            json!({"fullName": "A"})
        );
    }
}
