//! Tree nodes and the edges between them

use crate::document::Word;
use serde::{Serialize, Serializer};
use std::fmt;

/// Relation label used on edges whose dependent carries no label
pub const UNLABELLED: &str = "_";

/// A dependency-tree node wrapping one word.
///
/// `features` keeps insertion order: lemma, pos, upos, xpos, then the
/// morphological features sorted by name. `relation` is the label of the edge
/// from this node's head (`root` for the tree root).
///
/// Cloning, comparing and dropping walk the subtree with a work stack rather
/// than recursion. `Debug` and `Serialize` list children by id only.
pub struct Form {
    pub form: String,
    pub id: usize,
    pub relation: String,
    pub features: Vec<(String, String)>,
    pub children: Vec<Form>,
}

impl Form {
    pub fn new(form: impl Into<String>, id: usize) -> Self {
        Form {
            form: form.into(),
            id,
            relation: String::new(),
            features: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Builder-style POS assignment.
    pub fn with_pos(mut self, pos: impl Into<String>) -> Self {
        self.set("pos", pos);
        self
    }

    /// Set a feature, replacing an earlier value under the same name.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.features.iter_mut().find(|(key, _)| *key == name) {
            Some(entry) => entry.1 = value,
            None => self.features.push((name, value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.features
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn pos(&self) -> Option<&str> {
        self.get("pos")
    }

    /// Make `child` a dependent of this node under `relation`.
    pub fn attach(&mut self, mut child: Form, relation: impl Into<String>) {
        child.relation = relation.into();
        self.children.push(child);
    }

    pub fn children(&self) -> &[Form] {
        &self.children
    }

    /// Edges from this node to its direct dependents labelled `relation`.
    pub fn dependencies_with(&self, relation: &str) -> Vec<Dependency<'_>> {
        self.children
            .iter()
            .filter(|child| child.relation == relation)
            .map(|child| Dependency {
                head: Some(self),
                dependent: child,
                relation: child.relation.as_str(),
            })
            .collect()
    }

    /// `form_id [name=value,...]`, optionally followed by the relation.
    pub fn full_str(&self, include_relation: bool) -> String {
        let mut pairs: Vec<String> = self
            .features
            .iter()
            .map(|(name, value)| format!("{}={}", name, value))
            .collect();
        if include_relation && !self.relation.is_empty() {
            pairs.push(format!("relation={}", self.relation));
        }
        format!("{}_{} [{}]", self.form, self.id, pairs.join(","))
    }

    /// Convert an annotated word into a detached node.
    pub fn from_word(word: &Word) -> Self {
        let mut form = Form::new(word.string.clone(), word.token_index);
        let optional = [
            ("lemma", &word.lemma),
            ("pos", &word.part_of_speech),
            ("upos", &word.upos),
            ("xpos", &word.xpos),
        ];
        for (name, value) in optional {
            if let Some(value) = value {
                form.set(name, value.clone());
            }
        }
        for (name, value) in &word.morphological_features {
            form.set(name.clone(), value.clone());
        }
        form
    }
}

impl Form {
    /// This node without its children.
    fn detached(&self) -> Form {
        Form {
            form: self.form.clone(),
            id: self.id,
            relation: self.relation.clone(),
            features: self.features.clone(),
            children: Vec::with_capacity(self.children.len()),
        }
    }

    fn child_ids(&self) -> Vec<usize> {
        self.children.iter().map(|child| child.id).collect()
    }
}

impl Clone for Form {
    fn clone(&self) -> Self {
        // (source node, next child to copy, copy under construction)
        let mut stack: Vec<(&Form, usize, Form)> = vec![(self, 0, self.detached())];
        loop {
            let top = stack.len() - 1;
            let (source, next) = (stack[top].0, stack[top].1);
            match source.children.get(next) {
                Some(child) => {
                    stack[top].1 += 1;
                    stack.push((child, 0, child.detached()));
                }
                None => {
                    let (_, _, done) = stack.swap_remove(top);
                    match stack.last_mut() {
                        Some((_, _, parent)) => parent.children.push(done),
                        None => return done,
                    }
                }
            }
        }
    }
}

impl PartialEq for Form {
    fn eq(&self, other: &Self) -> bool {
        let mut pending = vec![(self, other)];
        while let Some((left, right)) = pending.pop() {
            if left.form != right.form
                || left.id != right.id
                || left.relation != right.relation
                || left.features != right.features
                || left.children.len() != right.children.len()
            {
                return false;
            }
            pending.extend(left.children.iter().zip(&right.children));
        }
        true
    }
}

impl Eq for Form {}

impl Drop for Form {
    fn drop(&mut self) {
        let mut pending = std::mem::take(&mut self.children);
        while let Some(mut node) = pending.pop() {
            pending.append(&mut node.children);
        }
    }
}

impl fmt::Debug for Form {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Form")
            .field("form", &self.form)
            .field("id", &self.id)
            .field("relation", &self.relation)
            .field("features", &self.features)
            .field("children", &self.child_ids())
            .finish()
    }
}

impl Serialize for Form {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        #[derive(Serialize)]
        struct Node<'a> {
            form: &'a str,
            id: usize,
            relation: &'a str,
            features: &'a [(String, String)],
            children: Vec<usize>,
        }

        Node {
            form: &self.form,
            id: self.id,
            relation: &self.relation,
            features: &self.features,
            children: self.child_ids(),
        }
        .serialize(serializer)
    }
}

impl fmt::Display for Form {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.form, self.id)?;
        if let Some(pos) = self.pos() {
            write!(f, "/{}", pos)?;
        }
        Ok(())
    }
}

/// A directed edge between a head and its dependent.
///
/// The synthetic edge above the tree root has no head.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dependency<'a> {
    pub head: Option<&'a Form>,
    pub dependent: &'a Form,
    pub relation: &'a str,
}

impl fmt::Display for Dependency<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.head {
            Some(head) => write!(f, "{}({}, {})", self.relation, head, self.dependent),
            None => write!(f, "{}(ROOT, {})", self.relation, self.dependent),
        }
    }
}
