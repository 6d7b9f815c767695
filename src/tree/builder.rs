//! Dependency tree construction
//!
//! Construction is a single pass over one sentence:
//! 1. Index every word by `token_index`
//! 2. Find the single word labelled `root`
//! 3. Attach every other word under the word named by its `governor`, in
//!    input order
//!
//! Children therefore appear in the order their words appear in the input.
//! Construction and every traversal use explicit work stacks, so a chain of
//! governors as long as the sentence does not grow the call stack.

use crate::document::{Word, ROOT_RELATION};
use crate::tree::form::{Dependency, Form, UNLABELLED};
use serde::{Serialize, Serializer};
use std::collections::HashMap;
use std::fmt;
use thiserror::Error;
use tracing::trace;

/// Ways a sentence can fail to form a tree
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TreeError {
    #[error("Expected exactly one root word in the sentence, found {found}")]
    NoRoot { found: usize },

    #[error("Governor {} of token {token_index} is not a token of the sentence", describe_governor(.governor))]
    DanglingGovernor {
        token_index: usize,
        governor: Option<usize>,
    },

    #[error("Token index {token_index} appears more than once in the sentence")]
    DuplicateToken { token_index: usize },

    #[error("Token {token_index} is not reachable from the root (governor cycle)")]
    Cycle { token_index: usize },
}

fn describe_governor(governor: &Option<usize>) -> String {
    match governor {
        Some(index) => index.to_string(),
        None => "<none>".to_string(),
    }
}

/// A rooted, ordered dependency tree for one sentence.
///
/// Serializes flat: the root's id plus every node in pre-order, each node
/// listing its children by id.
#[derive(Clone, PartialEq, Eq)]
pub struct DependencyTree {
    root: Form,
}

impl DependencyTree {
    /// Wrap an already assembled node as a tree root.
    pub fn new(mut root: Form) -> Self {
        root.relation = ROOT_RELATION.to_string();
        DependencyTree { root }
    }

    /// Build a tree from one sentence's words.
    pub fn build(words: &[Word]) -> Result<Self, TreeError> {
        let mut positions: HashMap<usize, usize> = HashMap::with_capacity(words.len());
        for (position, word) in words.iter().enumerate() {
            if positions.insert(word.token_index, position).is_some() {
                return Err(TreeError::DuplicateToken {
                    token_index: word.token_index,
                });
            }
        }

        let roots: Vec<usize> = words
            .iter()
            .enumerate()
            .filter(|(_, word)| word.is_root())
            .map(|(position, _)| position)
            .collect();
        let root_position = match roots.as_slice() {
            [single] => *single,
            _ => return Err(TreeError::NoRoot { found: roots.len() }),
        };

        let mut children: Vec<Vec<usize>> = vec![Vec::new(); words.len()];
        for (position, word) in words.iter().enumerate() {
            if position == root_position {
                continue;
            }
            let head = word
                .governor
                .and_then(|governor| positions.get(&governor))
                .ok_or(TreeError::DanglingGovernor {
                    token_index: word.token_index,
                    governor: word.governor,
                })?;
            children[*head].push(position);
        }

        let order = preorder(root_position, &children);
        let mut visited = vec![false; words.len()];
        for &position in &order {
            visited[position] = true;
        }
        if let Some(position) = visited.iter().position(|seen| !seen) {
            return Err(TreeError::Cycle {
                token_index: words[position].token_index,
            });
        }

        // Reverse pre-order finishes every child before its head.
        let mut built: Vec<Option<Form>> = (0..words.len()).map(|_| None).collect();
        for &position in order.iter().skip(1).rev() {
            let form = assemble(position, words, &children, &mut built);
            built[position] = Some(form);
        }
        let root = assemble(root_position, words, &children, &mut built);

        trace!(words = words.len(), root = %root, "built dependency tree");
        Ok(DependencyTree::new(root))
    }

    pub fn root(&self) -> &Form {
        &self.root
    }

    /// All edges, depth first.
    ///
    /// For each node, a child's own edges come before the edge linking the
    /// node to that child; the synthetic `root` edge is always last.
    pub fn get_dependencies(&self) -> Vec<Dependency<'_>> {
        let mut deps = Vec::new();
        // (node, index of the next child to descend into)
        let mut stack: Vec<(&Form, usize)> = vec![(&self.root, 0)];
        while let Some((node, next)) = stack.pop() {
            if let Some(child) = node.children.get(next) {
                stack.push((node, next + 1));
                stack.push((child, 0));
            } else if let Some(&(head, _)) = stack.last() {
                deps.push(Dependency {
                    head: Some(head),
                    dependent: node,
                    relation: node.relation.as_str(),
                });
            }
        }
        deps.push(Dependency {
            head: None,
            dependent: &self.root,
            relation: ROOT_RELATION,
        });
        deps
    }

    /// Nodes in pre-order, paired with their depth (root at 0).
    pub fn walk(&self) -> Vec<(usize, &Form)> {
        let mut out = Vec::new();
        let mut stack = vec![(0, &self.root)];
        while let Some((depth, node)) = stack.pop() {
            out.push((depth, node));
            stack.extend(node.children.iter().rev().map(|child| (depth + 1, child)));
        }
        out
    }

    pub fn len(&self) -> usize {
        self.walk().len()
    }

    /// A tree always holds at least its root.
    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn find(&self, token_index: usize) -> Option<&Form> {
        self.walk()
            .into_iter()
            .map(|(_, form)| form)
            .find(|form| form.id == token_index)
    }
}

impl fmt::Debug for DependencyTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DependencyTree")
            .field("nodes", &self.walk())
            .finish()
    }
}

impl Serialize for DependencyTree {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        #[derive(Serialize)]
        struct Flat<'a> {
            root: usize,
            nodes: Vec<&'a Form>,
        }

        Flat {
            root: self.root.id,
            nodes: self.walk().into_iter().map(|(_, node)| node).collect(),
        }
        .serialize(serializer)
    }
}

/// Positions reachable from `root`, in pre-order.
fn preorder(root: usize, children: &[Vec<usize>]) -> Vec<usize> {
    let mut order = Vec::with_capacity(children.len());
    let mut stack = vec![root];
    while let Some(position) = stack.pop() {
        order.push(position);
        stack.extend(children[position].iter().rev());
    }
    order
}

/// One node with its already built dependents attached.
fn assemble(
    position: usize,
    words: &[Word],
    children: &[Vec<usize>],
    built: &mut [Option<Form>],
) -> Form {
    let mut form = Form::from_word(&words[position]);
    for &child in &children[position] {
        if let Some(dependent) = built[child].take() {
            let relation = words[child]
                .dependency_relation
                .clone()
                .unwrap_or_else(|| UNLABELLED.to_string());
            form.attach(dependent, relation);
        }
    }
    form
}
