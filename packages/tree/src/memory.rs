//! In-memory engine.
//!
//! Reference implementation of the session contract, used by tests and by
//! embedders that keep trees in process. Durable state lives behind a shared
//! handle, one tree per file path; a session edits a private working copy and
//! replaces the durable tree wholesale on save, so a dropped session leaves
//! nothing behind and a failed save leaves the previous state readable.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::expr::{self, Expr, Label, Pred, Step};
use crate::node::{self, Node};
use crate::{Error, TreeEngine, TreeSession};

#[derive(Default)]
struct State {
    files: HashMap<String, Vec<Node>>,
    fail_next_save: bool,
}

/// Engine holding parsed trees in memory.
#[derive(Clone, Default)]
pub struct MemoryEngine {
    state: Arc<Mutex<State>>,
}

impl MemoryEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the durable tree for a file, replacing any previous content.
    /// `children` are the entry-level nodes under the file root.
    pub fn load_file(&self, file: impl Into<String>, children: Vec<Node>) {
        self.lock().files.insert(file.into(), children);
    }

    /// Deterministic render of a file's durable tree, one `path = value` line
    /// per node. `None` for files never loaded.
    pub fn dump(&self, file: &str) -> Option<String> {
        let state = self.lock();
        let children = state.files.get(file)?;
        Some(node::render(&root_prefix(file), children))
    }

    /// Make the next save fail once. The durable state stays untouched.
    pub fn fail_next_save(&self) {
        self.lock().fail_next_save = true;
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

fn root_prefix(file: &str) -> String {
    format!("/files{}", file)
}

impl TreeEngine for MemoryEngine {
    type Session = MemorySession;

    fn open(&self, lens: &str, file: &str) -> Result<MemorySession, Error> {
        let children = self
            .lock()
            .files
            .get(file)
            .cloned()
            .ok_or_else(|| Error::Io {
                file: file.to_string(),
                message: "file is not loaded".to_string(),
            })?;
        log::debug!("opened {} through {}", file, lens);
        Ok(MemorySession {
            state: Arc::clone(&self.state),
            file: file.to_string(),
            prefix: root_prefix(file),
            root: Node::with_children(file, children),
        })
    }
}

/// One open file: a working copy of the tree plus a handle back to the
/// engine's durable state for `save`.
pub struct MemorySession {
    state: Arc<Mutex<State>>,
    file: String,
    prefix: String,
    root: Node,
}

impl MemorySession {
    /// Parse an expression, which must be scoped under this session's root.
    /// The bare root itself parses to an empty step list.
    fn parse(&self, raw: &str) -> Result<Expr, Error> {
        let rest = match raw.strip_prefix(self.prefix.as_str()) {
            Some(rest) if rest.is_empty() || rest.starts_with('/') => rest,
            _ => {
                return Err(Error::Expr {
                    expr: raw.to_string(),
                    message: format!("outside session root '{}'", self.prefix),
                })
            }
        };
        if rest.is_empty() {
            return Ok(Expr { steps: Vec::new() });
        }
        expr::parse(rest)
    }

    /// Concrete path for a resolved location, disambiguating duplicate labels
    /// with 1-based `[n]` the way `matches` reports them.
    fn render_path(&self, loc: &[usize]) -> String {
        let mut path = self.prefix.clone();
        let mut cur = &self.root;
        for &i in loc {
            let label = &cur.children[i].label;
            let occurrences = cur.children.iter().filter(|c| &c.label == label).count();
            if occurrences > 1 {
                let position = cur.children[..=i]
                    .iter()
                    .filter(|c| &c.label == label)
                    .count();
                path.push_str(&format!("/{}[{}]", label, position));
            } else {
                path.push_str(&format!("/{}", label));
            }
            cur = &cur.children[i];
        }
        path
    }

    /// Walk `steps`, creating the unmatched suffix where the grammar allows
    /// creation: plain labels, `[last()+1]`, and `[n]` for the next position.
    /// Wildcards and value predicates never create.
    fn resolve_or_create(&mut self, steps: &[Step], raw: &str) -> Result<&mut Node, Error> {
        let mut loc: Vec<usize> = Vec::new();
        for step in steps {
            let found = {
                let parent = node_at(&self.root, &loc);
                matching_children(parent, step)
            };
            if let Some(&i) = found.first() {
                loc.push(i);
                continue;
            }

            let label = match &step.label {
                Label::Name(name) => name.clone(),
                Label::Any => {
                    return Err(Error::NoMatch {
                        expr: raw.to_string(),
                    })
                }
            };
            let parent = node_at_mut(&mut self.root, &loc);
            let creatable = match &step.pred {
                None | Some(Pred::AfterLast) => true,
                Some(Pred::Index(n)) => *n == parent.count(&label) + 1,
                Some(Pred::Last) | Some(Pred::ChildEq(..)) => false,
            };
            if !creatable {
                return Err(Error::NoMatch {
                    expr: raw.to_string(),
                });
            }
            parent.children.push(Node::bare(label));
            loc.push(parent.children.len() - 1);
        }
        Ok(node_at_mut(&mut self.root, &loc))
    }
}

impl TreeSession for MemorySession {
    fn get(&mut self, raw: &str) -> Result<Option<String>, Error> {
        let parsed = self.parse(raw)?;
        let locations = select(&self.root, &parsed.steps);
        Ok(locations
            .first()
            .and_then(|loc| node_at(&self.root, loc).value.clone()))
    }

    fn set(&mut self, raw: &str, value: &str) -> Result<(), Error> {
        let parsed = self.parse(raw)?;
        let node = self.resolve_or_create(&parsed.steps, raw)?;
        node.value = Some(value.to_string());
        Ok(())
    }

    fn matches(&mut self, raw: &str) -> Result<Vec<String>, Error> {
        let parsed = self.parse(raw)?;
        let locations = select(&self.root, &parsed.steps);
        Ok(locations.iter().map(|loc| self.render_path(loc)).collect())
    }

    fn insert(&mut self, anchor: &str, label: &str, before: bool) -> Result<(), Error> {
        let parsed = self.parse(anchor)?;
        let locations = select(&self.root, &parsed.steps);
        let loc = match locations.as_slice() {
            [] => {
                return Err(Error::NoMatch {
                    expr: anchor.to_string(),
                })
            }
            [single] => single,
            many => {
                return Err(Error::Ambiguous {
                    expr: anchor.to_string(),
                    count: many.len(),
                })
            }
        };
        let Some((&pos, parent_loc)) = loc.split_last() else {
            return Err(Error::Expr {
                expr: anchor.to_string(),
                message: "cannot insert beside the root".to_string(),
            });
        };
        let parent = node_at_mut(&mut self.root, parent_loc);
        let at = if before { pos } else { pos + 1 };
        parent.children.insert(at, Node::bare(label));
        Ok(())
    }

    fn remove(&mut self, raw: &str) -> Result<usize, Error> {
        let parsed = self.parse(raw)?;
        if parsed.steps.is_empty() {
            return Err(Error::Expr {
                expr: raw.to_string(),
                message: "cannot remove the root".to_string(),
            });
        }
        let mut locations = select(&self.root, &parsed.steps);
        let count = locations.len();
        // Remove in reverse document order so sibling indices stay valid.
        locations.sort();
        for loc in locations.iter().rev() {
            if let Some((&pos, parent_loc)) = loc.split_last() {
                let parent = node_at_mut(&mut self.root, parent_loc);
                parent.children.remove(pos);
            }
        }
        Ok(count)
    }

    fn save(&mut self) -> Result<(), Error> {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        if state.fail_next_save {
            state.fail_next_save = false;
            return Err(Error::Save {
                file: self.file.clone(),
                message: "save rejected".to_string(),
            });
        }
        renumber(&mut self.root);
        state.files.insert(self.file.clone(), self.root.children.clone());
        log::debug!("saved {}", self.file);
        Ok(())
    }
}

/// All locations matching `steps`, in document order. A location is the child
/// index path from the root; the empty path is the root itself.
fn select(root: &Node, steps: &[Step]) -> Vec<Vec<usize>> {
    let mut locations: Vec<Vec<usize>> = vec![Vec::new()];
    for step in steps {
        let mut next = Vec::new();
        for loc in &locations {
            let parent = node_at(root, loc);
            for i in matching_children(parent, step) {
                let mut child = loc.clone();
                child.push(i);
                next.push(child);
            }
        }
        locations = next;
        if locations.is_empty() {
            break;
        }
    }
    locations
}

/// Child indices of `parent` matching one step, in sibling order.
fn matching_children(parent: &Node, step: &Step) -> Vec<usize> {
    let labeled: Vec<usize> = parent
        .children
        .iter()
        .enumerate()
        .filter(|(_, c)| match &step.label {
            Label::Any => true,
            Label::Name(name) => &c.label == name,
        })
        .map(|(i, _)| i)
        .collect();
    match &step.pred {
        None => labeled,
        Some(Pred::Index(n)) => labeled.get(n - 1).map(|&i| vec![i]).unwrap_or_default(),
        Some(Pred::Last) => labeled.last().map(|&i| vec![i]).unwrap_or_default(),
        Some(Pred::AfterLast) => Vec::new(),
        Some(Pred::ChildEq(child, value)) => labeled
            .into_iter()
            .filter(|&i| {
                parent.children[i]
                    .children
                    .iter()
                    .any(|c| &c.label == child && c.value.as_deref() == Some(value.as_str()))
            })
            .collect(),
    }
}

fn node_at<'a>(root: &'a Node, loc: &[usize]) -> &'a Node {
    let mut cur = root;
    for &i in loc {
        cur = &cur.children[i];
    }
    cur
}

fn node_at_mut<'a>(root: &'a mut Node, loc: &[usize]) -> &'a mut Node {
    let mut cur = root;
    for &i in loc {
        cur = &mut cur.children[i];
    }
    cur
}

/// Entry-level nodes carry purely numeric labels; saving renumbers them
/// sequentially in sibling order. This is what lets a writer stage a new entry
/// under a fixed placeholder label and rely on the engine to slot it in.
fn renumber(root: &mut Node) {
    let mut n = 0;
    for child in &mut root.children {
        if !child.label.is_empty() && child.label.chars().all(|c| c.is_ascii_digit()) {
            n += 1;
            child.label = n.to_string();
        }
    }
}
