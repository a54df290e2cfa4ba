use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Component, Path};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Node {
    Directory(BTreeMap<String, Node>),
    /// Serialized as `null`.
    File,
}

impl Default for Node {
    fn default() -> Self {
        Node::Directory(BTreeMap::new())
    }
}

impl Node {
    pub fn is_dir(&self) -> bool {
        matches!(self, Node::Directory(_))
    }

    pub fn count_files(&self) -> usize {
        match self {
            Node::File => 1,
            Node::Directory(children) => children.values().map(Node::count_files).sum(),
        }
    }

    fn insert(&mut self, segments: &[String]) {
        let Node::Directory(children) = self else {
            return;
        };
        match segments {
            [] => {}
            [leaf] => {
                let prev = children.insert(leaf.clone(), Node::File);
                debug_assert!(
                    !matches!(prev, Some(Node::Directory(_))),
                    "file '{}' replaces a directory",
                    leaf
                );
            }
            [dir, rest @ ..] => {
                let child = children.entry(dir.clone()).or_default();
                if !child.is_dir() {
                    debug_assert!(false, "directory '{}' replaces a file", dir);
                    *child = Node::default();
                }
                child.insert(rest);
            }
        }
    }
}

fn segments(path: &Path) -> Vec<String> {
    path.components()
        .filter_map(|c| match c {
            Component::Normal(s) => Some(s.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect()
}

/// Nests relative paths into a directory tree. Input order does not matter.
pub fn build_tree<I, P>(paths: I) -> Node
where
    I: IntoIterator<Item = P>,
    P: AsRef<Path>,
{
    let mut root = Node::default();
    for path in paths {
        root.insert(&segments(path.as_ref()));
    }
    root
}

/// Box-drawing lines for `tree`, files before directories, each group by name.
pub fn render_tree(tree: &Node) -> Vec<String> {
    let mut lines = Vec::new();
    if let Node::Directory(children) = tree {
        render_children(children, "", &mut lines);
    }
    lines
}

fn render_children(children: &BTreeMap<String, Node>, prefix: &str, lines: &mut Vec<String>) {
    let mut sorted: Vec<(&String, &Node)> = children.iter().collect();
    // Stable sort keeps the BTreeMap name order inside each group.
    sorted.sort_by_key(|(_, node)| node.is_dir());

    for (i, (name, node)) in sorted.iter().enumerate() {
        let is_last = i == sorted.len() - 1;
        let connector = if is_last { "└── " } else { "├── " };

        match node {
            Node::File => lines.push(format!("{}{}{}", prefix, connector, name)),
            Node::Directory(grandchildren) => {
                lines.push(format!("{}{}{}/", prefix, connector, name));
                let extension = if is_last { "    " } else { "│   " };
                render_children(grandchildren, &format!("{}{}", prefix, extension), lines);
            }
        }
    }
}
