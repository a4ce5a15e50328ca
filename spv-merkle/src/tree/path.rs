//! Tree Paths
//!
//! A path is the sequence of left/right choices leading from the root to a
//! node. Paths are stored root first; verification walks them in reverse.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One step down the tree.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Descend into the left child.
    Left,
    /// Descend into the right child.
    Right,
}

impl Direction {
    /// The opposite direction, addressing the sibling.
    #[inline]
    pub fn flip(self) -> Self {
        match self {
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }

    /// Bit value of this step in a leaf index (left = 0, right = 1).
    #[inline]
    pub fn bit(self) -> usize {
        match self {
            Self::Left => 0,
            Self::Right => 1,
        }
    }
}

/// Ordered directions from the root to a node.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Path(Vec<Direction>);

impl Path {
    /// The empty path, addressing the root.
    pub fn root() -> Self {
        Self(Vec::new())
    }

    /// Path of the `index`-th leaf (0-based) in a tree of the given height.
    ///
    /// The index bits, most significant first, pick the direction at each
    /// level. Returns None if the index does not fit the height.
    pub fn from_leaf_index(index: usize, height: usize) -> Option<Self> {
        let shift = |bits: usize| {
            u32::try_from(bits)
                .ok()
                .and_then(|b| index.checked_shr(b))
                .unwrap_or(0)
        };
        if shift(height) != 0 {
            return None;
        }
        let steps = (0..height)
            .rev()
            .map(|level| {
                if shift(level) & 1 == 0 {
                    Direction::Left
                } else {
                    Direction::Right
                }
            })
            .collect();
        Some(Self(steps))
    }

    /// Position of the addressed node within its level (0-based).
    ///
    /// None if the path is too deep for the position to fit a `usize`.
    pub fn position(&self) -> Option<usize> {
        if self.0.len() > usize::BITS as usize {
            return None;
        }
        Some(self.0.iter().fold(0, |acc, step| (acc << 1) | step.bit()))
    }

    /// Number of steps (depth of the addressed node).
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Does this path address the root?
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Append a step.
    pub fn push(&mut self, direction: Direction) {
        self.0.push(direction);
    }

    /// Steps in root-to-node order.
    pub fn steps(&self) -> &[Direction] {
        &self.0
    }

    /// Iterate steps in root-to-node order.
    pub fn iter(&self) -> std::slice::Iter<'_, Direction> {
        self.0.iter()
    }

    /// Paths of every sibling along this path, deepest first.
    ///
    /// At each level the last step is flipped to address the sibling, then
    /// one level is dropped. A path of length L yields L sibling paths.
    pub fn sibling_paths(&self) -> Vec<Path> {
        let mut current = self.0.clone();
        let mut paths = Vec::with_capacity(current.len());
        while let Some(last) = current.pop() {
            let mut sibling = current.clone();
            sibling.push(last.flip());
            paths.push(Path(sibling));
        }
        paths
    }
}

impl From<Vec<Direction>> for Path {
    fn from(steps: Vec<Direction>) -> Self {
        Self(steps)
    }
}

impl FromIterator<Direction> for Path {
    fn from_iter<I: IntoIterator<Item = Direction>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a Path {
    type Item = &'a Direction;
    type IntoIter = std::slice::Iter<'a, Direction>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return write!(f, "<root>");
        }
        for step in &self.0 {
            let c = match step {
                Direction::Left => 'L',
                Direction::Right => 'R',
            };
            write!(f, "{}", c)?;
        }
        Ok(())
    }
}
