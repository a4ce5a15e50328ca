//! Binary Hash Tree
//!
//! Complete binary SHA-256 tree over an ordered record list.
//!
//! ## Padding
//!
//! The leaf layer is padded to a power of two (at least two leaves) by
//! emitting a second, identical leaf for each of the *first*
//! `leaf_count - record_count` records. For 9 records the layer reads
//! `r0 r0 r1 r1 .. r6 r6 r7 r8`.
//!
//! Padding leaves are copies, not independent evidence: two different
//! record lists can share padded positions, and a proof for a padded leaf
//! says nothing beyond the proof for its original. Changing this policy to
//! sentinel leaves would change every root, so it is kept as is.

use tracing::{debug, trace};

use crate::core::config::{TreeConfig, MIN_LEAF_COUNT};
use crate::core::hash::{hash_leaf, hash_nodes, to_hex, NodeHash};
use crate::proof::inclusion::InclusionProof;
use crate::tree::node::{NodeId, TreeNode};
use crate::tree::path::{Direction, Path};

/// Tree construction and lookup errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TreeError {
    /// No records to build from.
    #[error("cannot build a tree from an empty record list")]
    EmptyInput,

    /// Record count beyond the supported leaf range.
    #[error("{records} records exceed the supported capacity of {limit}")]
    CapacityExceeded {
        /// Records supplied.
        records: usize,
        /// Largest accepted record count.
        limit: usize,
    },

    /// A layer failed to pair up into its parent layer.
    #[error("tree construction failed: layer at depth {depth} has {nodes} nodes")]
    Construction {
        /// Depth of the offending layer.
        depth: usize,
        /// Node count found in that layer.
        nodes: usize,
    },

    /// No node carries the requested hash.
    #[error("hash {0} not found in tree")]
    NotFound(String),

    /// Path leaves the tree.
    #[error("invalid path: step {step} of {len} has no child to follow")]
    InvalidPath {
        /// Index of the step that could not be followed.
        step: usize,
        /// Total path length.
        len: usize,
    },

    /// Record index beyond the record list.
    #[error("record index {index} out of range for {count} records")]
    RecordOutOfRange {
        /// Requested index.
        index: usize,
        /// Number of records.
        count: usize,
    },

    /// Leaf index beyond the leaf layer.
    #[error("leaf index {index} out of range for {count} leaves")]
    LeafOutOfRange {
        /// Requested index.
        index: usize,
        /// Number of leaves.
        count: usize,
    },
}

/// Binary hash tree built once from a record snapshot.
///
/// Immutable after [`HashTree::build`]; share it behind `&` or `Arc` for
/// concurrent lookups.
#[derive(Clone, Debug)]
pub struct HashTree {
    /// Record snapshot, in build order.
    records: Vec<Vec<u8>>,
    /// Node arena. Leaves occupy `0..leaf_count` in left-to-right order.
    nodes: Vec<TreeNode>,
    /// Root node.
    root: NodeId,
    /// Number of leaves (a power of two).
    leaf_count: usize,
}

impl HashTree {
    /// Build a tree with the default (unbounded) configuration.
    pub fn build<R: AsRef<[u8]>>(records: &[R]) -> Result<Self, TreeError> {
        Self::build_with_config(records, &TreeConfig::default())
    }

    /// Build a tree from an ordered record list.
    pub fn build_with_config<R: AsRef<[u8]>>(
        records: &[R],
        config: &TreeConfig,
    ) -> Result<Self, TreeError> {
        let record_count = records.len();
        if record_count == 0 {
            return Err(TreeError::EmptyInput);
        }
        let leaf_count = leaf_count_for(record_count, config)?;
        let height = leaf_count.trailing_zeros() as usize;
        let padding = leaf_count - record_count;

        let records: Vec<Vec<u8>> = records.iter().map(|r| r.as_ref().to_vec()).collect();
        let mut nodes = Vec::with_capacity(2 * leaf_count - 1);

        // Leaf layer, duplicating the first `padding` records
        let mut layer = Vec::with_capacity(leaf_count);
        for (i, record) in records.iter().enumerate() {
            let hash = hash_leaf(record);
            layer.push(push_node(&mut nodes, TreeNode::leaf(hash, height)));
            if i < padding {
                layer.push(push_node(&mut nodes, TreeNode::leaf(hash, height)));
            }
        }
        if layer.len() != leaf_count {
            return Err(TreeError::Construction {
                depth: height,
                nodes: layer.len(),
            });
        }

        // Pair layers up to the root
        let mut depth = height;
        while layer.len() > 1 {
            if layer.len() % 2 != 0 {
                return Err(TreeError::Construction {
                    depth,
                    nodes: layer.len(),
                });
            }
            depth -= 1;

            let mut next = Vec::with_capacity(layer.len() / 2);
            for pair in layer.chunks_exact(2) {
                let (left, right) = (pair[0], pair[1]);
                let hash = hash_nodes(&nodes[left.0].hash, &nodes[right.0].hash);
                let parent = push_node(&mut nodes, TreeNode::internal(hash, depth, left, right));
                nodes[left.0].parent = Some(parent);
                nodes[right.0].parent = Some(parent);
                next.push(parent);
            }
            layer = next;
        }

        let root = match layer.as_slice() {
            [root] if depth == 0 => *root,
            _ => {
                return Err(TreeError::Construction {
                    depth,
                    nodes: layer.len(),
                })
            }
        };

        debug!(
            records = record_count,
            leaves = leaf_count,
            padding,
            height,
            root = %to_hex(&nodes[root.0].hash),
            "built hash tree"
        );

        Ok(Self {
            records,
            nodes,
            root,
            leaf_count,
        })
    }

    // =========================================================================
    // Shape
    // =========================================================================

    /// The root node.
    pub fn root(&self) -> &TreeNode {
        &self.nodes[self.root.0]
    }

    /// The root hash, the commitment to the whole record set.
    pub fn root_hash(&self) -> NodeHash {
        self.root().hash
    }

    /// Leaf depth (number of steps in a leaf path).
    pub fn height(&self) -> usize {
        self.leaf_count.trailing_zeros() as usize
    }

    /// Number of leaves, padding included.
    pub fn leaf_count(&self) -> usize {
        self.leaf_count
    }

    /// Number of records the tree was built from.
    pub fn record_count(&self) -> usize {
        self.records.len()
    }

    /// Number of duplicate leaves added for padding.
    pub fn padding_count(&self) -> usize {
        self.leaf_count - self.records.len()
    }

    /// The record snapshot.
    pub fn records(&self) -> &[Vec<u8>] {
        &self.records
    }

    /// Leaf hashes in left-to-right order.
    pub fn leaf_hashes(&self) -> impl Iterator<Item = &NodeHash> + '_ {
        self.nodes[..self.leaf_count].iter().map(|node| &node.hash)
    }

    /// Node by arena id.
    pub fn node(&self, id: NodeId) -> Option<&TreeNode> {
        self.nodes.get(id.0)
    }

    /// Parent of a node, None for the root.
    pub fn parent_of(&self, id: NodeId) -> Option<&TreeNode> {
        self.node(id)?.parent.and_then(|parent| self.node(parent))
    }

    // =========================================================================
    // Lookup
    // =========================================================================

    /// Find the path to the first node carrying `target`.
    ///
    /// Search is depth-first pre-order, left before right, over every node.
    /// With duplicate hashes the first match in that order wins; use
    /// [`HashTree::path_for_record`] to address a specific record.
    pub fn find_path(&self, target: &NodeHash) -> Result<Path, TreeError> {
        let mut stack = vec![self.root];
        while let Some(id) = stack.pop() {
            let node = &self.nodes[id.0];
            if node.hash == *target {
                return Ok(self.path_to(id));
            }
            if let (Some(left), Some(right)) = (node.left, node.right) {
                stack.push(right);
                stack.push(left);
            }
        }
        trace!(target = %to_hex(target), "hash not in tree");
        Err(TreeError::NotFound(to_hex(target)))
    }

    /// Follow `path` from the root.
    pub fn node_at(&self, path: &Path) -> Result<&TreeNode, TreeError> {
        let mut node = self.root();
        for (step, direction) in path.iter().enumerate() {
            let child = match direction {
                Direction::Left => node.left,
                Direction::Right => node.right,
            };
            node = child
                .and_then(|id| self.node(id))
                .ok_or(TreeError::InvalidPath {
                    step,
                    len: path.len(),
                })?;
        }
        Ok(node)
    }

    /// Sibling hashes needed to recompute the root from the node at `path`.
    ///
    /// Ordered from the node's immediate sibling up to the sibling just below
    /// the root: one hash per step of `path`.
    pub fn sibling_hashes_for(&self, path: &Path) -> Result<Vec<NodeHash>, TreeError> {
        // Validate the whole path first so a too-long path reports its own step
        self.node_at(path)?;
        path.sibling_paths()
            .iter()
            .map(|sibling| self.node_at(sibling).map(|node| node.hash))
            .collect()
    }

    /// Paths of the siblings returned by [`HashTree::sibling_hashes_for`].
    pub fn sibling_paths_for(&self, path: &Path) -> Result<Vec<Path>, TreeError> {
        self.node_at(path)?;
        Ok(path.sibling_paths())
    }

    /// Leaf position of a record (its first copy when padded).
    pub fn leaf_index_for_record(&self, index: usize) -> Result<usize, TreeError> {
        let count = self.records.len();
        if index >= count {
            return Err(TreeError::RecordOutOfRange { index, count });
        }
        let padding = self.padding_count();
        Ok(if index < padding { 2 * index } else { padding + index })
    }

    /// Path of the `index`-th leaf.
    pub fn path_for_leaf(&self, index: usize) -> Result<Path, TreeError> {
        if index >= self.leaf_count {
            return Err(TreeError::LeafOutOfRange {
                index,
                count: self.leaf_count,
            });
        }
        Path::from_leaf_index(index, self.height()).ok_or(TreeError::LeafOutOfRange {
            index,
            count: self.leaf_count,
        })
    }

    /// Path of the `index`-th record, independent of duplicate hashes.
    pub fn path_for_record(&self, index: usize) -> Result<Path, TreeError> {
        self.path_for_leaf(self.leaf_index_for_record(index)?)
    }

    // =========================================================================
    // Proofs
    // =========================================================================

    /// Inclusion proof for the first node carrying `leaf_hash`.
    pub fn prove(&self, leaf_hash: &NodeHash) -> Result<InclusionProof, TreeError> {
        let path = self.find_path(leaf_hash)?;
        self.proof_at(path)
    }

    /// Inclusion proof for a record's hash.
    pub fn prove_data(&self, record: &[u8]) -> Result<InclusionProof, TreeError> {
        self.prove(&hash_leaf(record))
    }

    /// Inclusion proof for the `index`-th record.
    pub fn prove_record(&self, index: usize) -> Result<InclusionProof, TreeError> {
        let path = self.path_for_record(index)?;
        self.proof_at(path)
    }

    fn proof_at(&self, path: Path) -> Result<InclusionProof, TreeError> {
        let leaf_hash = self.node_at(&path)?.hash;
        let siblings = self.sibling_hashes_for(&path)?;
        Ok(InclusionProof {
            leaf_hash,
            path,
            siblings,
        })
    }

    /// Rebuild the path of a node by walking parent links.
    fn path_to(&self, id: NodeId) -> Path {
        let mut steps = Vec::with_capacity(self.height());
        let mut current = id;
        while let Some(parent) = self.nodes[current.0].parent {
            let direction = if self.nodes[parent.0].left == Some(current) {
                Direction::Left
            } else {
                Direction::Right
            };
            steps.push(direction);
            current = parent;
        }
        steps.reverse();
        Path::from(steps)
    }
}

/// Leaf count for `records` records: the next power of two, at least two.
fn leaf_count_for(records: usize, config: &TreeConfig) -> Result<usize, TreeError> {
    if let Some(limit) = config.max_records {
        if records > limit {
            return Err(TreeError::CapacityExceeded { records, limit });
        }
    }
    records
        .checked_next_power_of_two()
        .map(|count| count.max(MIN_LEAF_COUNT))
        .ok_or(TreeError::CapacityExceeded {
            records,
            limit: 1 << (usize::BITS - 1),
        })
}

fn push_node(nodes: &mut Vec<TreeNode>, node: TreeNode) -> NodeId {
    nodes.push(node);
    NodeId(nodes.len() - 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use Direction::{Left as L, Right as R};

    const SCENARIO: [&str; 9] = ["123", "456", "789", "abc", "def", "ghi", "jkl", "mno", "pqr"];

    fn numbered(n: usize) -> Vec<Vec<u8>> {
        (0..n).map(|i| format!("tx_{}", i).into_bytes()).collect()
    }

    #[test]
    fn test_empty_input() {
        let records: Vec<Vec<u8>> = vec![];
        assert_eq!(HashTree::build(&records).unwrap_err(), TreeError::EmptyInput);
    }

    #[test]
    fn test_determinism() {
        let tree1 = HashTree::build(&SCENARIO).unwrap();
        let tree2 = HashTree::build(&SCENARIO).unwrap();
        assert_eq!(tree1.root_hash(), tree2.root_hash());
    }

    #[test]
    fn test_scenario_shape() {
        let tree = HashTree::build(&SCENARIO).unwrap();
        assert_eq!(tree.record_count(), 9);
        assert_eq!(tree.leaf_count(), 16);
        assert_eq!(tree.padding_count(), 7);
        assert_eq!(tree.height(), 4);
        assert_eq!(tree.root().depth, 0);
        assert!(tree.root().is_root());

        // r0 r0 r1 r1 .. r6 r6 r7 r8
        let leaves: Vec<NodeHash> = tree.leaf_hashes().copied().collect();
        for i in 0..7 {
            assert_eq!(leaves[2 * i], hash_leaf(SCENARIO[i].as_bytes()));
            assert_eq!(leaves[2 * i + 1], hash_leaf(SCENARIO[i].as_bytes()));
        }
        assert_eq!(leaves[14], hash_leaf(b"mno"));
        assert_eq!(leaves[15], hash_leaf(b"pqr"));
    }

    #[test]
    fn test_single_record() {
        let tree = HashTree::build(&["solo"]).unwrap();
        let leaf = hash_leaf(b"solo");

        assert_eq!(tree.leaf_count(), 2);
        assert_eq!(tree.padding_count(), 1);
        assert_eq!(tree.root_hash(), hash_nodes(&leaf, &leaf));
    }

    #[test]
    fn test_two_records() {
        let tree = HashTree::build(&["a", "b"]).unwrap();
        assert_eq!(tree.padding_count(), 0);
        assert_eq!(
            tree.root_hash(),
            hash_nodes(&hash_leaf(b"a"), &hash_leaf(b"b"))
        );
    }

    #[test]
    fn test_no_padding_for_powers_of_two() {
        for n in [2, 4, 8, 16, 32, 64] {
            let tree = HashTree::build(&numbered(n)).unwrap();
            assert_eq!(tree.leaf_count(), n);
            assert_eq!(tree.padding_count(), 0);
        }
    }

    #[test]
    fn test_padding_count() {
        for n in 1..=70usize {
            let records = numbered(n);
            let tree = HashTree::build(&records).unwrap();
            let expected_leaves = n.next_power_of_two().max(2);
            let padding = expected_leaves - n;
            assert_eq!(tree.leaf_count(), expected_leaves, "n = {}", n);
            assert_eq!(tree.padding_count(), padding, "n = {}", n);

            let leaves: Vec<NodeHash> = tree.leaf_hashes().copied().collect();
            assert_eq!(leaves.len(), expected_leaves);

            // Leading records appear twice, side by side
            for (i, record) in records.iter().enumerate().take(padding) {
                let hash = hash_leaf(record);
                assert_eq!(leaves[2 * i], hash, "n = {}, record {}", n, i);
                assert_eq!(leaves[2 * i + 1], hash, "n = {}, record {}", n, i);
            }

            // Remaining records appear once, in order
            for (i, record) in records.iter().enumerate().skip(padding) {
                assert_eq!(leaves[padding + i], hash_leaf(record), "n = {}, record {}", n, i);
            }
            let tail = &leaves[2 * padding..];
            for (j, hash) in tail.iter().enumerate() {
                assert!(!tail[j + 1..].contains(hash), "n = {}, leaf {}", n, 2 * padding + j);
            }
            assert!(tail.iter().all(|hash| !leaves[..2 * padding].contains(hash)));
        }
    }

    #[test]
    fn test_adding_or_removing_record_changes_root() {
        let mut roots = Vec::new();
        for n in 1..=40 {
            roots.push(HashTree::build(&numbered(n)).unwrap().root_hash());
        }
        for i in 0..roots.len() {
            for j in (i + 1)..roots.len() {
                assert_ne!(roots[i], roots[j], "n = {} vs n = {}", i + 1, j + 1);
            }
        }
    }

    #[test]
    fn test_internal_hashes_are_consistent() {
        let tree = HashTree::build(&SCENARIO).unwrap();
        for node in &tree.nodes {
            if let (Some(left), Some(right)) = (node.left, node.right) {
                let l = tree.node(left).unwrap();
                let r = tree.node(right).unwrap();
                assert_eq!(node.hash, hash_nodes(&l.hash, &r.hash));
                assert_eq!(l.depth, node.depth + 1);
                assert!(tree.parent_of(left).is_some());
            } else {
                assert_eq!(node.depth, tree.height());
            }
        }
    }

    #[test]
    fn test_capacity_exceeded() {
        let records = numbered(513);
        let err = HashTree::build_with_config(&records, &TreeConfig::legacy()).unwrap_err();
        assert_eq!(
            err,
            TreeError::CapacityExceeded {
                records: 513,
                limit: 512
            }
        );

        // Exactly at the bound is fine
        let tree = HashTree::build_with_config(&records[..512], &TreeConfig::legacy()).unwrap();
        assert_eq!(tree.leaf_count(), 512);

        // Default configuration has no bound
        let tree = HashTree::build(&records).unwrap();
        assert_eq!(tree.leaf_count(), 1024);
    }

    #[test]
    fn test_find_path() {
        let tree = HashTree::build(&SCENARIO).unwrap();
        let path = tree.find_path(&hash_leaf(b"mno")).unwrap();
        assert_eq!(path, Path::from(vec![R, R, R, L]));

        let path = tree.find_path(&hash_leaf(b"pqr")).unwrap();
        assert_eq!(path, Path::from(vec![R, R, R, R]));
    }

    #[test]
    fn test_find_path_prefers_first_duplicate() {
        let tree = HashTree::build(&SCENARIO).unwrap();
        // "456" occupies leaves 2 and 3
        let path = tree.find_path(&hash_leaf(b"456")).unwrap();
        assert_eq!(path.position(), Some(2));
        assert_eq!(path, Path::from(vec![L, L, R, L]));
    }

    #[test]
    fn test_find_path_matches_internal_nodes() {
        let tree = HashTree::build(&SCENARIO).unwrap();
        assert_eq!(tree.find_path(&tree.root_hash()).unwrap(), Path::root());

        let right = tree.node_at(&Path::from(vec![R])).unwrap().hash;
        assert_eq!(tree.find_path(&right).unwrap(), Path::from(vec![R]));
    }

    #[test]
    fn test_find_path_not_found() {
        let tree = HashTree::build(&SCENARIO).unwrap();
        let missing = hash_leaf(b"xyz");
        assert!(matches!(tree.find_path(&missing), Err(TreeError::NotFound(_))));
    }

    #[test]
    fn test_node_at() {
        let tree = HashTree::build(&SCENARIO).unwrap();
        assert_eq!(tree.node_at(&Path::root()).unwrap().hash, tree.root_hash());

        let leaf = tree.node_at(&Path::from(vec![R, R, R, L])).unwrap();
        assert!(leaf.is_leaf());
        assert_eq!(leaf.hash, hash_leaf(b"mno"));
        assert_eq!(leaf.depth, 4);
    }

    #[test]
    fn test_node_at_invalid_path() {
        let tree = HashTree::build(&SCENARIO).unwrap();
        let too_long = Path::from(vec![L, L, L, L, L]);
        assert_eq!(
            tree.node_at(&too_long).unwrap_err(),
            TreeError::InvalidPath { step: 4, len: 5 }
        );
        assert!(tree.sibling_hashes_for(&too_long).is_err());
        assert!(tree.sibling_paths_for(&too_long).is_err());
    }

    #[test]
    fn test_sibling_hashes() {
        let tree = HashTree::build(&SCENARIO).unwrap();
        let path = Path::from(vec![R, R, R, L]);
        let siblings = tree.sibling_hashes_for(&path).unwrap();

        assert_eq!(siblings.len(), 4);
        assert_eq!(siblings[0], hash_leaf(b"pqr"));
        assert_eq!(siblings[1], tree.node_at(&Path::from(vec![R, R, L])).unwrap().hash);
        assert_eq!(siblings[2], tree.node_at(&Path::from(vec![R, L])).unwrap().hash);
        assert_eq!(siblings[3], tree.node_at(&Path::from(vec![L])).unwrap().hash);

        let paths = tree.sibling_paths_for(&path).unwrap();
        for (sibling_path, hash) in paths.iter().zip(&siblings) {
            assert_eq!(tree.node_at(sibling_path).unwrap().hash, *hash);
        }
    }

    #[test]
    fn test_sibling_hashes_of_root() {
        let tree = HashTree::build(&SCENARIO).unwrap();
        assert!(tree.sibling_hashes_for(&Path::root()).unwrap().is_empty());
    }

    #[test]
    fn test_record_positions() {
        let tree = HashTree::build(&SCENARIO).unwrap();
        assert_eq!(tree.leaf_index_for_record(0).unwrap(), 0);
        assert_eq!(tree.leaf_index_for_record(6).unwrap(), 12);
        assert_eq!(tree.leaf_index_for_record(7).unwrap(), 14);
        assert_eq!(tree.leaf_index_for_record(8).unwrap(), 15);
        assert_eq!(
            tree.leaf_index_for_record(9).unwrap_err(),
            TreeError::RecordOutOfRange { index: 9, count: 9 }
        );

        for (i, record) in SCENARIO.iter().enumerate() {
            let path = tree.path_for_record(i).unwrap();
            assert_eq!(tree.node_at(&path).unwrap().hash, hash_leaf(record.as_bytes()));
        }

        assert!(matches!(
            tree.path_for_leaf(16),
            Err(TreeError::LeafOutOfRange { index: 16, count: 16 })
        ));
    }

    #[test]
    fn test_prove_record_with_duplicate_records() {
        let records = ["same", "other", "same", "last"];
        let tree = HashTree::build(&records).unwrap();

        // Hash lookup always lands on the first occurrence
        let by_hash = tree.prove_data(b"same").unwrap();
        assert_eq!(by_hash.path.position(), Some(0));

        // Position lookup addresses the second one
        let by_index = tree.prove_record(2).unwrap();
        assert_eq!(by_index.path.position(), Some(2));
        assert_eq!(by_index.leaf_hash, by_hash.leaf_hash);
        assert_ne!(by_index.siblings, by_hash.siblings);
    }

    #[test]
    fn test_concurrent_readers() {
        let records = numbered(100);
        let tree = Arc::new(HashTree::build(&records).unwrap());
        let expected: Vec<InclusionProof> = (0..records.len())
            .map(|i| tree.prove_record(i).unwrap())
            .collect();

        std::thread::scope(|scope| {
            for _ in 0..4 {
                let tree = Arc::clone(&tree);
                let expected = &expected;
                let records = &records;
                scope.spawn(move || {
                    for (i, record) in records.iter().enumerate() {
                        let proof = tree.prove_data(record).unwrap();
                        assert_eq!(&proof, &expected[i]);
                    }
                });
            }
        });
    }
}
