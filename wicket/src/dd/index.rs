use smallvec::SmallVec;
use wicket_core::IndexSet;

/// Buckets holding more supports than this are split on their most balanced bit.
const BUCKET_LIMIT: usize = 50;

type NodeId = usize;
type Stack<T> = SmallVec<[T; 32]>;

#[derive(Clone, Debug)]
enum Node {
    Bucket(Vec<usize>),
    Branch {
        bit: usize,
        zero: NodeId,
        one: NodeId,
    },
}

/// Bit-discriminating index over the supports of one iteration.
///
/// Holds generator indices into a borrowed support slice. Branch nodes route a support to `one`
/// when it contains `bit`; every query visits exactly the subtrees whose path condition can still
/// be satisfied and then checks bucket contents exhaustively.
#[derive(Clone, Debug)]
pub struct SupportTree<'a, S> {
    supports: &'a [S],
    nodes: Vec<Node>,
}

impl<'a, S: IndexSet> SupportTree<'a, S> {
    const ROOT: NodeId = 0;

    pub fn new(supports: &'a [S]) -> Self {
        Self {
            supports,
            nodes: vec![Node::Bucket(Vec::new())],
        }
    }

    /// Index over every support in the slice.
    pub fn build(supports: &'a [S]) -> Self {
        let mut tree = Self::new(supports);
        for idx in 0..supports.len() {
            tree.insert(idx);
        }
        tree
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.nodes
            .iter()
            .map(|n| match n {
                Node::Bucket(items) => items.len(),
                Node::Branch { .. } => 0,
            })
            .sum()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn insert(&mut self, idx: usize) {
        let supports = self.supports;
        let support = &supports[idx];
        let mut node = Self::ROOT;
        loop {
            match &mut self.nodes[node] {
                Node::Branch { bit, zero, one } => {
                    node = if support.contains(*bit) { *one } else { *zero };
                }
                Node::Bucket(items) => {
                    items.push(idx);
                    if items.len() > BUCKET_LIMIT {
                        self.split(node);
                    }
                    return;
                }
            }
        }
    }

    fn balanced_bit(&self, items: &[usize]) -> Option<usize> {
        let size = self.supports.first()?.len();
        let mut counts = vec![0usize; size];
        for &idx in items {
            for bit in self.supports[idx].iter() {
                counts[bit] += 1;
            }
        }
        let len = items.len();
        counts
            .iter()
            .enumerate()
            .filter(|(_, c)| **c > 0 && **c < len)
            .min_by_key(|(_, c)| (2 * **c).abs_diff(len))
            .map(|(bit, _)| bit)
    }

    fn split(&mut self, node: NodeId) {
        let Node::Bucket(items) = &self.nodes[node] else {
            return;
        };
        // Identical supports cannot be separated and stay in one bucket.
        let Some(bit) = self.balanced_bit(items) else {
            return;
        };
        let Node::Bucket(items) = std::mem::replace(&mut self.nodes[node], Node::Bucket(Vec::new()))
        else {
            return;
        };
        let (ones, zeros): (Vec<usize>, Vec<usize>) = items
            .into_iter()
            .partition(|&idx| self.supports[idx].contains(bit));

        let zero = self.nodes.len();
        let one = zero + 1;
        let (zero_len, one_len) = (zeros.len(), ones.len());
        self.nodes.push(Node::Bucket(zeros));
        self.nodes.push(Node::Bucket(ones));
        self.nodes[node] = Node::Branch { bit, zero, one };
        if zero_len > BUCKET_LIMIT {
            self.split(zero);
        }
        if one_len > BUCKET_LIMIT {
            self.split(one);
        }
    }

    /// Whether a support other than `exclude_a`/`exclude_b` is contained in `union`.
    pub fn dominated(&self, union: &S, exclude_a: usize, exclude_b: usize) -> bool {
        let mut stack: Stack<NodeId> = SmallVec::new();
        stack.push(Self::ROOT);
        while let Some(node) = stack.pop() {
            match &self.nodes[node] {
                Node::Branch { bit, zero, one } => {
                    stack.push(*zero);
                    if union.contains(*bit) {
                        stack.push(*one);
                    }
                }
                Node::Bucket(items) => {
                    let hit = items.iter().any(|&idx| {
                        idx != exclude_a
                            && idx != exclude_b
                            && self.supports[idx].is_subset(union)
                    });
                    if hit {
                        return true;
                    }
                }
            }
        }
        false
    }

    /// Supports disjoint from `zeros` whose union with `support` has at most `budget` members,
    /// in ascending index order.
    pub fn find(&self, zeros: &S, support: &S, budget: usize) -> Vec<usize> {
        let base = support.count();
        let mut out = Vec::new();
        if base > budget {
            return out;
        }
        let mut stack: Stack<(NodeId, usize)> = SmallVec::new();
        stack.push((Self::ROOT, 0));
        while let Some((node, extra)) = stack.pop() {
            match &self.nodes[node] {
                Node::Branch { bit, zero, one } => {
                    stack.push((*zero, extra));
                    if zeros.contains(*bit) {
                        continue;
                    }
                    let extra = extra + usize::from(!support.contains(*bit));
                    if base + extra <= budget {
                        stack.push((*one, extra));
                    }
                }
                Node::Bucket(items) => {
                    out.extend(items.iter().copied().filter(|&idx| {
                        let s = &self.supports[idx];
                        s.is_disjoint(zeros) && s.count_union(support) <= budget
                    }));
                }
            }
        }
        out.sort_unstable();
        out
    }

    /// Supports `s` with `s \ support` a singleton, in ascending index order.
    pub fn find_singleton_diff(&self, support: &S) -> Vec<usize> {
        let mut out = Vec::new();
        let mut stack: Stack<(NodeId, bool)> = SmallVec::new();
        stack.push((Self::ROOT, false));
        while let Some((node, seen)) = stack.pop() {
            match &self.nodes[node] {
                Node::Branch { bit, zero, one } => {
                    stack.push((*zero, seen));
                    if support.contains(*bit) {
                        stack.push((*one, seen));
                    } else if !seen {
                        stack.push((*one, true));
                    }
                }
                Node::Bucket(items) => {
                    out.extend(
                        items
                            .iter()
                            .copied()
                            .filter(|&idx| self.supports[idx].singleton_diff(support)),
                    );
                }
            }
        }
        out.sort_unstable();
        out
    }
}
