/// Union-find over `0..size` with path halving and union by rank.
#[derive(Debug, Clone)]
pub(crate) struct DisjointSets {
    parent: Vec<usize>,
    rank: Vec<u8>,
}

impl DisjointSets {
    pub(crate) fn new(size: usize) -> Self {
        Self { parent: (0..size).collect(), rank: vec![0; size] }
    }

    #[inline] pub(crate) fn len(&self) -> usize { self.parent.len() }

    /// Representative of the set containing `elem`.
    pub(crate) fn find(&mut self, mut elem: usize) -> usize {
        while self.parent[elem] != elem {
            self.parent[elem] = self.parent[self.parent[elem]];
            elem = self.parent[elem];
        }
        elem
    }

    /// Join the sets of `a` and `b`. Returns false if they were already joined.
    pub(crate) fn union(&mut self, a: usize, b: usize) -> bool {
        let (ra, rb) = (self.find(a), self.find(b));
        if ra == rb { return false }

        match self.rank[ra].cmp(&self.rank[rb]) {
            std::cmp::Ordering::Less => self.parent[ra] = rb,
            std::cmp::Ordering::Greater => self.parent[rb] = ra,
            std::cmp::Ordering::Equal => {
                self.parent[rb] = ra;
                self.rank[ra] += 1;
            }
        }
        true
    }

    /// All sets, each sorted ascending, ordered by their smallest element.
    pub(crate) fn groups(&mut self) -> Vec<Vec<usize>> {
        let mut slot = vec![usize::MAX; self.len()];
        let mut groups: Vec<Vec<usize>> = Vec::new();
        for elem in 0..self.len() {
            let root = self.find(elem);
            if slot[root] == usize::MAX {
                slot[root] = groups.len();
                groups.push(Vec::new());
            }
            groups[slot[root]].push(elem);
        }
        groups
    }
}
