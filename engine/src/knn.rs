use std::{
    cmp::{Ordering, Reverse},
    collections::BinaryHeap,
};

type MinHeap<T> = BinaryHeap<Reverse<T>>;

/// A candidate neighbor: its position on the matrix axis, how similar it
/// is to the target and the rating it contributes.
#[derive(Debug, Clone, Copy)]
pub struct Neighbor {
    pub index: usize,
    pub similarity: f64,
    pub rating: f64,
    order: usize,
}

impl PartialEq for Neighbor {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Neighbor {}

impl PartialOrd for Neighbor {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

// Greater means more similar, ties go to whoever was seen first
impl Ord for Neighbor {
    fn cmp(&self, other: &Self) -> Ordering {
        self.similarity
            .partial_cmp(&other.similarity)
            .unwrap_or(Ordering::Equal)
            .then_with(|| other.order.cmp(&self.order))
    }
}

/// Bounded selection of the `k` most similar candidates.
///
/// Keeps a min-heap of at most `k` elements, so feeding `n` candidates
/// costs O(n log k) instead of sorting the whole similarity row.
#[derive(Debug, Clone)]
pub struct Knn {
    k: usize,
    seen: usize,
    min_heap: MinHeap<Neighbor>,
}

impl Knn {
    pub fn new(k: usize) -> Self {
        Self {
            k,
            seen: 0,
            min_heap: BinaryHeap::new(),
        }
    }

    pub fn update(&mut self, index: usize, similarity: f64, rating: f64) {
        let neighbor = Neighbor {
            index,
            similarity,
            rating,
            order: self.seen,
        };
        self.seen += 1;

        if self.min_heap.len() < self.k {
            self.min_heap.push(Reverse(neighbor));
        } else if let Some(minimum) = self.min_heap.peek() {
            if neighbor > minimum.0 {
                self.min_heap.pop();
                self.min_heap.push(Reverse(neighbor));
            }
        }
    }

    /// Selected neighbors, most similar first
    pub fn into_vec(self) -> Vec<Neighbor> {
        self.min_heap
            .into_sorted_vec()
            .into_iter()
            .map(|r| r.0)
            .collect()
    }
}

/// Pick the `k` most similar `(index, similarity, rating)` candidates
pub fn top_k<It>(k: usize, candidates: It) -> Vec<Neighbor>
where
    It: IntoIterator<Item = (usize, f64, f64)>,
{
    let mut knn = Knn::new(k);
    for (index, similarity, rating) in candidates {
        knn.update(index, similarity, rating);
    }

    knn.into_vec()
}
