//! Worklists that decide which discovered item is explored next.

use std::collections::VecDeque;

use min_max_heap::MinMaxHeap;

use crate::options::ExplorationStrategy;

#[derive(PartialEq, Eq, PartialOrd, Ord)]
struct Scored<I, S> {
    score: S,
    item: I,
}

enum Order<I, S> {
    Fifo(VecDeque<I>),
    Lifo(Vec<I>),
    Scored {
        first: Vec<I>,
        heap: MinMaxHeap<Scored<I, S>>,
        take_max: bool,
        alternate: bool,
    },
}

/// A worklist ordered by an [`ExplorationStrategy`].
///
/// Items pushed with [`Worklist::push_first`] are explored before all
/// items pushed with a score. For the scored strategies, ties are broken
/// by the item itself.
pub struct Worklist<I, S>(Order<I, S>);

impl<I: Ord, S: Ord> Worklist<I, S> {
    pub fn new(strategy: ExplorationStrategy) -> Self {
        let scored = |take_max, alternate| Order::Scored {
            first: Vec::new(),
            heap: MinMaxHeap::new(),
            take_max,
            alternate,
        };
        Self(match strategy {
            ExplorationStrategy::Bfs => Order::Fifo(VecDeque::new()),
            ExplorationStrategy::Dfs => Order::Lifo(Vec::new()),
            ExplorationStrategy::Min => scored(false, false),
            ExplorationStrategy::Max => scored(true, false),
            ExplorationStrategy::MinMax => scored(true, true),
        })
    }

    pub fn push_first(&mut self, item: I) {
        match &mut self.0 {
            Order::Fifo(queue) => queue.push_front(item),
            Order::Lifo(stack) => stack.push(item),
            Order::Scored { first, .. } => first.push(item),
        }
    }

    pub fn push(&mut self, item: I, score: S) {
        match &mut self.0 {
            Order::Fifo(queue) => queue.push_back(item),
            Order::Lifo(stack) => stack.push(item),
            Order::Scored { heap, .. } => heap.push(Scored { score, item }),
        }
    }

    pub fn pop(&mut self) -> Option<I> {
        match &mut self.0 {
            Order::Fifo(queue) => queue.pop_front(),
            Order::Lifo(stack) => stack.pop(),
            Order::Scored {
                first,
                heap,
                take_max,
                alternate,
            } => first.pop().or_else(|| {
                let next = if *take_max {
                    heap.pop_max()
                } else {
                    heap.pop_min()
                };
                if *alternate {
                    *take_max = !*take_max;
                }
                next.map(|s| s.item)
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drain(strategy: ExplorationStrategy) -> Vec<usize> {
        let mut worklist = Worklist::new(strategy);
        worklist.push_first(0);
        for &(item, score) in &[(1, 5), (2, 1), (3, 9), (4, 3)] {
            worklist.push(item, score);
        }
        std::iter::from_fn(|| worklist.pop()).collect()
    }

    #[test]
    fn test_exploration_orders() {
        assert_eq!(drain(ExplorationStrategy::Bfs), vec![0, 1, 2, 3, 4]);
        assert_eq!(drain(ExplorationStrategy::Dfs), vec![4, 3, 2, 1, 0]);
        assert_eq!(drain(ExplorationStrategy::Min), vec![0, 2, 4, 1, 3]);
        assert_eq!(drain(ExplorationStrategy::Max), vec![0, 3, 1, 4, 2]);
        // alternates, starting with the maximum
        assert_eq!(drain(ExplorationStrategy::MinMax), vec![0, 3, 2, 1, 4]);
    }
}
