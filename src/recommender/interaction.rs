//! Borrow-count aggregation and item-item similarity.

use std::collections::{BTreeSet, HashMap};

use ahash::RandomState;
use indexmap::IndexSet;
use rayon::prelude::*;

use crate::recommender::record::Loan;
use crate::utils::compare::{Compare, DefaultCompare};

/// Sparse user x item borrow counts, stored item-major (the transpose).
///
/// Absent pairs count 0. Never mutated after construction; a changed loan
/// log means building a new matrix.
#[derive(Debug, Clone, Default)]
pub struct InteractionMatrix {
    /// user ids, sorted
    users: IndexSet<Box<str>>,
    /// item ids, sorted
    items: IndexSet<Box<str>>,
    /// per item: (user index, count), user index ascending
    item_rows: Vec<Vec<(usize, u32)>>,
}

impl InteractionMatrix {
    /// Count loans per (user, item) pair. Order of `loans` is irrelevant.
    pub fn from_loans(loans: &[Loan]) -> Self {
        let users: IndexSet<Box<str>> = loans
            .iter()
            .map(|l| l.user_id.as_str())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .map(Box::from)
            .collect();
        let items: IndexSet<Box<str>> = loans
            .iter()
            .map(|l| l.book_id.as_str())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .map(Box::from)
            .collect();

        let mut counts: HashMap<(usize, usize), u32, RandomState> =
            HashMap::with_capacity_and_hasher(loans.len(), RandomState::new());
        for loan in loans {
            // both ids were collected from `loans` above
            if let (Some(u), Some(i)) = (
                users.get_index_of(loan.user_id.as_str()),
                items.get_index_of(loan.book_id.as_str()),
            ) {
                counts
                    .entry((i, u))
                    .and_modify(|count| *count += 1)
                    .or_insert(1);
            }
        }

        let mut item_rows = vec![Vec::new(); items.len()];
        for ((i, u), count) in counts {
            item_rows[i].push((u, count));
        }
        for row in &mut item_rows {
            row.sort_unstable_by_key(|(u, _)| *u);
        }

        Self {
            users,
            items,
            item_rows,
        }
    }

    pub fn user_count(&self) -> usize {
        self.users.len()
    }

    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    pub fn items(&self) -> impl Iterator<Item = &str> + '_ {
        self.items.iter().map(|i| i.as_ref())
    }

    /// Borrow count of `user` for `item`, 0 when never borrowed
    pub fn count(&self, user: &str, item: &str) -> u32 {
        let (Some(u), Some(i)) = (self.users.get_index_of(user), self.items.get_index_of(item)) else {
            return 0;
        };
        let row = &self.item_rows[i];
        row.binary_search_by_key(&u, |(idx, _)| *idx)
            .map(|pos| row[pos].1)
            .unwrap_or(0)
    }

    /// Total borrow count of `item` over all users, 0 when unknown
    pub fn popularity(&self, item: &str) -> u64 {
        self.items
            .get_index_of(item)
            .map_or(0, |i| self.item_rows[i].iter().map(|(_, c)| *c as u64).sum())
    }

    fn item_row(&self, i: usize) -> impl Iterator<Item = (usize, u32)> + '_ {
        self.item_rows[i].iter().copied()
    }
}

/// Dense symmetric item x item cosine similarity of borrower profiles.
///
/// Building costs O(I² · U); fine for a library-sized catalog, the first
/// thing to revisit if the catalog grows into the tens of thousands.
#[derive(Debug, Clone, Default)]
pub struct SimilarityMatrix {
    items: IndexSet<Box<str>>,
    /// row-major, `items.len()` squared
    values: Vec<f64>,
}

impl SimilarityMatrix {
    pub fn from_interactions(matrix: &InteractionMatrix) -> Self {
        let n = matrix.item_count();
        let rows: Vec<Vec<f64>> = (0..n)
            .into_par_iter()
            .map(|i| {
                (0..n)
                    .map(|j| {
                        <DefaultCompare as Compare<u32>>::cosine_similarity(matrix.item_row(i), matrix.item_row(j))
                    })
                    .collect()
            })
            .collect();
        Self {
            items: matrix.items.clone(),
            values: rows.into_iter().flatten().collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn contains(&self, item: &str) -> bool {
        self.items.contains(item)
    }

    pub fn items(&self) -> impl Iterator<Item = &str> + '_ {
        self.items.iter().map(|i| i.as_ref())
    }

    pub fn get(&self, a: &str, b: &str) -> Option<f64> {
        let i = self.items.get_index_of(a)?;
        let j = self.items.get_index_of(b)?;
        Some(self.values[i * self.items.len() + j])
    }

    /// Similarities of `item` against every other item, diagonal excluded
    pub fn neighbours<'a>(&'a self, item: &str) -> Option<impl Iterator<Item = (&'a str, f64)> + 'a> {
        let i = self.items.get_index_of(item)?;
        let n = self.items.len();
        let row = &self.values[i * n..(i + 1) * n];
        Some(
            row.iter()
                .enumerate()
                .filter(move |(j, _)| *j != i)
                .map(move |(j, s)| (self.items[j].as_ref(), *s)),
        )
    }
}
