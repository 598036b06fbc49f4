use rand::Rng;
use rand::seq::SliceRandom;

use crate::entities::Instance;
use crate::placement::{PlacementOutcome, PlacerKind, place};

/// Encoded solution: a permutation of all demand unit ids plus, per unit, the index of its
/// preferred orientation. Decoded by running a greedy placer on the exact sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    /// Placement sequence, a permutation of `0..n_units`
    pub sequence: Vec<usize>,
    /// Preferred orientation index, indexed by unit id
    pub orientations: Vec<u8>,
}

impl Candidate {
    pub fn new(sequence: Vec<usize>, orientations: Vec<u8>) -> Self {
        let candidate = Candidate {
            sequence,
            orientations,
        };
        debug_assert!(candidate.is_permutation());
        candidate
    }

    /// Descending area order, every unit in its first orientation
    pub fn greedy(instance: &Instance) -> Self {
        Candidate::new(instance.greedy_sequence(), vec![0; instance.n_units()])
    }

    /// Uniformly random sequence and orientations
    pub fn random(instance: &Instance, rng: &mut impl Rng) -> Self {
        let mut sequence = (0..instance.n_units()).collect::<Vec<_>>();
        sequence.shuffle(rng);
        Candidate::new(sequence, random_orientations(instance, rng))
    }

    pub fn len(&self) -> usize {
        self.sequence.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sequence.is_empty()
    }

    pub fn decode(
        &self,
        instance: &Instance,
        placer: PlacerKind,
        best_fit_sample: usize,
    ) -> PlacementOutcome {
        place(
            instance,
            placer,
            &self.sequence,
            &self.orientations,
            best_fit_sample,
        )
    }

    /// Order crossover (OX): a contiguous slice of `self` is kept in place, the remaining ids are
    /// filled in the relative order in which they appear in `other`, starting after the slice.
    /// Orientations are taken uniformly from either parent.
    pub fn crossover(&self, other: &Candidate, rng: &mut impl Rng) -> Candidate {
        let n = self.len();
        let orientations = self
            .orientations
            .iter()
            .zip(&other.orientations)
            .map(|(&a, &b)| if rng.random_bool(0.5) { a } else { b })
            .collect();

        if n < 2 {
            return Candidate::new(self.sequence.clone(), orientations);
        }

        let (mut p1, mut p2) = (rng.random_range(0..n), rng.random_range(0..n));
        if p1 > p2 {
            std::mem::swap(&mut p1, &mut p2);
        }

        let mut child = vec![usize::MAX; n];
        let mut used = vec![false; n];
        for i in p1..=p2 {
            child[i] = self.sequence[i];
            used[self.sequence[i]] = true;
        }

        let mut donor = other
            .sequence
            .iter()
            .cycle()
            .skip((p2 + 1) % n)
            .take(n)
            .filter(|&&uid| !used[uid]);
        for i in 0..n {
            let idx = (p2 + 1 + i) % n;
            if child[idx] == usize::MAX {
                if let Some(&uid) = donor.next() {
                    child[idx] = uid;
                }
            }
        }

        Candidate::new(child, orientations)
    }

    /// Swaps two random positions of the sequence
    pub fn swap_mutation(&mut self, rng: &mut impl Rng) {
        let n = self.len();
        if n < 2 {
            return;
        }
        let i = rng.random_range(0..n);
        let j = rng.random_range(0..n);
        self.sequence.swap(i, j);
    }

    /// Moves a random unit to another random position in the sequence
    pub fn move_mutation(&mut self, rng: &mut impl Rng) {
        let n = self.len();
        if n < 2 {
            return;
        }
        let from = rng.random_range(0..n);
        let to = rng.random_range(0..n);
        let uid = self.sequence.remove(from);
        self.sequence.insert(to, uid);
    }

    /// Cycles the preferred orientation of a random unit which has more than one
    pub fn rotation_mutation(&mut self, instance: &Instance, rng: &mut impl Rng) {
        if self.is_empty() {
            return;
        }
        let uid = rng.random_range(0..self.len());
        let n_orients = instance.n_orientations(uid);
        if n_orients > 1 {
            let shift = rng.random_range(1..n_orients);
            self.orientations[uid] = ((self.orientations[uid] as usize + shift) % n_orients) as u8;
        }
    }

    /// Applies one of the mutations, chosen uniformly
    pub fn mutate(&mut self, instance: &Instance, rng: &mut impl Rng) {
        match rng.random_range(0..3) {
            0 => self.swap_mutation(rng),
            1 => self.move_mutation(rng),
            _ => self.rotation_mutation(instance, rng),
        }
    }

    /// Whether the sequence contains every unit id exactly once
    pub fn is_permutation(&self) -> bool {
        let mut seen = vec![false; self.sequence.len()];
        self.orientations.len() == self.sequence.len()
            && self
                .sequence
                .iter()
                .all(|&uid| uid < seen.len() && !std::mem::replace(&mut seen[uid], true))
    }
}

pub(crate) fn random_orientations(instance: &Instance, rng: &mut impl Rng) -> Vec<u8> {
    (0..instance.n_units())
        .map(|uid| rng.random_range(0..instance.n_orientations(uid)) as u8)
        .collect()
}
