//! Bounding-box collision resolution
//!
//! Every overlap test is evaluated over the full cross-product before anything
//! is removed, so the outcome never depends on iteration order.

use super::entity::Body;
use super::state::GameState;

/// What collision resolution did during one step
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CollisionReport {
    /// Kills scored by hero bullets, one per bullet at most
    pub kills: u32,
    /// Hero bullets consumed by those kills
    pub bullets_spent: u32,
    /// Hero-enemy collisions (one life each)
    pub enemy_collisions: u32,
    /// Hero-enemy-bullet collisions (one life each)
    pub bullet_hits: u32,
    /// Ids of enemies removed this step
    pub destroyed: Vec<u32>,
}

impl CollisionReport {
    /// Lives lost this step
    pub fn damage(&self) -> u32 {
        self.enemy_collisions + self.bullet_hits
    }
}

/// For every element of `a`, the indices of the elements of `b` it overlaps
pub fn overlap_graph<A: Body, B: Body>(a: &[A], b: &[B]) -> Vec<Vec<usize>> {
    a.iter()
        .map(|left| {
            let bounds = left.bounds();
            b.iter()
                .enumerate()
                .filter(|(_, right)| bounds.overlaps(&right.bounds()))
                .map(|(j, _)| j)
                .collect()
        })
        .collect()
}

/// Flag every element on either side that has at least one edge in `graph`
fn graph_masks(graph: &[Vec<usize>], right: usize) -> (Vec<bool>, Vec<bool>) {
    let mut hit_b = vec![false; right];
    let hit_a = graph
        .iter()
        .map(|edges| {
            for &j in edges {
                hit_b[j] = true;
            }
            !edges.is_empty()
        })
        .collect();
    (hit_a, hit_b)
}

/// Size of a maximum matching in the bipartite overlap graph
///
/// Each bullet can claim at most one enemy and each enemy at most one bullet.
/// The size is a property of the graph alone, so it does not depend on the
/// order the bodies are stored in.
pub fn max_matching(graph: &[Vec<usize>], right: usize) -> u32 {
    fn augment(
        left: usize,
        graph: &[Vec<usize>],
        owner: &mut [Option<usize>],
        seen: &mut [bool],
    ) -> bool {
        for &j in &graph[left] {
            if seen[j] {
                continue;
            }
            seen[j] = true;
            let free = match owner[j] {
                None => true,
                Some(other) => augment(other, graph, owner, seen),
            };
            if free {
                owner[j] = Some(left);
                return true;
            }
        }
        false
    }

    let mut owner = vec![None; right];
    let mut matched = 0;
    for left in 0..graph.len() {
        let mut seen = vec![false; right];
        if augment(left, graph, &mut owner, &mut seen) {
            matched += 1;
        }
    }
    matched
}

/// Keep only the unflagged elements, preserving order
fn retain_unmarked<T>(items: &mut Vec<T>, marks: &[bool]) {
    let mut marks = marks.iter();
    items.retain(|_| !marks.next().copied().unwrap_or(false));
}

/// Resolve all collisions for the current step
///
/// Order: hero bullets x enemies, then hero x surviving enemies, then hero x
/// enemy bullets. Lives are reduced once per hit and never go below zero.
pub fn resolve(state: &mut GameState) -> CollisionReport {
    let mut report = CollisionReport::default();

    // (a) hero bullets x enemies: every overlapping body is removed, but a
    // bullet scores at most one kill
    let graph = overlap_graph(&state.hero_bullets, &state.enemies);
    let (spent, shot_down) = graph_masks(&graph, state.enemies.len());
    report.bullets_spent = spent.iter().filter(|&&hit| hit).count() as u32;
    report.kills = max_matching(&graph, state.enemies.len());
    report.destroyed.extend(
        state
            .enemies
            .iter()
            .zip(&shot_down)
            .filter(|(_, hit)| **hit)
            .map(|(enemy, _)| enemy.id),
    );
    retain_unmarked(&mut state.hero_bullets, &spent);
    retain_unmarked(&mut state.enemies, &shot_down);
    state.hero.score = state.hero.score.saturating_add(report.kills);

    let hero_bounds = state.hero.bounds();

    // (b) hero x enemies
    let rammed: Vec<bool> = state
        .enemies
        .iter()
        .map(|enemy| hero_bounds.overlaps(&enemy.bounds()))
        .collect();
    report.enemy_collisions = rammed.iter().filter(|&&hit| hit).count() as u32;
    report.destroyed.extend(
        state
            .enemies
            .iter()
            .zip(&rammed)
            .filter(|(_, hit)| **hit)
            .map(|(enemy, _)| enemy.id),
    );
    retain_unmarked(&mut state.enemies, &rammed);

    // (c) hero x enemy bullets
    let before = state.enemy_bullets.len();
    state
        .enemy_bullets
        .retain(|bullet| !hero_bounds.overlaps(&bullet.bounds()));
    report.bullet_hits = (before - state.enemy_bullets.len()) as u32;

    state.hero.take_hits(report.damage());
    report
}
