//! Parallel Monte-Carlo tree search with UCT selection, used on boards with
//! fewer than 7 pieces placed (see `dispatcher`).

use crate::position::{Position, Undo};
use arrayvec::ArrayVec;
use rand::{RngCore, SeedableRng, rngs::StdRng};
use std::sync::atomic::{AtomicI64, AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

const UCT_C: f64 = std::f64::consts::SQRT_2;
const WORKERS: usize = 16;
const MAX_LEGAL_PAIRS: usize = 256;

#[cfg(feature = "deterministic_rng")]
const ROLLOUT_SEED: u64 = 0xC0FF_EE15_BEEF_D00D;

fn make_rollout_rng() -> StdRng {
    #[cfg(feature = "deterministic_rng")]
    {
        StdRng::seed_from_u64(ROLLOUT_SEED)
    }
    #[cfg(not(feature = "deterministic_rng"))]
    {
        let mut seed = [0u8; 32];
        rand::rng().fill_bytes(&mut seed);
        StdRng::from_seed(seed)
    }
}

/// One node of the search tree: the edge `(square, piece)` that reached it
/// from its parent, atomic visit/score counters, and its children guarded by
/// a single lock that doubles as the expansion lock.
pub struct Node {
    edge: Option<(u8, u8)>,
    n: AtomicU32,
    t: AtomicI64,
    children: Mutex<Vec<Arc<Node>>>,
}

impl Node {
    fn new(edge: Option<(u8, u8)>) -> Arc<Node> {
        Arc::new(Node {
            edge,
            n: AtomicU32::new(0),
            t: AtomicI64::new(0),
            children: Mutex::new(Vec::new()),
        })
    }

    fn uct(&self, parent_n: f64) -> f64 {
        let n = self.n.load(Ordering::Relaxed);
        if n == 0 {
            return f64::INFINITY;
        }
        let n = n as f64;
        let t = self.t.load(Ordering::Relaxed) as f64;
        t / n + UCT_C * (parent_n.ln() / n).sqrt()
    }

    pub fn visits(&self) -> u32 {
        self.n.load(Ordering::Relaxed)
    }
}

fn legal_pairs(pos: &Position) -> ArrayVec<(u8, u8), MAX_LEGAL_PAIRS> {
    let mut pairs = ArrayVec::new();
    let squares: ArrayVec<u8, 16> = pos.empty_squares().collect();
    let pieces: ArrayVec<u8, 16> = pos.available_pieces().collect();
    for &sq in &squares {
        for &p in &pieces {
            pairs.push((sq, p));
        }
    }
    pairs
}

/// Which side is about to move, read as the parity of placed pieces. Used
/// only by the rollout's asymmetric terminal reward.
fn side_to_move(pos: &Position) -> u32 {
    pos.boards[4].count_ones() % 2
}

/// Descends from `root` to a leaf: while the current node is fully expanded
/// (every child visited at least once), follows the maximum-UCT child;
/// otherwise expands (on first visit) and returns an unvisited child. Each
/// edge followed is applied to `pos`, with its `Undo` appended to `log`.
/// Returns the full path from root to leaf, for backpropagation.
fn traverse(root: &Arc<Node>, pos: &mut Position, log: &mut Vec<Undo>) -> Vec<Arc<Node>> {
    let mut path = vec![Arc::clone(root)];

    loop {
        let current = Arc::clone(path.last().unwrap());
        let mut children = current.children.lock().unwrap();

        if children.is_empty() {
            if pos.is_game_over() {
                return path;
            }
            for (sq, p) in legal_pairs(pos) {
                children.push(Node::new(Some((sq, p))));
            }
        }

        if let Some(unvisited) = children.iter().find(|c| c.visits() == 0) {
            let chosen = Arc::clone(unvisited);
            drop(children);
            apply_edge(&chosen, pos, log);
            path.push(chosen);
            return path;
        }

        let parent_n = current.visits().max(1) as f64;
        let next = children
            .iter()
            .max_by(|a, b| a.uct(parent_n).partial_cmp(&b.uct(parent_n)).unwrap())
            .map(Arc::clone)
            .unwrap();
        drop(children);
        apply_edge(&next, pos, log);
        path.push(next);
    }
}

fn apply_edge(node: &Node, pos: &mut Position, log: &mut Vec<Undo>) {
    let (square, piece) = node.edge.expect("non-root node always carries an edge");
    log.push(pos.do_move(square));
    log.push(pos.do_select(piece));
}

/// Plays to termination from `pos`, biasing each step toward an immediately
/// winning placement when one exists; records every mutation in `log` so
/// the caller can unwind back to the position it started from.
fn rollout(pos: &mut Position, log: &mut Vec<Undo>, rng: &mut StdRng) -> i32 {
    while !pos.is_game_over() {
        let squares: ArrayVec<u8, 16> = pos.empty_squares().collect();
        let pieces: ArrayVec<u8, 16> = pos.available_pieces().collect();

        let mut winning: ArrayVec<(u8, u8), MAX_LEGAL_PAIRS> = ArrayVec::new();
        let mut all: ArrayVec<(u8, u8), MAX_LEGAL_PAIRS> = ArrayVec::new();
        for &sq in &squares {
            let wins = pos.would_quarto_at(sq);
            for &p in &pieces {
                all.push((sq, p));
                if wins {
                    winning.push((sq, p));
                }
            }
        }

        let pool = if winning.is_empty() { &all } else { &winning };
        let (sq, p) = pool[(rng.next_u32() as usize) % pool.len()];
        log.push(pos.do_move(sq));
        log.push(pos.do_select(p));
    }

    terminal_reward(pos)
}

/// Legacy asymmetric reward calibration, preserved for behavioral parity:
/// -10 for the losing side (side 1), +3 for the winning side (side 0), +1
/// for a draw or any unreached exit.
fn terminal_reward(pos: &Position) -> i32 {
    if pos.is_quarto() {
        if side_to_move(pos) == 1 { -10 } else { 3 }
    } else {
        1
    }
}

fn backpropagate(path: &[Arc<Node>], reward: i32) {
    for node in path {
        node.n.fetch_add(1, Ordering::Relaxed);
        node.t.fetch_add(reward as i64, Ordering::Relaxed);
    }
}

fn unwind(pos: &mut Position, mut log: Vec<Undo>) {
    while let Some(record) = log.pop() {
        pos.undo(record);
    }
}

/// Runs a fixed pool of 16 worker threads against a shared root tree until
/// `budget` elapses, then returns the root child with the highest visit
/// count, encoded as `(placement << 4) | selection`.
pub fn search(root_pos: &Position, budget: Duration) -> u16 {
    let root = Node::new(None);
    let start = Instant::now();
    let iterations = AtomicU32::new(0);

    std::thread::scope(|scope| {
        for _ in 0..WORKERS {
            let root = Arc::clone(&root);
            let root_pos = root_pos.clone();
            let iterations = &iterations;
            scope.spawn(move || {
                let mut rng = make_rollout_rng();
                while start.elapsed() < budget {
                    let mut pos = root_pos.clone();
                    let mut log = Vec::new();
                    let path = traverse(&root, &mut pos, &mut log);
                    let reward = if pos.is_game_over() {
                        terminal_reward(&pos)
                    } else {
                        rollout(&mut pos, &mut log, &mut rng)
                    };
                    backpropagate(&path, reward);
                    unwind(&mut pos, log);
                    iterations.fetch_add(1, Ordering::Relaxed);
                }
            });
        }
    });

    tracing::debug!(
        iterations = iterations.load(Ordering::Relaxed),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "mcts budget exhausted"
    );
    best_move_code(&root)
}

fn best_move_code(root: &Node) -> u16 {
    let children = root.children.lock().unwrap();
    let best = children
        .iter()
        .max_by_key(|c| c.visits())
        .expect("mcts root must have at least one child on a non-terminal position");
    let (square, piece) = best.edge.unwrap();
    ((square as u16) << 4) | (piece as u16)
}
