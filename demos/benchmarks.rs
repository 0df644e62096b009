//
// Copyright (c) 2025 Nathan Fiedler
//
use blockarray::BlockArray;
use std::time::Instant;

//
// Times push/pop churn at the end of the array for lengths that sit right on a
// data block boundary, where every push takes the spare block and every pop
// gives it back, versus lengths in the middle of a block.
//
fn churn_at(length: usize, rounds: usize) {
    let mut coll: BlockArray<usize> = (0..length).collect();
    let start = Instant::now();
    for value in 0..rounds {
        coll.push(value);
        coll.pop();
    }
    let duration = start.elapsed();
    println!("churn at {length:>9}: {duration:?} ({coll})");
}

//
// Reports the unused capacity as the array grows, alongside the √n bound, and
// the elapsed time to reach each length.
//
fn capacity_growth(limit: usize) {
    let mut coll: BlockArray<u64> = BlockArray::new();
    let mut checkpoint = 1;
    let start = Instant::now();
    for value in 0..limit as u64 {
        coll.push(value);
        if coll.len() == checkpoint {
            let unused = coll.capacity() - coll.len();
            let bound = (coll.len() as f64).sqrt();
            println!(
                "len {:>11}  capacity {:>11}  unused {:>6}  sqrt(n) {:>9.1}  {:?}",
                coll.len(),
                coll.capacity(),
                unused,
                bound,
                start.elapsed()
            );
            checkpoint *= 4;
        }
    }
}

fn main() {
    let rounds = 10_000_000;
    // 2^k - 1 elements fills superblock k - 1 exactly, so the next push
    // needs a new data block
    for k in [10, 16, 22] {
        churn_at((1 << k) - 1, rounds);
        churn_at((1 << k) + (1 << (k / 2)) / 2, rounds);
    }

    println!("growing BlockArray...");
    capacity_growth(100_000_000);
}
