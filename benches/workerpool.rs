use mandelstrip::bench::{Benchmark, BenchmarkReport};
use mandelstrip::threads::WorkerPool;

const TASKS: usize = 64;
const TASK_CPU_SIZE: usize = 100000;
const ITN: usize = 10;

fn spin(mut x: u64) -> u64 {
    for _ in 0..TASK_CPU_SIZE {
        x = x.wrapping_mul(x).wrapping_add(x);
    }
    x
}

fn bench_pool(threads: usize) -> Benchmark {
    let name = format!("spin-t{}-n{}", threads, TASKS);
    let pool = WorkerPool::new(threads);
    Benchmark::iter(&name, ITN, move || {
        let tasks: Vec<_> = (0..TASKS as u64).map(|i| move || spin(i)).collect();
        pool.scatter(tasks).join();
    })
}

fn bench_inline() -> Benchmark {
    Benchmark::iter(&format!("spin-inline-n{}", TASKS), ITN, || {
        let _: Vec<u64> = (0..TASKS as u64).map(spin).collect();
    })
}

fn main() {
    BenchmarkReport::with_benches(vec![
        bench_inline(),
        bench_pool(1),
        bench_pool(2),
        bench_pool(4),
        bench_pool(8),
    ])
    .report("workerpool");
}
