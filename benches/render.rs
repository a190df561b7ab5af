use std::collections::BTreeSet;

use mandelstrip::bench::{Benchmark, BenchmarkReport};
use mandelstrip::{RenderSettings, Renderer, Viewport};

fn thread_counts() -> Vec<usize> {
    let counts: BTreeSet<usize> = [1, 2, 4, num_cpus::get_physical(), num_cpus::get()]
        .into_iter()
        .collect();
    counts.into_iter().collect()
}

fn bench_render(threads: usize, tiles: usize, height: u32) -> Benchmark {
    let settings = RenderSettings::new((3 * height) / 2, height, 100, 2.0);
    let renderer = Renderer::new(threads);
    let f = move || {
        let result = renderer.render(Viewport::default(), settings, tiles);
        assert!(result.is_value());
    };
    Benchmark::once(&format!("render-t{}-n{}-{}", threads, tiles, height), f)
}

fn main() {
    let mut benches = vec![];
    for t in thread_counts() {
        for tiles in [1, t, 2 * t, 8 * t] {
            benches.push(bench_render(t, tiles, 1000));
        }
    }
    BenchmarkReport::with_benches(benches).report("render");
}
