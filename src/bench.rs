//! Minimal benchmark runner for the `harness = false` bench binaries.

use std::fs;
use std::io::{self, stdout, Write};
use std::rc::Rc;
use std::time::{Duration, Instant};

#[derive(Clone)]
pub struct Benchmark {
    f: Rc<dyn Fn()>,
    name: String,
    iterations: usize,
}

/// Renders `d` in the coarsest unit that keeps the count under 100000.
pub fn human(d: &Duration) -> String {
    let steps = [
        (d.as_nanos(), "ns"),
        (d.as_micros(), "us"),
        (d.as_millis(), "ms"),
    ];
    let (value, symbol) = steps
        .into_iter()
        .find(|(v, _)| *v < 100_000)
        .unwrap_or((d.as_secs() as u128, "s"));
    format!("{:>6}{:<2}", value, symbol)
}

impl Benchmark {
    pub fn iter<F: Fn() + 'static>(name: &str, n: usize, f: F) -> Self {
        Self {
            f: Rc::new(f),
            name: name.to_string(),
            iterations: n.max(1),
        }
    }

    pub fn once<F: Fn() + 'static>(name: &str, f: F) -> Self {
        Self::iter(name, 1, f)
    }

    fn run(&self) -> Duration {
        let start = Instant::now();
        for _ in 0..self.iterations {
            (self.f)();
        }
        start.elapsed()
    }
}

#[derive(Clone, Debug)]
pub struct Measurement {
    pub name: String,
    pub iterations: usize,
    pub total: Duration,
}

impl Measurement {
    pub fn per_call(&self) -> Duration {
        self.total.div_f64(self.iterations as f64)
    }
}

#[derive(Default)]
pub struct BenchmarkReport {
    benches: Vec<Benchmark>,
    results: Vec<Measurement>,
}

impl BenchmarkReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_bench(&mut self, bench: Benchmark) {
        self.benches.push(bench);
    }

    pub fn with_benches(benches: Vec<Benchmark>) -> Self {
        Self {
            benches,
            results: vec![],
        }
    }

    pub fn results(&self) -> &[Measurement] {
        &self.results
    }

    pub fn run(&mut self) {
        for bench in &self.benches {
            let total = bench.run();
            self.results.push(Measurement {
                name: bench.name.clone(),
                iterations: bench.iterations,
                total,
            });
            print!(".");
            let _ = stdout().flush();
        }
        println!();
    }

    pub fn show(&self) {
        println!("  {: <30} {: >8}   {: >8}", "benchmark", "total", "per_call");
        for m in &self.results {
            let per_call = m.per_call();
            println!(
                "  {: <30} {}   {}",
                m.name,
                human(&m.total),
                human(&per_call),
            )
        }
    }

    pub fn to_csv(&self) -> String {
        let mut lines = vec!["benchmark,total_us,iterations,per_call_us".to_string()];
        for m in &self.results {
            lines.push(format!(
                "{},{},{},{}",
                m.name,
                m.total.as_micros(),
                m.iterations,
                m.per_call().as_micros(),
            ));
        }
        lines.push(String::new());
        lines.join("\n")
    }

    pub fn write_csv(&self, filename: &str) -> io::Result<()> {
        fs::write(filename, self.to_csv())
    }

    pub fn report(&mut self, name: &str) {
        print!("Benchmark: {}", name);
        self.run();
        self.show();
        let filename = format!("benchmark_{}.csv", name);
        if let Err(e) = self.write_csv(&filename) {
            eprintln!("could not write {}: {}", filename, e);
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_human_durations() {
        assert_eq!(human(&Duration::from_nanos(250)), "   250ns");
        assert_eq!(human(&Duration::from_micros(250)), "   250us");
        assert_eq!(human(&Duration::from_secs(5)), "  5000ms");
        assert_eq!(human(&Duration::from_secs(500)), "   500s ");
    }

    #[test]
    fn test_report_runs_each_bench() {
        let calls = Rc::new(Cell::new(0));
        let counter = calls.clone();
        let mut report = BenchmarkReport::with_benches(vec![
            Benchmark::iter("count", 3, move || counter.set(counter.get() + 1)),
            Benchmark::once("noop", || ()),
        ]);
        report.run();

        assert_eq!(calls.get(), 3);
        assert_eq!(report.results().len(), 2);
        assert_eq!(report.results()[0].iterations, 3);
        let csv = report.to_csv();
        assert!(csv.starts_with("benchmark,total_us,iterations,per_call_us\ncount,"));
        assert!(csv.contains("\nnoop,"));
    }
}
