//! Benchmarks for clearance queries and full planning passes.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use detour2d::{MidpointPlanner, Obstacle, ObstacleSet, Point2, Segment2};

/// Deterministic xorshift state for scene generation.
struct XorShift(u64);

impl XorShift {
    fn next_unit(&mut self) -> f64 {
        self.0 ^= self.0 << 13;
        self.0 ^= self.0 >> 7;
        self.0 ^= self.0 << 17;
        self.0 as f64 / u64::MAX as f64
    }

    fn range(&mut self, lo: f64, hi: f64) -> f64 {
        lo + self.next_unit() * (hi - lo)
    }
}

/// Generates axis-aligned square obstacles well clear of the endpoints.
fn generate_scene(count: usize, seed: u64) -> ObstacleSet<f64> {
    let mut rng = XorShift(seed);
    let mut obstacles = Vec::with_capacity(count);

    for _ in 0..count {
        let cx = rng.range(2.0, 8.0);
        let cy = rng.range(2.0, 8.0);
        let h = rng.range(0.2, 0.7);
        obstacles.push(
            Obstacle::new(vec![
                Point2::new(cx - h, cy - h),
                Point2::new(cx + h, cy - h),
                Point2::new(cx + h, cy + h),
                Point2::new(cx - h, cy + h),
            ])
            .unwrap(),
        );
    }

    ObstacleSet::new(obstacles)
}

fn bench_segment_clear(c: &mut Criterion) {
    let mut group = c.benchmark_group("is_segment_clear");

    for &count in &[4usize, 16, 64] {
        let set = generate_scene(count, 0x5eed);
        let mut rng = XorShift(0xfeed);
        let segments: Vec<Segment2<f64>> = (0..256)
            .map(|_| {
                Segment2::new(
                    Point2::new(rng.range(0.0, 10.0), rng.range(0.0, 10.0)),
                    Point2::new(rng.range(0.0, 10.0), rng.range(0.0, 10.0)),
                )
            })
            .collect();

        group.throughput(Throughput::Elements(segments.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(count), &set, |b, set| {
            b.iter(|| {
                for &segment in &segments {
                    black_box(set.is_segment_clear(segment, 1e-9));
                }
            });
        });
    }

    group.finish();
}

fn bench_plan(c: &mut Criterion) {
    let mut group = c.benchmark_group("plan");
    let planner = MidpointPlanner::with_defaults();
    let start = Point2::new(0.5, 0.5);
    let end = Point2::new(9.5, 9.5);

    for &count in &[1usize, 4, 16] {
        let set = generate_scene(count, 0xbeef);
        group.bench_with_input(BenchmarkId::from_parameter(count), &set, |b, set| {
            b.iter(|| black_box(planner.plan(black_box(start), black_box(end), set)));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_segment_clear, bench_plan);
criterion_main!(benches);
