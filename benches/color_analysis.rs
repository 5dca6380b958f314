use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use lab_calibration::calibration::{apply_lab_shift, apply_reinhard_transfer};
use lab_calibration::color::compute_lab_stats;
use lab_calibration::{
    process_batch, ColorConverter, ImageJob, LabShift, PipelineConfig, PixelBuffer,
    RecoveryConfig, ReferenceSource, Strength, TransferMode,
};

fn noise_buffer(width: u32, height: u32, seed: u32) -> PixelBuffer {
    let mut state = seed.wrapping_mul(2_654_435_761).max(1);
    let mut data = Vec::with_capacity((width * height * 4) as usize);
    for _ in 0..width * height {
        for _ in 0..3 {
            state ^= state << 13;
            state ^= state >> 17;
            state ^= state << 5;
            data.push((state & 0xff) as u8);
        }
        data.push(255);
    }
    PixelBuffer::from_raw(width, height, data).unwrap()
}

fn benchmark_conversion(c: &mut Criterion) {
    let converter = ColorConverter::new();
    c.bench_function("rgb_lab_round_trip", |b| {
        b.iter(|| {
            let lab = converter.rgb_to_lab(black_box(181), black_box(64), black_box(22));
            black_box(converter.lab_to_rgb(lab))
        })
    });
}

fn benchmark_stats(c: &mut Criterion) {
    let buffer = noise_buffer(512, 512, 7);
    let mut group = c.benchmark_group("compute_lab_stats");
    for step in [1usize, 4, 16] {
        group.bench_with_input(BenchmarkId::from_parameter(step), &step, |b, &step| {
            b.iter(|| compute_lab_stats(black_box(&buffer), step))
        });
    }
    group.finish();
}

fn benchmark_stages(c: &mut Criterion) {
    let target = noise_buffer(256, 256, 3);
    let reference = compute_lab_stats(&noise_buffer(256, 256, 11), 4).unwrap();
    let target_stats = compute_lab_stats(&target, 4).unwrap();

    c.bench_function("reinhard_transfer_256", |b| {
        b.iter(|| {
            let mut buffer = target.clone();
            apply_reinhard_transfer(
                &mut buffer,
                &reference,
                &target_stats,
                Strength::FULL,
                TransferMode::Full,
            );
            buffer
        })
    });

    let shift = LabShift::new(3.0, -1.5, 2.0);
    c.bench_function("lab_shift_256", |b| {
        b.iter(|| {
            let mut buffer = target.clone();
            apply_lab_shift(&mut buffer, Some(&shift), Strength::FULL);
            buffer
        })
    });
}

fn benchmark_batch(c: &mut Criterion) {
    let reference = ReferenceSource::Buffer(noise_buffer(128, 128, 5));
    let config = PipelineConfig {
        recovery: Some(RecoveryConfig::default()),
        ..PipelineConfig::default()
    };
    let images: Vec<PixelBuffer> = (0..8).map(|i| noise_buffer(128, 128, 100 + i)).collect();

    c.bench_function("batch_8x128", |b| {
        b.iter(|| {
            let jobs = images
                .iter()
                .enumerate()
                .map(|(i, img)| ImageJob::new(i.to_string(), img.clone()))
                .collect();
            process_batch(config.clone(), Some(&reference), jobs)
        })
    });
}

criterion_group!(
    benches,
    benchmark_conversion,
    benchmark_stats,
    benchmark_stages,
    benchmark_batch
);
criterion_main!(benches);
