// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Criterion benchmarks for the conversion engine. Covers the canvas
// compositor and the transcoder on small synthetic images, plus the
// byte sniffer on a text buffer.

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use image::{DynamicImage, Rgb, RgbImage};
use std::io::Cursor;

use wandelwerk_convert::image::composite::{MergedOutput, composite};
use wandelwerk_convert::image::transcode::transcode;
use wandelwerk_core::sniff;
use wandelwerk_core::types::{Direction, RasterFormat};

fn synthetic_png(width: u32, height: u32) -> Vec<u8> {
    let img = DynamicImage::ImageRgb8(RgbImage::from_fn(width, height, |x, y| {
        Rgb([(x % 256) as u8, (y % 256) as u8, ((x + y) % 256) as u8])
    }));
    let mut out = Vec::new();
    img.write_to(&mut Cursor::new(&mut out), image::ImageFormat::Png)
        .unwrap();
    out
}

fn bench_vertical_merge(c: &mut Criterion) {
    let a = synthetic_png(320, 200);
    let b = synthetic_png(280, 160);

    c.bench_function("composite vertical (2 inputs)", |bench| {
        bench.iter(|| {
            let out = composite(
                black_box(&[a.as_slice(), b.as_slice()]),
                Direction::Vertical,
                MergedOutput::Lossy { quality: 80 },
            )
            .unwrap();
            black_box(out);
        });
    });
}

fn bench_png_to_jpeg(c: &mut Criterion) {
    let input = synthetic_png(320, 200);

    c.bench_function("transcode png -> jpeg q80", |bench| {
        bench.iter(|| {
            let out = transcode(black_box(&input), RasterFormat::Jpeg, 80).unwrap();
            black_box(out.into_bytes());
        });
    });
}

fn bench_sniff(c: &mut Criterion) {
    let text = vec![b'a'; 4096];

    c.bench_function("sniff 4k text buffer", |bench| {
        bench.iter(|| black_box(sniff::detect(black_box(&text))));
    });
}

criterion_group!(benches, bench_vertical_merge, bench_png_to_jpeg, bench_sniff);
criterion_main!(benches);
