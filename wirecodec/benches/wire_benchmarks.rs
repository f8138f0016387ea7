//
// Copyright 2017-2026 Hans W. Uhlig. All Rights Reserved.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//      http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//

//! Benchmarks for wire codec performance

use bytes::BytesMut;
use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use minechat_wire::{WireCodec, WireFrame};
use std::hint::black_box;
use tokio_util::codec::{Decoder, Encoder};

fn bench_decode_lines(c: &mut Criterion) {
    let mut group = c.benchmark_group("decode_lines");

    for size in [16usize, 256, 4096] {
        let line = "x".repeat(size);
        let mut input = Vec::new();
        for _ in 0..64 {
            input.extend_from_slice(line.as_bytes());
            input.push(b'\n');
        }
        group.throughput(Throughput::Bytes(input.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &input, |b, input| {
            let mut codec = WireCodec::new();
            b.iter(|| {
                let mut buf = BytesMut::from(&input[..]);
                while let Some(line) = codec.decode(&mut buf).unwrap() {
                    black_box(line);
                }
            });
        });
    }

    group.finish();
}

fn bench_encode_message(c: &mut Criterion) {
    let mut group = c.benchmark_group("encode_message");

    group.bench_function("sanitized_message", |b| {
        let mut codec = WireCodec::new();
        let mut buffer = BytesMut::with_capacity(1024);
        let text = "Hello\nfrom a\r\nmultiline paste".to_string();

        b.iter(|| {
            buffer.clear();
            codec
                .encode(black_box(WireFrame::Message(text.clone())), &mut buffer)
                .unwrap();
        });
    });

    group.finish();
}

criterion_group!(benches, bench_decode_lines, bench_encode_message);
criterion_main!(benches);
