// packages/flight-recorder/benches/recording_bench.rs
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use flight_recorder::{CircularBuffer, EventRecorder, StaticEvent, TextDumpSink};

const TICK: StaticEvent = StaticEvent::new(1, "TICK");

fn bench_buffer_put(c: &mut Criterion) {
    let mut buffer = CircularBuffer::new(1_000).unwrap();
    let mut i = 0u64;

    c.bench_function("circular_buffer_put_full", |b| {
        b.iter(|| {
            i += 1;
            black_box(buffer.put(black_box(i)));
        })
    });
}

fn bench_record(c: &mut Criterion) {
    let mut group = c.benchmark_group("record_event");

    let mut recording: EventRecorder = EventRecorder::new(1_000).unwrap();
    recording.start_recording();
    group.bench_function("recording", |b| {
        b.iter(|| {
            recording.record_event(black_box(&TICK));
        })
    });

    let mut stopped: EventRecorder = EventRecorder::new(1_000).unwrap();
    group.bench_function("stopped", |b| {
        b.iter(|| {
            stopped.record_event(black_box(&TICK));
        })
    });

    group.finish();
}

fn bench_dump(c: &mut Criterion) {
    let mut group = c.benchmark_group("dump_text");

    for capacity in [100usize, 1_000, 10_000] {
        let mut recorder: EventRecorder = EventRecorder::new(capacity).unwrap();
        recorder.start_recording();
        for _ in 0..capacity {
            recorder.record_event(&TICK);
        }

        group.bench_with_input(BenchmarkId::from_parameter(capacity), &recorder, |b, r| {
            b.iter(|| {
                let mut sink = TextDumpSink::new("bench");
                r.dump_entries_to(&mut sink).unwrap();
                black_box(sink.into_report());
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_buffer_put, bench_record, bench_dump);
criterion_main!(benches);
