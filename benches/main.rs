// Released under MIT License.
// Copyright (c) 2023-2025 Ladislav Bartos

use cgmap_rs::prelude::*;
use criterion::{criterion_group, criterion_main, Criterion};
use rand::{Rng, SeedableRng};

const N_ATOMS: usize = 12000;
const ATOMS_PER_BEAD: usize = 4;
const N_FRAMES: usize = 20;

fn random_frame(rng: &mut impl Rng) -> FrameCoordinateBuffer {
    FrameCoordinateBuffer::new(
        (0..3 * N_ATOMS)
            .map(|_| rng.gen_range(0.0..10.0))
            .collect(),
    )
}

fn source_molecule(rng: &mut impl Rng) -> Molecule {
    let mut molecule = Molecule::new("membrane", N_ATOMS)
        .with_field(
            "user3",
            (0..N_ATOMS)
                .map(|_| FieldValue::Float(rng.gen_range(1.0..16.0)))
                .collect(),
        )
        .unwrap()
        .with_field(
            "user",
            (0..N_ATOMS)
                .map(|i| FieldValue::Float((i / ATOMS_PER_BEAD) as f64))
                .collect(),
        )
        .unwrap()
        .with_field(
            "user2",
            (0..N_ATOMS).map(|i| FieldValue::Int(i as i64)).collect(),
        )
        .unwrap();

    for _ in 0..N_FRAMES {
        molecule
            .add_frame(random_frame(rng), Some(SimBox::from([10.0, 10.0, 10.0])))
            .unwrap();
    }

    molecule
}

fn benchmark(c: &mut Criterion) {
    let mut rng = rand::rngs::StdRng::seed_from_u64(2025);

    let metadata = AtomSelectionMetadata::new(
        (0..N_ATOMS).map(|_| rng.gen_range(1.0..16.0)).collect(),
        (0..N_ATOMS).map(|i| (i / ATOMS_PER_BEAD) as i64).collect(),
        (0..N_ATOMS).collect(),
    )
    .unwrap();
    let frame = random_frame(&mut rng);

    c.bench_function("compute_bead_centroids", |b| {
        b.iter(|| {
            std::hint::black_box(compute_bead_centroids(&metadata, &frame).unwrap());
        })
    });

    let beads = compute_bead_centroids(&metadata, &frame).unwrap();
    let mut target = FrameCoordinateBuffer::zeros(N_ATOMS / ATOMS_PER_BEAD);

    c.bench_function("write_beads", |b| {
        b.iter(|| {
            write_beads(&beads, &mut target).unwrap();
            std::hint::black_box(&target);
        })
    });

    c.bench_function("AtomSelectionMetadata::check_contiguous", |b| {
        b.iter(|| {
            std::hint::black_box(metadata.check_contiguous().unwrap());
        })
    });

    let source = source_molecule(&mut rng);
    let job = MappingJob::default().with_target(1);

    c.bench_function("MappingEngine::run", |b| {
        b.iter(|| {
            let mut host = MemoryHost::new();
            host.add_molecule(source.clone());
            host.add_molecule(Molecule::new("membrane-cg", N_ATOMS / ATOMS_PER_BEAD));

            std::hint::black_box(
                MappingEngine::new(&mut host)
                    .with_observer(&mut SilentProgress)
                    .run(&job)
                    .unwrap(),
            );
        })
    });
}

criterion_group!(benches, benchmark);
criterion_main!(benches);
