use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};

use mesh_boundary_layer::prelude::*;

type Generator =
    fn(usize, usize, usize, Point3, Point3, MeshGenerationOptions) -> Result<VolumeMesh, MeshError>;

fn selected_block(n: usize, generator: Generator) -> VolumeMesh {
    let mut mesh = generator(n, n, n, [0.0; 3], [1.0; 3], MeshGenerationOptions::default())
        .expect("block mesh");
    mesh.select_faces_where(|c| c[2] < 1e-9);
    mesh
}

fn bench_boundary_layer(c: &mut Criterion) {
    let mut group = c.benchmark_group("boundary_layer");
    let options = BoundaryLayerOptions::new(5, 1.3);

    for &n in &[4usize, 8] {
        let hexes = selected_block(n, hex_mesh);
        group.bench_with_input(BenchmarkId::new("hex_block", n), &n, |b, _| {
            b.iter(|| {
                let out = apply(&hexes, options).expect("layered hexes");
                black_box(out);
            });
        });

        let tets = selected_block(n, tet_mesh);
        group.bench_with_input(BenchmarkId::new("tet_block", n), &n, |b, _| {
            b.iter(|| {
                let out = apply(&tets, options).expect("layered tets");
                black_box(out);
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_boundary_layer);
criterion_main!(benches);
